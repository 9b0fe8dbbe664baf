use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::graphics::Image;
use crate::objects::{
    Dictionary, Filter, IndirectObject, Name, Object, ObjectId, Reference, Stream,
};
use crate::page::Canvas;
use crate::text::StandardFont;
use crate::writer::{trailer, PdfWriter};
use chrono::{DateTime, Local, Utc};
use std::collections::HashMap;
use std::io::Write;

/// A PDF document: the table of indirect objects that make up a file.
///
/// Objects are numbered 1, 2, 3, ... in the order they are added and are
/// never removed or renumbered. The catalog is always object 1. The page
/// tree is wired up when the document is encoded, so pages can be created
/// in any order.
///
/// # Example
///
/// ```rust
/// use quillpdf::{Document, Path, StandardFont, Text};
///
/// # fn main() -> quillpdf::Result<()> {
/// let mut doc = Document::new();
/// let mut canvas = doc.new_page(612.0, 792.0);
/// canvas.translate(100.0, 100.0)?;
/// canvas.stroke(&Path::new().move_to(0.0, 0.0).line_to(100.0, 0.0))?;
///
/// let mut text = Text::new();
/// text.set_font(StandardFont::Helvetica, 14.0).show("Hello, World!");
/// canvas.draw_text(&text)?;
/// canvas.close()?;
///
/// let mut buffer = Vec::new();
/// doc.write(&mut buffer)?;
/// assert!(buffer.starts_with(b"%PDF-1.7\r\n"));
/// # Ok(())
/// # }
/// ```
pub struct Document {
    objects: Vec<Object>,
    root: ObjectId,
    pages: Vec<ObjectId>,
    pages_root: Option<ObjectId>,
    info: Option<ObjectId>,
    fonts: HashMap<StandardFont, ObjectId>,
    content_filter: Filter,
    metadata: DocumentMetadata,
}

/// Metadata for a PDF document, written to the `/Info` dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    /// Software that created the original document
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The information dictionary. Unset fields are left out.
    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let text_fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                dict.set(key, value.as_str());
            }
        }
        if let Some(date) = self.creation_date {
            dict.set("CreationDate", format_pdf_date(date));
        }
        if let Some(date) = self.modification_date {
            dict.set("ModDate", format_pdf_date(date));
        }
        dict
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only its catalog.
    pub fn new() -> Self {
        let mut doc = Self {
            objects: Vec::new(),
            root: ObjectId::new(1, 0),
            pages: Vec::new(),
            pages_root: None,
            info: None,
            fonts: HashMap::with_capacity(StandardFont::ALL.len()),
            content_filter: Filter::default(),
            metadata: DocumentMetadata::default(),
        };
        doc.root = doc.add(catalog());
        doc
    }

    /// Registers `value` under the next object number and returns its
    /// reference.
    pub fn add(&mut self, value: impl Into<Object>) -> Reference {
        self.objects.push(value.into());
        let id = ObjectId::new(self.objects.len() as u32, 0);
        tracing::trace!(number = id.number(), "object added");
        id
    }

    pub fn get(&self, id: Reference) -> Option<&Object> {
        let index = self.index_of(id)?;
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, id: Reference) -> Option<&mut Object> {
        let index = self.index_of(id)?;
        self.objects.get_mut(index)
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        let number = id.number() as usize;
        (id.generation() == 0 && number >= 1 && number <= self.objects.len()).then(|| number - 1)
    }

    /// Number of objects in the table.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The catalog's reference, written as the trailer's `Root`.
    pub fn root(&self) -> Reference {
        self.root
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Iterates over the table in object number order.
    pub fn objects(&self) -> impl Iterator<Item = IndirectObject<'_>> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| IndirectObject::new(ObjectId::new(index as u32 + 1, 0), object))
    }

    pub fn content_filter(&self) -> Filter {
        self.content_filter
    }

    /// Sets the filter for page content and image streams created from now
    /// on. Defaults to [`Filter::Flate`].
    pub fn set_content_filter(&mut self, filter: Filter) {
        self.content_filter = filter;
    }

    /// Returns the font dictionary for one of the standard 14 fonts, adding
    /// it on first use.
    pub fn standard_font(&mut self, font: StandardFont) -> Reference {
        if let Some(id) = self.fonts.get(&font) {
            return *id;
        }
        let id = self.add(font.font_dictionary());
        self.fonts.insert(font, id);
        id
    }

    /// Adds a page of the given size and returns a canvas drawing into its
    /// content stream. The canvas must be closed before the document is
    /// encoded.
    pub fn new_page(&mut self, width: f64, height: f64) -> Canvas<'_> {
        let media_box = Rectangle::from_size(width, height);
        let page = self.add(page_dictionary(media_box));
        self.pages.push(page);

        let filter = self.content_filter;
        let contents = self.add(Stream::new(filter));
        if let Some(dict) = self.get_mut(page).and_then(Object::as_dict_mut) {
            dict.set("Contents", contents);
        }

        tracing::debug!(page = page.number(), width, height, "page added");
        Canvas::new(self, page, contents)
    }

    /// Stores an image as an XObject and returns its reference. Drawing the
    /// reference several times stores the pixels once.
    pub fn add_image(&mut self, image: &Image) -> Result<Reference> {
        let stream = Stream::from_bytes(
            self.content_filter,
            image.stream_dictionary(),
            image.data(),
        )?;
        Ok(self.add(stream))
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Sets the document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Some(title.into());
    }

    /// Sets the document author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Some(author.into());
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.metadata.subject = Some(subject.into());
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.metadata.keywords = Some(keywords.into());
    }

    /// Sets the document creator (software that created the original document).
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.metadata.creator = Some(creator.into());
    }

    /// Sets the document producer (software that produced the PDF).
    pub fn set_producer(&mut self, producer: impl Into<String>) {
        self.metadata.producer = Some(producer.into());
    }

    pub fn set_creation_date(&mut self, date: DateTime<Utc>) {
        self.metadata.creation_date = Some(date);
    }

    /// Sets the document creation date using local time.
    pub fn set_creation_date_local(&mut self, date: DateTime<Local>) {
        self.metadata.creation_date = Some(date.with_timezone(&Utc));
    }

    pub fn set_modification_date(&mut self, date: DateTime<Utc>) {
        self.metadata.modification_date = Some(date);
    }

    /// Sets the modification date to the current time.
    pub fn update_modification_date(&mut self) {
        self.metadata.modification_date = Some(Utc::now());
    }

    /// Writes the complete file to `writer`.
    ///
    /// The page tree and information dictionary are brought up to date first,
    /// then every reference and stream is checked. Nothing is written if
    /// a reference dangles or a stream is still open.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::InvalidObjectReference`] or
    /// [`PdfError::StreamNotClosed`] before writing, or the first marshal or
    /// I/O error met while writing.
    pub fn encode<W: Write>(&mut self, writer: W) -> Result<()> {
        let trailer = self.prepare()?;
        PdfWriter::new_with_writer(writer).write_file(self.objects(), &trailer)
    }

    /// Saves the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written. A partially
    /// written file is left in place.
    pub fn save(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let trailer = self.prepare()?;
        PdfWriter::new(path)?.write_file(self.objects(), &trailer)
    }

    /// Writes the document to a buffer.
    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<()> {
        self.encode(buffer)
    }

    /// Brings the page tree and `/Info` up to date, validates the table and
    /// returns the trailer.
    fn prepare(&mut self) -> Result<Dictionary> {
        self.finalize_page_tree()?;
        self.update_info();
        self.validate()?;

        tracing::debug!(
            objects = self.objects.len(),
            pages = self.pages.len(),
            "encoding document"
        );
        Ok(trailer(self.objects.len(), self.root, self.info))
    }

    /// Adds the pages root on first call, then (re)writes `Kids`, `Count`,
    /// every page's `Parent` and the catalog's `Pages`.
    fn finalize_page_tree(&mut self) -> Result<()> {
        let kids: Vec<Object> = self.pages.iter().map(|&page| Object::Reference(page)).collect();
        let count = self.pages.len();

        let pages_root = match self.pages_root {
            Some(id) => {
                let dict = self.dictionary_mut(id)?;
                dict.set("Kids", kids);
                dict.set("Count", count);
                id
            }
            None => {
                let id = self.add(pages_root(kids, count));
                self.pages_root = Some(id);
                id
            }
        };

        for index in 0..self.pages.len() {
            let page = self.pages[index];
            self.dictionary_mut(page)?.set("Parent", pages_root);
        }

        let root = self.root;
        self.dictionary_mut(root)?.set("Pages", pages_root);

        tracing::debug!(pages = count, root = pages_root.number(), "page tree finalized");
        Ok(())
    }

    fn update_info(&mut self) {
        if self.metadata.is_empty() {
            return;
        }
        let dict = self.metadata.to_dictionary();
        if let Some(info) = self.info.and_then(|id| self.get_mut(id)) {
            *info = Object::Dictionary(dict);
            return;
        }
        self.info = Some(self.add(dict));
    }

    /// Checks that every reference resolves and every stream is closed.
    fn validate(&self) -> Result<()> {
        let mut dangling = None;
        let mut check = |id: ObjectId| {
            if dangling.is_none() && self.get(id).is_none() {
                dangling = Some(id);
            }
        };

        check(self.root);
        if let Some(info) = self.info {
            check(info);
        }
        for object in &self.objects {
            object.for_each_reference(&mut check);
        }
        if let Some(id) = dangling {
            return Err(PdfError::InvalidObjectReference(id.number(), id.generation()));
        }

        for indirect in self.objects() {
            if let Object::Stream(stream) = indirect.object {
                if !stream.is_closed() {
                    tracing::debug!(number = indirect.id.number(), "stream left open");
                    return Err(PdfError::StreamNotClosed);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn dictionary_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary> {
        match self.get_mut(id) {
            Some(Object::Dictionary(dict)) => Ok(dict),
            Some(_) => Err(PdfError::InvalidStructure(format!(
                "object {id} is not a dictionary"
            ))),
            None => Err(PdfError::InvalidObjectReference(id.number(), id.generation())),
        }
    }

    pub(crate) fn stream_mut(&mut self, id: ObjectId) -> Result<&mut Stream> {
        match self.get_mut(id) {
            Some(Object::Stream(stream)) => Ok(stream),
            Some(_) => Err(PdfError::InvalidStructure(format!(
                "object {id} is not a stream"
            ))),
            None => Err(PdfError::InvalidObjectReference(id.number(), id.generation())),
        }
    }
}

fn catalog() -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Name::new("Catalog"));
    dict
}

fn pages_root(kids: Vec<Object>, count: usize) -> Dictionary {
    let mut dict = Dictionary::with_capacity(3);
    dict.set("Type", Name::new("Pages"));
    dict.set("Kids", kids);
    dict.set("Count", count);
    dict
}

/// A page dictionary. `Parent` holds `null` until the page tree is
/// finalized and `Contents` until the content stream is added.
fn page_dictionary(media_box: Rectangle) -> Dictionary {
    let proc_set: Vec<Object> = ["PDF", "Text", "ImageC"]
        .into_iter()
        .map(|name| Object::Name(Name::new(name)))
        .collect();

    let mut resources = Dictionary::with_capacity(3);
    resources.set("ProcSet", proc_set);
    resources.set("Font", Dictionary::new());
    resources.set("XObject", Dictionary::new());

    let mut dict = Dictionary::with_capacity(6);
    dict.set("Type", Name::new("Page"));
    dict.set("Parent", Object::Null);
    dict.set("Resources", resources);
    dict.set("MediaBox", media_box);
    dict.set("CropBox", media_box);
    dict.set("Contents", Object::Null);
    dict
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");
    // UTC offset is always +00'00
    format!("{formatted}+00'00")
}
