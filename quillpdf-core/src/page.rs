use crate::document::Document;
use crate::error::{PdfError, Result};
use crate::geometry::Rectangle;
use crate::graphics::{Color, Image, Path};
use crate::marshal::format_real;
use crate::objects::{Dictionary, Name, ObjectId, Reference};
use crate::text::Text;

/// A two-dimensional drawing surface on a single page.
///
/// A canvas is obtained from [`Document::new_page`] and writes operators
/// into the page's content stream, one per line. Fonts and images it uses
/// are registered in the page's resources as they are drawn. The canvas must
/// be [closed](Canvas::close) before the document is encoded.
///
/// # Example
///
/// ```rust
/// use quillpdf::{Color, Document, Path, Rectangle};
///
/// # fn main() -> quillpdf::Result<()> {
/// let mut doc = Document::new();
/// let mut canvas = doc.new_page(612.0, 792.0);
/// canvas
///     .set_color(Color::rgb(0.0, 0.5, 1.0))?
///     .fill(&Path::new().rectangle(100.0, 100.0, 200.0, 150.0))?;
/// canvas.close()?;
/// # Ok(())
/// # }
/// ```
pub struct Canvas<'a> {
    doc: &'a mut Document,
    page: ObjectId,
    contents: ObjectId,
    image_counter: usize,
}

const IMAGE_NAME_PREFIX: &str = "__image";

impl<'a> Canvas<'a> {
    pub(crate) fn new(doc: &'a mut Document, page: ObjectId, contents: ObjectId) -> Self {
        Self {
            doc,
            page,
            contents,
            image_counter: 0,
        }
    }

    /// The page dictionary's reference.
    pub fn page_id(&self) -> Reference {
        self.page
    }

    /// The content stream's reference.
    pub fn contents_id(&self) -> Reference {
        self.contents
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    /// Seals the page's content stream.
    pub fn close(self) -> Result<()> {
        self.doc.stream_mut(self.contents)?.close()?;
        tracing::debug!(page = self.page.number(), "page closed");
        Ok(())
    }

    /// Changes the page's media box (the size of the physical medium).
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<&mut Self> {
        self.doc
            .dictionary_mut(self.page)?
            .set("MediaBox", Rectangle::from_size(width, height));
        Ok(self)
    }

    /// Changes the page's crop box.
    pub fn set_crop(&mut self, width: f64, height: f64) -> Result<&mut Self> {
        self.doc
            .dictionary_mut(self.page)?
            .set("CropBox", Rectangle::from_size(width, height));
        Ok(self)
    }

    /// Paints a line along the path using the current stroke colour.
    pub fn stroke(&mut self, path: &Path) -> Result<&mut Self> {
        self.paint(path, "S")
    }

    /// Paints the area enclosed by the path using the current fill colour.
    pub fn fill(&mut self, path: &Path) -> Result<&mut Self> {
        self.paint(path, "f")
    }

    /// Fills then strokes the path without repeating it in the file.
    pub fn fill_stroke(&mut self, path: &Path) -> Result<&mut Self> {
        self.paint(path, "B")
    }

    fn paint(&mut self, path: &Path, operator: &str) -> Result<&mut Self> {
        let mut ops = path.operators()?;
        ops.push_str(operator);
        ops.push('\n');
        self.write_ops(&ops)
    }

    pub fn set_line_width(&mut self, width: f64) -> Result<&mut Self> {
        let ops = format!("{} w\n", format_real(width)?);
        self.write_ops(&ops)
    }

    /// Changes the fill colour.
    pub fn set_color(&mut self, color: Color) -> Result<&mut Self> {
        let ops = color.fill_operator()?;
        self.write_ops(&ops)
    }

    pub fn set_stroke_color(&mut self, color: Color) -> Result<&mut Self> {
        let ops = color.stroke_operator()?;
        self.write_ops(&ops)
    }

    /// Saves the graphics state (`q`).
    pub fn push(&mut self) -> Result<&mut Self> {
        self.write_ops("q\n")
    }

    /// Restores the most recently saved graphics state (`Q`).
    pub fn pop(&mut self) -> Result<&mut Self> {
        self.write_ops("Q\n")
    }

    /// Moves the coordinate system by the given offset.
    pub fn translate(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        let ops = format!("1 0 0 1 {} {} cm\n", format_real(x)?, format_real(y)?);
        self.write_ops(&ops)
    }

    /// Rotates the coordinate system by `theta` radians.
    pub fn rotate(&mut self, theta: f64) -> Result<&mut Self> {
        let (s, c) = theta.sin_cos();
        self.transform(c, s, -s, c, 0.0, 0.0)
    }

    pub fn scale(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        self.transform(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Concatenates the matrix `[a b 0; c d 0; e f 1]` with the current
    /// transformation matrix.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<&mut Self> {
        let mut ops = String::new();
        for operand in [a, b, c, d, e, f] {
            ops.push_str(&format_real(operand)?);
            ops.push(' ');
        }
        ops.push_str("cm\n");
        self.write_ops(&ops)
    }

    /// Paints a text object, registering its fonts in the page resources.
    pub fn draw_text(&mut self, text: &Text) -> Result<&mut Self> {
        let body = text.operators()?;
        for font in text.fonts() {
            if self.resources_mut("Font")?.contains_key(font.base_font()) {
                continue;
            }
            let id = self.doc.standard_font(font);
            self.resources_mut("Font")?.set(font.pdf_name(), id);
        }

        let mut ops = String::with_capacity(body.len() + 6);
        ops.push_str("BT\n");
        ops.push_str(&body);
        ops.push_str("ET\n");
        self.write_ops(&ops)
    }

    /// Stores `image` in the document and paints it into `target`. To paint
    /// the same pixels more than once, add the image with
    /// [`Document::add_image`] and use [`Canvas::draw_image_reference`].
    pub fn draw_image(&mut self, image: &Image, target: Rectangle) -> Result<&mut Self> {
        let id = self.doc.add_image(image)?;
        self.draw_image_reference(id, target)
    }

    /// Paints an image XObject already in the document, scaled to `target`.
    pub fn draw_image_reference(&mut self, image: Reference, target: Rectangle) -> Result<&mut Self> {
        if self.doc.get(image).and_then(|o| o.as_stream()).is_none() {
            return Err(PdfError::InvalidObjectReference(image.number(), image.generation()));
        }

        let name = self.next_image_name()?;
        self.resources_mut("XObject")?.set(name.clone(), image);

        self.push()?;
        self.transform(
            target.width(),
            0.0,
            0.0,
            target.height(),
            target.lower_left.x,
            target.lower_left.y,
        )?;
        let ops = format!("{} Do\n", name.to_pdf_syntax());
        self.write_ops(&ops)?;
        self.pop()
    }

    /// The next `__image<N>__` name not already in the page's XObjects.
    fn next_image_name(&mut self) -> Result<Name> {
        loop {
            let name = Name::new(format!("{IMAGE_NAME_PREFIX}{}__", self.image_counter));
            self.image_counter += 1;
            if !self.resources_mut("XObject")?.contains_key(name.as_str()) {
                return Ok(name);
            }
        }
    }

    fn resources_mut(&mut self, category: &str) -> Result<&mut Dictionary> {
        let page = self.page;
        self.doc
            .dictionary_mut(page)?
            .get_dict_mut("Resources")
            .and_then(|resources| resources.get_dict_mut(category))
            .ok_or_else(|| {
                PdfError::InvalidStructure(format!("page {page} has no {category} resources"))
            })
    }

    fn write_ops(&mut self, ops: &str) -> Result<&mut Self> {
        self.doc.stream_mut(self.contents)?.write(ops.as_bytes())?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Filter, Object};
    use crate::text::StandardFont;

    fn unfiltered() -> Document {
        let mut doc = Document::new();
        doc.set_content_filter(Filter::None);
        doc
    }

    fn contents(doc: &Document, id: ObjectId) -> String {
        let stream = doc.get(id).and_then(Object::as_stream).unwrap();
        String::from_utf8(stream.data().unwrap().to_vec()).unwrap()
    }

    fn resources<'d>(doc: &'d Document, page: ObjectId, category: &str) -> &'d Dictionary {
        doc.get(page)
            .and_then(Object::as_dict)
            .and_then(|dict| dict.get_dict("Resources"))
            .and_then(|resources| resources.get_dict(category))
            .unwrap()
    }

    #[test]
    fn test_stroke_and_fill_operators() {
        let mut doc = unfiltered();
        let mut canvas = doc.new_page(612.0, 792.0);
        let id = canvas.contents_id();
        let path = Path::new().move_to(0.0, 0.0).line_to(100.0, 0.0);
        canvas.stroke(&path).unwrap();
        canvas.fill(&path).unwrap();
        canvas.fill_stroke(&path).unwrap();
        canvas.close().unwrap();

        let line = "0.00000 0.00000 m\n100.00000 0.00000 l\n";
        assert_eq!(contents(&doc, id), format!("{line}S\n{line}f\n{line}B\n"));
    }

    #[test]
    fn test_state_and_transform_operators() {
        let mut doc = unfiltered();
        let mut canvas = doc.new_page(612.0, 792.0);
        let id = canvas.contents_id();
        canvas
            .push()
            .unwrap()
            .translate(100.0, 50.5)
            .unwrap()
            .scale(2.0, 3.0)
            .unwrap()
            .set_line_width(0.5)
            .unwrap()
            .pop()
            .unwrap();
        canvas.close().unwrap();

        assert_eq!(
            contents(&doc, id),
            concat!(
                "q\n",
                "1 0 0 1 100.00000 50.50000 cm\n",
                "2.00000 0.00000 0.00000 3.00000 0.00000 0.00000 cm\n",
                "0.50000 w\n",
                "Q\n"
            )
        );
    }

    #[test]
    fn test_rotate_writes_rotation_matrix() {
        let mut doc = unfiltered();
        let mut canvas = doc.new_page(100.0, 100.0);
        let id = canvas.contents_id();
        canvas.rotate(std::f64::consts::FRAC_PI_2).unwrap();
        canvas.close().unwrap();

        assert_eq!(
            contents(&doc, id),
            "0.00000 1.00000 -1.00000 0.00000 0.00000 0.00000 cm\n"
        );
    }

    #[test]
    fn test_colors() {
        let mut doc = unfiltered();
        let mut canvas = doc.new_page(100.0, 100.0);
        let id = canvas.contents_id();
        canvas.set_color(Color::rgb(1.0, 0.0, 0.5)).unwrap();
        canvas.set_stroke_color(Color::rgb(0.25, 0.75, 1.0)).unwrap();
        canvas.close().unwrap();

        assert_eq!(contents(&doc, id), "1.00 0.00 0.50 rg\n0.25 0.75 1.00 RG\n");
    }

    #[test]
    fn test_draw_text_registers_fonts_once() {
        let mut doc = unfiltered();
        let mut canvas = doc.new_page(612.0, 792.0);
        let page = canvas.page_id();
        let id = canvas.contents_id();

        let mut text = Text::new();
        text.set_font(StandardFont::Helvetica, 12.0).show("Hello");
        canvas.draw_text(&text).unwrap();
        canvas.draw_text(&text).unwrap();
        canvas.close().unwrap();

        let fonts = resources(&doc, page, "Font");
        assert_eq!(fonts.len(), 1);
        let font_id = fonts.get("Helvetica").and_then(Object::as_reference).unwrap();
        assert_eq!(font_id, doc.standard_font(StandardFont::Helvetica));

        let body = "BT\n/Helvetica 12.00000 Tf\n(Hello) Tj\nET\n";
        assert_eq!(contents(&doc, id), format!("{body}{body}"));
    }

    #[test]
    fn test_fonts_are_shared_between_pages() {
        let mut doc = unfiltered();
        let mut text = Text::new();
        text.set_font(StandardFont::Courier, 10.0).show("x");

        let mut first = doc.new_page(100.0, 100.0);
        let first_page = first.page_id();
        first.draw_text(&text).unwrap();
        first.close().unwrap();

        let mut second = doc.new_page(100.0, 100.0);
        let second_page = second.page_id();
        second.draw_text(&text).unwrap();
        second.close().unwrap();

        assert_eq!(
            resources(&doc, first_page, "Font").get("Courier"),
            resources(&doc, second_page, "Font").get("Courier")
        );
    }

    #[test]
    fn test_draw_image_reference() {
        let mut doc = unfiltered();
        let image = Image::from_gray8(1, 1, vec![128]).unwrap();
        let image_id = doc.add_image(&image).unwrap();

        let mut canvas = doc.new_page(864.0, 864.0);
        let page = canvas.page_id();
        let id = canvas.contents_id();
        let target = Rectangle::from_position_and_size(72.0, 72.0, 720.0, 720.0);
        canvas.draw_image_reference(image_id, target).unwrap();
        canvas.draw_image_reference(image_id, target).unwrap();
        canvas.close().unwrap();

        let xobjects = resources(&doc, page, "XObject");
        assert_eq!(xobjects.get("__image0__"), Some(&Object::Reference(image_id)));
        assert_eq!(xobjects.get("__image1__"), Some(&Object::Reference(image_id)));

        let draw = |name: &str| {
            format!(
                "q\n720.00000 0.00000 0.00000 720.00000 72.00000 72.00000 cm\n/{name} Do\nQ\n"
            )
        };
        assert_eq!(
            contents(&doc, id),
            format!("{}{}", draw("__image0__"), draw("__image1__"))
        );
    }

    #[test]
    fn test_draw_image_adds_xobject() {
        let mut doc = unfiltered();
        let before = doc.len();
        let mut canvas = doc.new_page(100.0, 100.0);
        let image = Image::from_rgb8(1, 1, vec![1, 2, 3]).unwrap();
        canvas
            .draw_image(&image, Rectangle::from_size(10.0, 10.0))
            .unwrap();
        canvas.close().unwrap();

        // Page, contents and the image stream.
        assert_eq!(doc.len(), before + 3);
    }

    #[test]
    fn test_draw_image_reference_to_non_stream_fails() {
        let mut doc = unfiltered();
        let not_an_image = doc.add(42);
        let mut canvas = doc.new_page(100.0, 100.0);
        let result = canvas.draw_image_reference(not_an_image, Rectangle::from_size(1.0, 1.0));
        assert!(matches!(result, Err(PdfError::InvalidObjectReference(_, _))));
    }

    #[test]
    fn test_set_size_and_crop() {
        let mut doc = unfiltered();
        let mut canvas = doc.new_page(612.0, 792.0);
        let page = canvas.page_id();
        canvas.set_size(595.0, 842.0).unwrap();
        canvas.set_crop(500.0, 700.0).unwrap();
        canvas.close().unwrap();

        let dict = doc.get(page).and_then(Object::as_dict).unwrap();
        assert_eq!(dict.get("MediaBox"), Some(&Object::from(Rectangle::from_size(595.0, 842.0))));
        assert_eq!(dict.get("CropBox"), Some(&Object::from(Rectangle::from_size(500.0, 700.0))));
    }

    #[test]
    fn test_closed_canvas_stream_rejects_writes() {
        let mut doc = unfiltered();
        let canvas = doc.new_page(100.0, 100.0);
        let id = canvas.contents_id();
        canvas.close().unwrap();

        let stream = doc.get_mut(id).and_then(Object::as_stream_mut).unwrap();
        assert!(matches!(stream.write(b"q\n"), Err(PdfError::StreamClosed)));
    }
}
