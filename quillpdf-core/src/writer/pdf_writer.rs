use crate::error::{PdfError, Result};
use crate::marshal::PdfMarshal;
use crate::objects::{Dictionary, IndirectObject, ObjectId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// First header line.
pub const PDF_HEADER: &[u8] = b"%PDF-1.7\r\n";
/// Second header line: a comment of high-bit bytes marking the file as binary.
pub const BINARY_MARKER: &[u8] = b"%\x93\x8c\x8b\x9e\r\n";

const EOL: &[u8] = b"\r\n";

/// Writes a complete file in five phases: header, body, cross-reference
/// table, trailer, then `startxref` and `%%EOF`.
///
/// Every byte goes through [`PdfWriter::write_bytes`], which keeps the running
/// offset the cross-reference entries are taken from.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_entries: Vec<(u64, u16)>,
    current_position: u64,
    scratch: Vec<u8>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_entries: Vec::new(),
            current_position: 0,
            scratch: Vec::new(),
        }
    }

    /// Writes `objects` as the body of a file whose trailer is `trailer`.
    ///
    /// Objects must arrive numbered 1, 2, 3, ... with no gaps. A failing
    /// destination aborts the call; bytes already written stay written.
    ///
    /// Each call writes a complete file. Offsets restart at that file's
    /// header, so the writer can be reused for the next file.
    pub fn write_file<'a, I>(&mut self, objects: I, trailer: &Dictionary) -> Result<()>
    where
        I: IntoIterator<Item = IndirectObject<'a>>,
    {
        self.xref_entries.clear();
        self.current_position = 0;

        tracing::debug!("writing header");
        self.write_header()?;

        tracing::debug!("writing body");
        for object in objects {
            self.write_object(&object)?;
        }

        tracing::debug!(objects = self.xref_entries.len(), "writing xref table");
        let xref_position = self.write_xref()?;

        tracing::debug!("writing trailer");
        self.write_trailer(trailer)?;
        self.write_startxref(xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    /// Byte offset of each object written so far, in object number order.
    pub fn xref_positions(&self) -> impl Iterator<Item = u64> + '_ {
        self.xref_entries.iter().map(|(offset, _)| *offset)
    }

    pub fn current_position(&self) -> u64 {
        self.current_position
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(PDF_HEADER)?;
        self.write_bytes(BINARY_MARKER)
    }

    fn write_object(&mut self, object: &IndirectObject<'_>) -> Result<()> {
        let expected = self.xref_entries.len() + 1;
        if object.id.number() as usize != expected {
            return Err(PdfError::Marshal(format!(
                "object {} written out of order, expected object {expected}",
                object.id.number()
            )));
        }

        let mut buf = std::mem::take(&mut self.scratch);
        buf.clear();
        let marshalled = object.marshal_pdf(&mut buf);
        if let Err(e) = marshalled {
            self.scratch = buf;
            return Err(e);
        }
        buf.extend_from_slice(EOL);

        self.xref_entries
            .push((self.current_position, object.id.generation()));
        tracing::trace!(
            number = object.id.number(),
            offset = self.current_position,
            length = buf.len(),
            "writing object"
        );
        let written = self.write_bytes(&buf);
        self.scratch = buf;
        written
    }

    /// Returns the offset the table starts at, for `startxref`.
    fn write_xref(&mut self) -> Result<u64> {
        let xref_position = self.current_position;
        self.write_bytes(b"xref\r\n")?;

        let mut table = format!("0 {}\r\n", self.xref_entries.len() + 1);
        // Head of the free list
        table.push_str("0000000000 65535 f\r\n");
        for (offset, generation) in &self.xref_entries {
            table.push_str(&format!("{offset:010} {generation:05} n\r\n"));
        }
        self.write_bytes(table.as_bytes())?;

        Ok(xref_position)
    }

    fn write_trailer(&mut self, trailer: &Dictionary) -> Result<()> {
        self.write_bytes(b"trailer\r\n")?;
        let mut buf = Vec::new();
        trailer.marshal_pdf(&mut buf)?;
        buf.extend_from_slice(EOL);
        self.write_bytes(&buf)
    }

    fn write_startxref(&mut self, xref_position: u64) -> Result<()> {
        let tail = format!("startxref\r\n{xref_position}\r\n%%EOF\r\n");
        self.write_bytes(tail.as_bytes())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

impl PdfWriter<BufWriter<File>> {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file)))
    }
}

/// The trailer dictionary: `Size` (object count plus the free head), `Root`,
/// and `Info` when the document carries metadata.
pub fn trailer(object_count: usize, root: ObjectId, info: Option<ObjectId>) -> Dictionary {
    let mut dict = Dictionary::with_capacity(3);
    dict.set("Size", object_count + 1);
    dict.set("Root", root);
    if let Some(info) = info {
        dict.set("Info", info);
    }
    dict
}
