//! Cross-reference table tests
//!
//! Every in-use entry must hold the byte offset at which its object
//! begins, `startxref` must point at the `xref` keyword and the table must
//! have one entry per object plus the free head.

use pretty_assertions::assert_eq;
use quillpdf::writer::{PdfWriter, BINARY_MARKER, PDF_HEADER};
use quillpdf::{Color, Document, Filter, Image, Path, PdfError, Rectangle, StandardFont, Text};
use regex::bytes::Regex;
use std::io::{self, Write};

const XREF_ENTRY_LEN: usize = 20;

fn sample_document(filter: Filter) -> Document {
    let mut doc = Document::new();
    doc.set_content_filter(filter);
    doc.set_title("Offsets");

    let image = Image::from_gray8(2, 2, vec![0, 85, 170, 255]).unwrap();
    for i in 0..3 {
        let mut canvas = doc.new_page(612.0, 792.0);
        canvas
            .set_color(Color::gray(0.5))
            .unwrap()
            .fill(&Path::new().rectangle(10.0, 10.0, 100.0 + i as f64, 50.0))
            .unwrap();
        canvas
            .draw_image(&image, Rectangle::from_position_and_size(200.0, 200.0, 64.0, 64.0))
            .unwrap();
        let mut text = Text::new();
        text.set_font(StandardFont::Courier, 10.0).show(format!("page {i}"));
        canvas.draw_text(&text).unwrap();
        canvas.close().unwrap();
    }
    doc
}

fn parse_number(bytes: &[u8]) -> usize {
    std::str::from_utf8(bytes).unwrap().trim().parse().unwrap()
}

/// Returns the offset of the xref keyword named by `startxref`.
fn startxref(pdf: &[u8]) -> usize {
    let tail = Regex::new(r"(?-u)startxref\r\n(\d+)\r\n%%EOF\r\n$").unwrap();
    let caps = tail.captures(pdf).expect("missing startxref tail");
    parse_number(&caps[1])
}

/// Reads the in-use entries of the xref table at `offset`.
fn xref_entries(pdf: &[u8], offset: usize) -> Vec<(usize, u16)> {
    let section = &pdf[offset..];
    assert!(section.starts_with(b"xref\r\n"));

    let header = Regex::new(r"(?-u)^xref\r\n0 (\d+)\r\n").unwrap();
    let caps = header.captures(section).unwrap();
    let size = parse_number(&caps[1]);
    let mut cursor = caps.get(0).unwrap().end();

    assert_eq!(&section[cursor..cursor + XREF_ENTRY_LEN], b"0000000000 65535 f\r\n");
    cursor += XREF_ENTRY_LEN;

    let entry = Regex::new(r"(?-u)^(\d{10}) (\d{5}) n\r\n$").unwrap();
    (1..size)
        .map(|_| {
            let line = &section[cursor..cursor + XREF_ENTRY_LEN];
            cursor += XREF_ENTRY_LEN;
            let caps = entry.captures(line).expect("malformed xref entry");
            (parse_number(&caps[1]), parse_number(&caps[2]) as u16)
        })
        .collect()
}

#[test]
fn test_startxref_points_at_table() {
    for filter in [Filter::None, Filter::Lzw, Filter::Flate] {
        let mut doc = sample_document(filter);
        let mut pdf = Vec::new();
        doc.encode(&mut pdf).unwrap();

        let offset = startxref(&pdf);
        assert!(pdf[offset..].starts_with(b"xref\r\n0 "));
        assert_eq!(xref_entries(&pdf, offset).len(), doc.len());
    }
}

#[test]
fn test_every_entry_points_at_its_object() {
    for filter in [Filter::None, Filter::Lzw, Filter::Flate] {
        let mut doc = sample_document(filter);
        let mut pdf = Vec::new();
        doc.encode(&mut pdf).unwrap();

        let entries = xref_entries(&pdf, startxref(&pdf));
        for (index, (offset, generation)) in entries.iter().enumerate() {
            let expected = format!("{} {} obj ", index + 1, generation);
            assert!(
                pdf[*offset..].starts_with(expected.as_bytes()),
                "entry {} at {offset} does not start {expected:?}",
                index + 1
            );
            assert!(*offset == PDF_HEADER.len() + BINARY_MARKER.len() || pdf[..*offset].ends_with(b"endobj\r\n"));
        }
    }
}

#[test]
fn test_offsets_match_object_scan() {
    // Unfiltered streams keep the file textual, so a scan finds only real headers
    let mut doc = sample_document(Filter::None);
    let mut pdf = Vec::new();
    doc.encode(&mut pdf).unwrap();

    let object_start = Regex::new(r"(?m-u)^(\d+) 0 obj ").unwrap();
    let scanned: Vec<(usize, usize)> = object_start
        .captures_iter(&pdf)
        .map(|caps| (parse_number(&caps[1]), caps.get(0).unwrap().start()))
        .collect();

    let entries = xref_entries(&pdf, startxref(&pdf));
    assert_eq!(scanned.len(), entries.len());
    for ((number, scanned_offset), (index, (offset, _))) in scanned.iter().zip(entries.iter().enumerate()) {
        assert_eq!(*number, index + 1);
        assert_eq!(scanned_offset, offset);
    }
}

#[test]
fn test_trailer_after_table() {
    let mut doc = sample_document(Filter::Flate);
    let mut pdf = Vec::new();
    doc.encode(&mut pdf).unwrap();

    let offset = startxref(&pdf);
    let table_len = 6 + format!("0 {}\r\n", doc.len() + 1).len() + XREF_ENTRY_LEN * (doc.len() + 1);
    let trailer = &pdf[offset + table_len..];

    let info = doc.len();
    let expected = format!("trailer\r\n<< /Size {} /Root 1 0 R /Info {info} 0 R >>\r\nstartxref\r\n", doc.len() + 1);
    assert!(trailer.starts_with(expected.as_bytes()));
}

/// A sink that accepts a fixed number of bytes, then fails.
struct FailingWriter {
    budget: usize,
    written: Vec<u8>,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "device full"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_is_reported() {
    for budget in [0, 10, 100, 1000] {
        let mut doc = sample_document(Filter::Flate);
        let mut sink = FailingWriter {
            budget,
            written: Vec::new(),
        };
        let result = doc.encode(&mut sink);

        match result {
            Err(PdfError::Io(e)) => assert_eq!(e.to_string(), "device full"),
            other => panic!("budget {budget}: expected an I/O error, got {other:?}"),
        }
        assert_eq!(sink.written.len(), budget);
    }
}

#[test]
fn test_writer_positions_match_document_encode() {
    let mut doc = sample_document(Filter::Lzw);
    let mut pdf = Vec::new();
    doc.encode(&mut pdf).unwrap();

    let trailer = quillpdf::writer::trailer(doc.len(), doc.root(), None);
    let mut writer = PdfWriter::new_with_writer(Vec::new());
    writer.write_file(doc.objects(), &trailer).unwrap();
    let positions: Vec<u64> = writer.xref_positions().collect();

    let entries = xref_entries(&pdf, startxref(&pdf));
    let expected: Vec<u64> = entries.iter().map(|(offset, _)| *offset as u64).collect();
    assert_eq!(positions, expected);
}
