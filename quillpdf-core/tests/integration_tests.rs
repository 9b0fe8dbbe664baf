//! Integration tests for end-to-end PDF workflows
//!
//! These tests build documents through the public API, encode them and then
//! read the produced bytes back: stream payloads are located through their
//! `/Length` and decompressed with standard decoders.

use flate2::read::ZlibDecoder;
use pretty_assertions::assert_eq;
use quillpdf::{
    Color, Document, Filter, Image, Path, PdfError, Rectangle, Result, StandardFont, Text,
};
use regex::bytes::Regex;
use std::io::Read;
use tempfile::TempDir;
use weezl::{decode::Decoder as LzwDecoder, BitOrder};

/// Returns the decoded payload of stream object `number` in `pdf`.
fn stream_payload(pdf: &[u8], number: u32) -> Vec<u8> {
    let pattern = format!(
        r"(?-u)\r\n{number} 0 obj << [^>]*?/Length (\d+) (?:/Filter /([A-Za-z]+) )?>> stream\r\n"
    );
    let header = Regex::new(&pattern).unwrap();
    let caps = header
        .captures(pdf)
        .unwrap_or_else(|| panic!("stream object {number} not found"));
    let length: usize = std::str::from_utf8(&caps[1]).unwrap().parse().unwrap();
    let start = caps.get(0).unwrap().end();
    let data = &pdf[start..start + length];
    assert_eq!(&pdf[start + length..start + length + 11], b"\r\nendstream");

    match caps.get(2).map(|m| m.as_bytes()) {
        Some(b"FlateDecode") => {
            let mut out = Vec::new();
            ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
            out
        }
        Some(b"LZWDecode") => LzwDecoder::with_tiff_size_switch(BitOrder::Msb, 8)
            .decode(data)
            .unwrap(),
        Some(other) => panic!("unexpected filter {}", String::from_utf8_lossy(other)),
        None => data.to_vec(),
    }
}

/// Asserts that `expected` tokens appear in `content` in that order.
fn assert_tokens_in_order(content: &str, expected: &[&str]) {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let mut position = 0;
    for want in expected {
        match tokens[position..].iter().position(|token| token == want) {
            Some(offset) => position += offset + 1,
            None => panic!("token {want:?} missing or out of order in {content:?}"),
        }
    }
}

fn hello_document(filter: Filter) -> Result<(Document, u32)> {
    let mut doc = Document::new();
    doc.set_content_filter(filter);

    let mut canvas = doc.new_page(612.0, 792.0);
    let contents = canvas.contents_id().number();
    canvas.translate(100.0, 100.0)?;
    canvas.stroke(&Path::new().move_to(0.0, 0.0).line_to(100.0, 0.0))?;

    let mut text = Text::new();
    text.set_font(StandardFont::Helvetica, 14.0).show("Hello, World!");
    canvas.draw_text(&text)?;
    canvas.close()?;

    Ok((doc, contents))
}

#[test]
fn test_empty_document() -> Result<()> {
    let mut doc = Document::new();
    let mut pdf = Vec::new();
    doc.write(&mut pdf)?;

    assert!(pdf.starts_with(b"%PDF-1.7\r\n"));
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("1 0 obj"));
    assert!(text.contains("trailer"));
    assert!(text.contains("startxref"));
    assert!(pdf.ends_with(b"%%EOF\r\n"));
    Ok(())
}

#[test]
fn test_hello_page_content_stream() -> Result<()> {
    for filter in [Filter::Flate, Filter::Lzw, Filter::None] {
        let (mut doc, contents) = hello_document(filter)?;
        let mut pdf = Vec::new();
        doc.write(&mut pdf)?;

        let content = String::from_utf8(stream_payload(&pdf, contents)).unwrap();
        assert_tokens_in_order(&content, &["m", "l", "S", "Tf", "Tj"]);
        assert!(content.contains("(Hello, World!) Tj\n"), "{filter:?}: {content}");
    }
    Ok(())
}

#[test]
fn test_hello_page_content_is_exact() -> Result<()> {
    let (mut doc, contents) = hello_document(Filter::Flate)?;
    let mut pdf = Vec::new();
    doc.write(&mut pdf)?;

    let content = String::from_utf8(stream_payload(&pdf, contents)).unwrap();
    assert_eq!(
        content,
        concat!(
            "1 0 0 1 100.00000 100.00000 cm\n",
            "0.00000 0.00000 m\n",
            "100.00000 0.00000 l\n",
            "S\n",
            "BT\n",
            "/Helvetica 14.00000 Tf\n",
            "(Hello, World!) Tj\n",
            "ET\n"
        )
    );
    Ok(())
}

#[test]
fn test_hello_page_object_graph() -> Result<()> {
    let (mut doc, _) = hello_document(Filter::Flate)?;
    let mut pdf = Vec::new();
    doc.write(&mut pdf)?;
    let text = String::from_utf8_lossy(&pdf);

    // 1 catalog, 2 page, 3 contents, 4 font, 5 pages root
    assert!(text.contains("1 0 obj << /Type /Catalog /Pages 5 0 R >> endobj\r\n"));
    assert!(text.contains("/Type /Page /Parent 5 0 R "));
    assert!(text.contains("/Font << /Helvetica 4 0 R >>"));
    assert!(text.contains("4 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj"));
    assert!(text.contains("5 0 obj << /Type /Pages /Kids [ 2 0 R ] /Count 1 >> endobj"));
    assert!(text.contains("trailer\r\n<< /Size 6 /Root 1 0 R >>\r\n"));
    Ok(())
}

#[test]
fn test_multi_page_document_with_images() -> Result<()> {
    let mut doc = Document::new();
    doc.set_title("Integration Test Document");
    doc.set_author("Test Suite");

    let pixels: Vec<u8> = (0..16u8).flat_map(|i| [i * 16, 255 - i * 16, 128]).collect();
    let image = Image::from_rgb8(4, 4, pixels.clone())?;
    let shared = doc.add_image(&image)?;

    for page_num in 1..=3 {
        let mut canvas = doc.new_page(595.0, 842.0);
        canvas
            .set_stroke_color(Color::blue())?
            .set_line_width(2.0)?
            .stroke(&Path::new().rectangle(50.0, 50.0, 495.0, 742.0))?;
        canvas.draw_image_reference(shared, Rectangle::from_position_and_size(100.0, 400.0, 200.0, 200.0))?;

        let mut text = Text::new();
        text.set_font(StandardFont::TimesRoman, 16.0)
            .next_line_offset(50.0, 780.0)
            .show(format!("Page {page_num}"));
        canvas.draw_text(&text)?;
        canvas.close()?;
    }

    let mut pdf = Vec::new();
    doc.write(&mut pdf)?;
    assert_eq!(doc.page_count(), 3);

    let image_pixels = stream_payload(&pdf, shared.number());
    assert_eq!(image_pixels, pixels);

    let text = String::from_utf8_lossy(&pdf);
    assert_eq!(text.matches("/BaseFont /Times-Roman").count(), 1);
    assert_eq!(text.matches("/Subtype /Image").count(), 1);
    assert!(text.contains("/Count 3"));
    assert!(text.contains("/Title (Integration Test Document)"));
    Ok(())
}

#[test]
fn test_unclosed_page_is_rejected() {
    let mut doc = Document::new();
    let mut canvas = doc.new_page(612.0, 792.0);
    canvas.push().unwrap();
    drop(canvas);

    let mut pdf = Vec::new();
    assert!(matches!(doc.write(&mut pdf), Err(PdfError::StreamNotClosed)));
    assert!(pdf.is_empty());
}

#[test]
fn test_encode_twice_is_stable() -> Result<()> {
    let (mut doc, _) = hello_document(Filter::Flate)?;
    let mut first = Vec::new();
    doc.write(&mut first)?;
    let mut second = Vec::new();
    doc.write(&mut second)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_save_to_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("hello.pdf");

    let (mut doc, contents) = hello_document(Filter::Lzw)?;
    doc.save(&file_path)?;

    let pdf = std::fs::read(&file_path)?;
    assert!(pdf.starts_with(b"%PDF-1.7\r\n"));
    assert!(pdf.ends_with(b"%%EOF\r\n"));
    let content = String::from_utf8(stream_payload(&pdf, contents)).unwrap();
    assert_tokens_in_order(&content, &["m", "l", "S", "Tf", "Tj"]);
    Ok(())
}

#[test]
fn test_save_to_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("missing").join("out.pdf");

    let mut doc = Document::new();
    assert!(matches!(doc.save(&file_path), Err(PdfError::Io(_))));
}
