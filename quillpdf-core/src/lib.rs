//! # quillpdf
//!
//! A PDF 1.7 writer: an append-only table of numbered indirect objects,
//! byte-exact marshalling of the PDF value model, filtered streams and a
//! cross-reference table whose offsets match the bytes written.
//!
//! ## Features
//!
//! - **Object table**: objects are numbered in the order they are added;
//!   references are plain values and may point forward
//! - **Marshalling**: reals always carry five decimals, dictionaries keep
//!   insertion order, names use `#xx` escapes
//! - **Streams**: payloads pass through no filter, LZW or Flate as they are
//!   written
//! - **Drawing**: paths, colours, standard 14 fonts and raster images on a
//!   page [`Canvas`]
//!
//! ## Quick Start
//!
//! ```rust
//! use quillpdf::{Document, Path, Result, StandardFont, Text};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.set_title("My PDF");
//!
//! // A US letter page
//! let mut canvas = doc.new_page(612.0, 792.0);
//! canvas.translate(100.0, 100.0)?;
//! canvas.stroke(&Path::new().move_to(0.0, 0.0).line_to(100.0, 0.0))?;
//!
//! let mut text = Text::new();
//! text.set_font(StandardFont::Helvetica, 14.0).show("Hello, World!");
//! canvas.draw_text(&text)?;
//! canvas.close()?;
//!
//! let mut buffer = Vec::new();
//! doc.write(&mut buffer)?;
//! assert!(buffer.ends_with(b"%%EOF\r\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`objects`] - The value model: objects, names, dictionaries, streams
//! - [`marshal`] - Conversion of values into PDF syntax
//! - [`document`] - The indirect object table and page tree
//! - [`writer`] - Low-level file writing with offset tracking
//! - [`page`] - The page drawing surface
//! - [`graphics`] - Paths, colours and images
//! - [`text`] - Text objects and the standard 14 fonts
//!
//! ## Cargo features
//!
//! - `external-images` - build [`Image`]s from files and
//!   `image::DynamicImage` values

pub mod document;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod marshal;
pub mod objects;
pub mod page;
pub mod text;
pub mod writer;

pub use document::{Document, DocumentMetadata};
pub use error::{PdfError, Result};
pub use geometry::{Point, Rectangle};
pub use graphics::{Color, Image, ImageColorSpace, Path};
pub use marshal::{marshal, PdfMarshal};
pub use objects::{Dictionary, Filter, Name, Object, ObjectId, Reference, Stream};
pub use page::Canvas;
pub use text::{StandardFont, Text};

/// Current version of quillpdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The PDF version written in every file header.
pub const PDF_VERSION: &str = "1.7";
