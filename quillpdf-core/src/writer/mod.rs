//! PDF writing functionality

mod pdf_writer;

pub use pdf_writer::{trailer, PdfWriter, BINARY_MARKER, PDF_HEADER};
