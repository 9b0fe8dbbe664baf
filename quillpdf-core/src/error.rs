use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The object graph contains something with no PDF syntax.
    #[error("Marshal error: {0}")]
    Marshal(String),

    /// A stream filter failed to initialize, encode or flush.
    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Write to a stream that has already been closed")]
    StreamClosed,

    #[error("Stream has not been closed")]
    StreamNotClosed,

    #[error("Invalid object reference: {0} {1} R")]
    InvalidObjectReference(u32, u16),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// An object does not have the shape the document layer expects, for
    /// example a page whose `Resources` entry was replaced.
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;
