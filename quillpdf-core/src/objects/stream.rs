use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Name};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fmt;
use std::io::{self, Write};
use weezl::{encode::Encoder as LzwEncoder, BitOrder, LzwStatus};

/// Compression applied to a stream's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Bytes are stored as written.
    None,
    /// `/LZWDecode`
    Lzw,
    /// `/FlateDecode` (zlib)
    #[default]
    Flate,
}

impl Filter {
    /// The `/Filter` name written in the stream dictionary, if any.
    pub fn pdf_name(&self) -> Option<&'static str> {
        match self {
            Filter::None => None,
            Filter::Lzw => Some("LZWDecode"),
            Filter::Flate => Some("FlateDecode"),
        }
    }
}

/// A stream object: extra dictionary keys plus a payload written through a
/// filter.
///
/// Bytes pass through the filter's encoder as they are written. The payload
/// and its length are only known after [`Stream::close`], which flushes the
/// encoder's trailing state. `Length` and `Filter` are never stored in the
/// dictionary; they are produced when the stream is marshalled.
pub struct Stream {
    dictionary: Dictionary,
    filter: Filter,
    state: StreamState,
}

enum StreamState {
    Open(FilterEncoder),
    Closed(Vec<u8>),
    /// The encoder failed while flushing; the payload is lost.
    Failed(String),
}

enum FilterEncoder {
    Raw(Vec<u8>),
    Lzw(LzwSink),
    Flate(ZlibEncoder<Vec<u8>>),
}

impl Stream {
    pub fn new(filter: Filter) -> Self {
        Self::with_dictionary(filter, Dictionary::new())
    }

    /// Creates a stream whose dictionary starts with `dictionary`'s keys
    /// (for example an image's `Width` and `Height`).
    pub fn with_dictionary(filter: Filter, dictionary: Dictionary) -> Self {
        let encoder = match filter {
            Filter::None => FilterEncoder::Raw(Vec::new()),
            Filter::Lzw => FilterEncoder::Lzw(LzwSink::new()),
            Filter::Flate => {
                FilterEncoder::Flate(ZlibEncoder::new(Vec::new(), Compression::default()))
            }
        };
        Self {
            dictionary,
            filter,
            state: StreamState::Open(encoder),
        }
    }

    /// Creates, fills and closes a stream in one step.
    pub fn from_bytes(filter: Filter, dictionary: Dictionary, data: &[u8]) -> Result<Self> {
        let mut stream = Self::with_dictionary(filter, dictionary);
        stream.write(data)?;
        stream.close()?;
        Ok(stream)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    /// Feeds bytes through the filter.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.state {
            StreamState::Closed(_) => Err(PdfError::StreamClosed),
            StreamState::Failed(message) => Err(PdfError::Compression(message.clone())),
            StreamState::Open(FilterEncoder::Raw(buf)) => {
                buf.extend_from_slice(data);
                Ok(())
            }
            StreamState::Open(FilterEncoder::Lzw(sink)) => sink.push(data),
            StreamState::Open(FilterEncoder::Flate(encoder)) => encoder
                .write_all(data)
                .map_err(|e| PdfError::Compression(format!("deflate write failed: {e}"))),
        }
    }

    /// Flushes the filter and seals the payload. Must be called exactly once.
    ///
    /// If the encoder fails to flush, the stream is left failed: it is not
    /// closed, and every later call reports the compression error.
    pub fn close(&mut self) -> Result<()> {
        let placeholder = StreamState::Failed("stream is being closed".to_string());
        let encoder = match std::mem::replace(&mut self.state, placeholder) {
            StreamState::Open(encoder) => encoder,
            StreamState::Failed(message) => {
                let err = PdfError::Compression(message.clone());
                self.state = StreamState::Failed(message);
                return Err(err);
            }
            closed @ StreamState::Closed(_) => {
                self.state = closed;
                return Err(PdfError::StreamClosed);
            }
        };

        let finished = match encoder {
            FilterEncoder::Raw(buf) => Ok(buf),
            FilterEncoder::Lzw(sink) => sink.finish(),
            FilterEncoder::Flate(encoder) => encoder
                .finish()
                .map_err(|e| PdfError::Compression(format!("deflate flush failed: {e}"))),
        };
        self.seal(finished)
    }

    fn seal(&mut self, finished: Result<Vec<u8>>) -> Result<()> {
        match finished {
            Ok(data) => {
                tracing::trace!(filter = ?self.filter, length = data.len(), "stream closed");
                self.state = StreamState::Closed(data);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(filter = ?self.filter, error = %err, "stream filter failed to flush");
                let message = match &err {
                    PdfError::Compression(message) => message.clone(),
                    other => other.to_string(),
                };
                self.state = StreamState::Failed(message);
                Err(err)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, StreamState::Closed(_))
    }

    /// The filtered payload. Fails while the stream is still open or after
    /// its filter failed to flush.
    pub fn data(&self) -> Result<&[u8]> {
        match &self.state {
            StreamState::Closed(data) => Ok(data),
            StreamState::Open(_) => Err(PdfError::StreamNotClosed),
            StreamState::Failed(message) => Err(PdfError::Compression(message.clone())),
        }
    }

    /// Length of the filtered payload, known once the stream is closed.
    pub fn len(&self) -> Option<usize> {
        self.data().ok().map(<[u8]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub(crate) fn filter_name(&self) -> Option<Name> {
        self.filter.pdf_name().map(Name::from)
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Stream::write(self, buf).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PartialEq for Stream {
    /// Closed streams compare by filter, dictionary and payload. A stream
    /// whose payload is not sealed is equal only to itself.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.filter == other.filter
            && self.dictionary == other.dictionary
            && match (&self.state, &other.state) {
                (StreamState::Closed(a), StreamState::Closed(b)) => a == b,
                _ => false,
            }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("dictionary", &self.dictionary)
            .field("filter", &self.filter)
            .field("closed", &self.is_closed())
            .field("length", &self.len())
            .finish()
    }
}

const LZW_CHUNK: usize = 4096;

/// Incremental LZW encoder with the code layout PDF readers expect:
/// MSB-first, 8-bit literals, code width switching one code early.
struct LzwSink {
    encoder: LzwEncoder,
    output: Vec<u8>,
}

impl LzwSink {
    fn new() -> Self {
        Self {
            encoder: LzwEncoder::with_tiff_size_switch(BitOrder::Msb, 8),
            output: Vec::new(),
        }
    }

    fn push(&mut self, mut input: &[u8]) -> Result<()> {
        let mut buf = [0u8; LZW_CHUNK];
        while !input.is_empty() {
            let result = self.encoder.encode_bytes(input, &mut buf);
            self.output.extend_from_slice(&buf[..result.consumed_out]);
            input = &input[result.consumed_in..];
            match result.status {
                Ok(LzwStatus::Ok) => {}
                Ok(LzwStatus::NoProgress) | Ok(LzwStatus::Done) => {
                    if result.consumed_in == 0 && result.consumed_out == 0 {
                        return Err(PdfError::Compression(
                            "LZW encoder stopped accepting input".to_string(),
                        ));
                    }
                }
                Err(e) => return Err(PdfError::Compression(format!("LZW encode failed: {e:?}"))),
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.encoder.finish();
        let mut buf = [0u8; LZW_CHUNK];
        loop {
            let result = self.encoder.encode_bytes(&[], &mut buf);
            self.output.extend_from_slice(&buf[..result.consumed_out]);
            match result.status {
                Ok(LzwStatus::Done) => return Ok(self.output),
                Ok(LzwStatus::Ok) => {}
                Ok(LzwStatus::NoProgress) => {
                    if result.consumed_out == 0 {
                        return Err(PdfError::Compression(
                            "LZW encoder could not flush".to_string(),
                        ));
                    }
                }
                Err(e) => return Err(PdfError::Compression(format!("LZW flush failed: {e:?}"))),
            }
        }
    }
}
