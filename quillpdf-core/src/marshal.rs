//! Conversion of values into PDF syntax.
//!
//! Every value that can appear in a file implements [`PdfMarshal`]. The
//! [`Object`] implementation dispatches on the variant; types with their own
//! syntax ([`Name`], [`ObjectId`], [`Stream`], [`IndirectObject`]) write it
//! directly. Output is byte-exact: arrays are `[ a b ]`, dictionaries are
//! `<< /K v >>` in insertion order, reals always carry five decimals.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, IndirectObject, Name, Object, ObjectId, Stream};

/// Digits written after the decimal point of every real number.
pub const REAL_PRECISION: usize = 5;

const STREAM_BEGIN: &[u8] = b" stream\r\n";
const STREAM_END: &[u8] = b"\r\nendstream";
const OBJECT_BEGIN: &[u8] = b" obj ";
const OBJECT_END: &[u8] = b" endobj";

/// A value that knows its own PDF syntax.
pub trait PdfMarshal {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()>;
}

/// Returns the PDF encoding of `value`.
///
/// ```rust
/// use quillpdf::marshal::marshal;
/// use quillpdf::objects::{Dictionary, Name};
///
/// let mut dict = Dictionary::new();
/// dict.set("Type", Name::new("Catalog"));
/// assert_eq!(marshal(&dict).unwrap(), b"<< /Type /Catalog >>");
/// assert_eq!(marshal(&-3.141599).unwrap(), b"-3.14160");
/// ```
pub fn marshal<T: PdfMarshal + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    value.marshal_pdf(&mut out)?;
    Ok(out)
}

/// Formats a real with exactly [`REAL_PRECISION`] decimals, never in
/// exponent form.
pub fn format_real(value: f64) -> Result<String> {
    format_fixed(value, REAL_PRECISION)
}

/// Formats a real with `precision` decimals. Content-stream operands use
/// this directly for colour components.
pub fn format_fixed(value: f64, precision: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(PdfError::Marshal(format!(
            "non-finite real has no PDF syntax: {value}"
        )));
    }
    Ok(format!("{:.*}", precision, value))
}

/// Returns `s` as a PDF literal string. Only `\r \t \b \f ( ) \` are
/// escaped; every other byte, newlines included, is written as is.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('(');
    for ch in s.chars() {
        match ch {
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push(')');
    out
}

impl PdfMarshal for Object {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Object::Null => out.extend_from_slice(b"null"),
            Object::Boolean(b) => b.marshal_pdf(out)?,
            Object::Integer(i) => i.marshal_pdf(out)?,
            Object::Real(f) => f.marshal_pdf(out)?,
            Object::String(s) => s.marshal_pdf(out)?,
            Object::Name(n) => n.marshal_pdf(out)?,
            Object::Array(items) => items.marshal_pdf(out)?,
            Object::Dictionary(dict) => dict.marshal_pdf(out)?,
            Object::Stream(stream) => stream.marshal_pdf(out)?,
            Object::Reference(id) => id.marshal_pdf(out)?,
        }
        Ok(())
    }
}

impl PdfMarshal for bool {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(if *self { b"true" } else { b"false" });
        Ok(())
    }
}

macro_rules! marshal_integer {
    ($($t:ty),*) => {
        $(
            impl PdfMarshal for $t {
                fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
                    out.extend_from_slice(self.to_string().as_bytes());
                    Ok(())
                }
            }
        )*
    };
}

marshal_integer!(i32, i64, u16, u32, u64, usize);

impl PdfMarshal for f64 {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(format_real(*self)?.as_bytes());
        Ok(())
    }
}

impl PdfMarshal for f32 {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        f64::from(*self).marshal_pdf(out)
    }
}

impl PdfMarshal for str {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(quote(self).as_bytes());
        Ok(())
    }
}

impl PdfMarshal for String {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        self.as_str().marshal_pdf(out)
    }
}

impl PdfMarshal for Name {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.to_pdf_syntax().as_bytes());
        Ok(())
    }
}

impl PdfMarshal for ObjectId {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.to_string().as_bytes());
        Ok(())
    }
}

impl<T: PdfMarshal> PdfMarshal for [T] {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(b"[ ");
        for item in self {
            item.marshal_pdf(out)?;
            out.push(b' ');
        }
        out.push(b']');
        Ok(())
    }
}

impl<T: PdfMarshal> PdfMarshal for Vec<T> {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        self.as_slice().marshal_pdf(out)
    }
}

impl<T: PdfMarshal> PdfMarshal for Option<T> {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Some(value) => value.marshal_pdf(out),
            None => {
                out.extend_from_slice(b"null");
                Ok(())
            }
        }
    }
}

impl<T: PdfMarshal + ?Sized> PdfMarshal for &T {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        (**self).marshal_pdf(out)
    }
}

impl PdfMarshal for Dictionary {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(b"<< ");
        for (key, value) in self.iter() {
            write_entry(out, key, value)?;
        }
        out.extend_from_slice(b">>");
        Ok(())
    }
}

fn write_entry(out: &mut Vec<u8>, key: &Name, value: &dyn PdfMarshal) -> Result<()> {
    key.marshal_pdf(out)?;
    out.push(b' ');
    value.marshal_pdf(out)?;
    out.push(b' ');
    Ok(())
}

impl PdfMarshal for Stream {
    /// Writes the caller's keys followed by the synthesized `Length` and,
    /// for filtered streams, `Filter`. Caller-supplied values for those two
    /// keys are ignored.
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        let data = self
            .data()
            .map_err(|_| PdfError::Marshal("stream must be closed before marshalling".to_string()))?;

        out.extend_from_slice(b"<< ");
        for (key, value) in self.dictionary().iter() {
            if matches!(key.as_str(), "Length" | "Filter") {
                continue;
            }
            write_entry(out, key, value)?;
        }
        write_entry(out, &Name::from("Length"), &data.len())?;
        if let Some(filter) = self.filter_name() {
            write_entry(out, &Name::from("Filter"), &filter)?;
        }
        out.extend_from_slice(b">>");

        out.extend_from_slice(STREAM_BEGIN);
        out.extend_from_slice(data);
        out.extend_from_slice(STREAM_END);
        Ok(())
    }
}

impl PdfMarshal for IndirectObject<'_> {
    fn marshal_pdf(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(self.id.number().to_string().as_bytes());
        out.push(b' ');
        out.extend_from_slice(self.id.generation().to_string().as_bytes());
        out.extend_from_slice(OBJECT_BEGIN);
        self.object.marshal_pdf(out)?;
        out.extend_from_slice(OBJECT_END);
        Ok(())
    }
}
