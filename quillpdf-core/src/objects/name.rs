use std::borrow::Borrow;
use std::fmt;

/// A PDF name object such as `/Catalog`.
///
/// The stored string is the unescaped identifier. Escaping to the `#xx` form
/// happens only when the name is marshalled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the name in PDF syntax, including the leading solidus.
    pub fn to_pdf_syntax(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 1);
        out.push('/');
        for &byte in self.0.as_bytes() {
            if needs_escape(byte) {
                out.push('#');
                out.push_str(&format!("{byte:02X}"));
            } else {
                out.push(byte as char);
            }
        }
        out
    }
}

/// Regular characters are 0x21..=0x7E minus the delimiters and `#`.
fn needs_escape(byte: u8) -> bool {
    !(0x21..=0x7E).contains(&byte)
        || matches!(
            byte,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        )
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Name> for Name {
    fn from(name: &Name) -> Self {
        name.clone()
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
