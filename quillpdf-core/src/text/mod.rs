//! Text objects for page content streams.

mod font;

pub use font::StandardFont;

use crate::error::Result;
use crate::marshal::{format_real, quote};
use indexmap::IndexSet;

#[derive(Debug, Clone, PartialEq)]
enum TextOperation {
    SetFont(StandardFont, f64),
    SetLeading(f64),
    NextLine,
    NextLineOffset(f64, f64),
    Show(String),
}

/// A sequence of text operators, painted between `BT` and `ET` by
/// [`Canvas::draw_text`](crate::Canvas::draw_text).
///
/// ```rust
/// use quillpdf::{StandardFont, Text};
///
/// let mut text = Text::new();
/// text.set_font(StandardFont::Helvetica, 12.0)
///     .set_leading(14.0)
///     .show("Hello, World!")
///     .next_line()
///     .show("Second line");
/// assert_eq!(text.fonts().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    operations: Vec<TextOperation>,
    fonts: IndexSet<StandardFont>,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a font and size (`Tf`).
    pub fn set_font(&mut self, font: StandardFont, size: f64) -> &mut Self {
        self.fonts.insert(font);
        self.operations.push(TextOperation::SetFont(font, size));
        self
    }

    /// Sets the distance between baselines (`TL`).
    pub fn set_leading(&mut self, leading: f64) -> &mut Self {
        self.operations.push(TextOperation::SetLeading(leading));
        self
    }

    /// Moves to the start of the next line (`T*`).
    pub fn next_line(&mut self) -> &mut Self {
        self.operations.push(TextOperation::NextLine);
        self
    }

    /// Moves to the next line, offset from the start of the current one (`Td`).
    pub fn next_line_offset(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.operations.push(TextOperation::NextLineOffset(tx, ty));
        self
    }

    /// Shows a string (`Tj`).
    pub fn show(&mut self, s: impl Into<String>) -> &mut Self {
        self.operations.push(TextOperation::Show(s.into()));
        self
    }

    /// Fonts selected by this text, in first-use order.
    pub fn fonts(&self) -> impl Iterator<Item = StandardFont> + '_ {
        self.fonts.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The operators, one per line, without the enclosing `BT`/`ET`.
    pub fn operators(&self) -> Result<String> {
        let mut out = String::new();
        for operation in &self.operations {
            match operation {
                TextOperation::SetFont(font, size) => {
                    out.push_str(&font.pdf_name().to_pdf_syntax());
                    out.push(' ');
                    out.push_str(&format_real(*size)?);
                    out.push_str(" Tf\n");
                }
                TextOperation::SetLeading(leading) => {
                    out.push_str(&format_real(*leading)?);
                    out.push_str(" TL\n");
                }
                TextOperation::NextLine => out.push_str("T*\n"),
                TextOperation::NextLineOffset(tx, ty) => {
                    out.push_str(&format!("{} {} Td\n", format_real(*tx)?, format_real(*ty)?));
                }
                TextOperation::Show(s) => {
                    out.push_str(&quote(s));
                    out.push_str(" Tj\n");
                }
            }
        }
        Ok(out)
    }
}
