use crate::error::Result;
use crate::marshal::format_fixed;

/// Decimals written for colour components.
pub const COLOR_PRECISION: usize = 2;

/// Represents a color in PDF documents.
///
/// Supports RGB, Grayscale, and CMYK color spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// RGB color (red, green, blue) with values from 0.0 to 1.0
    Rgb(f64, f64, f64),
    /// Grayscale color with value from 0.0 (black) to 1.0 (white)
    Gray(f64),
    /// CMYK color (cyan, magenta, yellow, key/black) with values from 0.0 to 1.0
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    /// Creates a CMYK color with values clamped to 0.0-1.0.
    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        Color::Cmyk(
            c.clamp(0.0, 1.0),
            m.clamp(0.0, 1.0),
            y.clamp(0.0, 1.0),
            k.clamp(0.0, 1.0),
        )
    }

    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    pub fn red() -> Self {
        Color::Rgb(1.0, 0.0, 0.0)
    }

    pub fn green() -> Self {
        Color::Rgb(0.0, 1.0, 0.0)
    }

    pub fn blue() -> Self {
        Color::Rgb(0.0, 0.0, 1.0)
    }

    /// The operator line setting this as the fill colour (`rg`, `g`, `k`).
    pub(crate) fn fill_operator(&self) -> Result<String> {
        let operator = match self {
            Color::Rgb(..) => "rg",
            Color::Gray(_) => "g",
            Color::Cmyk(..) => "k",
        };
        self.operator_line(operator)
    }

    /// The operator line setting this as the stroke colour (`RG`, `G`, `K`).
    pub(crate) fn stroke_operator(&self) -> Result<String> {
        let operator = match self {
            Color::Rgb(..) => "RG",
            Color::Gray(_) => "G",
            Color::Cmyk(..) => "K",
        };
        self.operator_line(operator)
    }

    fn operator_line(&self, operator: &str) -> Result<String> {
        let components = match *self {
            Color::Rgb(r, g, b) => vec![r, g, b],
            Color::Gray(v) => vec![v],
            Color::Cmyk(c, m, y, k) => vec![c, m, y, k],
        };
        let mut line = String::new();
        for component in components {
            line.push_str(&format_fixed(component, COLOR_PRECISION)?);
            line.push(' ');
        }
        line.push_str(operator);
        line.push('\n');
        Ok(line)
    }
}
