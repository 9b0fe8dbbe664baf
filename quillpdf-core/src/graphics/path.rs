use crate::error::Result;
use crate::marshal::format_real;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    Rectangle(f64, f64, f64, f64),
    ClosePath,
}

/// A shape that can be painted on a canvas. The default value is an empty
/// path.
///
/// ```rust
/// use quillpdf::Path;
///
/// let path = Path::new().move_to(12.0, 34.0).line_to(-56.0, 78.0).close();
/// assert_eq!(
///     path.operators().unwrap(),
///     "12.00000 34.00000 m\n-56.00000 78.00000 l\nh\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new subpath at the given point.
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(x, y));
        self
    }

    /// Appends a line segment from the current point.
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo(x, y));
        self
    }

    /// Appends a cubic Bézier curve with control points `(x1, y1)` and
    /// `(x2, y2)` ending at `(x3, y3)`.
    pub fn curve_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> Self {
        self.commands
            .push(PathCommand::CurveTo(x1, y1, x2, y2, x3, y3));
        self
    }

    /// Appends a complete rectangle as its own subpath.
    pub fn rectangle(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.commands
            .push(PathCommand::Rectangle(x, y, width, height));
        self
    }

    /// Closes the current subpath with a line back to its start.
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::ClosePath);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The construction operators, one per line, without a painting operator.
    pub fn operators(&self) -> Result<String> {
        let mut out = String::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(x, y) => push_operator(&mut out, &[x, y], "m")?,
                PathCommand::LineTo(x, y) => push_operator(&mut out, &[x, y], "l")?,
                PathCommand::CurveTo(x1, y1, x2, y2, x3, y3) => {
                    push_operator(&mut out, &[x1, y1, x2, y2, x3, y3], "c")?
                }
                PathCommand::Rectangle(x, y, w, h) => {
                    push_operator(&mut out, &[x, y, w, h], "re")?
                }
                PathCommand::ClosePath => out.push_str("h\n"),
            }
        }
        Ok(out)
    }
}

fn push_operator(out: &mut String, operands: &[f64], operator: &str) -> Result<()> {
    for operand in operands {
        out.push_str(&format_real(*operand)?);
        out.push(' ');
    }
    out.push_str(operator);
    out.push('\n');
    Ok(())
}
