//! Basic geometric types for PDF
//!
//! All dimensions are in typographical points (1/72 inch) unless scaled by
//! one of the unit constants.

use crate::objects::Object;

/// One typographical point.
pub const PT: f64 = 1.0;
/// Points per inch.
pub const INCH: f64 = 72.0;
/// Points per centimetre.
pub const CM: f64 = 28.35;

pub const US_LETTER_WIDTH: f64 = 612.0;
pub const US_LETTER_HEIGHT: f64 = 792.0;

pub const A4_WIDTH: f64 = 595.0;
pub const A4_HEIGHT: f64 = 842.0;

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// A rectangle defined by two points. Written to a file as
/// `[ llx lly urx ury ]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub lower_left: Point,
    pub upper_right: Point,
}

impl Rectangle {
    pub fn new(lower_left: Point, upper_right: Point) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    /// Create a rectangle from position and size
    pub fn from_position_and_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            lower_left: Point::new(x, y),
            upper_right: Point::new(x + width, y + height),
        }
    }

    /// A `width` x `height` rectangle anchored at the origin, as used for
    /// media and crop boxes.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::from_position_and_size(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.upper_right.x - self.lower_left.x
    }

    pub fn height(&self) -> f64 {
        self.upper_right.y - self.lower_left.y
    }

    /// Shrinks the rectangle by `margin` on every side.
    pub fn inset(&self, margin: f64) -> Self {
        Self {
            lower_left: Point::new(self.lower_left.x + margin, self.lower_left.y + margin),
            upper_right: Point::new(self.upper_right.x - margin, self.upper_right.y - margin),
        }
    }
}

impl From<Rectangle> for Object {
    fn from(rect: Rectangle) -> Self {
        Object::Array(vec![
            Object::Real(rect.lower_left.x),
            Object::Real(rect.lower_left.y),
            Object::Real(rect.upper_right.x),
            Object::Real(rect.upper_right.y),
        ])
    }
}
