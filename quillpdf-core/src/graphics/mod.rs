//! Drawing primitives: paths, colours and raster images.

mod color;
mod image;
mod path;

pub use color::{Color, COLOR_PRECISION};
pub use image::{ColorSpace as ImageColorSpace, Image};
pub use path::{Path, PathCommand};
