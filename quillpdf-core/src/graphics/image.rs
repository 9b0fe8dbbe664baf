//! Raster images for PDF generation
//!
//! Images are stored as uncompressed 8-bit samples and written as image
//! XObjects through the document's content filter. With the
//! `external-images` feature they can be built from any decoded
//! [`image::DynamicImage`].

use crate::objects::{Dictionary, Name};
use crate::{PdfError, Result};

/// Represents an image that can be embedded in a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Samples, row by row from the top, no padding
    data: Vec<u8>,
    width: u32,
    height: u32,
    color_space: ColorSpace,
}

/// Color spaces for images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
}

impl ColorSpace {
    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
        }
    }

    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

impl Image {
    /// Bits per colour component; every constructor produces 8-bit samples.
    pub const BITS_PER_COMPONENT: u8 = 8;

    /// Creates an image from packed RGB samples (3 bytes per pixel).
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, ColorSpace::DeviceRGB, data)
    }

    /// Creates an image from 8-bit grayscale samples.
    pub fn from_gray8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, ColorSpace::DeviceGray, data)
    }

    fn new(width: u32, height: u32, color_space: ColorSpace, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(color_space.components()))
            .ok_or_else(|| {
                PdfError::InvalidImage(format!("image of {width}x{height} is too large"))
            })?;
        if data.len() != expected {
            return Err(PdfError::InvalidImage(format!(
                "expected {expected} bytes of {} samples for {width}x{height}, got {}",
                color_space.pdf_name(),
                data.len()
            )));
        }

        Ok(Image {
            data,
            width,
            height,
            color_space,
        })
    }

    /// Get image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The keys of the image XObject stream dictionary. `Length` and
    /// `Filter` are added when the stream is written.
    pub(crate) fn stream_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::with_capacity(6);
        dict.set("Type", Name::new("XObject"));
        dict.set("Subtype", Name::new("Image"));
        dict.set("Width", self.width);
        dict.set("Height", self.height);
        dict.set("BitsPerComponent", i64::from(Self::BITS_PER_COMPONENT));
        dict.set("ColorSpace", Name::new(self.color_space.pdf_name()));
        dict
    }
}

#[cfg(feature = "external-images")]
impl Image {
    /// Converts a decoded image. Images without colour become `DeviceGray`,
    /// all others `DeviceRGB`; alpha is dropped and deeper samples are
    /// reduced to 8 bits.
    pub fn from_dynamic_image(decoded: &::image::DynamicImage) -> Result<Self> {
        let (width, height) = (decoded.width(), decoded.height());
        if decoded.color().has_color() {
            Self::from_rgb8(width, height, decoded.to_rgb8().into_raw())
        } else {
            Self::from_gray8(width, height, decoded.to_luma8().into_raw())
        }
    }

    /// Opens and decodes an image file.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = ::image::open(path)
            .map_err(|e| PdfError::InvalidImage(format!("{}: {e}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "image decoded"
        );
        Self::from_dynamic_image(&decoded)
    }
}
