//! Decoded pixel buffers.
//!
//! Decoding lives outside the engine core; whatever decoder the application
//! uses hands its output over as an [`ImageData`], tightly packed RGBA8.

use thiserror::Error;

use crate::Color;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("expected {expected} bytes of RGBA8 data for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A tightly packed RGBA8 image, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    pub const BYTES_PER_PIXEL: usize = 4;

    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// A 1×1 image filled with `color`.
    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: color.to_rgba8().to_vec(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes per row of the packed buffer.
    #[inline]
    pub fn row_pitch(&self) -> u32 {
        self.width * Self::BYTES_PER_PIXEL as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffers() {
        let err = ImageData::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ImageError::SizeMismatch { width: 2, height: 2, expected: 16, actual: 15 }
        );
    }

    #[test]
    fn solid_is_single_texel() {
        let img = ImageData::solid(Color::RED);
        assert_eq!((img.width(), img.height()), (1, 1));
        assert_eq!(img.pixels(), &[255, 0, 0, 255]);
    }
}
