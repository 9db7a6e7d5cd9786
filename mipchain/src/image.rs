//! Uncompressed source images.
//!
//! An [`Image`] owns a tightly packed RGBA8 pixel buffer. The mip-chain
//! pipeline takes ownership of the base image and replaces its pixel buffer
//! in place each time it moves down one level.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use thiserror::Error;

/// Bytes per texel in every buffer handled by this crate.
pub const RGBA_CHANNELS: usize = 4;

/// Errors raised while building or decoding an [`Image`].
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Invalid image dimensions {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// An RGBA8 image with an owned pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    depth: u32,
    hdr: bool,
}

impl Image {
    /// Wrap a tightly packed RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Fails when either dimension is zero or the buffer length is not
    /// `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidDimensions { width, height });
        }

        let expected = buffer_len(width, height);
        if pixels.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width,
            height,
            depth: 1,
            hdr: false,
        })
    }

    /// Take ownership of an [`RgbaImage`] without copying its pixels.
    pub fn from_rgba_image(image: RgbaImage) -> Result<Self, ImageError> {
        let (width, height) = image.dimensions();
        Self::from_rgba8(width, height, image.into_raw())
    }

    /// Decode an image file and convert it to RGBA8.
    ///
    /// Floating point sources are flagged as HDR content; their texels are
    /// still quantised to 8 bits per channel.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let decoded = image::open(path.as_ref())?;
        let hdr = is_float_source(&decoded);
        Ok(Self::from_rgba_image(decoded.to_rgba8())?.with_hdr(hdr))
    }

    /// Mark the image as holding high dynamic range content.
    pub fn with_hdr(mut self, hdr: bool) -> Self {
        self.hdr = hdr;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Slice count. Always 1 for the 2-D textures this crate produces.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_hdr(&self) -> bool {
        self.hdr
    }

    /// Row pitch in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * RGBA_CHANNELS
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Texel at `(x, y)`, clamped to the image edge.
    pub fn texel_clamped(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let offset = y * self.stride() + x * RGBA_CHANNELS;
        let mut texel = [0u8; 4];
        texel.copy_from_slice(&self.pixels[offset..offset + RGBA_CHANNELS]);
        texel
    }

    /// Install a new pixel buffer for a `width × height` level and hand back
    /// the buffer it replaces.
    pub(crate) fn swap_pixels(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> Vec<u8> {
        debug_assert_eq!(pixels.len(), buffer_len(width, height));
        self.width = width;
        self.height = height;
        std::mem::replace(&mut self.pixels, pixels)
    }
}

/// Byte length of a packed RGBA8 buffer.
pub fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * RGBA_CHANNELS
}

fn is_float_source(image: &DynamicImage) -> bool {
    matches!(
        image,
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_valid() {
        let image = Image::from_rgba8(4, 2, vec![0; 32]).unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert_eq!(image.depth(), 1);
        assert_eq!(image.stride(), 16);
        assert!(!image.is_hdr());
    }

    #[test]
    fn test_from_rgba8_zero_dimensions() {
        let result = Image::from_rgba8(0, 4, Vec::new());
        assert!(matches!(
            result,
            Err(ImageError::InvalidDimensions {
                width: 0,
                height: 4
            })
        ));
    }

    #[test]
    fn test_from_rgba8_wrong_length() {
        let result = Image::from_rgba8(2, 2, vec![0; 15]);
        match result {
            Err(ImageError::BufferSize { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("Expected BufferSize error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_rgba_image_keeps_pixels() {
        let mut source = RgbaImage::new(3, 3);
        source.put_pixel(2, 1, image::Rgba([1, 2, 3, 4]));

        let image = Image::from_rgba_image(source).unwrap();
        assert_eq!(image.texel_clamped(2, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_texel_clamped_at_edges() {
        let mut source = RgbaImage::new(2, 2);
        source.put_pixel(1, 1, image::Rgba([9, 9, 9, 9]));
        let image = Image::from_rgba_image(source).unwrap();

        assert_eq!(image.texel_clamped(5, 7), [9, 9, 9, 9]);
    }

    #[test]
    fn test_swap_pixels_returns_previous_buffer() {
        let mut image = Image::from_rgba8(2, 2, vec![7; 16]).unwrap();
        let previous = image.swap_pixels(vec![1; 4], 1, 1);

        assert_eq!(previous, vec![7; 16]);
        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 1);
        assert_eq!(image.pixels(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_open_png_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("source.png");
        RgbaImage::from_pixel(8, 4, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let image = Image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));
        assert_eq!(image.texel_clamped(0, 0), [10, 20, 30, 255]);
        assert!(!image.is_hdr());
    }

    #[test]
    fn test_open_missing_file() {
        let result = Image::open("/nonexistent/texture.png");
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }
}
