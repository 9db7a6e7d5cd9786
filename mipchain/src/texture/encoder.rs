//! TextureEncoder trait for abstracting texture encoding strategies.
//!
//! # Example
//!
//! ```
//! use mipchain::codec::BlockFormat;
//! use mipchain::texture::{MipChainEncoder, TextureEncoder};
//! use std::sync::Arc;
//!
//! let encoder: Arc<dyn TextureEncoder> = Arc::new(MipChainEncoder::new(BlockFormat::Bc1));
//!
//! assert_eq!(encoder.extension(), "bc1");
//! assert!(encoder.expected_size(4096, 4096) > 0);
//! ```

use crate::texture::TextureError;
use image::RgbaImage;
use std::sync::Arc;

/// Trait for texture encoding strategies.
///
/// Implementations must be thread-safe (`Send + Sync`) so one encoder can
/// serve many callers.
pub trait TextureEncoder: Send + Sync {
    /// Encode an RGBA image into the target texture format.
    ///
    /// # Errors
    ///
    /// Returns `TextureError` if:
    /// - Image dimensions are invalid for the format
    /// - Encoding/compression fails
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError>;

    /// Exact byte length `encode` returns for an image of this size.
    fn expected_size(&self, width: u32, height: u32) -> usize;

    /// File extension without the leading dot (e.g. "astc", "bc7").
    fn extension(&self) -> &str;

    /// Human-readable encoder name.
    fn name(&self) -> &str;
}

impl<T: TextureEncoder + ?Sized> TextureEncoder for Arc<T> {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
        (**self).encode(image)
    }

    fn expected_size(&self, width: u32, height: u32) -> usize {
        (**self).expected_size(width, height)
    }

    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
