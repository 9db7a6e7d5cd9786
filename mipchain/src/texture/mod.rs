//! Texture encoding abstractions.
//!
//! The [`TextureEncoder`] trait is the high-level seam for callers that hold
//! an `image::RgbaImage` and want a finished byte stream back without
//! managing output buffers themselves.
//!
//! ```text
//! ┌─────────────────────┐
//! │       Caller        │
//! │                     │
//! │ Arc<dyn TextureEncoder>
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  TextureEncoder     │ (trait)
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   MipChainEncoder   │──► MipChainPipeline<IntelCodec>
//! └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use mipchain::codec::BlockFormat;
//! use mipchain::texture::{MipChainEncoder, TextureEncoder};
//! use image::RgbaImage;
//!
//! let encoder = MipChainEncoder::new(BlockFormat::Bc1);
//! let data = encoder.encode(&RgbaImage::new(16, 16)).unwrap();
//!
//! assert_eq!(data.len(), encoder.expected_size(16, 16));
//! ```

mod encoder;
mod error;
mod mipchain;

pub use encoder::TextureEncoder;
pub use error::TextureError;
pub use mipchain::MipChainEncoder;
