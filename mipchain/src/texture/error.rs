//! Error types for texture encoding operations.

use std::fmt;

use crate::codec::CodecError;
use crate::image::ImageError;
use crate::pipeline::PipelineError;

/// Errors that can occur during texture encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Image dimensions are invalid for encoding.
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },
    /// Encoding operation failed.
    EncodingFailed(String),
    /// Unsupported texture format or feature.
    UnsupportedFormat(String),
    /// Invalid configuration.
    InvalidConfig(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Invalid dimensions {}×{}: {}", width, height, reason)
            }
            TextureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            TextureError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
            TextureError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for TextureError {}

impl From<PipelineError> for TextureError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Config(CodecError::BadProfile(profile)) => {
                TextureError::UnsupportedFormat(format!("profile {}", profile))
            }
            PipelineError::Config(CodecError::BadBlockSize(block)) => {
                TextureError::UnsupportedFormat(format!("block size {}", block))
            }
            PipelineError::Config(source) => TextureError::InvalidConfig(source.to_string()),
            PipelineError::InvalidSetting(msg) => TextureError::InvalidConfig(msg),
            PipelineError::Image(ImageError::InvalidDimensions { width, height }) => {
                TextureError::InvalidDimensions {
                    width,
                    height,
                    reason: "Both dimensions must be non-zero".to_string(),
                }
            }
            other => TextureError::EncodingFailed(other.to_string()),
        }
    }
}
