//! Error types for block codecs.

use thiserror::Error;

use super::config::{BlockFootprint, Profile};

/// Errors reported by a [`BlockCodec`](super::BlockCodec).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The block footprint is not encodable by the codec.
    #[error("Block size {0} is invalid")]
    BadBlockSize(BlockFootprint),

    /// Search quality outside `0.0..=100.0`.
    #[error("Search quality {0} is outside 0..=100")]
    BadQuality(f32),

    /// The numeric mode (profile) is not supported.
    #[error("Profile {0} is not supported by this codec")]
    BadProfile(Profile),

    /// The output region does not match the blocks it must hold.
    #[error("Output region holds {actual} bytes, expected {expected}")]
    BadOutputSize { expected: usize, actual: usize },

    /// The codec encoded a different number of blocks than the level has.
    #[error("Encoded {actual} blocks, expected {expected}")]
    BlockCount { expected: u64, actual: u64 },

    /// Any other failure, with the codec's diagnostic text.
    #[error("Compression failed: {0}")]
    Failed(String),
}

/// Stable diagnostic code for a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadBlockSize,
    BadQuality,
    BadProfile,
    BadOutputSize,
    BlockCount,
    Failed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadBlockSize => "ERR_BAD_BLOCK_SIZE",
            ErrorCode::BadQuality => "ERR_BAD_QUALITY",
            ErrorCode::BadProfile => "ERR_BAD_PROFILE",
            ErrorCode::BadOutputSize => "ERR_BAD_OUTPUT_SIZE",
            ErrorCode::BlockCount => "ERR_BAD_BLOCK_COUNT",
            ErrorCode::Failed => "ERR_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CodecError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CodecError::BadBlockSize(_) => ErrorCode::BadBlockSize,
            CodecError::BadQuality(_) => ErrorCode::BadQuality,
            CodecError::BadProfile(_) => ErrorCode::BadProfile,
            CodecError::BadOutputSize { .. } => ErrorCode::BadOutputSize,
            CodecError::BlockCount { .. } => ErrorCode::BlockCount,
            CodecError::Failed(_) => ErrorCode::Failed,
        }
    }
}

/// Errors raised while parsing codec settings from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Block size '{0}' is invalid")]
    BlockSize(String),

    #[error("Search quality/preset '{0}' is invalid")]
    Quality(String),

    #[error("Swizzle '{0}' is invalid")]
    Swizzle(String),

    #[error("Profile '{0}' is invalid")]
    Profile(String),

    #[error("Block format '{0}' is invalid")]
    Format(String),
}
