//! Error types for mip-chain compression.

use thiserror::Error;

use crate::codec::{CodecError, ErrorCode};
use crate::image::ImageError;
use crate::resample::ResampleError;

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Broad classification of a [`PipelineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any level was compressed.
    Configuration,
    /// A codec call failed mid-chain; the output buffer is invalid.
    Codec,
    /// Input, buffer or thread resources were unusable.
    Resource,
}

/// Errors returned by [`MipChainPipeline`](super::MipChainPipeline).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The codec refused the configuration during `config_init`.
    #[error("Codec configuration rejected: {0}")]
    Config(CodecError),

    #[error("Invalid pipeline setting: {0}")]
    InvalidSetting(String),

    /// Compression of one level failed and the chain was aborted.
    #[error("Level {level} ({width}×{height}) failed: {source}")]
    Codec {
        level: u32,
        width: u32,
        height: u32,
        #[source]
        source: CodecError,
    },

    #[error("Output buffer holds {available} bytes, chain needs {required}")]
    OutputTooSmall { required: usize, available: usize },

    #[error("Resampling to {width}×{height} failed: {source}")]
    Resample {
        width: u32,
        height: u32,
        #[source]
        source: ResampleError,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Config(_) | PipelineError::InvalidSetting(_) => {
                ErrorKind::Configuration
            }
            PipelineError::Codec { .. } => ErrorKind::Codec,
            PipelineError::OutputTooSmall { .. }
            | PipelineError::Resample { .. }
            | PipelineError::Image(_)
            | PipelineError::WorkerPool(_) => ErrorKind::Resource,
        }
    }

    /// Diagnostic code of the underlying codec error, if any.
    pub fn codec_code(&self) -> Option<ErrorCode> {
        match self {
            PipelineError::Config(err) | PipelineError::Codec { source: err, .. } => {
                Some(err.code())
            }
            _ => None,
        }
    }
}
