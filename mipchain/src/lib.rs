//! Mipchain - mip-chain generation and parallel block compression.
//!
//! Takes a single uncompressed image, builds a chain of reduced-size levels
//! by repeated half-size resampling and block-compresses every level into
//! one packed, GPU-ready byte stream using a pool of worker threads.
//!
//! # Modules
//!
//! - [`codec`] - the [`BlockCodec`](codec::BlockCodec) seam and the
//!   built-in BC1/BC3/BC7/ASTC backend
//! - [`resample`] - cubic and box resampling between levels
//! - [`pipeline`] - sizing, worker pool and the chain driver
//! - [`texture`] - `TextureEncoder` seam over `image::RgbaImage`
//! - [`config`] - INI configuration
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use mipchain::codec::BlockFormat;
//! use mipchain::pipeline::PipelineConfig;
//!
//! let config = PipelineConfig::default();
//! let data = mipchain::compress_file_to_vec("albedo.png", BlockFormat::Astc, &config)?;
//! println!("{} bytes", data.len());
//! # Ok::<(), mipchain::pipeline::PipelineError>(())
//! ```

use std::path::Path;

pub mod codec;
pub mod config;
pub mod image;
pub mod logging;
pub mod pipeline;
pub mod resample;
pub mod texture;

use crate::codec::{BlockFormat, IntelCodec};
use crate::image::Image;
use crate::pipeline::{MipChainPipeline, PipelineConfig, PipelineResult};

/// Decode `path` and compress its mip chain into `output`.
///
/// Returns the number of bytes written from the start of `output`.
pub fn compress_file(
    path: impl AsRef<Path>,
    output: &mut [u8],
    format: BlockFormat,
    config: &PipelineConfig,
) -> PipelineResult<u64> {
    let image = Image::open(path)?;
    MipChainPipeline::new(IntelCodec::new(format), *config).compress(image, output)
}

/// Decode `path` and return its compressed mip chain.
pub fn compress_file_to_vec(
    path: impl AsRef<Path>,
    format: BlockFormat,
    config: &PipelineConfig,
) -> PipelineResult<Vec<u8>> {
    let pipeline = MipChainPipeline::new(IntelCodec::new(format), *config);
    pipeline.validate()?;
    let image = Image::open(path)?;

    let mut output = vec![0u8; pipeline.required_len(image.width(), image.height())];
    let report = pipeline.run(image, &mut output)?;
    output.truncate(report.total_bytes);
    Ok(output)
}
