//! The mip-chain driver.

use tracing::{debug, info, warn};

use super::buffers::PingPong;
use super::config::PipelineConfig;
use super::error::{PipelineError, PipelineResult};
use super::sizing::{plan_chain, MipLevel};
use super::workload::{CompressionWorkload, WorkerPool};
use crate::codec::{BlockCodec, CodecError};
use crate::image::Image;
use crate::resample::{CubicResampler, EdgeMode, Resampler};

/// Layout of a compressed chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    /// Levels in the order they were written, base first.
    pub levels: Vec<MipLevel>,
    /// Bytes written from the start of the output buffer.
    pub total_bytes: usize,
}

impl ChainReport {
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// Compresses an image and its reduced-size levels into one packed buffer.
///
/// Levels are written largest first with no gaps. Each level is compressed
/// on the worker pool and then resampled to half size for the next one.
/// The first failing level aborts the chain; bytes already written are not
/// a valid result.
///
/// # Example
///
/// ```
/// use mipchain::codec::{BlockFormat, IntelCodec};
/// use mipchain::image::Image;
/// use mipchain::pipeline::{MipChainPipeline, PipelineConfig};
///
/// let pipeline = MipChainPipeline::new(
///     IntelCodec::new(BlockFormat::Astc),
///     PipelineConfig::default().with_threads(2),
/// );
/// let image = Image::from_rgba8(64, 64, vec![128; 64 * 64 * 4]).unwrap();
///
/// let mut output = vec![0u8; pipeline.required_len(64, 64)];
/// let report = pipeline.run(image, &mut output).unwrap();
///
/// assert_eq!(report.level_count(), 3);
/// assert_eq!(report.total_bytes, 4096 + 1024 + 256);
/// ```
pub struct MipChainPipeline<C: BlockCodec, R: Resampler = CubicResampler> {
    codec: C,
    resampler: R,
    config: PipelineConfig,
}

impl<C: BlockCodec> MipChainPipeline<C> {
    pub fn new(codec: C, config: PipelineConfig) -> Self {
        Self::with_resampler(codec, CubicResampler::new(), config)
    }
}

impl<C: BlockCodec, R: Resampler> MipChainPipeline<C, R> {
    pub fn with_resampler(codec: C, resampler: R, config: PipelineConfig) -> Self {
        Self {
            codec,
            resampler,
            config,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Check the codec configuration without touching any image data.
    ///
    /// [`run`](Self::run) performs the same check first; callers that size
    /// buffers up front use this to fail before allocating.
    pub fn validate(&self) -> PipelineResult<()> {
        self.codec
            .config_init(self.config.codec)
            .map(drop)
            .map_err(PipelineError::Config)
    }

    /// Levels that [`run`](Self::run) would write for a base image.
    ///
    /// An empty block footprint plans zero-length levels.
    pub fn plan(&self, width: u32, height: u32) -> Vec<MipLevel> {
        plan_chain(
            width,
            height,
            1,
            self.config.codec.block,
            self.codec.block_bytes(),
            self.config.min_dimension,
        )
    }

    /// Minimum output buffer length for a base image.
    pub fn required_len(&self, width: u32, height: u32) -> usize {
        self.plan(width, height)
            .last()
            .map(MipLevel::end)
            .unwrap_or(0)
    }

    /// Compress `image` and its mip levels into `output`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Config`] when the codec rejects the configuration
    ///   or the image needs a profile the configuration does not allow.
    ///   Nothing is written.
    /// - [`PipelineError::OutputTooSmall`] when `output` cannot hold the
    ///   chain. Nothing is written.
    /// - [`PipelineError::Codec`] when any worker fails on a level. Later
    ///   levels are not attempted.
    pub fn run(&self, image: Image, output: &mut [u8]) -> PipelineResult<ChainReport> {
        let codec_config = self.config.codec;
        let mut context = self
            .codec
            .config_init(codec_config)
            .map_err(PipelineError::Config)?;

        if image.is_hdr() && !codec_config.profile.is_hdr() {
            return Err(PipelineError::Config(CodecError::BadProfile(
                codec_config.profile,
            )));
        }

        let levels = plan_chain(
            image.width(),
            image.height(),
            image.depth(),
            codec_config.block,
            self.codec.block_bytes(),
            self.config.min_dimension,
        );
        let total_bytes = levels.last().map(MipLevel::end).unwrap_or(0);
        if output.len() < total_bytes {
            return Err(PipelineError::OutputTooSmall {
                required: total_bytes,
                available: output.len(),
            });
        }

        let pool = WorkerPool::new(self.config.threads)?;
        let swizzle = self.config.effective_swizzle();

        info!(
            codec = self.codec.name(),
            width = image.width(),
            height = image.height(),
            block = %codec_config.block,
            quality = %codec_config.quality,
            levels = levels.len(),
            threads = pool.threads(),
            total_bytes,
            "Compressing mip chain"
        );

        let mut buffers = PingPong::new(image);
        let mut remaining = &mut output[..total_bytes];

        for (position, level) in levels.iter().enumerate() {
            let (region, rest) = std::mem::take(&mut remaining).split_at_mut(level.len);
            remaining = rest;

            let workload = CompressionWorkload::new(
                &self.codec,
                &context,
                buffers.current(),
                swizzle,
                region,
            );

            debug!(
                level = level.index,
                width = level.width,
                height = level.height,
                offset = level.offset,
                bytes = workload.capacity(),
                "Compressing level"
            );

            let result = workload.run(&pool).and_then(|()| match context.blocks_encoded() {
                actual if actual == level.blocks => Ok(()),
                actual => Err(CodecError::BlockCount {
                    expected: level.blocks,
                    actual,
                }),
            });

            if let Err(source) = result {
                warn!(
                    level = level.index,
                    width = level.width,
                    height = level.height,
                    code = %source.code(),
                    error = %source,
                    "Aborting mip chain"
                );
                return Err(PipelineError::Codec {
                    level: level.index,
                    width: level.width,
                    height: level.height,
                    source,
                });
            }

            self.codec.reset(&mut context);

            if let Some(next) = levels.get(position + 1) {
                buffers
                    .advance(
                        &self.resampler,
                        EdgeMode::Clamp,
                        self.config.filter,
                        next.width,
                        next.height,
                    )
                    .map_err(|source| PipelineError::Resample {
                        width: next.width,
                        height: next.height,
                        source,
                    })?;
            }
        }

        info!(total_bytes, "Mip chain compressed");

        Ok(ChainReport {
            levels,
            total_bytes,
        })
    }

    /// Like [`run`](Self::run), returning only the number of bytes written.
    pub fn compress(&self, image: Image, output: &mut [u8]) -> PipelineResult<u64> {
        self.run(image, output)
            .map(|report| report.total_bytes as u64)
    }
}

impl<C: BlockCodec + std::fmt::Debug, R: Resampler> std::fmt::Debug for MipChainPipeline<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MipChainPipeline")
            .field("codec", &self.codec)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
