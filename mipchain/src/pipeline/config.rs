//! Pipeline configuration.

use crate::codec::{BlockFootprint, CodecConfig, CodecFlags, Profile, Quality, Swizzle};
use crate::resample::Filter;

/// Settings for one mip-chain run.
///
/// # Example
///
/// ```
/// use mipchain::codec::{BlockFootprint, Quality};
/// use mipchain::pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_block(BlockFootprint::new_2d(6, 6))
///     .with_quality(Quality::Thorough)
///     .with_threads(4);
///
/// assert_eq!(config.threads, 4);
/// assert_eq!(config.codec.block, BlockFootprint::new_2d(6, 6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub codec: CodecConfig,
    pub swizzle: Swizzle,
    /// Worker threads per level. Must be at least 1.
    pub threads: usize,
    /// Smallest larger-dimension a generated level may have.
    pub min_dimension: u32,
    pub filter: Filter,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            codec: CodecConfig::default(),
            swizzle: Swizzle::IDENTITY,
            threads: default_threads(),
            min_dimension: 1,
            filter: Filter::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(codec: CodecConfig) -> Self {
        Self {
            codec,
            ..Self::default()
        }
    }

    pub fn with_block(mut self, block: BlockFootprint) -> Self {
        self.codec.block = block;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.codec.quality = quality;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.codec.profile = profile;
        self
    }

    pub fn with_flags(mut self, flags: CodecFlags) -> Self {
        self.codec.flags = flags;
        self
    }

    pub fn with_swizzle(mut self, swizzle: Swizzle) -> Self {
        self.swizzle = swizzle;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_min_dimension(mut self, min_dimension: u32) -> Self {
        self.min_dimension = min_dimension;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Swizzle actually applied: normal maps without an explicit swizzle
    /// store X and Y as `rrrg`.
    pub fn effective_swizzle(&self) -> Swizzle {
        if self.codec.flags.normal_map && self.swizzle.is_identity() {
            Swizzle::NORMAL_MAP
        } else {
            self.swizzle
        }
    }
}

/// Number of worker threads used when none is configured.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
