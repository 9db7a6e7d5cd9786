//! Block codec abstraction.
//!
//! A [`BlockCodec`] turns an RGBA8 image into fixed-size compressed blocks.
//! The pipeline never depends on a concrete encoder; it drives any codec
//! through this trait:
//!
//! ```text
//! ┌─────────────────────┐
//! │  MipChainPipeline   │
//! └──────────┬──────────┘
//!            │ config_init / compress / reset
//!            ▼
//! ┌─────────────────────┐
//! │     BlockCodec      │ (trait)
//! └──────────┬──────────┘
//!            │
//!       ┌────┴─────┐
//!       ▼          ▼
//! ┌──────────┐ ┌──────────┐
//! │IntelCodec│ │  Other   │
//! │BC / ASTC │ │ backends │
//! └──────────┘ └──────────┘
//! ```
//!
//! # Work partitioning
//!
//! A level's output region is cut into block rows. The codec decides which
//! worker owns each row through [`BlockCodec::row_owner`]; every worker then
//! receives exactly its rows as disjoint mutable slices, so workers never
//! coordinate with each other.

mod config;
mod context;
mod error;
mod intel;
mod rows;
mod swizzle;

pub use config::{BlockFootprint, CodecConfig, CodecFlags, Profile, Quality};
pub use context::CodecContext;
pub use error::{CodecError, ErrorCode, ParseError};
pub use intel::{BlockFormat, IntelCodec, IntelSettings};
pub use rows::{BlockRow, BlockRows};
pub use swizzle::{Channel, Swizzle};

use crate::image::Image;

/// A fixed-ratio block encoder.
///
/// Implementations must be thread-safe: `compress` is called concurrently
/// from every worker of a level with the same context.
pub trait BlockCodec: Send + Sync {
    /// Codec-specific state derived once from the configuration.
    type Settings: Send + Sync;

    /// Human-readable codec name.
    fn name(&self) -> &str;

    /// Size in bytes of one compressed block.
    fn block_bytes(&self) -> usize;

    /// Validate the configuration and build a context for a whole chain.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when the block size, quality or profile
    /// cannot be encoded.
    fn config_init(&self, config: CodecConfig)
        -> Result<CodecContext<Self::Settings>, CodecError>;

    /// Compress the block rows assigned to `worker_index`.
    ///
    /// Each row's `data` must be filled completely. Implementations report
    /// the blocks they encoded through [`CodecContext::record_blocks`].
    fn compress(
        &self,
        context: &CodecContext<Self::Settings>,
        image: &Image,
        swizzle: &Swizzle,
        rows: &mut BlockRows<'_>,
        worker_index: usize,
    ) -> Result<(), CodecError>;

    /// Worker that encodes block row `row`. Interleaves rows by default.
    fn row_owner(&self, row: u32, worker_count: usize) -> usize {
        row as usize % worker_count
    }

    /// Clear per-level state before the next compression call.
    fn reset(&self, context: &mut CodecContext<Self::Settings>) {
        context.reset();
    }
}
