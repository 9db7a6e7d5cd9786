//! Mip-chain compression pipeline.
//!
//! Takes one uncompressed image, builds a chain of successively halved
//! levels and block-compresses every level into a single packed buffer:
//!
//! ```text
//!   Image ──► PingPong ──► CompressionWorkload ──► WorkerPool (N workers)
//!                ▲                                      │
//!                │          resample to half size       │ BlockCodec::compress
//!                └──────────────────────────────────────┘ into level region
//!
//!   output: [ level 0 | level 1 | level 2 | ... ]   largest first, no gaps
//! ```
//!
//! Sizing is computed up front by [`plan_chain`], so the caller can size
//! the output buffer with [`MipChainPipeline::required_len`] before any
//! compression starts.

mod buffers;
mod chain;
mod config;
mod error;
mod sizing;
mod workload;

pub use buffers::PingPong;
pub use chain::{ChainReport, MipChainPipeline};
pub use config::{default_threads, PipelineConfig};
pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use sizing::{
    additional_levels, chain_footprint, level_footprint, mip_level_count, plan_chain, MipLevel,
};
pub use workload::{CompressionWorkload, ErrorSlot, WorkerPool};
