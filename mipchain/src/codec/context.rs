//! Codec context owned by one pipeline run.

use std::sync::atomic::{AtomicU64, Ordering};

use super::config::CodecConfig;

/// Configured codec state shared by every worker of a compression call.
///
/// The configuration and codec-specific `settings` are fixed at creation.
/// The encoded-block counter is per-level state and is cleared by
/// [`reset`](Self::reset) between levels.
pub struct CodecContext<S> {
    config: CodecConfig,
    settings: S,
    blocks_encoded: AtomicU64,
}

impl<S> CodecContext<S> {
    pub fn new(config: CodecConfig, settings: S) -> Self {
        Self {
            config,
            settings,
            blocks_encoded: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Count blocks written by a worker. Called concurrently.
    pub fn record_blocks(&self, count: u64) {
        self.blocks_encoded.fetch_add(count, Ordering::Relaxed);
    }

    /// Blocks recorded since the last reset.
    pub fn blocks_encoded(&self) -> u64 {
        self.blocks_encoded.load(Ordering::Acquire)
    }

    /// Clear per-level state, keeping the configuration.
    pub fn reset(&mut self) {
        *self.blocks_encoded.get_mut() = 0;
    }
}

impl<S> std::fmt::Debug for CodecContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecContext")
            .field("config", &self.config)
            .field("blocks_encoded", &self.blocks_encoded())
            .finish_non_exhaustive()
    }
}
