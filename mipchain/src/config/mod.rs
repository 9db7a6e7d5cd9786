//! INI configuration for mip-chain compression.
//!
//! A config file selects the block format and every [`PipelineConfig`]
//! setting. Missing keys keep their defaults.
//!
//! ```ini
//! [texture]
//! format = astc
//! block = 6x6
//! quality = thorough
//! profile = ldr-srgb
//! swizzle = rgba
//! normal_map = false
//! alpha_weight = true
//!
//! [pipeline]
//! ; 0 = one worker per CPU
//! threads = 0
//! min_dimension = 1
//! filter = mitchell
//! ```

mod parser;

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::codec::{BlockFormat, IntelCodec};
use crate::pipeline::{MipChainPipeline, PipelineConfig};
use crate::texture::MipChainEncoder;

pub use parser::parse_ini;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings loaded from a config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub format: BlockFormat,
    pub pipeline: PipelineConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            format: BlockFormat::Astc,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.mipchain/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(content).map_err(ini::Error::Parse)?;
        parse_ini(&ini)
    }

    /// Pipeline driving the built-in codec with these settings.
    pub fn pipeline(&self) -> MipChainPipeline<IntelCodec> {
        MipChainPipeline::new(IntelCodec::new(self.format), self.pipeline)
    }

    /// Texture encoder with these settings.
    pub fn encoder(&self) -> MipChainEncoder {
        MipChainEncoder::new(self.format).with_config(self.pipeline)
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigFile, ConfigFileError> {
    ConfigFile::load_from(path.as_ref())
}

/// Get the path to the config directory (~/.mipchain).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mipchain")
}

/// Get the path to the config file (~/.mipchain/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
