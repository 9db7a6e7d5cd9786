//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to settings.

use std::str::FromStr;

use ini::{Ini, Properties};

use super::{ConfigFile, ConfigFileError};
use crate::codec::{BlockFootprint, BlockFormat, Profile, Quality, Swizzle};
use crate::pipeline::default_threads;
use crate::resample::Filter;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [texture] section
    if let Some(section) = ini.section(Some("texture")) {
        if let Some(format) = parse_value::<BlockFormat>(
            section,
            "texture",
            "format",
            "must be one of: bc1, bc3, bc7, astc",
        )? {
            config.format = format;
        }
        if let Some(block) = parse_value::<BlockFootprint>(
            section,
            "texture",
            "block",
            "expected format like '4x4' or '6x6x1'",
        )? {
            config.pipeline.codec.block = block;
        }
        if let Some(quality) = parse_value::<Quality>(
            section,
            "texture",
            "quality",
            "must be a preset (fastest, fast, medium, thorough, verythorough, exhaustive) \
             or a number from 0 to 100",
        )? {
            config.pipeline.codec.quality = quality;
        }
        if let Some(profile) = parse_value::<Profile>(
            section,
            "texture",
            "profile",
            "must be one of: ldr, ldr-srgb, hdr-rgb-ldr-a, hdr",
        )? {
            config.pipeline.codec.profile = profile;
        }
        if let Some(swizzle) = parse_value::<Swizzle>(
            section,
            "texture",
            "swizzle",
            "must be four characters from 'rgba01'",
        )? {
            config.pipeline.swizzle = swizzle;
        }
        if let Some(v) = section.get("normal_map") {
            config.pipeline.codec.flags.normal_map = parse_bool(v);
        }
        if let Some(v) = section.get("alpha_weight") {
            config.pipeline.codec.flags.use_alpha_weight = parse_bool(v);
        }
    }

    if !config.format.supports(config.pipeline.codec.block) {
        return Err(ConfigFileError::InvalidValue {
            section: "texture".to_string(),
            key: "block".to_string(),
            value: config.pipeline.codec.block.to_string(),
            reason: format!("not supported by {}", config.format),
        });
    }

    // [pipeline] section
    if let Some(section) = ini.section(Some("pipeline")) {
        if let Some(v) = section.get("threads") {
            let threads: usize = v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "pipeline".to_string(),
                key: "threads".to_string(),
                value: v.to_string(),
                reason: "must be a non-negative integer (0 = auto)".to_string(),
            })?;
            config.pipeline.threads = if threads == 0 {
                default_threads()
            } else {
                threads
            };
        }
        if let Some(v) = section.get("min_dimension") {
            config.pipeline.min_dimension = v
                .trim()
                .parse()
                .ok()
                .filter(|&min: &u32| min >= 1)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "pipeline".to_string(),
                    key: "min_dimension".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
        if let Some(filter) = parse_value::<Filter>(
            section,
            "pipeline",
            "filter",
            "must be one of: mitchell, catmull-rom, box",
        )? {
            config.pipeline.filter = filter;
        }
    }

    Ok(config)
}

/// Parse `key` with `FromStr` if present.
fn parse_value<T: FromStr>(
    section: &Properties,
    name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    section
        .get(key)
        .map(|v| {
            v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                section: name.to_string(),
                key: key.to_string(),
                value: v.to_string(),
                reason: reason.to_string(),
            })
        })
        .transpose()
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}
