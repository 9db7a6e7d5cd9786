//! Block codec backed by the ISPC texture compressor (`intel_tex_2`).
//!
//! Supports BC1, BC3 and BC7 (4×4 blocks) and LDR ASTC with footprints from
//! 4×4 up to 8×8. Each worker encodes its block rows one strip at a time: a
//! strip is one block row of texels, swizzled and padded by edge clamping to
//! a whole number of blocks.

use std::fmt;
use std::str::FromStr;

use intel_tex_2::{astc, bc1, bc3, bc7, RgbaSurface};

use super::{
    BlockCodec, BlockFootprint, BlockRows, CodecConfig, CodecContext, CodecError, ParseError,
    Swizzle,
};
use crate::image::{Image, RGBA_CHANNELS};

/// Compressed block format produced by [`IntelCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFormat {
    /// BC1/DXT1 - RGB with 1-bit alpha, 8 bytes per block.
    Bc1,
    /// BC3/DXT5 - RGBA, 16 bytes per block.
    Bc3,
    /// BC7 - high quality RGBA, 16 bytes per block.
    Bc7,
    /// ASTC LDR - 16 bytes per block, variable footprint.
    Astc,
}

impl BlockFormat {
    pub fn block_bytes(&self) -> usize {
        match self {
            BlockFormat::Bc1 => 8,
            BlockFormat::Bc3 | BlockFormat::Bc7 | BlockFormat::Astc => 16,
        }
    }

    /// File extension conventionally used for a raw stream of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            BlockFormat::Bc1 => "bc1",
            BlockFormat::Bc3 => "bc3",
            BlockFormat::Bc7 => "bc7",
            BlockFormat::Astc => "astc",
        }
    }

    /// Whether `block` is encodable in this format.
    pub fn supports(&self, block: BlockFootprint) -> bool {
        match self {
            BlockFormat::Bc1 | BlockFormat::Bc3 | BlockFormat::Bc7 => {
                block == BlockFootprint::FOUR_BY_FOUR
            }
            BlockFormat::Astc => {
                block.is_2d() && (4..=8).contains(&block.x) && (4..=block.x).contains(&block.y)
            }
        }
    }
}

impl fmt::Display for BlockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockFormat::Bc1 => "BC1",
            BlockFormat::Bc3 => "BC3",
            BlockFormat::Bc7 => "BC7",
            BlockFormat::Astc => "ASTC",
        };
        f.write_str(name)
    }
}

impl FromStr for BlockFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bc1" | "dxt1" => Ok(BlockFormat::Bc1),
            "bc3" | "dxt5" => Ok(BlockFormat::Bc3),
            "bc7" => Ok(BlockFormat::Bc7),
            "astc" => Ok(BlockFormat::Astc),
            _ => Err(ParseError::Format(s.to_string())),
        }
    }
}

/// Encoder settings resolved once per chain.
pub enum IntelSettings {
    Bc1,
    Bc3,
    Bc7(bc7::EncodeSettings),
    Astc(astc::EncodeSettings),
}

/// [`BlockCodec`] implementation using `intel_tex_2`.
#[derive(Debug, Clone)]
pub struct IntelCodec {
    format: BlockFormat,
    name: String,
}

impl IntelCodec {
    pub fn new(format: BlockFormat) -> Self {
        Self {
            format,
            name: format!("ISPC {}", format),
        }
    }

    pub fn format(&self) -> BlockFormat {
        self.format
    }

    fn bc7_settings(config: &CodecConfig) -> bc7::EncodeSettings {
        let quality = config.quality.value();
        match (config.flags.use_alpha_weight, quality) {
            (false, q) if q < 10.0 => bc7::opaque_ultra_fast_settings(),
            (false, q) if q < 60.0 => bc7::opaque_very_fast_settings(),
            (false, q) if q < 98.0 => bc7::opaque_fast_settings(),
            (false, q) if q < 99.0 => bc7::opaque_basic_settings(),
            (false, _) => bc7::opaque_slow_settings(),
            (true, q) if q < 10.0 => bc7::alpha_ultra_fast_settings(),
            (true, q) if q < 60.0 => bc7::alpha_very_fast_settings(),
            (true, q) if q < 98.0 => bc7::alpha_fast_settings(),
            (true, q) if q < 99.0 => bc7::alpha_basic_settings(),
            (true, _) => bc7::alpha_slow_settings(),
        }
    }

    fn astc_settings(config: &CodecConfig) -> astc::EncodeSettings {
        let (width, height) = (config.block.x, config.block.y);
        if config.quality.value() >= 98.0 {
            astc::alpha_slow_settings(width, height)
        } else if config.flags.use_alpha_weight {
            astc::alpha_fast_settings(width, height)
        } else {
            astc::opaque_fast_settings(width, height)
        }
    }
}

impl BlockCodec for IntelCodec {
    type Settings = IntelSettings;

    fn name(&self) -> &str {
        &self.name
    }

    fn block_bytes(&self) -> usize {
        self.format.block_bytes()
    }

    fn config_init(&self, config: CodecConfig) -> Result<CodecContext<IntelSettings>, CodecError> {
        config.validate()?;

        if config.profile.is_hdr() {
            return Err(CodecError::BadProfile(config.profile));
        }
        if !self.format.supports(config.block) {
            return Err(CodecError::BadBlockSize(config.block));
        }

        let settings = match self.format {
            BlockFormat::Bc1 => IntelSettings::Bc1,
            BlockFormat::Bc3 => IntelSettings::Bc3,
            BlockFormat::Bc7 => IntelSettings::Bc7(Self::bc7_settings(&config)),
            BlockFormat::Astc => IntelSettings::Astc(Self::astc_settings(&config)),
        };

        Ok(CodecContext::new(config, settings))
    }

    fn compress(
        &self,
        context: &CodecContext<IntelSettings>,
        image: &Image,
        swizzle: &Swizzle,
        rows: &mut BlockRows<'_>,
        _worker_index: usize,
    ) -> Result<(), CodecError> {
        if image.depth() != 1 {
            return Err(CodecError::Failed(format!(
                "{} cannot encode {} slices",
                self.name,
                image.depth()
            )));
        }

        let block = context.config().block;
        let (blocks_x, _, _) = block.blocks_for(image.width(), image.height(), 1);
        let row_bytes = blocks_x as usize * self.block_bytes();
        let mut strip = Vec::new();

        for row in rows.iter_mut() {
            if row.data.len() != row_bytes {
                return Err(CodecError::BadOutputSize {
                    expected: row_bytes,
                    actual: row.data.len(),
                });
            }

            fill_strip(&mut strip, image, swizzle, block, blocks_x, row.index);
            let surface = RgbaSurface {
                data: &strip,
                width: blocks_x * block.x,
                height: block.y,
                stride: blocks_x * block.x * RGBA_CHANNELS as u32,
            };

            match context.settings() {
                IntelSettings::Bc1 => bc1::compress_blocks_into(&surface, row.data),
                IntelSettings::Bc3 => bc3::compress_blocks_into(&surface, row.data),
                IntelSettings::Bc7(settings) => {
                    bc7::compress_blocks_into(settings, &surface, row.data)
                }
                IntelSettings::Astc(settings) => {
                    astc::compress_blocks_into(settings, &surface, row.data)
                }
            }

            context.record_blocks(u64::from(blocks_x));
        }

        Ok(())
    }
}

/// Gather one block row of texels into `strip`, applying the swizzle and
/// clamping reads past the right and bottom edges.
fn fill_strip(
    strip: &mut Vec<u8>,
    image: &Image,
    swizzle: &Swizzle,
    block: BlockFootprint,
    blocks_x: u32,
    row: u32,
) {
    let padded_width = blocks_x * block.x;
    strip.clear();
    strip.reserve(padded_width as usize * block.y as usize * RGBA_CHANNELS);

    for line in 0..block.y {
        let y = row * block.y + line;
        for x in 0..padded_width {
            strip.extend_from_slice(&swizzle.apply(image.texel_clamped(x, y)));
        }
    }
}
