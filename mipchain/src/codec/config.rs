//! Codec configuration: block footprint, search quality, profile and flags.

use std::fmt;
use std::str::FromStr;

use super::error::{CodecError, ParseError};

/// Texel dimensions of one compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockFootprint {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl BlockFootprint {
    /// Common 4×4 footprint shared by BC formats and ASTC 4×4.
    pub const FOUR_BY_FOUR: BlockFootprint = BlockFootprint::new_2d(4, 4);

    /// A 2-D footprint (depth fixed at 1).
    pub const fn new_2d(x: u32, y: u32) -> Self {
        Self { x, y, z: 1 }
    }

    pub const fn new_3d(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    pub fn is_2d(&self) -> bool {
        self.z == 1
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }

    /// Block counts along each axis for an extent, rounding up.
    ///
    /// An empty footprint covers no blocks.
    pub fn blocks_for(&self, width: u32, height: u32, depth: u32) -> (u32, u32, u32) {
        if self.is_empty() {
            return (0, 0, 0);
        }
        (
            width.div_ceil(self.x),
            height.div_ceil(self.y),
            depth.div_ceil(self.z),
        )
    }
}

impl fmt::Display for BlockFootprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_2d() {
            write!(f, "{}x{}", self.x, self.y)
        } else {
            write!(f, "{}x{}x{}", self.x, self.y, self.z)
        }
    }
}

impl FromStr for BlockFootprint {
    type Err = ParseError;

    /// Parse `"WxH"` or `"WxHxD"` with nothing trailing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::BlockSize(s.to_string());

        let parts = s
            .split('x')
            .map(|part| part.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [x, y] => Ok(Self::new_2d(*x, *y)),
            [x, y, z] => Ok(Self::new_3d(*x, *y, *z)),
            _ => Err(invalid()),
        }
    }
}

/// Search effort of the block encoder.
///
/// Presets map to the numeric scale `0.0..=100.0`; higher values trade
/// encode time for quality.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Quality {
    Fastest,
    Fast,
    #[default]
    Medium,
    Thorough,
    VeryThorough,
    Exhaustive,
    Custom(f32),
}

impl Quality {
    pub fn value(&self) -> f32 {
        match self {
            Quality::Fastest => 0.0,
            Quality::Fast => 10.0,
            Quality::Medium => 60.0,
            Quality::Thorough => 98.0,
            Quality::VeryThorough => 99.0,
            Quality::Exhaustive => 100.0,
            Quality::Custom(value) => *value,
        }
    }

    pub fn is_valid(&self) -> bool {
        (0.0..=100.0).contains(&self.value())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Fastest => f.write_str("fastest"),
            Quality::Fast => f.write_str("fast"),
            Quality::Medium => f.write_str("medium"),
            Quality::Thorough => f.write_str("thorough"),
            Quality::VeryThorough => f.write_str("verythorough"),
            Quality::Exhaustive => f.write_str("exhaustive"),
            Quality::Custom(value) => write!(f, "{}", value),
        }
    }
}

impl FromStr for Quality {
    type Err = ParseError;

    /// Accepts preset names, optionally with a leading `-`, or a number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix('-').unwrap_or(s);
        match name.to_ascii_lowercase().as_str() {
            "fastest" => Ok(Quality::Fastest),
            "fast" => Ok(Quality::Fast),
            "medium" => Ok(Quality::Medium),
            "thorough" => Ok(Quality::Thorough),
            "verythorough" => Ok(Quality::VeryThorough),
            "exhaustive" => Ok(Quality::Exhaustive),
            _ => s
                .parse::<f32>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Quality::Custom)
                .ok_or_else(|| ParseError::Quality(s.to_string())),
        }
    }
}

/// Numeric mode of the compressed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Profile {
    #[default]
    Ldr,
    LdrSrgb,
    HdrRgbLdrAlpha,
    Hdr,
}

impl Profile {
    pub fn is_hdr(&self) -> bool {
        matches!(self, Profile::HdrRgbLdrAlpha | Profile::Hdr)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::Ldr => "ldr",
            Profile::LdrSrgb => "ldr-srgb",
            Profile::HdrRgbLdrAlpha => "hdr-rgb-ldr-a",
            Profile::Hdr => "hdr",
        };
        f.write_str(name)
    }
}

impl FromStr for Profile {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ldr" => Ok(Profile::Ldr),
            "ldr-srgb" | "srgb" => Ok(Profile::LdrSrgb),
            "hdr-rgb-ldr-a" => Ok(Profile::HdrRgbLdrAlpha),
            "hdr" => Ok(Profile::Hdr),
            _ => Err(ParseError::Profile(s.to_string())),
        }
    }
}

/// Encoder hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecFlags {
    /// Weight color error by alpha; selects alpha-aware encoder settings.
    pub use_alpha_weight: bool,
    /// Treat the texture as a two-channel normal map.
    pub normal_map: bool,
}

impl CodecFlags {
    pub fn with_alpha_weight(mut self, enabled: bool) -> Self {
        self.use_alpha_weight = enabled;
        self
    }

    pub fn with_normal_map(mut self, enabled: bool) -> Self {
        self.normal_map = enabled;
        self
    }
}

/// Everything a codec needs to build its context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecConfig {
    pub profile: Profile,
    pub block: BlockFootprint,
    pub quality: Quality,
    pub flags: CodecFlags,
}

impl CodecConfig {
    pub fn new(block: BlockFootprint, quality: Quality) -> Self {
        Self {
            profile: Profile::default(),
            block,
            quality,
            flags: CodecFlags::default(),
        }
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_flags(mut self, flags: CodecFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Checks shared by every codec: non-empty footprint and quality range.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.block.is_empty() {
            return Err(CodecError::BadBlockSize(self.block));
        }
        if !self.quality.is_valid() {
            return Err(CodecError::BadQuality(self.quality.value()));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new(BlockFootprint::FOUR_BY_FOUR, Quality::Medium)
    }
}
