//! Image resampling used to build each mip level from the previous one.
//!
//! The [`Resampler`] trait mirrors a classic `resize(src, dst, edge, filter)`
//! call over strided RGBA8 surfaces. [`CubicResampler`] is the built-in
//! implementation, a `fast_image_resize` convolution supporting the
//! Mitchell-Netravali and Catmull-Rom cubics plus a box filter.

mod cubic;

pub use cubic::CubicResampler;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::image::RGBA_CHANNELS;

/// Errors raised by a [`Resampler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    #[error("Invalid surface {width}×{height}")]
    EmptySurface { width: u32, height: u32 },

    #[error("Stride {stride} is smaller than a {width}-texel row")]
    BadStride { width: u32, stride: usize },

    #[error("Surface buffer holds {actual} bytes, needs {required}")]
    BufferTooSmall { required: usize, actual: usize },

    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("Resize failed: {0}")]
    Resize(String),
}

/// How reads outside the source are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Never read past the edge: kernel taps outside the source are
    /// dropped and the remaining weights renormalised.
    #[default]
    Clamp,
}

/// Reconstruction filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Mitchell-Netravali cubic, B = C = 1/3.
    #[default]
    Mitchell,
    /// Catmull-Rom cubic, B = 0, C = 1/2.
    CatmullRom,
    /// Unweighted average over the footprint of each output texel.
    Box,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Filter::Mitchell => "mitchell",
            Filter::CatmullRom => "catmull-rom",
            Filter::Box => "box",
        };
        f.write_str(name)
    }
}

impl FromStr for Filter {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mitchell" => Ok(Filter::Mitchell),
            "catmull-rom" | "catmullrom" => Ok(Filter::CatmullRom),
            "box" => Ok(Filter::Box),
            _ => Err(ResampleError::UnknownFilter(s.to_string())),
        }
    }
}

/// Read-only strided RGBA8 surface.
#[derive(Debug, Clone, Copy)]
pub struct Surface<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub stride: usize,
}

/// Writable strided RGBA8 surface.
#[derive(Debug)]
pub struct SurfaceMut<'a> {
    pub pixels: &'a mut [u8],
    pub width: u32,
    pub height: u32,
    pub stride: usize,
}

impl<'a> Surface<'a> {
    /// A tightly packed surface.
    pub fn packed(pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            stride: width as usize * RGBA_CHANNELS,
        }
    }

    pub fn validate(&self) -> Result<(), ResampleError> {
        validate_layout(self.pixels.len(), self.width, self.height, self.stride)
    }
}

impl<'a> SurfaceMut<'a> {
    pub fn packed(pixels: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            stride: width as usize * RGBA_CHANNELS,
        }
    }

    pub fn validate(&self) -> Result<(), ResampleError> {
        validate_layout(self.pixels.len(), self.width, self.height, self.stride)
    }
}

fn validate_layout(len: usize, width: u32, height: u32, stride: usize) -> Result<(), ResampleError> {
    if width == 0 || height == 0 {
        return Err(ResampleError::EmptySurface { width, height });
    }

    let row = width as usize * RGBA_CHANNELS;
    if stride < row {
        return Err(ResampleError::BadStride { width, stride });
    }

    let required = stride * (height as usize - 1) + row;
    if len < required {
        return Err(ResampleError::BufferTooSmall {
            required,
            actual: len,
        });
    }
    Ok(())
}

/// Resizes RGBA8 surfaces.
pub trait Resampler: Send + Sync {
    /// Resample `src` into `dst`, scaling to `dst`'s dimensions.
    fn resize(
        &self,
        src: Surface<'_>,
        dst: SurfaceMut<'_>,
        edge: EdgeMode,
        filter: Filter,
    ) -> Result<(), ResampleError>;
}

/// Dimension of the next mip level: half, rounded down, never below 1.
pub fn half_extent(extent: u32) -> u32 {
    (extent / 2).max(1)
}
