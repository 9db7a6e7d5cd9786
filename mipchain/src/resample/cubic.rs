//! Convolution resampler backed by `fast_image_resize`.

use std::borrow::Cow;

use fast_image_resize as fr;

use super::{EdgeMode, Filter, ResampleError, Resampler, Surface, SurfaceMut};
use crate::image::RGBA_CHANNELS;

/// Built-in [`Resampler`] with Mitchell, Catmull-Rom and box filters.
///
/// Channels are filtered independently; alpha is not premultiplied, so
/// non-colour data packed into alpha survives downsampling unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicResampler;

impl CubicResampler {
    pub fn new() -> Self {
        Self
    }

    fn options(filter: Filter) -> fr::ResizeOptions {
        fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)))
            .use_alpha(false)
    }
}

fn to_fast_filter(filter: Filter) -> fr::FilterType {
    match filter {
        Filter::Mitchell => fr::FilterType::Mitchell,
        Filter::CatmullRom => fr::FilterType::CatmullRom,
        Filter::Box => fr::FilterType::Box,
    }
}

/// Tightly packed copy of a surface's rows, borrowed when already packed.
fn packed_rows<'a>(pixels: &'a [u8], height: u32, stride: usize, row: usize) -> Cow<'a, [u8]> {
    if stride == row {
        return Cow::Borrowed(&pixels[..row * height as usize]);
    }
    Cow::Owned(
        pixels
            .chunks(stride)
            .take(height as usize)
            .flat_map(|line| &line[..row])
            .copied()
            .collect(),
    )
}

impl Resampler for CubicResampler {
    fn resize(
        &self,
        src: Surface<'_>,
        dst: SurfaceMut<'_>,
        _edge: EdgeMode,
        filter: Filter,
    ) -> Result<(), ResampleError> {
        src.validate()?;
        dst.validate()?;

        let src_row = src.width as usize * RGBA_CHANNELS;
        let src_pixels = packed_rows(src.pixels, src.height, src.stride, src_row);
        let src_image =
            fr::images::ImageRef::new(src.width, src.height, &src_pixels[..], fr::PixelType::U8x4)
                .map_err(|e| ResampleError::Resize(e.to_string()))?;

        let mut dst_image = fr::images::Image::new(dst.width, dst.height, fr::PixelType::U8x4);
        fr::Resizer::new()
            .resize(&src_image, &mut dst_image, Some(&Self::options(filter)))
            .map_err(|e| ResampleError::Resize(e.to_string()))?;

        let dst_row = dst.width as usize * RGBA_CHANNELS;
        for (line, resized) in dst
            .pixels
            .chunks_mut(dst.stride)
            .zip(dst_image.buffer().chunks_exact(dst_row))
        {
            line[..dst_row].copy_from_slice(resized);
        }

        Ok(())
    }
}
