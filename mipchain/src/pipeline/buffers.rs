//! Ping-pong buffers for successive mip levels.

use crate::image::{buffer_len, Image};
use crate::resample::{half_extent, EdgeMode, Filter, ResampleError, Resampler, Surface, SurfaceMut};

/// The current level's image plus a scratch buffer for the next one.
///
/// Each [`advance`](Self::advance) resamples into the scratch buffer and then
/// swaps the two, so the pipeline allocates at most one extra buffer for the
/// whole chain. The scratch is sized for the first halving; every later level
/// is smaller and reuses the same allocation.
#[derive(Debug)]
pub struct PingPong {
    current: Image,
    scratch: Vec<u8>,
}

impl PingPong {
    pub fn new(image: Image) -> Self {
        let scratch = Vec::with_capacity(buffer_len(
            half_extent(image.width()),
            half_extent(image.height()),
        ));
        Self {
            current: image,
            scratch,
        }
    }

    pub fn current(&self) -> &Image {
        &self.current
    }

    /// Resample the current level to `width × height` and make it current.
    pub fn advance<R: Resampler + ?Sized>(
        &mut self,
        resampler: &R,
        edge: EdgeMode,
        filter: Filter,
        width: u32,
        height: u32,
    ) -> Result<(), ResampleError> {
        self.scratch.resize(buffer_len(width, height), 0);
        resampler.resize(
            Surface::packed(
                self.current.pixels(),
                self.current.width(),
                self.current.height(),
            ),
            SurfaceMut::packed(&mut self.scratch, width, height),
            edge,
            filter,
        )?;

        let next = std::mem::take(&mut self.scratch);
        self.scratch = self.current.swap_pixels(next, width, height);
        Ok(())
    }
}
