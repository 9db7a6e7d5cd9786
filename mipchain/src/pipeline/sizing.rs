//! Mip-chain sizing arithmetic.
//!
//! Every byte offset the pipeline writes to is computed here, before any
//! compression happens.
//!
//! # Level count
//!
//! The chain holds the base level plus `max(floor(log2(D)) >> 1, 1) - 1`
//! halvings, where `D` is the larger base dimension. This is roughly half
//! the levels of a conventional chain (a 1024 texture gets 1024, 512, 256,
//! 128 and 64 rather than eleven levels down to 1×1). The reduced density is
//! a fixed property of the output format and must not be changed to a full
//! `log2` chain.

use crate::codec::BlockFootprint;
use crate::resample::half_extent;

/// Number of levels after the base level for a base dimension.
///
/// ```
/// use mipchain::pipeline::additional_levels;
///
/// assert_eq!(additional_levels(512), 3);
/// assert_eq!(additional_levels(1024), 4);
/// assert_eq!(additional_levels(2049), 4);
/// assert_eq!(additional_levels(4), 0);
/// ```
pub fn additional_levels(max_dimension: u32) -> u32 {
    if max_dimension == 0 {
        return 0;
    }
    (max_dimension.ilog2() >> 1).max(1) - 1
}

/// Total levels, base included, before any minimum-dimension floor.
pub fn mip_level_count(max_dimension: u32) -> u32 {
    if max_dimension == 0 {
        return 0;
    }
    additional_levels(max_dimension) + 1
}

/// Compressed size of one level.
pub fn level_footprint(
    width: u32,
    height: u32,
    depth: u32,
    block: BlockFootprint,
    block_bytes: usize,
) -> usize {
    let (bx, by, bz) = block.blocks_for(width, height, depth);
    bx as usize * by as usize * bz as usize * block_bytes
}

/// Placement of one level inside the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipLevel {
    /// 0 for the base level.
    pub index: u32,
    pub width: u32,
    pub height: u32,
    /// Byte offset of the level's first block.
    pub offset: usize,
    /// Compressed byte length.
    pub len: usize,
    /// Number of blocks in the level.
    pub blocks: u64,
    /// Blocks per row.
    pub blocks_x: u32,
}

impl MipLevel {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Lay out the whole chain for a base image, largest level first.
///
/// The chain stops after [`additional_levels`] halvings, once both
/// dimensions reach 1, or when the next level's larger dimension would
/// drop below `min_dimension`.
pub fn plan_chain(
    width: u32,
    height: u32,
    depth: u32,
    block: BlockFootprint,
    block_bytes: usize,
    min_dimension: u32,
) -> Vec<MipLevel> {
    let extra = additional_levels(width.max(height));
    let mut levels = Vec::with_capacity(extra as usize + 1);
    let (mut w, mut h) = (width, height);
    let mut offset = 0;

    for index in 0..=extra {
        let (bx, by, bz) = block.blocks_for(w, h, depth);
        let blocks = u64::from(bx) * u64::from(by) * u64::from(bz);
        let len = blocks as usize * block_bytes;
        levels.push(MipLevel {
            index,
            width: w,
            height: h,
            offset,
            len,
            blocks,
            blocks_x: bx,
        });
        offset += len;

        if w.max(h) == 1 {
            break;
        }
        let (next_w, next_h) = (half_extent(w), half_extent(h));
        if next_w.max(next_h) < min_dimension {
            break;
        }
        w = next_w;
        h = next_h;
    }

    levels
}

/// Total bytes needed to hold a chain.
pub fn chain_footprint(
    width: u32,
    height: u32,
    block: BlockFootprint,
    block_bytes: usize,
    min_dimension: u32,
) -> usize {
    plan_chain(width, height, 1, block, block_bytes, min_dimension)
        .last()
        .map(MipLevel::end)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ASTC_4X4: BlockFootprint = BlockFootprint::FOUR_BY_FOUR;

    #[test]
    fn test_additional_levels_table() {
        assert_eq!(additional_levels(1), 0);
        assert_eq!(additional_levels(2), 0);
        assert_eq!(additional_levels(15), 0);
        assert_eq!(additional_levels(16), 1);
        assert_eq!(additional_levels(64), 2);
        assert_eq!(additional_levels(256), 3);
        assert_eq!(additional_levels(512), 3);
        assert_eq!(additional_levels(4096), 5);
        assert_eq!(additional_levels(0), 0);
    }

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(0), 0);
        assert_eq!(mip_level_count(1), 1);
        assert_eq!(mip_level_count(64), 3);
        assert_eq!(mip_level_count(4096), 6);
    }

    #[test]
    fn test_level_footprint() {
        assert_eq!(level_footprint(64, 64, 1, ASTC_4X4, 16), 4096);
        assert_eq!(level_footprint(5, 5, 1, ASTC_4X4, 16), 64);
        assert_eq!(level_footprint(1, 1, 1, ASTC_4X4, 8), 8);
        assert_eq!(
            level_footprint(100, 100, 1, BlockFootprint::new_2d(6, 5), 16),
            17 * 20 * 16
        );
    }

    #[test]
    fn test_plan_64x64() {
        let levels = plan_chain(64, 64, 1, ASTC_4X4, 16, 1);
        let dims: Vec<_> = levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(64, 64), (32, 32), (16, 16)]);

        assert_eq!(levels[0].offset, 0);
        assert_eq!(levels[0].len, 4096);
        assert_eq!(levels[1].offset, 4096);
        assert_eq!(levels[1].len, 1024);
        assert_eq!(levels[2].offset, 5120);
        assert_eq!(levels[2].len, 256);
        assert_eq!(levels[2].blocks, 16);
        assert_eq!(chain_footprint(64, 64, ASTC_4X4, 16, 1), 5376);
    }

    #[test]
    fn test_plan_non_square_clamps_to_one() {
        let levels = plan_chain(4096, 2, 1, ASTC_4X4, 16, 1);
        assert_eq!(levels.len(), 6);
        let heights: Vec<_> = levels.iter().map(|l| l.height).collect();
        assert_eq!(heights, vec![2, 1, 1, 1, 1, 1]);
        assert_eq!(levels[5].width, 128);
    }

    #[test]
    fn test_plan_respects_min_dimension() {
        let levels = plan_chain(1024, 1024, 1, ASTC_4X4, 16, 256);
        let widths: Vec<_> = levels.iter().map(|l| l.width).collect();
        assert_eq!(widths, vec![1024, 512, 256]);
    }

    #[test]
    fn test_plan_single_texel() {
        let levels = plan_chain(1, 1, 1, ASTC_4X4, 16, 1);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].len, 16);
    }

    #[test]
    fn test_blocks_per_row() {
        let levels = plan_chain(20, 8, 1, ASTC_4X4, 16, 1);
        assert_eq!(levels[0].blocks_x, 5);
        assert_eq!(levels[0].blocks, 10);
        assert_eq!(levels[0].len, 160);
    }

    #[test]
    fn test_plan_empty_footprint() {
        let levels = plan_chain(64, 64, 1, BlockFootprint::new_2d(0, 0), 16, 1);
        assert_eq!(levels.len(), 3);
        assert!(levels.iter().all(|l| l.len == 0 && l.offset == 0));
        assert_eq!(chain_footprint(64, 64, BlockFootprint::new_2d(0, 4), 16, 1), 0);
    }

    proptest! {
        #[test]
        fn test_level_count_matches_formula(width in 1u32..8192, height in 1u32..8192) {
            let levels = plan_chain(width, height, 1, ASTC_4X4, 16, 1);
            let d = width.max(height) as f64;
            let expected = ((d.log2().floor() as u32) >> 1).max(1) - 1;
            prop_assert_eq!(levels.len() as u32, expected + 1);
        }

        #[test]
        fn test_levels_are_contiguous(width in 1u32..4096, height in 1u32..4096, bytes in prop::sample::select(vec![8usize, 16])) {
            let levels = plan_chain(width, height, 1, ASTC_4X4, bytes, 1);
            let mut cursor = 0;
            for level in &levels {
                prop_assert_eq!(level.offset, cursor);
                prop_assert_eq!(level.len, level_footprint(level.width, level.height, 1, ASTC_4X4, bytes));
                cursor = level.end();
            }
            prop_assert_eq!(cursor, chain_footprint(width, height, ASTC_4X4, bytes, 1));
        }

        #[test]
        fn test_levels_halve(width in 1u32..4096, height in 1u32..4096) {
            let levels = plan_chain(width, height, 1, ASTC_4X4, 16, 1);
            for pair in levels.windows(2) {
                prop_assert_eq!(pair[1].width, (pair[0].width / 2).max(1));
                prop_assert_eq!(pair[1].height, (pair[0].height / 2).max(1));
            }
        }
    }
}
