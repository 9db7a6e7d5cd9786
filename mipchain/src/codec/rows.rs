//! Block rows: the unit of output handed to codec workers.

/// One row of compressed blocks inside a level's output region.
#[derive(Debug)]
pub struct BlockRow<'a> {
    /// Row index counted from the top of the level.
    pub index: u32,
    /// Destination for exactly one row of blocks.
    pub data: &'a mut [u8],
}

/// The rows assigned to a single worker. Rows of different workers are
/// disjoint sub-slices of the same output region.
#[derive(Debug, Default)]
pub struct BlockRows<'a> {
    rows: Vec<BlockRow<'a>>,
}

impl<'a> BlockRows<'a> {
    pub fn push(&mut self, index: u32, data: &'a mut [u8]) {
        self.rows.push(BlockRow { index, data });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BlockRow<'a>> {
        self.rows.iter_mut()
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().map(|row| row.index)
    }
}
