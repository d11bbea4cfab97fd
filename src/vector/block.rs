//! Block-partitioned vector.
//!
//! The logical positions `[0, len)` are split into consecutive ranges, each
//! stored as its own `DenseVector`. Block-aware kernels recurse per block;
//! everything else goes through elemental access.

use std::ops::Range;

use crate::core::access::Access;
use crate::core::traits::{ElementalVector, VecShape};
use crate::error::{BlasError, Result};
use crate::vector::dense::DenseVector;

#[derive(Debug, Clone, PartialEq)]
pub struct BlockVector {
    // offsets[b]..offsets[b + 1] is the global range of block b
    offsets: Vec<usize>,
    blocks: Vec<DenseVector>,
}

impl BlockVector {
    /// Zero vector partitioned into blocks of the given sizes.
    pub fn new(block_sizes: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(block_sizes.len() + 1);
        offsets.push(0);
        for &n in block_sizes {
            offsets.push(offsets[offsets.len() - 1] + n);
        }
        let blocks = block_sizes.iter().map(|&n| DenseVector::zeros(n)).collect();
        Self { offsets, blocks }
    }

    /// Assemble from existing blocks, in order.
    pub fn from_blocks(blocks: Vec<DenseVector>) -> Self {
        let mut offsets = Vec::with_capacity(blocks.len() + 1);
        offsets.push(0);
        for b in &blocks {
            offsets.push(offsets[offsets.len() - 1] + b.len());
        }
        Self { offsets, blocks }
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, b: usize) -> Result<&DenseVector> {
        self.check_block(b)?;
        Ok(&self.blocks[b])
    }

    pub fn block_mut(&mut self, b: usize) -> Result<&mut DenseVector> {
        self.check_block(b)?;
        Ok(&mut self.blocks[b])
    }

    pub fn blocks(&self) -> &[DenseVector] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [DenseVector] {
        &mut self.blocks
    }

    /// Global positions covered by block `b`.
    pub fn block_range(&self, b: usize) -> Result<Range<usize>> {
        self.check_block(b)?;
        Ok(self.offsets[b]..self.offsets[b + 1])
    }

    /// Blocks paired with the global positions they cover.
    pub fn ranges_mut(&mut self) -> impl Iterator<Item = (Range<usize>, &mut DenseVector)> + '_ {
        self.offsets.windows(2).map(|w| w[0]..w[1]).zip(self.blocks.iter_mut())
    }

    /// `true` when both vectors split their positions identically.
    pub fn same_partition(&self, other: &BlockVector) -> bool {
        self.offsets == other.offsets
    }

    /// All values in global order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.blocks.iter().flat_map(|b| b.as_slice().iter().copied())
    }

    /// Flatten into one contiguous vector.
    pub fn to_vec(&self) -> Vec<f64> {
        self.values().collect()
    }

    fn check_block(&self, b: usize) -> Result<()> {
        if b >= self.blocks.len() {
            return Err(BlasError::OutOfRange(format!(
                "block {b} not in [0, {})",
                self.blocks.len()
            )));
        }
        Ok(())
    }

    // (block, local index) of global position i
    fn locate(&self, i: usize) -> Result<(usize, usize)> {
        if i >= self.len() {
            return Err(BlasError::index(i, self.len()));
        }
        // last block whose start is <= i; empty blocks share a start with their successor
        let b = self.offsets.partition_point(|&start| start <= i) - 1;
        Ok((b, i - self.offsets[b]))
    }
}

impl VecShape for BlockVector {
    fn len(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    fn access(&self) -> Access {
        Access::BLOCK | Access::ELEMENTAL
    }
}

impl ElementalVector for BlockVector {
    fn get(&self, i: usize) -> Result<f64> {
        let (b, k) = self.locate(i)?;
        self.blocks[b].get(k)
    }

    fn set(&mut self, i: usize, v: f64) -> Result<()> {
        let (b, k) = self.locate(i)?;
        self.blocks[b].set(k, v)
    }

    fn add(&mut self, i: usize, v: f64) -> Result<()> {
        let (b, k) = self.locate(i)?;
        self.blocks[b].add(k, v)
    }
}
