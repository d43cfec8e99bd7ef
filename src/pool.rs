//! The fixed set of waveform blocks the mixer reads from.
//!
//! A pool is built once, before audio starts, and is never modified
//! afterwards. It offers read-only indexed access only.

use rand::Rng;

use crate::dsp::spectral::{Block, SpectralGenerator};
use crate::error::{try_with_capacity, Error, Result};

#[derive(Debug, Clone)]
pub struct BlockPool {
    blocks: Box<[Block]>,
    block_len: usize,
}

impl BlockPool {
    /// Synthesize `block_count` blocks of `block_len` samples each.
    ///
    /// Runs to completion on the calling thread. Fails if any allocation
    /// fails; no partially filled pool is ever returned.
    pub fn generate<R: Rng + ?Sized>(
        block_count: usize,
        block_len: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if block_count == 0 {
            return Err(Error::Config("block count must be non-zero".into()));
        }

        let mut generator = SpectralGenerator::new(block_len)?;
        let mut blocks = try_with_capacity("block pool", block_count)?;
        for _ in 0..block_count {
            blocks.push(generator.generate(rng)?);
        }

        Ok(Self {
            blocks: blocks.into_boxed_slice(),
            block_len,
        })
    }

    /// Wrap caller-supplied blocks. All blocks must share one non-zero length.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        let block_len = match blocks.first() {
            Some(first) => first.len(),
            None => return Err(Error::Config("block pool must not be empty".into())),
        };
        if block_len == 0 {
            return Err(Error::Config("block length must be non-zero".into()));
        }
        if let Some((index, block)) = blocks
            .iter()
            .enumerate()
            .find(|(_, b)| b.len() != block_len)
        {
            return Err(Error::Config(format!(
                "block {index} has {} samples, expected {block_len}",
                block.len()
            )));
        }

        Ok(Self {
            blocks: blocks.into_boxed_slice(),
            block_len,
        })
    }

    /// Number of blocks (M).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Samples per block (N).
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// # Panics
    /// If `index >= self.len()`.
    pub fn block(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }
}
