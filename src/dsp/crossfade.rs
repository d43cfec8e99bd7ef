use std::f64::consts::PI;

use rand::{rngs::SmallRng, Rng};

use crate::pool::BlockPool;

/*
Dual-Cursor Crossfade
=====================

Two cursors read from the block pool at the same time. Each cursor is a
(block, offset) pair. Every output sample is a weighted sum of both:

    out[j] = sin(a) * block[i0][o0 + j]  +  cos(a) * block[i1][o1 + j]

    where a = pi * o0 / N

The angle sweeps from 0 towards pi as cursor 0 moves through a block, so the
weights trade places across the whole block span rather than inside a short
fade window.


Batches
-------

Output is produced in batches. A batch is the longest run that fits in what
was asked for and in both cursors' blocks:

    k = min(remaining, N - o0, N - o1)

The angle is computed once per batch. Every sample in a batch uses the same
(sin a, cos a) pair, so the envelope is a staircase:

    weight
      │        ┌──────┐
      │  ┌─────┘      └──┐
      │──┘               └────
      └──────────────────────── time
         batch boundaries

After a batch both offsets advance by k.


Reselection
-----------

When a cursor's offset reaches the number of blocks in the pool (M), the
offset goes back to 0 and a new block index is drawn uniformly from [0, M).
Each cursor is checked on its own. The threshold is the block COUNT, not the
block length, so with the usual M << N cursors jump to a new random block
after only a few samples of travel and most of every block is never heard.
An offset that reaches the end of its block (N) is reselected as well; that
can only happen when M > N.

Starting state: both cursors on block 0, cursor 0 at N/2 and cursor 1 at 0,
half a block apart.

The mixer never allocates, locks, or fails once constructed.
*/

/// A read position in the block pool.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub block: usize,
    pub offset: usize,
}

impl Cursor {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Weights `(sin a, cos a)` applied to cursor 0 and cursor 1 for a batch
/// that starts with cursor 0 at `offset`.
#[inline]
pub fn crossfade_weights(offset: usize, block_len: usize) -> (f32, f32) {
    let a = PI * offset as f64 / block_len as f64;
    (a.sin() as f32, a.cos() as f32)
}

pub struct CrossfadeMixer<R = SmallRng> {
    pool: BlockPool,
    cursors: [Cursor; 2],
    rng: R,
}

impl<R: Rng> CrossfadeMixer<R> {
    /// Mixer over `pool` in its starting state. `rng` is used only to pick
    /// new blocks and must not be shared with block synthesis.
    pub fn new(pool: BlockPool, rng: R) -> Self {
        let half = pool.block_len() / 2;
        Self::with_cursors(pool, rng, Cursor::new(0, half), Cursor::new(0, 0))
    }

    /// # Panics
    /// If a cursor points outside the pool or past the end of its block.
    pub fn with_cursors(pool: BlockPool, rng: R, first: Cursor, second: Cursor) -> Self {
        for cursor in [first, second] {
            assert!(
                cursor.block < pool.len() && cursor.offset < pool.block_len(),
                "cursor {cursor:?} outside pool of {} blocks x {} samples",
                pool.len(),
                pool.block_len()
            );
        }

        Self {
            pool,
            cursors: [first, second],
            rng,
        }
    }

    pub fn pool(&self) -> &BlockPool {
        &self.pool
    }

    pub fn cursors(&self) -> [Cursor; 2] {
        self.cursors
    }

    /// Fill both channels with the same mixed signal.
    ///
    /// Writes `left.len()` samples; `right` must be the same length.
    pub fn fill(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        let count = left.len();
        let right = &mut right[..count];

        let mut written = 0;
        while written < count {
            written += self.render_batch(&mut left[written..], &mut right[written..]);
        }
    }

    /// Render one batch into the front of `left`/`right`, returning its length.
    fn render_batch(&mut self, left: &mut [f32], right: &mut [f32]) -> usize {
        let block_len = self.pool.block_len();
        let [c0, c1] = self.cursors;

        let k = left
            .len()
            .min(block_len - c0.offset)
            .min(block_len - c1.offset);
        let (w0, w1) = crossfade_weights(c0.offset, block_len);

        let a = &self.pool.block(c0.block)[c0.offset..c0.offset + k];
        let b = &self.pool.block(c1.block)[c1.offset..c1.offset + k];

        for ((l, r), (&sa, &sb)) in left[..k]
            .iter_mut()
            .zip(right[..k].iter_mut())
            .zip(a.iter().zip(b))
        {
            let s = w0 * sa + w1 * sb;
            *l = s;
            *r = s;
        }

        self.advance(k);
        k
    }

    fn advance(&mut self, k: usize) {
        let block_count = self.pool.len();
        let block_len = self.pool.block_len();

        for cursor in &mut self.cursors {
            cursor.offset += k;
            if cursor.offset >= block_count || cursor.offset >= block_len {
                cursor.offset = 0;
                cursor.block = self.rng.random_range(0..block_count);
            }
        }
    }
}
