use std::ops::Deref;

use rand::Rng;

use crate::dsp::halfcomplex::HalfComplexInverse;
use crate::error::{try_with_capacity, Error, Result};

/*
Spectral Noise Blocks
=====================

Each block is built by drawing uniform random numbers and treating them as a
half-complex spectrum, then running the inverse transform to get a time
domain waveform:

    random deviates in [-1, 1)  ──►  inverse half-complex FFT  ──►  block

The deviates are used as spectral coefficients directly. There is no
magnitude/phase model behind them: every bin up to Nyquist receives a random
real and imaginary part, so the energy lands pseudo-randomly across the
spectrum instead of forming flat white noise.

Blocks are narrowed to f32 once built. They never change afterwards.
*/

/// A fixed-length run of waveform samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    samples: Box<[f32]>,
}

impl Block {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

impl Deref for Block {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.samples
    }
}

/// Builds noise blocks of one length, reusing its transform and scratch.
pub struct SpectralGenerator {
    transform: HalfComplexInverse,
    coeffs: Vec<f64>,
}

impl SpectralGenerator {
    pub fn new(block_len: usize) -> Result<Self> {
        if block_len == 0 {
            return Err(Error::Config("block length must be non-zero".into()));
        }

        let transform = HalfComplexInverse::new(block_len)?;
        let mut coeffs = try_with_capacity("spectral scratch", block_len)?;
        coeffs.resize(block_len, 0.0);

        Ok(Self { transform, coeffs })
    }

    pub fn block_len(&self) -> usize {
        self.coeffs.len()
    }

    /// Synthesize one block, drawing its coefficients from `rng`.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Block> {
        for c in &mut self.coeffs {
            *c = 2.0 * (rng.random::<f64>() - 0.5);
        }

        self.transform.process(&mut self.coeffs);

        let mut samples = try_with_capacity("block samples", self.coeffs.len())?;
        samples.extend(self.coeffs.iter().map(|&x| x as f32));
        Ok(Block::from_samples(samples))
    }
}

/// Synthesize a single block of `block_len` samples.
pub fn generate_block<R: Rng + ?Sized>(block_len: usize, rng: &mut R) -> Result<Block> {
    SpectralGenerator::new(block_len)?.generate(rng)
}
