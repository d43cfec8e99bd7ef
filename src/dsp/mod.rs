//! Signal-processing core: block synthesis and the crossfade mixer.
//!
//! Block synthesis allocates and runs once at startup. The mixer is
//! allocation-free and realtime-safe, and is the only part of this module
//! that runs on the audio thread.

/// Dual-cursor crossfade over the block pool.
pub mod crossfade;
/// Inverse transform for half-complex packed spectra.
pub mod halfcomplex;
/// Noise block synthesis from random spectra.
pub mod spectral;

pub use crossfade::{CrossfadeMixer, Cursor};
pub use spectral::{generate_block, Block, SpectralGenerator};
