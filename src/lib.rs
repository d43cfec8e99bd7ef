pub mod dsp; // Spectral block synthesis and crossfading
pub mod engine;
pub mod error;
pub mod host; // Audio host abstraction and adapters
pub mod io;
pub mod pool;

pub use engine::{EngineConfig, NoiseEngine};
pub use error::{Error, Result};

/// Number of waveform blocks in the pool.
pub const BLOCK_COUNT: usize = 20;
/// Samples per waveform block.
pub const BLOCK_LEN: usize = 1 << 16;
/// Largest period a host adapter hands to a process handler in one call.
pub const MAX_PERIOD_FRAMES: usize = 2048;
/// Client name announced to the audio host.
pub const CLIENT_NAME: &str = "eyelight";
