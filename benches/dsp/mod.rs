//! Benchmarks for the DSP core.

mod crossfade;
mod spectral;

pub use crossfade::bench_crossfade;
pub use spectral::bench_spectral;
