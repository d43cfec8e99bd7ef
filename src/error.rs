use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to allocate {what} ({len} elements)")]
    Allocation {
        what: &'static str,
        len: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("port error: {0}")]
    Port(String),
    #[error("no default output device available")]
    NoOutputDevice,
    #[error(transparent)]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),
    #[error(transparent)]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error(transparent)]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Allocate an empty vector with exactly `len` slots of capacity.
///
/// Startup allocations go through here so that running out of memory is
/// reported as [`Error::Allocation`] instead of aborting the process.
pub(crate) fn try_with_capacity<T>(what: &'static str, len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|source| Error::Allocation { what, len, source })?;
    Ok(buf)
}
