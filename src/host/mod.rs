//! Audio host abstraction.
//!
//! The engine never talks to a concrete audio backend. It registers named
//! ports on an [`AudioHost`], hands the host a [`ProcessHandler`], and from
//! then on is called once per period with a [`Period`] holding that period's
//! port buffers.
//!
//! Adapters:
//! - [`CpalHost`] drives the default output device through cpal.
//! - [`OfflineHost`] runs periods on demand, for tests and offline rendering.

mod cpal_host;
mod offline;

pub use cpal_host::{CpalHost, CpalSession, MIDI_QUEUE_CAPACITY};
pub use offline::{OfflineHost, OfflineSession};

use crate::error::{Error, Result};
use crate::io::midi::MidiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    AudioOutput,
    MidiInput,
}

/// Handle to a registered port. Indices count ports of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId {
    kind: PortKind,
    index: usize,
}

impl PortId {
    pub fn kind(&self) -> PortKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Called by the host when it stops the client on its own. Receives a reason.
pub type ShutdownCallback = Box<dyn FnMut(String) + Send>;

/// Code run by the host once per period on its audio thread.
///
/// `process` must not block or allocate.
pub trait ProcessHandler: Send {
    fn process(&mut self, period: &mut Period<'_>);

    /// The host sample rate is now `sample_rate`. Also called once on
    /// activation, before the first period.
    fn sample_rate_changed(&mut self, _sample_rate: u32) {}
}

pub trait AudioHost {
    type Session<P: ProcessHandler + 'static>;

    fn sample_rate(&self) -> u32;

    fn register_port(&mut self, name: &str, kind: PortKind) -> Result<PortId>;

    fn on_shutdown(&mut self, callback: ShutdownCallback);

    /// Start calling `handler` once per period. Ports must be registered
    /// before this point.
    fn activate<P: ProcessHandler + 'static>(self, handler: P) -> Result<Self::Session<P>>;
}

/// Port names by kind, shared by the adapters.
#[derive(Debug, Default)]
pub struct PortRegistry {
    audio: Vec<String>,
    midi: Vec<String>,
}

impl PortRegistry {
    pub fn register(&mut self, name: &str, kind: PortKind) -> Result<PortId> {
        if name.is_empty() {
            return Err(Error::Port("port name must not be empty".into()));
        }
        if self.audio.iter().chain(&self.midi).any(|n| n == name) {
            return Err(Error::Port(format!("port {name:?} already registered")));
        }

        let names = match kind {
            PortKind::AudioOutput => &mut self.audio,
            PortKind::MidiInput => &mut self.midi,
        };
        names.push(name.to_owned());
        Ok(PortId {
            kind,
            index: names.len() - 1,
        })
    }

    pub fn audio_ports(&self) -> &[String] {
        &self.audio
    }

    pub fn midi_ports(&self) -> &[String] {
        &self.midi
    }
}

/// One period's worth of port buffers.
pub struct Period<'a> {
    frames: usize,
    audio: &'a mut [Vec<f32>],
    midi: &'a [Vec<MidiEvent>],
}

impl<'a> Period<'a> {
    /// Wrap host buffers for a period of `frames` frames. Audio buffers must
    /// hold at least `frames` samples; their first `frames` are zeroed.
    pub fn new(frames: usize, audio: &'a mut [Vec<f32>], midi: &'a [Vec<MidiEvent>]) -> Self {
        for buf in audio.iter_mut() {
            debug_assert!(buf.len() >= frames);
            buf[..frames].fill(0.0);
        }
        Self {
            frames,
            audio,
            midi,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Output buffer of an audio port, `frames` samples long.
    pub fn audio_buffer(&mut self, port: PortId) -> Option<&mut [f32]> {
        if port.kind != PortKind::AudioOutput {
            return None;
        }
        let frames = self.frames;
        self.audio.get_mut(port.index).map(|buf| &mut buf[..frames])
    }

    /// Output buffers of two distinct audio ports at once.
    pub fn audio_pair(&mut self, a: PortId, b: PortId) -> Option<(&mut [f32], &mut [f32])> {
        if a.kind != PortKind::AudioOutput || b.kind != PortKind::AudioOutput {
            return None;
        }
        let (i, j) = (a.index, b.index);
        if i == j || i.max(j) >= self.audio.len() {
            return None;
        }

        let frames = self.frames;
        let (lo, hi) = self.audio.split_at_mut(i.max(j));
        let low = &mut lo[i.min(j)][..frames];
        let high = &mut hi[0][..frames];
        if i < j {
            Some((low, high))
        } else {
            Some((high, low))
        }
    }

    /// Events that arrived on a MIDI port for this period.
    pub fn midi_events(&self, port: PortId) -> &[MidiEvent] {
        if port.kind != PortKind::MidiInput {
            return &[];
        }
        self.midi.get(port.index).map(Vec::as_slice).unwrap_or(&[])
    }
}
