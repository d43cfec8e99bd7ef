//! The noise engine: what the audio host runs once per period.
//!
//! `NoiseEngine` owns the crossfade mixer and writes its mono signal to both
//! stereo ports. It also keeps the MIDI note state and note table current,
//! though neither feeds the audio path.

mod config;
pub mod notes;

pub use config::{EngineConfig, RESELECT_SEED_VAR, SYNTH_SEED_VAR};

use std::time::Instant;

use rand::rngs::SmallRng;

use crate::dsp::crossfade::CrossfadeMixer;
use crate::error::Result;
use crate::host::{AudioHost, Period, PortId, PortKind, ProcessHandler};
use crate::pool::BlockPool;
use notes::{NoteState, NoteTable};

pub const MIDI_IN_PORT: &str = "midi_in";
pub const LEFT_PORT: &str = "audio_l";
pub const RIGHT_PORT: &str = "audio_r";

/// Sample rate assumed until the host reports one.
const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

#[derive(Debug, Clone, Copy)]
pub struct EnginePorts {
    pub midi_in: PortId,
    pub left: PortId,
    pub right: PortId,
}

pub struct NoiseEngine {
    mixer: CrossfadeMixer<SmallRng>,
    ports: Option<EnginePorts>,
    notes: NoteState,
    note_table: NoteTable,
}

impl NoiseEngine {
    /// Build the block pool and mixer. Blocks until the pool is complete.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        log::info!(
            "generating {} blocks of {} samples",
            config.block_count,
            config.block_len
        );
        let started = Instant::now();
        let mut synthesis_rng = config.synthesis_rng();
        let pool = BlockPool::generate(config.block_count, config.block_len, &mut synthesis_rng)?;
        log::info!("block pool ready in {:.1?}", started.elapsed());

        Ok(Self::with_mixer(CrossfadeMixer::new(pool, config.reselect_rng())))
    }

    pub fn with_mixer(mixer: CrossfadeMixer<SmallRng>) -> Self {
        Self {
            mixer,
            ports: None,
            notes: NoteState::default(),
            note_table: NoteTable::new(DEFAULT_SAMPLE_RATE),
        }
    }

    /// Register `midi_in`, `audio_l` and `audio_r` on `host`.
    pub fn register_ports<H: AudioHost>(&mut self, host: &mut H) -> Result<EnginePorts> {
        let ports = EnginePorts {
            midi_in: host.register_port(MIDI_IN_PORT, PortKind::MidiInput)?,
            left: host.register_port(LEFT_PORT, PortKind::AudioOutput)?,
            right: host.register_port(RIGHT_PORT, PortKind::AudioOutput)?,
        };
        self.ports = Some(ports);
        Ok(ports)
    }

    pub fn ports(&self) -> Option<EnginePorts> {
        self.ports
    }

    /// Render straight into two channel buffers, bypassing any host.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.mixer.fill(left, right);
    }

    pub fn mixer(&self) -> &CrossfadeMixer<SmallRng> {
        &self.mixer
    }

    pub fn note_state(&self) -> NoteState {
        self.notes
    }

    pub fn note_table(&self) -> &NoteTable {
        &self.note_table
    }
}

impl ProcessHandler for NoiseEngine {
    fn process(&mut self, period: &mut Period<'_>) {
        let Some(ports) = self.ports else {
            return;
        };

        for event in period.midi_events(ports.midi_in) {
            self.notes.apply(event);
        }

        if let Some((left, right)) = period.audio_pair(ports.left, ports.right) {
            self.mixer.fill(left, right);
        }
    }

    fn sample_rate_changed(&mut self, sample_rate: u32) {
        self.note_table = NoteTable::new(sample_rate as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::OfflineHost;

    fn small_config() -> EngineConfig {
        EngineConfig {
            block_count: 4,
            block_len: 128,
            synthesis_seed: Some(1),
            reselect_seed: Some(2),
        }
    }

    #[test]
    fn registers_three_ports() {
        let mut engine = NoiseEngine::new(&small_config()).unwrap();
        let mut host = OfflineHost::new(48_000);

        let ports = engine.register_ports(&mut host).unwrap();

        assert_eq!(ports.midi_in.kind(), PortKind::MidiInput);
        assert_eq!(ports.left.kind(), PortKind::AudioOutput);
        assert_eq!(ports.right.kind(), PortKind::AudioOutput);
        assert_ne!(ports.left, ports.right);
    }

    #[test]
    fn unregistered_engine_leaves_period_silent() {
        let engine = NoiseEngine::new(&small_config()).unwrap();
        let mut host = OfflineHost::new(48_000);
        let out = host.register_port("out", PortKind::AudioOutput).unwrap();
        let mut session = host.activate(engine).unwrap();

        session.run_period(32);

        assert!(session.output(out).unwrap().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn pool_matches_config() {
        let engine = NoiseEngine::new(&small_config()).unwrap();
        assert_eq!(engine.mixer().pool().len(), 4);
        assert_eq!(engine.mixer().pool().block_len(), 128);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            block_len: 0,
            ..small_config()
        };
        assert!(NoiseEngine::new(&config).is_err());
    }
}
