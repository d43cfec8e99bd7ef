//! Note bookkeeping kept alongside the noise engine.
//!
//! The table and note state follow host sample rate and MIDI input, but the
//! audio path never reads them.

use crate::io::midi::MidiEvent;

/// Per-note phase increments (cycles per sample) for all 128 MIDI keys.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTable {
    increments: [f32; 128],
}

impl NoteTable {
    pub fn new(sample_rate: f32) -> Self {
        let base = 2.0 * 440.0 / 32.0;
        let mut increments = [0.0; 128];
        for (i, inc) in increments.iter_mut().enumerate() {
            let semis = (i as f64 - 9.0) / 12.0;
            *inc = (base * 2.0_f64.powf(semis) / sample_rate as f64) as f32;
        }
        Self { increments }
    }

    pub fn increment(&self, note: u8) -> f32 {
        self.increments[usize::from(note & 0x7f)]
    }
}

/// Last note seen on the MIDI input and its level.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoteState {
    pub note: u8,
    pub level: f32,
}

impl NoteState {
    pub fn apply(&mut self, event: &MidiEvent) {
        match *event {
            MidiEvent::NoteOn { key, velocity, .. } => {
                self.note = key;
                self.level = if velocity == 0 {
                    0.0
                } else {
                    velocity as f32 / 127.0 / 2.0
                };
            }
            MidiEvent::NoteOff { key, .. } => {
                self.note = key;
                self.level = 0.0;
            }
            _ => {}
        }
    }
}
