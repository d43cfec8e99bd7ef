#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Decode one channel voice message from raw bytes.
    ///
    /// Returns `None` for system messages, unsupported statuses, and messages
    /// shorter than their status requires.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (&status, data) = bytes.split_first()?;
        let channel = status & 0x0f;
        let data7 = |i: usize| data.get(i).map(|b| b & 0x7f);

        match status & 0xf0 {
            0x80 => Some(MidiEvent::NoteOff {
                channel,
                key: data7(0)?,
                velocity: data7(1)?,
            }),
            0x90 => Some(MidiEvent::NoteOn {
                channel,
                key: data7(0)?,
                velocity: data7(1)?,
            }),
            0xb0 => Some(MidiEvent::ControlChange {
                channel,
                controller: data7(0)?,
                value: data7(1)?,
            }),
            0xc0 => Some(MidiEvent::ProgramChange {
                channel,
                program: data7(0)?,
            }),
            0xe0 => {
                let lsb = data7(0)? as i16;
                let msb = data7(1)? as i16;
                Some(MidiEvent::PitchBend {
                    channel,
                    value: ((msb << 7) | lsb) - 8192,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_note_on() {
        assert_eq!(
            MidiEvent::from_bytes(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn decodes_note_off() {
        assert_eq!(
            MidiEvent::from_bytes(&[0x80, 64, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 64,
                velocity: 0
            })
        );
    }

    #[test]
    fn pitch_bend_is_centered() {
        assert_eq!(
            MidiEvent::from_bytes(&[0xe1, 0x00, 0x40]),
            Some(MidiEvent::PitchBend {
                channel: 1,
                value: 0
            })
        );
        assert_eq!(
            MidiEvent::from_bytes(&[0xe0, 0x7f, 0x7f]),
            Some(MidiEvent::PitchBend {
                channel: 0,
                value: 8191
            })
        );
    }

    #[test]
    fn short_and_system_messages_are_ignored() {
        assert_eq!(MidiEvent::from_bytes(&[]), None);
        assert_eq!(MidiEvent::from_bytes(&[0x90, 60]), None);
        assert_eq!(MidiEvent::from_bytes(&[0xf8]), None);
    }
}
