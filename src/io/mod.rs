// Purpose - external event formats

pub mod midi;

pub use midi::MidiEvent;
