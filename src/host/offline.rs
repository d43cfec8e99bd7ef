use crate::error::{Error, Result};
use crate::host::{
    AudioHost, Period, PortId, PortKind, PortRegistry, ProcessHandler, ShutdownCallback,
};
use crate::io::midi::MidiEvent;

/// Host that runs periods only when asked to, on the calling thread.
pub struct OfflineHost {
    sample_rate: u32,
    ports: PortRegistry,
    shutdown: Option<ShutdownCallback>,
}

impl OfflineHost {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ports: PortRegistry::default(),
            shutdown: None,
        }
    }
}

impl AudioHost for OfflineHost {
    type Session<P: ProcessHandler + 'static> = OfflineSession<P>;

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn register_port(&mut self, name: &str, kind: PortKind) -> Result<PortId> {
        self.ports.register(name, kind)
    }

    fn on_shutdown(&mut self, callback: ShutdownCallback) {
        self.shutdown = Some(callback);
    }

    fn activate<P: ProcessHandler + 'static>(self, mut handler: P) -> Result<OfflineSession<P>> {
        handler.sample_rate_changed(self.sample_rate);

        let audio_ports = self.ports.audio_ports().len();
        let midi_ports = self.ports.midi_ports().len();
        Ok(OfflineSession {
            handler,
            sample_rate: self.sample_rate,
            audio: vec![Vec::new(); audio_ports],
            midi: vec![Vec::new(); midi_ports],
            pending_midi: vec![Vec::new(); midi_ports],
            frames: 0,
            shutdown: self.shutdown,
        })
    }
}

pub struct OfflineSession<P> {
    handler: P,
    sample_rate: u32,
    audio: Vec<Vec<f32>>,
    midi: Vec<Vec<MidiEvent>>,
    pending_midi: Vec<Vec<MidiEvent>>,
    frames: usize,
    shutdown: Option<ShutdownCallback>,
}

impl<P: ProcessHandler> OfflineSession<P> {
    /// Run one period of `frames` frames. Queued MIDI events are delivered
    /// with it.
    pub fn run_period(&mut self, frames: usize) {
        for buf in &mut self.audio {
            if buf.len() < frames {
                buf.resize(frames, 0.0);
            }
        }
        for (events, pending) in self.midi.iter_mut().zip(&mut self.pending_midi) {
            events.clear();
            events.append(pending);
        }

        let mut period = Period::new(frames, &mut self.audio, &self.midi);
        self.handler.process(&mut period);
        self.frames = frames;
    }

    /// Output of an audio port from the last period.
    pub fn output(&self, port: PortId) -> Option<&[f32]> {
        if port.kind() != PortKind::AudioOutput {
            return None;
        }
        self.audio.get(port.index()).map(|buf| &buf[..self.frames])
    }

    /// Queue an event for the next period.
    pub fn push_midi(&mut self, port: PortId, event: MidiEvent) -> Result<()> {
        match self.pending_midi.get_mut(port.index()) {
            Some(events) if port.kind() == PortKind::MidiInput => {
                events.push(event);
                Ok(())
            }
            _ => Err(Error::Port(format!("{port:?} is not a MIDI input"))),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        log::info!("sample rate is now {sample_rate}/sec");
        self.sample_rate = sample_rate;
        self.handler.sample_rate_changed(sample_rate);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Stop the session as if the host had gone away.
    pub fn shut_down(mut self, reason: &str) -> P {
        if let Some(notify) = self.shutdown.as_mut() {
            notify(reason.to_owned());
        }
        self.handler
    }

    pub fn handler(&self) -> &P {
        &self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    /// Writes the period length into every sample and counts MIDI events.
    #[derive(Default)]
    struct Probe {
        out: Option<PortId>,
        midi: Option<PortId>,
        events: usize,
        rate: u32,
    }

    impl ProcessHandler for Probe {
        fn process(&mut self, period: &mut Period<'_>) {
            if let Some(port) = self.midi {
                self.events += period.midi_events(port).len();
            }
            let frames = period.frames() as f32;
            if let Some(buf) = self.out.and_then(|port| period.audio_buffer(port)) {
                buf.fill(frames);
            }
        }

        fn sample_rate_changed(&mut self, sample_rate: u32) {
            self.rate = sample_rate;
        }
    }

    #[test]
    fn runs_periods_of_any_size() {
        let mut host = OfflineHost::new(48_000);
        let out = host.register_port("out", PortKind::AudioOutput).unwrap();
        let probe = Probe {
            out: Some(out),
            ..Default::default()
        };
        let mut session = host.activate(probe).unwrap();
        assert_eq!(session.handler().rate, 48_000);

        for frames in [1, 64, 5000, 3] {
            session.run_period(frames);
            let output = session.output(out).unwrap();
            assert_eq!(output.len(), frames);
            assert!(output.iter().all(|&s| s == frames as f32));
        }
    }

    #[test]
    fn midi_is_delivered_once() {
        let mut host = OfflineHost::new(44_100);
        let midi = host.register_port("midi_in", PortKind::MidiInput).unwrap();
        let probe = Probe {
            midi: Some(midi),
            ..Default::default()
        };
        let mut session = host.activate(probe).unwrap();

        let event = MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 10,
        };
        session.push_midi(midi, event).unwrap();
        session.push_midi(midi, event).unwrap();
        session.run_period(16);
        session.run_period(16);

        assert_eq!(session.handler().events, 2);
    }

    #[test]
    fn midi_to_audio_port_is_rejected() {
        let mut host = OfflineHost::new(44_100);
        let out = host.register_port("out", PortKind::AudioOutput).unwrap();
        let mut session = host.activate(Probe::default()).unwrap();
        let event = MidiEvent::ProgramChange {
            channel: 0,
            program: 0,
        };
        assert!(session.push_midi(out, event).is_err());
    }

    #[test]
    fn sample_rate_changes_reach_handler() {
        let host = OfflineHost::new(44_100);
        let mut session = host.activate(Probe::default()).unwrap();
        session.set_sample_rate(96_000);
        assert_eq!(session.handler().rate, 96_000);
        assert_eq!(session.sample_rate(), 96_000);
    }

    #[test]
    fn shutdown_notifies_callback() {
        let (tx, rx) = mpsc::channel();
        let mut host = OfflineHost::new(44_100);
        host.on_shutdown(Box::new(move |reason| {
            let _ = tx.send(reason);
        }));
        let session = host.activate(Probe::default()).unwrap();

        let _ = session.shut_down("server gone");

        assert_eq!(rx.recv().unwrap(), "server gone");
    }
}
