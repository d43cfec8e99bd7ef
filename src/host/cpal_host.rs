use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::{Error, Result};
use crate::host::{
    AudioHost, Period, PortId, PortKind, PortRegistry, ProcessHandler, ShutdownCallback,
};
use crate::io::midi::MidiEvent;
use crate::MAX_PERIOD_FRAMES;

/// Events a MIDI input port can hold between two periods.
pub const MIDI_QUEUE_CAPACITY: usize = 256;

/// Host backed by the default cpal output device.
///
/// Audio ports map onto the device's interleaved channels in the order they
/// were registered; surplus device channels are silent. cpal has no MIDI, so
/// each MIDI input port is a ring buffer fed by whoever takes its producer
/// with [`CpalHost::take_midi_feed`].
pub struct CpalHost {
    client_name: String,
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    ports: PortRegistry,
    midi_inputs: Vec<Consumer<MidiEvent>>,
    midi_feeds: Vec<Option<Producer<MidiEvent>>>,
    shutdown: Option<ShutdownCallback>,
}

impl CpalHost {
    pub fn open(client_name: &str) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(Error::NoOutputDevice)?;
        let config = device.default_output_config()?;

        log::info!(
            "{client_name}: using {} ({} channels, {} Hz)",
            device.name().unwrap_or_else(|_| "unknown device".into()),
            config.channels(),
            config.sample_rate().0
        );

        Ok(Self {
            client_name: client_name.to_owned(),
            device,
            config,
            ports: PortRegistry::default(),
            midi_inputs: Vec::new(),
            midi_feeds: Vec::new(),
            shutdown: None,
        })
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    /// Producer side of a MIDI input port. Can be taken once.
    pub fn take_midi_feed(&mut self, port: PortId) -> Option<Producer<MidiEvent>> {
        if port.kind() != PortKind::MidiInput {
            return None;
        }
        self.midi_feeds.get_mut(port.index())?.take()
    }
}

impl AudioHost for CpalHost {
    type Session<P: ProcessHandler + 'static> = CpalSession;

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    fn register_port(&mut self, name: &str, kind: PortKind) -> Result<PortId> {
        let port = self.ports.register(name, kind)?;
        match kind {
            PortKind::AudioOutput => {
                if port.index() >= self.channels() {
                    log::warn!(
                        "{}: port {name} has no device channel and will not be heard",
                        self.client_name
                    );
                }
            }
            PortKind::MidiInput => {
                let (producer, consumer) = RingBuffer::new(MIDI_QUEUE_CAPACITY);
                self.midi_inputs.push(consumer);
                self.midi_feeds.push(Some(producer));
            }
        }
        log::debug!("{}: registered {kind:?} port {name}", self.client_name);
        Ok(port)
    }

    fn on_shutdown(&mut self, callback: ShutdownCallback) {
        self.shutdown = Some(callback);
    }

    fn activate<P: ProcessHandler + 'static>(self, mut handler: P) -> Result<CpalSession> {
        let sample_rate = self.sample_rate();
        log::info!("sample rate is now {sample_rate}/sec");
        handler.sample_rate_changed(sample_rate);

        let channels = self.channels();
        let stream_config: cpal::StreamConfig = self.config.into();

        let mut audio = vec![vec![0.0f32; MAX_PERIOD_FRAMES]; self.ports.audio_ports().len()];
        let mut midi: Vec<Vec<MidiEvent>> = (0..self.midi_inputs.len())
            .map(|_| Vec::with_capacity(MIDI_QUEUE_CAPACITY))
            .collect();
        let mut midi_inputs = self.midi_inputs;
        let mut shutdown = self.shutdown;

        let stream = self.device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_PERIOD_FRAMES);

                    // MIDI goes to the first chunk of a device period only
                    for (input, events) in midi_inputs.iter_mut().zip(midi.iter_mut()) {
                        events.clear();
                        if frames_written == 0 {
                            while events.len() < events.capacity() {
                                match input.pop() {
                                    Ok(event) => events.push(event),
                                    Err(_) => break,
                                }
                            }
                        }
                    }

                    let mut period = Period::new(frames, &mut audio, &midi);
                    handler.process(&mut period);

                    let out_off = frames_written * channels;
                    let out = &mut data[out_off..out_off + frames * channels];
                    for (i, frame) in out.chunks_exact_mut(channels).enumerate() {
                        for (ch, sample) in frame.iter_mut().enumerate() {
                            *sample = audio.get(ch).map_or(0.0, |buf| buf[i]);
                        }
                    }

                    frames_written += frames;
                }
            },
            move |err| {
                if matches!(err, cpal::StreamError::DeviceNotAvailable) {
                    if let Some(notify) = shutdown.as_mut() {
                        notify(err.to_string());
                        return;
                    }
                }
                log::error!("audio stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        log::info!(
            "{}: active with {} audio and {} MIDI ports",
            self.client_name,
            self.ports.audio_ports().len(),
            self.ports.midi_ports().len()
        );

        Ok(CpalSession {
            _stream: stream,
            client_name: self.client_name,
        })
    }
}

/// Running cpal stream. Audio stops when this is dropped.
pub struct CpalSession {
    _stream: cpal::Stream,
    client_name: String,
}

impl CpalSession {
    pub fn client_name(&self) -> &str {
        &self.client_name
    }
}

impl Drop for CpalSession {
    fn drop(&mut self) {
        log::info!("{}: closing stream", self.client_name);
    }
}
