//! Ringvoice - audio setup and application runner

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;

use ringvoice::{
    theory::{Key, Scale},
    PolySynth, SynthConfig, MAX_BLOCK_SIZE,
};

use super::{
    midi::MidiInputs,
    ui::{PlayState, UiApp, SCOPE_BUFFER_SIZE},
};

/// How long a key press holds its note before the note-off is sent.
const DEFAULT_GATE: Duration = Duration::from_millis(350);

/// Main application builder
pub struct Ringvoice {
    key: Key,
    scale: Scale,
    octave: i8,
    gate: Duration,
    midi_channel: Option<u8>,
}

impl Ringvoice {
    pub fn new() -> Self {
        Self {
            key: Key::C,
            scale: Scale::Major,
            octave: 4,
            gate: DEFAULT_GATE,
            midi_channel: None,
        }
    }

    pub fn key(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn octave(mut self, octave: i8) -> Self {
        self.octave = octave;
        self
    }

    /// Listen on one MIDI channel (0-15) instead of all of them.
    pub fn midi_channel(mut self, channel: Option<u8>) -> Self {
        self.midi_channel = channel;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!("output at {sample_rate} Hz, {channels} channels");

        let (mut synth, handle) = PolySynth::new(SynthConfig::with_sample_rate(sample_rate))
            .wrap_err("invalid synth configuration")?;
        let events = synth
            .take_events()
            .ok_or_else(|| eyre!("synth event queue already taken"))?;

        // Ports get their queues before the engine moves to the audio thread
        let midi = MidiInputs::connect_all(&mut synth, self.midi_channel);

        // Oscilloscope tap: audio thread → UI
        let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_BUFFER_SIZE * 4);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];

                    // Drains queued notes, then renders every voice
                    synth.render_block(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        let frame = out_off + i * channels;
                        data[frame..frame + channels].fill(s);
                        // Scope drops samples while the UI lags behind
                        let _ = scope_tx.push(s);
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| eprintln!("Audio error: {}", err),
            None,
        )?;

        // Audio only starts flowing once the stream is running
        stream.play().wrap_err("failed to start output stream")?;

        let play_state = PlayState {
            key: self.key,
            scale: self.scale,
            octave: self.octave,
            sample_rate,
            midi_ports: midi.port_count(),
        };

        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, events, scope_rx, play_state, self.gate).run(&mut terminal);
        ratatui::restore();

        drop(midi);
        drop(stream);
        result
    }
}

impl Default for Ringvoice {
    fn default() -> Self {
        Self::new()
    }
}
