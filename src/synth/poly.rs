use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::SynthConfig,
    error::ConfigError,
    graph::{
        gain::GainNode,
        node::{GraphNode, RenderCtx},
    },
    io::converter::{midi_note_to_freq, velocity_to_amplitude},
    synth::{
        message::{SynthEvent, SynthHandle, SynthMessage, MAX_VELOCITY},
        table::VoiceTable,
        voice::VoiceBuffers,
    },
    MAX_BLOCK_SIZE,
};

/// The audio-thread side of the synth.
///
/// Owns the sample clock, the voice table and every scratch buffer. Each
/// `render_block` call drains pending control messages, timestamps them at
/// the start of the block, then mixes all voices through the master gain.
///
/// Every control input has its own SPSC queue. Inputs are drained in the
/// order they were added.
pub struct PolySynth {
    config: SynthConfig,
    table: VoiceTable,
    inputs: Vec<Consumer<SynthMessage>>,
    events_tx: Producer<SynthEvent>,
    events_rx: Option<Consumer<SynthEvent>>,
    buffers: VoiceBuffers,
    bus: Vec<f32>,
    master: GainNode,
    frame_counter: u64,
}

impl PolySynth {
    /// Build the engine and the control handle that feeds it.
    pub fn new(config: SynthConfig) -> Result<(Self, SynthHandle), ConfigError> {
        config.validate()?;

        let (tx, rx) = RingBuffer::new(config.queue_capacity);
        let (events_tx, events_rx) = RingBuffer::new(config.event_capacity);

        let synth = Self {
            config,
            table: VoiceTable::new(config.envelope).with_stop_guard(config.stop_guard),
            inputs: vec![rx],
            events_tx,
            events_rx: Some(events_rx),
            buffers: VoiceBuffers::new(),
            bus: vec![0.0; MAX_BLOCK_SIZE],
            master: GainNode::new(config.master_gain),
            frame_counter: 0,
        };

        Ok((synth, SynthHandle::new(tx)))
    }

    /// Open another control queue, e.g. one per MIDI port.
    ///
    /// Call this before the engine moves to the audio thread; it allocates.
    pub fn add_input(&mut self) -> SynthHandle {
        let (tx, rx) = RingBuffer::new(self.config.queue_capacity);
        self.inputs.push(rx);
        SynthHandle::new(tx)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Take the receiving end of the lifecycle event queue. Only the first
    /// call returns it.
    pub fn take_events(&mut self) -> Option<Consumer<SynthEvent>> {
        self.events_rx.take()
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn table(&self) -> &VoiceTable {
        &self.table
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.frame_counter as f64 / self.config.sample_rate as f64
    }

    pub fn frame(&self) -> u64 {
        self.frame_counter
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> bool {
        if velocity == 0 {
            self.note_off(note);
            return false;
        }

        let now = self.now();
        let started = self.table.note_on(note, velocity, now);
        if started {
            let velocity = velocity.min(MAX_VELOCITY);
            log::trace!("note {note} on, velocity {velocity}, at {now:.4}");
            self.publish(SynthEvent::VoiceStarted {
                note,
                frequency: midi_note_to_freq(note),
                amplitude: velocity_to_amplitude(velocity),
            });
        }
        started
    }

    pub fn note_off(&mut self, note: u8) -> bool {
        let now = self.now();
        let released = self.table.note_off(note, now);
        if released {
            log::trace!("note {note} off at {now:.4}");
            self.publish(SynthEvent::VoiceReleased { note });
        }
        released
    }

    pub fn all_notes_off(&mut self) {
        let now = self.now();
        let events_tx = &mut self.events_tx;
        let released = self.table.release_all(now, |note| {
            if events_tx.push(SynthEvent::VoiceReleased { note }).is_err() {
                log::debug!("event queue full, dropping release of note {note}");
            }
        });
        log::debug!("all notes off at {now:.4}, released {released} voices");
    }

    pub fn handle_message(&mut self, message: SynthMessage) {
        match message {
            SynthMessage::NoteOn { note, velocity } => {
                self.note_on(note, velocity);
            }
            SynthMessage::NoteOff { note } => {
                self.note_off(note);
            }
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Render mono output, advancing the clock by `out.len()` frames.
    pub fn render_block(&mut self, out: &mut [f32]) {
        // Process control messages
        for input in 0..self.inputs.len() {
            while let Ok(message) = self.inputs[input].pop() {
                self.handle_message(message);
            }
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            let ctx = RenderCtx::new(self.config.sample_rate, self.frame_counter);
            let bus = &mut self.bus[..chunk.len()];
            bus.fill(0.0);

            let events_tx = &mut self.events_tx;
            self.table.render(bus, &mut self.buffers, &ctx, |note| {
                log::trace!("note {note} disposed at {:.4}", ctx.time());
                if events_tx.push(SynthEvent::VoiceDisposed { note }).is_err() {
                    log::debug!("event queue full, dropping disposal of note {note}");
                }
            });

            self.master.render_block(bus, &ctx);
            chunk.copy_from_slice(bus);
            self.frame_counter += chunk.len() as u64;
        }
    }

    fn publish(&mut self, event: SynthEvent) {
        if self.events_tx.push(event).is_err() {
            log::debug!("event queue full, dropping {event:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::envelope::EnvelopeState;

    fn synth() -> (PolySynth, SynthHandle) {
        PolySynth::new(SynthConfig::with_sample_rate(8_000.0)).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = SynthConfig {
            sample_rate: 0.0,
            ..SynthConfig::default()
        };
        assert!(PolySynth::new(config).is_err());
    }

    #[test]
    fn silent_without_notes() {
        let (mut synth, _handle) = synth();
        let mut out = vec![1.0; 256];
        synth.render_block(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(synth.frame(), 256);
    }

    #[test]
    fn queued_notes_start_at_block_start() {
        let (mut synth, mut handle) = synth();
        let mut out = vec![0.0; 256];
        synth.render_block(&mut out);

        handle.note_on(69, 127).unwrap();
        synth.render_block(&mut out);

        let voice = synth.table().voice(69).unwrap();
        assert_eq!(voice.envelope().triggered_at(), Some(256.0 / 8_000.0));
        assert!(out.iter().any(|s| s.abs() > 0.0));
    }

    #[test]
    fn publishes_lifecycle_events() {
        let (mut synth, mut handle) = synth();
        let mut events = synth.take_events().unwrap();
        assert!(synth.take_events().is_none());

        handle.note_on(60, 100).unwrap();
        handle.note_on(60, 100).unwrap();
        handle.note_off(60).unwrap();

        let mut out = vec![0.0; 512];
        for _ in 0..20 {
            synth.render_block(&mut out);
        }

        let received: Vec<_> = std::iter::from_fn(|| events.pop().ok()).collect();
        assert_eq!(received.len(), 3);
        assert!(matches!(
            received[0],
            SynthEvent::VoiceStarted { note: 60, .. }
        ));
        assert_eq!(received[1], SynthEvent::VoiceReleased { note: 60 });
        assert_eq!(received[2], SynthEvent::VoiceDisposed { note: 60 });
        assert!(synth.table().is_empty());
    }

    #[test]
    fn extra_inputs_feed_the_same_table() {
        let (mut synth, mut keys) = synth();
        let mut midi = synth.add_input();
        assert_eq!(synth.input_count(), 2);

        keys.note_on(60, 100).unwrap();
        midi.note_on(64, 100).unwrap();
        midi.note_on(60, 90).unwrap();

        let mut out = vec![0.0; 256];
        synth.render_block(&mut out);

        assert_eq!(synth.table().active_count(), 2);
        // Queues drain in order, so the first handle owns note 60
        assert!((synth.table().voice(60).unwrap().peak() - 0.488).abs() < 1e-3);

        midi.note_off(60).unwrap();
        synth.render_block(&mut out);
        assert_eq!(
            synth.table().voice(60).unwrap().state_at(synth.now()),
            EnvelopeState::Release
        );
    }

    #[test]
    fn all_notes_off_releases_everything() {
        let (mut synth, mut handle) = synth();
        for note in [60, 64, 67] {
            handle.note_on(note, 100).unwrap();
        }
        let mut out = vec![0.0; 256];
        synth.render_block(&mut out);

        handle.all_notes_off().unwrap();
        synth.render_block(&mut out);

        let now = synth.now();
        assert!(synth
            .table()
            .voices_at(now)
            .all(|(_, state)| state == EnvelopeState::Release));
    }

    #[test]
    fn master_gain_scales_the_bus() {
        let loud = SynthConfig {
            master_gain: 1.0,
            ..SynthConfig::with_sample_rate(8_000.0)
        };
        let (mut a, _) = PolySynth::new(loud).unwrap();
        let (mut b, _) = synth();

        a.note_on(60, 127);
        b.note_on(60, 127);

        let mut out_a = vec![0.0; 512];
        let mut out_b = vec![0.0; 512];
        a.render_block(&mut out_a);
        b.render_block(&mut out_b);

        for (x, y) in out_a.iter().zip(&out_b) {
            assert!((x * 0.125 - y).abs() < 1e-6);
        }
    }

    #[test]
    fn long_blocks_are_chunked() {
        let (mut synth, _) = synth();
        synth.note_on(60, 100);

        let mut out = vec![0.0; MAX_BLOCK_SIZE * 3];
        synth.render_block(&mut out);

        assert_eq!(synth.frame(), (MAX_BLOCK_SIZE * 3) as u64);
        assert!(out[MAX_BLOCK_SIZE * 2..].iter().any(|s| s.abs() > 0.0));
    }
}
