use crate::{
    config::EnvelopeConfig,
    dsp::envelope::EnvelopeState,
    graph::node::RenderCtx,
    io::converter::{midi_note_to_freq, velocity_to_amplitude},
    synth::{
        message::MAX_VELOCITY,
        voice::{Voice, VoiceBuffers, VoiceStatus, DEFAULT_STOP_GUARD},
    },
};

/// Number of addressable notes.
pub const NOTE_COUNT: usize = 128;

/*
Voice Table
===========

One slot per MIDI note. A slot holds at most one voice.

  note_on     empty slot  → build and start a voice
              busy slot   → ignored (no retrigger, no stacking), even while
                            the old voice is still releasing
              velocity 0  → note_off

  note_off    busy slot   → voice.stop(now); the slot stays busy

  render      mixes every voice; a voice that reports Disposed is removed
              right there, so the next note_on for that note succeeds

The table never disposes a voice itself. Disposal is driven by the voice's
own primary oscillator reaching its hard stop.
*/

pub struct VoiceTable {
    slots: Vec<Option<Voice>>,
    envelope: EnvelopeConfig,
    stop_guard: f32,
}

impl VoiceTable {
    pub fn new(envelope: EnvelopeConfig) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(NOTE_COUNT).collect(),
            envelope,
            stop_guard: DEFAULT_STOP_GUARD,
        }
    }

    pub fn with_stop_guard(mut self, seconds: f32) -> Self {
        self.stop_guard = seconds.max(0.0);
        self
    }

    /// Start a voice for `note`. Returns true if a new voice was created.
    pub fn note_on(&mut self, note: u8, velocity: u8, now: f64) -> bool {
        if velocity == 0 {
            self.note_off(note, now);
            return false;
        }

        let Some(slot) = self.slots.get_mut(note as usize) else {
            log::debug!("note {note} out of range, ignoring note on");
            return false;
        };

        if slot.is_some() {
            log::debug!("note {note} already has a voice, ignoring note on");
            return false;
        }

        let velocity = velocity.min(MAX_VELOCITY);
        let mut voice = Voice::new(
            midi_note_to_freq(note),
            velocity_to_amplitude(velocity),
            self.envelope,
        )
        .with_stop_guard(self.stop_guard);
        voice.start(now);
        *slot = Some(voice);
        true
    }

    /// Release the voice for `note`. Returns true if a release began.
    pub fn note_off(&mut self, note: u8, now: f64) -> bool {
        match self.slots.get_mut(note as usize) {
            Some(Some(voice)) => voice.stop(now).is_some(),
            Some(None) => {
                log::debug!("note {note} has no voice, ignoring note off");
                false
            }
            None => {
                log::debug!("note {note} out of range, ignoring note off");
                false
            }
        }
    }

    /// Release every voice, reporting each note that began releasing.
    pub fn release_all(&mut self, now: f64, mut on_released: impl FnMut(u8)) -> usize {
        let mut released = 0;
        for (note, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_mut().and_then(|voice| voice.stop(now)).is_some() {
                on_released(note as u8);
                released += 1;
            }
        }
        released
    }

    /// Mix all voices into `bus` and drop the ones that finished disposing.
    pub fn render(
        &mut self,
        bus: &mut [f32],
        buffers: &mut VoiceBuffers,
        ctx: &RenderCtx,
        mut on_disposed: impl FnMut(u8),
    ) {
        for (note, slot) in self.slots.iter_mut().enumerate() {
            let Some(voice) = slot.as_mut() else {
                continue;
            };

            if voice.render(bus, buffers, ctx) == VoiceStatus::Disposed {
                *slot = None;
                on_disposed(note as u8);
            }
        }
    }

    pub fn voice(&self, note: u8) -> Option<&Voice> {
        self.slots.get(note as usize)?.as_ref()
    }

    pub fn is_occupied(&self, note: u8) -> bool {
        self.voice(note).is_some()
    }

    /// Notes that currently hold a voice, with their envelope state at `now`.
    pub fn voices_at(&self, now: f64) -> impl Iterator<Item = (u8, EnvelopeState)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(note, slot)| {
            slot.as_ref().map(|voice| (note as u8, voice.state_at(now)))
        })
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}
