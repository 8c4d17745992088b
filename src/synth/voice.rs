use crate::{
    config::EnvelopeConfig,
    dsp::envelope::{Envelope, EnvelopeState},
    graph::{
        filter::FilterNode,
        gain::GainNode,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
    MAX_BLOCK_SIZE,
};

/*
Voice Signal Graph
==================

One voice = one sounding note. Everything is derived from the note
frequency f:

    sine f ─────────────────────────────┐
    saw f·7/3 ──→ ×0.25 ────────────────┼──→ ring mod ──→ envelope ──→ lowpass ──→ bus
    triangle f/7/4 ──→ ×0.5 ────────────┘       ↑          (ADSR)     f + 2 kHz
                                                │                      Q = 2
    sine f/128 (modulator) ─────────────────────┘
                                    coefficient = 0 + modulator

The ring mod stage has no fixed gain of its own: its coefficient IS the slow
modulator waveform, so the summed harmonics swell, vanish and flip polarity
at f/128.


Lifecycle
---------

    new()      stores frequency, peak and envelope constants; no graph yet
    start(t0)  builds the graph, starts all four oscillators at t0 and writes
               the attack/decay/sustain schedule onto the envelope gain
    stop(ts)   pins and releases the envelope, schedules every oscillator to
               hard-stop at ts + release + guard
    render()   mixes into the bus; when the primary oscillator reports its
               completion the voice disposes itself and says so

Dispose drops the graph. Nodes are owned by value, so dropping the graph
severs every connection at once and nothing can keep rendering afterwards.
Every call on a disposed voice is a no-op.
*/

/// Harmonic oscillator frequency ratio.
pub const HARMONIC_RATIO: f32 = 7.0 / 3.0;
pub const HARMONIC_GAIN: f32 = 0.25;
/// Subharmonic oscillator runs at f / 7 / 4.
pub const SUBHARMONIC_DIVISOR: f32 = 7.0 * 4.0;
pub const SUBHARMONIC_GAIN: f32 = 0.5;
/// Ring modulator runs at f / 128.
pub const MODULATOR_DIVISOR: f32 = 128.0;
/// Lowpass cutoff sits this far above the note.
pub const FILTER_OFFSET_HZ: f32 = 2_000.0;
pub const FILTER_Q: f32 = 2.0;
/// Seconds the oscillators outlive the release ramp by default.
pub const DEFAULT_STOP_GUARD: f32 = 0.01;

/// What a render call did to the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStatus {
    /// Not started, nothing rendered
    Idle,
    /// Graph rendered into the bus
    Playing,
    /// Primary oscillator completed, the graph is gone
    Disposed,
}

/// Scratch space for rendering voices, owned by the engine so that voices
/// themselves never allocate.
pub struct VoiceBuffers {
    signal: Vec<f32>,
    harmonic: Vec<f32>,
    subharmonic: Vec<f32>,
    modulator: Vec<f32>,
}

impl VoiceBuffers {
    pub fn new() -> Self {
        Self {
            signal: vec![0.0; MAX_BLOCK_SIZE],
            harmonic: vec![0.0; MAX_BLOCK_SIZE],
            subharmonic: vec![0.0; MAX_BLOCK_SIZE],
            modulator: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl Default for VoiceBuffers {
    fn default() -> Self {
        Self::new()
    }
}

struct VoiceGraph {
    primary: OscNode,
    harmonic: OscNode,
    harmonic_scale: GainNode,
    subharmonic: OscNode,
    subharmonic_scale: GainNode,
    modulator: OscNode,
    ring_mod: GainNode,
    amp_env: GainNode,
    lowpass: FilterNode,
}

impl VoiceGraph {
    fn new(frequency: f32) -> Self {
        Self {
            primary: OscNode::sine(frequency),
            harmonic: OscNode::sawtooth(frequency * HARMONIC_RATIO),
            harmonic_scale: GainNode::new(HARMONIC_GAIN),
            subharmonic: OscNode::triangle(frequency / SUBHARMONIC_DIVISOR),
            subharmonic_scale: GainNode::new(SUBHARMONIC_GAIN),
            modulator: OscNode::sine(frequency / MODULATOR_DIVISOR),
            ring_mod: GainNode::new(0.0),
            amp_env: GainNode::new(0.0),
            lowpass: FilterNode::lowpass(frequency + FILTER_OFFSET_HZ).with_q(FILTER_Q),
        }
    }

    fn oscillators(&mut self) -> [&mut OscNode; 4] {
        [
            &mut self.primary,
            &mut self.harmonic,
            &mut self.subharmonic,
            &mut self.modulator,
        ]
    }

    fn start(&mut self, at: f64) {
        for osc in self.oscillators() {
            osc.start(at);
        }
    }

    fn stop(&mut self, at: f64) {
        for osc in self.oscillators() {
            osc.stop(at);
        }
    }

    fn render(&mut self, bus: &mut [f32], buffers: &mut VoiceBuffers, ctx: &RenderCtx) {
        for (chunk_idx, bus) in bus.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let ctx = ctx.advanced(chunk_idx * MAX_BLOCK_SIZE);
            let len = bus.len();
            let signal = &mut buffers.signal[..len];
            let harmonic = &mut buffers.harmonic[..len];
            let subharmonic = &mut buffers.subharmonic[..len];
            let modulator = &mut buffers.modulator[..len];

            self.primary.render_block(signal, &ctx);

            self.harmonic.render_block(harmonic, &ctx);
            self.harmonic_scale.render_block(harmonic, &ctx);

            self.subharmonic.render_block(subharmonic, &ctx);
            self.subharmonic_scale.render_block(subharmonic, &ctx);

            // Summing junction into the ring mod input
            for ((s, h), u) in signal.iter_mut().zip(harmonic.iter()).zip(subharmonic.iter()) {
                *s += h + u;
            }

            self.modulator.render_block(modulator, &ctx);
            self.ring_mod.process(signal, &ctx, Some(modulator));

            self.amp_env.render_block(signal, &ctx);
            self.lowpass.render_block(signal, &ctx);

            for (out, s) in bus.iter_mut().zip(signal.iter()) {
                *out += s;
            }
        }
    }
}

pub struct Voice {
    frequency: f32,
    envelope: Envelope,
    stop_guard: f32,
    stop_at: Option<f64>,
    graph: Option<VoiceGraph>,
    disposed: bool,
}

impl Voice {
    /// Describe a voice. No audio nodes exist until `start`.
    pub fn new(frequency: f32, peak: f32, envelope: EnvelopeConfig) -> Self {
        Self {
            frequency,
            envelope: Envelope::new(envelope, peak),
            stop_guard: DEFAULT_STOP_GUARD,
            stop_at: None,
            graph: None,
            disposed: false,
        }
    }

    pub fn with_stop_guard(mut self, seconds: f32) -> Self {
        self.stop_guard = seconds.max(0.0);
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn peak(&self) -> f32 {
        self.envelope.peak()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Time at which every oscillator hard-stops, once released.
    pub fn stop_time(&self) -> Option<f64> {
        self.stop_at
    }

    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn state_at(&self, time: f64) -> EnvelopeState {
        if self.disposed {
            EnvelopeState::Disposed
        } else {
            self.envelope.state_at(time)
        }
    }

    /// Envelope gain at `time`, for any time not before the last rendered block.
    pub fn gain_at(&self, time: f64) -> Option<f32> {
        self.graph
            .as_ref()
            .map(|graph| graph.amp_env.gain().value_at(time))
    }

    /// Build the graph and schedule attack → decay → sustain from `now`.
    pub fn start(&mut self, now: f64) -> bool {
        if self.disposed || self.graph.is_some() {
            log::debug!("voice at {:.2} Hz already started, ignoring start", self.frequency);
            return false;
        }

        let mut graph = VoiceGraph::new(self.frequency);
        graph.start(now);
        self.envelope.trigger(graph.amp_env.gain_mut(), now);
        self.graph = Some(graph);

        log::trace!("voice at {:.2} Hz started at {now:.4}", self.frequency);
        true
    }

    /// Begin the release at `now`. Returns the oscillator hard-stop time, or
    /// `None` when the voice is not running or already releasing.
    pub fn stop(&mut self, now: f64) -> Option<f64> {
        let Some(graph) = self.graph.as_mut() else {
            log::debug!("voice at {:.2} Hz has no graph, ignoring stop", self.frequency);
            return None;
        };

        let Some(release_end) = self.envelope.release(graph.amp_env.gain_mut(), now) else {
            log::debug!("voice at {:.2} Hz already releasing, ignoring stop", self.frequency);
            return None;
        };

        let stop_at = release_end + self.stop_guard as f64;
        graph.stop(stop_at);
        self.stop_at = Some(stop_at);

        log::trace!(
            "voice at {:.2} Hz released at {now:.4}, stops at {stop_at:.4}",
            self.frequency
        );
        Some(stop_at)
    }

    /// Mix this voice into `bus`. Disposes the voice when its primary
    /// oscillator reports completion.
    pub fn render(
        &mut self,
        bus: &mut [f32],
        buffers: &mut VoiceBuffers,
        ctx: &RenderCtx,
    ) -> VoiceStatus {
        let Some(graph) = self.graph.as_mut() else {
            return if self.disposed {
                VoiceStatus::Disposed
            } else {
                VoiceStatus::Idle
            };
        };

        graph.render(bus, buffers, ctx);

        if graph.primary.take_completion() {
            self.dispose();
            return VoiceStatus::Disposed;
        }
        VoiceStatus::Playing
    }

    fn dispose(&mut self) {
        if let Some(graph) = self.graph.take() {
            log::trace!("voice at {:.2} Hz disposed", self.frequency);
            drop(graph);
        }
        self.disposed = true;
    }
}
