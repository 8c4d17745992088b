//! TUI module for ringvoice
//!
//! Turns key presses into notes and shows what the audio thread is doing.

mod header;
mod keyboard;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use ringvoice::{
    synth::message::SynthEvent,
    theory::{Key, Scale},
    SynthError, SynthHandle,
};
use rtrb::Consumer;
use std::time::{Duration, Instant};

use header::{render_header, AudioStats};
use keyboard::{Gates, KeyAction};
use voices::{render_voices, VoiceList};
use waveform::render_waveform;

/// Samples kept for the oscilloscope
pub const SCOPE_BUFFER_SIZE: usize = 1024;

/// What the keyboard is currently mapped to.
#[derive(Debug, Clone, Copy)]
pub struct PlayState {
    pub key: Key,
    pub scale: Scale,
    pub octave: i8,
    pub sample_rate: f32,
    pub midi_ports: usize,
}

pub struct UiApp {
    handle: SynthHandle,
    events: Consumer<SynthEvent>,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    play: PlayState,
    gates: Gates,
    voices: VoiceList,
    status: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        handle: SynthHandle,
        events: Consumer<SynthEvent>,
        scope_rx: Consumer<f32>,
        play: PlayState,
        gate: Duration,
    ) -> Self {
        Self {
            handle,
            events,
            scope_rx,
            scope: vec![0.0; SCOPE_BUFFER_SIZE],
            play,
            gates: Gates::new(gate),
            voices: VoiceList::default(),
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.poll_events();
            self.close_gates(Instant::now());

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        // Let nothing ring on after the terminal is restored
        let _ = self.handle.all_notes_off();
        Ok(())
    }

    /// Keep the newest SCOPE_BUFFER_SIZE samples
    fn poll_scope(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }

        let keep = available.min(SCOPE_BUFFER_SIZE);
        self.scope.drain(..keep);
        for _ in 0..available - keep {
            let _ = self.scope_rx.pop();
        }
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
    }

    fn poll_events(&mut self) {
        while let Ok(event) = self.events.pop() {
            self.voices.apply(event);
        }
    }

    fn close_gates(&mut self, now: Instant) {
        for note in self.gates.expired(now) {
            let result = self.handle.note_off(note);
            self.report(result);
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let Some(action) = keyboard::map_key(code) else {
            return;
        };
        self.status = None;

        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Play { degree, octave_up } => {
                let octave = self.play.octave + octave_up as i8;
                let Some(note) = self.play.scale.note(self.play.key, degree, octave) else {
                    self.status = Some(format!("degree {degree} is out of range at octave {octave}"));
                    return;
                };
                if self.gates.open(note, Instant::now()) {
                    let result = self.handle.note_on(note, keyboard::VELOCITY);
                    self.report(result);
                }
            }
            KeyAction::KeyUp => self.play.key = self.play.key.up(),
            KeyAction::KeyDown => self.play.key = self.play.key.down(),
            KeyAction::OctaveUp => self.play.octave = (self.play.octave + 1).min(keyboard::MAX_OCTAVE),
            KeyAction::OctaveDown => self.play.octave = (self.play.octave - 1).max(keyboard::MIN_OCTAVE),
            KeyAction::NextScale => self.play.scale = self.play.scale.next(),
            KeyAction::PreviousScale => self.play.scale = self.play.scale.previous(),
            KeyAction::Panic => {
                self.gates.clear();
                let result = self.handle.all_notes_off();
                self.report(result);
            }
        }
    }

    fn report(&mut self, result: Result<(), SynthError>) {
        if let Err(err) = result {
            log::warn!("{err}");
            self.status = Some(err.to_string());
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: header, voices, waveform, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Key, scale, stats
                Constraint::Min(6),    // Live voices
                Constraint::Length(10), // Waveform
                Constraint::Length(1), // Help / status
            ])
            .split(area);

        render_header(frame, chunks[0], &self.play, &AudioStats::from_buffer(&self.scope));
        render_voices(frame, chunks[1], &self.voices);
        render_waveform(frame, chunks[2], &self.scope);

        let help = match &self.status {
            Some(status) => Paragraph::new(format!(" {status}")).style(Style::default().fg(Color::Red)),
            None => Paragraph::new(
                " [A-;] Play  [1-0] Play +8va  [←/→] Key  [↑/↓] Octave  [Tab] Scale  [Space] All off  [Q] Quit",
            )
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(help, chunks[3]);
    }
}
