//! Live voice list, rebuilt from the synth's lifecycle events

use std::collections::BTreeMap;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use ringvoice::synth::message::SynthEvent;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

#[derive(Debug, Clone, Copy)]
pub struct VoiceView {
    pub frequency: f32,
    pub amplitude: f32,
    pub releasing: bool,
}

/// Voices the audio thread currently holds, keyed by note.
#[derive(Debug, Default)]
pub struct VoiceList {
    voices: BTreeMap<u8, VoiceView>,
}

impl VoiceList {
    pub fn apply(&mut self, event: SynthEvent) {
        match event {
            SynthEvent::VoiceStarted {
                note,
                frequency,
                amplitude,
            } => {
                self.voices.insert(
                    note,
                    VoiceView {
                        frequency,
                        amplitude,
                        releasing: false,
                    },
                );
            }
            SynthEvent::VoiceReleased { note } => {
                if let Some(voice) = self.voices.get_mut(&note) {
                    voice.releasing = true;
                }
            }
            SynthEvent::VoiceDisposed { note } => {
                self.voices.remove(&note);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u8, &VoiceView)> {
        self.voices.iter()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

pub fn render_voices(frame: &mut Frame, area: Rect, voices: &VoiceList) {
    let block = Block::default()
        .title(format!(" Voices ({}) ", voices.len()))
        .borders(Borders::ALL);

    if voices.is_empty() {
        let idle = Paragraph::new(" silent").style(Style::default().fg(Color::DarkGray)).block(block);
        frame.render_widget(idle, area);
        return;
    }

    let lines: Vec<Line> = voices
        .iter()
        .map(|(&note, voice)| {
            let (state, color) = if voice.releasing {
                ("release", Color::Yellow)
            } else {
                ("held", Color::Green)
            };
            Line::from(vec![
                Span::styled(format!(" {:<4}", note_name(note)), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:>8.2} Hz  ", voice.frequency)),
                Span::styled(
                    format!("amp {:.3}  ", voice.amplitude),
                    Style::default().fg(Color::Magenta),
                ),
                Span::styled(state, Style::default().fg(color)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_lifecycle_events() {
        let mut list = VoiceList::default();
        list.apply(SynthEvent::VoiceStarted {
            note: 60,
            frequency: 261.63,
            amplitude: 0.488,
        });
        list.apply(SynthEvent::VoiceReleased { note: 60 });
        assert!(list.iter().all(|(_, v)| v.releasing));

        list.apply(SynthEvent::VoiceDisposed { note: 60 });
        assert!(list.is_empty());
    }

    #[test]
    fn names_notes() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
    }
}
