//! Header widget - key, scale, octave and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ringvoice::theory::{pitch_classes, Key};

use super::PlayState;

/// Output level over the scope window
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_header(frame: &mut Frame, area: Rect, play: &PlayState, stats: &AudioStats) {
    let block = Block::default().title(" ringvoice ").borders(Borders::ALL);

    let settings = Line::from(vec![
        Span::styled(format!(" Key: {}  ", play.key), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("Scale: {}  ", play.scale),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("Octave: {}  ", play.octave),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", play.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("MIDI: {}  ", play.midi_ports),
            Style::default().fg(if play.midi_ports > 0 { Color::Yellow } else { Color::DarkGray }),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    // Pitch classes the keyboard rows are mapped onto
    let classes: Vec<&str> = pitch_classes(play.key, play.scale)
        .iter()
        .map(|&pc| Key::from_offset(pc).name())
        .collect();
    let notes = Line::from(Span::styled(
        format!(" {}", classes.join("  ")),
        Style::default().fg(Color::DarkGray),
    ));

    let paragraph = Paragraph::new(vec![settings, notes]).block(block);
    frame.render_widget(paragraph, area);
}
