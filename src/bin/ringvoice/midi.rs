//! Hardware MIDI input
//!
//! Every input port present at startup gets its own control queue into the
//! engine, so port callbacks never contend with the UI or with each other.

use midir::{MidiInput, MidiInputConnection};
use ringvoice::{
    io::{converter::midi_to_synth, midi::MidiEvent},
    PolySynth, SynthHandle,
};

const CLIENT_NAME: &str = "ringvoice";

/// Open port connections. Dropping this closes them.
pub struct MidiInputs {
    connections: Vec<MidiInputConnection<SynthHandle>>,
}

impl MidiInputs {
    /// Connect every available input port to `synth`.
    ///
    /// Missing MIDI support or a port that refuses the connection is logged
    /// and skipped; the terminal keyboard still works without any ports.
    pub fn connect_all(synth: &mut PolySynth, channel: Option<u8>) -> Self {
        let mut inputs = Self {
            connections: Vec::new(),
        };

        let names = match MidiInput::new(CLIENT_NAME) {
            Ok(midi_in) => midi_in
                .ports()
                .iter()
                .filter_map(|port| midi_in.port_name(port).ok())
                .collect::<Vec<_>>(),
            Err(err) => {
                log::warn!("MIDI input unavailable: {err}");
                return inputs;
            }
        };

        for name in names {
            match connect(&name, synth.add_input(), channel) {
                Ok(connection) => {
                    log::info!("listening on MIDI port {name:?}");
                    inputs.connections.push(connection);
                }
                Err(err) => log::warn!("{err}"),
            }
        }

        inputs
    }

    pub fn port_count(&self) -> usize {
        self.connections.len()
    }
}

/// `connect` consumes the client, so each port gets a fresh one.
fn connect(
    name: &str,
    handle: SynthHandle,
    channel: Option<u8>,
) -> Result<MidiInputConnection<SynthHandle>, String> {
    let midi_in = MidiInput::new(CLIENT_NAME)
        .map_err(|e| format!("failed to create MIDI input: {e}"))?;

    let port = midi_in
        .ports()
        .into_iter()
        .find(|p| midi_in.port_name(p).ok().as_deref() == Some(name))
        .ok_or_else(|| format!("MIDI port {name:?} disappeared"))?;

    midi_in
        .connect(
            &port,
            "ringvoice-input",
            move |_timestamp_us, bytes, handle: &mut SynthHandle| {
                let Some(message) =
                    MidiEvent::parse(bytes).and_then(|event| midi_to_synth(event, channel))
                else {
                    return;
                };
                if let Err(err) = handle.send(message) {
                    log::warn!("{err}");
                }
            },
            handle,
        )
        .map_err(|e| format!("failed to connect to MIDI port {name:?}: {e}"))
}
