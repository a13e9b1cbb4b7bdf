use anyhow::{anyhow, bail, Context, Result};
use midi_msg::{ChannelVoiceMsg, MidiMsg};
use midir::{Ignore, MidiInput, MidiInputConnection};
use shared::domain::SurfaceEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, trace, warn};

const CLIENT_NAME: &str = "midi-tci-bridge";

pub fn list_ports() -> Result<Vec<String>> {
    let midi_in = MidiInput::new(CLIENT_NAME).context("failed to create MIDI input")?;
    Ok(port_names(&midi_in))
}

fn port_names(midi_in: &MidiInput) -> Vec<String> {
    midi_in
        .ports()
        .iter()
        .enumerate()
        .map(|(idx, port)| {
            midi_in
                .port_name(port)
                .unwrap_or_else(|_| format!("MIDI Input {idx}"))
        })
        .collect()
}

pub fn select_port(names: &[String], query: Option<&str>) -> Result<usize> {
    let available = || {
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    };

    match query {
        Some(query) => {
            let needle = query.to_lowercase();
            names
                .iter()
                .position(|name| name.to_lowercase().contains(&needle))
                .ok_or_else(|| {
                    anyhow!(
                        "no MIDI input port matches '{query}' (available: {})",
                        available()
                    )
                })
        }
        None if names.len() == 1 => Ok(0),
        None => bail!(
            "set a MIDI port with --midi-port or MIDI_PORT (available: {})",
            available()
        ),
    }
}

pub fn decode(message: &[u8]) -> Option<SurfaceEvent> {
    let (msg, _len) = MidiMsg::from_midi(message).ok()?;
    match msg {
        // Controller and value come from the raw bytes; the typed form folds
        // the low controllers into 14-bit pairs.
        MidiMsg::ChannelVoice {
            msg: ChannelVoiceMsg::ControlChange { .. },
            ..
        } => match message {
            [_, control, value, ..] => Some(SurfaceEvent::new(*control, *value)),
            _ => None,
        },
        _ => None,
    }
}

pub fn open_input(
    query: Option<&str>,
    events: UnboundedSender<SurfaceEvent>,
) -> Result<MidiInputConnection<()>> {
    let mut midi_in = MidiInput::new(CLIENT_NAME).context("failed to create MIDI input")?;
    midi_in.ignore(Ignore::All);

    let names = port_names(&midi_in);
    let index = select_port(&names, query)?;
    let ports = midi_in.ports();
    let port = ports
        .get(index)
        .ok_or_else(|| anyhow!("MIDI input port disappeared while opening"))?;
    let name = names[index].clone();

    let connection = midi_in
        .connect(
            port,
            "midi-tci-bridge-input",
            move |_stamp, message, _| match decode(message) {
                Some(event) => {
                    if events.send(event).is_err() {
                        warn!("midi: event channel closed");
                    }
                }
                None => trace!(?message, "midi: ignoring non-CC message"),
            },
            (),
        )
        .map_err(|err| anyhow!("failed to connect MIDI input '{name}': {err}"))?;
    info!(port = %name, "midi: input open");
    Ok(connection)
}
