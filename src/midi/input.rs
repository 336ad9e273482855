// MIDI Input - Réception des événements MIDI

use crate::midi::event::MidiEvent;
use crate::midi::queue::{MidiProducer, TimedMessage};
use midir::{MidiInput as MidirInput, MidiInputConnection};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct MidiInputPort {
    _connection: Option<MidiInputConnection<()>>,
}

impl MidiInputPort {
    /// Connect to a MIDI input port and forward CC/PC events into the
    /// bridge's inbound channel, stamped with the current control frame.
    ///
    /// `port_name` selects a port by name; `None` takes the first available.
    pub fn new(
        mut midi_tx: MidiProducer,
        frame_counter: Arc<AtomicU64>,
        port_name: Option<&str>,
    ) -> Result<Self, String> {
        let midi_in =
            MidirInput::new("ccbridge input").map_err(|e| format!("Midi init error: {}", e))?;

        let ports = midi_in.ports();
        if ports.is_empty() {
            println!("No MIDI input port detected. The bridge will run without MIDI input.");
            return Ok(Self { _connection: None });
        }

        println!("\n=== MIDI input ports ===");
        for (i, port) in ports.iter().enumerate() {
            if let Ok(name) = midi_in.port_name(port) {
                println!("  [{}] {}", i, name);
            }
        }

        let port = match port_name {
            Some(wanted) => ports
                .iter()
                .find(|p| {
                    midi_in
                        .port_name(p)
                        .map(|name| name == wanted)
                        .unwrap_or(false)
                })
                .ok_or_else(|| format!("MIDI input port '{}' not found", wanted))?,
            None => &ports[0],
        };
        let chosen = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());
        println!("\nConnected to MIDI input: {}", chosen);

        let connection = midi_in
            .connect(
                port,
                "ccbridge-input",
                move |_timestamp, message, _| {
                    // MIDI callback - running on a separate thread
                    if let Some(event) = MidiEvent::from_bytes(message) {
                        let msg = TimedMessage {
                            frame: frame_counter.load(Ordering::Relaxed),
                            event,
                        };
                        // try_push is not blocking; a full ring means we drop
                        if ringbuf::traits::Producer::try_push(&mut midi_tx, msg).is_err() {
                            eprintln!("MIDI inbound ringbuffer full, message dropped");
                        }
                    }
                },
                (),
            )
            .map_err(|e| format!("Midi connection error: {}", e))?;

        Ok(Self {
            _connection: Some(connection),
        })
    }
}
