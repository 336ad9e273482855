// MIDI types events

/// The two message types the bridge speaks. Everything else on the wire
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
}

impl MidiEvent {
    /// Parse un RAW MIDI message
    ///
    /// The channel nibble is ignored; the value byte is kept raw (8 bits) so
    /// the bridge can interpret it as two's complement where needed.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }

        let status = bytes[0];
        let message_type = status & 0xF0;

        match message_type {
            0xB0 => {
                // Control Change
                if bytes.len() >= 3 {
                    Some(MidiEvent::ControlChange {
                        controller: bytes[1] & 0x7F,
                        value: bytes[2],
                    })
                } else {
                    None
                }
            }
            0xC0 => {
                // Program Change (single data byte)
                if bytes.len() >= 2 {
                    Some(MidiEvent::ProgramChange {
                        program: bytes[1] & 0x7F,
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Encode for the output port (channel 0).
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiEvent::ControlChange { controller, value } => vec![0xB0, controller, value],
            MidiEvent::ProgramChange { program } => vec![0xC0, program],
        }
    }
}
