// Outbound MIDI sink - per-CC deduplication
//
// Every CC write goes through a global 128-entry last-value cache: a value
// equal to the last one sent for that CC number is dropped before it reaches
// the wire. Program Changes are never deduplicated. Messages are buffered
// here and drained by the host once per cycle.

use crate::midi::event::MidiEvent;

pub struct CcOutput {
    last_values: [Option<u8>; 128],
    queue: Vec<MidiEvent>,
}

impl Default for CcOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl CcOutput {
    pub fn new() -> Self {
        Self {
            last_values: [None; 128],
            queue: Vec::with_capacity(64),
        }
    }

    /// Forget all last-sent values, so the next write per CC always emits.
    pub fn reset(&mut self) {
        self.last_values = [None; 128];
        self.queue.clear();
    }

    /// Queue a CC message unless it repeats the last value sent on `cc`.
    pub fn set_value(&mut self, value: i32, cc: u8) {
        let value = value.clamp(0, 127) as u8;
        if self.last_values[cc as usize] == Some(value) {
            return;
        }
        self.last_values[cc as usize] = Some(value);
        self.queue.push(MidiEvent::ControlChange {
            controller: cc,
            value,
        });
    }

    pub fn send_program(&mut self, program: u8) {
        self.queue.push(MidiEvent::ProgramChange {
            program: program & 0x7F,
        });
    }

    /// Drain everything queued since the last call.
    pub fn take_messages(&mut self) -> Vec<MidiEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_per_cc() {
        let mut out = CcOutput::new();
        out.set_value(64, 10);
        out.set_value(64, 10); // duplicate, dropped
        out.set_value(65, 10);
        out.set_value(64, 11); // same value, different CC: goes through

        let msgs = out.take_messages();
        assert_eq!(msgs.len(), 3);
        assert_eq!(
            msgs[0],
            MidiEvent::ControlChange {
                controller: 10,
                value: 64
            }
        );
        assert_eq!(
            msgs[2],
            MidiEvent::ControlChange {
                controller: 11,
                value: 64
            }
        );
    }

    #[test]
    fn test_reset_clears_cache() {
        let mut out = CcOutput::new();
        out.set_value(64, 10);
        out.take_messages();

        out.set_value(64, 10);
        assert!(out.take_messages().is_empty());

        out.reset();
        out.set_value(64, 10);
        assert_eq!(out.take_messages().len(), 1);
    }

    #[test]
    fn test_values_clamped() {
        let mut out = CcOutput::new();
        out.set_value(300, 10);
        out.set_value(-5, 11);

        let msgs = out.take_messages();
        assert_eq!(
            msgs[0],
            MidiEvent::ControlChange {
                controller: 10,
                value: 127
            }
        );
        assert_eq!(
            msgs[1],
            MidiEvent::ControlChange {
                controller: 11,
                value: 0
            }
        );
    }

    #[test]
    fn test_program_change_not_deduplicated() {
        let mut out = CcOutput::new();
        out.send_program(5);
        out.send_program(5);
        assert_eq!(out.take_messages().len(), 2);
    }
}
