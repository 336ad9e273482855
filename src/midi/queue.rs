// Inbound MIDI channel - lock-free, frame-stamped
//
// The midir callback thread pushes, the control loop pops. Messages carry
// the frame they were received at so the drain at the start of a cycle only
// consumes what happened up to that cycle's logical time.

use crate::midi::event::MidiEvent;
use ringbuf::traits::{Consumer, Split};
use ringbuf::HeapRb;

/// MIDI event stamped with the control-loop frame it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct TimedMessage {
    pub frame: u64,
    pub event: MidiEvent,
}

pub type MidiProducer = ringbuf::HeapProd<TimedMessage>;
pub type MidiConsumer = ringbuf::HeapCons<TimedMessage>;

pub fn create_midi_channel(capacity: usize) -> (MidiProducer, MidiInbound) {
    let rb = HeapRb::<TimedMessage>::new(capacity);
    let (tx, rx) = rb.split();
    (tx, MidiInbound { rx, pending: None })
}

/// Consumer half with frame gating. A popped message that is still in the
/// future is parked in `pending` and handed out on a later cycle.
pub struct MidiInbound {
    rx: MidiConsumer,
    pending: Option<TimedMessage>,
}

impl MidiInbound {
    /// Pop the next message with `frame <= current`, if any.
    pub fn pop_before(&mut self, frame: u64) -> Option<TimedMessage> {
        let msg = self.pending.take().or_else(|| self.rx.try_pop())?;
        if msg.frame > frame {
            self.pending = Some(msg);
            return None;
        }
        Some(msg)
    }

    /// Drop everything queued, including a parked message.
    pub fn clear(&mut self) {
        self.pending = None;
        while self.rx.try_pop().is_some() {}
    }
}
