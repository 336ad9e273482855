// ccbridge - MIDI controller-mapping bridge library exports

pub mod bridge;
pub mod midi;
pub mod patch;
pub mod session;
pub mod surface;

// Re-export commonly used types for convenience
pub use bridge::{Bridge, CcAddressMap, FileRequest, GroupThrottle, ProgramState};
pub use midi::event::MidiEvent;
pub use midi::output::CcOutput;
pub use midi::queue::{MidiInbound, MidiProducer, TimedMessage, create_midi_channel};
pub use patch::{PATCH_FIELD_COUNT, PatchError};
pub use session::{SessionError, SessionState};
pub use surface::Surface;
