// Session state - learned CC map and raw input values
//
// Saved into the host's session container as JSON so users don't have to
// touch every controller again after a restart. Each field is independently
// optional on restore; a missing field keeps the post-reset default.

use crate::bridge::Bridge;
use crate::bridge::cc_map::LEARNED_CCS;
use serde::{Deserialize, Serialize};

/// Wire encoding for "no MIDI observed" in the `values_in` sequence,
/// kept for compatibility with existing session files.
pub const UNOBSERVED: i16 = -10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Learned CC map, 82 entries in persisted order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccs: Option<Vec<u8>>,

    /// Raw last-seen value per CC number, 128 entries; -10 = unobserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_in: Option<Vec<i16>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionState {
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Bridge {
    /// Snapshot the session-persisted fields.
    pub fn session_state(&self) -> SessionState {
        let ccs = self.cc_map.entries().to_vec();
        let values_in = self
            .values_in
            .iter()
            .map(|v| match v {
                Some(value) => *value as i16,
                None => UNOBSERVED,
            })
            .collect();
        SessionState {
            ccs: Some(ccs),
            values_in: Some(values_in),
        }
    }

    /// Restore a snapshot. Observed raw values are replayed to the output
    /// sink (clamped to the CC range) so the device matches the restored
    /// state without anyone touching a control.
    pub fn restore_session(&mut self, state: &SessionState) {
        if let Some(ccs) = &state.ccs {
            for (i, &cc) in ccs.iter().take(LEARNED_CCS).enumerate() {
                self.cc_map.set_entry(i, cc);
            }
        }

        if let Some(values) = &state.values_in {
            for (cc, &value) in values.iter().take(128).enumerate() {
                if value == UNOBSERVED {
                    self.values_in[cc] = None;
                    continue;
                }
                let clamped = value.clamp(-127, 127) as i8;
                self.values_in[cc] = Some(clamped);
                self.midi_out.set_value(clamped.max(0) as i32, cc as u8);
            }
        }
    }
}
