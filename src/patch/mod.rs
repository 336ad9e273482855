// Patch persistence - flat delimited text, one record per file
//
// The on-disk order is fixed and wire-compatible with existing patch
// files: 38 primary lane values (28 main + 4 reverb + 4 LFO2 + 2 final),
// all 4x36 modulation values, 7 button settings, playmode. 190 integers,
// comma separated, newline terminated.

use crate::bridge::Bridge;
use crate::bridge::slots::{
    BUTTON_SETTINGS, MOD_LANES, MOD_SOURCES, PRIMARY_LANES, PRIMARY_SLOTS,
};
use crate::surface::{Surface, param};
use std::fs;
use std::path::Path;

pub const PATCH_FIELD_COUNT: usize =
    PRIMARY_LANES + MOD_SOURCES * MOD_LANES + BUTTON_SETTINGS + 1;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt patch file: {0}")]
    Corrupt(String),
}

impl Bridge {
    /// Render the current patch state as one text record.
    pub fn patch_to_string(&self, surface: &Surface) -> String {
        let mut fields: Vec<i32> = Vec::with_capacity(PATCH_FIELD_COUNT);

        for &slot in PRIMARY_SLOTS.iter() {
            fields.push(surface.param(param::CONTROLLERS + slot) as i32);
        }
        for src in 0..MOD_SOURCES {
            for lane in 0..MOD_LANES {
                fields.push(self.mod_current[src][lane]);
            }
        }
        for j in 0..BUTTON_SETTINGS {
            fields.push(self.button_settings[j]);
        }
        fields.push(surface.param(param::PLAYMODE) as i32);

        let mut line = fields
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        line.push('\n');
        line
    }

    pub fn save_patch(&self, surface: &Surface, path: &Path) -> Result<(), PatchError> {
        fs::write(path, self.patch_to_string(surface))?;
        Ok(())
    }

    pub fn load_patch(&mut self, surface: &mut Surface, path: &Path) -> Result<(), PatchError> {
        let text = fs::read_to_string(path)?;
        self.load_patch_str(surface, &text)
    }

    /// Parse and apply one patch record. A malformed or truncated record is
    /// rejected before any state is touched.
    pub fn load_patch_str(&mut self, surface: &mut Surface, text: &str) -> Result<(), PatchError> {
        let mut fields: Vec<i32> = Vec::with_capacity(PATCH_FIELD_COUNT);
        for token in text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value = token
                .parse::<i32>()
                .map_err(|_| PatchError::Corrupt(format!("invalid integer field '{}'", token)))?;
            fields.push(value);
        }
        if fields.len() < PATCH_FIELD_COUNT {
            return Err(PatchError::Corrupt(format!(
                "expected {} fields, found {}",
                PATCH_FIELD_COUNT,
                fields.len()
            )));
        }

        let mut next = 0;
        for &slot in PRIMARY_SLOTS.iter() {
            surface.set_param(param::CONTROLLERS + slot, fields[next] as f32);
            next += 1;
        }
        for src in 0..MOD_SOURCES {
            for lane in 0..MOD_LANES {
                self.mod_current[src][lane] = fields[next];
                next += 1;
            }
        }
        for j in 0..BUTTON_SETTINGS {
            self.button_settings[j] = fields[next];
            next += 1;
        }
        self.mod_src =
            (self.button_settings[crate::bridge::buttons::MOD_SOURCE_BUTTON].max(0) as usize)
                .min(MOD_SOURCES - 1);

        // Mirror the now-active source into the live parameters
        self.project_mod_source(surface);

        surface.set_param(param::PLAYMODE, fields[next] as f32);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    fn populated() -> (Bridge, Surface) {
        let mut bridge = Bridge::new();
        let mut surface = Surface::new();
        for (j, &slot) in PRIMARY_SLOTS.iter().enumerate() {
            surface.set_param(param::CONTROLLERS + slot, (j as f32 * 3.0) % 128.0);
        }
        for src in 0..MOD_SOURCES {
            for lane in 0..MOD_LANES {
                bridge.mod_current[src][lane] = ((src * 36 + lane) % 128) as i32;
            }
        }
        bridge.button_settings = [1, 2, 3, 0, 1, 0, 1];
        surface.set_param(param::PLAYMODE, 4.0);
        (bridge, surface)
    }

    #[test]
    fn test_record_has_190_fields() {
        assert_eq!(PATCH_FIELD_COUNT, 190);
        let (bridge, surface) = populated();
        let record = bridge.patch_to_string(&surface);
        assert_eq!(record.split(", ").count(), PATCH_FIELD_COUNT);
        assert!(record.ends_with('\n'));
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let (bridge, surface) = populated();
        let saved = bridge.patch_to_string(&surface);

        let mut restored = Bridge::new();
        let mut restored_surface = Surface::new();
        restored
            .load_patch_str(&mut restored_surface, &saved)
            .unwrap();

        assert_eq!(restored.patch_to_string(&restored_surface), saved);
    }

    #[test]
    fn test_load_sets_mod_source_from_button() {
        let (bridge, surface) = populated();
        let saved = bridge.patch_to_string(&surface);

        let mut restored = Bridge::new();
        let mut restored_surface = Surface::new();
        restored
            .load_patch_str(&mut restored_surface, &saved)
            .unwrap();
        // button_settings[2] was 3
        assert_eq!(restored.mod_source(), 3);
        // active source projected into the parameter store
        use crate::bridge::slots::MOD_SLOTS;
        for lane in 0..MOD_LANES {
            assert_eq!(
                restored_surface.param(param::CONTROLLERS + MOD_SLOTS[lane]) as i32,
                restored.mod_current[3][lane]
            );
        }
    }

    #[test]
    fn test_truncated_record_is_rejected_untouched() {
        let (bridge, surface) = populated();
        let saved = bridge.patch_to_string(&surface);
        let truncated: String = saved.split(", ").take(100).collect::<Vec<_>>().join(", ");

        let mut target = Bridge::new();
        let mut target_surface = Surface::new();
        let before = target.patch_to_string(&target_surface);

        let err = target
            .load_patch_str(&mut target_surface, &truncated)
            .unwrap_err();
        assert!(matches!(err, PatchError::Corrupt(_)));
        // nothing applied
        assert_eq!(target.patch_to_string(&target_surface), before);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let mut target = Bridge::new();
        let mut target_surface = Surface::new();
        let err = target
            .load_patch_str(&mut target_surface, "1, 2, pomme, 4\n")
            .unwrap_err();
        assert!(matches!(err, PatchError::Corrupt(_)));
    }

    #[test]
    fn test_whitespace_only_delimiters_accepted() {
        let (bridge, surface) = populated();
        let saved = bridge.patch_to_string(&surface).replace(',', " ");

        let mut restored = Bridge::new();
        let mut restored_surface = Surface::new();
        restored
            .load_patch_str(&mut restored_surface, &saved)
            .unwrap();
        assert_eq!(
            restored.patch_to_string(&restored_surface),
            bridge.patch_to_string(&surface)
        );
    }
}
