//! Integration tests for patch save/load through the filesystem
//!
//! Uses real temp files to exercise the full path: surface edits, the
//! load/save triggers on the surface, the on-disk record format, and
//! recovery from corrupt files.

use ccbridge::surface::param;
use ccbridge::{Bridge, FileRequest, PatchError, Surface, create_midi_channel};
use tempfile::tempdir;

const DT: f32 = 0.001;

fn run(bridge: &mut Bridge, surface: &mut Surface, cycles: usize) {
    let (_tx, mut rx) = create_midi_channel(16);
    for i in 0..cycles {
        bridge.process(surface, &mut rx, DT, i as u64 + 1);
    }
}

#[test]
fn test_save_and_load_roundtrip_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patch.nym");

    let mut bridge = Bridge::new();
    let mut surface = Surface::new();
    run(&mut bridge, &mut surface, 30);

    // a few edits across the three regions
    surface.set_param(param::CONTROLLERS, 64.0); // primary lane 0
    surface.set_param(param::CONTROLLERS + 28, 40.0); // mod lane 0
    surface.set_param(param::PLAYMODE, 3.0);
    run(&mut bridge, &mut surface, 30);

    bridge.save_patch(&surface, &path).unwrap();

    let mut restored = Bridge::new();
    let mut restored_surface = Surface::new();
    restored.load_patch(&mut restored_surface, &path).unwrap();

    assert_eq!(restored_surface.param(param::CONTROLLERS), 64.0);
    assert_eq!(restored_surface.param(param::CONTROLLERS + 28), 40.0);
    assert_eq!(restored_surface.param(param::PLAYMODE), 3.0);
    assert_eq!(
        restored.patch_to_string(&restored_surface),
        bridge.patch_to_string(&surface)
    );
}

#[test]
fn test_surface_triggers_raise_file_requests() {
    let mut bridge = Bridge::new();
    let mut surface = Surface::new();
    run(&mut bridge, &mut surface, 5);
    assert_eq!(bridge.take_file_request(), None);

    surface.set_param(param::SAVE, 1.0);
    run(&mut bridge, &mut surface, 1);
    assert_eq!(bridge.take_file_request(), Some(FileRequest::SavePatch));
    // edge-triggered: holding the button does not re-request
    run(&mut bridge, &mut surface, 5);
    assert_eq!(bridge.take_file_request(), None);

    surface.set_param(param::SAVE, 0.0);
    surface.set_param(param::LOAD, 1.0);
    run(&mut bridge, &mut surface, 1);
    assert_eq!(bridge.take_file_request(), Some(FileRequest::LoadPatch));
    assert_eq!(bridge.take_file_request(), None);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let mut bridge = Bridge::new();
    let mut surface = Surface::new();

    let err = bridge
        .load_patch(&mut surface, &dir.path().join("nope.nym"))
        .unwrap_err();
    assert!(matches!(err, PatchError::Io(_)));
}

#[test]
fn test_corrupt_file_leaves_state_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.nym");
    std::fs::write(&path, "12, 64, oops, 3\n").unwrap();

    let mut bridge = Bridge::new();
    let mut surface = Surface::new();
    surface.set_param(param::CONTROLLERS, 77.0);
    let before = bridge.patch_to_string(&surface);

    let err = bridge.load_patch(&mut surface, &path).unwrap_err();
    assert!(matches!(err, PatchError::Corrupt(_)));
    assert_eq!(bridge.patch_to_string(&surface), before);
}

#[test]
fn test_saved_record_is_one_line_of_integers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patch.nym");

    let bridge = Bridge::new();
    let surface = Surface::new();
    bridge.save_patch(&surface, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert_eq!(text.trim_end().split(", ").count(), ccbridge::PATCH_FIELD_COUNT);
    for token in text.trim_end().split(", ") {
        token.parse::<i32>().unwrap();
    }
}
