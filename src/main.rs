use ccbridge::midi::input::MidiInputPort;
use ccbridge::{Bridge, FileRequest, SessionState, Surface, create_midi_channel};
use midir::MidiOutput;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// Ringbuffer capacity constant
// MIDI can theoretically send ~1000 messages/second (31250 baud); 512 gives
// >500ms of headroom at the 1 kHz control rate used below.
const MIDI_RINGBUFFER_CAPACITY: usize = 512;

/// Control loop cadence. The bridge's own 0.5 ms rate limiter gates the
/// merge passes below this.
const CYCLE: Duration = Duration::from_millis(1);

/// Session snapshot cadence.
const SESSION_AUTOSAVE: Duration = Duration::from_secs(30);

fn patch_dir() -> PathBuf {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ccbridge")
        .join("patches");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() {
    println!("=== ccbridge ===");
    println!("MIDI controller-mapping bridge\n");

    let patch_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| patch_dir().join("current.nym"));
    let session_path = patch_path.with_extension("session.json");
    println!("Patch file: {}", patch_path.display());

    let (midi_tx, mut midi_rx) = create_midi_channel(MIDI_RINGBUFFER_CAPACITY);
    let frame_counter = Arc::new(AtomicU64::new(0));

    println!("\nMIDI initialisation...");
    let _input_port = match MidiInputPort::new(midi_tx, frame_counter.clone(), None) {
        Ok(port) => port,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    let midi_out = match MidiOutput::new("ccbridge output") {
        Ok(out) => out,
        Err(e) => {
            eprintln!("ERROR: Midi output init error: {}", e);
            return;
        }
    };
    let out_ports = midi_out.ports();
    if out_ports.is_empty() {
        eprintln!("ERROR: no MIDI output port available");
        return;
    }
    println!("\n=== MIDI output ports ===");
    for (i, port) in out_ports.iter().enumerate() {
        if let Ok(name) = midi_out.port_name(port) {
            println!("  [{}] {}", i, name);
        }
    }
    let out_port = &out_ports[0];
    let out_name = midi_out
        .port_name(out_port)
        .unwrap_or_else(|_| "Unknown".to_string());
    let mut out_conn = match midi_out.connect(out_port, "ccbridge-output") {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("ERROR: Midi output connection error: {}", e);
            return;
        }
    };
    println!("\nConnected to MIDI output: {}", out_name);

    let mut bridge = Bridge::new();
    let mut surface = Surface::new();

    // Restore the learned CC map and raw input values from the last run
    match std::fs::read_to_string(&session_path) {
        Ok(json) => match SessionState::from_json(&json) {
            Ok(state) => {
                bridge.restore_session(&state);
                println!("Session restored: {}", session_path.display());
            }
            Err(e) => eprintln!("Session restore failed: {}", e),
        },
        Err(_) => println!("No previous session found"),
    }

    println!("\n=== Bridge running ===\n");

    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();
    let mut last_autosave = Instant::now();

    loop {
        std::thread::sleep(CYCLE);
        let now = Instant::now();
        let sample_time = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;

        frame += 1;
        frame_counter.store(frame, Ordering::Relaxed);

        bridge.process(&mut surface, &mut midi_rx, sample_time, frame);

        // Push everything the reconciliation pass queued onto the wire
        for event in bridge.midi_out.take_messages() {
            if let Err(e) = out_conn.send(&event.to_bytes()) {
                eprintln!("MIDI send failed: {}", e);
            }
        }

        match bridge.take_file_request() {
            Some(FileRequest::LoadPatch) => match bridge.load_patch(&mut surface, &patch_path) {
                Ok(()) => println!("Patch loaded: {}", patch_path.display()),
                Err(e) => eprintln!("Patch load failed: {}", e),
            },
            Some(FileRequest::SavePatch) => match bridge.save_patch(&surface, &patch_path) {
                Ok(()) => println!("Patch saved: {}", patch_path.display()),
                Err(e) => eprintln!("Patch save failed: {}", e),
            },
            None => {}
        }

        if last_autosave.elapsed() >= SESSION_AUTOSAVE {
            last_autosave = Instant::now();
            match bridge.session_state().to_json() {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&session_path, json) {
                        eprintln!("Session autosave failed: {}", e);
                    }
                }
                Err(e) => eprintln!("Session autosave failed: {}", e),
            }
        }
    }
}
