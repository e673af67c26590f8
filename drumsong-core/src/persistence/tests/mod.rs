use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use crate::paths::DrumkitRoots;
use crate::persistence::{load_song, save_song, SaveContext};
use crate::state::{
    AutomationPath, ComponentId, DrumkitComponent, EnvelopePoint, Instrument, InstrumentComponent,
    InstrumentId, InstrumentLayer, Key, LoopMode, Note, NoteKey, Pattern, Sample, SampleSelection,
    Song, SongMode,
};


const KIT: &str = "TestKit";

fn temp_song_path() -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("drumsong_persistence_test_{}_{}.h2song", nanos, n));
    path
}

/// User and system roots in a fresh temp dir, with `KIT` installed in the user root.
fn kit_roots() -> (TempDir, DrumkitRoots) {
    let dir = tempfile::tempdir().unwrap();
    let roots = DrumkitRoots::new(dir.path().join("user"), dir.path().join("system"));
    fs::create_dir_all(roots.user.join(KIT)).unwrap();
    fs::create_dir_all(&roots.system).unwrap();
    (dir, roots)
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn layer(path: impl Into<PathBuf>, min: f32, max: f32) -> InstrumentLayer {
    let mut layer = InstrumentLayer::new(Sample::new(path));
    layer.start_velocity = min;
    layer.end_velocity = max;
    layer
}

/// A song touching every section of the file format.
fn sample_song(roots: &DrumkitRoots) -> Song {
    let mut song = Song::new();
    song.bpm = 132.5;
    song.volume = 0.7;
    song.metronome_volume = 0.25;
    song.name = "Café & <Friends>".to_string();
    song.author = "Ilse".to_string();
    song.notes = "first take".to_string();
    song.license = "CC BY-SA".to_string();
    song.loop_enabled = true;
    song.pattern_mode_plays_selected = false;
    song.playback_track_filename = "/music/guide.flac".to_string();
    song.playback_track_enabled = true;
    song.playback_track_volume = 0.6;
    song.mode = SongMode::Song;
    song.humanize_time = 0.1;
    song.humanize_velocity = 0.2;
    song.swing_factor = 0.3;

    song.components.push(DrumkitComponent::new(ComponentId::new(0), "Main"));
    let mut room = DrumkitComponent::new(ComponentId::new(1), "Room");
    room.volume = 0.8;
    song.components.push(room);

    let kit_dir = roots.user.join(KIT);
    let mut kick = Instrument::new(InstrumentId::new(0), "Kick");
    kick.drumkit_name = KIT.to_string();
    kick.volume = 0.9;
    kick.pan_l = 0.4;
    kick.fx_levels = [0.1, 0.0, 0.5, 1.0];
    kick.adsr.release = 250.0;
    kick.mute_group = 2;
    kick.stop_notes = true;
    kick.sample_selection = SampleSelection::RoundRobin;
    kick.midi_out_note = 36;
    let mut main = InstrumentComponent::new(ComponentId::new(0));
    main.gain = 0.75;
    main.layers.insert(0, layer(kit_dir.join("kick_soft.wav"), 0.0, 0.5));
    let mut hard = layer(kit_dir.join("kick_hard.wav"), 0.5, 1.0);
    hard.pitch = -1.5;
    hard.sample.is_modified = true;
    hard.sample.loops.mode = LoopMode::PingPong;
    hard.sample.loops.end_frame = 44100;
    hard.sample.rubberband.enabled = true;
    hard.sample.volume_envelope = vec![EnvelopePoint::new(0, 100), EnvelopePoint::new(500, 20)];
    hard.sample.pan_envelope = vec![EnvelopePoint::new(10, 50)];
    main.layers.insert(1, hard);
    kick.components.push(main);
    song.instruments.push(kick);

    let mut snare = Instrument::new(InstrumentId::new(5), "Snare");
    snare.muted = true;
    snare.filter_active = true;
    snare.filter_cutoff = 0.3;
    let mut room_layers = InstrumentComponent::new(ComponentId::new(1));
    room_layers.layers.insert(0, layer("/elsewhere/snare.wav", 0.0, 1.0));
    snare.components.push(room_layers);
    song.instruments.push(snare);

    let mut intro = Pattern::new("intro");
    intro.category = "grooves".to_string();
    intro.info = "four on the floor".to_string();
    intro.insert_note(Note::new(InstrumentId::new(0), 0, 1.0));
    let mut backbeat = Note::new(InstrumentId::new(5), 0, 0.6);
    backbeat.key = NoteKey::new(Key::Fs, -2);
    backbeat.lead_lag = -0.25;
    backbeat.probability = 0.5;
    backbeat.length = 24;
    intro.insert_note(backbeat);
    let mut off = Note::new(InstrumentId::new(0), 96, 0.8);
    off.note_off = true;
    intro.insert_note(off);
    song.patterns.push(intro);

    let mut verse = Pattern::new("verse");
    verse.length = 96;
    verse.insert_note(Note::new(InstrumentId::new(5), 48, 0.9));
    song.patterns.push(verse);

    let mut fill = Pattern::new("fill");
    fill.virtual_patterns.insert("intro".to_string());
    fill.virtual_patterns.insert("verse".to_string());
    song.patterns.push(fill);

    song.pattern_sequence.push_group(["intro"]);
    song.pattern_sequence.push_group(["verse", "fill"]);
    song.pattern_sequence.push_group(Vec::<String>::new());
    song.pattern_sequence.push_group(["intro", "intro"]);

    song.timeline.add_tempo_marker(0, 132.5);
    song.timeline.add_tempo_marker(8, 90.0);
    song.timeline.add_tag(4, "chorus");

    let mut automation = AutomationPath::velocity();
    automation.add_point(0.0, 1.0);
    automation.add_point(16.5, 0.25);
    song.velocity_automation = Some(automation);

    song.is_modified = true;
    song
}

fn save_and_reload(song: &mut Song, roots: &DrumkitRoots) -> Song {
    let path = temp_song_path();
    save_song(&path, song, &SaveContext::new(roots)).expect("save_song");
    let loaded = load_song(&path, roots).expect("load_song");
    let _ = fs::remove_file(&path);
    loaded.song
}
