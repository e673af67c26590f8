use xmltree::Element;

use crate::persistence::document::{read_bool, read_float, read_string, FieldPolicy};
use crate::state::Song;

use super::decoders::decode_song_mode;

/// Scalar song settings. Returns the writer version recorded in the file.
pub(super) fn load_song_fields(root: &Element, song: &mut Song) -> String {
    let node = Some(root);

    let version = read_string(node, "version", "Unknown version", FieldPolicy::REQUIRED);

    song.bpm = read_float(node, "bpm", 120.0, FieldPolicy::REQUIRED);
    song.volume = read_float(node, "volume", 0.5, FieldPolicy::REQUIRED);
    song.metronome_volume = read_float(node, "metronomeVolume", 0.5, FieldPolicy::REQUIRED);
    song.name = read_string(node, "name", "", FieldPolicy::TEXT);
    song.author = read_string(node, "author", "", FieldPolicy::TEXT);
    song.notes = read_string(node, "notes", "", FieldPolicy::TEXT);
    song.license = read_string(node, "license", "", FieldPolicy::OPTIONAL_TEXT);
    song.loop_enabled = read_bool(node, "loopEnabled", false, FieldPolicy::REQUIRED);
    song.pattern_mode_plays_selected =
        read_bool(node, "patternModeMode", true, FieldPolicy::OPTIONAL);

    song.playback_track_filename =
        read_string(node, "playbackTrackFilename", "", FieldPolicy::OPTIONAL_TEXT);
    song.playback_track_enabled =
        read_bool(node, "playbackTrackEnabled", false, FieldPolicy::OPTIONAL);
    song.playback_track_volume =
        read_float(node, "playbackTrackVolume", 0.0, FieldPolicy::OPTIONAL);

    song.mode = decode_song_mode(&read_string(node, "mode", "pattern", FieldPolicy::REQUIRED));

    song.humanize_time = read_float(node, "humanize_time", 0.0, FieldPolicy::OPTIONAL);
    song.humanize_velocity = read_float(node, "humanize_velocity", 0.0, FieldPolicy::OPTIONAL);
    song.swing_factor = read_float(node, "swing_factor", 0.0, FieldPolicy::OPTIONAL);

    version
}
