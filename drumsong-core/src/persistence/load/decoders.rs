use crate::state::{LoopMode, NoteKey, SampleSelection, SongMode};

pub(crate) fn decode_sample_selection(s: &str) -> SampleSelection {
    match s {
        "VELOCITY" => SampleSelection::Velocity,
        "RANDOM" => SampleSelection::Random,
        "ROUND_ROBIN" => SampleSelection::RoundRobin,
        other => {
            log::warn!(target: "persistence", "unknown sample selection '{}', using VELOCITY", other);
            SampleSelection::Velocity
        }
    }
}

pub(crate) fn decode_loop_mode(s: &str) -> LoopMode {
    match s {
        "forward" => LoopMode::Forward,
        "reverse" => LoopMode::Reverse,
        "pingpong" => LoopMode::PingPong,
        other => {
            log::warn!(target: "persistence", "unknown loop mode '{}', using forward", other);
            LoopMode::Forward
        }
    }
}

/// Anything but `song` is pattern mode, which is also what older files meant.
pub(crate) fn decode_song_mode(s: &str) -> SongMode {
    match s {
        "song" => SongMode::Song,
        "pattern" => SongMode::Pattern,
        other => {
            log::warn!(target: "persistence", "unknown song mode '{}', using pattern", other);
            SongMode::Pattern
        }
    }
}

pub(crate) fn decode_note_key(s: &str) -> NoteKey {
    NoteKey::parse(s).unwrap_or_else(|| {
        log::warn!(target: "persistence", "unknown note key '{}', using C0", s);
        NoteKey::default()
    })
}
