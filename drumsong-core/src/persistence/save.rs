use std::path::Path;

use xmltree::Element;

use crate::state::{
    AutomationPath, DrumkitComponent, EffectInfo, Instrument, InstrumentComponent,
    InstrumentLayer, Note, Pattern, PatternSequence, SampleSelection, Song, SongMode, Timeline,
    MAX_FX,
};

use super::document::{append, write_bool, write_string, write_value};
use super::SaveContext;

/// Build the complete `<song>` tree. Sections appear in a fixed order; every
/// collection keeps its in-memory order.
pub fn song_to_element(song: &Song, ctx: &SaveContext<'_>) -> Element {
    let mut root = Element::new(super::SONG_ROOT);

    save_song_fields(&mut root, song, ctx);
    append(&mut root, save_components(&song.components));
    append(&mut root, save_instruments(&song.instruments, ctx));
    append(&mut root, save_patterns(&song.patterns));
    append(&mut root, save_virtual_patterns(&song.patterns));
    append(&mut root, save_pattern_sequence(&song.pattern_sequence));
    append(&mut root, save_effects(ctx));
    let (tempo, tags) = save_timeline(&song.timeline);
    append(&mut root, tempo);
    append(&mut root, tags);
    if let Some(path) = &song.velocity_automation {
        append(&mut root, save_automation(path));
    }

    root
}

pub(crate) fn encode_sample_selection(selection: SampleSelection) -> &'static str {
    match selection {
        SampleSelection::Velocity => "VELOCITY",
        SampleSelection::Random => "RANDOM",
        SampleSelection::RoundRobin => "ROUND_ROBIN",
    }
}

pub(crate) fn encode_song_mode(mode: SongMode) -> &'static str {
    match mode {
        SongMode::Song => "song",
        SongMode::Pattern => "pattern",
    }
}

// ============================================================
// Song
// ============================================================

fn save_song_fields(root: &mut Element, song: &Song, ctx: &SaveContext<'_>) {
    write_string(root, "version", ctx.version);
    write_value(root, "bpm", song.bpm);
    write_value(root, "volume", song.volume);
    write_value(root, "metronomeVolume", song.metronome_volume);
    write_string(root, "name", &song.name);
    write_string(root, "author", &song.author);
    write_string(root, "notes", &song.notes);
    write_string(root, "license", &song.license);
    write_bool(root, "loopEnabled", song.loop_enabled);
    write_bool(root, "patternModeMode", song.pattern_mode_plays_selected);
    write_string(root, "playbackTrackFilename", &song.playback_track_filename);
    write_bool(root, "playbackTrackEnabled", song.playback_track_enabled);
    write_value(root, "playbackTrackVolume", song.playback_track_volume);
    write_string(root, "mode", encode_song_mode(song.mode));
    write_value(root, "humanize_time", song.humanize_time);
    write_value(root, "humanize_velocity", song.humanize_velocity);
    write_value(root, "swing_factor", song.swing_factor);
}

fn save_components(components: &[DrumkitComponent]) -> Element {
    let mut list = Element::new("componentList");
    for component in components {
        let mut node = Element::new("drumkitComponent");
        write_value(&mut node, "id", component.id);
        write_string(&mut node, "name", &component.name);
        write_value(&mut node, "volume", component.volume);
        append(&mut list, node);
    }
    list
}

// ============================================================
// Instruments
// ============================================================

fn save_instruments(instruments: &[Instrument], ctx: &SaveContext<'_>) -> Element {
    let mut list = Element::new("instrumentList");
    for instrument in instruments {
        append(&mut list, save_instrument(instrument, ctx));
    }
    list
}

fn save_instrument(inst: &Instrument, ctx: &SaveContext<'_>) -> Element {
    let mut node = Element::new("instrument");
    write_value(&mut node, "id", inst.id);
    write_string(&mut node, "name", &inst.name);
    write_string(&mut node, "drumkit", &inst.drumkit_name);
    write_value(&mut node, "volume", inst.volume);
    write_bool(&mut node, "isMuted", inst.muted);
    write_value(&mut node, "pan_L", inst.pan_l);
    write_value(&mut node, "pan_R", inst.pan_r);
    write_value(&mut node, "gain", inst.gain);
    write_bool(&mut node, "applyVelocity", inst.apply_velocity);

    write_bool(&mut node, "filterActive", inst.filter_active);
    write_value(&mut node, "filterCutoff", inst.filter_cutoff);
    write_value(&mut node, "filterResonance", inst.filter_resonance);

    for (i, level) in inst.fx_levels.iter().enumerate() {
        write_value(&mut node, &format!("FX{}Level", i + 1), level);
    }

    write_value(&mut node, "Attack", inst.adsr.attack);
    write_value(&mut node, "Decay", inst.adsr.decay);
    write_value(&mut node, "Sustain", inst.adsr.sustain);
    write_value(&mut node, "Release", inst.adsr.release);

    write_value(&mut node, "randomPitchFactor", inst.random_pitch_factor);
    write_value(&mut node, "muteGroup", inst.mute_group);
    write_bool(&mut node, "isStopNote", inst.stop_notes);
    write_string(&mut node, "sampleSelectionAlgo", encode_sample_selection(inst.sample_selection));

    write_value(&mut node, "midiOutChannel", inst.midi_out_channel);
    write_value(&mut node, "midiOutNote", inst.midi_out_note);
    write_value(&mut node, "isHihat", inst.hihat_group);
    write_value(&mut node, "lower_cc", inst.lower_cc);
    write_value(&mut node, "higher_cc", inst.higher_cc);

    for component in &inst.components {
        append(&mut node, save_instrument_component(component, &inst.drumkit_name, ctx));
    }
    node
}

fn save_instrument_component(
    component: &InstrumentComponent,
    drumkit_name: &str,
    ctx: &SaveContext<'_>,
) -> Element {
    let mut node = Element::new("instrumentComponent");
    write_value(&mut node, "component_id", component.component_id);
    write_value(&mut node, "gain", component.gain);
    // Empty slots are simply not stored.
    for (_, layer) in component.occupied() {
        append(&mut node, save_layer(layer, drumkit_name, ctx));
    }
    node
}

fn save_layer(layer: &InstrumentLayer, drumkit_name: &str, ctx: &SaveContext<'_>) -> Element {
    let sample = &layer.sample;
    let loops = &sample.loops;
    let rubberband = &sample.rubberband;

    let mut node = Element::new("layer");
    write_string(&mut node, "filename", &sample_filename(&sample.filepath, drumkit_name, ctx));
    write_bool(&mut node, "ismodified", sample.is_modified);
    write_string(&mut node, "smode", loops.mode.as_str());
    write_value(&mut node, "startframe", loops.start_frame);
    write_value(&mut node, "loopframe", loops.loop_frame);
    write_value(&mut node, "loops", loops.count);
    write_value(&mut node, "endframe", loops.end_frame);
    write_value(&mut node, "userubber", rubberband.enabled as i32);
    write_value(&mut node, "rubberdivider", rubberband.divider);
    write_value(&mut node, "rubberCsettings", rubberband.c_settings);
    write_value(&mut node, "rubberPitch", rubberband.pitch);
    write_value(&mut node, "min", layer.start_velocity);
    write_value(&mut node, "max", layer.end_velocity);
    write_value(&mut node, "gain", layer.gain);
    write_value(&mut node, "pitch", layer.pitch);

    for point in &sample.volume_envelope {
        let mut volume = Element::new("volume");
        write_value(&mut volume, "volume-position", point.frame);
        write_value(&mut volume, "volume-value", point.value);
        append(&mut node, volume);
    }
    for point in &sample.pan_envelope {
        let mut pan = Element::new("pan");
        write_value(&mut pan, "pan-position", point.frame);
        write_value(&mut pan, "pan-value", point.value);
        append(&mut node, pan);
    }
    node
}

/// Stored form of a sample path. Relative paths are resolved against the
/// instrument's kit on load, so a sample from another kit will not be found
/// where it was.
fn sample_filename(path: &Path, drumkit_name: &str, ctx: &SaveContext<'_>) -> String {
    if let Some(kit) = ctx.roots.kit_name(path) {
        if kit != drumkit_name {
            log::warn!(target: "persistence",
                "sample {} is in kit '{}' but its instrument uses kit '{}'; it will load from '{}'",
                path.display(), kit, drumkit_name, drumkit_name);
        }
    }

    let filename = ctx.roots.relativize(path);
    match filename.to_str() {
        Some(text) => text.to_string(),
        None => {
            let lossy = filename.to_string_lossy().into_owned();
            log::warn!(target: "persistence",
                "sample path {} is not valid UTF-8, storing it as '{}'", filename.display(), lossy);
            lossy
        }
    }
}

// ============================================================
// Patterns
// ============================================================

fn save_patterns(patterns: &[Pattern]) -> Element {
    let mut list = Element::new("patternList");
    for pattern in patterns {
        append(&mut list, save_pattern(pattern));
    }
    list
}

pub(crate) fn save_pattern(pattern: &Pattern) -> Element {
    let mut node = Element::new("pattern");
    write_string(&mut node, "name", &pattern.name);
    write_string(&mut node, "category", &pattern.category);
    write_value(&mut node, "size", pattern.length);
    write_string(&mut node, "info", &pattern.info);

    let mut note_list = Element::new("noteList");
    for note in pattern.iter_notes() {
        append(&mut note_list, save_note(note));
    }
    append(&mut node, note_list);
    node
}

fn save_note(note: &Note) -> Element {
    let mut node = Element::new("note");
    write_value(&mut node, "position", note.position);
    write_value(&mut node, "leadlag", note.lead_lag);
    write_value(&mut node, "velocity", note.velocity);
    write_value(&mut node, "pan_L", note.pan_l);
    write_value(&mut node, "pan_R", note.pan_r);
    write_value(&mut node, "pitch", note.pitch);
    write_value(&mut node, "probability", note.probability);
    write_value(&mut node, "key", note.key);
    write_value(&mut node, "length", note.length);
    write_value(&mut node, "instrument", note.instrument);
    write_bool(&mut node, "note_off", note.note_off);
    node
}

/// Only patterns that trigger other patterns get an entry.
fn save_virtual_patterns(patterns: &[Pattern]) -> Element {
    let mut list = Element::new("virtualPatternList");
    for pattern in patterns.iter().filter(|p| !p.virtual_patterns.is_empty()) {
        let mut node = Element::new("pattern");
        write_string(&mut node, "name", &pattern.name);
        for name in &pattern.virtual_patterns {
            write_string(&mut node, "virtual", name);
        }
        append(&mut list, node);
    }
    list
}

fn save_pattern_sequence(sequence: &PatternSequence) -> Element {
    let mut node = Element::new("patternSequence");
    for group in &sequence.groups {
        let mut group_node = Element::new("group");
        for name in group {
            write_string(&mut group_node, "patternID", name);
        }
        append(&mut node, group_node);
    }
    node
}

// ============================================================
// Effects
// ============================================================

/// One `<fx>` per slot. Slots are only filled when an effect host is present.
fn save_effects(ctx: &SaveContext<'_>) -> Element {
    let mut node = Element::new("ladspa");
    for slot in 0..MAX_FX {
        let info = ctx.effects.and_then(|host| host.slot(slot));
        let fx = match info {
            Some(info) => save_effect(&info),
            None => save_empty_effect(),
        };
        append(&mut node, fx);
    }
    node
}

fn save_effect(info: &EffectInfo) -> Element {
    let mut node = Element::new("fx");
    write_string(&mut node, "name", &info.label);
    write_string(&mut node, "filename", &info.library_path);
    write_bool(&mut node, "enabled", info.enabled);
    write_value(&mut node, "volume", info.volume);
    for (tag, ports) in [("inputControlPort", &info.input_ports), ("outputControlPort", &info.output_ports)] {
        for port in ports {
            let mut port_node = Element::new(tag);
            write_string(&mut port_node, "name", &port.name);
            write_value(&mut port_node, "value", port.value);
            append(&mut node, port_node);
        }
    }
    node
}

fn save_empty_effect() -> Element {
    let mut node = Element::new("fx");
    write_string(&mut node, "name", super::NO_PLUGIN);
    write_string(&mut node, "filename", "-");
    write_bool(&mut node, "enabled", false);
    write_string(&mut node, "volume", "0.0");
    node
}

// ============================================================
// Timeline and automation
// ============================================================

fn save_timeline(timeline: &Timeline) -> (Element, Element) {
    let mut tempo = Element::new("BPMTimeLine");
    for marker in &timeline.tempo_markers {
        let mut node = Element::new("newBPM");
        write_value(&mut node, "BAR", marker.bar);
        write_value(&mut node, "BPM", marker.bpm);
        append(&mut tempo, node);
    }

    let mut tags = Element::new("timeLineTag");
    for marker in &timeline.tags {
        let mut node = Element::new("newTAG");
        write_value(&mut node, "BAR", marker.bar);
        write_string(&mut node, "TAG", &marker.tag);
        append(&mut tags, node);
    }

    (tempo, tags)
}

fn save_automation(path: &AutomationPath) -> Element {
    let mut paths = Element::new("automationPaths");
    let mut node = Element::new("path");
    node.attributes
        .insert("adjust".to_string(), path.adjust.as_str().to_string());
    for point in path.points() {
        let mut point_node = Element::new("point");
        point_node.attributes.insert("x".to_string(), point.x.to_string());
        point_node.attributes.insert("y".to_string(), point.y.to_string());
        append(&mut node, point_node);
    }
    append(&mut paths, node);
    paths
}
