use xmltree::Element;

use crate::persistence::document::{children, read_bool, read_float, read_int, read_string, FieldPolicy};
use crate::state::{Instrument, InstrumentId, Note, Pattern, Song, DEFAULT_PATTERN_LENGTH};

use super::decoders::decode_note_key;

pub(super) fn load_patterns(root: &Element, song: &mut Song) {
    song.patterns.clear();

    let Some(list) = root.get_child("patternList") else {
        log::warn!(target: "persistence", "node 'patternList' is not found");
        return;
    };

    for node in children(list, "pattern") {
        let pattern = load_pattern_element(node, &song.instruments);
        song.patterns.push(pattern);
    }
}

/// Read one `<pattern>` element. Notes whose instrument is not in
/// `instruments` are dropped.
pub(crate) fn load_pattern_element(node: &Element, instruments: &[Instrument]) -> Pattern {
    let n = Some(node);
    let mut pattern = Pattern::new(&read_string(n, "name", "", FieldPolicy::TEXT));
    pattern.category = read_string(n, "category", "", FieldPolicy::OPTIONAL_TEXT);
    pattern.length = read_int(n, "size", DEFAULT_PATTERN_LENGTH, FieldPolicy::REQUIRED);
    pattern.info = read_string(n, "info", "", FieldPolicy::OPTIONAL_TEXT);

    let Some(note_list) = node.get_child("noteList") else {
        return pattern;
    };

    let mut dropped = 0;
    for note_node in children(note_list, "note") {
        match load_note(note_node, instruments) {
            Some(note) => pattern.insert_note(note),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        log::warn!(target: "persistence",
            "pattern '{}': dropped {} notes for unknown instruments", pattern.name, dropped);
    }
    pattern
}

fn load_note(node: &Element, instruments: &[Instrument]) -> Option<Note> {
    let n = Some(node);

    let instrument = InstrumentId::new(read_int(n, "instrument", -1, FieldPolicy::REQUIRED));
    if !instruments.iter().any(|inst| inst.id == instrument) {
        log::debug!(target: "persistence", "note refers to unknown instrument {}", instrument);
        return None;
    }

    let position = read_int(n, "position", 0, FieldPolicy::REQUIRED);
    let velocity = read_float(n, "velocity", 0.8, FieldPolicy::REQUIRED);
    let mut note = Note::new(instrument, position, velocity);
    note.lead_lag = read_float(n, "leadlag", 0.0, FieldPolicy::OPTIONAL);
    note.pan_l = read_float(n, "pan_L", 0.5, FieldPolicy::REQUIRED);
    note.pan_r = read_float(n, "pan_R", 0.5, FieldPolicy::REQUIRED);
    note.pitch = read_float(n, "pitch", 0.0, FieldPolicy::OPTIONAL);
    note.probability = read_float(n, "probability", 1.0, FieldPolicy::OPTIONAL);
    note.key = decode_note_key(&read_string(n, "key", "C0", FieldPolicy::OPTIONAL));
    note.length = read_int(n, "length", -1, FieldPolicy::OPTIONAL);
    note.note_off = read_bool(n, "note_off", false, FieldPolicy::OPTIONAL);
    Some(note)
}

/// Virtual links are resolved by name against the patterns already loaded.
pub(super) fn load_virtual_patterns(root: &Element, song: &mut Song) {
    let Some(list) = root.get_child("virtualPatternList") else {
        return;
    };

    for node in children(list, "pattern") {
        let name = read_string(Some(node), "name", "", FieldPolicy::TEXT);
        let targets: Vec<String> = children(node, "virtual")
            .map(element_text)
            .filter(|target| {
                let known = song.pattern(target).is_some();
                if !known {
                    log::warn!(target: "persistence",
                        "pattern '{}' has a virtual link to unknown pattern '{}', skipping", name, target);
                }
                known
            })
            .collect();

        match song.pattern_mut(&name) {
            Some(pattern) => pattern.virtual_patterns.extend(targets),
            None => log::warn!(target: "persistence",
                "virtual pattern entry for unknown pattern '{}', skipping", name),
        }
    }
}

/// Every group is kept, even if none of its entries resolve, so the
/// sequence length matches the file.
pub(super) fn load_pattern_sequence(root: &Element, song: &mut Song) {
    song.pattern_sequence.groups.clear();

    let Some(sequence) = root.get_child("patternSequence") else {
        log::warn!(target: "persistence", "node 'patternSequence' is not found");
        return;
    };

    let mut groups = Vec::new();
    for group_node in children(sequence, "group") {
        let group: Vec<String> = children(group_node, "patternID")
            .map(element_text)
            .filter(|name| {
                let known = song.pattern(name).is_some();
                if !known {
                    log::warn!(target: "persistence",
                        "pattern sequence refers to unknown pattern '{}', skipping", name);
                }
                known
            })
            .collect();
        groups.push(group);
    }
    song.pattern_sequence.groups = groups;
}

/// Text of a name reference; an empty element names the pattern `""`.
fn element_text(node: &Element) -> String {
    node.get_text().map(|t| t.into_owned()).unwrap_or_default()
}
