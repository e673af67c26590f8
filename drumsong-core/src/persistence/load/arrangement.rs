use xmltree::Element;

use crate::persistence::document::{children, read_bool, read_float, read_int, read_string, FieldPolicy};
use crate::persistence::NO_PLUGIN;
use crate::state::{AutomationPath, AutomationTarget, ControlPort, EffectInfo, Song, MAX_FX};

// ============================================================
// Effects
// ============================================================

/// One entry per slot, always `MAX_FX` long. Slots beyond that in the file
/// are ignored.
pub(super) fn load_effects(root: &Element) -> Vec<Option<EffectInfo>> {
    let mut slots: Vec<Option<EffectInfo>> = Vec::with_capacity(MAX_FX);

    if let Some(ladspa) = root.get_child("ladspa") {
        for (slot, node) in children(ladspa, "fx").enumerate() {
            if slot >= MAX_FX {
                log::warn!(target: "persistence", "more than {} effect slots, ignoring the rest", MAX_FX);
                break;
            }
            slots.push(load_effect(node));
        }
    }

    slots.resize(MAX_FX, None);
    slots
}

fn load_effect(node: &Element) -> Option<EffectInfo> {
    let n = Some(node);
    let label = read_string(n, "name", NO_PLUGIN, FieldPolicy::REQUIRED);
    if label == NO_PLUGIN {
        return None;
    }

    let mut info = EffectInfo::new(&label, &read_string(n, "filename", "", FieldPolicy::REQUIRED));
    info.enabled = read_bool(n, "enabled", false, FieldPolicy::REQUIRED);
    info.volume = read_float(n, "volume", 1.0, FieldPolicy::REQUIRED);
    info.input_ports = load_ports(node, "inputControlPort");
    info.output_ports = load_ports(node, "outputControlPort");
    Some(info)
}

fn load_ports(node: &Element, tag: &str) -> Vec<ControlPort> {
    children(node, tag)
        .map(|port| ControlPort {
            name: read_string(Some(port), "name", "", FieldPolicy::REQUIRED),
            value: read_float(Some(port), "value", 0.0, FieldPolicy::REQUIRED),
        })
        .collect()
}

// ============================================================
// Timeline
// ============================================================

pub(super) fn load_timeline(root: &Element, song: &mut Song) {
    song.timeline.tempo_markers.clear();
    song.timeline.tags.clear();

    if let Some(tempo) = root.get_child("BPMTimeLine") {
        for node in children(tempo, "newBPM") {
            let n = Some(node);
            song.timeline.add_tempo_marker(
                read_int(n, "BAR", 0, FieldPolicy::REQUIRED),
                read_float(n, "BPM", 120.0, FieldPolicy::REQUIRED),
            );
        }
    }

    if let Some(tags) = root.get_child("timeLineTag") {
        for node in children(tags, "newTAG") {
            let n = Some(node);
            song.timeline.add_tag(
                read_int(n, "BAR", 0, FieldPolicy::REQUIRED),
                &read_string(n, "TAG", "", FieldPolicy::TEXT),
            );
        }
    }
}

// ============================================================
// Automation
// ============================================================

/// Points live in attributes, not child elements.
pub(super) fn load_automation(root: &Element, song: &mut Song) {
    song.velocity_automation = None;

    let Some(paths) = root.get_child("automationPaths") else {
        return;
    };

    for node in children(paths, "path") {
        let adjust = node.attributes.get("adjust").map(String::as_str).unwrap_or("");
        match AutomationTarget::from_token(adjust) {
            Some(AutomationTarget::Velocity) => {
                let mut path = AutomationPath::velocity();
                for point in children(node, "point") {
                    match (attribute_f32(point, "x"), attribute_f32(point, "y")) {
                        (Some(x), Some(y)) => path.add_point(x, y),
                        _ => log::warn!(target: "persistence",
                            "automation point without numeric x/y, skipping"),
                    }
                }
                song.velocity_automation = Some(path);
            }
            None => log::warn!(target: "persistence",
                "automation path for unknown target '{}', skipping", adjust),
        }
    }
}

fn attribute_f32(node: &Element, name: &str) -> Option<f32> {
    node.attributes.get(name)?.trim().parse().ok()
}
