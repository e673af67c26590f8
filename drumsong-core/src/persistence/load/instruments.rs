use std::path::Path;

use xmltree::Element;

use crate::paths::DrumkitRoots;
use crate::persistence::document::{children, read_bool, read_float, read_int, read_string, FieldPolicy};
use crate::state::{
    Adsr, ComponentId, DrumkitComponent, EnvelopePoint, Instrument, InstrumentComponent,
    InstrumentId, InstrumentLayer, Loops, Rubberband, Sample, Song, MAX_LAYERS, MIDI_MIDDLE_C,
};

use super::decoders::{decode_loop_mode, decode_sample_selection};

/// Component that files without a component list implicitly use.
const DEFAULT_COMPONENT_ID: i32 = 0;

pub(super) fn load_components(root: &Element, song: &mut Song) {
    song.components.clear();

    let Some(list) = root.get_child("componentList") else {
        // Written before drum kits had components: everything played through one.
        log::debug!(target: "persistence", "no componentList, using a single 'Main' component");
        song.components.push(DrumkitComponent::new(ComponentId::new(DEFAULT_COMPONENT_ID), "Main"));
        return;
    };

    for node in children(list, "drumkitComponent") {
        let n = Some(node);
        let id = ComponentId::new(read_int(n, "id", -1, FieldPolicy::REQUIRED));
        if song.component(id).is_some() {
            log::warn!(target: "persistence", "duplicate drum-kit component id {}, skipping", id);
            continue;
        }
        let mut component = DrumkitComponent::new(id, &read_string(n, "name", "", FieldPolicy::TEXT));
        component.volume = read_float(n, "volume", 1.0, FieldPolicy::REQUIRED);
        song.components.push(component);
    }
}

pub(super) fn load_instruments(root: &Element, roots: &DrumkitRoots, song: &mut Song) {
    song.instruments.clear();

    let Some(list) = root.get_child("instrumentList") else {
        log::warn!(target: "persistence", "node 'instrumentList' is not found");
        return;
    };

    for node in children(list, "instrument") {
        let instrument = load_instrument(node, roots, song);
        if song.instrument(instrument.id).is_some() {
            log::warn!(target: "persistence",
                "duplicate instrument id {} ('{}'), skipping", instrument.id, instrument.name);
            continue;
        }
        song.instruments.push(instrument);
    }
}

fn load_instrument(node: &Element, roots: &DrumkitRoots, song: &Song) -> Instrument {
    let n = Some(node);
    let id = InstrumentId::new(read_int(n, "id", -1, FieldPolicy::REQUIRED));
    let mut inst = Instrument::new(id, &read_string(n, "name", "", FieldPolicy::TEXT));

    inst.drumkit_name = read_string(n, "drumkit", "", FieldPolicy::OPTIONAL_TEXT);
    inst.volume = read_float(n, "volume", 1.0, FieldPolicy::REQUIRED);
    inst.muted = read_bool(n, "isMuted", false, FieldPolicy::REQUIRED);
    inst.pan_l = read_float(n, "pan_L", 0.5, FieldPolicy::REQUIRED);
    inst.pan_r = read_float(n, "pan_R", 0.5, FieldPolicy::REQUIRED);
    inst.gain = read_float(n, "gain", 1.0, FieldPolicy::OPTIONAL);
    inst.apply_velocity = read_bool(n, "applyVelocity", true, FieldPolicy::OPTIONAL);

    inst.filter_active = read_bool(n, "filterActive", false, FieldPolicy::REQUIRED);
    inst.filter_cutoff = read_float(n, "filterCutoff", 1.0, FieldPolicy::REQUIRED);
    inst.filter_resonance = read_float(n, "filterResonance", 0.0, FieldPolicy::REQUIRED);

    for (i, level) in inst.fx_levels.iter_mut().enumerate() {
        *level = read_float(n, &format!("FX{}Level", i + 1), 0.0, FieldPolicy::OPTIONAL);
    }

    let defaults = Adsr::default();
    inst.adsr = Adsr {
        attack: read_float(n, "Attack", defaults.attack, FieldPolicy::OPTIONAL),
        decay: read_float(n, "Decay", defaults.decay, FieldPolicy::OPTIONAL),
        sustain: read_float(n, "Sustain", defaults.sustain, FieldPolicy::OPTIONAL),
        release: read_float(n, "Release", defaults.release, FieldPolicy::OPTIONAL),
    };

    inst.random_pitch_factor = read_float(n, "randomPitchFactor", 0.0, FieldPolicy::OPTIONAL);
    inst.mute_group = read_int(n, "muteGroup", -1, FieldPolicy::OPTIONAL);
    inst.stop_notes = read_bool(n, "isStopNote", false, FieldPolicy::OPTIONAL);
    inst.sample_selection = decode_sample_selection(&read_string(
        n,
        "sampleSelectionAlgo",
        "VELOCITY",
        FieldPolicy::OPTIONAL,
    ));

    inst.midi_out_channel = read_int(n, "midiOutChannel", -1, FieldPolicy::OPTIONAL);
    inst.midi_out_note = read_int(n, "midiOutNote", MIDI_MIDDLE_C, FieldPolicy::OPTIONAL);
    inst.hihat_group = read_int(n, "isHihat", -1, FieldPolicy::OPTIONAL);
    inst.lower_cc = read_int(n, "lower_cc", 0, FieldPolicy::OPTIONAL);
    inst.higher_cc = read_int(n, "higher_cc", 127, FieldPolicy::OPTIONAL);

    for component_node in children(node, "instrumentComponent") {
        let cn = Some(component_node);
        let component_id = ComponentId::new(read_int(cn, "component_id", DEFAULT_COMPONENT_ID, FieldPolicy::REQUIRED));
        if song.component(component_id).is_none() {
            log::warn!(target: "persistence",
                "instrument {} refers to unknown drum-kit component {}, dropping its layers",
                inst.id, component_id);
            continue;
        }
        let mut component = InstrumentComponent::new(component_id);
        component.gain = read_float(cn, "gain", 1.0, FieldPolicy::REQUIRED);
        load_layers(children(component_node, "layer"), &inst.drumkit_name, roots, &mut component);
        inst.components.push(component);
    }

    // Older files keep layers directly under the instrument.
    if children(node, "layer").next().is_some() {
        let component_id = ComponentId::new(DEFAULT_COMPONENT_ID);
        if song.component(component_id).is_some() {
            let mut component = InstrumentComponent::new(component_id);
            load_layers(children(node, "layer"), &inst.drumkit_name, roots, &mut component);
            inst.components.push(component);
        } else {
            log::warn!(target: "persistence",
                "instrument {} has component-less layers but no component {}, dropping them",
                inst.id, component_id);
        }
    }

    inst
}

fn load_layers<'a>(
    nodes: impl Iterator<Item = &'a Element>,
    drumkit_name: &str,
    roots: &DrumkitRoots,
    component: &mut InstrumentComponent,
) {
    let mut slot = 0;
    for node in nodes {
        let Some(layer) = load_layer(node, drumkit_name, roots) else {
            continue;
        };
        if component.set_layer(slot, layer).is_err() {
            log::warn!(target: "persistence",
                "more than {} layers in component {}, ignoring the rest", MAX_LAYERS, component.component_id);
            break;
        }
        slot += 1;
    }
}

fn load_layer(node: &Element, drumkit_name: &str, roots: &DrumkitRoots) -> Option<InstrumentLayer> {
    let n = Some(node);

    let filename = read_string(n, "filename", "", FieldPolicy::REQUIRED);
    if filename.is_empty() {
        log::warn!(target: "persistence", "layer without a sample file, skipping");
        return None;
    }

    let mut sample = Sample::new(roots.resolve(drumkit_name, Path::new(&filename)));
    sample.is_modified = read_bool(n, "ismodified", false, FieldPolicy::OPTIONAL);
    sample.loops = Loops {
        mode: decode_loop_mode(&read_string(n, "smode", "forward", FieldPolicy::OPTIONAL)),
        start_frame: read_int(n, "startframe", 0, FieldPolicy::OPTIONAL),
        loop_frame: read_int(n, "loopframe", 0, FieldPolicy::OPTIONAL),
        count: read_int(n, "loops", 0, FieldPolicy::OPTIONAL),
        end_frame: read_int(n, "endframe", 0, FieldPolicy::OPTIONAL),
    };
    sample.rubberband = Rubberband {
        enabled: read_int(n, "userubber", 0, FieldPolicy::OPTIONAL) != 0,
        divider: read_float(n, "rubberdivider", 1.0, FieldPolicy::OPTIONAL),
        c_settings: read_int(n, "rubberCsettings", 1, FieldPolicy::OPTIONAL),
        pitch: read_float(n, "rubberPitch", 0.0, FieldPolicy::OPTIONAL),
    };
    sample.volume_envelope = children(node, "volume")
        .map(|p| load_envelope_point(p, "volume-position", "volume-value"))
        .collect();
    sample.pan_envelope = children(node, "pan")
        .map(|p| load_envelope_point(p, "pan-position", "pan-value"))
        .collect();

    let mut layer = InstrumentLayer::new(sample);
    layer.start_velocity = read_float(n, "min", 0.0, FieldPolicy::REQUIRED);
    layer.end_velocity = read_float(n, "max", 1.0, FieldPolicy::REQUIRED);
    layer.gain = read_float(n, "gain", 1.0, FieldPolicy::REQUIRED);
    layer.pitch = read_float(n, "pitch", 0.0, FieldPolicy::OPTIONAL);
    Some(layer)
}

fn load_envelope_point(node: &Element, position_tag: &str, value_tag: &str) -> EnvelopePoint {
    let n = Some(node);
    EnvelopePoint::new(
        read_int(n, position_tag, 0, FieldPolicy::REQUIRED),
        read_int(n, value_tag, 0, FieldPolicy::REQUIRED),
    )
}
