//! Document primitives: opening/saving a document tree, and typed field
//! access with default fallback.
//!
//! Numbers are written with Rust's `Display` and read with `str::parse`, both
//! of which always use `.` as the decimal separator and no grouping, so files
//! are portable between hosts with different locale conventions.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use xmltree::{Element, EmitterConfig, ParserConfig, XMLNode};

use super::error::CodecError;
use super::legacy;

/// When a missing or empty field is worth a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    /// An empty element is an ordinary value (free text), not a defect.
    pub can_be_empty: bool,
    /// The element is expected in every file version.
    pub should_exist: bool,
}

impl FieldPolicy {
    /// Present in every file, always with content.
    pub const REQUIRED: Self = Self {
        can_be_empty: false,
        should_exist: true,
    };
    /// Present in every file, possibly empty.
    pub const TEXT: Self = Self {
        can_be_empty: true,
        should_exist: true,
    };
    /// Added in a later file version; older files lack it.
    pub const OPTIONAL: Self = Self {
        can_be_empty: false,
        should_exist: false,
    };
    /// Later addition that may also be empty.
    pub const OPTIONAL_TEXT: Self = Self {
        can_be_empty: true,
        should_exist: false,
    };
}

/// Read and parse `path`, repairing the legacy dialect first if needed.
pub fn open_document(path: &Path) -> Result<Element, CodecError> {
    let is_legacy = legacy::is_legacy_dialect(path);
    let bytes = fs::read(path).map_err(|e| CodecError::io(path, e))?;

    let parsed = if is_legacy {
        let repaired = legacy::repair_legacy_document(&bytes, &legacy::locale_encoding());
        parse_element(repaired.as_slice())
    } else {
        parse_element(bytes.as_slice())
    };

    parsed.map_err(|e| CodecError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Whitespace-only text is kept as text, so a field holding only spaces
/// reads back unchanged.
fn parse_element(bytes: &[u8]) -> Result<Element, xmltree::ParseError> {
    Element::parse_with_config(bytes, ParserConfig::new().whitespace_to_characters(true))
}

/// Serialize `root` (with declaration, indented) to `path`.
///
/// Overwrites in place: a failure part-way may leave a truncated file behind.
/// The result is checked to be non-empty once the handle is closed.
pub fn save_document(path: &Path, root: &Element) -> Result<(), CodecError> {
    let file = File::create(path).map_err(|e| CodecError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    root.write_with_config(&mut writer, EmitterConfig::new().perform_indent(true))
        .map_err(|e| CodecError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    writer.flush().map_err(|e| CodecError::io(path, e))?;
    drop(writer);

    let size = fs::metadata(path).map_err(|e| CodecError::io(path, e))?.len();
    if size == 0 {
        return Err(CodecError::EmptyOutput {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

// ============================================================
// Reading
// ============================================================

/// Child elements of `node` named `name`, in document order.
pub fn children<'a>(node: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    node.children
        .iter()
        .filter_map(move |child| match child {
            XMLNode::Element(e) if e.name == name => Some(e),
            _ => None,
        })
}

/// Text of the child `name`, or `None` (with a warning per `policy`) when it
/// is absent or empty.
fn field_text(node: Option<&Element>, name: &str, policy: FieldPolicy) -> Option<String> {
    match node.and_then(|n| n.get_child(name)) {
        Some(element) => {
            let text = element.get_text().map(|t| t.into_owned()).unwrap_or_default();
            if text.is_empty() {
                if !policy.can_be_empty {
                    log::warn!(target: "persistence", "node '{}' is empty", name);
                }
                None
            } else {
                Some(text)
            }
        }
        None => {
            if policy.should_exist {
                log::warn!(target: "persistence", "node '{}' is not found", name);
            }
            None
        }
    }
}

fn read_parsed<T>(node: Option<&Element>, name: &str, default: T, policy: FieldPolicy) -> T
where
    T: FromStr + Display,
{
    let Some(text) = field_text(node, name, policy) else {
        log::debug!(target: "persistence", "using default value '{}' for node '{}'", default, name);
        return default;
    };
    match text.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!(target: "persistence",
                "node '{}' has malformed value '{}', using default '{}'", name, text, default);
            default
        }
    }
}

pub fn read_string(node: Option<&Element>, name: &str, default: &str, policy: FieldPolicy) -> String {
    match field_text(node, name, policy) {
        Some(text) => text,
        None => {
            log::debug!(target: "persistence", "using default value '{}' for node '{}'", default, name);
            default.to_string()
        }
    }
}

pub fn read_float(node: Option<&Element>, name: &str, default: f32, policy: FieldPolicy) -> f32 {
    read_parsed(node, name, default, policy)
}

pub fn read_int(node: Option<&Element>, name: &str, default: i32, policy: FieldPolicy) -> i32 {
    read_parsed(node, name, default, policy)
}

/// Only the literal `true` reads as true; any other content is false.
pub fn read_bool(node: Option<&Element>, name: &str, default: bool, policy: FieldPolicy) -> bool {
    match field_text(node, name, policy) {
        Some(text) => text == "true",
        None => {
            log::debug!(target: "persistence", "using default value '{}' for node '{}'", default, name);
            default
        }
    }
}

// ============================================================
// Writing
// ============================================================

pub fn write_string(parent: &mut Element, name: &str, text: &str) {
    let mut element = Element::new(name);
    if !text.is_empty() {
        element.children.push(XMLNode::Text(text.to_string()));
    }
    parent.children.push(XMLNode::Element(element));
}

pub fn write_bool(parent: &mut Element, name: &str, value: bool) {
    write_string(parent, name, if value { "true" } else { "false" });
}

/// Write a number (or any `Display` value) in its locale-independent form.
pub fn write_value<T: Display>(parent: &mut Element, name: &str, value: T) {
    write_string(parent, name, &value.to_string());
}

pub fn append(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Element {
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn present_fields_are_parsed() {
        let root = parse("<song><bpm>128.5</bpm><id>7</id><name>Demo</name><loop>true</loop></song>");
        let node = Some(&root);
        assert_eq!(read_float(node, "bpm", 120.0, FieldPolicy::REQUIRED), 128.5);
        assert_eq!(read_int(node, "id", -1, FieldPolicy::REQUIRED), 7);
        assert_eq!(read_string(node, "name", "x", FieldPolicy::REQUIRED), "Demo");
        assert!(read_bool(node, "loop", false, FieldPolicy::REQUIRED));
    }

    #[test]
    fn missing_and_empty_fields_use_default() {
        let root = parse("<song><name></name><empty/></song>");
        let node = Some(&root);
        assert_eq!(read_string(node, "name", "Untitled", FieldPolicy::TEXT), "Untitled");
        assert_eq!(read_float(node, "empty", 0.25, FieldPolicy::REQUIRED), 0.25);
        assert_eq!(read_int(node, "absent", 42, FieldPolicy::OPTIONAL), 42);
        assert!(read_bool(node, "absent", true, FieldPolicy::OPTIONAL));
    }

    #[test]
    fn absent_node_uses_default() {
        assert_eq!(read_int(None, "id", 3, FieldPolicy::REQUIRED), 3);
        assert_eq!(read_string(None, "name", "n", FieldPolicy::REQUIRED), "n");
    }

    #[test]
    fn malformed_numbers_use_default() {
        let root = parse("<song><bpm>fast</bpm><id>1.5</id><vol>0,5</vol></song>");
        let node = Some(&root);
        assert_eq!(read_float(node, "bpm", 120.0, FieldPolicy::REQUIRED), 120.0);
        assert_eq!(read_int(node, "id", -1, FieldPolicy::REQUIRED), -1);
        assert_eq!(read_float(node, "vol", 1.0, FieldPolicy::REQUIRED), 1.0);
    }

    #[test]
    fn bool_is_literal_true_only() {
        let root = parse("<n><a>TRUE</a><b>1</b><c>false</c><d>true</d></n>");
        let node = Some(&root);
        assert!(!read_bool(node, "a", true, FieldPolicy::REQUIRED));
        assert!(!read_bool(node, "b", true, FieldPolicy::REQUIRED));
        assert!(!read_bool(node, "c", true, FieldPolicy::REQUIRED));
        assert!(read_bool(node, "d", false, FieldPolicy::REQUIRED));
    }

    #[test]
    fn written_numbers_use_decimal_point_and_read_back_exactly() {
        let mut root = Element::new("n");
        let values = [0.5f32, 0.1, 1e-7, 123456.78, -3.25, 120.0];
        for (i, v) in values.iter().enumerate() {
            write_value(&mut root, &format!("v{}", i), v);
        }
        write_value(&mut root, "i", -42);
        write_bool(&mut root, "b", false);

        assert_eq!(root.get_child("v0").and_then(|e| e.get_text()).as_deref(), Some("0.5"));
        assert_eq!(root.get_child("v5").and_then(|e| e.get_text()).as_deref(), Some("120"));

        let mut bytes = Vec::new();
        root.write(&mut bytes).unwrap();
        let reparsed = Element::parse(bytes.as_slice()).unwrap();
        for (i, v) in values.iter().enumerate() {
            let read = read_float(Some(&reparsed), &format!("v{}", i), f32::NAN, FieldPolicy::REQUIRED);
            assert_eq!(read, *v);
        }
        assert_eq!(read_int(Some(&reparsed), "i", 0, FieldPolicy::REQUIRED), -42);
        assert!(!read_bool(Some(&reparsed), "b", true, FieldPolicy::REQUIRED));
    }

    #[test]
    fn children_filters_by_name_in_order() {
        let root = parse("<l><g>1</g><x/><g>2</g></l>");
        let texts: Vec<String> = children(&root, "g")
            .map(|e| e.get_text().unwrap_or_default().into_owned())
            .collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn save_and_open_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        let mut root = Element::new("song");
        write_string(&mut root, "name", "Ünïcødé ♫");
        save_document(&path, &root).unwrap();

        let head = std::fs::read(&path).unwrap();
        assert!(head.starts_with(b"<?xml"));

        let opened = open_document(&path).unwrap();
        assert_eq!(opened.name, "song");
        assert_eq!(read_string(Some(&opened), "name", "", FieldPolicy::REQUIRED), "Ünïcødé ♫");
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_document(&dir.path().join("nope.h2song")).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
    }

    #[test]
    fn open_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        std::fs::write(&path, "<?xml version=\"1.0\"?>\n<song><bpm>1</song>").unwrap();
        let err = open_document(&path).unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xml");
        let err = save_document(&path, &Element::new("song")).unwrap_err();
        assert!(matches!(err, CodecError::Io { .. }));
    }
}
