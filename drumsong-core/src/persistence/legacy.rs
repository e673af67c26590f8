//! Reading files from the old writer.
//!
//! The old writer had no XML declaration and escaped every byte >= 0x80 on
//! its own as `&#xHH;`. A conforming parser reads each escape as a separate
//! code point, which turns every multi-byte UTF-8 character into mojibake.
//! Repair swaps each two-digit escape back to the raw byte it stood for,
//! working on bytes so already-valid multi-byte content is left alone.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::bytes::{Captures, Regex};

/// Prefix every file from the current writer starts with.
pub const DECLARATION_PREFIX: &[u8] = b"<?xml";

/// Encoding declared for repaired documents when the locale names none.
pub const DEFAULT_ENCODING: &str = "UTF-8";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Whether `path` was written by the old writer (its first line has no
/// declaration). Unreadable files count as modern; opening them will fail
/// later with a proper error.
pub fn is_legacy_dialect(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };
    let mut first_line = Vec::new();
    if BufReader::new(file).read_until(b'\n', &mut first_line).is_err() {
        return false;
    }
    let first_line = first_line.strip_prefix(UTF8_BOM).unwrap_or(&first_line);

    if first_line.starts_with(DECLARATION_PREFIX) {
        false
    } else {
        log::warn!(target: "persistence::legacy",
            "file '{}' is being read in legacy compatibility mode", path.display());
        true
    }
}

/// Turns `&#xHH;` escapes back into raw bytes.
pub struct LegacyRepairer {
    escape: Regex,
}

impl Default for LegacyRepairer {
    fn default() -> Self {
        Self::new()
    }
}

impl LegacyRepairer {
    pub fn new() -> Self {
        // Exactly two hex digits: only single-byte escapes came from the old writer.
        let escape = Regex::new(r"&#x([0-9A-Fa-f]{2});").expect("escape pattern is valid");
        Self { escape }
    }

    /// Copy of `line` with every two-digit escape replaced by its byte.
    /// Scanning resumes right after each inserted byte, so a decoded `&`
    /// never starts a new escape. Other references are left as they are.
    pub fn repair_line(&self, line: &[u8]) -> Vec<u8> {
        self.escape
            .replace_all(line, |caps: &Captures| {
                let hex = &caps[1];
                [(hex_nibble(hex[0]) << 4) | hex_nibble(hex[1])]
            })
            .into_owned()
    }
}

fn hex_nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Repair a single line. Builds the pattern on each call; use
/// [`LegacyRepairer`] for many lines.
pub fn repair_legacy_escapes(line: &[u8]) -> Vec<u8> {
    LegacyRepairer::new().repair_line(line)
}

/// Build a parseable document from the raw bytes of a legacy file: a
/// declaration naming `encoding`, followed by every line repaired.
pub fn repair_legacy_document(raw: &[u8], encoding: &str) -> Vec<u8> {
    let repairer = LegacyRepairer::new();
    let mut document = format!("<?xml version='1.0' encoding='{}' ?>\n", encoding).into_bytes();
    document.reserve(raw.len());
    for line in raw.split_inclusive(|&b| b == b'\n') {
        document.extend_from_slice(&repairer.repair_line(line));
    }
    document
}

/// Text encoding preferred by the process locale (`LC_ALL`, `LC_CTYPE`,
/// `LANG`, first non-empty wins).
pub fn locale_encoding() -> String {
    let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty());
    encoding_from_locale(locale.as_deref())
}

/// Codeset part of a locale name such as `de_DE.ISO-8859-1@euro`, or
/// [`DEFAULT_ENCODING`] if there is none.
pub fn encoding_from_locale(locale: Option<&str>) -> String {
    let codeset = locale
        .and_then(|l| l.split_once('.'))
        .map(|(_, rest)| rest.split('@').next().unwrap_or(rest))
        .filter(|codeset| !codeset.is_empty());

    match codeset {
        None => DEFAULT_ENCODING.to_string(),
        Some(codeset) if codeset.replace('-', "").eq_ignore_ascii_case("utf8") => {
            DEFAULT_ENCODING.to_string()
        }
        Some(codeset) => codeset.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("&#x{:02X};", b)).collect()
    }

    #[test]
    fn multi_byte_characters_are_rebuilt_verbatim() {
        // 2, 3 and 4 byte UTF-8 sequences
        for ch in ["ф", "♫", "𝄞"] {
            let raw = ch.as_bytes();
            let line = format!("<name>{}</name>\n", escaped(raw));
            let repaired = repair_legacy_escapes(line.as_bytes());
            assert_eq!(repaired, format!("<name>{}</name>\n", ch).into_bytes(), "for {:?}", ch);
        }
    }

    #[test]
    fn lowercase_hex_digits_are_accepted() {
        assert_eq!(repair_legacy_escapes(b"&#xd1;&#x84;"), "ф".as_bytes());
    }

    #[test]
    fn malformed_escapes_are_left_alone() {
        let untouched: [&[u8]; 5] = [b"&#xZZ;", b"&#xD1", b"&#x1;", b"&#x123;", b"&#65;"];
        for input in untouched {
            assert_eq!(repair_legacy_escapes(input), input.to_vec());
        }
    }

    #[test]
    fn decoded_ampersand_does_not_start_a_new_escape() {
        assert_eq!(repair_legacy_escapes(b"&#x26;#x41;"), b"&#x41;".to_vec());
    }

    #[test]
    fn valid_utf8_passes_through() {
        let line = "<author>Zoë &amp; Ψ</author>".as_bytes();
        assert_eq!(repair_legacy_escapes(line), line.to_vec());
    }

    #[test]
    fn document_gets_declaration_and_repaired_lines() {
        let raw = b"<song>\n<name>&#xC3;&#xA9;t&#xC3;&#xA9;</name>\n</song>\n";
        let doc = repair_legacy_document(raw, "UTF-8");
        let text = String::from_utf8(doc).unwrap();
        assert!(text.starts_with("<?xml version='1.0' encoding='UTF-8' ?>\n<song>\n"));
        assert!(text.contains("<name>été</name>"));
    }

    #[test]
    fn encoding_from_locale_names() {
        assert_eq!(encoding_from_locale(None), "UTF-8");
        assert_eq!(encoding_from_locale(Some("C")), "UTF-8");
        assert_eq!(encoding_from_locale(Some("en_US.UTF-8")), "UTF-8");
        assert_eq!(encoding_from_locale(Some("en_US.utf8")), "UTF-8");
        assert_eq!(encoding_from_locale(Some("de_DE.ISO-8859-1@euro")), "ISO-8859-1");
        assert_eq!(encoding_from_locale(Some("fr_FR.")), "UTF-8");
    }

    #[test]
    fn first_line_decides_dialect() {
        let dir = tempfile::tempdir().unwrap();
        let modern = dir.path().join("modern.h2song");
        let legacy = dir.path().join("legacy.h2song");
        let bom = dir.path().join("bom.h2song");
        std::fs::write(&modern, "<?xml version=\"1.0\"?>\n<song/>\n").unwrap();
        std::fs::write(&legacy, "<song>\n</song>\n").unwrap();
        std::fs::write(&bom, b"\xEF\xBB\xBF<?xml version=\"1.0\"?>\n<song/>\n").unwrap();

        assert!(!is_legacy_dialect(&modern));
        assert!(is_legacy_dialect(&legacy));
        assert!(!is_legacy_dialect(&bom));
        assert!(!is_legacy_dialect(&dir.path().join("missing.h2song")));
    }
}
