//! Character reference tables and code point decoding.
//!
//! HTML mode resolves names against [`lookup_entity`], which covers the full
//! WHATWG list; XML mode knows only the five predefined entities
//! ([`lookup_xml_entity`]). Keys carry their trailing `;`. About a hundred
//! historical names are also valid without it ("legacy" references such as
//! `&amp` or `&copy`); those appear a second time without the semicolon.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::entity_table::ENTITIES;

/// Longest legacy reference name, in bytes.
pub const MAX_LEGACY_NAME_LEN: usize = 6;

/// Maps reference names (without the leading `&`) to replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ENTITIES.iter().copied().collect());

/// Look up an HTML character reference by name (without the leading `&`).
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Some("&")
/// lookup_entity("amp")   // Some("&"), legacy form
/// lookup_entity("hellip")  // None, requires the semicolon
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Look up one of the five predefined XML entities.
#[must_use]
pub fn lookup_xml_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp;" => Some("&"),
        "apos;" => Some("'"),
        "gt;" => Some(">"),
        "lt;" => Some("<"),
        "quot;" => Some("\""),
        _ => None,
    }
}

/// Find the longest legacy reference that `name` starts with.
///
/// Returns the matched name's length and its replacement. `&notit` thus
/// resolves to `¬` followed by the literal `it`.
#[must_use]
pub fn longest_legacy_prefix(name: &str) -> Option<(usize, &'static str)> {
    let limit = name.len().min(MAX_LEGACY_NAME_LEN);
    (1..=limit).rev().find_map(|len| {
        let candidate = name.get(..len)?;
        lookup_entity(candidate).map(|value| (len, value))
    })
}

/// Windows-1252 mapping for numeric references in the C1 control range.
///
/// `&#150;` historically means the en dash, not U+0096.
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Turn the value of a numeric character reference into a character.
///
/// Zero, surrogates and anything above U+10FFFF become U+FFFD.
#[must_use]
pub fn decode_code_point(code_point: u32) -> char {
    if let Some(&(_, replacement)) = C1_REPLACEMENTS.iter().find(|(cp, _)| *cp == code_point) {
        return replacement;
    }
    if code_point == 0 {
        return char::REPLACEMENT_CHARACTER;
    }
    char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_code_points_are_replaced() {
        assert_eq!(decode_code_point(0), '\u{FFFD}');
        assert_eq!(decode_code_point(0xD800), '\u{FFFD}');
        assert_eq!(decode_code_point(0xDFFF), '\u{FFFD}');
        assert_eq!(decode_code_point(0x11_0000), '\u{FFFD}');
    }

    #[test]
    fn test_c1_range_uses_windows_1252() {
        assert_eq!(decode_code_point(0x80), '€');
        assert_eq!(decode_code_point(0x96), '–');
        // 0x81 has no Windows-1252 assignment and passes through.
        assert_eq!(decode_code_point(0x81), '\u{81}');
    }

    #[test]
    fn test_table_is_complete() {
        assert_eq!(NAMED_ENTITIES.len(), 2231);
        let legacy = NAMED_ENTITIES.keys().filter(|name| !name.ends_with(';'));
        assert!(legacy.clone().all(|name| name.len() <= MAX_LEGACY_NAME_LEN));
        assert_eq!(legacy.count(), 106);
    }

    #[test]
    fn test_longest_legacy_prefix() {
        assert_eq!(longest_legacy_prefix("notit"), Some((3, "\u{00AC}")));
        assert_eq!(longest_legacy_prefix("ampx"), Some((3, "&")));
        assert_eq!(longest_legacy_prefix("hellip"), None);
        assert_eq!(longest_legacy_prefix(""), None);
    }
}
