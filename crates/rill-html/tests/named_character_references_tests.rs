//! Integration tests for character reference lookup.

use rill_html::lexer::named_character_references::{
    decode_code_point, longest_legacy_prefix, lookup_entity, lookup_xml_entity,
};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;"), Some("&"));
    assert_eq!(lookup_entity("lt;"), Some("<"));
    assert_eq!(lookup_entity("gt;"), Some(">"));
    assert_eq!(lookup_entity("quot;"), Some("\""));
    assert_eq!(lookup_entity("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp"), Some("&"));
    assert_eq!(lookup_entity("copy"), Some("\u{00A9}"));
    assert_eq!(lookup_entity("eacute"), Some("\u{00E9}"));
    // apos is not a legacy name
    assert_eq!(lookup_entity("apos"), None);
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_multi_character_replacement() {
    assert_eq!(lookup_entity("fjlig;"), Some("fj"));
}

#[test]
fn test_xml_entities() {
    assert_eq!(lookup_xml_entity("apos;"), Some("'"));
    assert_eq!(lookup_xml_entity("amp;"), Some("&"));
    assert_eq!(lookup_xml_entity("amp"), None);
    assert_eq!(lookup_xml_entity("nbsp;"), None);
}

#[test]
fn test_lookup_whatwg_names() {
    assert_eq!(lookup_entity("notin;"), Some("\u{2209}"));
    assert_eq!(lookup_entity("hearts;"), Some("\u{2665}"));
    assert_eq!(lookup_entity("Eacute;"), Some("\u{00C9}"));
    assert_eq!(lookup_entity("CounterClockwiseContourIntegral;"), Some("\u{2233}"));
    // Case matters.
    assert_eq!(lookup_entity("HEARTS;"), None);
}

#[test]
fn test_legacy_prefix_prefers_longest() {
    // "not" and "notin" style collisions resolve to the longest legacy name.
    assert_eq!(longest_legacy_prefix("copyright"), Some((4, "\u{00A9}")));
    assert_eq!(longest_legacy_prefix("ltx"), Some((2, "<")));
}

#[test]
fn test_decode_code_point() {
    assert_eq!(decode_code_point(0x41), 'A');
    assert_eq!(decode_code_point(0x1F600), '\u{1F600}');
    assert_eq!(decode_code_point(0x9F), '\u{0178}');
    assert_eq!(decode_code_point(u32::MAX), '\u{FFFD}');
}
