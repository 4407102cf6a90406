use std::collections::BTreeMap;

use featws_rules::{parse_rules_file, Error, RuleValue};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn map(entries: &[(&str, &str)]) -> RuleValue {
    RuleValue::Map(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), RuleValue::from(*v)))
            .collect(),
    )
}

#[test]
fn default_section_contributes_top_level_strings() {
    let parsed = parse_rules_file("foo = 1\nbar = off\n").unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("foo".to_string(), RuleValue::from("1"));
    expected.insert("bar".to_string(), RuleValue::from("off"));
    assert_eq!(parsed, expected);
}

#[test]
fn named_section_collects_nested_map() {
    let parsed = parse_rules_file("[limits]\nmin = 1\nmax = 10\n").unwrap();

    assert_eq!(
        parsed.get("limits"),
        Some(&map(&[("min", "1"), ("max", "10")]))
    );
}

#[test]
fn array_sections_collect_into_a_list() {
    let parsed = parse_rules_file("[[tier]]\nx = 1\n\n[[tier]]\nx = 2\n").unwrap();

    assert_eq!(
        parsed.get("tier"),
        Some(&RuleValue::List(vec![
            map(&[("x", "1")]),
            map(&[("x", "2")]),
        ]))
    );
}

#[test]
fn mixed_document_round_trips_all_three_section_kinds() {
    let text = "foo = 1\n\n[s]\nk = v\n\n[[a]]\nx = 1\n\n[[a]]\nx = 2\n";
    let parsed = parse_rules_file(text).unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("foo".to_string(), RuleValue::from("1"));
    expected.insert("s".to_string(), map(&[("k", "v")]));
    expected.insert(
        "a".to_string(),
        RuleValue::List(vec![map(&[("x", "1")]), map(&[("x", "2")])]),
    );
    assert_eq!(parsed, expected);
}

#[test]
fn triple_bracket_sections_are_skipped() {
    let parsed = parse_rules_file("[[[broken]]]\nx = 1\n\n[kept]\ny = 2\n").unwrap();

    assert!(!parsed.contains_key("broken"));
    assert!(!parsed.contains_key("[broken]"));
    assert_eq!(parsed.get("kept"), Some(&map(&[("y", "2")])));
}

#[test]
fn values_stay_strings() {
    let parsed = parse_rules_file("n = 42\nb = true\n").unwrap();

    assert_eq!(parsed.get("n"), Some(&RuleValue::from("42")));
    assert_eq!(parsed.get("b"), Some(&RuleValue::from("true")));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let parsed = parse_rules_file("# comment\n; also a comment\n\nfoo = 1\n").unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get("foo"), Some(&RuleValue::from("1")));
}

#[test]
fn lines_without_separator_are_noise() {
    let parsed = parse_rules_file("not a key value line\nfoo = 1\n").unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn repeated_named_sections_follow_last_writer_wins() {
    let parsed = parse_rules_file("[s]\nk = old\n\n[s]\nk = new\n").unwrap();
    assert_eq!(parsed.get("s"), Some(&map(&[("k", "new")])));
}

#[rstest]
#[case("[unclosed\nk = v\n")]
#[case("[[unclosed]\nk = v\n")]
#[case("[]\n")]
#[case("[[ ]]\n")]
fn malformed_headers_are_rejected(#[case] text: &str) {
    let err = parse_rules_file(text).unwrap_err();
    assert!(matches!(err, Error::MalformedHeader { .. }));
}

#[test]
fn whitespace_around_keys_and_values_is_trimmed() {
    let parsed = parse_rules_file("  foo   =   bar baz  \n").unwrap();
    assert_eq!(parsed.get("foo"), Some(&RuleValue::from("bar baz")));
}
