//! Legacy `rules.featws` text parser
//!
//! The legacy dialect is INI-like with three section kinds:
//!
//! - the *default section*: `key = value` lines before any header,
//!   contributing top-level string entries,
//! - *named sections* `[name]`, collecting their keys as a nested map,
//! - *array sections* `[[name]]`, where every occurrence of the same name
//!   contributes one map to a top-level list.
//!
//! Keys and values are kept as strings. Headers with an additional `[`
//! beyond the array form (`[[[...`) mark a section that is skipped
//! entirely. The parser is only invoked when `rules.json` is absent but a
//! `rules.featws` file exists.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::value::RuleValue;

/// Where the keys currently being collected will land
enum Section {
    Default,
    Named(String),
    Array(String),
    Skipped,
}

/// Parse legacy rule text into a rule-tree map
pub fn parse_rules_file(input: &str) -> Result<BTreeMap<String, RuleValue>> {
    let mut top: BTreeMap<String, RuleValue> = BTreeMap::new();
    let mut arrays: BTreeMap<String, Vec<RuleValue>> = BTreeMap::new();
    let mut section = Section::Default;
    let mut keys: BTreeMap<String, RuleValue> = BTreeMap::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            flush_section(&mut top, &mut arrays, section, keys);
            keys = BTreeMap::new();
            section = parse_header(index + 1, line)?;
            continue;
        }

        // `key = value` contribution; lines without a separator are noise
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                keys.insert(key.to_string(), RuleValue::from(value.trim()));
            }
        }
    }

    flush_section(&mut top, &mut arrays, section, keys);

    for (name, items) in arrays {
        top.insert(name, RuleValue::List(items));
    }

    Ok(top)
}

fn parse_header(line_number: usize, line: &str) -> Result<Section> {
    if line.starts_with("[[[") {
        // Beyond the array form: defensive guard, section is dropped
        return Ok(Section::Skipped);
    }

    if let Some(inner) = line.strip_prefix("[[") {
        let name = inner
            .strip_suffix("]]")
            .ok_or_else(|| malformed(line_number, line))?
            .trim();
        if name.is_empty() {
            return Err(malformed(line_number, line));
        }
        return Ok(Section::Array(name.to_string()));
    }

    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| malformed(line_number, line))?
        .trim();
    if name.is_empty() {
        return Err(malformed(line_number, line));
    }
    Ok(Section::Named(name.to_string()))
}

fn malformed(line: usize, header: &str) -> Error {
    Error::MalformedHeader {
        line,
        header: header.to_string(),
    }
}

fn flush_section(
    top: &mut BTreeMap<String, RuleValue>,
    arrays: &mut BTreeMap<String, Vec<RuleValue>>,
    section: Section,
    keys: BTreeMap<String, RuleValue>,
) {
    match section {
        Section::Default => {
            top.extend(keys);
        }
        Section::Named(name) => {
            top.insert(name, RuleValue::Map(keys));
        }
        Section::Array(name) => {
            arrays.entry(name).or_default().push(RuleValue::Map(keys));
        }
        Section::Skipped => {}
    }
}
