use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::types::RawValue;

/// Known team spellings, tried in order; the first match wins.
static KNOWN_LABELS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)^damen$", "Damen"),
        (r"(?i)^(männliche|maennliche)\s*u18$", "Männliche U18"),
        (r"(?i)^(männliche|maennliche)\s*u16$", "Männliche U16"),
        (r"(?i)^(männliche|maennliche)\s*u16/2$", "Männliche U16/2"),
        (r"(?i)^(männliche|maennliche)\s*u16\s*/\s*2$", "Männliche U16/2"),
        (r"(?i)^weibliche\s*u16$", "Weibliche U16"),
        (r"(?i)^u14\s*offen$", "U14 offen"),
        (r"(?i)^u12\s*offen$", "U12 offen"),
    ]
    .into_iter()
    .map(|(pattern, label)| (Regex::new(pattern).expect("team label pattern must compile"), label))
    .collect()
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));
static AGE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bu([0-9]{1,2})\b").expect("age group pattern must compile"));
static MALE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(männliche|maennliche)").expect("male prefix must compile"));
static FEMALE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^weibliche").expect("female prefix must compile"));
static OPEN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bOffen\b").expect("open token pattern must compile"));

/// Splits a raw team field into normalized labels, deduplicated
/// case-insensitively in first-seen order.
pub fn parse_teams(raw: Option<&RawValue>) -> Vec<String> {
    match raw.and_then(RawValue::to_clean_text) {
        Some(text) => parse_team_list(&text),
        None => Vec::new(),
    }
}

pub fn parse_team_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(|c: char| matches!(c, ',' | '\n' | ';' | '|'))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(normalize_team_label)
        .filter(|label| seen.insert(label.to_lowercase()))
        .collect()
}

pub fn normalize_team_label(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ").into_owned();
    if collapsed.is_empty() {
        return collapsed;
    }

    if let Some((_, label)) = KNOWN_LABELS.iter().find(|(pattern, _)| pattern.is_match(&collapsed)) {
        return (*label).to_string();
    }

    let label = AGE_GROUP.replace_all(&collapsed, "U$1").into_owned();
    let label = capitalize_first(&label);
    let label = MALE_PREFIX.replace(&label, "Männliche").into_owned();
    let label = FEMALE_PREFIX.replace(&label, "Weibliche").into_owned();
    OPEN_TOKEN.replace_all(&label, "offen").into_owned()
}

fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
