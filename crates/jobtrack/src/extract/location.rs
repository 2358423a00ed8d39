//! Job location.

use std::sync::LazyLock;

use regex::Regex;

use super::text::char_len_within;

static RE_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:location\s*:|based in:?|office in:?)\s*([^\n\r.!?]{3,50})").unwrap()
});

// Case-sensitive: "Kalamazoo, MI 49002"
static RE_CITY_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?: [A-Z][a-zA-Z]+)*, [A-Z]{2}(?: \d{5})?)\b").unwrap()
});

const KNOWN_LOCATIONS: &[&str] = &[
    "New York",
    "San Francisco",
    "Los Angeles",
    "Chicago",
    "Boston",
    "Seattle",
    "Austin",
    "Denver",
    "Miami",
    "Portland",
    "Remote",
];

static RE_KNOWN_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = KNOWN_LOCATIONS
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({})\b", alternatives)).unwrap()
});

const REMOTE_MARKERS: &[&str] = &["remote", "work from home", "wfh", "distributed", "anywhere"];

pub const REMOTE: &str = "Remote";

pub fn extract_location(subject_body: &str) -> Option<String> {
    let candidate = RE_LABELLED
        .captures(subject_body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| {
            RE_CITY_STATE
                .captures(subject_body)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .or_else(|| {
            RE_KNOWN_LOCATION
                .captures(subject_body)
                .and_then(|c| c.get(1))
                .and_then(|m| canonical_location(m.as_str()))
                .map(str::to_string)
        });

    if let Some(location) = candidate.filter(|l| char_len_within(l, 3, 99)) {
        return Some(location);
    }

    let lowered = subject_body.to_lowercase();
    REMOTE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        .then(|| REMOTE.to_string())
}

fn canonical_location(matched: &str) -> Option<&'static str> {
    KNOWN_LOCATIONS
        .iter()
        .find(|l| l.eq_ignore_ascii_case(matched))
        .copied()
}
