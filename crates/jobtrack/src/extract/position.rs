//! Position title resolution.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::PositionRuleConfig;

use super::text::{char_len_within, title_case, MessageText};

/// A phrase rule: fires when every phrase occurs in the lower-cased
/// subject and snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRule {
    all_of: Vec<String>,
    title: String,
}

impl PositionRule {
    pub fn new<I, S>(all_of: I, title: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            all_of: all_of
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .collect(),
            title: title.into(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        !self.all_of.is_empty() && self.all_of.iter().all(|p| lowered.contains(p.as_str()))
    }
}

impl From<&PositionRuleConfig> for PositionRule {
    fn from(config: &PositionRuleConfig) -> Self {
        PositionRule::new(&config.all_of, config.title.clone())
    }
}

const BUILTIN_RULES: &[(&[&str], &str)] = &[
    (
        &["applied ai engineer"],
        "Applied AI Engineer Intern - Summer 2026",
    ),
    (
        &["2026 summer intern", "software engineering"],
        "2026 Summer Intern - Software Engineering",
    ),
    (
        &["campus 26", "software engineering"],
        "Campus 26 - Software Engineering Intern",
    ),
    (&["software engineer intern"], "Software Engineer Intern"),
    (&["data scientist intern"], "Data Scientist Intern"),
    (&["product manager intern"], "Product Manager Intern"),
    (&["machine learning", "intern"], "Machine Learning Engineer Intern"),
    (&["full stack", "intern"], "Full Stack Developer Intern"),
];

pub fn builtin_rules() -> Vec<PositionRule> {
    BUILTIN_RULES
        .iter()
        .map(|(all_of, title)| PositionRule::new(all_of.iter(), *title))
        .collect()
}

/// Title keywords looked for in the subject, in order.
const TITLE_KEYWORDS: &[&str] = &[
    "software engineer",
    "developer",
    "intern",
    "internship",
    "analyst",
    "manager",
    "director",
    "consultant",
    "specialist",
    "coordinator",
    "associate",
    "senior",
    "junior",
    "lead",
];

const CONTEXT_CHARS: usize = 20;

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:position|role|opening)\s+for(?:\s+the)?\s*:?\s+([^\n\r.!?]{5,100})",
        r"(?i)\bapplied\s+for(?:\s+the)?\s+([^\n\r.!?]{5,100}?)\s+(?:position|role)\b",
        r"(?i)\btitle:\s*([^\n\r.!?]{5,100})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn extract_position(text: &MessageText<'_>, rules: &[PositionRule]) -> Option<String> {
    let lowered = text.subject_snippet().to_lowercase();
    if let Some(rule) = rules.iter().find(|rule| rule.matches(&lowered)) {
        return Some(rule.title.clone());
    }

    title_in_subject(text.subject).or_else(|| title_from_patterns(&text.subject_body()))
}

fn title_in_subject(subject: &str) -> Option<String> {
    // ASCII lowering keeps byte offsets aligned with the original
    let lowered = subject.to_ascii_lowercase();
    TITLE_KEYWORDS.iter().find_map(|keyword| {
        let byte_pos = lowered.find(keyword)?;
        let chars: Vec<char> = subject.chars().collect();
        let char_pos = subject[..byte_pos].chars().count();
        let start = char_pos.saturating_sub(CONTEXT_CHARS);
        let end = (char_pos + keyword.chars().count() + CONTEXT_CHARS).min(chars.len());
        let context: String = chars[start..end].iter().collect();
        let context = context.trim();

        if context.chars().count() > keyword.chars().count() {
            Some(context.to_string())
        } else {
            Some(title_case(keyword))
        }
    })
}

fn title_from_patterns(text: &str) -> Option<String> {
    TITLE_PATTERNS.iter().find_map(|re| {
        let captured = re.captures(text)?.get(1)?.as_str().trim();
        char_len_within(captured, 5, 100).then(|| captured.to_string())
    })
}
