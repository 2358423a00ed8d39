//! Company name resolution.

use std::sync::LazyLock;

use regex::Regex;

use super::text::{char_len_within, title_case, MessageText};

static RE_SENDER_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([^.\s>]+)").unwrap());

/// Employers recognized directly in the sender address.
const KNOWN_EMPLOYERS: &[(&str, &str)] = &[
    ("stryker", "Stryker"),
    ("citadel", "Citadel"),
    ("ge aerospace", "GE Aerospace"),
    ("geaerospace", "GE Aerospace"),
    ("google", "Google"),
    ("microsoft", "Microsoft"),
    ("meta", "Meta"),
    ("tesla", "Tesla"),
    ("apple", "Apple"),
    ("amazon", "Amazon"),
    ("netflix", "Netflix"),
];

/// Additional employers recognized only in subject and snippet text.
const TEXT_ONLY_EMPLOYERS: &[(&str, &str)] = &[("uber", "Uber"), ("airbnb", "Airbnb")];

/// Sender domains that say nothing about the employer.
const GENERIC_DOMAINS: &[&str] = &[
    "gmail",
    "googlemail",
    "yahoo",
    "outlook",
    "hotmail",
    "icloud",
    "aol",
    "proton",
    "protonmail",
    "workday",
    "myworkday",
    "myworkdayjobs",
    "greenhouse",
    "greenhouse-mail",
    "lever",
    "hire",
    "talent",
    "ashbyhq",
    "smartrecruiters",
    "icims",
    "jobvite",
    "taleo",
    "eightfold",
    "successfactors",
    "bamboohr",
    "workable",
    "breezy",
    "recruitee",
    "linkedin",
    "indeed",
    "glassdoor",
    "us",
    "email",
    "mail",
    "notifications",
];

/// Markers of automated senders whose display name is not a company.
const AUTOMATED_SENDER_MARKERS: &[&str] = &["noreply", "no-reply", "system", "auto"];

pub fn extract_company(text: &MessageText<'_>) -> Option<String> {
    known_employer_in_sender(text.sender)
        .map(str::to_string)
        .or_else(|| company_from_domain(text.sender))
        .or_else(|| known_employer_in_text(&text.subject_snippet().to_lowercase()))
        .or_else(|| company_from_display_name(text.sender))
}

/// Curated employer whose name appears in the sender address.
pub fn known_employer_in_sender(sender: &str) -> Option<&'static str> {
    let sender = sender.to_lowercase();
    KNOWN_EMPLOYERS
        .iter()
        .find(|(needle, _)| sender.contains(needle))
        .map(|(_, name)| *name)
}

fn company_from_domain(sender: &str) -> Option<String> {
    let domain = RE_SENDER_DOMAIN.captures(sender)?.get(1)?.as_str().to_lowercase();
    if GENERIC_DOMAINS.contains(&domain.as_str()) {
        return None;
    }
    let company = title_case(&domain.replace(['-', '_'], " "));
    char_len_within(&company, 3, 49).then_some(company)
}

fn known_employer_in_text(lowered: &str) -> Option<String> {
    KNOWN_EMPLOYERS
        .iter()
        .chain(TEXT_ONLY_EMPLOYERS)
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, name)| name.to_string())
}

fn company_from_display_name(sender: &str) -> Option<String> {
    let (name, _) = sender.split_once('<')?;
    let name = name.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if name.is_empty() {
        return None;
    }
    let lowered = name.to_lowercase();
    if AUTOMATED_SENDER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return None;
    }
    Some(name.to_string())
}
