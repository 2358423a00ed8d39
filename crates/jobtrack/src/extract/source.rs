//! Application source: the platform or ATS the message came through.

use super::text::contains_word;

/// Platform domains and their display names.
pub const PLATFORMS: &[(&str, &str)] = &[
    ("linkedin.com", "LinkedIn"),
    ("indeed.com", "Indeed"),
    ("glassdoor.com", "Glassdoor"),
    ("workatastartup.com", "Y Combinator"),
    ("angel.co", "AngelList"),
    ("greenhouse.io", "Greenhouse"),
    ("lever.co", "Lever"),
    ("ashbyhq.com", "Ashby"),
    ("eightfold.ai", "EightFold"),
    ("workday.com", "Workday"),
    ("myworkday.com", "Workday"),
    ("smartrecruiters.com", "SmartRecruiters"),
    ("icims.com", "iCIMS"),
    ("jobvite.com", "Jobvite"),
    ("taleo.net", "Taleo"),
];

pub const DIRECT_APPLICATION: &str = "Direct Application";

const DIRECT_PHRASES: &[&str] = &[
    "company website",
    "career page",
    "careers page",
    "careers site",
];

pub fn extract_source(sender: &str, body: &str) -> Option<String> {
    let sender = sender.to_lowercase();
    if let Some((_, name)) = PLATFORMS.iter().find(|(domain, _)| sender.contains(domain)) {
        return Some(name.to_string());
    }

    let body = body.to_lowercase();
    if let Some((_, name)) = PLATFORMS
        .iter()
        .find(|(domain, _)| contains_word(&body, platform_stem(domain)))
    {
        return Some(name.to_string());
    }

    DIRECT_PHRASES
        .iter()
        .any(|phrase| body.contains(phrase))
        .then(|| DIRECT_APPLICATION.to_string())
}

/// `linkedin.com` → `linkedin`
fn platform_stem(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}
