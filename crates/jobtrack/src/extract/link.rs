//! Status link: the URL most likely to show the application's status.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'()\[\]]+"#).unwrap());

/// ATS and platform hosts preferred over any other link.
const PRIORITY_DOMAINS: &[&str] = &[
    "greenhouse.io",
    "lever.co",
    "ashbyhq.com",
    "workday.com",
    "myworkdayjobs.com",
    "linkedin.com",
    "indeed.com",
    "workatastartup.com",
    "smartrecruiters.com",
    "icims.com",
];

/// Returns the link as written in the message. Parsing only validates it
/// and supplies the host.
pub fn extract_status_link(text: &str) -> Option<String> {
    let urls: Vec<(&str, Url)> = RE_URL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']))
        .filter_map(|candidate| Url::parse(candidate).ok().map(|url| (candidate, url)))
        .filter(|(_, url)| url.host_str().is_some())
        .collect();

    urls.iter()
        .find(|(_, url)| url.host_str().is_some_and(is_priority_host))
        .or_else(|| urls.first())
        .map(|(found, _)| found.to_string())
}

fn is_priority_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    PRIORITY_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_domain_wins() {
        let text = "Unsubscribe: https://mail.example.com/u?id=1\n\
                    Track it at https://boards.greenhouse.io/acme/jobs/123.";
        assert_eq!(
            extract_status_link(text).as_deref(),
            Some("https://boards.greenhouse.io/acme/jobs/123")
        );
    }

    #[test]
    fn test_first_url_fallback() {
        let text = "See https://acme.com/careers, or https://acme.com/faq";
        assert_eq!(
            extract_status_link(text).as_deref(),
            Some("https://acme.com/careers")
        );
    }

    #[test]
    fn test_lookalike_host_is_not_priority() {
        let text = "https://first.example.org/a https://notlever.co/x";
        assert_eq!(
            extract_status_link(text).as_deref(),
            Some("https://first.example.org/a")
        );
    }

    #[test]
    fn test_link_is_kept_as_written() {
        assert_eq!(
            extract_status_link("See https://acme.com now").as_deref(),
            Some("https://acme.com")
        );
        assert_eq!(
            extract_status_link("Status: https://Careers.Acme.com/Jobs?id=1.").as_deref(),
            Some("https://Careers.Acme.com/Jobs?id=1")
        );
    }

    #[test]
    fn test_mixed_case_priority_host() {
        let text = "https://acme.com/home and https://Boards.Greenhouse.IO/acme/jobs/9";
        assert_eq!(
            extract_status_link(text).as_deref(),
            Some("https://Boards.Greenhouse.IO/acme/jobs/9")
        );
    }

    #[test]
    fn test_no_urls() {
        assert_eq!(extract_status_link("no links here"), None);
        assert_eq!(extract_status_link("broken http:// link"), None);
    }
}
