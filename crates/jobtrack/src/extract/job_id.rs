//! Job identifiers: requisition numbers, ATS codes and URL ids.

use std::sync::LazyLock;

use regex::Regex;

/// How a pattern's capture becomes the stored id.
#[derive(Debug, Clone, Copy)]
enum IdFormat {
    Verbatim,
    RequisitionR,
    Campus,
}

struct JobIdPattern {
    regex: Regex,
    format: IdFormat,
    /// Captures without a digit are skipped (e.g. "Reference: your").
    needs_digit: bool,
}

static PATTERNS: LazyLock<Vec<JobIdPattern>> = LazyLock::new(|| {
    let pattern = |re: &str, format, needs_digit| JobIdPattern {
        regex: Regex::new(re).unwrap(),
        format,
        needs_digit,
    };
    vec![
        pattern(
            r"(?i)\b(?:job\s*id\s*[:#]|job\s*#|req(?:uisition)?(?:\s*id)?\s*[:#]|position\s*id\s*[:#]|reference(?:\s*(?:id|number|no))?\s*[:#])[\s:#]*([A-Za-z0-9][A-Za-z0-9_-]{2,49})",
            IdFormat::Verbatim,
            true,
        ),
        pattern(r"\bR(\d{4,})\b", IdFormat::RequisitionR, false),
        pattern(r"(?i)\bcampus\s+(\d+)\b", IdFormat::Campus, false),
        pattern(r"(?:jobs/view/|/jobs?/)(\d{5,15})", IdFormat::Verbatim, false),
        pattern(
            r"application\?code=([A-Za-z0-9_-]{10,50})",
            IdFormat::Verbatim,
            false,
        ),
    ]
});

pub fn extract_job_id(text: &str) -> Option<String> {
    PATTERNS.iter().find_map(|p| {
        p.regex
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .find(|id| !p.needs_digit || id.chars().any(|c| c.is_ascii_digit()))
            .map(|id| match p.format {
                IdFormat::Verbatim => id.to_string(),
                IdFormat::RequisitionR => format!("R{}", id),
                IdFormat::Campus => format!("Campus {}", id),
            })
    })
}
