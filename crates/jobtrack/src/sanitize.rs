//! Helpers for sanitizing data before it enters tracing span attributes.
//!
//! Mailbox addresses and local paths stay out of logs; spans carry only the
//! parts needed to correlate a run.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Masks the local part of every email address in `value`, keeping the
/// domain so the sending platform is still visible.
///
/// - `Jane Doe <jane.doe@gmail.com>` → `Jane Doe <j***@gmail.com>`
/// - `no-reply@us.greenhouse-mail.io` → `n***@us.greenhouse-mail.io`
pub fn redact_address(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, token) in value.split(' ').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&redact_token(token));
    }
    out
}

fn redact_token(token: &str) -> String {
    let Some(at) = token.find('@') else {
        return token.to_string();
    };

    // Keep wrapping characters such as `<` or `"` untouched
    let start = token[..at]
        .rfind(|c: char| c == '<' || c == '"' || c == '(')
        .map(|i| i + 1)
        .unwrap_or(0);
    let local = &token[start..at];
    let Some(first) = local.chars().next() else {
        return token.to_string();
    };

    format!("{}{}***{}", &token[..start], first, &token[at..])
}
