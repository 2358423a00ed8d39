//! RFC 5322 parsing into [`RawMessage`].

use chrono::Utc;
use log::debug;
use mail_parser::{Message, MessageParser};

use super::error::{EmailError, Result};
use super::message::{Headers, RawMessage};

const SNIPPET_CHARS: usize = 200;

/// Parses a raw message.
///
/// The receipt time is taken from `internal_date_ms` (the server's
/// INTERNALDATE) when known, else from the `Date` header, else now.
pub fn raw_message_from_bytes(
    raw: &[u8],
    id: &str,
    thread_id: &str,
    internal_date_ms: Option<i64>,
) -> Result<RawMessage> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| EmailError::ParseError(format!("Failed to parse message {}", id)))?;

    let headers = extract_headers(&message);
    // body_text falls back to a text rendering of the HTML part
    let body = message
        .body_text(0)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();
    let snippet = snippet_of(&body);

    let received_at_ms = internal_date_ms
        .or_else(|| message.date().map(|d| d.to_timestamp() * 1000))
        .unwrap_or_else(|| Utc::now().timestamp_millis());

    debug!(
        "Parsed message id={} subject={:?} body_chars={}",
        id,
        headers.subject(),
        body.chars().count()
    );

    Ok(RawMessage {
        id: id.to_string(),
        thread_id: thread_id.to_string(),
        headers,
        snippet,
        body,
        received_at_ms,
    })
}

fn extract_headers(message: &Message) -> Headers {
    let mut headers = Headers::new();
    if let Some(from) = message.from().and_then(|addr| addr.first()) {
        headers.insert("From", format_address(from));
    }
    if let Some(to) = message.to().and_then(|addr| addr.first()) {
        headers.insert("To", format_address(to));
    }
    if let Some(subject) = message.subject() {
        headers.insert("Subject", subject);
    }
    if let Some(date) = message.date() {
        headers.insert("Date", date.to_rfc822());
    }
    if let Some(message_id) = message.message_id() {
        headers.insert("Message-ID", message_id);
    }
    headers
}

fn format_address(addr: &mail_parser::Addr) -> String {
    match (addr.name(), addr.address()) {
        (Some(name), Some(address)) => format!("{} <{}>", name, address),
        (Some(name), None) => name.to_string(),
        (None, address) => address.unwrap_or_default().to_string(),
    }
}

/// First characters of the body with whitespace runs collapsed.
fn snippet_of(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIRMATION: &str = "From: Stryker Careers <careers@stryker.com>\r\n\
        To: Student <student@example.edu>\r\n\
        Subject: Thank you for applying to 2026 Summer Intern - Software Engineering\r\n\
        Date: Mon, 1 Sep 2025 14:30:00 +0000\r\n\
        Message-ID: <abc123@stryker.com>\r\n\
        Content-Type: text/plain; charset=utf-8\r\n\
        \r\n\
        Hello,\r\n\
        \r\n\
        We have received your application for R12345.\r\n";

    #[test]
    fn test_parses_headers_and_body() {
        let message =
            raw_message_from_bytes(CONFIRMATION.as_bytes(), "42", "42", None).unwrap();
        assert_eq!(message.sender(), "Stryker Careers <careers@stryker.com>");
        assert_eq!(
            message.subject(),
            "Thank you for applying to 2026 Summer Intern - Software Engineering"
        );
        assert!(message.body.contains("R12345"));
        assert_eq!(
            message.snippet,
            "Hello, We have received your application for R12345."
        );
        assert_eq!(message.received_at_ms, 1_756_737_000_000);
    }

    #[test]
    fn test_internal_date_wins_over_header() {
        let message =
            raw_message_from_bytes(CONFIRMATION.as_bytes(), "42", "42", Some(1_000)).unwrap();
        assert_eq!(message.received_at_ms, 1_000);
    }

    #[test]
    fn test_html_only_body_is_converted() {
        let raw = "From: jobs@lever.co\r\n\
            Subject: Interview\r\n\
            Content-Type: text/html; charset=utf-8\r\n\
            \r\n\
            <html><body><p>Please schedule your <b>interview</b></p></body></html>\r\n";
        let message = raw_message_from_bytes(raw.as_bytes(), "1", "1", Some(0)).unwrap();
        assert!(message.body.contains("interview"));
        assert!(!message.body.contains("<b>"));
    }

    #[test]
    fn test_snippet_is_bounded() {
        let body = "word ".repeat(100);
        assert_eq!(snippet_of(&body).chars().count(), SNIPPET_CHARS);
    }
}
