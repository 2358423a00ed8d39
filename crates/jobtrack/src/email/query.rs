//! Date-bounded search queries in Gmail search syntax, with a rendering as
//! standard IMAP search criteria for other servers.

use std::fmt;

use chrono::{Days, Local, NaiveDate};

/// One search: a half-open date window plus a term expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Inclusive lower bound.
    pub after: NaiveDate,
    /// Exclusive upper bound.
    pub before: NaiveDate,
    pub terms: String,
}

impl SearchQuery {
    pub fn new(after: NaiveDate, before: NaiveDate, terms: impl Into<String>) -> Self {
        Self {
            after,
            before,
            terms: terms.into(),
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.after && date < self.before
    }

    /// The query as RFC 3501 `SEARCH` criteria. Quoted phrases and bare words
    /// become `TEXT`, `from:` becomes `FROM`, `OR` and `AND` keep their
    /// grouping.
    pub fn imap_criteria(&self) -> String {
        let mut criteria = format!(
            "SINCE {} BEFORE {}",
            self.after.format("%d-%b-%Y"),
            self.before.format("%d-%b-%Y")
        );
        let tokens = tokenize(&self.terms);
        let mut parser = TermParser { tokens: &tokens, pos: 0 };
        if let Some(term) = parser.any() {
            criteria.push(' ');
            criteria.push_str(&term.render());
        }
        criteria
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Or,
    And,
    Phrase(String),
}

fn tokenize(terms: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = terms.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' => {
                chars.next();
                tokens.push(if c == '(' { Token::Open } else { Token::Close });
            }
            '"' => {
                chars.next();
                let phrase: String = chars.by_ref().take_while(|&c| c != '"').collect();
                tokens.push(Token::Phrase(phrase));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(match word.as_str() {
                    "OR" => Token::Or,
                    "AND" => Token::And,
                    _ => Token::Phrase(word),
                });
            }
        }
    }
    tokens
}

#[derive(Debug, PartialEq, Eq)]
enum Term {
    Text(String),
    From(String),
    Any(Vec<Term>),
    All(Vec<Term>),
}

impl Term {
    fn render(&self) -> String {
        match self {
            Term::Text(text) => format!("TEXT {}", quote(text)),
            Term::From(sender) => format!("FROM {}", quote(sender)),
            Term::All(terms) => {
                let parts: Vec<String> = terms.iter().map(Term::render).collect();
                format!("({})", parts.join(" "))
            }
            // IMAP OR is binary and prefix.
            Term::Any(terms) => terms
                .iter()
                .rev()
                .map(Term::render)
                .reduce(|rest, first| format!("OR {} {}", first, rest))
                .unwrap_or_default(),
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Recursive descent over `a OR b`, `a AND b`, `a b` and `( ... )`.
struct TermParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl TermParser<'_> {
    fn any(&mut self) -> Option<Term> {
        let mut terms = Vec::new();
        terms.extend(self.all());
        while self.tokens.get(self.pos) == Some(&Token::Or) {
            self.pos += 1;
            terms.extend(self.all());
        }
        collapse(terms, Term::Any)
    }

    fn all(&mut self) -> Option<Term> {
        let mut terms = Vec::new();
        loop {
            match self.tokens.get(self.pos) {
                Some(Token::And) => self.pos += 1,
                Some(Token::Open) | Some(Token::Phrase(_)) => terms.extend(self.atom()),
                _ => break,
            }
        }
        collapse(terms, Term::All)
    }

    fn atom(&mut self) -> Option<Term> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        match token {
            Token::Open => {
                let inner = self.any();
                if self.tokens.get(self.pos) == Some(&Token::Close) {
                    self.pos += 1;
                }
                inner
            }
            Token::Phrase(word) => match word.strip_prefix("from:") {
                Some(sender) if !sender.is_empty() => Some(Term::From(sender.to_string())),
                _ if word.is_empty() => None,
                _ => Some(Term::Text(word.clone())),
            },
            _ => None,
        }
    }
}

fn collapse(mut terms: Vec<Term>, group: fn(Vec<Term>) -> Term) -> Option<Term> {
    match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => Some(group(terms)),
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "after:{} before:{}",
            self.after.format("%Y/%m/%d"),
            self.before.format("%Y/%m/%d")
        )?;
        if !self.terms.trim().is_empty() {
            write!(f, " ({})", self.terms)?;
        }
        Ok(())
    }
}

const QUERY_TERMS: &[&str] = &[
    // Confirmations
    r#""application received" OR "thank you for applying" OR "application submitted""#,
    // Interest replies
    r#""thank you for your interest" OR "received your resume""#,
    // ATS senders
    "from:workday.com OR from:greenhouse.io OR from:lever.co OR from:ashbyhq.com \
     OR from:eightfold.ai OR from:smartrecruiters.com",
    // Internship campaigns
    r#""internship" AND ("summer 2026" OR "software engineer")"#,
    // Interview logistics
    r#""interview" AND ("scheduled" OR "invitation" OR "next step")"#,
    // Job boards
    "from:linkedin.com OR from:indeed.com OR from:glassdoor.com OR from:workatastartup.com",
];

/// The fixed batch of queries run for one window.
///
/// `before` defaults to tomorrow so that mail received today is included.
pub fn job_search_queries(after: NaiveDate, before: Option<NaiveDate>) -> Vec<SearchQuery> {
    let before = before.unwrap_or_else(default_before);
    QUERY_TERMS
        .iter()
        .map(|terms| SearchQuery::new(after, before, *terms))
        .collect()
}

/// Tomorrow in the local time zone.
pub fn default_before() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_renders_gmail_syntax() {
        let query = SearchQuery::new(date(2025, 8, 1), date(2025, 9, 1), "from:lever.co");
        assert_eq!(
            query.to_string(),
            "after:2025/08/01 before:2025/09/01 (from:lever.co)"
        );
    }

    #[test]
    fn test_batch_shares_window() {
        let queries = job_search_queries(date(2025, 8, 1), Some(date(2025, 8, 15)));
        assert_eq!(queries.len(), QUERY_TERMS.len());
        assert!(queries
            .iter()
            .all(|q| q.after == date(2025, 8, 1) && q.before == date(2025, 8, 15)));
    }

    #[test]
    fn test_before_defaults_to_tomorrow() {
        let queries = job_search_queries(date(2025, 8, 1), None);
        let today = Local::now().date_naive();
        assert!(queries[0].before > today);
        assert!(queries[0].contains_date(today));
    }

    #[test]
    fn test_imap_criteria_keep_terms() {
        let window = |terms: &str| SearchQuery::new(date(2025, 8, 1), date(2025, 9, 1), terms);

        assert_eq!(window("").imap_criteria(), "SINCE 01-Aug-2025 BEFORE 01-Sep-2025");
        assert_eq!(
            window("from:lever.co OR from:greenhouse.io OR \"thank you\"").imap_criteria(),
            "SINCE 01-Aug-2025 BEFORE 01-Sep-2025 \
             OR FROM \"lever.co\" OR FROM \"greenhouse.io\" TEXT \"thank you\""
        );
        assert_eq!(
            window(r#""interview" AND ("scheduled" OR "next step")"#).imap_criteria(),
            "SINCE 01-Aug-2025 BEFORE 01-Sep-2025 \
             (TEXT \"interview\" OR TEXT \"scheduled\" TEXT \"next step\")"
        );
    }

    #[test]
    fn test_every_batch_query_maps_to_criteria() {
        for query in job_search_queries(date(2025, 8, 1), Some(date(2025, 9, 1))) {
            let criteria = query.imap_criteria();
            assert!(criteria.starts_with("SINCE 01-Aug-2025 BEFORE 01-Sep-2025 "), "{}", criteria);
            assert!(!criteria.contains("AND"), "{}", criteria);
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let query = SearchQuery::new(date(2025, 8, 1), date(2025, 8, 3), "");
        assert!(query.contains_date(date(2025, 8, 1)));
        assert!(query.contains_date(date(2025, 8, 2)));
        assert!(!query.contains_date(date(2025, 8, 3)));
    }
}
