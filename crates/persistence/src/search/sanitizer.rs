//! Free-text search term sanitization.
//!
//! Raw search terms never reach the backend as written. A term is trimmed,
//! lowercased and classified by two matchers, tried in order:
//!
//! 1. **Plain**: whitespace separated words with hyphen runs directly after
//!    a word character (`dog`, `dog cat`, `e-mail`). Each word `w` expands
//!    to `w OR w* OR *w`; several words are joined with `AND`.
//! 2. **Wildcard**: plain words that may also carry `*` wildcards
//!    (`dog*`, `*dog`, `d*g`). The term passes through unchanged.
//!
//! Standalone boolean connector words (`AND`, `OR`, `TO`) are rejected by
//! both matchers in any letter case. The resulting expression is parsed
//! into a [`TextQuery`] tree before it is handed out, so every expression
//! that leaves this module is syntactically valid.
//!
//! ```
//! use codelist_persistence::search::QueryTermSanitizer;
//!
//! let sanitizer = QueryTermSanitizer::new();
//! let query = sanitizer.sanitize("Dog Cat").unwrap();
//! assert_eq!(
//!     query.expression(),
//!     "(dog OR dog* OR *dog) AND (cat OR cat* OR *cat)"
//! );
//! assert!(sanitizer.sanitize("dog AND cat").is_err());
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::QueryError;

const CONNECTORS: [&str; 3] = ["and", "or", "to"];

/// Word runs and whitespace, each hyphen run directly after a word run.
const PLAIN_PATTERN: &str = r"^(?:\s|\w+-*)+$";

fn plain_re() -> &'static Regex {
    static PLAIN_RE: OnceLock<Regex> = OnceLock::new();
    PLAIN_RE.get_or_init(|| Regex::new(PLAIN_PATTERN).expect("plain term regex must compile"))
}

/// Unicode `\w`: alphabetic, marks, decimal digits, connector punctuation
/// and join controls.
fn word_char_re() -> &'static Regex {
    static WORD_CHAR_RE: OnceLock<Regex> = OnceLock::new();
    WORD_CHAR_RE.get_or_init(|| Regex::new(r"^\w$").expect("word character regex must compile"))
}

fn word_run_re() -> &'static Regex {
    static WORD_RUN_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RUN_RE.get_or_init(|| Regex::new(r"\w+").expect("word run regex must compile"))
}

/// Returns true for characters matched by a Unicode-aware `\w`.
pub(crate) fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    word_char_re().is_match(c.encode_utf8(&mut buf))
}

/// Escapes text for inclusion in logs and client-facing messages.
pub fn escape_for_diagnostics(raw: &str) -> String {
    html_escape::encode_double_quoted_attribute(raw).into_owned()
}

/// Classifies raw terms and rewrites them into safe query expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTermSanitizer;

impl QueryTermSanitizer {
    /// Creates a new sanitizer.
    pub fn new() -> Self {
        Self
    }

    /// Sanitizes a raw search term.
    ///
    /// Fails with [`QueryError::InvalidQuery`] when the term matches neither
    /// pattern or the resulting expression does not parse. The error carries
    /// the HTML-escaped term only.
    pub fn sanitize(&self, raw: &str) -> Result<TextQuery, QueryError> {
        let term = raw.trim().to_lowercase();

        let expression = if is_plain(&term) {
            Some(expand_plain(&term))
        } else if is_wildcard(&term) {
            Some(term)
        } else {
            None
        };

        let parsed = expression.and_then(|expression| {
            let root = Parser::new(&expression).parse()?;
            Some(TextQuery { expression, root })
        });

        parsed.ok_or_else(|| {
            let escaped = escape_for_diagnostics(raw);
            debug!(term = %escaped, "Free-text query disqualified");
            QueryError::InvalidQuery { term: escaped }
        })
    }
}

/// A sanitized, parsed free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    expression: String,
    root: Expr,
}

impl TextQuery {
    /// The query-string expression sent to the backend.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The parsed expression tree.
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Evaluates the query against a text value.
    ///
    /// Text is split into lowercase word tokens. Terms without wildcards
    /// match a consecutive run of tokens; wildcard terms match one token.
    pub fn matches(&self, text: &str) -> bool {
        let tokens = tokenize(text);
        self.root.matches(&tokens)
    }
}

impl fmt::Display for TextQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Parsed free-text expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A term, possibly containing `*` wildcards.
    Term(String),
    /// All children must match.
    And(Vec<Expr>),
    /// Any child must match.
    Or(Vec<Expr>),
}

impl Expr {
    fn matches(&self, tokens: &[String]) -> bool {
        match self {
            Expr::Term(term) if term.contains('*') => {
                tokens.iter().any(|token| wildcard_match(term, token))
            }
            Expr::Term(term) => {
                let words = tokenize(term);
                !words.is_empty() && tokens.windows(words.len()).any(|w| w == words.as_slice())
            }
            Expr::And(children) => children.iter().all(|c| c.matches(tokens)),
            Expr::Or(children) => children.iter().any(|c| c.matches(tokens)),
        }
    }
}

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_run_re()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

fn has_connector(term: &str) -> bool {
    term.split_whitespace()
        .any(|token| CONNECTORS.iter().any(|c| token.eq_ignore_ascii_case(c)))
}

/// Plain matcher: words, whitespace, and hyphen runs preceded by a word
/// character.
fn is_plain(term: &str) -> bool {
    !has_connector(term) && plain_re().is_match(term)
}

/// Wildcard matcher: the plain alphabet plus `*` that is either not after
/// another `*` and followed by a word character or hyphen, or after a word
/// character or hyphen and not followed by `*`. Hyphen runs may also follow
/// a `*`.
fn is_wildcard(term: &str) -> bool {
    if term.is_empty() || has_connector(term) {
        return false;
    }
    let chars: Vec<char> = term.chars().collect();
    chars.iter().enumerate().all(|(i, &c)| {
        if is_word_char(c) || c.is_whitespace() {
            return true;
        }
        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        match c {
            '-' => hyphen_run_start(&chars, i).is_some_and(|p| is_word_char(p) || p == '*'),
            '*' => {
                let leading =
                    prev != Some('*') && next.is_some_and(|n| is_word_char(n) || n == '-');
                let trailing =
                    prev.is_some_and(|p| is_word_char(p) || p == '-') && next != Some('*');
                leading || trailing
            }
            _ => false,
        }
    })
}

/// Returns the character before the hyphen run containing position `i`.
fn hyphen_run_start(chars: &[char], i: usize) -> Option<char> {
    chars[..i].iter().rev().find(|&&c| c != '-').copied()
}

fn expand_plain(term: &str) -> String {
    let words: Vec<&str> = term.split_whitespace().collect();
    if words.len() == 1 {
        let w = words[0];
        format!("{w} OR {w}* OR *{w}")
    } else {
        words
            .iter()
            .map(|w| format!("({w} OR {w}* OR *{w})"))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    LParen,
    RParen,
    And,
    Or,
    Word(String),
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.consume_char();
        }
    }

    fn next_tok(&mut self) -> Option<Tok> {
        self.skip_ws();
        match self.peek_char()? {
            '(' => {
                self.consume_char();
                Some(Tok::LParen)
            }
            ')' => {
                self.consume_char();
                Some(Tok::RParen)
            }
            _ => self.lex_word(),
        }
    }

    fn lex_word(&mut self) -> Option<Tok> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }
            self.consume_char();
        }
        let raw = &self.input[start..self.pos];
        // operators are case sensitive, lowercase words are plain terms
        match raw {
            "AND" => Some(Tok::And),
            "OR" => Some(Tok::Or),
            _ => Some(Tok::Word(raw.to_string())),
        }
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Tok>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    fn parse(mut self) -> Option<Expr> {
        let expr = self.parse_or()?;
        if self.peek().is_some() {
            return None;
        }
        Some(expr)
    }

    fn peek(&mut self) -> Option<&Tok> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_tok();
        }
        self.peeked.as_ref()
    }

    fn next(&mut self) -> Option<Tok> {
        if let Some(tok) = self.peeked.take() {
            return Some(tok);
        }
        self.lexer.next_tok()
    }

    /// Adjacent clauses without an operator combine with OR.
    fn parse_or(&mut self) -> Option<Expr> {
        let mut children = vec![self.parse_and()?];
        loop {
            match self.peek() {
                Some(Tok::Or) => {
                    self.next();
                    children.push(self.parse_and()?);
                }
                Some(Tok::LParen) | Some(Tok::Word(_)) => children.push(self.parse_and()?),
                _ => break,
            }
        }
        Some(collapse(children, Expr::Or))
    }

    fn parse_and(&mut self) -> Option<Expr> {
        let mut children = vec![self.parse_primary()?];
        while matches!(self.peek(), Some(Tok::And)) {
            self.next();
            children.push(self.parse_primary()?);
        }
        Some(collapse(children, Expr::And))
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        match self.next()? {
            Tok::LParen => {
                let inner = self.parse_or()?;
                match self.next()? {
                    Tok::RParen => Some(inner),
                    _ => None,
                }
            }
            Tok::Word(word) => Some(Expr::Term(word)),
            Tok::RParen | Tok::And | Tok::Or => None,
        }
    }
}

fn collapse(mut children: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if children.len() == 1 {
        children.remove(0)
    } else {
        wrap(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(raw: &str) -> Result<TextQuery, QueryError> {
        QueryTermSanitizer::new().sanitize(raw)
    }

    fn term(s: &str) -> Expr {
        Expr::Term(s.to_string())
    }

    #[test]
    fn test_single_plain_word() {
        let query = sanitize("dog").unwrap();
        assert_eq!(query.expression(), "dog OR dog* OR *dog");
        assert_eq!(
            query.root(),
            &Expr::Or(vec![term("dog"), term("dog*"), term("*dog")])
        );
    }

    #[test]
    fn test_multi_word_plain_keeps_order() {
        let query = sanitize("dog cat").unwrap();
        assert_eq!(
            query.expression(),
            "(dog OR dog* OR *dog) AND (cat OR cat* OR *cat)"
        );
        match query.root() {
            Expr::And(children) => {
                assert_eq!(children.len(), 2);
                assert_eq!(
                    children[1],
                    Expr::Or(vec![term("cat"), term("cat*"), term("*cat")])
                );
            }
            other => panic!("expected AND, got {:?}", other),
        }
    }

    #[test]
    fn test_trims_and_lowercases() {
        let query = sanitize("  Helsinki  ").unwrap();
        assert_eq!(query.expression(), "helsinki OR helsinki* OR *helsinki");
    }

    #[test]
    fn test_unicode_words_are_plain() {
        let query = sanitize("Äänekoski").unwrap();
        assert_eq!(query.expression(), "äänekoski OR äänekoski* OR *äänekoski");
    }

    #[test]
    fn test_combining_marks_are_word_characters() {
        let query = sanitize("cafe\u{301}").unwrap();
        assert_eq!(
            query.expression(),
            "cafe\u{301} OR cafe\u{301}* OR *cafe\u{301}"
        );
        assert!(query.matches("Cafe\u{301} Helsinki"));

        let query = sanitize("हिन्दी").unwrap();
        assert_eq!(query.expression(), "हिन्दी OR हिन्दी* OR *हिन्दी");
        assert!(sanitize("हिन्दी*").is_ok());
    }

    #[test]
    fn test_connector_punctuation_is_word_character() {
        assert!(sanitize("a\u{203f}b").is_ok());
        assert!(sanitize("snake_case").is_ok());
    }

    #[test]
    fn test_internal_hyphen_is_plain() {
        let query = sanitize("e-mail").unwrap();
        assert_eq!(query.expression(), "e-mail OR e-mail* OR *e-mail");
        assert!(sanitize("dog-").is_ok());
    }

    #[test]
    fn test_leading_hyphen_rejected() {
        assert!(sanitize("-dog").is_err());
        assert!(sanitize("dog -cat").is_err());
    }

    #[test]
    fn test_connectors_rejected() {
        for raw in ["dog AND cat", "dog or cat", "TO", "and", "a To b", "dog*  OR  cat"] {
            assert!(
                matches!(sanitize(raw), Err(QueryError::InvalidQuery { .. })),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_connector_inside_word_allowed() {
        assert!(sanitize("sandor").is_ok());
        assert!(sanitize("toto").is_ok());
        assert!(sanitize("or-ange").is_ok());
    }

    #[test]
    fn test_wildcards_pass_through() {
        for raw in ["dog*", "*dog", "d*g", "*dog*", "dog* cat"] {
            let query = sanitize(raw).unwrap();
            assert_eq!(query.expression(), raw);
        }
    }

    #[test]
    fn test_wildcard_implicit_or() {
        let query = sanitize("dog* cat").unwrap();
        assert_eq!(query.root(), &Expr::Or(vec![term("dog*"), term("cat")]));
    }

    #[test]
    fn test_bad_wildcards_rejected() {
        for raw in ["*", "**dog", "dog**", "* dog", "dog *", "-*"] {
            assert!(sanitize(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_syntax_characters_rejected() {
        for raw in ["dog)", "(dog", "dog:cat", "dog~2", "\"dog\"", "dog^2", "a+b", ""] {
            assert!(sanitize(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_error_is_escaped() {
        let err = sanitize("<script>").unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidQuery {
                term: "&lt;script&gt;".to_string()
            }
        );
    }

    #[test]
    fn test_matches_prefix_and_suffix() {
        let query = sanitize("kunta").unwrap();
        assert!(query.matches("Kunta"));
        assert!(query.matches("Kuntajako 2018"));
        assert!(query.matches("Hyvinvointialuekunta"));
        assert!(!query.matches("Maakunnat"));
    }

    #[test]
    fn test_matches_all_words() {
        let query = sanitize("dog cat").unwrap();
        assert!(query.matches("Cats and dogs"));
        assert!(!query.matches("dogs only"));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("d*g", "doug"));
        assert!(wildcard_match("*dog", "hotdog"));
        assert!(wildcard_match("dog*", "dog"));
        assert!(!wildcard_match("dog*", "hotdog"));
    }
}
