//! JSON rendering for the sample grain column
//!
//! [`format_payload`] pretty-prints a payload and folds short arrays of
//! primitives onto one line; [`highlight`] splits the result into coloured
//! tokens line by line. Both are plain string functions so the view code only
//! has to map [`TokenKind`] to a colour.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Collapsed arrays longer than this stay multi-line
const MAX_COLLAPSED_LEN: usize = 65;

/// An expanded array, up to the first closing bracket line
static ARRAY_BLOCK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\n\s+([\s\S]*?)\n\s+\]").expect("array block regex should compile")
});
static ITEM_BREAK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s+").expect("item break regex should compile"));
/// `"key": value` with a quote-free key
static KEY_VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\s*)"([^"]+)":\s*(.*)$"#).expect("key/value regex should compile")
});
/// A quoted array item with escapes, optionally followed by a comma
static STRING_ITEM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\s*)("(?:[^"\\]|\\.)*")(,?)$"#).expect("string item regex should compile")
});
/// Plain decimal, no exponent
static NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+\.?\d*$").expect("number regex should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Key,
    Str,
    Num,
    Bool,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Pretty JSON with short primitive arrays on a single line
pub fn format_payload(payload: &serde_json::Value) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    collapse_short_arrays(&pretty)
}

fn collapse_short_arrays(pretty: &str) -> String {
    ARRAY_BLOCK_PATTERN
        .replace_all(pretty, |caps: &Captures| {
            let collapsed = format!("[{}]", ITEM_BREAK_PATTERN.replace_all(&caps[1], " "));
            let fits = collapsed.chars().count() < MAX_COLLAPSED_LEN
                && !collapsed.contains('{')
                && !collapsed[1..].contains('[');
            if fits {
                collapsed
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Tokenizes formatted JSON, one token list per line
pub fn highlight(formatted: &str) -> Vec<Vec<Token>> {
    formatted.lines().map(highlight_line).collect()
}

pub fn highlight_line(line: &str) -> Vec<Token> {
    if let Some(kv) = KEY_VALUE_PATTERN.captures(line) {
        let mut tokens = vec![
            Token::new(TokenKind::Punct, &kv[1]),
            Token::new(TokenKind::Key, format!("\"{}\"", &kv[2])),
            Token::new(TokenKind::Punct, ": "),
        ];
        tokens.extend(value_tokens(&kv[3]));
        return tokens;
    }

    if let Some(item) = STRING_ITEM_PATTERN.captures(line) {
        return vec![
            Token::new(TokenKind::Punct, &item[1]),
            Token::new(TokenKind::Str, &item[2]),
            Token::new(TokenKind::Punct, &item[3]),
        ];
    }

    vec![Token::new(TokenKind::Punct, line)]
}

fn value_tokens(value: &str) -> Vec<Token> {
    let trimmed = value.trim_end();
    let (clean, comma) = match trimmed.strip_suffix(',') {
        Some(clean) => (clean, true),
        None => (trimmed, false),
    };

    let kind = if clean.len() >= 2 && clean.starts_with('"') && clean.ends_with('"') {
        TokenKind::Str
    } else if clean == "true" || clean == "false" {
        TokenKind::Bool
    } else if NUMBER_PATTERN.is_match(clean) {
        TokenKind::Num
    } else {
        return vec![Token::new(TokenKind::Punct, value)];
    };

    let mut tokens = vec![Token::new(kind, clean)];
    if comma {
        tokens.push(Token::new(TokenKind::Punct, ","));
    }
    tokens
}
