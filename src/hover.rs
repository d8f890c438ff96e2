//! Keyword hover
//!
//! Hover text comes from a fixed keyword table. Nothing is parsed; the
//! token under the cursor is looked up by exact match.

use serde::Serialize;

/// Keywords and built-ins with their one-line descriptions
pub const KEYWORDS: &[(&str, &str)] = &[
    ("class", "Define a new class"),
    ("int", "Integer type"),
    ("float", "Floating point number type"),
    ("string", "String type"),
    ("return", "Return a value from a function"),
    ("#import", "Import another file"),
];

/// Language tag used for hover code blocks
const CODE_LANGUAGE: &str = "z";

/// Description of `token`, if it is a known keyword
pub fn describe(token: &str) -> Option<&'static str> {
    KEYWORDS
        .iter()
        .find(|(keyword, _)| *keyword == token)
        .map(|(_, description)| *description)
}

/// Word span on a single line (1-based, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WordRange {
    pub line: u32,
    pub start_col: u32,
    pub end_col: u32,
}

/// Hover result for a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverInfo {
    pub token: String,
    pub description: String,
    pub range: Option<WordRange>,
}

impl HoverInfo {
    /// Hover for a bare token
    pub fn for_token(token: &str) -> Option<Self> {
        describe(token).map(|description| Self {
            token: token.to_string(),
            description: description.to_string(),
            range: None,
        })
    }

    /// Code block with the token, then the description
    pub fn markdown(&self) -> String {
        format!(
            "```{}\n{}\n```\n{}",
            CODE_LANGUAGE, self.token, self.description
        )
    }

    pub fn plain(&self) -> String {
        format!("{}: {}", self.token, self.description)
    }
}

/// Hover at a 1-based line/column in `source`
pub fn hover_at(source: &str, line: u32, column: u32) -> Option<HoverInfo> {
    let (token, range) = word_at(source, line, column)?;
    let mut info = HoverInfo::for_token(&token)?;
    info.range = Some(range);
    Some(info)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word under a 1-based line/column.
///
/// A word is a run of alphanumerics and underscores, optionally led by
/// `#`. A cursor just past the end of a word still selects it.
pub fn word_at(source: &str, line: u32, column: u32) -> Option<(String, WordRange)> {
    if line == 0 || column == 0 {
        return None;
    }

    let text = source.lines().nth((line - 1) as usize)?;
    let chars: Vec<char> = text.chars().collect();
    let mut idx = (column - 1) as usize;

    if idx < chars.len() && chars[idx] == '#' && chars.get(idx + 1).is_some_and(|&c| is_word_char(c)) {
        idx += 1;
    } else if idx >= chars.len() || !is_word_char(chars[idx]) {
        // Cursor sits right after the word
        if idx == 0 || idx > chars.len() || !is_word_char(chars[idx - 1]) {
            return None;
        }
        idx -= 1;
    }

    let mut start = idx;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }

    let mut end = idx;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    if start > 0 && chars[start - 1] == '#' {
        start -= 1;
    }

    let word: String = chars[start..end].iter().collect();
    Some((
        word,
        WordRange {
            line,
            start_col: start as u32 + 1,
            end_col: end as u32 + 1,
        },
    ))
}
