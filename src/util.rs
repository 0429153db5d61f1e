//! Character classification for word and sexpr motion.
//!
//! Word boundaries are relative to a configurable separator set, so "word"
//! can mean different things to different commands (plain word motion uses
//! one set, sexpr motion another).

/// Character type for word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Whitespace characters
    Whitespace,
    /// Word constituents
    Word,
    /// Characters from the active separator set
    Separator,
}

/// Classify a character against a separator set.
pub fn classify(ch: char, separators: &str) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Whitespace
    } else if separators.contains(ch) {
        CharClass::Separator
    } else {
        CharClass::Word
    }
}

/// Check if a character is a word constituent under the given separators.
pub fn is_word_char(ch: char, separators: &str) -> bool {
    classify(ch, separators) == CharClass::Word
}

/// Characters that open a bracketed or quoted sexpr.
pub fn sexpr_open(ch: char) -> bool {
    matches!(ch, '(' | '{' | '[' | '\'' | '"')
}

/// Characters that close a bracketed or quoted sexpr.
pub fn sexpr_close(ch: char) -> bool {
    matches!(ch, ')' | '}' | ']' | '\'' | '"')
}

/// The closing counterpart of an opening bracket or quote.
pub fn matching_close(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '{' => Some('}'),
        '[' => Some(']'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

/// The opening counterpart of a closing bracket or quote.
pub fn matching_open(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        '}' => Some('{'),
        ']' => Some('['),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

/// Title-case a string: uppercase the first letter of every word, lowercase
/// the rest. Word starts follow non-alphanumeric characters.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
