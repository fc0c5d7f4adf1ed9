//! Word-level helpers used by the printing and reversing commands.
//!
//! A word is a maximal run of word characters and dots (`[\w.]+`), so
//! `"one two.three"` holds two words.

use regex::Regex;
use std::fmt::Write;
use std::sync::OnceLock;

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[\w.]+").expect("word pattern is valid"))
}

fn word_with_spacing_pattern() -> &'static Regex {
    static WORD_SPACING: OnceLock<Regex> = OnceLock::new();
    WORD_SPACING.get_or_init(|| Regex::new(r"([\w.]+)(\s*)").expect("word pattern is valid"))
}

pub fn words(value: &str) -> Vec<&str> {
    word_pattern().find_iter(value).map(|m| m.as_str()).collect()
}

/// Reverses word order. Each word keeps the whitespace that followed it;
/// a word with nothing after it gets a single space. Characters outside
/// words and their trailing whitespace are dropped.
pub fn reverse_words(value: &str) -> String {
    let pairs: Vec<(&str, &str)> = word_with_spacing_pattern()
        .captures_iter(value)
        .filter_map(|caps| {
            let word = caps.get(1)?.as_str();
            let spacing = caps.get(2).map_or("", |m| m.as_str());
            Some((word, spacing))
        })
        .collect();

    let mut reversed = String::with_capacity(value.len() + 1);
    for (word, spacing) in pairs.into_iter().rev() {
        reversed.push_str(word);
        reversed.push_str(if spacing.is_empty() { " " } else { spacing });
    }
    reversed
}

/// Quotes `value` and escapes quotes, backslashes and control characters.
pub fn dump(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{1B}' => out.push_str("\\e"),
            c if (c as u32) < 0x80 && c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:X}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
