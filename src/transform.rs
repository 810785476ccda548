//! Text transform engine: pure string functions applied to the working text.
//!
//! Every function here is total over all `&str` inputs and has no side
//! effects. The two substring operations guard the empty-pattern case
//! explicitly: an empty `old` leaves the text untouched instead of inserting
//! `new` between every character, and an empty `sub` counts as zero matches.
//!
//! The functions do not commute in general and callers must not assume they
//! do. The session controller applies them strictly in invocation order.

use crate::error::TextHelperError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Case mapping ─────────────────────────────────────────────────────────────

/// Upper-case every character using Unicode's locale-independent mapping.
pub fn to_upper(text: &str) -> String {
    text.to_uppercase()
}

/// Lower-case every character using Unicode's locale-independent mapping.
pub fn to_lower(text: &str) -> String {
    text.to_lowercase()
}

// ── Whitespace ───────────────────────────────────────────────────────────────

/// Remove leading and trailing Unicode whitespace.
pub fn strip(text: &str) -> String {
    text.trim().to_string()
}

// ── Substring replace / count ────────────────────────────────────────────────

/// Replace every non-overlapping occurrence of `old`, scanning left to right.
///
/// An empty `old` returns `text` unchanged.
pub fn replace(text: &str, old: &str, new: &str) -> String {
    if old.is_empty() {
        return text.to_string();
    }
    text.replace(old, new)
}

/// Count non-overlapping occurrences of `sub`, scanning left to right.
///
/// `count_substring("aaa", "aa")` is 1. An empty `sub` yields 0.
pub fn count_substring(text: &str, sub: &str) -> usize {
    if sub.is_empty() {
        return 0;
    }
    text.matches(sub).count()
}

// ── Words ────────────────────────────────────────────────────────────────────

/// Number of maximal whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ── Capitalisation ───────────────────────────────────────────────────────────

/// Upper-case the first non-whitespace character of the whole text.
///
/// Everything else, including the leading whitespace, is left as is. This
/// is a single capitalise point for the entire document, not per sentence.
pub fn capitalize_first(text: &str) -> String {
    match text.char_indices().find(|(_, c)| !c.is_whitespace()) {
        Some((i, c)) => {
            let mut out = String::with_capacity(text.len() + 4);
            out.push_str(&text[..i]);
            out.extend(c.to_uppercase());
            out.push_str(&text[i + c.len_utf8()..]);
            out
        }
        None => text.to_string(),
    }
}

/// Title-case: the first cased character of every run of cased characters
/// is title-cased and the rest of the run lower-cased.
///
/// Any uncased character (space, digit, apostrophe, punctuation, CJK) ends
/// the current word, so `"they're"` becomes `"They'Re"`, `"3rd"` becomes
/// `"3Rd"` and `"中a"` becomes `"中A"`.
///
/// The title form is the upper-case mapping with everything after its first
/// char lower-cased (`"ßa"` → `"Ssa"`). This differs from the Unicode
/// titlecase table only for the digraphs, e.g. `ǆ` maps to `Ǆ` rather than `ǅ`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if is_cased(c) {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                let mut upper = c.to_uppercase();
                out.extend(upper.next());
                out.extend(upper.flat_map(char::to_lowercase));
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn is_cased(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase()
}

// ── Named transforms ─────────────────────────────────────────────────────────

/// A text-to-text operation the session can apply to its working text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// [`to_upper`]
    Upper,
    /// [`to_lower`]
    Lower,
    /// [`strip`]
    Strip,
    /// [`capitalize_first`]
    Capitalize,
    /// [`title_case`]
    Title,
}

impl Transform {
    /// Every transform, in the order the reader toolbar lists them.
    pub const ALL: [Transform; 5] = [
        Transform::Upper,
        Transform::Lower,
        Transform::Strip,
        Transform::Capitalize,
        Transform::Title,
    ];

    /// Apply this transform to `text`.
    pub fn apply(self, text: &str) -> String {
        match self {
            Transform::Upper => to_upper(text),
            Transform::Lower => to_lower(text),
            Transform::Strip => strip(text),
            Transform::Capitalize => capitalize_first(text),
            Transform::Title => title_case(text),
        }
    }

    /// Past-tense confirmation shown after the transform runs.
    pub fn describe(self) -> &'static str {
        match self {
            Transform::Upper => "Converted to UPPERCASE.",
            Transform::Lower => "Converted to lowercase.",
            Transform::Strip => "Stripped leading/trailing whitespace.",
            Transform::Capitalize => "Capitalized first character of the text.",
            Transform::Title => "Converted text to Title Case.",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Transform::Upper => "upper",
            Transform::Lower => "lower",
            Transform::Strip => "strip",
            Transform::Capitalize => "capitalize",
            Transform::Title => "title",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = TextHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upper" | "uppercase" => Ok(Transform::Upper),
            "lower" | "lowercase" => Ok(Transform::Lower),
            "strip" | "trim" => Ok(Transform::Strip),
            "capitalize" | "capitalise" => Ok(Transform::Capitalize),
            "title" | "titlecase" => Ok(Transform::Title),
            other => Err(TextHelperError::InvalidCommand(format!(
                "unknown transform '{other}'"
            ))),
        }
    }
}
