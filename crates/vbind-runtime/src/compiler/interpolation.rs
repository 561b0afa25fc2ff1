#![forbid(unsafe_code)]

//! `{{ key }}` text interpolation scanning.
//!
//! Only the first `{{...}}` in a text node is a binding; later occurrences
//! stay literal. The capture is non-greedy and does not cross line
//! terminators (`\n`, `\r`, U+2028, U+2029).
//! The trimmed capture is the property key.

use std::ops::Range;
use std::sync::LazyLock;

use regex_lite::Regex;

static INTERPOLATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^\n\r\x{2028}\x{2029}]+?)\}\}").expect("interpolation pattern is valid")
});

/// The first interpolation found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation<'a> {
    /// Byte range of the whole `{{...}}` match.
    pub span: Range<usize>,
    /// Trimmed property key.
    pub key: &'a str,
}

impl Interpolation<'_> {
    /// `text` with this match replaced by `replacement`.
    #[must_use]
    pub fn substitute(&self, text: &str, replacement: &str) -> String {
        let mut out = String::with_capacity(text.len() + replacement.len());
        out.push_str(&text[..self.span.start]);
        out.push_str(replacement);
        out.push_str(&text[self.span.end..]);
        out
    }
}

/// Find the first `{{...}}` in `text`.
#[must_use]
pub fn find(text: &str) -> Option<Interpolation<'_>> {
    let caps = INTERPOLATION.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?;
    Some(Interpolation {
        span: whole.range(),
        key: inner.as_str().trim(),
    })
}
