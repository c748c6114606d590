//! Plain string transformations: truncation summaries and keyword classification.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Texts with more words than this are truncated by [`summarize`].
pub const SUMMARY_WORD_LIMIT: usize = 30;

const ELLIPSIS: &str = "...";

/// Unicode whitespace plus the ASCII file, group, record and unit separators (U+001C to
/// U+001F), which `char::is_whitespace` leaves out.
fn is_word_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Splits `text` into non-empty words.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_word_separator).filter(|w| !w.is_empty())
}

/// Number of words in `text`, as split by [`words`].
pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Returns the first [`SUMMARY_WORD_LIMIT`] words joined by single spaces plus an ellipsis, or
/// the input untouched if it is short enough.
pub fn summarize(text: &str) -> String {
    let mut iter = words(text);
    let head: Vec<&str> = iter.by_ref().take(SUMMARY_WORD_LIMIT).collect();

    if iter.next().is_none() {
        return text.to_owned();
    }

    let mut summary = head.join(" ");
    summary.push_str(ELLIPSIS);
    summary
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Health,
    Finance,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Health => "Health",
            Category::Finance => "Finance",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order; the first category with a matching trigger wins.
const RULES: &[(Category, &[&str])] = &[
    (Category::Technology, &["ai", "machine learning"]),
    (Category::Health, &["health", "medicine"]),
    (Category::Finance, &["finance", "money"]),
];

/// Classifies text by case-insensitive substring search over [`RULES`].
pub fn classify(text: &str) -> Category {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| lowered.contains(t)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}
