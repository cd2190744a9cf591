// Pattern Matcher - lexical extraction of code candidates
// Validates shape only; whether a candidate is a real code is the resolver's job

use crate::dataset::Category;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Enlisted grammar: optional prefix letter, digit-letter-digit core with a
/// skill slot constrained to the odd digits (or the wildcard), trailing
/// digit, optional suffix letter.
pub const ENLISTED_CODE_PATTERN: &str = r"([A-Z]?)(\d[A-Z]\d([013579]|X)\d)([A-Z]?)";

/// Officer grammar: optional prefix letter, two digits plus a letter,
/// optional wildcard marking the code as skill-indeterminate, optional
/// suffix letter.
pub const OFFICER_CODE_PATTERN: &str = r"([A-Z]?)(\d\d[A-Z](X?))([A-Z]?)";

lazy_static! {
    static ref ENLISTED_RE: Regex = Regex::new(ENLISTED_CODE_PATTERN).unwrap();
    static ref OFFICER_RE: Regex = Regex::new(OFFICER_CODE_PATTERN).unwrap();
}

/// One syntactic match inside a text item. Produced and consumed within a
/// single item's processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The full matched text, prefix and suffix included
    pub whole_text: String,
    /// Leading letter, when present
    pub prefix: Option<String>,
    /// The core code without prefix or suffix
    pub core: String,
    /// The character in the skill slot. Always present for enlisted codes;
    /// for officer codes, present only when the wildcard marker was written.
    pub skill: Option<char>,
    /// Trailing letter, when present
    pub suffix: Option<String>,
    pub category: Category,
}

/// Extract every non-overlapping candidate of one category, scanning left to
/// right. Matching is case-insensitive: the text is uppercased first, so all
/// downstream comparisons against reference data stay uppercase.
pub fn extract(text: &str, category: Category) -> Vec<Candidate> {
    let upper = text.to_uppercase();
    let pattern = match category {
        Category::Enlisted => &*ENLISTED_RE,
        Category::Officer => &*OFFICER_RE,
    };

    pattern
        .captures_iter(&upper)
        .map(|caps| Candidate {
            whole_text: caps[0].to_string(),
            prefix: optional_group(&caps, 1),
            core: caps[2].to_string(),
            skill: optional_group(&caps, 3).and_then(|s| s.chars().next()),
            suffix: optional_group(&caps, 4),
            category,
        })
        .collect()
}

/// An optional capture group that matched the empty string counts as absent.
fn optional_group(caps: &Captures, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

// ============================================================================
// TESTS
// ============================================================================
