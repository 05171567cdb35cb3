//! Prefix completion
//!
//! Computes the longest common extension of a typed prefix over a
//! vocabulary, plus the sorted set of full matches. [`CompletionCycle`] is
//! the per-session cache that lets repeated presses walk through the
//! matches.

use std::collections::BTreeSet;

/// Result of completing a prefix against a vocabulary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// The prefix extended by the run shared by every match
    pub extended: String,
    /// Full candidates, each rendered as `prefix + suffix`, sorted ascending
    pub matches: Vec<String>,
}

impl Completion {
    /// Whether nothing in the vocabulary matched
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Whether exactly one candidate matched
    pub fn is_unique(&self) -> bool {
        self.matches.len() == 1
    }
}

/// Complete `prefix` against `vocabulary`.
///
/// The prefix portion of each candidate (its first `prefix.chars().count()`
/// characters) is compared case-insensitively; the suffixes keep the
/// candidate's casing and their common run is compared exactly.
pub fn complete<I, S>(vocabulary: I, prefix: &str) -> Completion
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let prefix_len = prefix.chars().count();
    let prefix_lower = prefix.to_lowercase();

    let suffixes: BTreeSet<String> = vocabulary
        .into_iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            let split = match candidate.char_indices().nth(prefix_len) {
                Some((byte, _)) => byte,
                None if candidate.chars().count() == prefix_len => candidate.len(),
                None => return None,
            };
            let (head, tail) = candidate.split_at(split);
            (head.to_lowercase() == prefix_lower).then(|| tail.to_string())
        })
        .collect();

    if suffixes.is_empty() {
        return Completion {
            extended: prefix.to_string(),
            matches: Vec::new(),
        };
    }

    let common = common_leading_run(suffixes.iter().map(String::as_str));
    Completion {
        extended: format!("{prefix}{common}"),
        matches: suffixes
            .iter()
            .map(|suffix| format!("{prefix}{suffix}"))
            .collect(),
    }
}

/// Longest leading run of characters shared by every string
fn common_leading_run<'a>(mut strings: impl Iterator<Item = &'a str>) -> &'a str {
    let Some(first) = strings.next() else {
        return "";
    };
    strings.fold(first, |acc, s| {
        let end = acc
            .char_indices()
            .zip(s.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((byte, ch), _)| byte + ch.len_utf8())
            .unwrap_or(0);
        &acc[..end]
    })
}

/// Cycling state for repeated completion presses.
///
/// Remembers the text it last put in the buffer; once the buffer holds
/// anything else the cycle is stale and must be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCycle {
    applied: String,
    matches: Vec<String>,
    next: usize,
}

impl CompletionCycle {
    /// Start a cycle after `applied` was written to the buffer.
    ///
    /// Returns `None` when there is nothing to cycle through (fewer than two
    /// matches).
    pub fn new(applied: impl Into<String>, matches: Vec<String>) -> Option<Self> {
        (matches.len() > 1).then(|| Self {
            applied: applied.into(),
            matches,
            next: 0,
        })
    }

    /// Whether the buffer still holds what this cycle last applied
    pub fn is_current(&self, text: &str) -> bool {
        self.applied == text
    }

    /// Next match in sorted order, wrapping at the end
    pub fn advance(&mut self) -> &str {
        self.applied.clone_from(&self.matches[self.next]);
        self.next = (self.next + 1) % self.matches.len();
        &self.applied
    }

    /// Candidates being cycled through
    pub fn matches(&self) -> &[String] {
        &self.matches
    }
}
