//! Root attribution for matched tokens
//!
//! Given a token found by the word pattern, decide which saved root it is a
//! form of and which part of the token spells that root.

use std::ops::Range;

use serde::Serialize;

use crate::RootWordSet;
use crate::stemmer::{STEM_CHANGE_SUFFIXES, VALID_SUFFIXES, silent_e_stem, y_to_i_stem};

/// How a token was tied to its root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Token is a saved word
    Exact,
    /// Root + suffix ("cats")
    Suffix,
    /// Root + doubled last letter + suffix ("running")
    DoubledConsonant,
    /// Root minus "e" + suffix ("making")
    SilentE,
    /// Root with "y" → "i" + suffix ("happier")
    YToI,
    /// No root explains the token; it stands for itself
    SelfAttributed,
}

impl MatchKind {
    /// Variants get a nested root highlight; the rest a single marker
    pub fn is_variant(self) -> bool {
        !matches!(self, Self::Exact | Self::SelfAttributed)
    }
}

/// Result of attributing one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribution {
    /// Root word the token is credited to (lower-case)
    pub root: String,
    pub kind: MatchKind,
    /// Byte range of the token to highlight as the root
    pub root_span: Range<usize>,
}

impl Attribution {
    /// Split a token into (before-root, root, after-root) by `root_span`
    pub fn split<'t>(&self, token: &'t str) -> (&'t str, &'t str, &'t str) {
        let start = self.root_span.start.min(token.len());
        let end = self.root_span.end.clamp(start, token.len());
        (&token[..start], &token[start..end], &token[end..])
    }
}

/// One pattern match inside a text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    /// Byte offset of the match in the text node
    pub start: usize,
    pub end: usize,
    /// The matched text as it appears on the page
    pub literal: String,
    pub attribution: Attribution,
}

/// Byte offset in `token` after `chars` characters, if the lower-cased
/// token lines up with the original char for char.
fn byte_offset(token: &str, lower: &str, chars: usize) -> Option<usize> {
    if token.chars().count() != lower.chars().count() {
        return None;
    }
    Some(
        token
            .char_indices()
            .nth(chars)
            .map_or(token.len(), |(idx, _)| idx),
    )
}

fn is_valid_suffix(rest: &str) -> bool {
    VALID_SUFFIXES.contains(&rest)
}

/// Plain suffix: "cat" + "s". A root ending in "e" followed by "d" is left to
/// the silent-e rule, which reads the pair as "e" dropped before "ed".
fn suffix_rule(lower: &str, root: &str) -> Option<usize> {
    let rest = lower.strip_prefix(root)?;
    if root.ends_with('e') && rest == "d" {
        return None;
    }
    is_valid_suffix(rest).then(|| root.chars().count())
}

fn doubled_consonant_rule(lower: &str, root: &str) -> Option<usize> {
    let rest = lower.strip_prefix(root)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    let tail = chars.as_str();
    (root.chars().last() == Some(first) && is_valid_suffix(tail)).then(|| root.chars().count())
}

fn silent_e_rule(lower: &str, root: &str) -> Option<usize> {
    let stem = silent_e_stem(root)?;
    let rest = lower.strip_prefix(stem)?;
    STEM_CHANGE_SUFFIXES
        .contains(&rest)
        .then(|| stem.chars().count())
}

fn y_to_i_rule(lower: &str, root: &str) -> Option<usize> {
    let stem = y_to_i_stem(root)?;
    let rest = lower.strip_prefix(stem.as_str())?;
    is_valid_suffix(rest).then(|| root.chars().count())
}

type Rule = fn(&str, &str) -> Option<usize>;

/// Variant rules in priority order
const RULES: &[(MatchKind, Rule)] = &[
    (MatchKind::Suffix, suffix_rule),
    (MatchKind::DoubledConsonant, doubled_consonant_rule),
    (MatchKind::SilentE, silent_e_rule),
    (MatchKind::YToI, y_to_i_rule),
];

/// Attribute `token` to a root in `roots`.
///
/// Rules are tried in priority order across all roots; the first rule that
/// any root satisfies wins. Among roots tied on the same rule, the first in
/// set order is taken.
pub fn attribute(token: &str, roots: &RootWordSet) -> Attribution {
    let lower = token.to_lowercase();
    let whole = 0..token.len();

    if roots.contains(&lower) {
        return Attribution {
            root: lower,
            kind: MatchKind::Exact,
            root_span: whole,
        };
    }

    for &(kind, rule) in RULES {
        for root in roots.iter() {
            let Some(root_chars) = rule(&lower, root) else {
                continue;
            };
            let end = byte_offset(token, &lower, root_chars).unwrap_or(token.len());
            return Attribution {
                root: root.to_string(),
                kind,
                root_span: 0..end,
            };
        }
    }

    Attribution {
        root: lower,
        kind: MatchKind::SelfAttributed,
        root_span: whole,
    }
}
