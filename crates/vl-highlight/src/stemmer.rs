//! Mechanical English inflection generator
//!
//! Produces the surface forms a reader would recognise as derived from a
//! saved word. Rules are applied blindly: "make" yields "maked" as well as
//! "making". The forms are only ever match candidates, so over-generation
//! costs nothing while a missed form costs a highlight.

use crate::{HighlightError, HighlightResult};

/// Suffixes accepted after a root (plural, tense, comparison, derivation).
pub const VALID_SUFFIXES: &[&str] = &[
    "s", "es", "ed", "ing", "d", "er", "est", "ly",
    "tion", "sion", "ness", "ment", "able", "ible", "ful", "less",
];

/// Suffixes that trigger consonant doubling and silent-e dropping.
pub const STEM_CHANGE_SUFFIXES: &[&str] = &["ing", "ed", "er", "est"];

/// Minimum length (in chars) for the y→i rule to apply.
const Y_TO_I_MIN_LEN: usize = 4;

/// Minimum length (in chars) for consonant doubling; a CVC ending needs three letters.
const DOUBLING_MIN_LEN: usize = 3;

#[inline]
pub(crate) fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

#[inline]
pub(crate) fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c)
}

/// Last consonant of a root ending vowel + consonant, e.g. `n` for "run".
fn doubling_consonant(root: &str) -> Option<char> {
    let mut rev = root.chars().rev();
    let last = rev.next()?;
    let before = rev.next()?;
    (root.chars().count() >= DOUBLING_MIN_LEN && is_consonant(last) && is_vowel(before))
        .then_some(last)
}

/// Root without its trailing "e", when something is left.
pub(crate) fn silent_e_stem(root: &str) -> Option<&str> {
    root.strip_suffix('e').filter(|stem| !stem.is_empty())
}

/// Root with its trailing "y" turned into "i", for long enough roots.
pub(crate) fn y_to_i_stem(root: &str) -> Option<String> {
    if root.chars().count() < Y_TO_I_MIN_LEN {
        return None;
    }
    root.strip_suffix('y').map(|stem| format!("{stem}i"))
}

/// Generate the inflected forms of `root`, in rule order, without duplicates.
///
/// The root itself is not part of the output. Forms are raw text; callers
/// embedding them in a regex must escape them.
pub fn stem(root: &str) -> HighlightResult<Vec<String>> {
    if root.trim().is_empty() {
        return Err(HighlightError::InvalidInput {
            word: root.to_string(),
            reason: "root word is empty",
        });
    }

    let doubled = doubling_consonant(root);
    let without_e = silent_e_stem(root);
    let with_i = y_to_i_stem(root);

    let mut forms: Vec<String> = Vec::with_capacity(VALID_SUFFIXES.len() * 3);
    let mut push = |form: String| {
        if !forms.contains(&form) {
            forms.push(form);
        }
    };

    for suffix in VALID_SUFFIXES {
        push(format!("{root}{suffix}"));

        if STEM_CHANGE_SUFFIXES.contains(suffix) {
            if let Some(consonant) = doubled {
                push(format!("{root}{consonant}{suffix}"));
            }
            if let Some(stem) = without_e {
                push(format!("{stem}{suffix}"));
            }
        }

        if let Some(stem) = &with_i {
            push(format!("{stem}{suffix}"));
        }
    }

    Ok(forms)
}
