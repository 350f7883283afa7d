//! Sentence splitting for oversized paragraphs.
//!
//! The segmenter only looks inside a paragraph when the paragraph alone is
//! longer than the chunk ceiling. It then needs sentence-sized pieces it can
//! pack greedily.
//!
//! ## The Boundary Rule
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace:
//!
//! ```text
//! "It rained. Did it pour? Yes! 3.5 inches."
//!            ^            ^    ^
//! ["It rained.", "Did it pour?", "Yes!", "3.5 inches."]
//! ```
//!
//! `3.5` is not split because the period is not followed by whitespace.
//! Abbreviations are not special-cased: `"Dr. Smith"` splits after `Dr.`.
//! That is acceptable here because sentences are packing units, not
//! linguistic output, and no words are lost either way.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("static regex is valid"));

/// Split a paragraph into sentences.
///
/// Terminal punctuation stays with its sentence, the whitespace after it is
/// dropped, and whitespace-only pieces are skipped.
///
/// ```rust
/// let sentences = precis::split_sentences("One. Two!  Three? Four");
/// assert_eq!(sentences, vec!["One.", "Two!", "Three?", "Four"]);
/// ```
#[must_use]
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(paragraph) {
        // The punctuation mark is ASCII, so +1 stays on a char boundary.
        let end = m.start() + 1;
        push_trimmed(&mut sentences, &paragraph[start..end]);
        start = m.end();
    }
    push_trimmed(&mut sentences, &paragraph[start..]);

    sentences
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece);
    }
}
