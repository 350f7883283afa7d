//! Text cleanup before segmentation.
//!
//! Loaders hand over text with inconsistent layout: PDF extraction emits
//! runs of blank lines, web pages emit tab soup, transcripts carry smart
//! quotes and emoji. [`preprocess`] normalizes all of it to the layout the
//! segmenter expects:
//!
//! ```text
//! "Intro\n\n\n\nBody\t\t\tcafé"  ->  "Intro\n\nBody\tcaf"
//! ```
//!
//! ## Lossy by Design
//!
//! Every character outside 7-bit ASCII is dropped, not transliterated.
//! `café` becomes `caf`, and a document written in Greek becomes mostly
//! whitespace. This keeps token counts predictable for English sources but
//! makes the pipeline unsuitable for non-English corpora.

use std::sync::LazyLock;

use regex::Regex;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("static regex is valid"));

static TAB_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+").expect("static regex is valid"));

/// Paragraph separator in preprocessed text.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Clean raw document text.
///
/// In order:
///
/// 1. Windows line endings become `\n`.
/// 2. Characters outside 7-bit ASCII are removed.
/// 3. Runs of two or more newlines collapse to one blank line (`\n\n`).
/// 4. Runs of tabs collapse to one tab.
///
/// Non-ASCII removal runs before the collapsing steps, so the result is a
/// fixed point: `preprocess(&preprocess(x)) == preprocess(x)`.
///
/// ```rust
/// let cleaned = precis::preprocess("One.\n\n\n\nTwo\t\tthree ñ");
/// assert_eq!(cleaned, "One.\n\nTwo\tthree ");
/// ```
#[must_use]
pub fn preprocess(text: &str) -> String {
    let ascii: String = text
        .replace("\r\n", "\n")
        .chars()
        .filter(char::is_ascii)
        .collect();
    let collapsed = NEWLINE_RUNS.replace_all(&ascii, PARAGRAPH_SEPARATOR);
    TAB_RUNS.replace_all(&collapsed, "\t").into_owned()
}
