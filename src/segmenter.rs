//! Word-count-bounded, boundary-respecting segmentation.
//!
//! ## The Algorithm
//!
//! Greedy packing over two levels of structure, paragraphs first:
//!
//! ```text
//! min = 75, max = 125
//!
//! paragraphs:  [60w] [60w] [300w .............................] [10w]
//!                |     |     | too long: split into sentences
//!                v     v     v
//! running:      60   120 -> finalize
//!                           [40w] [30w] [50w] [80w] ...
//!                            40    70   120 -> finalize
//!                                              80 -> finalize ...
//! trailing:                                                    10 -> force
//! ```
//!
//! 1. A paragraph of at most `max` words is appended whole. Once the
//!    running count reaches `min`, the chunk is finalized.
//! 2. A paragraph longer than `max` is packed sentence by sentence. A
//!    sentence that fits under `max` is appended (and the chunk finalized
//!    once it reaches `min`). A sentence that does not fit closes the current
//!    chunk and becomes the running count of a fresh one, which later
//!    sentences can still join. A sentence longer than `max` is emitted as
//!    its own chunk straight away.
//! 3. Whatever remains at the end is finalized regardless of size.
//!
//! A single sentence longer than `max` is never cut, so `max` is a soft
//! ceiling. Paragraph merging can also run past `max` when a short running
//! chunk meets a paragraph close to `max`. No word is ever dropped or
//! duplicated: the multiset of words in the output equals the input's.

use tracing::debug;

use crate::bounds::{DEFAULT_FLEXIBILITY, DEFAULT_TARGET_WORDS};
use crate::preprocess::PARAGRAPH_SEPARATOR;
use crate::{split_sentences, word_count, Chunk, Config, Result, WordBounds};

/// Split preprocessed text into chunks within `bounds`.
///
/// This is the stateless core of [`Segmenter`].
///
/// ```rust
/// use precis::{segment, WordBounds};
///
/// let text = "One two three.\n\nFour five.\n\nSix.";
/// let chunks = segment(text, WordBounds::from(4..=6));
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].text, "One two three. Four five.");
/// assert_eq!(chunks[1].text, "Six.");
/// ```
#[must_use]
pub fn segment(text: &str, bounds: WordBounds) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut acc = Accumulator::default();

    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        let paragraph = paragraph.trim();
        let words = word_count(paragraph);
        if words == 0 {
            continue;
        }

        if words <= bounds.max() {
            acc.push(paragraph, words);
            if bounds.is_satisfied(acc.words) {
                acc.finalize(&mut chunks);
            }
            continue;
        }

        for sentence in split_sentences(paragraph) {
            let words = word_count(sentence);
            if bounds.would_overflow(acc.words, words) {
                acc.finalize(&mut chunks);
                acc.push(sentence, words);
                // Oversized sentences stand alone.
                if words > bounds.max() {
                    acc.finalize(&mut chunks);
                }
            } else {
                acc.push(sentence, words);
                if bounds.is_satisfied(acc.words) {
                    acc.finalize(&mut chunks);
                }
            }
        }
    }

    acc.finalize(&mut chunks);

    debug!(
        chunks = chunks.len(),
        min_words = bounds.min(),
        max_words = bounds.max(),
        "segmented text"
    );
    chunks
}

/// The chunk under construction.
#[derive(Debug, Default)]
struct Accumulator<'a> {
    fragments: Vec<&'a str>,
    words: usize,
}

impl<'a> Accumulator<'a> {
    fn push(&mut self, fragment: &'a str, words: usize) {
        self.fragments.push(fragment);
        self.words += words;
    }

    /// Emit the current chunk if it holds any words, then reset.
    fn finalize(&mut self, out: &mut Vec<Chunk>) {
        if self.words > 0 {
            out.push(Chunk::new(self.fragments.join(" "), out.len()));
        }
        self.fragments.clear();
        self.words = 0;
    }
}

/// Stateful segmenter holding the chunks of the last document.
///
/// ## Example
///
/// ```rust
/// use precis::Segmenter;
///
/// let mut segmenter = Segmenter::default();
/// segmenter.chunk("A short document.\n\nWith two paragraphs.");
///
/// assert_eq!(segmenter.total_chunks(), 1);
/// assert_eq!(segmenter.word_count_per_chunk(), vec![6]);
/// assert_eq!(segmenter.total_words(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    target_words: usize,
    flexibility: f64,
    bounds: WordBounds,
    chunks: Vec<Chunk>,
}

impl Segmenter {
    /// Create a segmenter for a target word count and flexibility.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the bounds cannot be derived
    /// (see [`WordBounds::from_target`]).
    pub fn new(target_words: usize, flexibility: f64) -> Result<Self> {
        Ok(Self {
            target_words,
            flexibility,
            bounds: WordBounds::from_target(target_words, flexibility)?,
            chunks: Vec::new(),
        })
    }

    /// Create a segmenter from the chunking section of a [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.target_words, config.chunk_flexibility)
    }

    /// The bounds used by [`Segmenter::chunk`].
    #[must_use]
    pub const fn bounds(&self) -> WordBounds {
        self.bounds
    }

    /// Chunk `text` with the configured bounds, replacing earlier results.
    pub fn chunk(&mut self, text: &str) -> &[Chunk] {
        self.chunks = segment(text, self.bounds);
        &self.chunks
    }

    /// Chunk `text`, overriding the target and/or flexibility for this call.
    ///
    /// `None` falls back to the segmenter's configured value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the overrides are out of range.
    pub fn chunk_with(
        &mut self,
        text: &str,
        target_words: Option<usize>,
        flexibility: Option<f64>,
    ) -> Result<&[Chunk]> {
        let bounds = WordBounds::from_target(
            target_words.unwrap_or(self.target_words),
            flexibility.unwrap_or(self.flexibility),
        )?;
        self.chunks = segment(text, bounds);
        Ok(&self.chunks)
    }

    /// Chunks from the last call.
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Chunk texts from the last call, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Word count of each chunk, in order.
    #[must_use]
    pub fn word_count_per_chunk(&self) -> Vec<usize> {
        self.chunks.iter().map(|c| c.words).collect()
    }

    /// Number of chunks from the last call.
    #[must_use]
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Sum of per-chunk word counts.
    #[must_use]
    pub fn total_words(&self) -> usize {
        self.chunks.iter().map(|c| c.words).sum()
    }

    /// Take ownership of the chunks, leaving the segmenter empty.
    pub fn take_chunks(&mut self) -> Vec<Chunk> {
        std::mem::take(&mut self.chunks)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            target_words: DEFAULT_TARGET_WORDS,
            flexibility: DEFAULT_FLEXIBILITY,
            bounds: WordBounds::default(),
            chunks: Vec::new(),
        }
    }
}
