//! The Chunk type: a finalized segment of document text.

/// A finalized segment of document text.
///
/// Chunks are built from whole paragraphs or whole sentences joined by a
/// single space, so a chunk never starts or ends mid-sentence. `index` is
/// the chunk's position in the segmenter output and is the key used by the
/// cluster engine for vectors, labels and representatives.
///
/// ```rust
/// use precis::Chunk;
///
/// let chunk = Chunk::new("First sentence. Second one.", 0);
/// assert_eq!(chunk.words, 4);
/// assert_eq!(chunk.to_string(), "Chunk { index: 0, words: 4 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The chunk text.
    pub text: String,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
    /// Whitespace-delimited word count of `text`.
    pub words: usize,
}

impl Chunk {
    /// Create a new chunk, counting its words.
    #[must_use]
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        let text = text.into();
        let words = word_count(&text);
        Self { text, index, words }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chunk {{ index: {}, words: {} }}", self.index, self.words)
    }
}

/// Number of whitespace-delimited words in `text`.
///
/// ```rust
/// assert_eq!(precis::word_count("  one\ttwo\n\nthree "), 3);
/// assert_eq!(precis::word_count(""), 0);
/// ```
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
