//! Token counting with a HuggingFace tokenizer.

use std::path::Path;

use tokenizers::Tokenizer;
use tracing::debug;

use super::TokenCounter;
use crate::{Error, Result};

/// [`TokenCounter`] backed by a `tokenizer.json` file.
///
/// Counts exclude special tokens, so a count reflects the text alone and not
/// how a particular chat template wraps it.
///
/// ```rust,ignore
/// use precis::provider::{HfTokenizer, TokenCounter};
///
/// let tokenizer = HfTokenizer::from_file("models/llama/tokenizer.json")?;
/// let n = tokenizer.count_tokens("How many tokens is this?")?;
/// ```
pub struct HfTokenizer {
    tokenizer: Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Provider(format!(
                "tokenizer not found at {}",
                path.display()
            )));
        }
        let tokenizer = Tokenizer::from_file(path).map_err(|e| {
            Error::Provider(format!("failed to load tokenizer {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded tokenizer");
        Ok(Self { tokenizer })
    }

    /// Parse a tokenizer from the contents of a `tokenizer.json` file.
    pub fn from_json(json: &str) -> Result<Self> {
        let tokenizer = json
            .parse::<Tokenizer>()
            .map_err(|e| Error::Provider(format!("invalid tokenizer json: {e}")))?;
        Ok(Self { tokenizer })
    }
}

impl TokenCounter for HfTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| Error::Provider(format!("tokenization failed: {e}")))?;
        Ok(encoding.len())
    }
}

impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.tokenizer.get_vocab_size(true))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Word-level model with a whitespace/punctuation pre-tokenizer.
    const WORD_LEVEL: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": { "[UNK]": 0, "hello": 1, "world": 2 },
            "unk_token": "[UNK]"
        }
    }"#;

    #[test]
    fn test_counts_pre_tokenized_pieces() {
        let tokenizer = HfTokenizer::from_json(WORD_LEVEL).unwrap();

        assert_eq!(tokenizer.count_tokens("hello world").unwrap(), 2);
        // Punctuation is its own piece; unknown words still count.
        assert_eq!(tokenizer.count_tokens("hello, brave world.").unwrap(), 5);
        assert_eq!(tokenizer.count_tokens("").unwrap(), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = HfTokenizer::from_file("/nonexistent/tokenizer.json").unwrap_err();
        assert!(matches!(err, Error::Provider(ref msg) if msg.contains("not found")));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            HfTokenizer::from_json("{not json"),
            Err(Error::Provider(_))
        ));
    }
}
