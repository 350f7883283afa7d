//! Pipeline configuration.
//!
//! Every key is optional. A missing key takes its documented default, so an
//! empty file is a valid configuration:
//!
//! ```toml
//! target_words = 100
//! chunk_flexibility = 0.25
//! embed_batch_size = 10
//! n_clusters = 5
//! n_closest_representatives = 3
//!
//! embedding_model = "nomic-embed-text"
//! llm_model = "llama-3.1-70b-versatile"
//!
//! # Optional: report token counts alongside word counts
//! tokenizer_path = "models/llama-3.1/tokenizer.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bounds::{DEFAULT_FLEXIBILITY, DEFAULT_TARGET_WORDS};
use crate::{Error, Result, WordBounds};

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Desired words per chunk.
    pub target_words: usize,
    /// Fractional tolerance around `target_words`, in `[0, 1)`.
    #[serde(alias = "chunk_flexbility")]
    pub chunk_flexibility: f64,
    /// Chunks per embedding request.
    pub embed_batch_size: usize,
    /// Number of k-means clusters (clamped to the number of chunks).
    pub n_clusters: usize,
    /// Representatives selected per cluster.
    pub n_closest_representatives: usize,
    /// Chat model used for themes and the final summary.
    pub llm_model: String,
    /// Base URL of the OpenAI-compatible chat completions API.
    pub llm_base_url: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Base URL of the Ollama server used for embeddings.
    pub ollama_url: String,
    /// `tokenizer.json` used to report token counts; unset means word
    /// counts only.
    pub tokenizer_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_words: DEFAULT_TARGET_WORDS,
            chunk_flexibility: DEFAULT_FLEXIBILITY,
            embed_batch_size: 10,
            n_clusters: 5,
            n_closest_representatives: 3,
            llm_model: "llama-3.1-70b-versatile".to_string(),
            llm_base_url: "https://api.groq.com/openai/v1".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            tokenizer_path: None,
        }
    }
}

impl Config {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every numeric parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        self.word_bounds()?;
        for (key, value) in [
            ("embed_batch_size", self.embed_batch_size),
            ("n_clusters", self.n_clusters),
            ("n_closest_representatives", self.n_closest_representatives),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{key} must be > 0")));
            }
        }
        Ok(())
    }

    /// Chunk bounds derived from `target_words` and `chunk_flexibility`.
    pub fn word_bounds(&self) -> Result<WordBounds> {
        WordBounds::from_target(self.target_words, self.chunk_flexibility)
    }
}
