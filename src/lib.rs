//! # precis
//!
//! Cluster-based document condensation for language-model summarization.
//!
//! ## The Problem
//!
//! Summarizing a long document with a language model means paying for every
//! token of it. Most long documents repeat themselves: a policy speech
//! returns to the economy five times, a product page lists the same feature
//! in three sections. Sending all of it buys little over sending one good
//! example of each topic.
//!
//! ## The Pipeline
//!
//! ```text
//! raw text
//!    │  preprocess: ASCII only, collapse blank lines and tabs
//!    ▼
//! chunks      word-bounded, never split mid-sentence       [Segmenter]
//!    │
//!    ▼
//! vectors     one embedding per chunk, batched             [ClusterEngine]
//!    │
//!    ▼
//! clusters    seeded k-means, labels + centers             [ClusterEngine]
//!    │
//!    ▼
//! representatives   n chunks nearest each center           [closest_representatives]
//!    │
//!    ▼
//! themes + summary  language model sees only representatives  [Summarizer]
//! ```
//!
//! ### Segmentation
//!
//! Chunks aim for `target_words` with a fractional `flexibility`:
//!
//! ```text
//! target = 100, flexibility = 0.25   ->   min = 75, max = 125
//! ```
//!
//! Paragraphs are packed whole until a chunk reaches `min`. A paragraph
//! longer than `max` is packed sentence by sentence instead. A sentence is
//! never cut, so a single sentence above `max` becomes its own chunk.
//!
//! ### Selection
//!
//! For each k-means center, every chunk vector is ranked by Euclidean
//! distance (ties by chunk index) and the closest `n` are kept. With
//! `k = 5` and `n = 3`, at most 15 chunks reach the summarizer whatever the
//! document's length.
//!
//! ## Quick Start
//!
//! ```rust
//! use precis::{preprocess, Segmenter};
//!
//! let raw = "First paragraph about rivers.\n\n\n\nSecond paragraph about lakes.";
//! let cleaned = preprocess(raw);
//!
//! let mut segmenter = Segmenter::new(8, 0.25)?;
//! segmenter.chunk(&cleaned);
//!
//! assert_eq!(segmenter.total_chunks(), 1);
//! assert_eq!(segmenter.total_words(), 8);
//! # Ok::<(), precis::Error>(())
//! ```
//!
//! The full pipeline needs an [`provider::Embedder`] and a
//! [`provider::LanguageModel`]:
//!
//! ```rust,ignore
//! use precis::provider::{ChatCompletions, OllamaEmbedder};
//! use precis::{Config, Summarizer};
//!
//! let config = Config::load("precis.toml")?;
//! let embedder = OllamaEmbedder::new(&config.ollama_url, &config.embedding_model)?;
//! let llm = ChatCompletions::new(&config.llm_base_url, api_key, &config.llm_model)?;
//!
//! let summary = Summarizer::new(config, embedder, llm)?.run(&document)?;
//! println!("{}", summary.summary);
//! println!("sent {:.1}% of the document", summary.analysis.reduction_ratio * 100.0);
//! ```
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `fastembed` | `provider::FastEmbedder`, local ONNX embeddings |
//! | `http` | `provider::OllamaEmbedder`, `provider::ChatCompletions` |
//! | `tokenizers` | `provider::HfTokenizer`, token counts in the analysis |
//! | `cli` | the `precis` binary |
//!
//! ## Limitations
//!
//! Preprocessing drops every non-ASCII character. Documents in languages
//! other than English lose most of their content.

mod bounds;
mod chunk;
mod cluster;
mod config;
mod error;
mod grid;
mod preprocess;
mod report;
mod representative;
mod segmenter;
mod sentence;
mod summarize;

pub mod provider;

pub use bounds::{WordBounds, DEFAULT_FLEXIBILITY, DEFAULT_TARGET_WORDS};
pub use chunk::{word_count, Chunk};
pub use cluster::{kmeans, ClusterEngine, Clustering, KMEANS_SEED};
pub use config::Config;
pub use error::{Error, Result};
pub use grid::label_grid;
pub use preprocess::{preprocess, PARAGRAPH_SEPARATOR};
pub use report::Report;
pub use representative::{closest_representatives, Representatives};
pub use segmenter::{segment, Segmenter};
pub use sentence::split_sentences;
pub use summarize::{summary_prompt, theme_prompt, Analysis, Selection, Summarizer, Summary};
