//! Themes and the final summary.
//!
//! The summarizer drives the whole pipeline for one document:
//!
//! ```text
//! raw text -> preprocess -> segment -> embed -> k-means -> representatives
//!                                                             |
//!              per cluster: theme(closest chunk), content(all reps)
//!                                                             |
//!                      summary(content of every cluster, label order)
//! ```
//!
//! Only the representatives reach the language model, which is where the
//! savings come from. [`Analysis::reduction_ratio`] reports how much of the
//! document was actually sent. With a [`TokenCounter`] attached, the same
//! comparison is also reported in model tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::provider::{Embedder, LanguageModel, TokenCounter};
use crate::{
    preprocess, word_count, Chunk, ClusterEngine, Clustering, Config, Error, Representatives,
    Result, Segmenter,
};

/// Prompt asking for a short theme for one chunk.
#[must_use]
pub fn theme_prompt(chunk: &str) -> String {
    format!(
        "Extract the key theme of the following excerpt for topic modeling. \
         The excerpt may come from a web page and contain boilerplate or \
         navigation text. If it is boilerplate, engagement metrics (likes, \
         shares, follower counts) or site furniture such as \"Contact Us\", \
         \"Privacy Policy\" or social media links, answer \"unrelated\" \
         instead of inventing a theme. Answer in fewer than 5 words.\n\n\
         Excerpt: {chunk}"
    )
}

/// Prompt asking for the final summary of the combined representatives.
#[must_use]
pub fn summary_prompt(content: &str) -> String {
    format!(
        "Summarize the following content in a fairly detailed manner, \
         without oversimplifying:\n\n{content}"
    )
}

/// Chunk statistics and the token-reduction measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Word count of each chunk, in chunk order.
    pub word_count_per_chunk: Vec<usize>,
    /// Number of chunks.
    pub total_chunks: usize,
    /// Words across all chunks.
    pub total_words: usize,
    /// Words in the combined representative content sent for summarizing.
    pub words_sent: usize,
    /// `words_sent / total_words`.
    pub reduction_ratio: f64,
    /// Tokens in the preprocessed document, when a counter was attached.
    #[serde(default)]
    pub total_tokens: Option<usize>,
    /// Tokens in the combined content, when a counter was attached.
    #[serde(default)]
    pub tokens_sent: Option<usize>,
}

impl Analysis {
    /// Measure `combined_content` against the full chunk list.
    #[must_use]
    pub fn new(chunks: &[Chunk], combined_content: &str) -> Self {
        let word_count_per_chunk: Vec<usize> = chunks.iter().map(|c| c.words).collect();
        let total_words = word_count_per_chunk.iter().sum();
        let words_sent = word_count(combined_content);
        let reduction_ratio = if total_words == 0 {
            0.0
        } else {
            words_sent as f64 / total_words as f64
        };
        Self {
            total_chunks: word_count_per_chunk.len(),
            word_count_per_chunk,
            total_words,
            words_sent,
            reduction_ratio,
            total_tokens: None,
            tokens_sent: None,
        }
    }

    /// Add token counts for the preprocessed document and the combined
    /// content.
    pub fn with_token_counts(
        mut self,
        counter: &dyn TokenCounter,
        processed_text: &str,
        combined_content: &str,
    ) -> Result<Self> {
        self.total_tokens = Some(counter.count_tokens(processed_text)?);
        self.tokens_sent = Some(counter.count_tokens(combined_content)?);
        Ok(self)
    }
}

/// Output of the language-model-free part of the pipeline.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Chunks of the preprocessed document.
    pub chunks: Vec<Chunk>,
    /// Labels and centers.
    pub clustering: Clustering,
    /// Representatives per cluster, in label order.
    pub representatives: Vec<Representatives>,
}

impl Selection {
    /// Representative texts per cluster, space-joined in distance order.
    #[must_use]
    pub fn cluster_content(&self) -> BTreeMap<usize, String> {
        self.representatives
            .iter()
            .map(|rep| {
                let texts: Vec<&str> = rep
                    .indices
                    .iter()
                    .map(|&i| self.chunks[i].text.as_str())
                    .collect();
                (rep.label, texts.join(" "))
            })
            .collect()
    }
}

/// Result of summarizing one document.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Theme per cluster label.
    pub themes: BTreeMap<usize, String>,
    /// Representative content per cluster label.
    pub cluster_content: BTreeMap<usize, String>,
    /// All cluster content joined in label order; the summary's input.
    pub combined_content: String,
    /// The language model's summary of `combined_content`.
    pub summary: String,
    /// Chunks, clustering and representatives.
    pub selection: Selection,
    /// Chunk statistics and the reduction ratio.
    pub analysis: Analysis,
}

impl Summary {
    /// Cluster label per chunk.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.selection.clustering.labels
    }
}

/// Runs the full pipeline with one embedder and one language model.
///
/// Each call to [`Summarizer::run`] builds a fresh [`ClusterEngine`], so a
/// summarizer can be reused across documents without their vectors mixing.
pub struct Summarizer<E, L> {
    config: Config,
    embedder: E,
    llm: L,
    tokens: Option<Box<dyn TokenCounter>>,
}

impl<E: std::fmt::Debug, L: std::fmt::Debug> std::fmt::Debug for Summarizer<E, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("config", &self.config)
            .field("embedder", &self.embedder)
            .field("llm", &self.llm)
            .field("counts_tokens", &self.tokens.is_some())
            .finish()
    }
}

impl<E: Embedder, L: LanguageModel> Summarizer<E, L> {
    /// Create a summarizer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` fails validation.
    pub fn new(config: Config, embedder: E, llm: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            embedder,
            llm,
            tokens: None,
        })
    }

    /// Also report token counts in [`Analysis`], measured with `counter`.
    #[must_use]
    pub fn with_token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.tokens = Some(Box::new(counter));
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment, embed, cluster and select representatives.
    ///
    /// # Errors
    ///
    /// [`Error::NothingToCluster`] if the document yields no chunks, and any
    /// provider or clustering error unchanged.
    pub fn select(&self, raw_text: &str) -> Result<Selection> {
        self.select_preprocessed(&preprocess(raw_text))
    }

    fn select_preprocessed(&self, cleaned: &str) -> Result<Selection> {
        let mut segmenter = Segmenter::from_config(&self.config)?;
        segmenter.chunk(cleaned);
        info!(
            chunks = segmenter.total_chunks(),
            words = segmenter.total_words(),
            "chunked document"
        );
        if segmenter.total_chunks() == 0 {
            warn!("document is empty after preprocessing");
            return Err(Error::NothingToCluster);
        }

        let mut engine = ClusterEngine::from_config(&self.embedder, &self.config);
        let representatives = engine.select(&segmenter.texts())?;
        let clustering = engine.clustering().cloned().ok_or(Error::NotClustered)?;

        Ok(Selection {
            chunks: segmenter.take_chunks(),
            clustering,
            representatives,
        })
    }

    /// Run the whole pipeline on `raw_text`.
    ///
    /// # Errors
    ///
    /// Everything [`Summarizer::select`] returns, plus language-model and
    /// token-counter errors.
    /// No partial summary is produced.
    pub fn run(&self, raw_text: &str) -> Result<Summary> {
        let cleaned = preprocess(raw_text);
        let selection = self.select_preprocessed(&cleaned)?;
        let themes = self.themes(&selection)?;

        let cluster_content = selection.cluster_content();
        let combined_content = cluster_content
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        info!(clusters = themes.len(), "writing final summary");
        let summary = self.llm.complete(&summary_prompt(&combined_content))?;
        let mut analysis = Analysis::new(&selection.chunks, &combined_content);
        if let Some(counter) = &self.tokens {
            analysis = analysis.with_token_counts(&**counter, &cleaned, &combined_content)?;
        }
        info!(
            words_sent = analysis.words_sent,
            total_words = analysis.total_words,
            ratio = analysis.reduction_ratio,
            "summarized document"
        );

        Ok(Summary {
            themes,
            cluster_content,
            combined_content,
            summary: summary.trim().to_string(),
            selection,
            analysis,
        })
    }

    /// One theme per cluster, from its closest representative.
    fn themes(&self, selection: &Selection) -> Result<BTreeMap<usize, String>> {
        selection
            .representatives
            .iter()
            .filter_map(|rep| rep.closest().map(|i| (rep.label, i)))
            .map(|(label, index)| {
                let theme = self
                    .llm
                    .complete(&theme_prompt(&selection.chunks[index].text))?;
                Ok((label, theme.trim().to_string()))
            })
            .collect()
    }
}
