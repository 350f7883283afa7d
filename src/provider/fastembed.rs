//! Local embeddings via fastembed (ONNX Runtime).

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use super::{Embedder, Lazy};
use crate::{Error, Result};

/// Embedder backed by a local fastembed model.
///
/// The model is loaded (and downloaded if needed) on the first call to
/// [`Embedder::embed`], not at construction.
///
/// ```rust,ignore
/// use precis::provider::{Embedder, FastEmbedder};
///
/// let embedder = FastEmbedder::default(); // BGE-small-en, 384 dimensions
/// let vectors = embedder.embed(&["hello", "world"])?;
/// assert_eq!(vectors.len(), 2);
/// ```
pub struct FastEmbedder {
    model_name: EmbeddingModel,
    show_download_progress: bool,
    model: Lazy<TextEmbedding>,
}

impl FastEmbedder {
    /// Create an embedder for a specific fastembed model.
    #[must_use]
    pub fn new(model_name: EmbeddingModel) -> Self {
        Self {
            model_name,
            show_download_progress: false,
            model: Lazy::new(),
        }
    }

    /// Print download progress when the model is fetched.
    #[must_use]
    pub fn with_download_progress(mut self, show: bool) -> Self {
        self.show_download_progress = show;
        self
    }

    fn model(&self) -> Result<&TextEmbedding> {
        self.model.get_or_try_init(|| {
            info!(model = ?self.model_name, "loading fastembed model");
            let options = InitOptions::new(self.model_name.clone())
                .with_show_download_progress(self.show_download_progress);
            TextEmbedding::try_new(options).map_err(|e| Error::Provider(e.to_string()))
        })
    }
}

impl Default for FastEmbedder {
    fn default() -> Self {
        Self::new(EmbeddingModel::BGESmallENV15)
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.model()?
            .embed(texts.to_vec(), None)
            .map_err(|e| Error::Provider(e.to_string()))
    }
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model_name", &self.model_name)
            .field("loaded", &self.model.get().is_some())
            .finish()
    }
}
