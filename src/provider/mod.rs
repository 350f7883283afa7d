//! Embedding and language-model gateways.
//!
//! The pipeline talks to two external collaborators through small traits:
//!
//! - [`Embedder`]: texts in, one vector per text out, same order.
//! - [`LanguageModel`]: prompt in, free text out.
//!
//! A third, optional one measures what a run costs:
//!
//! - [`TokenCounter`]: text in, model token count out.
//!
//! Errors are returned as [`Error::Provider`](crate::Error::Provider) and
//! propagate unchanged. Nothing here retries; a backend that wants
//! retry/backoff does it inside its own `embed`/`complete`.
//!
//! Concrete backends sit behind cargo features:
//!
//! | Feature | Type | Backend |
//! |---------|------|---------|
//! | `fastembed` | `FastEmbedder` | Local ONNX models via fastembed |
//! | `http` | `OllamaEmbedder` | Ollama `/api/embed` |
//! | `http` | `ChatCompletions` | OpenAI-compatible `/chat/completions` (Groq by default) |
//! | `tokenizers` | `HfTokenizer` | HuggingFace `tokenizer.json` |

use std::cell::OnceCell;

use crate::Result;

#[cfg(feature = "fastembed")]
mod fastembed;
#[cfg(feature = "http")]
mod ollama;
#[cfg(feature = "http")]
mod openai;
#[cfg(feature = "tokenizers")]
mod tokenizer;

#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedder;
#[cfg(feature = "http")]
pub use self::ollama::OllamaEmbedder;
#[cfg(feature = "http")]
pub use self::openai::ChatCompletions;
#[cfg(feature = "tokenizers")]
pub use self::tokenizer::HfTokenizer;

/// Turns texts into fixed-size vectors.
pub trait Embedder {
    /// Embed `texts`, returning exactly one vector per text in input order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Completes a free-text prompt.
pub trait LanguageModel {
    /// Return the model's reply to `prompt`.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Counts the tokens a language model would see for a text.
pub trait TokenCounter {
    /// Number of tokens in `text`.
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

impl<T: Embedder + ?Sized> Embedder for &T {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for Box<T> {
    fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        (**self).count_tokens(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Box<T> {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        (**self).count_tokens(text)
    }
}

/// A value constructed on first use and cached afterwards.
///
/// Model handles are expensive to build (weights to download, sessions to
/// open). Backends keep them in a `Lazy` so that constructing a backend is
/// cheap and a run that never embeds never loads a model.
///
/// ```rust
/// use precis::provider::Lazy;
///
/// let handle: Lazy<String> = Lazy::new();
/// assert!(handle.get().is_none());
///
/// let loaded = handle.get_or_try_init(|| Ok::<_, ()>("model".to_string())).unwrap();
/// assert_eq!(loaded, "model");
/// assert!(handle.get().is_some());
/// ```
#[derive(Debug, Default)]
pub struct Lazy<T> {
    cell: OnceCell<T>,
}

impl<T> Lazy<T> {
    /// An uninitialised holder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The value, if it has been initialised.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// The value, building it with `init` on first access.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    /// The value, building it with a fallible `init` on first access.
    ///
    /// A failed `init` leaves the holder uninitialised, so the next call
    /// tries again.
    pub fn get_or_try_init<E>(
        &self,
        init: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<&T, E> {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }
        let value = init()?;
        Ok(self.cell.get_or_init(|| value))
    }
}
