//! Batched embedding and k-means grouping.
//!
//! ## K-means
//!
//! Assign each vector to its nearest center, move each center to the mean of
//! its vectors, repeat until the centers stop moving:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Centers are seeded with k-means++ from a fixed RNG seed, and the RNG is
//! rebuilt on every call. Clustering the same vectors with the same `k`
//! therefore always produces the same labels and centers, which keeps
//! prompts (and tests) reproducible.
//!
//! ## Clamping
//!
//! Asking for more clusters than there are vectors is not an error: `k` is
//! clamped to the vector count. Asking for zero clusters, or clustering an
//! empty store, is.
//!
//! Repeated boilerplate embeds to identical vectors. k-means++ cannot pick
//! more centers than there are distinct points, so `k` is also clamped to
//! the number of distinct vectors:
//!
//! ```text
//! vectors: [a, a, a, b]   n_clusters = 3   ->   k = 2
//! ```

use std::collections::HashSet;

use linfa::dataset::AsTargets;
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing::{debug, info};

use crate::provider::Embedder;
use crate::{closest_representatives, Config, Error, Representatives, Result};

/// Seed for k-means++ initialisation.
pub const KMEANS_SEED: u64 = 0;

const MAX_ITERATIONS: u64 = 300;
const TOLERANCE: f64 = 1e-4;

/// Labels and centers from one k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster label per input vector, in input order. Labels are `0..k`.
    pub labels: Vec<usize>,
    /// One centroid per label, same dimensionality as the inputs.
    pub centers: Vec<Vec<f32>>,
}

impl Clustering {
    /// Number of clusters (after clamping).
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.centers.len()
    }

    /// Number of vectors carrying each label.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centers.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Run seeded k-means over `vectors`.
///
/// `n_clusters` is clamped to the number of distinct vectors, so the result
/// may hold fewer clusters than requested.
///
/// # Errors
///
/// - [`Error::InvalidClusterCount`] if `n_clusters == 0`
/// - [`Error::NothingToCluster`] if `vectors` is empty
/// - [`Error::DimensionMismatch`] if the vectors differ in length
/// - [`Error::Clustering`] if the fit itself fails
///
/// ```rust
/// let vectors = vec![
///     vec![0.0, 0.0],
///     vec![0.1, 0.1],
///     vec![10.0, 10.0],
///     vec![10.1, 10.1],
/// ];
/// let clustering = precis::kmeans(&vectors, 2).unwrap();
///
/// assert_eq!(clustering.labels[0], clustering.labels[1]);
/// assert_ne!(clustering.labels[0], clustering.labels[2]);
/// assert_eq!(clustering.centers.len(), 2);
/// ```
pub fn kmeans(vectors: &[Vec<f32>], n_clusters: usize) -> Result<Clustering> {
    if n_clusters == 0 {
        return Err(Error::InvalidClusterCount(n_clusters));
    }
    if vectors.is_empty() {
        return Err(Error::NothingToCluster);
    }

    let dim = vectors[0].len();
    let mut records = Array2::<f64>::zeros((vectors.len(), dim));
    for (i, vector) in vectors.iter().enumerate() {
        if vector.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: vector.len(),
            });
        }
        for (j, &x) in vector.iter().enumerate() {
            records[[i, j]] = f64::from(x);
        }
    }

    let k = n_clusters.min(distinct_count(vectors));
    if k < n_clusters {
        debug!(
            requested = n_clusters,
            clamped = k,
            vectors = vectors.len(),
            "clamping cluster count to distinct vectors"
        );
    }
    let dataset = DatasetBase::from(records);

    let model = KMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(KMEANS_SEED))
        .max_n_iterations(MAX_ITERATIONS)
        .tolerance(TOLERANCE)
        .fit(&dataset)
        .map_err(|e| Error::Clustering(format!("k-means fit failed: {e}")))?;

    let predictions = model.predict(&dataset);
    let labels: Vec<usize> = predictions.as_targets().iter().copied().collect();

    let centers = model
        .centroids()
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&x| x as f32).collect())
        .collect();

    Ok(Clustering { labels, centers })
}

/// Number of distinct vectors, comparing `0.0` and `-0.0` as equal.
fn distinct_count(vectors: &[Vec<f32>]) -> usize {
    vectors
        .iter()
        .map(|v| {
            v.iter()
                .map(|&x| if x == 0.0 { 0 } else { x.to_bits() })
                .collect::<Vec<u32>>()
        })
        .collect::<HashSet<_>>()
        .len()
}

/// Owns the vectors of one document and clusters them.
///
/// Create one engine per document: the vector store only grows, and a
/// second document's chunks would otherwise be clustered together with the
/// first's.
///
/// ## Example
///
/// ```rust
/// use precis::provider::Embedder;
/// use precis::ClusterEngine;
///
/// /// Embeds a text as (length, vowel count).
/// struct Shape;
///
/// impl Embedder for Shape {
///     fn embed(&self, texts: &[&str]) -> precis::Result<Vec<Vec<f32>>> {
///         Ok(texts
///             .iter()
///             .map(|t| {
///                 let vowels = t.chars().filter(|c| "aeiou".contains(*c)).count();
///                 vec![t.len() as f32, vowels as f32]
///             })
///             .collect())
///     }
/// }
///
/// let mut engine = ClusterEngine::new(Shape);
/// engine.embed_all(&["a", "ab", "a much longer text", "another long text"], 2)?;
///
/// let clustering = engine.cluster(2)?;
/// assert_eq!(clustering.labels.len(), 4);
///
/// let reps = engine.closest_representatives(1)?;
/// assert_eq!(reps.len(), 2);
/// # Ok::<(), precis::Error>(())
/// ```
#[derive(Debug)]
pub struct ClusterEngine<E> {
    embedder: E,
    batch_size: usize,
    n_clusters: usize,
    n_representatives: usize,
    vectors: Vec<Vec<f32>>,
    clustering: Option<Clustering>,
}

impl<E: Embedder> ClusterEngine<E> {
    /// Create an engine with an empty vector store and the default
    /// `embed_batch_size`, `n_clusters` and `n_closest_representatives`.
    pub fn new(embedder: E) -> Self {
        Self::from_config(embedder, &Config::default())
    }

    /// Create an engine whose [`ClusterEngine::select`] uses the batch size,
    /// cluster count and representative count from `config`.
    pub fn from_config(embedder: E, config: &Config) -> Self {
        Self {
            embedder,
            batch_size: config.embed_batch_size,
            n_clusters: config.n_clusters,
            n_representatives: config.n_closest_representatives,
            vectors: Vec::new(),
            clustering: None,
        }
    }

    /// Embed, cluster and select with the engine's configured counts.
    ///
    /// Equivalent to [`ClusterEngine::embed_all`], [`ClusterEngine::cluster`]
    /// and [`ClusterEngine::closest_representatives`] in sequence. The
    /// clustering stays available through [`ClusterEngine::clustering`].
    pub fn select<S: AsRef<str>>(&mut self, chunks: &[S]) -> Result<Vec<Representatives>> {
        self.embed_all(chunks, self.batch_size)?;
        self.cluster(self.n_clusters)?;
        self.closest_representatives(self.n_representatives)
    }

    /// Embed `chunks` in consecutive batches of `batch_size`, appending the
    /// vectors to the store in chunk order.
    ///
    /// Batches are sent one at a time. If any batch fails, the store is
    /// rolled back to its state before the call and the error is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBatchSize`] if `batch_size == 0`
    /// - [`Error::EmbeddingCount`] if a batch returns the wrong number of vectors
    /// - [`Error::DimensionMismatch`] if a vector's length differs from the store's
    /// - any error from the embedder, unchanged
    pub fn embed_all<S: AsRef<str>>(&mut self, chunks: &[S], batch_size: usize) -> Result<()> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize(batch_size));
        }

        let before = self.vectors.len();
        let result = self.embed_batches(chunks, batch_size);
        if result.is_err() {
            self.vectors.truncate(before);
        }
        result?;

        info!(
            chunks = chunks.len(),
            stored = self.vectors.len(),
            "embedded chunks"
        );
        Ok(())
    }

    fn embed_batches<S: AsRef<str>>(&mut self, chunks: &[S], batch_size: usize) -> Result<()> {
        let total_batches = chunks.len().div_ceil(batch_size);

        for (batch_index, batch) in chunks.chunks(batch_size).enumerate() {
            let texts: Vec<&str> = batch.iter().map(AsRef::as_ref).collect();
            let vectors = self.embedder.embed(&texts)?;

            if vectors.len() != texts.len() {
                return Err(Error::EmbeddingCount {
                    expected: texts.len(),
                    found: vectors.len(),
                });
            }
            for vector in vectors {
                self.push_vector(vector)?;
            }

            debug!(
                batch = batch_index + 1,
                of = total_batches,
                "embedded batch"
            );
        }
        Ok(())
    }

    fn push_vector(&mut self, vector: Vec<f32>) -> Result<()> {
        let expected = self.vectors.first().map_or(vector.len(), Vec::len);
        if vector.is_empty() || vector.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: vector.len(),
            });
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Cluster the stored vectors into `n_clusters` groups.
    ///
    /// Replaces any earlier clustering. See [`kmeans`] for the clamp policy
    /// and errors.
    pub fn cluster(&mut self, n_clusters: usize) -> Result<Clustering> {
        self.clustering = None;
        let clustering = kmeans(&self.vectors, n_clusters)?;
        info!(
            vectors = self.vectors.len(),
            clusters = clustering.n_clusters(),
            "clustered vectors"
        );
        self.clustering = Some(clustering.clone());
        Ok(clustering)
    }

    /// For each cluster, the `n` stored vectors nearest its center.
    ///
    /// # Errors
    ///
    /// [`Error::NotClustered`] before [`ClusterEngine::cluster`] has
    /// succeeded; otherwise see [`closest_representatives`].
    pub fn closest_representatives(&self, n: usize) -> Result<Vec<Representatives>> {
        let clustering = self.clustering.as_ref().ok_or(Error::NotClustered)?;
        closest_representatives(&self.vectors, &clustering.centers, n)
    }

    /// The stored vectors, in chunk order.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// The last successful clustering, if any.
    pub fn clustering(&self) -> Option<&Clustering> {
        self.clustering.as_ref()
    }

    /// The embedder this engine calls.
    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}
