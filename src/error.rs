//! Error types for precis.

/// Errors that can occur while condensing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding batch size must be > 0.
    #[error("invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    /// Cluster count must be > 0.
    #[error("invalid cluster count: {0} (must be > 0)")]
    InvalidClusterCount(usize),

    /// Representatives per cluster must be > 0.
    #[error("invalid representative count: {0} (must be > 0)")]
    InvalidRepresentativeCount(usize),

    /// No vectors are available: the document produced zero chunks.
    #[error("nothing to cluster: no vectors have been embedded")]
    NothingToCluster,

    /// Representatives were requested before any clustering ran.
    #[error("no cluster centers: call cluster() before selecting representatives")]
    NotClustered,

    /// An embedding had a different dimensionality than the ones before it.
    #[error("embedding dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimensionality of the first stored vector.
        expected: usize,
        /// Dimensionality of the offending vector.
        found: usize,
    },

    /// The embedding provider returned the wrong number of vectors.
    #[error("embedding provider returned {found} vectors for {expected} inputs")]
    EmbeddingCount {
        /// Number of texts sent.
        expected: usize,
        /// Number of vectors received.
        found: usize,
    },

    /// Embedding or language-model provider failure.
    #[error("provider error: {0}")]
    Provider(String),

    /// The k-means fit failed.
    #[error("clustering error: {0}")]
    Clustering(String),
}

/// Result type for precis operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nothing_to_cluster() {
        let e = Error::NothingToCluster;
        assert!(e.to_string().contains("nothing to cluster"));
    }

    #[test]
    fn test_display_dimension_mismatch() {
        let e = Error::DimensionMismatch {
            expected: 384,
            found: 768,
        };
        assert_eq!(
            e.to_string(),
            "embedding dimension mismatch: expected 384, found 768"
        );
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("missing.toml"));
    }
}
