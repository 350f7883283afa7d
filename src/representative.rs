//! Representative selection: the chunks nearest each cluster center.
//!
//! A cluster of forty chunks about the same topic does not need forty chunks
//! in the summarizer's prompt. The few closest to the centroid stand in for
//! the rest:
//!
//! ```text
//! center c0 ─┬─ 0.12  chunk 7   <- representative
//!            ├─ 0.15  chunk 2   <- representative
//!            ├─ 0.15  chunk 9   <- representative (tie: 2 before 9)
//!            └─ 0.40  chunk 4
//! ```
//!
//! Distances are measured from every stored vector, not only the cluster's
//! members, so two clusters with nearby centers can share a representative.
//! The order is fully deterministic: ascending distance, then ascending
//! chunk index.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The chunks chosen to represent one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representatives {
    /// Cluster label.
    pub label: usize,
    /// Chunk indices in ascending distance from the cluster center.
    pub indices: Vec<usize>,
}

impl Representatives {
    /// The single closest chunk, if any.
    #[must_use]
    pub fn closest(&self) -> Option<usize> {
        self.indices.first().copied()
    }
}

/// For each center (in label order), the `n` vectors nearest to it.
///
/// `n` is clamped to `vectors.len()`.
///
/// # Errors
///
/// - [`Error::InvalidRepresentativeCount`] if `n == 0`
/// - [`Error::NothingToCluster`] if `vectors` is empty
/// - [`Error::NotClustered`] if `centers` is empty
/// - [`Error::DimensionMismatch`] if a vector and a center differ in length
///
/// ```rust
/// use precis::closest_representatives;
///
/// let vectors = vec![vec![0.0], vec![1.0], vec![5.0], vec![6.0]];
/// let centers = vec![vec![0.4], vec![5.6]];
///
/// let reps = closest_representatives(&vectors, &centers, 2).unwrap();
/// assert_eq!(reps[0].indices, vec![0, 1]);
/// assert_eq!(reps[1].indices, vec![3, 2]);
/// ```
pub fn closest_representatives(
    vectors: &[Vec<f32>],
    centers: &[Vec<f32>],
    n: usize,
) -> Result<Vec<Representatives>> {
    if n == 0 {
        return Err(Error::InvalidRepresentativeCount(n));
    }
    if vectors.is_empty() {
        return Err(Error::NothingToCluster);
    }
    if centers.is_empty() {
        return Err(Error::NotClustered);
    }
    let n = n.min(vectors.len());

    centers
        .iter()
        .enumerate()
        .map(|(label, center)| {
            let mut ranked = vectors
                .iter()
                .enumerate()
                .map(|(index, vector)| Ok((euclidean(vector, center)?, index)))
                .collect::<Result<Vec<(f64, usize)>>>()?;
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            Ok(Representatives {
                label,
                indices: ranked.into_iter().take(n).map(|(_, index)| index).collect(),
            })
        })
        .collect()
}

/// Euclidean distance, accumulated in f64.
pub(crate) fn euclidean(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: b.len(),
            found: a.len(),
        });
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    Ok(sum.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap() - 5.0).abs() < 1e-12);
        assert!(euclidean(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_ties_break_by_index() {
        // 1 and 3 are both at distance 1 from the center.
        let vectors = vec![vec![5.0], vec![1.0], vec![0.0], vec![-1.0]];
        let centers = vec![vec![0.0]];
        let reps = closest_representatives(&vectors, &centers, 3).unwrap();
        assert_eq!(reps[0].indices, vec![2, 1, 3]);
    }

    #[test]
    fn test_clamps_to_vector_count() {
        let vectors = vec![vec![0.0], vec![1.0]];
        let centers = vec![vec![0.0]];
        let reps = closest_representatives(&vectors, &centers, 1000).unwrap();
        assert_eq!(reps[0].indices.len(), 2);
    }

    #[test]
    fn test_one_entry_per_center_in_label_order() {
        let vectors = vec![vec![0.0], vec![10.0], vec![20.0]];
        let centers = vec![vec![20.0], vec![0.0], vec![10.0]];
        let reps = closest_representatives(&vectors, &centers, 1).unwrap();

        let labels: Vec<usize> = reps.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![0, 1, 2]);
        assert_eq!(reps[0].closest(), Some(2));
        assert_eq!(reps[1].closest(), Some(0));
        assert_eq!(reps[2].closest(), Some(1));
    }

    #[test]
    fn test_errors() {
        let vectors = vec![vec![0.0]];
        let centers = vec![vec![0.0]];
        assert!(matches!(
            closest_representatives(&vectors, &centers, 0),
            Err(Error::InvalidRepresentativeCount(0))
        ));
        assert!(matches!(
            closest_representatives(&[], &centers, 1),
            Err(Error::NothingToCluster)
        ));
        assert!(matches!(
            closest_representatives(&vectors, &[], 1),
            Err(Error::NotClustered)
        ));
    }
}
