//! Exact pairwise Euclidean distances.
//!
//! The matrix is dense and row-major: memory grows as n² and building it
//! costs O(n² · D). This is the dominant cost of a clustering run and the
//! reason inputs are practically limited to tens of thousands of items.

use crate::errors::ClusterError;

/// Symmetric n×n matrix of Euclidean distances with a zero diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix from embeddings that must all share one dimension.
    ///
    /// # Errors
    ///
    /// - [`ClusterError::DimensionMismatch`] when an embedding's length
    ///   differs from the first embedding's
    /// - [`ClusterError::NonFiniteEmbedding`] when a component is NaN or
    ///   infinite
    pub fn from_embeddings<E: AsRef<[f64]>>(embeddings: &[E]) -> Result<Self, ClusterError> {
        validate_embeddings(embeddings)?;

        let n = embeddings.len();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dist = euclidean_distance(embeddings[i].as_ref(), embeddings[j].as_ref());
                data[i * n + j] = dist;
                data[j * n + i] = dist;
            }
        }

        Ok(Self { n, data })
    }

    /// Number of items (rows).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between items `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index out of bounds");
        self.data[i * self.n + j]
    }

    /// All distances from item `i`, including the zero self-distance.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// Euclidean distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

fn validate_embeddings<E: AsRef<[f64]>>(embeddings: &[E]) -> Result<(), ClusterError> {
    let Some(first) = embeddings.first() else {
        return Ok(());
    };
    let expected = first.as_ref().len();

    for (index, embedding) in embeddings.iter().enumerate() {
        let values = embedding.as_ref();
        if values.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected,
                found: values.len(),
            });
        }
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(ClusterError::NonFiniteEmbedding { index, position });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[1.5], &[1.5]), 0.0);
        assert_eq!(euclidean_distance(&[], &[]), 0.0);
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let points = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![6.0, 8.0]];
        let matrix = DistanceMatrix::from_embeddings(&points).unwrap();

        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        assert_eq!(matrix.get(0, 2), 10.0);
        assert_eq!(matrix.row(1), &[5.0, 0.0, 5.0]);
    }

    #[test]
    fn test_empty_and_single_inputs() {
        let empty: Vec<Vec<f64>> = vec![];
        let matrix = DistanceMatrix::from_embeddings(&empty).unwrap();
        assert!(matrix.is_empty());

        let single = vec![vec![1.0, 2.0, 3.0]];
        let matrix = DistanceMatrix::from_embeddings(&single).unwrap();
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix.row(0), &[0.0]);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let points = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![1.0, 1.0, 1.0]];
        let err = DistanceMatrix::from_embeddings(&points).unwrap_err();
        assert_eq!(
            err,
            ClusterError::DimensionMismatch {
                index: 2,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let points = vec![vec![0.0, 0.0], vec![1.0, f64::NAN]];
        let err = DistanceMatrix::from_embeddings(&points).unwrap_err();
        assert_eq!(
            err,
            ClusterError::NonFiniteEmbedding {
                index: 1,
                position: 1
            }
        );

        let points = vec![vec![f64::INFINITY]];
        assert!(DistanceMatrix::from_embeddings(&points).is_err());
    }
}
