//! Core distances: a per-item density proxy.

use super::distance::DistanceMatrix;

/// Distance from each item to its k-th nearest neighbor.
///
/// Row `i` is sorted ascending and the value at index `min(k, n - 1)` is
/// taken. The row includes the item's own zero distance at index 0, so
/// index `k` is the k-th nearest *other* item. Larger `k` smooths the
/// density estimate and biases towards fewer, larger clusters.
pub fn core_distances(matrix: &DistanceMatrix, k: usize) -> Vec<f64> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }
    let rank = k.min(n - 1);

    (0..n)
        .map(|i| {
            let mut row = matrix.row(i).to_vec();
            row.sort_by(f64::total_cmp);
            row[rank]
        })
        .collect()
}
