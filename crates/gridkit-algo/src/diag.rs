use sprs::{CsMat, TriMat};

/// Sparse diagonal matrix in CSC storage.
///
/// `k = 0` places `values` on the main diagonal of an `N x N` matrix.
/// `k > 0` uses the k-th superdiagonal and `k < 0` the k-th subdiagonal of
/// a square matrix of size `N + |k|`.
pub fn spdiag(values: &[f64], k: isize) -> CsMat<f64> {
    let n = values.len();
    if k == 0 {
        let indptr: Vec<usize> = (0..=n).collect();
        let indices: Vec<usize> = (0..n).collect();
        return CsMat::new_csc((n, n), indptr, indices, values.to_vec());
    }
    let offset = k.unsigned_abs();
    let size = n + offset;
    let mut triplets = TriMat::new((size, size));
    for (i, &v) in values.iter().enumerate() {
        if k > 0 {
            triplets.add_triplet(i, i + offset, v);
        } else {
            triplets.add_triplet(i + offset, i, v);
        }
    }
    triplets.to_csc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_diagonal() {
        let d = spdiag(&[1.0, 2.0, 3.0], 0);
        assert!(d.is_csc());
        assert_eq!(d.shape(), (3, 3));
        assert_eq!(d.nnz(), 3);
        assert_eq!(d.get(1, 1).copied(), Some(2.0));
        assert_eq!(d.get(0, 1), None);
    }

    #[test]
    fn test_off_diagonals() {
        let upper = spdiag(&[5.0, 6.0], 1);
        assert_eq!(upper.shape(), (3, 3));
        assert_eq!(upper.get(0, 1).copied(), Some(5.0));
        assert_eq!(upper.get(1, 2).copied(), Some(6.0));

        let lower = spdiag(&[7.0], -2);
        assert_eq!(lower.shape(), (3, 3));
        assert_eq!(lower.get(2, 0).copied(), Some(7.0));
        assert_eq!(lower.nnz(), 1);
    }

    #[test]
    fn test_empty() {
        let d = spdiag(&[], 0);
        assert_eq!(d.shape(), (0, 0));
        assert_eq!(d.nnz(), 0);
    }
}
