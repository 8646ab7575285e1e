//! Split a matrix into its positive and negative parts.
//!
//! `a == positive(a) - negative(a)` with both parts non-negative, which is
//! how injections are separated into generation and load.

use crate::matrix::Matrix;

/// Entries `> 0`; everything else zero. Same storage and shape as `a`.
pub fn positive(a: &Matrix) -> Matrix {
    a.map_entries(|v| if v > 0.0 { v } else { 0.0 })
}

/// Magnitudes of the entries `< 0`; everything else zero. Same storage and
/// shape as `a`.
pub fn negative(a: &Matrix) -> Matrix {
    a.map_entries(|v| if v < 0.0 { -v } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{dense_from_rows, dense_to_rows};

    fn sample() -> Matrix {
        Matrix::Dense(dense_from_rows(&[vec![-1.0, 2.0], vec![3.0, -4.0]]).unwrap())
    }

    #[test]
    fn test_dense_split() {
        let a = sample();
        assert_eq!(
            dense_to_rows(&positive(&a).to_dense()),
            vec![vec![0.0, 2.0], vec![3.0, 0.0]]
        );
        assert_eq!(
            dense_to_rows(&negative(&a).to_dense()),
            vec![vec![1.0, 0.0], vec![0.0, 4.0]]
        );
    }

    #[test]
    fn test_sparse_split_keeps_storage_and_drops_zeros() {
        for a in [sample().to_csr(), sample().to_csc()] {
            let pos = positive(&a);
            let neg = negative(&a);
            assert!(pos.is_sparse());
            assert_eq!(std::mem::discriminant(&pos), std::mem::discriminant(&a));
            assert_eq!(pos.nnz(), 2);
            assert_eq!(neg.nnz(), 2);
            assert_eq!(pos.get(1, 0), 3.0);
            assert_eq!(neg.get(1, 1), 4.0);
        }
    }

    #[test]
    fn test_parts_reconstruct_input() {
        let a = Matrix::Dense(
            dense_from_rows(&[
                vec![0.5, -2.25, 0.0],
                vec![-7.0, 1e-12, 3.0],
                vec![0.0, -0.0, -1e9],
            ])
            .unwrap(),
        );
        for variant in [a.clone(), a.to_csr(), a.to_csc()] {
            let pos = positive(&variant).to_dense();
            let neg = negative(&variant).to_dense();
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(pos.read(i, j) - neg.read(i, j), a.get(i, j));
                    assert!(pos.read(i, j) >= 0.0 && neg.read(i, j) >= 0.0);
                }
            }
        }
    }
}
