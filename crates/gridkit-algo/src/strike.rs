//! Removing one row/column from a square matrix and putting it back.
//!
//! Striking index `n` out of an `N x N` matrix maps every remaining original
//! index onto the reduced range `0..N-1`:
//!
//! ```text
//! original  0 1 .. n-1  n  n+1 .. N-1
//! reduced   0 1 .. n-1  -  n   .. N-2
//! ```

use crate::error::{check_square_index, LinalgError, LinalgResult};
use crate::matrix::Matrix;
use faer::Mat;
use sprs::CsMat;

/// Bijection between `{0..N-1} \ {n}` and `{0..N-2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeMap {
    size: usize,
    strike: usize,
}

impl StrikeMap {
    pub fn new(size: usize, strike: usize) -> LinalgResult<Self> {
        if size == 0 {
            return Err(LinalgError::InvalidArgument(
                "cannot strike from an empty index space".into(),
            ));
        }
        if strike >= size {
            return Err(LinalgError::IndexOutOfRange {
                index: strike,
                size,
            });
        }
        Ok(Self { size, strike })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn strike(&self) -> usize {
        self.strike
    }

    pub fn reduced_size(&self) -> usize {
        self.size - 1
    }

    /// Reduced index of original index `i`; `None` for the struck index or
    /// out-of-range input.
    pub fn to_reduced(&self, i: usize) -> Option<usize> {
        if i >= self.size || i == self.strike {
            None
        } else if i < self.strike {
            Some(i)
        } else {
            Some(i - 1)
        }
    }

    /// Original index of reduced index `r`; `None` when out of range.
    pub fn to_original(&self, r: usize) -> Option<usize> {
        (r < self.reduced_size()).then(|| self.lift(r))
    }

    /// Unchecked `to_original` for indices known to be in range.
    #[inline]
    pub(crate) fn lift(&self, r: usize) -> usize {
        if r < self.strike {
            r
        } else {
            r + 1
        }
    }

    /// Original indices in reduced order.
    pub fn original_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&i| i != self.strike)
    }

    /// Place a reduced `(N-1) x (N-1)` matrix into `N x N` coordinates with
    /// an all-zero row and column at the struck index.
    pub fn embed(&self, reduced: &Mat<f64>) -> Mat<f64> {
        debug_assert_eq!(reduced.nrows(), self.reduced_size());
        debug_assert_eq!(reduced.ncols(), self.reduced_size());
        Mat::from_fn(self.size, self.size, |i, j| {
            match (self.to_reduced(i), self.to_reduced(j)) {
                (Some(ri), Some(rj)) => reduced.read(ri, rj),
                _ => 0.0,
            }
        })
    }
}

/// Delete row `n` and column `n` of a dense square matrix.
pub fn strike_out_dense(m: &Mat<f64>, n: usize) -> LinalgResult<Mat<f64>> {
    let size = check_square_index((m.nrows(), m.ncols()), n)?;
    let map = StrikeMap::new(size, n)?;
    let k = map.reduced_size();
    Ok(Mat::from_fn(k, k, |r, c| m.read(map.lift(r), map.lift(c))))
}

/// Delete row `n` and column `n` of a sparse square matrix, keeping its
/// compressed orientation.
pub fn strike_out_sparse(m: &CsMat<f64>, n: usize) -> LinalgResult<CsMat<f64>> {
    let size = check_square_index(m.shape(), n)?;
    let k = size - 1;
    Ok(drop_lanes(m, Some(n), Some(n), (k, k)))
}

/// Delete column `n` only, leaving an `R x (C-1)` matrix.
pub fn strike_column(m: &Matrix, n: usize) -> LinalgResult<Matrix> {
    let (rows, cols) = m.shape();
    if n >= cols {
        return Err(LinalgError::IndexOutOfRange {
            index: n,
            size: cols,
        });
    }
    let shape = (rows, cols - 1);
    Ok(match m {
        Matrix::Dense(d) => Matrix::Dense(Mat::from_fn(rows, cols - 1, |i, j| {
            d.read(i, if j < n { j } else { j + 1 })
        })),
        Matrix::Csr(s) => Matrix::Csr(drop_lanes(s, None, Some(n), shape)),
        Matrix::Csc(s) => Matrix::Csc(drop_lanes(s, Some(n), None, shape)),
    })
}

/// Copy compressed storage, skipping one outer lane and/or one inner index
/// and shifting the indices above them down by one.
fn drop_lanes(
    m: &CsMat<f64>,
    outer: Option<usize>,
    inner: Option<usize>,
    shape: (usize, usize),
) -> CsMat<f64> {
    let shift = |idx: usize| match inner {
        Some(skip) if idx > skip => idx - 1,
        _ => idx,
    };
    let mut indptr = Vec::with_capacity(m.outer_dims() + 1);
    let mut indices = Vec::with_capacity(m.nnz());
    let mut data = Vec::with_capacity(m.nnz());
    indptr.push(0);
    for (o, lane) in m.outer_iterator().enumerate() {
        if Some(o) == outer {
            continue;
        }
        for (i, &val) in lane.iter() {
            if Some(i) == inner {
                continue;
            }
            indices.push(shift(i));
            data.push(val);
        }
        indptr.push(indices.len());
    }
    if m.is_csr() {
        CsMat::new(shape, indptr, indices, data)
    } else {
        CsMat::new_csc(shape, indptr, indices, data)
    }
}
