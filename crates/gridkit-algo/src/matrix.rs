//! Storage-agnostic matrix value.
//!
//! Routines that accept "a dense or compressed sparse matrix" take a
//! [`Matrix`] and dispatch on the variant explicitly. Sparse variants keep
//! their compressed orientation through every transform.

use crate::error::{LinalgError, LinalgResult};
use faer::Mat;
use sprs::{CsMat, CsMatI, TriMat};

/// Dense or compressed sparse matrix of `f64`.
#[derive(Debug, Clone)]
pub enum Matrix {
    Dense(Mat<f64>),
    /// Compressed sparse row storage
    Csr(CsMat<f64>),
    /// Compressed sparse column storage
    Csc(CsMat<f64>),
}

/// Sparse matrix with 32-bit indices and index pointers.
pub type CompactCsMat = CsMatI<f64, u32>;

impl From<Mat<f64>> for Matrix {
    fn from(m: Mat<f64>) -> Self {
        Matrix::Dense(m)
    }
}

impl From<CsMat<f64>> for Matrix {
    fn from(m: CsMat<f64>) -> Self {
        if m.is_csr() {
            Matrix::Csr(m)
        } else {
            Matrix::Csc(m)
        }
    }
}

impl Matrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => (m.nrows(), m.ncols()),
            Matrix::Csr(m) | Matrix::Csc(m) => m.shape(),
        }
    }

    pub fn is_square(&self) -> bool {
        let (rows, cols) = self.shape();
        rows == cols
    }

    pub fn is_sparse(&self) -> bool {
        !matches!(self, Matrix::Dense(_))
    }

    /// Number of non-zero entries (stored entries for sparse variants).
    pub fn nnz(&self) -> usize {
        match self {
            Matrix::Dense(m) => (0..m.ncols())
                .map(|j| (0..m.nrows()).filter(|&i| m.read(i, j) != 0.0).count())
                .sum(),
            Matrix::Csr(m) | Matrix::Csc(m) => m.nnz(),
        }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        match self {
            Matrix::Dense(m) => m.read(i, j),
            Matrix::Csr(m) | Matrix::Csc(m) => m.get(i, j).copied().unwrap_or(0.0),
        }
    }

    /// Materialize as a dense matrix.
    pub fn to_dense(&self) -> Mat<f64> {
        match self {
            Matrix::Dense(m) => m.clone(),
            Matrix::Csr(m) | Matrix::Csc(m) => sparse_to_dense(m),
        }
    }

    /// Convert to compressed sparse row storage, dropping zeros.
    pub fn to_csr(&self) -> Matrix {
        match self {
            Matrix::Dense(m) => Matrix::Csr(dense_to_triplets(m).to_csr()),
            Matrix::Csr(m) => Matrix::Csr(m.clone()),
            Matrix::Csc(m) => Matrix::Csr(m.to_other_storage()),
        }
    }

    /// Convert to compressed sparse column storage, dropping zeros.
    pub fn to_csc(&self) -> Matrix {
        match self {
            Matrix::Dense(m) => Matrix::Csc(dense_to_triplets(m).to_csc()),
            Matrix::Csr(m) => Matrix::Csc(m.to_other_storage()),
            Matrix::Csc(m) => Matrix::Csc(m.clone()),
        }
    }

    /// Apply `f` to every entry, keeping variant and shape.
    ///
    /// Sparse variants only visit stored entries (so `f(0.0)` must be `0.0`)
    /// and structurally drop entries that map to zero.
    pub fn map_entries(&self, f: impl Fn(f64) -> f64) -> Matrix {
        match self {
            Matrix::Dense(m) => Matrix::Dense(Mat::from_fn(m.nrows(), m.ncols(), |i, j| {
                f(m.read(i, j))
            })),
            Matrix::Csr(m) => Matrix::Csr(map_compressed(m, f)),
            Matrix::Csc(m) => Matrix::Csc(map_compressed(m, f)),
        }
    }
}

/// Dense copy of any matrix variant.
pub fn densify(m: &Matrix) -> Mat<f64> {
    m.to_dense()
}

/// Build a dense matrix from row vectors; rows must have equal length.
pub fn dense_from_rows(rows: &[Vec<f64>]) -> LinalgResult<Mat<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
        return Err(LinalgError::InvalidArgument(format!(
            "row {i} has {} entries, expected {ncols}",
            row.len()
        )));
    }
    Ok(Mat::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

/// Row vectors of a dense matrix.
pub fn dense_to_rows(m: &Mat<f64>) -> Vec<Vec<f64>> {
    (0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m.read(i, j)).collect())
        .collect()
}

fn sparse_to_dense(m: &CsMat<f64>) -> Mat<f64> {
    let (rows, cols) = m.shape();
    let mut dense = Mat::<f64>::zeros(rows, cols);
    for (&val, (i, j)) in m.iter() {
        dense.write(i, j, val);
    }
    dense
}

fn dense_to_triplets(m: &Mat<f64>) -> TriMat<f64> {
    let mut triplets = TriMat::new((m.nrows(), m.ncols()));
    for j in 0..m.ncols() {
        for i in 0..m.nrows() {
            let val = m.read(i, j);
            if val != 0.0 {
                triplets.add_triplet(i, j, val);
            }
        }
    }
    triplets
}

/// Rebuild compressed storage from mapped values, eliminating zeros.
fn map_compressed(m: &CsMat<f64>, f: impl Fn(f64) -> f64) -> CsMat<f64> {
    let mut indptr = Vec::with_capacity(m.outer_dims() + 1);
    let mut indices = Vec::with_capacity(m.nnz());
    let mut data = Vec::with_capacity(m.nnz());
    indptr.push(0);
    for lane in m.outer_iterator() {
        for (inner, &val) in lane.iter() {
            let mapped = f(val);
            if mapped != 0.0 {
                indices.push(inner);
                data.push(mapped);
            }
        }
        indptr.push(indices.len());
    }
    if m.is_csr() {
        CsMat::new(m.shape(), indptr, indices, data)
    } else {
        CsMat::new_csc(m.shape(), indptr, indices, data)
    }
}

/// Narrow a sparse matrix to 32-bit indices.
///
/// Halves index memory on 64-bit targets. Fails when a dimension or the
/// number of stored entries does not fit in `u32`.
pub fn compact_indices(m: &CsMat<f64>) -> LinalgResult<CompactCsMat> {
    let narrow = |value: usize, what: &str| {
        u32::try_from(value).map_err(|_| {
            LinalgError::InvalidArgument(format!("{what} {value} exceeds 32-bit index range"))
        })
    };
    let (rows, cols) = m.shape();
    narrow(rows, "row count")?;
    narrow(cols, "column count")?;
    narrow(m.nnz(), "stored entry count")?;

    let mut indptr: Vec<u32> = Vec::with_capacity(m.outer_dims() + 1);
    let mut indices: Vec<u32> = Vec::with_capacity(m.nnz());
    let mut data = Vec::with_capacity(m.nnz());
    indptr.push(0);
    for lane in m.outer_iterator() {
        for (inner, &val) in lane.iter() {
            indices.push(narrow(inner, "index")?);
            data.push(val);
        }
        indptr.push(narrow(data.len(), "index pointer")?);
    }
    Ok(if m.is_csr() {
        CsMatI::new((rows, cols), indptr, indices, data)
    } else {
        CsMatI::new_csc((rows, cols), indptr, indices, data)
    })
}
