//! Strike-out pseudo-inverse.
//!
//! A connected network Laplacian `L` is singular (its rows sum to zero), but
//! fixing the potential of one reference node `n` makes the rest of the
//! system invertible. The strike-out pseudo-inverse deletes row and column
//! `n`, inverts what is left and puts the result back into the original
//! index space:
//!
//! ```text
//! X = pinv(L, n)
//! X[n, :] = X[:, n] = 0
//! X[i, j] = (L without row/col n)⁻¹[i', j']   for i, j != n
//! ```
//!
//! `X` maps nodal injections (with the reference node absorbing the
//! balance) to nodal potentials, which is what PTDFs and effective
//! resistances are built from.
//!
//! Two paths are provided. [`pinv`] factors the reduced matrix densely with
//! partial-pivoting LU. [`pinv_sparse`] keeps the reduced matrix sparse and
//! runs one BiCG solve per column, which avoids the dense factorization for
//! large, very sparse Laplacians. Both strike the same row and column and
//! agree up to the solver tolerance.

use crate::error::{check_square_index, LinalgError, LinalgResult};
use crate::krylov::{bicg, ConvergencePolicy, KrylovConfig, SolveResult};
use crate::matrix::Matrix;
use crate::strike::{strike_out_dense, strike_out_sparse, StrikeMap};
use faer::{prelude::*, solvers::PartialPivLu, Mat};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use sprs::CsMat;
use tracing::{debug, warn};

/// Which algorithm computes the reduced inverse.
#[derive(Debug, Clone, PartialEq)]
pub enum PinvMethod {
    /// Dense LU inverse
    Dense,
    /// Per-column BiCG solves on the sparse reduced matrix
    Sparse(KrylovConfig),
}

/// Dense strike-out pseudo-inverse of a square matrix.
///
/// Fails with [`LinalgError::NotSquare`] / [`LinalgError::IndexOutOfRange`]
/// on bad arguments and with [`LinalgError::Singular`] when the reduced
/// matrix cannot be inverted.
pub fn pinv(l: &Mat<f64>, n: usize) -> LinalgResult<Mat<f64>> {
    let size = check_square_index((l.nrows(), l.ncols()), n)?;
    let map = StrikeMap::new(size, n)?;
    let reduced = strike_out_dense(l, n)?;
    debug!(size, strike = n, "dense strike-out inverse");
    let inverse = invert(&reduced)?;
    Ok(map.embed(&inverse))
}

/// Strike-out pseudo-inverse of any matrix variant with the chosen method.
///
/// Dense input always takes the dense path; sparse input is densified for
/// [`PinvMethod::Dense`].
pub fn pinv_matrix(l: &Matrix, n: usize, method: &PinvMethod) -> LinalgResult<Mat<f64>> {
    match (l, method) {
        (Matrix::Csr(s) | Matrix::Csc(s), PinvMethod::Sparse(config)) => pinv_sparse(s, n, config),
        (Matrix::Dense(d), _) => pinv(d, n),
        (sparse, PinvMethod::Dense) => pinv(&sparse.to_dense(), n),
    }
}

/// Sparse strike-out pseudo-inverse.
///
/// Solves `L_r · x = e_r` with BiCG for every column `r` of the reduced
/// matrix `L_r`. Under [`ConvergencePolicy::Strict`] the first column (in
/// original index order) that misses the tolerance fails the call with
/// [`LinalgError::Convergence`]; under [`ConvergencePolicy::Lenient`] the
/// last iterate is kept and a warning is logged.
///
/// With the `parallel` feature the columns are solved concurrently; the
/// result and the reported error are the same as a sequential run.
pub fn pinv_sparse(l: &CsMat<f64>, n: usize, config: &KrylovConfig) -> LinalgResult<Mat<f64>> {
    let size = check_square_index(l.shape(), n)?;
    let map = StrikeMap::new(size, n)?;
    let reduced = strike_out_sparse(l, n)?;
    let k = map.reduced_size();
    debug!(
        size,
        strike = n,
        nnz = reduced.nnz(),
        tolerance = config.tolerance,
        "sparse strike-out inverse"
    );

    let solve_column = |r: usize| -> SolveResult {
        let mut e = vec![0.0; k];
        e[r] = 1.0;
        bicg(&reduced, &e, config)
    };

    #[cfg(feature = "parallel")]
    let solves: Vec<SolveResult> = (0..k).into_par_iter().map(solve_column).collect();
    #[cfg(not(feature = "parallel"))]
    let solves: Vec<SolveResult> = (0..k).map(solve_column).collect();

    let mut columns = Vec::with_capacity(k);
    for (r, solve) in solves.into_iter().enumerate() {
        if !solve.converged {
            let column = map.lift(r);
            match config.policy {
                ConvergencePolicy::Strict => {
                    return Err(LinalgError::Convergence {
                        column,
                        residual: solve.residual,
                        iterations: solve.iterations,
                    })
                }
                ConvergencePolicy::Lenient => warn!(
                    column,
                    residual = solve.residual,
                    iterations = solve.iterations,
                    "column solve did not converge; keeping last iterate"
                ),
            }
        }
        columns.push(solve.x);
    }

    let inverse = Mat::from_fn(k, k, |i, j| columns[j][i]);
    Ok(map.embed(&inverse))
}

/// Dense inverse via partial-pivoting LU.
fn invert(a: &Mat<f64>) -> LinalgResult<Mat<f64>> {
    let m = a.nrows();
    if m == 0 {
        return Ok(Mat::zeros(0, 0));
    }
    let identity = Mat::from_fn(m, m, |i, j| if i == j { 1.0 } else { 0.0 });
    let lu = PartialPivLu::new(a.as_ref());
    let inverse = lu.solve(&identity);

    let finite = (0..m).all(|j| (0..m).all(|i| inverse.read(i, j).is_finite()));
    if !finite {
        debug!(size = m, "dense inverse has non-finite entries");
        return Err(LinalgError::Singular);
    }
    Ok(inverse)
}
