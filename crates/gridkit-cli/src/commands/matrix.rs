use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use gridkit_algo::{
    interpolate, negative, pinv_matrix, positive, ConvergencePolicy, KrylovConfig, Matrix,
    PinvMethod,
};
use gridkit_cli::cli::{MethodArg, SignArg};
use gridkit_io::read_matrix;
use tracing::info;

use super::util::emit_matrix;

/// Solver overrides given on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverOverrides {
    pub tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
    pub policy: Option<ConvergencePolicy>,
}

impl SolverOverrides {
    pub fn apply(self, mut base: KrylovConfig) -> KrylovConfig {
        if let Some(tolerance) = self.tolerance {
            base = base.with_tolerance(tolerance);
        }
        if let Some(max_iterations) = self.max_iterations {
            base = base.with_max_iterations(max_iterations);
        }
        if let Some(policy) = self.policy {
            base = base.with_policy(policy);
        }
        base
    }
}

pub fn pinv_method(method: MethodArg, solver: KrylovConfig) -> PinvMethod {
    match method {
        MethodArg::Dense => PinvMethod::Dense,
        MethodArg::Sparse => PinvMethod::Sparse(solver),
    }
}

pub fn handle_pinv(
    input: &Path,
    strike: usize,
    method: PinvMethod,
    out: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let dense = read_matrix(input)?;
    let matrix = match method {
        PinvMethod::Dense => Matrix::Dense(dense),
        PinvMethod::Sparse(_) => Matrix::Dense(dense).to_csr(),
    };
    info!(
        shape = ?matrix.shape(),
        nnz = matrix.nnz(),
        strike,
        "computing strike-out pseudo-inverse"
    );
    let x = pinv_matrix(&matrix, strike, &method)
        .with_context(|| format!("pseudo-inverse of {}", input.display()))?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "pseudo-inverse done");
    emit_matrix(&x, out)
}

pub fn handle_split(input: &Path, sign: SignArg, sparse: bool, out: Option<&Path>) -> Result<()> {
    let dense = Matrix::Dense(read_matrix(input)?);
    let matrix = if sparse { dense.to_csr() } else { dense };
    let part = match sign {
        SignArg::Positive => positive(&matrix),
        SignArg::Negative => negative(&matrix),
    };
    info!(sign = ?sign, sparse, nnz = part.nnz(), "split matrix");
    emit_matrix(&part.to_dense(), out)
}

pub fn handle_interpolate(input: &Path, axis: usize, out: Option<&Path>) -> Result<()> {
    let m = read_matrix(input)?;
    let filled =
        interpolate(&m, axis).with_context(|| format!("interpolating {}", input.display()))?;
    emit_matrix(&filled, out)
}
