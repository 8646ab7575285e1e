//! Bi-conjugate gradient (BiCG) solver for non-symmetric sparse systems.
//!
//! BiCG runs two coupled CG-like recurrences, one on `A` and one on `Aᵀ`,
//! so it only needs matrix-vector products. On symmetric positive definite
//! input (a reduced Laplacian) it reduces to conjugate gradients.
//!
//! ## References
//!
//! - **Fletcher (1976)**: "Conjugate gradient methods for indefinite systems",
//!   Lecture Notes in Mathematics 506, 73-89.
//! - **Barrett et al. (1994)**: "Templates for the Solution of Linear Systems",
//!   SIAM, §2.3.5.

use faer::Mat;
use serde::{Deserialize, Serialize};
use sprs::CsMat;

/// Square linear operator exposing `A·x` and `Aᵀ·x`.
pub trait LinearOperator {
    fn dim(&self) -> usize;

    /// `y = A·x`
    fn apply(&self, x: &[f64], y: &mut [f64]);

    /// `y = Aᵀ·x`
    fn apply_transpose(&self, x: &[f64], y: &mut [f64]);
}

impl LinearOperator for CsMat<f64> {
    fn dim(&self) -> usize {
        self.rows()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        y.fill(0.0);
        for (&val, (i, j)) in self.iter() {
            y[i] += val * x[j];
        }
    }

    fn apply_transpose(&self, x: &[f64], y: &mut [f64]) {
        y.fill(0.0);
        for (&val, (i, j)) in self.iter() {
            y[j] += val * x[i];
        }
    }
}

impl LinearOperator for Mat<f64> {
    fn dim(&self) -> usize {
        self.nrows()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = (0..self.ncols()).map(|j| self.read(i, j) * x[j]).sum();
        }
    }

    fn apply_transpose(&self, x: &[f64], y: &mut [f64]) {
        for (j, yj) in y.iter_mut().enumerate() {
            *yj = (0..self.nrows()).map(|i| self.read(i, j) * x[i]).sum();
        }
    }
}

/// What to do when a column solve stops before reaching the tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergencePolicy {
    /// Fail the whole computation with `LinalgError::Convergence`
    #[default]
    Strict,
    /// Log a warning and keep the last iterate
    Lenient,
}

impl std::str::FromStr for ConvergencePolicy {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "strict" => Ok(ConvergencePolicy::Strict),
            "lenient" => Ok(ConvergencePolicy::Lenient),
            other => Err(format!(
                "unknown convergence policy '{other}'; supported values: strict, lenient"
            )),
        }
    }
}

/// Iterative solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KrylovConfig {
    /// Relative residual `‖b - A·x‖ / ‖b‖` at which a solve counts as converged
    pub tolerance: f64,
    /// Iteration cap per solve; `None` means ten times the system size
    pub max_iterations: Option<usize>,
    pub policy: ConvergencePolicy,
}

impl Default for KrylovConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: None,
            policy: ConvergencePolicy::Strict,
        }
    }
}

impl KrylovConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_policy(mut self, policy: ConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn iteration_cap(&self, dim: usize) -> usize {
        self.max_iterations.unwrap_or(10 * dim.max(1))
    }
}

/// Outcome of a single BiCG solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub x: Vec<f64>,
    pub iterations: usize,
    /// Final relative residual
    pub residual: f64,
    pub converged: bool,
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Solve `A·x = b` from a zero initial guess.
///
/// Stops on convergence, on the iteration cap, or on breakdown (a vanishing
/// `p̃ᵀ·A·p` or `r̃ᵀ·r`); the last two return `converged = false` with the
/// current iterate.
pub fn bicg<A: LinearOperator + ?Sized>(a: &A, b: &[f64], config: &KrylovConfig) -> SolveResult {
    let n = b.len();
    let mut x = vec![0.0; n];
    let b_norm = norm(b);
    if b_norm == 0.0 {
        return SolveResult {
            x,
            iterations: 0,
            residual: 0.0,
            converged: true,
        };
    }

    let mut r = b.to_vec();
    let mut r_shadow = r.clone();
    let mut p = r.clone();
    let mut p_shadow = r_shadow.clone();
    let mut q = vec![0.0; n];
    let mut q_shadow = vec![0.0; n];
    let mut rho = dot(&r_shadow, &r);
    let mut residual = 1.0;

    for iteration in 1..=config.iteration_cap(n) {
        a.apply(&p, &mut q);
        a.apply_transpose(&p_shadow, &mut q_shadow);

        let denom = dot(&p_shadow, &q);
        if denom == 0.0 || !denom.is_finite() {
            return SolveResult {
                x,
                iterations: iteration - 1,
                residual,
                converged: false,
            };
        }
        let alpha = rho / denom;
        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * q[i];
            r_shadow[i] -= alpha * q_shadow[i];
        }

        residual = norm(&r) / b_norm;
        if residual <= config.tolerance {
            return SolveResult {
                x,
                iterations: iteration,
                residual,
                converged: true,
            };
        }

        let rho_next = dot(&r_shadow, &r);
        if rho_next == 0.0 || !rho_next.is_finite() {
            return SolveResult {
                x,
                iterations: iteration,
                residual,
                converged: false,
            };
        }
        let beta = rho_next / rho;
        for i in 0..n {
            p[i] = r[i] + beta * p[i];
            p_shadow[i] = r_shadow[i] + beta * p_shadow[i];
        }
        rho = rho_next;
    }

    SolveResult {
        x,
        iterations: config.iteration_cap(n),
        residual,
        converged: false,
    }
}
