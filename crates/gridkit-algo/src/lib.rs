//! # gridkit-algo: Matrix Routines for Network Analysis
//!
//! Numerical building blocks for working with network Laplacians and the
//! time series that drive them.
//!
//! ## Strike-out pseudo-inverse
//!
//! | Function | Storage | Method |
//! |----------|---------|--------|
//! | [`pinv`] | dense | LU inverse of the reduced matrix |
//! | [`pinv_sparse`] | CSR / CSC | one BiCG solve per column ([`krylov`]) |
//! | [`pinv_matrix`] | any [`Matrix`] | dispatch on [`PinvMethod`] |
//!
//! Both methods delete row and column `n`, invert, and re-embed the result
//! with zeros at `n` (see [`StrikeMap`]).
//!
//! ## Elementwise and structural helpers
//!
//! - [`positive`] / [`negative`]: sign split that keeps storage format
//! - [`spdiag`]: sparse diagonal matrices
//! - [`interpolate`]: linear NaN gap filling along an axis
//! - [`compact_indices`]: narrow sparse indices to `u32`
//!
//! ## Network matrices
//!
//! [`sparse`] builds the susceptance Laplacian of a
//! [`gridkit_core::Network`] and the PTDF matrix derived from it.
//!
//! ## Example
//!
//! ```ignore
//! use gridkit_algo::{pinv_sparse, sparse::laplacian, KrylovConfig};
//!
//! let (l, buses) = laplacian(&network)?;
//! let x = pinv_sparse(&l, 0, &KrylovConfig::default())?;
//! ```

pub mod diag;
pub mod error;
pub mod interpolate;
pub mod krylov;
pub mod matrix;
pub mod pinv;
pub mod sign;
pub mod sparse;
pub mod strike;

pub use diag::spdiag;
pub use error::{LinalgError, LinalgResult};
pub use interpolate::{interpolate, interpolate_slice};
pub use krylov::{bicg, ConvergencePolicy, KrylovConfig, LinearOperator, SolveResult};
pub use matrix::{compact_indices, dense_from_rows, dense_to_rows, densify, CompactCsMat, Matrix};
pub use pinv::{pinv, pinv_matrix, pinv_sparse, PinvMethod};
pub use sign::{negative, positive};
pub use sparse::{
    compute_ptdf, compute_ptdf_with, laplacian, LaplacianError, NetworkLaplacian, PtdfMatrix,
    SensitivityError,
};
pub use strike::{strike_column, strike_out_dense, strike_out_sparse, StrikeMap};
