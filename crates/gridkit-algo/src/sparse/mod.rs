//! Network matrices built from a [`gridkit_core::Network`].
//!
//! - [`laplacian`]: susceptance-weighted graph Laplacian in CSR storage
//! - [`sensitivity`]: PTDF matrix from the strike-out inverse of the Laplacian
//!
//! ```ignore
//! use gridkit_algo::sparse::{compute_ptdf, NetworkLaplacian};
//!
//! let laplacian = NetworkLaplacian::from_network(&network)?;
//! println!("{} buses, {:.4}% dense", laplacian.n_bus(), laplacian.density() * 100.0);
//!
//! let ptdf = compute_ptdf(&network, slack)?;
//! ```

pub mod laplacian;
pub mod sensitivity;

pub use laplacian::{laplacian, LaplacianError, NetworkLaplacian};
pub use sensitivity::{compute_ptdf, compute_ptdf_with, PtdfMatrix, SensitivityError};
