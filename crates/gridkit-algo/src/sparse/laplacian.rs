//! Susceptance-weighted network Laplacian.
//!
//! ```text
//! L[i,j] = -Σ Y_l          over lines l joining i and j (i ≠ j)
//! L[i,i] =  Σ Y_l          over lines l incident to i
//! ```
//!
//! Rows and columns follow bus insertion order. Every row sums to zero, so
//! `L` is singular; [`crate::pinv`] with a reference bus makes it usable.

use gridkit_core::{BusId, Network};
use petgraph::visit::EdgeRef;
use sprs::{CsMat, TriMat};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LaplacianError {
    #[error("No buses found in network")]
    NoBuses,

    #[error("No in-service lines with a susceptance")]
    NoLines,

    #[error("Line {0} has a non-finite susceptance")]
    NonFiniteSusceptance(String),
}

/// Laplacian in CSR storage together with its bus ordering.
#[derive(Debug, Clone)]
pub struct NetworkLaplacian {
    matrix: CsMat<f64>,
    bus_order: Vec<BusId>,
    bus_to_idx: HashMap<BusId, usize>,
}

impl NetworkLaplacian {
    /// Build the Laplacian over in-service lines.
    ///
    /// Lines without a susceptance are skipped.
    pub fn from_network(network: &Network) -> Result<Self, LaplacianError> {
        let bus_order = network.bus_order();
        let n = bus_order.len();
        if n == 0 {
            return Err(LaplacianError::NoBuses);
        }
        let bus_to_idx: HashMap<BusId, usize> = bus_order
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut triplets = TriMat::new((n, n));
        let mut used = 0;
        for edge in network.graph.edge_references() {
            let line = edge.weight();
            if !line.status {
                continue;
            }
            let Some(y) = line.susceptance else {
                debug!(line = %line.label(), "skipping line without susceptance");
                continue;
            };
            if !y.is_finite() {
                return Err(LaplacianError::NonFiniteSusceptance(line.label()));
            }
            let i = edge.source().index();
            let j = edge.target().index();

            triplets.add_triplet(i, j, -y);
            triplets.add_triplet(j, i, -y);
            triplets.add_triplet(i, i, y);
            triplets.add_triplet(j, j, y);
            used += 1;
        }
        if used == 0 {
            return Err(LaplacianError::NoLines);
        }
        debug!(buses = n, lines = used, "built network laplacian");

        Ok(Self {
            matrix: triplets.to_csr(),
            bus_order,
            bus_to_idx,
        })
    }

    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> CsMat<f64> {
        self.matrix
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j).copied().unwrap_or(0.0)
    }

    pub fn n_bus(&self) -> usize {
        self.bus_order.len()
    }

    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// nnz / n²
    pub fn density(&self) -> f64 {
        let n = self.n_bus();
        self.nnz() as f64 / (n * n) as f64
    }

    pub fn bus_order(&self) -> &[BusId] {
        &self.bus_order
    }

    pub fn bus_index(&self, id: BusId) -> Option<usize> {
        self.bus_to_idx.get(&id).copied()
    }
}

/// Laplacian matrix and bus ordering of `network`.
pub fn laplacian(network: &Network) -> Result<(CsMat<f64>, Vec<BusId>), LaplacianError> {
    let l = NetworkLaplacian::from_network(network)?;
    Ok((l.matrix, l.bus_order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit_core::{Bus, Line, LineId};

    fn triangle() -> Network {
        let mut network = Network::new();
        for id in 1..=3 {
            network
                .add_bus(Bus::new(BusId::new(id), format!("Bus{id}")))
                .unwrap();
        }
        for (id, from, to, x) in [(1, 1, 2, 0.1), (2, 2, 3, 0.1), (3, 1, 3, 0.2)] {
            network
                .add_line(Line::new(LineId::new(id), BusId::new(from), BusId::new(to)).with_reactance(x))
                .unwrap();
        }
        network
    }

    #[test]
    fn test_laplacian_entries() {
        let l = NetworkLaplacian::from_network(&triangle()).unwrap();
        assert_eq!(l.n_bus(), 3);
        assert_eq!(l.nnz(), 9);
        assert!((l.get(0, 0) - 15.0).abs() < 1e-9);
        assert!((l.get(0, 1) + 10.0).abs() < 1e-9);
        assert!((l.get(0, 2) + 5.0).abs() < 1e-9);
        assert_eq!(l.bus_index(BusId::new(3)), Some(2));
    }

    #[test]
    fn test_laplacian_symmetric_rows_sum_to_zero() {
        let l = NetworkLaplacian::from_network(&triangle()).unwrap();
        for i in 0..l.n_bus() {
            let row_sum: f64 = (0..l.n_bus()).map(|j| l.get(i, j)).sum();
            assert!(row_sum.abs() < 1e-10, "row {} sums to {}", i, row_sum);
            for j in 0..l.n_bus() {
                assert!((l.get(i, j) - l.get(j, i)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_parallel_lines_accumulate() {
        let mut network = triangle();
        network
            .add_line(Line::new(LineId::new(4), BusId::new(1), BusId::new(2)).with_reactance(0.5))
            .unwrap();
        let l = NetworkLaplacian::from_network(&network).unwrap();
        assert!((l.get(0, 1) + 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_skips_lines_without_susceptance_and_out_of_service() {
        let mut network = triangle();
        for line in network.lines_mut() {
            if line.id == LineId::new(2) {
                line.susceptance = None;
            }
            if line.id == LineId::new(3) {
                line.status = false;
            }
        }
        let (matrix, order) = laplacian(&network).unwrap();
        assert_eq!(order, vec![BusId::new(1), BusId::new(2), BusId::new(3)]);
        assert_eq!(matrix.get(1, 2), None);
        assert_eq!(matrix.get(2, 2), None);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            NetworkLaplacian::from_network(&Network::new()).unwrap_err(),
            LaplacianError::NoBuses
        );
        let mut lonely = Network::new();
        lonely.add_bus(Bus::new(BusId::new(1), "")).unwrap();
        assert_eq!(
            NetworkLaplacian::from_network(&lonely).unwrap_err(),
            LaplacianError::NoLines
        );
    }
}
