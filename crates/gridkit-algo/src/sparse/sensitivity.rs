//! Power transfer distribution factors.
//!
//! PTDF[l,v] is the flow on line `l` (from bus `i` to bus `j`) caused by a
//! unit injection at bus `v` that is withdrawn at the slack bus:
//! ```text
//! X          = pinv(L, slack)
//! PTDF[l, v] = Y_l · (X[i, v] - X[j, v])
//! ```
//! The slack column is zero by construction.

use super::laplacian::{LaplacianError, NetworkLaplacian};
use crate::error::LinalgError;
use crate::matrix::Matrix;
use crate::pinv::{pinv, pinv_sparse, PinvMethod};
use gridkit_core::{BusId, LineId, Network};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SensitivityError {
    #[error("Laplacian error: {0}")]
    Laplacian(#[from] LaplacianError),

    #[error("Strike-out inverse failed: {0}")]
    Inverse(#[from] LinalgError),

    #[error("Slack bus {0} not found")]
    UnknownSlack(BusId),
}

/// Dense PTDF matrix, one row per line and one column per bus.
#[derive(Debug, Clone)]
pub struct PtdfMatrix {
    /// Row index → line id
    pub line_ids: Vec<LineId>,
    /// Column index → bus id
    pub bus_ids: Vec<BusId>,
    /// ptdf[line_idx][bus_idx]
    pub values: Vec<Vec<f64>>,
    line_to_idx: HashMap<LineId, usize>,
    bus_to_idx: HashMap<BusId, usize>,
}

impl PtdfMatrix {
    pub fn get(&self, line: LineId, bus: BusId) -> Option<f64> {
        let l = self.line_to_idx.get(&line)?;
        let b = self.bus_to_idx.get(&bus)?;
        Some(self.values[*l][*b])
    }

    pub fn num_lines(&self) -> usize {
        self.line_ids.len()
    }

    pub fn num_buses(&self) -> usize {
        self.bus_ids.len()
    }
}

/// PTDF of every in-service line with a susceptance, using the dense
/// strike-out inverse.
pub fn compute_ptdf(network: &Network, slack: BusId) -> Result<PtdfMatrix, SensitivityError> {
    compute_ptdf_with(network, slack, &PinvMethod::Dense)
}

/// [`compute_ptdf`] with an explicit inverse method.
pub fn compute_ptdf_with(
    network: &Network,
    slack: BusId,
    method: &PinvMethod,
) -> Result<PtdfMatrix, SensitivityError> {
    let laplacian = NetworkLaplacian::from_network(network)?;
    let slack_idx = laplacian
        .bus_index(slack)
        .ok_or(SensitivityError::UnknownSlack(slack))?;

    let x = match method {
        PinvMethod::Dense => pinv(&Matrix::from(laplacian.matrix().clone()).to_dense(), slack_idx)?,
        PinvMethod::Sparse(config) => pinv_sparse(laplacian.matrix(), slack_idx, config)?,
    };

    let mut lines: Vec<(LineId, usize, usize, f64)> = network
        .lines()
        .filter(|line| line.status)
        .filter_map(|line| {
            let y = line.susceptance?;
            let i = laplacian.bus_index(line.from_bus)?;
            let j = laplacian.bus_index(line.to_bus)?;
            Some((line.id, i, j, y))
        })
        .collect();
    lines.sort_by_key(|line| line.0);

    let n_bus = laplacian.n_bus();
    let values: Vec<Vec<f64>> = lines
        .iter()
        .map(|&(_, i, j, y)| (0..n_bus).map(|v| y * (x.read(i, v) - x.read(j, v))).collect())
        .collect();
    debug!(lines = lines.len(), buses = n_bus, slack = %slack, "computed PTDF");

    let line_ids: Vec<LineId> = lines.iter().map(|line| line.0).collect();
    let bus_ids = laplacian.bus_order().to_vec();
    let line_to_idx = line_ids.iter().enumerate().map(|(k, &id)| (id, k)).collect();
    let bus_to_idx = bus_ids.iter().enumerate().map(|(k, &id)| (id, k)).collect();

    Ok(PtdfMatrix {
        line_ids,
        bus_ids,
        values,
        line_to_idx,
        bus_to_idx,
    })
}
