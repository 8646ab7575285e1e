//! Rules of thumb for filling in electrical attributes of transmission lines.
//!
//! Public grid datasets usually ship topology and geography but leave
//! impedances, capacities and even lengths incomplete. The helpers here
//! complete a [`Network`] in place so that a Laplacian can be built from
//! line susceptances.

use crate::{BusId, EdgeIndex, GridError, GridResult, Kilometers, Kilovolts, Line, LineId, Network};
use crate::units::Gigawatts;
use tracing::debug;

/// Mean reactance per kilometre (X / length) of the Bialek European network.
pub const SPECIFIC_SUSCEPTANCE: f64 = 0.00068768296005101493;

/// Kilometres per degree used by [`node_distance`].
pub const KM_PER_DEGREE: f64 = 110.0;

/// Circuits assumed per line when assigning capacities.
pub const CIRCUITS_PER_LINE: f64 = 2.0;

/// The 380 kV link between buses 788 and 782 missing from the ENTSO-E 2009
/// dataset.
pub const ENTSOE_MISSING_LINK: (BusId, BusId) = (BusId(788), BusId(782));

/// Aggregate capacity of `n` parallel cross-border lines with total
/// capacity `x`.
///
/// Parallel lines rarely load evenly, so the usable share drops with the
/// number of lines: all of it for one line, 5/6 for two, 4/6 for three and
/// half for four or more.
pub fn penalize(x: f64, n: usize) -> GridResult<f64> {
    match n {
        0 => Err(GridError::InvalidArgument(
            "number of lines must be at least 1".into(),
        )),
        1 => Ok(x),
        2 => Ok(5.0 / 6.0 * x),
        3 => Ok(4.0 / 6.0 * x),
        _ => Ok(0.5 * x),
    }
}

/// Distance between two buses, scaled to agree with the `length` attribute
/// of the Bialek grid: `110 · ‖pos_a − pos_b‖`.
pub fn node_distance(network: &Network, a: BusId, b: BusId) -> GridResult<Kilometers> {
    let pos = |id: BusId| {
        network
            .bus(id)
            .ok_or_else(|| GridError::Network(format!("unknown bus {id}")))?
            .position
            .ok_or_else(|| GridError::Network(format!("{id} has no position")))
    };
    let (pa, pb) = (pos(a)?, pos(b)?);
    let dlon = pa.lon.value() - pb.lon.value();
    let dlat = pa.lat.value() - pb.lat.value();
    Ok(Kilometers(KM_PER_DEGREE * (dlon * dlon + dlat * dlat).sqrt()))
}

/// Fill missing line attributes without touching values already present:
///
/// - `length` from [`node_distance`] of the endpoints
/// - `voltage` 380 kV
/// - `X = SPECIFIC_SUSCEPTANCE · length`
/// - `Y = 1 / X`
pub fn extend_line_attributes(network: &mut Network) -> GridResult<()> {
    let edges: Vec<EdgeIndex> = network.graph.edge_indices().collect();
    let mut filled = 0usize;
    for edge in edges {
        let length = match network.graph[edge].length {
            Some(length) => length,
            None => {
                let line = &network.graph[edge];
                node_distance(network, line.from_bus, line.to_bus)?
            }
        };
        let line = &mut network.graph[edge];
        if line.length.is_none() || line.reactance.is_none() {
            filled += 1;
        }
        let length = *line.length.get_or_insert(length);
        line.voltage.get_or_insert(Kilovolts::EHV_380);
        let x = *line
            .reactance
            .get_or_insert(SPECIFIC_SUSCEPTANCE * length.value());
        line.susceptance.get_or_insert(1.0 / x);
    }
    debug!(filled, lines = network.line_count(), "extended line attributes");
    Ok(())
}

/// Assign line voltages and thermal capacities.
///
/// Every line is assumed to have [`CIRCUITS_PER_LINE`] circuits and to run
/// at the higher voltage of its endpoints (380 kV where a bus has none).
/// A 380 kV circuit carries 1.5 GW, anything else 0.5 GW.
pub fn assign_line_capacities(network: &mut Network) {
    let edges: Vec<EdgeIndex> = network.graph.edge_indices().collect();
    for edge in edges {
        let voltage = match network.graph.edge_endpoints(edge) {
            Some((a, b)) => bus_voltage(network, a).max(bus_voltage(network, b)),
            None => continue,
        };
        let per_circuit = if (voltage.value() - Kilovolts::EHV_380.value()).abs() < 1e-9 {
            1.5
        } else {
            0.5
        };
        let line = &mut network.graph[edge];
        line.voltage = Some(voltage);
        line.capacity = Some(Gigawatts(CIRCUITS_PER_LINE * per_circuit));
    }
}

fn bus_voltage(network: &Network, idx: crate::NodeIndex) -> Kilovolts {
    network.graph[idx].voltage.unwrap_or(Kilovolts::EHV_380)
}

/// Add a 380 kV, 3 GW link between two buses with reactance derived from
/// their geographic distance.
pub fn add_manual_link(
    network: &mut Network,
    id: LineId,
    from: BusId,
    to: BusId,
) -> GridResult<EdgeIndex> {
    let length = node_distance(network, from, to)?;
    let mut line = Line::new(id, from, to)
        .with_reactance(SPECIFIC_SUSCEPTANCE * length.value())
        .with_voltage(Kilovolts::EHV_380.value());
    line.length = Some(length);
    line.capacity = Some(Gigawatts(3.0));
    line.limit = Some(0.0);
    network.add_line(line)
}
