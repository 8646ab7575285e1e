//! # gridkit-core: transmission network model
//!
//! Networks are modeled as **undirected multigraphs** where nodes are
//! buses (substations, joints) and edges are transmission lines. Parallel
//! lines between the same pair of buses are separate edges.
//!
//! Bus and line attributes follow what public grid datasets carry: a
//! geographic position and voltage level on buses; length, voltage,
//! reactance `X`, susceptance `Y = 1/X` and thermal capacity on lines. Most
//! attributes are optional because source data routinely omits them; the
//! heuristics in [`grid`] fill them in.
//!
//! ```rust
//! use gridkit_core::*;
//!
//! let mut network = Network::new();
//! network.add_bus(Bus::new(BusId::new(1), "North").with_position(10.0, 52.0)).unwrap();
//! network.add_bus(Bus::new(BusId::new(2), "South").with_position(10.0, 51.0)).unwrap();
//! network
//!     .add_line(Line::new(LineId::new(1), BusId::new(1), BusId::new(2)))
//!     .unwrap();
//!
//! grid::extend_line_attributes(&mut network).unwrap();
//! let line = network.lines().next().unwrap();
//! assert_eq!(line.voltage, Some(Kilovolts(380.0)));
//! ```
//!
//! ## Modules
//!
//! - [`grid`] - capacity rules of thumb and attribute heuristics
//! - [`graph_utils`] - topology statistics and island detection
//! - [`units`] - unit newtypes

use petgraph::{prelude::*, Undirected};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod error;
pub mod graph_utils;
pub mod grid;
pub mod units;

pub use error::{GridError, GridResult};
pub use graph_utils::*;
pub use petgraph::graph::{EdgeIndex, NodeIndex};
pub use units::{Degrees, Gigawatts, Kilometers, Kilovolts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(usize);
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(usize);

impl BusId {
    #[inline]
    pub fn new(value: usize) -> Self {
        BusId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl LineId {
    #[inline]
    pub fn new(value: usize) -> Self {
        LineId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bus#{}", self.0)
    }
}

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line#{}", self.0)
    }
}

/// Geographic position of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub lon: Degrees,
    pub lat: Degrees,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: Degrees(lon),
            lat: Degrees(lat),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    pub position: Option<Position>,
    /// Nominal voltage level
    pub voltage: Option<Kilovolts>,
    /// Substation type as reported by the source (e.g. "substation", "joint")
    pub kind: Option<String>,
    pub frequency: Option<f64>,
    pub operator: Option<String>,
}

impl Bus {
    pub fn new(id: BusId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, lon: f64, lat: f64) -> Self {
        self.position = Some(Position::new(lon, lat));
        self
    }

    pub fn with_voltage(mut self, kv: f64) -> Self {
        self.voltage = Some(Kilovolts(kv));
        self
    }

    /// Display label: the bus name, or its id when unnamed.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }
}

/// Raw per-circuit data carried through from the source dataset.
#[derive(Debug, Clone, Default)]
pub struct CircuitData {
    pub cables: Option<f64>,
    pub wires: Option<f64>,
    pub frequency: Option<f64>,
    /// Series resistance (Ω)
    pub r: Option<f64>,
    /// Series reactance (Ω)
    pub x: Option<f64>,
    /// Capacitance (nF)
    pub c: Option<f64>,
    /// Thermal current limit (A)
    pub i_th_max: Option<f64>,
    /// WKT line geometry
    pub geometry: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub from_bus: BusId,
    pub to_bus: BusId,
    pub length: Option<Kilometers>,
    pub voltage: Option<Kilovolts>,
    /// Thermal transfer capacity
    pub capacity: Option<Gigawatts>,
    /// Effective reactance `X`
    pub reactance: Option<f64>,
    /// Effective susceptance `Y = 1/X`, the Laplacian edge weight
    pub susceptance: Option<f64>,
    pub limit: Option<f64>,
    pub circuit: CircuitData,
    /// Operational status flag
    pub status: bool,
}

impl Default for Line {
    fn default() -> Self {
        Self {
            id: LineId(0),
            name: String::new(),
            from_bus: BusId(0),
            to_bus: BusId(0),
            length: None,
            voltage: None,
            capacity: None,
            reactance: None,
            susceptance: None,
            limit: None,
            circuit: CircuitData::default(),
            status: true,
        }
    }
}

impl Line {
    pub fn new(id: LineId, from_bus: BusId, to_bus: BusId) -> Self {
        Self {
            id,
            from_bus,
            to_bus,
            ..Self::default()
        }
    }

    /// Set `X` and derive `Y = 1/X`.
    pub fn with_reactance(mut self, x: f64) -> Self {
        self.reactance = Some(x);
        self.susceptance = Some(1.0 / x);
        self
    }

    pub fn with_length(mut self, km: f64) -> Self {
        self.length = Some(Kilometers(km));
        self
    }

    pub fn with_voltage(mut self, kv: f64) -> Self {
        self.voltage = Some(Kilovolts(kv));
        self
    }

    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }
}

/// Transmission network: an undirected multigraph of buses and lines that
/// keeps buses in insertion order.
#[derive(Debug, Clone)]
pub struct Network {
    pub graph: Graph<Bus, Line, Undirected>,
    bus_index: HashMap<BusId, NodeIndex>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
            bus_index: HashMap::new(),
        }
    }

    /// Insert a bus; ids must be unique.
    pub fn add_bus(&mut self, bus: Bus) -> GridResult<NodeIndex> {
        if self.bus_index.contains_key(&bus.id) {
            return Err(GridError::Validation(format!("duplicate bus id {}", bus.id)));
        }
        let id = bus.id;
        let idx = self.graph.add_node(bus);
        self.bus_index.insert(id, idx);
        Ok(idx)
    }

    /// Insert a line between two existing buses.
    pub fn add_line(&mut self, line: Line) -> GridResult<EdgeIndex> {
        let from = self.require_index(line.from_bus)?;
        let to = self.require_index(line.to_bus)?;
        Ok(self.graph.add_edge(from, to, line))
    }

    pub fn node_index(&self, id: BusId) -> Option<NodeIndex> {
        self.bus_index.get(&id).copied()
    }

    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.node_index(id).map(|idx| &self.graph[idx])
    }

    fn require_index(&self, id: BusId) -> GridResult<NodeIndex> {
        self.node_index(id)
            .ok_or_else(|| GridError::Network(format!("unknown bus {id}")))
    }

    pub fn buses(&self) -> impl Iterator<Item = &Bus> + '_ {
        self.graph.node_weights()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.graph.edge_weights()
    }

    pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> + '_ {
        self.graph.edge_weights_mut()
    }

    pub fn bus_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn line_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Bus ids in matrix order (insertion order).
    pub fn bus_order(&self) -> Vec<BusId> {
        self.graph.node_weights().map(|bus| bus.id).collect()
    }
}
