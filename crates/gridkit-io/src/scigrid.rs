//! SciGRID transmission network import.
//!
//! SciGRID publishes a network as two `;`-delimited CSV files:
//!
//! - **vertices**: `v_id;lon;lat;typ;voltage;frequency;name;operator;...`
//! - **links**: `l_id;v_id_1;v_id_2;voltage;cables;wires;frequency;name;operator;ref;length_m;r;x;c;i_th_max;from_relation;geom`
//!
//! Voltages are given in volts and lengths in metres. About a third of the
//! links lack impedance data although `x / length_m` is constant within a
//! voltage level, so the missing reactances are filled from the preceding
//! link of the same voltage.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use gridkit_core::{Bus, BusId, CircuitData, Kilometers, Kilovolts, Line, LineId, Network};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct VertexRecord {
    v_id: usize,
    lon: f64,
    lat: f64,
    #[serde(default)]
    typ: Option<String>,
    #[serde(default)]
    voltage: Option<String>,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    operator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
    l_id: usize,
    v_id_1: usize,
    v_id_2: usize,
    #[serde(default)]
    voltage: Option<f64>,
    #[serde(default)]
    cables: Option<f64>,
    #[serde(default)]
    wires: Option<f64>,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    length_m: Option<f64>,
    #[serde(default)]
    r: Option<f64>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    c: Option<f64>,
    #[serde(default)]
    i_th_max: Option<f64>,
    #[serde(default, alias = "wkt_srid_4326")]
    geom: Option<String>,
}

/// Read a SciGRID vertices/links file pair into a [`Network`].
pub fn read_scigrid(vertices: impl AsRef<Path>, links: impl AsRef<Path>) -> Result<Network> {
    let vertices = vertices.as_ref();
    let links = links.as_ref();
    let vertex_file = std::fs::File::open(vertices)
        .with_context(|| format!("opening SciGRID vertices: {}", vertices.display()))?;
    let link_file = std::fs::File::open(links)
        .with_context(|| format!("opening SciGRID links: {}", links.display()))?;
    read_scigrid_from_readers(vertex_file, link_file)
}

/// [`read_scigrid`] over arbitrary readers.
pub fn read_scigrid_from_readers(vertices: impl Read, links: impl Read) -> Result<Network> {
    let mut network = Network::new();

    let mut rdr = scigrid_reader(vertices);
    for result in rdr.deserialize() {
        let record: VertexRecord = result.context("parsing SciGRID vertex record")?;
        let mut bus = Bus::new(BusId::new(record.v_id), record.name.unwrap_or_default())
            .with_position(record.lon, record.lat);
        bus.voltage = record.voltage.as_deref().and_then(parse_voltage_levels);
        bus.frequency = record.frequency.as_deref().and_then(first_number);
        bus.kind = record.typ;
        bus.operator = record.operator;
        network
            .add_bus(bus)
            .with_context(|| format!("adding SciGRID vertex {}", record.v_id))?;
    }

    let mut rdr = scigrid_reader(links);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: LinkRecord = result.context("parsing SciGRID link record")?;
        records.push(record);
    }

    let reactances = fill_reactances(&records);
    let mut unfilled = 0;
    for (record, reactance) in records.into_iter().zip(reactances) {
        if reactance.is_none() {
            unfilled += 1;
        }
        let line = Line {
            id: LineId::new(record.l_id),
            name: record.name.unwrap_or_default(),
            from_bus: BusId::new(record.v_id_1),
            to_bus: BusId::new(record.v_id_2),
            length: record.length_m.map(Kilometers::from_metres),
            voltage: record.voltage.map(Kilovolts::from_volts),
            reactance,
            susceptance: reactance.map(|x| 1.0 / x),
            circuit: CircuitData {
                cables: record.cables,
                wires: record.wires,
                frequency: record.frequency,
                r: record.r,
                x: record.x,
                c: record.c,
                i_th_max: record.i_th_max,
                geometry: record.geom,
            },
            ..Line::default()
        };
        network
            .add_line(line)
            .with_context(|| format!("adding SciGRID link {}", record.l_id))?;
    }

    if unfilled > 0 {
        warn!(
            lines = unfilled,
            "no reactance available for some SciGRID links; they carry no susceptance"
        );
    }
    debug!(
        buses = network.bus_count(),
        lines = network.line_count(),
        "read SciGRID network"
    );
    Ok(network)
}

fn scigrid_reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

/// Effective reactance per link in file order.
///
/// The per-metre reactance `x / length_m` is carried forward within each
/// voltage level and scaled back by the link's own length. Links without a
/// voltage are never filled from others.
fn fill_reactances(records: &[LinkRecord]) -> Vec<Option<f64>> {
    let mut last_ratio: HashMap<u64, f64> = HashMap::new();
    records
        .iter()
        .map(|record| {
            let own = match (record.x, record.length_m) {
                (Some(x), Some(len)) if len != 0.0 && (x / len).is_finite() => Some(x / len),
                _ => None,
            };
            let group = record.voltage.map(f64::to_bits);
            let ratio = match (own, group) {
                (Some(ratio), Some(key)) => {
                    last_ratio.insert(key, ratio);
                    Some(ratio)
                }
                (Some(ratio), None) => Some(ratio),
                (None, Some(key)) => last_ratio.get(&key).copied(),
                (None, None) => None,
            };
            Some(ratio? * record.length_m?)
        })
        .collect()
}

/// Highest voltage level in a SciGRID voltage cell such as `220000;380000`.
fn parse_voltage_levels(raw: &str) -> Option<Kilovolts> {
    raw.split([';', ','])
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .map(Kilovolts::from_volts)
        .reduce(Kilovolts::max)
}

fn first_number(raw: &str) -> Option<f64> {
    raw.split([';', ','])
        .find_map(|part| part.trim().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTICES: &str = "\
v_id;lon;lat;typ;voltage;frequency;name;operator
1;10.0;50.0;substation;380000;50;Alpha;TSO
2;10.5;50.0;substation;\"220000;380000\";50;Beta;TSO
3;11.0;50.5;joint;220000;50;;
";

    const LINKS: &str = "\
l_id;v_id_1;v_id_2;voltage;cables;wires;frequency;name;operator;ref;length_m;r;x;c;i_th_max;from_relation;geom
10;1;2;380000;3;4;50;L1;TSO;;10000;0.3;2.5;14;2000;;
11;2;3;220000;3;2;50;L2;TSO;;5000;;4.0;;;;
12;1;3;380000;3;4;50;L3;TSO;;20000;;;;;;
13;2;3;220000;3;2;50;L4;TSO;;2500;;;;;;
";

    fn network() -> Network {
        read_scigrid_from_readers(VERTICES.as_bytes(), LINKS.as_bytes()).unwrap()
    }

    fn line(network: &Network, id: usize) -> &Line {
        network
            .lines()
            .find(|line| line.id == LineId::new(id))
            .unwrap()
    }

    #[test]
    fn test_buses_and_positions() {
        let network = network();
        assert_eq!(network.bus_count(), 3);
        let beta = network.bus(BusId::new(2)).unwrap();
        assert_eq!(beta.name, "Beta");
        assert_eq!(beta.voltage, Some(Kilovolts(380.0)));
        let pos = beta.position.unwrap();
        assert_eq!(pos.lon.value(), 10.5);
        assert_eq!(network.bus(BusId::new(3)).unwrap().label(), "Bus#3");
    }

    #[test]
    fn test_units_are_converted() {
        let network = network();
        let l1 = line(&network, 10);
        assert_eq!(l1.voltage, Some(Kilovolts(380.0)));
        assert_eq!(l1.length, Some(Kilometers(10.0)));
        assert_eq!(l1.circuit.x, Some(2.5));
        assert_eq!(l1.circuit.wires, Some(4.0));
    }

    #[test]
    fn test_reactance_forward_filled_within_voltage_level() {
        let network = network();
        // 380 kV: 2.5 Ω over 10 km, so 20 km gets 5 Ω
        assert!((line(&network, 12).reactance.unwrap() - 5.0).abs() < 1e-12);
        // 220 kV: 4 Ω over 5 km, so 2.5 km gets 2 Ω
        let l4 = line(&network, 13);
        assert!((l4.reactance.unwrap() - 2.0).abs() < 1e-12);
        assert!((l4.susceptance.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_leading_gap_stays_empty() {
        let links = "\
l_id;v_id_1;v_id_2;voltage;length_m;x
20;1;2;380000;1000;
21;2;3;380000;1000;0.5
";
        let network = read_scigrid_from_readers(VERTICES.as_bytes(), links.as_bytes()).unwrap();
        assert_eq!(line(&network, 20).reactance, None);
        assert_eq!(line(&network, 20).susceptance, None);
        assert_eq!(line(&network, 21).reactance, Some(0.5));
    }

    #[test]
    fn test_unknown_vertex_is_an_error() {
        let links = "l_id;v_id_1;v_id_2\n30;1;99\n";
        let err = read_scigrid_from_readers(VERTICES.as_bytes(), links.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Bus#99"));
    }

    #[test]
    fn test_voltage_levels() {
        assert_eq!(parse_voltage_levels("110000;220000"), Some(Kilovolts(220.0)));
        assert_eq!(parse_voltage_levels("n/a"), None);
        assert_eq!(first_number("50;16.7"), Some(50.0));
    }
}
