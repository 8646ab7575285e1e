//! SciGRID files through to a strike-out inverse.

use gridkit_algo::{laplacian, pinv, Matrix};
use gridkit_core::grid::{extend_line_attributes, SPECIFIC_SUSCEPTANCE};
use gridkit_core::{graph_stats, BusId};
use gridkit_io::{read_matrix, read_scigrid, write_matrix};
use std::fs;
use tempfile::tempdir;

const VERTICES: &str = "\
v_id;lon;lat;typ;voltage;frequency;name;operator
1;10.0;50.0;substation;380000;50;North;TSO
2;10.2;50.0;substation;380000;50;East;TSO
3;10.0;49.8;substation;220000;50;South;TSO
4;9.8;50.0;substation;220000;50;West;TSO
";

const LINKS: &str = "\
l_id;v_id_1;v_id_2;voltage;length_m;x
1;1;2;380000;14000;3.5
2;2;3;220000;20000;8.0
3;3;4;220000;18000;
4;4;1;380000;;
";

#[test]
fn scigrid_network_to_laplacian_inverse() {
    let dir = tempdir().unwrap();
    let vertices = dir.path().join("vertices.csv");
    let links = dir.path().join("links.csv");
    fs::write(&vertices, VERTICES).unwrap();
    fs::write(&links, LINKS).unwrap();

    let mut network = read_scigrid(&vertices, &links).unwrap();
    let stats = graph_stats(&network);
    assert_eq!(stats.node_count, 4);
    assert_eq!(stats.edge_count, 4);
    assert_eq!(stats.connected_components, 1);

    // link 4 has neither length nor reactance until extended
    assert!(network.lines().any(|line| line.susceptance.is_none()));
    extend_line_attributes(&mut network).unwrap();
    let ring_closer = network
        .lines()
        .find(|line| line.from_bus == BusId::new(4))
        .and_then(|line| if line.to_bus == BusId::new(1) { Some(line) } else { None })
        .unwrap();
    let expected_x = SPECIFIC_SUSCEPTANCE * 110.0 * 0.2;
    assert!((ring_closer.reactance.unwrap() - expected_x).abs() < 1e-9);

    let (l, order) = laplacian(&network).unwrap();
    assert_eq!(order.len(), 4);
    let dense = Matrix::from(l).to_dense();
    let x = pinv(&dense, 0).unwrap();

    let out = dir.path().join("pinv.csv");
    write_matrix(&out, &x).unwrap();
    let back = read_matrix(&out).unwrap();
    for i in 0..4 {
        assert_eq!(back.read(0, i), 0.0);
        assert_eq!(back.read(i, 0), 0.0);
        for j in 0..4 {
            assert_eq!(back.read(i, j), x.read(i, j));
        }
    }
}
