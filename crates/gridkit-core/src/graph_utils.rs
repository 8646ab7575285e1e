use crate::Network;
use petgraph::algo::connected_components;
use std::collections::{HashSet, VecDeque};

/// Topology summary of a network (degree distribution, density, components).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandSummary {
    pub island_id: usize,
    pub node_count: usize,
}

/// Island membership of a single bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAssignment {
    pub node_index: usize,
    pub label: String,
    pub island_id: usize,
}

#[derive(Debug, Clone)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
    pub assignments: Vec<NodeAssignment>,
}

pub fn graph_stats(network: &Network) -> GraphStats {
    let node_count = network.graph.node_count();
    let edge_count = network.graph.edge_count();
    let degrees: Vec<usize> = network
        .graph
        .node_indices()
        .map(|node| network.graph.edges(node).count())
        .collect();
    let min_degree = degrees.iter().copied().min().unwrap_or(0);
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };
    let density = if node_count < 2 {
        0.0
    } else {
        2.0 * edge_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
    };
    GraphStats {
        node_count,
        edge_count,
        connected_components: connected_components(&network.graph),
        min_degree,
        avg_degree,
        max_degree,
        density,
    }
}

/// Label connected components by breadth-first search.
///
/// A Laplacian strike-out inverse is only meaningful on a single island, so
/// callers use this to pick a reference bus per component.
pub fn find_islands(network: &Network) -> IslandAnalysis {
    let mut visited = HashSet::new();
    let mut islands = Vec::new();
    let mut assignments = Vec::new();
    let mut island_id = 0;
    for start in network.graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        let mut members = Vec::new();
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            members.push(node);
            queue.extend(
                network
                    .graph
                    .neighbors(node)
                    .filter(|neighbor| !visited.contains(neighbor)),
            );
        }
        islands.push(IslandSummary {
            island_id,
            node_count: members.len(),
        });
        assignments.extend(members.into_iter().map(|node| NodeAssignment {
            node_index: node.index(),
            label: network.graph[node].label(),
            island_id,
        }));
        island_id += 1;
    }
    assignments.sort_by_key(|assignment| assignment.node_index);
    IslandAnalysis {
        islands,
        assignments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bus, BusId, Line, LineId};

    fn network_with_islands() -> Network {
        let mut network = Network::new();
        for id in 1..=5 {
            network.add_bus(Bus::new(BusId::new(id), "")).unwrap();
        }
        for (lid, (a, b)) in [(1, 2), (2, 3), (4, 5)].into_iter().enumerate() {
            network
                .add_line(Line::new(LineId::new(lid), BusId::new(a), BusId::new(b)))
                .unwrap();
        }
        network
    }

    #[test]
    fn test_graph_stats() {
        let stats = graph_stats(&network_with_islands());
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.connected_components, 2);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 2);
        assert!((stats.avg_degree - 1.2).abs() < 1e-12);
        assert!((stats.density - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_find_islands() {
        let analysis = find_islands(&network_with_islands());
        assert_eq!(analysis.islands.len(), 2);
        assert_eq!(analysis.islands[0].node_count, 3);
        assert_eq!(analysis.islands[1].node_count, 2);
        assert_eq!(analysis.assignments[3].island_id, 1);
        assert_eq!(analysis.assignments[0].label, "Bus#1");
    }

    #[test]
    fn test_empty_network() {
        let stats = graph_stats(&Network::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.density, 0.0);
        assert!(find_islands(&Network::new()).islands.is_empty());
    }
}
