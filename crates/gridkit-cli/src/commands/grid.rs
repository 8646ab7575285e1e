use std::io::{self, Write};

use anyhow::{Context, Result};
use faer::Mat;
use gridkit_algo::sparse::compute_ptdf_with;
use gridkit_algo::{laplacian, KrylovConfig, Matrix};
use gridkit_cli::cli::{GridCommands, NetworkArgs};
use gridkit_core::grid::{add_manual_link, assign_line_capacities, extend_line_attributes};
use gridkit_core::{graph_utils, BusId, LineId, Network};
use gridkit_io::read_scigrid;
use tabwriter::TabWriter;
use tracing::info;

use super::matrix::pinv_method;
use super::util::emit_matrix;

pub fn handle(command: &GridCommands, solver: &KrylovConfig) -> Result<()> {
    match command {
        GridCommands::Stats { network } => {
            let grid = load_network(network)?;
            let stats = graph_utils::graph_stats(&grid);
            println!("Graph statistics for {}:", network.links.display());
            println!("  Nodes         : {}", stats.node_count);
            println!("  Edges         : {}", stats.edge_count);
            println!("  Components    : {}", stats.connected_components);
            println!(
                "  Degree [min/avg/max]: {}/{:.2}/{}",
                stats.min_degree, stats.avg_degree, stats.max_degree
            );
            println!("  Density       : {:.4}", stats.density);
            Ok(())
        }
        GridCommands::Islands { network, emit } => {
            let grid = load_network(network)?;
            let analysis = graph_utils::find_islands(&grid);
            for summary in &analysis.islands {
                println!(
                    "Island {}: {} node(s)",
                    summary.island_id, summary.node_count
                );
            }
            if *emit {
                let mut writer = TabWriter::new(io::stdout());
                writeln!(writer, "INDEX\tBUS\tISLAND")?;
                for assignment in &analysis.assignments {
                    writeln!(
                        writer,
                        "{}\t{}\t{}",
                        assignment.node_index, assignment.label, assignment.island_id
                    )?;
                }
                writer.flush()?;
            }
            Ok(())
        }
        GridCommands::Laplacian { network, out } => {
            let grid = load_network(network)?;
            let (l, order) = laplacian(&grid).context("building Laplacian")?;
            info!(buses = order.len(), nnz = l.nnz(), "built Laplacian");
            emit_matrix(&Matrix::from(l).to_dense(), out.as_deref())
        }
        GridCommands::Ptdf {
            network,
            slack,
            method,
            out,
        } => {
            let grid = load_network(network)?;
            let method = pinv_method(*method, solver.clone());
            let ptdf = compute_ptdf_with(&grid, BusId::new(*slack), &method)
                .context("computing PTDF")?;
            let values = Mat::from_fn(ptdf.num_lines(), ptdf.num_buses(), |l, b| {
                ptdf.values[l][b]
            });
            emit_matrix(&values, out.as_deref())
        }
    }
}

fn load_network(args: &NetworkArgs) -> Result<Network> {
    let mut network = read_scigrid(&args.vertices, &args.links)?;
    let mut next_id = network.lines().map(|line| line.id.value() + 1).max().unwrap_or(0);
    for &(from, to) in &args.extra_links {
        add_manual_link(&mut network, LineId::new(next_id), BusId::new(from), BusId::new(to))
            .with_context(|| format!("adding link {from}:{to}"))?;
        next_id += 1;
    }
    if args.extend {
        extend_line_attributes(&mut network).context("extending line attributes")?;
        assign_line_capacities(&mut network);
    }
    info!(
        buses = network.bus_count(),
        lines = network.line_count(),
        extended = args.extend,
        "loaded network"
    );
    Ok(network)
}
