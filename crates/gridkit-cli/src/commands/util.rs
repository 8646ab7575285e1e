use anyhow::{Context, Result};
use faer::Mat;
use gridkit_io::{write_matrix, write_matrix_to_writer};
use rayon::ThreadPoolBuilder;
use std::io;
use std::path::Path;
use tracing::info;

pub fn configure_threads(requested: &str) {
    let count = if requested.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        requested.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

/// Write a matrix to `out`, or to stdout when no path is given.
pub fn emit_matrix(m: &Mat<f64>, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            write_matrix(path, m)?;
            info!(
                rows = m.nrows(),
                cols = m.ncols(),
                "matrix written to {}",
                path.display()
            );
            Ok(())
        }
        None => write_matrix_to_writer(io::stdout().lock(), m).context("writing to stdout"),
    }
}
