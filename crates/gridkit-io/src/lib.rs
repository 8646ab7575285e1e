//! # gridkit-io: Grid and Matrix Data I/O
//!
//! ## Supported Formats
//!
//! | Format | Reader | Writer | Notes |
//! |--------|--------|--------|-------|
//! | SciGRID vertices/links | [`read_scigrid`] | - | `;`-delimited, V and m units |
//! | Matrix CSV | [`read_matrix`] | [`write_matrix`] | headerless, `nan`/empty cells are NaN |
//!
//! ```rust,no_run
//! use gridkit_io::read_scigrid;
//!
//! fn main() -> anyhow::Result<()> {
//!     let network = read_scigrid("vertices_de_power_150601.csv", "links_de_power_150601.csv")?;
//!     println!("Buses: {}", network.bus_count());
//!     println!("Lines: {}", network.line_count());
//!     Ok(())
//! }
//! ```

pub mod matrix_csv;
pub mod scigrid;

pub use matrix_csv::{read_matrix, read_matrix_from_reader, write_matrix, write_matrix_to_writer};
pub use scigrid::{read_scigrid, read_scigrid_from_readers};
