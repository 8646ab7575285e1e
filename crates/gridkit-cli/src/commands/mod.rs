pub mod config;
pub mod grid;
pub mod matrix;
pub mod util;
