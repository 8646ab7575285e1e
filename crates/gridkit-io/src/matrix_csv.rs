//! Headerless numeric matrix CSV.
//!
//! One matrix row per line, comma-separated. Cells reading `nan` (any
//! case) or left empty are NaN, which is how gaps in time series arrive.

use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use faer::Mat;
use gridkit_algo::{dense_from_rows, dense_to_rows};
use std::io::{Read, Write};
use std::path::Path;

/// Read a dense matrix from a CSV file.
pub fn read_matrix(path: impl AsRef<Path>) -> Result<Mat<f64>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening matrix CSV: {}", path.display()))?;
    read_matrix_from_reader(file).with_context(|| format!("reading {}", path.display()))
}

pub fn read_matrix_from_reader(input: impl Read) -> Result<Mat<f64>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.context("reading matrix CSV record")?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                parse_cell(cell)
                    .ok_or_else(|| anyhow!("row {line}, column {col}: not a number: {cell:?}"))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        bail!("matrix CSV is empty");
    }
    Ok(dense_from_rows(&rows)?)
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}

/// Write a dense matrix as CSV; NaN is written as `NaN`.
pub fn write_matrix(path: impl AsRef<Path>, m: &Mat<f64>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating matrix CSV: {}", path.display()))?;
    write_matrix_to_writer(file, m)
}

pub fn write_matrix_to_writer(output: impl Write, m: &Mat<f64>) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(output);
    for row in dense_to_rows(m) {
        wtr.write_record(row.iter().map(f64::to_string))
            .context("writing matrix CSV record")?;
    }
    wtr.flush().context("flushing matrix CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_nan_cells() {
        let m = read_matrix_from_reader("1, nan,3\n,NaN, 6.5\n".as_bytes()).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (2, 3));
        assert_eq!(m.read(0, 0), 1.0);
        assert!(m.read(0, 1).is_nan());
        assert!(m.read(1, 0).is_nan());
        assert!(m.read(1, 1).is_nan());
        assert_eq!(m.read(1, 2), 6.5);
    }

    #[test]
    fn test_rejects_bad_input() {
        let err = read_matrix_from_reader("1,2\n3,x\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 1, column 1"));
        assert!(read_matrix_from_reader("1,2\n3\n".as_bytes()).is_err());
        assert!(read_matrix_from_reader("".as_bytes()).is_err());
    }

    #[test]
    fn test_file_round_trip_keeps_nan() {
        let m = dense_from_rows(&[vec![0.25, -1e-7], vec![f64::NAN, 3.0]]).unwrap();
        let file = NamedTempFile::new().unwrap();
        write_matrix(file.path(), &m).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "0.25,-0.0000001\nNaN,3\n");

        let back = read_matrix(file.path()).unwrap();
        assert_eq!(back.read(0, 1), -1e-7);
        assert!(back.read(1, 0).is_nan());
    }

    #[test]
    fn test_missing_file_has_context() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,2").unwrap();
        let missing = file.path().with_extension("missing");
        let err = read_matrix(&missing).unwrap_err();
        assert!(err.to_string().contains("opening matrix CSV"));
    }
}
