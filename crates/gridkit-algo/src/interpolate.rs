//! Fill NaN gaps in time series by linear interpolation.
//!
//! Each slice along the chosen axis is treated as samples at positions
//! `0, 1, 2, ...`. Finite entries are the knots; every NaN is replaced by
//! the piecewise-linear interpolant between its nearest knots. Gaps before
//! the first or after the last knot take that knot's value.

use crate::error::{LinalgError, LinalgResult};
use faer::Mat;
use tracing::trace;

/// Interpolate the NaN entries of a slice in place.
///
/// A slice without NaN is left untouched. A non-empty slice made only of
/// NaN has nothing to interpolate from and fails with
/// [`LinalgError::InsufficientKnots`] (reported as slice `0`).
pub fn interpolate_slice(values: &mut [f64]) -> LinalgResult<()> {
    if !values.iter().any(|v| v.is_nan()) {
        return Ok(());
    }
    let knots: Vec<usize> = (0..values.len()).filter(|&i| !values[i].is_nan()).collect();
    let (Some(&first), Some(&last)) = (knots.first(), knots.last()) else {
        return Err(LinalgError::InsufficientKnots { slice: 0 });
    };

    let first_value = values[first];
    let last_value = values[last];
    for v in &mut values[..first] {
        *v = first_value;
    }
    for v in &mut values[last + 1..] {
        *v = last_value;
    }
    for pair in knots.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (y0, y1) = (values[lo], values[hi]);
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            let t = (i - lo) as f64 / span;
            values[i] = y0 + t * (y1 - y0);
        }
    }
    Ok(())
}

/// Interpolate NaN entries of a dense matrix along `axis`.
///
/// `axis = 0` fills each column (samples run down the rows), `axis = 1`
/// fills each row. The input is not modified.
pub fn interpolate(a: &Mat<f64>, axis: usize) -> LinalgResult<Mat<f64>> {
    let (rows, cols) = (a.nrows(), a.ncols());
    let (slices, len) = match axis {
        0 => (cols, rows),
        1 => (rows, cols),
        other => {
            return Err(LinalgError::InvalidArgument(format!(
                "axis must be 0 or 1, got {other}"
            )))
        }
    };
    let at = |slice: usize, k: usize| if axis == 0 { (k, slice) } else { (slice, k) };

    let mut out = a.clone();
    let mut buffer = vec![0.0; len];
    for slice in 0..slices {
        for (k, b) in buffer.iter_mut().enumerate() {
            let (i, j) = at(slice, k);
            *b = a.read(i, j);
        }
        interpolate_slice(&mut buffer).map_err(|_| LinalgError::InsufficientKnots { slice })?;
        trace!(axis, slice, "interpolated");
        for (k, &b) in buffer.iter().enumerate() {
            let (i, j) = at(slice, k);
            out.write(i, j, b);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{dense_from_rows, dense_to_rows};

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_interior_gap() {
        let mut v = [1.0, NAN, 3.0];
        interpolate_slice(&mut v).unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);

        let mut w = [0.0, NAN, NAN, NAN, 8.0];
        interpolate_slice(&mut w).unwrap();
        assert_eq!(w, [0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_edges_clamp_to_nearest_knot() {
        let mut v = [NAN, NAN, 5.0, NAN, 7.0, NAN];
        interpolate_slice(&mut v).unwrap();
        assert_eq!(v, [5.0, 5.0, 5.0, 6.0, 7.0, 7.0]);
    }

    #[test]
    fn test_single_knot_fills_slice() {
        let mut v = [NAN, 4.0, NAN];
        interpolate_slice(&mut v).unwrap();
        assert_eq!(v, [4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_without_nan_is_unchanged() {
        let mut v = [3.0, -1.0, 2.5];
        interpolate_slice(&mut v).unwrap();
        assert_eq!(v, [3.0, -1.0, 2.5]);

        let mut empty: [f64; 0] = [];
        assert!(interpolate_slice(&mut empty).is_ok());
    }

    #[test]
    fn test_all_nan_fails() {
        let mut v = [NAN, NAN];
        assert_eq!(
            interpolate_slice(&mut v),
            Err(LinalgError::InsufficientKnots { slice: 0 })
        );
    }

    #[test]
    fn test_matrix_axes() {
        let a = dense_from_rows(&[
            vec![1.0, 10.0],
            vec![NAN, NAN],
            vec![3.0, 30.0],
        ])
        .unwrap();
        let filled = interpolate(&a, 0).unwrap();
        assert_eq!(
            dense_to_rows(&filled),
            vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]]
        );
        assert!(a.read(1, 0).is_nan());

        let b = dense_from_rows(&[vec![1.0, NAN, 5.0], vec![NAN, 2.0, NAN]]).unwrap();
        assert_eq!(
            dense_to_rows(&interpolate(&b, 1).unwrap()),
            vec![vec![1.0, 3.0, 5.0], vec![2.0, 2.0, 2.0]]
        );
    }

    #[test]
    fn test_matrix_errors_name_the_slice() {
        let a = dense_from_rows(&[vec![1.0, NAN], vec![2.0, NAN]]).unwrap();
        assert_eq!(
            interpolate(&a, 0).unwrap_err(),
            LinalgError::InsufficientKnots { slice: 1 }
        );
        assert!(interpolate(&a, 2).unwrap_err().is_invalid_argument());
    }
}
