//! In-place numeric conversions and matrix layout helpers.
//!
//! Data-set payloads are flat `[f64]` runs of complex value pairs. All
//! three on-wire encodings normalize to (magnitude, phase-radians) so
//! downstream consumers see a single representation regardless of the
//! option line.

use lib_types::NumberFormat;

/// Normalize a run of complex value pairs to (magnitude, phase-radians).
///
/// `values` must have even length; each consecutive pair is rewritten
/// according to `format`.
pub fn normalize_pairs(values: &mut [f64], format: NumberFormat) {
    debug_assert_eq!(values.len() % 2, 0);
    for pair in values.chunks_exact_mut(2) {
        match format {
            NumberFormat::RI => {
                let (re, im) = (pair[0], pair[1]);
                pair[0] = (re * re + im * im).sqrt();
                pair[1] = if re == 0.0 && im == 0.0 {
                    0.0
                } else {
                    im.atan2(re)
                };
            }
            NumberFormat::MA => {
                pair[1] = pair[1].to_radians();
            }
            NumberFormat::DB => {
                pair[0] = 10.0_f64.powf(pair[0] / 20.0);
                pair[1] = pair[1].to_radians();
            }
        }
    }
}

/// Noise-figure dB to linear: 10^(x/10).
pub fn noise_figure_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Copy the strict upper triangle of an N x N pair-matrix onto the
/// strict lower triangle.
pub fn fill_lower(matrix: &mut [f64], n: usize) {
    debug_assert_eq!(matrix.len(), 2 * n * n);
    for i in 0..n {
        for j in i + 1..n {
            matrix[2 * (j * n + i)] = matrix[2 * (i * n + j)];
            matrix[2 * (j * n + i) + 1] = matrix[2 * (i * n + j) + 1];
        }
    }
}

/// Copy the strict lower triangle of an N x N pair-matrix onto the
/// strict upper triangle.
pub fn fill_upper(matrix: &mut [f64], n: usize) {
    debug_assert_eq!(matrix.len(), 2 * n * n);
    for i in 0..n {
        for j in i + 1..n {
            matrix[2 * (i * n + j)] = matrix[2 * (j * n + i)];
            matrix[2 * (i * n + j) + 1] = matrix[2 * (j * n + i) + 1];
        }
    }
}

/// Exchange the off-diagonal pairs of a 2x2 pair-matrix.
///
/// Turns on-wire (11, 21, 12, 22) ordering into row-major
/// (11, 12, 21, 22).
pub fn swap_21_12(matrix: &mut [f64]) {
    debug_assert!(matrix.len() >= 8);
    matrix.swap(2, 4);
    matrix.swap(3, 5);
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_ri_to_polar() {
        let mut vals = [3.0, 4.0];
        normalize_pairs(&mut vals, NumberFormat::RI);
        assert!((vals[0] - 5.0).abs() < TOL);
        assert!((vals[1] - (4.0_f64).atan2(3.0)).abs() < TOL);
    }

    #[test]
    fn test_ri_zero_stays_zero() {
        let mut vals = [0.0, 0.0];
        normalize_pairs(&mut vals, NumberFormat::RI);
        assert_eq!(vals, [0.0, 0.0]);
    }

    #[test]
    fn test_ma_degrees_to_radians() {
        let mut vals = [0.5, 90.0];
        normalize_pairs(&mut vals, NumberFormat::MA);
        assert!((vals[0] - 0.5).abs() < TOL);
        assert!((vals[1] - std::f64::consts::FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn test_db_to_linear() {
        let mut vals = [-20.0, 180.0];
        normalize_pairs(&mut vals, NumberFormat::DB);
        assert!((vals[0] - 0.1).abs() < TOL);
        assert!((vals[1] - std::f64::consts::PI).abs() < TOL);
    }

    #[test]
    fn test_round_trips() {
        // RI -> polar -> RI
        let (re, im) = (0.25, -0.75);
        let mut vals = [re, im];
        normalize_pairs(&mut vals, NumberFormat::RI);
        assert!((vals[0] * vals[1].cos() - re).abs() < TOL);
        assert!((vals[0] * vals[1].sin() - im).abs() < TOL);

        // DB -> linear -> DB
        let db = -3.5;
        let mut vals = [db, 0.0];
        normalize_pairs(&mut vals, NumberFormat::DB);
        assert!((20.0 * vals[0].log10() - db).abs() < TOL);

        // Noise figure dB -> linear -> dB
        let nf = 1.25;
        assert!((10.0 * noise_figure_to_linear(nf).log10() - nf).abs() < TOL);
    }

    #[test]
    fn test_fill_lower_mirrors_upper() {
        // 3x3, pairs (k, -k) with k = row * 3 + col, lower triangle zeroed
        let n = 3;
        let mut m = vec![0.0; 2 * n * n];
        for i in 0..n {
            for j in i..n {
                let k = (i * n + j) as f64;
                m[2 * (i * n + j)] = k;
                m[2 * (i * n + j) + 1] = -k;
            }
        }
        fill_lower(&mut m, n);
        for i in 0..n {
            for j in 0..n {
                assert_eq!(m[2 * (i * n + j)], m[2 * (j * n + i)]);
                assert_eq!(m[2 * (i * n + j) + 1], m[2 * (j * n + i) + 1]);
            }
        }
    }

    #[test]
    fn test_fill_upper_mirrors_lower() {
        let n = 3;
        let mut m = vec![0.0; 2 * n * n];
        for i in 0..n {
            for j in 0..=i {
                let k = (i * n + j) as f64;
                m[2 * (i * n + j)] = k;
                m[2 * (i * n + j) + 1] = -k;
            }
        }
        fill_upper(&mut m, n);
        for i in 0..n {
            for j in 0..n {
                assert_eq!(m[2 * (i * n + j)], m[2 * (j * n + i)]);
            }
        }
    }

    #[test]
    fn test_swap_21_12() {
        let mut m = [11.0, 11.5, 21.0, 21.5, 12.0, 12.5, 22.0, 22.5];
        swap_21_12(&mut m);
        assert_eq!(m, [11.0, 11.5, 12.0, 12.5, 21.0, 21.5, 22.0, 22.5]);
    }
}
