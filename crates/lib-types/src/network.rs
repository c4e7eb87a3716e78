//! Assembled network-parameter sweep data.
//!
//! A [`NetworkData`] is the fully decoded view of one Touchstone input:
//! a frequency axis, one complex N x N matrix per frequency, the per-port
//! reference resistances, and (for two-port networks) any trailing noise
//! points.

use crate::formats::ParameterKind;
use crate::units::{Hertz, Ohms};
use ndarray::Array2;
use num_complex::Complex64;

/// Network-parameter matrix at a single frequency.
pub type ParameterMatrix = Array2<Complex64>;

/// One two-port noise data point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoisePoint {
    /// Frequency of the noise measurement.
    pub frequency: Hertz,

    /// Minimum noise figure, linear (converted from dB).
    pub nf_min: f64,

    /// Optimal source reflection coefficient.
    pub gamma_opt: Complex64,

    /// Normalized effective noise resistance.
    pub rn: f64,
}

/// Complete parameter dataset for a multi-port network.
#[derive(Clone, Debug)]
pub struct NetworkData {
    /// Parameter family (S, Y, Z, G, H).
    pub kind: ParameterKind,

    /// Number of ports.
    pub num_ports: usize,

    /// Per-port reference resistances, indexed by port.
    pub reference_resistances: Vec<Ohms>,

    /// Frequency points in Hz.
    pub frequencies: Vec<Hertz>,

    /// Parameter matrices at each frequency.
    /// Length matches `frequencies`.
    pub matrices: Vec<ParameterMatrix>,

    /// Two-port noise points, if the file carried a noise block.
    pub noise: Vec<NoisePoint>,
}

impl NetworkData {
    /// Create an empty dataset.
    pub fn new(kind: ParameterKind, num_ports: usize) -> Self {
        Self {
            kind,
            num_ports,
            reference_resistances: vec![Ohms::Z0_50; num_ports],
            frequencies: Vec::new(),
            matrices: Vec::new(),
            noise: Vec::new(),
        }
    }

    /// Add a frequency point with its parameter matrix.
    pub fn add_point(&mut self, freq: Hertz, matrix: ParameterMatrix) {
        debug_assert_eq!(matrix.nrows(), self.num_ports);
        debug_assert_eq!(matrix.ncols(), self.num_ports);
        self.frequencies.push(freq);
        self.matrices.push(matrix);
    }

    /// Number of frequency points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency range.
    pub fn frequency_range(&self) -> Option<(Hertz, Hertz)> {
        match (self.frequencies.first(), self.frequencies.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    /// Get one parameter at specific port indices across all frequencies.
    pub fn parameter(&self, row: usize, col: usize) -> Vec<Complex64> {
        self.matrices.iter().map(|m| m[[row, col]]).collect()
    }

    /// One parameter as magnitude in dB across all frequencies.
    pub fn magnitude_db(&self, row: usize, col: usize) -> Vec<f64> {
        self.parameter(row, col)
            .iter()
            .map(|c| 20.0 * c.norm().log10())
            .collect()
    }

    /// One parameter as phase in degrees across all frequencies.
    pub fn phase_deg(&self, row: usize, col: usize) -> Vec<f64> {
        self.parameter(row, col)
            .iter()
            .map(|c| c.arg().to_degrees())
            .collect()
    }

    /// Check if the network is reciprocal (M_ij = M_ji).
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        for matrix in &self.matrices {
            for i in 0..self.num_ports {
                for j in i + 1..self.num_ports {
                    if (matrix[[i, j]] - matrix[[j, i]]).norm() > tolerance {
                        return false;
                    }
                }
            }
        }
        true
    }
}
