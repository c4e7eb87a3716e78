//! Touchstone file format descriptors.
//!
//! These enums capture everything a Touchstone option line or keyword
//! header can declare about how the numbers in the file are to be read.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Touchstone file dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchstoneVersion {
    /// Legacy format: option line first, layout inferred from the data.
    #[default]
    V1,
    /// Version 2.0: `[VERSION]` keyword followed by explicit headers.
    V2,
}

/// Numeric encoding of each complex value pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberFormat {
    /// dB-magnitude and angle in degrees.
    DB,
    /// Linear magnitude and angle in degrees.
    #[default]
    MA,
    /// Real and imaginary parts.
    RI,
}

impl NumberFormat {
    /// Convert an on-wire value pair to a complex number.
    pub fn to_complex(&self, val1: f64, val2: f64) -> Complex64 {
        match self {
            Self::RI => Complex64::new(val1, val2),
            Self::MA => Complex64::from_polar(val1, val2.to_radians()),
            Self::DB => {
                let magnitude = 10.0_f64.powf(val1 / 20.0);
                Complex64::from_polar(magnitude, val2.to_radians())
            }
        }
    }
}

/// Which network parameter family the file carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Scattering parameters.
    #[default]
    S,
    /// Admittance parameters.
    Y,
    /// Impedance parameters.
    Z,
    /// Hybrid-G parameters.
    G,
    /// Hybrid-H parameters.
    H,
}

impl ParameterKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::G => "G",
            Self::H => "H",
        }
    }
}

/// Storage layout of each per-frequency matrix (version 2 `[MATRIX FORMAT]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixFormat {
    /// All N*N entries, row major.
    #[default]
    Full,
    /// Lower triangle including the diagonal; upper mirrored.
    Lower,
    /// Upper triangle including the diagonal; lower mirrored.
    Upper,
}

/// Ordering of the off-diagonal pair in two-port data rows.
///
/// The legacy convention puts the 21 parameter before the 12 parameter,
/// so `Order21_12` is the default unless `[TWO-PORT ORDER]` says otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwoPortOrder {
    Order12_21,
    #[default]
    Order21_12,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format_conversion() {
        let ri = NumberFormat::RI.to_complex(1.0, 0.0);
        assert!((ri.re - 1.0).abs() < 1e-10);
        assert!(ri.im.abs() < 1e-10);

        let ma = NumberFormat::MA.to_complex(1.0, 90.0);
        assert!(ma.re.abs() < 1e-10);
        assert!((ma.im - 1.0).abs() < 1e-10);

        // 0 dB is unit magnitude
        let db = NumberFormat::DB.to_complex(0.0, 0.0);
        assert!((db.re - 1.0).abs() < 1e-10);

        // -20 dB is a factor of ten down
        let db = NumberFormat::DB.to_complex(-20.0, 0.0);
        assert!((db.re - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_defaults_match_option_line_defaults() {
        assert_eq!(NumberFormat::default(), NumberFormat::MA);
        assert_eq!(ParameterKind::default(), ParameterKind::S);
        assert_eq!(MatrixFormat::default(), MatrixFormat::Full);
        assert_eq!(TwoPortOrder::default(), TwoPortOrder::Order21_12);
    }
}
