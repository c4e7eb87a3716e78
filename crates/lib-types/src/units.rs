//! Physical units with type safety.
//!
//! These newtypes provide compile-time unit checking to prevent
//! mixing incompatible quantities (e.g., treating a resistance as
//! a frequency).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Frequency in Hertz.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Hertz(pub f64);

impl Hertz {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn from_khz(khz: f64) -> Self {
        Self(khz * 1e3)
    }

    #[inline]
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1e6)
    }

    #[inline]
    pub fn from_ghz(ghz: f64) -> Self {
        Self(ghz * 1e9)
    }

    #[inline]
    pub fn as_khz(&self) -> f64 {
        self.0 * 1e-3
    }

    #[inline]
    pub fn as_mhz(&self) -> f64 {
        self.0 * 1e-6
    }

    #[inline]
    pub fn as_ghz(&self) -> f64 {
        self.0 * 1e-9
    }

    /// Angular frequency (omega = 2 * pi * f).
    #[inline]
    pub fn angular(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.0
    }
}

impl Add for Hertz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Hertz {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Hertz {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Hertz {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

/// Impedance in Ohms.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Ohms(pub f64);

impl Ohms {
    /// Standard 50 ohm reference impedance.
    pub const Z0_50: Self = Self(50.0);

    /// Standard 75 ohm reference impedance.
    pub const Z0_75: Self = Self(75.0);
}

impl Add for Ohms {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<f64> for Ohms {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hertz_scaling() {
        let f = Hertz::from_ghz(2.5);
        assert!((f.0 - 2.5e9).abs() < 1.0);
        assert!((f.as_mhz() - 2500.0).abs() < 1e-6);
        assert!((Hertz::from_khz(1.0).0 - 1e3).abs() < 1e-9);
    }

    #[test]
    fn test_angular_frequency() {
        let f = Hertz(1.0);
        assert!((f.angular() - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }
}
