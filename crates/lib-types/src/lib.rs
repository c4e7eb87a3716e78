//! # lib-types
//!
//! Core type definitions for the SnP-Kernel workspace:
//! - Physical units with compile-time safety
//! - Touchstone format descriptors (version, number format, parameter
//!   kind, matrix layout, two-port ordering)
//! - Assembled network-parameter sweep data

pub mod formats;
pub mod network;
pub mod units;

pub use formats::*;
pub use network::*;
pub use units::*;

/// Re-export num_complex for convenience
pub use num_complex::Complex64;
