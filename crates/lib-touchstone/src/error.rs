//! Error types for Touchstone parsing.

use thiserror::Error;

/// Errors that can occur while decoding a Touchstone stream.
///
/// Every variant is fatal to the current parse; nothing is retried and
/// no further packets are emitted once one of these surfaces.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token that should have been a number was not.
    #[error("failed to parse '{token}' as a number")]
    InvalidNumber { token: String },

    /// The option line carried a token outside the Touchstone vocabulary.
    #[error("unrecognized token '{token}' on option line")]
    UnknownOption { token: String },

    /// The option line did not start with '#' or could not be scanned.
    #[error("malformed option line: '{line}'")]
    MalformedOptionLine { line: String },

    /// A line appeared where the grammar required something else.
    #[error("expected {expected}, got '{line}'")]
    UnexpectedLine {
        expected: &'static str,
        line: String,
    },

    /// `[VERSION]` named anything other than 2.0.
    #[error("unsupported Touchstone version '{version}'")]
    UnsupportedVersion { version: String },

    /// A recognized keyword this parser deliberately rejects.
    #[error("{feature} is not supported")]
    Unsupported { feature: &'static str },

    /// A keyword carried a payload that does not parse or is out of range.
    #[error("invalid value '{value}' for {keyword}")]
    InvalidKeywordValue {
        keyword: &'static str,
        value: String,
    },

    /// A keyword that needs `[NUMBER OF PORTS]` arrived before it.
    #[error("{keyword} requires a prior [NUMBER OF PORTS]")]
    PortCountRequired { keyword: &'static str },

    /// `[NOISE DATA]` in a network that is not two-port.
    #[error("noise data is only allowed for two-port networks, got {ports} ports")]
    NoiseRequiresTwoPorts { ports: usize },

    /// Version-1 inference found a data-set that is not 2*N^2+1 values.
    #[error("data-set of {values} values does not describe a square matrix")]
    PortCountInference { values: usize },

    /// A sweep point declared a frequency of zero or below.
    #[error("non-positive sweep frequency {hertz} Hz")]
    NonPositiveFrequency { hertz: f64 },

    /// A `[REFERENCE]` entry of zero or below.
    #[error("reference resistance must be positive, got {ohms}")]
    InvalidReferenceResistance { ohms: f64 },
}
