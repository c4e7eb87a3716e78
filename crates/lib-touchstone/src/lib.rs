//! # lib-touchstone
//!
//! Streaming Touchstone (`.s1p`..`.s8p`) parser for SnP-Kernel.
//!
//! Touchstone is the ASCII interchange format RF/microwave test
//! equipment uses for N-port network parameters over frequency,
//! optionally followed by two-port noise data. This crate decodes both
//! dialects of the format from a stream of byte chunks and publishes
//! typed packets to a consumer:
//!
//! ```
//! use lib_touchstone::{SweepCollector, TouchstoneParser};
//!
//! let mut parser = TouchstoneParser::new();
//! let mut collector = SweepCollector::new();
//! parser.receive(b"# GHZ S MA R 50\n1.0 0.5 90\n", &mut collector)?;
//! parser.end(&mut collector)?;
//!
//! let network = collector.into_network();
//! assert_eq!(network.num_ports, 1);
//! # Ok::<(), lib_touchstone::ParseError>(())
//! ```
//!
//! State transitions, from the first non-comment line:
//!
//! ```text
//! Start --'#'--> DataLines                (version 1, parses options)
//! Start --'['--> OptionLineExpected        (requires [VERSION] 2.0)
//! OptionLineExpected --'#'--> NumPortsExpected
//! NumPortsExpected --'['--> Keywords
//! Keywords --data--> DataLines
//! Keywords --[REFERENCE]--> References --complete--> Keywords
//! Keywords --[BEGIN INFORMATION]--> SkipInfo --[END INFORMATION]--> Keywords
//! DataLines --[NOISE DATA] | v1 freq restart--> NoiseData
//! DataLines | NoiseData --[END]--> flush
//! ```

pub mod chunker;
pub mod convert;
pub mod error;
pub mod keywords;
pub mod matcher;
pub mod options;
pub mod parser;
pub mod sink;

pub use error::ParseError;
pub use matcher::format_match;
pub use parser::TouchstoneParser;
pub use sink::{Packet, PacketSink, SweepCollector};
