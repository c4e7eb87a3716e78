//! Streaming Touchstone parser.
//!
//! [`TouchstoneParser`] consumes byte chunks of a `.s1p`..`.s8p` file
//! and publishes typed packets to a [`PacketSink`]: reference
//! resistances, frequency axes, network-parameter sweeps, and two-port
//! noise data. Both file dialects are handled: version 1 (option line
//! first, port count inferred from the data) and version 2 (`[VERSION]`
//! keyword plus explicit headers).
//!
//! The parser is single-threaded and cooperative: `receive` and `end`
//! run to completion on the caller's thread, and every packet is
//! delivered synchronously before they return.

use crate::chunker::LineChunker;
use crate::convert;
use crate::error::ParseError;
use crate::keywords::{self, Keyword};
use crate::options;
use crate::sink::{Packet, PacketSink, NOISE_ENTRIES};
use lib_types::{MatrixFormat, NumberFormat, ParameterKind, TouchstoneVersion, TwoPortOrder};
use tracing::{debug, trace, warn};

/// Initial data-set reservation, in doubles.
const INITIAL_DATA_SET_CAPACITY: usize = 512;

/// Parser phase. See the state transition table in the module docs of
/// the crate root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    OptionLineExpected,
    NumPortsExpected,
    Keywords,
    References,
    SkipInfo,
    DataLines,
    NoiseData,
}

/// Split a data line into floating-point tokens.
fn parse_data_values(line: &str) -> Result<Vec<f64>, ParseError> {
    line.split_whitespace()
        .map(|token| {
            token.parse().map_err(|_| ParseError::InvalidNumber {
                token: token.to_string(),
            })
        })
        .collect()
}

/// Streaming Touchstone decoder; one instance per input stream.
#[derive(Debug)]
pub struct TouchstoneParser {
    chunker: LineChunker,
    state: State,
    file_version: TouchstoneVersion,
    frequency_unit: f64,
    number_format: NumberFormat,
    parameter_kind: ParameterKind,
    matrix_format: MatrixFormat,
    two_port_data_order: TwoPortOrder,
    reference_resistance: f64,
    reference_resistances: Vec<f64>,
    num_references_found: usize,
    num_ports: usize,
    /// Expected token count per sweep point (frequency included); 0
    /// while still unknown.
    num_vals_per_set: usize,
    /// Advisory point counts from version 2 keywords.
    sweep_points: usize,
    sweep_points_noise: usize,
    /// Values of the currently accumulating sweep point.
    data_set: Vec<f64>,
    /// Completed sweep points waiting for the next flush; parallel
    /// buffers, `sweep_data` holding one payload block per frequency.
    sweep_freq: Vec<f64>,
    sweep_data: Vec<f64>,
    /// Frequency (in option-line units) of the last completed point.
    last_freq: f64,
    started: bool,
}

impl Default for TouchstoneParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchstoneParser {
    pub fn new() -> Self {
        Self {
            chunker: LineChunker::new(),
            state: State::Start,
            file_version: TouchstoneVersion::V1,
            frequency_unit: 1e9,
            number_format: NumberFormat::default(),
            parameter_kind: ParameterKind::default(),
            matrix_format: MatrixFormat::default(),
            two_port_data_order: TwoPortOrder::default(),
            reference_resistance: 50.0,
            reference_resistances: Vec::new(),
            num_references_found: 0,
            num_ports: 0,
            num_vals_per_set: 0,
            sweep_points: 0,
            sweep_points_noise: 0,
            data_set: Vec::with_capacity(INITIAL_DATA_SET_CAPACITY),
            sweep_freq: Vec::new(),
            sweep_data: Vec::new(),
            last_freq: 0.0,
            started: false,
        }
    }

    /// Feed the next chunk of the input stream.
    ///
    /// Only complete lines are processed; a partial trailing line stays
    /// buffered until the next call or [`end`](Self::end).
    pub fn receive(&mut self, chunk: &[u8], sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        self.chunker.push(chunk);
        self.process_buffer(false, sink)
    }

    /// Finish the stream: process the buffered tail, run any deferred
    /// version-1 port inference, flush the pending sweep, and close the
    /// output frame.
    pub fn end(&mut self, sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        self.process_buffer(true, sink)?;

        if self.file_version == TouchstoneVersion::V1
            && self.num_ports == 0
            && !self.data_set.is_empty()
        {
            self.infer_num_ports()?;
            self.send_references(sink);
            self.move_data_to_sweep()?;
        }

        self.send_sweep(sink);

        if self.started {
            sink.handle(Packet::FrameEnd);
        }
        Ok(())
    }

    /// Re-arm the parser for another input stream. Buffers are cleared
    /// but their allocations are retained.
    pub fn reset(&mut self) {
        self.chunker.clear();
        self.state = State::Start;
        self.file_version = TouchstoneVersion::V1;
        self.frequency_unit = 1e9;
        self.number_format = NumberFormat::default();
        self.parameter_kind = ParameterKind::default();
        self.matrix_format = MatrixFormat::default();
        self.two_port_data_order = TwoPortOrder::default();
        self.reference_resistance = 50.0;
        self.reference_resistances.clear();
        self.num_references_found = 0;
        self.num_ports = 0;
        self.num_vals_per_set = 0;
        self.sweep_points = 0;
        self.sweep_points_noise = 0;
        self.data_set.clear();
        self.sweep_freq.clear();
        self.sweep_data.clear();
        self.last_freq = 0.0;
        self.started = false;
    }

    fn process_buffer(&mut self, eof: bool, sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        if !self.started {
            self.started = true;
            sink.handle(Packet::FrameBegin);
        }

        for line in self.chunker.take_lines(eof) {
            self.process_line(&line, sink)?;
        }
        Ok(())
    }

    fn process_line(&mut self, line: &str, sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        // Option lines past the first are ignored in every later state.
        if !matches!(self.state, State::Start | State::OptionLineExpected)
            && line.starts_with('#')
        {
            return Ok(());
        }

        match self.state {
            State::Start => {
                // A version 1 file starts with the option line, a
                // version 2 file with the [VERSION] keyword.
                if line.starts_with('#') {
                    self.file_version = TouchstoneVersion::V1;
                    self.state = State::DataLines;
                    self.apply_option_line(line)
                } else if line.starts_with('[') {
                    self.state = State::OptionLineExpected;
                    self.parse_version_line(line)
                } else {
                    Err(ParseError::UnexpectedLine {
                        expected: "option line or [VERSION] keyword",
                        line: line.to_string(),
                    })
                }
            }
            State::OptionLineExpected => {
                if !line.starts_with('#') {
                    return Err(ParseError::UnexpectedLine {
                        expected: "option line",
                        line: line.to_string(),
                    });
                }
                self.state = State::NumPortsExpected;
                self.apply_option_line(line)
            }
            State::NumPortsExpected => {
                if !line.starts_with('[') {
                    return Err(ParseError::UnexpectedLine {
                        expected: "[NUMBER OF PORTS]",
                        line: line.to_string(),
                    });
                }
                self.state = State::Keywords;
                self.handle_keyword(line, sink)
            }
            State::Keywords => {
                if line.starts_with('[') {
                    self.handle_keyword(line, sink)
                } else {
                    self.state = State::DataLines;
                    self.parse_data_line(line, sink)
                }
            }
            State::References => self.parse_references(line, sink),
            State::SkipInfo => {
                if keywords::strip_keyword(line, "[END INFORMATION]").is_some() {
                    self.state = State::Keywords;
                }
                Ok(())
            }
            State::DataLines | State::NoiseData => {
                if line.starts_with('[') {
                    if self.state == State::DataLines
                        && keywords::strip_keyword(line, "[NOISE DATA]").is_some()
                    {
                        if self.num_ports != 2 {
                            return Err(ParseError::NoiseRequiresTwoPorts {
                                ports: self.num_ports,
                            });
                        }
                        debug!("entering noise data block");
                        self.send_sweep(sink);
                        self.state = State::NoiseData;
                        self.num_vals_per_set = NOISE_ENTRIES;
                        return Ok(());
                    }
                    if keywords::strip_keyword(line, "[END]").is_some() {
                        self.send_sweep(sink);
                        return Ok(());
                    }
                }
                self.parse_data_line(line, sink)
            }
        }
    }

    fn apply_option_line(&mut self, line: &str) -> Result<(), ParseError> {
        let opts = options::parse_option_line(line)?;
        trace!(?opts, "option line parsed");
        self.frequency_unit = opts.frequency_unit;
        self.number_format = opts.number_format;
        self.parameter_kind = opts.parameter_kind;
        self.reference_resistance = opts.reference_resistance;
        Ok(())
    }

    fn parse_version_line(&mut self, line: &str) -> Result<(), ParseError> {
        let Some(value) = keywords::strip_keyword(line, "[VERSION]") else {
            return Err(ParseError::UnexpectedLine {
                expected: "[VERSION] keyword",
                line: line.to_string(),
            });
        };
        if value.starts_with("2.0") {
            self.file_version = TouchstoneVersion::V2;
            Ok(())
        } else {
            Err(ParseError::UnsupportedVersion {
                version: value.to_string(),
            })
        }
    }

    fn handle_keyword(&mut self, line: &str, sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        match keywords::parse_keyword_line(line)? {
            Keyword::NumberOfPorts(ports) => {
                trace!(ports, "number of ports declared");
                self.num_ports = ports;
                self.num_vals_per_set = 2 * ports * ports + 1;
                self.send_references(sink);
            }
            Keyword::TwoPortOrder(order) => self.two_port_data_order = order,
            Keyword::NumberOfFrequencies(points) => self.sweep_points = points,
            Keyword::NumberOfNoiseFrequencies(points) => self.sweep_points_noise = points,
            Keyword::Reference(payload) => {
                if self.num_ports == 0 {
                    return Err(ParseError::PortCountRequired {
                        keyword: "[REFERENCE]",
                    });
                }
                self.reference_resistances.clear();
                self.reference_resistances.resize(self.num_ports, 0.0);
                self.num_references_found = 0;
                self.state = State::References;
                return self.parse_references(&payload, sink);
            }
            Keyword::MatrixFormat(format) => {
                if self.num_ports == 0 {
                    return Err(ParseError::PortCountRequired {
                        keyword: "[MATRIX FORMAT]",
                    });
                }
                self.matrix_format = format;
                let n = self.num_ports;
                self.num_vals_per_set = match format {
                    MatrixFormat::Full => 2 * n * n + 1,
                    MatrixFormat::Lower | MatrixFormat::Upper => n * n + n + 1,
                };
                trace!(?format, vals = self.num_vals_per_set, "matrix format set");
            }
            Keyword::MixedModeOrder => {
                return Err(ParseError::Unsupported {
                    feature: "[MIXED-MODE ORDER]",
                });
            }
            Keyword::BeginInformation => self.state = State::SkipInfo,
            Keyword::NetworkData => {
                if self.num_ports == 0 {
                    return Err(ParseError::PortCountRequired {
                        keyword: "[NETWORK DATA]",
                    });
                }
                self.state = State::DataLines;
            }
            // [NOISE DATA] and [END] only matter once data lines have
            // begun; everything else here is informational.
            Keyword::Version(_)
            | Keyword::NoiseData
            | Keyword::End
            | Keyword::EndInformation
            | Keyword::Unknown => {}
        }
        Ok(())
    }

    fn parse_references(&mut self, line: &str, sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        for token in line.split_whitespace() {
            if self.num_references_found >= self.num_ports {
                break;
            }
            let r: f64 = token.parse().map_err(|_| ParseError::InvalidNumber {
                token: token.to_string(),
            })?;
            if r <= 0.0 {
                return Err(ParseError::InvalidReferenceResistance { ohms: r });
            }
            self.reference_resistances[self.num_references_found] = r;
            self.num_references_found += 1;
        }

        if self.num_references_found == self.num_ports {
            self.state = State::Keywords;
            self.send_references(sink);
        }
        Ok(())
    }

    fn parse_data_line(&mut self, line: &str, sink: &mut dyn PacketSink) -> Result<(), ParseError> {
        let vals = parse_data_values(line)?;
        if vals.is_empty() {
            return Ok(());
        }

        if self.num_ports == 0 && self.file_version == TouchstoneVersion::V1 {
            // An odd batch on top of accumulated values carries a new
            // frequency, so the accumulated values are one full set and
            // the port count follows from its size.
            if !self.data_set.is_empty() && vals.len() % 2 == 1 {
                self.infer_num_ports()?;
                self.send_references(sink);
                self.move_data_to_sweep()?;
            }
            // A single-point file resolves in end() instead.
        }

        self.data_set.extend_from_slice(&vals);

        if self.file_version == TouchstoneVersion::V1
            && self.state == State::DataLines
            && !self.sweep_freq.is_empty()
            && !self.data_set.is_empty()
            && self.data_set[0] < self.last_freq
        {
            debug!(
                freq = self.data_set[0],
                last = self.last_freq,
                "frequency restart, start of noise data"
            );
            self.send_sweep(sink);
            self.state = State::NoiseData;
            self.num_vals_per_set = NOISE_ENTRIES;
        }

        if self.num_vals_per_set > 0 {
            if self.data_set.len() > self.num_vals_per_set {
                // A set must begin with its frequency on a fresh line;
                // keep the overflow as the start of the next set.
                warn!("more values than expected in data-set");
            }
            while self.data_set.len() >= self.num_vals_per_set {
                self.move_data_to_sweep()?;
            }
        }
        Ok(())
    }

    /// Version-1 port-count inference: the accumulated data-set is one
    /// full sweep point, so its size must be 2*N^2 + 1.
    fn infer_num_ports(&mut self) -> Result<(), ParseError> {
        self.num_vals_per_set = self.data_set.len();
        let n = (self.num_vals_per_set / 2).isqrt();
        if 2 * n * n + 1 != self.num_vals_per_set {
            return Err(ParseError::PortCountInference {
                values: self.num_vals_per_set,
            });
        }
        self.num_ports = n;
        debug!(ports = n, "inferred port count from data");
        Ok(())
    }

    /// Doubles stored per sweep point in the current phase.
    fn entries_per_point(&self) -> usize {
        if self.state == State::NoiseData {
            NOISE_ENTRIES
        } else {
            2 * self.num_ports * self.num_ports
        }
    }

    /// Move the completed head of the data-set into the sweep store,
    /// converting and (for triangular storage) mirroring on the way.
    fn move_data_to_sweep(&mut self) -> Result<(), ParseError> {
        debug_assert!(self.num_ports > 0);
        debug_assert!(self.data_set.len() >= self.num_vals_per_set);

        let entries = self.entries_per_point();
        let nvps = self.num_vals_per_set;
        let n = self.num_ports;

        let new_freq = self.data_set[0];
        if new_freq <= 0.0 {
            return Err(ParseError::NonPositiveFrequency {
                hertz: new_freq * self.frequency_unit,
            });
        }

        if self.sweep_freq.capacity() == 0 {
            let hint = if self.state == State::NoiseData {
                self.sweep_points_noise
            } else {
                self.sweep_points
            };
            if hint > 0 {
                self.sweep_freq.reserve(hint);
                self.sweep_data.reserve(hint * entries);
            }
        }

        let freq_hz = new_freq * self.frequency_unit;
        trace!(freq_hz, "sweep point complete");
        self.sweep_freq.push(freq_hz);
        self.last_freq = new_freq;

        let base = self.sweep_data.len();
        self.sweep_data.resize(base + entries, 0.0);

        if self.state == State::NoiseData {
            let payload = &mut self.data_set[1..nvps];
            payload[0] = convert::noise_figure_to_linear(payload[0]);
            payload[2] = payload[2].to_radians();
            // Stored block: frequency, NFmin (linear), |gamma_opt|,
            // angle(gamma_opt) (radians), Rn.
            let block = &mut self.sweep_data[base..];
            block[0] = freq_hz;
            block[1..].copy_from_slice(payload);
        } else {
            // Normalize the contiguous payload first so triangular
            // layouts convert exactly the stored pairs.
            let payload = &mut self.data_set[1..nvps];
            convert::normalize_pairs(payload, self.number_format);

            let block = &mut self.sweep_data[base..];
            match self.matrix_format {
                MatrixFormat::Full => block.copy_from_slice(payload),
                MatrixFormat::Upper => {
                    let mut idx = 0;
                    for i in 0..n {
                        let row_len = 2 * (n - i);
                        let offs = i * (n + 1) * 2;
                        block[offs..offs + row_len].copy_from_slice(&payload[idx..idx + row_len]);
                        idx += row_len;
                    }
                    convert::fill_lower(block, n);
                }
                MatrixFormat::Lower => {
                    let mut idx = 0;
                    for i in 0..n {
                        let row_len = 2 * (i + 1);
                        let offs = i * n * 2;
                        block[offs..offs + row_len].copy_from_slice(&payload[idx..idx + row_len]);
                        idx += row_len;
                    }
                    convert::fill_upper(block, n);
                }
            }

            if n == 2 && self.two_port_data_order == TwoPortOrder::Order21_12 {
                convert::swap_21_12(block);
            }
        }

        self.data_set.drain(..nvps);
        Ok(())
    }

    /// Publish the per-port reference resistances, materializing the
    /// scalar default when no `[REFERENCE]` override is present.
    fn send_references(&mut self, sink: &mut dyn PacketSink) {
        if self.reference_resistances.len() != self.num_ports {
            self.reference_resistances = vec![self.reference_resistance; self.num_ports];
        }
        // Version 2 defines non-S parameters against a normalized
        // reference of 1 per port.
        if self.file_version == TouchstoneVersion::V2
            && self.parameter_kind != ParameterKind::S
        {
            self.reference_resistances.fill(1.0);
        }
        sink.handle(Packet::References {
            resistances: &self.reference_resistances,
        });
    }

    /// Flush the pending sweep block: frequency axis first, then the
    /// matching parameter or noise payload. Capacity is retained.
    fn send_sweep(&mut self, sink: &mut dyn PacketSink) {
        if self.sweep_freq.is_empty() {
            return;
        }
        debug!(points = self.sweep_freq.len(), "flushing sweep");

        sink.handle(Packet::FrequencyAxis {
            frequencies: &self.sweep_freq,
        });
        if self.state == State::NoiseData {
            sink.handle(Packet::NoiseData {
                values: &self.sweep_data,
            });
        } else {
            sink.handle(Packet::NetworkData {
                kind: self.parameter_kind,
                ports: self.num_ports,
                values: &self.sweep_data,
            });
        }

        self.sweep_freq.clear();
        self.sweep_data.clear();
    }
}
