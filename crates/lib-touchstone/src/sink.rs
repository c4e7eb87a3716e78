//! Typed packets and the consumer interface.
//!
//! The parser publishes decoded data through a [`PacketSink`] supplied
//! by the host. Packet payloads borrow parser-owned storage and are
//! only valid for the duration of the callback; consumers that need the
//! data afterwards must copy it.

use lib_types::{Complex64, Hertz, NetworkData, NoisePoint, Ohms, ParameterKind, ParameterMatrix};

/// Doubles stored per noise sweep point (frequency + four payload values).
pub const NOISE_ENTRIES: usize = 5;

/// One typed record from the parser.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Packet<'a> {
    /// Start of the output frame; emitted once before any other packet.
    FrameBegin,

    /// End of the output frame; emitted once from `end()`.
    FrameEnd,

    /// Per-port reference resistances in ohms, indexed by port.
    ///
    /// Sent when the port count first becomes known and again whenever a
    /// `[REFERENCE]` keyword completes.
    References { resistances: &'a [f64] },

    /// The frequency axis of the sweep block that follows, in Hz.
    FrequencyAxis { frequencies: &'a [f64] },

    /// Network-parameter payload: `2 * ports * ports` doubles per sweep
    /// point, as (magnitude, phase-radians) pairs in row-major order.
    NetworkData {
        kind: ParameterKind,
        ports: usize,
        values: &'a [f64],
    },

    /// Two-port noise payload: [`NOISE_ENTRIES`] doubles per point as
    /// (frequency Hz, NFmin linear, |gamma_opt|, angle(gamma_opt)
    /// radians, Rn).
    NoiseData { values: &'a [f64] },
}

/// Consumer callback for parser output.
///
/// Invoked synchronously from `receive`/`end`; packets arrive in
/// calling order.
pub trait PacketSink {
    fn handle(&mut self, packet: Packet<'_>);
}

/// A sink that reassembles the packet stream into a [`NetworkData`].
#[derive(Debug, Default)]
pub struct SweepCollector {
    kind: Option<ParameterKind>,
    num_ports: usize,
    reference_resistances: Vec<f64>,
    pending_freqs: Vec<f64>,
    frequencies: Vec<f64>,
    matrices: Vec<ParameterMatrix>,
    noise: Vec<NoisePoint>,
}

impl SweepCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the collector, yielding the assembled network view.
    pub fn into_network(self) -> NetworkData {
        NetworkData {
            kind: self.kind.unwrap_or_default(),
            num_ports: self.num_ports,
            reference_resistances: self.reference_resistances.into_iter().map(Ohms).collect(),
            frequencies: self.frequencies.into_iter().map(Hertz).collect(),
            matrices: self.matrices,
            noise: self.noise,
        }
    }
}

impl PacketSink for SweepCollector {
    fn handle(&mut self, packet: Packet<'_>) {
        match packet {
            Packet::FrameBegin | Packet::FrameEnd => {}
            Packet::References { resistances } => {
                self.num_ports = resistances.len();
                self.reference_resistances = resistances.to_vec();
            }
            Packet::FrequencyAxis { frequencies } => {
                self.pending_freqs = frequencies.to_vec();
            }
            Packet::NetworkData { kind, ports, values } => {
                self.kind = Some(kind);
                let entries = 2 * ports * ports;
                for (freq, block) in self.pending_freqs.iter().zip(values.chunks_exact(entries)) {
                    let matrix = ParameterMatrix::from_shape_fn((ports, ports), |(i, j)| {
                        let at = 2 * (i * ports + j);
                        Complex64::from_polar(block[at], block[at + 1])
                    });
                    self.frequencies.push(*freq);
                    self.matrices.push(matrix);
                }
                self.pending_freqs.clear();
            }
            Packet::NoiseData { values } => {
                for block in values.chunks_exact(NOISE_ENTRIES) {
                    self.noise.push(NoisePoint {
                        frequency: Hertz(block[0]),
                        nf_min: block[1],
                        gamma_opt: Complex64::from_polar(block[2], block[3]),
                        rn: block[4],
                    });
                }
                self.pending_freqs.clear();
            }
        }
    }
}
