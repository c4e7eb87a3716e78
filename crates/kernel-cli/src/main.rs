//! SnP-Kernel CLI: inspect and convert Touchstone network-parameter files.
//!
//! This is the main entry point for the snp-kernel tool.

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lib_touchstone::{format_match, SweepCollector, TouchstoneParser};
use lib_types::NetworkData;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Chunk size used when feeding files to the streaming parser.
const CHUNK_SIZE: usize = 4096;

#[derive(Parser)]
#[command(name = "snp-kernel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    Text,
    #[default]
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a Touchstone file and print a summary
    Parse {
        /// Path to the .sNp file
        file: PathBuf,
    },

    /// Parse a Touchstone file and write the sweep to another format
    Export {
        /// Path to the .sNp file
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Score whether a file looks like Touchstone input
    Probe {
        /// Path to the candidate file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Parse { file } => {
            let network = read_network(&file)?;
            print_summary(&network);
        }
        Commands::Export { file, output, format } => {
            let network = read_network(&file)?;
            output::write_network(&network, &output, format)?;
            tracing::info!("Wrote {:?}", output);
        }
        Commands::Probe { file } => {
            probe(&file);
        }
    }

    Ok(())
}

/// Stream a Touchstone file through the parser in bounded chunks and
/// collect the decoded sweep.
fn read_network(path: &Path) -> Result<NetworkData> {
    tracing::info!("Parsing Touchstone file: {:?}", path);

    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let mut parser = TouchstoneParser::new();
    let mut collector = SweepCollector::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        parser
            .receive(&chunk[..n], &mut collector)
            .with_context(|| format!("Failed to parse {:?}", path))?;
    }
    parser
        .end(&mut collector)
        .with_context(|| format!("Failed to parse {:?}", path))?;

    Ok(collector.into_network())
}

fn print_summary(network: &NetworkData) {
    println!("Touchstone File");
    println!("  Ports: {}", network.num_ports);
    println!("  Parameters: {}", network.kind.label());
    println!("  Frequency points: {}", network.len());

    if let Some((f_min, f_max)) = network.frequency_range() {
        println!(
            "  Frequency range: {:.6} MHz - {:.6} GHz",
            f_min.as_mhz(),
            f_max.as_ghz()
        );
    }

    let references: Vec<String> = network
        .reference_resistances
        .iter()
        .map(|r| format!("{}", r.0))
        .collect();
    println!("  References (ohms): [{}]", references.join(", "));

    if !network.noise.is_empty() {
        println!("  Noise points: {}", network.noise.len());
    }

    if network.num_ports > 1 {
        if network.is_reciprocal(1e-9) {
            println!("  Reciprocal: Yes");
        } else {
            println!("  Reciprocal: No");
        }
    }
}

fn probe(path: &Path) {
    let confidence = format_match(path.to_str());
    match confidence {
        Some(score) => println!("{:?}: Touchstone, confidence {}/100", path, score),
        None => println!("{:?}: not recognized as Touchstone", path),
    }
}
