//! Sweep output formatting and writing.

use crate::OutputFormat;
use anyhow::Result;
use lib_types::NetworkData;
use std::io::Write;
use std::path::Path;

/// Write a collected network sweep to `path` in the requested format.
pub fn write_network(network: &NetworkData, path: &Path, format: OutputFormat) -> Result<()> {
    let mut f = std::fs::File::create(path)?;

    match format {
        OutputFormat::Text => write_text(network, &mut f)?,
        OutputFormat::Csv => write_csv(network, &mut f)?,
        OutputFormat::Json => write_json(network, &mut f)?,
    }

    Ok(())
}

fn write_text(network: &NetworkData, f: &mut impl Write) -> Result<()> {
    writeln!(f, "Network Parameters")?;
    writeln!(f, "==================")?;
    writeln!(f, "Kind:   {}", network.kind.label())?;
    writeln!(f, "Ports:  {}", network.num_ports)?;
    writeln!(f, "Points: {}", network.len())?;

    for (idx, freq) in network.frequencies.iter().enumerate() {
        writeln!(f, "\nf = {:.6e} Hz", freq.0)?;
        let m = &network.matrices[idx];
        for i in 0..network.num_ports {
            let row: Vec<String> = (0..network.num_ports)
                .map(|j| format!("{:+.6e}{:+.6e}j", m[[i, j]].re, m[[i, j]].im))
                .collect();
            writeln!(f, "  {}", row.join("  "))?;
        }
    }

    if !network.noise.is_empty() {
        writeln!(f, "\nNoise Data")?;
        writeln!(f, "----------")?;
        for point in &network.noise {
            writeln!(
                f,
                "f = {:.6e} Hz  NFmin = {:.4}  |Gopt| = {:.4}  arg(Gopt) = {:.4} rad  Rn = {:.4}",
                point.frequency.0, point.nf_min, point.gamma_opt.norm(),
                point.gamma_opt.arg(), point.rn
            )?;
        }
    }

    Ok(())
}

fn write_csv(network: &NetworkData, f: &mut impl Write) -> Result<()> {
    let kind = network.kind.label().to_lowercase();

    let mut header = vec!["frequency_hz".to_string()];
    for i in 0..network.num_ports {
        for j in 0..network.num_ports {
            header.push(format!("{}{}{}_re", kind, i + 1, j + 1));
            header.push(format!("{}{}{}_im", kind, i + 1, j + 1));
        }
    }
    writeln!(f, "{}", header.join(","))?;

    for (idx, freq) in network.frequencies.iter().enumerate() {
        let m = &network.matrices[idx];
        let mut row = vec![format!("{}", freq.0)];
        for i in 0..network.num_ports {
            for j in 0..network.num_ports {
                row.push(format!("{}", m[[i, j]].re));
                row.push(format!("{}", m[[i, j]].im));
            }
        }
        writeln!(f, "{}", row.join(","))?;
    }

    if !network.noise.is_empty() {
        writeln!(f)?;
        writeln!(f, "frequency_hz,nf_min,gamma_opt_mag,gamma_opt_rad,rn")?;
        for point in &network.noise {
            writeln!(
                f,
                "{},{},{},{},{}",
                point.frequency.0,
                point.nf_min,
                point.gamma_opt.norm(),
                point.gamma_opt.arg(),
                point.rn
            )?;
        }
    }

    Ok(())
}

fn write_json(network: &NetworkData, f: &mut impl Write) -> Result<()> {
    let matrices: Vec<serde_json::Value> = network
        .matrices
        .iter()
        .map(|m| {
            let rows: Vec<Vec<[f64; 2]>> = (0..network.num_ports)
                .map(|i| {
                    (0..network.num_ports)
                        .map(|j| [m[[i, j]].re, m[[i, j]].im])
                        .collect()
                })
                .collect();
            serde_json::json!(rows)
        })
        .collect();

    let noise: Vec<serde_json::Value> = network
        .noise
        .iter()
        .map(|point| {
            serde_json::json!({
                "frequency_hz": point.frequency.0,
                "nf_min": point.nf_min,
                "gamma_opt": [point.gamma_opt.re, point.gamma_opt.im],
                "rn": point.rn,
            })
        })
        .collect();

    let json = serde_json::json!({
        "kind": network.kind.label(),
        "num_ports": network.num_ports,
        "reference_resistances": network.reference_resistances.iter().map(|r| r.0).collect::<Vec<_>>(),
        "frequencies_hz": network.frequencies.iter().map(|h| h.0).collect::<Vec<_>>(),
        "matrices": matrices,
        "noise": noise,
    });

    writeln!(f, "{}", serde_json::to_string_pretty(&json)?)?;
    Ok(())
}
