// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use clap::Parser;
use miette::{Context, IntoDiagnostic, Result};
use qviz::{Circuit, Config, Visualizer};
use std::{fs, path::PathBuf};

/// Renders a circuit description to an SVG diagram.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Circuit JSON file with `qubits` and `operations`.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Where to write the SVG. Prints to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of nesting levels to unfold before drawing.
    #[arg(long, default_value_t = 0)]
    render_depth: usize,

    /// Layout configuration JSON file. Omitted fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .into_diagnostic()
                .with_context(|| format!("could not read {}", path.display()))?;
            Config::from_json(&json)
                .into_diagnostic()
                .context("invalid configuration")?
        }
        None => Config::default(),
    };

    let json = fs::read_to_string(&cli.input)
        .into_diagnostic()
        .with_context(|| format!("could not read {}", cli.input.display()))?;
    let circuit: Circuit = serde_json::from_str(&json)
        .into_diagnostic()
        .context("invalid circuit")?;
    log::info!(
        "loaded {} qubits and {} operations",
        circuit.qubits.len(),
        circuit.operations.len()
    );

    let mut visualizer = Visualizer::new(&circuit, config);
    let svg = visualizer.draw(cli.render_depth)?.svg.to_string();

    match &cli.output {
        Some(path) => fs::write(path, svg)
            .into_diagnostic()
            .with_context(|| format!("could not write {}", path.display()))?,
        None => println!("{svg}"),
    }
    Ok(())
}
