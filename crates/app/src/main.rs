use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod formula;
mod process;

use formula::Formula;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerline",
    version,
    about = "Convert bank exports into budgeting-import CSV files"
)]
struct Cli {
    /// TOML formula naming the bank format and the output/archive locations
    formula: PathBuf,

    /// Bank export files, processed in the order given
    #[arg(required = true)]
    infiles: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let formula = Formula::load(&cli.formula)
        .with_context(|| format!("loading formula {}", cli.formula.display()))?;
    tracing::debug!(format = ?formula.format, prefix = %formula.outprefix, "formula loaded");

    for infile in &cli.infiles {
        let report = process::process_file(&formula, infile)
            .with_context(|| format!("processing {}", infile.display()))?;
        println!("{report}");
    }
    Ok(())
}
