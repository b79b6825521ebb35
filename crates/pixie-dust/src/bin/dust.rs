use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assembler for pixie programs")]
struct Opts {
    /// Source file (one instruction, data line or label per line)
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Program file to write (decimal words separated by spaces)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
    /// Also export the label table as JSON ({ ":name": { offset, line } })
    #[arg(long, value_name = "FILE")]
    labels_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(&Opts::parse())
}

/// Assemble `opts.input` and write the program. Nothing is written unless the
/// whole source assembles.
fn run(opts: &Opts) -> Result<()> {
    let text = fs::read_to_string(&opts.input).with_context(|| format!("reading {}", opts.input.display()))?;
    let assembly = pixie::assemble(&text).with_context(|| format!("assembling {}", opts.input.display()))?;

    assembly.program.store(&opts.output)?;
    if let Some(path) = &opts.labels_out {
        let json = serde_json::to_string_pretty(&assembly.labels)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    info!(words = assembly.program.len(), labels = assembly.labels.len(), output = %opts.output.display(), "wrote program");
    Ok(())
}
