use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pixie::{disassemble, listing, load_words, parse_words, LabelTable, ListingConfig, RawWord};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Disassembler for pixie programs",
    override_usage = "dedust <program>\n       dedust -i <instruction> [<instruction>]"
)]
#[command(group(ArgGroup::new("source").required(true).args(["program", "inline"])))]
struct Cli {
    /// Program file: decimal words separated by whitespace
    #[arg(value_name = "PROGRAM")]
    program: Option<PathBuf>,
    /// Decode the given decimal words instead of reading a file
    #[arg(short = 'i', value_name = "WORD", num_args = 1.., allow_negative_numbers = true)]
    inline: Vec<String>,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Import labels from JSON (as written by `dust --labels-out`)
    #[arg(long, value_name = "FILE")]
    labels: Option<PathBuf>,
    /// Hide the raw words column
    #[arg(long)]
    no_raw: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn read_source(cli: &Cli) -> Result<Vec<RawWord>> {
    match &cli.program {
        Some(path) => load_words(path),
        None => parse_words(&cli.inline.join(" ")).context("parsing -i words"),
    }
}

fn read_labels(path: &Path) -> Result<LabelTable> {
    let txt = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parsing labels from {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let words = read_source(&cli)?;
    let labels = cli.labels.as_deref().map(read_labels).transpose()?;
    let cfg = ListingConfig { show_raw: !cli.no_raw };

    match cli.format {
        OutputFormat::Text => print!("{}", listing(&words[..], labels.as_ref(), &cfg)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&disassemble(&words[..]))?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_words_are_decimal() {
        let cli = Cli::try_parse_from(["dedust", "-i", "7", "5", "257"]).unwrap();
        assert_eq!(read_source(&cli).unwrap(), vec![7, 5, 257]);
        let cli = Cli::try_parse_from(["dedust", "-i", "0x7"]).unwrap();
        assert!(read_source(&cli).is_err());
        let cli = Cli::try_parse_from(["dedust", "-i", "7", "70000", "-1"]).unwrap();
        assert_eq!(read_source(&cli).unwrap(), vec![7, 70000, -1]);
    }

    #[test]
    fn needs_a_source() {
        assert!(Cli::try_parse_from(["dedust"]).is_err());
        assert!(Cli::try_parse_from(["dedust", "prog.pixie", "-i", "7"]).is_err());
        let cli = Cli::try_parse_from(["dedust", "prog.pixie", "--format", "json"]).unwrap();
        assert_eq!(cli.program, Some(PathBuf::from("prog.pixie")));
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn labels_round_trip_through_json() {
        let assembly = pixie::assemble("start:\nmov r0 1\nend:\n").unwrap();
        let path = std::env::temp_dir().join(format!("dedust_labels_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string_pretty(&assembly.labels).unwrap()).unwrap();
        let labels = read_labels(&path).unwrap();
        assert_eq!(labels, assembly.labels);
        let _ = std::fs::remove_file(&path);
    }
}
