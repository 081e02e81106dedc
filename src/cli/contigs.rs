use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::fai::{default_index_path, FastaIndex};

#[derive(Args)]
pub struct ContigsArgs {
    /// Indexed FASTA file; only its index is read
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Path to the FASTA index (defaults to <FASTA>.fai)
    #[arg(long)]
    pub fai: Option<PathBuf>,
}

/// Execute contigs subcommand
///
/// # Errors
///
/// Returns an error if the index cannot be read or parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ContigsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let fai_path = args
        .fai
        .clone()
        .unwrap_or_else(|| default_index_path(&args.fasta));

    let index = FastaIndex::load(&fai_path)
        .with_context(|| format!("Failed to load index {}", fai_path.display()))?;

    match format {
        OutputFormat::Text => {
            let width = index
                .contigs()
                .iter()
                .map(|c| c.name.len())
                .max()
                .unwrap_or(0)
                .max("Name".len());
            println!("{:<width$}  {:>12}  {:>8}", "Name", "Length", "Position");
            for contig in index.contigs() {
                println!(
                    "{:<width$}  {:>12}  {:>8}",
                    contig.name, contig.length, contig.position_in_file
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(index.contigs())?);
        }
        OutputFormat::Tsv => {
            println!("name\tlength\tposition_in_file");
            for contig in index.contigs() {
                println!(
                    "{}\t{}\t{}",
                    contig.name, contig.length, contig.position_in_file
                );
            }
        }
    }

    Ok(())
}
