use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::region::Region;
use crate::parsing::fai::default_index_path;
use crate::reference::{IndexedFastaReader, ReferenceReader, DEFAULT_CACHE_CAPACITY};

#[derive(Args)]
pub struct QueryArgs {
    /// Indexed FASTA file (.fa, .fa.gz or .fa.bgz)
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Regions to fetch: name:beg-end (1-based, inclusive) or a bare contig name
    #[arg(required = true, num_args = 1..)]
    pub regions: Vec<String>,

    /// Path to the FASTA index (defaults to <FASTA>.fai)
    #[arg(long)]
    pub fai: Option<PathBuf>,

    /// Number of bases to read around each query (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_size: u64,
}

#[derive(Debug, Serialize)]
struct QueryResult {
    region: Region,
    bases: String,
}

/// Execute query subcommand
///
/// # Errors
///
/// Returns an error if the FASTA or its index cannot be opened, a region
/// cannot be parsed, or a query fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: QueryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let fai_path = args
        .fai
        .clone()
        .unwrap_or_else(|| default_index_path(&args.fasta));

    let mut reader = IndexedFastaReader::open(&args.fasta, &fai_path, args.cache_size)
        .with_context(|| format!("Failed to open {}", args.fasta.display()))?;

    let mut results = Vec::with_capacity(args.regions.len());
    for arg in &args.regions {
        let region = resolve_region(&reader, arg)?;
        let bases = reader
            .query(&region)
            .with_context(|| format!("Failed to query {arg}"))?;
        results.push(QueryResult {
            region,
            bases: String::from_utf8_lossy(&bases).into_owned(),
        });
    }

    match format {
        OutputFormat::Text => {
            for result in &results {
                println!(
                    ">{}:{}-{}",
                    result.region.reference_name,
                    result.region.start + 1,
                    result.region.end
                );
                println!("{}", result.bases);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Tsv => {
            println!("name\tstart\tend\tbases");
            for result in &results {
                println!(
                    "{}\t{}\t{}\t{}",
                    result.region.reference_name,
                    result.region.start,
                    result.region.end,
                    result.bases
                );
            }
        }
    }

    Ok(())
}

/// A bare contig name selects the whole contig; anything else must parse as
/// `name:beg-end`.
fn resolve_region(reader: &IndexedFastaReader, arg: &str) -> anyhow::Result<Region> {
    if let Ok(contig) = reader.contig(arg) {
        return Ok(Region::new(&contig.name, 0, contig.length));
    }
    arg.parse::<Region>()
        .with_context(|| format!("Invalid region '{arg}'"))
}
