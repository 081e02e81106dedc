//! Command-line interface for ref-reader.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **query**: Print the bases of one or more regions of an indexed FASTA
//! - **contigs**: List the contigs of an indexed FASTA
//!
//! ## Usage
//!
//! ```text
//! # Fetch 10 bases (1-based, inclusive coordinates as in samtools faidx)
//! ref-reader query ref.fa chr1:10001-10010
//!
//! # Whole contig, JSON output
//! ref-reader query ref.fa chrM --format json
//!
//! # Compressed FASTA with an index at a non-standard location
//! ref-reader query ref.fa.gz chr2:1-100 --fai indexes/ref.fa.fai
//!
//! # List contigs as TSV
//! ref-reader contigs ref.fa --format tsv
//! ```

use clap::{Parser, Subcommand};

pub mod contigs;
pub mod query;

#[derive(Parser)]
#[command(name = "ref-reader")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Fetch bases from indexed reference FASTA files")]
#[command(
    long_about = "ref-reader fetches bases from an indexed reference FASTA without scanning it.\n\nThe FASTA may be plain text, BGZF-compressed with a .gzi index, or gzip-compressed (read sequentially). The .fai index is expected next to the FASTA unless --fai is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the bases of one or more regions
    Query(query::QueryArgs),

    /// List the contigs in a FASTA index
    Contigs(contigs::ContigsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
