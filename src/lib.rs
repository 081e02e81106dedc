//! # ref-reader
//!
//! Random-access retrieval of bases from reference genomes.
//!
//! Given a contig name and a half-open, 0-based `[start, end)` range,
//! `ref-reader` returns the exact bases at that range from a multi-gigabyte
//! FASTA file without scanning it. The `.fai` index maps coordinates to byte
//! offsets, line-wrapped records are stitched back together, compressed
//! inputs are supported, and a single-window cache makes successive nearby
//! queries cheap.
//!
//! ## Features
//!
//! - **Indexed access**: byte offsets computed from the `.fai` line geometry
//! - **Compression**: BGZF with a `.gzi` index, or sequential gzip fallback
//! - **Caching**: configurable window (64K bases by default, 0 disables it)
//! - **In-memory references**: the same query contract for small inputs and tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_reader::{IndexedFastaReader, InMemoryReferenceStore, Region, ReferenceReader};
//! use std::path::Path;
//!
//! // Indexed FASTA on disk (index expected at ref.fa.fai)
//! let mut reader = IndexedFastaReader::from_path(Path::new("ref.fa"), None).unwrap();
//! let bases = reader.query(&Region::new("chr1", 10_000, 10_010)).unwrap();
//! assert_eq!(bases.len(), 10);
//!
//! // In-memory slice of chromosome 1 starting at position 10
//! let mut store = InMemoryReferenceStore::build([("1", 10, "ACGT")]).unwrap();
//! assert_eq!(store.query(&Region::new("1", 11, 12)).unwrap(), b"C");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contig and region value types
//! - [`parsing`]: FASTA index (`.fai`) parsing and offset arithmetic
//! - [`reference`]: Indexed and in-memory readers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod reference;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::contig::ContigInfo;
pub use crate::core::region::Region;
pub use crate::parsing::fai::{FastaIndex, FastaIndexEntry};
pub use crate::reference::{
    IndexedFastaReader, InMemoryReferenceStore, ReferenceError, ReferenceReader,
    DEFAULT_CACHE_CAPACITY,
};
