//! Random-access readers over reference genomes.
//!
//! Two readers answer the same queries:
//!
//! - [`IndexedFastaReader`]: an indexed FASTA on disk (plain, BGZF, or gzip),
//!   with a single-window cache for nearby repeated queries
//! - [`InMemoryReferenceStore`]: explicit `(contig, start, bases)` windows held
//!   in memory, for tests and small inputs
//!
//! Both implement [`ReferenceReader`]. Neither supports sequential iteration.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_reader::{IndexedFastaReader, Region, ReferenceReader};
//! use std::path::Path;
//!
//! let mut reader = IndexedFastaReader::from_path(Path::new("ref.fa"), None).unwrap();
//! let bases = reader.query(&Region::new("chrM", 0, 5)).unwrap();
//! println!("{}", String::from_utf8_lossy(&bases));
//! ```

use std::convert::Infallible;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::contig::ContigInfo;
use crate::core::region::Region;

pub mod cache;
pub mod in_memory;
pub mod indexed;
pub mod sequence_file;

pub use in_memory::InMemoryReferenceStore;
pub use indexed::{IndexedFastaReader, DEFAULT_CACHE_CAPACITY};

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid FASTA index: {0}")]
    Format(String),

    #[error("Unknown reference_name: {0}")]
    UnknownContig(String),

    #[error("Malformed query region={0}: start is after end")]
    InvalidRegion(Region),

    #[error(
        "Cannot query region={region}: only bases from start={start} to end={end} are available on chromosome={}",
        .region.reference_name
    )]
    OutOfBounds { region: Region, start: u64, end: u64 },

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Reader has been closed")]
    Closed,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capabilities shared by every reference reader
pub trait ReferenceReader {
    /// Return the bases in `region`, exactly `region.end - region.start` bytes
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidRegion` if `start > end`,
    /// `ReferenceError::UnknownContig` for an unknown name, and
    /// `ReferenceError::OutOfBounds` if the region leaves the available bases.
    fn query(&mut self, region: &Region) -> Result<Vec<u8>, ReferenceError>;

    /// Whether `query(region)` would succeed, without doing any I/O
    fn is_valid(&self, region: &Region) -> bool;

    /// Metadata for one contig
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownContig` if the name is not known.
    fn contig(&self, name: &str) -> Result<&ContigInfo, ReferenceError>;

    /// All contigs, in file (or construction) order
    fn contigs(&self) -> &[ContigInfo];

    /// Sequential iteration is never supported by a random-access reader
    ///
    /// # Errors
    ///
    /// Always returns `ReferenceError::Unsupported`.
    fn iterate(&self) -> Result<Infallible, ReferenceError> {
        Err(ReferenceError::Unsupported(
            "Can not iterate through a FASTA file",
        ))
    }
}

/// Blanket implementation for boxed trait objects
impl ReferenceReader for Box<dyn ReferenceReader> {
    fn query(&mut self, region: &Region) -> Result<Vec<u8>, ReferenceError> {
        (**self).query(region)
    }

    fn is_valid(&self, region: &Region) -> bool {
        (**self).is_valid(region)
    }

    fn contig(&self, name: &str) -> Result<&ContigInfo, ReferenceError> {
        (**self).contig(name)
    }

    fn contigs(&self) -> &[ContigInfo] {
        (**self).contigs()
    }

    fn iterate(&self) -> Result<Infallible, ReferenceError> {
        (**self).iterate()
    }
}
