//! Parsers for reference index files.
//!
//! - **FASTA index (.fai) files**: per-contig layout used to turn base
//!   coordinates into byte offsets
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_reader::parsing::fai::FastaIndex;
//! use std::path::Path;
//!
//! let index = FastaIndex::load(Path::new("ref.fa.fai")).unwrap();
//! let (first, last) = index.byte_range_for("chr1", 10_000, 10_010).unwrap();
//! ```
//!
//! ## Index columns
//!
//! | Column | Description |
//! |--------|-------------|
//! | NAME | Sequence name |
//! | LENGTH | Number of bases |
//! | OFFSET | Byte offset of the first base |
//! | LINEBASES | Bases per line |
//! | LINEWIDTH | Bytes per line, including the terminator |

pub mod fai;
