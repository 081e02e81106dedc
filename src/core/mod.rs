//! Core value types shared by every reader.
//!
//! - [`ContigInfo`]: name, length and file position of one reference sequence
//! - [`Region`]: a half-open, 0-based `[start, end)` range on a named contig
//!
//! ## Coordinates
//!
//! All coordinates are 0-based and half-open, so `Region::new("chr1", 0, 4)`
//! names the first four bases of `chr1`. The textual form accepted by
//! [`Region::from_str`](std::str::FromStr) is the samtools convention
//! (1-based, inclusive): `chr1:1-4` is the same region.

pub mod contig;
pub mod region;
