use serde::{Deserialize, Serialize};

/// A single contig/sequence in a reference genome
///
/// Handed to external metadata consumers as-is; the reader never interprets
/// anything but `name` and `length`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContigInfo {
    /// Sequence name (first field of a `.fai` line)
    pub name: String,

    /// Number of bases in the sequence
    pub length: u64,

    /// Zero-based position of this contig in the FASTA file (or in the
    /// construction list for in-memory references)
    pub position_in_file: u32,
}

impl ContigInfo {
    pub fn new(name: impl Into<String>, length: u64, position_in_file: u32) -> Self {
        Self {
            name: name.into(),
            length,
            position_in_file,
        }
    }
}

impl std::fmt::Display for ContigInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (length={}, position={})",
            self.name, self.length, self.position_in_file
        )
    }
}

/// Find a contig by exact name
pub fn find_contig<'a>(contigs: &'a [ContigInfo], name: &str) -> Option<&'a ContigInfo> {
    contigs.iter().find(|c| c.name == name)
}
