//! FASTA index (.fai) loading using noodles.
//!
//! Format: `name\tlength\toffset\tline_bases\tline_width`, one line per contig
//! in the order the contigs appear in the FASTA file.
//!
//! The index turns a base coordinate into a byte offset without scanning the
//! FASTA: every line of a contig holds `line_bases` bases and occupies
//! `line_width` bytes (bases plus the line terminator), so base `c` lives at
//! `offset + (c / line_bases) * line_width + c % line_bases`.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::contig::ContigInfo;
use crate::core::region::Region;
use crate::reference::ReferenceError;
use crate::utils::validation::check_contig_limit;

/// Layout of one contig inside the FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaIndexEntry {
    pub name: String,
    /// Number of bases in the sequence
    pub length: u64,
    /// Byte offset of the first base
    pub offset: u64,
    /// Bases per full line
    pub line_bases: u64,
    /// Bytes per full line, including the line terminator
    pub line_width: u64,
}

impl FastaIndexEntry {
    pub fn new(
        name: impl Into<String>,
        length: u64,
        offset: u64,
        line_bases: u64,
        line_width: u64,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            offset,
            line_bases,
            line_width,
        }
    }

    /// Width of the line terminator (1 for `\n`, 2 for `\r\n`)
    #[must_use]
    pub fn terminator_width(&self) -> u64 {
        self.line_width - self.line_bases
    }

    /// Absolute byte offset of the base at 0-based coordinate `coord`.
    ///
    /// Only meaningful for entries that passed index validation and for
    /// `coord < length`; those never overflow.
    #[must_use]
    pub fn offset_of(&self, coord: u64) -> u64 {
        self.offset + (coord / self.line_bases) * self.line_width + coord % self.line_bases
    }

    /// Bytes occupied by the sequence, from its first base to its last base
    /// (the trailing terminator is not counted)
    #[must_use]
    pub fn span_bytes(&self) -> u64 {
        self.offset_of(self.length - 1) - self.offset + 1
    }

    /// One past the byte holding the last base, or `None` if it does not fit
    /// in a `u64`
    fn checked_end(&self) -> Option<u64> {
        let last = self.length.checked_sub(1)?;
        (last / self.line_bases)
            .checked_mul(self.line_width)?
            .checked_add(last % self.line_bases)?
            .checked_add(self.offset)?
            .checked_add(1)
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        if self.length == 0 {
            return Err(ReferenceError::Format(format!(
                "Contig '{}' has zero length",
                self.name
            )));
        }
        if self.line_bases == 0 || self.line_width == 0 {
            return Err(ReferenceError::Format(format!(
                "Contig '{}' has non-positive line length: line_bases={}, line_width={}",
                self.name, self.line_bases, self.line_width
            )));
        }
        if self.line_width < self.line_bases {
            return Err(ReferenceError::Format(format!(
                "Contig '{}' has line_width {} smaller than line_bases {}",
                self.name, self.line_width, self.line_bases
            )));
        }
        if self.checked_end().is_none() {
            return Err(ReferenceError::Format(format!(
                "Contig '{}' at offset {} with length {} extends past the largest file offset",
                self.name, self.offset, self.length
            )));
        }
        Ok(())
    }
}

/// Parsed FASTA index, in file order
#[derive(Debug, Clone)]
pub struct FastaIndex {
    entries: Vec<FastaIndexEntry>,
    contigs: Vec<ContigInfo>,
    by_name: HashMap<String, usize>,
}

impl FastaIndex {
    /// Load a `.fai` file
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` if the file does not exist,
    /// `ReferenceError::Format` if any record is malformed, and
    /// `ReferenceError::Io` for other read failures.
    pub fn load(path: &Path) -> Result<Self, ReferenceError> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReferenceError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ReferenceError::Io(e),
        })?;

        let index = Self::from_reader(BufReader::new(file))?;
        debug!(
            "Loaded FASTA index {} with {} contigs",
            path.display(),
            index.len()
        );
        Ok(index)
    }

    /// Parse `.fai` records from any buffered reader
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Format` if the text is not a valid index.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReferenceError> {
        use noodles::fasta;

        let index = fasta::fai::io::Reader::new(reader)
            .read_index()
            .map_err(|e| ReferenceError::Format(format!("Failed to parse FAI file: {e}")))?;

        let entries = index
            .as_ref()
            .iter()
            .map(|record| {
                FastaIndexEntry::new(
                    String::from_utf8_lossy(record.name()).to_string(),
                    record.length(),
                    record.offset(),
                    record.line_bases(),
                    record.line_width(),
                )
            })
            .collect();

        Self::from_entries(entries)
    }

    /// Parse `.fai` text
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Format` if the text is not a valid index.
    pub fn from_text(text: &str) -> Result<Self, ReferenceError> {
        Self::from_reader(text.as_bytes())
    }

    /// Build an index from entries already in file order
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Format` for empty input, a malformed entry, a
    /// duplicate name, or entries whose byte ranges are not laid out in
    /// increasing, non-overlapping order.
    pub fn from_entries(entries: Vec<FastaIndexEntry>) -> Result<Self, ReferenceError> {
        if entries.is_empty() {
            return Err(ReferenceError::Format(
                "No contigs found in FAI file".to_string(),
            ));
        }

        let mut contigs = Vec::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut previous: Option<&FastaIndexEntry> = None;

        for (i, entry) in entries.iter().enumerate() {
            if let Some(msg) = check_contig_limit(i) {
                return Err(ReferenceError::Format(msg));
            }

            entry.validate()?;

            if let Some(prev_end) = previous.and_then(FastaIndexEntry::checked_end) {
                if entry.offset < prev_end {
                    return Err(ReferenceError::Format(format!(
                        "Contig '{}' at offset {} overlaps the previous contig ending at offset {}",
                        entry.name, entry.offset, prev_end
                    )));
                }
            }

            if by_name.insert(entry.name.clone(), i).is_some() {
                return Err(ReferenceError::Format(format!(
                    "Duplicate contig name in FAI file: {}",
                    entry.name
                )));
            }

            // Bounded by MAX_CONTIGS above
            #[allow(clippy::cast_possible_truncation)]
            contigs.push(ContigInfo::new(entry.name.clone(), entry.length, i as u32));
            previous = Some(entry);
        }

        Ok(Self {
            entries,
            contigs,
            by_name,
        })
    }

    /// Look up the layout of a contig
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownContig` if the name is not indexed.
    pub fn entry(&self, name: &str) -> Result<&FastaIndexEntry, ReferenceError> {
        self.by_name
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ReferenceError::UnknownContig(name.to_string()))
    }

    /// Look up the contig metadata for a name
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownContig` if the name is not indexed.
    pub fn contig(&self, name: &str) -> Result<&ContigInfo, ReferenceError> {
        self.by_name
            .get(name)
            .map(|&i| &self.contigs[i])
            .ok_or_else(|| ReferenceError::UnknownContig(name.to_string()))
    }

    /// Inclusive byte range `[first_byte, last_byte]` holding bases `[start, end)`.
    ///
    /// The last byte is the one holding base `end - 1`, so a short final
    /// line never pulls in bytes past the end of the contig.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::UnknownContig` for an unknown name,
    /// `ReferenceError::InvalidRegion` for an empty or inverted range, or
    /// `ReferenceError::OutOfBounds` if `end` exceeds the contig length.
    pub fn byte_range_for(
        &self,
        name: &str,
        start: u64,
        end: u64,
    ) -> Result<(u64, u64), ReferenceError> {
        let entry = self.entry(name)?;
        if start >= end {
            return Err(ReferenceError::InvalidRegion(Region::new(
                name, start, end,
            )));
        }
        if end > entry.length {
            return Err(ReferenceError::OutOfBounds {
                region: Region::new(name, start, end),
                start: 0,
                end: entry.length,
            });
        }
        Ok((entry.offset_of(start), entry.offset_of(end - 1)))
    }

    /// Contigs in file order
    pub fn contigs(&self) -> &[ContigInfo] {
        &self.contigs
    }

    pub fn entries(&self) -> &[FastaIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Conventional index location: the FASTA path with `.fai` appended
#[must_use]
pub fn default_index_path(fasta_path: &Path) -> PathBuf {
    let mut path = fasta_path.as_os_str().to_owned();
    path.push(".fai");
    PathBuf::from(path)
}
