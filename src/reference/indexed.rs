//! Indexed FASTA reader with a single-window base cache.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::core::contig::ContigInfo;
use crate::core::region::Region;
use crate::parsing::fai::{default_index_path, FastaIndex, FastaIndexEntry};
use crate::reference::cache::{CachedWindow, RegionCache};
use crate::reference::sequence_file::{SequenceFile, SequenceFileKind};
use crate::reference::{ReferenceError, ReferenceReader};
use crate::utils::validation::check_region_bounds;

/// Number of bases fetched on a cache miss unless configured otherwise.
///
/// Typical windowed scans ask for tens to low hundreds of bases at a time,
/// so one 64K window absorbs hundreds of consecutive queries.
pub const DEFAULT_CACHE_CAPACITY: u64 = 64 * 1024;

struct OpenState {
    file: SequenceFile,
    cache: RegionCache,
}

/// Random-access reader over an indexed FASTA file.
///
/// A query consults the cached window first; on a miss it reads a window of
/// at least `cache_capacity` bases around the region, strips the line
/// terminators and keeps the result for the next query. A capacity of zero
/// disables caching.
///
/// The reader is not meant to be queried from several threads at once. Use
/// [`IndexedFastaReader::with_index`] to open one reader per thread over a
/// shared, already-parsed index.
pub struct IndexedFastaReader {
    path: PathBuf,
    index: Arc<FastaIndex>,
    cache_capacity: u64,
    state: Option<OpenState>,
}

impl IndexedFastaReader {
    /// Open `fasta_path` using the index at `<fasta_path>.fai`.
    ///
    /// `cache_capacity` defaults to [`DEFAULT_CACHE_CAPACITY`] bases.
    ///
    /// # Errors
    ///
    /// See [`IndexedFastaReader::open`].
    pub fn from_path(
        fasta_path: &Path,
        cache_capacity: Option<u64>,
    ) -> Result<Self, ReferenceError> {
        Self::open(
            fasta_path,
            &default_index_path(fasta_path),
            cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
        )
    }

    /// Open a FASTA file with an explicit index path
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` if either file is missing,
    /// `ReferenceError::Format` if the index cannot be parsed, and
    /// `ReferenceError::Io` for other I/O failures.
    pub fn open(
        fasta_path: &Path,
        index_path: &Path,
        cache_capacity: u64,
    ) -> Result<Self, ReferenceError> {
        let index = FastaIndex::load(index_path)?;
        Self::with_index(fasta_path, Arc::new(index), cache_capacity)
    }

    /// Open a FASTA file over an index that has already been parsed
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` if the FASTA file is missing, and
    /// `ReferenceError::Io` for other I/O failures.
    pub fn with_index(
        fasta_path: &Path,
        index: Arc<FastaIndex>,
        cache_capacity: u64,
    ) -> Result<Self, ReferenceError> {
        let file = SequenceFile::open(fasta_path)?;
        debug!(
            "Opened {} ({:?}, {} contigs, cache capacity {cache_capacity})",
            fasta_path.display(),
            file.kind(),
            index.len(),
        );

        Ok(Self {
            path: fasta_path.to_path_buf(),
            index,
            cache_capacity,
            state: Some(OpenState {
                file,
                cache: RegionCache::new(),
            }),
        })
    }

    /// Release the file handle and cached bases. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.state.take().is_some() {
            debug!("Closed {}", self.path.display());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed index, shareable with further readers
    pub fn index(&self) -> &Arc<FastaIndex> {
        &self.index
    }

    pub fn cache_capacity(&self) -> u64 {
        self.cache_capacity
    }

    /// Backend used to read the FASTA, or `None` once closed
    pub fn sequence_file_kind(&self) -> Option<SequenceFileKind> {
        self.state.as_ref().map(|s| s.file.kind())
    }

    /// The currently cached window, if any
    pub fn cached_window(&self) -> Option<&CachedWindow> {
        self.state.as_ref().and_then(|s| s.cache.window())
    }

    fn resolve(&self, region: &Region) -> Result<&FastaIndexEntry, ReferenceError> {
        if self.state.is_none() {
            return Err(ReferenceError::Closed);
        }
        if !region.is_well_formed() {
            return Err(ReferenceError::InvalidRegion(region.clone()));
        }
        let entry = self.index.entry(&region.reference_name)?;
        check_region_bounds(region, 0, entry.length)?;
        Ok(entry)
    }
}

impl ReferenceReader for IndexedFastaReader {
    fn query(&mut self, region: &Region) -> Result<Vec<u8>, ReferenceError> {
        let entry = self.resolve(region)?.clone();
        if region.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.state.as_mut().ok_or(ReferenceError::Closed)?;
        if let Some(bases) = state.cache.lookup(region) {
            return Ok(bases.to_vec());
        }

        let (start, end) = RegionCache::refresh_for_miss(region, self.cache_capacity, entry.length);
        debug!(
            "Cache miss for {region}; reading {}:{start}-{end}",
            region.reference_name
        );

        let (first_byte, last_byte) = self.index.byte_range_for(&entry.name, start, end)?;
        let raw = state.file.read_range(first_byte, last_byte)?;
        let bases = strip_line_terminators(&raw, &entry, start, end - start)?;

        // Both offsets are bounded by the window length held in memory
        #[allow(clippy::cast_possible_truncation)]
        let requested = bases[(region.start - start) as usize..(region.end - start) as usize].to_vec();

        if self.cache_capacity > 0 {
            state.cache.store(CachedWindow::new(entry.name, start, bases));
        }

        Ok(requested)
    }

    fn is_valid(&self, region: &Region) -> bool {
        self.resolve(region).is_ok()
    }

    fn contig(&self, name: &str) -> Result<&ContigInfo, ReferenceError> {
        if self.is_closed() {
            return Err(ReferenceError::Closed);
        }
        self.index.contig(name)
    }

    /// Empty once the reader is closed
    fn contigs(&self) -> &[ContigInfo] {
        if self.is_closed() {
            return &[];
        }
        self.index.contigs()
    }

    fn iterate(&self) -> Result<Infallible, ReferenceError> {
        if self.is_closed() {
            return Err(ReferenceError::Closed);
        }
        Err(ReferenceError::Unsupported(
            "Can not iterate through a FASTA file",
        ))
    }
}

impl std::fmt::Debug for IndexedFastaReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedFastaReader")
            .field("path", &self.path)
            .field("contigs", &self.index.len())
            .field("cache_capacity", &self.cache_capacity)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Drop line terminators from `raw`, the bytes holding `count` bases of
/// `entry` starting at base `start`.
fn strip_line_terminators(
    raw: &[u8],
    entry: &FastaIndexEntry,
    start: u64,
    count: u64,
) -> Result<Vec<u8>, ReferenceError> {
    let terminator = entry.terminator_width();
    let mut bases = Vec::with_capacity(raw.len());
    let mut column = start % entry.line_bases;
    let mut remaining = count;
    let mut pos: u64 = 0;

    while remaining > 0 {
        let take = (entry.line_bases - column).min(remaining);
        let chunk = usize::try_from(pos)
            .ok()
            .zip(usize::try_from(pos + take).ok())
            .and_then(|(from, to)| raw.get(from..to))
            .ok_or_else(|| {
                ReferenceError::Format(format!(
                    "Sequence bytes for '{}' do not match the index layout",
                    entry.name
                ))
            })?;
        bases.extend_from_slice(chunk);

        remaining -= take;
        pos += take + terminator;
        column = 0;
    }

    Ok(bases)
}
