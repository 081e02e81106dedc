//! Reference bases held in memory.
//!
//! Each contig is a window of bases that need not start at zero: the entry
//! `("1", 10, "ACGT")` holds bases 10..14 of chromosome 1, so querying
//! `1:11-12` (0-based, half-open) returns `C`. This makes it cheap to keep a
//! small slice of a large chromosome without loading the whole sequence.

use std::collections::HashMap;

use crate::core::contig::{find_contig, ContigInfo};
use crate::core::region::Region;
use crate::reference::{ReferenceError, ReferenceReader};
use crate::utils::validation::{check_contig_limit, check_region_bounds};

#[derive(Debug, Clone, PartialEq, Eq)]
struct InMemoryChromosome {
    start: u64,
    end: u64,
    bases: Vec<u8>,
}

/// Immutable set of in-memory base windows, keyed by contig name.
///
/// Queries take `&self`, so a store can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct InMemoryReferenceStore {
    chromosomes: HashMap<String, InMemoryChromosome>,
    contigs: Vec<ContigInfo>,
}

impl InMemoryReferenceStore {
    /// Build a store from `(name, start, bases)` windows.
    ///
    /// The reported contig length is `start + bases.len()`, the extent the
    /// window declares, not the number of bases held.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidArgument` if a window has no bases, a
    /// name repeats, or there are too many contigs.
    pub fn build<I, N, B>(chromosomes: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = (N, u64, B)>,
        N: Into<String>,
        B: Into<Vec<u8>>,
    {
        let mut map = HashMap::new();
        let mut contigs = Vec::new();

        for (i, (name, start, bases)) in chromosomes.into_iter().enumerate() {
            let name = name.into();
            let bases = bases.into();

            if let Some(msg) = check_contig_limit(i) {
                return Err(ReferenceError::InvalidArgument(msg));
            }
            if map.contains_key(&name) {
                return Err(ReferenceError::InvalidArgument(format!(
                    "Duplicate chromosome={name} detected"
                )));
            }
            if bases.is_empty() {
                return Err(ReferenceError::InvalidArgument(format!(
                    "Bases must contain at least one base for chromosome={name}"
                )));
            }

            let end = start.checked_add(bases.len() as u64).ok_or_else(|| {
                ReferenceError::InvalidArgument(format!(
                    "Window for chromosome={name} at start={start} extends past the largest coordinate"
                ))
            })?;
            // Bounded by MAX_CONTIGS above
            #[allow(clippy::cast_possible_truncation)]
            contigs.push(ContigInfo::new(name.clone(), end, i as u32));
            map.insert(name, InMemoryChromosome { start, end, bases });
        }

        Ok(Self {
            chromosomes: map,
            contigs,
        })
    }

    /// Borrow the bases of `region` without copying
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::InvalidRegion` if `start > end`,
    /// `ReferenceError::UnknownContig` for an unknown name, or
    /// `ReferenceError::OutOfBounds` if the region leaves the held window.
    pub fn fetch(&self, region: &Region) -> Result<&[u8], ReferenceError> {
        let chrom = self.lookup_chromosome(region)?;
        // Offsets are bounded by the held window's length
        #[allow(clippy::cast_possible_truncation)]
        let (from, to) = (
            (region.start - chrom.start) as usize,
            (region.end - chrom.start) as usize,
        );
        Ok(&chrom.bases[from..to])
    }

    fn lookup_chromosome(&self, region: &Region) -> Result<&InMemoryChromosome, ReferenceError> {
        if !region.is_well_formed() {
            return Err(ReferenceError::InvalidRegion(region.clone()));
        }
        let chrom = self
            .chromosomes
            .get(&region.reference_name)
            .ok_or_else(|| ReferenceError::UnknownContig(region.reference_name.clone()))?;
        check_region_bounds(region, chrom.start, chrom.end)?;
        Ok(chrom)
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

impl ReferenceReader for InMemoryReferenceStore {
    fn query(&mut self, region: &Region) -> Result<Vec<u8>, ReferenceError> {
        self.fetch(region).map(<[u8]>::to_vec)
    }

    fn is_valid(&self, region: &Region) -> bool {
        self.lookup_chromosome(region).is_ok()
    }

    fn contig(&self, name: &str) -> Result<&ContigInfo, ReferenceError> {
        find_contig(&self.contigs, name)
            .ok_or_else(|| ReferenceError::UnknownContig(name.to_string()))
    }

    fn contigs(&self) -> &[ContigInfo] {
        &self.contigs
    }
}

impl std::fmt::Display for InMemoryReferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let windows: Vec<String> = self
            .contigs
            .iter()
            .filter_map(|contig| {
                self.chromosomes.get(&contig.name).map(|chrom| {
                    format!(
                        "chrom={} start={} end={}",
                        contig.name, chrom.start, chrom.end
                    )
                })
            })
            .collect();
        write!(f, "InMemoryReferenceStore(contigs={})", windows.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryReferenceStore {
        InMemoryReferenceStore::build([("1", 10, "ACGT"), ("2", 0, "GGGCCC")]).unwrap()
    }

    #[test]
    fn test_query_within_window() {
        let mut store = store();
        assert_eq!(store.query(&Region::new("1", 11, 12)).unwrap(), b"C");
        assert_eq!(store.query(&Region::new("1", 10, 14)).unwrap(), b"ACGT");
        assert_eq!(store.query(&Region::new("2", 2, 4)).unwrap(), b"GC");
        assert_eq!(store.query(&Region::new("1", 12, 12)).unwrap(), b"");
    }

    #[test]
    fn test_query_outside_window() {
        let mut store = store();
        assert!(matches!(
            store.query(&Region::new("1", 9, 10)),
            Err(ReferenceError::OutOfBounds { start: 10, end: 14, .. })
        ));
        assert!(matches!(
            store.query(&Region::new("1", 13, 15)),
            Err(ReferenceError::OutOfBounds { .. })
        ));
        // Nominally inside [0, length) but not held
        assert!(!store.is_valid(&Region::new("1", 0, 1)));
    }

    #[test]
    fn test_query_errors() {
        let mut store = store();
        assert!(matches!(
            store.query(&Region::new("chrZ", 0, 1)),
            Err(ReferenceError::UnknownContig(name)) if name == "chrZ"
        ));
        assert!(matches!(
            store.query(&Region::new("1", 5, 3)),
            Err(ReferenceError::InvalidRegion(_))
        ));
        assert!(matches!(
            store.iterate(),
            Err(ReferenceError::Unsupported(_))
        ));
    }

    #[test]
    fn test_contig_length_reports_window_end() {
        let store = store();
        let contig = store.contig("1").unwrap();
        assert_eq!(contig.length, 14);
        assert_eq!(contig.position_in_file, 0);
        assert_eq!(store.contig("2").unwrap().position_in_file, 1);
        assert!(matches!(
            store.contig("3"),
            Err(ReferenceError::UnknownContig(_))
        ));
    }

    #[test]
    fn test_is_valid_matches_query() {
        let mut store = store();
        let regions = [
            Region::new("1", 10, 14),
            Region::new("1", 9, 12),
            Region::new("1", 12, 11),
            Region::new("2", 6, 6),
            Region::new("2", 6, 7),
            Region::new("X", 0, 1),
        ];
        for region in &regions {
            assert_eq!(store.is_valid(region), store.query(region).is_ok(), "{region}");
        }
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let result = InMemoryReferenceStore::build([("1", 0, "A"), ("1", 0, "C")]);
        assert!(matches!(result, Err(ReferenceError::InvalidArgument(_))));
    }

    #[test]
    fn test_build_rejects_empty_bases() {
        let result = InMemoryReferenceStore::build([("1", 0, "")]);
        assert!(matches!(result, Err(ReferenceError::InvalidArgument(_))));
    }

    #[test]
    fn test_build_rejects_window_past_max_coordinate() {
        let result = InMemoryReferenceStore::build([("1", u64::MAX, "ACGT")]);
        assert!(matches!(result, Err(ReferenceError::InvalidArgument(_))));

        // The last representable window still builds
        let store = InMemoryReferenceStore::build([("1", u64::MAX - 4, "ACGT")]).unwrap();
        assert_eq!(store.contigs()[0].length, u64::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            store().to_string(),
            "InMemoryReferenceStore(contigs=chrom=1 start=10 end=14, chrom=2 start=0 end=6)"
        );
    }
}
