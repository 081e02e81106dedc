//! Centralized validation and helper functions.

use crate::core::region::Region;
use crate::reference::ReferenceError;

/// Maximum number of contigs allowed in a single index (DOS protection)
pub const MAX_CONTIGS: usize = 100_000;

/// Check if adding another contig would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new contig.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if let Some(msg) = check_contig_limit(entries.len()) {
///     return Err(ReferenceError::Format(msg));
/// }
/// entries.push(entry); // Safe to add
/// ```
#[must_use]
pub fn check_contig_limit(count: usize) -> Option<String> {
    if count >= MAX_CONTIGS {
        Some(format!(
            "Too many contigs: adding another would exceed maximum of {MAX_CONTIGS}"
        ))
    } else {
        None
    }
}

/// Check that a region is well formed and lies inside `[start, end)`.
///
/// The contig name is assumed to have been resolved already; this only
/// checks shape and extent.
///
/// # Errors
///
/// Returns `ReferenceError::InvalidRegion` if `region.start > region.end`, or
/// `ReferenceError::OutOfBounds` if the region leaves `[start, end)`.
pub fn check_region_bounds(region: &Region, start: u64, end: u64) -> Result<(), ReferenceError> {
    if !region.is_well_formed() {
        return Err(ReferenceError::InvalidRegion(region.clone()));
    }
    if region.start < start || region.end > end {
        return Err(ReferenceError::OutOfBounds {
            region: region.clone(),
            start,
            end,
        });
    }
    Ok(())
}

/// Check if the path names a compressed file by its suffix
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &std::path::Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}
