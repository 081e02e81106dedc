//! Single-window cache of recently read bases.
//!
//! Access patterns against a reference are dominated by locality along one
//! contig at a time, so one window is enough. A miss replaces the window
//! unconditionally.

use crate::core::region::Region;

/// The most recently materialized contiguous base range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedWindow {
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
    pub bases: Vec<u8>,
}

impl CachedWindow {
    pub fn new(reference_name: impl Into<String>, start: u64, bases: Vec<u8>) -> Self {
        let end = start + bases.len() as u64;
        Self {
            reference_name: reference_name.into(),
            start,
            end,
            bases,
        }
    }

    fn covers(&self, region: &Region) -> bool {
        region.is_within(&self.reference_name, self.start, self.end)
    }
}

#[derive(Debug, Default)]
pub struct RegionCache {
    window: Option<CachedWindow>,
}

impl RegionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bases for `region` if the cached window covers it entirely
    pub fn lookup(&self, region: &Region) -> Option<&[u8]> {
        let window = self.window.as_ref().filter(|w| w.covers(region))?;
        // Offsets are bounded by the window's length, which fits in memory
        #[allow(clippy::cast_possible_truncation)]
        let (from, to) = (
            (region.start - window.start) as usize,
            (region.end - window.start) as usize,
        );
        Some(&window.bases[from..to])
    }

    /// Base window `[start, end)` to fetch after a miss on `region`.
    ///
    /// The window holds `max(region.len(), capacity)` bases starting at
    /// `region.start`. Near the end of the contig it is shifted left so it
    /// still fits in `[0, contig_length)` and still covers `region`.
    /// A capacity of zero fetches exactly `region`.
    #[must_use]
    pub fn refresh_for_miss(region: &Region, capacity: u64, contig_length: u64) -> (u64, u64) {
        let size = region.len().max(capacity);
        let end = region.start.saturating_add(size).min(contig_length);
        let start = end.saturating_sub(size).min(region.start);
        (start, end)
    }

    /// Replace the cached window
    pub fn store(&mut self, window: CachedWindow) {
        self.window = Some(window);
    }

    pub fn clear(&mut self) {
        self.window = None;
    }

    pub fn window(&self) -> Option<&CachedWindow> {
        self.window.as_ref()
    }
}
