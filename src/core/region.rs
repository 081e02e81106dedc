use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegionParseError {
    #[error("Region is missing a contig name: {0}")]
    MissingName(String),

    #[error("Region must have the form name:beg-end, got: {0}")]
    InvalidFormat(String),

    #[error("Invalid coordinate '{value}' in region {region}")]
    InvalidCoordinate { region: String, value: String },

    #[error("Region positions are 1-based, got beg=0 in {0}")]
    ZeroBegin(String),
}

/// A half-open, 0-based range `[start, end)` on a named contig
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub reference_name: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(reference_name: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            reference_name: reference_name.into(),
            start,
            end,
        }
    }

    /// A region may be empty (`start == end`) but never inverted
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Number of bases covered; zero for malformed regions
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `self` lies entirely within `[start, end)` of the same contig
    #[must_use]
    pub fn is_within(&self, reference_name: &str, start: u64, end: u64) -> bool {
        self.reference_name == reference_name && start <= self.start && self.end <= end
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.reference_name, self.start, self.end)
    }
}

/// Parses the samtools-style `name:beg-end` syntax.
///
/// `beg` and `end` are 1-based and inclusive, so `chr1:11-20` becomes the
/// half-open region `[10, 20)`. Commas are accepted as thousands separators.
/// The name is split at the last `:` so names like `HLA-A*01:01` still work.
impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, range) = s
            .rsplit_once(':')
            .ok_or_else(|| RegionParseError::InvalidFormat(s.to_string()))?;

        if name.is_empty() {
            return Err(RegionParseError::MissingName(s.to_string()));
        }

        let (beg, end) = range
            .split_once('-')
            .ok_or_else(|| RegionParseError::InvalidFormat(s.to_string()))?;

        let parse = |value: &str| -> Result<u64, RegionParseError> {
            value
                .replace(',', "")
                .parse::<u64>()
                .map_err(|_| RegionParseError::InvalidCoordinate {
                    region: s.to_string(),
                    value: value.to_string(),
                })
        };

        let beg = parse(beg)?;
        let end = parse(end)?;
        if beg == 0 {
            return Err(RegionParseError::ZeroBegin(s.to_string()));
        }

        Ok(Region::new(name, beg - 1, end))
    }
}
