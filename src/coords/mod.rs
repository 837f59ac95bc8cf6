//! Strand and coordinate conventions
//!
//! Features and variation sites use **1-based inclusive** coordinates. An
//! insertion between two bases is written with `start == end + 1`, so the
//! site covers zero reference bases. Reference providers use **0-based
//! half-open** coordinates.
//!
//! | Context | Basis | Notes |
//! |---------|-------|-------|
//! | `Feature`, `VariationSite` | 1-based | inclusive; insertions have `start = end + 1` |
//! | `ReferenceProvider::get_sequence` | 0-based | half-open `[start, end)` |
//!
//! # Examples
//!
//! ```
//! use ferro_alleles::coords::site_to_half_open;
//!
//! // A SNV at position 100
//! assert_eq!(site_to_half_open(100, 100), Some((99, 100)));
//! // An insertion between 100 and 101 covers no bases
//! assert_eq!(site_to_half_open(101, 100), Some((100, 100)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    /// Convert from the numeric `+1`/`-1` convention
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            1 => Some(Strand::Plus),
            -1 => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Numeric `+1`/`-1` representation
    pub fn as_i8(self) -> i8 {
        match self {
            Strand::Plus => 1,
            Strand::Minus => -1,
        }
    }

    /// The opposite strand
    pub fn flip(self) -> Self {
        match self {
            Strand::Plus => Strand::Minus,
            Strand::Minus => Strand::Plus,
        }
    }

    /// Orientation of `other` relative to `self`: `Plus` if they agree
    pub fn relative_to(self, other: Strand) -> Strand {
        if self == other {
            Strand::Plus
        } else {
            Strand::Minus
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "1" | "+1" => Ok(Strand::Plus),
            "-" | "-1" => Ok(Strand::Minus),
            other => Err(format!("Invalid strand: {}", other)),
        }
    }
}

/// Convert 1-based inclusive site coordinates to a 0-based half-open range
///
/// Returns `None` when the range is inverted by more than the single base the
/// insertion convention allows, when `start` is zero, or when `end` is so
/// large that the base after it is not addressable.
#[inline]
pub const fn site_to_half_open(start: u64, end: u64) -> Option<(u64, u64)> {
    let Some(next) = end.checked_add(1) else {
        return None;
    };
    if start == 0 || start > next {
        return None;
    }
    Some((start - 1, end))
}

/// True if the 1-based coordinates describe an insertion (`start == end + 1`)
#[inline]
pub const fn is_insertion_site(start: u64, end: u64) -> bool {
    start > end && start - end == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_numeric() {
        assert_eq!(Strand::from_i8(1), Some(Strand::Plus));
        assert_eq!(Strand::from_i8(-1), Some(Strand::Minus));
        assert_eq!(Strand::from_i8(0), None);
        assert_eq!(Strand::Plus.as_i8(), 1);
        assert_eq!(Strand::Minus.as_i8(), -1);
    }

    #[test]
    fn test_strand_parse_and_display() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Plus);
        assert_eq!("-1".parse::<Strand>().unwrap(), Strand::Minus);
        assert!("x".parse::<Strand>().is_err());
        assert_eq!(Strand::Minus.to_string(), "-");
    }

    #[test]
    fn test_strand_relative() {
        assert_eq!(Strand::Plus.relative_to(Strand::Plus), Strand::Plus);
        assert_eq!(Strand::Minus.relative_to(Strand::Minus), Strand::Plus);
        assert_eq!(Strand::Plus.relative_to(Strand::Minus), Strand::Minus);
        assert_eq!(Strand::Minus.flip(), Strand::Plus);
    }

    #[test]
    fn test_strand_serde() {
        assert_eq!(serde_json::to_string(&Strand::Minus).unwrap(), "\"-\"");
        let strand: Strand = serde_json::from_str("\"+\"").unwrap();
        assert_eq!(strand, Strand::Plus);
    }

    #[test]
    fn test_site_to_half_open() {
        assert_eq!(site_to_half_open(1, 1), Some((0, 1)));
        assert_eq!(site_to_half_open(10, 12), Some((9, 12)));
        assert_eq!(site_to_half_open(11, 10), Some((10, 10)));
        assert_eq!(site_to_half_open(12, 10), None);
        assert_eq!(site_to_half_open(0, 5), None);
        assert_eq!(site_to_half_open(5, u64::MAX), None);
        assert_eq!(site_to_half_open(u64::MAX, u64::MAX), None);
    }

    #[test]
    fn test_is_insertion_site() {
        assert!(is_insertion_site(101, 100));
        assert!(!is_insertion_site(100, 100));
        assert!(!is_insertion_site(100, 101));
        assert!(!is_insertion_site(5, u64::MAX));
        assert!(is_insertion_site(u64::MAX, u64::MAX - 1));
    }
}
