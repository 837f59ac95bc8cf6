//! Allele string codec
//!
//! An allele string lists the alleles observed at a variation site, separated
//! by `/`, e.g. `A/T`, `-/CAG` or `(CA)12/(CA)14`. Decoding expands repeat
//! groups, splits on `/`, and normalizes empty alleles to the deletion marker
//! `-`. Decoding never fails: malformed repeat groups are kept as literal text.
//!
//! # Example
//!
//! ```
//! use ferro_alleles::allele_string::AlleleString;
//!
//! let alleles = AlleleString::decode("(T)0/TT");
//! assert_eq!(alleles.alleles(), &["-", "TT"]);
//! assert_eq!(alleles.to_string(), "-/TT");
//! ```

pub mod ambiguity;
pub mod parser;

use crate::sequence::DELETION_MARKER;
use ambiguity::disambiguate_single_nucleotides;
use parser::expand_repeats;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separator between alleles
pub const ALLELE_SEPARATOR: char = '/';

/// Decoded, literal alleles of an allele string, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlleleString {
    alleles: Vec<String>,
}

impl AlleleString {
    /// Decode a compact allele string
    pub fn decode(input: &str) -> Self {
        let expanded = expand_repeats(input.trim());
        let alleles = expanded
            .split(ALLELE_SEPARATOR)
            .map(|allele| {
                if allele.is_empty() {
                    DELETION_MARKER.to_string()
                } else {
                    allele.to_string()
                }
            })
            .collect();
        Self { alleles }
    }

    /// Build from already-literal alleles, normalizing empty ones to `-`
    pub fn from_alleles<I, S>(alleles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let alleles = alleles
            .into_iter()
            .map(|a| {
                let a = a.into();
                if a.is_empty() {
                    DELETION_MARKER.to_string()
                } else {
                    a
                }
            })
            .collect();
        Self { alleles }
    }

    /// The literal alleles in declaration order
    pub fn alleles(&self) -> &[String] {
        &self.alleles
    }

    /// The first declared allele, if any
    pub fn first(&self) -> Option<&str> {
        self.alleles.first().map(String::as_str)
    }

    /// Number of literal alleles (duplicates included)
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    /// True if there are no alleles
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Iterate over the literal alleles
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.alleles.iter().map(String::as_str)
    }

    /// Expand single-nucleotide ambiguity codes into their constituent bases
    pub fn disambiguated(self) -> Self {
        Self {
            alleles: disambiguate_single_nucleotides(self.alleles),
        }
    }

    /// Distinct alleles, keeping the first occurrence of each
    pub fn unique(&self) -> Vec<&str> {
        let mut seen = HashSet::with_capacity(self.alleles.len());
        self.alleles
            .iter()
            .map(String::as_str)
            .filter(|a| seen.insert(*a))
            .collect()
    }

    /// Consume into the literal allele vector
    pub fn into_vec(self) -> Vec<String> {
        self.alleles
    }
}

impl FromStr for AlleleString {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

impl fmt::Display for AlleleString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, allele) in self.alleles.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", ALLELE_SEPARATOR)?;
            }
            write!(f, "{}", allele)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AlleleString {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.alleles.iter()
    }
}
