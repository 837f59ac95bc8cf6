//! Overlap construction options

use serde::{Deserialize, Serialize};

/// Configuration for building a [`super::VariationOverlap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OverlapConfig {
    /// Expand single-nucleotide IUPAC codes (`M` -> `A`, `C`) before building alleles
    #[serde(default)]
    pub disambiguate_single_nucleotide: bool,

    /// Take the reference allele from the declared allele string instead of
    /// the genome
    #[serde(default)]
    pub no_reference_check: bool,
}

impl OverlapConfig {
    /// Create a config with default values (no disambiguation, reference checked)
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand single-nucleotide ambiguity codes
    pub fn with_disambiguation(mut self) -> Self {
        self.disambiguate_single_nucleotide = true;
        self
    }

    /// Trust the first declared allele as the reference
    pub fn without_reference_check(mut self) -> Self {
        self.no_reference_check = true;
        self
    }
}
