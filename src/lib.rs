// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-alleles: allele resolution for variation/feature overlaps
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Given a variation site with a compact allele string (`A/T`, `-/CAG`,
//! `(CA)12/(CA)14`, `T/M`) and a genomic feature it overlaps, builds the
//! distinct reference and alternate alleles at that site against the
//! reference genome.
//!
//! # Example
//!
//! ```
//! use ferro_alleles::{Feature, FeatureKind, MockProvider, OverlapConfig, Strand};
//! use ferro_alleles::{VariationOverlap, VariationSite};
//!
//! let provider = MockProvider::with_test_data();
//! let feature = Feature::new("ENST0001", FeatureKind::Transcript, "chr2", 1, 12, Strand::Plus);
//! // chr2:5-4 is the gap between positions 4 and 5
//! let site = VariationSite::new(1, "rs1", "chr2", 5, 4, Strand::Plus, "-/AT");
//!
//! let overlap = VariationOverlap::new(feature, site, &provider, OverlapConfig::new()).unwrap();
//! assert_eq!(overlap.reference_allele().sequence(), "-");
//! assert_eq!(overlap.alternate_alleles()[0].sequence(), "AT");
//! ```

pub mod allele_string;
pub mod batch;
pub mod cache;
pub mod cli;
pub mod config;
pub mod coords;
pub mod error;
pub mod feature;
pub mod overlap;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reference;
pub mod sequence;
pub mod variation;

// Re-export commonly used types
pub use allele_string::AlleleString;
pub use cache::{SiteCache, SiteSource};
pub use config::FerroConfig;
pub use coords::Strand;
pub use error::{ErrorCode, FerroError};
pub use feature::{Feature, FeatureKind};
pub use overlap::{Allele, OverlapConfig, OverlapSummary, SiteOverlap, VariationOverlap};
pub use reference::{CachedFastaProvider, FastaProvider, MockProvider, ReferenceProvider};
pub use variation::VariationSite;

/// Result type alias for ferro-alleles operations
pub type Result<T> = std::result::Result<T, FerroError>;
