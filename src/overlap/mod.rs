//! Variation/feature overlaps
//!
//! A [`VariationOverlap`] pairs one [`Feature`] with one [`VariationSite`]
//! and holds the distinct alleles at the site: exactly one reference and an
//! ordered list of alternates. Every allele is reachable by its sequence.
//!
//! # Example
//!
//! ```
//! use ferro_alleles::coords::Strand;
//! use ferro_alleles::feature::{Feature, FeatureKind};
//! use ferro_alleles::overlap::{OverlapConfig, VariationOverlap};
//! use ferro_alleles::reference::MockProvider;
//! use ferro_alleles::variation::VariationSite;
//!
//! let provider = MockProvider::new().with_contig("chr1", "GGGAAACCC");
//! let feature = Feature::new("T1", FeatureKind::Transcript, "chr1", 1, 9, Strand::Plus);
//! let site = VariationSite::new(1, "rs1", "chr1", 4, 4, Strand::Plus, "A/T/M");
//!
//! let config = OverlapConfig::new().with_disambiguation();
//! let overlap = VariationOverlap::new(feature, site, &provider, config).unwrap();
//! assert_eq!(overlap.reference_allele().sequence(), "A");
//! let alts: Vec<&str> = overlap.alternate_alleles().iter().map(|a| a.sequence()).collect();
//! assert_eq!(alts, vec!["T", "C"]);
//! ```

mod allele;
mod builder;
mod config;

pub use allele::{Allele, OverlapKey};
pub use builder::{resolve_reference, AlleleSet, AlleleSetBuilder};
pub use config::OverlapConfig;

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::FerroError;
use crate::feature::Feature;
use crate::reference::ReferenceProvider;
use crate::variation::VariationSite;

/// Where an allele lives inside a [`VariationOverlap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Reference,
    Alternate(usize),
}

/// The alleles of one variation site as seen from one feature
#[derive(Debug, Clone)]
pub struct VariationOverlap {
    feature: Feature,
    site: VariationSite,
    reference: Allele,
    alternates: Vec<Allele>,
    alleles_by_sequence: HashMap<String, Slot>,
    reduced: bool,
}

impl VariationOverlap {
    /// Build the overlap of `site` with `feature`
    ///
    /// The declared allele string is decoded, optionally disambiguated, and
    /// deduplicated; the reference comes from `provider` unless
    /// `config.no_reference_check` is set.
    pub fn new<P: ReferenceProvider + ?Sized>(
        feature: Feature,
        site: VariationSite,
        provider: &P,
        config: OverlapConfig,
    ) -> Result<Self, FerroError> {
        feature.validate()?;
        site.validate()?;
        if feature.contig != site.contig {
            return Err(FerroError::invalid_input(format!(
                "feature '{}' is on {} but site '{}' is on {}",
                feature.id, feature.contig, site.name, site.contig
            )));
        }

        let declared = site.decoded_alleles();
        let reference = resolve_reference(&feature, &site, &declared, provider, &config)?;
        let alleles = if config.disambiguate_single_nucleotide {
            declared.disambiguated()
        } else {
            declared
        };

        let AlleleSet {
            reference,
            alternates,
        } = AlleleSetBuilder::new(&feature, &site).build(&reference, &alleles);

        let mut overlap = Self {
            feature,
            site,
            reference,
            alternates,
            alleles_by_sequence: HashMap::new(),
            reduced: false,
        };
        overlap.rebuild_index();
        Ok(overlap)
    }

    /// Re-key every allele by sequence; the reference wins ties
    fn rebuild_index(&mut self) {
        self.alleles_by_sequence.clear();
        for (i, allele) in self.alternates.iter().enumerate() {
            self.alleles_by_sequence
                .entry(allele.sequence().to_string())
                .or_insert(Slot::Alternate(i));
        }
        self.alleles_by_sequence
            .insert(self.reference.sequence().to_string(), Slot::Reference);
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    pub fn site(&self) -> &VariationSite {
        &self.site
    }

    /// Look up an allele by its literal sequence (`-` for a deletion)
    pub fn allele_by_sequence(&self, sequence: &str) -> Option<&Allele> {
        match self.alleles_by_sequence.get(sequence)? {
            Slot::Reference => Some(&self.reference),
            Slot::Alternate(i) => self.alternates.get(*i),
        }
    }

    /// The allele in the reference slot, always flagged [`Allele::is_reference`]
    pub fn reference_allele(&self) -> &Allele {
        &self.reference
    }

    pub fn alternate_alleles(&self) -> &[Allele] {
        &self.alternates
    }

    /// Reference first, then alternates
    ///
    /// After a reduction or a single-allele filter the reference also sits
    /// among the alternates; it is listed once.
    pub fn all_alleles(&self) -> Vec<&Allele> {
        let mut alleles = Vec::with_capacity(self.alternates.len() + 1);
        alleles.push(&self.reference);
        alleles.extend(
            self.alternates
                .iter()
                .filter(|a| a.sequence() != self.reference.sequence()),
        );
        alleles
    }

    /// Keep only the alternates whose sequence is in `keep`
    ///
    /// Does nothing if no alternate would survive. When `keep` names exactly
    /// one sequence, a copy of the surviving allele takes the reference slot
    /// and is flagged as the reference; the alternate copy is not.
    pub fn filter_alternates<I, S>(&mut self, keep: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keep: HashSet<String> = keep.into_iter().map(|s| s.as_ref().to_string()).collect();
        let retained: Vec<Allele> = self
            .alternates
            .iter()
            .filter(|a| keep.contains(a.sequence()))
            .cloned()
            .collect();

        if retained.is_empty() {
            debug!(
                "filter on {} kept no alternates of {}; leaving overlap unchanged",
                self.site.name, self.feature.id
            );
            return;
        }

        if keep.len() == 1 {
            let mut reference = retained[0].clone();
            reference.mark_reference();
            self.reference = reference;
        }
        self.alternates = retained;
        self.rebuild_index();
    }

    /// Collapse the overlap onto its reference allele
    ///
    /// The reference is reduced to a representative and becomes the only
    /// alternate as well.
    pub fn reduce_to_single_representative(&mut self) {
        self.reference.reduce_to_representative();
        self.alternates = vec![self.reference.clone()];
        self.reduced = true;
        self.rebuild_index();
    }

    /// True once [`Self::reduce_to_single_representative`] has run
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Serializable view of this overlap
    pub fn summary(&self) -> OverlapSummary {
        OverlapSummary {
            feature_id: self.feature.id.clone(),
            site_id: self.site.id,
            site_name: self.site.name.clone(),
            contig: self.site.contig.clone(),
            start: self.site.start,
            end: self.site.end,
            reference: self.reference.sequence().to_string(),
            alternates: self
                .alternates
                .iter()
                .map(|a| a.sequence().to_string())
                .collect(),
            reduced: self.reduced,
        }
    }
}

/// Shared allele access for every kind of feature overlap
///
/// Feature-specific overlaps (transcript, regulatory) wrap a
/// [`VariationOverlap`] and expose it through this trait.
pub trait SiteOverlap {
    /// The underlying allele-level overlap
    fn variation_overlap(&self) -> &VariationOverlap;

    /// Mutable access, for filtering and reduction
    fn variation_overlap_mut(&mut self) -> &mut VariationOverlap;

    fn feature(&self) -> &Feature {
        self.variation_overlap().feature()
    }

    fn site(&self) -> &VariationSite {
        self.variation_overlap().site()
    }

    fn reference_allele(&self) -> &Allele {
        self.variation_overlap().reference_allele()
    }

    fn alternate_alleles(&self) -> &[Allele] {
        self.variation_overlap().alternate_alleles()
    }

    fn all_alleles(&self) -> Vec<&Allele> {
        self.variation_overlap().all_alleles()
    }

    fn allele_by_sequence(&self, sequence: &str) -> Option<&Allele> {
        self.variation_overlap().allele_by_sequence(sequence)
    }

    fn filter_alternates(&mut self, keep: &[&str]) {
        self.variation_overlap_mut().filter_alternates(keep.iter().copied());
    }

    fn reduce_to_single_representative(&mut self) {
        self.variation_overlap_mut().reduce_to_single_representative();
    }
}

impl SiteOverlap for VariationOverlap {
    fn variation_overlap(&self) -> &VariationOverlap {
        self
    }

    fn variation_overlap_mut(&mut self) -> &mut VariationOverlap {
        self
    }
}

/// Flat, serializable description of an overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapSummary {
    pub feature_id: String,
    pub site_id: u64,
    pub site_name: String,
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub reference: String,
    pub alternates: Vec<String>,
    pub reduced: bool,
}

impl std::fmt::Display for OverlapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}:{}-{}\t{}\t{}",
            self.site_name,
            self.feature_id,
            self.contig,
            self.start,
            self.end,
            self.reference,
            if self.alternates.is_empty() {
                ".".to_string()
            } else {
                self.alternates.join(",")
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;
    use crate::feature::FeatureKind;
    use crate::reference::MockProvider;

    // chr2 = GGGAAACCCTTT
    fn build(start: u64, end: u64, alleles: &str, config: OverlapConfig) -> VariationOverlap {
        let provider = MockProvider::with_test_data();
        let feature = Feature::new("T1", FeatureKind::Transcript, "chr2", 1, 12, Strand::Plus);
        let site = VariationSite::new(9, "rs9", "chr2", start, end, Strand::Plus, alleles);
        VariationOverlap::new(feature, site, &provider, config).unwrap()
    }

    fn alt_seqs(overlap: &VariationOverlap) -> Vec<&str> {
        overlap.alternate_alleles().iter().map(Allele::sequence).collect()
    }

    fn assert_index_consistent(overlap: &VariationOverlap) {
        for allele in overlap.all_alleles() {
            let found = overlap.allele_by_sequence(allele.sequence()).unwrap();
            assert_eq!(found.sequence(), allele.sequence());
        }
        assert_eq!(overlap.alleles_by_sequence.len(), overlap.all_alleles().len());
    }

    #[test]
    fn test_new_basic() {
        let overlap = build(4, 4, "A/T", OverlapConfig::new());
        assert_eq!(overlap.reference_allele().sequence(), "A");
        assert_eq!(alt_seqs(&overlap), vec!["T"]);
        assert!(overlap.allele_by_sequence("T").is_some());
        assert!(overlap.allele_by_sequence("G").is_none());
        assert_index_consistent(&overlap);
    }

    #[test]
    fn test_all_alleles_reference_first() {
        let overlap = build(4, 4, "C/T", OverlapConfig::new());
        let all: Vec<&str> = overlap.all_alleles().iter().map(|a| a.sequence()).collect();
        assert_eq!(all, vec!["A", "C", "T"]);
    }

    #[test]
    fn test_contig_mismatch() {
        let provider = MockProvider::with_test_data();
        let feature = Feature::new("T1", FeatureKind::Transcript, "chr1", 1, 12, Strand::Plus);
        let site = VariationSite::new(9, "rs9", "chr2", 4, 4, Strand::Plus, "A/T");
        let err = VariationOverlap::new(feature, site, &provider, OverlapConfig::new()).unwrap_err();
        assert!(matches!(err, FerroError::InvalidInput { .. }));
    }

    #[test]
    fn test_filter_single() {
        let mut overlap = build(4, 4, "A/C/G/T", OverlapConfig::new());
        overlap.filter_alternates(["G"]);
        assert_eq!(overlap.reference_allele().sequence(), "G");
        assert_eq!(alt_seqs(&overlap), vec!["G"]);
        assert!(overlap.allele_by_sequence("A").is_none());
        assert_index_consistent(&overlap);
    }

    #[test]
    fn test_filter_several_keeps_reference() {
        let mut overlap = build(4, 4, "A/C/G/T", OverlapConfig::new());
        overlap.filter_alternates(["T", "C", "X"]);
        assert_eq!(overlap.reference_allele().sequence(), "A");
        assert_eq!(alt_seqs(&overlap), vec!["C", "T"]);
        assert_index_consistent(&overlap);
    }

    #[test]
    fn test_filter_disjoint_is_noop() {
        let mut overlap = build(4, 4, "A/C/G", OverlapConfig::new());
        overlap.filter_alternates(["T"]);
        assert_eq!(overlap.reference_allele().sequence(), "A");
        assert_eq!(alt_seqs(&overlap), vec!["C", "G"]);

        // The reference itself is not an alternate
        overlap.filter_alternates(["A"]);
        assert_eq!(alt_seqs(&overlap), vec!["C", "G"]);
    }

    #[test]
    fn test_reduce_to_single_representative() {
        let mut overlap = build(4, 4, "A/C/G", OverlapConfig::new());
        overlap.reduce_to_single_representative();
        assert!(overlap.is_reduced());
        assert!(overlap.reference_allele().is_reduced());
        assert_eq!(alt_seqs(&overlap), vec!["A"]);
        assert_eq!(overlap.all_alleles().len(), 1);
        assert_index_consistent(&overlap);
    }

    #[test]
    fn test_summary() {
        let overlap = build(5, 4, "-/AT", OverlapConfig::new());
        let summary = overlap.summary();
        assert_eq!(summary.reference, "-");
        assert_eq!(summary.alternates, vec!["AT"]);
        assert_eq!(summary.to_string(), "rs9\tT1\tchr2:5-4\t-\tAT");

        let json = serde_json::to_string(&summary).unwrap();
        let back: OverlapSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_site_overlap_trait() {
        struct TranscriptOverlap(VariationOverlap);

        impl SiteOverlap for TranscriptOverlap {
            fn variation_overlap(&self) -> &VariationOverlap {
                &self.0
            }
            fn variation_overlap_mut(&mut self) -> &mut VariationOverlap {
                &mut self.0
            }
        }

        let mut wrapped = TranscriptOverlap(build(4, 4, "A/C/G", OverlapConfig::new()));
        assert_eq!(wrapped.feature().id, "T1");
        assert_eq!(SiteOverlap::alternate_alleles(&wrapped).len(), 2);
        SiteOverlap::filter_alternates(&mut wrapped, &["C"]);
        assert_eq!(SiteOverlap::reference_allele(&wrapped).sequence(), "C");
    }
}
