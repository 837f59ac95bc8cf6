//! Reference resolution and allele set construction

use log::debug;

use super::allele::{Allele, OverlapKey};
use super::config::OverlapConfig;
use crate::allele_string::AlleleString;
use crate::coords::Strand;
use crate::error::FerroError;
use crate::feature::Feature;
use crate::reference::ReferenceProvider;
use crate::sequence::DELETION_MARKER;
use crate::variation::VariationSite;

/// Determine the reference allele for `site` within `feature`
///
/// With reference checking on, the feature's genomic sequence over the site
/// coordinates (on the site strand) is used verbatim, declared or not. With
/// `no_reference_check`, the first declared allele is trusted. An empty
/// result becomes `-`.
pub fn resolve_reference<P: ReferenceProvider + ?Sized>(
    feature: &Feature,
    site: &VariationSite,
    declared: &AlleleString,
    provider: &P,
    config: &OverlapConfig,
) -> Result<String, FerroError> {
    let reference = if config.no_reference_check {
        declared.first().unwrap_or_default().to_string()
    } else {
        feature
            .subseq(provider, site.start, site.end, site.strand)
            .map_err(|e| match e {
                FerroError::ReferenceLookup { .. } => e,
                other => FerroError::ReferenceLookup {
                    contig: site.contig.clone(),
                    start: site.start,
                    end: site.end,
                    msg: other.to_string(),
                },
            })?
    };

    if reference.is_empty() {
        Ok(DELETION_MARKER.to_string())
    } else {
        Ok(reference)
    }
}

/// Reference plus ordered, distinct alternates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlleleSet {
    pub reference: Allele,
    pub alternates: Vec<Allele>,
}

/// Builds the [`AlleleSet`] of one overlap from its literal alleles
#[derive(Debug, Clone)]
pub struct AlleleSetBuilder {
    key: OverlapKey,
    orientation: Strand,
}

impl AlleleSetBuilder {
    pub fn new(feature: &Feature, site: &VariationSite) -> Self {
        Self {
            key: OverlapKey::new(feature.id.clone(), site.id),
            orientation: site.strand.relative_to(feature.strand),
        }
    }

    /// One reference allele, then one alternate per distinct literal allele
    /// other than the reference, in first-occurrence order
    pub fn build(&self, reference: &str, alleles: &AlleleString) -> AlleleSet {
        let reference = Allele::new(reference, true, self.orientation, self.key.clone());
        let alternates: Vec<Allele> = alleles
            .unique()
            .into_iter()
            .filter(|seq| *seq != reference.sequence())
            .map(|seq| Allele::new(seq, false, self.orientation, self.key.clone()))
            .collect();

        debug!(
            "built {} alternate(s) against reference '{}' for {}",
            alternates.len(),
            reference.sequence(),
            self.key
        );

        AlleleSet {
            reference,
            alternates,
        }
    }
}
