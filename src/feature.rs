//! Genomic features
//!
//! A [`Feature`] is any interval of interest (gene, transcript, regulatory
//! region) that a variation site can overlap. It knows its own location and
//! can fetch reference sequence through a [`ReferenceProvider`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coords::{site_to_half_open, Strand};
use crate::error::FerroError;
use crate::reference::ReferenceProvider;
use crate::sequence::reverse_complement;
use crate::variation::VariationSite;

/// Kind of genomic feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Gene,
    #[default]
    Transcript,
    RegulatoryFeature,
    MotifFeature,
    /// Stand-in feature for sites that overlap nothing annotated
    Intergenic,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKind::Gene => "gene",
            FeatureKind::Transcript => "transcript",
            FeatureKind::RegulatoryFeature => "regulatory_feature",
            FeatureKind::MotifFeature => "motif_feature",
            FeatureKind::Intergenic => "intergenic",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FeatureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gene" => Ok(FeatureKind::Gene),
            "transcript" => Ok(FeatureKind::Transcript),
            "regulatory_feature" | "regulatory" => Ok(FeatureKind::RegulatoryFeature),
            "motif_feature" | "motif" => Ok(FeatureKind::MotifFeature),
            "intergenic" => Ok(FeatureKind::Intergenic),
            _ => Err(format!("Invalid feature kind: {}", s)),
        }
    }
}

/// A genomic feature (1-based inclusive coordinates)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier, e.g. `ENST00000357654`
    pub id: String,
    /// What kind of feature this is
    pub kind: FeatureKind,
    /// Chromosome/contig name
    pub contig: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Strand the feature lies on
    pub strand: Strand,
}

impl Feature {
    /// Create a new feature
    pub fn new(
        id: impl Into<String>,
        kind: FeatureKind,
        contig: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            contig: contig.into(),
            start,
            end,
            strand,
        }
    }

    /// Parse `contig:start-end[:strand]`, e.g. `chr1:100-200:-`
    ///
    /// The feature gets `id` as its identifier and kind [`FeatureKind::Transcript`].
    pub fn from_region(id: impl Into<String>, region: &str) -> Result<Self, FerroError> {
        let invalid = || FerroError::invalid_input(format!("invalid feature region '{}'", region));

        let mut parts = region.split(':');
        let contig = parts.next().filter(|c| !c.is_empty()).ok_or_else(invalid)?;
        let (start, end) = parts.next().and_then(|r| r.split_once('-')).ok_or_else(invalid)?;
        let start: u64 = start.trim().parse().map_err(|_| invalid())?;
        let end: u64 = end.trim().parse().map_err(|_| invalid())?;
        let strand = match parts.next() {
            Some(s) => s.parse::<Strand>().map_err(|_| invalid())?,
            None => Strand::Plus,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        let feature = Self::new(id, FeatureKind::Transcript, contig, start, end, strand);
        feature.validate()?;
        Ok(feature)
    }

    /// A feature spanning exactly the given site, used when a site overlaps nothing annotated
    ///
    /// An insertion before the first base of a contig (`start == 1, end == 0`)
    /// gets a feature starting at base 1.
    pub fn spanning(site: &VariationSite) -> Self {
        Self::new(
            format!("{}_intergenic", site.name),
            FeatureKind::Intergenic,
            site.contig.clone(),
            site.start.min(site.end).max(1),
            site.start.max(site.end),
            Strand::Plus,
        )
    }

    /// Length in bases
    pub fn len(&self) -> u64 {
        if self.start > self.end {
            return 0;
        }
        (self.end - self.start).saturating_add(1)
    }

    /// True if the feature covers no bases
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the feature carries everything overlap construction needs
    pub fn validate(&self) -> Result<(), FerroError> {
        if self.id.trim().is_empty() {
            return Err(FerroError::invalid_input("feature has no identifier"));
        }
        if self.contig.trim().is_empty() {
            return Err(FerroError::invalid_input(format!(
                "feature '{}' has no contig",
                self.id
            )));
        }
        if self.start == 0 || self.start > self.end || self.end == u64::MAX {
            return Err(FerroError::invalid_input(format!(
                "feature '{}' has invalid coordinates {}-{}",
                self.id, self.start, self.end
            )));
        }
        Ok(())
    }

    /// True if the site touches the feature
    ///
    /// Insertions count as overlapping when they sit at either boundary.
    pub fn overlaps(&self, site: &VariationSite) -> bool {
        if site.contig != self.contig {
            return false;
        }
        if site.is_insertion() {
            site.end >= self.start.saturating_sub(1) && site.start <= self.end.saturating_add(1)
        } else {
            site.start <= self.end && site.end >= self.start
        }
    }

    /// Reference sequence for 1-based inclusive `start..=end`, reported on `strand`
    ///
    /// Insertion coordinates (`start == end + 1`) yield an empty string. Minus
    /// strand requests are reverse complemented.
    pub fn subseq<P: ReferenceProvider + ?Sized>(
        &self,
        provider: &P,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> Result<String, FerroError> {
        let (zb_start, zb_end) =
            site_to_half_open(start, end).ok_or_else(|| FerroError::InvalidCoordinates {
                msg: format!("{}:{}-{} is not a valid range", self.contig, start, end),
            })?;

        let sequence = provider.get_sequence(&self.contig, zb_start, zb_end)?;
        Ok(match strand {
            Strand::Plus => sequence,
            Strand::Minus => reverse_complement(&sequence),
        })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}-{}({})",
            self.id, self.contig, self.start, self.end, self.strand
        )
    }
}
