//! Allele records owned by a variation overlap

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coords::Strand;
use crate::sequence::{is_empty_allele, reverse_complement, DELETION_MARKER};

/// Identifies the overlap an allele belongs to without pointing at it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlapKey {
    /// Identifier of the overlapped feature
    pub feature_id: String,
    /// Identifier of the variation site
    pub site_id: u64,
}

impl OverlapKey {
    pub fn new(feature_id: impl Into<String>, site_id: u64) -> Self {
        Self {
            feature_id: feature_id.into(),
            site_id,
        }
    }
}

impl fmt::Display for OverlapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.feature_id, self.site_id)
    }
}

/// One allele at a variation site, as seen from an overlapped feature
///
/// `sequence` is written on the site's strand. `feature_sequence` is the same
/// allele on the feature's strand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allele {
    sequence: String,
    feature_sequence: String,
    is_reference: bool,
    #[serde(default)]
    reduced: bool,
    overlap: OverlapKey,
}

impl Allele {
    /// Create an allele; empty sequences become the deletion marker
    ///
    /// `orientation` is the feature strand relative to the site strand
    /// (see [`Strand::relative_to`]).
    pub fn new(
        sequence: impl Into<String>,
        is_reference: bool,
        orientation: Strand,
        overlap: OverlapKey,
    ) -> Self {
        let mut sequence = sequence.into();
        if sequence.is_empty() {
            sequence = DELETION_MARKER.to_string();
        }
        let feature_sequence = match orientation {
            Strand::Plus => sequence.clone(),
            Strand::Minus => reverse_complement(&sequence),
        };
        Self {
            sequence,
            feature_sequence,
            is_reference,
            reduced: false,
            overlap,
        }
    }

    /// Literal allele sequence (`-` for a deletion)
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Allele sequence on the feature's strand
    pub fn feature_sequence(&self) -> &str {
        &self.feature_sequence
    }

    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// True once the allele has been repurposed as a single representative
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub fn is_deletion(&self) -> bool {
        is_empty_allele(&self.sequence)
    }

    pub fn overlap_key(&self) -> &OverlapKey {
        &self.overlap
    }

    /// Flag this allele as the reference of its overlap
    pub fn mark_reference(&mut self) {
        self.is_reference = true;
    }

    /// Repurpose this allele as the sole representative of its overlap
    pub fn reduce_to_representative(&mut self) {
        self.is_reference = true;
        self.reduced = true;
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence)
    }
}
