//! Reference provider trait
//!
//! Defines the interface for accessing genomic reference sequence.

use crate::error::FerroError;

/// Trait for providing reference sequence data
///
/// Implementations might include:
/// - MockProvider for testing
/// - FastaProvider for indexed FASTA files
/// - CachedFastaProvider for repeated lookups over the same regions
pub trait ReferenceProvider {
    /// Get a sequence region
    ///
    /// # Arguments
    ///
    /// * `contig` - Chromosome/contig name (e.g., "chr1", "NC_000001.11")
    /// * `start` - 0-based start position
    /// * `end` - 0-based end position (exclusive)
    ///
    /// An empty range (`start == end`) within the contig yields an empty string.
    fn get_sequence(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError>;

    /// Length of a contig, if the provider knows it
    fn contig_length(&self, contig: &str) -> Option<u64>;

    /// Check if a contig exists
    fn has_contig(&self, contig: &str) -> bool {
        self.contig_length(contig).is_some()
    }
}

/// Blanket implementation for boxed trait objects
impl ReferenceProvider for Box<dyn ReferenceProvider> {
    fn get_sequence(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).get_sequence(contig, start, end)
    }

    fn contig_length(&self, contig: &str) -> Option<u64> {
        (**self).contig_length(contig)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

/// Shared references forward to the referenced provider
impl<P: ReferenceProvider + ?Sized> ReferenceProvider for &P {
    fn get_sequence(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        (**self).get_sequence(contig, start, end)
    }

    fn contig_length(&self, contig: &str) -> Option<u64> {
        (**self).contig_length(contig)
    }

    fn has_contig(&self, contig: &str) -> bool {
        (**self).has_contig(contig)
    }
}

/// Check a 0-based half-open range against a contig length
pub(crate) fn check_range(contig: &str, start: u64, end: u64, length: u64) -> Result<(), FerroError> {
    if start > end || end > length {
        return Err(FerroError::InvalidCoordinates {
            msg: format!(
                "Position {}-{} out of range for {} (length {})",
                start, end, contig, length
            ),
        });
    }
    Ok(())
}
