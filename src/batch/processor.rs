//! Batch processor implementation.

use std::time::{Duration, Instant};

use crate::error::FerroError;
use crate::feature::Feature;
use crate::overlap::{OverlapConfig, VariationOverlap};
use crate::reference::ReferenceProvider;
use crate::variation::VariationSite;

/// Configuration for batch processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Whether to continue processing on errors.
    pub continue_on_error: bool,
    /// Callback frequency (call progress callback every N items).
    pub progress_interval: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            progress_interval: 100,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether to continue on errors.
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Set the progress callback interval (minimum 1).
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }
}

/// Snapshot passed to the progress callback.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// A pair that could not be turned into an overlap.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Position of the pair in the input slice.
    pub index: usize,
    /// The site and feature, rendered for error reports.
    pub input: String,
    pub error: FerroError,
}

pub type ItemResult<T> = Result<T, ItemFailure>;

/// Per-pair outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchResult<T> {
    pub results: Vec<ItemResult<T>>,
    pub duration: Duration,
}

impl<T> BatchResult<T> {
    /// Number of pairs attempted (less than the input when stopped early).
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn error_count(&self) -> usize {
        self.total() - self.success_count()
    }

    /// Percentage of attempted pairs that succeeded; 100 for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            100.0
        } else {
            (self.success_count() as f64 / self.total() as f64) * 100.0
        }
    }

    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|r| r.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    /// Consume the batch, keeping only the overlaps that were built.
    pub fn successes(self) -> Vec<T> {
        self.results.into_iter().filter_map(Result::ok).collect()
    }
}

/// Builds [`VariationOverlap`]s for many (feature, site) pairs.
pub struct BatchProcessor<P: ReferenceProvider> {
    provider: P,
    overlap_config: OverlapConfig,
    config: BatchConfig,
}

impl<P: ReferenceProvider> BatchProcessor<P> {
    /// Create a batch processor with default overlap and batch options.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, OverlapConfig::default(), BatchConfig::default())
    }

    pub fn with_config(provider: P, overlap_config: OverlapConfig, config: BatchConfig) -> Self {
        Self {
            provider,
            overlap_config,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn overlap_config(&self) -> &OverlapConfig {
        &self.overlap_config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Build one overlap per (feature, site) pair.
    pub fn build(&self, pairs: &[(Feature, VariationSite)]) -> BatchResult<VariationOverlap> {
        self.build_with_progress(pairs, |_| {})
    }

    /// Build one overlap per site, each against a feature spanning just that site.
    pub fn build_spanning(&self, sites: &[VariationSite]) -> BatchResult<VariationOverlap> {
        let pairs: Vec<(Feature, VariationSite)> = sites
            .iter()
            .map(|site| (Feature::spanning(site), site.clone()))
            .collect();
        self.build(&pairs)
    }

    /// Build overlaps with a progress callback.
    ///
    /// With `continue_on_error` unset, processing stops after the first
    /// failure; the failing item is the last result.
    pub fn build_with_progress<F>(
        &self,
        pairs: &[(Feature, VariationSite)],
        mut progress_fn: F,
    ) -> BatchResult<VariationOverlap>
    where
        F: FnMut(BatchProgress),
    {
        let start = Instant::now();
        let total = pairs.len();
        let interval = self.config.progress_interval.max(1);
        let mut results = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut failed = 0;

        for (i, (feature, site)) in pairs.iter().enumerate() {
            let result = VariationOverlap::new(
                feature.clone(),
                site.clone(),
                &self.provider,
                self.overlap_config,
            );

            let stop = match result {
                Ok(overlap) => {
                    results.push(Ok(overlap));
                    succeeded += 1;
                    false
                }
                Err(error) => {
                    log::debug!("overlap of {} with {} failed: {}", site.name, feature.id, error);
                    results.push(Err(ItemFailure {
                        index: i,
                        input: format!("{} in {}", site, feature.id),
                        error,
                    }));
                    failed += 1;
                    !self.config.continue_on_error
                }
            };

            if (i + 1) % interval == 0 || i + 1 == total || stop {
                progress_fn(BatchProgress {
                    total,
                    processed: i + 1,
                    succeeded,
                    failed,
                    elapsed: start.elapsed(),
                });
            }
            if stop {
                break;
            }
        }

        BatchResult {
            results,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;
    use crate::feature::FeatureKind;
    use crate::reference::MockProvider;

    fn processor() -> BatchProcessor<MockProvider> {
        BatchProcessor::new(MockProvider::with_test_data())
    }

    fn pair(id: u64, contig: &str, alleles: &str) -> (Feature, VariationSite) {
        (
            Feature::new("T1", FeatureKind::Transcript, contig, 1, 12, Strand::Plus),
            VariationSite::new(id, format!("rs{}", id), contig, 4, 4, Strand::Plus, alleles),
        )
    }

    #[test]
    fn test_build_all_ok() {
        let pairs = vec![pair(1, "chr2", "A/T"), pair(2, "chr2", "A/C/G")];
        let result = processor().build(&pairs);
        assert!(result.all_ok());
        assert_eq!(result.total(), 2);
        assert_eq!(result.success_rate(), 100.0);

        let overlaps = result.successes();
        assert_eq!(overlaps[1].alternate_alleles().len(), 2);
    }

    #[test]
    fn test_build_collects_errors() {
        let pairs = vec![pair(1, "chr2", "A/T"), pair(2, "chrZ", "A/T"), pair(3, "chr2", "A/G")];
        let result = processor().build(&pairs);
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.error_count(), 1);
        assert!(!result.all_ok());

        let failures: Vec<&ItemFailure> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert!(failures[0].input.contains("rs2"));
        assert!(matches!(failures[0].error, FerroError::ReferenceLookup { .. }));
    }

    #[test]
    fn test_stop_on_first_error() {
        let processor = BatchProcessor::with_config(
            MockProvider::with_test_data(),
            OverlapConfig::default(),
            BatchConfig::new().continue_on_error(false),
        );
        let pairs = vec![pair(1, "chrZ", "A/T"), pair(2, "chr2", "A/T")];
        let result = processor.build(&pairs);
        assert_eq!(result.total(), 1);
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn test_progress_callback() {
        let processor = BatchProcessor::with_config(
            MockProvider::with_test_data(),
            OverlapConfig::default(),
            BatchConfig::new().progress_interval(2),
        );
        let pairs: Vec<_> = (0..5).map(|i| pair(i, "chr2", "A/T")).collect();

        let mut seen = Vec::new();
        processor.build_with_progress(&pairs, |p| seen.push((p.processed, p.succeeded, p.total)));
        assert_eq!(seen, vec![(2, 2, 5), (4, 4, 5), (5, 5, 5)]);
    }

    #[test]
    fn test_build_spanning_uses_overlap_config() {
        let processor = BatchProcessor::with_config(
            MockProvider::new(),
            OverlapConfig::new().without_reference_check(),
            BatchConfig::default(),
        );
        let sites = vec![VariationSite::new(1, "rs1", "chr1", 4, 4, Strand::Plus, "C/Y")];
        let result = processor.build_spanning(&sites);
        let overlaps = result.successes();
        assert_eq!(overlaps[0].reference_allele().sequence(), "C");
        assert_eq!(overlaps[0].alternate_alleles()[0].sequence(), "Y");
    }

    #[test]
    fn test_stop_reports_failure_to_progress() {
        let processor = BatchProcessor::with_config(
            MockProvider::with_test_data(),
            OverlapConfig::default(),
            BatchConfig::new().continue_on_error(false).progress_interval(10),
        );
        let pairs = vec![pair(1, "chr2", "A/T"), pair(2, "chrZ", "A/T"), pair(3, "chr2", "A/T")];

        let mut last = None;
        processor.build_with_progress(&pairs, |p| last = Some((p.processed, p.failed)));
        assert_eq!(last, Some((2, 1)));
    }

    #[test]
    fn test_empty_batch() {
        let result = processor().build(&[]);
        assert_eq!(result.total(), 0);
        assert_eq!(result.success_rate(), 100.0);
        assert!(result.all_ok());
    }
}
