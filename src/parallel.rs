//! Parallel overlap construction
//!
//! Rayon-backed versions of the batch operations. Enable with the `parallel`
//! feature. Every function preserves input order.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_alleles::coords::Strand;
//! use ferro_alleles::feature::Feature;
//! use ferro_alleles::overlap::OverlapConfig;
//! use ferro_alleles::parallel::build_overlaps_parallel;
//! use ferro_alleles::variation::VariationSite;
//! use ferro_alleles::MockProvider;
//!
//! let provider = MockProvider::with_test_data();
//! let pairs: Vec<_> = (1..=4)
//!     .map(|i| {
//!         let site = VariationSite::new(i, format!("rs{}", i), "chr2", i, i, Strand::Plus, "A/T");
//!         (Feature::spanning(&site), site)
//!     })
//!     .collect();
//!
//! let overlaps = build_overlaps_parallel(&provider, &pairs, OverlapConfig::new());
//! assert_eq!(overlaps.len(), 4);
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::allele_string::AlleleString;
use crate::error::FerroError;
use crate::feature::Feature;
use crate::overlap::{OverlapConfig, VariationOverlap};
use crate::reference::ReferenceProvider;
use crate::variation::VariationSite;

/// Build one overlap per (feature, site) pair in parallel
pub fn build_overlaps_parallel<P: ReferenceProvider + Sync + ?Sized>(
    provider: &P,
    pairs: &[(Feature, VariationSite)],
    config: OverlapConfig,
) -> Vec<Result<VariationOverlap, FerroError>> {
    pairs
        .par_iter()
        .map(|(feature, site)| {
            VariationOverlap::new(feature.clone(), site.clone(), provider, config)
        })
        .collect()
}

/// Build overlaps in parallel, dropping the pairs that fail
pub fn build_overlaps_parallel_ok<P: ReferenceProvider + Sync + ?Sized>(
    provider: &P,
    pairs: &[(Feature, VariationSite)],
    config: OverlapConfig,
) -> Vec<VariationOverlap> {
    pairs
        .par_iter()
        .filter_map(|(feature, site)| {
            VariationOverlap::new(feature.clone(), site.clone(), provider, config).ok()
        })
        .collect()
}

/// Decode many allele strings in parallel
pub fn decode_allele_strings_parallel<S: AsRef<str> + Sync>(inputs: &[S]) -> Vec<AlleleString> {
    inputs
        .par_iter()
        .map(|s| AlleleString::decode(s.as_ref()))
        .collect()
}

/// Build overlaps on a dedicated pool sized by `parallel_config`
pub fn build_overlaps_with_config<P: ReferenceProvider + Sync + ?Sized>(
    provider: &P,
    pairs: &[(Feature, VariationSite)],
    config: OverlapConfig,
    parallel_config: &ParallelConfig,
) -> Result<Vec<Result<VariationOverlap, FerroError>>, FerroError> {
    if parallel_config.num_threads == 0 {
        return Ok(build_overlaps_parallel(provider, pairs, config));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_config.num_threads)
        .build()
        .map_err(|e| FerroError::Config {
            msg: format!("failed to build thread pool: {}", e),
        })?;
    let chunk_size = parallel_config.chunk_size.max(1);

    Ok(pool.install(|| {
        pairs
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| {
                chunk.iter().map(|(feature, site)| {
                    VariationOverlap::new(feature.clone(), site.clone(), provider, config)
                })
            })
            .collect()
    }))
}

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Pairs handed to a worker at a time
    pub chunk_size: usize,
    /// Number of threads (0 = rayon's global pool)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}

/// Statistics from parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelStats {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
}

impl ParallelStats {
    /// Tally a result vector
    pub fn from_results<T>(results: &[Result<T, FerroError>]) -> Self {
        let success = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            success,
            errors: results.len() - success,
        }
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}
