//! Batch construction of variation overlaps.
//!
//! Builds overlaps for many (feature, site) pairs against one reference,
//! with progress tracking, error aggregation and statistics.
//!
//! # Examples
//!
//! ```
//! use ferro_alleles::batch::BatchProcessor;
//! use ferro_alleles::coords::Strand;
//! use ferro_alleles::variation::VariationSite;
//! use ferro_alleles::MockProvider;
//!
//! let processor = BatchProcessor::new(MockProvider::with_test_data());
//! let sites = vec![
//!     VariationSite::new(1, "rs1", "chr2", 4, 4, Strand::Plus, "A/T"),
//!     VariationSite::new(2, "rs2", "chrZ", 1, 1, Strand::Plus, "A/T"),
//! ];
//!
//! let result = processor.build_spanning(&sites);
//! assert_eq!(result.success_count(), 1);
//! assert_eq!(result.error_count(), 1);
//! ```

mod processor;

pub use processor::{
    BatchConfig, BatchProcessor, BatchProgress, BatchResult, ItemFailure, ItemResult,
};
