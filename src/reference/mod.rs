//! Reference data abstraction
//!
//! Providers hand out genomic sequence over 0-based half-open coordinates.

pub mod fasta;
pub mod mock;
pub mod provider;

pub use fasta::{CachedFastaProvider, FastaProvider};
pub use mock::MockProvider;
pub use provider::ReferenceProvider;
