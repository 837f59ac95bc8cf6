//! Mock reference provider for testing

use crate::error::FerroError;
use crate::reference::provider::{check_range, ReferenceProvider};
use std::collections::HashMap;
use std::path::Path;

/// Mock reference provider holding contig sequences in memory
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    /// Sequences keyed by contig name
    contigs: HashMap<String, String>,
}

impl MockProvider {
    /// Create an empty mock provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Load contigs from a JSON object of `{"name": "SEQUENCE"}`
    pub fn from_json(path: &Path) -> Result<Self, FerroError> {
        let content = std::fs::read_to_string(path)?;
        let contigs: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(Self { contigs })
    }

    /// Add a contig sequence to the provider
    pub fn add_contig(&mut self, contig: impl Into<String>, sequence: impl Into<String>) {
        self.contigs.insert(contig.into(), sequence.into());
    }

    /// Builder-style variant of [`MockProvider::add_contig`]
    pub fn with_contig(mut self, contig: impl Into<String>, sequence: impl Into<String>) -> Self {
        self.add_contig(contig, sequence);
        self
    }

    /// Create a provider with a few small test contigs
    pub fn with_test_data() -> Self {
        let mut provider = Self::new();

        // 39 bases; positions 15-22 (1-based) hold a CA repeat: CACACACA
        provider.add_contig("chr1", "ACGTACGTAAGCTTCACACACAGGGATCCATGCATGCAT");

        // Short contig for strand tests
        provider.add_contig("chr2", "GGGAAACCCTTT");

        provider
    }

    /// Get the number of contigs
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    /// Check if provider is empty
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Get all contig names
    pub fn contig_names(&self) -> Vec<&str> {
        self.contigs.keys().map(|s| s.as_str()).collect()
    }
}

impl ReferenceProvider for MockProvider {
    fn get_sequence(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let sequence = self
            .contigs
            .get(contig)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: contig.to_string(),
            })?;

        check_range(contig, start, end, sequence.len() as u64)?;
        sequence
            .get(start as usize..end as usize)
            .map(str::to_string)
            .ok_or_else(|| FerroError::InvalidCoordinates {
                msg: format!(
                    "Position {}-{} of {} does not fall on base boundaries",
                    start, end, contig
                ),
            })
    }

    fn contig_length(&self, contig: &str) -> Option<u64> {
        self.contigs.get(contig).map(|s| s.len() as u64)
    }
}
