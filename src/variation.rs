//! Variation sites
//!
//! A [`VariationSite`] is a genomic position or range with a declared allele
//! string. Coordinates are 1-based inclusive; insertions are written with
//! `start == end + 1`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allele_string::AlleleString;
use crate::coords::{is_insertion_site, site_to_half_open, Strand};
use crate::error::FerroError;

/// A variation site with its declared alleles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariationSite {
    /// Numeric identifier (used by [`crate::cache::SiteCache`])
    pub id: u64,
    /// Display name, e.g. an rsID
    pub name: String,
    /// Chromosome/contig name
    pub contig: String,
    /// Start position (1-based, inclusive)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Strand the allele string is written on
    pub strand: Strand,
    /// Declared allele string, e.g. `A/G` or `-/(CA)3`
    pub allele_string: String,
}

impl VariationSite {
    /// Create a new variation site
    pub fn new(
        id: u64,
        name: impl Into<String>,
        contig: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
        allele_string: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            contig: contig.into(),
            start,
            end,
            strand,
            allele_string: allele_string.into(),
        }
    }

    /// Decode the declared allele string
    pub fn decoded_alleles(&self) -> AlleleString {
        AlleleString::decode(&self.allele_string)
    }

    /// True if the site sits between two bases
    pub fn is_insertion(&self) -> bool {
        is_insertion_site(self.start, self.end)
    }

    /// Check that the site carries everything overlap construction needs
    pub fn validate(&self) -> Result<(), FerroError> {
        if self.contig.trim().is_empty() {
            return Err(FerroError::invalid_input(format!(
                "variation site '{}' has no contig",
                self.name
            )));
        }
        if self.allele_string.trim().is_empty() {
            return Err(FerroError::invalid_input(format!(
                "variation site '{}' has no allele string",
                self.name
            )));
        }
        if site_to_half_open(self.start, self.end).is_none() {
            return Err(FerroError::invalid_input(format!(
                "variation site '{}' has invalid coordinates {}-{}",
                self.name, self.start, self.end
            )));
        }
        Ok(())
    }

    /// Parse a tab-separated record: `id name contig start end strand allele_string`
    ///
    /// Strand accepts `+`, `-`, `1` or `-1`.
    pub fn from_tsv_line(line: &str) -> Result<Self, FerroError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() < 7 {
            return Err(FerroError::invalid_input(format!(
                "expected 7 tab-separated fields, found {}: '{}'",
                fields.len(),
                line
            )));
        }

        let parse_u64 = |value: &str, what: &str| -> Result<u64, FerroError> {
            value
                .trim()
                .parse()
                .map_err(|_| FerroError::invalid_input(format!("invalid {} '{}'", what, value)))
        };

        let strand = fields[5]
            .parse::<Strand>()
            .map_err(FerroError::invalid_input)?;

        Ok(Self {
            id: parse_u64(fields[0], "id")?,
            name: fields[1].to_string(),
            contig: fields[2].to_string(),
            start: parse_u64(fields[3], "start")?,
            end: parse_u64(fields[4], "end")?,
            strand,
            allele_string: fields[6].trim().to_string(),
        })
    }
}

impl fmt::Display for VariationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}-{}({}) {}",
            self.name, self.contig, self.start, self.end, self.strand, self.allele_string
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snv() -> VariationSite {
        VariationSite::new(1, "rs1", "chr1", 10, 10, Strand::Plus, "A/G")
    }

    #[test]
    fn test_decoded_alleles() {
        let site = VariationSite::new(2, "rs2", "chr1", 15, 22, Strand::Plus, "(CA)4/(CA)3");
        assert_eq!(
            site.decoded_alleles().alleles(),
            &["CACACACA", "CACACA"]
        );
    }

    #[test]
    fn test_is_insertion() {
        assert!(!snv().is_insertion());
        let ins = VariationSite::new(3, "rs3", "chr1", 11, 10, Strand::Plus, "-/AT");
        assert!(ins.is_insertion());
    }

    #[test]
    fn test_validate() {
        assert!(snv().validate().is_ok());

        let mut site = snv();
        site.contig = String::new();
        assert!(matches!(
            site.validate(),
            Err(FerroError::InvalidInput { .. })
        ));

        let mut site = snv();
        site.allele_string = "  ".to_string();
        assert!(site.validate().is_err());

        let mut site = snv();
        site.start = 20;
        assert!(site.validate().is_err());
    }

    #[test]
    fn test_from_tsv_line() {
        let site = VariationSite::from_tsv_line("7\trs7\tchr2\t4\t4\t-1\tT/C\n").unwrap();
        assert_eq!(site.id, 7);
        assert_eq!(site.name, "rs7");
        assert_eq!(site.strand, Strand::Minus);
        assert_eq!(site.allele_string, "T/C");
    }

    #[test]
    fn test_from_tsv_line_errors() {
        assert!(VariationSite::from_tsv_line("1\trs1\tchr1").is_err());
        assert!(VariationSite::from_tsv_line("x\trs1\tchr1\t1\t1\t+\tA/G").is_err());
        assert!(VariationSite::from_tsv_line("1\trs1\tchr1\t1\t1\t?\tA/G").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(snv().to_string(), "rs1 chr1:10-10(+) A/G");
    }
}
