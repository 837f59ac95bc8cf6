//! Structured fuzz target for overlap construction
//!
//! Builds allele strings from structured pieces and checks that overlaps
//! either fail cleanly or keep their alleles distinct.

#![no_main]

use arbitrary::Arbitrary;
use ferro_alleles::{
    Feature, FeatureKind, MockProvider, OverlapConfig, Strand, VariationOverlap, VariationSite,
};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

const GENOME: &str = "ACGTACGTAAGCTTCACACACAGGGATCCATGCATGCAT";

#[derive(Debug, Arbitrary)]
enum AllelePiece {
    Bases(Vec<Base>),
    Repeat(Vec<Base>, u8),
    Ambiguous(u8),
    Deletion,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum Base {
    A,
    C,
    G,
    T,
}

#[derive(Debug, Arbitrary)]
struct OverlapInput {
    pieces: Vec<AllelePiece>,
    start: u8,
    len: u8,
    minus: bool,
    disambiguate: bool,
    no_reference_check: bool,
    keep: Vec<u8>,
    reduce: bool,
}

fn bases(bases: &[Base]) -> String {
    bases
        .iter()
        .take(8)
        .map(|b| match b {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        })
        .collect()
}

impl AllelePiece {
    fn render(&self) -> String {
        match self {
            AllelePiece::Bases(b) => bases(b),
            AllelePiece::Repeat(b, n) => format!("({}){}", bases(b), n % 10),
            AllelePiece::Ambiguous(i) => char::from(b"RYSWKMBDHVN"[*i as usize % 11]).to_string(),
            AllelePiece::Deletion => "-".to_string(),
        }
    }
}

fuzz_target!(|input: OverlapInput| {
    if input.pieces.is_empty() || input.pieces.len() > 16 {
        return;
    }

    let allele_string: Vec<String> = input.pieces.iter().map(AllelePiece::render).collect();
    let start = u64::from(input.start % 40);
    let end = start + u64::from(input.len % 4);
    let strand = if input.minus { Strand::Minus } else { Strand::Plus };

    let provider = MockProvider::new().with_contig("chrF", GENOME);
    let feature = Feature::new("F", FeatureKind::Gene, "chrF", 1, 39, Strand::Plus);
    let site = VariationSite::new(1, "rsF", "chrF", start, end, strand, allele_string.join("/"));
    let mut config = OverlapConfig::new();
    config.disambiguate_single_nucleotide = input.disambiguate;
    config.no_reference_check = input.no_reference_check;

    let Ok(mut overlap) = VariationOverlap::new(feature, site, &provider, config) else {
        return;
    };

    let alternates: Vec<String> = overlap
        .alternate_alleles()
        .iter()
        .map(|a| a.sequence().to_string())
        .collect();
    if !alternates.is_empty() && !input.keep.is_empty() {
        let keep: Vec<&str> = input
            .keep
            .iter()
            .map(|i| alternates[*i as usize % alternates.len()].as_str())
            .collect();
        overlap.filter_alternates(keep);
    }
    if input.reduce {
        overlap.reduce_to_single_representative();
    }

    let all = overlap.all_alleles();
    let unique: HashSet<&str> = all.iter().map(|a| a.sequence()).collect();
    assert_eq!(unique.len(), all.len());
    for allele in &all {
        assert!(overlap.allele_by_sequence(allele.sequence()).is_some());
    }
});
