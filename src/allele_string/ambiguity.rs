//! Single-nucleotide ambiguity expansion
//!
//! Only single-character alleles are expanded. Expanding codes inside longer
//! alleles would multiply the allele count combinatorially.

use crate::sequence::{Base, DELETION_MARKER};

/// True if `allele` is a single IUPAC ambiguity code
///
/// `A`, `C`, `G`, `T` and the deletion marker are never ambiguous; characters
/// outside the IUPAC alphabet are left alone.
pub fn is_ambiguous_single_nucleotide(allele: &str) -> bool {
    let mut chars = allele.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            !matches!(c, 'A' | 'C' | 'G' | 'T')
                && allele != DELETION_MARKER
                && Base::from_char(c).is_some_and(Base::is_ambiguous)
        }
        _ => false,
    }
}

/// Replace every single-nucleotide ambiguity code with the bases it encodes
///
/// Expansions are spliced in place of the ambiguous allele; all other alleles
/// keep their position. Duplicates are not removed here.
///
/// # Examples
///
/// ```
/// use ferro_alleles::allele_string::ambiguity::disambiguate_single_nucleotides;
///
/// let alleles = vec!["T".to_string(), "M".to_string()];
/// assert_eq!(disambiguate_single_nucleotides(alleles), vec!["T", "A", "C"]);
///
/// // Multi-base alleles are never expanded
/// let alleles = vec!["AR".to_string()];
/// assert_eq!(disambiguate_single_nucleotides(alleles), vec!["AR"]);
/// ```
pub fn disambiguate_single_nucleotides<I>(alleles: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut expanded = Vec::new();
    for allele in alleles {
        match allele.chars().next().and_then(Base::from_char) {
            Some(base) if is_ambiguous_single_nucleotide(&allele) => {
                expanded.extend(base.expansion().iter().map(|b| b.to_char().to_string()));
            }
            _ => expanded.push(allele),
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(alleles: &[&str]) -> Vec<String> {
        alleles.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_ambiguous_single_nucleotide() {
        assert!(is_ambiguous_single_nucleotide("M"));
        assert!(is_ambiguous_single_nucleotide("N"));
        assert!(is_ambiguous_single_nucleotide("r"));
        assert!(!is_ambiguous_single_nucleotide("A"));
        assert!(!is_ambiguous_single_nucleotide("-"));
        assert!(!is_ambiguous_single_nucleotide("U"));
        assert!(!is_ambiguous_single_nucleotide("X"));
        assert!(!is_ambiguous_single_nucleotide("MR"));
        assert!(!is_ambiguous_single_nucleotide(""));
    }

    #[test]
    fn test_expand_in_place() {
        let result = disambiguate_single_nucleotides(owned(&["G", "R", "TT"]));
        assert_eq!(result, vec!["G", "A", "G", "TT"]);
    }

    #[test]
    fn test_expand_n() {
        let result = disambiguate_single_nucleotides(owned(&["N"]));
        assert_eq!(result, vec!["A", "C", "G", "T"]);
    }

    #[test]
    fn test_lowercase_code_expands_to_uppercase_bases() {
        let result = disambiguate_single_nucleotides(owned(&["y"]));
        assert_eq!(result, vec!["C", "T"]);
    }

    #[test]
    fn test_passthrough() {
        let input = owned(&["A", "-", "ACGT", "X", "U"]);
        assert_eq!(disambiguate_single_nucleotides(input.clone()), input);
    }

    #[test]
    fn test_empty_input() {
        assert!(disambiguate_single_nucleotides(Vec::<String>::new()).is_empty());
    }
}
