//! Nucleotide bases and sequence utilities
//!
//! [`Base`] covers the unambiguous bases plus the IUPAC ambiguity codes, and
//! carries the fixed table mapping each code to the bases it stands for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal marker for an empty (deleted or not-yet-inserted) allele
pub const DELETION_MARKER: &str = "-";

/// DNA/RNA nucleotide base (including IUPAC ambiguity codes)
///
/// Uses `#[repr(u8)]` with ASCII discriminants for zero-cost `as u8` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Base {
    // Standard bases
    A = b'A',
    C = b'C',
    G = b'G',
    T = b'T',
    U = b'U', // RNA

    // IUPAC ambiguity codes
    R = b'R', // A or G (puRine)
    Y = b'Y', // C or T (pYrimidine)
    S = b'S', // G or C (Strong)
    W = b'W', // A or T (Weak)
    K = b'K', // G or T (Keto)
    M = b'M', // A or C (aMino)
    B = b'B', // C, G, or T (not A)
    D = b'D', // A, G, or T (not C)
    H = b'H', // A, C, or T (not G)
    V = b'V', // A, C, or G (not T)
    N = b'N', // Any base
}

impl Base {
    /// Parse a base from a character, case-insensitively
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            'U' => Some(Base::U),
            'R' => Some(Base::R),
            'Y' => Some(Base::Y),
            'S' => Some(Base::S),
            'W' => Some(Base::W),
            'K' => Some(Base::K),
            'M' => Some(Base::M),
            'B' => Some(Base::B),
            'D' => Some(Base::D),
            'H' => Some(Base::H),
            'V' => Some(Base::V),
            'N' => Some(Base::N),
            _ => None,
        }
    }

    /// Convert to ASCII character. Zero-cost due to `#[repr(u8)]`.
    #[inline]
    pub fn to_char(self) -> char {
        self as u8 as char
    }

    /// True for the IUPAC codes that stand for more than one base
    #[inline]
    pub fn is_ambiguous(self) -> bool {
        !matches!(self, Base::A | Base::C | Base::G | Base::T | Base::U)
    }

    /// The unambiguous DNA bases this code stands for, in `ACGT` order
    ///
    /// Unambiguous bases expand to themselves.
    pub fn expansion(self) -> &'static [Base] {
        match self {
            Base::A => &[Base::A],
            Base::C => &[Base::C],
            Base::G => &[Base::G],
            Base::T => &[Base::T],
            Base::U => &[Base::U],
            Base::R => &[Base::A, Base::G],
            Base::Y => &[Base::C, Base::T],
            Base::S => &[Base::C, Base::G],
            Base::W => &[Base::A, Base::T],
            Base::K => &[Base::G, Base::T],
            Base::M => &[Base::A, Base::C],
            Base::B => &[Base::C, Base::G, Base::T],
            Base::D => &[Base::A, Base::G, Base::T],
            Base::H => &[Base::A, Base::C, Base::T],
            Base::V => &[Base::A, Base::C, Base::G],
            Base::N => &[Base::A, Base::C, Base::G, Base::T],
        }
    }

    /// Watson-Crick complement; ambiguity codes map to their complementary code
    pub fn complement(self) -> Base {
        match self {
            Base::A => Base::T,
            Base::T | Base::U => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::R => Base::Y,
            Base::Y => Base::R,
            Base::S => Base::S,
            Base::W => Base::W,
            Base::K => Base::M,
            Base::M => Base::K,
            Base::B => Base::V,
            Base::V => Base::B,
            Base::D => Base::H,
            Base::H => Base::D,
            Base::N => Base::N,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Reverse complement a DNA sequence
///
/// IUPAC codes are complemented, case is preserved, and any other character
/// (including the deletion marker `-`) passes through unchanged.
///
/// # Examples
///
/// ```
/// use ferro_alleles::sequence::reverse_complement;
///
/// assert_eq!(reverse_complement("ATGC"), "GCAT");
/// assert_eq!(reverse_complement("aattggcc"), "ggccaatt");
/// assert_eq!(reverse_complement("ACR"), "YGT");
/// assert_eq!(reverse_complement("-"), "-");
/// ```
pub fn reverse_complement(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|c| match Base::from_char(c) {
            Some(base) => {
                let comp = base.complement().to_char();
                if c.is_ascii_lowercase() {
                    comp.to_ascii_lowercase()
                } else {
                    comp
                }
            }
            None => c,
        })
        .collect()
}

/// True if `seq` is empty or the deletion marker
#[inline]
pub fn is_empty_allele(seq: &str) -> bool {
    seq.is_empty() || seq == DELETION_MARKER
}
