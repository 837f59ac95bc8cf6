//! Repeat-group expansion for allele strings
//!
//! A repeat group `(X)n` stands for `n` copies of the run `X`, so `A(CA)3/A`
//! expands to `ACACACA/A`. Groups that do not parse are copied through
//! verbatim.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    sequence::delimited,
    IResult, Parser,
};
use std::borrow::Cow;

/// Upper bound on the number of bases a single repeat group may expand to
///
/// Larger groups are treated as malformed and left compressed.
pub const MAX_REPEAT_EXPANSION: usize = 1_000_000;

#[inline]
fn is_repeat_base(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Parse one `(X)n` group, returning the run and the raw count digits
fn parse_repeat_group(input: &str) -> IResult<&str, (&str, &str)> {
    (
        delimited(char('('), take_while1(is_repeat_base), char(')')),
        digit1,
    )
        .parse(input)
}

/// Expand every repeat group in `input`
///
/// Returns the input unchanged (borrowed) when it contains no `(`.
///
/// # Examples
///
/// ```
/// use ferro_alleles::allele_string::parser::expand_repeats;
///
/// assert_eq!(expand_repeats("(CA)3/A"), "CACACA/A");
/// assert_eq!(expand_repeats("G(T)0"), "G");
/// assert_eq!(expand_repeats("A/T"), "A/T");
/// // Malformed groups pass through untouched
/// assert_eq!(expand_repeats("(CA/A"), "(CA/A");
/// ```
pub fn expand_repeats(input: &str) -> Cow<'_, str> {
    if !input.contains('(') {
        return Cow::Borrowed(input);
    }

    let mut expanded = String::with_capacity(input.len());
    let mut malformed = false;
    let mut rest = input;

    while let Some(open) = rest.find('(') {
        expanded.push_str(&rest[..open]);
        let group = &rest[open..];

        match parse_repeat_group(group) {
            Ok((remaining, (run, digits))) => match repeat_count(run, digits) {
                Some(count) => {
                    expanded.push_str(&run.repeat(count));
                    rest = remaining;
                }
                None => {
                    malformed = true;
                    let consumed = group.len() - remaining.len();
                    expanded.push_str(&group[..consumed]);
                    rest = remaining;
                }
            },
            Err(_) => {
                malformed = true;
                expanded.push('(');
                rest = &group[1..];
            }
        }
    }
    expanded.push_str(rest);

    if malformed {
        log::warn!(
            "Allele string '{}' contains malformed repeat groups; left unexpanded",
            input
        );
    }

    Cow::Owned(expanded)
}

/// Validated repeat count, or `None` if it overflows or exceeds the expansion cap
fn repeat_count(run: &str, digits: &str) -> Option<usize> {
    let count: usize = digits.parse().ok()?;
    let total = run.len().checked_mul(count)?;
    (total <= MAX_REPEAT_EXPANSION).then_some(count)
}
