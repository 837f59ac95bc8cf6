//! CLI utilities for ferro-alleles
//!
//! Line handling, site-file reading and output formatting used by the
//! `ferro-alleles` binary, kept in the library so they can be unit tested.

pub mod format;

use std::io::BufRead;

use crate::error::FerroError;
use crate::variation::VariationSite;

pub use format::{output_alleles, output_error_with_context, output_overlap, OutputFormat};

/// UTF-8 BOM (Byte Order Mark) constant
const UTF8_BOM: &str = "\u{feff}";

/// Strip UTF-8 BOM from the beginning of a string if present.
///
/// ```
/// use ferro_alleles::cli::strip_bom;
///
/// assert_eq!(strip_bom("\u{feff}1\trs1"), "1\trs1");
/// assert_eq!(strip_bom("1\trs1"), "1\trs1");
/// ```
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// Strip a `#` comment and surrounding whitespace from an input line.
///
/// ```
/// use ferro_alleles::cli::strip_inline_comment;
///
/// assert_eq!(strip_inline_comment("A/G  # common"), "A/G");
/// assert_eq!(strip_inline_comment("# header"), "");
/// ```
pub fn strip_inline_comment(s: &str) -> &str {
    match s.find('#') {
        Some(pos) => s[..pos].trim(),
        None => s.trim(),
    }
}

/// Clean up one input line; `None` for blank and comment-only lines.
///
/// The BOM is only looked for on the first line of a file.
pub fn process_input_line(line: &str, is_first_line: bool) -> Option<&str> {
    let line = line.trim();
    let line = if is_first_line { strip_bom(line) } else { line };
    let line = strip_inline_comment(line);

    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

/// Read a tab-separated sites file (`id name contig start end strand allele_string`).
///
/// Each entry carries its 1-based line number. Malformed lines become `Err`
/// entries so the caller can report them and keep going.
pub fn read_sites<R: BufRead>(reader: R) -> Vec<(usize, Result<VariationSite, FerroError>)> {
    let mut sites = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                sites.push((i + 1, Err(e.into())));
                break;
            }
        };
        if let Some(record) = process_input_line(&line, i == 0) {
            sites.push((i + 1, VariationSite::from_tsv_line(record)));
        }
    }
    sites
}

/// Split a comma-separated `--keep` value into sequences.
///
/// ```
/// use ferro_alleles::cli::parse_keep_list;
///
/// assert_eq!(parse_keep_list("A, G,,-"), vec!["A", "G", "-"]);
/// ```
pub fn parse_keep_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_process_input_line() {
        assert_eq!(process_input_line("line", false), Some("line"));
        assert_eq!(process_input_line("line  # note", false), Some("line"));
        assert_eq!(process_input_line("\u{feff}line", true), Some("line"));
        // The BOM is not whitespace, so it survives on later lines
        assert_eq!(process_input_line("\u{feff}line", false), Some("\u{feff}line"));
        assert_eq!(process_input_line("   ", false), None);
        assert_eq!(process_input_line("# comment", false), None);
    }

    #[test]
    fn test_read_sites() {
        let input = "\u{feff}# id\tname\tcontig\tstart\tend\tstrand\talleles\n\
                     1\trs1\tchr1\t10\t10\t+\tA/G\n\
                     \n\
                     2\trs2\tchr1\t11\n\
                     3\trs3\tchr1\t12\t11\t-1\t-/AT\n";
        let sites = read_sites(Cursor::new(input));
        assert_eq!(sites.len(), 3);

        assert_eq!(sites[0].0, 2);
        assert_eq!(sites[0].1.as_ref().unwrap().name, "rs1");

        assert_eq!(sites[1].0, 4);
        assert!(sites[1].1.is_err());

        let ins = sites[2].1.as_ref().unwrap();
        assert!(ins.is_insertion());
        assert_eq!(ins.allele_string, "-/AT");
    }

    #[test]
    fn test_parse_keep_list() {
        assert_eq!(parse_keep_list("T"), vec!["T"]);
        assert!(parse_keep_list(" , ").is_empty());
    }
}
