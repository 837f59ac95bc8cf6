//! Output formatting utilities for CLI operations

use serde_json::json;
use std::io::{self, Write};
use std::str::FromStr;

use crate::allele_string::AlleleString;
use crate::error::FerroError;
use crate::overlap::VariationOverlap;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tab-separated text (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "tsv" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// Write one overlap: `name  feature  contig:start-end  ref  alt1,alt2`
///
/// An overlap without alternates prints `.` in the last column.
pub fn output_overlap<W: Write>(
    writer: &mut W,
    overlap: &VariationOverlap,
    format: OutputFormat,
) -> io::Result<()> {
    let summary = overlap.summary();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, &summary)?;
            writeln!(writer)
        }
        OutputFormat::Text => writeln!(writer, "{}", summary),
    }
}

/// Write the decoded alleles of an allele string
pub fn output_alleles<W: Write>(
    writer: &mut W,
    input: &str,
    alleles: &AlleleString,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({ "input": input, "alleles": alleles.alleles() });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => {
            for allele in alleles {
                writeln!(writer, "{}", allele)?;
            }
            Ok(())
        }
    }
}

/// Write an error with optional line number context
///
/// ```
/// use ferro_alleles::cli::{output_error_with_context, OutputFormat};
/// use ferro_alleles::FerroError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = FerroError::invalid_input("bad site");
/// output_error_with_context(&mut buffer, "rs1", &error, OutputFormat::Text, Some(3)).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.starts_with("ERROR (line 3): rs1"));
/// ```
pub fn output_error_with_context<W: Write>(
    writer: &mut W,
    input: &str,
    error: &FerroError,
    format: OutputFormat,
    line_number: Option<usize>,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = json!({
                "input": input,
                "error": error.to_string(),
                "code": error.code().as_str(),
                "status": "error",
            });
            if let Some(line) = line_number {
                value["line"] = json!(line);
            }
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => match line_number {
            Some(line) => writeln!(writer, "ERROR (line {}): {} - {}", line, input, error),
            None => writeln!(writer, "ERROR: {} - {}", input, error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Strand;
    use crate::feature::{Feature, FeatureKind};
    use crate::overlap::OverlapConfig;
    use crate::reference::MockProvider;
    use crate::variation::VariationSite;
    use std::io::Cursor;

    fn overlap() -> VariationOverlap {
        let provider = MockProvider::with_test_data();
        let feature = Feature::new("T1", FeatureKind::Transcript, "chr2", 1, 12, Strand::Plus);
        let site = VariationSite::new(1, "rs1", "chr2", 4, 4, Strand::Plus, "A/C/G");
        VariationOverlap::new(feature, site, &provider, OverlapConfig::new()).unwrap()
    }

    fn render<F: FnOnce(&mut Cursor<Vec<u8>>) -> io::Result<()>>(f: F) -> String {
        let mut buffer = Cursor::new(Vec::new());
        f(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("vcf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_overlap_text() {
        let out = render(|w| output_overlap(w, &overlap(), OutputFormat::Text));
        assert_eq!(out, "rs1\tT1\tchr2:4-4\tA\tC,G\n");
    }

    #[test]
    fn test_output_overlap_json() {
        let out = render(|w| output_overlap(w, &overlap(), OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["reference"], "A");
        assert_eq!(value["alternates"], json!(["C", "G"]));
    }

    #[test]
    fn test_output_alleles() {
        let alleles = AlleleString::decode("(CA)2/-");
        let text = render(|w| output_alleles(w, "(CA)2/-", &alleles, OutputFormat::Text));
        assert_eq!(text, "CACA\n-\n");

        let out = render(|w| output_alleles(w, "(CA)2/-", &alleles, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["alleles"], json!(["CACA", "-"]));
    }

    #[test]
    fn test_output_error_json() {
        let error = FerroError::SiteNotFound { id: 9 };
        let out = render(|w| {
            output_error_with_context(w, "9", &error, OutputFormat::Json, Some(2))
        });
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["line"], 2);
        assert_eq!(value["code"], error.code().as_str());
    }
}
