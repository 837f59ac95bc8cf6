//! Configuration file support for ferro-alleles.
//!
//! Loads `.ferro.toml` files that set default allele-resolution options.
//!
//! # Example Configuration
//!
//! ```toml
//! [alleles]
//! disambiguate-single-nucleotide = true
//! no-reference-check = false
//! keep = ["A", "G"]
//!
//! [reference]
//! fasta = "/data/GRCh38.fa"
//! cache-size = 5000
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro.toml` in current directory
//! 2. `~/.config/ferro/config.toml`
//!
//! CLI flags take precedence over config file settings.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FerroError;
use crate::overlap::OverlapConfig;

/// Default number of reference windows kept by the cached FASTA provider.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Parsed configuration from a .ferro.toml file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FerroConfig {
    /// Allele resolution section.
    pub alleles: AllelesConfig,
    /// Reference sequence section.
    pub reference: ReferenceConfig,
}

/// `[alleles]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllelesConfig {
    pub disambiguate_single_nucleotide: Option<bool>,
    pub no_reference_check: Option<bool>,
    /// Alternate sequences to keep (passed to `filter_alternates`).
    pub keep: Vec<String>,
}

/// `[reference]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceConfig {
    pub fasta: Option<PathBuf>,
    pub cache_size: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Alleles,
    Reference,
    Other,
}

impl FerroConfig {
    /// Load configuration from the default locations.
    ///
    /// A file that exists but fails to parse is logged and skipped.
    pub fn load() -> Option<Self> {
        let mut candidates = vec![PathBuf::from(".ferro.toml")];
        if let Some(home) = dirs_home() {
            candidates.push(home.join(".config").join("ferro").join("config.toml"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    log::debug!("loaded configuration from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("ignoring {}: {}", path.display(), e),
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, FerroError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    ///
    /// Only the subset of TOML used here is understood: section headers,
    /// `key = value` lines with booleans, integers, quoted strings and flat
    /// string arrays, and trailing `#` comments.
    pub fn parse(content: &str) -> Result<Self, FerroError> {
        let mut config = FerroConfig::default();
        let mut section = Section::Other;

        for (lineno, raw) in content.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = match line[1..line.len() - 1].trim() {
                    "alleles" => Section::Alleles,
                    "reference" => Section::Reference,
                    _ => Section::Other,
                };
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(config_error(lineno, format!("expected 'key = value', found '{}'", line)));
            };
            let key = key.trim();
            let value = value.trim();

            match (section, key) {
                (Section::Alleles, "disambiguate-single-nucleotide") => {
                    config.alleles.disambiguate_single_nucleotide =
                        Some(parse_bool(value).ok_or_else(|| {
                            config_error(lineno, format!("{} must be true or false", key))
                        })?);
                }
                (Section::Alleles, "no-reference-check") => {
                    config.alleles.no_reference_check = Some(parse_bool(value).ok_or_else(|| {
                        config_error(lineno, format!("{} must be true or false", key))
                    })?);
                }
                (Section::Alleles, "keep") => {
                    config.alleles.keep = parse_string_array(value);
                }
                (Section::Reference, "fasta") => {
                    config.reference.fasta = Some(PathBuf::from(unquote(value)));
                }
                (Section::Reference, "cache-size") => {
                    let size = value.parse::<usize>().map_err(|_| {
                        config_error(lineno, format!("cache-size must be an integer, found '{}'", value))
                    })?;
                    config.reference.cache_size = Some(size);
                }
                (Section::Other, _) => {}
                _ => log::warn!("unknown configuration key '{}' on line {}", key, lineno + 1),
            }
        }

        Ok(config)
    }

    /// Overlap options from this file alone.
    pub fn to_overlap_config(&self) -> OverlapConfig {
        OverlapConfig {
            disambiguate_single_nucleotide: self
                .alleles
                .disambiguate_single_nucleotide
                .unwrap_or(false),
            no_reference_check: self.alleles.no_reference_check.unwrap_or(false),
        }
    }

    /// Merge this config with CLI flags; a flag that is set wins.
    pub fn merge_with_cli(&self, disambiguate: bool, no_reference_check: bool) -> OverlapConfig {
        let mut config = self.to_overlap_config();
        if disambiguate {
            config.disambiguate_single_nucleotide = true;
        }
        if no_reference_check {
            config.no_reference_check = true;
        }
        config
    }

    /// Sequences to keep: CLI list if non-empty, otherwise the file's.
    pub fn merge_keep(&self, cli_keep: &[String]) -> Vec<String> {
        if cli_keep.is_empty() {
            self.alleles.keep.clone()
        } else {
            cli_keep.to_vec()
        }
    }

    /// FASTA cache capacity, falling back to [`DEFAULT_CACHE_SIZE`].
    pub fn cache_size(&self) -> usize {
        self.reference.cache_size.unwrap_or(DEFAULT_CACHE_SIZE)
    }
}

fn config_error(lineno: usize, msg: String) -> FerroError {
    FerroError::Config {
        msg: format!("line {}: {}", lineno + 1, msg),
    }
}

/// Drop a trailing `# comment` that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = None;
    for (i, c) in line.char_indices() {
        match (c, in_quotes) {
            ('"' | '\'', None) => in_quotes = Some(c),
            (q, Some(open)) if q == open => in_quotes = None,
            ('#', None) => return &line[..i],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"').trim_matches('\'')
}

fn parse_bool(value: &str) -> Option<bool> {
    match unquote(value) {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a TOML array of strings like `["A", "G"]`.
fn parse_string_array(value: &str) -> Vec<String> {
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Vec::new();
    }

    let inner = &value[1..value.len() - 1];
    inner
        .split(',')
        .map(|s| unquote(s).to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_empty_config() {
        let config = FerroConfig::parse("").unwrap();
        assert_eq!(config, FerroConfig::default());
        assert_eq!(config.to_overlap_config(), OverlapConfig::new());
        assert_eq!(config.cache_size(), DEFAULT_CACHE_SIZE);
    }

    #[test]
    fn test_parse_alleles_section() {
        let content = r#"
[alleles]
disambiguate-single-nucleotide = true
no-reference-check = false
keep = ["A", "G"]
"#;
        let config = FerroConfig::parse(content).unwrap();
        assert_eq!(config.alleles.disambiguate_single_nucleotide, Some(true));
        assert_eq!(config.alleles.no_reference_check, Some(false));
        assert_eq!(config.alleles.keep, vec!["A", "G"]);

        let overlap = config.to_overlap_config();
        assert!(overlap.disambiguate_single_nucleotide);
        assert!(!overlap.no_reference_check);
    }

    #[test]
    fn test_parse_reference_section() {
        let content = r#"
[reference]
fasta = "/data/ref.fa"  # GRCh38
cache-size = 50
"#;
        let config = FerroConfig::parse(content).unwrap();
        assert_eq!(config.reference.fasta, Some(PathBuf::from("/data/ref.fa")));
        assert_eq!(config.cache_size(), 50);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = FerroConfig::parse("[alleles]\nno-reference-check = maybe\n").unwrap_err();
        assert!(matches!(err, FerroError::Config { .. }));
        assert!(err.to_string().contains("line 2"));

        assert!(FerroConfig::parse("[reference]\ncache-size = lots\n").is_err());
        assert!(FerroConfig::parse("[alleles]\njust some words\n").is_err());
    }

    #[test]
    fn test_other_sections_ignored() {
        let content = r#"
[error-handling]
mode = "lenient"

[alleles]
no-reference-check = true
"#;
        let config = FerroConfig::parse(content).unwrap();
        assert_eq!(config.alleles.no_reference_check, Some(true));
    }

    #[test]
    fn test_merge_with_cli() {
        let config = FerroConfig::parse("[alleles]\nno-reference-check = true\n").unwrap();

        let merged = config.merge_with_cli(true, false);
        assert!(merged.disambiguate_single_nucleotide);
        assert!(merged.no_reference_check);

        assert_eq!(config.merge_keep(&[]), Vec::<String>::new());
        assert_eq!(config.merge_keep(&["T".to_string()]), vec!["T"]);
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a = 1 # note"), "a = 1 ");
        assert_eq!(strip_comment(r#"fasta = "/x/#y.fa""#), r#"fasta = "/x/#y.fa""#);
        assert_eq!(strip_comment("# whole line"), "");
    }

    #[test]
    fn test_parse_string_array() {
        assert_eq!(parse_string_array(r#"["A", "CT"]"#), vec!["A", "CT"]);
        assert_eq!(parse_string_array("['-']"), vec!["-"]);
        assert!(parse_string_array("").is_empty());
        assert!(parse_string_array("not an array").is_empty());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[alleles]\ndisambiguate-single-nucleotide = true").unwrap();
        let config = FerroConfig::load_from_path(file.path()).unwrap();
        assert!(config.to_overlap_config().disambiguate_single_nucleotide);

        let missing = FerroConfig::load_from_path(Path::new("/nonexistent/.ferro.toml"));
        assert!(matches!(missing, Err(FerroError::Io { .. })));
    }
}
