//! Error types for ferro-alleles
//!
//! Errors carry a stable [`ErrorCode`] so callers can branch on the category
//! without matching on message text. Malformed allele strings are never an
//! error: the decoder degrades and passes the offending text through.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Input errors (E1xxx)
    /// Feature or variation site is missing required data
    InvalidInput = 1001,

    // Reference errors (E2xxx)
    /// Reference sequence lookup failed
    ReferenceLookup = 2001,
    /// Contig/sequence not present in the provider
    ReferenceNotFound = 2002,
    /// Variation site could not be resolved by identifier
    SiteNotFound = 2003,

    // Coordinate errors (E3xxx)
    /// Invalid coordinate range
    InvalidRange = 3001,

    // Configuration errors (E8xxx)
    /// Malformed configuration file
    ConfigError = 8001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON serialization error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid feature or variation site",
            ErrorCode::ReferenceLookup => "reference sequence lookup failed",
            ErrorCode::ReferenceNotFound => "reference not found",
            ErrorCode::SiteNotFound => "variation site not found",
            ErrorCode::InvalidRange => "invalid coordinate range",
            ErrorCode::ConfigError => "invalid configuration",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-alleles operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Required feature or site data is missing or inconsistent
    #[error("Invalid input: {msg}")]
    InvalidInput { msg: String },

    /// The reference sequence for a site could not be obtained
    #[error("Reference lookup failed for {contig}:{start}-{end}: {msg}")]
    ReferenceLookup {
        contig: String,
        start: u64,
        end: u64,
        msg: String,
    },

    /// Reference sequence (contig) not found in the provider
    #[error("Reference not found: {id}")]
    ReferenceNotFound { id: String },

    /// Variation site not found by identifier
    #[error("Variation site not found: {id}")]
    SiteNotFound { id: u64 },

    /// Invalid coordinates provided
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// Configuration could not be read or parsed
    #[error("Config error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON serialization error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl FerroError {
    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        FerroError::InvalidInput { msg: msg.into() }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::InvalidInput { .. } => ErrorCode::InvalidInput,
            FerroError::ReferenceLookup { .. } => ErrorCode::ReferenceLookup,
            FerroError::ReferenceNotFound { .. } => ErrorCode::ReferenceNotFound,
            FerroError::SiteNotFound { .. } => ErrorCode::SiteNotFound,
            FerroError::InvalidCoordinates { .. } => ErrorCode::InvalidRange,
            FerroError::Config { .. } => ErrorCode::ConfigError,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Format the error prefixed with its code, e.g. `[E2001] Reference lookup failed ...`
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidInput.as_str(), "E1001");
        assert_eq!(ErrorCode::ReferenceLookup.as_str(), "E2001");
        assert_eq!(ErrorCode::SiteNotFound.as_str(), "E2003");
        assert_eq!(ErrorCode::InvalidRange.as_str(), "E3001");
        assert_eq!(ErrorCode::ConfigError.as_str(), "E8001");
        assert_eq!(ErrorCode::IoError.as_str(), "E9001");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(
            ErrorCode::ReferenceLookup.description(),
            "reference sequence lookup failed"
        );
        assert_eq!(
            ErrorCode::InvalidInput.description(),
            "invalid feature or variation site"
        );
        assert_eq!(ErrorCode::JsonError.description(), "JSON error");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::InvalidInput), "E1001");
        assert_eq!(format!("{}", ErrorCode::IoError), "E9001");
    }

    #[test]
    fn test_ferro_error_code() {
        let err = FerroError::invalid_input("missing contig");
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let err = FerroError::ReferenceLookup {
            contig: "chr1".to_string(),
            start: 10,
            end: 12,
            msg: "out of range".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::ReferenceLookup);

        let err = FerroError::ReferenceNotFound {
            id: "chrUn".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::ReferenceNotFound);

        let err = FerroError::SiteNotFound { id: 42 };
        assert_eq!(err.code(), ErrorCode::SiteNotFound);

        let err = FerroError::InvalidCoordinates {
            msg: "bad coords".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::InvalidRange);
    }

    #[test]
    fn test_ferro_error_display() {
        let err = FerroError::ReferenceLookup {
            contig: "chr7".to_string(),
            start: 100,
            end: 101,
            msg: "no data".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("chr7:100-101"));
        assert!(display.contains("no data"));
    }

    #[test]
    fn test_detailed_message() {
        let err = FerroError::SiteNotFound { id: 7 };
        let msg = err.detailed_message();
        assert!(msg.starts_with("[E2003]"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ferro_err: FerroError = io_err.into();
        assert!(matches!(ferro_err, FerroError::Io { .. }));
        assert!(ferro_err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let ferro_err: FerroError = json_err.into();
        assert_eq!(ferro_err.code(), ErrorCode::JsonError);
    }

    #[test]
    fn test_error_code_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ErrorCode::InvalidInput);
        set.insert(ErrorCode::ReferenceLookup);
        assert!(set.contains(&ErrorCode::InvalidInput));
        assert!(!set.contains(&ErrorCode::IoError));
    }
}
