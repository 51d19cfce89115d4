use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between a clean analysis,
/// an analysis that found dead components, and outright failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - analysis completed (orphans are only fatal with --fail-on-orphans)
    Success = 0,
    /// Orphaned components were found and --fail-on-orphans was given
    OrphansDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (unreadable input, duplicate identity, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::OrphansDetected => write!(f, "Orphans Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for dependency analysis.
///
/// Unresolved and dangling references are deliberately absent here: they are
/// diagnostics collected alongside a successful result, not failures.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Duplicate component identity: {kind} '{name}' is defined by record #{first_index} and record #{second_index}\n\n💡 Hint: Component names must be unique per kind; rename or remove one of the two {kind} records")]
    DuplicateIdentity {
        kind: String,
        name: String,
        first_index: usize,
        second_index: usize,
    },

    #[error("Cannot add reference from unknown component: {kind} '{name}'\n\n💡 Hint: Add the source component to the graph before adding its references")]
    UnknownEdgeSource { kind: String, name: String },

    #[error("Cannot trace from {kind} '{name}': no such component\n\n💡 Hint: Check the spelling; component names are case-sensitive")]
    InvalidTraceStart { kind: String, name: String },

    #[error("Record document not found: {path}\n\n💡 Hint: {suggestion}")]
    InputNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse record document: {path}\nDetails: {details}\n\n💡 Hint: The document must contain 'views', 'columns', 'actions', 'slices' and/or 'format_rules' lists of records")]
    InputParseError { path: PathBuf, details: String },

    #[error("Unsupported record document format: {path}\n\n💡 Hint: Use a .json, .yaml, .yml or .toml file")]
    UnsupportedInputFormat { path: PathBuf },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for builder patterns and configuration
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::OrphansDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::OrphansDetected),
            "Orphans Detected (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::InvalidArguments),
            "Invalid Arguments (2)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_duplicate_identity_names_both_records() {
        let error = AnalysisError::DuplicateIdentity {
            kind: "view".to_string(),
            name: "Home".to_string(),
            first_index: 0,
            second_index: 3,
        };
        let display = format!("{}", error);
        assert!(display.contains("view 'Home'"));
        assert!(display.contains("record #0"));
        assert!(display.contains("record #3"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_input_not_found_display() {
        let error = AnalysisError::InputNotFound {
            path: PathBuf::from("/docs/app.yaml"),
            suggestion: "Pass the export with --input".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Record document not found"));
        assert!(display.contains("/docs/app.yaml"));
        assert!(display.contains("Pass the export with --input"));
    }

    #[test]
    fn test_input_parse_error_display() {
        let error = AnalysisError::InputParseError {
            path: PathBuf::from("/docs/app.json"),
            details: "expected value at line 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to parse record document"));
        assert!(display.contains("expected value at line 1"));
        assert!(display.contains("format_rules"));
    }

    #[test]
    fn test_invalid_trace_start_display() {
        let error = AnalysisError::InvalidTraceStart {
            kind: "action".to_string(),
            name: "Missing".to_string(),
        };
        assert!(format!("{}", error).contains("action 'Missing'"));
    }

    #[test]
    fn test_security_error_display() {
        let error = AnalysisError::SecurityError {
            path: PathBuf::from("/test/symlink"),
            reason: "Symbolic links are not allowed".to_string(),
            hint: "Use a regular file instead".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Security violation"));
        assert!(display.contains("/test/symlink"));
        assert!(display.contains("Use a regular file instead"));
    }
}
