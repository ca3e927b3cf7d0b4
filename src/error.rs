//! Error types for load set processing

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for load set operations
#[derive(Error, Debug)]
pub enum LoadsError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid JSON in file {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("Invalid LoadSet data in file {path}: {message}")]
    Schema { path: String, message: String },

    #[error("Unsupported force unit: {0}")]
    UnsupportedUnit(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("LoadSet has no load cases to envelope")]
    EmptyLoadSet,

    #[error("No LoadSet loaded - load one first")]
    NoLoadSet,

    #[error("No comparison LoadSet loaded - load a second LoadSet first")]
    NoComparisonLoadSet,

    #[error("No comparison available - run a comparison first")]
    NoComparison,

    #[error("Path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LoadsError {
    /// Classify a `serde_json` parse failure into a syntax or schema error
    pub(crate) fn from_parse(path: impl Into<String>, err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let path = path.into();
        match err.classify() {
            Category::Syntax | Category::Eof => LoadsError::InvalidJson {
                path,
                message: err.to_string(),
            },
            Category::Data => LoadsError::Schema {
                path,
                message: err.to_string(),
            },
            Category::Io => LoadsError::Io(std::io::Error::other(err.to_string())),
        }
    }

    /// Short code for programmatic handling by callers such as a tool layer
    pub fn error_code(&self) -> &'static str {
        match self {
            LoadsError::FileNotFound(_) => "FILE_NOT_FOUND",
            LoadsError::InvalidJson { .. } => "INVALID_JSON",
            LoadsError::Schema { .. } => "SCHEMA_ERROR",
            LoadsError::UnsupportedUnit(_) => "UNSUPPORTED_UNIT",
            LoadsError::InvalidInput(_) => "INVALID_INPUT",
            LoadsError::EmptyLoadSet => "EMPTY_LOADSET",
            LoadsError::NoLoadSet => "NO_LOADSET",
            LoadsError::NoComparisonLoadSet => "NO_COMPARISON_LOADSET",
            LoadsError::NoComparison => "NO_COMPARISON",
            LoadsError::NotADirectory(_) => "NOT_A_DIRECTORY",
            LoadsError::Solver(_) => "SOLVER_ERROR",
            LoadsError::Io(_) => "IO_ERROR",
            LoadsError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

/// Result type for load set operations
pub type LoadsResult<T> = Result<T, LoadsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_classification() {
        let syntax = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        assert_eq!(LoadsError::from_parse("a.json", syntax).error_code(), "INVALID_JSON");

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            version: i64,
        }
        let data = serde_json::from_str::<Needs>(r#"{"version": "one"}"#).unwrap_err();
        assert_eq!(LoadsError::from_parse("a.json", data).error_code(), "SCHEMA_ERROR");
    }
}
