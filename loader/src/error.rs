//! Error types for the Antolin import pipeline.
//!
//! This module defines one error type per stage:
//!
//! - [`ConfigError`] - Option resolution and password prompt errors
//! - [`InputError`] - File and CSV structure errors
//! - [`DateParseError`] - Malformed `available_since` values
//! - [`RowError`] - Fatal errors while transforming one record
//! - [`ImportError`] - Top-level errors returned by the loader
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The interactive password prompt failed or was cancelled.
    #[error("Password prompt failed: {0}")]
    PasswordPrompt(String),

    /// The encoding name is not one we can decode.
    #[error("Unsupported encoding: {0}")]
    UnknownEncoding(String),
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors reading the CSV input.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to open or read the file.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV stream is structurally broken.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Row Errors
// =============================================================================

/// Why an `available_since` value could not become a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// Not exactly three `.`-separated parts.
    #[error("expected day.month.year, found {0} part(s)")]
    PartCount(usize),

    /// A part is not an integer.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// The numbers do not name a calendar day.
    #[error("{day}.{month}.{year} is not a valid date")]
    OutOfRange { day: u32, month: u32, year: i32 },
}

/// Fatal errors while transforming one CSV record.
#[derive(Debug, Error)]
pub enum RowError {
    /// The record does not have the expected number of fields.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A field is not valid in the input encoding.
    #[error("Line {line}, column '{column}': invalid {encoding} byte sequence")]
    Decode {
        line: u64,
        column: &'static str,
        encoding: &'static str,
    },

    /// The `available_since` value is malformed.
    #[error("Line {line}, column 'available_since' (value '{value}'): {source}")]
    Date {
        line: u64,
        value: String,
        #[source]
        source: DateParseError,
    },
}

impl RowError {
    /// Input line the error refers to.
    pub fn line(&self) -> u64 {
        match self {
            RowError::ColumnCount { line, .. }
            | RowError::Decode { line, .. }
            | RowError::Date { line, .. } => *line,
        }
    }
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline::import_file`].
///
/// Every variant is fatal: by the time one reaches the caller the run's
/// transaction has been rolled back.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input error.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// A record could not be transformed.
    #[error("Row error: {0}")]
    Row(#[from] RowError),

    /// Could not connect to the database.
    #[error("Database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    /// An insert failed under the abort policy.
    #[error("Insert failed at line {line}: {source}")]
    Insert {
        line: u64,
        #[source]
        source: sqlx::Error,
    },

    /// Begin, commit or rollback failed.
    #[error("Transaction error: {0}")]
    Transaction(#[source] sqlx::Error),

    /// Progress output could not be written.
    #[error("Failed to write progress: {0}")]
    Progress(#[source] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for row transformation.
pub type RowResult<T> = Result<T, RowError>;

/// Result type for the import pipeline.
pub type ImportResult<T> = Result<T, ImportError>;
