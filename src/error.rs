//! Unified error types for contactpack.
//!
//! This module provides a single [`ContactpackError`] enum that covers all error
//! cases in the library. The variants follow the same split the engine uses
//! when it decides what to do with a failure:
//!
//! - **Validation** errors are recovered inside the current turn (re-prompt)
//! - **Batch consistency** errors end the current workflow
//! - **I/O** and **delivery** errors are retried first, then reported
//!
//! # Example
//!
//! ```rust
//! use contactpack::error::ContactpackError;
//! use contactpack::retry::IsRetryable;
//!
//! let err = ContactpackError::validation("count must be a positive number");
//! assert!(!err.is_retryable());
//! assert!(err.is_validation());
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for contactpack operations.
///
/// # Example
///
/// ```rust
/// use contactpack::error::Result;
/// use contactpack::PhoneNumber;
///
/// fn my_function() -> Result<Vec<PhoneNumber>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ContactpackError>;

/// The error type for all contactpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContactpackError {
    /// An I/O error occurred while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file content is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// CSV reading/writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A spreadsheet could not be opened or decoded.
    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    /// A spreadsheet could not be written.
    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The file extension is not handled by the requested operation.
    #[error("Unsupported file type '{extension}' for {operation}")]
    UnsupportedFormat {
        /// Lowercased extension including the dot, e.g. `.pdf`
        extension: String,
        /// What was being attempted (e.g. "merge", "vCard output")
        operation: &'static str,
    },

    /// User input was malformed. Always recovered by re-prompting.
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The uploaded batch cannot be processed as a whole.
    ///
    /// This occurs when:
    /// - Files of different formats were uploaded to a merge
    /// - An uploaded file disappeared before it could be read
    #[error("Batch cannot be processed: {message}")]
    BatchConsistency {
        /// Description of the inconsistency
        message: String,
    },

    /// The transport could not deliver a file or message.
    #[error("Delivery failed{}: {message}", transient_suffix(.transient))]
    Delivery {
        /// Description from the transport
        message: String,
        /// Whether the failure is worth retrying (timeouts, network resets)
        transient: bool,
    },

    /// Temporary storage could not materialize or release a file.
    #[error("Storage error for {}: {message}", storage_target(.path))]
    Storage {
        /// Description of what went wrong
        message: String,
        /// The local path involved, if any
        path: Option<PathBuf>,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn transient_suffix(transient: &bool) -> &'static str {
    if *transient { " (transient)" } else { "" }
}

#[allow(clippy::ref_option)]
fn storage_target(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or_else(|| "upload".to_string(), |p| p.display().to_string())
}

impl From<std::string::FromUtf8Error> for ContactpackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ContactpackError::Utf8 {
            context: "file content".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ContactpackError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ContactpackError::Validation {
            message: message.into(),
        }
    }

    /// Creates a batch consistency error.
    pub fn batch(message: impl Into<String>) -> Self {
        ContactpackError::BatchConsistency {
            message: message.into(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported(extension: impl Into<String>, operation: &'static str) -> Self {
        ContactpackError::UnsupportedFormat {
            extension: extension.into(),
            operation,
        }
    }

    /// Creates a delivery error that should be retried.
    pub fn transient_delivery(message: impl Into<String>) -> Self {
        ContactpackError::Delivery {
            message: message.into(),
            transient: true,
        }
    }

    /// Creates a delivery error that should not be retried.
    pub fn permanent_delivery(message: impl Into<String>) -> Self {
        ContactpackError::Delivery {
            message: message.into(),
            transient: false,
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ContactpackError::Storage {
            message: message.into(),
            path,
        }
    }

    /// Returns true if this error was caused by malformed user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, ContactpackError::Validation { .. })
    }
}
