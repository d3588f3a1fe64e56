//! Error handling module

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for operations that can fail with `DriftError`
pub type Result<T> = std::result::Result<T, DriftError>;

/// Comprehensive error type for the policy drift checking system.
///
/// This enum covers all possible error conditions that can occur while
/// loading baselines, fetching live policies, and comparing documents.
#[derive(Error, Debug)]
pub enum DriftError {
    /// File system operation errors with detailed context
    #[error("File system error during {operation} on path '{path}': {source}")]
    FileSystem {
        /// The operation that failed (e.g., "read", "list directory")
        operation: String,
        /// The file path involved in the operation
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing and serialization errors with context
    #[error("JSON parsing error in {context}: {source}")]
    JsonParsing {
        /// Context where the JSON error occurred (e.g., "baseline document", "live policy")
        context: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Input validation errors for user-provided data
    #[error("Validation error: {message}")]
    Validation {
        /// Detailed validation error message
        message: String,
        /// Optional field name that failed validation
        field: Option<String>,
    },

    /// Bucket names outside the configured inventory
    #[error("Unknown bucket '{bucket_name}': not present in the configured bucket inventory")]
    UnknownBucket {
        /// The bucket name that was requested
        bucket_name: String,
    },

    /// Missing baseline documents for configured buckets
    #[error("Baseline document(s) missing under '{baselines_dir}': {missing:?}")]
    BaselinesMissing {
        /// The configured baselines directory
        baselines_dir: PathBuf,
        /// Baseline file names that could not be found
        missing: Vec<String>,
    },

    /// AWS access verification errors
    #[error("AWS access verification failed: {message}")]
    AccessVerification {
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DriftError {
    /// Create a file system error with operation context
    pub(crate) fn file_system(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parsing error with context
    pub(crate) fn json_parsing(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParsing {
            context: context.into(),
            source,
        }
    }

    /// Create a validation error
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error for a specific field
    pub(crate) fn validation_for_field(
        message: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an unknown bucket error
    pub(crate) fn unknown_bucket(bucket_name: impl Into<String>) -> Self {
        Self::UnknownBucket {
            bucket_name: bucket_name.into(),
        }
    }

    pub(crate) fn access_verification(message: impl Into<String>) -> Self {
        Self::AccessVerification {
            message: message.into(),
            source: None,
        }
    }
}

/// Convert common standard library errors to `DriftError`
impl From<std::io::Error> for DriftError {
    fn from(error: std::io::Error) -> Self {
        Self::FileSystem {
            operation: "unknown operation".to_string(),
            path: PathBuf::from("unknown path"),
            source: error,
        }
    }
}

impl From<serde_json::Error> for DriftError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonParsing {
            context: "unknown context".to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_system_error_creation() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error = DriftError::file_system("read", "/path/to/baseline.json", io_error);

        assert!(matches!(error, DriftError::FileSystem { .. }));
        assert!(error.to_string().contains("read"));
        assert!(error.to_string().contains("/path/to/baseline.json"));
    }

    #[test]
    fn test_unknown_bucket_error_names_the_bucket() {
        let error = DriftError::unknown_bucket("eg-pz-prod-s3-mystery-ohio");
        assert!(error.to_string().contains("eg-pz-prod-s3-mystery-ohio"));
        assert!(error.to_string().contains("inventory"));
    }

    #[test]
    fn test_validation_error_with_field() {
        let error = DriftError::validation_for_field("bucket name must not be empty", "buckets");
        if let DriftError::Validation { field, .. } = &error {
            assert_eq!(field.as_deref(), Some("buckets"));
        } else {
            panic!("Expected Validation error");
        }
    }
}
