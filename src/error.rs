//! Custom error types for manhours-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for manhours-cli operations
#[derive(Error, Debug)]
pub enum ManhoursError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Field is read-only (locked row or derived value)
    #[error("Field is locked: {0}")]
    Locked(String),

    /// No working set is open in the current session
    #[error("No working set is open. Run 'manhours estimate open <group>' first.")]
    NoWorkingSet,

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// PDF / model-output extraction errors
    #[error("Extraction error: {message}")]
    Extraction {
        message: String,
        /// Raw language-model output, kept for display when parsing failed
        model_output: Option<String>,
    },

    /// Language model transport or protocol errors
    #[error("Language model error: {0}")]
    Llm(String),
}

impl ManhoursError {
    /// Create a "not found" error for item groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Item Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for group items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group Item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for manpower items
    pub fn manpower_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Manpower Item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for working-set rows (1-based for display)
    pub fn row_not_found(position: usize) -> Self {
        Self::NotFound {
            entity_type: "Row",
            identifier: position.to_string(),
        }
    }

    /// Create an extraction error without model output
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            model_output: None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Raw model output attached to an extraction failure, if any
    pub fn model_output(&self) -> Option<&str> {
        match self {
            Self::Extraction { model_output, .. } => model_output.as_deref(),
            _ => None,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ManhoursError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ManhoursError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ManhoursError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for ManhoursError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for manhours-cli operations
pub type ManhoursResult<T> = Result<T, ManhoursError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ManhoursError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = ManhoursError::group_not_found("Scaffolding");
        assert_eq!(err.to_string(), "Item Group not found: Scaffolding");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_extraction_error_keeps_model_output() {
        let err = ManhoursError::Extraction {
            message: "Failed to parse table from model response.".into(),
            model_output: Some("not json".into()),
        };
        assert_eq!(
            err.to_string(),
            "Extraction error: Failed to parse table from model response."
        );
        assert_eq!(err.model_output(), Some("not json"));
        assert_eq!(ManhoursError::extraction("x").model_output(), None);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ManhoursError = io_err.into();
        assert!(matches!(err, ManhoursError::Io(_)));
    }
}
