//! Error types for the warfarin_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for warfarin_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field is absent, or a field value is outside its domain.
    ///
    /// `field` is the first offending field in the model's declared order.
    #[error("Missing or invalid input for '{field}': {detail}")]
    MissingOrInvalidInput { field: String, detail: String },

    /// Model identifier not in the catalog
    #[error("Unknown model '{0}' (expected one of: iwpc, gage, xiangya, biss, clover)")]
    UnknownModel(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Model catalog failed its consistency check
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn missing(field: &str) -> Self {
        Error::MissingOrInvalidInput {
            field: field.to_string(),
            detail: "required field is missing".to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, detail: impl Into<String>) -> Self {
        Error::MissingOrInvalidInput {
            field: field.to_string(),
            detail: detail.into(),
        }
    }

    /// True for errors the caller should answer by re-prompting for input
    ///
    /// This is the coarse "please fill all required fields" signal.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::MissingOrInvalidInput { .. })
    }

    /// Name of the offending field, if this is an input error
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::MissingOrInvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_exposes_field() {
        let err = Error::missing("age");
        assert!(err.is_input_error());
        assert_eq!(err.field(), Some("age"));
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_unknown_model_is_not_input_error() {
        let err = Error::UnknownModel("warfarin9000".into());
        assert!(!err.is_input_error());
        assert_eq!(err.field(), None);
    }
}
