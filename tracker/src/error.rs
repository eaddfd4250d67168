//! Error handling for the production tracker

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // Session errors
    #[error("No user is signed in")]
    NotAuthenticated,

    // Storage errors
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            AppError::NotAuthenticated => "NOT_AUTHENTICATED",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the alphabetically first field so the error is deterministic
        let first = errors
            .field_errors()
            .into_iter()
            .min_by_key(|(field, _)| *field)
            .map(|(field, field_errors)| {
                let message = field_errors
                    .first()
                    .and_then(|err| err.message.as_ref())
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            });

        match first {
            Some((field, message)) => AppError::Validation { field, message },
            None => AppError::validation("input", errors.to_string()),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(length(min = 1))]
        alias: String,
    }

    #[test]
    fn validation_errors_report_first_field() {
        let sample = Sample {
            name: String::new(),
            alias: String::new(),
        };
        let err: AppError = sample.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field, "alias"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_message_is_carried_over() {
        let sample = Sample {
            name: String::new(),
            alias: "x".to_string(),
        };
        let err: AppError = sample.validate().unwrap_err().into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "Validation error on name: name is required");
    }
}
