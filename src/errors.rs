//! # Application Error Types
//!
//! This module defines common error types used throughout the virtual
//! dietitian service. It provides structured error handling for the
//! resolution pipeline and its collaborators.
//!
//! Business-logic conditions (unresolved foods, disabled tiers, empty
//! input) are NOT errors here; they are represented in result types.
//! `AppError` is reserved for configuration bugs, dataset problems, and
//! I/O failures at the tier boundary.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Local nutrition dataset loading/parsing errors
    Dataset(String),
    /// Request payload validation errors
    Validation(String),
    /// Network/communication errors from external nutrient tiers
    Network(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Dataset(msg) => write!(f, "[DATASET] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::Network(msg) => write!(f, "[NETWORK] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::error;

    /// Log network errors from external nutrient tiers with lookup context
    pub fn log_tier_error(
        error: &impl std::fmt::Display,
        tier: &str,
        operation: &str,
        query: Option<&str>,
    ) {
        error!(
            error = %error,
            tier = %tier,
            operation = %operation,
            query = ?query,
            "Nutrient tier operation failed"
        );
    }

    /// Log dataset loading errors with path context
    pub fn log_dataset_error(error: &impl std::fmt::Display, operation: &str, path: Option<&str>) {
        error!(
            error = %error,
            operation = %operation,
            path = ?path,
            "Nutrition dataset operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
