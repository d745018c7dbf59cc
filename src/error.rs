//! Error types for PetFriends API operations.
//!
//! HTTP status codes returned by the service are *not* errors here: every
//! client operation hands back an [`ApiResponse`](crate::types::ApiResponse)
//! whatever the status, because the contract suite asserts on non-2xx codes
//! as expected behaviour. [`ApiError`] only covers the cases where no
//! response could be obtained or interpreted at all:
//! - Configuration errors (missing credentials, malformed base URL)
//! - Request failures (network issues, connection refused)
//! - Timeouts
//! - Response parsing failures
//! - Fixture problems (photo files that cannot be read)
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use petfriends_contract::{ApiError, error::ErrorCategory};
//!
//! fn handle_error(err: ApiError) {
//!     if err.is_retryable() {
//!         println!("Retryable error: {}", err);
//!     }
//!
//!     match err.category() {
//!         ErrorCategory::Transient => println!("Service unreachable, try again later"),
//!         ErrorCategory::Client => println!("Fix the configuration and try again"),
//!         ErrorCategory::External => println!("Service misbehaved: {}", err.user_message()),
//!     }
//! }
//! ```

use crate::logging::{log_error, log_warn};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
///
/// Use [`ApiError::category()`] to get the category for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The PetFriends service or the network had an issue.
    External,

    /// The caller made a mistake that they can fix (missing credentials,
    /// bad base URL, missing fixture file).
    Client,

    /// Temporary failures that should be retried with backoff.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed; the run cannot trust the affected scenario.
    Error,

    /// Unexpected but recoverable situation.
    Warning,
}

// ============================================================================
// API error types
// ============================================================================

/// Convenient result type for PetFriends API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the PetFriends service.
///
/// Use the constructor methods, which log the error at creation:
///
/// ```rust
/// use petfriends_contract::ApiError;
///
/// let err = ApiError::configuration_error("PETFRIENDS_VALID_EMAIL is not set");
/// let err = ApiError::timeout(30);
/// ```
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ConfigurationError` | Client | No |
/// | `RequestFailed` | External | Yes |
/// | `Timeout` | Transient | Yes |
/// | `ResponseParsingError` | External | No |
/// | `FixtureError` | Client | No |
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client or suite configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The HTTP request could not be completed.
    ///
    /// No status code was received. Check the source error for the
    /// underlying cause.
    #[error("Request failed: {message}")]
    RequestFailed {
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single attempt or the whole retry budget ran out of time.
    #[error("Request timed out after {timeout_seconds}s")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout_seconds: u64,
    },

    /// The response arrived but its body could not be read or interpreted.
    #[error("Response parsing failed: {message}")]
    ResponseParsingError {
        /// Details about the parsing failure.
        message: String,
    },

    /// A local fixture file (pet photo) could not be loaded.
    #[error("Fixture {path:?} unavailable: {message}")]
    FixtureError {
        /// Path of the fixture that failed to load.
        path: PathBuf,
        /// Details about the failure.
        message: String,
    },
}

impl ApiError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::RequestFailed { .. } => ErrorCategory::External,
            Self::Timeout { .. } => ErrorCategory::Transient,
            Self::ResponseParsingError { .. } => ErrorCategory::External,
            Self::FixtureError { .. } => ErrorCategory::Client,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::RequestFailed { .. } => ErrorSeverity::Error,
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::ResponseParsingError { .. } => ErrorSeverity::Warning,
            Self::FixtureError { .. } => ErrorSeverity::Error,
        }
    }

    /// Whether this error is transient and should trigger a retry.
    ///
    /// Only failures where no status code came back are retried; a status
    /// code, whatever its value, is an answer from the service.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::RequestFailed { .. })
    }

    /// Convert to a short message suitable for a run report.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationError { message } => {
                format!("Suite configuration issue: {message}")
            }
            Self::RequestFailed { .. } => {
                "Unable to reach the PetFriends service. Please try again".to_string()
            }
            Self::Timeout { timeout_seconds } => {
                format!("PetFriends did not answer within {timeout_seconds} seconds")
            }
            Self::ResponseParsingError { .. } => {
                "Received an unreadable response from PetFriends".to_string()
            }
            Self::FixtureError { path, .. } => {
                format!("Fixture file {} could not be loaded", path.display())
            }
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "PetFriends configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn request_failed(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_error!(
            error_type = "request_failed",
            message = %message,
            has_source = source.is_some(),
            "PetFriends request execution failed"
        );
        Self::RequestFailed { message, source }
    }

    pub fn timeout(timeout_seconds: u64) -> Self {
        log_warn!(
            error_type = "timeout",
            timeout_seconds = timeout_seconds,
            "PetFriends request timed out"
        );
        Self::Timeout { timeout_seconds }
    }

    pub fn response_parsing_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "response_parsing_error",
            message = %message,
            "PetFriends response format invalid"
        );
        Self::ResponseParsingError { message }
    }

    pub fn fixture_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let path = path.into();
        let message = message.into();
        log_error!(
            error_type = "fixture_error",
            path = %path.display(),
            message = %message,
            "Fixture file could not be loaded"
        );
        Self::FixtureError { path, message }
    }
}
