//! Error types for the PulseVo core library.
//!
//! Every variant carries a stable code so failures can be grepped in logs
//! and reported back by users without copying whole messages.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Config | Environment, config file, and validation errors |
//! | E2001-E2099 | Api | Transport, HTTP status, and response decoding errors |
//! | E3001-E3099 | Input | Upload, query, and filter validation errors |
//! | E9001-E9099 | General | IO and serialization errors |

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Seconds reported for a timeout when the client's configured value is not at hand.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The main error type for the PulseVo core library.
#[derive(Debug, Error)]
pub enum PulsevoError {
    // ========================================================================
    // Configuration Errors (E1001-E1099)
    // ========================================================================
    /// Configuration file parse error
    #[error("[E1004] Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// Invalid configuration value
    #[error("[E1005] Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    // ========================================================================
    // API Errors (E2001-E2099)
    // ========================================================================
    /// Request could not be sent or the connection dropped mid-flight
    #[error("[E2001] API request failed: {0}")]
    ApiRequestFailed(String),

    /// Response body did not match the expected shape
    #[error("[E2002] Failed to parse API response: {0}")]
    ApiParseError(String),

    /// Backend answered with a non-success status
    #[error("[E2003] {path} returned HTTP {status}: {message}")]
    ApiStatus {
        status: u16,
        path: String,
        message: String,
    },

    /// Requested resource does not exist
    #[error("[E2004] Not found: {0}")]
    ApiNotFound(String),

    /// Backend rejected the credentials
    #[error("[E2005] API authentication failed: {0}")]
    ApiAuthenticationFailed(String),

    /// Backend is throttling requests
    #[error("[E2006] API rate limit exceeded, retry after {retry_after_secs} seconds")]
    ApiRateLimitExceeded { retry_after_secs: u64 },

    /// Backend unreachable or returning 5xx
    #[error("[E2007] API service unavailable: {0}")]
    ApiServiceUnavailable(String),

    /// Request timed out
    #[error("[E2008] API request timed out after {0} seconds")]
    ApiTimeout(u64),

    // ========================================================================
    // Input Errors (E3001-E3099)
    // ========================================================================
    /// Upload rejected before any network call
    #[error("[E3001] {0}")]
    InvalidUpload(String),

    /// Query text was empty after trimming
    #[error("[E3002] Question is empty")]
    EmptyQuestion,

    /// A query is already awaiting a response
    #[error("[E3003] A question is already being answered")]
    QueryInFlight,

    /// Unknown time, status, or other filter value
    #[error("[E3004] Invalid filter: {0}")]
    InvalidFilter(String),

    // ========================================================================
    // General Errors (E9001-E9099)
    // ========================================================================
    /// IO error
    #[error("[E9002] IO error: {0}")]
    IoError(String),

    /// Serialization/deserialization error
    #[error("[E9003] Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for PulseVo operations.
pub type PulsevoResult<T> = Result<T, PulsevoError>;

impl PulsevoError {
    /// Map a non-success HTTP status to an error, keeping the failing path.
    pub fn from_status(status: u16, path: impl Into<String>, body: impl Into<String>) -> Self {
        let path = path.into();
        let body = body.into();
        match status {
            401 | 403 => PulsevoError::ApiAuthenticationFailed(format!("{} ({})", path, status)),
            404 => PulsevoError::ApiNotFound(path),
            429 => PulsevoError::ApiRateLimitExceeded {
                retry_after_secs: 60,
            },
            500..=599 => PulsevoError::ApiServiceUnavailable(format!("{} returned {}", path, status)),
            _ => PulsevoError::ApiStatus {
                status,
                path,
                message: if body.is_empty() {
                    "no response body".to_string()
                } else {
                    body
                },
            },
        }
    }

    /// Create an upload validation error.
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        PulsevoError::InvalidUpload(message.into())
    }
}

// ============================================================================
// From trait implementations for seamless error propagation
// ============================================================================

impl From<reqwest::Error> for PulsevoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PulsevoError::ApiTimeout(DEFAULT_TIMEOUT_SECS)
        } else if err.is_connect() {
            PulsevoError::ApiServiceUnavailable(err.to_string())
        } else if err.is_status() {
            let path = err
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            match err.status() {
                Some(status) => PulsevoError::from_status(status.as_u16(), path, err.to_string()),
                None => PulsevoError::ApiRequestFailed(err.to_string()),
            }
        } else if err.is_decode() {
            PulsevoError::ApiParseError(err.to_string())
        } else {
            PulsevoError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PulsevoError {
    fn from(err: serde_json::Error) -> Self {
        PulsevoError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for PulsevoError {
    fn from(err: std::io::Error) -> Self {
        PulsevoError::IoError(err.to_string())
    }
}

impl From<config::ConfigError> for PulsevoError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => PulsevoError::InvalidConfigValue {
                key,
                message: "Key not found".to_string(),
            },
            config::ConfigError::FileParse { uri, cause } => PulsevoError::ConfigParseError(
                format!("Failed to parse {}: {}", uri.unwrap_or_default(), cause),
            ),
            config::ConfigError::Type {
                origin,
                unexpected,
                expected,
                key,
            } => PulsevoError::InvalidConfigValue {
                key: key.unwrap_or_else(|| origin.map(|o| o.to_string()).unwrap_or_default()),
                message: format!("Expected {}, got {}", expected, unexpected),
            },
            _ => PulsevoError::ConfigParseError(err.to_string()),
        }
    }
}

impl From<crate::config::ConfigLoadError> for PulsevoError {
    fn from(err: crate::config::ConfigLoadError) -> Self {
        use crate::config::ConfigLoadError;
        match err {
            ConfigLoadError::Config(e) => e.into(),
            ConfigLoadError::MissingRequired(key) => PulsevoError::InvalidConfigValue {
                key,
                message: "Missing required value".to_string(),
            },
            ConfigLoadError::InvalidValue { key, message } => {
                PulsevoError::InvalidConfigValue { key, message }
            }
            ConfigLoadError::Io(e) => e.into(),
        }
    }
}

// ============================================================================
// Error categorization helpers
// ============================================================================

impl PulsevoError {
    /// Returns true if this error is related to configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PulsevoError::ConfigParseError(_) | PulsevoError::InvalidConfigValue { .. }
        )
    }

    /// Returns true if this error came from talking to the backend.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            PulsevoError::ApiRequestFailed(_)
                | PulsevoError::ApiParseError(_)
                | PulsevoError::ApiStatus { .. }
                | PulsevoError::ApiNotFound(_)
                | PulsevoError::ApiAuthenticationFailed(_)
                | PulsevoError::ApiRateLimitExceeded { .. }
                | PulsevoError::ApiServiceUnavailable(_)
                | PulsevoError::ApiTimeout(_)
        )
    }

    /// Returns true if this error was raised before anything was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PulsevoError::InvalidUpload(_)
                | PulsevoError::EmptyQuestion
                | PulsevoError::QueryInFlight
                | PulsevoError::InvalidFilter(_)
        )
    }

    /// Returns true if this error is transient and the operation might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PulsevoError::ApiRateLimitExceeded { .. }
                | PulsevoError::ApiServiceUnavailable(_)
                | PulsevoError::ApiTimeout(_)
        )
    }

    /// Returns a suggested retry delay in seconds if the error is transient.
    pub fn suggested_retry_delay(&self) -> Option<u64> {
        match self {
            PulsevoError::ApiRateLimitExceeded { retry_after_secs } => Some(*retry_after_secs),
            PulsevoError::ApiServiceUnavailable(_) => Some(5),
            PulsevoError::ApiTimeout(_) => Some(10),
            _ => None,
        }
    }

    /// Returns an error code suitable for logging or external reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            PulsevoError::ConfigParseError(_) => "E1004",
            PulsevoError::InvalidConfigValue { .. } => "E1005",
            PulsevoError::ApiRequestFailed(_) => "E2001",
            PulsevoError::ApiParseError(_) => "E2002",
            PulsevoError::ApiStatus { .. } => "E2003",
            PulsevoError::ApiNotFound(_) => "E2004",
            PulsevoError::ApiAuthenticationFailed(_) => "E2005",
            PulsevoError::ApiRateLimitExceeded { .. } => "E2006",
            PulsevoError::ApiServiceUnavailable(_) => "E2007",
            PulsevoError::ApiTimeout(_) => "E2008",
            PulsevoError::InvalidUpload(_) => "E3001",
            PulsevoError::EmptyQuestion => "E3002",
            PulsevoError::QueryInFlight => "E3003",
            PulsevoError::InvalidFilter(_) => "E3004",
            PulsevoError::IoError(_) => "E9002",
            PulsevoError::SerializationError(_) => "E9003",
        }
    }

    /// Returns a user-friendly suggestion for how to resolve this error.
    pub fn user_suggestion(&self) -> Option<&'static str> {
        match self {
            PulsevoError::ApiServiceUnavailable(_) | PulsevoError::ApiRequestFailed(_) => {
                Some("Check that the PulseVo backend is running and PULSEVO_API_URL is correct")
            }
            PulsevoError::ApiTimeout(_) => {
                Some("The backend is slow to respond. Raise api.timeout_secs or try again")
            }
            PulsevoError::ApiAuthenticationFailed(_) => {
                Some("Check the API tokens with 'pulsevo settings show'")
            }
            PulsevoError::ApiRateLimitExceeded { .. } => {
                Some("Wait for the rate limit to reset before retrying")
            }
            PulsevoError::InvalidConfigValue { .. } => Some(
                "Fix the value in config.toml or the PULSEVO_* environment, or run 'pulsevo config init --force'",
            ),
            PulsevoError::ConfigParseError(_) => {
                Some("Run 'pulsevo config init --force' to rewrite the configuration file")
            }
            PulsevoError::InvalidUpload(_) => Some("Only .csv task exports can be uploaded"),
            PulsevoError::InvalidFilter(_) => {
                Some("Valid time filters are: today, week, month, all")
            }
            _ => None,
        }
    }

    /// Log this error with appropriate severity level.
    pub fn log(&self) {
        let code = self.error_code();
        let suggestion = self.user_suggestion();

        if self.is_transient() {
            warn!(
                error_code = %code,
                suggestion = suggestion,
                "Transient error occurred: {}",
                self
            );
        } else {
            error!(
                error_code = %code,
                suggestion = suggestion,
                "Error occurred: {}",
                self
            );
        }
    }
}

// ============================================================================
// User-friendly error formatting for CLI
// ============================================================================

/// Format an error for CLI display with suggestions.
pub struct CliErrorDisplay<'a> {
    error: &'a PulsevoError,
    show_suggestion: bool,
}

impl<'a> CliErrorDisplay<'a> {
    pub fn new(error: &'a PulsevoError) -> Self {
        Self {
            error,
            show_suggestion: true,
        }
    }

    pub fn without_suggestion(mut self) -> Self {
        self.show_suggestion = false;
        self
    }
}

impl<'a> fmt::Display for CliErrorDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.error)?;

        if self.show_suggestion {
            if let Some(suggestion) = self.error.user_suggestion() {
                writeln!(f)?;
                writeln!(f, "  Suggestion: {}", suggestion)?;
            }
        }

        if self.error.is_transient() {
            if let Some(delay) = self.error.suggested_retry_delay() {
                writeln!(f)?;
                writeln!(
                    f,
                    "  This error may be temporary. Try again in {} seconds.",
                    delay
                )?;
            }
        }

        Ok(())
    }
}
