//! Typed error handling for the CRM service
//!
//! User-input problems (bad email, unknown product id, ...) are NOT errors in
//! this sense: mutations report them as strings in their payload. `CrmError`
//! covers the faults that abort a request or a process:
//!
//! - [`ConfigError`]: settings could not be loaded or are inconsistent
//! - [`StorageError`]: the storage backend failed or is unavailable
//! - [`QueryError`]: a read request asked for something the schema cannot do
//!
//! # Example
//!
//! ```rust,ignore
//! match CrmConfig::from_yaml_file("config/missing.yaml") {
//!     Err(CrmError::Config(ConfigError::Io { path, .. })) => eprintln!("no settings at {}", path),
//!     Err(e) => eprintln!("{}", e),
//!     Ok(config) => run(config).await?,
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the crate
#[derive(Debug)]
pub enum CrmError {
    /// Configuration errors
    Config(ConfigError),

    /// Storage backend errors
    Storage(StorageError),

    /// Invalid read requests
    Query(QueryError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for CrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrmError::Config(e) => write!(f, "{}", e),
            CrmError::Storage(e) => write!(f, "{}", e),
            CrmError::Query(e) => write!(f, "{}", e),
            CrmError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrmError::Config(e) => Some(e),
            CrmError::Storage(e) => Some(e),
            CrmError::Query(e) => Some(e),
            CrmError::Internal(_) => None,
        }
    }
}

/// Error body for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl CrmError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrmError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrmError::Storage(e) => e.status_code(),
            CrmError::Query(_) => StatusCode::BAD_REQUEST,
            CrmError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrmError::Config(_) => "CONFIG_ERROR",
            CrmError::Storage(e) => e.error_code(),
            CrmError::Query(e) => e.error_code(),
            CrmError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading settings
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read
    Io { path: String, message: String },

    /// The settings file is not valid YAML for `CrmConfig`
    Parse { message: String },

    /// A setting is missing or contradicts another one
    Invalid { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Cannot read settings file '{}': {}", path, message)
            }
            ConfigError::Parse { message } => write!(f, "Invalid settings: {}", message),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid setting '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for CrmError {
    fn from(err: ConfigError) -> Self {
        CrmError::Config(err)
    }
}

impl From<serde_yaml::Error> for CrmError {
    fn from(err: serde_yaml::Error) -> Self {
        CrmError::Config(ConfigError::Parse {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// The backend could not be reached
    Unavailable { backend: String, message: String },

    /// A statement failed
    QueryFailed { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable { backend, message } => {
                write!(f, "Storage backend '{}' unavailable: {}", backend, message)
            }
            StorageError::QueryFailed { backend, message } => {
                write!(f, "Storage query failed on '{}': {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::QueryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
            StorageError::QueryFailed { .. } => "STORAGE_QUERY_FAILED",
        }
    }
}

impl From<StorageError> for CrmError {
    fn from(err: StorageError) -> Self {
        CrmError::Storage(err)
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors caused by a read request the schema cannot satisfy
#[derive(Debug)]
pub enum QueryError {
    /// `orderBy` named a field the entity cannot be sorted by
    UnknownSortField {
        entity_type: String,
        field: String,
        allowed: Vec<&'static str>,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownSortField {
                entity_type,
                field,
                allowed,
            } => write!(
                f,
                "Cannot order {} by '{}'. Choices are: {}",
                entity_type,
                field,
                allowed.join(", ")
            ),
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::UnknownSortField { .. } => "UNKNOWN_SORT_FIELD",
        }
    }
}

impl From<QueryError> for CrmError {
    fn from(err: QueryError) -> Self {
        CrmError::Query(err)
    }
}

impl From<anyhow::Error> for CrmError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CrmError>() {
            Ok(crm) => crm,
            Err(err) => CrmError::Internal(err.to_string()),
        }
    }
}
