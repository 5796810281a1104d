//! Core error types for couplet-core.
//!
//! This module defines the error hierarchy using thiserror. The taxonomy
//! mirrors how failures surface to callers: validation and data-quality
//! problems, authorization rejections, typed not-found cases, and
//! transport failures from the backing store / push collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for couplet-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors (bad event shape, bad field values)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The acting user may not modify the target event
    #[error("Not authorized: user '{user_id}' cannot {action} event '{event_id}'")]
    NotAuthorized {
        user_id: String,
        action: &'static str,
        event_id: String,
    },

    /// Event id not present in the backing store
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// No partner is linked to the given user
    #[error("Partner not found for user '{0}'")]
    PartnerNotFound(String),

    /// The partner exists but has no registered push token
    #[error("Notification token not found for user '{0}'")]
    NoNotificationToken(String),

    /// Backing store failures (event/profile/health)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Push delivery failures
    #[error("Push error: {0}")]
    Push(#[from] PushError),

    /// Local partner-link cache failures
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must not precede start_time ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Backing-store errors. The concrete store (Firestore on device, SQLite or
/// in-memory in tests) maps its own failures into these.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store temporarily unreachable; existing data is left unchanged
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Query or write rejected by the backend
    #[error("Store request failed: {0}")]
    RequestFailed(String),
}

/// Push-delivery errors.
#[derive(Error, Debug)]
pub enum PushError {
    /// The callable endpoint could not resolve the recipient
    #[error("Push recipient not found: {0}")]
    RecipientNotFound(String),

    /// The callable endpoint rejected the delivery
    #[error("Push delivery failed (status {status}): {message}")]
    DeliveryFailed { status: u16, message: String },

    /// Transport-level failure before any response was received
    #[error("Push transport error: {0}")]
    Transport(String),
}

/// Partner-link cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the cache database
    #[error("Failed to open cache at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Cache query failed: {0}")]
    QueryFailed(String),

    /// Data directory unavailable
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        CacheError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
