//! Error types for the finance dashboard.
//!
//! Provides structured error handling with:
//! - The three request-level tiers: unauthenticated, persistence, AI
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes for the CLI
//! - Context-aware recovery hints
//! - The tagged `{data}` / `{error}` envelope returned to views

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    RowNotFound,

    // Auth / validation (exit 4)
    Unauthenticated,
    InvalidArgument,

    // AI (exit 6)
    GenerationError,
    ParseError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::RowNotFound => "ROW_NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::GenerationError => "GENERATION_ERROR",
            Self::ParseError => "PARSE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::RowNotFound => 3,
            Self::Unauthenticated | Self::InvalidArgument => 4,
            Self::GenerationError | Self::ParseError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in dashboard operations.
///
/// The `Display` text of the request-level variants is what views see in
/// the `{error: ...}` envelope, so it is kept stable.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not authenticated")]
    Unauthenticated,

    /// The store rejected the operation; the message is passed through verbatim.
    #[error("{0}")]
    Persistence(String),

    #[error("No row in {table} with id {id}")]
    RowNotFound { table: &'static str, id: String },

    /// The completion call failed. Carries the user-facing message.
    #[error("{0}")]
    Generation(String),

    #[error("Failed to parse AI response")]
    Parse { reason: String },

    #[error("Not initialized: run `fin init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::Persistence(_) => ErrorCode::DatabaseError,
            Self::RowNotFound { .. } => ErrorCode::RowNotFound,
            Self::Generation(_) => ErrorCode::GenerationError,
            Self::Parse { .. } => ErrorCode::ParseError,
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Unauthenticated => Some(
                "Pass --user <id>, set FIN_USER, or run `fin config set user_id <id>`".to_string(),
            ),
            Self::NotInitialized => Some("Run `fin init` to create the database".to_string()),
            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),
            Self::RowNotFound { table: "profiles", .. } => {
                Some("Create one with `fin profile create`".to_string())
            }
            Self::RowNotFound { table, .. } => Some(format!(
                "Check the id against the list command for {table}"
            )),
            Self::Generation(_) => Some(
                "Check `fin config show` for the AI provider, endpoint and API key".to_string(),
            ),
            Self::Parse { reason } => Some(format!("Model reply was not valid advice: {reason}")),
            Self::Persistence(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": self.to_string(),
            "code": code.as_str(),
            "exit_code": code.exit_code(),
        });

        if let Some(hint) = self.hint() {
            obj["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

// ── Tagged envelope ───────────────────────────────────────────

/// The tagged result object handed to views: `{"data": ...}` on success,
/// `{"error": "..."}` on failure.
#[derive(Debug, Serialize)]
pub enum ActionResult<T> {
    #[serde(rename = "data")]
    Data(T),
    #[serde(rename = "error")]
    Error(String),
}

impl<T> ActionResult<T> {
    /// Whether the view should render its error branch.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl<T> From<Result<T>> for ActionResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Data(data),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Payload of operations that return no row (deletes, read flips).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub const OK: Self = Self { success: true };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated_envelope() {
        let result: ActionResult<()> = Err(Error::Unauthenticated).into();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Not authenticated" }));
    }

    #[test]
    fn test_data_envelope() {
        let result: ActionResult<Success> = Ok(Success::OK).into();
        assert!(!result.is_error());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "data": { "success": true } }));
    }

    #[test]
    fn test_persistence_message_is_verbatim() {
        let err = Error::Persistence("duplicate key value".to_string());
        assert_eq!(err.to_string(), "duplicate key value");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_parse_error_message_hides_reason() {
        let err = Error::Parse { reason: "no JSON object".to_string() };
        assert_eq!(err.to_string(), "Failed to parse AI response");
        assert_eq!(err.error_code().as_str(), "PARSE_ERROR");
        assert!(err.hint().unwrap().contains("no JSON object"));
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let json = Error::NotInitialized.to_structured_json();
        assert_eq!(json["code"], "NOT_INITIALIZED");
        assert_eq!(json["exit_code"], 2);
        assert!(json["hint"].as_str().unwrap().contains("fin init"));
    }
}
