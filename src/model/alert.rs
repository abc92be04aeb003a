//! Alert model.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Critical,
    Warning,
    Info,
    Success,
}

impl AlertType {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }

}

impl FromStr for AlertType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            other => Err(Error::InvalidArgument(format!(
                "alert type must be critical, warning, info or success, got '{other}'"
            ))),
        }
    }
}

/// Which alerts a list returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertFilter {
    #[default]
    All,
    Unread,
    Type(AlertType),
}

impl AlertFilter {
    /// The type column value to match, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<AlertType> {
        match self {
            Self::Type(kind) => Some(*kind),
            Self::All | Self::Unread => None,
        }
    }

    #[must_use]
    pub const fn unread_only(&self) -> bool {
        matches!(self, Self::Unread)
    }
}

impl From<AlertType> for AlertFilter {
    fn from(kind: AlertType) -> Self {
        Self::Type(kind)
    }
}

impl FromStr for AlertFilter {
    type Err = Error;

    /// `"all"`, `"unread"` or an alert type, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            _ => s.parse().map(Self::Type).map_err(|_| {
                Error::InvalidArgument(format!(
                    "alert filter must be all, unread, critical, warning, info or success, got '{s}'"
                ))
            }),
        }
    }
}

/// A notification shown on the alerts page.
///
/// Only `is_read` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique identifier (`alert_` prefix)
    pub id: String,

    pub user_id: String,

    pub title: String,

    pub message: String,

    #[serde(rename = "type")]
    pub kind: AlertType,

    pub category: String,

    pub is_read: bool,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

/// Input for creating an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub category: String,
}

impl Alert {
    /// Create a new unread alert owned by `user_id`.
    pub fn new(user_id: &str, input: NewAlert) -> Self {
        Self {
            id: super::new_id("alert"),
            user_id: user_id.to_string(),
            title: input.title,
            message: input.message,
            kind: input.kind,
            category: input.category,
            is_read: false,
            created_at: super::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<AlertFilter>().unwrap(), AlertFilter::All);
        assert_eq!("ALL".parse::<AlertFilter>().unwrap(), AlertFilter::All);
        assert_eq!("unread".parse::<AlertFilter>().unwrap(), AlertFilter::Unread);
        assert_eq!(
            "warning".parse::<AlertFilter>().unwrap(),
            AlertFilter::Type(AlertType::Warning)
        );
        assert!("urgent".parse::<AlertFilter>().is_err());
    }

    #[test]
    fn test_filter_columns() {
        assert_eq!(AlertFilter::All.kind(), None);
        assert!(!AlertFilter::All.unread_only());
        assert!(AlertFilter::Unread.unread_only());
        assert_eq!(AlertFilter::from(AlertType::Info).kind(), Some(AlertType::Info));
    }
}
