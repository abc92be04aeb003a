//! Caller identity.
//!
//! Authentication belongs to the host; actions only ask who the caller is.
//! A `None` answer makes every action fail with `Error::Unauthenticated`
//! before it touches the store.

/// Answers "who is making this request?".
pub trait SessionProvider {
    /// The authenticated user id, or `None` when there is no session.
    fn current_user(&self) -> Option<String>;
}

/// A session resolved once, up front, by the request layer.
///
/// The CLI builds one from `--user` / `FIN_USER` / the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user_id: Option<String>,
}

impl StaticSession {
    /// Session for a known user; a blank id is anonymous.
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::from_optional(Some(user_id.into()))
    }

    /// No session at all.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Session from an optional id; blank ids count as anonymous.
    #[must_use]
    pub fn from_optional(user_id: Option<String>) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<String> {
        self.user_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_user_is_anonymous() {
        assert_eq!(StaticSession::from_optional(Some("  ".to_string())).current_user(), None);
        assert_eq!(StaticSession::from_optional(None).current_user(), None);
        assert_eq!(
            StaticSession::from_optional(Some("u1".to_string())).current_user(),
            Some("u1".to_string())
        );
    }

    #[test]
    fn test_blank_user_id_is_anonymous() {
        assert_eq!(StaticSession::user("").current_user(), None);
        assert_eq!(StaticSession::user(" \t").current_user(), None);
        assert_eq!(StaticSession::user("u1").current_user(), Some("u1".to_string()));
    }
}
