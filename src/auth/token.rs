//! Cached bearer token for Nexus Dashboard API authentication.
//!
//! This module provides the [`AuthToken`] type, which holds the token
//! returned by the login endpoint together with its estimated expiry.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Seconds before expiry at which a token is already treated as invalid.
///
/// Keeps a request from starting with a token that expires while in flight.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 3;

/// Lifetime assumed for a freshly issued token.
pub const TOKEN_REFRESH_INTERVAL_SECS: i64 = 1200;

/// A bearer token and its estimated expiry.
///
/// A token starts out empty and is overwritten on every successful login.
/// It is never explicitly cleared; it simply stops being valid once the
/// current time comes within [`EXPIRY_SAFETY_MARGIN_SECS`] of its expiry.
///
/// # Security
///
/// The `Debug` implementation masks the token value.
///
/// # Example
///
/// ```rust
/// use nd_client::AuthToken;
///
/// let mut token = AuthToken::new();
/// assert!(!token.is_valid());
///
/// token.set_token("abc123", 1200);
/// assert!(token.is_valid());
/// assert_eq!(token.token(), "abc123");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Creates an empty, invalid token.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            token: String::new(),
            expires_at: None,
        }
    }

    /// Returns the raw token string (empty when not authenticated).
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the estimated expiry, if a token has been set.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` if the token can be used right now.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Returns `true` if the token is non-empty and `now` plus the safety
    /// margin is still strictly before its expiry.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        self.expires_at
            .is_some_and(|expires_at| expires_at > now + Duration::seconds(EXPIRY_SAFETY_MARGIN_SECS))
    }

    /// Stores a new token that expires `ttl_secs` seconds from now.
    ///
    /// Overwrites any previous token unconditionally.
    pub fn set_token(&mut self, token: impl Into<String>, ttl_secs: i64) {
        self.set_token_at(token, ttl_secs, Utc::now());
    }

    /// Stores a new token that expires `ttl_secs` seconds after `now`.
    pub fn set_token_at(&mut self, token: impl Into<String>, ttl_secs: i64, now: DateTime<Utc>) {
        self.token = token.into();
        self.expires_at = Some(now + Duration::seconds(ttl_secs));
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "*****" };
        f.debug_struct("AuthToken")
            .field("token", &token)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// Verify AuthToken is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthToken>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_invalid() {
        let token = AuthToken::new();
        assert!(!token.is_valid());
        assert!(token.token().is_empty());
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn test_set_token_makes_token_valid() {
        let mut token = AuthToken::new();
        token.set_token("token-value", TOKEN_REFRESH_INTERVAL_SECS);
        assert!(token.is_valid());
        assert_eq!(token.token(), "token-value");
    }

    #[test]
    fn test_token_inside_safety_margin_is_invalid() {
        let now = Utc::now();
        let mut token = AuthToken::new();
        token.set_token_at("token-value", 60, now);

        assert!(token.is_valid_at(now));
        assert!(token.is_valid_at(now + Duration::seconds(56)));
        // expiry == now + margin is not strictly after
        assert!(!token.is_valid_at(now + Duration::seconds(57)));
        assert!(!token.is_valid_at(now + Duration::seconds(120)));
    }

    #[test]
    fn test_short_ttl_is_invalid_immediately() {
        let mut token = AuthToken::new();
        token.set_token("token-value", EXPIRY_SAFETY_MARGIN_SECS - 1);
        assert!(!token.is_valid());
    }

    #[test]
    fn test_empty_token_is_invalid_even_with_expiry() {
        let mut token = AuthToken::new();
        token.set_token("", TOKEN_REFRESH_INTERVAL_SECS);
        assert!(!token.is_valid());
    }

    #[test]
    fn test_set_token_overwrites_previous_value() {
        let mut token = AuthToken::new();
        token.set_token("first", 1);
        token.set_token("second", TOKEN_REFRESH_INTERVAL_SECS);
        assert_eq!(token.token(), "second");
        assert!(token.is_valid());
    }

    #[test]
    fn test_debug_masks_token() {
        let mut token = AuthToken::new();
        token.set_token("very-secret-token", 60);
        let debug = format!("{token:?}");
        assert!(debug.contains("*****"));
        assert!(!debug.contains("very-secret-token"));
    }
}
