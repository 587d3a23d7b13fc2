//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;

/// A validated Nexus Dashboard username.
///
/// # Example
///
/// ```rust
/// use nd_client::Username;
///
/// let user = Username::new("admin").unwrap();
/// assert_eq!(user.as_ref(), "admin");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Creates a new validated username.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyUsername`] if the username is empty.
    pub fn new(username: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        if username.is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Nexus Dashboard password.
///
/// # Security
///
/// The `Debug` implementation masks the value, displaying only
/// `Password(*****)`.
///
/// ```rust
/// use nd_client::Password;
///
/// let password = Password::new("hunter2").unwrap();
/// assert_eq!(format!("{:?}", password), "Password(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*****)")
    }
}

/// The validated base URL of a Nexus Dashboard cluster.
///
/// Only `http` and `https` URLs with a host are accepted. Any path on the
/// base URL is kept as a prefix for every request path.
///
/// # Example
///
/// ```rust
/// use nd_client::BaseUrl;
///
/// let url = BaseUrl::new("https://nd.example.com/prefix/").unwrap();
/// assert_eq!(url.host_name(), Some("nd.example.com"));
/// assert_eq!(url.path_prefix(), "/prefix");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parses and validates a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL cannot be parsed,
    /// has no host, or uses a scheme other than `http`/`https`.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let raw = url.as_ref().trim();
        let invalid = || ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
        };

        let parsed = Url::parse(raw).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid());
        }

        Ok(Self(parsed))
    }

    /// Returns the host name of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the base path with all trailing slashes removed.
    ///
    /// `https://nd` and `https://nd//` both yield `""`; `https://nd/x/` yields `"/x"`.
    #[must_use]
    pub fn path_prefix(&self) -> &str {
        self.0.path().trim_end_matches('/')
    }

    /// Returns the underlying URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Proxy credentials in `username:password` form.
///
/// # Security
///
/// The `Debug` implementation masks the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials(String);

impl ProxyCredentials {
    /// Creates validated proxy credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProxyCredentials`] unless the value
    /// contains a non-empty username before the first `:`.
    pub fn new(credentials: impl Into<String>) -> Result<Self, ConfigError> {
        let credentials = credentials.into();
        match credentials.split_once(':') {
            Some((user, _)) if !user.is_empty() => Ok(Self(credentials)),
            _ => Err(ConfigError::InvalidProxyCredentials),
        }
    }

    /// Returns the username portion.
    #[must_use]
    pub fn username(&self) -> &str {
        self.0.split_once(':').map_or("", |(user, _)| user)
    }
}

impl AsRef<str> for ProxyCredentials {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProxyCredentials(*****)")
    }
}
