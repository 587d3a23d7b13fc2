//! Error types for client configuration.
//!
//! This module contains the errors raised while building an [`NdConfig`]
//! or one of its validated newtypes. HTTP-level failures live in
//! [`crate::clients::HttpError`].
//!
//! # Example
//!
//! ```rust
//! use nd_client::{ConfigError, Username};
//!
//! let result = Username::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyUsername)));
//! ```
//!
//! [`NdConfig`]: crate::NdConfig

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant carries enough context to point the operator at the
/// offending setting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Username cannot be empty.
    #[error("Username cannot be empty. Username must be provided for the Nexus Dashboard client.")]
    EmptyUsername,

    /// Password cannot be empty.
    #[error("Password cannot be empty. Password must be provided for the Nexus Dashboard client.")]
    EmptyPassword,

    /// Base URL could not be parsed or is not http(s).
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://nd.example.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// Proxy URL could not be parsed.
    #[error("Invalid proxy URL '{url}': {reason}")]
    InvalidProxyUrl {
        /// The invalid URL that was provided.
        url: String,
        /// Why the proxy could not be configured.
        reason: String,
    },

    /// Proxy credentials are not in `username:password` form.
    #[error("Invalid proxy credentials. Expected format: 'username:password'.")]
    InvalidProxyCredentials,

    /// Retry policy values are inconsistent.
    #[error("Invalid retry policy: {reason}")]
    InvalidRetryPolicy {
        /// The reason the policy was rejected.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// An environment variable holds a value of the wrong type.
    #[error("Invalid input '{value}' for {key}: a {expected} value must be provided.")]
    InvalidEnvValue {
        /// The environment variable name.
        key: &'static str,
        /// The raw value that failed to parse.
        value: String,
        /// The kind of value that was expected.
        expected: &'static str,
    },

    /// The underlying HTTP transport could not be created.
    #[error("Failed to create HTTP transport: {reason}")]
    Transport {
        /// The reason reported by the HTTP library.
        reason: String,
    },
}
