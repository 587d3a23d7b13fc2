//! Configuration types for the Nexus Dashboard client.
//!
//! This module provides the configuration consumed by
//! [`RestClient`](crate::clients::rest::RestClient).
//!
//! # Overview
//!
//! - [`NdConfig`]: The immutable client configuration
//! - [`NdConfigBuilder`]: A builder for constructing [`NdConfig`] instances
//! - [`BaseUrl`], [`Username`], [`Password`], [`ProxyCredentials`]: validated newtypes
//! - [`RetryPolicy`]: Retry count and backoff settings
//!
//! Configuration can also be read from `ND_*` environment variables with
//! [`NdConfig::from_env`].
//!
//! # Example
//!
//! ```rust
//! use nd_client::{BaseUrl, NdConfig, Password, Username};
//!
//! let config = NdConfig::builder()
//!     .base_url(BaseUrl::new("https://nd.example.com").unwrap())
//!     .username(Username::new("admin").unwrap())
//!     .password(Password::new("secret").unwrap())
//!     .login_domain("DefaultAuth")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.insecure());
//! ```

mod newtypes;
mod retry;

pub use newtypes::{BaseUrl, Password, ProxyCredentials, Username};
pub use retry::{
    RetryPolicy, DEFAULT_BACKOFF_DELAY_FACTOR, DEFAULT_BACKOFF_MAX_DELAY,
    DEFAULT_BACKOFF_MIN_DELAY, DEFAULT_MAX_RETRIES,
};

use reqwest::Url;

use crate::error::ConfigError;

/// Login domain used when none is configured through the environment.
pub const DEFAULT_LOGIN_DOMAIN: &str = "DefaultAuth";

/// Configuration for the Nexus Dashboard client.
///
/// # Thread Safety
///
/// `NdConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct NdConfig {
    base_url: BaseUrl,
    username: Username,
    password: Password,
    login_domain: Option<String>,
    insecure: bool,
    proxy_url: Option<Url>,
    proxy_credentials: Option<ProxyCredentials>,
    retry_policy: RetryPolicy,
    skip_logging_payload: bool,
}

impl NdConfig {
    /// Creates a new builder for constructing an `NdConfig`.
    #[must_use]
    pub fn builder() -> NdConfigBuilder {
        NdConfigBuilder::new()
    }

    /// Builds a configuration from `ND_*` environment variables.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `ND_URL` | base URL | required |
    /// | `ND_USERNAME` | username | required |
    /// | `ND_PASSWORD` | password | required |
    /// | `ND_LOGIN_DOMAIN` | login domain | `DefaultAuth` |
    /// | `ND_INSECURE` | skip TLS verification | `true` |
    /// | `ND_PROXY_URL` | proxy URL | none |
    /// | `ND_PROXY_CREDS` | proxy `user:password` | none |
    /// | `ND_RETRIES` | max retries | `2` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Uses the same keys and defaults as [`from_env`](Self::from_env). Empty
    /// values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required key is missing or a value fails
    /// validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let base_url = get("ND_URL").ok_or(ConfigError::MissingRequiredField { field: "ND_URL" })?;
        let username = get("ND_USERNAME").ok_or(ConfigError::EmptyUsername)?;
        let password = get("ND_PASSWORD").ok_or(ConfigError::EmptyPassword)?;

        let insecure = match get("ND_INSECURE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidEnvValue {
                key: "ND_INSECURE",
                value,
                expected: "boolean",
            })?,
            None => true,
        };

        let max_retries = match get("ND_RETRIES") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnvValue {
                key: "ND_RETRIES",
                value,
                expected: "integer",
            })?,
            None => DEFAULT_MAX_RETRIES,
        };

        let retry_policy = RetryPolicy::new(
            max_retries,
            DEFAULT_BACKOFF_MIN_DELAY,
            DEFAULT_BACKOFF_MAX_DELAY,
            DEFAULT_BACKOFF_DELAY_FACTOR,
        )?;

        let mut builder = Self::builder()
            .base_url(BaseUrl::new(base_url)?)
            .username(Username::new(username)?)
            .password(Password::new(password)?)
            .login_domain(get("ND_LOGIN_DOMAIN").unwrap_or_else(|| DEFAULT_LOGIN_DOMAIN.to_string()))
            .insecure(insecure)
            .retry_policy(retry_policy);

        if let Some(proxy_url) = get("ND_PROXY_URL") {
            builder = builder.proxy_url(proxy_url);
        }
        if let Some(creds) = get("ND_PROXY_CREDS") {
            builder = builder.proxy_credentials(ProxyCredentials::new(creds)?);
        }

        builder.build()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }

    /// Returns the login domain, if configured.
    #[must_use]
    pub fn login_domain(&self) -> Option<&str> {
        self.login_domain.as_deref()
    }

    /// Returns whether TLS certificate verification is skipped.
    #[must_use]
    pub const fn insecure(&self) -> bool {
        self.insecure
    }

    /// Returns the proxy URL, if configured.
    #[must_use]
    pub const fn proxy_url(&self) -> Option<&Url> {
        self.proxy_url.as_ref()
    }

    /// Returns the proxy credentials, if configured.
    #[must_use]
    pub const fn proxy_credentials(&self) -> Option<&ProxyCredentials> {
        self.proxy_credentials.as_ref()
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns whether request and response payloads are kept out of logs.
    #[must_use]
    pub const fn skip_logging_payload(&self) -> bool {
        self.skip_logging_payload
    }
}

// Verify NdConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NdConfig>();
};

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Builder for constructing [`NdConfig`] instances.
///
/// Required fields are `base_url`, `username` and `password`.
///
/// # Defaults
///
/// - `insecure`: `true`
/// - `login_domain`: `None`
/// - `proxy_url` / `proxy_credentials`: `None`
/// - `retry_policy`: [`RetryPolicy::default`]
/// - `skip_logging_payload`: `false`
#[derive(Debug, Default)]
pub struct NdConfigBuilder {
    base_url: Option<BaseUrl>,
    username: Option<Username>,
    password: Option<Password>,
    login_domain: Option<String>,
    insecure: Option<bool>,
    proxy_url: Option<String>,
    proxy_credentials: Option<ProxyCredentials>,
    retry_policy: Option<RetryPolicy>,
    skip_logging_payload: bool,
}

impl NdConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the username (required).
    #[must_use]
    pub fn username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    /// Sets the password (required).
    #[must_use]
    pub fn password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }

    /// Sets the login domain sent with the login request.
    ///
    /// An empty string leaves the domain unset.
    #[must_use]
    pub fn login_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        self.login_domain = if domain.is_empty() { None } else { Some(domain) };
        self
    }

    /// Sets whether TLS certificate verification is skipped.
    #[must_use]
    pub const fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Sets the proxy URL. Validated in [`build`](Self::build).
    #[must_use]
    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    /// Sets the proxy credentials.
    #[must_use]
    pub fn proxy_credentials(mut self, credentials: ProxyCredentials) -> Self {
        self.proxy_credentials = Some(credentials);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Keeps request and response payloads out of logs.
    #[must_use]
    pub const fn skip_logging_payload(mut self, skip: bool) -> Self {
        self.skip_logging_payload = skip;
        self
    }

    /// Builds the [`NdConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if a required field is
    /// missing, or [`ConfigError::InvalidProxyUrl`] if the proxy URL does not
    /// parse.
    pub fn build(self) -> Result<NdConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;
        let username = self
            .username
            .ok_or(ConfigError::MissingRequiredField { field: "username" })?;
        let password = self
            .password
            .ok_or(ConfigError::MissingRequiredField { field: "password" })?;

        let proxy_url = self
            .proxy_url
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidProxyUrl {
                    url: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(NdConfig {
            base_url,
            username,
            password,
            login_domain: self.login_domain,
            insecure: self.insecure.unwrap_or(true),
            proxy_url,
            proxy_credentials: self.proxy_credentials,
            retry_policy: self.retry_policy.unwrap_or_default(),
            skip_logging_payload: self.skip_logging_payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn required() -> NdConfigBuilder {
        NdConfig::builder()
            .base_url(BaseUrl::new("https://nd.example.com").unwrap())
            .username(Username::new("admin").unwrap())
            .password(Password::new("secret").unwrap())
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = NdConfigBuilder::new()
            .username(Username::new("admin").unwrap())
            .password(Password::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_requires_password() {
        let result = NdConfigBuilder::new()
            .base_url(BaseUrl::new("https://nd.example.com").unwrap())
            .username(Username::new("admin").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "password" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = required().build().unwrap();

        assert!(config.insecure());
        assert!(config.login_domain().is_none());
        assert!(config.proxy_url().is_none());
        assert!(config.proxy_credentials().is_none());
        assert_eq!(config.retry_policy(), &RetryPolicy::default());
        assert!(!config.skip_logging_payload());
    }

    #[test]
    fn test_builder_rejects_invalid_proxy_url() {
        let result = required().proxy_url("::not-a-url").build();
        assert!(matches!(result, Err(ConfigError::InvalidProxyUrl { .. })));
    }

    #[test]
    fn test_empty_login_domain_is_unset() {
        let config = required().login_domain("").build().unwrap();
        assert!(config.login_domain().is_none());
    }

    #[test]
    fn test_config_debug_masks_password() {
        let config = required().build().unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("NdConfig"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_from_lookup_applies_defaults() {
        let config = NdConfig::from_lookup(lookup(&[
            ("ND_URL", "https://nd.example.com"),
            ("ND_USERNAME", "admin"),
            ("ND_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url().host_name(), Some("nd.example.com"));
        assert_eq!(config.login_domain(), Some(DEFAULT_LOGIN_DOMAIN));
        assert!(config.insecure());
        assert_eq!(config.retry_policy().max_retries(), 2);
        assert_eq!(config.retry_policy().min_delay(), Duration::from_secs(4));
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = NdConfig::from_lookup(lookup(&[
            ("ND_URL", "https://nd.example.com/base"),
            ("ND_USERNAME", "admin"),
            ("ND_PASSWORD", "secret"),
            ("ND_LOGIN_DOMAIN", "radius"),
            ("ND_INSECURE", "false"),
            ("ND_PROXY_URL", "http://proxy.example.com:3128"),
            ("ND_PROXY_CREDS", "puser:ppass"),
            ("ND_RETRIES", "5"),
        ]))
        .unwrap();

        assert_eq!(config.login_domain(), Some("radius"));
        assert!(!config.insecure());
        assert_eq!(
            config.proxy_url().map(Url::as_str),
            Some("http://proxy.example.com:3128/")
        );
        assert_eq!(config.proxy_credentials().unwrap().username(), "puser");
        assert_eq!(config.retry_policy().max_retries(), 5);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let base = [
            ("ND_URL", "https://nd.example.com"),
            ("ND_USERNAME", "admin"),
            ("ND_PASSWORD", "secret"),
        ];

        let mut pairs = base.to_vec();
        pairs.push(("ND_RETRIES", "lots"));
        assert!(matches!(
            NdConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidEnvValue { key: "ND_RETRIES", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("ND_INSECURE", "maybe"));
        assert!(matches!(
            NdConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidEnvValue { key: "ND_INSECURE", .. })
        ));
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let result = NdConfig::from_lookup(lookup(&[("ND_URL", "https://nd.example.com")]));
        assert!(matches!(result, Err(ConfigError::EmptyUsername)));

        let result = NdConfig::from_lookup(lookup(&[
            ("ND_URL", "https://nd.example.com"),
            ("ND_USERNAME", "admin"),
            ("ND_PASSWORD", ""),
        ]));
        assert!(matches!(result, Err(ConfigError::EmptyPassword)));
    }
}
