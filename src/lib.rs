//! # Nexus Dashboard REST Client
//!
//! An async client for the Cisco Nexus Dashboard REST API, providing
//! type-safe configuration, token-based authentication and a retrying HTTP
//! transport.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`NdConfig`] and [`NdConfigBuilder`], or
//!   from `ND_*` environment variables
//! - Lazy login with a cached, time-bounded token ([`AuthToken`])
//! - Request building with path normalization and auth headers
//! - An async transport with jittered exponential backoff
//! - Readable messages from HTML error pages served by the reverse proxy
//! - A facade that reports failures as diagnostics and treats 404 as "absent"
//!
//! ## Quick Start
//!
//! ```rust
//! use nd_client::{BaseUrl, NdConfig, Password, RetryPolicy, Username};
//!
//! let config = NdConfig::builder()
//!     .base_url(BaseUrl::new("https://nd.example.com").unwrap())
//!     .username(Username::new("admin").unwrap())
//!     .password(Password::new("secret").unwrap())
//!     .login_domain("DefaultAuth")
//!     .retry_policy(RetryPolicy::default())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.login_domain(), Some("DefaultAuth"));
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use nd_client::{NdConfig, RestClient};
//! use nd_client::clients::HttpMethod;
//! use nd_client::clients::rest::Diagnostics;
//!
//! let client = RestClient::new(NdConfig::from_env()?)?;
//!
//! // Typed errors
//! let response = client.get("/api/v1/infra/sites").await?;
//!
//! // Diagnostics instead of errors; `None` for 404
//! let mut diagnostics = Diagnostics::new();
//! let site = client
//!     .call(&mut diagnostics, HttpMethod::Get, "/api/v1/infra/sites/s1", None, true)
//!     .await;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: [`RestClient`] is `Send + Sync` and meant to be shared
//! - **Async-first**: built on Tokio; a backoff sleep suspends only the retrying task

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::AuthToken;
pub use config::{
    BaseUrl, NdConfig, NdConfigBuilder, Password, ProxyCredentials, RetryPolicy, Username,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    BackendError, DiagnosticSink, Diagnostics, ErrorBody, HttpClient, HttpError, HttpMethod,
    HttpRequest, HttpRequestBuilder, HttpResponse, InvalidHttpRequestError, ResponseBody,
    RestClient,
};
