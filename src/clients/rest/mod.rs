//! REST facade for the Nexus Dashboard API.
//!
//! # Overview
//!
//! - [`RestClient`]: owns the configuration and the cached token, and
//!   offers `request`, `call` and per-method helpers
//! - [`DiagnosticSink`]: where [`RestClient::call`] reports failures
//! - [`Diagnostics`]: an in-memory sink
//!
//! # Not Found Handling
//!
//! [`RestClient::call`] maps a 404 to `None` without recording anything.
//! Callers use this to detect that an object no longer exists.
//!
//! # Example
//!
//! ```rust,ignore
//! use nd_client::{BaseUrl, NdConfig, Password, Username};
//! use nd_client::clients::HttpMethod;
//! use nd_client::clients::rest::{Diagnostics, RestClient};
//!
//! let config = NdConfig::builder()
//!     .base_url(BaseUrl::new("https://nd.example.com")?)
//!     .username(Username::new("admin")?)
//!     .password(Password::new("secret")?)
//!     .build()?;
//! let client = RestClient::new(config)?;
//!
//! let mut diagnostics = Diagnostics::new();
//! match client.call(&mut diagnostics, HttpMethod::Get, "/api/v1/infra/sites/s1", None, true).await {
//!     Some(site) => println!("{site}"),
//!     None if diagnostics.has_error() => eprintln!("{:?}", diagnostics.errors()),
//!     None => println!("site does not exist"),
//! }
//! ```

mod client;
mod diagnostics;

pub use client::RestClient;
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics};
