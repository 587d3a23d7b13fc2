//! Authentication types for the Nexus Dashboard client.
//!
//! # Overview
//!
//! - [`AuthToken`]: the cached bearer token and its estimated expiry
//! - [`LoginRequest`]: the body posted to the login endpoint
//! - [`extract_token`]: pulls a usable token out of a login response
//!
//! The login round-trip itself is driven by
//! [`RestClient::authenticate`](crate::clients::rest::RestClient::authenticate),
//! which stores the result in an [`AuthToken`] valid for
//! [`TOKEN_REFRESH_INTERVAL_SECS`].

mod login;
mod token;

pub use login::{extract_token, LoginRequest, LOGIN_PATH};
pub use token::{AuthToken, EXPIRY_SAFETY_MARGIN_SECS, TOKEN_REFRESH_INTERVAL_SECS};
