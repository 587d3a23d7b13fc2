//! HTTP-specific error types for the Nexus Dashboard client.
//!
//! # Error Handling
//!
//! - [`InvalidHttpRequestError`]: a request could not be constructed
//! - [`BackendError`]: a failing status survived every retry
//! - [`HttpError`]: unified error type for a single logical call
//!
//! A 404 is not treated as an error by the REST facade; use
//! [`HttpError::is_not_found`] to recognise it on the error path.
//!
//! # Example
//!
//! ```rust,ignore
//! use nd_client::clients::HttpError;
//!
//! match client.request(HttpMethod::Get, "/version.json", None, true).await {
//!     Ok(response) => println!("{:?}", response.body),
//!     Err(HttpError::Connectivity { attempts, .. }) => {
//!         println!("gave up after {attempts} attempts");
//!     }
//!     Err(HttpError::Authentication { message }) => println!("login failed: {message}"),
//!     Err(e) => println!("request failed: {e}"),
//! }
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::clients::http_request::HttpMethod;

/// Error returned when a request cannot be built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The path could not be resolved against the base URL.
    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath {
        /// The path that was provided.
        path: String,
        /// The parser error.
        reason: String,
    },

    /// A header value contains characters HTTP does not allow.
    #[error("Invalid value for header {header}.")]
    InvalidHeaderValue {
        /// The header that could not be set.
        header: &'static str,
    },

    /// The JSON body could not be serialized.
    #[error("Failed to serialize request body: {reason}")]
    InvalidBody {
        /// The serializer error.
        reason: String,
    },
}

/// Payload of a [`BackendError`].
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorBody {
    /// The failing response carried a JSON document.
    Json(Value),
    /// The failing response was not JSON; the message was extracted from
    /// the reverse proxy's HTML error page.
    Html(String),
}

/// A failing HTTP status that survived every retry.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendError {
    /// The HTTP method of the request.
    pub method: HttpMethod,
    /// The normalized request path.
    pub path: String,
    /// The fully resolved request URL.
    pub url: String,
    /// The HTTP status of the last response.
    pub status: u16,
    /// The parsed or extracted response body.
    pub body: ErrorBody,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ErrorBody::Json(body) => write!(
                f,
                "The {} {} request failed with HTTP status {}. Response: {}",
                self.method, self.path, self.status, body
            ),
            ErrorBody::Html(message) => write!(
                f,
                "Failed to parse JSON response from: {}. Verify that you are connecting to an ND.\nHTTP response status: {}\nMessage: {}",
                self.url, self.status, message
            ),
        }
    }
}

impl std::error::Error for BackendError {}

/// Unified error type for a single logical call.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request never produced a response, even after retries.
    #[error("Failed to connect to ND after {attempts} attempt(s). Verify that you are connecting to an ND.\nError message: {source}")]
    Connectivity {
        /// Total number of attempts made.
        attempts: u32,
        /// The last transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The login endpoint did not hand out a usable token.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Why the login response was rejected.
        message: String,
    },

    /// A response that should carry JSON could not be parsed.
    #[error("Failed to parse JSON response of {method} {path} (HTTP status {status}): {source}")]
    MalformedResponse {
        /// The HTTP method of the request.
        method: HttpMethod,
        /// The normalized request path.
        path: String,
        /// The HTTP status of the response.
        status: u16,
        /// The JSON parser error.
        #[source]
        source: serde_json::Error,
    },

    /// A failing status survived every retry.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The response body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request could not be built.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl HttpError {
    /// Returns the HTTP status associated with this error, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::MalformedResponse { status, .. } => Some(*status),
            Self::Backend(e) => Some(e.status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Connectivity { .. } | Self::Authentication { .. } | Self::InvalidRequest(_) => {
                None
            }
        }
    }

    /// Returns `true` if the backend answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns the JSON error document, if the backend sent one.
    #[must_use]
    pub fn error_body(&self) -> Option<&Value> {
        match self {
            Self::Backend(BackendError {
                body: ErrorBody::Json(body),
                ..
            }) => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend(status: u16, body: ErrorBody) -> BackendError {
        BackendError {
            method: HttpMethod::Delete,
            path: "/api/v1/infra/clusters/c1".to_string(),
            url: "https://nd.example.com/api/v1/infra/clusters/c1".to_string(),
            status,
            body,
        }
    }

    #[test]
    fn test_backend_error_with_json_body() {
        let error = HttpError::from(backend(500, ErrorBody::Json(json!({"errors": ["boom"]}))));

        assert_eq!(error.status(), Some(500));
        assert_eq!(error.error_body(), Some(&json!({"errors": ["boom"]})));
        let message = error.to_string();
        assert!(message.contains("DELETE /api/v1/infra/clusters/c1"));
        assert!(message.contains("500"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn test_backend_error_with_html_body() {
        let error = HttpError::from(backend(502, ErrorBody::Html("Bad Gateway".to_string())));

        assert!(error.error_body().is_none());
        let message = error.to_string();
        assert!(message.contains("Failed to parse JSON response from: https://nd.example.com"));
        assert!(message.contains("HTTP response status: 502"));
        assert!(message.contains("Message: Bad Gateway"));
    }

    #[test]
    fn test_not_found_detection() {
        let error = HttpError::from(backend(404, ErrorBody::Html(String::new())));
        assert!(error.is_not_found());

        let parse_error = serde_json::from_str::<Value>("<html>").unwrap_err();
        let error = HttpError::MalformedResponse {
            method: HttpMethod::Get,
            path: "/missing".to_string(),
            status: 404,
            source: parse_error,
        };
        assert!(error.is_not_found());

        let error = HttpError::Authentication {
            message: "Invalid Username or Password".to_string(),
        };
        assert!(!error.is_not_found());
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_invalid_request_error_messages() {
        let error = InvalidHttpRequestError::InvalidHeaderValue {
            header: "Authorization",
        };
        assert_eq!(error.to_string(), "Invalid value for header Authorization.");

        let error = HttpError::from(InvalidHttpRequestError::InvalidPath {
            path: "/a b".to_string(),
            reason: "bad".to_string(),
        });
        assert!(error.to_string().contains("Invalid request path '/a b'"));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let backend_error: &dyn std::error::Error = &backend(500, ErrorBody::Html(String::new()));
        let _ = backend_error;

        let invalid: &dyn std::error::Error = &InvalidHttpRequestError::InvalidBody {
            reason: "test".to_string(),
        };
        let _ = invalid;
    }
}
