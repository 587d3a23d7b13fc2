//! HTTP response types for the Nexus Dashboard client.
//!
//! This module provides the [`HttpResponse`] type returned by
//! [`HttpClient::send`](crate::clients::HttpClient::send) once a request has
//! been classified as a usable outcome.

use serde_json::Value;

/// Body of a usable response.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Parsed(Value),
    /// The response deliberately carried no content (a 204, or a 200 to a
    /// POST with nothing in it).
    Empty,
}

/// A classified response from the Nexus Dashboard API.
///
/// A `Parsed` body may come with any status code, including failures such
/// as 400 or 404. Callers decide what a non-2xx parsed response means.
///
/// # Example
///
/// ```rust
/// use nd_client::clients::{HttpResponse, ResponseBody};
/// use serde_json::json;
///
/// let response = HttpResponse::new(200, ResponseBody::Parsed(json!({"id": 1})));
/// assert!(response.is_ok());
/// assert_eq!(response.parsed(), Some(&json!({"id": 1})));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The classified body.
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(code: u16, body: ResponseBody) -> Self {
        Self { code, body }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the body was empty by classification.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.body, ResponseBody::Empty)
    }

    /// Returns the parsed JSON body, if any.
    #[must_use]
    pub const fn parsed(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Parsed(value) => Some(value),
            ResponseBody::Empty => None,
        }
    }

    /// Consumes the response and returns the parsed JSON body, if any.
    #[must_use]
    pub fn into_parsed(self) -> Option<Value> {
        match self.body {
            ResponseBody::Parsed(value) => Some(value),
            ResponseBody::Empty => None,
        }
    }
}
