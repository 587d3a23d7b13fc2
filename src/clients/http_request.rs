//! HTTP request types for the Nexus Dashboard client.
//!
//! This module provides the [`HttpRequest`] type and its builder. Building a
//! request is pure: it normalizes the path, resolves it against the base
//! URL, applies the PATCH query rule and sets headers, but never touches the
//! network. A bearer token, when needed, is obtained by the caller first.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, COOKIE};
use reqwest::Url;
use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;
use crate::config::BaseUrl;

/// HTTP methods used by the Nexus Dashboard API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving objects.
    Get,
    /// HTTP POST method for creating objects and for login.
    Post,
    /// HTTP PUT method for replacing objects.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing objects.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` for methods whose requests never carry a body.
    #[must_use]
    pub const fn omits_body(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready to be sent by [`HttpClient`](crate::clients::HttpClient).
///
/// The body is held as bytes so it can be replayed on every retry.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The normalized path (single leading slash, no query).
    pub path: String,
    /// The resolved request URL.
    pub url: Url,
    /// The JSON body bytes, if any.
    pub body: Option<Vec<u8>>,
    /// Headers to send.
    pub headers: HeaderMap,
    /// Keeps the body and response payload out of logs.
    pub skip_logging_payload: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nd_client::BaseUrl;
    /// use nd_client::clients::{HttpMethod, HttpRequest};
    ///
    /// let base = BaseUrl::new("https://nd.example.com").unwrap();
    /// let request = HttpRequest::builder(HttpMethod::Patch, "///nexus/api/sitemanagement/v4/sites")
    ///     .body(serde_json::json!({"spec": {}}))
    ///     .build(&base)
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     request.url.as_str(),
    ///     "https://nd.example.com/nexus/api/sitemanagement/v4/sites?validate=false"
    /// );
    /// ```
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<Value>,
    bearer_token: Option<String>,
    skip_logging_payload: bool,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            bearer_token: None,
            skip_logging_payload: false,
        }
    }

    /// Sets the JSON body. Ignored for GET and DELETE.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the bearer token sent in the `Authorization` and `Cookie` headers.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Keeps the body and response payload out of logs.
    #[must_use]
    pub const fn skip_logging_payload(mut self, skip: bool) -> Self {
        self.skip_logging_payload = skip;
        self
    }

    /// Builds the request against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the path cannot be resolved,
    /// the token is not a valid header value, or the body fails to serialize.
    pub fn build(self, base_url: &BaseUrl) -> Result<HttpRequest, InvalidHttpRequestError> {
        let normalized = normalize_path(&self.path);
        let url = resolve_url(base_url, self.http_method, &normalized)?;
        let path = normalized
            .split_once('?')
            .map_or(normalized.as_str(), |(path, _)| path)
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.bearer_token {
            let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| InvalidHttpRequestError::InvalidHeaderValue {
                    header: "Authorization",
                })?;
            // Required by Nexus Dashboard 2.3 and later.
            let mut cookie = HeaderValue::from_str(&format!("AuthCookie={token}"))
                .map_err(|_| InvalidHttpRequestError::InvalidHeaderValue { header: "Cookie" })?;
            authorization.set_sensitive(true);
            cookie.set_sensitive(true);
            headers.insert(AUTHORIZATION, authorization);
            headers.insert(COOKIE, cookie);
        }

        let body = match self.body {
            Some(body) if !self.http_method.omits_body() => Some(
                serde_json::to_vec(&body).map_err(|e| InvalidHttpRequestError::InvalidBody {
                    reason: e.to_string(),
                })?,
            ),
            _ => None,
        };

        tracing::debug!("HTTP request {} {}", self.http_method, path);

        Ok(HttpRequest {
            http_method: self.http_method,
            path,
            url,
            body,
            headers,
            skip_logging_payload: self.skip_logging_payload,
        })
    }
}

/// Collapses any run of leading slashes into exactly one.
///
/// ```rust
/// use nd_client::clients::normalize_path;
///
/// assert_eq!(normalize_path("login"), "/login");
/// assert_eq!(normalize_path("///login"), "/login");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Resolves a normalized path against the base URL, keeping the base path
/// as a prefix. PATCH requests always get `validate=false` merged into the
/// query.
fn resolve_url(
    base_url: &BaseUrl,
    method: HttpMethod,
    normalized: &str,
) -> Result<Url, InvalidHttpRequestError> {
    let reference = format!("{}{}", base_url.path_prefix(), normalized);
    let mut url = base_url
        .as_url()
        .join(&reference)
        .map_err(|e| InvalidHttpRequestError::InvalidPath {
            path: normalized.to_string(),
            reason: e.to_string(),
        })?;

    if method == HttpMethod::Patch {
        // The backend validates the whole object by default, which breaks partial updates.
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "validate")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("validate", "false");
    }

    Ok(url)
}
