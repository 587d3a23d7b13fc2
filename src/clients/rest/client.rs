//! REST client facade for the Nexus Dashboard API.
//!
//! This module provides the [`RestClient`] type, which owns the
//! configuration, the transport and the cached login token, and ties
//! authentication, request building and sending together.

use parking_lot::Mutex;
use serde_json::Value;

use crate::auth::{extract_token, AuthToken, LoginRequest, LOGIN_PATH, TOKEN_REFRESH_INTERVAL_SECS};
use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::rest::DiagnosticSink;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, HttpResponse, ResponseBody};
use crate::config::NdConfig;
use crate::error::ConfigError;

/// Message for login responses without a body.
const EMPTY_LOGIN_RESPONSE: &str = "Empty response";

/// Message for login responses without a usable token.
const INVALID_CREDENTIALS: &str = "Invalid Username or Password";

/// Suffix appended to every diagnostic detail.
const REPORT_HINT: &str = "Please report this issue to the provider developers.";

/// REST client for the Nexus Dashboard API.
///
/// A single `RestClient` is meant to be shared for the lifetime of the
/// process. It logs in lazily and reuses the token until it is about to
/// expire.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`. The token is guarded by a mutex that is
/// never held across an `.await`. Two tasks that find the token expired at
/// the same time may both log in; the last token stored wins.
///
/// # Example
///
/// ```rust,ignore
/// use nd_client::{NdConfig, RestClient};
/// use nd_client::clients::HttpMethod;
/// use nd_client::clients::rest::Diagnostics;
///
/// let client = RestClient::new(NdConfig::from_env()?)?;
///
/// let mut diagnostics = Diagnostics::new();
/// let sites = client
///     .call(&mut diagnostics, HttpMethod::Get, "/api/v1/infra/sites", None, true)
///     .await;
/// ```
#[derive(Debug)]
pub struct RestClient {
    config: NdConfig,
    http_client: HttpClient,
    auth_token: Mutex<AuthToken>,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new client. No network traffic happens until the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP transport cannot be created from
    /// the TLS or proxy settings.
    pub fn new(config: NdConfig) -> Result<Self, ConfigError> {
        let http_client = HttpClient::new(&config)?;
        tracing::debug!("Created Nexus Dashboard client for {}", config.base_url().as_url());

        Ok(Self {
            config,
            http_client,
            auth_token: Mutex::new(AuthToken::new()),
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &NdConfig {
        &self.config
    }

    /// Returns a snapshot of the cached token.
    #[must_use]
    pub fn auth_token(&self) -> AuthToken {
        self.auth_token.lock().clone()
    }

    /// Logs in and stores the returned token.
    ///
    /// The login request is sent without credentials headers and goes
    /// through the same retry logic as every other request. Its payload is
    /// never logged.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Authentication`] if the response is empty or
    /// carries no usable token, or any transport error from
    /// [`HttpClient::send`].
    pub async fn authenticate(&self) -> Result<(), HttpError> {
        tracing::debug!("Authenticating against {}", self.config.base_url().as_url());

        let login = LoginRequest::new(
            self.config.username().as_ref(),
            self.config.password().as_ref(),
            self.config.login_domain(),
        );
        let body = serde_json::to_value(&login).map_err(|e| InvalidHttpRequestError::InvalidBody {
            reason: e.to_string(),
        })?;
        let request = HttpRequest::builder(HttpMethod::Post, LOGIN_PATH)
            .body(body)
            .skip_logging_payload(true)
            .build(self.config.base_url())?;

        let response = self.http_client.send(&request).await?;
        let ResponseBody::Parsed(document) = response.body else {
            return Err(HttpError::Authentication {
                message: EMPTY_LOGIN_RESPONSE.to_string(),
            });
        };
        let token = extract_token(&document).ok_or_else(|| HttpError::Authentication {
            message: INVALID_CREDENTIALS.to_string(),
        })?;

        self.auth_token
            .lock()
            .set_token(token, TOKEN_REFRESH_INTERVAL_SECS);
        tracing::debug!("Authentication succeeded");
        Ok(())
    }

    /// Returns a valid token, logging in first if the cached one has expired.
    ///
    /// # Errors
    ///
    /// Returns any error from [`authenticate`](Self::authenticate).
    pub async fn ensure_session(&self) -> Result<String, HttpError> {
        let cached = {
            let token = self.auth_token.lock();
            token.is_valid().then(|| token.token().to_string())
        };
        if let Some(token) = cached {
            return Ok(token);
        }

        self.authenticate().await?;
        Ok(self.auth_token.lock().token().to_string())
    }

    /// Sends a request and returns the classified response.
    ///
    /// With `authenticated`, a valid token is obtained first (logging in if
    /// needed) and sent in the `Authorization` and `Cookie` headers.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if authentication, request building or the
    /// transport fails. A parsed response with a failing status is *not* an
    /// error here; check [`HttpResponse::is_ok`].
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<HttpResponse, HttpError> {
        let request = self.prepare(method, path, body, authenticated).await?;
        self.http_client.send(&request).await
    }

    /// Sends an authenticated GET request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.request(HttpMethod::Get, path, None, true).await
    }

    /// Sends an authenticated POST request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn post(&self, path: &str, body: &Value) -> Result<HttpResponse, HttpError> {
        self.request(HttpMethod::Post, path, Some(body), true).await
    }

    /// Sends an authenticated PUT request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn put(&self, path: &str, body: &Value) -> Result<HttpResponse, HttpError> {
        self.request(HttpMethod::Put, path, Some(body), true).await
    }

    /// Sends an authenticated PATCH request with `validate=false`.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn patch(&self, path: &str, body: &Value) -> Result<HttpResponse, HttpError> {
        self.request(HttpMethod::Patch, path, Some(body), true).await
    }

    /// Sends an authenticated DELETE request.
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.request(HttpMethod::Delete, path, None, true).await
    }

    /// Performs a REST call and returns the parsed document, if any.
    ///
    /// Never fails. Returns `None` and records nothing when:
    /// - the backend answers 404
    /// - the response is empty by classification (204, or an empty 200 to a POST)
    ///
    /// Returns `None` and records one diagnostic in `sink` when:
    /// - authentication or request building fails
    /// - the backend answers a non-2xx status with a JSON body
    /// - the transport gives up
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut diagnostics = Diagnostics::new();
    /// let body = serde_json::json!({"spec": {"name": "site1"}});
    /// if let Some(created) = client
    ///     .call(&mut diagnostics, HttpMethod::Post, "/api/v1/infra/sites", Some(&body), true)
    ///     .await
    /// {
    ///     println!("created {created}");
    /// }
    /// ```
    pub async fn call<S>(
        &self,
        sink: &mut S,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Option<Value>
    where
        S: DiagnosticSink + ?Sized,
    {
        let request = match self.prepare(method, path, body, authenticated).await {
            Ok(request) => request,
            Err(error) => {
                sink.add_error(
                    "Creation of rest request failed".to_string(),
                    format!("err: {error}. {REPORT_HINT}"),
                );
                return None;
            }
        };

        let summary = || format!("The {} {} rest request failed.", method, request.path);
        match self.http_client.send(&request).await {
            Ok(response) if response.code == 404 => None,
            Ok(HttpResponse {
                body: ResponseBody::Empty,
                ..
            }) => None,
            Ok(response) if response.is_ok() => response.into_parsed(),
            Ok(response) => {
                let errors = response.parsed().map_or_else(String::new, errors_field);
                if let Some(document) = response.parsed() {
                    tracing::debug!("{:?}", document.get("errors"));
                }
                sink.add_error(
                    summary(),
                    format!("Code: {} Response: {}. {REPORT_HINT}", response.code, errors),
                );
                None
            }
            Err(error) if error.is_not_found() => None,
            Err(error) => {
                let detail = match error.status() {
                    Some(status) => format!(
                        "Code: {} Response: {}, err: {}. {REPORT_HINT}",
                        status,
                        error.error_body().map_or_else(String::new, errors_field),
                        error
                    ),
                    None => format!("Err: {error}. {REPORT_HINT}"),
                };
                sink.add_error(summary(), detail);
                None
            }
        }
    }

    async fn prepare(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        authenticated: bool,
    ) -> Result<HttpRequest, HttpError> {
        let mut builder = HttpRequest::builder(method, path)
            .skip_logging_payload(self.config.skip_logging_payload());
        if let Some(body) = body {
            builder = builder.body(body.clone());
        }
        if authenticated {
            builder = builder.bearer_token(self.ensure_session().await?);
        }
        Ok(builder.build(self.config.base_url())?)
    }
}

/// Renders the `errors` field of an error document, or the whole document
/// when it has none.
fn errors_field(document: &Value) -> String {
    document.get("errors").unwrap_or(document).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseUrl, Password, RetryPolicy, Username};
    use chrono::{Duration, Utc};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> NdConfig {
        NdConfig::builder()
            .base_url(BaseUrl::new("https://nd.example.com").unwrap())
            .username(Username::new("admin").unwrap())
            .password(Password::new("secret").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_client_starts_unauthenticated() {
        let client = RestClient::new(test_config()).unwrap();
        assert!(!client.auth_token().is_valid());
        assert_eq!(client.config().base_url().host_name(), Some("nd.example.com"));
    }

    #[test]
    fn test_errors_field_prefers_errors_key() {
        assert_eq!(
            errors_field(&json!({"errors": ["bad input"], "code": 400})),
            r#"["bad input"]"#
        );
        assert_eq!(errors_field(&json!({"message": "x"})), r#"{"message":"x"}"#);
    }

    #[test]
    fn test_ensure_session_reuses_valid_token() {
        let client = RestClient::new(test_config()).unwrap();
        client
            .auth_token
            .lock()
            .set_token("cached", TOKEN_REFRESH_INTERVAL_SECS);

        // No login endpoint exists; a valid token must not trigger one.
        let token = tokio_test::block_on(client.ensure_session());
        assert_eq!(tokio_test::assert_ok!(token), "cached");
    }

    #[tokio::test]
    async fn test_expired_token_triggers_new_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": "fresh", "jwttoken": "fresh"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sites"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let config = NdConfig::builder()
            .base_url(BaseUrl::new(server.uri()).unwrap())
            .username(Username::new("admin").unwrap())
            .password(Password::new("secret").unwrap())
            .retry_policy(
                RetryPolicy::new(
                    0,
                    std::time::Duration::from_millis(1),
                    std::time::Duration::from_millis(5),
                    2.0,
                )
                .unwrap(),
            )
            .build()
            .unwrap();
        let client = RestClient::new(config).unwrap();
        client.auth_token.lock().set_token_at(
            "stale",
            TOKEN_REFRESH_INTERVAL_SECS,
            Utc::now() - Duration::seconds(2000),
        );
        assert!(!client.auth_token().is_valid());

        let mut diagnostics = crate::clients::rest::Diagnostics::new();
        let result = client
            .call(&mut diagnostics, HttpMethod::Get, "/api/v1/sites", None, true)
            .await;

        assert_eq!(result, Some(json!({"items": []})));
        assert!(diagnostics.is_empty());
        assert_eq!(client.auth_token().token(), "fresh");
        assert!(client.auth_token().is_valid());
    }
}
