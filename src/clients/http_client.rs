//! HTTP transport for Nexus Dashboard API communication.
//!
//! This module provides the [`HttpClient`] type, which sends built
//! [`HttpRequest`]s, classifies each response and retries transient
//! failures with jittered exponential backoff.

use base64::prelude::*;
use reqwest::header::HeaderValue;
use serde_json::Value;

use crate::clients::errors::{BackendError, ErrorBody, HttpError};
use crate::clients::html::extract_error_message;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::{HttpResponse, ResponseBody};
use crate::clients::tls::client_config;
use crate::config::{BaseUrl, NdConfig, RetryPolicy};
use crate::error::ConfigError;

/// HTTP transport for the Nexus Dashboard API.
///
/// The client handles:
/// - TLS setup (1.2 and 1.3, AES-GCM suites only, optional certificate bypass)
/// - An optional HTTP proxy with basic credentials
/// - Response classification into parsed, empty or failed outcomes
/// - Bounded retries with jittered exponential backoff
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. A backoff sleep suspends only the task
/// that is retrying; other calls on the same client proceed.
///
/// # Example
///
/// ```rust,ignore
/// use nd_client::NdConfig;
/// use nd_client::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = NdConfig::from_env()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/version.json")
///     .build(config.base_url())?;
/// let response = client.send(&request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: BaseUrl,
    retry_policy: RetryPolicy,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a transport from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProxyUrl`] if the proxy cannot be
    /// configured, or [`ConfigError::Transport`] if the TLS configuration or
    /// the underlying HTTP client fails to initialize.
    pub fn new(config: &NdConfig) -> Result<Self, ConfigError> {
        let tls = client_config(config.insecure())?;
        let mut builder = reqwest::Client::builder().use_preconfigured_tls(tls);

        if let Some(proxy_url) = config.proxy_url() {
            let invalid_proxy = |reason: String| ConfigError::InvalidProxyUrl {
                url: proxy_url.to_string(),
                reason,
            };
            let mut proxy =
                reqwest::Proxy::all(proxy_url.clone()).map_err(|e| invalid_proxy(e.to_string()))?;
            if let Some(credentials) = config.proxy_credentials() {
                let encoded = BASE64_STANDARD.encode(credentials.as_ref());
                let value = HeaderValue::from_str(&format!("Basic {encoded}"))
                    .map_err(|_| ConfigError::InvalidProxyCredentials)?;
                proxy = proxy.custom_http_auth(value);
            }
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| ConfigError::Transport {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            retry_policy: *config.retry_policy(),
        })
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Sends a request, retrying transient failures.
    ///
    /// Outcomes, checked in order:
    /// - POST answered with 200 and an empty body: [`ResponseBody::Empty`]
    /// - any non-DELETE method without a 204: the body is parsed as JSON,
    ///   whatever the status, and returned as [`ResponseBody::Parsed`]
    /// - any 204: [`ResponseBody::Empty`]
    /// - anything else is retried while the policy allows, and finally
    ///   reported as [`HttpError::Backend`]
    ///
    /// Transport failures are retried the same way and finally reported as
    /// [`HttpError::Connectivity`]. With `max_retries = n` a request is
    /// attempted at most `n + 1` times.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Connectivity`]: no response after every attempt
    /// - [`HttpError::MalformedResponse`]: a body that should be JSON is not
    /// - [`HttpError::Backend`]: a failing status survived every retry
    /// - [`HttpError::Network`]: the response body could not be read
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut attempt: u32 = 0;
        loop {
            tracing::debug!(
                "Sending {} {} (attempt {} of {})",
                request.http_method,
                request.url,
                attempt + 1,
                self.retry_policy.max_retries() + 1
            );
            if !request.skip_logging_payload {
                if let Some(body) = &request.body {
                    tracing::trace!("HTTP request body: {}", String::from_utf8_lossy(body));
                }
            }

            let mut builder = self
                .client
                .request(request.http_method.as_reqwest(), request.url.clone())
                .headers(request.headers.clone());
            if !request.http_method.omits_body() {
                builder = builder.body(request.body.clone().unwrap_or_default());
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(error) => {
                    if self.retry_policy.should_retry(attempt) {
                        tracing::warn!(
                            "HTTP connection failed: {}, retries: {}",
                            error,
                            attempt
                        );
                        self.backoff(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    tracing::error!("HTTP connection error occurred: {}", error);
                    return Err(HttpError::Connectivity {
                        attempts: attempt + 1,
                        source: error,
                    });
                }
            };

            let code = response.status().as_u16();
            let text = response.text().await?;
            if request.skip_logging_payload {
                tracing::trace!("HTTP response: {}", code);
            } else {
                tracing::trace!("HTTP response: {} {}", code, text);
            }

            match classify(request.http_method, code, &text) {
                Outcome::Done(body) => return Ok(HttpResponse::new(code, body)),
                Outcome::Malformed(source) => {
                    tracing::error!(
                        "Failed to parse JSON response of {} {}: {}",
                        request.http_method,
                        request.path,
                        source
                    );
                    return Err(HttpError::MalformedResponse {
                        method: request.http_method,
                        path: request.path.clone(),
                        status: code,
                        source,
                    });
                }
                Outcome::Retry => {
                    if self.retry_policy.should_retry(attempt) {
                        tracing::warn!(
                            "HTTP request failed: status {}, retries: {}",
                            code,
                            attempt
                        );
                        self.backoff(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(backend_error(request, code, &text).into());
                }
            }
        }
    }

    async fn backoff(&self, attempt: u32) {
        let delay = self.retry_policy.delay(attempt);
        tracing::trace!("Sleeping {:?} before retrying", delay);
        tokio::time::sleep(delay).await;
    }
}

/// Classification of one HTTP response.
#[derive(Debug)]
enum Outcome {
    Done(ResponseBody),
    Malformed(serde_json::Error),
    Retry,
}

fn classify(method: HttpMethod, code: u16, body: &str) -> Outcome {
    if method == HttpMethod::Post && code == 200 && body.is_empty() {
        return Outcome::Done(ResponseBody::Empty);
    }
    if method != HttpMethod::Delete && code != 204 {
        return match serde_json::from_str::<Value>(body) {
            Ok(value) => Outcome::Done(ResponseBody::Parsed(value)),
            Err(error) => Outcome::Malformed(error),
        };
    }
    if code == 204 {
        return Outcome::Done(ResponseBody::Empty);
    }
    Outcome::Retry
}

/// Builds the terminal error for a failing status, preferring a JSON
/// payload over the message extracted from an HTML page.
fn backend_error(request: &HttpRequest, code: u16, text: &str) -> BackendError {
    let body = serde_json::from_str::<Value>(text).map_or_else(
        |_| {
            let message = extract_error_message(text);
            tracing::error!("HTML error parsing result: {}", message);
            ErrorBody::Html(message)
        },
        ErrorBody::Json,
    );
    BackendError {
        method: request.http_method,
        path: request.path.clone(),
        url: request.url.to_string(),
        status: code,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(outcome: Outcome) -> Option<Value> {
        match outcome {
            Outcome::Done(ResponseBody::Parsed(value)) => Some(value),
            _ => None,
        }
    }

    #[test]
    fn test_post_200_with_empty_body_is_empty() {
        assert!(matches!(
            classify(HttpMethod::Post, 200, ""),
            Outcome::Done(ResponseBody::Empty)
        ));
    }

    #[test]
    fn test_non_delete_parses_json_for_any_status() {
        for (method, code) in [
            (HttpMethod::Get, 200),
            (HttpMethod::Post, 201),
            (HttpMethod::Put, 400),
            (HttpMethod::Patch, 500),
            (HttpMethod::Get, 404),
        ] {
            assert_eq!(
                parsed(classify(method, code, r#"{"ok": true}"#)),
                Some(serde_json::json!({"ok": true}))
            );
        }
    }

    #[test]
    fn test_non_json_body_is_malformed_not_retried() {
        assert!(matches!(
            classify(HttpMethod::Get, 200, "<html></html>"),
            Outcome::Malformed(_)
        ));
        assert!(matches!(
            classify(HttpMethod::Get, 502, ""),
            Outcome::Malformed(_)
        ));
    }

    #[test]
    fn test_204_is_empty_for_every_method() {
        for method in [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ] {
            assert!(matches!(
                classify(method, 204, ""),
                Outcome::Done(ResponseBody::Empty)
            ));
        }
    }

    #[test]
    fn test_delete_without_204_is_retried() {
        for code in [200, 400, 404, 500, 503] {
            assert!(matches!(
                classify(HttpMethod::Delete, code, "{}"),
                Outcome::Retry
            ));
        }
    }

    #[test]
    fn test_backend_error_prefers_json_payload() {
        let base = BaseUrl::new("https://nd.example.com").unwrap();
        let request = HttpRequest::builder(HttpMethod::Delete, "/api/v1/sites/s1")
            .build(&base)
            .unwrap();

        let error = backend_error(&request, 500, r#"{"errors": ["boom"]}"#);
        assert_eq!(error.status, 500);
        assert_eq!(error.path, "/api/v1/sites/s1");
        assert_eq!(error.body, ErrorBody::Json(serde_json::json!({"errors": ["boom"]})));

        let error = backend_error(
            &request,
            502,
            "<html><body><p>Bad Gateway</p></body></html>",
        );
        assert_eq!(error.body, ErrorBody::Html("Bad Gateway".to_string()));
    }

    #[test]
    fn test_new_builds_with_proxy_and_credentials() {
        let config = NdConfig::builder()
            .base_url(BaseUrl::new("https://nd.example.com").unwrap())
            .username(crate::config::Username::new("admin").unwrap())
            .password(crate::config::Password::new("secret").unwrap())
            .proxy_url("http://proxy.example.com:3128")
            .proxy_credentials(crate::config::ProxyCredentials::new("user:pass").unwrap())
            .build()
            .unwrap();

        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_url().as_str(), "https://nd.example.com/");
        assert_eq!(client.retry_policy(), &RetryPolicy::default());
    }

    #[test]
    fn test_new_builds_with_and_without_certificate_checks() {
        for insecure in [true, false] {
            let config = NdConfig::builder()
                .base_url(BaseUrl::new("https://nd.example.com").unwrap())
                .username(crate::config::Username::new("admin").unwrap())
                .password(crate::config::Password::new("secret").unwrap())
                .insecure(insecure)
                .build()
                .unwrap();

            assert!(HttpClient::new(&config).is_ok(), "insecure = {insecure}");
        }
    }
}
