//! HTTP client types for Nexus Dashboard API communication.
//!
//! This module provides the request, transport and facade layers.
//!
//! # Overview
//!
//! - [`HttpRequest`]: A built request (URL, headers, JSON body)
//! - [`HttpClient`]: The retrying async transport
//! - [`HttpResponse`]: A classified response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`HttpError`]: Everything that can go wrong in a single call
//! - [`rest::RestClient`]: The facade that logs in and reports diagnostics
//!
//! # Retry Behavior
//!
//! Transport failures and DELETE requests answered with anything but 204
//! are retried up to [`RetryPolicy::max_retries`](crate::RetryPolicy::max_retries)
//! times. The wait before retry `n` (0-indexed) is
//! `min(max_delay, min_delay * factor^n)`, with the part above `min_delay`
//! scaled by a random factor in `[0.5, 1.0)`.
//!
//! Every other response is final: a JSON body is returned whatever the
//! status, and a non-JSON body where JSON was expected is an error.

mod errors;
mod html;
mod http_client;
mod http_request;
mod http_response;
mod tls;
pub mod rest;

pub use errors::{BackendError, ErrorBody, HttpError, InvalidHttpRequestError};
pub use html::{extract_error_message, EMPTY_HTML_MESSAGE};
pub use http_client::HttpClient;
pub use http_request::{normalize_path, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, ResponseBody};

pub use rest::{DiagnosticSink, Diagnostics, RestClient};
