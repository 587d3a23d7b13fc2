//! Login request payload and token extraction.

use serde::Serialize;
use serde_json::Value;

/// Path of the Nexus Dashboard login endpoint.
pub const LOGIN_PATH: &str = "/login";

/// Request body for the login endpoint.
///
/// ```rust
/// use nd_client::auth::LoginRequest;
///
/// let body = LoginRequest::new("admin", "secret", Some("DefaultAuth"));
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["userName"], "admin");
/// assert_eq!(json["domain"], "DefaultAuth");
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    user_name: &'a str,
    user_passwd: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
}

impl<'a> LoginRequest<'a> {
    /// Creates a login body. The `domain` field is only sent when present.
    #[must_use]
    pub const fn new(user_name: &'a str, user_passwd: &'a str, domain: Option<&'a str>) -> Self {
        Self {
            user_name,
            user_passwd,
            domain,
        }
    }
}

/// Extracts a usable token from a login response document.
///
/// Returns `None` when the `token` field is missing, not a string, empty, or
/// the literal `{}` some backend versions return for rejected credentials.
#[must_use]
pub fn extract_token(body: &Value) -> Option<&str> {
    body.get("token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty() && *token != "{}")
}
