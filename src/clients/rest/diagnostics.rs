//! Diagnostics reporting for the REST facade.
//!
//! [`RestClient::call`](crate::clients::rest::RestClient::call) never
//! returns an error. Failures are reported into a [`DiagnosticSink`]
//! supplied by the caller, and the call returns `None`.

/// A receiver for error diagnostics.
///
/// Implement this for whatever collects user-facing errors in the calling
/// application. [`Diagnostics`] is a ready-made collector.
pub trait DiagnosticSink {
    /// Records an error with a one-line summary and a longer detail.
    fn add_error(&mut self, summary: String, detail: String);
}

/// A single recorded error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// One-line summary.
    pub summary: String,
    /// Status, response and underlying error text.
    pub detail: String,
}

/// An in-memory [`DiagnosticSink`].
///
/// # Example
///
/// ```rust
/// use nd_client::clients::rest::{DiagnosticSink, Diagnostics};
///
/// let mut diagnostics = Diagnostics::new();
/// assert!(!diagnostics.has_error());
///
/// diagnostics.add_error("Request failed".to_string(), "Code: 500".to_string());
/// assert!(diagnostics.has_error());
/// assert_eq!(diagnostics.errors()[0].summary, "Request failed");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Returns `true` if at least one error was recorded.
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the recorded errors in order.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Returns the number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl DiagnosticSink for Diagnostics {
    fn add_error(&mut self, summary: String, detail: String) {
        tracing::error!("{}: {}", summary, detail);
        self.errors.push(Diagnostic { summary, detail });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collector_is_empty() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_error());
        assert_eq!(diagnostics.len(), 0);
    }

    #[test]
    fn test_errors_are_kept_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_error("first".to_string(), "a".to_string());
        diagnostics.add_error("second".to_string(), "b".to_string());

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.errors(),
            &[
                Diagnostic {
                    summary: "first".to_string(),
                    detail: "a".to_string()
                },
                Diagnostic {
                    summary: "second".to_string(),
                    detail: "b".to_string()
                },
            ]
        );
    }
}
