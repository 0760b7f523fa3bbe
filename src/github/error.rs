//! GitHub API error types.
//!
//! The registrar never retries, so errors are not categorized as transient or
//! permanent. What matters is the HTTP status: a few statuses are expected
//! outcomes (404 for a missing file, 422 for an existing branch) and are turned
//! into responses by the interpreter; everything else surfaces as an error.

use std::fmt;
use thiserror::Error;

/// A GitHub API error.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Creates an error without an octocrab source, e.g. for a malformed response.
    pub fn without_source(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an octocrab error, recording its HTTP status.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let status_code = Self::extract_status_code(&err);
        let message = match &err {
            octocrab::Error::GitHub { source, .. } => source.message.clone(),
            other => other.to_string(),
        };
        Self {
            status_code,
            message,
            source: Some(err),
        }
    }

    /// Returns true if GitHub answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }

    /// Returns true if GitHub answered 422 (validation failed, e.g. reference already exists).
    pub fn is_unprocessable(&self) -> bool {
        self.status_code == Some(422)
    }

    /// Extracts the HTTP status code from an octocrab error, if present.
    ///
    /// GitHub error bodies carry a structured status. For other variants the
    /// rendered message is searched for a status code.
    fn extract_status_code(err: &octocrab::Error) -> Option<u16> {
        if let octocrab::Error::GitHub { source, .. } = err {
            return Some(source.status_code.as_u16());
        }
        status_from_message(&err.to_string())
    }
}

/// Finds an HTTP status in an error message such as `"... status: 404 ..."`.
fn status_from_message(message: &str) -> Option<u16> {
    if let Some(idx) = message.find("status: ") {
        let digits: String = message[idx + 8..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(code) = digits.parse() {
            return Some(code);
        }
    }

    let lower = message.to_lowercase();
    if message.contains("404") && lower.contains("not found") {
        return Some(404);
    }
    if message.contains("422") {
        return Some(422);
    }

    None
}
