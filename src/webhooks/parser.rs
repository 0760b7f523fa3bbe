//! GitHub webhook payload parser.
//!
//! Parses raw webhook JSON payloads into the typed events in [`super::events`].
//! Decoding is strict: a missing or mistyped field the handlers rely on fails
//! here with a descriptive error, rather than later at first use. Fields the
//! handlers ignore are ignored by the parser too.

use serde::Deserialize;
use thiserror::Error;

use crate::types::RepoId;

use super::events::{
    PrAction, PrState, PullRequestEvent, ReleaseAction, ReleaseEvent, SourceRepository,
};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Field has invalid value (e.g., malformed full name, unknown state).
    #[error("invalid field value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

// ============================================================================
// Raw payload structures for deserialization
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

// ============================================================================
// release event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawReleasePayload {
    action: String,
    release: RawRelease,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    author: RawUser,
    tag_name: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    full_name: String,
    git_url: String,
    ssh_url: String,
    clone_url: String,
    html_url: String,
}

/// Parses a `release` webhook payload.
///
/// # Examples
///
/// ```
/// use release_registrar::webhooks::{ReleaseAction, parse_release_event};
///
/// let payload = br#"{
///     "action": "published",
///     "release": {
///         "author": { "login": "octocat" },
///         "tag_name": "v1.0.0",
///         "html_url": "https://github.com/octocat/Foo.jl/releases/tag/v1.0.0"
///     },
///     "repository": {
///         "name": "Foo.jl",
///         "full_name": "octocat/Foo.jl",
///         "git_url": "git://github.com/octocat/Foo.jl.git",
///         "ssh_url": "git@github.com:octocat/Foo.jl.git",
///         "clone_url": "https://github.com/octocat/Foo.jl.git",
///         "html_url": "https://github.com/octocat/Foo.jl"
///     }
/// }"#;
///
/// let event = parse_release_event(payload).unwrap();
/// assert_eq!(event.action, ReleaseAction::Published);
/// assert_eq!(event.tag_name, "v1.0.0");
/// ```
pub fn parse_release_event(payload: &[u8]) -> Result<ReleaseEvent, ParseError> {
    let raw: RawReleasePayload = serde_json::from_slice(payload)?;

    let id: RepoId = raw
        .repository
        .full_name
        .parse()
        .map_err(|_| ParseError::InvalidField {
            field: "repository.full_name",
            value: raw.repository.full_name.clone(),
        })?;

    Ok(ReleaseEvent {
        action: ReleaseAction::from_api_str(&raw.action),
        author_login: raw.release.author.login,
        tag_name: raw.release.tag_name,
        release_url: raw.release.html_url,
        repository: SourceRepository {
            name: raw.repository.name,
            id,
            git_url: raw.repository.git_url,
            ssh_url: raw.repository.ssh_url,
            clone_url: raw.repository.clone_url,
            html_url: raw.repository.html_url,
        },
    })
}

// ============================================================================
// pull_request event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    action: String,
    pull_request: RawPullRequest,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    url: String,
    state: String,
    head: RawRef,
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawRef {
    #[serde(rename = "ref")]
    ref_field: String,
}

/// Parses a `state` field value (`open` / `closed`).
pub fn parse_pr_state(state: &str) -> Result<PrState, ParseError> {
    match state {
        "open" => Ok(PrState::Open),
        "closed" => Ok(PrState::Closed),
        other => Err(ParseError::InvalidField {
            field: "pull_request.state",
            value: other.to_string(),
        }),
    }
}

/// Parses a `pull_request` webhook payload.
pub fn parse_pull_request_event(payload: &[u8]) -> Result<PullRequestEvent, ParseError> {
    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;

    Ok(PullRequestEvent {
        action: PrAction::from_api_str(&raw.action),
        author_login: raw.pull_request.user.login,
        url: raw.pull_request.url,
        head_ref: raw.pull_request.head.ref_field,
        state: parse_pr_state(&raw.pull_request.state)?,
    })
}
