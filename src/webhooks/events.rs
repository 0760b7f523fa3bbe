//! GitHub webhook event types.
//!
//! Typed representations of the two webhook events the registrar reacts to,
//! holding only the fields the handlers use:
//!
//! - `release` - a release was published on a package repository
//! - `pull_request` - a registry pull request opened by the bot was closed

use serde::{Deserialize, Serialize};

use crate::types::RepoId;

/// Action performed on a release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseAction {
    /// The release was published (the only action the registrar acts on).
    Published,
    /// Any other action (`created`, `edited`, `deleted`, `prereleased`, ...).
    Other(String),
}

impl ReleaseAction {
    pub fn from_api_str(action: &str) -> Self {
        match action {
            "published" => ReleaseAction::Published,
            other => ReleaseAction::Other(other.to_string()),
        }
    }
}

/// The repository a release was published on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepository {
    /// Short repository name, e.g. `Foo.jl`.
    pub name: String,

    /// Owner and name, from `full_name`.
    pub id: RepoId,

    /// `git://` URL.
    pub git_url: String,

    /// `git@` URL.
    pub ssh_url: String,

    /// `https://...git` URL. This is the canonical URL recorded for new packages.
    pub clone_url: String,

    /// Browser URL of the repository.
    pub html_url: String,
}

impl SourceRepository {
    /// The URLs a registry `url` file may legitimately contain for this repository.
    ///
    /// The clone URL comes first: it is the one written for new registrations.
    pub fn accepted_urls(&self) -> [&str; 3] {
        [&self.clone_url, &self.git_url, &self.ssh_url]
    }

    /// Returns true if `url` is one of [`accepted_urls`](Self::accepted_urls).
    pub fn accepts_url(&self, url: &str) -> bool {
        self.accepted_urls().contains(&url)
    }
}

/// A `release` webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// The action that triggered this event.
    pub action: ReleaseAction,

    /// Login of the release author.
    pub author_login: String,

    /// The release's tag, e.g. `v1.2.0`.
    pub tag_name: String,

    /// Browser URL of the release.
    pub release_url: String,

    /// The repository the release belongs to.
    pub repository: SourceRepository,
}

/// Action performed on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrAction {
    /// PR was closed (merged or not).
    Closed,
    /// Any other action.
    Other(String),
}

impl PrAction {
    pub fn from_api_str(action: &str) -> Self {
        match action {
            "closed" => PrAction::Closed,
            other => PrAction::Other(other.to_string()),
        }
    }
}

/// Open/closed state of a pull request as reported by the REST API.
///
/// Merged pull requests report `closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Closed,
}

/// A `pull_request` webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    /// The action that triggered this event.
    pub action: PrAction,

    /// Login of the pull request author.
    pub author_login: String,

    /// API URL of the pull request, used to re-fetch its state.
    pub url: String,

    /// Name of the head (source) branch.
    pub head_ref: String,

    /// State at delivery time.
    pub state: PrState,
}
