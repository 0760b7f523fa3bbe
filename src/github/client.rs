//! Octocrab client wrapper.
//!
//! Unlike a repo-scoped client, `OctocrabClient` is shared across every
//! repository the registrar touches; each `GitHubEffect` names its target.

use octocrab::Octocrab;

/// A GitHub API client authenticated as the bot account.
#[derive(Clone)]
pub struct OctocrabClient {
    /// The underlying octocrab client.
    client: Octocrab,
}

impl OctocrabClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Creates a client from a personal access token.
    ///
    /// `base_uri` overrides the API host (GitHub Enterprise, or a local fake in tests).
    pub fn from_token(
        token: impl Into<String>,
        base_uri: Option<&str>,
    ) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder().personal_token(token.into());
        if let Some(uri) = base_uri {
            builder = builder.base_uri(uri)?;
        }
        Ok(Self::new(builder.build()?))
    }

    /// Returns a reference to the underlying octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.client
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient").finish_non_exhaustive()
    }
}
