//! Travis-style CI client and the build badge it feeds into pull request bodies.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::effects::{CiBuild, CiEffect, CiInterpreter, CiResponse};
use crate::registry::CiBadge;
use crate::types::{RepoId, Sha};

/// Transport or decoding failure talking to the CI provider.
#[derive(Debug, Error)]
pub enum CiError {
    #[error("CI request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for a Travis-style `repos/{owner}/{repo}/branches/{branch}` endpoint.
#[derive(Debug, Clone)]
pub struct TravisClient {
    http: reqwest::Client,
    api_url: String,
}

impl TravisClient {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>) -> Self {
        TravisClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn branch_url(&self, repo: &RepoId, branch: &str) -> String {
        format!(
            "{}/repos/{}/{}/branches/{}",
            self.api_url,
            repo.owner,
            repo.repo,
            urlencoding::encode(branch)
        )
    }

    async fn branch_build(&self, repo: &RepoId, branch: &str) -> Result<Option<CiBuild>, CiError> {
        let response = self
            .http
            .get(self.branch_url(repo, branch))
            .header(reqwest::header::ACCEPT, "application/vnd.travis-ci.2+json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), %repo, branch, "No CI build found");
            return Ok(None);
        }

        let body: BranchBody = response.json().await?;
        Ok(Some(CiBuild {
            id: body.branch.id,
            commit_sha: Sha::new(body.commit.sha),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct BranchBody {
    branch: BranchBuild,
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchBuild {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

impl CiInterpreter for TravisClient {
    type Error = CiError;

    async fn interpret(&self, effect: CiEffect) -> Result<CiResponse, Self::Error> {
        match effect {
            CiEffect::GetBranchBuild { repo, branch } => {
                Ok(CiResponse::Build(self.branch_build(&repo, &branch).await?))
            }
        }
    }
}

/// Badge and build links for `build` of `repo` at `tag`.
pub fn build_badge(api_url: &str, web_url: &str, repo: &RepoId, tag: &str, build: &CiBuild) -> CiBadge {
    CiBadge {
        badge_url: format!(
            "{}/{}.svg?branch={}",
            api_url.trim_end_matches('/'),
            repo,
            tag
        ),
        build_url: format!(
            "{}/{}/builds/{}",
            web_url.trim_end_matches('/'),
            repo,
            build.id
        ),
    }
}
