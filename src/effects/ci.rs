//! CI status effect types.
//!
//! The registrar makes one best-effort call to a CI provider per release, to
//! decorate the pull request with a build badge.

use serde::{Deserialize, Serialize};

use crate::types::{RepoId, Sha};

/// A CI status effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CiEffect {
    /// Look up the latest build of `branch` (a tag name) for `repo`.
    GetBranchBuild { repo: RepoId, branch: String },
}

/// A CI build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiBuild {
    pub id: u64,

    /// Commit the build ran on.
    pub commit_sha: Sha,
}

/// Response from a CI effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CiResponse {
    /// Response to `GetBranchBuild`. `None` if the provider has no build (any non-200).
    Build(Option<CiBuild>),
}
