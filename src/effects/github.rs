//! GitHub API effect types.
//!
//! These types describe GitHub API operations as data, without executing them.
//! The handlers build effects and inspect responses; the interpreter in
//! [`crate::github`] executes them against the REST API.
//!
//! Unlike a repo-scoped bot, the registrar works across three repositories in
//! one invocation (the source repository, the registry, and the bot's fork of
//! the registry), so every repository-level effect names its target.

use serde::{Deserialize, Serialize};

use crate::registry::FileContent;
use crate::types::{PrNumber, RepoId, Sha};
use crate::webhooks::PrState;

/// A name/email pair used as commit author or committer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl GitIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        GitIdentity {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A path to add or overwrite in a new tree. Always a regular file (`100644`) blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub sha: Sha,
}

/// A GitHub API effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GitHubEffect {
    // ─── Contents ─────────────────────────────────────────────────────────────
    /// Read a file at a ref. A missing file is a response, not an error.
    GetContent {
        repo: RepoId,
        path: String,
        git_ref: String,
    },

    /// List the entry names of a directory at a ref.
    ListDirectory {
        repo: RepoId,
        path: String,
        git_ref: String,
    },

    // ─── Git Data ─────────────────────────────────────────────────────────────
    /// Resolve a reference such as `tags/v1.0.0` or `heads/main`.
    GetRef { repo: RepoId, reference: String },

    /// Dereference an annotated tag object.
    GetTag { repo: RepoId, sha: Sha },

    /// Fetch a commit object (for its tree).
    GetCommit { repo: RepoId, sha: Sha },

    /// Store file content as a blob.
    CreateBlob { repo: RepoId, content: String },

    /// Create a tree from `base_tree` plus the given entries.
    CreateTree {
        repo: RepoId,
        base_tree: Sha,
        entries: Vec<TreeEntry>,
    },

    /// Create a commit object.
    CreateCommit {
        repo: RepoId,
        message: String,
        tree: Sha,
        parents: Vec<Sha>,
        author: GitIdentity,
        committer: GitIdentity,
    },

    // ─── Branches ─────────────────────────────────────────────────────────────
    /// Create `refs/heads/<branch>`. An existing branch is a response, not an error.
    CreateBranch {
        repo: RepoId,
        branch: String,
        sha: Sha,
    },

    /// Force-move an existing branch.
    ForceUpdateBranch {
        repo: RepoId,
        branch: String,
        sha: Sha,
    },

    /// Delete a branch. The response reports whether deletion succeeded.
    DeleteBranch { repo: RepoId, branch: String },

    // ─── Pull Requests & Issues ───────────────────────────────────────────────
    /// Fetch a pull request by its API URL.
    GetPullRequest { url: String },

    /// List pull requests in any state whose head is `head` (`owner:branch`).
    FindPullRequests { repo: RepoId, head: String },

    /// Open a pull request.
    CreatePullRequest {
        repo: RepoId,
        title: String,
        body: String,
        head: String,
        base: String,
    },

    /// Comment on a pull request or issue.
    CreateComment {
        repo: RepoId,
        number: PrNumber,
        body: String,
    },

    /// Open an issue.
    CreateIssue {
        repo: RepoId,
        title: String,
        body: String,
    },

    // ─── Users ────────────────────────────────────────────────────────────────
    /// Fetch a user's public profile.
    GetUser { login: String },

    /// List commits on `repo` authored by `author`.
    ListCommitsByAuthor { repo: RepoId, author: String },
}

// ─── Response Types ───────────────────────────────────────────────────────────

/// Kind of object a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Commit,
    /// An annotated tag object that must be dereferenced once more.
    Tag,
    Tree,
    Blob,
}

impl ObjectKind {
    pub fn from_api_str(kind: &str) -> Option<Self> {
        match kind {
            "commit" => Some(ObjectKind::Commit),
            "tag" => Some(ObjectKind::Tag),
            "tree" => Some(ObjectKind::Tree),
            "blob" => Some(ObjectKind::Blob),
            _ => None,
        }
    }
}

/// The object a reference or tag points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitObject {
    pub kind: ObjectKind,
    pub sha: Sha,
}

/// Pull request data returned from the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestData {
    pub number: PrNumber,
    pub state: PrState,

    /// Browser URL.
    pub html_url: String,
}

/// Public profile fields used for commit attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Response from a GitHub effect.
///
/// Each variant corresponds to the response from a particular effect type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GitHubResponse {
    /// Response to `GetContent`. `None` if the file does not exist (HTTP 404).
    Content(Option<FileContent>),

    /// Response to `ListDirectory`: entry names. Empty if the directory does not exist.
    Directory(Vec<String>),

    /// Response to `GetRef` and `GetTag`.
    Object(GitObject),

    /// Response to `GetCommit`.
    Commit { sha: Sha, tree: Sha },

    /// Response to `CreateBlob`, `CreateTree` and `CreateCommit`.
    Created { sha: Sha },

    /// Response to `CreateBranch` when the branch was created.
    BranchCreated,

    /// Response to `CreateBranch` when the branch already existed (HTTP 422).
    BranchExists,

    /// Response to `ForceUpdateBranch`.
    BranchUpdated,

    /// Response to `DeleteBranch`.
    BranchDeleted { deleted: bool },

    /// Response to `GetPullRequest` and `CreatePullRequest`.
    PullRequest(PullRequestData),

    /// Response to `FindPullRequests`.
    PullRequests(Vec<PullRequestData>),

    /// Response to `CreateComment` and `CreateIssue`: browser URL of the new item.
    Posted { html_url: String },

    /// Response to `GetUser`.
    User(UserProfile),

    /// Response to `ListCommitsByAuthor`: author emails, newest first.
    AuthorEmails(Vec<String>),
}

impl GitHubResponse {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GitHubResponse::Content(_) => "content",
            GitHubResponse::Directory(_) => "directory",
            GitHubResponse::Object(_) => "object",
            GitHubResponse::Commit { .. } => "commit",
            GitHubResponse::Created { .. } => "created",
            GitHubResponse::BranchCreated => "branch_created",
            GitHubResponse::BranchExists => "branch_exists",
            GitHubResponse::BranchUpdated => "branch_updated",
            GitHubResponse::BranchDeleted { .. } => "branch_deleted",
            GitHubResponse::PullRequest(_) => "pull_request",
            GitHubResponse::PullRequests(_) => "pull_requests",
            GitHubResponse::Posted { .. } => "posted",
            GitHubResponse::User(_) => "user",
            GitHubResponse::AuthorEmails(_) => "author_emails",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_serialize_with_type_tag() {
        let effect = GitHubEffect::GetRef {
            repo: RepoId::new("alice", "Foo.jl"),
            reference: "tags/v1.0.0".to_string(),
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "get_ref");
        assert_eq!(json["reference"], "tags/v1.0.0");
    }

    #[test]
    fn object_kind_parsing() {
        assert_eq!(ObjectKind::from_api_str("tag"), Some(ObjectKind::Tag));
        assert_eq!(ObjectKind::from_api_str("commit"), Some(ObjectKind::Commit));
        assert_eq!(ObjectKind::from_api_str("symlink"), None);
    }

    #[test]
    fn response_kind_names() {
        assert_eq!(GitHubResponse::BranchExists.kind(), "branch_exists");
        assert_eq!(GitHubResponse::Content(None).kind(), "content");
    }
}
