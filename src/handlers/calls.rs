//! Typed wrappers around `GitHubInterpreter`.
//!
//! Each method builds one effect, runs it, and unpacks the expected response
//! variant. Any other variant is an `UnexpectedResponse`.

use std::fmt;

use crate::effects::{
    GitHubEffect, GitHubInterpreter, GitHubResponse, GitIdentity, GitObject, PullRequestData,
    TreeEntry, UserProfile,
};
use crate::registry::FileContent;
use crate::types::{PrNumber, RepoId, Sha};

use super::error::HandlerError;

pub(crate) struct GitHubCalls<'a, G> {
    github: &'a G,
}

fn unexpected(effect: &'static str, actual: GitHubResponse) -> HandlerError {
    HandlerError::UnexpectedResponse {
        effect,
        actual: actual.kind(),
    }
}

impl<'a, G> GitHubCalls<'a, G>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    pub(crate) fn new(github: &'a G) -> Self {
        GitHubCalls { github }
    }

    async fn run(&self, effect: GitHubEffect) -> Result<GitHubResponse, HandlerError> {
        self.github
            .interpret(effect)
            .await
            .map_err(|e| HandlerError::Api(e.to_string()))
    }

    pub(crate) async fn content(
        &self,
        repo: &RepoId,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<FileContent>, HandlerError> {
        let effect = GitHubEffect::GetContent {
            repo: repo.clone(),
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        };
        match self.run(effect).await? {
            GitHubResponse::Content(content) => Ok(content),
            other => Err(unexpected("get_content", other)),
        }
    }

    pub(crate) async fn directory(
        &self,
        repo: &RepoId,
        path: &str,
        git_ref: &str,
    ) -> Result<Vec<String>, HandlerError> {
        let effect = GitHubEffect::ListDirectory {
            repo: repo.clone(),
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        };
        match self.run(effect).await? {
            GitHubResponse::Directory(names) => Ok(names),
            other => Err(unexpected("list_directory", other)),
        }
    }

    pub(crate) async fn reference(
        &self,
        repo: &RepoId,
        reference: String,
    ) -> Result<GitObject, HandlerError> {
        let effect = GitHubEffect::GetRef {
            repo: repo.clone(),
            reference,
        };
        match self.run(effect).await? {
            GitHubResponse::Object(object) => Ok(object),
            other => Err(unexpected("get_ref", other)),
        }
    }

    pub(crate) async fn tag(&self, repo: &RepoId, sha: Sha) -> Result<GitObject, HandlerError> {
        let effect = GitHubEffect::GetTag {
            repo: repo.clone(),
            sha,
        };
        match self.run(effect).await? {
            GitHubResponse::Object(object) => Ok(object),
            other => Err(unexpected("get_tag", other)),
        }
    }

    /// Returns the commit's tree.
    pub(crate) async fn commit_tree(&self, repo: &RepoId, sha: Sha) -> Result<Sha, HandlerError> {
        let effect = GitHubEffect::GetCommit {
            repo: repo.clone(),
            sha,
        };
        match self.run(effect).await? {
            GitHubResponse::Commit { tree, .. } => Ok(tree),
            other => Err(unexpected("get_commit", other)),
        }
    }

    fn created(effect: &'static str, response: GitHubResponse) -> Result<Sha, HandlerError> {
        match response {
            GitHubResponse::Created { sha } => Ok(sha),
            other => Err(unexpected(effect, other)),
        }
    }

    pub(crate) async fn blob(&self, repo: &RepoId, content: String) -> Result<Sha, HandlerError> {
        let effect = GitHubEffect::CreateBlob {
            repo: repo.clone(),
            content,
        };
        Self::created("create_blob", self.run(effect).await?)
    }

    pub(crate) async fn tree(
        &self,
        repo: &RepoId,
        base_tree: Sha,
        entries: Vec<TreeEntry>,
    ) -> Result<Sha, HandlerError> {
        let effect = GitHubEffect::CreateTree {
            repo: repo.clone(),
            base_tree,
            entries,
        };
        Self::created("create_tree", self.run(effect).await?)
    }

    pub(crate) async fn commit(
        &self,
        repo: &RepoId,
        message: String,
        tree: Sha,
        parent: Sha,
        author: GitIdentity,
        committer: GitIdentity,
    ) -> Result<Sha, HandlerError> {
        let effect = GitHubEffect::CreateCommit {
            repo: repo.clone(),
            message,
            tree,
            parents: vec![parent],
            author,
            committer,
        };
        Self::created("create_commit", self.run(effect).await?)
    }

    /// Creates the branch, or force-moves it if it exists. Returns true if it already existed.
    pub(crate) async fn upsert_branch(
        &self,
        repo: &RepoId,
        branch: &str,
        sha: Sha,
    ) -> Result<bool, HandlerError> {
        let effect = GitHubEffect::CreateBranch {
            repo: repo.clone(),
            branch: branch.to_string(),
            sha: sha.clone(),
        };
        match self.run(effect).await? {
            GitHubResponse::BranchCreated => Ok(false),
            GitHubResponse::BranchExists => {
                let effect = GitHubEffect::ForceUpdateBranch {
                    repo: repo.clone(),
                    branch: branch.to_string(),
                    sha,
                };
                match self.run(effect).await? {
                    GitHubResponse::BranchUpdated => Ok(true),
                    other => Err(unexpected("force_update_branch", other)),
                }
            }
            other => Err(unexpected("create_branch", other)),
        }
    }

    pub(crate) async fn delete_branch(
        &self,
        repo: &RepoId,
        branch: &str,
    ) -> Result<bool, HandlerError> {
        let effect = GitHubEffect::DeleteBranch {
            repo: repo.clone(),
            branch: branch.to_string(),
        };
        match self.run(effect).await? {
            GitHubResponse::BranchDeleted { deleted } => Ok(deleted),
            other => Err(unexpected("delete_branch", other)),
        }
    }

    pub(crate) async fn pull_request(&self, url: &str) -> Result<PullRequestData, HandlerError> {
        let effect = GitHubEffect::GetPullRequest {
            url: url.to_string(),
        };
        match self.run(effect).await? {
            GitHubResponse::PullRequest(pr) => Ok(pr),
            other => Err(unexpected("get_pull_request", other)),
        }
    }

    pub(crate) async fn pull_requests(
        &self,
        repo: &RepoId,
        head: String,
    ) -> Result<Vec<PullRequestData>, HandlerError> {
        let effect = GitHubEffect::FindPullRequests {
            repo: repo.clone(),
            head,
        };
        match self.run(effect).await? {
            GitHubResponse::PullRequests(prs) => Ok(prs),
            other => Err(unexpected("find_pull_requests", other)),
        }
    }

    pub(crate) async fn open_pull_request(
        &self,
        repo: &RepoId,
        title: String,
        body: String,
        head: String,
        base: String,
    ) -> Result<PullRequestData, HandlerError> {
        let effect = GitHubEffect::CreatePullRequest {
            repo: repo.clone(),
            title,
            body,
            head,
            base,
        };
        match self.run(effect).await? {
            GitHubResponse::PullRequest(pr) => Ok(pr),
            other => Err(unexpected("create_pull_request", other)),
        }
    }

    /// Returns the comment's URL.
    pub(crate) async fn comment(
        &self,
        repo: &RepoId,
        number: PrNumber,
        body: String,
    ) -> Result<String, HandlerError> {
        let effect = GitHubEffect::CreateComment {
            repo: repo.clone(),
            number,
            body,
        };
        match self.run(effect).await? {
            GitHubResponse::Posted { html_url } => Ok(html_url),
            other => Err(unexpected("create_comment", other)),
        }
    }

    /// Returns the issue's URL.
    pub(crate) async fn issue(
        &self,
        repo: &RepoId,
        title: &str,
        body: String,
    ) -> Result<String, HandlerError> {
        let effect = GitHubEffect::CreateIssue {
            repo: repo.clone(),
            title: title.to_string(),
            body,
        };
        match self.run(effect).await? {
            GitHubResponse::Posted { html_url } => Ok(html_url),
            other => Err(unexpected("create_issue", other)),
        }
    }

    pub(crate) async fn user(&self, login: &str) -> Result<UserProfile, HandlerError> {
        let effect = GitHubEffect::GetUser {
            login: login.to_string(),
        };
        match self.run(effect).await? {
            GitHubResponse::User(profile) => Ok(profile),
            other => Err(unexpected("get_user", other)),
        }
    }

    pub(crate) async fn author_emails(
        &self,
        repo: &RepoId,
        author: &str,
    ) -> Result<Vec<String>, HandlerError> {
        let effect = GitHubEffect::ListCommitsByAuthor {
            repo: repo.clone(),
            author: author.to_string(),
        };
        match self.run(effect).await? {
            GitHubResponse::AuthorEmails(emails) => Ok(emails),
            other => Err(unexpected("list_commits_by_author", other)),
        }
    }
}
