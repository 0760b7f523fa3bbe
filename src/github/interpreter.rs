//! GitHub effect interpreter using octocrab.
//!
//! This module implements the `GitHubInterpreter` trait, executing GitHub effects
//! against the real GitHub API via octocrab.
//!
//! Key implementation details:
//! - Expected statuses become responses: 404 on contents reads, 422 on branch
//!   creation, non-204 on branch deletion
//! - Blobs are uploaded base64-encoded so any text survives unchanged
//! - No retries; a failed call fails the invocation

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::effects::{
    GitHubEffect, GitHubInterpreter, GitHubResponse, GitIdentity, GitObject, ObjectKind,
    PullRequestData, TreeEntry, UserProfile,
};
use crate::registry::FileContent;
use crate::types::{PrNumber, RepoId, Sha};
use crate::webhooks::PrState;

use super::client::OctocrabClient;
use super::error::GitHubApiError;

// ─── Interpreter Implementation ───────────────────────────────────────────────

impl GitHubInterpreter for OctocrabClient {
    type Error = GitHubApiError;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        interpret_github_effect(self, effect).await
    }
}

/// Interprets a GitHub effect, executing it against the GitHub API.
pub async fn interpret_github_effect(
    client: &OctocrabClient,
    effect: GitHubEffect,
) -> Result<GitHubResponse, GitHubApiError> {
    match effect {
        GitHubEffect::GetContent {
            repo,
            path,
            git_ref,
        } => get_content(client, &repo, &path, &git_ref).await,
        GitHubEffect::ListDirectory {
            repo,
            path,
            git_ref,
        } => list_directory(client, &repo, &path, &git_ref).await,
        GitHubEffect::GetRef { repo, reference } => get_ref(client, &repo, &reference).await,
        GitHubEffect::GetTag { repo, sha } => get_tag(client, &repo, &sha).await,
        GitHubEffect::GetCommit { repo, sha } => get_commit(client, &repo, &sha).await,
        GitHubEffect::CreateBlob { repo, content } => create_blob(client, &repo, &content).await,
        GitHubEffect::CreateTree {
            repo,
            base_tree,
            entries,
        } => create_tree(client, &repo, &base_tree, &entries).await,
        GitHubEffect::CreateCommit {
            repo,
            message,
            tree,
            parents,
            author,
            committer,
        } => {
            let request = CommitRequest {
                message: &message,
                tree: tree.as_str(),
                parents: parents.iter().map(Sha::as_str).collect(),
                author: &author,
                committer: &committer,
            };
            create_commit(client, &repo, &request).await
        }
        GitHubEffect::CreateBranch { repo, branch, sha } => {
            create_branch(client, &repo, &branch, &sha).await
        }
        GitHubEffect::ForceUpdateBranch { repo, branch, sha } => {
            force_update_branch(client, &repo, &branch, &sha).await
        }
        GitHubEffect::DeleteBranch { repo, branch } => delete_branch(client, &repo, &branch).await,
        GitHubEffect::GetPullRequest { url } => get_pull_request(client, &url).await,
        GitHubEffect::FindPullRequests { repo, head } => {
            find_pull_requests(client, &repo, &head).await
        }
        GitHubEffect::CreatePullRequest {
            repo,
            title,
            body,
            head,
            base,
        } => {
            let request = PullRequestRequest {
                title: &title,
                body: &body,
                head: &head,
                base: &base,
            };
            create_pull_request(client, &repo, &request).await
        }
        GitHubEffect::CreateComment { repo, number, body } => {
            create_comment(client, &repo, number, &body).await
        }
        GitHubEffect::CreateIssue { repo, title, body } => {
            create_issue(client, &repo, &title, &body).await
        }
        GitHubEffect::GetUser { login } => get_user(client, &login).await,
        GitHubEffect::ListCommitsByAuthor { repo, author } => {
            list_commits_by_author(client, &repo, &author).await
        }
    }
}

fn repo_route(repo: &RepoId, rest: &str) -> String {
    format!("/repos/{}/{}/{}", repo.owner, repo.repo, rest)
}

// ─── Contents ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RefQuery<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    encoding: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    name: String,
}

async fn get_content(
    client: &OctocrabClient,
    repo: &RepoId,
    path: &str,
    git_ref: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = repo_route(repo, &format!("contents/{}", path));
    let result: Result<ContentBody, _> = client
        .inner()
        .get(&route, Some(&RefQuery { git_ref }))
        .await;

    match result {
        Ok(body) => Ok(GitHubResponse::Content(Some(FileContent {
            // Files over the inline size limit come back with an empty encoding.
            encoding: body.encoding.unwrap_or_default(),
            content: body.content.unwrap_or_default(),
        }))),
        Err(e) => {
            let err = GitHubApiError::from_octocrab(e);
            if err.is_not_found() {
                Ok(GitHubResponse::Content(None))
            } else {
                Err(err)
            }
        }
    }
}

async fn list_directory(
    client: &OctocrabClient,
    repo: &RepoId,
    path: &str,
    git_ref: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = repo_route(repo, &format!("contents/{}", path));
    let result: Result<Vec<DirectoryEntry>, _> = client
        .inner()
        .get(&route, Some(&RefQuery { git_ref }))
        .await;

    match result {
        Ok(entries) => Ok(GitHubResponse::Directory(
            entries.into_iter().map(|e| e.name).collect(),
        )),
        Err(e) => {
            let err = GitHubApiError::from_octocrab(e);
            if err.is_not_found() {
                Ok(GitHubResponse::Directory(Vec::new()))
            } else {
                Err(err)
            }
        }
    }
}

// ─── Git Data ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ObjectBody {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
}

/// Shape shared by `git/ref/...` and `git/tags/...` responses.
#[derive(Debug, Deserialize)]
struct PointerBody {
    object: ObjectBody,
}

#[derive(Debug, Deserialize)]
struct ShaBody {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    sha: String,
    tree: ShaBody,
}

fn git_object(body: PointerBody) -> Result<GitHubResponse, GitHubApiError> {
    let kind = ObjectKind::from_api_str(&body.object.kind).ok_or_else(|| {
        GitHubApiError::without_source(format!("unknown object type {:?}", body.object.kind))
    })?;
    Ok(GitHubResponse::Object(GitObject {
        kind,
        sha: Sha::new(body.object.sha),
    }))
}

async fn get_ref(
    client: &OctocrabClient,
    repo: &RepoId,
    reference: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = repo_route(repo, &format!("git/ref/{}", reference));
    let body: PointerBody = client
        .inner()
        .get(&route, None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    git_object(body)
}

async fn get_tag(
    client: &OctocrabClient,
    repo: &RepoId,
    sha: &Sha,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = repo_route(repo, &format!("git/tags/{}", sha));
    let body: PointerBody = client
        .inner()
        .get(&route, None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    git_object(body)
}

async fn get_commit(
    client: &OctocrabClient,
    repo: &RepoId,
    sha: &Sha,
) -> Result<GitHubResponse, GitHubApiError> {
    let route = repo_route(repo, &format!("git/commits/{}", sha));
    let body: CommitBody = client
        .inner()
        .get(&route, None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::Commit {
        sha: Sha::new(body.sha),
        tree: Sha::new(body.tree.sha),
    })
}

async fn create_blob(
    client: &OctocrabClient,
    repo: &RepoId,
    content: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    #[derive(Serialize)]
    struct BlobRequest {
        content: String,
        encoding: &'static str,
    }

    let request = BlobRequest {
        content: BASE64.encode(content.as_bytes()),
        encoding: "base64",
    };
    let body: ShaBody = client
        .inner()
        .post(repo_route(repo, "git/blobs"), Some(&request))
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::Created {
        sha: Sha::new(body.sha),
    })
}

#[derive(Debug, Serialize)]
struct TreeItem<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct TreeRequest<'a> {
    base_tree: &'a str,
    tree: Vec<TreeItem<'a>>,
}

fn tree_request<'a>(base_tree: &'a Sha, entries: &'a [TreeEntry]) -> TreeRequest<'a> {
    TreeRequest {
        base_tree: base_tree.as_str(),
        tree: entries
            .iter()
            .map(|entry| TreeItem {
                path: &entry.path,
                mode: "100644",
                kind: "blob",
                sha: entry.sha.as_str(),
            })
            .collect(),
    }
}

async fn create_tree(
    client: &OctocrabClient,
    repo: &RepoId,
    base_tree: &Sha,
    entries: &[TreeEntry],
) -> Result<GitHubResponse, GitHubApiError> {
    let request = tree_request(base_tree, entries);
    let body: ShaBody = client
        .inner()
        .post(repo_route(repo, "git/trees"), Some(&request))
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::Created {
        sha: Sha::new(body.sha),
    })
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
    author: &'a GitIdentity,
    committer: &'a GitIdentity,
}

async fn create_commit(
    client: &OctocrabClient,
    repo: &RepoId,
    request: &CommitRequest<'_>,
) -> Result<GitHubResponse, GitHubApiError> {
    let body: ShaBody = client
        .inner()
        .post(repo_route(repo, "git/commits"), Some(request))
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::Created {
        sha: Sha::new(body.sha),
    })
}

// ─── Branches ─────────────────────────────────────────────────────────────────

async fn create_branch(
    client: &OctocrabClient,
    repo: &RepoId,
    branch: &str,
    sha: &Sha,
) -> Result<GitHubResponse, GitHubApiError> {
    #[derive(Serialize)]
    struct CreateRefRequest<'a> {
        #[serde(rename = "ref")]
        reference: String,
        sha: &'a str,
    }

    let request = CreateRefRequest {
        reference: format!("refs/heads/{}", branch),
        sha: sha.as_str(),
    };
    let result: Result<serde_json::Value, _> = client
        .inner()
        .post(repo_route(repo, "git/refs"), Some(&request))
        .await;

    match result {
        Ok(_) => Ok(GitHubResponse::BranchCreated),
        Err(e) => {
            let err = GitHubApiError::from_octocrab(e);
            if err.is_unprocessable() {
                Ok(GitHubResponse::BranchExists)
            } else {
                Err(err)
            }
        }
    }
}

async fn force_update_branch(
    client: &OctocrabClient,
    repo: &RepoId,
    branch: &str,
    sha: &Sha,
) -> Result<GitHubResponse, GitHubApiError> {
    #[derive(Serialize)]
    struct UpdateRefRequest<'a> {
        sha: &'a str,
        force: bool,
    }

    let request = UpdateRefRequest {
        sha: sha.as_str(),
        force: true,
    };
    let _: serde_json::Value = client
        .inner()
        .patch(
            repo_route(repo, &format!("git/refs/heads/{}", branch)),
            Some(&request),
        )
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::BranchUpdated)
}

async fn delete_branch(
    client: &OctocrabClient,
    repo: &RepoId,
    branch: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    // The raw call returns the response for any status; only 204 means deleted.
    let route = repo_route(repo, &format!("git/refs/heads/{}", branch));
    let response = client
        .inner()
        ._delete(route.as_str(), None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::BranchDeleted {
        deleted: response.status().as_u16() == 204,
    })
}

// ─── Pull Requests & Issues ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PullRequestBody {
    number: u64,
    state: PrState,
    html_url: String,
}

impl From<PullRequestBody> for PullRequestData {
    fn from(body: PullRequestBody) -> Self {
        PullRequestData {
            number: PrNumber(body.number),
            state: body.state,
            html_url: body.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HtmlUrlBody {
    html_url: String,
}

async fn get_pull_request(
    client: &OctocrabClient,
    url: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    // Absolute API URLs from webhook payloads are passed through unchanged.
    let body: PullRequestBody = client
        .inner()
        .get(url, None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::PullRequest(body.into()))
}

async fn find_pull_requests(
    client: &OctocrabClient,
    repo: &RepoId,
    head: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    #[derive(Serialize)]
    struct PullsQuery<'a> {
        head: &'a str,
        state: &'static str,
    }

    let pulls: Vec<PullRequestBody> = client
        .inner()
        .get(
            repo_route(repo, "pulls"),
            Some(&PullsQuery { head, state: "all" }),
        )
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::PullRequests(
        pulls.into_iter().map(PullRequestData::from).collect(),
    ))
}

#[derive(Serialize)]
struct PullRequestRequest<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

async fn create_pull_request(
    client: &OctocrabClient,
    repo: &RepoId,
    request: &PullRequestRequest<'_>,
) -> Result<GitHubResponse, GitHubApiError> {
    let body: PullRequestBody = client
        .inner()
        .post(repo_route(repo, "pulls"), Some(request))
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::PullRequest(body.into()))
}

async fn create_comment(
    client: &OctocrabClient,
    repo: &RepoId,
    number: PrNumber,
    body: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    #[derive(Serialize)]
    struct CommentRequest<'a> {
        body: &'a str,
    }

    let posted: HtmlUrlBody = client
        .inner()
        .post(
            repo_route(repo, &format!("issues/{}/comments", number.0)),
            Some(&CommentRequest { body }),
        )
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::Posted {
        html_url: posted.html_url,
    })
}

async fn create_issue(
    client: &OctocrabClient,
    repo: &RepoId,
    title: &str,
    body: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    let result = client
        .inner()
        .issues(&repo.owner, &repo.repo)
        .create(title)
        .body(body)
        .send()
        .await;

    match result {
        Ok(issue) => Ok(GitHubResponse::Posted {
            html_url: issue.html_url.to_string(),
        }),
        Err(e) => Err(GitHubApiError::from_octocrab(e)),
    }
}

// ─── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserBody {
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitListItem {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: Option<CommitPerson>,
}

#[derive(Debug, Deserialize)]
struct CommitPerson {
    email: Option<String>,
}

async fn get_user(client: &OctocrabClient, login: &str) -> Result<GitHubResponse, GitHubApiError> {
    let route = format!("/users/{}", urlencoding::encode(login));
    let user: UserBody = client
        .inner()
        .get(&route, None::<&()>)
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::User(UserProfile {
        login: user.login,
        name: user.name.filter(|n| !n.is_empty()),
        email: user.email.filter(|e| !e.is_empty()),
    }))
}

async fn list_commits_by_author(
    client: &OctocrabClient,
    repo: &RepoId,
    author: &str,
) -> Result<GitHubResponse, GitHubApiError> {
    #[derive(Serialize)]
    struct AuthorQuery<'a> {
        author: &'a str,
    }

    let commits: Vec<CommitListItem> = client
        .inner()
        .get(repo_route(repo, "commits"), Some(&AuthorQuery { author }))
        .await
        .map_err(GitHubApiError::from_octocrab)?;
    Ok(GitHubResponse::AuthorEmails(
        commits
            .into_iter()
            .filter_map(|item| item.commit.author.and_then(|a| a.email))
            .filter(|email| !email.is_empty())
            .collect(),
    ))
}
