//! Shared test utilities: an in-memory hosting platform, a scripted CI, and
//! signed payload builders.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use tokio::time::Instant;

use crate::config::Config;
use crate::effects::{
    CiBuild, CiEffect, CiInterpreter, CiResponse, GitHubEffect, GitHubInterpreter,
    GitHubResponse, GitIdentity, GitObject, PullRequestData, UserProfile,
};
use crate::registry::FileContent;
use crate::types::{PrNumber, RepoId, Sha};
use crate::webhooks::{WebhookEnvelope, compute_signature, format_signature_header};

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("BOT_USER", "attobot"),
        ("BOT_TOKEN", "test-token"),
        ("WEBHOOK_SECRET", "test-secret"),
        ("CLEANUP_DELAY_SECS", "0"),
    ]
    .into_iter()
    .collect();
    Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
        .expect("test configuration is valid")
}

/// Wraps `payload` with a valid `sha1=` signature for `config`'s secret.
pub fn signed_envelope(payload: &[u8], config: &Config) -> WebhookEnvelope {
    let signature = compute_signature(payload, config.webhook_secret.as_bytes());
    WebhookEnvelope::new(payload, format_signature_header(&signature))
}

/// A `release` payload for `alice/<repo>` at `tag`.
pub fn release_payload(action: &str, repo: &str, tag: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "action": action,
        "release": {
            "author": { "login": "alice" },
            "tag_name": tag,
            "html_url": format!("https://github.com/alice/{repo}/releases/tag/{tag}")
        },
        "repository": {
            "name": repo,
            "full_name": format!("alice/{repo}"),
            "git_url": format!("git://github.com/alice/{repo}.git"),
            "ssh_url": format!("git@github.com:alice/{repo}.git"),
            "clone_url": format!("https://github.com/alice/{repo}.git"),
            "html_url": format!("https://github.com/alice/{repo}")
        }
    }))
    .expect("payload serializes")
}

/// A `pull_request` payload for a pull request on the registry.
pub fn pull_request_payload(action: &str, author: &str, branch: &str, state: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "action": action,
        "number": 42,
        "pull_request": {
            "url": PULL_REQUEST_API_URL,
            "state": state,
            "head": { "ref": branch },
            "user": { "login": author }
        }
    }))
    .expect("payload serializes")
}

pub const PULL_REQUEST_API_URL: &str = "https://api.github.com/repos/JuliaLang/METADATA.jl/pulls/42";

/// True for effects that write to the registry or its fork.
pub fn is_registry_write(effect: &GitHubEffect) -> bool {
    matches!(
        effect,
        GitHubEffect::CreateBlob { .. }
            | GitHubEffect::CreateTree { .. }
            | GitHubEffect::CreateCommit { .. }
            | GitHubEffect::CreateBranch { .. }
            | GitHubEffect::ForceUpdateBranch { .. }
            | GitHubEffect::DeleteBranch { .. }
            | GitHubEffect::CreatePullRequest { .. }
            | GitHubEffect::CreateComment { .. }
    )
}

// ─── Fake GitHub ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Platform {
    files: HashMap<(RepoId, String, String), FileContent>,
    refs: HashMap<(RepoId, String), GitObject>,
    tags: HashMap<(RepoId, Sha), GitObject>,
    commit_trees: HashMap<(RepoId, Sha), Sha>,
    branches: HashSet<(RepoId, String)>,
    pulls: Vec<(RepoId, String, PullRequestData)>,
    pulls_by_url: HashMap<String, PullRequestData>,
    users: HashMap<String, UserProfile>,
    author_emails: HashMap<(RepoId, String), Vec<String>>,
    next_id: u64,
    comments_posted: u64,
    issues_filed: u64,
    effects: Vec<GitHubEffect>,
    pull_request_fetches: Vec<Instant>,
}

impl Platform {
    fn next(&mut self, prefix: &str) -> Sha {
        self.next_id += 1;
        Sha::new(format!("{}-{}", prefix, self.next_id))
    }

    fn apply(&mut self, effect: GitHubEffect) -> Result<GitHubResponse, String> {
        self.effects.push(effect.clone());

        match effect {
            GitHubEffect::GetContent {
                repo,
                path,
                git_ref,
            } => Ok(GitHubResponse::Content(
                self.files.get(&(repo, path, git_ref)).cloned(),
            )),
            GitHubEffect::ListDirectory {
                repo,
                path,
                git_ref,
            } => {
                let prefix = format!("{}/", path);
                let names: BTreeSet<String> = self
                    .files
                    .keys()
                    .filter(|(r, _, g)| *r == repo && *g == git_ref)
                    .filter_map(|(_, p, _)| p.strip_prefix(&prefix))
                    .filter_map(|rest| rest.split('/').next())
                    .map(str::to_string)
                    .collect();
                Ok(GitHubResponse::Directory(names.into_iter().collect()))
            }
            GitHubEffect::GetRef { repo, reference } => self
                .refs
                .get(&(repo.clone(), reference.clone()))
                .cloned()
                .map(GitHubResponse::Object)
                .ok_or_else(|| format!("404 Not Found: {}/{}", repo, reference)),
            GitHubEffect::GetTag { repo, sha } => self
                .tags
                .get(&(repo, sha.clone()))
                .cloned()
                .map(GitHubResponse::Object)
                .ok_or_else(|| format!("404 Not Found: tag {}", sha)),
            GitHubEffect::GetCommit { repo, sha } => self
                .commit_trees
                .get(&(repo, sha.clone()))
                .cloned()
                .map(|tree| GitHubResponse::Commit {
                    sha: sha.clone(),
                    tree,
                })
                .ok_or_else(|| format!("404 Not Found: commit {}", sha)),
            GitHubEffect::CreateBlob { .. } => Ok(GitHubResponse::Created {
                sha: self.next("blob"),
            }),
            GitHubEffect::CreateTree { .. } => Ok(GitHubResponse::Created {
                sha: self.next("tree"),
            }),
            GitHubEffect::CreateCommit { .. } => Ok(GitHubResponse::Created {
                sha: self.next("commit"),
            }),
            GitHubEffect::CreateBranch { repo, branch, .. } => {
                if self.branches.insert((repo, branch)) {
                    Ok(GitHubResponse::BranchCreated)
                } else {
                    Ok(GitHubResponse::BranchExists)
                }
            }
            GitHubEffect::ForceUpdateBranch { repo, branch, .. } => {
                if self.branches.contains(&(repo, branch.clone())) {
                    Ok(GitHubResponse::BranchUpdated)
                } else {
                    Err(format!("422 Reference does not exist: {}", branch))
                }
            }
            GitHubEffect::DeleteBranch { repo, branch } => Ok(GitHubResponse::BranchDeleted {
                deleted: self.branches.remove(&(repo, branch)),
            }),
            GitHubEffect::GetPullRequest { url } => {
                self.pull_request_fetches.push(Instant::now());
                self.pulls_by_url
                    .get(&url)
                    .cloned()
                    .map(GitHubResponse::PullRequest)
                    .ok_or_else(|| format!("404 Not Found: {}", url))
            }
            GitHubEffect::FindPullRequests { repo, head } => Ok(GitHubResponse::PullRequests(
                self.pulls
                    .iter()
                    .filter(|(r, h, _)| *r == repo && *h == head)
                    .map(|(_, _, pr)| pr.clone())
                    .collect(),
            )),
            GitHubEffect::CreatePullRequest { repo, head, .. } => {
                let number = self.pulls.iter().filter(|(r, _, _)| *r == repo).count() as u64 + 1;
                let pr = PullRequestData {
                    number: PrNumber(number),
                    state: crate::webhooks::PrState::Open,
                    html_url: format!("https://github.com/{}/pull/{}", repo, number),
                };
                self.pulls.push((repo, head, pr.clone()));
                Ok(GitHubResponse::PullRequest(pr))
            }
            GitHubEffect::CreateComment { repo, number, .. } => {
                let pr = self
                    .pulls
                    .iter()
                    .find(|(r, _, pr)| *r == repo && pr.number == number)
                    .map(|(_, _, pr)| pr.clone())
                    .ok_or_else(|| format!("404 Not Found: {} {}", repo, number))?;
                self.comments_posted += 1;
                Ok(GitHubResponse::Posted {
                    html_url: format!("{}#issuecomment-{}", pr.html_url, self.comments_posted),
                })
            }
            GitHubEffect::CreateIssue { repo, .. } => {
                self.issues_filed += 1;
                Ok(GitHubResponse::Posted {
                    html_url: format!("https://github.com/{}/issues/{}", repo, self.issues_filed),
                })
            }
            GitHubEffect::GetUser { login } => Ok(GitHubResponse::User(
                self.users.get(&login).cloned().unwrap_or(UserProfile {
                    login,
                    name: None,
                    email: None,
                }),
            )),
            GitHubEffect::ListCommitsByAuthor { repo, author } => Ok(GitHubResponse::AuthorEmails(
                self.author_emails
                    .get(&(repo, author))
                    .cloned()
                    .unwrap_or_default(),
            )),
        }
    }
}

/// In-memory hosting platform recording every effect it interprets.
///
/// Lookups of unknown refs, tags, commits or pull requests fail like a 404
/// would; missing files are `Content(None)` as with the real interpreter.
#[derive(Default)]
pub struct FakeGitHub {
    platform: Mutex<Platform>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Platform) -> R) -> R {
        let mut platform = self.platform.lock().expect("fake platform lock");
        f(&mut platform)
    }

    /// Stores `text` base64-encoded, the way the contents API returns it.
    pub fn set_file(&self, repo: &RepoId, path: &str, git_ref: &str, text: &str) {
        self.with(|p| {
            p.files.insert(
                (repo.clone(), path.to_string(), git_ref.to_string()),
                FileContent::base64(text),
            )
        });
    }

    pub fn remove_file(&self, repo: &RepoId, path: &str, git_ref: &str) {
        self.with(|p| {
            p.files
                .remove(&(repo.clone(), path.to_string(), git_ref.to_string()))
        });
    }

    pub fn set_ref(&self, repo: &RepoId, reference: &str, object: GitObject) {
        self.with(|p| p.refs.insert((repo.clone(), reference.to_string()), object));
    }

    pub fn set_tag(&self, repo: &RepoId, sha: &Sha, object: GitObject) {
        self.with(|p| p.tags.insert((repo.clone(), sha.clone()), object));
    }

    pub fn set_commit_tree(&self, repo: &RepoId, commit: &Sha, tree: Sha) {
        self.with(|p| p.commit_trees.insert((repo.clone(), commit.clone()), tree));
    }

    pub fn set_branch(&self, repo: &RepoId, branch: &str) {
        self.with(|p| p.branches.insert((repo.clone(), branch.to_string())));
    }

    pub fn has_branch(&self, repo: &RepoId, branch: &str) -> bool {
        self.with(|p| p.branches.contains(&(repo.clone(), branch.to_string())))
    }

    pub fn add_pull_request(&self, repo: &RepoId, head: &str, pr: PullRequestData) {
        self.with(|p| p.pulls.push((repo.clone(), head.to_string(), pr)));
    }

    /// Sets what `GetPullRequest { url }` returns.
    pub fn set_pull_request_at(&self, url: &str, pr: PullRequestData) {
        self.with(|p| p.pulls_by_url.insert(url.to_string(), pr));
    }

    pub fn set_user(&self, profile: UserProfile) {
        self.with(|p| p.users.insert(profile.login.clone(), profile));
    }

    pub fn set_author_emails(&self, repo: &RepoId, login: &str, emails: Vec<String>) {
        self.with(|p| {
            p.author_emails
                .insert((repo.clone(), login.to_string()), emails)
        });
    }

    /// Every effect interpreted so far, in order.
    pub fn effects(&self) -> Vec<GitHubEffect> {
        self.with(|p| p.effects.clone())
    }

    /// When each `GetPullRequest` was interpreted, on tokio's clock.
    pub fn pull_request_fetches(&self) -> Vec<Instant> {
        self.with(|p| p.pull_request_fetches.clone())
    }

    /// Contents of blobs created in `repo`, in order.
    pub fn blob_contents(&self, repo: &RepoId) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                GitHubEffect::CreateBlob { repo: r, content } if r == *repo => Some(content),
                _ => None,
            })
            .collect()
    }

    /// `(repo, title, body, head, base)` of pull requests opened.
    pub fn created_pull_requests(&self) -> Vec<(RepoId, String, String, String, String)> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                GitHubEffect::CreatePullRequest {
                    repo,
                    title,
                    body,
                    head,
                    base,
                } => Some((repo, title, body, head, base)),
                _ => None,
            })
            .collect()
    }

    /// `(repo, title, body)` of issues filed.
    pub fn created_issues(&self) -> Vec<(RepoId, String, String)> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                GitHubEffect::CreateIssue { repo, title, body } => Some((repo, title, body)),
                _ => None,
            })
            .collect()
    }

    /// `(repo, number, body)` of comments posted.
    pub fn created_comments(&self) -> Vec<(RepoId, PrNumber, String)> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                GitHubEffect::CreateComment { repo, number, body } => Some((repo, number, body)),
                _ => None,
            })
            .collect()
    }

    /// Authors of commits created.
    pub fn commit_authors(&self) -> Vec<GitIdentity> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                GitHubEffect::CreateCommit { author, .. } => Some(author),
                _ => None,
            })
            .collect()
    }
}

impl GitHubInterpreter for FakeGitHub {
    type Error = String;

    fn interpret(
        &self,
        effect: GitHubEffect,
    ) -> impl Future<Output = Result<GitHubResponse, Self::Error>> + Send {
        let result = self.with(|p| p.apply(effect));
        async move { result }
    }
}

// ─── Fake CI ──────────────────────────────────────────────────────────────────

/// CI provider answering every lookup the same way.
pub struct FakeCi {
    response: Result<CiResponse, String>,
}

impl FakeCi {
    pub fn none() -> Self {
        FakeCi {
            response: Ok(CiResponse::Build(None)),
        }
    }

    pub fn build(build: CiBuild) -> Self {
        FakeCi {
            response: Ok(CiResponse::Build(Some(build))),
        }
    }

    pub fn failing() -> Self {
        FakeCi {
            response: Err("connection refused".to_string()),
        }
    }
}

impl CiInterpreter for FakeCi {
    type Error = String;

    fn interpret(
        &self,
        _effect: CiEffect,
    ) -> impl Future<Output = Result<CiResponse, Self::Error>> + Send {
        let response = self.response.clone();
        async move { response }
    }
}
