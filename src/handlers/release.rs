//! Tag/register handler for `release` events.
//!
//! Turns a published `vX.Y.Z` release into a registry pull request. The new
//! version's files are committed on top of a snapshot of the registry branch,
//! pushed to a branch on the bot's fork, and proposed upstream. A redelivered
//! release force-moves the existing branch and comments on its pull request.

use std::fmt;

use crate::ci::build_badge;
use crate::config::{Config, noreply_email};
use crate::effects::{
    CiEffect, CiInterpreter, CiResponse, GitHubInterpreter, GitIdentity, ObjectKind, TreeEntry,
};
use crate::registry::{
    CiBadge, FileContent, NewVersion, PackageIdentity, PullRequestDraft, Registration, Version,
    VersionRecord, derive_package_name, normalize_line_endings, register_draft,
    select_predecessor, tag_draft, version_from_tag,
};
use crate::types::Sha;
use crate::webhooks::{ReleaseAction, ReleaseEvent, WebhookEnvelope, parse_release_event};

use super::calls::GitHubCalls;
use super::error::{HandlerError, REJECTION_ISSUE_TITLE, Rejection};
use super::outcome::{IgnoreReason, ReleaseOutcome};

/// Handles one `release` webhook delivery.
pub async fn handle_release<G, C>(
    config: &Config,
    github: &G,
    ci: &C,
    envelope: &WebhookEnvelope,
) -> Result<ReleaseOutcome, HandlerError>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
    C: CiInterpreter + Sync,
    C::Error: fmt::Display,
{
    let payload = envelope
        .authenticate(config.webhook_secret.as_bytes())
        .ok_or(HandlerError::Unauthorized)?;
    let release = parse_release_event(payload)?;

    if release.action != ReleaseAction::Published {
        return Ok(ReleaseOutcome::Ignored(IgnoreReason::NotPublished));
    }
    let Some(name) = derive_package_name(&release.repository.name, &config.package_suffix) else {
        return Ok(ReleaseOutcome::Ignored(IgnoreReason::MissingSuffix {
            suffix: config.package_suffix.clone(),
        }));
    };

    let calls = GitHubCalls::new(github);
    let source = &release.repository.id;

    let Some((version_name, version)) = version_from_tag(&release.tag_name) else {
        let reason = Rejection::MalformedTag {
            tag: release.tag_name.clone(),
        };
        return Err(reject(&calls, &release, reason).await);
    };
    let package = PackageIdentity::new(name, release.repository.clone_url.clone());

    let registration = resolve_registration(config, &calls, &release, &package, &version).await?;
    let tagged = resolve_tag_commit(&calls, &release).await?;

    let requires = match calls
        .content(source, &config.dependency_file, tagged.as_str())
        .await?
    {
        Some(content) => normalize_line_endings(&decode(&content, &config.dependency_file)?),
        None => {
            let reason = Rejection::MissingDependencyFile {
                file: config.dependency_file.clone(),
            };
            return Err(reject(&calls, &release, reason).await);
        }
    };

    // Registry snapshot: the new commit goes on top of whatever the branch points at now.
    let head = calls
        .reference(&config.registry, format!("heads/{}", config.registry_branch))
        .await?;
    let base_tree = calls.commit_tree(&config.registry, head.sha.clone()).await?;

    let fork = config.fork();
    let mut entries = vec![
        TreeEntry {
            path: package.requires_path(version_name),
            sha: calls.blob(&fork, requires.clone()).await?,
        },
        TreeEntry {
            path: package.sha1_path(version_name),
            sha: calls.blob(&fork, format!("{}\n", tagged)).await?,
        },
    ];
    if registration == Registration::Register {
        entries.push(TreeEntry {
            path: package.url_path(),
            sha: calls.blob(&fork, format!("{}\n", package.url)).await?,
        });
    }
    let tree = calls.tree(&fork, base_tree, entries).await?;

    let author = resolve_author(&calls, &release).await?;
    let message = format!(
        "{} {} {} [{}]",
        registration.verb(),
        release.repository.name,
        release.tag_name,
        release.release_url
    );
    let commit = calls
        .commit(&fork, message, tree, head.sha, author, config.committer.clone())
        .await?;

    let branch = package.branch_name(&release.tag_name);
    let existing = calls.upsert_branch(&fork, &branch, commit).await?;

    let badge = lookup_ci_badge(config, ci, &release, &tagged).await;
    let draft = match &registration {
        Registration::Register => register_draft(
            &release,
            badge.as_ref(),
            branch,
            config.registry_branch.clone(),
        ),
        Registration::Tag { predecessor } => tag_draft(
            &release,
            badge.as_ref(),
            predecessor,
            NewVersion {
                name: version_name,
                sha: &tagged,
                requires: &requires,
            },
            branch,
            config.registry_branch.clone(),
        ),
    };

    publish(config, &calls, draft, existing).await
}

/// Files an issue on the source repository and returns the rejection error.
async fn reject<G>(calls: &GitHubCalls<'_, G>, release: &ReleaseEvent, reason: Rejection) -> HandlerError
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    let body = reason.issue_body(&release.author_login);
    let issue_url = calls
        .issue(&release.repository.id, REJECTION_ISSUE_TITLE, body)
        .await
        .ok();
    HandlerError::Rejected { reason, issue_url }
}

fn decode(content: &FileContent, path: &str) -> Result<String, HandlerError> {
    content.decode().map_err(|source| HandlerError::InvalidContent {
        path: path.to_string(),
        source,
    })
}

/// Decides between registering the package and tagging a new version of it.
async fn resolve_registration<G>(
    config: &Config,
    calls: &GitHubCalls<'_, G>,
    release: &ReleaseEvent,
    package: &PackageIdentity,
    version: &Version,
) -> Result<Registration, HandlerError>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    let registry = &config.registry;
    let branch = config.registry_branch.as_str();

    let url_path = package.url_path();
    let Some(recorded) = calls.content(registry, &url_path, branch).await? else {
        return Ok(Registration::Register);
    };
    let recorded = decode(&recorded, &url_path)?;
    if !release.repository.accepts_url(recorded.trim_end()) {
        let reason = Rejection::UrlMismatch {
            registry: registry.repo.clone(),
        };
        return Err(reject(calls, release, reason).await);
    }

    let versions_dir = package.versions_dir();
    let names = calls.directory(registry, &versions_dir, branch).await?;
    let previous = select_predecessor(names.iter().map(String::as_str), version).map_err(|e| {
        HandlerError::InvalidRegistryData {
            path: versions_dir.clone(),
            reason: e.to_string(),
        }
    })?;
    let Some(previous) = previous else {
        let reason = Rejection::PrecedesAllVersions {
            tag: release.tag_name.clone(),
        };
        return Err(reject(calls, release, reason).await);
    };

    let sha_path = package.sha1_path(previous);
    let sha = match calls.content(registry, &sha_path, branch).await? {
        Some(content) => Sha::new(decode(&content, &sha_path)?.trim_end()),
        None => return Err(HandlerError::MissingRegistryFile { path: sha_path }),
    };

    // Very old entries have no dependency file.
    let requires_path = package.requires_path(previous);
    let requires = match calls.content(registry, &requires_path, branch).await? {
        Some(content) => decode(&content, &requires_path)?,
        None => String::new(),
    };

    Ok(Registration::Tag {
        predecessor: VersionRecord {
            name: previous.to_string(),
            sha,
            requires,
        },
    })
}

/// Resolves the release tag to a commit, dereferencing an annotated tag once.
async fn resolve_tag_commit<G>(
    calls: &GitHubCalls<'_, G>,
    release: &ReleaseEvent,
) -> Result<Sha, HandlerError>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    let source = &release.repository.id;
    let object = calls
        .reference(source, format!("tags/{}", release.tag_name))
        .await?;
    if object.kind == ObjectKind::Tag {
        Ok(calls.tag(source, object.sha).await?.sha)
    } else {
        Ok(object.sha)
    }
}

/// Commit author: profile name (or login) and the best email available.
async fn resolve_author<G>(
    calls: &GitHubCalls<'_, G>,
    release: &ReleaseEvent,
) -> Result<GitIdentity, HandlerError>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    let login = release.author_login.as_str();
    let profile = calls.user(login).await?;
    let name = profile.name.unwrap_or_else(|| login.to_string());
    let email = match profile.email {
        Some(email) => email,
        None => calls
            .author_emails(&release.repository.id, login)
            .await?
            .into_iter()
            .next()
            .unwrap_or_else(|| noreply_email(login)),
    };
    Ok(GitIdentity::new(name, email))
}

/// Best-effort CI badge: any failure, missing build, or build of another commit yields `None`.
async fn lookup_ci_badge<C>(
    config: &Config,
    ci: &C,
    release: &ReleaseEvent,
    tagged: &Sha,
) -> Option<CiBadge>
where
    C: CiInterpreter + Sync,
    C::Error: fmt::Display,
{
    let repo = &release.repository.id;
    let effect = CiEffect::GetBranchBuild {
        repo: repo.clone(),
        branch: release.tag_name.clone(),
    };
    match ci.interpret(effect).await {
        Ok(CiResponse::Build(Some(build))) if build.commit_sha == *tagged => Some(build_badge(
            &config.ci_api_url,
            &config.ci_web_url,
            repo,
            &release.tag_name,
            &build,
        )),
        _ => None,
    }
}

/// Opens the pull request, or comments on the existing one for a redelivered release.
async fn publish<G>(
    config: &Config,
    calls: &GitHubCalls<'_, G>,
    draft: PullRequestDraft,
    existing: bool,
) -> Result<ReleaseOutcome, HandlerError>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    let head = config.fork_head(&draft.head_branch);

    if existing {
        let pulls = calls.pull_requests(&config.registry, head.clone()).await?;
        if let Some(pr) = pulls.first() {
            let url = calls.comment(&config.registry, pr.number, draft.body).await?;
            return Ok(ReleaseOutcome::CommentCreated { url });
        }
    }

    let pr = calls
        .open_pull_request(
            &config.registry,
            draft.title,
            draft.body,
            head,
            draft.base_branch,
        )
        .await?;
    Ok(ReleaseOutcome::PullRequestCreated { url: pr.html_url })
}
