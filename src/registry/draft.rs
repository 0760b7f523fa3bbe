//! Pull request drafts proposing new registry entries.
//!
//! Titles and bodies follow a fixed template so reviewers see the same layout
//! on every registration: links to the repository and release, an optional CI
//! badge, (for new versions) a compare link and a diff of the dependency
//! declaration, a reviewer checklist and a mention of the release author.

use crate::types::Sha;
use crate::webhooks::ReleaseEvent;

use super::diff::render_unified_diff;
use super::package::{REQUIRES_FILE, VersionRecord};

/// Reviewer checklist appended to every pull request body.
pub const REVIEW_CHECKLIST: &str = "Please make sure that:\n\
- CI passes for supported Julia versions (if applicable).\n\
- Version bounds reflect minimum requirements.";

/// A pull request ready to be opened (or posted as a comment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,

    /// Branch on the bot's fork, e.g. `Foo/v1.0.0`.
    pub head_branch: String,

    /// Registry branch the pull request targets.
    pub base_branch: String,
}

/// A CI build matching the tagged commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiBadge {
    pub badge_url: String,
    pub build_url: String,
}

impl CiBadge {
    /// The `Travis: [![...](badge)](build)` line, newline-terminated.
    pub fn line(&self) -> String {
        format!(
            "Travis: [![Travis Build Status]({})]({})\n",
            self.badge_url, self.build_url
        )
    }
}

/// Draft for a package's first registration.
pub fn register_draft(
    release: &ReleaseEvent,
    ci: Option<&CiBadge>,
    head_branch: String,
    base_branch: String,
) -> PullRequestDraft {
    let repo = &release.repository;
    let author = &release.author_login;

    let mut body = header_lines(release, ci);
    body.push_str(&format!("cc: @{}\n", author));
    body.push('\n');
    body.push_str(REVIEW_CHECKLIST);
    body.push_str("\n\n");
    body.push_str(&format!(
        "@{} This PR will remain open for three days for feedback (which is optional). \
         If you get feedback, please let us know if you are making changes, and we'll merge \
         once you're done.",
        author
    ));

    PullRequestDraft {
        title: format!("Register new package {} {}", repo.name, release.tag_name),
        body,
        head_branch,
        base_branch,
    }
}

/// The version being proposed in a tag pull request.
#[derive(Debug, Clone, Copy)]
pub struct NewVersion<'a> {
    /// Version text as tagged, without the leading `v`.
    pub name: &'a str,

    /// Commit the release tag resolves to.
    pub sha: &'a Sha,

    /// Dependency declaration at that commit (line endings normalized).
    pub requires: &'a str,
}

/// Draft for a new version of an already-registered package.
pub fn tag_draft(
    release: &ReleaseEvent,
    ci: Option<&CiBadge>,
    predecessor: &VersionRecord,
    new: NewVersion<'_>,
    head_branch: String,
    base_branch: String,
) -> PullRequestDraft {
    let repo = &release.repository;
    let previous = &predecessor.name;

    let compare_url = format!(
        "{}/compare/{}...{}",
        repo.html_url.trim_end_matches('/'),
        predecessor.sha,
        new.sha
    );

    let requires_status = match render_unified_diff(
        &predecessor.requires,
        new.requires,
        &format!("{}/{}", previous, REQUIRES_FILE),
        &format!("{}/{}", new.name, REQUIRES_FILE),
    ) {
        Some(diff) => format!("\n```diff\n{}```", diff),
        None => "no changes".to_string(),
    };

    let mut body = header_lines(release, ci);
    body.push_str(&format!("Diff: [vs v{}]({})\n", previous, compare_url));
    body.push_str(&format!(
        "`{}` vs v{}: {}\n",
        REQUIRES_FILE, previous, requires_status
    ));
    body.push_str(&format!("cc: @{}\n", release.author_login));
    body.push('\n');
    body.push_str(REVIEW_CHECKLIST);

    PullRequestDraft {
        title: format!("Tag {} {}", repo.name, release.tag_name),
        body,
        head_branch,
        base_branch,
    }
}

fn header_lines(release: &ReleaseEvent, ci: Option<&CiBadge>) -> String {
    let repo = &release.repository;
    let mut lines = format!(
        "Repository: [{}]({})\nRelease: [{}]({})\n",
        repo.id, repo.html_url, release.tag_name, release.release_url
    );
    if let Some(badge) = ci {
        lines.push_str(&badge.line());
    }
    lines
}
