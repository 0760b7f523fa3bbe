//! Successful handler results.
//!
//! `Display` renders the status string returned to the trigger.

use std::fmt;

/// Why a release event was deliberately not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    NotPublished,
    MissingSuffix { suffix: String },
}

/// Result of the tag/register handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Ignored(IgnoreReason),

    /// A new pull request was opened on the registry.
    PullRequestCreated { url: String },

    /// The branch already existed; the draft was posted on its pull request.
    CommentCreated { url: String },
}

impl fmt::Display for ReleaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseOutcome::Ignored(IgnoreReason::NotPublished) => {
                write!(f, "Not a \"published\" event")
            }
            ReleaseOutcome::Ignored(IgnoreReason::MissingSuffix { suffix }) => {
                write!(f, "The repository does not have a {} suffix.", suffix)
            }
            ReleaseOutcome::PullRequestCreated { url } => write!(f, "PR created: {}", url),
            ReleaseOutcome::CommentCreated { url } => write!(f, "Comment created: {}", url),
        }
    }
}

/// Why a pull request event was deliberately not processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupIgnoreReason {
    NotClosed,
    NotBotPullRequest { bot: String },
}

/// Result of the cleanup handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Ignored(CleanupIgnoreReason),

    /// The pull request was open again after the delay; the branch was kept.
    Reopened,

    BranchDeleted { branch: String },

    /// The delete call did not answer 204.
    DeleteFailed { branch: String },
}

impl fmt::Display for CleanupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupOutcome::Ignored(CleanupIgnoreReason::NotClosed) => {
                write!(f, "Not a \"closed\" event")
            }
            CleanupOutcome::Ignored(CleanupIgnoreReason::NotBotPullRequest { bot }) => {
                write!(f, "Not an {} pull request", bot)
            }
            CleanupOutcome::Reopened => write!(f, "Pull request has been reopened"),
            CleanupOutcome::BranchDeleted { branch } => {
                write!(f, "Branch {} successfully deleted.", branch)
            }
            CleanupOutcome::DeleteFailed { branch } => {
                write!(f, "Could not delete branch {}", branch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_strings() {
        assert_eq!(
            ReleaseOutcome::Ignored(IgnoreReason::NotPublished).to_string(),
            "Not a \"published\" event"
        );
        assert_eq!(
            ReleaseOutcome::Ignored(IgnoreReason::MissingSuffix {
                suffix: ".jl".to_string()
            })
            .to_string(),
            "The repository does not have a .jl suffix."
        );
        assert_eq!(
            ReleaseOutcome::CommentCreated {
                url: "u".to_string()
            }
            .to_string(),
            "Comment created: u"
        );
    }

    #[test]
    fn cleanup_strings() {
        assert_eq!(
            CleanupOutcome::Ignored(CleanupIgnoreReason::NotBotPullRequest {
                bot: "attobot".to_string()
            })
            .to_string(),
            "Not an attobot pull request"
        );
        assert_eq!(
            CleanupOutcome::BranchDeleted {
                branch: "Foo/v1.0.0".to_string()
            }
            .to_string(),
            "Branch Foo/v1.0.0 successfully deleted."
        );
        assert_eq!(
            CleanupOutcome::DeleteFailed {
                branch: "Foo/v1.0.0".to_string()
            }
            .to_string(),
            "Could not delete branch Foo/v1.0.0"
        );
    }
}
