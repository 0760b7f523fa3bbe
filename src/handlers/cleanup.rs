//! Cleanup handler for `pull_request` events.
//!
//! When one of the bot's registry pull requests is closed, its branch on the
//! fork is deleted. The pull request is re-fetched after a pause first, so a
//! close-and-reopen (to retrigger CI, say) keeps the branch.

use std::fmt;

use crate::config::Config;
use crate::effects::GitHubInterpreter;
use crate::webhooks::{PrAction, PrState, WebhookEnvelope, parse_pull_request_event};

use super::calls::GitHubCalls;
use super::error::HandlerError;
use super::outcome::{CleanupIgnoreReason, CleanupOutcome};

/// Handles one `pull_request` webhook delivery.
pub async fn handle_cleanup<G>(
    config: &Config,
    github: &G,
    envelope: &WebhookEnvelope,
) -> Result<CleanupOutcome, HandlerError>
where
    G: GitHubInterpreter + Sync,
    G::Error: fmt::Display,
{
    let payload = envelope
        .authenticate(config.webhook_secret.as_bytes())
        .ok_or(HandlerError::Unauthorized)?;
    let event = parse_pull_request_event(payload)?;

    if event.action != PrAction::Closed {
        return Ok(CleanupOutcome::Ignored(CleanupIgnoreReason::NotClosed));
    }
    if event.author_login != config.bot_user {
        return Ok(CleanupOutcome::Ignored(
            CleanupIgnoreReason::NotBotPullRequest {
                bot: config.bot_user.clone(),
            },
        ));
    }

    let branch = event.head_ref;
    tokio::time::sleep(config.cleanup_delay).await;

    let calls = GitHubCalls::new(github);
    let current = calls.pull_request(&event.url).await?;
    if current.state != PrState::Closed {
        return Ok(CleanupOutcome::Reopened);
    }

    if calls.delete_branch(&config.fork(), &branch).await? {
        Ok(CleanupOutcome::BranchDeleted { branch })
    } else {
        Ok(CleanupOutcome::DeleteFailed { branch })
    }
}
