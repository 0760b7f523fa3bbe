//! Release Registrar - a GitHub bot that turns published package releases into
//! pull requests against a package registry.
//!
//! Two handlers do the work: the tag/register handler writes a new version's
//! files onto a branch of the bot's registry fork and proposes them upstream,
//! and the cleanup handler deletes that branch once its pull request closes.
//! Both talk to GitHub through effects-as-data interpreters.

pub mod ci;
pub mod config;
pub mod effects;
pub mod github;
pub mod handlers;
pub mod registry;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_utils;
