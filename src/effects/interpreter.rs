//! Effect interpreter traits.
//!
//! Handlers are generic over these traits, so the same orchestration runs
//! against the live APIs in production and against recording fakes in tests.

use std::future::Future;

use super::ci::{CiEffect, CiResponse};
use super::github::{GitHubEffect, GitHubResponse};

/// Interprets GitHub effects against the GitHub API.
///
/// Effects carry their target repository, so one interpreter instance serves
/// the source repository, the registry and the bot's fork alike.
///
/// # Example (fake for testing)
///
/// ```ignore
/// struct FakeGitHub {
///     responses: HashMap<GitHubEffect, GitHubResponse>,
/// }
///
/// impl GitHubInterpreter for FakeGitHub {
///     type Error = String;
///
///     async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
///         self.responses.get(&effect)
///             .cloned()
///             .ok_or_else(|| format!("unexpected effect: {:?}", effect))
///     }
/// }
/// ```
pub trait GitHubInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute a GitHub effect and return its response.
    fn interpret(
        &self,
        effect: GitHubEffect,
    ) -> impl Future<Output = Result<GitHubResponse, Self::Error>> + Send;
}

/// Interprets CI effects against a CI provider's API.
pub trait CiInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Execute a CI effect and return its response.
    fn interpret(
        &self,
        effect: CiEffect,
    ) -> impl Future<Output = Result<CiResponse, Self::Error>> + Send;
}
