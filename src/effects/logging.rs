//! Logging wrapper for effect interpreters.

use std::fmt;

use tracing::{debug, trace, warn};

use super::ci::{CiEffect, CiResponse};
use super::github::{GitHubEffect, GitHubResponse};
use super::interpreter::{CiInterpreter, GitHubInterpreter};

/// Wraps an interpreter and logs each effect, its response kind, and failures.
///
/// Handlers stay free of logging; the server wraps the live interpreters in
/// this type so that every API call made on behalf of a delivery is traced.
#[derive(Debug, Clone)]
pub struct TracingInterpreter<I> {
    inner: I,
}

impl<I> TracingInterpreter<I> {
    pub fn new(inner: I) -> Self {
        TracingInterpreter { inner }
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I> GitHubInterpreter for TracingInterpreter<I>
where
    I: GitHubInterpreter + Sync,
    I::Error: fmt::Display,
{
    type Error = I::Error;

    async fn interpret(&self, effect: GitHubEffect) -> Result<GitHubResponse, Self::Error> {
        debug!(?effect, "Executing GitHub effect");
        let result = self.inner.interpret(effect).await;
        match &result {
            Ok(response) => trace!(response = response.kind(), "GitHub effect completed"),
            Err(e) => warn!(error = %e, "GitHub effect failed"),
        }
        result
    }
}

impl<I> CiInterpreter for TracingInterpreter<I>
where
    I: CiInterpreter + Sync,
    I::Error: fmt::Display,
{
    type Error = I::Error;

    async fn interpret(&self, effect: CiEffect) -> Result<CiResponse, Self::Error> {
        debug!(?effect, "Executing CI effect");
        let result = self.inner.interpret(effect).await;
        match &result {
            Ok(CiResponse::Build(build)) => {
                trace!(found = build.is_some(), "CI effect completed")
            }
            Err(e) => warn!(error = %e, "CI effect failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoId;
    use std::future::Future;

    struct FailingGitHub;

    impl GitHubInterpreter for FailingGitHub {
        type Error = String;

        fn interpret(
            &self,
            _effect: GitHubEffect,
        ) -> impl Future<Output = Result<GitHubResponse, Self::Error>> + Send {
            async { Err("boom".to_string()) }
        }
    }

    struct NoBuilds;

    impl CiInterpreter for NoBuilds {
        type Error = String;

        fn interpret(
            &self,
            _effect: CiEffect,
        ) -> impl Future<Output = Result<CiResponse, Self::Error>> + Send {
            async { Ok(CiResponse::Build(None)) }
        }
    }

    #[tokio::test]
    async fn passes_errors_through() {
        let interpreter = TracingInterpreter::new(FailingGitHub);
        let result = interpreter
            .interpret(GitHubEffect::GetUser {
                login: "alice".to_string(),
            })
            .await;
        assert_eq!(result, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let interpreter = TracingInterpreter::new(NoBuilds);
        let result = interpreter
            .interpret(CiEffect::GetBranchBuild {
                repo: RepoId::new("alice", "Foo.jl"),
                branch: "v1.0.0".to_string(),
            })
            .await;
        assert_eq!(result, Ok(CiResponse::Build(None)));
    }
}
