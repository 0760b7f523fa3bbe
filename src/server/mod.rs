//! HTTP server for the registrar.
//!
//! # Endpoints
//!
//! - `POST /release` - Tag/register handler, invoked with an [`InvocationRequest`]
//! - `POST /cleanup` - Cleanup handler, invoked with an [`InvocationRequest`]
//! - `POST /webhook` - Direct GitHub deliveries, dispatched on `X-GitHub-Event`
//! - `GET /health` - Returns 200 if server is running
//!
//! [`InvocationRequest`]: crate::webhooks::InvocationRequest

use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::Config;
use crate::effects::{CiInterpreter, GitHubInterpreter};

pub mod invoke;
pub mod webhook;

pub use invoke::{cleanup_handler, release_handler};
pub use webhook::webhook_handler;

/// Shared application state, passed to handlers via axum's `State` extractor.
pub struct AppState<G, C> {
    inner: Arc<AppStateInner<G, C>>,
}

struct AppStateInner<G, C> {
    config: Config,
    github: G,
    ci: C,
}

impl<G, C> Clone for AppState<G, C> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G, C> AppState<G, C> {
    pub fn new(config: Config, github: G, ci: C) -> Self {
        AppState {
            inner: Arc::new(AppStateInner { config, github, ci }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn github(&self) -> &G {
        &self.inner.github
    }

    pub fn ci(&self) -> &C {
        &self.inner.ci
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<G, C>(app_state: AppState<G, C>) -> axum::Router
where
    G: GitHubInterpreter + Send + Sync + 'static,
    G::Error: fmt::Display + Send,
    C: CiInterpreter + Send + Sync + 'static,
    C::Error: fmt::Display + Send,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/release", post(release_handler::<G, C>))
        .route("/cleanup", post(cleanup_handler::<G, C>))
        .route("/webhook", post(webhook_handler::<G, C>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}

/// Liveness probe.
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeCi, FakeGitHub, test_config};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_returns_200() {
        let state = AppState::new(test_config(), FakeGitHub::new(), FakeCi::none());
        let app = build_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[test]
    fn app_state_clones_share_interpreters() {
        let state = AppState::new(test_config(), FakeGitHub::new(), FakeCi::none());
        let cloned = state.clone();

        assert!(std::ptr::eq(state.github(), cloned.github()));
        assert_eq!(cloned.config().bot_user, "attobot");
    }
}
