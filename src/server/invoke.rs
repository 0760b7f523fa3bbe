//! Invocation endpoints.
//!
//! The trigger posts an [`InvocationRequest`] per delivery: the base64 body
//! and its signature. A successful run answers 200 with the outcome string;
//! failures map onto status codes via [`HandlerError`]'s `IntoResponse`.

use std::fmt;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use super::AppState;
use crate::effects::{CiInterpreter, GitHubInterpreter};
use crate::handlers::{HandlerError, handle_cleanup, handle_release};
use crate::webhooks::{InvocationRequest, WebhookEnvelope};

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerError::MalformedEnvelope(_) | HandlerError::Payload(_) => {
                StatusCode::BAD_REQUEST
            }
            HandlerError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            HandlerError::Api(_) | HandlerError::UnexpectedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            HandlerError::InvalidContent { .. }
            | HandlerError::InvalidRegistryData { .. }
            | HandlerError::MissingRegistryFile { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

/// Runs the tag/register handler on one envelope and logs the result.
pub(crate) async fn run_release<G, C>(
    app_state: &AppState<G, C>,
    envelope: &WebhookEnvelope,
) -> Result<(StatusCode, String), HandlerError>
where
    G: GitHubInterpreter + Send + Sync + 'static,
    G::Error: fmt::Display + Send,
    C: CiInterpreter + Send + Sync + 'static,
    C::Error: fmt::Display + Send,
{
    let result = handle_release(
        app_state.config(),
        app_state.github(),
        app_state.ci(),
        envelope,
    )
    .await;

    match result {
        Ok(outcome) => {
            info!(outcome = %outcome, "Release handled");
            Ok((StatusCode::OK, outcome.to_string()))
        }
        Err(e) => {
            warn!(error = %e, rejected = e.is_rejection(), "Release handler failed");
            Err(e)
        }
    }
}

/// Runs the cleanup handler on one envelope and logs the result.
pub(crate) async fn run_cleanup<G, C>(
    app_state: &AppState<G, C>,
    envelope: &WebhookEnvelope,
) -> Result<(StatusCode, String), HandlerError>
where
    G: GitHubInterpreter + Send + Sync + 'static,
    G::Error: fmt::Display + Send,
{
    match handle_cleanup(app_state.config(), app_state.github(), envelope).await {
        Ok(outcome) => {
            info!(outcome = %outcome, "Cleanup handled");
            Ok((StatusCode::OK, outcome.to_string()))
        }
        Err(e) => {
            warn!(error = %e, "Cleanup handler failed");
            Err(e)
        }
    }
}

/// `POST /release`
pub async fn release_handler<G, C>(
    State(app_state): State<AppState<G, C>>,
    Json(request): Json<InvocationRequest>,
) -> Result<(StatusCode, String), HandlerError>
where
    G: GitHubInterpreter + Send + Sync + 'static,
    G::Error: fmt::Display + Send,
    C: CiInterpreter + Send + Sync + 'static,
    C::Error: fmt::Display + Send,
{
    let envelope = request.decode()?;
    run_release(&app_state, &envelope).await
}

/// `POST /cleanup`
pub async fn cleanup_handler<G, C>(
    State(app_state): State<AppState<G, C>>,
    Json(request): Json<InvocationRequest>,
) -> Result<(StatusCode, String), HandlerError>
where
    G: GitHubInterpreter + Send + Sync + 'static,
    G::Error: fmt::Display + Send,
{
    let envelope = request.decode()?;
    run_cleanup(&app_state, &envelope).await
}
