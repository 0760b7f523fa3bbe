//! Webhook endpoint handler.
//!
//! Accepts GitHub deliveries sent straight to the server, without an
//! invocation trigger in front. The raw body and signature header form the
//! envelope; `X-GitHub-Event` picks the handler.

use std::fmt;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, warn};

use super::AppState;
use super::invoke::{run_cleanup, run_release};
use crate::effects::{CiInterpreter, GitHubInterpreter};
use crate::handlers::HandlerError;
use crate::webhooks::WebhookEnvelope;

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
const HEADER_DELIVERY: &str = "x-github-delivery";
/// Signature headers, strongest first.
const HEADER_SIGNATURES: [&str; 2] = ["x-hub-signature-256", "x-hub-signature"];

/// Errors rejecting a delivery before any handler runs.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// No signature header at all.
    #[error("unauthorized")]
    MissingSignature,

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            WebhookError::MissingHeader(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            WebhookError::MissingSignature => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            WebhookError::Handler(e) => e.into_response(),
        }
    }
}

/// `POST /webhook`
///
/// - `release` deliveries go to the tag/register handler
/// - `pull_request` deliveries go to the cleanup handler
/// - `ping` answers `pong`
/// - anything else is accepted (202) and dropped
pub async fn webhook_handler<G, C>(
    State(app_state): State<AppState<G, C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, String), WebhookError>
where
    G: GitHubInterpreter + Send + Sync + 'static,
    G::Error: fmt::Display + Send,
    C: CiInterpreter + Send + Sync + 'static,
    C::Error: fmt::Display + Send,
{
    let event_type = get_header(&headers, HEADER_EVENT).ok_or(WebhookError::MissingHeader(HEADER_EVENT))?;
    let delivery_id = get_header(&headers, HEADER_DELIVERY).unwrap_or_default();

    debug!(
        delivery_id = %delivery_id,
        event_type = %event_type,
        "Received webhook"
    );

    let signature = HEADER_SIGNATURES
        .iter()
        .find_map(|name| get_header(&headers, name))
        .ok_or_else(|| {
            warn!(delivery_id = %delivery_id, "Webhook without signature");
            WebhookError::MissingSignature
        })?;
    let envelope = WebhookEnvelope::new(body.to_vec(), signature);

    match event_type.as_str() {
        "release" => Ok(run_release(&app_state, &envelope).await?),
        "pull_request" => Ok(run_cleanup(&app_state, &envelope).await?),
        "ping" => Ok((StatusCode::OK, "pong".to_string())),
        other => {
            debug!(delivery_id = %delivery_id, event_type = %other, "Ignoring event");
            Ok((StatusCode::ACCEPTED, format!("Ignored {} event", other)))
        }
    }
}

/// Extracts a header value as a string.
fn get_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use crate::test_utils::{FakeCi, FakeGitHub, release_payload, test_config};
    use crate::webhooks::{
        SignatureAlgorithm, compute_signature, compute_signature_with, format_signature_header,
        format_signature_header_with,
    };
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        build_router(AppState::new(test_config(), FakeGitHub::new(), FakeCi::none()))
    }

    fn delivery(event: &str, signature: Option<(&str, String)>, body: Vec<u8>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header("x-github-event", event)
            .header("x-github-delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958");
        if let Some((name, value)) = signature {
            builder = builder.header(name, value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn sha1_signed_release_is_dispatched() {
        let payload = release_payload("created", "Foo.jl", "v1.0.0");
        let signature = format_signature_header(&compute_signature(&payload, b"test-secret"));

        let response = app()
            .oneshot(delivery("release", Some(("x-hub-signature", signature)), payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Not a \"published\" event");
    }

    #[tokio::test]
    async fn sha256_signature_is_preferred() {
        let payload = release_payload("created", "Foo.jl", "v1.0.0");
        let signature = format_signature_header_with(
            SignatureAlgorithm::Sha256,
            &compute_signature_with(SignatureAlgorithm::Sha256, &payload, b"test-secret"),
        );

        let response = app()
            .oneshot(delivery("release", Some(("x-hub-signature-256", signature)), payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_signature_returns_401() {
        let payload = release_payload("published", "Foo.jl", "v1.0.0");
        let response = app().oneshot(delivery("release", None, payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ping_and_other_events() {
        let signature = ("x-hub-signature", "sha1=00".to_string());

        let response = app()
            .oneshot(delivery("ping", Some(signature.clone()), b"{}".to_vec()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "pong");

        let response = app()
            .oneshot(delivery("push", Some(signature), b"{}".to_vec()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn missing_event_header_returns_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("x-hub-signature", "sha1=00")
            .body(Body::from("{}"))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn get_header_present_and_missing() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "release".parse().unwrap());

        assert_eq!(get_header(&headers, HEADER_EVENT).as_deref(), Some("release"));
        assert_eq!(get_header(&headers, HEADER_DELIVERY), None);
    }
}
