//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Signature verification for webhook payloads (HMAC-SHA1, HMAC-SHA256)
//! - Decoding of the trigger's invocation envelope
//! - Typed `release` and `pull_request` events and their strict parser

pub mod envelope;
pub mod events;
pub mod parser;
pub mod signature;

pub use envelope::{EnvelopeError, InvocationRequest, WebhookEnvelope};
pub use events::{
    PrAction, PrState, PullRequestEvent, ReleaseAction, ReleaseEvent, SourceRepository,
};
pub use parser::{ParseError, parse_pr_state, parse_pull_request_event, parse_release_event};
pub use signature::{
    SignatureAlgorithm, compute_signature, compute_signature_with, format_signature_header,
    format_signature_header_with, parse_signature_header, verify_signature,
};
