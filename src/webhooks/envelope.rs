//! Invocation envelope decoding.
//!
//! The trigger that forwards GitHub deliveries hands each handler a small JSON
//! document: the raw webhook body, base64-encoded so that it survives transport
//! byte-for-byte, and the delivery's signature header. The signature is computed
//! over the *decoded* bytes, so decoding happens before verification and the
//! JSON payload is only parsed after verification succeeds.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signature::verify_signature;

/// The request shape consumed by both handler entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    /// Base64 encoding of the raw webhook body.
    #[serde(alias = "body64")]
    pub encoded_payload: String,

    /// The delivery's signature header value (`sha1=<hex>`).
    pub signature: String,
}

/// Error decoding an [`InvocationRequest`].
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// `encodedPayload` is not valid base64.
    #[error("encoded payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

impl InvocationRequest {
    /// Builds a request from raw payload bytes (the inverse of [`decode`](Self::decode)).
    pub fn encode(payload: &[u8], signature: impl Into<String>) -> Self {
        InvocationRequest {
            encoded_payload: STANDARD.encode(payload),
            signature: signature.into(),
        }
    }

    /// Decodes the payload into a [`WebhookEnvelope`].
    pub fn decode(&self) -> Result<WebhookEnvelope, EnvelopeError> {
        let payload = STANDARD.decode(self.encoded_payload.trim())?;
        Ok(WebhookEnvelope {
            payload,
            signature: self.signature.clone(),
        })
    }
}

/// A received webhook: raw payload bytes plus the delivery signature.
///
/// Verified once, then discarded after the typed event is extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEnvelope {
    /// The raw webhook body, exactly as signed.
    pub payload: Vec<u8>,

    /// The delivery's signature header value.
    pub signature: String,
}

impl WebhookEnvelope {
    pub fn new(payload: impl Into<Vec<u8>>, signature: impl Into<String>) -> Self {
        WebhookEnvelope {
            payload: payload.into(),
            signature: signature.into(),
        }
    }

    /// Returns the payload if the signature matches `secret`, `None` otherwise.
    pub fn authenticate(&self, secret: &[u8]) -> Option<&[u8]> {
        verify_signature(&self.payload, &self.signature, secret).then_some(self.payload.as_slice())
    }
}
