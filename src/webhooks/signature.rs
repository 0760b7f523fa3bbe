//! GitHub webhook signature verification.
//!
//! GitHub signs webhook payloads with an HMAC of the raw body keyed by the
//! shared secret. The legacy `X-Hub-Signature` header carries `sha1=<hex>`;
//! the newer `X-Hub-Signature-256` header carries `sha256=<hex>`. The
//! registrar's invocation envelope forwards the `sha1=` form, and both are
//! accepted here.
//!
//! Verification is the first step of both handlers; a payload that fails
//! verification is never parsed.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// The digest named by a signature header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// `sha1=<hex>` (HMAC-SHA1, 20 bytes).
    Sha1,
    /// `sha256=<hex>` (HMAC-SHA256, 32 bytes).
    Sha256,
}

impl SignatureAlgorithm {
    fn prefix(self) -> &'static str {
        match self {
            SignatureAlgorithm::Sha1 => "sha1=",
            SignatureAlgorithm::Sha256 => "sha256=",
        }
    }
}

/// Parses a signature header (e.g., "sha1=abc123...") into its algorithm and raw bytes.
///
/// Returns `None` for malformed headers (unknown prefix, invalid hex, etc.).
/// The digest must be lowercase hex, as GitHub sends it. Never panics.
///
/// # Examples
///
/// ```
/// use release_registrar::webhooks::{SignatureAlgorithm, parse_signature_header};
///
/// let (alg, bytes) = parse_signature_header("sha1=abcd1234").unwrap();
/// assert_eq!(alg, SignatureAlgorithm::Sha1);
/// assert_eq!(bytes, vec![0xab, 0xcd, 0x12, 0x34]);
///
/// // Invalid: missing prefix
/// assert!(parse_signature_header("abcd1234").is_none());
///
/// // Invalid: unknown algorithm
/// assert!(parse_signature_header("md5=abcd1234").is_none());
///
/// // Invalid: bad hex
/// assert!(parse_signature_header("sha1=xyz").is_none());
/// ```
pub fn parse_signature_header(header: &str) -> Option<(SignatureAlgorithm, Vec<u8>)> {
    let (algorithm, hex_sig) = if let Some(rest) = header.strip_prefix("sha1=") {
        (SignatureAlgorithm::Sha1, rest)
    } else if let Some(rest) = header.strip_prefix("sha256=") {
        (SignatureAlgorithm::Sha256, rest)
    } else {
        return None;
    };

    if hex_sig.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }
    hex::decode(hex_sig).ok().map(|bytes| (algorithm, bytes))
}

/// Computes the HMAC-SHA1 signature of a payload using the given secret.
///
/// Useful for generating expected signatures in tests and tooling.
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    compute_signature_with(SignatureAlgorithm::Sha1, payload, secret)
}

/// Computes the HMAC signature of a payload with the chosen digest.
pub fn compute_signature_with(
    algorithm: SignatureAlgorithm,
    payload: &[u8],
    secret: &[u8],
) -> Vec<u8> {
    // HMAC accepts keys of any length, so `new_from_slice` cannot fail here;
    // an empty MAC would fail verification rather than panic.
    match algorithm {
        SignatureAlgorithm::Sha1 => match HmacSha1::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Err(_) => Vec::new(),
        },
        SignatureAlgorithm::Sha256 => match HmacSha256::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.finalize().into_bytes().to_vec()
            }
            Err(_) => Vec::new(),
        },
    }
}

/// Formats a SHA1 signature as a GitHub-style header value ("sha1=<hex>").
pub fn format_signature_header(signature: &[u8]) -> String {
    format_signature_header_with(SignatureAlgorithm::Sha1, signature)
}

/// Formats a signature with the prefix for the given algorithm.
pub fn format_signature_header_with(algorithm: SignatureAlgorithm, signature: &[u8]) -> String {
    format!("{}{}", algorithm.prefix(), hex::encode(signature))
}

/// Verifies a GitHub webhook signature against the payload and secret.
///
/// Returns `true` if the signature is valid, `false` otherwise. Never errors
/// on malformed input. Uses constant-time comparison to prevent timing attacks.
///
/// # Arguments
///
/// * `payload` - The raw webhook payload bytes
/// * `signature_header` - `sha1=<hex>` or `sha256=<hex>`
/// * `secret` - The webhook secret configured in GitHub
///
/// # Examples
///
/// ```
/// use release_registrar::webhooks::{verify_signature, compute_signature, format_signature_header};
///
/// let payload = b"Hello, World!";
/// let secret = b"my-secret-key";
///
/// let header = format_signature_header(&compute_signature(payload, secret));
///
/// assert!(verify_signature(payload, &header, secret));
/// assert!(!verify_signature(payload, &header, b"wrong-secret"));
/// ```
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some((algorithm, expected_signature)) = parse_signature_header(signature_header) else {
        return false;
    };

    // Constant-time comparison via the HMAC library
    match algorithm {
        SignatureAlgorithm::Sha1 => match HmacSha1::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.verify_slice(&expected_signature).is_ok()
            }
            Err(_) => false,
        },
        SignatureAlgorithm::Sha256 => match HmacSha256::new_from_slice(secret) {
            Ok(mut mac) => {
                mac.update(payload);
                mac.verify_slice(&expected_signature).is_ok()
            }
            Err(_) => false,
        },
    }
}
