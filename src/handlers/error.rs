//! Handler error taxonomy.

use std::fmt;

use thiserror::Error;

use crate::registry::ContentError;
use crate::webhooks::{EnvelopeError, ParseError};

/// Title of issues filed on the source repository for rejected releases.
pub const REJECTION_ISSUE_TITLE: &str = "Error tagging new release";

/// A release rejected because of something the submitter must fix.
///
/// `Display` renders the exact message filed in the issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Tag is not of the form `vX.Y.Z`.
    MalformedTag { tag: String },

    /// The registry records a different source URL for this package.
    UrlMismatch { registry: String },

    /// The tagged commit has no dependency declaration file.
    MissingDependencyFile { file: String },

    /// Every registered version is greater than or equal to the tagged one.
    PrecedesAllVersions { tag: String },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MalformedTag { tag } => write!(
                f,
                "The tag name \"{}\" is not of the appropriate SemVer form (vX.Y.Z).",
                tag
            ),
            Rejection::UrlMismatch { registry } => write!(
                f,
                "The URL of this package does not match that stored in {}.",
                registry
            ),
            Rejection::MissingDependencyFile { file } => {
                write!(f, "The {} file could not be found.", file)
            }
            Rejection::PrecedesAllVersions { tag } => write!(
                f,
                "Cannot tag a new version \"{}\" preceding all existing versions.",
                tag
            ),
        }
    }
}

impl Rejection {
    /// Body of the issue filed for this rejection.
    pub fn issue_body(&self, author: &str) -> String {
        format!("{}\ncc: @{}", self, author)
    }
}

/// Errors returned by the handlers.
///
/// Expected no-ops (wrong action, wrong author) are outcomes, not errors.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Signature verification failed. Deliberately carries no detail.
    #[error("unauthorized")]
    Unauthorized,

    /// Submitter error, reported on the source repository.
    ///
    /// `issue_url` is `None` if filing the issue itself failed.
    #[error("{reason}")]
    Rejected {
        reason: Rejection,
        issue_url: Option<String>,
    },

    #[error("malformed invocation envelope: {0}")]
    MalformedEnvelope(#[from] EnvelopeError),

    #[error("invalid webhook payload: {0}")]
    Payload(#[from] ParseError),

    /// A file could not be decoded to text.
    #[error("could not decode {path}: {source}")]
    InvalidContent {
        path: String,
        #[source]
        source: ContentError,
    },

    /// Registry contents violate the registry layout.
    #[error("invalid registry data at {path}: {reason}")]
    InvalidRegistryData { path: String, reason: String },

    /// A file the registry layout requires is missing.
    #[error("registry file {path} not found")]
    MissingRegistryFile { path: String },

    /// An interpreter answered an effect with the wrong kind of response.
    #[error("unexpected {actual} response to {effect}")]
    UnexpectedResponse {
        effect: &'static str,
        actual: &'static str,
    },

    /// An API call failed.
    #[error("API error: {0}")]
    Api(String),
}

impl HandlerError {
    /// Returns true if the failure is the submitter's to fix.
    pub fn is_rejection(&self) -> bool {
        matches!(self, HandlerError::Rejected { .. })
    }
}
