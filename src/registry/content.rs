//! Decoding of file contents returned by the repository contents API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file as returned by `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// `base64` or `utf-8`.
    pub encoding: String,

    /// Encoded content. GitHub wraps base64 content at 60 columns.
    pub content: String,
}

/// Error decoding a [`FileContent`].
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown content encoding {0:?}")]
    UnknownEncoding(String),

    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl FileContent {
    /// Content already in text form.
    pub fn utf8(content: impl Into<String>) -> Self {
        FileContent {
            encoding: "utf-8".to_string(),
            content: content.into(),
        }
    }

    /// Text encoded the way the API returns it.
    pub fn base64(text: &str) -> Self {
        FileContent {
            encoding: "base64".to_string(),
            content: STANDARD.encode(text),
        }
    }

    /// Decodes the content to text.
    pub fn decode(&self) -> Result<String, ContentError> {
        match self.encoding.as_str() {
            "base64" => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                Ok(String::from_utf8(STANDARD.decode(compact)?)?)
            }
            "utf-8" => Ok(self.content.clone()),
            other => Err(ContentError::UnknownEncoding(other.to_string())),
        }
    }
}

/// Converts CRLF line endings to LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}
