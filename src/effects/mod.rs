//! Effects-as-data for GitHub and CI operations.
//!
//! This module defines effect types that describe operations without executing them.
//! This enables:
//! - Handlers whose control flow is testable with fake interpreters
//! - Logging of every intended operation in one place
//! - A single seam for swapping API hosts (GitHub Enterprise, other CI providers)

pub mod ci;
pub mod github;
pub mod interpreter;
pub mod logging;

pub use ci::{CiBuild, CiEffect, CiResponse};
pub use github::{
    GitHubEffect, GitHubResponse, GitIdentity, GitObject, ObjectKind, PullRequestData,
    TreeEntry, UserProfile,
};
pub use interpreter::{CiInterpreter, GitHubInterpreter};
pub use logging::TracingInterpreter;
