//! The two webhook handlers.
//!
//! Each handler authenticates its envelope, parses the event, and drives the
//! hosting platform through a [`GitHubInterpreter`](crate::effects::GitHubInterpreter).
//! Both return a displayable outcome on success; submitter errors and API
//! failures come back as [`HandlerError`].

mod calls;
pub mod cleanup;
pub mod error;
pub mod outcome;
pub mod release;

pub use cleanup::handle_cleanup;
pub use error::{HandlerError, REJECTION_ISSUE_TITLE, Rejection};
pub use outcome::{CleanupIgnoreReason, CleanupOutcome, IgnoreReason, ReleaseOutcome};
pub use release::handle_release;
