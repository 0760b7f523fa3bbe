//! Registry domain logic.
//!
//! Pure functions and types describing what gets written to the registry:
//! version parsing and ordering, package identity and layout, content
//! decoding, dependency diffs and pull request drafts. Nothing here performs I/O.

pub mod content;
pub mod diff;
pub mod draft;
pub mod package;
pub mod version;

pub use content::{ContentError, FileContent, normalize_line_endings};
pub use diff::render_unified_diff;
pub use draft::{CiBadge, NewVersion, PullRequestDraft, REVIEW_CHECKLIST, register_draft, tag_draft};
pub use package::{
    PackageIdentity, REQUIRES_FILE, Registration, VersionRecord, derive_package_name,
    version_from_tag,
};
pub use version::{InvalidVersion, Qualifier, Version, select_predecessor};
