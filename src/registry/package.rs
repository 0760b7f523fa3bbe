//! Package identity, release tags and registry layout.
//!
//! The registry stores one directory per package:
//!
//! ```text
//! <package>/url                       canonical source URL, newline-terminated
//! <package>/versions/<X.Y.Z>/sha1     tagged commit SHA, newline-terminated
//! <package>/versions/<X.Y.Z>/requires dependency declaration at that commit
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Sha;

use super::version::Version;

/// Name of the per-version dependency file inside the registry.
pub const REQUIRES_FILE: &str = "requires";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+$").expect("valid tag regex"));

/// A package's registry identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    /// Package name (repository name without its suffix).
    pub name: String,

    /// Canonical source URL recorded in `<package>/url`.
    pub url: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        PackageIdentity {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Path of the recorded source URL.
    pub fn url_path(&self) -> String {
        format!("{}/url", self.name)
    }

    /// Directory holding one entry per registered version.
    pub fn versions_dir(&self) -> String {
        format!("{}/versions", self.name)
    }

    /// Path of the recorded commit SHA for the version named `version`.
    pub fn sha1_path(&self, version: &str) -> String {
        format!("{}/versions/{}/sha1", self.name, version)
    }

    /// Path of the recorded dependency declaration for the version named `version`.
    pub fn requires_path(&self, version: &str) -> String {
        format!("{}/versions/{}/{}", self.name, version, REQUIRES_FILE)
    }

    /// Name of the registry branch proposing `tag`, e.g. `Foo/v1.0.0`.
    pub fn branch_name(&self, tag: &str) -> String {
        format!("{}/{}", self.name, tag)
    }
}

/// Derives the package name from a repository name.
///
/// Repositories must carry `suffix` (e.g. `.jl`); a name without it, or made
/// only of the suffix, yields `None`.
///
/// # Examples
///
/// ```
/// use release_registrar::registry::derive_package_name;
///
/// assert_eq!(derive_package_name("Foo.jl", ".jl"), Some("Foo"));
/// assert_eq!(derive_package_name("Foo", ".jl"), None);
/// ```
pub fn derive_package_name<'a>(repo_name: &'a str, suffix: &str) -> Option<&'a str> {
    repo_name
        .strip_suffix(suffix)
        .filter(|name| !name.is_empty())
}

/// Validates a release tag of the form `vX.Y.Z` and returns the version text
/// (the tag without its `v`, unchanged) with its parsed value.
///
/// Returns `None` for anything else, including pre-release tags like `v1.0.0-rc1`.
pub fn version_from_tag(tag: &str) -> Option<(&str, Version)> {
    if !TAG_RE.is_match(tag) {
        return None;
    }
    let name = tag.strip_prefix('v')?;
    Version::parse(name).ok().map(|version| (name, version))
}

/// Registry metadata recorded for an existing version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Directory name under `<package>/versions`, as written.
    pub name: String,

    /// Commit the version was tagged from.
    pub sha: Sha,

    /// Dependency declaration text; empty for very old entries without one.
    pub requires: String,
}

/// Whether a release registers a new package or tags a known one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First-ever version of the package; `<package>/url` is written too.
    Register,
    /// New version of an existing package, with its immediate predecessor.
    Tag { predecessor: VersionRecord },
}

impl Registration {
    /// Verb used in commit messages: `Register` or `Tag`.
    pub fn verb(&self) -> &'static str {
        match self {
            Registration::Register => "Register",
            Registration::Tag { .. } => "Tag",
        }
    }
}
