//! Registry version strings and their ordering.
//!
//! Registry versions follow a strict `X.Y.Z[(+|-)suffix]` grammar. Ordering is
//! numeric on the three components, then by qualifier kind: a `-` suffix
//! (pre-release) sorts before the bare version, which sorts before a `+`
//! suffix (build). Two versions with the same kind of qualifier are ordered by
//! their suffix text. Components compare by value, so `1.02.0` and `1.2.0` are
//! equal; registry paths always use the text as written.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:([+-])([0-9A-Za-z-]+))?$").expect("valid version regex")
});

/// Error returned for strings outside the version grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version {0:?}: expected X.Y.Z with an optional +/- suffix")]
pub struct InvalidVersion(pub String);

/// The optional suffix of a version.
///
/// Variant order is the sort order: `Pre < Release < Post`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qualifier {
    /// `-suffix`: sorts before the bare version.
    Pre(String),
    /// No suffix.
    Release,
    /// `+suffix`: sorts after the bare version.
    Post(String),
}

/// A parsed registry version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub qualifier: Qualifier,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            qualifier: Qualifier::Release,
        }
    }

    /// Parses a version string.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_registrar::registry::Version;
    ///
    /// let rc: Version = "1.0.0-rc1".parse().unwrap();
    /// let release: Version = "1.0.0".parse().unwrap();
    /// let build: Version = "1.0.0+build1".parse().unwrap();
    /// assert!(rc < release && release < build);
    ///
    /// assert!("v1.0.0".parse::<Version>().is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidVersion> {
        let invalid = || InvalidVersion(s.to_string());
        let caps = VERSION_RE.captures(s).ok_or_else(invalid)?;

        let component = |i: usize| -> Result<u64, InvalidVersion> {
            caps.get(i)
                .ok_or_else(invalid)?
                .as_str()
                .parse()
                .map_err(|_| invalid())
        };

        let qualifier = match (caps.get(4), caps.get(5)) {
            (Some(sign), Some(suffix)) if sign.as_str() == "-" => {
                Qualifier::Pre(suffix.as_str().to_string())
            }
            (Some(_), Some(suffix)) => Qualifier::Post(suffix.as_str().to_string()),
            _ => Qualifier::Release,
        };

        Ok(Version {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            qualifier,
        })
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, &self.qualifier).cmp(&(
            other.major,
            other.minor,
            other.patch,
            &other.qualifier,
        ))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        match &self.qualifier {
            Qualifier::Pre(suffix) => write!(f, "-{}", suffix),
            Qualifier::Release => Ok(()),
            Qualifier::Post(suffix) => write!(f, "+{}", suffix),
        }
    }
}

/// Selects the immediate predecessor of `new` among existing registry versions.
///
/// Returns the name, as written, of the greatest version strictly less than
/// `new`, or `None` when every existing version is greater than or equal to
/// it. Fails if any existing entry is outside the version grammar.
///
/// # Examples
///
/// ```
/// use release_registrar::registry::{Version, select_predecessor};
///
/// let new: Version = "0.2.1".parse().unwrap();
/// let prev = select_predecessor(["0.1.0", "0.2.0", "1.0.0"], &new).unwrap();
/// assert_eq!(prev, Some("0.2.0"));
/// ```
pub fn select_predecessor<'a, I>(existing: I, new: &Version) -> Result<Option<&'a str>, InvalidVersion>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, Version)> = None;
    for candidate in existing {
        let version = Version::parse(candidate)?;
        if version < *new && best.as_ref().is_none_or(|(_, b)| version > *b) {
            best = Some((candidate, version));
        }
    }
    Ok(best.map(|(name, _)| name))
}
