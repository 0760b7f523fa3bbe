//! Process configuration.
//!
//! Built once at startup and passed by reference into the handlers; nothing
//! below `main` reads the environment.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::effects::GitIdentity;
use crate::types::RepoId;

const DEFAULT_REGISTRY_REPO: &str = "JuliaLang/METADATA.jl";
const DEFAULT_REGISTRY_BRANCH: &str = "metadata-v2";
const DEFAULT_PACKAGE_SUFFIX: &str = ".jl";
const DEFAULT_DEPENDENCY_FILE: &str = "REQUIRE";
const DEFAULT_COMMITTER_NAME: &str = "AttoBot";
const DEFAULT_COMMITTER_EMAIL: &str = "AttoBot@users.noreply.github.com";
const DEFAULT_CLEANUP_DELAY_SECS: u64 = 20;
const DEFAULT_CI_API_URL: &str = "https://api.travis-ci.org";
const DEFAULT_CI_WEB_URL: &str = "https://travis-ci.org";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Errors building a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Immutable process configuration.
#[derive(Clone)]
pub struct Config {
    /// Bot login: owner of the registry fork, author of the pull requests.
    pub bot_user: String,

    /// Personal access token for `bot_user`.
    pub bot_token: String,

    /// Shared HMAC secret for webhook signatures.
    pub webhook_secret: String,

    /// Upstream registry repository.
    pub registry: RepoId,

    /// Registry branch pull requests target.
    pub registry_branch: String,

    /// Suffix stripped from repository names to get package names.
    pub package_suffix: String,

    /// Dependency declaration file read from the tagged commit.
    pub dependency_file: String,

    /// Committer on registry commits.
    pub committer: GitIdentity,

    /// Pause before re-checking a closed pull request.
    pub cleanup_delay: Duration,

    /// CI status API base URL.
    pub ci_api_url: String,

    /// CI web UI base URL, for build links.
    pub ci_web_url: String,

    /// GitHub API base URL override (GitHub Enterprise).
    pub github_api_url: Option<String>,

    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from a variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());
        let required = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });
        let or_default = |var: &'static str, default: &str| {
            get(var).unwrap_or_else(|| default.to_string())
        };

        let registry_value = or_default("REGISTRY_REPO", DEFAULT_REGISTRY_REPO);
        let registry = registry_value
            .parse::<RepoId>()
            .map_err(|e| ConfigError::Invalid {
                var: "REGISTRY_REPO",
                value: registry_value.clone(),
                reason: e.to_string(),
            })?;

        let cleanup_delay = match get("CLEANUP_DELAY_SECS") {
            Some(value) => {
                let secs = value.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "CLEANUP_DELAY_SECS",
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_CLEANUP_DELAY_SECS),
        };

        let listen_value = or_default("LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr = listen_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "LISTEN_ADDR",
                value: listen_value.clone(),
                reason: e.to_string(),
            })?;

        Ok(Config {
            bot_user: required("BOT_USER")?,
            bot_token: required("BOT_TOKEN")?,
            webhook_secret: required("WEBHOOK_SECRET")?,
            registry,
            registry_branch: or_default("REGISTRY_BRANCH", DEFAULT_REGISTRY_BRANCH),
            package_suffix: or_default("PACKAGE_SUFFIX", DEFAULT_PACKAGE_SUFFIX),
            dependency_file: or_default("DEPENDENCY_FILE", DEFAULT_DEPENDENCY_FILE),
            committer: GitIdentity::new(
                or_default("COMMITTER_NAME", DEFAULT_COMMITTER_NAME),
                or_default("COMMITTER_EMAIL", DEFAULT_COMMITTER_EMAIL),
            ),
            cleanup_delay,
            ci_api_url: or_default("CI_API_URL", DEFAULT_CI_API_URL),
            ci_web_url: or_default("CI_WEB_URL", DEFAULT_CI_WEB_URL),
            github_api_url: get("GITHUB_API_URL"),
            listen_addr,
        })
    }

    /// The bot's fork of the registry, where branches are pushed.
    pub fn fork(&self) -> RepoId {
        self.registry.fork_for(self.bot_user.as_str())
    }

    /// `head` value for pull requests from the fork, e.g. `attobot:Foo/v1.0.0`.
    pub fn fork_head(&self, branch: &str) -> String {
        format!("{}:{}", self.bot_user, branch)
    }
}

/// Fallback address when a user exposes no email anywhere.
pub fn noreply_email(login: &str) -> String {
    format!("{}@users.noreply.github.com", login)
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_user", &self.bot_user)
            .field("registry", &self.registry)
            .field("registry_branch", &self.registry_branch)
            .field("package_suffix", &self.package_suffix)
            .field("dependency_file", &self.dependency_file)
            .field("committer", &self.committer)
            .field("cleanup_delay", &self.cleanup_delay)
            .field("ci_api_url", &self.ci_api_url)
            .field("ci_web_url", &self.ci_web_url)
            .field("github_api_url", &self.github_api_url)
            .field("listen_addr", &self.listen_addr)
            .finish_non_exhaustive()
    }
}
