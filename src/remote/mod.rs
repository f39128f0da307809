//! Owner/repository coordinates derived from a version-control remote URL.

mod git;

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ParseError;

pub use git::{GitCli, RemoteSource};

#[cfg(test)]
pub use git::MockRemoteSource;

// host[:/]owner/repo[.git], with optional scheme, user and port.
static REMOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<scheme>[A-Za-z][A-Za-z0-9+.-]*)://)?(?:[^@/]+@)?(?P<host>[^/:@]+)(?P<sep>:\d+/|[:/])(?P<owner>[^/:]+)/(?P<repo>[^/]+?)(?:\.git)?/?$",
    )
    .expect("remote URL pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCoordinates {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

impl RemoteCoordinates {
    /// Project page, e.g. `https://github.com/owner/repo`.
    pub fn homepage(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.repo)
    }

    /// Clone URL used as the development-branch reference.
    pub fn clone_url(&self) -> String {
        format!("{}.git", self.homepage())
    }
}

impl fmt::Display for RemoteCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RemoteCoordinates {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Parse SSH (`git@host:owner/repo.git`) or HTTPS (`https://host/owner/repo`) remotes.
pub fn resolve(remote_url: &str) -> Result<RemoteCoordinates, ParseError> {
    let trimmed = remote_url.trim();
    let caps = REMOTE_PATTERN
        .captures(trimmed)
        .ok_or_else(|| ParseError::InvalidRemote(remote_url.to_string()))?;

    // Without a scheme git only treats `host:path` as remote; `a/b/c` is a local path.
    let local_path = caps.name("scheme").is_none() && &caps["sep"] == "/";
    let repo = &caps["repo"];
    if local_path || repo == ".git" || !is_host_name(&caps["host"]) {
        return Err(ParseError::InvalidRemote(remote_url.to_string()));
    }

    Ok(RemoteCoordinates {
        host: caps["host"].to_string(),
        owner: caps["owner"].to_string(),
        repo: repo.to_string(),
    })
}

/// Dot-separated labels of letters, digits and hyphens (also covers IPv4).
fn is_host_name(host: &str) -> bool {
    host.split('.').all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
