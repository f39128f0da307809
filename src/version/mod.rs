//! Semantic version parsing and bumping.
//!
//! Versions are `semver::Version` values: `MAJOR.MINOR.PATCH` with optional
//! `-PRERELEASE` and `+BUILD` suffixes. A leading `v` is tolerated on input
//! since release tags are written as `v1.2.3`.

use semver::Version;
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// Which component of the version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Patch => write!(f, "patch"),
            BumpKind::Minor => write!(f, "minor"),
            BumpKind::Major => write!(f, "major"),
        }
    }
}

impl FromStr for BumpKind {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patch" => Ok(BumpKind::Patch),
            "minor" => Ok(BumpKind::Minor),
            "major" => Ok(BumpKind::Major),
            other => Err(InputError::InvalidBumpKind(other.to_string())),
        }
    }
}

/// Parse a version string, accepting an optional leading `v`.
pub fn parse_version(input: &str) -> Result<Version, InputError> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).map_err(|e| InputError::InvalidVersion {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Compute the next release version.
///
/// Prerelease and build metadata are always dropped, so the result is a plain
/// release version. Components saturate at `u64::MAX`.
pub fn bump(current: &Version, kind: BumpKind) -> Version {
    match kind {
        BumpKind::Patch => Version::new(
            current.major,
            current.minor,
            current.patch.saturating_add(1),
        ),
        BumpKind::Minor => Version::new(current.major, current.minor.saturating_add(1), 0),
        BumpKind::Major => Version::new(current.major.saturating_add(1), 0, 0),
    }
}

/// Parse `current` and bump it in one step.
pub fn bump_str(current: &str, kind: BumpKind) -> Result<Version, InputError> {
    let version = parse_version(current)?;
    Ok(bump(&version, kind))
}

/// Release tag for a version, e.g. `v1.2.3`.
pub fn tag_for(version: &Version) -> String {
    format!("v{}", version)
}
