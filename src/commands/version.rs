use anyhow::{Context, Result};
use log::info;
use semver::Version;

use crate::{
    manifest,
    runtime::Runtime,
    version::{BumpKind, bump, parse_version},
};

use super::config::Config;

/// Outcome of a version change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub previous: Version,
    pub current: Version,
}

/// Current version recorded in the manifest.
#[tracing::instrument(skip(config))]
pub fn show_version<R: Runtime>(config: &Config<R>) -> Result<Version> {
    let raw = manifest::read_version(&config.runtime, &config.manifest_path)?;
    let version = parse_version(&raw)
        .with_context(|| format!("Manifest {:?} holds an invalid version", config.manifest_path))?;
    Ok(version)
}

/// Write an exact version. The input is validated before the manifest is read.
#[tracing::instrument(skip(config))]
pub fn set_version<R: Runtime>(config: &Config<R>, input: &str) -> Result<Version> {
    let version = parse_version(input)?;
    manifest::set_version(&config.runtime, &config.manifest_path, &version)?;
    Ok(version)
}

#[tracing::instrument(skip(config))]
pub fn bump_version<R: Runtime>(config: &Config<R>, kind: BumpKind) -> Result<VersionChange> {
    let previous = show_version(config)?;
    let current = bump(&previous, kind);
    manifest::set_version(&config.runtime, &config.manifest_path, &current)?;

    info!("Bumped {} version {} -> {}", kind, previous, current);
    Ok(VersionChange { previous, current })
}
