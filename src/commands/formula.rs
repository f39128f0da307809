use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::{
    fetch::{ArchiveFetcher, TagArchiveFetcher},
    formula::{self, DEFAULT_BRANCH, DEFAULT_TEMPLATE, ReleaseDescriptor},
    manifest,
    remote::{self, GitCli, RemoteCoordinates, RemoteSource},
    runtime::Runtime,
    version::parse_version,
};

use super::config::{Config, http_client};

pub const DEFAULT_REMOTE: &str = "origin";

/// Inputs of one formula generation.
#[derive(Debug, Clone)]
pub struct FormulaOptions {
    pub version: String,
    pub remote: String,
    /// Skip asking git and use this remote URL directly.
    pub remote_url: Option<String>,
    /// Archive host, defaults to `https://<remote host>`.
    pub archive_host: Option<String>,
    pub formula_dir: PathBuf,
    pub template: Option<PathBuf>,
}

/// Resolve coordinates, download the tagged archive and write `<dir>/<repo>.rb`.
#[tracing::instrument(skip(config, options))]
pub async fn formula<R: Runtime>(config: &Config<R>, options: &FormulaOptions) -> Result<PathBuf> {
    let git = GitCli::new(None);
    let coords = resolve_coordinates(&git, options)?;

    let archive_host = options
        .archive_host
        .clone()
        .unwrap_or_else(|| format!("https://{}", coords.host));
    let fetcher = TagArchiveFetcher::new(http_client(&config.runtime)?, Some(archive_host));

    render_release(config, &coords, &fetcher, options).await
}

/// Remote URL from the options or from git, parsed into coordinates.
pub fn resolve_coordinates<S: RemoteSource>(
    source: &S,
    options: &FormulaOptions,
) -> Result<RemoteCoordinates> {
    let url = match &options.remote_url {
        Some(url) => url.clone(),
        None => source.remote_url(&options.remote)?,
    };
    let coords = remote::resolve(&url)?;
    debug!("Resolved {} to {}", url, coords);
    Ok(coords)
}

/// Fetch, checksum, render and write. The version is validated before any request.
#[tracing::instrument(skip(config, fetcher, options))]
pub async fn render_release<R: Runtime, F: ArchiveFetcher>(
    config: &Config<R>,
    coords: &RemoteCoordinates,
    fetcher: &F,
    options: &FormulaOptions,
) -> Result<PathBuf> {
    let version = parse_version(&options.version)?;

    let template = match &options.template {
        Some(path) => config
            .runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read formula template {:?}", path))?,
        None => DEFAULT_TEMPLATE.to_string(),
    };

    let archive = fetcher
        .fetch(&coords.owner, &coords.repo, &version.to_string())
        .await?;

    let (binary, description) = package_metadata(config, &coords.repo)?;
    let descriptor = ReleaseDescriptor {
        identifier_name: formula::identifier_name(&coords.repo),
        owner: coords.owner.clone(),
        repo: coords.repo.clone(),
        homepage: coords.homepage(),
        head_url: coords.clone_url(),
        branch: DEFAULT_BRANCH.to_string(),
        archive_url: archive.url,
        sha256: archive.sha256,
        version,
        description,
        binary,
    };

    let document = formula::render(&descriptor, &template);
    let path = formula::write_formula(
        &config.runtime,
        &options.formula_dir,
        &coords.repo,
        &document,
    )?;

    info!("Generated formula {} for {}", descriptor.identifier_name, coords);
    Ok(path)
}

/// Binary name and description from the manifest, falling back to the repository name.
fn package_metadata<R: Runtime>(config: &Config<R>, repo: &str) -> Result<(String, String)> {
    let manifest_path: &Path = &config.manifest_path;
    if !config.runtime.exists(manifest_path) {
        debug!("No manifest at {:?}, using repository name", manifest_path);
        return Ok((repo.to_string(), format!("{} release", repo)));
    }

    let name = manifest::read_field(&config.runtime, manifest_path, "name")?
        .unwrap_or_else(|| repo.to_string());
    let description = manifest::read_field(&config.runtime, manifest_path, "description")?
        .unwrap_or_else(|| format!("{} release", name));
    Ok((name, description))
}
