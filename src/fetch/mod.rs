//! Tagged release archive download and checksum.

use async_trait::async_trait;
use log::info;
use sha2::{Digest, Sha256};
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::error::FetchError;
use crate::http::HttpClient;

pub const DEFAULT_ARCHIVE_HOST: &str = "https://github.com";

/// A downloaded archive and its SHA-256 digest (lowercase hex, 64 chars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArchive {
    pub url: String,
    pub bytes: Vec<u8>,
    pub sha256: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Canonical URL of the `v<version>` tag archive.
    fn archive_url(&self, owner: &str, repo: &str, version: &str) -> String;

    async fn fetch(&self, owner: &str, repo: &str, version: &str)
    -> Result<FetchedArchive, FetchError>;
}

/// Downloads `<host>/<owner>/<repo>/archive/refs/tags/v<version>.tar.gz`.
pub struct TagArchiveFetcher {
    http: HttpClient,
    base_url: String,
    temp_dir: Option<PathBuf>,
}

impl TagArchiveFetcher {
    pub fn new(http: HttpClient, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_ARCHIVE_HOST.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            http,
            base_url,
            temp_dir: None,
        }
    }

    /// Put the scratch download in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    fn scratch_file(&self, url: &str) -> Result<tempfile::NamedTempFile, FetchError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("relkit-archive-").suffix(".tar.gz");
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        file.map_err(|source| FetchError::Io {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ArchiveFetcher for TagArchiveFetcher {
    fn archive_url(&self, owner: &str, repo: &str, version: &str) -> String {
        let version = version.strip_prefix('v').unwrap_or(version);
        format!(
            "{}/{}/{}/archive/refs/tags/v{}.tar.gz",
            self.base_url, owner, repo, version
        )
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        version: &str,
    ) -> Result<FetchedArchive, FetchError> {
        let url = self.archive_url(owner, repo, version);
        info!("Fetching {}", url);

        // Removed when dropped, whichever way this function returns.
        let mut scratch = self.scratch_file(&url)?;

        self.http
            .download_file(&url, || Ok(scratch.as_file_mut()))
            .await?;

        let io_err = |source| FetchError::Io {
            url: url.clone(),
            source,
        };
        let file = scratch.as_file_mut();
        file.seek(SeekFrom::Start(0)).map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;

        let sha256 = sha256_hex(&bytes);
        info!("Downloaded {} bytes, sha256 {}", bytes.len(), sha256);

        Ok(FetchedArchive { url, bytes, sha256 })
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
