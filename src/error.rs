//! Error kinds surfaced by the release pipeline.
//!
//! Each variant carries the offending input, path or URL so the operator can
//! diagnose and re-run without extra logging.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed user input. Nothing has been mutated when this is returned.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Invalid bump kind '{0}'. Expected one of: patch, minor, major")]
    InvalidBumpKind(String),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("No version field found in the primary section of {path:?}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse manifest {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("I/O failure on manifest {path:?}: {reason}")]
    IoFailure { path: PathBuf, reason: String },
}

/// A version-control remote that cannot be turned into coordinates.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot extract owner/repository from remote URL '{0}'")]
    InvalidRemote(String),

    #[error("Failed to read URL of remote '{remote}': {reason}")]
    RemoteUnavailable { remote: String, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to reach {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Release archive not found at {url} (HTTP {status})")]
    NotFound { url: String, status: u16 },

    #[error("Failed to buffer release archive from {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to launch compiler '{program}': {source}")]
    CompilerUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Compiler '{program}' failed with {status}")]
    CompilerFailed { program: String, status: String },
}
