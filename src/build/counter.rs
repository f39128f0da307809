//! Persisted build counter.
//!
//! The state file holds a single decimal integer. Each call to
//! [`next_build_number`] reads it, adds one and writes it back before
//! returning. Missing, empty or unparsable state counts as `0`, so a
//! corrupted file heals itself on the next build.
//!
//! Read-increment-write is not locked: two builds racing on the same state
//! file may hand out the same number. Serialize builds externally, or set
//! `BUILD_NUMBER` (e.g. to a CI run id) to bypass the counter entirely.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::Path;

use crate::runtime::Runtime;

/// Environment variable holding an externally-assigned build number.
pub const BUILD_NUMBER_ENV: &str = "BUILD_NUMBER";

/// Default counter location, relative to the package root.
pub const DEFAULT_STATE_PATH: &str = "build/build-number";

/// Increment and persist the counter at `state_path`, returning the new value.
#[tracing::instrument(skip(runtime))]
pub fn next_build_number<R: Runtime>(runtime: &R, state_path: &Path) -> Result<u64> {
    let current = read_counter(runtime, state_path)?;
    let next = current.saturating_add(1);

    if let Some(parent) = state_path.parent()
        && !parent.as_os_str().is_empty()
        && !runtime.exists(parent)
    {
        runtime
            .create_dir_all(parent)
            .with_context(|| format!("Failed to create build state directory {:?}", parent))?;
    }

    runtime
        .write(state_path, format!("{}\n", next).as_bytes())
        .with_context(|| format!("Failed to persist build number to {:?}", state_path))?;

    debug!("Build number {} -> {} ({:?})", current, next, state_path);
    Ok(next)
}

/// Use `BUILD_NUMBER` when it holds an integer, otherwise advance the counter.
#[tracing::instrument(skip(runtime))]
pub fn resolve_build_number<R: Runtime>(runtime: &R, state_path: &Path) -> Result<u64> {
    if let Ok(raw) = runtime.env_var(BUILD_NUMBER_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(n) => {
                debug!("Using {}={} from the environment", BUILD_NUMBER_ENV, n);
                return Ok(n);
            }
            Err(_) => warn!(
                "Ignoring non-numeric {}='{}', using persisted counter",
                BUILD_NUMBER_ENV, raw
            ),
        }
    }
    next_build_number(runtime, state_path)
}

fn read_counter<R: Runtime>(runtime: &R, state_path: &Path) -> Result<u64> {
    if !runtime.exists(state_path) {
        return Ok(0);
    }
    let bytes = runtime
        .read(state_path)
        .with_context(|| format!("Failed to read build state {:?}", state_path))?;

    // Undecodable bytes are corruption like any other and restart the count.
    let content = String::from_utf8_lossy(&bytes);
    match content.trim().parse::<u64>() {
        Ok(n) => Ok(n),
        Err(_) => {
            if !content.trim().is_empty() {
                warn!(
                    "Build state {:?} is not an integer ({:?}), restarting from 0",
                    state_path,
                    content.trim()
                );
            }
            Ok(0)
        }
    }
}
