//! Reads and rewrites the package version inside a TOML manifest.
//!
//! Only the `version = "<value>"` field of the primary section (the first
//! top-level table with a section header, `[package]` in a Cargo manifest) is
//! ever touched. Edits go through `toml_edit` so comments, ordering and
//! whitespace of everything else survive byte-for-byte, and look-alike fields
//! in other tables (`[dependencies.foo] version = "1.2.3"`) are never matched.

use log::{debug, info};
use semver::Version;
use std::path::Path;
use toml_edit::{DocumentMut, Formatted, Item, Table, Value};

use crate::error::ManifestError;
use crate::runtime::Runtime;

const VERSION_KEY: &str = "version";

/// Read the raw primary-section version string.
#[tracing::instrument(skip(runtime))]
pub fn read_version<R: Runtime>(runtime: &R, path: &Path) -> Result<String, ManifestError> {
    read_field(runtime, path, VERSION_KEY)?.ok_or_else(|| ManifestError::NotFound {
        path: path.to_path_buf(),
    })
}

/// Read a string field from the primary section, `None` if it is absent or not a string.
#[tracing::instrument(skip(runtime))]
pub fn read_field<R: Runtime>(
    runtime: &R,
    path: &Path,
    field: &str,
) -> Result<Option<String>, ManifestError> {
    let doc = load(runtime, path)?;
    let value = primary_section(&doc)
        .and_then(|(_, table)| table.get(field))
        .and_then(Item::as_str)
        .map(str::to_string);
    Ok(value)
}

/// Set the primary-section version and atomically replace the manifest.
///
/// Returns `Ok(false)` without touching the file when the field already
/// holds `version`, so repeated calls leave the manifest byte-identical.
#[tracing::instrument(skip(runtime))]
pub fn set_version<R: Runtime>(
    runtime: &R,
    path: &Path,
    version: &Version,
) -> Result<bool, ManifestError> {
    let source = runtime
        .read_to_string(path)
        .map_err(|e| ManifestError::IoFailure {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;

    let Some(updated) = replace_version(path, &source, &version.to_string())? else {
        debug!("{:?} already at version {}", path, version);
        return Ok(false);
    };

    runtime
        .write_atomic(path, updated.as_bytes())
        .map_err(|e| ManifestError::IoFailure {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;

    info!("Set version in {:?} to {}", path, version);
    Ok(true)
}

/// Rewrite the primary-section version in `source`.
///
/// Returns `Ok(None)` when the field already holds `new_version`. `path` is
/// only used for error context.
pub fn replace_version(
    path: &Path,
    source: &str,
    new_version: &str,
) -> Result<Option<String>, ManifestError> {
    let mut doc = parse(path, source)?;
    let not_found = || ManifestError::NotFound {
        path: path.to_path_buf(),
    };

    let section = primary_section(&doc)
        .map(|(name, _)| name.to_string())
        .ok_or_else(not_found)?;

    let field = doc
        .get_mut(&section)
        .and_then(Item::as_table_mut)
        .and_then(|table| table.get_mut(VERSION_KEY))
        .ok_or_else(not_found)?;

    let Item::Value(Value::String(current)) = field else {
        // e.g. `version.workspace = true`: not a literal version field.
        return Err(not_found());
    };

    if current.value() == new_version {
        return Ok(None);
    }

    let decor = current.decor().clone();
    let mut replacement = Formatted::new(new_version.to_string());
    *replacement.decor_mut() = decor;
    *current = replacement;

    Ok(Some(doc.to_string()))
}

fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<DocumentMut, ManifestError> {
    let source = runtime
        .read_to_string(path)
        .map_err(|e| ManifestError::IoFailure {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;
    parse(path, &source)
}

fn parse(path: &Path, source: &str) -> Result<DocumentMut, ManifestError> {
    source
        .parse::<DocumentMut>()
        .map_err(|e| ManifestError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// The first top-level table introduced by its own `[header]`, in document order.
fn primary_section(doc: &DocumentMut) -> Option<(&str, &Table)> {
    doc.as_table()
        .iter()
        .filter_map(|(name, item)| item.as_table().map(|table| (name, table)))
        .filter(|(_, table)| !table.is_implicit() && !table.is_dotted())
        .filter(|(_, table)| table.position().is_some())
        .min_by_key(|(_, table)| table.position())
}
