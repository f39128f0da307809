//! Homebrew formula rendering.
//!
//! Rendering is plain placeholder substitution over a template; it performs
//! no I/O. [`write_formula`] then stores the result at `<dir>/<repo>.rb`,
//! overwriting any earlier output for the same repository.

use anyhow::{Context, Result};
use log::info;
use regex::{Captures, Regex};
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::runtime::Runtime;

pub const DEFAULT_FORMULA_DIR: &str = "Formula";

pub const DEFAULT_BRANCH: &str = "main";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z0-9_]+)\}\}").expect("placeholder pattern is valid"));

pub const DEFAULT_TEMPLATE: &str = r##"class {{class}} < Formula
  desc "{{desc}}"
  homepage "{{homepage}}"
  url "{{url}}"
  sha256 "{{sha256}}"
  head "{{head}}", branch: "{{branch}}"

  depends_on "rust" => :build

  def install
    system "cargo", "install", *std_cargo_args
  end

  test do
    assert_match "{{bin}}", shell_output("#{bin}/{{bin}} --version")
  end
end
"##;

/// Everything one rendering pass substitutes into the template.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseDescriptor {
    pub version: Version,
    pub owner: String,
    pub repo: String,
    pub identifier_name: String,
    pub description: String,
    pub homepage: String,
    pub archive_url: String,
    pub sha256: String,
    pub head_url: String,
    pub branch: String,
    pub binary: String,
}

/// Ruby class name for a repository: `find-links` becomes `FindLinks`.
///
/// The name is split on runs of non-alphanumeric characters and each segment
/// gets an upper-case first letter; the rest of the segment is kept as is.
pub fn identifier_name(repo: &str) -> String {
    repo.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Substitute `descriptor` into `template`. Unknown placeholders stay verbatim.
///
/// Substitution is a single pass over the template, so placeholder syntax
/// inside a substituted value is emitted literally.
pub fn render(descriptor: &ReleaseDescriptor, template: &str) -> String {
    let version = descriptor.version.to_string();
    let desc = ruby_escape(&descriptor.description);

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let value = match &caps[1] {
                "class" => descriptor.identifier_name.as_str(),
                "desc" => desc.as_str(),
                "homepage" => descriptor.homepage.as_str(),
                "url" => descriptor.archive_url.as_str(),
                "sha256" => descriptor.sha256.as_str(),
                "head" => descriptor.head_url.as_str(),
                "branch" => descriptor.branch.as_str(),
                "bin" => descriptor.binary.as_str(),
                "owner" => descriptor.owner.as_str(),
                "repo" => descriptor.repo.as_str(),
                "version" => version.as_str(),
                _ => return caps[0].to_string(),
            };
            value.to_string()
        })
        .into_owned()
}

/// Output location for a repository's formula.
pub fn output_path(formula_dir: &Path, repo: &str) -> PathBuf {
    formula_dir.join(format!("{}.rb", repo))
}

/// Write the rendered formula, replacing any previous one.
#[tracing::instrument(skip(runtime, document))]
pub fn write_formula<R: Runtime>(
    runtime: &R,
    formula_dir: &Path,
    repo: &str,
    document: &str,
) -> Result<PathBuf> {
    if !runtime.exists(formula_dir) {
        runtime
            .create_dir_all(formula_dir)
            .with_context(|| format!("Failed to create formula directory {:?}", formula_dir))?;
    }

    let path = output_path(formula_dir, repo);
    runtime
        .write_atomic(&path, document.as_bytes())
        .with_context(|| format!("Failed to write formula {:?}", path))?;

    info!("Wrote {:?}", path);
    Ok(path)
}

// Backslash first; `#` blocks `#{}`, `#@` and `#$` interpolation.
fn ruby_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('#', "\\#")
}
