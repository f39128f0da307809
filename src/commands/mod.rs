//! Command orchestration: each function backs one CLI subcommand.

mod build;
pub mod config;
mod formula;
mod version;

pub use build::{build, build_number};
pub use config::Config;
pub use formula::{
    DEFAULT_REMOTE, FormulaOptions, formula, render_release, resolve_coordinates,
};
pub use version::{VersionChange, bump_version, set_version, show_version};
