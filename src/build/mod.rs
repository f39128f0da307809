//! Build numbering and the hand-off to the compiler.

mod compiler;
mod counter;

pub use compiler::{Cargo, Compiler};
pub use counter::{
    BUILD_NUMBER_ENV, DEFAULT_STATE_PATH, next_build_number, resolve_build_number,
};

#[cfg(test)]
pub use compiler::MockCompiler;

/// Environment variable carrying the `<semver> (build N)` banner.
pub const VERSION_BANNER_ENV: &str = "PKG_VERSION_WITH_BUILD";

/// Version banner shown by the built artifact's `--version`.
pub fn version_banner(version: &str, build_number: u64) -> String {
    format!("{} (build {})", version, build_number)
}

/// Variables exported into the compiler environment for one build.
pub fn build_env(version: &str, build_number: u64) -> Vec<(String, String)> {
    vec![
        (BUILD_NUMBER_ENV.to_string(), build_number.to_string()),
        (
            VERSION_BANNER_ENV.to_string(),
            version_banner(version, build_number),
        ),
    ]
}
