use anyhow::Result;
use log::info;

use crate::{
    build::{Compiler, build_env, next_build_number, resolve_build_number},
    runtime::Runtime,
};

use super::config::Config;
use super::version::show_version;

/// Advance the persisted counter and return the new number.
#[tracing::instrument(skip(config))]
pub fn build_number<R: Runtime>(config: &Config<R>) -> Result<u64> {
    next_build_number(&config.runtime, &config.state_path)
}

/// Number the build, then hand it to the compiler together with the version banner.
///
/// The counter is advanced even if the compiler later fails, so a failed
/// build consumes its number.
#[tracing::instrument(skip(config, compiler))]
pub fn build<R: Runtime, C: Compiler>(
    config: &Config<R>,
    compiler: &C,
    args: &[String],
) -> Result<u64> {
    let version = show_version(config)?;
    let number = resolve_build_number(&config.runtime, &config.state_path)?;

    info!("Building {} (build {})", version, number);
    compiler.compile(&build_env(&version.to_string(), number), args)?;
    Ok(number)
}
