//! The external compiler the build number is handed to.

use log::info;
use std::process::Command;

use crate::error::BuildError;

#[cfg_attr(test, mockall::automock)]
pub trait Compiler: Send + Sync {
    /// Run a build with `env` added to the compiler's environment.
    fn compile(&self, env: &[(String, String)], args: &[String]) -> Result<(), BuildError>;
}

/// Runs `cargo build` in the current directory.
pub struct Cargo {
    program: String,
}

impl Cargo {
    pub fn new() -> Self {
        Self {
            program: "cargo".to_string(),
        }
    }

    /// Use a different executable, e.g. a `cross` wrapper.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Cargo {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler for Cargo {
    #[tracing::instrument(skip(self, env))]
    fn compile(&self, env: &[(String, String)], args: &[String]) -> Result<(), BuildError> {
        info!("Running {} build {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .arg("build")
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .map_err(|source| BuildError::CompilerUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(BuildError::CompilerFailed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
