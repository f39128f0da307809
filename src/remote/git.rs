use log::debug;
use std::path::PathBuf;
use std::process::Command;

use crate::error::ParseError;

/// Source of the configured remote URL.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteSource: Send + Sync {
    fn remote_url(&self, remote: &str) -> Result<String, ParseError>;
}

/// Asks the `git` executable for `remote.<name>.url`.
pub struct GitCli {
    workdir: Option<PathBuf>,
}

impl GitCli {
    pub fn new(workdir: Option<PathBuf>) -> Self {
        Self { workdir }
    }
}

impl RemoteSource for GitCli {
    #[tracing::instrument(skip(self))]
    fn remote_url(&self, remote: &str) -> Result<String, ParseError> {
        let mut cmd = Command::new("git");
        cmd.args(["remote", "get-url", remote]);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| ParseError::RemoteUnavailable {
            remote: remote.to_string(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(ParseError::RemoteUnavailable {
                remote: remote.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Remote '{}' is {}", remote, url);
        Ok(url)
    }
}
