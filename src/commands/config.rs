use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;

use crate::{build::DEFAULT_STATE_PATH, http::HttpClient, runtime::Runtime};

pub const DEFAULT_MANIFEST_PATH: &str = "Cargo.toml";

/// Paths every command resolves against, plus the runtime they go through.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub manifest_path: PathBuf,
    pub state_path: PathBuf,
}

impl<R: Runtime> Config<R> {
    pub fn new(runtime: R, manifest_path: Option<PathBuf>, state_path: Option<PathBuf>) -> Self {
        let manifest_path = manifest_path.unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH));
        let state_path = state_path.unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));
        debug!(
            "Using manifest {:?}, build state {:?}",
            manifest_path, state_path
        );
        Self {
            runtime,
            manifest_path,
            state_path,
        }
    }
}

/// HTTP client for archive downloads, authenticated when `GITHUB_TOKEN` is set.
pub fn http_client<R: Runtime>(runtime: &R) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    if let Ok(token) = runtime.env_var("GITHUB_TOKEN") {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using GITHUB_TOKEN for authentication");
    }

    let client = Client::builder()
        .user_agent("relkit-cli")
        .default_headers(headers)
        .build()?;

    Ok(HttpClient::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockito::{Matcher, Server};

    /// Helper function to verify Authorization header behavior
    /// - `token`: Some(token) to test with GITHUB_TOKEN set, None to test without
    async fn verify_authorization_header(token: Option<&str>) {
        let mut runtime = MockRuntime::new();
        let token_clone = token.map(|t| t.to_string());

        runtime
            .expect_env_var()
            .with(mockall::predicate::eq("GITHUB_TOKEN"))
            .returning(move |_| token_clone.clone().ok_or(std::env::VarError::NotPresent));

        let mut server = Server::new_async().await;

        let expected_header = match token {
            Some(t) => Matcher::Exact(format!("Bearer {}", t)),
            None => Matcher::Missing,
        };

        let mock = server
            .mock("GET", "/")
            .match_header("Authorization", expected_header)
            .match_header("User-Agent", "relkit-cli")
            .create_async()
            .await;

        let client = http_client(&runtime).unwrap();
        let _ = client
            .download_file(&server.url(), || Ok(std::io::sink()))
            .await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_client_with_github_token() {
        verify_authorization_header(Some("test_token")).await;
    }

    #[tokio::test]
    async fn test_http_client_without_github_token() {
        verify_authorization_header(None).await;
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::new(MockRuntime::new(), None, None);
        assert_eq!(config.manifest_path, PathBuf::from("Cargo.toml"));
        assert_eq!(config.state_path, PathBuf::from("build/build-number"));
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::new(
            MockRuntime::new(),
            Some(PathBuf::from("pkg/Cargo.toml")),
            Some(PathBuf::from("/tmp/counter")),
        );
        assert_eq!(config.manifest_path, PathBuf::from("pkg/Cargo.toml"));
        assert_eq!(config.state_path, PathBuf::from("/tmp/counter"));
    }
}
