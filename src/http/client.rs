//! HTTP client with status classification for downloads.
//!
//! A failed request is reported immediately; there is no retry loop.

use log::debug;
use reqwest::Client;
use std::io::Write;

use crate::error::FetchError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Streams the body of `url` into the writer returned by `create_writer`.
    ///
    /// The writer is only created once the server has answered with a 2xx
    /// status, so a missing resource never leaves an empty file behind.
    #[tracing::instrument(skip(self, create_writer))]
    pub async fn download_file<W, F>(&self, url: &str, create_writer: F) -> Result<u64, FetchError>
    where
        W: Write,
        F: FnOnce() -> std::io::Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let mut response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| FetchError::Unreachable {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NotFound {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let io_err = |source| FetchError::Io {
            url: url.to_string(),
            source,
        };

        let mut writer = create_writer().map_err(io_err)?;
        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|source| FetchError::Unreachable {
                url: url.to_string(),
                source,
            })?
        {
            writer.write_all(&chunk).map_err(io_err)?;
            downloaded_bytes += chunk.len() as u64;
        }
        writer.flush().map_err(io_err)?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}
