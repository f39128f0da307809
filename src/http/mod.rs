//! HTTP client used for release archive downloads.

mod client;

pub use client::HttpClient;
