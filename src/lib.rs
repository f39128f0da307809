pub mod build;
pub mod commands;
pub mod error;
pub mod fetch;
pub mod formula;
pub mod http;
pub mod manifest;
pub mod remote;
pub mod runtime;
pub mod version;
