//! Skeg - concurrent chart fetch cache
//!
//! Resolves chart references against configured repositories, downloads
//! each chart version at most once no matter how many callers ask for it,
//! and keeps verified archives on disk for release tooling to consume.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod getter;
pub mod release;
pub mod repo;

pub use client::PackageClient;
pub use error::{SkegError, SkegResult};
