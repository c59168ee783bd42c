//! CLI command implementations

pub mod cache;
pub mod config;
pub mod fetch;
pub mod plan;
pub mod repo;
pub mod resolve;

pub use cache::execute as cache;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use plan::execute as plan;
pub use repo::execute as repo;
pub use resolve::execute as resolve;
