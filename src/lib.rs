pub mod cli;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod operations;
pub mod output;

pub use client::{initialize, PostSource, RedditClient};
pub use config::{AppConfig, Credentials};
pub use error::{RedditError, RedditResult};
pub use models::PostRecord;
pub use operations::posts::PostFetcher;
