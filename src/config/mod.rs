//! Configuration module for loading Reddit credentials from a .env file and the environment

use crate::error::{RedditError, RedditResult};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// User agent sent when `REDDIT_USER_AGENT` is not provided.
pub const DEFAULT_USER_AGENT: &str = "rednew/1.0 Latest Posts Fetcher";

pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";

/// Credentials of a Reddit script app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

/// Application configuration derived from the .env file and environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
}

impl AppConfig {
    /// Load configuration from `env_file`, letting process environment variables override it.
    pub fn load(env_file: &Path) -> RedditResult<Self> {
        Self::load_with(env_file, |key| env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] but with an explicit lookup standing in for the process environment.
    pub fn load_with<F>(env_file: &Path, process_env: F) -> RedditResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !env_file.exists() {
            return Err(RedditError::Configuration(format!(
                "'{}' file not found. Please create one from '.env.example' template",
                env_file.display()
            )));
        }

        let file_vars = read_env_file(env_file)?;
        Self::from_lookup(|key| process_env(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> RedditResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id = non_blank(CLIENT_ID_VAR)
            .ok_or_else(|| RedditError::Configuration(format!("{} must be set", CLIENT_ID_VAR)))?;
        let client_secret = non_blank(CLIENT_SECRET_VAR).ok_or_else(|| {
            RedditError::Configuration(format!("{} must be set", CLIENT_SECRET_VAR))
        })?;

        // User agent - use the variable if available, otherwise use default
        let user_agent =
            non_blank(USER_AGENT_VAR).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            credentials: Credentials {
                client_id,
                client_secret,
                user_agent,
            },
        })
    }
}

fn read_env_file(path: &Path) -> RedditResult<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        RedditError::Configuration(format!("failed to read {}: {}", path.display(), e))
    })?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| {
            RedditError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })?;
        vars.insert(key, value);
    }
    Ok(vars)
}
