use thiserror::Error;

/// Errors raised while loading credentials or talking to the Reddit API.
#[derive(Debug, Error)]
pub enum RedditError {
    /// The `.env` file or a required credential is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The HTTP client could not be built or Reddit rejected the credentials.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// The requested subreddit does not exist.
    #[error("subreddit r/{0} not found")]
    NotFound(String),

    /// Rate limiting, error statuses, transport failures and malformed bodies.
    #[error("Reddit API error: {0}")]
    RemoteApi(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type RedditResult<T> = Result<T, RedditError>;

impl RedditError {
    /// True for failures reported by (or on the way to) the Reddit API.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            RedditError::Authentication(_) | RedditError::NotFound(_) | RedditError::RemoteApi(_)
        )
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return RedditError::Unexpected(err.to_string());
        }
        RedditError::RemoteApi(err.to_string())
    }
}

impl From<reqwest::Error> for RedditError {
    fn from(err: reqwest::Error) -> Self {
        RedditError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for RedditError {
    fn from(err: serde_json::Error) -> Self {
        RedditError::RemoteApi(format!("malformed response: {}", err))
    }
}

impl From<url::ParseError> for RedditError {
    fn from(err: url::ParseError) -> Self {
        RedditError::Unexpected(format!("invalid URL: {}", err))
    }
}
