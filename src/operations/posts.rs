use crate::client::PostSource;
use crate::diagnostics::Diagnostics;
use crate::error::{RedditError, RedditResult};
use crate::models::PostRecord;

/// Subreddit fetched when none is given on the command line.
pub const DEFAULT_SUBREDDIT: &str = "Python";

/// Number of posts fetched when no limit is given.
pub const DEFAULT_LIMIT: u32 = 5;

/// Fetches the newest posts of a subreddit through a [`PostSource`]
pub struct PostFetcher<S, D> {
    source: S,
    diagnostics: D,
}

impl<S, D> PostFetcher<S, D>
where
    S: PostSource,
    D: Diagnostics,
{
    pub fn new(source: S, diagnostics: D) -> Self {
        Self {
            source,
            diagnostics,
        }
    }

    /// Fetch up to `limit` of the newest posts in `subreddit`, in the order Reddit delivers them.
    ///
    /// One bounded listing is requested from the source. Any failure is logged and returned as is;
    /// no partial results are kept.
    pub async fn fetch_latest(
        &mut self,
        subreddit: &str,
        limit: u32,
    ) -> RedditResult<Vec<PostRecord>> {
        let subreddit = normalize_subreddit(subreddit);

        match self.fetch_checked(subreddit, limit).await {
            Ok(posts) => {
                self.diagnostics.info(&format!(
                    "Successfully fetched {} posts from r/{}",
                    posts.len(),
                    subreddit
                ));
                Ok(posts)
            }
            Err(err) => {
                let kind = if err.is_remote() {
                    "Reddit API error"
                } else {
                    "Unexpected error"
                };
                self.diagnostics.error(&format!(
                    "{} while fetching new posts from r/{}: {}",
                    kind, subreddit, err
                ));
                Err(err)
            }
        }
    }

    async fn fetch_checked(&mut self, subreddit: &str, limit: u32) -> RedditResult<Vec<PostRecord>> {
        if subreddit.is_empty() {
            return Err(RedditError::Unexpected(
                "subreddit name must not be empty".to_string(),
            ));
        }
        if limit == 0 {
            return Err(RedditError::Unexpected(
                "limit must be a positive number".to_string(),
            ));
        }

        let posts = self.source.list_newest_posts(subreddit, limit).await?;

        Ok(posts
            .into_iter()
            .take(limit as usize)
            .map(PostRecord::from)
            .collect())
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Strip surrounding whitespace and an optional `r/` prefix.
pub fn normalize_subreddit(subreddit: &str) -> &str {
    let trimmed = subreddit.trim();
    trimmed
        .strip_prefix("r/")
        .or_else(|| trimmed.strip_prefix("/r/"))
        .unwrap_or(trimmed)
}
