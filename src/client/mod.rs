use crate::config::Credentials;
use crate::diagnostics::Diagnostics;
use crate::error::{RedditError, RedditResult};
use crate::models::{AccessTokenResponse, ListingResponse, RemotePost};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, LOCATION};
use reqwest::{redirect, Client, StatusCode};
use std::time::Duration;
use url::Url;

pub const AUTH_BASE_URL: &str = "https://www.reddit.com";
pub const API_BASE_URL: &str = "https://oauth.reddit.com";

/// Largest page Reddit serves for a single listing request.
pub const MAX_PAGE_SIZE: u32 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Anything that can list the newest posts of a subreddit.
#[async_trait]
pub trait PostSource {
    /// Return at most `limit` posts of `subreddit`, newest first.
    ///
    /// Fewer posts come back only when the subreddit has no more to give.
    async fn list_newest_posts(
        &mut self,
        subreddit: &str,
        limit: u32,
    ) -> RedditResult<Vec<RemotePost>>;
}

/// Application-only OAuth token held in memory
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: i64,
}

impl AccessToken {
    pub fn new(value: String, expires_in: i64) -> Self {
        Self {
            value,
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(chrono::Utc::now().timestamp())
    }

    fn is_valid_at(&self, now: i64) -> bool {
        // Keep a margin so the token doesn't expire mid-request
        now + TOKEN_EXPIRY_MARGIN_SECS < self.expires_at
    }
}

/// Authenticated handle to the Reddit API.
///
/// Construction never touches the network. The first listing request obtains an
/// application-only token with the client credentials grant and caches it.
#[derive(Clone)]
pub struct RedditClient {
    client: Client,
    credentials: Credentials,
    auth_base: Url,
    api_base: Url,
    access_token: Option<AccessToken>,
}

/// Build a [`RedditClient`] from credentials, logging the outcome to `diagnostics`.
pub fn initialize<D>(credentials: Credentials, diagnostics: &D) -> RedditResult<RedditClient>
where
    D: Diagnostics + ?Sized,
{
    match RedditClient::new(credentials) {
        Ok(client) => {
            diagnostics.info("Successfully initialized Reddit client");
            Ok(client)
        }
        Err(err) => {
            diagnostics.error(&format!("Failed to initialize Reddit client: {}", err));
            Err(err)
        }
    }
}

impl RedditClient {
    pub fn new(credentials: Credentials) -> RedditResult<Self> {
        if credentials.client_id.trim().is_empty() {
            return Err(RedditError::Configuration(
                "client id must not be empty".to_string(),
            ));
        }
        if credentials.client_secret.trim().is_empty() {
            return Err(RedditError::Configuration(
                "client secret must not be empty".to_string(),
            ));
        }

        debug!(
            "Creating RedditClient with user_agent: {}",
            credentials.user_agent
        );

        Ok(Self {
            client: Self::get_client(&credentials.user_agent)?,
            credentials,
            auth_base: Url::parse(AUTH_BASE_URL)?,
            api_base: Url::parse(API_BASE_URL)?,
            access_token: None,
        })
    }

    /// Point the client at other hosts, e.g. a local mock server.
    pub fn with_endpoints(mut self, auth_base: &str, api_base: &str) -> RedditResult<Self> {
        self.auth_base = Url::parse(auth_base)?;
        self.api_base = Url::parse(api_base)?;
        Ok(self)
    }

    pub fn has_valid_token(&self) -> bool {
        self.access_token
            .as_ref()
            .map(AccessToken::is_valid)
            .unwrap_or(false)
    }

    fn get_client(user_agent: &str) -> RedditResult<Client> {
        // Reddit answers unknown subreddits with a redirect to the search page,
        // which has to be seen rather than followed.
        Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| RedditError::Authentication(format!("failed to build HTTP client: {}", e)))
    }

    async fn bearer_token(&mut self) -> RedditResult<String> {
        if let Some(token) = self.access_token.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.value.clone());
        }

        let token = self.request_access_token().await?;
        let value = token.value.clone();
        self.access_token = Some(token);
        Ok(value)
    }

    /// Get an application-only access token using the app's client id and secret.
    async fn request_access_token(&self) -> RedditResult<AccessToken> {
        let url = self.auth_base.join("/api/v1/access_token")?;
        let auth = base64::encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));

        debug!("Requesting application-only access token from {}", url);
        let res = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Basic {}", auth))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RedditError::Authentication(format!(
                "Reddit rejected the client credentials: HTTP {}",
                status
            )));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(RedditError::RemoteApi(format!(
                "Token request failed: HTTP {}: {}",
                status, body
            )));
        }

        let body = res.text().await?;
        let json: AccessTokenResponse = serde_json::from_str(&body)?;

        if let Some(error) = json.error {
            let error = match error {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(RedditError::Authentication(format!(
                "Token request failed: {}",
                error
            )));
        }

        let value = json
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                RedditError::Authentication(
                    "Failed to extract access token from response".to_string(),
                )
            })?;

        debug!(
            "Application-only access token obtained with scope: {:?}",
            json.scope
        );
        Ok(AccessToken::new(
            value,
            json.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
        ))
    }

    fn new_posts_url(
        &self,
        subreddit: &str,
        page_size: u32,
        after: Option<&str>,
        count: usize,
    ) -> RedditResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RedditError::Unexpected(format!("invalid API base URL: {}", self.api_base)))?
            .clear()
            .extend(&["r", subreddit, "new"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("limit", &page_size.min(MAX_PAGE_SIZE).to_string())
                .append_pair("raw_json", "1");
            if let Some(after) = after {
                query
                    .append_pair("after", after)
                    .append_pair("count", &count.to_string());
            }
        }
        Ok(url)
    }

    /// Fetch one page of `/r/{subreddit}/new`, returning its posts and the `after` cursor.
    async fn fetch_page(
        &self,
        token: &str,
        url: Url,
        subreddit: &str,
    ) -> RedditResult<(Vec<RemotePost>, Option<String>)> {
        debug!("Fetching from subreddit URL: {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("bearer {}", token))
            .send()
            .await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if location.contains("/subreddits/search") {
                return Err(RedditError::NotFound(subreddit.to_string()));
            }
            return Err(RedditError::RemoteApi(format!(
                "unexpected redirect ({}) to {}",
                status, location
            )));
        }

        match status {
            StatusCode::NOT_FOUND => return Err(RedditError::NotFound(subreddit.to_string())),
            StatusCode::UNAUTHORIZED => {
                return Err(RedditError::Authentication(
                    "access token was rejected".to_string(),
                ))
            }
            StatusCode::FORBIDDEN => {
                return Err(RedditError::RemoteApi(format!(
                    "access to r/{} is forbidden (private or banned subreddit)",
                    subreddit
                )))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(RedditError::RemoteApi("rate limited by Reddit".to_string()))
            }
            s if !s.is_success() => {
                return Err(RedditError::RemoteApi(format!(
                    "Server returned error status: {}",
                    s
                )))
            }
            _ => {}
        }

        let body = response.text().await?;
        debug!("Response body length: {} bytes", body.len());

        let parsed: ListingResponse = serde_json::from_str(&body)?;
        if parsed.kind != "Listing" {
            return Err(RedditError::RemoteApi(format!(
                "expected a Listing, got {}",
                parsed.kind
            )));
        }

        let posts = parsed
            .data
            .children
            .into_iter()
            .filter(|child| child.kind == "t3")
            .map(|child| RemotePost::from(child.data))
            .collect::<Vec<_>>();
        debug!("Successfully parsed {} posts from subreddit", posts.len());

        Ok((posts, parsed.data.after))
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn list_newest_posts(
        &mut self,
        subreddit: &str,
        limit: u32,
    ) -> RedditResult<Vec<RemotePost>> {
        let token = self.bearer_token().await?;
        let wanted = limit as usize;
        let mut posts: Vec<RemotePost> = Vec::with_capacity(wanted.min(MAX_PAGE_SIZE as usize));
        let mut after: Option<String> = None;

        // Reddit serves at most 100 posts per page; follow the cursor for the rest
        while posts.len() < wanted {
            let remaining = (wanted - posts.len()) as u32;
            let url = self.new_posts_url(subreddit, remaining, after.as_deref(), posts.len())?;
            let (page, next) = self.fetch_page(&token, url, subreddit).await?;

            if page.is_empty() {
                break;
            }
            posts.extend(page);

            match next {
                Some(cursor) if !cursor.is_empty() => after = Some(cursor),
                _ => break,
            }
        }

        posts.truncate(wanted);
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use log::Level;

    fn client() -> RedditClient {
        RedditClient::new(Credentials::new("id", "secret")).unwrap()
    }

    #[test]
    fn initialize_logs_success_without_network() {
        let sink = MemoryDiagnostics::new();
        let client = initialize(Credentials::new("id", "secret"), &sink).unwrap();
        assert!(!client.has_valid_token());
        assert_eq!(
            sink.messages_at(Level::Info),
            vec!["Successfully initialized Reddit client".to_string()]
        );
    }

    #[test]
    fn initialize_rejects_empty_credentials() {
        let sink = MemoryDiagnostics::new();
        let err = initialize(Credentials::new("", "secret"), &sink)
            .err()
            .unwrap();
        assert!(matches!(err, RedditError::Configuration(_)));
        assert_eq!(sink.messages_at(Level::Error).len(), 1);
        assert!(sink.messages_at(Level::Error)[0].starts_with("Failed to initialize Reddit client"));
    }

    #[test]
    fn new_posts_url_clamps_limit_and_encodes_name() {
        let client = client();
        let url = client.new_posts_url("rust", 500, None, 0).unwrap();
        assert_eq!(
            url.as_str(),
            "https://oauth.reddit.com/r/rust/new?limit=100&raw_json=1"
        );

        let url = client.new_posts_url("we ird", 5, None, 0).unwrap();
        assert_eq!(url.path(), "/r/we%20ird/new");
    }

    #[test]
    fn custom_endpoints_are_used() {
        let client = client()
            .with_endpoints("http://127.0.0.1:9000", "http://127.0.0.1:9001/")
            .unwrap();
        let url = client.new_posts_url("Python", 5, None, 0).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9001/r/Python/new?limit=5&raw_json=1");
    }

    #[test]
    fn later_pages_carry_the_cursor_and_count() {
        let url = client()
            .new_posts_url("Python", 150, Some("t3_p99"), 100)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://oauth.reddit.com/r/Python/new?limit=100&raw_json=1&after=t3_p99&count=100"
        );
    }

    #[test]
    fn token_validity_keeps_a_margin() {
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: 1_000,
        };
        assert!(token.is_valid_at(1_000 - TOKEN_EXPIRY_MARGIN_SECS - 1));
        assert!(!token.is_valid_at(1_000 - TOKEN_EXPIRY_MARGIN_SECS));
        assert!(AccessToken::new("t".to_string(), 3600).is_valid());
    }
}
