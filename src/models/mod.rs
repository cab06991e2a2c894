use serde::Deserialize;

pub mod post;

pub use post::{PostRecord, RemotePost, DELETED_AUTHOR};

/// Top-level response for subreddit listings (`/r/{name}/new`)
#[derive(Deserialize, Debug)]
pub struct ListingResponse {
    pub kind: String,
    pub data: ListingData,
}

/// Page of things in a listing
#[derive(Deserialize, Debug)]
pub struct ListingData {
    /// Cursor of the next page, `None` on the last one
    pub after: Option<String>,
    pub children: Vec<PostEntity>,
}

/// Listing entry with kind (`t3` for posts) and data fields
#[derive(Deserialize, Debug)]
pub struct PostEntity {
    pub kind: String,
    pub data: PostData,
}

/// The subset of post fields this tool reads
#[derive(Deserialize, Debug)]
pub struct PostData {
    pub title: String,
    // Null or absent for some removed accounts
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: i64,
}

impl From<PostData> for RemotePost {
    fn from(data: PostData) -> Self {
        RemotePost {
            title: data.title,
            author: data.author,
            score: data.score,
        }
    }
}

/// Body of `/api/v1/access_token`
#[derive(Deserialize, Debug)]
pub struct AccessTokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
    pub error: Option<serde_json::Value>,
}
