/// Author shown for posts whose account was deleted or is otherwise unavailable.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A post as delivered by a [`PostSource`](crate::client::PostSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePost {
    pub title: String,
    pub author: Option<String>,
    pub score: i64,
}

/// Normalized post: title, author and score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub title: String,
    pub author: String,
    pub upvotes: i64,
}

impl From<RemotePost> for PostRecord {
    fn from(post: RemotePost) -> Self {
        let author = match post.author {
            Some(name) if !name.trim().is_empty() => name,
            _ => DELETED_AUTHOR.to_string(),
        };

        PostRecord {
            title: post.title,
            author,
            upvotes: post.score,
        }
    }
}
