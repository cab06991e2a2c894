//! Plain-text rendering of fetched posts

use crate::models::PostRecord;

const DIVIDER_WIDTH: usize = 50;

pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

/// Render posts as numbered blocks separated by divider lines.
pub fn render_posts(subreddit: &str, posts: &[PostRecord]) -> String {
    let divider = divider();
    let mut output = format!("\nLatest posts from r/{}:\n{}\n", subreddit, divider);

    if posts.is_empty() {
        output.push_str("\nNo posts found.\n");
        output.push_str(&divider);
        output.push('\n');
        return output;
    }

    for (i, post) in posts.iter().enumerate() {
        output.push_str(&format!("\nPost #{}\n", i + 1));
        output.push_str(&format!("Title: {}\n", post.title));
        output.push_str(&format!("Author: u/{}\n", post.author));
        output.push_str(&format!("Upvotes: {}\n", post.upvotes));
        output.push_str(&divider);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, author: &str, upvotes: i64) -> PostRecord {
        PostRecord {
            title: title.to_string(),
            author: author.to_string(),
            upvotes,
        }
    }

    #[test]
    fn renders_numbered_blocks() {
        let posts = vec![record("Hello", "ferris", 12), record("Bye", "[deleted]", -2)];
        let dashes = "-".repeat(50);
        let expected = format!(
            "\nLatest posts from r/Python:\n{d}\n\
             \nPost #1\nTitle: Hello\nAuthor: u/ferris\nUpvotes: 12\n{d}\n\
             \nPost #2\nTitle: Bye\nAuthor: u/[deleted]\nUpvotes: -2\n{d}\n",
            d = dashes
        );
        assert_eq!(render_posts("Python", &posts), expected);
    }

    #[test]
    fn empty_listing_says_so() {
        let rendered = render_posts("quiet", &[]);
        assert!(rendered.starts_with("\nLatest posts from r/quiet:\n"));
        assert!(rendered.contains("No posts found."));
        assert!(!rendered.contains("Post #"));
    }
}
