use crate::operations::posts::{DEFAULT_LIMIT, DEFAULT_SUBREDDIT};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rednew",
    version,
    about = "Print the newest posts of a subreddit."
)]
pub struct Cli {
    /// The name of the subreddit to fetch posts from.
    #[arg(long, short, help = "Subreddit name", default_value = DEFAULT_SUBREDDIT)]
    pub subreddit: String,

    /// The number of posts to retrieve.
    #[arg(
        long,
        short,
        help = "Number of posts to retrieve",
        default_value_t = DEFAULT_LIMIT,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,

    /// File holding REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET and optionally REDDIT_USER_AGENT.
    #[arg(long, help = "Path to the .env file with Reddit credentials", default_value = ".env")]
    pub env_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_behaviour() {
        let cli = Cli::try_parse_from(["rednew"]).unwrap();
        assert_eq!(cli.subreddit, "Python");
        assert_eq!(cli.limit, 5);
        assert_eq!(cli.env_file, PathBuf::from(".env"));
    }

    #[test]
    fn accepts_overrides() {
        let cli = Cli::try_parse_from(["rednew", "-s", "rust", "--limit", "10", "--env-file", "conf/.env"])
            .unwrap();
        assert_eq!(cli.subreddit, "rust");
        assert_eq!(cli.limit, 10);
        assert_eq!(cli.env_file, PathBuf::from("conf/.env"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(Cli::try_parse_from(["rednew", "--limit", "0"]).is_err());
    }
}
