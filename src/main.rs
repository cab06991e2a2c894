use chrono::Local;
use clap::Parser;
use log::error;
use rednew::cli::Cli;
use rednew::diagnostics::{Diagnostics, LogDiagnostics};
use rednew::operations::posts::normalize_subreddit;
use rednew::output::render_posts;
use rednew::{initialize, AppConfig, PostFetcher, PostSource, RedditResult};
use std::io::Write;
use std::process::ExitCode;

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}

async fn run<D>(cli: &Cli, diagnostics: D) -> RedditResult<()>
where
    D: Diagnostics + Copy,
{
    let config = AppConfig::load(&cli.env_file).map_err(|err| {
        diagnostics.error(&format!("Failed to load configuration: {}", err));
        err
    })?;
    let client = initialize(config.credentials, &diagnostics)?;

    let output = fetch_and_render(client, cli, diagnostics).await?;
    print!("{}", output);
    Ok(())
}

async fn fetch_and_render<S, D>(source: S, cli: &Cli, diagnostics: D) -> RedditResult<String>
where
    S: PostSource,
    D: Diagnostics,
{
    // fetch_latest strips the `r/` prefix itself; this is only the display name
    let subreddit = normalize_subreddit(&cli.subreddit);
    diagnostics.info(&format!("Gathering new posts from r/{}", subreddit));

    let mut fetcher = PostFetcher::new(source, diagnostics);
    let posts = fetcher.fetch_latest(&cli.subreddit, cli.limit).await?;

    Ok(render_posts(subreddit, &posts))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    match run(&cli, LogDiagnostics).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Failed to fetch posts: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use log::Level;
    use rednew::diagnostics::MemoryDiagnostics;
    use rednew::models::RemotePost;
    use std::sync::{Arc, Mutex};

    /// Source returning a single post and recording the names it was asked for.
    #[derive(Default)]
    struct OnePost {
        requested: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl PostSource for OnePost {
        async fn list_newest_posts(
            &mut self,
            subreddit: &str,
            _limit: u32,
        ) -> RedditResult<Vec<RemotePost>> {
            self.requested.lock().unwrap().push(subreddit.to_string());
            Ok(vec![RemotePost {
                title: "Hello".to_string(),
                author: Some("ferris".to_string()),
                score: 3,
            }])
        }
    }

    #[tokio::test]
    async fn progress_goes_to_the_injected_sink() {
        let sink = MemoryDiagnostics::new();
        let cli = Cli::try_parse_from(["rednew", "-s", "r/rust"]).unwrap();

        let output = fetch_and_render(OnePost::default(), &cli, &sink)
            .await
            .unwrap();

        assert!(output.starts_with("\nLatest posts from r/rust:\n"));
        assert_eq!(
            sink.messages_at(Level::Info),
            vec![
                "Gathering new posts from r/rust".to_string(),
                "Successfully fetched 1 posts from r/rust".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn prefix_is_stripped_only_once() {
        let sink = MemoryDiagnostics::new();
        let cli = Cli::try_parse_from(["rednew", "-s", "r/r/foo"]).unwrap();
        let source = OnePost::default();
        let requested = Arc::clone(&source.requested);

        let output = fetch_and_render(source, &cli, &sink).await.unwrap();

        assert_eq!(*requested.lock().unwrap(), vec!["r/foo".to_string()]);
        assert!(output.starts_with("\nLatest posts from r/r/foo:\n"));
    }
}
