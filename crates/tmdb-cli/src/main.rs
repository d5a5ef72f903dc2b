//! tmdb - command-line movie browser backed by the offline-aware client.
//!
//! Every command goes through the same request pipeline as any other
//! consumer of `tmdb-core`: with no network the last fetched copy of each
//! listing is served from the on-disk cache.

mod retry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retry::{retry_async, RetryPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use tmdb_core::{
    ConnectivityMonitor, Credentials, ImageSize, MovieDetail, MoviePage, NetworkError,
    NetworkResult, PathMonitor, PathStatus, ProbePathMonitor, TmdbApi,
};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tmdb")]
#[command(about = "Browse The Movie Database from the terminal")]
struct Args {
    /// Skip the network entirely and answer from the cache
    #[arg(long, global = true)]
    offline: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Attempts per request when the failure is transient
    #[arg(long, global = true, default_value = "3")]
    retries: u32,

    /// Data directory (overrides TMDB_CACHE_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List today's trending movies
    Trending {
        /// First page to fetch
        #[arg(long, default_value = "1")]
        page: u32,
        /// Number of pages to fetch, stopping early at the last page
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Search movies by title
    Search {
        query: String,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show full detail for one movie
    Detail { id: u64 },
    /// Delete every cached response
    ClearCache,
    /// Show response cache size
    CacheStats,
    /// Probe the network and report connectivity
    Status,
    /// Manage favorite movies
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand, Debug)]
enum FavoriteAction {
    /// Mark or unmark a movie as favorite
    Toggle { id: u64 },
    /// List favorite movie ids
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays parseable
    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut credentials = Credentials::from_env().context("Missing TMDB credentials")?;
    if let Some(dir) = args.data_dir.clone() {
        credentials.data_dir = dir;
    }
    debug!("Using {:?}", credentials);

    let status = if args.offline {
        PathStatus::Unsatisfied
    } else if needs_network(&args.command) {
        probe_once().await?
    } else {
        PathStatus::Satisfied
    };

    let api = TmdbApi::builder(credentials)
        .connectivity(Arc::new(ConnectivityMonitor::with_status(status)))
        .build()
        .await?;

    let policy = RetryPolicy::default().with_max_attempts(args.retries);
    run(&api, &args, &policy).await
}

fn needs_network(command: &Command) -> bool {
    matches!(
        command,
        Command::Trending { .. } | Command::Search { .. } | Command::Detail { .. } | Command::Status
    )
}

/// One reachability probe, used as the connectivity state for this run.
async fn probe_once() -> Result<PathStatus> {
    let mut probe = ProbePathMonitor::new()?;
    Ok(probe.next_update().await.unwrap_or(PathStatus::Satisfied))
}

async fn run(api: &TmdbApi, args: &Args, policy: &RetryPolicy) -> Result<()> {
    match &args.command {
        Command::Trending { page, pages } => {
            let mut current = (*page).max(1);
            for _ in 0..(*pages).max(1) {
                let result = with_retry(policy, || api.fetch_trending_page(current)).await?;
                print_page(&result, args.json)?;
                if !result.has_more() {
                    break;
                }
                current += 1;
            }
        }
        Command::Search { query, page } => {
            let result = with_retry(policy, || api.search_movies(query, *page)).await?;
            print_page(&result, args.json)?;
        }
        Command::Detail { id } => {
            let detail = with_retry(policy, || api.fetch_movie_detail(*id)).await?;
            let favorite = api.favorites().is_favorite(*id);
            print_detail(&detail, favorite, args.json)?;
        }
        Command::ClearCache => {
            api.clear_cache().await?;
            println!("Cache cleared");
        }
        Command::CacheStats => {
            let stats = api.cache_stats().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{} entries, {} bytes", stats.entry_count, stats.total_size_bytes);
                if let Some(modified) = stats.last_modified {
                    println!("Last written {}", modified.to_rfc3339());
                }
            }
        }
        Command::Status => {
            let state = api.connectivity_state();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else if state.is_online {
                println!("Online");
            } else {
                println!("Offline ({})", state.detail);
            }
        }
        Command::Favorite { action } => match action {
            FavoriteAction::Toggle { id } => {
                if api.favorites().toggle(*id)? {
                    println!("Added {} to favorites", id);
                } else {
                    println!("Removed {} from favorites", id);
                }
            }
            FavoriteAction::List => {
                let ids = api.favorites().ids();
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&ids)?);
                } else {
                    for id in ids {
                        println!("{}", id);
                    }
                }
            }
        },
    }
    Ok(())
}

async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = NetworkResult<T>>,
{
    retry_async(policy, operation, NetworkError::is_retryable)
        .await
        .map_err(|e| {
            let message = e.user_message();
            anyhow::Error::new(e).context(message)
        })
}

fn print_page(page: &MoviePage, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }
    println!(
        "Page {} of {} ({} results)",
        page.page, page.total_pages, page.total_results
    );
    for movie in &page.results {
        let year = movie
            .release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .unwrap_or("----");
        let rating = movie
            .vote_average
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "N/A".to_string());
        println!("{:>9}  {}  {:>4}  {}", movie.id, year, rating, movie.title);
    }
    Ok(())
}

fn print_detail(detail: &MovieDetail, favorite: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(detail)?);
        return Ok(());
    }
    let marker = if favorite { " *" } else { "" };
    println!("{}{}", detail.title, marker);
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("\"{}\"", tagline);
    }
    if let Some(date) = &detail.release_date {
        println!("Released: {}", date);
    }
    if let Some(runtime) = detail.formatted_runtime() {
        println!("Runtime:  {}", runtime);
    }
    println!("Rating:   {}", detail.formatted_vote_average());
    if let Some(genres) = detail.genres.as_ref().filter(|g| !g.is_empty()) {
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        println!("Genres:   {}", names.join(", "));
    }
    if let Some(poster) = detail.poster_url(ImageSize::default()) {
        println!("Poster:   {}", poster);
    }
    if let Some(overview) = detail.overview.as_deref().filter(|o| !o.is_empty()) {
        println!();
        println!("{}", overview);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_trending_pagination() {
        let args = Args::parse_from(["tmdb", "trending", "--page", "2", "--pages", "3"]);
        assert!(matches!(args.command, Command::Trending { page: 2, pages: 3 }));
        assert!(!args.offline);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = Args::parse_from(["tmdb", "search", "star wars", "--offline", "--json"]);
        assert!(args.offline);
        assert!(args.json);
        match args.command {
            Command::Search { query, page } => {
                assert_eq!(query, "star wars");
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_favorite_toggle() {
        let args = Args::parse_from(["tmdb", "favorite", "toggle", "550"]);
        assert!(matches!(
            args.command,
            Command::Favorite {
                action: FavoriteAction::Toggle { id: 550 }
            }
        ));
    }

    #[test]
    fn test_local_commands_skip_probe() {
        assert!(!needs_network(&Command::ClearCache));
        assert!(!needs_network(&Command::CacheStats));
        assert!(needs_network(&Command::Detail { id: 1 }));
    }
}
