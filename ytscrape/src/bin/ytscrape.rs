use clap::{Parser, Subcommand};
use eyre::Context;
use std::io::IsTerminal;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ytscrape::{
    Client, ClientConfig, Item, ItemKind, Locale, Playlist, PlaylistOptions, SearchOptions,
    SearchResult,
};

#[derive(Parser, Debug)]
#[command(name = "ytscrape", version, about = "Scrape YouTube playlists and search results")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Region code sent with requests
    #[arg(long, global = true, default_value = "US")]
    gl: String,

    /// Interface language sent with requests
    #[arg(long, global = true, default_value = "en")]
    hl: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the videos of a playlist
    Playlist {
        /// Playlist link, playlist ID, or channel link
        link: String,

        /// Maximum number of videos
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Search for videos or playlists
    Search {
        /// Search terms or a /results filter link
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Kind of result: video or playlist
        #[arg(long, default_value = "video")]
        kind: ItemKind,

        #[arg(long)]
        safe_search: bool,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let config = ClientConfig::default().with_timeout(Duration::from_secs(cli.timeout));
    let client = Client::new(config).context("build http client")?;
    let locale = Locale {
        gl: cli.gl,
        hl: cli.hl,
    };

    match cli.command {
        Command::Playlist { link, limit } => {
            let opts = PlaylistOptions {
                limit,
                locale: Some(locale),
                utc_offset_minutes: None,
            };
            let playlist = client
                .get_playlist(&link, &opts)
                .await
                .with_context(|| format!("fetch playlist {link}"))?;
            if let Some(e) = &playlist.interrupted {
                tracing::warn!(error = %e, "playlist is incomplete");
            }
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&playlist).context("serialize playlist")?
                );
            } else {
                print_playlist(&playlist);
            }
        }
        Command::Search {
            query,
            limit,
            kind,
            safe_search,
        } => {
            let opts = SearchOptions {
                kind,
                limit,
                safe_search,
                locale,
                ..SearchOptions::default()
            };
            let result = client
                .search(&query, &opts)
                .await
                .with_context(|| format!("search for {query:?}"))?;
            if let Some(e) = &result.interrupted {
                tracing::warn!(error = %e, "search results are incomplete");
            }
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).context("serialize search result")?
                );
            } else {
                print_search(&result);
            }
        }
    }

    Ok(())
}

fn print_playlist(playlist: &Playlist) {
    println!("{} ({})", playlist.title, playlist.url);
    if let Some(owner) = &playlist.owner {
        println!("by {}", owner.name);
    }
    match playlist.views {
        Some(views) => println!("{} videos, {views} views", playlist.total_items),
        None => println!("{} videos", playlist.total_items),
    }
    if !playlist.last_updated.is_empty() {
        println!("{}", playlist.last_updated);
    }
    println!();
    for (i, item) in playlist.items.iter().enumerate() {
        print_item(item.index.unwrap_or(i as u64 + 1), item);
    }
}

fn print_search(result: &SearchResult) {
    println!(
        "{} results for {:?} (about {})",
        result.items.len(),
        result.query,
        result.estimated_results
    );
    println!();
    for (i, item) in result.items.iter().enumerate() {
        print_item(i as u64 + 1, item);
    }
}

fn print_item(position: u64, item: &Item) {
    let by = item
        .author
        .as_ref()
        .map(|a| format!(" - {}", a.name))
        .unwrap_or_default();
    let duration = if item.is_live {
        " [live]".to_string()
    } else if item.duration.is_empty() {
        String::new()
    } else {
        format!(" [{}]", item.duration)
    };
    println!("{position:>4}. {}{duration}{by}", item.title);
    println!("      {}", item.url);
}
