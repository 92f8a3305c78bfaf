use clap::{Parser, Subcommand};
use eyre::Context;
use jiff::Timestamp;
use std::io::IsTerminal;
use tokio_stream::StreamExt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use youtube_feed::view::{Card, GridModel, GridStatus, item_width};
use youtube_feed::{Config, FetchNext, QueryKey, Video, VideoFeed, YouTubeClient, transform};

/// Browse YouTube videos from the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Terminal width in pixels to lay the grid out for.
    #[arg(long, global = true, default_value_t = 1280.0)]
    width: f32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Most popular videos in a region.
    Trending {
        #[arg(long, default_value = "US")]
        region: String,
        #[arg(long, default_value_t = 12)]
        page_size: u32,
        /// Number of pages to scroll through.
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Videos matching a query.
    Search {
        #[arg(default_value = "programming")]
        query: String,
        #[arg(long, default_value_t = 12)]
        page_size: u32,
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Print up to this many results as a flat list instead of a grid.
        #[arg(long)]
        stream: Option<usize>,
    },
    /// Snippet and statistics for specific videos.
    Details {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("load configuration")?;
    let client = YouTubeClient::from_config(&config).context("build YouTube client")?;

    match cli.command {
        Command::Trending {
            region,
            page_size,
            pages,
        } => {
            let feed = VideoFeed::new(client, config.stale_after);
            let key = QueryKey::trending(region, page_size);
            scroll(&feed, key, cli.width, pages).await?;
        }
        Command::Search {
            query,
            stream: Some(limit),
            page_size,
            ..
        } => {
            let results = client.search_stream(&query, page_size).take(limit);
            let mut results = std::pin::pin!(results);
            let mut n = 0;
            while let Some(video) = results.next().await {
                let video = video.context("fetch search results")?;
                n += 1;
                println!("{n:>4}. {} ({})", video.title, video.id);
            }
        }
        Command::Search {
            query,
            page_size,
            pages,
            stream: None,
        } => {
            let feed = VideoFeed::new(client, config.stale_after);
            let key = QueryKey::search(query, page_size);
            scroll(&feed, key, cli.width, pages).await?;
        }
        Command::Details { ids } => {
            let response = client.get_details(&ids).await.context("fetch details")?;
            let videos = transform::from_detail_envelope(&response).context("read details")?;
            if videos.is_empty() {
                eprintln!("No videos found.");
            }
            for video in &videos {
                print_card(video);
                println!(
                    "    {} likes",
                    video.like_count.as_deref().unwrap_or("N/A")
                );
                println!();
            }
        }
    }

    Ok(())
}

/// Loads up to `pages` pages of `key` the way a scrolling grid would, then prints the grid.
async fn scroll(feed: &VideoFeed, key: QueryKey, width: f32, pages: usize) -> eyre::Result<()> {
    let grid = GridModel::new(feed.infinite(key.clone()), width);
    eprintln!("Loading videos for {key}...");

    let mut outcome = grid.on_mount().await;
    let mut loaded = 1;
    while loaded < pages {
        match grid.on_end_reached().await {
            None => break,
            Some(Ok(FetchNext::Appended(_))) => loaded += 1,
            Some(Ok(_)) => break,
            Some(Err(e)) => {
                outcome = Err(e);
                break;
            }
        }
    }

    match grid.status() {
        GridStatus::Ready => {}
        status => {
            if let Err(e) = &outcome {
                tracing::error!(error = %e, "fetch failed");
            }
            eprintln!("{}", status.placeholder().unwrap_or_default());
            return outcome.map(|_| ()).context("fetch videos");
        }
    }

    eprintln!(
        "{} columns, {:.0}px per card",
        grid.columns(),
        item_width(width, grid.columns())
    );
    for (r, row) in grid.rows().iter().enumerate() {
        println!("-- row {} --", r + 1);
        for item in row {
            print_card(&item.video);
        }
    }
    if grid.feed().has_next_page() {
        eprintln!("(more available)");
    }
    if let Err(e) = outcome {
        // earlier pages are still shown
        eprintln!("Failed to load more: {e}");
    }

    Ok(())
}

fn print_card(video: &Video) {
    let card = Card::new(video);
    let published = card.relative_published_label(Timestamp::now());
    let stats = match card.view_count_label() {
        Some(views) => format!("{views} · {published}"),
        None => published,
    };
    println!(
        "[{}] {}\n    {} · {} ({})\n    {}",
        card.avatar_initial().unwrap_or_else(|| "?".to_string()),
        video.title,
        video.channel_title,
        stats,
        card.published_label(),
        card.thumbnail_url().unwrap_or("no thumbnail")
    );
}
