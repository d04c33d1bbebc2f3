use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use makedon_news::app::{build_http_client, App, AppEvent};
use makedon_news::config::Config;
use makedon_news::feed::{FeedLoader, FeedSource};
use makedon_news::filter::FilterScrollController;
use makedon_news::ui;

/// Get the config directory path (~/.config/makedon-news/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("makedon-news"))
}

#[derive(Parser, Debug)]
#[command(
    name = "makedon-news",
    about = "Terminal news board with topic and region filters"
)]
struct Args {
    /// Config file (default: ~/.config/makedon-news/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// News payload URL or local JSON file, overriding the config
    #[arg(long, value_name = "URL_OR_PATH")]
    feed: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(feed) = args.feed {
        config.feed_url = feed;
    }

    let source = FeedSource::parse(&config.feed_url);
    tracing::info!(source = %source, "Starting news board");

    let client =
        build_http_client(config.request_timeout()).context("Failed to create HTTP client")?;
    let loader = FeedLoader::new(client, source).with_timeout(config.request_timeout());

    let settings = config.controller_settings();
    let aliases = config.region_aliases();
    let refresh_interval = config.refresh_interval();
    let controller =
        FilterScrollController::new(settings, aliases, config.topics, config.regions);

    let mut app = App::new(controller, Arc::new(loader));

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx, refresh_interval).await?;

    Ok(())
}
