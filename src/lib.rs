pub mod core;

use crate::core::config::{ConfigError, FeedConfig, OutputFormat};
use crate::core::feed::fetcher::fetch_feed;
use crate::core::view::FeedView;

pub use crate::core::feed::fetcher::FeedError;
pub use crate::core::feed::types::{CanonicalRow, FeedKind, RawRow, RawValue};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("json output failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads the feed once and prints it to stdout, as text cards or as JSON
/// depending on `SCORPIONS_FEED_FORMAT`.
pub async fn run() -> Result<(), AppError> {
    let _ = dotenvy::from_filename(".env.local");
    let config = FeedConfig::from_env()?;
    let client = config.build_client().map_err(AppError::Client)?;

    let mut view = FeedView::new();
    view.begin_load();
    let rows = fetch_feed(&client, &config.feed_url).await?;
    tracing::info!(rows = rows.len(), "feed loaded");
    view.finish_load(Ok(rows));

    match config.format {
        OutputFormat::Text => print!("{}", view.render()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view.items())?),
    }
    Ok(())
}
