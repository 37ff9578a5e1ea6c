use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(error) = scorpions_feed_lib::run().await {
        tracing::error!(%error, "feed run failed");
        eprintln!("{error}");
        std::process::exit(1);
    }
}
