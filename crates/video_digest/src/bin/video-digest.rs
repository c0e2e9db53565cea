use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use video_digest::{
    config::Cli,
    gemini::GeminiClient,
    http::build_http_client,
    keypool::KeyPool,
    server,
    tracing::init_tracing_subscriber,
    yt::{metadata::YouTubeDataClient, transcript::CaptionScraper},
    DigestServiceBuilder,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = cli
        .into_config(|name| std::env::var(name).ok())
        .context("Invalid configuration")?;

    let summary_keys = Arc::new(KeyPool::new("gemini", config.gemini_keys)?);
    let metadata_keys = Arc::new(KeyPool::new("youtube-data", config.youtube_keys)?);

    tracing::info!(
        gemini_keys = summary_keys.len(),
        youtube_keys = metadata_keys.len(),
        "Loaded API key pools"
    );

    let http = build_http_client(config.request_timeout);

    let service = DigestServiceBuilder::new(summary_keys, metadata_keys)
        .transcripts(CaptionScraper::new(http.clone()))
        .metadata(YouTubeDataClient::new(http.clone()))
        .summarizer(GeminiClient::new(config.gemini_model, http))
        .build();

    tracing::info!(model = service.model(), "Summarizer ready");

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "Starting video-digest server");

    server::serve(listener, server::router(Arc::new(service))).await?;

    Ok(())
}
