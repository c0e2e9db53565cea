use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,reqwest=warn,tower_http=info";

/// Bunyan json logs to stdout plus sentry breadcrumbs/events.
///
/// `RUST_LOG` overrides the default directives.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            "video-digest".into(),
            std::io::stdout,
        ))
        .with(sentry_tracing::layer())
        .try_init()?;

    Ok(())
}
