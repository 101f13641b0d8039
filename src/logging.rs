//! Console logging setup.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize compact console logging.
///
/// Level comes from `LOG_LEVEL` (default "info"); `RUST_LOG` overrides the
/// whole filter. sqlx statement logging is kept at warn so seeder output
/// stays readable.
pub fn init() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},sqlx=warn")));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_ansi(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
