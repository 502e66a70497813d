//! Tracing subscriber setup.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RUST_LOG` | Filter directives for `tracing` | `info` |
//! | `MAILMERGE_LOG__FORMAT` | `text` or `json` output | `text` |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }

    tracing::info!(format = ?config.format, "Tracing initialized");
    Ok(())
}
