//! Rewrites the Iceberg REST server configuration before the server starts

use anyhow::{Context, Result};
use config::{ConfigRewriter, ProcessEnv, RewriterSettings};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let settings = RewriterSettings::from_env().context("Failed to load rewriter settings")?;

    init_logging(&settings)?;

    info!("Starting configuration rewriter v{}", env!("CARGO_PKG_VERSION"));

    let extra_args = env::args().skip(1).count();
    if extra_args > 0 {
        warn!("Ignoring {} command-line argument(s); the rewriter takes none", extra_args);
    }

    let rewriter = ConfigRewriter::from_settings(&settings);
    info!(
        "Rewriting {} (write mode: {})",
        rewriter.path().display(),
        rewriter.write_mode()
    );

    let report = rewriter.run(&ProcessEnv).with_context(|| {
        format!(
            "Failed to rewrite configuration file {}",
            rewriter.path().display()
        )
    })?;

    if !report.env_missing.is_empty() {
        info!("Environment variables not set: {}", report.env_missing.join(", "));
    }
    info!("{}", report.summary());

    Ok(())
}

/// Initialize logging on stderr from the rewriter settings
fn init_logging(settings: &RewriterSettings) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    info!("Log level: {}", settings.log_level);
    info!("Log format: {}", settings.log_format);

    Ok(())
}
