//! # RollingPaper App
//!
//! Headless driver: replays a gesture script and prints the canvas snapshot.

use clap::Parser;
use paper_app::{AppConfig, CliArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,paper_app=debug,paper_core=debug"));

    // Logs go to stderr so stdout carries only the snapshot.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format in production (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = AppConfig::from(args);

    tracing::info!(
        "Viewport {}x{}, script {:?}",
        config.viewport.width,
        config.viewport.height,
        config.script_path
    );

    let snapshot = paper_app::run(&config)?;
    println!("{snapshot}");
    Ok(())
}
