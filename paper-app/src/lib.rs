//! # RollingPaper App
//!
//! Application wiring for the canvas engine: command-line configuration,
//! the default feedback engine, and a headless driver that replays a
//! gesture script and returns the resulting canvas snapshot.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p paper-app -- --script demo.json --pretty
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `AppConfig` - Resolved paths, viewport size and output options
//! - `script` - Gesture script format and replay
//! - `run` - Build a session, replay the script, serialize the state

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod script;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use paper_core::{CanvasConfig, CanvasSession, FeedbackEngine, Size2D, TracingFeedback};

pub use script::{replay, ReplaySummary, Script, ScriptStep};

/// Command-line arguments for paper-app.
#[derive(Debug, Clone, Parser)]
#[command(name = "paper-app")]
#[command(about = "Replay a gesture script against a RollingPaper canvas")]
#[command(version)]
pub struct CliArgs {
    /// Canvas configuration file (JSON)
    #[arg(long, env = "PAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Gesture script to replay (JSON)
    #[arg(long, env = "PAPER_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Viewport width in points
    #[arg(long, env = "PAPER_VIEWPORT_WIDTH", default_value = "1024")]
    pub viewport_width: f64,

    /// Viewport height in points
    #[arg(long, env = "PAPER_VIEWPORT_HEIGHT", default_value = "768")]
    pub viewport_height: f64,

    /// Pretty-print the resulting snapshot
    #[arg(long)]
    pub pretty: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Canvas configuration file; defaults are used when absent.
    pub config_path: Option<PathBuf>,
    /// Gesture script; an empty script is replayed when absent.
    pub script_path: Option<PathBuf>,
    /// On-screen size of the canvas view.
    pub viewport: Size2D,
    /// Pretty-print the output snapshot.
    pub pretty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_path: None,
            script_path: None,
            viewport: Size2D::new(1024.0, 768.0),
            pretty: false,
        }
    }

    /// Load the canvas configuration, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be read or is invalid.
    pub fn canvas_config(&self) -> anyhow::Result<CanvasConfig> {
        match &self.config_path {
            Some(path) => CanvasConfig::from_file(path)
                .with_context(|| format!("failed to load canvas config {}", path.display())),
            None => Ok(CanvasConfig::default()),
        }
    }

    /// Load the gesture script, or an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be read or parsed.
    pub fn script(&self) -> anyhow::Result<Script> {
        match &self.script_path {
            Some(path) => Script::from_file(path),
            None => Ok(Script::default()),
        }
    }
}

impl From<CliArgs> for AppConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            config_path: args.config,
            script_path: args.script,
            viewport: Size2D::new(args.viewport_width, args.viewport_height),
            pretty: args.pretty,
        }
    }
}

/// Build a session from `config`, replay its script and return the canvas snapshot as JSON.
///
/// # Errors
///
/// Returns an error if loading, replay or serialization fails.
pub fn run(config: &AppConfig) -> anyhow::Result<String> {
    if !config.viewport.is_usable() {
        anyhow::bail!(
            "viewport must have a positive size, got {}x{}",
            config.viewport.width,
            config.viewport.height
        );
    }
    let canvas_config = config.canvas_config()?;
    let script = config.script()?;

    let feedback: Arc<dyn FeedbackEngine> = Arc::new(TracingFeedback);
    let mut session = CanvasSession::new(canvas_config, feedback);
    session.set_viewport_size(config.viewport);
    tracing::debug!(
        viewport = ?config.viewport,
        scale = session.store().viewport().scale,
        steps = script.steps.len(),
        "session ready"
    );

    replay(&mut session, &script)?;

    let state = session.store().state();
    let json = if config.pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    }
    .context("failed to serialize canvas state")?;
    Ok(json)
}
