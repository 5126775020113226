//! canvasui - headless runner for declarative canvas panels
//!
//! Loads a panel, optional content and a pointer script, then drives the
//! panel frame by frame against a recording backend.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use config::{RunnerConfig, DEFAULT_CONFIG_PATH};
use std::{env, path::PathBuf};
use tracing::{info, Level};

fn main() -> Result<()> {
    let cli = CliOptions::parse(env::args().skip(1));

    // Surface config load warnings before the real subscriber exists.
    let startup = tracing_subscriber::fmt().with_max_level(Level::WARN).finish();
    let config = tracing::subscriber::with_default(startup, || {
        RunnerConfig::load_from_path(&cli.config_path)
    });
    let config = cli.apply(config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();

    info!("Starting canvasui v{}", env!("CARGO_PKG_VERSION"));
    for problem in &cli.problems {
        tracing::error!("{problem}");
    }
    if cli.save_config {
        config.save_to_path(&cli.config_path)?;
        info!("Saved runner config to {}", cli.config_path.display());
    }

    let summary = headless::run(&config)?;
    info!(
        frames = summary.frames,
        passes = summary.passes,
        events = summary.events,
        "done"
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
struct CliOptions {
    config_path: PathBuf,
    panel: Option<PathBuf>,
    content: Option<PathBuf>,
    script: Option<PathBuf>,
    frames: Option<u64>,
    frame_log: Option<PathBuf>,
    /// Write the effective config back to `config_path` before running.
    save_config: bool,
    /// Argument errors, reported once logging is up.
    problems: Vec<String>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            panel: None,
            content: None,
            script: None,
            frames: None,
            frame_log: None,
            save_config: false,
            problems: Vec::new(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => match args.next() {
                    Some(path) => opts.config_path = PathBuf::from(path),
                    None => opts.problems.push("--config requires a file path".into()),
                },
                "--panel" => match args.next() {
                    Some(path) => opts.panel = Some(PathBuf::from(path)),
                    None => opts.problems.push("--panel requires a file path".into()),
                },
                "--content" => match args.next() {
                    Some(path) => opts.content = Some(PathBuf::from(path)),
                    None => opts.problems.push("--content requires a file path".into()),
                },
                "--script" => match args.next() {
                    Some(path) => opts.script = Some(PathBuf::from(path)),
                    None => opts.problems.push("--script requires a file path".into()),
                },
                "--frame-log" => match args.next() {
                    Some(path) => opts.frame_log = Some(PathBuf::from(path)),
                    None => opts.problems.push("--frame-log requires a file path".into()),
                },
                "--frames" => match args.next() {
                    Some(raw) => match raw.parse::<u64>() {
                        Ok(value) => opts.frames = Some(value),
                        Err(err) => opts
                            .problems
                            .push(format!("--frames must be an integer (got {raw}): {err}")),
                    },
                    None => opts.problems.push("--frames requires an integer".into()),
                },
                "--save-config" => opts.save_config = true,
                other => opts.problems.push(format!("unknown argument {other}")),
            }
        }
        opts
    }

    /// Command-line values win over the config file.
    fn apply(&self, mut config: RunnerConfig) -> RunnerConfig {
        if let Some(path) = &self.panel {
            config.panel_path = path.clone();
        }
        if let Some(path) = &self.content {
            config.content_path = Some(path.clone());
        }
        if let Some(path) = &self.script {
            config.script_path = Some(path.clone());
        }
        if let Some(path) = &self.frame_log {
            config.frame_log = Some(path.clone());
        }
        if let Some(frames) = self.frames {
            config.max_frames = frames;
        }
        config
    }
}
