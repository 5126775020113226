use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/canvasui.toml";
const DEFAULT_PANEL_PATH: &str = "config/panel.json";

/// Headless runner settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Panel configuration (JSON).
    pub panel_path: PathBuf,
    /// Initial content map (JSON).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_path: Option<PathBuf>,
    /// Pointer script (JSON).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_path: Option<PathBuf>,
    /// Where to write one JSON line per frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_log: Option<PathBuf>,
    /// Directory image sources are resolved against.
    pub asset_root: PathBuf,
    pub max_frames: u64,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            panel_path: PathBuf::from(DEFAULT_PANEL_PATH),
            content_path: None,
            script_path: None,
            frame_log: None,
            asset_root: PathBuf::from("."),
            max_frames: 120,
            log_filter: "warn".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<RunnerConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    RunnerConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                RunnerConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
