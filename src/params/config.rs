//! Top-level configuration and the TOML config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AudioConfig, VisualConfig};
use crate::error::{Error, Result};
use crate::visualizer::Style;

/// Directory name used under the platform config directory
const APP_DIR: &str = "audiovis";

/// Complete program configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Effect shown at startup
    pub style: Style,

    /// Color scheme name (see `--list`)
    pub color_scheme: String,

    pub audio: AudioConfig,

    pub visual: VisualConfig,

    /// Set at runtime when the synthetic generator feeds the analyzer
    #[serde(skip)]
    pub demo_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: Style::Bars,
            color_scheme: "rainbow".to_string(),
            audio: AudioConfig::default(),
            visual: VisualConfig::default(),
            demo_mode: false,
        }
    }
}

impl Config {
    /// Load a config file; keys missing from the file keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Default search locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_DIR).join("config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".audiovis.toml"));
        }
        paths
    }

    /// Load the first existing default config file, falling back to defaults.
    ///
    /// A broken file is reported and skipped rather than aborting startup.
    pub fn load_default() -> Self {
        Self::load_first(&Self::default_paths())
    }

    fn load_first(paths: &[PathBuf]) -> Self {
        for path in paths.iter().filter(|p| p.is_file()) {
            match Self::load(path) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("ignoring config file: {}", e);
                    break;
                }
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.audio.validate()?;
        self.visual.validate()
    }

    /// Render the configuration as TOML (used by `--print-config`)
    pub fn to_toml(&self) -> String {
        // Plain structs of scalars always serialize.
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
