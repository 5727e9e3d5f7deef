use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};
use linebot_core::DriveProfile;
use serde::{Deserialize, Serialize};

/// Analog level that splits black from white on the IR boards.
pub const DEFAULT_LINE_THRESHOLD: u16 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LinebotConfig {
    /// Scenario played by the simulated sensors. The built-in demo when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<PathBuf>,
    pub run: RunConfig,
    pub motors: DriveProfile,
    pub line_sensor: LineSensorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub interval_ms: u64,
    /// Where logs go while the TUI owns the terminal.
    pub log_file: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            log_file: PathBuf::from("linebot.log"),
        }
    }
}

impl RunConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSensorConfig {
    pub threshold: u16,
}

impl Default for LineSensorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_LINE_THRESHOLD,
        }
    }
}

impl LinebotConfig {
    /// Explicit path first, then the per-user config file, then built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
        // scenario paths are relative to the config file
        if let (Some(scenario), Some(dir)) = (config.scenario.as_mut(), path.parent()) {
            if scenario.is_relative() {
                *scenario = dir.join(&*scenario);
            }
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| eyre!("failed to serialize config: {e}"))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("linebot").join("config.toml"))
}
