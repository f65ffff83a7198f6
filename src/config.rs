use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::models::PDF_MIME;
use crate::core::upload::{UploadPolicy, UploadTiming};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub simulation: SimulationConfig,
    pub upload: UploadConfig,
    pub data: DataConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Timing and failure behavior of the simulated collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// How long the search bar shows "searching", independent of retrieval.
    pub search_display_ms: u64,
    pub search_latency_ms: u64,
    pub reply_base_ms: u64,
    /// Uniform extra delay in `[0, reply_jitter_ms]`.
    pub reply_jitter_ms: u64,
    /// Probability in `[0, 1]`.
    pub reply_failure_rate: f64,
    pub upload_processing_ms: u64,
    pub upload_failure_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub tick_ms: u64,
    pub step: u8,
    pub cap: u8,
    /// How long success/error stays on screen before resetting.
    pub dwell_ms: u64,
    pub accepted_mime: String,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            search_display_ms: 1500,
            search_latency_ms: 2000,
            reply_base_ms: 1000,
            reply_jitter_ms: 2000,
            reply_failure_rate: 0.0,
            upload_processing_ms: 2000,
            upload_failure_rate: 0.0,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            step: 10,
            cap: 90,
            dwell_ms: 2000,
            accepted_mime: PDF_MIME.to_string(),
        }
    }
}

/// Where a loaded config came from. Kept so the outcome can be logged once
/// the subscriber is up.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Missing(PathBuf),
    Invalid { path: PathBuf, error: String },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            Self::File(path) => log::info!("Loaded config from {}", path.display()),
            Self::Missing(path) => {
                log::debug!("No config file at {}, using defaults", path.display())
            }
            Self::Invalid { path, error } => log::warn!(
                "Failed to parse config at {}: {error}, using defaults",
                path.display()
            ),
        }
    }
}

impl AppConfig {
    /// Load configuration from `<config_dir>/research-assistant/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        let (config, source) = Self::read_from(config_path);
        source.log();
        config
    }

    /// Like `load`, but leaves logging to the caller. Used before the
    /// logger exists.
    pub fn read() -> (Self, ConfigSource) {
        Self::read_from(&Self::config_path())
    }

    pub fn read_from(config_path: &Path) -> (Self, ConfigSource) {
        let path = config_path.to_path_buf();
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, ConfigSource::File(path)),
                Err(e) => (
                    Self::default(),
                    ConfigSource::Invalid {
                        path,
                        error: e.to_string(),
                    },
                ),
            },
            Err(_) => (Self::default(), ConfigSource::Missing(path)),
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("research-assistant"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tui.tick_rate_ms.max(1))
    }

    pub fn search_display(&self) -> Duration {
        Duration::from_millis(self.simulation.search_display_ms)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            accepted_mime: self.upload.accepted_mime.clone(),
            step: self.upload.step.max(1),
            cap: self.upload.cap.min(99),
        }
    }

    pub fn upload_timing(&self) -> UploadTiming {
        UploadTiming {
            tick: Duration::from_millis(self.upload.tick_ms.max(1)),
            dwell: Duration::from_millis(self.upload.dwell_ms),
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("research-assistant").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
