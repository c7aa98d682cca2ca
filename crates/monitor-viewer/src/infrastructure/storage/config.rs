//! TOML-based configuration for the viewer.
//!
//! The config file lives at `--config <path>` or, by default:
//! - Linux:    `$XDG_CONFIG_HOME/shm-monitor/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/shm-monitor/config.toml`
//!
//! A missing file is not an error: the viewer runs on defaults that match the
//! emulator's own build (402x292 grid, key `0x6303b5eb`).
//!
//! ```toml
//! [segment]
//! key = 0x6303b5eb
//! width = 402
//! height = 292
//! create = false
//!
//! [scheduler]
//! tick_ms = 50
//! redraw_divisor = 10
//!
//! [render]
//! snapshot_path = "monitor.ppm"
//!
//! [keyboard]
//! aliases = [{ key = "ArrowUp", row = 6, col = 4 }]
//!
//! [joystick]
//! enabled = false
//! port = 2
//!
//! [logging]
//! log_level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every section and field carries a `#[serde(default ...)]`, so a file only
//! needs to list the settings it changes.
//!
//! While `[joystick] enabled = true`, keypad 8/2/4/6/0 belong to the joystick
//! and never reach the keyboard matrix, so an alias on one of those keys is
//! rejected instead of being silently ignored.

use std::path::{Path, PathBuf};

use monitor_core::{
    is_joystick_key, FrameLayout, HostKey, InvalidPort, JoystickEncoder, JoystickPort, KeyboardMatrix, LayoutError,
    MatrixCell, MatrixError, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::shm::DEFAULT_SHM_KEY;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid segment dimensions: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid keyboard alias: {0}")]
    Alias(#[from] MatrixError),

    #[error("invalid joystick setting: {0}")]
    Joystick(#[from] InvalidPort),

    /// A keyboard alias names a key the enabled joystick consumes.
    #[error("keyboard alias for {0} is unreachable while the joystick is enabled")]
    AliasShadowedByJoystick(HostKey),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub segment: SegmentConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which segment to attach and how it is laid out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentConfig {
    /// System V key shared with the emulator.
    #[serde(default = "default_key")]
    pub key: u32,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Create and zero the segment if the emulator has not.
    #[serde(default)]
    pub create: bool,
}

/// Main loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulerConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Redraw once every this many ticks.
    #[serde(default = "default_redraw_divisor")]
    pub redraw_divisor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderConfig {
    /// Where the PPM snapshot is written on each redraw.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

/// Extra host keys wired onto matrix cells, on top of the built-in table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct KeyboardConfig {
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
}

/// One `key -> (row, col)` alias.  A key may be aliased to several cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AliasEntry {
    pub key: HostKey,
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoystickConfig {
    /// Route keypad 8/2/4/6/0 to a joystick port instead of the matrix.
    #[serde(default)]
    pub enabled: bool,
    /// Port 1 or 2.
    #[serde(default = "default_joystick_port")]
    pub port: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_key() -> u32 {
    DEFAULT_SHM_KEY
}
fn default_width() -> usize {
    DEFAULT_WIDTH
}
fn default_height() -> usize {
    DEFAULT_HEIGHT
}
fn default_tick_ms() -> u64 {
    50
}
fn default_redraw_divisor() -> u32 {
    10
}
fn default_snapshot_path() -> PathBuf {
    PathBuf::from("monitor.ppm")
}
fn default_joystick_port() -> u8 {
    2
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            width: default_width(),
            height: default_height(),
            create: false,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            redraw_divisor: default_redraw_divisor(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_joystick_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// ── Derived domain values ─────────────────────────────────────────────────────

impl AppConfig {
    /// The segment layout for the configured grid size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Layout`] for a zero or overflowing grid.
    pub fn layout(&self) -> Result<FrameLayout, ConfigError> {
        Ok(FrameLayout::new(self.segment.width, self.segment.height)?)
    }

    /// The built-in C64 matrix with the configured aliases added.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Alias`] if an alias names a cell outside the
    /// 8x8 matrix or the `Unknown` key, and
    /// [`ConfigError::AliasShadowedByJoystick`] if the joystick is enabled and
    /// an alias names one of its keys.
    pub fn keyboard_matrix(&self) -> Result<KeyboardMatrix, ConfigError> {
        let mut matrix = KeyboardMatrix::c64();
        for alias in &self.keyboard.aliases {
            if self.joystick.enabled && is_joystick_key(alias.key) {
                return Err(ConfigError::AliasShadowedByJoystick(alias.key));
            }
            matrix.add(alias.key, MatrixCell::new(alias.row, alias.col)?)?;
        }
        Ok(matrix)
    }

    /// The joystick encoder, if enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Joystick`] if the port is not 1 or 2.
    pub fn joystick(&self) -> Result<Option<JoystickEncoder>, ConfigError> {
        if !self.joystick.enabled {
            return Ok(None);
        }
        let port = JoystickPort::try_from(self.joystick.port)?;
        Ok(Some(JoystickEncoder::new(port)))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when neither
/// `XDG_CONFIG_HOME` nor `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the default location, or defaults if absent.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Renders `config` as pretty TOML.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn to_toml_string(config: &AppConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = to_toml_string(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `shm-monitor` leaf.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("shm-monitor")
        })
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("shm-monitor"))
    }

    #[cfg(not(unix))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
