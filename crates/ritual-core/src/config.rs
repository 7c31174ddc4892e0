//! Configuration loading and typed config structures for the ritual engine.
//!
//! The canonical configuration lives in `ritual-config.yaml` at the project
//! root. The `RITUAL_CONFIG` environment variable points the loader at a
//! different file. Every section is optional and falls back to the defaults
//! documented on each field; out-of-range values are clamped once, here, so
//! the tick loop never sees a misconfiguration.

use std::path::{Path, PathBuf};

use ritual_effects::{Augment, EffectsConfig};
use ritual_types::{Position, VariantKind};
use serde::Deserialize;
use tracing::warn;

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "RITUAL_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "ritual-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
///
/// Mirrors the structure of `ritual-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// World-level settings (name, seed, timing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Run boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Background scan settings.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-variant effect settings.
    #[serde(default)]
    pub effects: EffectsConfig,

    /// Rituals to activate at startup.
    #[serde(default)]
    pub rituals: Vec<RitualSpec>,
}

impl EngineConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config.sanitized())
    }

    /// The configuration path: `RITUAL_CONFIG` if set, otherwise
    /// [`DEFAULT_CONFIG_PATH`].
    pub fn path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }

    /// Load from [`EngineConfig::path`].
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::from_file`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file(&Self::path())
    }

    /// Clamp every out-of-range value, logging each correction.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            effects: self.effects.sanitized(),
            rituals: self.rituals.into_iter().map(RitualSpec::sanitized).collect(),
            ..self
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducible runs.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick (0 runs as fast as possible).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Run boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of ticks before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

/// Background scan settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanConfig {
    /// Whether the scan worker runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Ticks between scans of one ritual's area (default: 100).
    #[serde(default = "default_scan_interval_ticks")]
    pub interval_ticks: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ticks: default_scan_interval_ticks(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// One ritual to activate at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RitualSpec {
    /// Which effect the ritual runs.
    pub variant: VariantKind,

    /// The ritual's anchor cell.
    pub origin: Position,

    /// Incoming strength (default: 1.0).
    #[serde(default = "default_strength")]
    pub strength: f32,

    /// Augments applied at activation.
    #[serde(default)]
    pub augments: Vec<Augment>,

    /// Ticks between dispatches (default: 1).
    #[serde(default = "default_ritual_interval")]
    pub tick_interval: u64,
}

impl RitualSpec {
    /// A full-strength ritual with no augments that acts every tick.
    pub const fn new(variant: VariantKind, origin: Position) -> Self {
        Self {
            variant,
            origin,
            strength: 1.0,
            augments: Vec::new(),
            tick_interval: 1,
        }
    }

    /// Clamp strength and cadence to usable values.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let mut spec = self;
        if !spec.strength.is_finite() || spec.strength < 0.0 {
            warn!(variant = %spec.variant, value = spec.strength, "ritual strength clamped to 0");
            spec.strength = 0.0;
        }
        if spec.tick_interval == 0 {
            warn!(variant = %spec.variant, "ritual tick_interval of 0 clamped to 1");
            spec.tick_interval = 1;
        }
        spec
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Ritual Grounds".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_true() -> bool {
    true
}

const fn default_scan_interval_ticks() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_strength() -> f32 {
    1.0
}

const fn default_ritual_interval() -> u64 {
    1
}
