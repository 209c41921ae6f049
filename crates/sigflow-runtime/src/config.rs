//! Engine configuration – reads/writes `sigflow.toml`.
//!
//! ```toml
//! [window]
//! frame = "0.5s"
//! delta = "100ms"
//! call_enter = true
//!
//! [signal]
//! sample_rate = 200.0
//! duration = 10.0
//! waveform = "sine"
//! frequencies = [2.0, 7.5]
//! amplitudes = [1.0, 0.25]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sigflow_signal::DriverOptions;
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading or saving a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// How a stage cuts its input into windows.
///
/// Sizes use the sample-size syntax: `"512"`, `"0.5s"`, `"20ms"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WindowConfig {
    /// Frame step; `"0"` processes the whole stream at once.
    pub frame: String,
    /// Look-ahead appended to every frame.
    pub delta: String,
    /// Left context; selects the context-padded transform when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_left: Option<String>,
    /// Right context; selects the context-padded transform when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_right: Option<String>,
    pub call_enter: bool,
    pub call_flush: bool,
    pub copy_input: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            frame: "1s".to_string(),
            delta: "0".to_string(),
            context_left: None,
            context_right: None,
            call_enter: true,
            call_flush: true,
            copy_input: false,
        }
    }
}

impl WindowConfig {
    /// Lifecycle switches for the drivers.
    pub fn options(&self) -> DriverOptions {
        DriverOptions {
            call_enter: self.call_enter,
            call_flush: self.call_flush,
            copy_input: self.copy_input,
        }
    }

    /// `true` when either context length is configured.
    pub fn uses_context(&self) -> bool {
        self.context_left.is_some() || self.context_right.is_some()
    }
}

/// Waveform of the synthetic source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Cosine,
    /// Uniform noise in `[0, 1)`; frequencies only set the dimension count.
    Noise,
}

/// Synthetic test signal: one oscillator per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SignalConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Time of the first sample in seconds.
    pub offset: f32,
    pub waveform: Waveform,
    /// Frequency in Hz of each dimension.
    pub frequencies: Vec<f64>,
    /// Amplitude of each dimension.
    pub amplitudes: Vec<f32>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sample_rate: 100.0,
            duration: 10.0,
            offset: 0.0,
            waveform: Waveform::Sine,
            frequencies: vec![1.0],
            amplitudes: vec![1.0],
        }
    }
}

impl SignalConfig {
    /// Number of dimensions the signal will have.
    pub fn dims(&self) -> usize {
        self.frequencies.len()
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub signal: SignalConfig,
}

impl EngineConfig {
    /// Reject values no stage could run with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let signal = &self.signal;
        if !(signal.sample_rate.is_finite() && signal.sample_rate >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "signal.sample_rate must be a non-negative number, got {}",
                signal.sample_rate
            )));
        }
        if signal.frequencies.is_empty() {
            return Err(ConfigError::Invalid(
                "signal.frequencies needs at least one entry".to_string(),
            ));
        }
        if signal.frequencies.len() != signal.amplitudes.len() {
            return Err(ConfigError::Invalid(format!(
                "signal.frequencies has {} entries but signal.amplitudes has {}",
                signal.frequencies.len(),
                signal.amplitudes.len()
            )));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Loading and saving
// ────────────────────────────────────────────────────────────────────────────

/// Default location: `./sigflow.toml`.
pub fn config_path() -> PathBuf {
    PathBuf::from("sigflow.toml")
}

/// Load the config from `path`.  Returns `None` if the file does not exist.
///
/// `SIGFLOW_*` environment overrides are applied after parsing.
///
/// # Errors
///
/// [`ConfigError::Read`], [`ConfigError::Parse`] or [`ConfigError::Invalid`].
pub fn load_from(path: &Path) -> Result<Option<EngineConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cfg: EngineConfig = toml::from_str(&raw)?;
    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(Some(cfg))
}

/// Apply `SIGFLOW_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `SIGFLOW_FRAME` | `window.frame` |
/// | `SIGFLOW_DELTA` | `window.delta` |
/// | `SIGFLOW_SAMPLE_RATE` | `signal.sample_rate` |
pub fn apply_env_overrides(cfg: &mut EngineConfig) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

fn apply_overrides(cfg: &mut EngineConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SIGFLOW_FRAME") {
        cfg.window.frame = v;
    }
    if let Some(v) = lookup("SIGFLOW_DELTA") {
        cfg.window.delta = v;
    }
    if let Some(v) = lookup("SIGFLOW_SAMPLE_RATE") {
        match v.parse::<f64>() {
            Ok(rate) => cfg.signal.sample_rate = rate,
            Err(_) => warn!(value = %v, "ignoring unparsable SIGFLOW_SAMPLE_RATE"),
        }
    }
}

/// Save the config to `path` as pretty TOML, creating parent directories.
///
/// # Errors
///
/// [`ConfigError::Serialize`] or [`ConfigError::Write`].
pub fn save_to(cfg: &EngineConfig, path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let raw = toml::to_string_pretty(cfg)?;
    fs::write(path, raw).map_err(write_err)
}

/// JSON schema of [`EngineConfig`], pretty-printed.
///
/// # Errors
///
/// Only if the schema cannot be rendered as JSON.
pub fn json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(EngineConfig))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("nested").join("sigflow.toml");

        save_to(&EngineConfig::default(), &path).expect("save");
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.window.delta, "0");
        assert!(loaded.window.call_enter);
        assert!(!loaded.window.copy_input);
        assert_eq!(loaded.signal.waveform, Waveform::Sine);
        assert_eq!(loaded.signal.dims(), 1);
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let result = load_from(&dir.path().join("absent.toml")).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: EngineConfig = toml::from_str(
            r#"
            [window]
            frame = "20ms"
            context_left = "3"

            [signal]
            frequencies = [2.0, 3.0]
            amplitudes = [1.0, 0.5]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.window.frame, "20ms");
        assert!(cfg.window.uses_context());
        assert!(cfg.window.call_flush);
        assert_eq!(cfg.signal.sample_rate, 100.0);
        assert_eq!(cfg.signal.dims(), 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn mismatched_oscillators_are_invalid() {
        let mut cfg = EngineConfig::default();
        cfg.signal.amplitudes.push(2.0);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("amplitudes has 2"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("sigflow.toml");
        fs::write(&path, "[window\nframe = ").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_window_and_rate() {
        let vars = HashMap::from([
            ("SIGFLOW_FRAME", "256"),
            ("SIGFLOW_DELTA", "0.1s"),
            ("SIGFLOW_SAMPLE_RATE", "16000"),
        ]);
        let mut cfg = EngineConfig::default();
        apply_overrides(&mut cfg, |key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(cfg.window.frame, "256");
        assert_eq!(cfg.window.delta, "0.1s");
        assert_eq!(cfg.signal.sample_rate, 16000.0);
    }

    #[test]
    fn unparsable_rate_override_is_ignored() {
        let mut cfg = EngineConfig::default();
        apply_overrides(&mut cfg, |key| {
            (key == "SIGFLOW_SAMPLE_RATE").then(|| "fast".to_string())
        });
        assert_eq!(cfg.signal.sample_rate, 100.0);
    }

    #[test]
    fn window_options_follow_flags() {
        let window = WindowConfig {
            call_flush: false,
            copy_input: true,
            ..Default::default()
        };
        let options = window.options();
        assert!(options.call_enter);
        assert!(!options.call_flush);
        assert!(options.copy_input);
        assert!(!window.uses_context());
    }

    #[test]
    fn schema_names_both_sections() {
        let schema = json_schema().unwrap();
        assert!(schema.contains("\"window\""));
        assert!(schema.contains("\"signal\""));
        assert!(schema.contains("context_left"));
    }
}
