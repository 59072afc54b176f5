//! Codec configuration.
//!
//! [`CodecConfig`] carries everything an encoder or decoder needs to be
//! built: the finite field, the symbol size and the stream capacity.
//! [`ConfigLoader`] assembles one from layered sources, lowest precedence
//! first:
//!
//! 1. built-in defaults;
//! 2. a config file with a `[codec]` section of `key = value` lines;
//! 3. `SLIDE_RLNC_*` environment variables;
//! 4. programmatic overrides.
//!
//! ```text
//! # codec.toml
//! [codec]
//! field = "binary16"
//! symbol_size = 1400
//! stream_capacity = 256
//! ```

use crate::error::{Error, ErrorKind};
use crate::field::Field;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix of every environment variable the loader reads.
pub const ENV_PREFIX: &str = "SLIDE_RLNC_";

/// Default symbol size: one typical UDP payload.
pub const DEFAULT_SYMBOL_SIZE: usize = 1400;

/// Default number of live stream slots.
pub const DEFAULT_STREAM_CAPACITY: usize = 1024;

/// Settings shared by encoder and decoder factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Finite field used for coefficients and payload arithmetic.
    pub field: Field,
    /// Size of every symbol in bytes.
    pub symbol_size: usize,
    /// Maximum number of symbols held in a stream at once.
    pub stream_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            field: Field::default(),
            symbol_size: DEFAULT_SYMBOL_SIZE,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }
}

impl CodecConfig {
    /// Creates a config with the default stream capacity.
    #[must_use]
    pub const fn new(field: Field, symbol_size: usize) -> Self {
        Self {
            field,
            symbol_size,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
        }
    }

    /// Sets the stream capacity.
    #[must_use]
    pub const fn with_stream_capacity(mut self, stream_capacity: usize) -> Self {
        self.stream_capacity = stream_capacity;
        self
    }

    /// Checks that the settings describe a buildable codec.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol_size == 0 {
            return Err(ConfigError::InvalidSymbolSize);
        }
        if !self.field.is_aligned(self.symbol_size) {
            return Err(ConfigError::UnalignedSymbolSize {
                field: self.field,
                symbol_size: self.symbol_size,
            });
        }
        if self.stream_capacity == 0 {
            return Err(ConfigError::InvalidStreamCapacity);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading a config file.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed config file or value.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Symbol size is zero.
    #[error("symbol_size must be > 0")]
    InvalidSymbolSize,
    /// Symbol size does not hold a whole number of field elements.
    #[error("symbol_size {symbol_size} is not a whole number of {field} elements")]
    UnalignedSymbolSize {
        /// Configured field.
        field: Field,
        /// Configured symbol size.
        symbol_size: usize,
    },
    /// Stream capacity is zero.
    #[error("stream_capacity must be > 0")]
    InvalidStreamCapacity,
    /// Unknown override key.
    #[error("invalid override: {0}")]
    InvalidOverride(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        match err {
            ConfigError::InvalidSymbolSize | ConfigError::UnalignedSymbolSize { .. } => {
                Self::invalid_symbol_size(message)
            }
            ConfigError::InvalidStreamCapacity => {
                Self::new(ErrorKind::InvalidStreamCapacity).with_message(message)
            }
            ConfigError::Io(_) | ConfigError::Parse(_) | ConfigError::InvalidOverride(_) => {
                Self::new(ErrorKind::InvalidConfig).with_message(message)
            }
        }
    }
}

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base: CodecConfig,
    file_path: Option<PathBuf>,
    read_env: bool,
    overrides: BTreeMap<String, String>,
}

impl ConfigLoader {
    /// Creates a loader starting from [`CodecConfig::default`] that reads the
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: CodecConfig::default(),
            file_path: None,
            read_env: true,
            overrides: BTreeMap::new(),
        }
    }

    /// Replaces the built-in defaults.
    #[must_use]
    pub fn base(mut self, base: CodecConfig) -> Self {
        self.base = base;
        self
    }

    /// Sets a file path for config loading.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Skips the `SLIDE_RLNC_*` environment layer.
    #[must_use]
    pub fn ignore_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Adds a programmatic override (highest precedence), keyed like the
    /// environment variables, e.g. `SLIDE_RLNC_SYMBOL_SIZE`.
    #[must_use]
    pub fn override_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<CodecConfig, ConfigError> {
        let mut config = match &self.file_path {
            Some(path) => load_from_file(path, self.base)?,
            None => self.base,
        };
        if self.read_env {
            apply_overrides(
                &mut config,
                std::env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)),
            )?;
        }
        apply_overrides(
            &mut config,
            self.overrides.iter().map(|(k, v)| (k.clone(), v.clone())),
        )?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn load_from_file(path: &Path, base: CodecConfig) -> Result<CodecConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents, base)
}

fn apply_overrides(
    config: &mut CodecConfig,
    overrides: impl IntoIterator<Item = (String, String)>,
) -> Result<(), ConfigError> {
    for (key, value) in overrides {
        let short = key
            .strip_prefix(ENV_PREFIX)
            .ok_or_else(|| ConfigError::InvalidOverride(key.clone()))?
            .to_ascii_lowercase();
        if !is_codec_key(&short) {
            return Err(ConfigError::InvalidOverride(key));
        }
        apply_codec_kv(config, &short, &value)?;
    }
    Ok(())
}

fn is_codec_key(key: &str) -> bool {
    matches!(key, "field" | "symbol_size" | "stream_capacity")
}

fn parse_config(contents: &str, base: CodecConfig) -> Result<CodecConfig, ConfigError> {
    let mut config = base;
    let mut section = String::new();

    for (line_idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_lowercase();
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ConfigError::Parse(format!("line {}: {}", line_idx + 1, line)))?;
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        match section.as_str() {
            "codec" => apply_codec_kv(&mut config, key, value)?,
            "" => {
                return Err(ConfigError::Parse(format!(
                    "missing section for key: {key}"
                )))
            }
            _ => return Err(ConfigError::Parse(format!("unknown section: {section}"))),
        }
    }

    Ok(config)
}

fn apply_codec_kv(config: &mut CodecConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "field" => config.field = parse_field(value, key)?,
        "symbol_size" => config.symbol_size = parse_usize(value, key)?,
        "stream_capacity" => config.stream_capacity = parse_usize(value, key)?,
        _ => return Err(ConfigError::Parse(format!("unknown key: codec.{key}"))),
    }
    Ok(())
}

fn parse_field(value: &str, key: &str) -> Result<Field, ConfigError> {
    // Accept both names and the integer ids used across host boundaries.
    if let Ok(id) = value.parse::<i32>() {
        return Field::try_from(id).map_err(|err| ConfigError::Parse(format!("{key}: {err}")));
    }
    value
        .parse::<Field>()
        .map_err(|err| ConfigError::Parse(format!("{key}: {err}")))
}

fn parse_usize(value: &str, key: &str) -> Result<usize, ConfigError> {
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Parse(format!("{key}: invalid integer {value:?}")))
}
