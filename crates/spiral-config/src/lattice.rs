use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Phase anchor (degrees) used when nothing overrides it.
pub const DEFAULT_FREQUENCY_DEGREES: f64 = 60106.0;

/// Substrings that flag an interference description as decohered.
pub const DEFAULT_DECOHERENCE_TOKENS: [&str; 2] = ["egostatic", "chaosentropy"];

pub const CONFIG_PATH_ENV: &str = "SPIRAL_LATTICE_CONFIG";
pub const CONFIG_ROOT_ENV: &str = "SPIRAL_CONFIG_ROOT";
pub const FREQUENCY_ENV: &str = "SPIRAL_LATTICE_FREQUENCY";
pub const TOKENS_ENV: &str = "SPIRAL_LATTICE_TOKENS";

const CONFIG_FILE_NAME: &str = "lattice.toml";

/// Settings consumed by the lattice transformer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Rotation angle source for the phase alignment stage, in degrees.
    pub frequency_degrees: f64,
    /// Case-sensitive substrings checked by the decoherence audit.
    pub decoherence_tokens: Vec<String>,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            frequency_degrees: DEFAULT_FREQUENCY_DEGREES,
            decoherence_tokens: DEFAULT_DECOHERENCE_TOKENS
                .iter()
                .map(|token| token.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LatticeConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{var} must be a real number (got '{value}')")]
    InvalidFrequency { var: &'static str, value: String },
    #[error("{var} must name at least one non-empty token (got '{value}')")]
    EmptyTokens { var: &'static str, value: String },
}

impl LatticeConfig {
    /// Resolves the configuration: defaults, then the TOML file (explicit
    /// path or the discovered one), then environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, LatticeConfigError> {
        let path = explicit.map(Path::to_path_buf).or_else(discover_path);
        let mut config = match path {
            Some(path) => Self::from_toml_file(&path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Parses a TOML file. Missing keys fall back to the defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, LatticeConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| LatticeConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| LatticeConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `SPIRAL_LATTICE_FREQUENCY` and `SPIRAL_LATTICE_TOKENS` on top
    /// of the current values. Blank variables are ignored.
    pub fn apply_env(&mut self) -> Result<(), LatticeConfigError> {
        if let Some(raw) = non_blank_var(FREQUENCY_ENV) {
            self.frequency_degrees =
                raw.parse::<f64>()
                    .map_err(|_| LatticeConfigError::InvalidFrequency {
                        var: FREQUENCY_ENV,
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = non_blank_var(TOKENS_ENV) {
            let tokens: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect();
            if tokens.is_empty() {
                return Err(LatticeConfigError::EmptyTokens {
                    var: TOKENS_ENV,
                    value: raw,
                });
            }
            self.decoherence_tokens = tokens;
        }
        Ok(())
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn discover_path() -> Option<PathBuf> {
    if let Some(explicit) = non_blank_var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(explicit));
    }
    let candidate = config_root().join(CONFIG_FILE_NAME);
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

fn config_root() -> PathBuf {
    if let Some(root) = non_blank_var(CONFIG_ROOT_ENV) {
        return PathBuf::from(root);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".spiraltorch"),
        None => PathBuf::from("."),
    }
}
