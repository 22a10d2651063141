//! Configuration for the transect tool.
//!
//! Supports YAML configuration with precedence: CLI > ENV > file > defaults.
//! The CLI layer is applied by the binary on top of [`Config::resolve`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`Config::workspace`].
pub const ENV_WORKSPACE: &str = "TRUENO_TRANSECT_WORKSPACE";
/// Environment variable overriding [`Config::project`].
pub const ENV_PROJECT: &str = "TRUENO_TRANSECT_PROJECT";
/// Environment variable overriding [`OutputConfig::overwrite`].
pub const ENV_OVERWRITE: &str = "TRUENO_TRANSECT_OVERWRITE";

/// Output layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Replace an existing output layer instead of failing.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_overwrite() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overwrite: default_overwrite(),
        }
    }
}

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Reject rings that are not true rectangles.
    #[serde(default)]
    pub strict: bool,

    /// Relative tolerance for the strict check.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_tolerance() -> f64 {
    1e-6
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strict: false,
            tolerance: default_tolerance(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding the GeoJSON layers.
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Project file the output layer is registered into.
    #[serde(default)]
    pub project: Option<PathBuf>,

    /// Output layer settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Generation settings.
    #[serde(default)]
    pub generation: GenerationConfig,
}

fn default_version() -> u32 {
    1
}
fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace: default_workspace(),
            project: None,
            output: OutputConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/trueno-transect/config.yaml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trueno-transect/config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::from_yaml(&e))
    }

    /// Loads configuration with fallback to defaults.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is still an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// File (explicit path or the default location), then process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, any file does not
    /// parse, or an environment override is malformed.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) => Self::load_or_default(path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a boolean override is not a recognized value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(workspace) = lookup(ENV_WORKSPACE) {
            self.workspace = PathBuf::from(workspace);
        }
        if let Some(project) = lookup(ENV_PROJECT) {
            self.project = Some(PathBuf::from(project));
        }
        if let Some(value) = lookup(ENV_OVERWRITE) {
            self.output.overwrite = parse_bool(ENV_OVERWRITE, &value)?;
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::ConfigParse {
            line: 0,
            message: format!("{key}: expected a boolean, got '{value}'"),
        }),
    }
}
