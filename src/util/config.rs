//! Configuration file support for quay.
//!
//! quay supports two configuration file locations:
//! - Global: `~/.quay/config.toml` - User-wide defaults
//! - Root: `<root>/.quay/config.toml` - Overrides for one quay root
//!
//! Root config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// quay configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Triplet used when a spec names none (e.g. "x64-windows")
    pub default_triplet: Option<String>,

    /// Show build tool output and debug logging (None = off)
    pub debug: Option<bool>,

    /// Path to cmake (None = search PATH)
    pub cmake: Option<PathBuf>,

    /// Extra environment variables passed to every build
    pub env: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.default_triplet.is_some() {
            self.build.default_triplet = other.build.default_triplet;
        }
        if other.build.debug.is_some() {
            self.build.debug = other.build.debug;
        }
        if other.build.cmake.is_some() {
            self.build.cmake = other.build.cmake;
        }
        // Environment merges per variable
        self.build.env.extend(other.build.env);
    }
}

/// Load merged configuration from global and root locations.
///
/// Order of precedence (highest to lowest):
/// 1. Root config (<root>/.quay/config.toml)
/// 2. Global config (~/.quay/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, root_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(root_path));

    config
}

/// Get the global quay config directory (~/.quay).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".quay"))
}

/// Get the global config path (~/.quay/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the root-local config path (<root>/.quay/config.toml).
pub fn root_config_path(root: &Path) -> PathBuf {
    root.join(".quay").join("config.toml")
}
