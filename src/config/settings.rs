//! Run-wide settings resolved once from the environment.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name of the aggregated shell profile inside the config root.
pub const PROFILE_FILE: &str = "profile.ps1";

/// Paths and environment lookups shared by every task in a run.
///
/// Built once at startup and threaded through the task
/// [`Context`](crate::tasks::Context); nothing reads `USERPROFILE` or
/// `LOCALAPPDATA` behind its back.  Tests inject a temporary root and
/// variable overrides with [`Settings::new`] and [`Settings::with_var`].
#[derive(Debug, Clone)]
pub struct Settings {
    /// The user's home directory.
    pub home: PathBuf,
    /// Directory receiving `profile.ps1` and per-tool config folders.
    pub config_root: PathBuf,
    overrides: HashMap<String, String>,
}

impl Settings {
    /// Create settings for an explicit home directory with the config root
    /// at `<home>/.config`.
    #[must_use]
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let config_root = home.join(".config");
        Self {
            home,
            config_root,
            overrides: HashMap::new(),
        }
    }

    /// Resolve settings from `USERPROFILE` (falling back to `HOME`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] if neither variable is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = std::env::var_os("USERPROFILE")
            .filter(|v| !v.is_empty())
            .or_else(|| std::env::var_os("HOME").filter(|v| !v.is_empty()))
            .ok_or(ConfigError::MissingHome)?;
        Ok(Self::new(PathBuf::from(home)))
    }

    /// Replace the config root (e.g. from `--config-root`).
    #[must_use]
    pub fn with_config_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config_root = root.into();
        self
    }

    /// Override an environment variable for lookups made through [`Settings::var`].
    #[must_use]
    pub fn with_var(mut self, name: &str, value: impl Into<String>) -> Self {
        self.overrides.insert(name.to_string(), value.into());
        self
    }

    /// Look up an environment variable, preferring injected overrides.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<String> {
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
            .filter(|v| !v.is_empty())
    }

    /// Resolve an environment variable to a directory path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] if the variable is unset or empty.
    pub fn dir_from_var(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.var(name)
            .map(PathBuf::from)
            .ok_or_else(|| ConfigError::MissingVariable(name.to_string()))
    }

    /// The local application data directory (`LOCALAPPDATA`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] if `LOCALAPPDATA` is unset.
    pub fn local_app_data(&self) -> Result<PathBuf, ConfigError> {
        self.dir_from_var("LOCALAPPDATA")
    }

    /// Path of the aggregated shell profile, `<config root>/profile.ps1`.
    #[must_use]
    pub fn profile_path(&self) -> PathBuf {
        self.config_root.join(PROFILE_FILE)
    }

    /// Resolve a path relative to the config root.
    #[must_use]
    pub fn in_config_root(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config_root.join(relative)
    }
}
