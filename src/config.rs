//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/storetree/storetree.toml`
//! 3. Environment variables: `STORETREE_*` prefix

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Nodes file used when a command is invoked without an explicit path
    pub nodes_file: Option<PathBuf>,
    /// Treat recoverable hierarchy issues (dangling parents, depth drift)
    /// as failures in `check`
    pub strict: bool,
    /// Colorize warnings and errors
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nodes_file: None,
            strict: false,
            color: true,
        }
    }
}

impl Settings {
    /// Load settings with layered precedence.
    pub fn load() -> Result<Self, ApplicationError> {
        let mut builder = Config::builder();

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                builder = builder.add_source(File::from(global));
            }
        }

        builder = builder.add_source(Environment::with_prefix("STORETREE"));

        let settings = builder
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .map_err(|e| ApplicationError::OperationFailed {
                context: "loading configuration".to_string(),
                source: Box::new(e),
            })?;

        Ok(settings)
    }

    /// `$XDG_CONFIG_HOME/storetree/storetree.toml` (platform equivalent).
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "storetree")
            .map(|dirs| dirs.config_dir().join("storetree.toml"))
    }

    /// Resolve the nodes file: explicit argument wins over configuration.
    pub fn resolve_nodes_file(&self, explicit: Option<&PathBuf>) -> Option<PathBuf> {
        explicit.cloned().or_else(|| self.nodes_file.clone())
    }
}
