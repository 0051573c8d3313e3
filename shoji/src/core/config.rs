use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{IgnoreList, TILE_LAYOUT};

const DEFAULT_WORKSPACE_COUNT: usize = 9;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("at least one workspace must be configured")]
    NoWorkspaces,
    #[error("starting workspace {starting} is out of range (1-{count})")]
    StartingWorkspaceOutOfRange { starting: u32, count: usize },
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Window manager configuration, read from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Workspace displayed at startup (1-based).
    pub starting_workspace: u32,
    pub workspaces: Vec<WorkspaceConfig>,
    pub subclassing: SubclassingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_layout")]
    pub layout: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubclassingConfig {
    pub ignore: Vec<IgnoreRuleConfig>,
}

/// (class name, caption) regular expressions of windows that are never subclassed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreRuleConfig {
    pub class_name: String,
    pub caption: String,
}

fn default_layout() -> String {
    TILE_LAYOUT.to_string()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            name: None,
            layout: default_layout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_workspace: 1,
            workspaces: vec![WorkspaceConfig::default(); DEFAULT_WORKSPACE_COUNT],
            subclassing: SubclassingConfig::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("shoji").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("shoji.toml"))
    }

    /// Load the config from `path`, or from the default location.
    /// A missing file at the default location falls back to the defaults;
    /// a missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !explicit && !config_path.exists() {
            tracing::info!("Config not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspaces.is_empty() {
            return Err(ConfigError::NoWorkspaces);
        }
        if self.starting_workspace == 0 || self.starting_workspace as usize > self.workspaces.len()
        {
            return Err(ConfigError::StartingWorkspaceOutOfRange {
                starting: self.starting_workspace,
                count: self.workspaces.len(),
            });
        }
        self.ignore_list()?;
        Ok(())
    }

    pub fn workspace_count(&self) -> usize {
        self.workspaces.len()
    }

    pub fn ignore_list(&self) -> Result<IgnoreList, ConfigError> {
        IgnoreList::from_config(&self.subclassing.ignore)
    }
}
