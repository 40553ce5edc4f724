//! Configuration management for fact extraction
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (stpa.toml)
//! - Environment variables (STPA_*)
//!
//! ## Example config file (stpa.toml):
//! ```toml
//! [project]
//! dir = "GCAP_NTP241_UNINA"
//! diagram = "[HCS] Hierarchical Control Structure Diagram"
//! output = "interactions.pl"
//!
//! [plugins]
//! required = ["com.thalesgroup.mde.capella.stpa", "org.polarsys.capella.cybersecurity"]
//! check = true
//!
//! [database]
//! path = "knowledge.db"
//! busy_timeout_ms = 5000
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Main configuration for an extraction run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Project location and output settings
    #[serde(default)]
    pub project: ProjectConfig,

    /// Plugin precondition settings
    #[serde(default)]
    pub plugins: PluginConfig,

    /// Knowledge store settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Directory holding `<name>.afm` and `<name>.aird`
    #[serde(default = "default_project_dir")]
    pub dir: PathBuf,

    /// Display name of the control structure diagram
    #[serde(default = "default_diagram")]
    pub diagram: String,

    /// Fact file to (re)write
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

/// Plugin precondition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Viewpoint identifiers that must be registered in the AFM document
    #[serde(default = "default_required_plugins")]
    pub required: Vec<String>,

    /// Whether to run the check at all
    #[serde(default = "default_true")]
    pub check: bool,
}

/// Knowledge store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file. Enrichment is skipped when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long to wait on a locked database
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

// Default value functions
fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_diagram() -> String {
    "[HCS] Hierarchical Control Structure Diagram".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("interactions.pl")
}

fn default_required_plugins() -> Vec<String> {
    vec![
        "com.thalesgroup.mde.capella.stpa".to_string(),
        "org.polarsys.capella.cybersecurity".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            dir: default_project_dir(),
            diagram: default_diagram(),
            output: default_output(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            required: default_required_plugins(),
            check: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl ExtractConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["stpa.toml", ".stpa.toml", "config/stpa.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "stpa", "stpa-facts") {
            let xdg_config = config_dir.config_dir().join("stpa.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (STPA_*)
        builder = builder.add_source(
            Environment::with_prefix("STPA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> std::io::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
