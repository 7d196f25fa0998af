//! Server configuration file support.
//!
//! Settings come from a `veplot.toml` file, then environment variables:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [catalog]
//! path = "catalog.toml"
//!
//! [defaults]
//! maxgap = 3600000
//!
//! [format]
//! timezone = "utc"
//! ```
//!
//! `VEPLOT_CONFIG` names the file explicitly; otherwise the standard locations
//! are searched and a missing file means built-in defaults. `HOST`, `PORT` and
//! `VEPLOT_CATALOG` override the matching file settings.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{PlotOptions, VariableCatalog};
use crate::services::format::{LocalTimeFormatter, TimeFormatter, UtcTimeFormatter};

pub const CONFIG_ENV: &str = "VEPLOT_CONFIG";
pub const CATALOG_ENV: &str = "VEPLOT_CATALOG";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Locations tried, in order, when `VEPLOT_CONFIG` is unset.
pub const DEFAULT_SEARCH_PATHS: [&str; 3] = ["veplot.toml", "backend/veplot.toml", "../veplot.toml"];

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    /// Options applied to requests that leave them unset.
    #[serde(default)]
    pub defaults: PlotOptions,
    #[serde(default)]
    pub format: FormatSettings,
}

/// Listen address settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Catalog source; the built-in VE.Direct table when no path is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZoneSetting {
    #[default]
    Utc,
    Local,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSettings {
    #[serde(default)]
    pub timezone: TimeZoneSetting,
}

impl ServerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;

        // Relative catalog paths are resolved against the config file.
        if let (Some(catalog), Some(dir)) = (config.catalog.path.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        Ok(config)
    }

    /// Load the first configuration file that exists among `paths`.
    ///
    /// Returns `Ok(None)` when none of them exist.
    pub fn from_search_paths<P: AsRef<Path>>(paths: &[P]) -> PipelineResult<Option<Self>> {
        for path in paths.iter().map(AsRef::as_ref) {
            if path.exists() {
                debug!("Using config file {}", path.display());
                return Self::from_file(path).map(Some);
            }
        }
        Ok(None)
    }

    /// Load configuration using the process environment.
    pub fn load() -> PipelineResult<Self> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Load configuration reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => match Self::from_search_paths(&DEFAULT_SEARCH_PATHS)? {
                Some(config) => config,
                None => {
                    info!("No veplot.toml found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `VEPLOT_CATALOG` on top of file settings.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> PipelineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|e| {
                PipelineError::Config(format!("Invalid {} '{}': {}", PORT_ENV, port, e))
            })?;
        }
        if let Some(path) = lookup(CATALOG_ENV) {
            self.catalog.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The configured catalog, or the built-in one when no path is set.
    pub fn load_catalog(&self) -> PipelineResult<VariableCatalog> {
        match &self.catalog.path {
            Some(path) => {
                let catalog = VariableCatalog::from_file(path)?;
                info!("Loaded {} variables from {}", catalog.len(), path.display());
                Ok(catalog)
            }
            None => Ok(VariableCatalog::ve_direct()),
        }
    }

    pub fn time_formatter(&self) -> Arc<dyn TimeFormatter> {
        match self.format.timezone {
            TimeZoneSetting::Utc => Arc::new(UtcTimeFormatter),
            TimeZoneSetting::Local => Arc::new(LocalTimeFormatter),
        }
    }
}
