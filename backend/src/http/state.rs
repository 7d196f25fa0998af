//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::PipelineResult;
use crate::models::{PlotOptions, VariableCatalog};
use crate::services::format::{TimeFormatter, UtcTimeFormatter};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Variables planned by every request, in output order
    pub catalog: Arc<VariableCatalog>,
    /// Options used for fields a request leaves unset
    pub defaults: Arc<PlotOptions>,
    pub time_formatter: Arc<dyn TimeFormatter>,
}

impl AppState {
    /// State with UTC labels and no default options.
    pub fn new(catalog: VariableCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            defaults: Arc::new(PlotOptions::default()),
            time_formatter: Arc::new(UtcTimeFormatter),
        }
    }

    pub fn with_defaults(mut self, defaults: PlotOptions) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    pub fn with_time_formatter(mut self, formatter: Arc<dyn TimeFormatter>) -> Self {
        self.time_formatter = formatter;
        self
    }

    /// Build state from a loaded configuration, reading the catalog file if one is set.
    pub fn from_config(config: &ServerConfig) -> PipelineResult<Self> {
        Ok(Self::new(config.load_catalog()?)
            .with_defaults(config.defaults.clone())
            .with_time_formatter(config.time_formatter()))
    }

    /// Request options with unset fields taken from the configured defaults.
    pub fn resolve_options(&self, options: Option<PlotOptions>) -> PlotOptions {
        options.unwrap_or_default().or_defaults(&self.defaults)
    }
}
