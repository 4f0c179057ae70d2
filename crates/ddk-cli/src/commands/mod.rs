//! Command handler modules for ddk.
//!
//! Shared setup (config resolution, calendar construction) lives here.
//! Command-specific logic lives in the submodules.

pub mod business;
pub mod holidays;
pub mod templates;

use anyhow::Result;
use ddk_calendar::{BusinessDays, HolidayCalendar};
use ddk_config::{EngineConfig, UnusedKeyPolicy};
use std::sync::Arc;
use tracing::{debug, warn};

/// Env-var fallback for `--config`, comma-separated.
pub const ENV_CONFIG_PATHS: &str = "DDK_CONFIG";

// ---------------------------------------------------------------------------
// Shared context
// ---------------------------------------------------------------------------

/// Everything a command needs, built once per invocation.
pub struct Context {
    pub config: EngineConfig,
    pub calendar: Arc<HolidayCalendar>,
}

impl Context {
    /// Load config layers from `--config`, else `DDK_CONFIG`, else defaults.
    pub fn load(cli_paths: &[String]) -> Result<Self> {
        let paths = config_paths(cli_paths, std::env::var(ENV_CONFIG_PATHS).ok());

        let config = if paths.is_empty() {
            EngineConfig::default()
        } else {
            let loaded = ddk_config::load_layered_yaml(&paths)?;
            let report = ddk_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
            for key in &report.unused_leaf_pointers {
                warn!(key = %key, "unused config key");
            }
            debug!(config_hash = %loaded.config_hash, layers = paths.len(), "config loaded");
            EngineConfig::from_config_json(&loaded.config_json)?
        };

        let calendar = Arc::new(HolidayCalendar::with_cache_capacity(config.cache_capacity));
        Ok(Self { config, calendar })
    }

    pub fn business_days(&self) -> BusinessDays {
        BusinessDays::new(self.calendar.clone())
    }
}

/// `--config` wins over the env var; blank env entries are ignored.
fn config_paths(cli_paths: &[String], env_value: Option<String>) -> Vec<String> {
    if !cli_paths.is_empty() {
        return cli_paths.to_vec();
    }
    env_value
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
