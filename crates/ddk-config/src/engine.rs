use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Every pointer [`EngineConfig::from_config_json`] reads. Keep in sync with
/// the reads below; [`crate::report_unused_keys`] trusts this list.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/holidays/cache_capacity",
    "/templates/include_builtin",
    "/templates/paths",
];

const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Typed view of the settings the engine and CLI act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Resident years in the holiday cache; 0 disables caching.
    pub cache_capacity: usize,
    pub include_builtin_templates: bool,
    /// Extra template files, in listing order.
    pub template_paths: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            include_builtin_templates: true,
            template_paths: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Missing keys take their defaults; present keys of the wrong type are
    /// errors.
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let defaults = Self::default();

        let cache_capacity = match cfg.pointer("/holidays/cache_capacity") {
            None | Some(Value::Null) => defaults.cache_capacity,
            Some(v) => {
                let n = v.as_u64().ok_or_else(|| {
                    anyhow!("holidays.cache_capacity must be a non-negative integer (got {v})")
                })?;
                usize::try_from(n)
                    .map_err(|_| anyhow!("holidays.cache_capacity too large: {n}"))?
            }
        };

        let include_builtin_templates = match cfg.pointer("/templates/include_builtin") {
            None | Some(Value::Null) => defaults.include_builtin_templates,
            Some(Value::Bool(b)) => *b,
            Some(v) => bail!("templates.include_builtin must be a boolean (got {v})"),
        };

        let template_paths = match cfg.pointer("/templates/paths") {
            None | Some(Value::Null) => defaults.template_paths,
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    v.as_str()
                        .filter(|s| !s.trim().is_empty())
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow!("templates.paths[{i}] must be a non-empty string"))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(v) => bail!("templates.paths must be a list of file paths (got {v})"),
        };

        Ok(Self {
            cache_capacity,
            include_builtin_templates,
            template_paths,
        })
    }
}
