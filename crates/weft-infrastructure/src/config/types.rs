//! Configuration data types

use serde::{Deserialize, Serialize};
use weft_application::EngineOptions;
use weft_domain::constants::DEFAULT_MAX_CACHED_PLANS;

use crate::constants::DEFAULT_LOG_LEVEL;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Interception engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reuse proxy plans between resolutions of the same shape
    pub cache_plans: bool,
    /// Plan cache bound; 0 disables the bound
    pub max_cached_plans: usize,
    /// Collapse repeated handles of one interceptor in a chain
    pub deduplicate_interceptors: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_plans: true,
            max_cached_plans: DEFAULT_MAX_CACHED_PLANS,
            deduplicate_interceptors: false,
        }
    }
}

impl EngineConfig {
    pub fn to_options(&self) -> EngineOptions {
        EngineOptions {
            cache_plans: self.cache_plans,
            max_cached_plans: self.max_cached_plans,
            deduplicate_interceptors: self.deduplicate_interceptors,
        }
    }
}

impl From<&EngineConfig> for EngineOptions {
    fn from(config: &EngineConfig) -> Self {
        config.to_options()
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level; `WEFT_LOG` overrides it at startup
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}
