//! Infrastructure constants

// ============================================================================
// Configuration Constants
// ============================================================================

/// Environment variable prefix; nested keys are separated by `__`
/// (`WEFT__ENGINE__CACHE_PLANS=false`)
pub const CONFIG_ENV_PREFIX: &str = "WEFT";

/// Separator between the prefix and nested configuration keys
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILENAME: &str = "weft.toml";

/// Directory under the user config dir holding [`DEFAULT_CONFIG_FILENAME`]
pub const DEFAULT_CONFIG_DIR: &str = "weft";

// ============================================================================
// Logging Constants
// ============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding an `EnvFilter` directive that overrides the
/// configured level
pub const LOG_ENV_VAR: &str = "WEFT_LOG";
