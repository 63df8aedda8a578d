//! Infrastructure Layer - weft
//!
//! Cross-cutting technical concerns around the interception engine.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration loading and validation |
//! | [`logging`] | tracing subscriber bootstrap |
//! | [`error_ext`] | Context helpers turning foreign errors into domain errors |
//! | [`kernel`] | Minimal container that drives the engine on every resolution |
//! | [`constants`] | File names, prefixes and defaults |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod kernel;
pub mod logging;

pub use config::{AppConfig, ConfigLoader, EngineConfig, LoggingConfig};
pub use error_ext::ErrorContext;
pub use kernel::{Kernel, ResolutionContext, Scope, ServiceBinding};
pub use logging::{init_logging, parse_log_level};
