//! Configuration
//!
//! Layered with figment, later layers overriding earlier ones:
//!
//! 1. [`AppConfig::default`]
//! 2. `weft.toml` (explicit path, working directory, or user config dir)
//! 3. `WEFT__`-prefixed environment variables, nested on `__`

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, EngineConfig, LoggingConfig};
