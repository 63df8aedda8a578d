//! Application Layer - weft
//!
//! Implements the interception engine on top of the domain value objects.
//!
//! ## Architecture
//!
//! - [`ports`]: contracts component types and interceptors implement
//! - [`registry`]: interceptor bindings and their matching rules
//! - [`planner`]: decides whether and how a resolved object is proxied
//! - [`factory`]: builds proxies (override slot or forwarding wrapper)
//! - [`pipeline`]: runs an interceptor chain around one call
//! - [`adapters`]: before / after / replace / around conveniences
//! - [`engine`]: the container-facing `notify_resolved` entry point
//! - [`interceptors`]: ready-made logging and statistics interceptors
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `weft-domain`: errors and value objects
//! - `tracing`, `dashmap` and `once_cell`

pub mod adapters;
pub mod engine;
pub mod factory;
pub mod interceptors;
pub mod pipeline;
pub mod planner;
pub mod ports;
pub mod registry;

pub use adapters::{AfterInterceptor, AroundInterceptor, BeforeInterceptor, ReplaceInterceptor};
pub use engine::{EngineOptions, InterceptionEngine};
pub use factory::{ForwardingProxy, InterceptionSlot, ProxyFactory};
pub use pipeline::{Arguments, Invocation};
pub use planner::{ProxyPlan, ProxyPlanner};
pub use ports::*;
pub use registry::{BindingId, BindingRegistry, BindingRule};
