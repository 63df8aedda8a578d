//! # weft
//!
//! Method interception for objects managed by a dependency-injection
//! container. Interceptors are bound to members, to whole resolutions, or
//! declared on the members themselves; every resolved instance that matches
//! is handed out as a proxy running the interceptor chain around each call.
//!
//! ## Example
//!
//! ```ignore
//! use weft::prelude::*;
//!
//! let mut kernel = Kernel::new();
//! kernel.bind(ServiceBinding::<Account>::to_self(|_| Ok(Account::default())))?;
//! kernel.intercept_before::<Account, _>(MemberId::method::<Account>("withdraw"), |invocation| {
//!     tracing::info!(member = %invocation.member(), "withdrawing");
//! })?;
//!
//! let account = kernel.get::<Account>()?;
//! assert!(account.is_proxy());
//! ```
//!
//! ## Architecture
//!
//! - `domain` - errors and value objects (type keys, member identities, request metadata)
//! - `application` - binding registry, planner, proxy factory, invocation pipeline and engine
//! - `infrastructure` - configuration, logging and the `Kernel` container

/// Domain layer - errors and value objects
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use weft_domain::*;
}

/// Application layer - the interception engine
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use weft_application::*;
}

/// Infrastructure layer - configuration, logging and the kernel
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use weft_infrastructure::*;
}

pub use weft_application::{InterceptionEngine, Interceptor, InterceptorFactory, Invocation};
pub use weft_domain::{Error, Result};
pub use weft_infrastructure::{Kernel, ServiceBinding};

/// Everything a component author and a container user normally import
pub mod prelude {
    pub use weft_application::interceptors::{LogLevel, LoggingInterceptor, StatisticsInterceptor};
    pub use weft_application::{
        Arguments, EngineOptions, ForwardingProxy, InterceptionEngine, InterceptionSlot, Interceptable,
        Interceptor, InterceptorFactory, Invocation, MemberDescriptor, ProxyTarget, ProxyTargetAccessor,
        SharedInterceptor, TypeDescriptor, is_proxy_for, unwrap_proxy,
    };
    pub use weft_domain::{Error, MemberId, ProxyStrategy, RequestMetadata, Result, TypeKey};
    pub use weft_infrastructure::{
        AppConfig, ConfigLoader, Kernel, ResolutionContext, Scope, ServiceBinding, init_logging,
    };
}
