//! Ports of the interception engine
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`Interceptor`] | Cross-cutting behaviour run around calls |
//! | [`Interceptable`] | Component types that can be proxied |
//! | [`ProxyTargetAccessor`] | Every object that may be a proxy |

pub mod interceptable;
pub mod interceptor;
pub mod proxy;

pub use interceptable::{DeclaredInterceptor, Interceptable, MemberDescriptor, TypeDescriptor};
pub use interceptor::{Interceptor, InterceptorFactory, SharedInterceptor};
pub use proxy::{ProxyTarget, ProxyTargetAccessor, is_proxy_for, unwrap_proxy};
