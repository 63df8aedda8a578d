//! Proxy marker capability
//!
//! Code that must reach the real object behind a proxy (disposal, identity
//! checks) asks through [`ProxyTargetAccessor`]. The trait is object safe so
//! service contracts can list it as a supertrait.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use weft_domain::value_objects::{ProxyStrategy, TypeKey};

/// Handle to the object wrapped by a proxy
#[derive(Clone)]
pub struct ProxyTarget {
    service: TypeKey,
    implementation: TypeKey,
    strategy: ProxyStrategy,
    target: Arc<dyn Any + Send + Sync>,
}

impl ProxyTarget {
    pub fn new(
        service: TypeKey,
        implementation: TypeKey,
        strategy: ProxyStrategy,
        target: Arc<dyn Any + Send + Sync>,
    ) -> Self {
        Self {
            service,
            implementation,
            strategy,
            target,
        }
    }

    /// Service the proxy was created for
    pub fn service(&self) -> TypeKey {
        self.service
    }

    /// Concrete type of the wrapped target
    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub fn strategy(&self) -> ProxyStrategy {
        self.strategy
    }

    /// Whether the proxy stands in for `X`, as service or as implementation
    pub fn is_proxy_for<X: ?Sized + 'static>(&self) -> bool {
        self.service.is::<X>() || self.implementation.is::<X>()
    }

    /// The wrapped target as its concrete type
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.target).downcast::<T>().ok()
    }

    /// The wrapped target, type erased
    pub fn target(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.target
    }
}

impl fmt::Debug for ProxyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyTarget")
            .field("service", &self.service)
            .field("implementation", &self.implementation)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// "Am I a proxy, and for what?"
///
/// Plain types implement it with an empty `impl` block. Override-based
/// proxies answer through their interception slot, forwarding proxies
/// through [`ForwardingProxy::proxy_target`](crate::factory::ForwardingProxy::proxy_target).
pub trait ProxyTargetAccessor {
    fn proxy_target(&self) -> Option<ProxyTarget> {
        None
    }

    fn is_proxy(&self) -> bool {
        self.proxy_target().is_some()
    }
}

/// Whether `object` is a proxy standing in for `X`
pub fn is_proxy_for<X, P>(object: &P) -> bool
where
    X: ?Sized + 'static,
    P: ProxyTargetAccessor + ?Sized,
{
    object
        .proxy_target()
        .is_some_and(|target| target.is_proxy_for::<X>())
}

/// The real `T` behind `object`, when `object` is a proxy wrapping one
pub fn unwrap_proxy<T, P>(object: &P) -> Option<Arc<T>>
where
    T: Send + Sync + 'static,
    P: ProxyTargetAccessor + ?Sized,
{
    object.proxy_target()?.downcast::<T>()
}
