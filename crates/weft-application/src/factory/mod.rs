//! Proxy Factory
//!
//! Turns a [`ProxyPlan`] and a freshly constructed target into the object
//! handed back to the container.
//!
//! | Strategy | Mechanism |
//! |----------|-----------|
//! | override | install a [`ProxyCore`] into the target's [`InterceptionSlot`] |
//! | forwarding | wrap the target in a [`ForwardingProxy`] and pass it to the contract's backend |
//!
//! Proxy types (the backend plus the intercepted member set) are cached per
//! `(implementation, service, strategy, members)` so repeated resolutions of
//! the same shape skip the backend lookup.

mod forwarding;
mod proxy_core;
mod slot;

pub use forwarding::{ForwardingBackend, ForwardingProxy};
pub use proxy_core::ProxyCore;
pub use slot::InterceptionSlot;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, ProxyStrategy, TypeKey};

use crate::planner::ProxyPlan;
use crate::ports::interceptable::Interceptable;

/// Cache key of a proxy type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyTypeKey {
    implementation: TypeKey,
    service: TypeKey,
    strategy: ProxyStrategy,
    members: Vec<MemberId>,
}

impl ProxyTypeKey {
    pub fn for_plan(plan: &ProxyPlan) -> Self {
        Self {
            implementation: plan.implementation(),
            service: plan.service(),
            strategy: plan.strategy(),
            members: plan.member_ids(),
        }
    }

    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub fn service(&self) -> TypeKey {
        self.service
    }

    pub fn strategy(&self) -> ProxyStrategy {
        self.strategy
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }
}

/// Reusable shape of a proxy
pub struct ProxyType {
    key: ProxyTypeKey,
    backend: Option<Arc<dyn Any + Send + Sync>>,
}

impl ProxyType {
    pub fn key(&self) -> &ProxyTypeKey {
        &self.key
    }

    fn backend<S: ?Sized + Send + Sync + 'static>(&self) -> Result<ForwardingBackend<S>> {
        self.backend
            .as_ref()
            .and_then(|erased| erased.downcast_ref::<ForwardingBackend<S>>())
            .cloned()
            .ok_or_else(|| Error::missing_backend(self.key.service.name()))
    }
}

impl fmt::Debug for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyType")
            .field("key", &self.key)
            .field("has_backend", &self.backend.is_some())
            .finish()
    }
}

/// Creates proxies and owns the forwarding backends
#[derive(Default)]
pub struct ProxyFactory {
    backends: DashMap<TypeKey, Arc<dyn Any + Send + Sync>>,
    proxy_types: DashMap<ProxyTypeKey, Arc<ProxyType>>,
}

impl ProxyFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the forwarding backend of service contract `S`.
    ///
    /// Replacing a backend drops every cached proxy type of `S`.
    pub fn register_backend<S, F>(&self, backend: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(ForwardingProxy<S>) -> Arc<S> + Send + Sync + 'static,
    {
        let service = TypeKey::of::<S>();
        let backend: ForwardingBackend<S> = Arc::new(backend);
        if self.backends.insert(service, Arc::new(backend)).is_some() {
            self.proxy_types.retain(|key, _| key.service != service);
        }
        debug!(%service, "registered forwarding backend");
    }

    pub fn has_backend<S: ?Sized + 'static>(&self) -> bool {
        self.backends.contains_key(&TypeKey::of::<S>())
    }

    /// Proxy type for `plan`, built on first use
    pub fn proxy_type(&self, plan: &ProxyPlan) -> Result<Arc<ProxyType>> {
        let key = ProxyTypeKey::for_plan(plan);
        if let Some(existing) = self.proxy_types.get(&key) {
            return Ok(Arc::clone(existing.value()));
        }

        let backend = match plan.strategy() {
            ProxyStrategy::Override => None,
            ProxyStrategy::Forwarding => Some(
                self.backends
                    .get(&key.service)
                    .map(|entry| Arc::clone(entry.value()))
                    .ok_or_else(|| Error::missing_backend(key.service.name()))?,
            ),
        };

        debug!(
            implementation = %key.implementation,
            service = %key.service,
            strategy = %key.strategy,
            members = key.members.len(),
            "built proxy type"
        );
        let built = Arc::new(ProxyType {
            key: key.clone(),
            backend,
        });
        let entry = self.proxy_types.entry(key).or_insert(built);
        Ok(Arc::clone(entry.value()))
    }

    /// Proxy `target` according to `plan` and return the object to deliver
    pub fn create<S, I, U>(&self, plan: &ProxyPlan, target: Arc<I>, upcast: U) -> Result<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
        I: Interceptable,
        U: FnOnce(Arc<I>) -> Arc<S>,
    {
        let proxy_type = self.proxy_type(plan)?;
        let this: Arc<dyn Any + Send + Sync> = Arc::clone(&target) as Arc<dyn Any + Send + Sync>;

        match plan.strategy() {
            ProxyStrategy::Override => {
                let slot = target.interception_slot().ok_or_else(|| {
                    Error::planning(
                        plan.implementation().name(),
                        "descriptor is overridable but the instance has no interception slot",
                    )
                })?;
                slot.install(ProxyCore::from_plan(plan), Arc::downgrade(&this))?;
                debug!(implementation = %plan.implementation(), "installed override proxy");
                Ok(upcast(target))
            }
            ProxyStrategy::Forwarding => {
                let backend = proxy_type.backend::<S>()?;
                let proxy = ForwardingProxy::new(upcast(target), this, Arc::new(ProxyCore::from_plan(plan)));
                debug!(
                    service = %plan.service(),
                    implementation = %plan.implementation(),
                    "created forwarding proxy"
                );
                Ok(backend(proxy))
            }
        }
    }

    /// Number of cached proxy types
    pub fn proxy_type_count(&self) -> usize {
        self.proxy_types.len()
    }
}

impl fmt::Debug for ProxyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("backends", &self.backends.len())
            .field("proxy_types", &self.proxy_types.len())
            .finish()
    }
}
