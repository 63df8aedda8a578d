//! Interception engine
//!
//! The single entry point a container talks to. For every resolved instance
//! the container calls [`InterceptionEngine::notify_resolved`] exactly once
//! and delivers whatever comes back.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use weft_domain::constants::{DEFAULT_MAX_CACHED_PLANS, UNBOUNDED_PLAN_CACHE};
use weft_domain::error::Result;
use weft_domain::value_objects::{RequestMetadata, TypeKey};

use crate::factory::{ForwardingProxy, ProxyFactory};
use crate::planner::{ProxyPlan, ProxyPlanner};
use crate::ports::interceptable::{Interceptable, TypeDescriptor};
use crate::registry::BindingRegistry;

/// Engine tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Reuse plans for identical requests until the registry changes
    pub cache_plans: bool,
    /// Stop caching new plans beyond this many; 0 means unbounded
    pub max_cached_plans: usize,
    /// Collapse repeated handles of one interceptor factory in a chain
    pub deduplicate_interceptors: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_plans: true,
            max_cached_plans: DEFAULT_MAX_CACHED_PLANS,
            deduplicate_interceptors: false,
        }
    }
}

/// Registry, planner and factory wired together
#[derive(Debug)]
pub struct InterceptionEngine {
    registry: BindingRegistry,
    planner: ProxyPlanner,
    factory: ProxyFactory,
    descriptors: DashMap<TypeKey, Arc<TypeDescriptor>>,
    // `None` records "nothing matched" so unproxied types stay cheap
    plans: DashMap<RequestMetadata, Option<Arc<ProxyPlan>>>,
    options: EngineOptions,
}

impl Default for InterceptionEngine {
    fn default() -> Self {
        Self::with_options(EngineOptions::default())
    }
}

impl InterceptionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            registry: BindingRegistry::new().with_deduplication(options.deduplicate_interceptors),
            planner: ProxyPlanner::new(),
            factory: ProxyFactory::new(),
            descriptors: DashMap::new(),
            plans: DashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Mutable registry access; invalidates every cached plan
    pub fn registry_mut(&mut self) -> &mut BindingRegistry {
        self.plans.clear();
        &mut self.registry
    }

    pub fn factory(&self) -> &ProxyFactory {
        &self.factory
    }

    /// Register the forwarding backend of service contract `S`
    pub fn register_proxy<S, F>(&self, backend: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(ForwardingProxy<S>) -> Arc<S> + Send + Sync + 'static,
    {
        self.factory.register_backend::<S, F>(backend);
    }

    /// Cached descriptor of `I`
    pub fn descriptor_of<I: Interceptable>(&self) -> Arc<TypeDescriptor> {
        let key = TypeKey::of::<I>();
        if let Some(existing) = self.descriptors.get(&key) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .descriptors
            .entry(key)
            .or_insert_with(|| Arc::new(I::descriptor()));
        Arc::clone(entry.value())
    }

    /// Plan for resolving `request` with implementation `I`
    pub fn plan_for<I: Interceptable>(&self, request: &RequestMetadata) -> Result<Option<Arc<ProxyPlan>>> {
        if self.options.cache_plans {
            if let Some(cached) = self.plans.get(request) {
                return Ok(cached.value().clone());
            }
        }

        let descriptor = self.descriptor_of::<I>();
        let plan = self
            .planner
            .plan(request, &descriptor, &self.registry)?
            .map(Arc::new);

        if self.options.cache_plans
            && (self.options.max_cached_plans == UNBOUNDED_PLAN_CACHE
                || self.plans.len() < self.options.max_cached_plans)
        {
            self.plans
                .entry(request.clone())
                .or_insert_with(|| plan.clone());
        }
        Ok(plan)
    }

    /// Container hook: return the instance to deliver for `target`.
    ///
    /// `upcast` turns the concrete target into the requested service type; it
    /// is the identity for self-bound resolutions.
    pub fn notify_resolved<S, I, U>(&self, request: &RequestMetadata, target: Arc<I>, upcast: U) -> Result<Arc<S>>
    where
        S: ?Sized + Send + Sync + 'static,
        I: Interceptable,
        U: FnOnce(Arc<I>) -> Arc<S>,
    {
        match self.plan_for::<I>(request)? {
            Some(plan) => self.factory.create::<S, I, U>(&plan, target, upcast),
            None => {
                debug!(service = %request.service(), implementation = %request.implementation(), "no interception required");
                Ok(upcast(target))
            }
        }
    }

    /// Number of cached plan decisions, including "no proxy" ones
    pub fn cached_plan_count(&self) -> usize {
        self.plans.len()
    }
}
