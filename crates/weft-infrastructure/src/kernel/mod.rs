//! Minimal container
//!
//! Binds service types to constructors and calls
//! [`InterceptionEngine::notify_resolved`] for every instance it creates, so
//! whatever the engine returns (the target or its proxy) is what callers get.
//!
//! ```ignore
//! let mut kernel = Kernel::new();
//! kernel.bind(ServiceBinding::<dyn Greeter>::to(|_| Ok(English::default()), as_greeter))?;
//! kernel.intercept_before::<English, _>(MemberId::method::<English>("greet"), |_| {})?;
//! let greeter = kernel.get::<dyn Greeter>()?;
//! ```

mod binding;
mod context;

pub use binding::{Activator, ConstructorArguments, Scope, ServiceBinding};
pub use context::ResolutionContext;

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};
use weft_application::{BindingId, ForwardingProxy, InterceptionEngine, Interceptable, Interceptor, InterceptorFactory, Invocation};
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, RequestMetadata, TypeKey};

use crate::config::AppConfig;

thread_local! {
    // (kernel address, service) pairs under activation on this thread
    static ACTIVATING: RefCell<Vec<(usize, TypeKey)>> = const { RefCell::new(Vec::new()) };
}

/// Marks one service as under activation until dropped
struct ActivationGuard {
    entry: (usize, TypeKey),
}

impl ActivationGuard {
    fn enter(kernel: &Kernel, service: TypeKey) -> Result<Self> {
        let entry = (std::ptr::from_ref(kernel) as usize, service);
        ACTIVATING.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&entry) {
                let path = active
                    .iter()
                    .filter(|(owner, _)| *owner == entry.0)
                    .map(|(_, key)| key.to_string())
                    .chain(std::iter::once(service.to_string()))
                    .collect::<Vec<_>>()
                    .join(" -> ");
                return Err(Error::registration(format!("cyclic dependency: {path}")));
            }
            active.push(entry);
            Ok(Self { entry })
        })
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        ACTIVATING.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(index) = active.iter().rposition(|entry| *entry == self.entry) {
                active.remove(index);
            }
        });
    }
}

struct Registration {
    // `Activator<S>` for the registered service type
    activator: Arc<dyn Any + Send + Sync>,
    implementation: TypeKey,
    scope: Scope,
    arguments: ConstructorArguments,
    // holds the delivered `Arc<S>`
    singleton: OnceCell<Arc<dyn Any + Send + Sync>>,
    interceptor_bindings: Vec<BindingId>,
}

/// Container driving the interception engine
pub struct Kernel {
    engine: InterceptionEngine,
    services: HashMap<TypeKey, Registration>,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::with_engine(InterceptionEngine::new())
    }
}

impl Kernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel whose engine follows `config.engine`
    pub fn with_config(config: &AppConfig) -> Self {
        Self::with_engine(InterceptionEngine::with_options(config.engine.to_options()))
    }

    pub fn with_engine(engine: InterceptionEngine) -> Self {
        Self {
            engine,
            services: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &InterceptionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut InterceptionEngine {
        &mut self.engine
    }

    /// Register `binding` for `S`; binding a service twice is an error
    pub fn bind<S: ?Sized + Send + Sync + 'static>(&mut self, binding: ServiceBinding<S>) -> Result<()> {
        let service = TypeKey::of::<S>();
        if self.services.contains_key(&service) {
            return Err(Error::registration(format!(
                "{service} is already bound; use rebind to replace it"
            )));
        }

        let implementation = binding.implementation;
        let mut interceptor_bindings = Vec::with_capacity(binding.interceptors.len());
        for factory in binding.interceptors {
            let id = self.engine.registry_mut().bind_request(
                move |request| request.service() == service && request.implementation() == implementation,
                factory,
            )?;
            interceptor_bindings.push(id);
        }

        debug!(%service, %implementation, scope = ?binding.scope, "bound service");
        self.services.insert(
            service,
            Registration {
                activator: Arc::new(binding.activator),
                implementation,
                scope: binding.scope,
                arguments: binding.arguments,
                singleton: OnceCell::new(),
                interceptor_bindings,
            },
        );
        Ok(())
    }

    /// Replace the binding of `S`, dropping its binding-level interceptors
    pub fn rebind<S: ?Sized + Send + Sync + 'static>(&mut self, binding: ServiceBinding<S>) -> Result<()> {
        self.unbind::<S>();
        self.bind(binding)
    }

    /// Remove the binding of `S`; returns whether one existed
    pub fn unbind<S: ?Sized + 'static>(&mut self) -> bool {
        let Some(previous) = self.services.remove(&TypeKey::of::<S>()) else {
            return false;
        };
        let registry = self.engine.registry_mut();
        for id in previous.interceptor_bindings {
            registry.remove(id);
        }
        true
    }

    pub fn is_bound<S: ?Sized + 'static>(&self) -> bool {
        self.services.contains_key(&TypeKey::of::<S>())
    }

    /// Resolve `S`
    pub fn get<S: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<S>> {
        let service = TypeKey::of::<S>();
        let registration = self
            .services
            .get(&service)
            .ok_or_else(|| Error::not_bound(service.name()))?;
        let activator = registration
            .activator
            .downcast_ref::<Activator<S>>()
            .ok_or_else(|| Error::internal(format!("activator of {service} has the wrong type")))?;

        match registration.scope {
            Scope::Transient => {
                let _guard = ActivationGuard::enter(self, service)?;
                self.activate(service, registration, activator)
            }
            Scope::Singleton => {
                let erased = match registration.singleton.get() {
                    Some(erased) => erased,
                    None => {
                        // re-entering the cell from its own initializer would block forever
                        let _guard = ActivationGuard::enter(self, service)?;
                        registration.singleton.get_or_try_init(|| {
                            self.activate(service, registration, activator)
                                .map(|delivered| Arc::new(delivered) as Arc<dyn Any + Send + Sync>)
                        })?
                    }
                };
                erased
                    .downcast_ref::<Arc<S>>()
                    .cloned()
                    .ok_or_else(|| Error::internal(format!("singleton of {service} has the wrong type")))
            }
        }
    }

    fn activate<S: ?Sized + Send + Sync + 'static>(
        &self,
        service: TypeKey,
        registration: &Registration,
        activator: &Activator<S>,
    ) -> Result<Arc<S>> {
        let request = RequestMetadata::new(service, registration.implementation)
            .with_constructor_arguments(registration.arguments.keys().cloned());
        trace!(%service, implementation = %registration.implementation, "activating");
        let context = ResolutionContext::new(self, request, &registration.arguments);
        (**activator)(&context)
    }

    // ------------------------------------------------------------------
    // Interception registration
    // ------------------------------------------------------------------

    /// Intercept every member of resolutions accepted by `predicate`
    pub fn intercept<P>(&mut self, predicate: P, factory: InterceptorFactory) -> Result<BindingId>
    where
        P: Fn(&RequestMetadata) -> bool + Send + Sync + 'static,
    {
        self.engine.registry_mut().bind_request(predicate, factory)
    }

    /// Intercept one member of `T` with `factory`
    pub fn intercept_member<T: Interceptable>(&mut self, member: MemberId, factory: InterceptorFactory) -> Result<BindingId> {
        self.engine.registry_mut().bind_member::<T>(member, factory)
    }

    pub fn intercept_before<T, F>(&mut self, member: MemberId, action: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&mut Invocation<'_>) + Send + Sync + 'static,
    {
        self.engine.registry_mut().bind_before::<T, F>(member, action)
    }

    pub fn intercept_after<T, F>(&mut self, member: MemberId, action: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&mut Invocation<'_>) + Send + Sync + 'static,
    {
        self.engine.registry_mut().bind_after::<T, F>(member, action)
    }

    pub fn intercept_replace<T, F, R>(&mut self, member: MemberId, function: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&Invocation<'_>) -> Result<R> + Send + Sync + 'static,
        R: Any + Send,
    {
        self.engine.registry_mut().bind_replace::<T, F, R>(member, function)
    }

    pub fn add_method_interceptor<T, F>(&mut self, member: MemberId, action: F) -> Result<BindingId>
    where
        T: Interceptable,
        F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.engine
            .registry_mut()
            .add_method_interceptor::<T, F>(member, action)
    }

    /// Supply the interceptor behind `intercepted_with::<I>()` declarations
    pub fn provide_interceptor<I: Interceptor + ?Sized + 'static>(&mut self, factory: InterceptorFactory) -> Result<()> {
        self.engine.registry_mut().provide_interceptor::<I>(factory)
    }

    /// Register the forwarding backend of contract `S`
    pub fn register_proxy<S, F>(&self, backend: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(ForwardingProxy<S>) -> Arc<S> + Send + Sync + 'static,
    {
        self.engine.register_proxy::<S, F>(backend);
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("engine", &self.engine)
            .field("services", &self.services.len())
            .finish()
    }
}
