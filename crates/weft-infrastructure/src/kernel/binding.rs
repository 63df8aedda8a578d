//! Service bindings
//!
//! A [`ServiceBinding`] records how to build the implementation behind one
//! service type and how long the delivered instance lives.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use weft_application::{Interceptable, InterceptorFactory};
use weft_domain::error::Result;
use weft_domain::value_objects::TypeKey;

use super::context::ResolutionContext;

/// Builds the delivered instance of `S` for one resolution
pub type Activator<S> = Arc<dyn Fn(&ResolutionContext<'_>) -> Result<Arc<S>> + Send + Sync>;

/// Named constructor argument values
pub type ConstructorArguments = BTreeMap<String, Arc<dyn Any + Send + Sync>>;

fn activator<S, F>(f: F) -> Activator<S>
where
    S: ?Sized + Send + Sync + 'static,
    F: Fn(&ResolutionContext<'_>) -> Result<Arc<S>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Instance lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// A new instance (and a new engine notification) per resolution
    #[default]
    Transient,
    /// One delivered instance per kernel, created on first resolution
    Singleton,
}

/// How service `S` is resolved
pub struct ServiceBinding<S: ?Sized> {
    pub(crate) activator: Activator<S>,
    pub(crate) implementation: TypeKey,
    pub(crate) scope: Scope,
    pub(crate) arguments: ConstructorArguments,
    pub(crate) interceptors: Vec<InterceptorFactory>,
}

impl<S> ServiceBinding<S>
where
    S: ?Sized + Send + Sync + 'static,
{
    /// Bind `S` to implementation `I`.
    ///
    /// `construct` builds the raw target; `upcast` turns it into `S`
    /// (usually `|c| c` with an annotated closure or a small fn).
    pub fn to<I, C, U>(construct: C, upcast: U) -> Self
    where
        I: Interceptable,
        C: Fn(&ResolutionContext<'_>) -> Result<I> + Send + Sync + 'static,
        U: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    {
        Self {
            activator: activator(move |ctx| {
                let target = Arc::new(construct(ctx)?);
                ctx.engine()
                    .notify_resolved::<S, I, _>(ctx.request(), target, &upcast)
            }),
            implementation: TypeKey::of::<I>(),
            scope: Scope::Transient,
            arguments: ConstructorArguments::new(),
            interceptors: Vec::new(),
        }
    }

    #[must_use]
    pub fn in_singleton_scope(mut self) -> Self {
        self.scope = Scope::Singleton;
        self
    }

    #[must_use]
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Supply a named constructor argument, readable through
    /// [`ResolutionContext::argument`]
    #[must_use]
    pub fn with_constructor_argument<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.arguments.insert(name.into(), Arc::new(value));
        self
    }

    /// Intercept every member of this service/implementation pair
    #[must_use]
    pub fn intercept_with(mut self, factory: InterceptorFactory) -> Self {
        self.interceptors.push(factory);
        self
    }

    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl<I: Interceptable> ServiceBinding<I> {
    /// Bind `I` to itself
    pub fn to_self<C>(construct: C) -> Self
    where
        C: Fn(&ResolutionContext<'_>) -> Result<I> + Send + Sync + 'static,
    {
        Self::to::<I, C, _>(construct, |target: Arc<I>| target)
    }
}

impl<S: ?Sized> fmt::Debug for ServiceBinding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceBinding")
            .field("implementation", &self.implementation)
            .field("scope", &self.scope)
            .field("arguments", &self.arguments.keys().collect::<Vec<_>>())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
