//! Interceptor contract

use std::fmt;
use std::sync::Arc;

use weft_domain::error::Result;
use weft_domain::value_objects::RequestMetadata;

use crate::pipeline::Invocation;

/// Unit of cross-cutting logic run around an intercepted call.
///
/// An interceptor must call [`Invocation::proceed`] to continue down the
/// chain; returning without proceeding short-circuits the call. Errors
/// returned here reach the caller unchanged unless an outer interceptor
/// handles them.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()>;

    /// Name used in trace output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interceptor shared between proxies
pub type SharedInterceptor = Arc<dyn Interceptor>;

type CreateFn = dyn Fn(&RequestMetadata) -> SharedInterceptor + Send + Sync;

/// Produces the interceptor instance a proxy uses for one chain slot.
///
/// Factories are invoked once per proxy instance. A factory built with
/// [`InterceptorFactory::shared`] hands every proxy the same instance.
#[derive(Clone)]
pub struct InterceptorFactory {
    create: Arc<CreateFn>,
}

impl InterceptorFactory {
    /// Factory calling `create` with the resolution being proxied
    pub fn new<F>(create: F) -> Self
    where
        F: Fn(&RequestMetadata) -> SharedInterceptor + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
        }
    }

    /// Factory handing out one shared instance
    pub fn shared<I: Interceptor + 'static>(interceptor: I) -> Self {
        Self::from_arc(Arc::new(interceptor))
    }

    /// Factory handing out an already shared instance
    pub fn from_arc(interceptor: SharedInterceptor) -> Self {
        Self::new(move |_| Arc::clone(&interceptor))
    }

    /// Factory building a fresh instance for every proxy
    pub fn per_proxy<I, F>(build: F) -> Self
    where
        I: Interceptor + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        Self::new(move |_| Arc::new(build()) as SharedInterceptor)
    }

    pub fn create(&self, request: &RequestMetadata) -> SharedInterceptor {
        (self.create)(request)
    }

    /// Whether both handles are clones of the same factory
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.create), Arc::as_ptr(&other.create))
    }
}

impl fmt::Debug for InterceptorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorFactory")
            .field("create", &Arc::as_ptr(&self.create).cast::<()>())
            .finish()
    }
}
