//! Forwarding-based strategy
//!
//! A service contract `S` registers a backend that wraps a
//! [`ForwardingProxy<S>`] into something implementing `S`, usually a small
//! struct whose trait methods delegate to [`ForwardingProxy::call`]:
//!
//! ```ignore
//! struct GreeterProxy(ForwardingProxy<dyn Greeter>);
//!
//! impl Greeter for GreeterProxy {
//!     fn greet(&self, name: String) -> Result<String> {
//!         self.0.call(
//!             &MemberId::method::<dyn Greeter>("greet"),
//!             Arguments::new().with(name),
//!             |target, args| target.greet(args.take(0)?),
//!         )
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use weft_domain::error::Result;
use weft_domain::value_objects::{MemberId, TypeKey};

use super::proxy_core::ProxyCore;
use crate::pipeline::Arguments;
use crate::ports::proxy::ProxyTarget;

/// Builds the contract-typed proxy object around a [`ForwardingProxy`]
pub type ForwardingBackend<S> = Arc<dyn Fn(ForwardingProxy<S>) -> Arc<S> + Send + Sync>;

/// Wrapper owning the real target of a contract proxy
pub struct ForwardingProxy<S: ?Sized> {
    target: Arc<S>,
    target_any: Arc<dyn Any + Send + Sync>,
    core: Arc<ProxyCore>,
}

impl<S> ForwardingProxy<S>
where
    S: ?Sized + Send + Sync + 'static,
{
    pub(crate) fn new(target: Arc<S>, target_any: Arc<dyn Any + Send + Sync>, core: Arc<ProxyCore>) -> Self {
        Self {
            target,
            target_any,
            core,
        }
    }

    /// The wrapped target, seen through the contract
    pub fn target(&self) -> &S {
        &self.target
    }

    /// Relay a call to the target, through the pipeline when `member` is
    /// intercepted
    pub fn call<R, F>(&self, member: &MemberId, arguments: Arguments, body: F) -> Result<R>
    where
        R: Any + Send + Default,
        F: FnOnce(&S, &mut Arguments) -> Result<R>,
    {
        self.call_generic(member, &[], arguments, body)
    }

    /// [`ForwardingProxy::call`] for members closed over `type_arguments`
    pub fn call_generic<R, F>(
        &self,
        member: &MemberId,
        type_arguments: &[TypeKey],
        arguments: Arguments,
        body: F,
    ) -> Result<R>
    where
        R: Any + Send + Default,
        F: FnOnce(&S, &mut Arguments) -> Result<R>,
    {
        self.core.call(
            &*self.target,
            &*self.target_any,
            member,
            type_arguments,
            arguments,
            body,
        )
    }

    pub fn intercepts(&self, member: &MemberId) -> bool {
        self.core.intercepts(member)
    }

    pub fn proxy_target(&self) -> ProxyTarget {
        self.core.proxy_target(Arc::clone(&self.target_any))
    }
}

impl<S: ?Sized> fmt::Debug for ForwardingProxy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardingProxy")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}
