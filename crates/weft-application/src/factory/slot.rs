//! Override-based strategy
//!
//! An overridable type embeds one [`InterceptionSlot`] and routes each of its
//! virtual members through [`InterceptionSlot::dispatch`]. Until the factory
//! installs a proxy core the slot is empty and every call runs its body
//! directly; afterwards matched members enter the pipeline and the object
//! itself is the proxy.

use std::any::Any;
use std::fmt;
use std::sync::Weak;

use once_cell::sync::OnceCell;
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, TypeKey};

use super::proxy_core::ProxyCore;
use crate::pipeline::Arguments;
use crate::ports::proxy::ProxyTarget;

struct Installed {
    core: ProxyCore,
    this: Weak<dyn Any + Send + Sync>,
}

/// Interception hook embedded in an overridable component type
#[derive(Default)]
pub struct InterceptionSlot {
    installed: OnceCell<Installed>,
}

impl InterceptionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the owning object has been turned into a proxy
    pub fn is_installed(&self) -> bool {
        self.installed.get().is_some()
    }

    /// Install `core`; an object is proxied at most once
    pub(crate) fn install(&self, core: ProxyCore, this: Weak<dyn Any + Send + Sync>) -> Result<()> {
        let implementation = core.request().implementation();
        self.installed
            .set(Installed { core, this })
            .map_err(|_| Error::planning(implementation.name(), "instance is already a proxy"))
    }

    /// Call a virtual member of `this`
    pub fn dispatch<T, R, F>(&self, this: &T, member: &MemberId, arguments: Arguments, body: F) -> Result<R>
    where
        T: Any + Send + Sync,
        R: Any + Send + Default,
        F: FnOnce(&T, &mut Arguments) -> Result<R>,
    {
        self.dispatch_generic(this, member, &[], arguments, body)
    }

    /// Call a generic virtual member of `this` closed over `type_arguments`
    pub fn dispatch_generic<T, R, F>(
        &self,
        this: &T,
        member: &MemberId,
        type_arguments: &[TypeKey],
        arguments: Arguments,
        body: F,
    ) -> Result<R>
    where
        T: Any + Send + Sync,
        R: Any + Send + Default,
        F: FnOnce(&T, &mut Arguments) -> Result<R>,
    {
        match self.installed.get() {
            Some(installed) => installed
                .core
                .call(this, this, member, type_arguments, arguments, body),
            None => {
                let mut arguments = arguments;
                body(this, &mut arguments)
            }
        }
    }

    /// Marker answer for the owning object
    pub fn proxy_target(&self) -> Option<ProxyTarget> {
        let installed = self.installed.get()?;
        let this = installed.this.upgrade()?;
        Some(installed.core.proxy_target(this))
    }
}

impl fmt::Debug for InterceptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionSlot")
            .field("core", &self.installed.get().map(|installed| &installed.core))
            .finish()
    }
}
