//! Resolution context handed to constructors

use std::any::{Any, type_name};
use std::sync::Arc;

use weft_application::InterceptionEngine;
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::RequestMetadata;

use super::Kernel;
use super::binding::ConstructorArguments;

/// What a constructor sees while its instance is being resolved
pub struct ResolutionContext<'k> {
    kernel: &'k Kernel,
    request: RequestMetadata,
    arguments: &'k ConstructorArguments,
}

impl<'k> ResolutionContext<'k> {
    pub(crate) fn new(kernel: &'k Kernel, request: RequestMetadata, arguments: &'k ConstructorArguments) -> Self {
        Self {
            kernel,
            request,
            arguments,
        }
    }

    pub fn request(&self) -> &RequestMetadata {
        &self.request
    }

    pub fn engine(&self) -> &InterceptionEngine {
        self.kernel.engine()
    }

    /// Resolve a dependency through the same kernel
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.kernel.get::<T>()
    }

    /// Value of the named constructor argument
    pub fn argument<T: Any + Clone>(&self, name: &str) -> Result<T> {
        let value = self.arguments.get(name).ok_or_else(|| {
            Error::missing_constructor_argument(name, self.request.implementation().name())
        })?;
        value.downcast_ref::<T>().cloned().ok_or_else(|| {
            Error::registration(format!(
                "constructor argument '{name}' of {} is not a {}",
                self.request.implementation(),
                type_name::<T>()
            ))
        })
    }
}
