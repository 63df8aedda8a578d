//! The live context of one intercepted call

use std::any::{Any, type_name};
use std::sync::Arc;

use tracing::trace;
use weft_domain::error::{Error, Result};
use weft_domain::value_objects::{MemberId, RequestMetadata, TypeKey};

use super::arguments::{Arguments, ReturnValue};
use crate::ports::interceptor::SharedInterceptor;

/// Terminal step of a chain: the real member body
pub type Terminal<'a> = dyn FnMut(&mut Arguments) -> Result<ReturnValue> + 'a;

/// Where a call happens: which resolution, which member, which target
#[derive(Clone, Copy)]
pub struct CallSite<'a> {
    request: &'a RequestMetadata,
    member: &'a MemberId,
    target: &'a (dyn Any + Send + Sync),
    type_arguments: &'a [TypeKey],
}

impl<'a> CallSite<'a> {
    pub fn new(
        request: &'a RequestMetadata,
        member: &'a MemberId,
        target: &'a (dyn Any + Send + Sync),
        type_arguments: &'a [TypeKey],
    ) -> Self {
        Self {
            request,
            member,
            target,
            type_arguments,
        }
    }
}

/// Mutable context handed to every interceptor of a chain.
///
/// The chain position, the per-interceptor proceed flags and the terminal
/// step are private; interceptors only steer the call through
/// [`Invocation::proceed`] and the argument / return slots.
pub struct Invocation<'a> {
    site: CallSite<'a>,
    arguments: Arguments,
    return_value: Option<ReturnValue>,
    chain: &'a [SharedInterceptor],
    position: usize,
    proceeded: Vec<bool>,
    target_invoked: bool,
    terminal: &'a mut Terminal<'a>,
}

impl Invocation<'_> {
    /// Continue with the next interceptor, or the real member after the last.
    ///
    /// Each interceptor may proceed at most once per call; a second attempt
    /// fails with [`Error::ProceedCalledTwice`] and leaves the call state
    /// untouched.
    pub fn proceed(&mut self) -> Result<()> {
        let current = self.position;
        match self.proceeded.get_mut(current) {
            Some(flag) if *flag => {
                return Err(Error::proceed_called_twice(
                    self.site.member.to_string(),
                    current,
                ));
            }
            Some(flag) => *flag = true,
            None => return Err(Error::internal("proceed() called outside of a chain")),
        }

        let next = current + 1;
        if let Some(interceptor) = self.chain.get(next) {
            let interceptor = Arc::clone(interceptor);
            trace!(member = %self.site.member, position = next, interceptor = interceptor.name(), "entering interceptor");
            self.position = next;
            let outcome = interceptor.intercept(self);
            self.position = current;
            outcome
        } else {
            self.invoke_target()
        }
    }

    fn invoke_target(&mut self) -> Result<()> {
        trace!(member = %self.site.member, "invoking target");
        self.target_invoked = true;
        let value = (self.terminal)(&mut self.arguments)?;
        self.return_value = Some(value);
        Ok(())
    }

    pub fn request(&self) -> &RequestMetadata {
        self.site.request
    }

    pub fn member(&self) -> &MemberId {
        self.site.member
    }

    /// Closed type arguments of a generic member call; empty otherwise
    pub fn type_arguments(&self) -> &[TypeKey] {
        self.site.type_arguments
    }

    /// The real target, if it is a `T`
    pub fn target<T: Any>(&self) -> Option<&T> {
        self.site.target.downcast_ref::<T>()
    }

    /// The real target, type erased
    pub fn target_any(&self) -> &(dyn Any + Send + Sync) {
        self.site.target
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    pub fn argument<T: Any>(&self, index: usize) -> Result<&T> {
        self.arguments.get(index)
    }

    pub fn argument_mut<T: Any>(&mut self, index: usize) -> Result<&mut T> {
        self.arguments.get_mut(index)
    }

    pub fn set_argument<T: Any + Send>(&mut self, index: usize, value: T) -> Result<()> {
        self.arguments.set(index, value)
    }

    /// Current return value, if one is set and is a `T`
    pub fn return_value<T: Any>(&self) -> Option<&T> {
        self.return_value.as_ref()?.downcast_ref::<T>()
    }

    pub fn has_return_value(&self) -> bool {
        self.return_value.is_some()
    }

    pub fn set_return_value<T: Any + Send>(&mut self, value: T) {
        self.return_value = Some(Box::new(value));
    }

    pub fn take_return_value(&mut self) -> Option<ReturnValue> {
        self.return_value.take()
    }

    /// Whether the real member body has run
    pub fn target_invoked(&self) -> bool {
        self.target_invoked
    }

    /// Whether the running interceptor already proceeded
    pub fn has_proceeded(&self) -> bool {
        self.proceeded.get(self.position).copied().unwrap_or(false)
    }

    /// Position of the running interceptor in the chain
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }
}

/// Run `chain` around `terminal` for one call.
///
/// Returns the value left in the return slot: whatever the target produced,
/// or whatever an interceptor set, or `None` when the call was
/// short-circuited without a value.
pub fn invoke<'a>(
    site: CallSite<'a>,
    chain: &'a [SharedInterceptor],
    arguments: Arguments,
    terminal: &'a mut Terminal<'a>,
) -> Result<Option<ReturnValue>> {
    let mut invocation = Invocation {
        site,
        arguments,
        return_value: None,
        chain,
        position: 0,
        proceeded: vec![false; chain.len()],
        target_invoked: false,
        terminal,
    };

    match chain.first() {
        Some(first) => {
            let first = Arc::clone(first);
            trace!(member = %site.member, position = 0, interceptor = first.name(), "entering interceptor");
            first.intercept(&mut invocation)?;
        }
        None => invocation.invoke_target()?,
    }

    Ok(invocation.return_value)
}

/// Convert a pipeline result into the member's return type.
///
/// An empty slot yields `R::default()`.
pub fn into_return<R: Any + Default>(member: &MemberId, value: Option<ReturnValue>) -> Result<R> {
    match value {
        None => Ok(R::default()),
        Some(boxed) => boxed
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| Error::return_type_mismatch(member.to_string(), type_name::<R>())),
    }
}
