//! Interceptor adapters
//!
//! Closures wrapped into the single [`Interceptor`] contract.
//!
//! | Adapter | Behaviour |
//! |---------|-----------|
//! | [`BeforeInterceptor`] | action, then always proceed |
//! | [`AfterInterceptor`] | proceed, then action on the post-call state |
//! | [`ReplaceInterceptor`] | never proceed; return value comes from the function |
//! | [`AroundInterceptor`] | full control over whether and when to proceed |

use std::any::Any;
use std::marker::PhantomData;

use weft_domain::error::Result;

use crate::pipeline::Invocation;
use crate::ports::interceptor::Interceptor;

/// Runs an action before the rest of the chain
pub struct BeforeInterceptor<F> {
    action: F,
}

impl<F> BeforeInterceptor<F>
where
    F: Fn(&mut Invocation<'_>) + Send + Sync,
{
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<F> Interceptor for BeforeInterceptor<F>
where
    F: Fn(&mut Invocation<'_>) + Send + Sync,
{
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        (self.action)(invocation);
        invocation.proceed()
    }

    fn name(&self) -> &str {
        "before"
    }
}

/// Runs an action once the rest of the chain returned successfully
pub struct AfterInterceptor<F> {
    action: F,
}

impl<F> AfterInterceptor<F>
where
    F: Fn(&mut Invocation<'_>) + Send + Sync,
{
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<F> Interceptor for AfterInterceptor<F>
where
    F: Fn(&mut Invocation<'_>) + Send + Sync,
{
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        invocation.proceed()?;
        (self.action)(invocation);
        Ok(())
    }

    fn name(&self) -> &str {
        "after"
    }
}

/// Replaces the call entirely; an error from the function surfaces as if
/// the real member had failed
pub struct ReplaceInterceptor<F, R> {
    function: F,
    _returns: PhantomData<fn() -> R>,
}

impl<F, R> ReplaceInterceptor<F, R>
where
    F: Fn(&Invocation<'_>) -> Result<R> + Send + Sync,
    R: Any + Send,
{
    pub fn new(function: F) -> Self {
        Self {
            function,
            _returns: PhantomData,
        }
    }
}

impl<F, R> Interceptor for ReplaceInterceptor<F, R>
where
    F: Fn(&Invocation<'_>) -> Result<R> + Send + Sync,
    R: Any + Send,
{
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        let value = (self.function)(invocation)?;
        invocation.set_return_value(value);
        Ok(())
    }

    fn name(&self) -> &str {
        "replace"
    }
}

/// Arbitrary logic; the action decides whether to proceed
pub struct AroundInterceptor<F> {
    action: F,
}

impl<F> AroundInterceptor<F>
where
    F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync,
{
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<F> Interceptor for AroundInterceptor<F>
where
    F: Fn(&mut Invocation<'_>) -> Result<()> + Send + Sync,
{
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        (self.action)(invocation)
    }

    fn name(&self) -> &str {
        "around"
    }
}
