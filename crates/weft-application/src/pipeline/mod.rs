//! Invocation pipeline
//!
//! One [`Invocation`] is created per intercepted call and dropped when the
//! call returns. [`invoke`] runs the chain outermost-first; each interceptor
//! advances it with [`Invocation::proceed`].

pub mod arguments;
pub mod invocation;

pub use arguments::{Arguments, ReturnValue};
pub use invocation::{CallSite, Invocation, into_return, invoke};
