//! Call logging

use std::time::Instant;

use tracing::{debug, info, trace, warn};
use weft_domain::error::Result;

use crate::pipeline::Invocation;
use crate::ports::interceptor::Interceptor;

/// Level the successful-call events are emitted at; failures always use `warn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
}

/// Logs entry and exit of every intercepted call.
///
/// The error itself is passed through untouched; the interceptor only
/// records that it happened.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor {
    level: LogLevel,
}

impl LoggingInterceptor {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&self, member: &str, message: &str, elapsed_us: Option<u64>) {
        match (self.level, elapsed_us) {
            (LogLevel::Trace, Some(us)) => trace!(member, elapsed_us = us, "{message}"),
            (LogLevel::Trace, None) => trace!(member, "{message}"),
            (LogLevel::Debug, Some(us)) => debug!(member, elapsed_us = us, "{message}"),
            (LogLevel::Debug, None) => debug!(member, "{message}"),
            (LogLevel::Info, Some(us)) => info!(member, elapsed_us = us, "{message}"),
            (LogLevel::Info, None) => info!(member, "{message}"),
        }
    }
}

impl Interceptor for LoggingInterceptor {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        let member = invocation.member().to_string();
        self.emit(&member, "call started", None);

        let started = Instant::now();
        let outcome = invocation.proceed();
        let elapsed = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        match &outcome {
            Ok(()) if invocation.target_invoked() => self.emit(&member, "call completed", Some(elapsed)),
            Ok(()) => self.emit(&member, "call short-circuited", Some(elapsed)),
            Err(error) => warn!(member = %member, elapsed_us = elapsed, %error, "call failed"),
        }
        outcome
    }

    fn name(&self) -> &str {
        "logging"
    }
}
