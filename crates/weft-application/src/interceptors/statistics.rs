//! Per-member call statistics

use std::time::{Duration, Instant};

use dashmap::DashMap;
use weft_domain::error::Result;
use weft_domain::value_objects::MemberId;

use crate::pipeline::Invocation;
use crate::ports::interceptor::Interceptor;

/// Counters for one member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberStatistics {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
    /// Calls that returned without reaching the target
    pub short_circuits: u64,
    pub total_time: Duration,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl MemberStatistics {
    fn record(&mut self, elapsed: Duration, succeeded: bool, reached_target: bool) {
        self.calls += 1;
        if succeeded {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        if succeeded && !reached_target {
            self.short_circuits += 1;
        }
        self.total_time += elapsed;
        self.min_time = Some(self.min_time.map_or(elapsed, |min| min.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |max| max.max(elapsed)));
    }

    /// Mean duration, `None` before the first call
    pub fn average_time(&self) -> Option<Duration> {
        let calls = u32::try_from(self.calls).ok().filter(|calls| *calls > 0)?;
        Some(self.total_time / calls)
    }
}

/// Records [`MemberStatistics`] for every member it intercepts.
///
/// Share one instance across proxies with
/// [`InterceptorFactory::from_arc`](crate::ports::InterceptorFactory::from_arc)
/// to aggregate over all of them.
#[derive(Debug, Default)]
pub struct StatisticsInterceptor {
    members: DashMap<MemberId, MemberStatistics>,
}

impl StatisticsInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statistics(&self, member: &MemberId) -> Option<MemberStatistics> {
        self.members.get(member).map(|entry| entry.value().clone())
    }

    /// Snapshot of every member seen so far, sorted by member
    pub fn snapshot(&self) -> Vec<(MemberId, MemberStatistics)> {
        let mut all: Vec<_> = self
            .members
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn total_calls(&self) -> u64 {
        self.members.iter().map(|entry| entry.value().calls).sum()
    }

    pub fn reset(&self) {
        self.members.clear();
    }
}

impl Interceptor for StatisticsInterceptor {
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<()> {
        let started = Instant::now();
        let outcome = invocation.proceed();
        let elapsed = started.elapsed();

        self.members
            .entry(*invocation.member())
            .or_default()
            .record(elapsed, outcome.is_ok(), invocation.target_invoked());
        outcome
    }

    fn name(&self) -> &str {
        "statistics"
    }
}
