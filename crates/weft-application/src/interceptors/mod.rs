//! Ready-made interceptors
//!
//! | Interceptor | Purpose |
//! |-------------|---------|
//! | [`LoggingInterceptor`] | tracing events for entry, exit and failure of every call |
//! | [`StatisticsInterceptor`] | per-member call counts and timings |

pub mod logging;
pub mod statistics;

pub use logging::{LogLevel, LoggingInterceptor};
pub use statistics::{MemberStatistics, StatisticsInterceptor};
