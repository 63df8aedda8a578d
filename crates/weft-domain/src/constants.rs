//! Domain constants shared across the engine

// ============================================================================
// Binding Constants
// ============================================================================

/// Order assigned to bindings registered without an explicit order.
///
/// Bindings sort by `(order, registration sequence)`, so every binding that
/// keeps this default runs in plain registration order.
pub const DEFAULT_BINDING_ORDER: i32 = 0;

// ============================================================================
// Plan Cache Constants
// ============================================================================

/// Default upper bound on cached proxy plans
pub const DEFAULT_MAX_CACHED_PLANS: usize = 1024;

/// Cache bound value meaning "never stop caching"
pub const UNBOUNDED_PLAN_CACHE: usize = 0;
