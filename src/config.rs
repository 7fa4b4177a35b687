/// Tunables that are fixed at startup rather than per-request (spec §4.3, §9 Open Questions).
///
/// None of these are read from the network data itself; they shape how the engine scores and
/// bounds a search regardless of which stations/profile are involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Steepness of the facility-convenience sigmoid (spec §4.2). Decided at 1.0: the raw
    /// weighted facility sum already sits in a range where the midpoint transition lands near
    /// "a handful of amenities present", without extra scaling.
    pub sigmoid_k: f32,
    /// Reserved similarity-pruning threshold (spec §4.3); unused by the dominance predicate
    /// itself, carried for callers that want to merge near-identical itineraries.
    pub epsilon: f32,
    /// Round cap `Router::find_routes` applies when a caller passes `None` for `max_rounds`.
    pub default_max_rounds: usize,
    /// Initial capacity for a search's label arena; sized to avoid the first few reallocations
    /// on a typical multi-transfer query.
    pub initial_pool_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { sigmoid_k: 1.0, epsilon: 0.08, default_max_rounds: 5, initial_pool_capacity: 256 }
    }
}
