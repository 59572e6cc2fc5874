/// Upper bound on the points a single run moves to each non-chosen participant.
///
/// The per-participant share is `min(DEFAULT_POINTS_CAP, floor(W / P))`, so with
/// the cap at 5 a chosen participant never loses more than `5 * (P - 1)` points
/// in one run no matter how large their weight has grown.
pub const DEFAULT_POINTS_CAP: u32 = 5;

/// Weight a participant starts with when the caller has no prior history.
pub const DEFAULT_STARTING_WEIGHT: f64 = 100.0;

/// Number of draws used by `simulate_distribution` when the caller doesn't say.
pub const DEFAULT_SIMULATION_TRIALS: usize = 1000;

/// Inclusive bounds for a rating of a past selection.
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;
