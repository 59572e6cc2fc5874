//! recordpick-core: weighted participant/record selection.
//!
//! Draw a participant with probability proportional to their weight, draw one
//! of their unused records uniformly, then move weight from the chosen
//! participant to everyone else in the run. Past runs can be kept as
//! `HistoryEntry` values, rated, listed and tallied. No IO, no clock, no
//! persistence.
//! Bring your own roster and your own random source.
//!
//! Participants and items are identified by caller-provided `i64` IDs.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use recordpick_core::{run_selection, Participant, RedistributionConfig};
//!
//! let candidates = vec![
//!     Participant::new(1, 12.0, 2),
//!     Participant::new(2, 20.0, 1),
//!     Participant::new(3, 8.0, 0), // no records left, can't be drawn
//! ];
//! let pool: HashMap<i64, Vec<i64>> = HashMap::from([(1, vec![101, 102]), (2, vec![201])]);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let result = run_selection(&candidates, &pool, &RedistributionConfig::default(), &mut rng).unwrap();
//!
//! assert_ne!(result.chosen_participant, 3);
//! assert_eq!(result.total_delta(), 0.0);
//! for update in &result.new_weights {
//!     println!("{}: {} -> {}", update.participant, update.old_weight, update.new_weight);
//! }
//! ```

pub mod constants;
pub mod error;
pub mod history;
pub mod redistribute;
pub mod run;
pub mod selector;
pub mod simulate;
pub mod stats;
pub mod types;
mod validate;

// Re-export primary public API at crate root.
pub use error::{HistoryError, Result, SelectionError};
pub use redistribute::{points_to_add, redistribute};
pub use run::run_selection;
pub use selector::{select, select_item, select_participant, ParticipantDraw};
pub use simulate::{simulate_distribution, Distribution};
pub use history::{
    next_entry_id, query_history, rate_entry, EntryId, HistoryEntry, HistoryOrder, HistoryQuery, Rating,
};
pub use stats::SelectionStats;
pub use types::{
    Divisor, ItemId, ItemPool, Participant, ParticipantId, RedistributionConfig, SelectionResult,
    WeightUpdate,
};
