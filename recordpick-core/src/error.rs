/// Error types surfaced by selection and redistribution.
use crate::types::ParticipantId;

/// Errors produced by a selection run.
///
/// None of these are retried inside the crate: a run consumes an item and moves
/// weight, so the caller decides whether to start a fresh run.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("no candidate has an unused item available")]
    NoEligibleParticipants,

    #[error("participant {participant} has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight { participant: ParticipantId, weight: f64 },

    #[error("participant {participant} was drawn but has no unused items")]
    EmptyItemPool { participant: ParticipantId },

    #[error("participant {participant} is not part of this run")]
    UnknownParticipant { participant: ParticipantId },

    #[error("participant {participant} appears more than once in the run")]
    DuplicateParticipant { participant: ParticipantId },

    #[error("invalid redistribution config: {0}")]
    InvalidConfig(String),

    #[error("weight table rejected: {0}")]
    WeightTable(#[from] rand::distr::weighted::Error),
}

/// Errors produced when rating past selections.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("rating {score} is out of range ({min} to {max})")]
    RatingOutOfRange { score: f64, min: f64, max: f64 },

    #[error("history entry {id} not found")]
    EntryNotFound { id: u64 },
}

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;
