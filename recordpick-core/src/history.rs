/// Selection history entries, ratings, and history listings.
///
/// The crate never stores history or reads the clock. Callers build a
/// `HistoryEntry` from each applied `SelectionResult`, keep it wherever they
/// like, and pass the list back here to rate, filter and sort it.
use chrono::{DateTime, Utc};

use crate::constants::{MAX_RATING, MIN_RATING};
use crate::error::HistoryError;
use crate::types::{ItemId, ParticipantId, SelectionResult, WeightUpdate};

/// Caller-assigned history entry identifier.
pub type EntryId = u64;

/// One participant's score for a past selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rating {
    pub rater: ParticipantId,
    pub score: f64,
    pub rated_at: DateTime<Utc>,
}

/// What a caller records after applying a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    pub participants: Vec<ParticipantId>,
    pub chosen_participant: ParticipantId,
    pub chosen_item: ItemId,
    pub weight_changes: Vec<WeightUpdate>,
    /// At most one rating per rater.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ratings: Vec<Rating>,
}

impl HistoryEntry {
    /// Build an entry; the participant list comes from the result's weight updates.
    pub fn from_result(id: EntryId, result: &SelectionResult, timestamp: DateTime<Utc>) -> Self {
        HistoryEntry {
            id,
            timestamp,
            participants: result.new_weights.iter().map(|u| u.participant).collect(),
            chosen_participant: result.chosen_participant,
            chosen_item: result.chosen_item,
            weight_changes: result.new_weights.clone(),
            ratings: Vec::new(),
        }
    }

    /// Whether `participant` took part in this run (chosen or not).
    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.participants.contains(&participant)
    }

    /// Add `rater`'s score, replacing any score they gave before.
    pub fn rate(
        &mut self,
        rater: ParticipantId,
        score: f64,
        rated_at: DateTime<Utc>,
    ) -> Result<(), HistoryError> {
        if !score.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&score) {
            return Err(HistoryError::RatingOutOfRange { score, min: MIN_RATING, max: MAX_RATING });
        }

        match self.ratings.iter_mut().find(|r| r.rater == rater) {
            Some(existing) => {
                existing.score = score;
                existing.rated_at = rated_at;
            }
            None => self.ratings.push(Rating { rater, score, rated_at }),
        }
        tracing::debug!(entry = self.id, rater, score, "rated selection");
        Ok(())
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        Some(self.ratings.iter().map(|r| r.score).sum::<f64>() / self.ratings.len() as f64)
    }
}

/// Id for the next entry: one past the largest id seen, starting at 1.
pub fn next_entry_id(entries: &[HistoryEntry]) -> EntryId {
    entries.iter().map(|e| e.id).max().map_or(1, |id| id + 1)
}

/// Rate the entry with id `id`.
pub fn rate_entry(
    entries: &mut [HistoryEntry],
    id: EntryId,
    rater: ParticipantId,
    score: f64,
    rated_at: DateTime<Utc>,
) -> Result<(), HistoryError> {
    entries
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or(HistoryError::EntryNotFound { id })?
        .rate(rater, score, rated_at)
}

/// Order of a history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    #[default]
    Newest,
    /// Highest average rating first. Unrated entries count as 0; ties go newest first.
    BestRated,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Only entries this participant took part in.
    pub participant: Option<ParticipantId>,
    pub order: HistoryOrder,
    pub limit: Option<usize>,
}

/// Filter, sort and truncate a history.
pub fn query_history<'a>(entries: &'a [HistoryEntry], query: &HistoryQuery) -> Vec<&'a HistoryEntry> {
    let mut selected: Vec<&HistoryEntry> = entries
        .iter()
        .filter(|e| query.participant.is_none_or(|p| e.involves(p)))
        .collect();

    let newest_first =
        |a: &&HistoryEntry, b: &&HistoryEntry| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id));

    match query.order {
        HistoryOrder::Newest => selected.sort_by(newest_first),
        HistoryOrder::BestRated => selected.sort_by(|a, b| {
            let ra = a.average_rating().unwrap_or(0.0);
            let rb = b.average_rating().unwrap_or(0.0);
            rb.total_cmp(&ra).then_with(|| newest_first(a, b))
        }),
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }
    selected
}
