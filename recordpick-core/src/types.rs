use std::collections::{BTreeMap, HashMap};

use crate::constants::DEFAULT_POINTS_CAP;
use crate::error::{Result, SelectionError};

/// Caller-provided participant identifier.
pub type ParticipantId = i64;

/// Caller-provided item (record) identifier.
pub type ItemId = i64;

/// One candidate in a selection run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    /// Current weight. Must be finite and non-negative.
    pub weight: f64,
    /// Number of items this participant owns that have not been used yet.
    pub unused_items: usize,
}

impl Participant {
    pub fn new(id: ParticipantId, weight: f64, unused_items: usize) -> Self {
        Participant { id, weight, unused_items }
    }

    /// Whether this participant can enter the weighted draw at all.
    pub fn is_eligible(&self) -> bool {
        self.unused_items > 0
    }
}

/// Source of unused item ids for a participant.
///
/// The selector only asks for the pool of the participant it actually drew.
pub trait ItemPool {
    fn unused_items(&self, owner: ParticipantId) -> Vec<ItemId>;
}

impl ItemPool for HashMap<ParticipantId, Vec<ItemId>> {
    fn unused_items(&self, owner: ParticipantId) -> Vec<ItemId> {
        self.get(&owner).cloned().unwrap_or_default()
    }
}

impl ItemPool for BTreeMap<ParticipantId, Vec<ItemId>> {
    fn unused_items(&self, owner: ParticipantId) -> Vec<ItemId> {
        self.get(&owner).cloned().unwrap_or_default()
    }
}

/// Old and new weight of one participant after a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightUpdate {
    pub participant: ParticipantId,
    pub old_weight: f64,
    pub new_weight: f64,
}

impl WeightUpdate {
    pub fn delta(&self) -> f64 {
        self.new_weight - self.old_weight
    }
}

/// Outcome of one run: who was drawn, which item, and everyone's next weight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionResult {
    pub chosen_participant: ParticipantId,
    pub chosen_item: ItemId,
    /// Points each non-chosen participant gained this run.
    pub points_moved: f64,
    /// One entry per run participant, in the same order as the input list.
    pub new_weights: Vec<WeightUpdate>,
}

impl SelectionResult {
    pub fn new_weight(&self, participant: ParticipantId) -> Option<f64> {
        self.new_weights
            .iter()
            .find(|u| u.participant == participant)
            .map(|u| u.new_weight)
    }

    /// Sum of all weight deltas. Zero for every valid run with integral weights.
    pub fn total_delta(&self) -> f64 {
        self.new_weights.iter().map(WeightUpdate::delta).sum()
    }
}

/// What the chosen participant's weight is divided by before capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Divisor {
    /// Number of participants in the run.
    #[default]
    ParticipantCount,
    /// A constant divisor, independent of run size. Must be non-zero.
    Fixed(u32),
}

/// Knobs for the weight redistributor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedistributionConfig {
    pub points_cap: u32,
    pub divisor: Divisor,
}

impl Default for RedistributionConfig {
    fn default() -> Self {
        RedistributionConfig {
            points_cap: DEFAULT_POINTS_CAP,
            divisor: Divisor::ParticipantCount,
        }
    }
}

impl RedistributionConfig {
    pub fn with_points_cap(points_cap: u32) -> Self {
        RedistributionConfig { points_cap, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.divisor == Divisor::Fixed(0) {
            return Err(SelectionError::InvalidConfig("fixed divisor must be non-zero".into()));
        }
        Ok(())
    }
}

/// Maps participant ids to their position in the caller's list.
pub(crate) struct IdMap {
    id_to_idx: HashMap<ParticipantId, usize>,
}

impl IdMap {
    pub fn from_participants(participants: &[Participant]) -> Result<Self> {
        let mut id_to_idx = HashMap::with_capacity(participants.len());
        for (idx, p) in participants.iter().enumerate() {
            if id_to_idx.insert(p.id, idx).is_some() {
                return Err(SelectionError::DuplicateParticipant { participant: p.id });
            }
        }
        Ok(IdMap { id_to_idx })
    }

    pub fn len(&self) -> usize {
        self.id_to_idx.len()
    }

    pub fn to_idx(&self, id: ParticipantId) -> Result<usize> {
        self.id_to_idx
            .get(&id)
            .copied()
            .ok_or(SelectionError::UnknownParticipant { participant: id })
    }
}
