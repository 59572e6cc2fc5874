/// Weighted participant draw followed by a uniform item draw.
///
/// Participants with no unused items are removed before the draw instead of
/// being given zero probability. Participants with weight 0 stay in: if every
/// eligible weight is 0 the draw falls back to uniform, so nobody starves once
/// prior losses have driven their weight to the floor.
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

use crate::error::{Result, SelectionError};
use crate::types::{ItemId, ItemPool, Participant, ParticipantId};
use crate::validate::validate_run;

/// A prepared participant draw over the eligible subset of a run.
///
/// Building it validates the run once; `draw` can then be called repeatedly
/// (the simulator relies on this).
#[derive(Debug, Clone)]
pub struct ParticipantDraw {
    eligible: Vec<ParticipantId>,
    /// `None` when every eligible weight is exactly zero.
    weights: Option<WeightedIndex<f64>>,
}

impl ParticipantDraw {
    pub fn new(candidates: &[Participant]) -> Result<Self> {
        validate_run(candidates)?;

        let eligible: Vec<&Participant> = candidates.iter().filter(|p| p.is_eligible()).collect();
        if eligible.is_empty() {
            return Err(SelectionError::NoEligibleParticipants);
        }

        let total_weight: f64 = eligible.iter().map(|p| p.weight).sum();
        let weights = if total_weight == 0.0 {
            tracing::debug!(eligible = eligible.len(), "all eligible weights are zero, drawing uniformly");
            None
        } else {
            Some(WeightedIndex::new(eligible.iter().map(|p| p.weight))?)
        };

        Ok(ParticipantDraw {
            eligible: eligible.iter().map(|p| p.id).collect(),
            weights,
        })
    }

    /// Ids that can be drawn, in input order.
    pub fn eligible(&self) -> &[ParticipantId] {
        &self.eligible
    }

    pub fn draw(&self, rng: &mut impl Rng) -> ParticipantId {
        let idx = match &self.weights {
            Some(dist) => dist.sample(rng),
            None => rng.random_range(0..self.eligible.len()),
        };
        self.eligible[idx]
    }
}

/// Step 1: draw one participant with probability proportional to weight.
pub fn select_participant(candidates: &[Participant], rng: &mut impl Rng) -> Result<ParticipantId> {
    Ok(ParticipantDraw::new(candidates)?.draw(rng))
}

/// Step 2: draw one of `owner`'s unused items, each with equal probability.
pub fn select_item(owner: ParticipantId, pool: &impl ItemPool, rng: &mut impl Rng) -> Result<ItemId> {
    let items = pool.unused_items(owner);
    if items.is_empty() {
        return Err(SelectionError::EmptyItemPool { participant: owner });
    }
    Ok(items[rng.random_range(0..items.len())])
}

/// Draw a participant, then one of their unused items.
pub fn select(
    candidates: &[Participant],
    pool: &impl ItemPool,
    rng: &mut impl Rng,
) -> Result<(ParticipantId, ItemId)> {
    let participant = select_participant(candidates, rng)?;
    let item = select_item(participant, pool, rng)?;
    tracing::trace!(participant, item, "selected");
    Ok((participant, item))
}
