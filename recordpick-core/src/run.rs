/// One selection run: draw, then redistribute.
///
/// Pure function. Marking the item used and persisting the new weights is the
/// caller's job, and must happen atomically with the snapshot the candidates
/// were read from.
use rand::Rng;

use crate::error::Result;
use crate::redistribute::redistribute_validated;
use crate::selector::select;
use crate::types::{ItemPool, Participant, RedistributionConfig, SelectionResult};

/// Run the selector over `candidates` and redistribute weight across all of them.
pub fn run_selection(
    candidates: &[Participant],
    pool: &impl ItemPool,
    config: &RedistributionConfig,
    rng: &mut impl Rng,
) -> Result<SelectionResult> {
    config.validate()?;

    let (chosen_participant, chosen_item) = select(candidates, pool, rng)?;
    let (points_moved, new_weights) = redistribute_validated(candidates, chosen_participant, config)?;

    tracing::debug!(
        chosen_participant,
        chosen_item,
        points_moved,
        candidates = candidates.len(),
        "selection run complete"
    );

    Ok(SelectionResult {
        chosen_participant,
        chosen_item,
        points_moved,
        new_weights,
    })
}
