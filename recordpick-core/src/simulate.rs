/// Repeated participant draws without redistribution, for eyeballing how the
/// current weights translate into odds.
use rand::Rng;

use crate::error::Result;
use crate::selector::ParticipantDraw;
use crate::types::{Participant, ParticipantId};

/// How often each candidate came up over a number of independent draws.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distribution {
    pub trials: usize,
    /// One entry per candidate, in input order. Ineligible candidates appear with 0.
    pub counts: Vec<(ParticipantId, usize)>,
}

impl Distribution {
    pub fn count(&self, participant: ParticipantId) -> usize {
        self.counts
            .iter()
            .find(|(id, _)| *id == participant)
            .map_or(0, |(_, c)| *c)
    }

    /// Fraction of trials (0.0 to 1.0) that drew `participant`.
    pub fn share(&self, participant: ParticipantId) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.count(participant) as f64 / self.trials as f64
    }
}

/// Draw a participant `trials` times from the same weights.
pub fn simulate_distribution(
    candidates: &[Participant],
    trials: usize,
    rng: &mut impl Rng,
) -> Result<Distribution> {
    let draw = ParticipantDraw::new(candidates)?;
    let mut counts: Vec<(ParticipantId, usize)> = candidates.iter().map(|p| (p.id, 0)).collect();

    for _ in 0..trials {
        let chosen = draw.draw(rng);
        if let Some(entry) = counts.iter_mut().find(|(id, _)| *id == chosen) {
            entry.1 += 1;
        }
    }

    tracing::debug!(trials, candidates = candidates.len(), "simulated distribution");
    Ok(Distribution { trials, counts })
}
