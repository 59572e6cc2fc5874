/// Weight redistribution after a draw.
///
/// The chosen participant pays `points * (P - 1)` and every other participant
/// in the run gains `points`, so total weight across the run never changes.
/// `points = min(cap, floor(W / divisor), floor(W / (P - 1)))` with the divisor
/// defaulting to `P`. The last term only binds for a fixed divisor smaller than
/// `P`; it keeps the chosen weight from going below zero.
/// When `W` is smaller than the divisor the floor makes `points` zero and the
/// chosen weight stays put; that is intended and not bumped to 1.
use crate::error::Result;
use crate::types::{Divisor, Participant, ParticipantId, RedistributionConfig, WeightUpdate};
use crate::validate::validate_run;

/// Points each non-chosen participant gains when a participant with
/// `chosen_weight` is drawn from a run of `participant_count`.
pub fn points_to_add(
    chosen_weight: f64,
    participant_count: usize,
    config: &RedistributionConfig,
) -> Result<f64> {
    config.validate()?;
    Ok(compute_points(chosen_weight, participant_count, config))
}

/// `points_to_add` for a config that has already been validated.
fn compute_points(chosen_weight: f64, participant_count: usize, config: &RedistributionConfig) -> f64 {
    if participant_count <= 1 {
        return 0.0;
    }

    let divisor = match config.divisor {
        Divisor::ParticipantCount => participant_count as f64,
        Divisor::Fixed(n) => f64::from(n),
    };

    // Weights are non-negative, so floor truncates toward zero.
    let share = (chosen_weight / divisor).floor();
    let affordable = (chosen_weight / (participant_count - 1) as f64).floor();
    share.min(affordable).min(f64::from(config.points_cap))
}

/// Compute every participant's next weight after `chosen` was drawn.
///
/// `participants` is the whole run, including candidates that had no unused
/// items: they still count toward `P` and still receive their share. Output
/// order matches input order.
pub fn redistribute(
    participants: &[Participant],
    chosen: ParticipantId,
    config: &RedistributionConfig,
) -> Result<Vec<WeightUpdate>> {
    config.validate()?;
    Ok(redistribute_validated(participants, chosen, config)?.1)
}

/// Same as `redistribute`, for a validated config, also returning the points
/// each non-chosen participant gained.
pub(crate) fn redistribute_validated(
    participants: &[Participant],
    chosen: ParticipantId,
    config: &RedistributionConfig,
) -> Result<(f64, Vec<WeightUpdate>)> {
    let id_map = validate_run(participants)?;
    let chosen_weight = participants[id_map.to_idx(chosen)?].weight;

    let count = id_map.len();
    let points = compute_points(chosen_weight, count, config);
    let loss = points * (count - 1) as f64;

    tracing::debug!(chosen, chosen_weight, participants = count, points, loss, "redistributing weight");

    let updates = participants
        .iter()
        .map(|p| {
            let new_weight = if p.id == chosen { p.weight - loss } else { p.weight + points };
            WeightUpdate { participant: p.id, old_weight: p.weight, new_weight }
        })
        .collect();
    Ok((points, updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectionError;

    fn run(weights: &[(ParticipantId, f64)]) -> Vec<Participant> {
        weights.iter().map(|&(id, w)| Participant::new(id, w, 1)).collect()
    }

    fn new_weights(updates: &[WeightUpdate]) -> Vec<f64> {
        updates.iter().map(|u| u.new_weight).collect()
    }

    fn total_delta(updates: &[WeightUpdate]) -> f64 {
        updates.iter().map(WeightUpdate::delta).sum()
    }

    #[test]
    fn test_capped_redistribution() {
        let participants = run(&[(1, 12.0), (2, 20.0), (3, 8.0)]);
        let updates = redistribute(&participants, 2, &RedistributionConfig::default()).unwrap();

        assert_eq!(new_weights(&updates), vec![17.0, 10.0, 13.0]);
        assert_eq!(updates.iter().map(|u| u.old_weight).sum::<f64>(), 40.0);
        assert_eq!(updates.iter().map(|u| u.new_weight).sum::<f64>(), 40.0);
    }

    #[test]
    fn test_single_participant_unchanged() {
        let participants = run(&[(1, 50.0)]);
        let updates = redistribute(&participants, 1, &RedistributionConfig::default()).unwrap();
        assert_eq!(new_weights(&updates), vec![50.0]);
    }

    #[test]
    fn test_sub_cap_share() {
        let participants = run(&[(1, 2.0), (2, 2.0)]);
        let updates = redistribute(&participants, 1, &RedistributionConfig::default()).unwrap();
        assert_eq!(new_weights(&updates), vec![1.0, 3.0]);
    }

    #[test]
    fn test_weight_below_participant_count_moves_nothing() {
        let participants = run(&[(1, 2.0), (2, 7.0), (3, 4.0)]);
        let updates = redistribute(&participants, 1, &RedistributionConfig::default()).unwrap();
        assert_eq!(new_weights(&updates), vec![2.0, 7.0, 4.0]);
    }

    #[test]
    fn test_fractional_weight_floors() {
        // 11.9 / 3 = 3.97 -> 3
        assert_eq!(points_to_add(11.9, 3, &RedistributionConfig::default()).unwrap(), 3.0);
        assert_eq!(points_to_add(0.0, 3, &RedistributionConfig::default()).unwrap(), 0.0);
    }

    #[test]
    fn test_cap_is_configurable() {
        let cfg = RedistributionConfig::with_points_cap(2);
        assert_eq!(points_to_add(100.0, 4, &cfg).unwrap(), 2.0);

        let uncapped = RedistributionConfig::with_points_cap(u32::MAX);
        assert_eq!(points_to_add(100.0, 4, &uncapped).unwrap(), 25.0);
    }

    #[test]
    fn test_fixed_divisor() {
        let cfg = RedistributionConfig { points_cap: 50, divisor: Divisor::Fixed(10) };
        assert_eq!(points_to_add(95.0, 4, &cfg).unwrap(), 9.0);
        // single participant still moves nothing
        assert_eq!(points_to_add(95.0, 1, &cfg).unwrap(), 0.0);
    }

    #[test]
    fn test_small_fixed_divisor_never_drives_weight_negative() {
        let participants = run(&[(1, 10.0), (2, 10.0), (3, 10.0), (4, 10.0)]);
        let cfg = RedistributionConfig { points_cap: 5, divisor: Divisor::Fixed(1) };
        let updates = redistribute(&participants, 1, &cfg).unwrap();

        // floor(10 / 3) = 3 is all the chosen participant can pay to three others
        assert_eq!(new_weights(&updates), vec![1.0, 13.0, 13.0, 13.0]);
        assert_eq!(total_delta(&updates), 0.0);

        // The output is a valid input for the next run.
        let next: Vec<Participant> = updates
            .iter()
            .map(|u| Participant::new(u.participant, u.new_weight, 1))
            .collect();
        assert!(redistribute(&next, 1, &cfg).is_ok());
    }

    #[test]
    fn test_non_default_configs_keep_weights_non_negative() {
        let configs = [
            RedistributionConfig { points_cap: u32::MAX, divisor: Divisor::Fixed(1) },
            RedistributionConfig { points_cap: 7, divisor: Divisor::Fixed(2) },
            RedistributionConfig { points_cap: u32::MAX, divisor: Divisor::ParticipantCount },
            RedistributionConfig { points_cap: 0, divisor: Divisor::Fixed(3) },
        ];
        for cfg in &configs {
            for size in 1..9i64 {
                for chosen_weight in [0.0, 1.0, 7.0, 13.0, 250.0] {
                    let mut participants: Vec<Participant> =
                        (0..size).map(|i| Participant::new(i, 10.0, 1)).collect();
                    participants[0].weight = chosen_weight;

                    let updates = redistribute(&participants, 0, cfg).unwrap();
                    assert!(
                        updates.iter().all(|u| u.new_weight >= 0.0),
                        "{cfg:?}, size {size}, weight {chosen_weight}: {updates:?}"
                    );
                    assert_eq!(total_delta(&updates), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_conservation_over_many_runs() {
        let cfg = RedistributionConfig::default();
        for size in 1..12i64 {
            let participants: Vec<Participant> =
                (0..size).map(|i| Participant::new(i, (i * 37 % 101) as f64, 1)).collect();
            for chosen in 0..size {
                let updates = redistribute(&participants, chosen, &cfg).unwrap();
                assert_eq!(total_delta(&updates), 0.0, "size {size}, chosen {chosen}");
            }
        }
    }

    #[test]
    fn test_zero_item_participants_still_share() {
        let participants = vec![
            Participant::new(1, 30.0, 2),
            Participant::new(2, 10.0, 0),
            Participant::new(3, 10.0, 1),
        ];
        let updates = redistribute(&participants, 1, &RedistributionConfig::default()).unwrap();
        assert_eq!(new_weights(&updates), vec![20.0, 15.0, 15.0]);
    }

    #[test]
    fn test_output_keeps_input_order() {
        let participants = run(&[(9, 10.0), (3, 10.0), (6, 10.0)]);
        let updates = redistribute(&participants, 3, &RedistributionConfig::default()).unwrap();
        let ids: Vec<ParticipantId> = updates.iter().map(|u| u.participant).collect();
        assert_eq!(ids, vec![9, 3, 6]);
    }

    #[test]
    fn test_unknown_chosen_participant() {
        let participants = run(&[(1, 10.0), (2, 10.0)]);
        let result = redistribute(&participants, 5, &RedistributionConfig::default());
        assert!(matches!(result, Err(SelectionError::UnknownParticipant { participant: 5 })));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let participants = run(&[(1, 10.0), (2, -3.0)]);
        let result = redistribute(&participants, 1, &RedistributionConfig::default());
        assert!(matches!(result, Err(SelectionError::InvalidWeight { participant: 2, .. })));
    }
}
