/// Input guards shared by the selector and the redistributor.
use crate::error::{Result, SelectionError};
use crate::types::{IdMap, Participant, ParticipantId};

pub(crate) fn check_weight(participant: ParticipantId, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(SelectionError::InvalidWeight { participant, weight });
    }
    Ok(())
}

/// Reject empty runs, repeated ids and negative or non-finite weights.
///
/// Returns the id map so callers that need positions don't build it twice.
pub(crate) fn validate_run(participants: &[Participant]) -> Result<IdMap> {
    if participants.is_empty() {
        return Err(SelectionError::NoEligibleParticipants);
    }
    for p in participants {
        check_weight(p.id, p.weight)?;
    }
    IdMap::from_participants(participants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_rejected() {
        assert!(matches!(validate_run(&[]), Err(SelectionError::NoEligibleParticipants)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let run = [Participant::new(1, 3.0, 1), Participant::new(2, -0.5, 2)];
        match validate_run(&run) {
            Err(SelectionError::InvalidWeight { participant, weight }) => {
                assert_eq!(participant, 2);
                assert_eq!(weight, -0.5);
            }
            other => panic!("expected InvalidWeight, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        assert!(check_weight(1, f64::NAN).is_err());
        assert!(check_weight(1, f64::INFINITY).is_err());
        assert!(check_weight(1, 0.0).is_ok());
    }
}
