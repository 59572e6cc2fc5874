/// Statistics derived from a selection history.
///
/// Hand the list of `HistoryEntry` values back here to get per-participant and
/// per-item tallies.
use std::collections::BTreeMap;

use crate::history::HistoryEntry;
use crate::types::{ItemId, ParticipantId};

/// Tallies over a list of history entries.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionStats {
    pub total_selections: usize,
    /// Sorted by count descending, then id ascending.
    pub participant_counts: Vec<(ParticipantId, usize)>,
    /// Sorted by count descending, then id ascending.
    pub item_counts: Vec<(ItemId, usize)>,
}

impl SelectionStats {
    pub fn from_history(entries: &[HistoryEntry]) -> Self {
        let mut by_participant: BTreeMap<ParticipantId, usize> = BTreeMap::new();
        let mut by_item: BTreeMap<ItemId, usize> = BTreeMap::new();

        for entry in entries {
            *by_participant.entry(entry.chosen_participant).or_insert(0) += 1;
            *by_item.entry(entry.chosen_item).or_insert(0) += 1;
        }

        SelectionStats {
            total_selections: entries.len(),
            participant_counts: sorted_counts(by_participant),
            item_counts: sorted_counts(by_item),
        }
    }

    /// Percentage (0 to 100) of selections that went to `participant`.
    pub fn participant_share(&self, participant: ParticipantId) -> f64 {
        percentage(lookup(&self.participant_counts, participant), self.total_selections)
    }

    /// Percentage (0 to 100) of selections that picked `item`.
    pub fn item_share(&self, item: ItemId) -> f64 {
        percentage(lookup(&self.item_counts, item), self.total_selections)
    }
}

fn sorted_counts(counts: BTreeMap<i64, usize>) -> Vec<(i64, usize)> {
    let mut out: Vec<(i64, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    out
}

fn lookup(counts: &[(i64, usize)], id: i64) -> usize {
    counts.iter().find(|(k, _)| *k == id).map_or(0, |(_, c)| *c)
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(chosen_participant: ParticipantId, chosen_item: ItemId) -> HistoryEntry {
        HistoryEntry {
            id: chosen_item as u64,
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            participants: vec![1, 2, 3],
            chosen_participant,
            chosen_item,
            weight_changes: Vec::new(),
            ratings: Vec::new(),
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = SelectionStats::from_history(&[]);
        assert_eq!(stats.total_selections, 0);
        assert!(stats.participant_counts.is_empty());
        assert_eq!(stats.participant_share(1), 0.0);
    }

    #[test]
    fn test_counts_and_shares() {
        let history = vec![entry(1, 10), entry(2, 20), entry(1, 11), entry(3, 30)];
        let stats = SelectionStats::from_history(&history);

        assert_eq!(stats.total_selections, 4);
        assert_eq!(stats.participant_counts, vec![(1, 2), (2, 1), (3, 1)]);
        assert_eq!(stats.participant_share(1), 50.0);
        assert_eq!(stats.participant_share(2), 25.0);
        assert_eq!(stats.participant_share(9), 0.0);
        assert_eq!(stats.item_counts.len(), 4);
        assert_eq!(stats.item_share(20), 25.0);
    }
}
