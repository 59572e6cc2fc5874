/// Selection history as JSONL: one `HistoryEntry` per line.
///
/// Picks append a line. Rating rewrites the whole file through a temp file and
/// a rename, like the roster.
use recordpick_core::HistoryEntry;
use std::io::Write;
use std::path::Path;

pub fn append_entry(path: &Path, entry: &HistoryEntry) -> Result<(), String> {
    let line = serde_json::to_string(entry).map_err(|e| format!("Failed to serialize history entry: {e}"))?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    writeln!(file, "{line}").map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    file.flush().map_err(|e| format!("Failed to flush {}: {e}", path.display()))
}

/// Read every entry. A missing file is an empty history; blank lines are skipped.
pub fn load_history(path: &Path) -> Result<Vec<HistoryEntry>, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(format!("Failed to read history {}: {e}", path.display())),
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| format!("{}:{}: invalid history entry: {e}", path.display(), n + 1))
        })
        .collect()
}

/// Replace the file with `entries`, one per line, in the given order.
pub fn save_history(path: &Path, entries: &[HistoryEntry]) -> Result<(), String> {
    let mut body = String::new();
    for entry in entries {
        let line = serde_json::to_string(entry).map_err(|e| format!("Failed to serialize history entry: {e}"))?;
        body.push_str(&line);
        body.push('\n');
    }

    let tmp = path.with_extension("jsonl.tmp");
    std::fs::write(&tmp, body).map_err(|e| format!("Failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path).map_err(|e| format!("Failed to replace {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use recordpick_core::{rate_entry, WeightUpdate};

    fn entry(id: u64, chosen_participant: i64, chosen_item: i64) -> HistoryEntry {
        HistoryEntry {
            id,
            timestamp: Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
            participants: vec![1, 2],
            chosen_participant,
            chosen_item,
            weight_changes: vec![
                WeightUpdate { participant: 1, old_weight: 2.0, new_weight: 1.0 },
                WeightUpdate { participant: 2, old_weight: 2.0, new_weight: 3.0 },
            ],
            ratings: Vec::new(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = load_history(&dir.path().join("nope.jsonl")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        append_entry(&path, &entry(1, 1, 10)).unwrap();
        append_entry(&path, &entry(2, 2, 20)).unwrap();

        let history = load_history(&path).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], entry(2, 2, 20));
    }

    #[test]
    fn test_lines_without_ratings_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let line = r#"{"id":3,"timestamp":"2024-05-01T19:30:00Z","participants":[1,2],"chosen_participant":2,"chosen_item":201,"weight_changes":[]}"#;
        std::fs::write(&path, format!("{line}\n")).unwrap();

        let history = load_history(&path).unwrap();
        assert_eq!(history[0].id, 3);
        assert_eq!(history[0].timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 19, 30, 0).unwrap());
        assert!(history[0].ratings.is_empty());
    }

    #[test]
    fn test_rating_survives_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        append_entry(&path, &entry(1, 1, 10)).unwrap();
        append_entry(&path, &entry(2, 2, 20)).unwrap();

        let mut history = load_history(&path).unwrap();
        rate_entry(&mut history, 2, 1, 7.5, Utc::now()).unwrap();
        save_history(&path, &history).unwrap();

        let reloaded = load_history(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].average_rating(), None);
        assert_eq!(reloaded[1].average_rating(), Some(7.5));
        assert!(!path.with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_corrupt_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        append_entry(&path, &entry(1, 1, 10)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut f| writeln!(f, "not json"))
            .unwrap();

        let err = load_history(&path).unwrap_err();
        assert!(err.contains(":2:"), "{err}");
    }
}
