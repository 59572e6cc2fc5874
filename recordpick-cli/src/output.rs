/// Output formatting: terminal table and JSON.
use recordpick_core::{Distribution, HistoryEntry, SelectionResult, SelectionStats};
use serde::Serialize;

use crate::bail;
use crate::roster::Roster;

#[derive(Serialize)]
struct JsonWeight {
    name: String,
    old_weight: f64,
    new_weight: f64,
    delta: f64,
}

#[derive(Serialize)]
struct JsonPick {
    chosen: String,
    record: String,
    points_moved: f64,
    applied: bool,
    weights: Vec<JsonWeight>,
}

#[derive(Serialize)]
struct JsonShare {
    name: String,
    count: usize,
    percent: f64,
}

#[derive(Serialize)]
struct JsonDistribution {
    trials: usize,
    participants: Vec<JsonShare>,
}

#[derive(Serialize)]
struct JsonStats {
    total_selections: usize,
    participants: Vec<JsonShare>,
    records: Vec<JsonShare>,
}

#[derive(Serialize)]
struct JsonRating {
    rater: String,
    score: f64,
}

#[derive(Serialize)]
struct JsonHistoryEntry {
    id: u64,
    timestamp: String,
    chosen: String,
    record: String,
    participants: Vec<String>,
    average_rating: Option<f64>,
    ratings: Vec<JsonRating>,
}

fn print_json_value(value: &impl Serialize) {
    let text = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| bail(format!("Failed to serialize output: {e}")));
    println!("{text}");
}

fn name_of(roster: Option<&Roster>, id: i64) -> String {
    roster.map_or_else(|| format!("#{id}"), |r| r.member_name(id))
}

fn label_of(roster: Option<&Roster>, id: i64) -> String {
    roster.map_or_else(|| format!("#{id}"), |r| r.record_label(id))
}

/// Print a pick as a formatted terminal table.
pub fn print_pick_table(result: &SelectionResult, roster: &Roster, applied: bool) {
    println!("The chosen one is: {}", roster.member_name(result.chosen_participant));
    println!("The record is:     {}", roster.record_label(result.chosen_item));
    println!();

    let name_width = result
        .new_weights
        .iter()
        .map(|u| roster.member_name(u.participant).len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(" {:<name_width$} |   Before |    After |  Change", "Name");
    println!("-{}-|----------|----------|--------", "-".repeat(name_width));
    for u in &result.new_weights {
        println!(
            " {:<name_width$} | {:>8.1} | {:>8.1} | {:>+7.1}",
            roster.member_name(u.participant),
            u.old_weight,
            u.new_weight,
            u.delta(),
        );
    }

    println!("\n{} points moved to each other participant", result.points_moved);
    if !applied {
        println!("Dry run: roster not updated");
    }
}

/// Print a pick as JSON.
pub fn print_pick_json(result: &SelectionResult, roster: &Roster, applied: bool) {
    let weights = result
        .new_weights
        .iter()
        .map(|u| JsonWeight {
            name: roster.member_name(u.participant),
            old_weight: u.old_weight,
            new_weight: u.new_weight,
            delta: u.delta(),
        })
        .collect();

    print_json_value(&JsonPick {
        chosen: roster.member_name(result.chosen_participant),
        record: roster.record_label(result.chosen_item),
        points_moved: result.points_moved,
        applied,
        weights,
    });
}

fn distribution_shares(dist: &Distribution, roster: &Roster) -> Vec<JsonShare> {
    dist.counts
        .iter()
        .map(|&(id, count)| JsonShare {
            name: roster.member_name(id),
            count,
            percent: dist.share(id) * 100.0,
        })
        .collect()
}

pub fn print_distribution_table(dist: &Distribution, roster: &Roster) {
    println!("{} tries distribution:", dist.trials);
    for share in distribution_shares(dist, roster) {
        println!("{}\t{:.1}%", share.name, share.percent);
    }
}

pub fn print_distribution_json(dist: &Distribution, roster: &Roster) {
    print_json_value(&JsonDistribution {
        trials: dist.trials,
        participants: distribution_shares(dist, roster),
    });
}

pub fn print_stats_table(stats: &SelectionStats, roster: Option<&Roster>) {
    println!("{} selections", stats.total_selections);
    if stats.total_selections == 0 {
        return;
    }

    println!("\nBy participant:");
    for &(id, count) in &stats.participant_counts {
        println!("  {:<24} {:>4}  {:>5.1}%", name_of(roster, id), count, stats.participant_share(id));
    }

    println!("\nBy record:");
    for &(id, count) in &stats.item_counts {
        println!("  {:<40} {:>4}  {:>5.1}%", label_of(roster, id), count, stats.item_share(id));
    }
}

pub fn print_stats_json(stats: &SelectionStats, roster: Option<&Roster>) {
    let participants = stats
        .participant_counts
        .iter()
        .map(|&(id, count)| JsonShare {
            name: name_of(roster, id),
            count,
            percent: stats.participant_share(id),
        })
        .collect();
    let records = stats
        .item_counts
        .iter()
        .map(|&(id, count)| JsonShare {
            name: label_of(roster, id),
            count,
            percent: stats.item_share(id),
        })
        .collect();

    print_json_value(&JsonStats {
        total_selections: stats.total_selections,
        participants,
        records,
    });
}

fn rating_cell(entry: &HistoryEntry) -> String {
    match entry.average_rating() {
        Some(avg) => format!("{avg:.1} ({})", entry.ratings.len()),
        None => "-".to_string(),
    }
}

/// Print history entries in the order given, one row each.
pub fn print_history_table(entries: &[&HistoryEntry], roster: Option<&Roster>) {
    if entries.is_empty() {
        println!("No selections");
        return;
    }

    let name_width = entries
        .iter()
        .map(|e| name_of(roster, e.chosen_participant).len())
        .max()
        .unwrap_or(6)
        .max(6);

    println!(" {:>4} | {:<16} | {:<name_width$} | {:<32} | Rating", "#", "When", "Chosen", "Record");
    println!("------|-{}-|-{}-|-{}-|-------", "-".repeat(16), "-".repeat(name_width), "-".repeat(32));
    for entry in entries {
        println!(
            " {:>4} | {:<16} | {:<name_width$} | {:<32} | {}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            name_of(roster, entry.chosen_participant),
            label_of(roster, entry.chosen_item),
            rating_cell(entry),
        );
    }
}

pub fn print_history_json(entries: &[&HistoryEntry], roster: Option<&Roster>) {
    let rows: Vec<JsonHistoryEntry> = entries
        .iter()
        .map(|e| JsonHistoryEntry {
            id: e.id,
            timestamp: e.timestamp.to_rfc3339(),
            chosen: name_of(roster, e.chosen_participant),
            record: label_of(roster, e.chosen_item),
            participants: e.participants.iter().map(|&id| name_of(roster, id)).collect(),
            average_rating: e.average_rating(),
            ratings: e
                .ratings
                .iter()
                .map(|r| JsonRating { rater: name_of(roster, r.rater), score: r.score })
                .collect(),
        })
        .collect();

    print_json_value(&rows);
}
