/// Roster file: club members, their weights and their records.
///
/// This is the CLI's stand-in for a database. It is read once per run,
/// updated in memory, and replaced in a single rename so a crashed run never
/// leaves half-applied weights behind.
use recordpick_core::constants::DEFAULT_STARTING_WEIGHT;
use recordpick_core::{ItemId, Participant, ParticipantId, SelectionResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub participants: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Default attendee set when no --participant flags are given.
    #[serde(default)]
    pub attending: bool,
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: ItemId,
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub used: bool,
}

fn default_weight() -> f64 {
    DEFAULT_STARTING_WEIGHT
}

impl Record {
    pub fn label(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

impl Member {
    pub fn unused_records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| !r.used)
    }

    pub fn as_participant(&self) -> Participant {
        Participant::new(self.id, self.weight, self.unused_records().count())
    }
}

impl Roster {
    pub fn parse(content: &str) -> Result<Self, String> {
        let roster: Roster = serde_json::from_str(content).map_err(|e| format!("invalid roster JSON: {e}"))?;
        roster.validate()?;
        Ok(roster)
    }

    /// Member ids, member names and record ids must each be unique.
    pub fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut record_ids = HashSet::new();
        for m in &self.participants {
            if !ids.insert(m.id) {
                return Err(format!("duplicate member id {}", m.id));
            }
            if !names.insert(m.name.as_str()) {
                return Err(format!("duplicate member name \"{}\"", m.name));
            }
            for r in &m.records {
                if !record_ids.insert(r.id) {
                    return Err(format!("duplicate record id {}", r.id));
                }
            }
        }
        Ok(())
    }

    pub fn member(&self, id: ParticipantId) -> Option<&Member> {
        self.participants.iter().find(|m| m.id == id)
    }

    pub fn member_name(&self, id: ParticipantId) -> String {
        self.member(id).map_or_else(|| format!("#{id}"), |m| m.name.clone())
    }

    pub fn member_id(&self, name: &str) -> Result<ParticipantId, String> {
        self.participants
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.id)
            .ok_or_else(|| format!("unknown participant \"{name}\""))
    }

    pub fn record(&self, id: ItemId) -> Option<&Record> {
        self.participants.iter().flat_map(|m| m.records.iter()).find(|r| r.id == id)
    }

    pub fn record_label(&self, id: ItemId) -> String {
        self.record(id).map_or_else(|| format!("#{id}"), Record::label)
    }

    /// Members taking part in this run.
    ///
    /// With no names, everyone marked `attending`. Otherwise the named members,
    /// in the order given. Unknown or repeated names are rejected.
    pub fn attendees(&self, names: &[String]) -> Result<Vec<&Member>, String> {
        if names.is_empty() {
            let attending: Vec<&Member> = self.participants.iter().filter(|m| m.attending).collect();
            if attending.is_empty() {
                return Err("nobody is marked as attending; pass --participant <name>".into());
            }
            return Ok(attending);
        }

        let mut seen = HashSet::new();
        names
            .iter()
            .map(|name| {
                if !seen.insert(name.as_str()) {
                    return Err(format!("participant \"{name}\" listed more than once"));
                }
                self.participants
                    .iter()
                    .find(|m| &m.name == name)
                    .ok_or_else(|| format!("unknown participant \"{name}\""))
            })
            .collect()
    }

    /// Apply a run: mark the chosen record used and store every new weight.
    pub fn apply(&mut self, result: &SelectionResult) -> Result<(), String> {
        let chosen = self
            .participants
            .iter_mut()
            .find(|m| m.id == result.chosen_participant)
            .ok_or_else(|| format!("chosen participant {} is not in the roster", result.chosen_participant))?;
        let record = chosen
            .records
            .iter_mut()
            .find(|r| r.id == result.chosen_item)
            .ok_or_else(|| format!("record {} does not belong to {}", result.chosen_item, chosen.name))?;
        if record.used {
            return Err(format!("record {} was already used", record.id));
        }
        record.used = true;

        for update in &result.new_weights {
            let member = self
                .participants
                .iter_mut()
                .find(|m| m.id == update.participant)
                .ok_or_else(|| format!("participant {} is not in the roster", update.participant))?;
            member.weight = update.new_weight;
        }
        Ok(())
    }
}

pub fn candidates(members: &[&Member]) -> Vec<Participant> {
    members.iter().map(|m| m.as_participant()).collect()
}

pub fn item_pool(members: &[&Member]) -> HashMap<ParticipantId, Vec<ItemId>> {
    members
        .iter()
        .map(|m| (m.id, m.unused_records().map(|r| r.id).collect()))
        .collect()
}

pub fn load_roster(path: &Path) -> Result<Roster, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read roster {}: {e}", path.display()))?;
    Roster::parse(&content).map_err(|e| format!("{}: {e}", path.display()))
}

/// Write the roster next to its destination, then rename over it.
pub fn save_roster(path: &Path, roster: &Roster) -> Result<(), String> {
    let body = serde_json::to_string_pretty(roster).map_err(|e| format!("Failed to serialize roster: {e}"))?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).map_err(|e| format!("Failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path).map_err(|e| format!("Failed to replace {}: {e}", path.display()))?;
    Ok(())
}
