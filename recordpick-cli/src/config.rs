/// Config file loading and creation for the recordpick CLI.
///
/// Config lives at ~/.config/recordpick/config.toml.
/// All fields are optional; CLI args override config values.
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RecordpickConfig {
    pub roster: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub points_cap: Option<u32>,
    pub trials: Option<usize>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# recordpick configuration
# All values here can be overridden by CLI flags.

# Roster file with members, weights and records
# roster = \"/home/me/club/roster.json\"

# Append one JSON line per pick to this file
# history = \"/home/me/club/history.jsonl\"

# Max points moved to each other participant per pick
# points_cap = 5

# Draws used by `recordpick simulate`
# trials = 1000
";

/// `$HOME/.config/recordpick/config.toml`.
pub fn config_path() -> Result<PathBuf, String> {
    let home = std::env::var_os("HOME").ok_or("HOME is not set; pass --config <file>")?;
    Ok(PathBuf::from(home).join(".config").join("recordpick").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<RecordpickConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// A missing file means "no overrides": every field stays `None`.
pub fn load_config(path: &Path) -> Result<RecordpickConfig, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RecordpickConfig::default()),
        Err(e) => return Err(format!("Failed to read config {}: {e}", path.display())),
    };
    parse_config(&content).map_err(|e| format!("{}: invalid config: {e}", path.display()))
}

/// Write the commented template to `path`, creating parent directories.
/// An existing file is left alone and reported as an error.
pub fn write_default_config(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => format!("Config already exists at {}", path.display()),
            _ => format!("Failed to create {}: {e}", path.display()),
        })?;
    file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let cfg = parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(cfg.roster.is_none());
        assert!(cfg.points_cap.is_none());
    }

    #[test]
    fn test_parse_values() {
        let cfg = parse_config("roster = \"club.json\"\npoints_cap = 3\ntrials = 500\n").unwrap();
        assert_eq!(cfg.roster, Some(PathBuf::from("club.json")));
        assert_eq!(cfg.points_cap, Some(3));
        assert_eq!(cfg.trials, Some(500));
        assert!(cfg.history.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_config("endpoint = \"http://localhost\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("config.toml")).unwrap();
        assert!(cfg.history.is_none());
        assert!(cfg.trials.is_none());
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "points_cap = \"five\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.contains("config.toml: invalid config"), "{err}");
    }

    #[test]
    fn test_write_default_config_then_refuse_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recordpick").join("config.toml");

        write_default_config(&path).unwrap();
        let cfg = load_config(&path).unwrap();
        assert!(cfg.roster.is_none());

        std::fs::write(&path, "points_cap = 2\n").unwrap();
        let err = write_default_config(&path).unwrap_err();
        assert!(err.contains("already exists"), "{err}");
        assert_eq!(load_config(&path).unwrap().points_cap, Some(2));
    }
}
