use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, RwLock},
};

pub const DEFAULT_RIGHT_APPS: [&str; 2] = ["blender", "houdini"];
pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Validated user settings. Every instance upholds: at least one non-empty
/// fragment, and both durations >= 1 minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub right_apps: Vec<String>,
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            right_apps: DEFAULT_RIGHT_APPS.iter().map(|s| s.to_string()).collect(),
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl Settings {
    pub fn work_total_secs(&self) -> i64 {
        i64::from(self.work_minutes) * 60
    }

    pub fn break_total_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }

    pub fn from_candidate(candidate: &SettingsCandidate) -> Self {
        let mut right_apps: Vec<String> = candidate
            .right_apps
            .iter()
            .map(|fragment| fragment.trim())
            .filter(|fragment| !fragment.is_empty())
            .map(str::to_string)
            .collect();
        if right_apps.is_empty() {
            right_apps = Settings::default().right_apps;
        }

        Self {
            right_apps,
            work_minutes: coerce_minutes(&candidate.work_minutes, DEFAULT_WORK_MINUTES),
            break_minutes: coerce_minutes(&candidate.break_minutes, DEFAULT_BREAK_MINUTES),
        }
    }

    /// True when any approved fragment occurs, case-insensitively, in the
    /// window title or the owning process name.
    pub fn is_approved(&self, title: &str, process_name: &str) -> bool {
        let title = title.to_lowercase();
        let process_name = process_name.to_lowercase();
        self.right_apps.iter().any(|fragment| {
            let fragment = fragment.to_lowercase();
            title.contains(&fragment) || process_name.contains(&fragment)
        })
    }
}

/// Unvalidated settings as typed by the user (or read from a hand-edited file).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsCandidate {
    pub right_apps: Vec<String>,
    pub work_minutes: String,
    pub break_minutes: String,
}

impl SettingsCandidate {
    /// Splits a comma separated list such as `"blender, houdini"`.
    pub fn from_apps_text(apps: &str, work_minutes: &str, break_minutes: &str) -> Self {
        Self {
            right_apps: apps.split(',').map(str::to_string).collect(),
            work_minutes: work_minutes.to_string(),
            break_minutes: break_minutes.to_string(),
        }
    }

    fn from_json(object: &Map<String, Value>) -> Self {
        let right_apps = match object.get("right_apps") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(text)) => text.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };

        Self {
            right_apps,
            work_minutes: minutes_field(object.get("work_minutes")),
            break_minutes: minutes_field(object.get("break_minutes")),
        }
    }
}

impl From<&Settings> for SettingsCandidate {
    fn from(settings: &Settings) -> Self {
        Self {
            right_apps: settings.right_apps.clone(),
            work_minutes: settings.work_minutes.to_string(),
            break_minutes: settings.break_minutes.to_string(),
        }
    }
}

fn minutes_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

// Unparseable input falls back to the field default; parseable but too small
// values are raised to one minute.
fn coerce_minutes(raw: &str, default: u32) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(minutes) => u32::try_from(minutes.max(1)).unwrap_or(u32::MAX),
        Err(_) => default,
    }
}

/// Parses a settings document, merging missing or malformed fields with defaults.
/// Unknown fields are ignored.
pub fn parse_settings(contents: &str) -> Settings {
    match serde_json::from_str::<Value>(contents) {
        Ok(Value::Object(object)) => Settings::from_candidate(&SettingsCandidate::from_json(&object)),
        Ok(_) => {
            warn!("Settings file is not a JSON object; using defaults");
            Settings::default()
        }
        Err(err) => {
            warn!("Failed to parse settings ({err}); using defaults");
            Settings::default()
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Arc<Settings>>,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing or unreadable file yields defaults;
    /// nothing is written until the first [`SettingsStore::update`].
    pub fn load(path: PathBuf) -> Self {
        let data = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => parse_settings(&contents),
                Err(err) => {
                    warn!("Failed to read settings from {}: {err}", path.display());
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        Self {
            path,
            data: RwLock::new(Arc::new(data)),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        let guard = self.data.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// Replaces the in-memory snapshot and writes it to disk. The snapshot is
    /// swapped even when the write fails.
    pub fn update(&self, settings: Arc<Settings>) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(|p| p.into_inner());
        *guard = Arc::clone(&settings);
        self.persist(&settings)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_break_minutes_uses_default() {
        let settings = parse_settings(r#"{"right_apps": ["krita"], "work_minutes": 40}"#);
        assert_eq!(settings.right_apps, vec!["krita".to_string()]);
        assert_eq!(settings.work_minutes, 40);
        assert_eq!(settings.break_minutes, DEFAULT_BREAK_MINUTES);
    }

    #[test]
    fn test_garbage_file_yields_defaults() {
        assert_eq!(parse_settings("not json at all"), Settings::default());
        assert_eq!(parse_settings("[1, 2, 3]"), Settings::default());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let settings = parse_settings(r#"{"work_minutes": 30, "theme": "dark"}"#);
        assert_eq!(settings.work_minutes, 30);
        assert_eq!(settings.right_apps, Settings::default().right_apps);
    }

    #[test]
    fn test_non_numeric_minutes_revert_to_default_not_minimum() {
        let candidate = SettingsCandidate::from_apps_text("blender", "soon", "0");
        let settings = Settings::from_candidate(&candidate);
        assert_eq!(settings.work_minutes, DEFAULT_WORK_MINUTES);
        assert_eq!(settings.break_minutes, 1);
    }

    #[test]
    fn test_negative_minutes_clamp_to_one() {
        let candidate = SettingsCandidate::from_apps_text("blender", " -10 ", "3");
        let settings = Settings::from_candidate(&candidate);
        assert_eq!(settings.work_minutes, 1);
        assert_eq!(settings.break_minutes, 3);
    }

    #[test]
    fn test_empty_fragments_fall_back_to_default_pair() {
        let candidate = SettingsCandidate::from_apps_text(" , ,", "25", "5");
        let settings = Settings::from_candidate(&candidate);
        assert_eq!(settings.right_apps, vec!["blender".to_string(), "houdini".to_string()]);
    }

    #[test]
    fn test_fragments_are_trimmed() {
        let candidate = SettingsCandidate::from_apps_text(" Blender ,, code ", "25", "5");
        let settings = Settings::from_candidate(&candidate);
        assert_eq!(settings.right_apps, vec!["Blender".to_string(), "code".to_string()]);
    }

    #[test]
    fn test_is_approved_matches_title_or_process_case_insensitively() {
        let settings = Settings::default();
        assert!(settings.is_approved("Untitled - BLENDER 4.1", ""));
        assert!(settings.is_approved("", "houdinifx.exe"));
        assert!(!settings.is_approved("YouTube - Firefox", "firefox"));
        assert!(!settings.is_approved("", ""));
    }

    #[test]
    fn test_derived_totals() {
        let settings = Settings {
            right_apps: vec!["x".into()],
            work_minutes: 25,
            break_minutes: 5,
        };
        assert_eq!(settings.work_total_secs(), 1500);
        assert_eq!(settings.break_total_secs(), 300);
    }

    #[test]
    fn test_store_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("pomodoro_settings.json");

        let store = SettingsStore::load(path.clone());
        assert_eq!(*store.current(), Settings::default());
        assert!(!path.exists());

        let updated = Arc::new(Settings {
            right_apps: vec!["godot".into()],
            work_minutes: 50,
            break_minutes: 10,
        });
        store.update(Arc::clone(&updated)).unwrap();

        let reloaded = SettingsStore::load(path);
        assert_eq!(*reloaded.current(), *updated);
    }

    #[test]
    fn test_store_writes_persisted_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pomodoro_settings.json");
        let store = SettingsStore::load(path.clone());
        store.update(Arc::new(Settings::default())).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw["right_apps"], serde_json::json!(["blender", "houdini"]));
        assert_eq!(raw["work_minutes"], 25);
        assert_eq!(raw["break_minutes"], 5);
    }
}
