//! Configuration loading functionality.
//!
//! This module provides [`DataPaths`], which names every document in the data
//! directory, and [`ConfigLoader`], which assembles a [`PolicyConfig`] from
//! them. Loading never fails: missing files become empty defaults and
//! unparsable entries are skipped with a warning.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Period, Staff};
use crate::storage::read_json;

use super::types::{
    HolidaySet, LongVacation, PolicyConfig, RuleSettings, SpecialQuotaPeriod, WeekdayRule,
};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROSTER_DATA_DIR";

/// Data directory used when [`DATA_DIR_ENV`] is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Locations of the documents inside a data directory.
///
/// # Directory Structure
///
/// ```text
/// data/
/// ├── members.json                    # Staff directory
/// ├── long_vacations.json             # Booked long vacations
/// ├── weekday_rules.json              # Coverage per weekday
/// ├── special_quota.json              # Quota periods
/// ├── holidays.json                   # Sunday-equivalent dates
/// ├── rules.yaml                      # Engine tunables (optional)
/// ├── last_tail.json                  # Trailing days per finalized period
/// └── schedule_202510_16-15.json      # One file per period
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Uses `root` as the data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads the data directory from [`DATA_DIR_ENV`], falling back to
    /// [`DEFAULT_DATA_DIR`].
    pub fn from_env() -> Self {
        Self::new(env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()))
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staff directory.
    pub fn members(&self) -> PathBuf {
        self.root.join("members.json")
    }

    /// Long vacations.
    pub fn long_vacations(&self) -> PathBuf {
        self.root.join("long_vacations.json")
    }

    /// Weekday coverage rules.
    pub fn weekday_rules(&self) -> PathBuf {
        self.root.join("weekday_rules.json")
    }

    /// Special quota periods.
    pub fn special_quota(&self) -> PathBuf {
        self.root.join("special_quota.json")
    }

    /// Holiday list.
    pub fn holidays(&self) -> PathBuf {
        self.root.join("holidays.json")
    }

    /// Engine tunables.
    pub fn rules(&self) -> PathBuf {
        self.root.join("rules.yaml")
    }

    /// Tail records of finalized periods.
    pub fn last_tail(&self) -> PathBuf {
        self.root.join("last_tail.json")
    }

    /// Schedule document of one period.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::config::DataPaths;
    /// use roster_engine::models::Period;
    ///
    /// let paths = DataPaths::new("data");
    /// let file = paths.schedule(Period::new(2025, 3).unwrap());
    /// assert!(file.ends_with("schedule_202503_16-15.json"));
    /// ```
    pub fn schedule(&self, period: Period) -> PathBuf {
        self.root.join(format!(
            "schedule_{:04}{:02}_16-15.json",
            period.year(),
            period.month()
        ))
    }
}

#[derive(Debug, Deserialize)]
struct VacationEntry {
    member: String,
    #[serde(default)]
    name: String,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default)]
    paid_used: u32,
}

/// Assembles policy snapshots from a data directory.
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::{ConfigLoader, DataPaths};
///
/// let policy = ConfigLoader::load(&DataPaths::new("./data"));
/// println!("{} staff members", policy.staff.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads every policy document. Never fails.
    pub fn load(paths: &DataPaths) -> PolicyConfig {
        let policy = PolicyConfig {
            staff: Self::load_staff(paths),
            vacations: Self::load_vacations(paths),
            weekday_rules: Self::load_weekday_rules(paths),
            special_quotas: Self::load_special_quotas(paths),
            holidays: Self::load_holidays(paths),
            settings: Self::load_settings(paths),
        };
        debug!(
            root = %paths.root().display(),
            staff = policy.staff.len(),
            vacations = policy.vacations.len(),
            weekday_rules = policy.weekday_rules.len(),
            special_quotas = policy.special_quotas.len(),
            holidays = policy.holidays.len(),
            "Policy loaded"
        );
        policy
    }

    /// Loads the staff directory. Accepts `{"members": [...]}` or a bare list;
    /// entries without a name and repeated names are skipped.
    pub fn load_staff(paths: &DataPaths) -> Vec<Staff> {
        let path = paths.members();
        let Some(document) = Self::read_or_default(&path) else {
            return Vec::new();
        };
        let entries = match document {
            Value::Array(entries) => entries,
            other => Self::section_entries(other, "members"),
        };

        let mut staff: Vec<Staff> = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<Staff>(entry) {
                Ok(member) if member.name.trim().is_empty() => {
                    warn!(path = %path.display(), "Skipping member without a name");
                }
                Ok(member) if staff.iter().any(|s| s.name == member.name) => {
                    warn!(path = %path.display(), name = %member.name, "Skipping duplicate member");
                }
                Ok(member) => staff.push(member),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping malformed member");
                }
            }
        }
        staff
    }

    /// Loads long vacations. Reversed bounds are swapped; entries breaking the
    /// vacation policy are skipped.
    pub fn load_vacations(paths: &DataPaths) -> Vec<LongVacation> {
        let path = paths.long_vacations();
        let Some(document) = Self::read_or_default(&path) else {
            return Vec::new();
        };

        Self::section_entries(document, "vacations")
            .into_iter()
            .filter_map(|entry| {
                let entry: VacationEntry = serde_json::from_value(entry)
                    .map_err(|e| warn!(path = %path.display(), error = %e, "Skipping malformed vacation"))
                    .ok()?;
                let (start, end) = ordered(entry.start, entry.end);
                LongVacation::new(entry.member, entry.name, start, end, entry.paid_used)
                    .map_err(|e| warn!(path = %path.display(), error = %e, "Skipping vacation"))
                    .ok()
            })
            .collect()
    }

    /// Loads weekday rules keyed `"0"` (Monday) to `"6"` (Sunday); other keys
    /// are ignored.
    pub fn load_weekday_rules(paths: &DataPaths) -> BTreeMap<u32, WeekdayRule> {
        let path = paths.weekday_rules();
        let Some(document) = Self::read_or_default(&path) else {
            return BTreeMap::new();
        };
        let Some(Value::Object(rules)) = Self::section(document, "weekday_rules") else {
            return BTreeMap::new();
        };

        rules
            .into_iter()
            .filter_map(|(key, value)| {
                let weekday = key.trim().parse::<u32>().ok().filter(|d| *d <= 6);
                let Some(weekday) = weekday else {
                    warn!(path = %path.display(), key = %key, "Ignoring unknown weekday key");
                    return None;
                };
                serde_json::from_value::<WeekdayRule>(value)
                    .map(|rule| (weekday, rule))
                    .map_err(|e| warn!(path = %path.display(), weekday, error = %e, "Skipping malformed weekday rule"))
                    .ok()
            })
            .collect()
    }

    /// Loads special quota periods, swapping reversed bounds.
    pub fn load_special_quotas(paths: &DataPaths) -> Vec<SpecialQuotaPeriod> {
        let path = paths.special_quota();
        let Some(document) = Self::read_or_default(&path) else {
            return Vec::new();
        };

        Self::section_entries(document, "periods")
            .into_iter()
            .filter_map(|entry| {
                serde_json::from_value::<SpecialQuotaPeriod>(entry)
                    .map_err(|e| warn!(path = %path.display(), error = %e, "Skipping malformed quota period"))
                    .ok()
            })
            .map(|mut quota| {
                (quota.start, quota.end) = ordered(quota.start, quota.end);
                quota
            })
            .collect()
    }

    /// Loads the holiday list, skipping unparsable dates.
    pub fn load_holidays(paths: &DataPaths) -> HolidaySet {
        let path = paths.holidays();
        let Some(document) = Self::read_or_default(&path) else {
            return HolidaySet::default();
        };

        Self::section_entries(document, "holidays")
            .into_iter()
            .filter_map(|entry| {
                let parsed = entry
                    .as_str()
                    .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
                if parsed.is_none() {
                    warn!(path = %path.display(), entry = %entry, "Skipping malformed holiday");
                }
                parsed
            })
            .collect()
    }

    /// Loads `rules.yaml`, falling back to defaults when it is absent or
    /// malformed.
    pub fn load_settings(paths: &DataPaths) -> RuleSettings {
        match Self::load_yaml::<RuleSettings>(&paths.rules()) {
            Ok(settings) => settings,
            Err(EngineError::ConfigNotFound { .. }) => RuleSettings::default(),
            Err(e) => {
                warn!(error = %e, "Using default rule settings");
                RuleSettings::default()
            }
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Reads a JSON document; absent files are silent, unreadable ones warn.
    fn read_or_default(path: &Path) -> Option<Value> {
        match read_json(path) {
            Ok(value) => Some(value),
            Err(EngineError::ConfigNotFound { .. }) => None,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable document");
                None
            }
        }
    }

    fn section(document: Value, key: &str) -> Option<Value> {
        match document {
            Value::Object(mut map) => map.remove(key),
            _ => None,
        }
    }

    fn section_entries(document: Value, key: &str) -> Vec<Value> {
        match Self::section(document, key) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        }
    }
}

fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if b < a { (b, a) } else { (a, b) }
}
