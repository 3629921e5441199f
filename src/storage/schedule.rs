//! Schedule documents (`schedule_{YYYY}{MM}_16-15.json`).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::DataPaths;
use crate::error::{EngineError, EngineResult};
use crate::models::{DayStatus, ShiftCell, ShiftGrid, WishOverlay};

use super::{read_json, write_json};

/// Leader values that mean "no leader".
const NO_LEADER: [&str; 2] = ["", "-"];

/// The persisted form of a grid. Day tokens are written as string keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleDocument {
    /// Base year of the period.
    pub year: i32,
    /// Base month of the period.
    pub month: u32,
    /// Day tokens in calendar order.
    pub days: Vec<u32>,
    /// Status symbol per staff and day.
    pub status: BTreeMap<String, BTreeMap<String, String>>,
    /// Wish flag per staff and day.
    pub wishes: BTreeMap<String, BTreeMap<String, bool>>,
    /// Paid-wish flag per staff and day.
    pub wish_paid: BTreeMap<String, BTreeMap<String, bool>>,
    /// Leader name per assigned day.
    pub leaders: BTreeMap<String, String>,
}

impl ScheduleDocument {
    /// Captures the full state of a grid.
    pub fn from_grid(grid: &ShiftGrid) -> Self {
        let period = grid.period();
        let mut status = BTreeMap::new();
        let mut wishes = BTreeMap::new();
        let mut wish_paid = BTreeMap::new();

        for (index, member) in grid.staff().iter().enumerate() {
            let mut status_row = BTreeMap::new();
            let mut wish_row = BTreeMap::new();
            let mut paid_row = BTreeMap::new();
            for (day, cell) in grid.calendar().iter().zip(grid.row(index)) {
                let key = day.token.to_string();
                let (wish, paid) = cell.wish.flags();
                status_row.insert(key.clone(), cell.status.symbol().to_string());
                wish_row.insert(key.clone(), wish);
                paid_row.insert(key, paid);
            }
            status.insert(member.name.clone(), status_row);
            wishes.insert(member.name.clone(), wish_row);
            wish_paid.insert(member.name.clone(), paid_row);
        }

        let leaders = grid
            .calendar()
            .iter()
            .zip(grid.leaders())
            .filter_map(|(day, leader)| {
                leader.map(|index| (day.token.to_string(), grid.staff()[index].name.clone()))
            })
            .collect();

        Self {
            year: period.year(),
            month: period.month(),
            days: period.days(),
            status,
            wishes,
            wish_paid,
            leaders,
        }
    }

    /// Populates a grid from a parsed document.
    ///
    /// Unknown staff, unknown day keys and unknown status symbols are skipped;
    /// unknown leader names are dropped with a warning.
    pub fn apply(document: &Value, grid: &mut ShiftGrid) {
        let rows: Vec<_> = grid
            .staff()
            .iter()
            .map(|member| {
                let row = |key: &str| day_map(document.get(key).and_then(|m| m.get(&member.name)));
                (row("status"), row("wishes"), row("wish_paid"))
            })
            .collect();

        grid.load_cells(|index, token| {
            let (status_row, wish_row, paid_row) = &rows[index];
            let status = status_row
                .get(&token)
                .and_then(|v| v.as_str())
                .and_then(DayStatus::from_symbol)
                .unwrap_or_default();
            let flag = |row: &BTreeMap<u32, &Value>| {
                row.get(&token).and_then(|v| v.as_bool()).unwrap_or(false)
            };
            ShiftCell {
                status,
                wish: WishOverlay::from_flags(flag(wish_row), flag(paid_row)),
            }
        });

        let leaders = day_map(document.get("leaders"));
        for (token, value) in leaders {
            let Some(name) = value.as_str().map(str::trim) else {
                continue;
            };
            if NO_LEADER.contains(&name) {
                continue;
            }
            match grid.set_leader(token, Some(name)) {
                Ok(()) => {}
                Err(EngineError::StaffNotFound { .. }) => {
                    warn!(day = token, leader = %name, "Dropping leader not in staff directory");
                }
                Err(e) => debug!(day = token, error = %e, "Skipping leader entry"),
            }
        }
    }
}

/// Parses an object keyed by day tokens; keys that are not integers are
/// skipped.
fn day_map(value: Option<&Value>) -> BTreeMap<u32, &Value> {
    value
        .and_then(Value::as_object)
        .map(|object| {
            object
                .iter()
                .filter_map(|(key, value)| key.trim().parse::<u32>().ok().map(|day| (day, value)))
                .collect()
        })
        .unwrap_or_default()
}

/// Loads the period's schedule into `grid`.
///
/// Returns `false` and leaves the grid untouched when no usable document
/// exists.
pub fn load_schedule(paths: &DataPaths, grid: &mut ShiftGrid) -> bool {
    let path = paths.schedule(grid.period());
    match read_json(&path) {
        Ok(document) => {
            ScheduleDocument::apply(&document, grid);
            debug!(path = %path.display(), "Schedule loaded");
            true
        }
        Err(EngineError::ConfigNotFound { .. }) => false,
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable schedule");
            false
        }
    }
}

/// Writes the grid to its period's schedule file.
pub fn save_schedule(paths: &DataPaths, grid: &ShiftGrid) -> EngineResult<PathBuf> {
    let path = paths.schedule(grid.period());
    write_json(&path, &ScheduleDocument::from_grid(grid))?;
    info!(path = %path.display(), period = %grid.period().label(), "Schedule saved");
    Ok(path)
}
