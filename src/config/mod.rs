//! Policy configuration for the roster engine.
//!
//! This module loads the staff directory, vacations, coverage rules, quota
//! periods, holidays and engine tunables from a data directory into a
//! [`PolicyConfig`] snapshot.
//!
//! # Example
//!
//! ```no_run
//! use roster_engine::config::{ConfigLoader, DataPaths};
//!
//! let policy = ConfigLoader::load(&DataPaths::from_env());
//! println!("Loaded {} staff members", policy.staff.len());
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, DATA_DIR_ENV, DEFAULT_DATA_DIR, DataPaths};
pub use types::{
    HolidaySet, LongVacation, MAX_VACATION_DAYS, PolicyConfig, RuleSettings, SpecialQuotaPeriod,
    WeekdayRule,
};
