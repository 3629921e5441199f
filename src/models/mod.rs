//! Core data models for the roster engine.
//!
//! This module contains the period calendar, the staff directory entry, the
//! layered cell state, the roster grid itself, cross-period tail data and the
//! violation types the rules produce.

mod grid;
mod period;
mod staff;
mod status;
mod tail;
mod violation;

pub use grid::{DaySummary, ShiftGrid, StaffSummary};
pub use period::{
    DayKind, PERIOD_END_DAY, PERIOD_START_DAY, Period, PeriodDay, build_period_days,
    last_day_of_month, resolve,
};
pub use staff::Staff;
pub use status::{CellState, DayStatus, ShiftCell, WishOverlay};
pub use tail::{TAIL_LEN, TailLinkage, TailRecord};
pub use violation::{RuleId, Severity, ValidationReport, Violation, sort_violations};
