//! Configuration types for roster validation.
//!
//! This module contains the strongly-typed policy structures read from the
//! data directory. [`PolicyConfig`] is the read-only snapshot the grid and the
//! rule engine consume for one validation run.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DayKind, Staff};

/// Longest vacation interval a member may book.
pub const MAX_VACATION_DAYS: u32 = 14;

/// Weekday index used for holidays (Sunday).
const SUNDAY_INDEX: u32 = 6;

/// Coverage requirements for one weekday.
///
/// Missing fields and missing weekdays default to no requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekdayRule {
    /// Minimum number of working staff.
    pub min_work: u32,
    /// Minimum number of working managers.
    pub min_managers: u32,
    /// Whether the day must have a leader assigned.
    pub leader_required: bool,
}

/// A named date range that raises the working-staff minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialQuotaPeriod {
    /// Display name, e.g. "Golden Week".
    pub name: String,
    /// First covered date.
    pub start: NaiveDate,
    /// Last covered date.
    pub end: NaiveDate,
    /// Minimum working staff on covered dates.
    pub min_work: u32,
}

impl SpecialQuotaPeriod {
    /// True when `date` lies inside the inclusive range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A booked long vacation of one member.
///
/// # Example
///
/// ```
/// use roster_engine::config::LongVacation;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2025, 8, 11).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();
/// let vacation = LongVacation::new("Sato", "Summer", start, end, 3).unwrap();
/// assert_eq!(vacation.days, 7);
/// assert_eq!(vacation.paid_cap, 3);
///
/// assert!(LongVacation::new("Sato", "Summer", start, end, 4).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongVacation {
    /// Member the vacation belongs to.
    pub member: String,
    /// Title of the vacation.
    #[serde(rename = "name")]
    pub title: String,
    /// First day off.
    pub start: NaiveDate,
    /// Last day off.
    pub end: NaiveDate,
    /// Length of the interval in days.
    pub days: u32,
    /// Paid days allowed, half the interval rounded down.
    pub paid_cap: u32,
    /// Paid days taken.
    pub paid_used: u32,
}

impl LongVacation {
    /// Creates a vacation, deriving `days` and `paid_cap` from the dates.
    ///
    /// Fails with [`EngineError::InvalidVacation`] when the end precedes the
    /// start, the interval exceeds [`MAX_VACATION_DAYS`], or `paid_used`
    /// exceeds the cap.
    pub fn new(
        member: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        paid_used: u32,
    ) -> EngineResult<Self> {
        let member = member.into();
        let invalid = |message: String| EngineError::InvalidVacation {
            member: member.clone(),
            message,
        };

        if end < start {
            return Err(invalid(format!("end {end} is before start {start}")));
        }
        let days = (end - start).num_days() + 1;
        if days > i64::from(MAX_VACATION_DAYS) {
            return Err(invalid(format!(
                "{days} days exceeds the {MAX_VACATION_DAYS}-day limit"
            )));
        }

        let days = days as u32;
        let paid_cap = days / 2;
        if paid_used > paid_cap {
            return Err(invalid(format!(
                "paid days used ({paid_used}) exceed the cap of {paid_cap}"
            )));
        }

        Ok(Self {
            title: title.into(),
            member,
            start,
            end,
            days,
            paid_cap,
            paid_used,
        })
    }

    /// True when `date` lies inside the inclusive interval.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Explicit dates treated like Sundays for coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet(BTreeSet<NaiveDate>);

impl HolidaySet {
    /// True when `date` is listed.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    /// Number of listed dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no dates are listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Engine tunables read from `rules.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Allowed distance from the mean weekend rest count.
    pub weekend_deviation_threshold: Decimal,
    /// Allowed distance from the mean leader assignment count.
    pub leader_deviation_threshold: Decimal,
    /// Days after hiring during which a member is protected from weekend work.
    pub novice_window_days: i64,
    /// Working-day run length that triggers the no-wish overwork rule.
    pub overwork_run_length: usize,
    /// Rest run length that requires a paid day.
    pub rest_run_length: usize,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            weekend_deviation_threshold: Decimal::ONE,
            leader_deviation_threshold: Decimal::ONE,
            novice_window_days: 30,
            overwork_run_length: 4,
            rest_run_length: 3,
        }
    }
}

/// Read-only policy snapshot for one validation run.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    /// Staff directory in display order.
    pub staff: Vec<Staff>,
    /// Booked long vacations.
    pub vacations: Vec<LongVacation>,
    /// Coverage rules keyed by weekday index (0 = Monday).
    pub weekday_rules: BTreeMap<u32, WeekdayRule>,
    /// Quota periods raising the staffing minimum.
    pub special_quotas: Vec<SpecialQuotaPeriod>,
    /// Sunday-equivalent dates.
    pub holidays: HolidaySet,
    /// Engine tunables.
    pub settings: RuleSettings,
}

impl PolicyConfig {
    /// True when `date` is a listed holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(date)
    }

    /// Coverage classification of `date`.
    pub fn day_kind(&self, date: NaiveDate) -> DayKind {
        DayKind::classify(date, self.is_holiday(date))
    }

    /// The weekday rule that applies on `date`; holidays use Sunday's rule.
    pub fn rule_for(&self, date: NaiveDate) -> WeekdayRule {
        let weekday = if self.is_holiday(date) {
            SUNDAY_INDEX
        } else {
            date.weekday().num_days_from_monday()
        };
        self.weekday_rules
            .get(&weekday)
            .copied()
            .unwrap_or_default()
    }

    /// Resolved working-staff minimum: the larger of the weekday rule and
    /// every quota period covering `date`.
    pub fn required_work(&self, date: NaiveDate) -> u32 {
        self.special_quotas
            .iter()
            .filter(|quota| quota.covers(date))
            .map(|quota| quota.min_work)
            .fold(self.rule_for(date).min_work, u32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn rule(min_work: u32, min_managers: u32, leader_required: bool) -> WeekdayRule {
        WeekdayRule {
            min_work,
            min_managers,
            leader_required,
        }
    }

    #[test]
    fn test_special_quota_overrides_weekday_minimum() {
        let mut policy = PolicyConfig::default();
        for weekday in 0..7 {
            policy.weekday_rules.insert(weekday, rule(5, 1, false));
        }
        policy.special_quotas.push(SpecialQuotaPeriod {
            name: "Golden Week".to_string(),
            start: make_date("2025-05-03"),
            end: make_date("2025-05-06"),
            min_work: 8,
        });

        for date in ["2025-05-03", "2025-05-04", "2025-05-05", "2025-05-06"] {
            assert_eq!(policy.required_work(make_date(date)), 8, "{date}");
        }
        assert_eq!(policy.required_work(make_date("2025-05-02")), 5);
        assert_eq!(policy.required_work(make_date("2025-05-07")), 5);
    }

    #[test]
    fn test_lower_quota_does_not_reduce_minimum() {
        let mut policy = PolicyConfig::default();
        policy.weekday_rules.insert(0, rule(5, 0, false));
        policy.special_quotas.push(SpecialQuotaPeriod {
            name: "Quiet week".to_string(),
            start: make_date("2025-05-05"),
            end: make_date("2025-05-05"),
            min_work: 2,
        });
        assert_eq!(policy.required_work(make_date("2025-05-05")), 5);
    }

    #[test]
    fn test_missing_weekday_rule_defaults_to_zero() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.rule_for(make_date("2025-05-05")), WeekdayRule::default());
        assert_eq!(policy.required_work(make_date("2025-05-05")), 0);
    }

    #[test]
    fn test_holiday_uses_sunday_rule() {
        let mut policy = PolicyConfig::default();
        policy.weekday_rules.insert(0, rule(6, 2, true));
        policy.weekday_rules.insert(6, rule(3, 1, false));
        policy.holidays = [make_date("2025-05-05")].into_iter().collect();

        let holiday = make_date("2025-05-05");
        assert_eq!(policy.rule_for(holiday), rule(3, 1, false));
        assert_eq!(policy.day_kind(holiday), DayKind::SundayOrHoliday);
        assert_eq!(policy.rule_for(make_date("2025-05-12")), rule(6, 2, true));
    }

    #[test]
    fn test_vacation_rejects_long_interval() {
        let result = LongVacation::new(
            "Sato",
            "Trip",
            make_date("2025-08-01"),
            make_date("2025-08-15"),
            0,
        );
        assert!(matches!(result, Err(EngineError::InvalidVacation { .. })));

        let fourteen = LongVacation::new(
            "Sato",
            "Trip",
            make_date("2025-08-01"),
            make_date("2025-08-14"),
            7,
        )
        .unwrap();
        assert_eq!(fourteen.days, 14);
        assert_eq!(fourteen.paid_cap, 7);
    }

    #[test]
    fn test_vacation_rejects_reversed_dates() {
        let result = LongVacation::new(
            "Sato",
            "Trip",
            make_date("2025-08-10"),
            make_date("2025-08-01"),
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_vacation_paid_cap_rounds_down() {
        let vacation = LongVacation::new(
            "Ito",
            "Trip",
            make_date("2025-08-01"),
            make_date("2025-08-03"),
            1,
        )
        .unwrap();
        assert_eq!(vacation.paid_cap, 1);
        assert!(vacation.covers(make_date("2025-08-03")));
        assert!(!vacation.covers(make_date("2025-08-04")));
    }

    #[test]
    fn test_rule_settings_partial_yaml() {
        let yaml = "weekend_deviation_threshold: 1.5\nrest_run_length: 4\n";
        let settings: RuleSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.weekend_deviation_threshold, Decimal::new(15, 1));
        assert_eq!(settings.leader_deviation_threshold, Decimal::ONE);
        assert_eq!(settings.rest_run_length, 4);
        assert_eq!(settings.novice_window_days, 30);
    }
}
