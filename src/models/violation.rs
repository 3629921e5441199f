//! Rule engine output.
//!
//! This module contains the [`Violation`] type produced by each policy rule and
//! the [`ValidationReport`] envelope the host returns to callers.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies the policy rule that produced a violation.
///
/// The declaration order is the secondary sort key of violation lists.
///
/// # Example
///
/// ```
/// use roster_engine::models::RuleId;
///
/// assert_eq!(RuleId::ManagerCoverage.to_string(), "manager coverage");
/// assert!(RuleId::ConsecutiveRest < RuleId::LeaderEquity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// Three or more consecutive rest days without paid leave.
    ConsecutiveRest,
    /// Fewer working staff than the resolved minimum.
    Understaffing,
    /// Fewer working managers than the weekday rule requires.
    ManagerCoverage,
    /// A novice is working on a weekend.
    NoviceProtection,
    /// Four or more consecutive working days for a member with no wishes.
    NoWishOverwork,
    /// The day's leader is not a manager.
    LeaderIneligible,
    /// A leader is required but none is assigned.
    LeaderAbsent,
    /// Weekend rest count far from the staff mean.
    WeekendEquity,
    /// Leader assignment count far from the mean.
    LeaderEquity,
}

impl RuleId {
    /// Human-readable rule name.
    pub fn name(self) -> &'static str {
        match self {
            RuleId::ConsecutiveRest => "consecutive rest",
            RuleId::Understaffing => "understaffing",
            RuleId::ManagerCoverage => "manager coverage",
            RuleId::NoviceProtection => "novice protection",
            RuleId::NoWishOverwork => "no-wish overwork",
            RuleId::LeaderIneligible => "leader ineligible",
            RuleId::LeaderAbsent => "leader absent",
            RuleId::WeekendEquity => "weekend equity",
            RuleId::LeaderEquity => "leader equity",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a violation blocks the roster or only flags a fairness concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Coverage, eligibility or protection breach.
    Failure,
    /// Fairness deviation.
    Warning,
}

/// A single rule finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Day token the finding is attached to, `None` for period-wide findings.
    pub day: Option<u32>,
    /// Calendar date of `day`.
    pub date: Option<NaiveDate>,
    /// The rule that fired.
    pub rule: RuleId,
    /// The staff member concerned, if the finding is about one person.
    pub staff: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Failure or warning.
    pub severity: Severity,
}

impl Violation {
    /// Creates a finding attached to one day.
    pub fn on_day(
        day: u32,
        date: NaiveDate,
        rule: RuleId,
        staff: Option<&str>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            day: Some(day),
            date: Some(date),
            rule,
            staff: staff.map(str::to_string),
            message: message.into(),
            severity,
        }
    }

    /// Creates a finding about the period as a whole.
    pub fn period_wide(
        rule: RuleId,
        staff: Option<&str>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            day: None,
            date: None,
            rule,
            staff: staff.map(str::to_string),
            message: message.into(),
            severity,
        }
    }

    /// True for [`Severity::Failure`].
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }

    /// Output order: dated findings by date, then period-wide findings; ties
    /// broken by rule and then staff name.
    pub fn output_order(&self, other: &Self) -> Ordering {
        let by_date = match (self.date, other.date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date
            .then(self.rule.cmp(&other.rule))
            .then_with(|| self.staff.cmp(&other.staff))
    }
}

/// Sorts findings into output order. The sort is stable, so findings that tie
/// keep the order the rules produced them in.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(Violation::output_order);
}

/// The result of one validation run, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Unique identifier for this run.
    pub report_id: Uuid,
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that produced the report.
    pub engine_version: String,
    /// Period label such as `"10-11"`.
    pub period: String,
    /// Findings in output order.
    pub violations: Vec<Violation>,
    /// Number of failures.
    pub failures: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Evaluation time in microseconds.
    pub duration_us: u64,
}

impl ValidationReport {
    /// Wraps an already ordered violation list.
    pub fn new(period: impl Into<String>, violations: Vec<Violation>, duration_us: u64) -> Self {
        let failures = violations.iter().filter(|v| v.is_failure()).count();
        Self {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            period: period.into(),
            warnings: violations.len() - failures,
            failures,
            violations,
            duration_us,
        }
    }

    /// True when no rule produced a failure.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_sort_by_date_then_rule_then_staff() {
        let mut violations = vec![
            Violation::period_wide(RuleId::WeekendEquity, Some("Ito"), "w", Severity::Warning),
            Violation::on_day(
                3,
                make_date("2025-11-03"),
                RuleId::Understaffing,
                None,
                "u",
                Severity::Failure,
            ),
            Violation::on_day(
                20,
                make_date("2025-10-20"),
                RuleId::NoviceProtection,
                Some("Sato"),
                "n",
                Severity::Failure,
            ),
            Violation::on_day(
                20,
                make_date("2025-10-20"),
                RuleId::NoviceProtection,
                Some("Abe"),
                "n",
                Severity::Failure,
            ),
            Violation::on_day(
                20,
                make_date("2025-10-20"),
                RuleId::ConsecutiveRest,
                Some("Sato"),
                "c",
                Severity::Failure,
            ),
        ];
        sort_violations(&mut violations);

        let order: Vec<(Option<u32>, RuleId, Option<&str>)> = violations
            .iter()
            .map(|v| (v.day, v.rule, v.staff.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Some(20), RuleId::ConsecutiveRest, Some("Sato")),
                (Some(20), RuleId::NoviceProtection, Some("Abe")),
                (Some(20), RuleId::NoviceProtection, Some("Sato")),
                (Some(3), RuleId::Understaffing, None),
                (None, RuleId::WeekendEquity, Some("Ito")),
            ]
        );
    }

    #[test]
    fn test_report_counts_failures_and_warnings() {
        let violations = vec![
            Violation::period_wide(RuleId::LeaderEquity, Some("Ito"), "l", Severity::Warning),
            Violation::on_day(
                16,
                make_date("2025-10-16"),
                RuleId::LeaderAbsent,
                None,
                "a",
                Severity::Failure,
            ),
        ];
        let report = ValidationReport::new("10-11", violations, 42);
        assert_eq!(report.failures, 1);
        assert_eq!(report.warnings, 1);
        assert!(!report.is_clean());
        assert_eq!(report.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_rule_id_serialization() {
        let json = serde_json::to_string(&RuleId::NoWishOverwork).unwrap();
        assert_eq!(json, "\"no_wish_overwork\"");
        assert_eq!(RuleId::NoWishOverwork.to_string(), "no-wish overwork");
    }
}
