//! The rule engine.
//!
//! [`RuleEngine`] runs every policy rule over an immutable snapshot of a grid,
//! its policy and the previous period's tail, and returns the findings in a
//! deterministic order. It holds no state and caches nothing, so repeated
//! calls on the same inputs return identical lists.

use std::time::Instant;

use tracing::debug;

use crate::config::PolicyConfig;
use crate::models::{ShiftGrid, TailLinkage, ValidationReport, Violation, sort_violations};

use super::{
    check_consecutive_rest, check_leader_eligibility, check_leader_equity, check_manager_coverage,
    check_no_wish_overwork, check_novice_protection, check_understaffing, check_weekend_equity,
};

/// Stateless evaluator of the scheduling policies.
///
/// # Example
///
/// ```
/// use roster_engine::config::PolicyConfig;
/// use roster_engine::models::{Period, ShiftGrid, Staff, TailLinkage};
/// use roster_engine::rules::RuleEngine;
///
/// let mut grid = ShiftGrid::new(Period::new(2025, 10).unwrap(), vec![Staff::new("Sato", true)], &[]);
/// for day in [20, 21, 22] {
///     grid.toggle_status(0, day).unwrap();
/// }
/// let report = RuleEngine::validate(&grid, &PolicyConfig::default(), &TailLinkage::new());
/// assert!(report.violations.iter().any(|v| v.rule.name() == "consecutive rest"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    /// Evaluates every rule and returns the findings in output order: by
    /// date, then rule, then staff name, with period-wide warnings last.
    ///
    /// An empty staff directory yields no findings.
    pub fn evaluate(grid: &ShiftGrid, policy: &PolicyConfig, tail: &TailLinkage) -> Vec<Violation> {
        if grid.staff().is_empty() {
            return Vec::new();
        }
        let settings = &policy.settings;

        let mut violations = Vec::new();
        violations.extend(check_consecutive_rest(grid, tail, settings.rest_run_length));
        violations.extend(check_understaffing(grid, policy));
        violations.extend(check_manager_coverage(grid, policy));
        violations.extend(check_novice_protection(grid, settings.novice_window_days));
        violations.extend(check_no_wish_overwork(grid, settings.overwork_run_length));
        violations.extend(check_leader_eligibility(grid, policy));
        violations.extend(check_weekend_equity(
            grid,
            settings.weekend_deviation_threshold,
        ));
        violations.extend(check_leader_equity(grid, settings.leader_deviation_threshold));

        sort_violations(&mut violations);
        violations
    }

    /// Evaluates the grid and wraps the findings in a timed report.
    pub fn validate(grid: &ShiftGrid, policy: &PolicyConfig, tail: &TailLinkage) -> ValidationReport {
        let start = Instant::now();
        let violations = Self::evaluate(grid, policy, tail);
        let duration_us = start.elapsed().as_micros() as u64;

        let report = ValidationReport::new(grid.period().label(), violations, duration_us);
        debug!(
            period = %report.period,
            failures = report.failures,
            warnings = report.warnings,
            duration_us,
            "Validation complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeekdayRule;
    use crate::models::{DayStatus, Period, RuleId, Severity, Staff, TailRecord};
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    /// Rests every other day so no rule fires by default.
    fn make_quiet_grid(staff: Vec<Staff>) -> ShiftGrid {
        let mut grid = ShiftGrid::new(Period::new(2025, 10).unwrap(), staff, &[]);
        let days = grid.period().days();
        for index in 0..grid.staff().len() {
            for token in days.iter().skip(index % 2).step_by(2) {
                grid.toggle_status(index, *token).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_empty_roster_yields_nothing() {
        let grid = ShiftGrid::new(Period::new(2025, 10).unwrap(), Vec::new(), &[]);
        let mut policy = PolicyConfig::default();
        policy.weekday_rules.insert(
            0,
            WeekdayRule {
                min_work: 3,
                min_managers: 1,
                leader_required: true,
            },
        );
        assert!(RuleEngine::evaluate(&grid, &policy, &TailLinkage::new()).is_empty());
    }

    #[test]
    fn test_quiet_grid_has_no_findings() {
        let grid = make_quiet_grid(vec![Staff::new("Sato", true), Staff::new("Ito", true)]);
        let violations = RuleEngine::evaluate(&grid, &PolicyConfig::default(), &TailLinkage::new());
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_findings_are_sorted_and_repeatable() {
        let mut grid = make_quiet_grid(vec![
            Staff::new("Sato", true),
            Staff::new("Abe", false).hired_on(make_date("2025-10-10")),
        ]);
        grid.set_leader(3, Some("Abe")).unwrap();
        // Three rest days for Sato across the month boundary
        for token in [31, 1] {
            if grid.status(0, token).unwrap().is_working() {
                grid.toggle_status(0, token).unwrap();
            }
        }
        if grid.status(0, 30).unwrap().is_working() {
            grid.toggle_status(0, 30).unwrap();
        }

        let mut policy = PolicyConfig::default();
        policy.weekday_rules.insert(
            0,
            WeekdayRule {
                min_work: 0,
                min_managers: 1,
                leader_required: false,
            },
        );

        let tail = TailLinkage::new();
        let first = RuleEngine::evaluate(&grid, &policy, &tail);
        let second = RuleEngine::evaluate(&grid, &policy, &tail);
        assert_eq!(first, second);

        let dated: Vec<NaiveDate> = first.iter().filter_map(|v| v.date).collect();
        let mut sorted = dated.clone();
        sorted.sort();
        assert_eq!(dated, sorted);

        let rules: Vec<RuleId> = first.iter().map(|v| v.rule).collect();
        assert!(rules.contains(&RuleId::ConsecutiveRest));
        assert!(rules.contains(&RuleId::NoviceProtection));
        assert!(rules.contains(&RuleId::LeaderIneligible));

        // Period-wide findings come last
        let first_undated = first.iter().position(|v| v.date.is_none()).unwrap_or(first.len());
        assert!(first[first_undated..].iter().all(|v| v.date.is_none()));
    }

    #[test]
    fn test_tail_feeds_consecutive_rest() {
        let mut grid = ShiftGrid::new(
            Period::new(2025, 10).unwrap(),
            vec![Staff::new("Sato", true)],
            &[],
        );
        grid.toggle_status(0, 16).unwrap();
        grid.toggle_status(0, 18).unwrap();

        let mut tail = TailLinkage::new();
        tail.insert(
            "Sato",
            TailRecord::new([DayStatus::Work, DayStatus::Work, DayStatus::Rest, DayStatus::Rest]),
        );

        let violations = RuleEngine::evaluate(&grid, &PolicyConfig::default(), &tail);
        let rest: Vec<&Violation> = violations
            .iter()
            .filter(|v| v.rule == RuleId::ConsecutiveRest)
            .collect();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].day, Some(16));
        assert_eq!(rest[0].severity, Severity::Failure);

        let without_tail = RuleEngine::evaluate(&grid, &PolicyConfig::default(), &TailLinkage::new());
        assert!(without_tail.iter().all(|v| v.rule != RuleId::ConsecutiveRest));
    }

    #[test]
    fn test_settings_drive_rule_parameters() {
        let mut grid = ShiftGrid::new(
            Period::new(2025, 10).unwrap(),
            vec![Staff::new("Sato", true)],
            &[],
        );
        for day in [20, 21] {
            grid.toggle_status(0, day).unwrap();
        }
        let mut policy = PolicyConfig::default();
        policy.settings.overwork_run_length = 100;
        assert!(RuleEngine::evaluate(&grid, &policy, &TailLinkage::new()).is_empty());

        policy.settings.rest_run_length = 2;
        let violations = RuleEngine::evaluate(&grid, &policy, &TailLinkage::new());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, RuleId::ConsecutiveRest);
    }

    #[test]
    fn test_validate_wraps_report() {
        let grid = make_quiet_grid(vec![Staff::new("Sato", true)]);
        let report = RuleEngine::validate(&grid, &PolicyConfig::default(), &TailLinkage::new());
        assert_eq!(report.period, "10-11");
        assert!(report.is_clean());
        assert_eq!(report.violations.len(), report.failures + report.warnings);
    }
}
