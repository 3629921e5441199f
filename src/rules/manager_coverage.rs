//! Working-manager minimum per day.

use crate::config::PolicyConfig;
use crate::models::{RuleId, Severity, ShiftGrid, Violation};

/// Flags days on which fewer managers work than the weekday rule requires.
///
/// The message carries the shortfall as `count/required`.
///
/// # Example
///
/// ```
/// use roster_engine::config::{PolicyConfig, WeekdayRule};
/// use roster_engine::models::{Period, ShiftGrid, Staff};
/// use roster_engine::rules::check_manager_coverage;
///
/// let mut policy = PolicyConfig::default();
/// policy.weekday_rules.insert(0, WeekdayRule { min_managers: 1, ..WeekdayRule::default() });
///
/// let mut grid = ShiftGrid::new(Period::new(2025, 10).unwrap(), vec![Staff::new("Sato", true)], &[]);
/// grid.toggle_status(0, 20).unwrap(); // Monday
///
/// let violations = check_manager_coverage(&grid, &policy);
/// assert_eq!(violations.len(), 1);
/// assert!(violations[0].message.contains("0/1"));
/// ```
pub fn check_manager_coverage(grid: &ShiftGrid, policy: &PolicyConfig) -> Vec<Violation> {
    let managers: Vec<usize> = grid
        .staff()
        .iter()
        .enumerate()
        .filter(|(_, member)| member.is_manager)
        .map(|(index, _)| index)
        .collect();

    grid.calendar()
        .iter()
        .enumerate()
        .filter_map(|(position, day)| {
            let required = policy.rule_for(day.date).min_managers as usize;
            let working = managers
                .iter()
                .filter(|&&staff| grid.row(staff)[position].status.is_working())
                .count();
            (working < required).then(|| {
                Violation::on_day(
                    day.token,
                    day.date,
                    RuleId::ManagerCoverage,
                    None,
                    format!("{working}/{required} managers working"),
                    Severity::Failure,
                )
            })
        })
        .collect()
}
