//! Leader assignment checks.

use crate::config::PolicyConfig;
use crate::models::{RuleId, Severity, ShiftGrid, Violation};

/// Flags leaders who are not managers, and days that require a leader but
/// have none.
///
/// Ineligibility is reported whether or not the day requires a leader.
pub fn check_leader_eligibility(grid: &ShiftGrid, policy: &PolicyConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (day, leader) in grid.calendar().iter().zip(grid.leaders()) {
        match leader.map(|index| &grid.staff()[index]) {
            Some(member) if !member.is_manager => {
                violations.push(Violation::on_day(
                    day.token,
                    day.date,
                    RuleId::LeaderIneligible,
                    Some(&member.name),
                    format!("{} is assigned as leader but is not a manager", member.name),
                    Severity::Failure,
                ));
            }
            Some(_) => {}
            None if policy.rule_for(day.date).leader_required => {
                violations.push(Violation::on_day(
                    day.token,
                    day.date,
                    RuleId::LeaderAbsent,
                    None,
                    "No leader assigned on a day that requires one",
                    Severity::Failure,
                ));
            }
            None => {}
        }
    }
    violations
}
