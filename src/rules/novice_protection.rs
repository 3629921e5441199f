//! Keeps recently hired staff off weekend shifts.

use crate::models::{RuleId, Severity, ShiftGrid, Violation};

/// Flags Saturdays and Sundays on which a novice is working.
///
/// A member is a novice when hired no more than `window_days` before the
/// period's first date. Days before the hire date are not checked.
pub fn check_novice_protection(grid: &ShiftGrid, window_days: i64) -> Vec<Violation> {
    let first_date = grid.period().first_date();
    let mut violations = Vec::new();

    for (index, member) in grid.staff().iter().enumerate() {
        let Some(hired) = member.hire_date else {
            continue;
        };
        if !member.is_novice_at(first_date, window_days) {
            continue;
        }

        for (day, cell) in grid.calendar().iter().zip(grid.row(index)) {
            if day.is_weekend() && day.date >= hired && cell.status.is_working() {
                violations.push(Violation::on_day(
                    day.token,
                    day.date,
                    RuleId::NoviceProtection,
                    Some(&member.name),
                    format!(
                        "{} (hired {}) is working on a weekend",
                        member.name,
                        hired.format("%Y-%m-%d")
                    ),
                    Severity::Failure,
                ));
            }
        }
    }
    violations
}
