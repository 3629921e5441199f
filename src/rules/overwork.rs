//! No-wish overwork rule.
//!
//! Staff who asked for no day off at all are checked for long stretches of
//! work, since nobody else will notice them.

use crate::models::{RuleId, Severity, ShiftGrid, Violation};

/// Flags the first day of every working run of `run_length` or more days,
/// for staff with no wish anywhere in the period. Each maximal run is
/// reported once.
///
/// # Example
///
/// ```
/// use roster_engine::models::{Period, ShiftGrid, Staff};
/// use roster_engine::rules::check_no_wish_overwork;
///
/// let mut grid = ShiftGrid::new(Period::new(2025, 10).unwrap(), vec![Staff::new("Sato", true)], &[]);
/// // Rest every third day: the longest working run is two days.
/// let days = grid.period().days();
/// for token in days.iter().step_by(3) {
///     grid.toggle_status(0, *token).unwrap();
/// }
/// assert!(check_no_wish_overwork(&grid, 4).is_empty());
/// ```
pub fn check_no_wish_overwork(grid: &ShiftGrid, run_length: usize) -> Vec<Violation> {
    let calendar = grid.calendar();
    let run_length = run_length.max(1);
    let mut violations = Vec::new();

    for (index, member) in grid.staff().iter().enumerate() {
        if grid.wish_count(index) > 0 {
            continue;
        }

        let row = grid.row(index);
        let mut position = 0;
        while position < row.len() {
            if !row[position].status.is_working() {
                position += 1;
                continue;
            }
            let start = position;
            while position < row.len() && row[position].status.is_working() {
                position += 1;
            }

            let length = position - start;
            if length >= run_length {
                let day = &calendar[start];
                violations.push(Violation::on_day(
                    day.token,
                    day.date,
                    RuleId::NoWishOverwork,
                    Some(&member.name),
                    format!(
                        "{} works {} consecutive days without any day-off wish",
                        member.name, length
                    ),
                    Severity::Failure,
                ));
            }
        }
    }
    violations
}
