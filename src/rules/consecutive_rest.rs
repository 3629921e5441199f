//! Consecutive rest paid-leave rule.
//!
//! A run of consecutive rest days at least `run_length` long must contain a
//! paid rest day. Runs are scanned over the previous period's tail followed by
//! the current period, so a run that started before the boundary is measured
//! in full. Runs lying entirely inside the tail were checked when that period
//! was validated and are not reported again.

use chrono::{Days, NaiveDate};

use crate::models::{DayStatus, RuleId, Severity, ShiftGrid, TAIL_LEN, TailLinkage, Violation};

/// A maximal run of rest days within the tail-prefixed status sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RestRun {
    start: usize,
    end: usize,
    paid: bool,
}

fn rest_runs(statuses: &[DayStatus]) -> Vec<RestRun> {
    let mut runs = Vec::new();
    let mut current: Option<RestRun> = None;

    for (position, &status) in statuses.iter().enumerate() {
        if !status.is_rest() {
            runs.extend(current.take());
            continue;
        }
        let paid = status == DayStatus::RestPaid;
        if let Some(run) = current.as_mut() {
            run.end = position + 1;
            run.paid |= paid;
        } else {
            current = Some(RestRun {
                start: position,
                end: position + 1,
                paid,
            });
        }
    }
    runs.extend(current);
    runs
}

/// Checks every staff member for unpaid rest runs of `run_length` or more.
///
/// The violation is attached to the first current-period day of the run.
///
/// # Example
///
/// ```
/// use roster_engine::models::{Period, ShiftGrid, Staff, TailLinkage};
/// use roster_engine::rules::check_consecutive_rest;
///
/// let mut grid = ShiftGrid::new(Period::new(2025, 10).unwrap(), vec![Staff::new("Sato", true)], &[]);
/// for day in [20, 21, 22] {
///     grid.toggle_status(0, day).unwrap();
/// }
/// let violations = check_consecutive_rest(&grid, &TailLinkage::new(), 3);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].day, Some(20));
///
/// grid.toggle_paid_flag(0, 21).unwrap();
/// assert!(check_consecutive_rest(&grid, &TailLinkage::new(), 3).is_empty());
/// ```
pub fn check_consecutive_rest(
    grid: &ShiftGrid,
    tail: &TailLinkage,
    run_length: usize,
) -> Vec<Violation> {
    let calendar = grid.calendar();
    let Some(tail_start) = grid.period().first_date().checked_sub_days(Days::new(TAIL_LEN as u64))
    else {
        return Vec::new();
    };
    let date_at = |position: usize| -> Option<NaiveDate> {
        tail_start.checked_add_days(Days::new(position as u64))
    };

    let mut violations = Vec::new();
    for (index, member) in grid.staff().iter().enumerate() {
        let statuses: Vec<DayStatus> = tail
            .record_for(&member.name)
            .statuses()
            .iter()
            .copied()
            .chain(grid.row(index).iter().map(|cell| cell.status))
            .collect();

        for run in rest_runs(&statuses) {
            let length = run.end - run.start;
            if length < run_length.max(1) || run.paid || run.end <= TAIL_LEN {
                continue;
            }
            let first_in_period = &calendar[run.start.max(TAIL_LEN) - TAIL_LEN];
            let (Some(from), Some(to)) = (date_at(run.start), date_at(run.end - 1)) else {
                continue;
            };
            violations.push(Violation::on_day(
                first_in_period.token,
                first_in_period.date,
                RuleId::ConsecutiveRest,
                Some(&member.name),
                format!(
                    "{}: {} consecutive rest days ({} to {}) without paid leave",
                    member.name,
                    length,
                    from.format("%m/%d"),
                    to.format("%m/%d")
                ),
                Severity::Failure,
            ));
        }
    }
    violations
}
