//! Working-staff minimum per day.

use crate::config::PolicyConfig;
use crate::models::{RuleId, Severity, ShiftGrid, Violation};

/// Flags days whose working count is below the resolved minimum (the larger
/// of the weekday rule and any covering quota period).
pub fn check_understaffing(grid: &ShiftGrid, policy: &PolicyConfig) -> Vec<Violation> {
    grid.calendar()
        .iter()
        .enumerate()
        .filter_map(|(position, day)| {
            let required = policy.required_work(day.date);
            let working = (0..grid.staff().len())
                .filter(|&staff| grid.row(staff)[position].status.is_working())
                .count();
            (working < required as usize).then(|| {
                Violation::on_day(
                    day.token,
                    day.date,
                    RuleId::Understaffing,
                    None,
                    format!(
                        "{working}/{required} staff working ({} short)",
                        required as usize - working
                    ),
                    Severity::Failure,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpecialQuotaPeriod, WeekdayRule};
    use crate::models::{Period, Staff};
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_grid(staff_count: usize) -> ShiftGrid {
        let staff = (0..staff_count)
            .map(|i| Staff::new(format!("Staff {i}"), false))
            .collect();
        ShiftGrid::new(Period::new(2025, 4).unwrap(), staff, &[])
    }

    fn policy_with_min_work(min_work: u32) -> PolicyConfig {
        let mut policy = PolicyConfig::default();
        for weekday in 0..7 {
            policy.weekday_rules.insert(
                weekday,
                WeekdayRule {
                    min_work,
                    ..WeekdayRule::default()
                },
            );
        }
        policy
    }

    #[test]
    fn test_fully_staffed_period_passes() {
        let grid = make_grid(5);
        assert!(check_understaffing(&grid, &policy_with_min_work(5)).is_empty());
    }

    #[test]
    fn test_rest_day_creates_shortfall() {
        let mut grid = make_grid(5);
        grid.toggle_status(2, 20).unwrap();
        let violations = check_understaffing(&grid, &policy_with_min_work(5));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].day, Some(20));
        assert_eq!(violations[0].date, Some(make_date("2025-04-20")));
        assert_eq!(violations[0].message, "4/5 staff working (1 short)");
        assert!(violations[0].staff.is_none());
    }

    /// Quota 2025-05-03..2025-05-06 with min_work 8 over a weekday minimum of
    /// 5: all four dates need eight working staff.
    #[test]
    fn test_special_quota_raises_minimum() {
        let mut policy = policy_with_min_work(5);
        policy.special_quotas.push(SpecialQuotaPeriod {
            name: "Golden Week".to_string(),
            start: make_date("2025-05-03"),
            end: make_date("2025-05-06"),
            min_work: 8,
        });
        let grid = make_grid(6);

        let violations = check_understaffing(&grid, &policy);
        let days: Vec<u32> = violations.iter().filter_map(|v| v.day).collect();
        assert_eq!(days, vec![3, 4, 5, 6]);
        assert!(violations.iter().all(|v| v.message.starts_with("6/8")));
    }

    #[test]
    fn test_no_rules_means_no_minimum() {
        let grid = make_grid(0);
        assert!(check_understaffing(&grid, &PolicyConfig::default()).is_empty());
    }
}
