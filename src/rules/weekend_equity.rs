//! Weekend rest fairness.

use rust_decimal::Decimal;

use crate::models::{RuleId, Severity, ShiftGrid, Violation};

use super::equity::equity_outliers;

/// Warns about staff whose Saturday/Sunday rest count deviates from the staff
/// mean by more than `threshold`. Holidays falling on weekdays are not
/// counted.
pub fn check_weekend_equity(grid: &ShiftGrid, threshold: Decimal) -> Vec<Violation> {
    let weekend_days = grid.weekend_day_count();
    let tallies: Vec<(&str, usize)> = grid
        .staff()
        .iter()
        .enumerate()
        .map(|(index, member)| {
            let rests = grid.weekend_rest_count(index).unwrap_or_default();
            (member.name.as_str(), rests)
        })
        .collect();

    equity_outliers(&tallies, threshold)
        .into_iter()
        .map(|outlier| {
            Violation::period_wide(
                RuleId::WeekendEquity,
                Some(outlier.name),
                format!(
                    "{} rests on {}/{} weekend days (staff mean {})",
                    outlier.name,
                    outlier.count,
                    weekend_days,
                    outlier.mean.round_dp(2).normalize()
                ),
                Severity::Warning,
            )
        })
        .collect()
}
