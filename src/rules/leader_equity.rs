//! Leader assignment fairness.

use rust_decimal::Decimal;

use crate::models::{RuleId, Severity, ShiftGrid, Violation};

use super::equity::equity_outliers;

/// Warns about staff whose leader-assignment count deviates from the mean by
/// more than `threshold`.
///
/// The mean is taken over every manager plus anyone actually assigned as
/// leader, not over the whole roster. Non-managers who never lead are left out
/// of the group, so they neither lower the mean nor get warned. A period with
/// no assignments at all is not checked.
pub fn check_leader_equity(grid: &ShiftGrid, threshold: Decimal) -> Vec<Violation> {
    let mut counts = vec![0usize; grid.staff().len()];
    for index in grid.leaders().iter().flatten() {
        counts[*index] += 1;
    }
    if counts.iter().all(|count| *count == 0) {
        return Vec::new();
    }

    let tallies: Vec<(&str, usize)> = grid
        .staff()
        .iter()
        .zip(&counts)
        .filter(|(member, count)| member.is_manager || **count > 0)
        .map(|(member, count)| (member.name.as_str(), *count))
        .collect();

    equity_outliers(&tallies, threshold)
        .into_iter()
        .map(|outlier| {
            Violation::period_wide(
                RuleId::LeaderEquity,
                Some(outlier.name),
                format!(
                    "{} leads {} days (mean {})",
                    outlier.name,
                    outlier.count,
                    outlier.mean.round_dp(2).normalize()
                ),
                Severity::Warning,
            )
        })
        .collect()
}
