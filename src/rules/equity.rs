//! Shared mean/deviation check for the fairness rules.

use rust_decimal::Decimal;

/// A member whose tally is too far from the group mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityOutlier<'a> {
    /// Staff name.
    pub name: &'a str,
    /// The member's tally.
    pub count: usize,
    /// Mean tally across the group.
    pub mean: Decimal,
}

impl EquityOutlier<'_> {
    /// Signed distance from the mean.
    pub fn deviation(&self) -> Decimal {
        Decimal::from(self.count) - self.mean
    }
}

/// Returns every member whose tally deviates from the mean by strictly more
/// than `threshold`, in input order.
///
/// # Example
///
/// ```
/// use roster_engine::rules::equity_outliers;
/// use rust_decimal::Decimal;
///
/// let tallies = [("Sato", 0), ("Ito", 0), ("Abe", 3)];
/// let outliers = equity_outliers(&tallies, Decimal::ONE);
/// assert_eq!(outliers.len(), 1);
/// assert_eq!(outliers[0].name, "Abe");
/// ```
pub fn equity_outliers<'a>(tallies: &[(&'a str, usize)], threshold: Decimal) -> Vec<EquityOutlier<'a>> {
    if tallies.is_empty() {
        return Vec::new();
    }
    let total: usize = tallies.iter().map(|(_, count)| count).sum();
    let mean = Decimal::from(total) / Decimal::from(tallies.len());

    tallies
        .iter()
        .map(|&(name, count)| EquityOutlier { name, count, mean })
        .filter(|outlier| outlier.deviation().abs() > threshold)
        .collect()
}
