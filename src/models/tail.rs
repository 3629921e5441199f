//! Cross-period tail data.
//!
//! The last four days of a period are carried into the next one so the
//! consecutive-rest rule can see runs that straddle the boundary.

use std::collections::BTreeMap;

use super::{DayStatus, Period, ShiftGrid};

/// Number of trailing days carried forward per staff member.
pub const TAIL_LEN: usize = 4;

/// The last [`TAIL_LEN`] statuses of one staff member, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailRecord([DayStatus; TAIL_LEN]);

impl Default for TailRecord {
    fn default() -> Self {
        Self([DayStatus::Work; TAIL_LEN])
    }
}

impl TailRecord {
    /// Wraps four chronological statuses.
    pub fn new(statuses: [DayStatus; TAIL_LEN]) -> Self {
        Self(statuses)
    }

    /// Keeps the last four statuses of a sequence, padding the front with
    /// `Work` when the sequence is shorter.
    pub fn from_trailing(statuses: impl IntoIterator<Item = DayStatus>) -> Self {
        let all: Vec<DayStatus> = statuses.into_iter().collect();
        let mut record = [DayStatus::Work; TAIL_LEN];
        let take = all.len().min(TAIL_LEN);
        record[TAIL_LEN - take..].copy_from_slice(&all[all.len() - take..]);
        Self(record)
    }

    /// Parses the persisted symbol list. Anything but four known symbols is
    /// rejected.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Option<Self> {
        if symbols.len() != TAIL_LEN {
            return None;
        }
        let mut record = [DayStatus::Work; TAIL_LEN];
        for (slot, symbol) in record.iter_mut().zip(symbols) {
            *slot = DayStatus::from_symbol(symbol.as_ref())?;
        }
        Some(Self(record))
    }

    /// The statuses in chronological order.
    pub fn statuses(&self) -> &[DayStatus; TAIL_LEN] {
        &self.0
    }

    /// The persisted symbol list.
    pub fn symbols(&self) -> Vec<String> {
        self.0.iter().map(|s| s.symbol().to_string()).collect()
    }
}

/// Tail records of every staff member for one period boundary.
///
/// Members without a record fall back to four `Work` days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailLinkage {
    records: BTreeMap<String, TailRecord>,
}

impl TailLinkage {
    /// An empty linkage; every lookup yields the default record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the trailing days of every row of a grid.
    pub fn from_grid(grid: &ShiftGrid) -> Self {
        let records = grid
            .staff()
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let record = TailRecord::from_trailing(grid.row(index).iter().map(|c| c.status));
                (member.name.clone(), record)
            })
            .collect();
        Self { records }
    }

    /// Storage key of the tail produced by `period`: `"{YYYY}{MM}_2"`.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::{Period, TailLinkage};
    ///
    /// assert_eq!(TailLinkage::key_for(Period::new(2025, 3).unwrap()), "202503_2");
    /// ```
    pub fn key_for(period: Period) -> String {
        format!("{:04}{:02}_2", period.year(), period.month())
    }

    /// Adds or replaces a member's record.
    pub fn insert(&mut self, name: impl Into<String>, record: TailRecord) {
        self.records.insert(name.into(), record);
    }

    /// The member's record, or four `Work` days when none was stored.
    pub fn record_for(&self, name: &str) -> TailRecord {
        self.records.get(name).copied().unwrap_or_default()
    }

    /// Stored records in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TailRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
