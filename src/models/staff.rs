//! Staff directory entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A staff member as listed in `members.json`.
///
/// The name is the identity key; entries are replaced wholesale when the
/// directory is reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    /// Unique display name.
    pub name: String,
    /// Whether the member counts toward manager coverage and may lead a day.
    #[serde(default)]
    pub is_manager: bool,
    /// Date the member joined, used for novice protection.
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
    /// Remaining paid-leave days shown next to the name.
    #[serde(default)]
    pub paid_left: u32,
}

impl Staff {
    /// Creates a staff member with no hire date and no paid leave balance.
    pub fn new(name: impl Into<String>, is_manager: bool) -> Self {
        Self {
            name: name.into(),
            is_manager,
            hire_date: None,
            paid_left: 0,
        }
    }

    /// Sets the hire date.
    pub fn hired_on(mut self, date: NaiveDate) -> Self {
        self.hire_date = Some(date);
        self
    }

    /// True when the member was hired no more than `window_days` before
    /// `reference`. Members hired after `reference` also count as novices.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::Staff;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap();
    /// let staff = Staff::new("Ito", false)
    ///     .hired_on(NaiveDate::from_ymd_opt(2025, 9, 16).unwrap());
    /// assert!(staff.is_novice_at(start, 30));
    /// assert!(!staff.is_novice_at(start, 29));
    /// ```
    pub fn is_novice_at(&self, reference: NaiveDate, window_days: i64) -> bool {
        self.hire_date
            .is_some_and(|hired| (reference - hired).num_days() <= window_days)
    }
}
