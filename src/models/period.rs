//! Half-month period calendar.
//!
//! A period runs from the 16th of its base month through the 15th of the
//! following month. Days inside a period are addressed by their day-of-month
//! "token", which is ambiguous on its own (token 3 belongs to the second month)
//! and is resolved to a real calendar date here.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// First day token of a period's opening segment.
pub const PERIOD_START_DAY: u32 = 16;

/// Last day token of a period's closing segment.
pub const PERIOD_END_DAY: u32 = 15;

/// Returns the number of days in the given month.
///
/// # Example
///
/// ```
/// use roster_engine::models::last_day_of_month;
///
/// assert_eq!(last_day_of_month(2024, 2), 29);
/// assert_eq!(last_day_of_month(2025, 2), 28);
/// assert_eq!(last_day_of_month(2025, 4), 30);
/// assert_eq!(last_day_of_month(2025, 12), 31);
/// ```
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Resolves a day token against a period's base year and month.
///
/// Tokens of 16 and above belong to the base month; tokens below 16 belong to
/// the following month, which rolls the year forward after December.
///
/// # Example
///
/// ```
/// use roster_engine::models::resolve;
///
/// assert_eq!(resolve(2025, 10, 20), (2025, 10, 20));
/// assert_eq!(resolve(2025, 10, 3), (2025, 11, 3));
/// assert_eq!(resolve(2025, 12, 1), (2026, 1, 1));
/// ```
pub fn resolve(base_year: i32, base_month: u32, day_token: u32) -> (i32, u32, u32) {
    if day_token >= PERIOD_START_DAY {
        (base_year, base_month, day_token)
    } else if base_month == 12 {
        (base_year + 1, 1, day_token)
    } else {
        (base_year, base_month + 1, day_token)
    }
}

/// Builds the ordered day tokens of the period starting in the given month.
///
/// The sequence is `16..=last_day_of_month` followed by `1..=15`.
///
/// # Example
///
/// ```
/// use roster_engine::models::build_period_days;
///
/// let days = build_period_days(2025, 2);
/// assert_eq!(days.len(), 28);
/// assert_eq!(days[0], 16);
/// assert_eq!(days[12], 28);
/// assert_eq!(days[13], 1);
/// assert_eq!(*days.last().unwrap(), 15);
/// ```
pub fn build_period_days(base_year: i32, base_month: u32) -> Vec<u32> {
    let last = last_day_of_month(base_year, base_month);
    (PERIOD_START_DAY..=last)
        .chain(1..=PERIOD_END_DAY)
        .collect()
}

/// Coverage classification of a calendar day.
///
/// Holidays are Sunday-equivalent for coverage purposes, so they share the
/// Sunday bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Monday through Friday, not a holiday.
    Weekday,
    /// Saturday, not a holiday.
    Saturday,
    /// Sunday or any date listed in the holiday set.
    SundayOrHoliday,
}

impl DayKind {
    /// Classifies a date given whether it is listed as a holiday.
    pub fn classify(date: NaiveDate, is_holiday: bool) -> Self {
        if is_holiday {
            return DayKind::SundayOrHoliday;
        }
        match date.weekday() {
            Weekday::Sat => DayKind::Saturday,
            Weekday::Sun => DayKind::SundayOrHoliday,
            _ => DayKind::Weekday,
        }
    }
}

/// A single day of a period: its token and the calendar date it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodDay {
    /// Day-of-month token as shown in the grid header.
    pub token: u32,
    /// The resolved calendar date.
    pub date: NaiveDate,
}

impl PeriodDay {
    /// Weekday index with 0 = Monday and 6 = Sunday.
    pub fn weekday_index(&self) -> u32 {
        self.date.weekday().num_days_from_monday()
    }

    /// True for Saturday and Sunday calendar dates (holidays not included).
    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// A half-month scheduling period identified by its base year and month.
///
/// # Example
///
/// ```
/// use roster_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period::new(2025, 12).unwrap();
/// assert_eq!(period.first_date(), NaiveDate::from_ymd_opt(2025, 12, 16).unwrap());
/// assert_eq!(period.last_date(), NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
/// assert_eq!(period.label(), "12-1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period whose first day is the 16th of `year`/`month`.
    ///
    /// Fails with [`EngineError::InvalidPeriod`] when the month is out of range
    /// or either end of the period falls outside the supported calendar.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = EngineError::InvalidPeriod { year, month };
        // The base date bounds the year, so resolving the next month cannot overflow
        if !(1..=12).contains(&month)
            || NaiveDate::from_ymd_opt(year, month, PERIOD_START_DAY).is_none()
        {
            return Err(invalid);
        }
        let (next_year, next_month, _) = resolve(year, month, 1);
        if NaiveDate::from_ymd_opt(next_year, next_month, PERIOD_END_DAY).is_none() {
            return Err(invalid);
        }
        Ok(Self { year, month })
    }

    /// The base year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The base month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Ordered day tokens of this period.
    pub fn days(&self) -> Vec<u32> {
        build_period_days(self.year, self.month)
    }

    /// Number of days in this period.
    pub fn len(&self) -> usize {
        last_day_of_month(self.year, self.month) as usize
    }

    /// Always false; every period has at least 28 days.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True when the token names a day of this period.
    pub fn contains_token(&self, token: u32) -> bool {
        (1..=PERIOD_END_DAY).contains(&token)
            || (PERIOD_START_DAY..=last_day_of_month(self.year, self.month)).contains(&token)
    }

    /// Position of the token in calendar order, if it belongs to the period.
    pub fn index_of(&self, token: u32) -> Option<usize> {
        if !self.contains_token(token) {
            return None;
        }
        let first_segment = last_day_of_month(self.year, self.month) - PERIOD_END_DAY;
        if token >= PERIOD_START_DAY {
            Some((token - PERIOD_START_DAY) as usize)
        } else {
            Some((first_segment + token - 1) as usize)
        }
    }

    /// Resolves a token to `(year, month, day)`.
    pub fn resolve(&self, token: u32) -> (i32, u32, u32) {
        resolve(self.year, self.month, token)
    }

    /// Resolves a token to its calendar date.
    pub fn date_of(&self, token: u32) -> EngineResult<NaiveDate> {
        if !self.contains_token(token) {
            return Err(EngineError::DayNotInPeriod { day: token });
        }
        let (year, month, day) = self.resolve(token);
        NaiveDate::from_ymd_opt(year, month, day).ok_or(EngineError::DayNotInPeriod { day: token })
    }

    /// All days of the period in calendar order.
    pub fn calendar(&self) -> Vec<PeriodDay> {
        let first = self.first_date();
        self.days()
            .into_iter()
            .zip(first.iter_days())
            .map(|(token, date)| PeriodDay { token, date })
            .collect()
    }

    /// The 16th of the base month.
    pub fn first_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, PERIOD_START_DAY)
            .expect("validated in Period::new")
    }

    /// The 15th of the following month.
    pub fn last_date(&self) -> NaiveDate {
        let (year, month, day) = self.resolve(PERIOD_END_DAY);
        NaiveDate::from_ymd_opt(year, month, day).expect("validated in Period::new")
    }

    /// The period that ends on the day before this one starts.
    pub fn previous(&self) -> EngineResult<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The period that starts on the day after this one ends.
    pub fn next(&self) -> EngineResult<Self> {
        let (year, month, _) = self.resolve(1);
        Self::new(year, month)
    }

    /// Display label of the form `"M-M'"`, e.g. `"10-11"` or `"12-1"`.
    pub fn label(&self) -> String {
        let (_, next_month, _) = self.resolve(1);
        format!("{}-{}", self.month, next_month)
    }
}
