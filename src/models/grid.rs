//! The staff-by-day roster grid.
//!
//! [`ShiftGrid`] owns every cell of one period, addressed by
//! `(staff index, day token)`. Cells change only through the three toggle
//! operations; counts shown in the grid headers are recomputed from the cells
//! on every call instead of being cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LongVacation, PolicyConfig};
use crate::error::{EngineError, EngineResult};

use super::{CellState, DayKind, DayStatus, Period, PeriodDay, ShiftCell, Staff};

/// Header information for one day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Day token.
    pub token: u32,
    /// Resolved calendar date.
    pub date: NaiveDate,
    /// Weekday index, 0 = Monday.
    pub weekday: u32,
    /// Weekday / Saturday / Sunday-or-holiday.
    pub kind: DayKind,
    /// Staff resting on this day.
    pub rest: usize,
    /// Staff working on this day.
    pub work: usize,
    /// Resolved minimum number of working staff.
    pub required_work: u32,
    /// How many more working staff are needed (0 when covered).
    pub shortfall: u32,
}

impl DaySummary {
    /// Coverage text for the header: empty with no requirement, `"full"` when
    /// covered, otherwise `"N short"`.
    pub fn coverage_text(&self) -> String {
        match (self.required_work, self.shortfall) {
            (0, _) => String::new(),
            (_, 0) => "full".to_string(),
            (_, short) => format!("{short} short"),
        }
    }
}

/// Header information for one staff row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSummary {
    /// Staff name.
    pub name: String,
    /// Manager flag.
    pub is_manager: bool,
    /// Remaining paid leave.
    pub paid_left: u32,
    /// Rest days taken on Saturdays and Sundays.
    pub weekend_rest: usize,
    /// Saturdays and Sundays in the period.
    pub weekend_days: usize,
}

/// The editable roster of one period.
#[derive(Debug, Clone)]
pub struct ShiftGrid {
    period: Period,
    calendar: Vec<PeriodDay>,
    staff: Vec<Staff>,
    cells: Vec<Vec<ShiftCell>>,
    vacation: Vec<Vec<bool>>,
    leaders: Vec<Option<usize>>,
}

impl ShiftGrid {
    /// Creates a grid with every cell unset and no wishes or leaders.
    ///
    /// Vacation intervals lock the cells of their member on every covered date;
    /// intervals of members outside `staff` are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::{DayStatus, Period, ShiftGrid, Staff};
    ///
    /// let period = Period::new(2025, 10).unwrap();
    /// let mut grid = ShiftGrid::new(period, vec![Staff::new("Sato", true)], &[]);
    ///
    /// assert!(grid.toggle_status(0, 20).unwrap());
    /// assert_eq!(grid.status(0, 20).unwrap(), DayStatus::Rest);
    /// assert_eq!(grid.rest_count_on_day(20).unwrap(), 1);
    /// ```
    pub fn new(period: Period, staff: Vec<Staff>, vacations: &[LongVacation]) -> Self {
        let calendar = period.calendar();
        let vacation = staff
            .iter()
            .map(|member| {
                calendar
                    .iter()
                    .map(|day| {
                        vacations
                            .iter()
                            .any(|v| v.member == member.name && v.covers(day.date))
                    })
                    .collect()
            })
            .collect();

        Self {
            period,
            cells: vec![vec![ShiftCell::default(); calendar.len()]; staff.len()],
            leaders: vec![None; calendar.len()],
            calendar,
            staff,
            vacation,
        }
    }

    /// The period this grid covers.
    pub fn period(&self) -> Period {
        self.period
    }

    /// The period's days in calendar order.
    pub fn calendar(&self) -> &[PeriodDay] {
        &self.calendar
    }

    /// The staff rows in display order.
    pub fn staff(&self) -> &[Staff] {
        &self.staff
    }

    /// Looks up a row index by staff name.
    pub fn staff_index(&self, name: &str) -> EngineResult<usize> {
        self.staff
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| EngineError::StaffNotFound {
                name: name.to_string(),
            })
    }

    /// Cells of one staff row in calendar order; empty for an unknown row.
    pub fn row(&self, staff: usize) -> &[ShiftCell] {
        self.cells.get(staff).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Leader assignments by calendar position, as staff row indices.
    pub fn leaders(&self) -> &[Option<usize>] {
        &self.leaders
    }

    /// True when the cell lies inside one of the member's vacation intervals.
    pub fn is_vacation(&self, staff: usize, token: u32) -> EngineResult<bool> {
        let (staff, day) = self.locate(staff, token)?;
        Ok(self.vacation[staff][day])
    }

    /// The lock-aware state of one cell.
    pub fn cell(&self, staff: usize, token: u32) -> EngineResult<CellState> {
        let (staff, day) = self.locate(staff, token)?;
        Ok(self.state_at(staff, day))
    }

    /// The assigned status of one cell.
    pub fn status(&self, staff: usize, token: u32) -> EngineResult<DayStatus> {
        self.cell(staff, token).map(CellState::status)
    }

    /// Cycles the status `Work <-> Rest`, dropping any paid flag.
    ///
    /// Returns `Ok(false)` without changing anything when the cell is locked by
    /// a vacation or a wish.
    pub fn toggle_status(&mut self, staff: usize, token: u32) -> EngineResult<bool> {
        let (staff, day) = self.locate(staff, token)?;
        let CellState::Open { status } = self.state_at(staff, day) else {
            return Ok(false);
        };

        let next = if status.is_rest() {
            DayStatus::Work
        } else {
            DayStatus::Rest
        };
        self.cells[staff][day].status = next;
        debug!(staff = %self.staff[staff].name, token, status = ?next, "Status toggled");
        Ok(true)
    }

    /// Flips `Rest <-> RestPaid`; a no-op for working or locked cells.
    pub fn toggle_paid_flag(&mut self, staff: usize, token: u32) -> EngineResult<bool> {
        let (staff, day) = self.locate(staff, token)?;
        let next = match self.state_at(staff, day) {
            CellState::Open {
                status: DayStatus::Rest,
            } => DayStatus::RestPaid,
            CellState::Open {
                status: DayStatus::RestPaid,
            } => DayStatus::Rest,
            _ => return Ok(false),
        };

        self.cells[staff][day].status = next;
        debug!(staff = %self.staff[staff].name, token, status = ?next, "Paid flag toggled");
        Ok(true)
    }

    /// Advances the wish overlay `None -> WishOff -> WishOffPaid -> None`.
    ///
    /// The status underneath is never touched. Vacation cells are a no-op.
    pub fn toggle_wish_cycle(&mut self, staff: usize, token: u32) -> EngineResult<bool> {
        let (staff, day) = self.locate(staff, token)?;
        if let CellState::Vacation { .. } = self.state_at(staff, day) {
            return Ok(false);
        }

        let cell = &mut self.cells[staff][day];
        cell.wish = cell.wish.cycled();
        debug!(staff = %self.staff[staff].name, token, wish = ?cell.wish, "Wish cycled");
        Ok(true)
    }

    /// Assigns or clears the leader of a day.
    pub fn set_leader(&mut self, token: u32, name: Option<&str>) -> EngineResult<()> {
        let day = self.day_index(token)?;
        let leader = name.map(|n| self.staff_index(n)).transpose()?;
        self.leaders[day] = leader;
        Ok(())
    }

    /// The leader assigned to a day, if any.
    pub fn leader(&self, token: u32) -> EngineResult<Option<&Staff>> {
        let day = self.day_index(token)?;
        Ok(self.leaders[day].map(|index| &self.staff[index]))
    }

    /// Number of staff resting on a day.
    pub fn rest_count_on_day(&self, token: u32) -> EngineResult<usize> {
        let day = self.day_index(token)?;
        Ok(self.count_on(day, DayStatus::is_rest))
    }

    /// Number of staff working on a day (unset counts as working).
    pub fn work_count_on_day(&self, token: u32) -> EngineResult<usize> {
        let day = self.day_index(token)?;
        Ok(self.count_on(day, DayStatus::is_working))
    }

    /// Rest days the member takes on Saturdays and Sundays.
    pub fn weekend_rest_count(&self, staff: usize) -> EngineResult<usize> {
        let row = self
            .cells
            .get(staff)
            .ok_or(EngineError::StaffIndexOutOfRange { index: staff })?;
        Ok(self
            .calendar
            .iter()
            .zip(row)
            .filter(|(day, cell)| day.is_weekend() && cell.status.is_rest())
            .count())
    }

    /// Saturdays and Sundays in the period.
    pub fn weekend_day_count(&self) -> usize {
        self.calendar.iter().filter(|day| day.is_weekend()).count()
    }

    /// Cells of the member carrying any wish.
    pub fn wish_count(&self, staff: usize) -> usize {
        self.row(staff).iter().filter(|cell| cell.wish.is_set()).count()
    }

    /// Column header data for one day.
    pub fn day_summary(&self, token: u32, policy: &PolicyConfig) -> EngineResult<DaySummary> {
        let day = self.day_index(token)?;
        let period_day = self.calendar[day];
        let work = self.count_on(day, DayStatus::is_working);
        let required_work = policy.required_work(period_day.date);

        Ok(DaySummary {
            token,
            date: period_day.date,
            weekday: period_day.weekday_index(),
            kind: policy.day_kind(period_day.date),
            rest: self.count_on(day, DayStatus::is_rest),
            work,
            required_work,
            shortfall: required_work.saturating_sub(work as u32),
        })
    }

    /// Row header data for one staff member.
    pub fn staff_summary(&self, staff: usize) -> EngineResult<StaffSummary> {
        let member = self
            .staff
            .get(staff)
            .ok_or(EngineError::StaffIndexOutOfRange { index: staff })?;
        Ok(StaffSummary {
            name: member.name.clone(),
            is_manager: member.is_manager,
            paid_left: member.paid_left,
            weekend_rest: self.weekend_rest_count(staff)?,
            weekend_days: self.weekend_day_count(),
        })
    }

    /// Overwrites every cell with `cell_for(staff index, day token)` while
    /// populating the grid from persisted data.
    pub(crate) fn load_cells(&mut self, mut cell_for: impl FnMut(usize, u32) -> ShiftCell) {
        for (staff, row) in self.cells.iter_mut().enumerate() {
            for (cell, day) in row.iter_mut().zip(&self.calendar) {
                *cell = cell_for(staff, day.token);
            }
        }
    }

    fn count_on(&self, day: usize, predicate: fn(DayStatus) -> bool) -> usize {
        self.cells
            .iter()
            .filter(|row| predicate(row[day].status))
            .count()
    }

    fn state_at(&self, staff: usize, day: usize) -> CellState {
        CellState::of(self.cells[staff][day], self.vacation[staff][day])
    }

    fn day_index(&self, token: u32) -> EngineResult<usize> {
        self.period
            .index_of(token)
            .ok_or(EngineError::DayNotInPeriod { day: token })
    }

    fn locate(&self, staff: usize, token: u32) -> EngineResult<(usize, usize)> {
        if staff >= self.staff.len() {
            return Err(EngineError::StaffIndexOutOfRange { index: staff });
        }
        Ok((staff, self.day_index(token)?))
    }
}
