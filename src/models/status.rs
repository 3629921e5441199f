//! Per-cell state of the roster grid.
//!
//! A cell carries two independent layers: the assigned [`DayStatus`] and the
//! staff member's [`WishOverlay`]. A third, external layer (long vacations)
//! locks the cell entirely. [`CellState`] folds the three into one tagged value
//! with the locking precedence vacation > wish > status.

use serde::{Deserialize, Serialize};

/// Assigned status of a staff member on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Nothing entered yet; treated as working.
    #[default]
    Unset,
    /// Explicitly working.
    Work,
    /// Day off.
    Rest,
    /// Day off that consumes paid leave.
    RestPaid,
}

impl DayStatus {
    /// True for [`DayStatus::Rest`] and [`DayStatus::RestPaid`].
    pub fn is_rest(self) -> bool {
        matches!(self, DayStatus::Rest | DayStatus::RestPaid)
    }

    /// True for [`DayStatus::Work`] and the work-equivalent [`DayStatus::Unset`].
    pub fn is_working(self) -> bool {
        !self.is_rest()
    }

    /// The symbol used in persisted schedule and tail documents.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_engine::models::DayStatus;
    ///
    /// assert_eq!(DayStatus::RestPaid.symbol(), "休*");
    /// assert_eq!(DayStatus::from_symbol("休"), Some(DayStatus::Rest));
    /// assert_eq!(DayStatus::from_symbol(" "), Some(DayStatus::Unset));
    /// assert_eq!(DayStatus::from_symbol("?"), None);
    /// ```
    pub fn symbol(self) -> &'static str {
        match self {
            DayStatus::Unset => "-",
            DayStatus::Work => "出",
            DayStatus::Rest => "休",
            DayStatus::RestPaid => "休*",
        }
    }

    /// Parses a persisted symbol. Blank and dash variants all mean unset.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "" | "-" | "−" | "ー" => Some(DayStatus::Unset),
            "出" => Some(DayStatus::Work),
            "休" => Some(DayStatus::Rest),
            "休*" => Some(DayStatus::RestPaid),
            _ => None,
        }
    }
}

/// Wish-for-leave annotation layered over a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishOverlay {
    /// No wish recorded.
    #[default]
    None,
    /// Plain wish for a day off.
    WishOff,
    /// Wish for a day off taken as paid leave.
    WishOffPaid,
}

impl WishOverlay {
    /// True when any wish is recorded.
    pub fn is_set(self) -> bool {
        self != WishOverlay::None
    }

    /// Next step of the wish-mode cycle `None -> WishOff -> WishOffPaid -> None`.
    pub fn cycled(self) -> Self {
        match self {
            WishOverlay::None => WishOverlay::WishOff,
            WishOverlay::WishOff => WishOverlay::WishOffPaid,
            WishOverlay::WishOffPaid => WishOverlay::None,
        }
    }

    /// Rebuilds the overlay from the two persisted flags.
    pub fn from_flags(wish: bool, paid: bool) -> Self {
        match (wish, paid) {
            (false, _) => WishOverlay::None,
            (true, false) => WishOverlay::WishOff,
            (true, true) => WishOverlay::WishOffPaid,
        }
    }

    /// The `(wishes, wish_paid)` flags written to schedule documents.
    pub fn flags(self) -> (bool, bool) {
        match self {
            WishOverlay::None => (false, false),
            WishOverlay::WishOff => (true, false),
            WishOverlay::WishOffPaid => (true, true),
        }
    }
}

/// Stored content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftCell {
    /// Assigned status.
    pub status: DayStatus,
    /// Wish annotation, independent of the status.
    pub wish: WishOverlay,
}

/// Effective, lock-aware view of a cell.
///
/// Edits are decided by matching on this value rather than by checking the
/// layers one by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellState {
    /// Inside a long-vacation interval: neither status nor wish is editable.
    Vacation {
        /// The status underneath the lock.
        status: DayStatus,
    },
    /// A wish is recorded: the status is locked, the wish cycle stays open.
    Wished {
        /// The recorded wish.
        wish: WishOverlay,
        /// The status underneath the wish.
        status: DayStatus,
    },
    /// Freely editable.
    Open {
        /// The current status.
        status: DayStatus,
    },
}

impl CellState {
    /// Combines the stored layers with the vacation lock.
    pub fn of(cell: ShiftCell, on_vacation: bool) -> Self {
        if on_vacation {
            CellState::Vacation {
                status: cell.status,
            }
        } else if cell.wish.is_set() {
            CellState::Wished {
                wish: cell.wish,
                status: cell.status,
            }
        } else {
            CellState::Open {
                status: cell.status,
            }
        }
    }

    /// The underlying assigned status, regardless of locks.
    pub fn status(self) -> DayStatus {
        match self {
            CellState::Vacation { status }
            | CellState::Wished { status, .. }
            | CellState::Open { status } => status,
        }
    }

    /// The text a grid renders for the cell.
    ///
    /// A wish hides the status: plain wishes render empty, paid wishes as "有".
    pub fn display(self) -> &'static str {
        match self {
            CellState::Wished {
                wish: WishOverlay::WishOffPaid,
                ..
            } => "有",
            CellState::Wished { .. } => "",
            CellState::Vacation { status } | CellState::Open { status } => match status {
                DayStatus::Unset => "",
                other => other.symbol(),
            },
        }
    }
}
