//! Response types for the roster API.
//!
//! This module defines the grid views returned to clients and the error
//! response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{CellState, DaySummary, ShiftGrid, StaffSummary};

/// Error body returned by every endpoint.
///
/// # Example
///
/// ```
/// use roster_engine::api::ApiError;
///
/// let error = ApiError::new("NO_ACTIVE_PERIOD", "No period is currently open");
/// assert_eq!(error.code, "NO_ACTIVE_PERIOD");
/// assert!(error.details.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional extra context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates an error without details.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Request body is well-formed JSON but misses a required field.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Request body could not be parsed.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    fn with_path(mut self, path: String) -> Self {
        self.details = Some(match self.details.take() {
            Some(details) if details.contains(&path) => details,
            Some(details) => format!("{details} ({path})"),
            None => path,
        });
        self
    }
}

/// An [`ApiError`] paired with its HTTP status.
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { path } | EngineError::ConfigParseError { path, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message)
                    .with_path(path),
            ),
            EngineError::StorageError { path, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Failed to save data", message)
                    .with_path(path),
            ),
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "Month must be 1-12 and both ends of the period must be valid dates",
                ),
            ),
            EngineError::DayNotInPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("DAY_NOT_IN_PERIOD", message),
            ),
            EngineError::StaffNotFound { .. } | EngineError::StaffIndexOutOfRange { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("STAFF_NOT_FOUND", message),
            ),
            EngineError::InvalidVacation { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_VACATION", message),
            ),
            EngineError::NoActivePeriod => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "NO_ACTIVE_PERIOD",
                    message,
                    "Open a period with POST /period first",
                ),
            ),
        };
        Self { status, error }
    }
}

/// One cell as shown in the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellView {
    /// Day token.
    pub day: u32,
    /// Lock-aware cell state.
    pub state: CellState,
    /// Rendered text.
    pub display: String,
}

/// One day column header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayView {
    /// Counts and requirement for the day.
    #[serde(flatten)]
    pub summary: DaySummary,
    /// `""`, `"full"` or `"N short"`.
    pub coverage: String,
    /// Assigned leader.
    pub leader: Option<String>,
}

/// One staff row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRow {
    /// Row header.
    #[serde(flatten)]
    pub summary: StaffSummary,
    /// Cells in calendar order.
    pub cells: Vec<CellView>,
}

/// The full grid of the open period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridView {
    /// Period label such as `"10-11"`.
    pub period: String,
    /// Base year.
    pub year: i32,
    /// Base month.
    pub month: u32,
    /// Day headers in calendar order.
    pub days: Vec<DayView>,
    /// Staff rows in directory order.
    pub staff: Vec<StaffRow>,
}

impl CellView {
    /// Renders one cell.
    pub fn build(grid: &ShiftGrid, staff: usize, day: u32) -> EngineResult<Self> {
        let state = grid.cell(staff, day)?;
        Ok(Self {
            day,
            state,
            display: state.display().to_string(),
        })
    }
}

impl DayView {
    /// Renders one day header.
    pub fn build(grid: &ShiftGrid, policy: &PolicyConfig, day: u32) -> EngineResult<Self> {
        let summary = grid.day_summary(day, policy)?;
        Ok(Self {
            coverage: summary.coverage_text(),
            leader: grid.leader(day)?.map(|member| member.name.clone()),
            summary,
        })
    }
}

impl GridView {
    /// Renders the whole grid.
    pub fn build(grid: &ShiftGrid, policy: &PolicyConfig) -> EngineResult<Self> {
        let period = grid.period();
        let tokens = period.days();

        let days = tokens
            .iter()
            .map(|&day| DayView::build(grid, policy, day))
            .collect::<EngineResult<Vec<_>>>()?;
        let staff = (0..grid.staff().len())
            .map(|index| {
                Ok(StaffRow {
                    summary: grid.staff_summary(index)?,
                    cells: tokens
                        .iter()
                        .map(|&day| CellView::build(grid, index, day))
                        .collect::<EngineResult<Vec<_>>>()?,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Self {
            period: period.label(),
            year: period.year(),
            month: period.month(),
            days,
            staff,
        })
    }
}

/// Result of a grid edit, with the views it affects recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    /// False when the edit was a no-op on a locked or inapplicable cell.
    pub changed: bool,
    /// The edited cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellView>,
    /// The edited day's header.
    pub day: DayView,
    /// The edited staff member's header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffSummary>,
}

/// Result of `POST /grid/save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Schedule file written.
    pub path: String,
}

/// Result of `POST /grid/finalize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeResponse {
    /// Schedule file written.
    pub path: String,
    /// Key the tail was stored under in `last_tail.json`.
    pub tail_key: String,
    /// Number of staff tails written.
    pub staff: usize,
}
