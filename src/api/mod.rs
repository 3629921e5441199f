//! HTTP API module for the roster engine.
//!
//! This module provides the REST endpoints for opening a period, editing the
//! grid, persisting it and running validation.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CellRequest, LeaderRequest, PeriodRequest};
pub use response::{
    ApiError, ApiErrorResponse, CellView, DayView, FinalizeResponse, GridView, MutationResponse,
    SaveResponse, StaffRow,
};
pub use state::{AppState, Session};
