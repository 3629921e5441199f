//! Request types for the roster API.
//!
//! This module defines the JSON request bodies of the period and grid
//! endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Base year of the period.
    pub year: i32,
    /// Base month of the period (the month containing the 16th).
    pub month: u32,
}

/// Body of the cell toggle endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellRequest {
    /// Staff name.
    pub staff: String,
    /// Day token.
    pub day: u32,
}

/// Body of `POST /grid/leader`; a missing or null `staff` clears the leader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderRequest {
    /// Day token.
    pub day: u32,
    /// Leader name.
    #[serde(default)]
    pub staff: Option<String>,
}
