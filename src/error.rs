//! Error types for the roster engine.
//!
//! Rule violations are not errors; they are the engine's normal output and live
//! in [`crate::models::Violation`]. The errors here cover persisted data that
//! cannot be read, invalid configuration entities, and grid addressing mistakes.

use thiserror::Error;

/// The main error type for the roster engine.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "data/members.json".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: data/members.json");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A persisted document could not be written.
    #[error("Failed to write '{path}': {message}")]
    StorageError {
        /// The path that could not be written.
        path: String,
        /// A description of the I/O or encoding failure.
        message: String,
    },

    /// The requested base year/month does not name a period.
    #[error("Invalid period {year}-{month}")]
    InvalidPeriod {
        /// The requested base year.
        year: i32,
        /// The requested base month.
        month: u32,
    },

    /// A day token is not part of the active period.
    #[error("Day {day} is not part of the period")]
    DayNotInPeriod {
        /// The offending day token.
        day: u32,
    },

    /// No staff member with this name exists in the grid.
    #[error("Staff not found: {name}")]
    StaffNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A staff row index is outside the grid.
    #[error("Staff index {index} is out of range")]
    StaffIndexOutOfRange {
        /// The offending row index.
        index: usize,
    },

    /// A long-vacation interval violates the vacation policy.
    #[error("Invalid vacation for '{member}': {message}")]
    InvalidVacation {
        /// The member the vacation belongs to.
        member: String,
        /// What made the interval invalid.
        message: String,
    },

    /// A grid operation was requested before any period was opened.
    #[error("No period is currently open")]
    NoActivePeriod,
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
