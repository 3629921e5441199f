//! Application state for the roster API.
//!
//! This module defines the shared application state that is available
//! to all request handlers: the data directory and the single open session.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::{DataPaths, PolicyConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::ShiftGrid;

/// The period currently being edited.
#[derive(Debug, Clone)]
pub struct Session {
    /// The roster grid.
    pub grid: ShiftGrid,
    /// Policy snapshot taken when the period was opened.
    pub policy: PolicyConfig,
}

/// Shared application state.
///
/// All grid access goes through one mutex, so mutations and validation runs
/// never interleave.
#[derive(Clone)]
pub struct AppState {
    paths: Arc<DataPaths>,
    session: Arc<Mutex<Option<Session>>>,
}

impl AppState {
    /// Creates a state with no open period.
    pub fn new(paths: DataPaths) -> Self {
        Self {
            paths: Arc::new(paths),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the data directory layout.
    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Replaces the open session.
    pub fn open(&self, session: Session) {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session);
    }

    /// Runs `f` against the open session.
    ///
    /// Fails with [`EngineError::NoActivePeriod`] when no period is open.
    pub fn with_session<T>(
        &self,
        f: impl FnOnce(&mut Session, &DataPaths) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let session = guard.as_mut().ok_or(EngineError::NoActivePeriod)?;
        f(session, &self.paths)
    }
}
