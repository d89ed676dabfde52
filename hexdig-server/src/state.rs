//! Server state management
//!
//! One puzzle session shared by all requests. Each request takes the lock
//! for the whole action, so actions never interleave.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hexdig_core::{Session, StageCatalog, StageData};

/// Server-wide shared state
pub struct ServerState {
    pub catalog: StageCatalog,
    session: RwLock<Session>,
}

impl ServerState {
    /// State over `catalog`, starting on `stage`
    pub fn new(catalog: StageCatalog, stage: &StageData) -> Self {
        Self {
            catalog,
            session: RwLock::new(Session::new(stage)),
        }
    }

    pub fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session_mut(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(StageCatalog::builtin(), &StageData::stage1())
    }
}
