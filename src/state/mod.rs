pub mod clock;
pub mod match_machine;
pub mod timesheet_machine;

use std::sync::Arc;

use crate::{
    auth::session::SessionService,
    config::AppConfig,
    dao::store::ClubStore,
    services::audit::AuditLog,
};

pub use self::match_machine::{InvalidTransition, MatchStatus};
pub use self::timesheet_machine::{TimesheetAction, TimesheetStatus, WorkflowViolation};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the store seam, the session
/// registry, and the audit sink.
///
/// Constructed once by the composition root and injected everywhere else.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn ClubStore>,
    sessions: SessionService,
    audit: AuditLog,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, store: Arc<dyn ClubStore>) -> SharedState {
        let sessions = SessionService::new(config.session_ttl_secs);
        Arc::new(Self {
            audit: AuditLog::new(),
            sessions,
            store,
            config,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle to the persistence backend.
    pub fn store(&self) -> Arc<dyn ClubStore> {
        self.store.clone()
    }

    /// Session registry.
    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Audit sink for authorization denials and state transitions.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }
}
