use crate::config::{PageLimits, SecurityConfig};
use crate::db::{CredentialStore, ProjectStore};
use std::sync::Arc;

/// Everything a handler may touch. Built once in `main` (or a test) and
/// cloned into each request; nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub security: Arc<SecurityConfig>,
    pub page_limits: PageLimits,
}

impl AppState {
    /// State backed by a single store that serves both users and projects.
    pub fn new<S>(store: S, security: SecurityConfig, page_limits: PageLimits) -> Self
    where
        S: CredentialStore + ProjectStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            projects: store,
            security: Arc::new(security),
            page_limits,
        }
    }
}
