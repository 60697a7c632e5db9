use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::repositories::{AttemptLedger, ExamRepository, IdentityStore};
use crate::services::{DashboardAggregator, ExamEngine};

#[derive(Clone)]
pub struct AppState {
    pub identities: Arc<dyn IdentityStore>,
    pub engine: ExamEngine,
    pub dashboards: DashboardAggregator,
    pub config: Config,
}

impl AppState {
    /// Wires every component to one backing store.
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: IdentityStore + ExamRepository + AttemptLedger + 'static,
    {
        Self {
            identities: store.clone(),
            engine: ExamEngine::new(store.clone(), store.clone()),
            dashboards: DashboardAggregator::new(store.clone(), store),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn IdentityStore> {
    fn from_ref(state: &AppState) -> Self {
        state.identities.clone()
    }
}

impl FromRef<AppState> for ExamEngine {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for DashboardAggregator {
    fn from_ref(state: &AppState) -> Self {
        state.dashboards.clone()
    }
}
