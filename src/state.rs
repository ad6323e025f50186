use crate::config::AppConfig;
use crate::services::conversation::SessionDeps;
use crate::services::sessions::SessionRegistry;

pub struct AppState {
    pub config: AppConfig,
    pub deps: SessionDeps,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, deps: SessionDeps) -> Self {
        let ttl = chrono::Duration::minutes(config.session_ttl_minutes);
        Self {
            sessions: SessionRegistry::new(deps.clone(), ttl),
            config,
            deps,
        }
    }
}
