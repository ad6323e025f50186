use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::Actor;
use crate::services::conversation::{ConversationSession, SessionDeps};
use crate::services::speech::RelayedSpeech;

struct Entry {
    session: Arc<ConversationSession>,
    expires_at: DateTime<Utc>,
}

/// Live booking sessions keyed by id, dropped after `ttl` of inactivity.
pub struct SessionRegistry {
    deps: SessionDeps,
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new(deps: SessionDeps, ttl: Duration) -> Self {
        Self {
            deps,
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn create(&self, actor: Option<Actor>) -> Arc<ConversationSession> {
        self.purge_expired();

        let session = Arc::new(ConversationSession::new(
            actor,
            self.deps.clone(),
            Box::new(RelayedSpeech::new()),
        ));
        let entry = Entry {
            session: session.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.lock().unwrap().insert(session.id(), entry);

        tracing::info!(
            session_id = %session.id(),
            actor = session.actor().map(|a| a.email.as_str()).unwrap_or("anonymous"),
            "session created"
        );
        session
    }

    /// Looks up a live session and pushes its expiry out.
    pub fn get(&self, id: &Uuid) -> Option<Arc<ConversationSession>> {
        let mut sessions = self.sessions.lock().unwrap();
        let now = Utc::now();
        let entry = sessions.get_mut(id)?;
        if entry.expires_at <= now {
            return None;
        }
        entry.expires_at = now + self.ttl;
        Some(entry.session.clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.lock().unwrap().remove(id);
        match removed {
            Some(entry) => {
                entry.session.teardown();
                tracing::info!(session_id = %id, "session closed");
                true
            }
            None => false,
        }
    }

    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<Entry> = {
            let mut sessions = self.sessions.lock().unwrap();
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, e)| e.expires_at <= now)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for entry in &expired {
            entry.session.teardown();
        }
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired sessions purged");
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::{
        Appointment, AppointmentCreateRequest, AssistantProfile, DirectoryEntry,
    };
    use crate::services::ai::{GenerationParams, LlmProvider, Message};
    use crate::services::backend::{AppointmentStore, BackendError, EmployeeDirectory};
    use crate::services::temporal::SystemClock;

    struct Unused;

    #[async_trait]
    impl LlmProvider for Unused {
        async fn chat(
            &self,
            _system_prompt: &str,
            _messages: &[Message],
            _params: &GenerationParams,
        ) -> anyhow::Result<String> {
            anyhow::bail!("not used")
        }
    }

    #[async_trait]
    impl EmployeeDirectory for Unused {
        async fn list_employees(
            &self,
            _actor: Option<&Actor>,
        ) -> Result<Vec<DirectoryEntry>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl AppointmentStore for Unused {
        async fn create_appointment(
            &self,
            _actor: &Actor,
            _request: &AppointmentCreateRequest,
        ) -> Result<Appointment, BackendError> {
            Err(BackendError::InvalidResponse("not used".to_string()))
        }
    }

    fn registry(ttl: Duration) -> SessionRegistry {
        let deps = SessionDeps {
            llm: Arc::new(Unused),
            directory: Arc::new(Unused),
            appointments: Arc::new(Unused),
            clock: Arc::new(SystemClock),
            profile: Arc::new(AssistantProfile::default()),
            params: GenerationParams::default(),
        };
        SessionRegistry::new(deps, ttl)
    }

    #[test]
    fn test_create_get_remove() {
        let registry = registry(Duration::minutes(30));
        let session = registry.create(None);
        assert!(registry.get(&session.id()).is_some());
        assert!(registry.remove(&session.id()));
        assert!(registry.get(&session.id()).is_none());
        assert!(!registry.remove(&session.id()));
    }

    #[test]
    fn test_expired_sessions_are_purged() {
        let registry = registry(Duration::zero());
        let first = registry.create(None);
        assert!(registry.get(&first.id()).is_none());
        assert_eq!(registry.purge_expired(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_tears_down_speech() {
        let registry = registry(Duration::minutes(30));
        let session = registry.create(None);
        assert!(session.snapshot().speech.speaking);
        registry.remove(&session.id());
        assert!(!session.snapshot().speech.speaking);
    }
}
