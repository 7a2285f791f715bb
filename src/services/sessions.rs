use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDateTime, Utc};

use crate::models::Conversation;

/// One live session. The conversation sits behind an async mutex so turns
/// serialize within a session while other sessions proceed concurrently;
/// the lock is held only for the duration of one utterance.
pub struct SessionHandle {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub conversation: tokio::sync::Mutex<Conversation>,
}

/// Explicit session lifecycle service. No module-level singleton: the
/// registry lives in AppState and is injected wherever it is needed.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<SessionHandle>>>,
    ttl_minutes: i64,
}

impl SessionRegistry {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl_minutes,
        }
    }

    pub fn start(&self) -> Arc<SessionHandle> {
        let now = Utc::now().naive_utc();
        let handle = Arc::new(SessionHandle {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            conversation: tokio::sync::Mutex::new(Conversation::new(now)),
        });
        self.sessions
            .lock()
            .unwrap()
            .insert(handle.id.clone(), Arc::clone(&handle));
        tracing::info!(session = %handle.id, "session started");
        handle
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }

    /// Ending a session abandons its conversation; nothing uncommitted is
    /// ever written.
    pub fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().unwrap().remove(session_id).is_some();
        if removed {
            tracing::info!(session = %session_id, "session ended");
        }
        removed
    }

    /// Drop sessions idle past the TTL. Called by the background sweeper.
    pub fn expire_idle(&self, now: NaiveDateTime) -> usize {
        let cutoff = now - Duration::minutes(self.ttl_minutes);
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, handle| {
            handle
                .conversation
                .try_lock()
                .map(|conv| conv.last_activity > cutoff)
                // A locked conversation is mid-turn, so it is not idle.
                .unwrap_or(true)
        });
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, "expired idle sessions");
        }
        expired
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
    use super::*;

    #[test]
    fn test_start_get_end() {
        let registry = SessionRegistry::new(30);
        let handle = registry.start();
        assert!(registry.get(&handle.id).is_some());
        assert!(registry.end(&handle.id));
        assert!(registry.get(&handle.id).is_none());
        assert!(!registry.end(&handle.id));
    }

    #[test]
    fn test_expire_idle() {
        let registry = SessionRegistry::new(30);
        let handle = registry.start();
        let later = Utc::now().naive_utc() + Duration::minutes(31);
        assert_eq!(registry.expire_idle(later), 1);
        assert!(registry.get(&handle.id).is_none());
    }

    #[test]
    fn test_fresh_session_survives_sweep() {
        let registry = SessionRegistry::new(30);
        let handle = registry.start();
        assert_eq!(registry.expire_idle(Utc::now().naive_utc()), 0);
        assert!(registry.get(&handle.id).is_some());
    }
}
