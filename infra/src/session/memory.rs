//! Process-local session store

use async_trait::async_trait;
use pv_core::domain::entities::Session;
use pv_core::services::SessionStore;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredSession {
    session: Session,
    expires_at: Instant,
}

/// In-memory session store, lost on restart
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|stored| stored.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: Option<&str>) -> Result<Session, String> {
        let Some(session_id) = session_id else {
            return Ok(Session::new());
        };

        let now = Instant::now();
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(stored) if stored.expires_at > now => Ok(stored.session.clone()),
            Some(_) => {
                debug!(session_id, "Session expired, starting a new one");
                Ok(Session::new())
            }
            None => Ok(Session::new()),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), String> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(Duration::from_secs(session.options.max_age))
            .ok_or_else(|| format!("Session max age out of range: {}", session.options.max_age))?;

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| stored.expires_at > now);
        sessions.insert(
            session.id.clone(),
            StoredSession {
                session: session.clone(),
                expires_at,
            },
        );
        Ok(())
    }
}
