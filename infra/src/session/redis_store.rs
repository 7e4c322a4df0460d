//! Redis-backed session store
//!
//! Each session is one JSON document under `session:{id}`, written with
//! `SETEX` so that Redis expires it together with the cookie.

use async_trait::async_trait;
use pv_core::domain::entities::Session;
use pv_core::services::SessionStore;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

const KEY_PREFIX: &str = "session:";

/// Session store keeping one Redis key per session
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
}

impl RedisSessionStore {
    /// Connect to Redis
    pub async fn connect(url: &str) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(url), "Connecting session store to Redis");

        let client = Client::open(url).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;
        let connection = client.get_multiplexed_async_connection().await?;

        info!("Redis session store connected");
        Ok(Self { connection })
    }

    /// Check the connection with a PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let response: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(response == "PONG")
    }

    fn key(session_id: &str) -> String {
        format!("{}{}", KEY_PREFIX, session_id)
    }

    async fn fetch(&self, session_id: &str) -> Result<Option<Session>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = conn.get(Self::key(session_id)).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, session: &Session) -> Result<(), InfrastructureError> {
        let payload = serde_json::to_string(session)?;
        // SETEX rejects a zero TTL
        let ttl = session.options.max_age.max(1);
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(Self::key(&session.id), payload, ttl)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: Option<&str>) -> Result<Session, String> {
        let Some(session_id) = session_id else {
            return Ok(Session::new());
        };

        match self.fetch(session_id).await {
            Ok(Some(session)) => {
                debug!(session_id, "Session loaded from Redis");
                Ok(session)
            }
            Ok(None) => Ok(Session::new()),
            Err(InfrastructureError::Serialization(e)) => {
                warn!(session_id, error = %e, "Discarding undecodable session");
                Ok(Session::new())
            }
            Err(e) => {
                error!(session_id, error = %e, "Failed to load session from Redis");
                Err(e.to_string())
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), String> {
        self.store(session).await.map_err(|e| {
            error!(session_id = %session.id, error = %e, "Failed to save session to Redis");
            e.to_string()
        })
    }
}

/// Mask password in Redis URL for logging
fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
