//! Session layer for the triage chatbot
//!
//! The FSM core is stateless between requests; what survives a request is the
//! pair `(scenario_id, state_key)` stored here under an opaque session ID.
//! The store enforces the inactivity window: expired sessions are invisible
//! to `get` and reaped by a background task so the health probe's
//! active-session count stays honest.
//!
//! Access to a single session key is serialized by the store's lock; the
//! handlers perform at most one read-modify-write per request.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Default inactivity window before a session is dropped.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// What the chatbot persists between requests for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub scenario_id: String,
    pub state_key: String,
}

/// Abstract session persistence: get/set/clear keyed by an opaque string.
///
/// The chatbot handlers are written against this trait so the in-memory store
/// can be swapped for a cookie-backed or distributed one without touching
/// them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the live session for `key`, refreshing its activity clock.
    /// Expired sessions are treated as absent.
    async fn get(&self, key: &str) -> Option<ChatSession>;

    /// Create or replace the session for `key`.
    async fn set(&self, key: &str, session: ChatSession);

    /// Drop the session for `key`, if any.
    async fn clear(&self, key: &str);

    /// Number of sessions that have not passed the inactivity window.
    async fn active_count(&self) -> usize;
}

struct Entry {
    session: ChatSession,
    last_active: Instant,
}

/// In-memory session store with a fixed inactivity timeout.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    timeout: Duration,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.last_active) > self.timeout
    }

    /// Remove every expired session. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Option<ChatSession> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(key) {
            Some(entry) if !self.is_expired(entry, now) => {
                entry.last_active = now;
                Some(entry.session.clone())
            }
            Some(_) => {
                sessions.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, session: ChatSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            key.to_string(),
            Entry {
                session,
                last_active: Instant::now(),
            },
        );
    }

    async fn clear(&self, key: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(key);
    }

    async fn active_count(&self) -> usize {
        let now = Instant::now();
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|entry| !self.is_expired(entry, now))
            .count()
    }
}

/// Periodically reap expired sessions.
pub fn spawn_purge_task(store: Arc<MemorySessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Reaped expired chat sessions");
            }
        }
    })
}
