//! TTL cache of signed-in users
//!
//! An explicitly owned session store keyed by opaque token. Like the rate
//! limiter, it is constructed and dropped by the caller; authentication
//! itself happens elsewhere, this only caches who a token belongs to.

use chrono::{Duration, NaiveDateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::access::Role;

/// A signed-in user as seen by request handling
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    pub user_id: Uuid,
    pub display_name: String,
    pub role: Role,
    pub expires_at: NaiveDateTime,
}

impl UserSession {
    /// Create a session expiring `ttl` from now
    pub fn new(user_id: Uuid, display_name: String, role: Role, ttl: Duration) -> Self {
        Self {
            user_id,
            display_name,
            role,
            expires_at: Utc::now().naive_utc() + ttl,
        }
    }

    /// Whether the session has passed its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}

/// Token-keyed session cache with eviction on read
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, UserSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session under the given token, replacing any previous one
    pub fn insert(&mut self, token: String, session: UserSession) {
        self.sessions.insert(token, session);
    }

    /// Look up a live session. Expired sessions are evicted and reported
    /// as absent.
    pub fn get(&mut self, token: &str) -> Option<&UserSession> {
        if self
            .sessions
            .get(token)
            .is_some_and(|session| session.is_expired())
        {
            self.sessions.remove(token);
        }
        self.sessions.get(token)
    }

    /// Drop a session (sign-out), returning it if it was present
    pub fn remove(&mut self, token: &str) -> Option<UserSession> {
        self.sessions.remove(token)
    }

    /// Evict every expired session, returning how many were dropped
    pub fn purge_expired(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired());
        before - self.sessions.len()
    }

    /// Drop every session
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    /// Number of cached sessions, live or not-yet-evicted
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
