//! Bidirectional map between session id, connection id, and the optional
//! logged-in username.
//!
//! The logged-in index (`username -> session`) is maintained transactionally
//! alongside the primary session map under a single lock, so the invariant
//! "the logged-in index contains `u -> s` iff session `s` exists and its
//! username field equals `u`" never has a window where it's violated, even
//! under concurrent callers.

use std::collections::HashMap;

use auction_types::{ConnectionId, SessionId, Username};
use parking_lot::RwLock;

struct Session {
    connection: ConnectionId,
    username: Option<Username>,
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<SessionId, Session>,
    logged_in: HashMap<Username, SessionId>,
}

#[derive(Default)]
pub struct SessionRegistry {
    inner: RwLock<Registry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if `id` is already present.
    pub fn start_session(&self, id: SessionId, connection: ConnectionId) -> bool {
        let mut reg = self.inner.write();
        if reg.sessions.contains_key(&id) {
            return false;
        }
        reg.sessions.insert(id, Session { connection, username: None });
        true
    }

    /// Removes the session and, if authenticated, frees its username.
    pub fn end_session(&self, id: SessionId) -> bool {
        let mut reg = self.inner.write();
        let Some(session) = reg.sessions.remove(&id) else {
            return false;
        };
        if let Some(username) = session.username {
            reg.logged_in.remove(&username);
        }
        true
    }

    /// Fails if the session doesn't exist, `username` is already logged in,
    /// or `username` is empty.
    pub fn login(&self, id: SessionId, username: Username) -> bool {
        if username.is_empty() {
            return false;
        }
        let mut reg = self.inner.write();
        if !reg.sessions.contains_key(&id) || reg.logged_in.contains_key(&username) {
            return false;
        }
        reg.logged_in.insert(username.clone(), id);
        reg.sessions.get_mut(&id).expect("checked above").username = Some(username);
        true
    }

    /// Fails if the session doesn't exist or isn't authenticated.
    pub fn logout(&self, id: SessionId) -> bool {
        let mut reg = self.inner.write();
        let Some(session) = reg.sessions.get_mut(&id) else {
            return false;
        };
        let Some(username) = session.username.take() else {
            return false;
        };
        reg.logged_in.remove(&username);
        true
    }

    pub fn get_username(&self, id: SessionId) -> Option<Username> {
        self.inner.read().sessions.get(&id).and_then(|s| s.username.clone())
    }

    pub fn get_session_id(&self, username: &str) -> Option<SessionId> {
        self.inner.read().logged_in.get(username).copied()
    }

    pub fn get_connection_id(&self, id: SessionId) -> Option<ConnectionId> {
        self.inner.read().sessions.get(&id).map(|s| s.connection)
    }
}
