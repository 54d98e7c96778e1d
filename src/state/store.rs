//! Match session store.
//!
//! Holds the ephemeral `GameState` of every live match, keyed by match
//! id, with an expiry. The interface is deliberately narrow (get, put,
//! delete, purge) so the in-memory map could be swapped for an external
//! cache without touching the callers.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::state::session::GameState;

/// Sessions expire this long after their last write.
pub const SESSION_TTL_HOURS: i64 = 24;

struct Entry {
    state: GameState,
    expires_at: DateTime<Utc>,
}

/// In-memory store of live match sessions.
#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Entry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn get(&self, match_id: i64) -> Option<&GameState> {
        self.sessions.get(&match_id).map(|e| &e.state)
    }

    pub fn get_mut(&mut self, match_id: i64) -> Option<&mut GameState> {
        self.sessions.get_mut(&match_id).map(|e| &mut e.state)
    }

    /// Store a session, refreshing its expiry.
    pub fn put(&mut self, state: GameState, now: DateTime<Utc>) {
        let entry = Entry {
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
            state,
        };
        self.sessions.insert(entry.state.match_id, entry);
    }

    pub fn delete(&mut self, match_id: i64) -> Option<GameState> {
        self.sessions.remove(&match_id).map(|e| e.state)
    }

    /// Drop sessions past their expiry. Returns the dropped match ids.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> Vec<i64> {
        let expired: Vec<i64> = self
            .sessions
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            self.sessions.remove(id);
        }
        expired
    }

    /// Match ids of all live sessions.
    pub fn match_ids(&self) -> Vec<i64> {
        self.sessions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
