//! Player presence tracking.
//!
//! One live connection per account: registering a new handle displaces
//! the previous one so the hub can force-disconnect it. Every gameplay
//! action and heartbeat refreshes the last-active timestamp; a periodic
//! sweep asks for everyone past the inactivity limit.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::events::ConnSender;

#[derive(Debug)]
struct PresenceEntry {
    conn: ConnSender,
    last_active: DateTime<Utc>,
}

/// Tracks connected players and their last activity.
#[derive(Debug, Default)]
pub struct PresenceManager {
    entries: HashMap<i64, PresenceEntry>,
}

impl PresenceManager {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a connection, displacing any previous one.
    ///
    /// Returns the displaced handle so the caller can notify it.
    pub fn register(
        &mut self,
        player_id: i64,
        conn: ConnSender,
        now: DateTime<Utc>,
    ) -> Option<ConnSender> {
        let previous = self.entries.insert(
            player_id,
            PresenceEntry {
                conn,
                last_active: now,
            },
        );
        previous.map(|e| e.conn)
    }

    pub fn conn(&self, player_id: i64) -> Option<&ConnSender> {
        self.entries.get(&player_id).map(|e| &e.conn)
    }

    pub fn is_connected(&self, player_id: i64) -> bool {
        self.entries.contains_key(&player_id)
    }

    /// Refresh a player's last-active timestamp.
    pub fn touch(&mut self, player_id: i64, now: DateTime<Utc>) {
        if let Some(entry) = self.entries.get_mut(&player_id) {
            entry.last_active = now;
        }
    }

    /// Drop a player's presence unconditionally.
    pub fn clear(&mut self, player_id: i64) -> Option<ConnSender> {
        self.entries.remove(&player_id).map(|e| e.conn)
    }

    /// Drop a player's presence only if it still belongs to `conn`.
    ///
    /// A socket closing after its account was taken over by a newer
    /// connection must not clear the newer session.
    pub fn clear_if(&mut self, player_id: i64, conn: &ConnSender) -> bool {
        let matches = self
            .entries
            .get(&player_id)
            .map(|e| e.conn.same_channel(conn))
            .unwrap_or(false);
        if matches {
            self.entries.remove(&player_id);
        }
        matches
    }

    /// Players whose last activity is older than the limit.
    pub fn inactive_players(&self, now: DateTime<Utc>, limit: Duration) -> Vec<i64> {
        let threshold = now - limit;
        self.entries
            .iter()
            .filter(|(_, e)| e.last_active < threshold)
            .map(|(id, _)| *id)
            .collect()
    }

    /// All connected player handles, for broadcasts.
    pub fn connections(&self) -> impl Iterator<Item = (i64, &ConnSender)> {
        self.entries.iter().map(|(id, e)| (*id, &e.conn))
    }

    pub fn connected_count(&self) -> usize {
        self.entries.len()
    }
}
