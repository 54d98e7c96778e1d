//! Matchmaking queue.
//!
//! Insertion-ordered membership of waiting players, each with their
//! live connection handle. The pairing policy takes the two
//! longest-waiting players; eligibility and the atomic dequeue-and-pair
//! step belong to the hub, which owns this queue exclusively.

use crate::events::ConnSender;

/// One waiting player.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub player_id: i64,
    pub conn: ConnSender,
}

/// FIFO matchmaking queue.
#[derive(Debug, Default)]
pub struct MatchQueue {
    entries: Vec<QueueEntry>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a player, keeping their position if already queued.
    ///
    /// Re-enqueuing only replaces the connection handle; a player never
    /// holds two spots.
    pub fn enqueue(&mut self, player_id: i64, conn: ConnSender) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.player_id == player_id) {
            entry.conn = conn;
        } else {
            self.entries.push(QueueEntry { player_id, conn });
        }
    }

    /// Remove a player from the queue.
    pub fn dequeue(&mut self, player_id: i64) -> Option<QueueEntry> {
        let idx = self.entries.iter().position(|e| e.player_id == player_id)?;
        Some(self.entries.remove(idx))
    }

    pub fn contains(&self, player_id: i64) -> bool {
        self.entries.iter().any(|e| e.player_id == player_id)
    }

    /// The two longest-waiting players, if the queue holds two.
    pub fn front_pair(&self) -> Option<(&QueueEntry, &QueueEntry)> {
        match self.entries.as_slice() {
            [first, second, ..] => Some((first, second)),
            _ => None,
        }
    }

    /// Remove and return two queued players.
    pub fn take_pair(&mut self, a: i64, b: i64) -> Option<(QueueEntry, QueueEntry)> {
        if !self.contains(a) || !self.contains(b) {
            return None;
        }
        let first = self.dequeue(a)?;
        let second = self.dequeue(b)?;
        Some((first, second))
    }

    /// Entries in insertion order.
    pub fn snapshot_ordered(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
