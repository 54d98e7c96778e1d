//! Player aggregate record.
//!
//! The slice of the account record the core reads and updates:
//! cumulative score counters and the blacklist flag. Registration and
//! authentication live outside this crate.

/// Cumulative per-player score state.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub id: i64,
    pub username: String,
    pub points: i32,
    pub averaj: i32,
    pub total_matches: u32,
    pub won_matches: u32,
    pub lost_matches: u32,
    /// Blacklisted players are excluded from matchmaking and rankings.
    pub blacklisted: bool,
}

impl PlayerProfile {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            points: 0,
            averaj: 0,
            total_matches: 0,
            won_matches: 0,
            lost_matches: 0,
            blacklisted: false,
        }
    }
}
