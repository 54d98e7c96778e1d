//! Daily player statistics.
//!
//! One row per player per calendar day, created lazily on the first
//! match of the day and updated additively by the reward calculator.

use chrono::NaiveDate;

/// Per-day score row for one player.
#[derive(Debug, Clone)]
pub struct DailyStat {
    pub player_id: i64,
    pub date: NaiveDate,
    pub matches_played: u32,
    pub points: i32,
    pub averaj: i32,
    /// Set once the daily match quota is reached.
    pub completed_daily: bool,
    /// Consecutive completed days ending on this one.
    pub streak: u32,
    /// Set when the player quit a match this day.
    pub quit: bool,
    pub week: u32,
    pub year: i32,
}

impl DailyStat {
    pub fn new(player_id: i64, date: NaiveDate, week: u32, year: i32) -> Self {
        Self {
            player_id,
            date,
            matches_played: 0,
            points: 0,
            averaj: 0,
            completed_daily: false,
            streak: 0,
            quit: false,
            week,
            year,
        }
    }
}
