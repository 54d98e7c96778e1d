//! Persistent record shapes and the directory over them.
//!
//! This module holds the records the core reads and writes:
//!
//! - `player` - Cumulative player aggregate (points, averaj, counters)
//! - `game_match` - Match rows with outcome and removal counters
//! - `stats` - One statistics row per player per day
//! - `question` - Quiz question pool
//! - `settings` - Singleton tunables
//!
//! `Directory` is the in-memory persistence layer behind them. It backs
//! the single-process server directly and keeps the query surface
//! narrow, so a relational store could be substituted without touching
//! the callers.

pub mod game_match;
pub mod player;
pub mod question;
pub mod settings;
pub mod stats;

pub use game_match::{MatchRecord, MatchStatus, MatchType};
pub use player::PlayerProfile;
pub use question::{Question, QuestionBank};
pub use settings::Settings;
pub use stats::DailyStat;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::state::board::Side;

/// Directory errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    PlayerNotFound(i64),
    MatchNotFound(i64),
    MatchAlreadyCompleted(i64),
    MatchNotCompleted(i64),
    NotInMatch(i64),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            Self::MatchNotFound(id) => write!(f, "Match {} not found", id),
            Self::MatchAlreadyCompleted(id) => write!(f, "Match {} already completed", id),
            Self::MatchNotCompleted(id) => write!(f, "Match {} is not completed", id),
            Self::NotInMatch(id) => write!(f, "Player {} is not in this match", id),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// One row of a weekly ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub player_id: i64,
    pub username: String,
    pub points: i32,
    pub averaj: i32,
}

/// In-memory store of players, matches and daily statistics.
#[derive(Debug, Default)]
pub struct Directory {
    players: HashMap<i64, PlayerProfile>,
    matches: HashMap<i64, MatchRecord>,
    /// Daily rows by (player, date)
    stats: HashMap<(i64, NaiveDate), DailyStat>,
    next_match_id: i64,
}

impl Directory {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            matches: HashMap::new(),
            stats: HashMap::new(),
            next_match_id: 1,
        }
    }

    /// Add or replace a player profile.
    pub fn add_player(&mut self, profile: PlayerProfile) {
        self.players.insert(profile.id, profile);
    }

    pub fn player(&self, player_id: i64) -> Option<&PlayerProfile> {
        self.players.get(&player_id)
    }

    pub fn player_mut(&mut self, player_id: i64) -> Option<&mut PlayerProfile> {
        self.players.get_mut(&player_id)
    }

    pub fn username(&self, player_id: i64) -> Option<&str> {
        self.players.get(&player_id).map(|p| p.username.as_str())
    }

    /// Create a match row in progress between two known players.
    pub fn create_match(
        &mut self,
        player1_id: i64,
        player2_id: i64,
        match_type: MatchType,
        started_at: DateTime<Utc>,
        week: u32,
        year: i32,
    ) -> Result<&MatchRecord, DirectoryError> {
        for id in [player1_id, player2_id] {
            if !self.players.contains_key(&id) {
                return Err(DirectoryError::PlayerNotFound(id));
            }
        }

        let id = self.next_match_id;
        self.next_match_id += 1;

        let record = MatchRecord::new(id, player1_id, player2_id, match_type, started_at, week, year);
        self.matches.insert(id, record);
        Ok(&self.matches[&id])
    }

    pub fn match_record(&self, match_id: i64) -> Option<&MatchRecord> {
        self.matches.get(&match_id)
    }

    /// Increment the removed-pieces counter for `victim` on a match.
    pub fn record_removal(&mut self, match_id: i64, victim: Side) -> Result<(), DirectoryError> {
        let record = self
            .matches
            .get_mut(&match_id)
            .ok_or(DirectoryError::MatchNotFound(match_id))?;
        record.record_removal(victim);
        Ok(())
    }

    /// Flag a player as the quitting party on a match.
    pub fn mark_match_quit(&mut self, match_id: i64, player_id: i64) -> Result<(), DirectoryError> {
        let record = self
            .matches
            .get_mut(&match_id)
            .ok_or(DirectoryError::MatchNotFound(match_id))?;
        let side = record
            .side_of(player_id)
            .ok_or(DirectoryError::NotInMatch(player_id))?;
        record.mark_quit(side);
        Ok(())
    }

    /// Complete a match with a winner. A match can be finalized once.
    pub fn finalize_match(
        &mut self,
        match_id: i64,
        winner_id: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<&MatchRecord, DirectoryError> {
        let record = self
            .matches
            .get_mut(&match_id)
            .ok_or(DirectoryError::MatchNotFound(match_id))?;

        if record.is_completed() {
            return Err(DirectoryError::MatchAlreadyCompleted(match_id));
        }
        let loser_id = record
            .opponent_of(winner_id)
            .ok_or(DirectoryError::NotInMatch(winner_id))?;

        record.status = MatchStatus::Completed;
        record.winner_id = Some(winner_id);
        record.loser_id = Some(loser_id);
        record.ended_at = Some(ended_at);
        Ok(&self.matches[&match_id])
    }

    /// The player's in-progress match, if any.
    pub fn active_match_for(&self, player_id: i64) -> Option<i64> {
        self.matches
            .values()
            .find(|m| m.status == MatchStatus::InProgress && m.involves(player_id))
            .map(|m| m.id)
    }

    /// Whether two players already finished a match against each other
    /// on the given day.
    pub fn has_played_today(&self, a: i64, b: i64, date: NaiveDate) -> bool {
        self.matches.values().any(|m| {
            m.is_completed()
                && m.started_at.date_naive() == date
                && ((m.player1_id == a && m.player2_id == b)
                    || (m.player1_id == b && m.player2_id == a))
        })
    }

    /// Completed matches for a player on the given day.
    pub fn completed_today(&self, player_id: i64, date: NaiveDate) -> u32 {
        self.matches
            .values()
            .filter(|m| {
                m.is_completed() && m.started_at.date_naive() == date && m.involves(player_id)
            })
            .count() as u32
    }

    /// Whether the player quit a match on the given day.
    pub fn quit_today(&self, player_id: i64, date: NaiveDate) -> bool {
        self.stats
            .get(&(player_id, date))
            .map(|s| s.quit)
            .unwrap_or(false)
    }

    /// Daily quota gate: under the match limit and no quit today.
    pub fn can_play_today(&self, player_id: i64, date: NaiveDate, settings: &Settings) -> bool {
        self.completed_today(player_id, date) < settings.max_daily_matches
            && !self.quit_today(player_id, date)
    }

    pub fn daily_stat(&self, player_id: i64, date: NaiveDate) -> Option<&DailyStat> {
        self.stats.get(&(player_id, date))
    }

    /// Daily row for a player, created on first touch.
    pub fn daily_stat_mut(
        &mut self,
        player_id: i64,
        date: NaiveDate,
        week: u32,
        year: i32,
    ) -> &mut DailyStat {
        self.stats
            .entry((player_id, date))
            .or_insert_with(|| DailyStat::new(player_id, date, week, year))
    }

    /// Weekly ranking: per-player points and averaj summed over the
    /// week's daily rows, blacklisted players excluded, ordered by
    /// points then averaj.
    pub fn weekly_rankings(&self, week: u32, year: i32) -> Vec<RankingEntry> {
        let mut entries: Vec<RankingEntry> = self
            .players
            .values()
            .filter(|p| !p.blacklisted)
            .map(|p| {
                let (points, averaj) = self
                    .stats
                    .values()
                    .filter(|s| s.player_id == p.id && s.week == week && s.year == year)
                    .fold((0, 0), |(pts, avg), s| (pts + s.points, avg + s.averaj));
                RankingEntry {
                    player_id: p.id,
                    username: p.username.clone(),
                    points,
                    averaj,
                }
            })
            .filter(|e| e.points > 0 || e.averaj != 0)
            .collect();

        entries.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| b.averaj.cmp(&a.averaj))
        });
        entries
    }

    /// The top `count` players of the week, used to seed elimination
    /// rounds.
    pub fn top_players(&self, week: u32, year: i32, count: usize) -> Vec<RankingEntry> {
        let mut rankings = self.weekly_rankings(week, year);
        rankings.truncate(count);
        rankings
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}
