//! Match records.
//!
//! A match row is created when a pairing succeeds and finalized exactly
//! once when the match ends. Rows are never deleted; they feed the
//! daily quota, the played-together check and the weekly rankings.

use chrono::{DateTime, Utc};

use crate::state::board::Side;

/// Tournament phase a match belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    League,
    QuarterFinal,
    SemiFinal,
    Final,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::League => "league",
            Self::QuarterFinal => "quarter_final",
            Self::SemiFinal => "semi_final",
            Self::Final => "final",
        }
    }

    /// Elimination matches are gated by a time-of-day window.
    pub fn is_elimination(&self) -> bool {
        !matches!(self, Self::League)
    }
}

/// Lifecycle of a match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Persistent match row.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub winner_id: Option<i64>,
    pub loser_id: Option<i64>,
    pub match_type: MatchType,
    pub status: MatchStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub week: u32,
    pub year: i32,
    pub player1_quit: bool,
    pub player2_quit: bool,
    /// Count of player 1's pieces removed by the opponent.
    pub player1_pieces_removed: u8,
    /// Count of player 2's pieces removed by the opponent.
    pub player2_pieces_removed: u8,
}

impl MatchRecord {
    pub fn new(
        id: i64,
        player1_id: i64,
        player2_id: i64,
        match_type: MatchType,
        started_at: DateTime<Utc>,
        week: u32,
        year: i32,
    ) -> Self {
        Self {
            id,
            player1_id,
            player2_id,
            winner_id: None,
            loser_id: None,
            match_type,
            status: MatchStatus::InProgress,
            started_at,
            ended_at: None,
            week,
            year,
            player1_quit: false,
            player2_quit: false,
            player1_pieces_removed: 0,
            player2_pieces_removed: 0,
        }
    }

    /// Which side a player holds, if they are in this match.
    pub fn side_of(&self, player_id: i64) -> Option<Side> {
        if player_id == self.player1_id {
            Some(Side::Player1)
        } else if player_id == self.player2_id {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn player_id(&self, side: Side) -> i64 {
        match side {
            Side::Player1 => self.player1_id,
            Side::Player2 => self.player2_id,
        }
    }

    pub fn opponent_of(&self, player_id: i64) -> Option<i64> {
        self.side_of(player_id)
            .map(|side| self.player_id(side.opponent()))
    }

    pub fn involves(&self, player_id: i64) -> bool {
        self.side_of(player_id).is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Count of `side`'s pieces removed by the opponent.
    pub fn pieces_removed(&self, side: Side) -> u8 {
        match side {
            Side::Player1 => self.player1_pieces_removed,
            Side::Player2 => self.player2_pieces_removed,
        }
    }

    /// Record that one of `victim`'s pieces was removed.
    pub fn record_removal(&mut self, victim: Side) {
        match victim {
            Side::Player1 => self.player1_pieces_removed += 1,
            Side::Player2 => self.player2_pieces_removed += 1,
        }
    }

    pub fn mark_quit(&mut self, side: Side) {
        match side {
            Side::Player1 => self.player1_quit = true,
            Side::Player2 => self.player2_quit = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MatchRecord {
        MatchRecord::new(1, 10, 20, MatchType::League, Utc::now(), 14, 2024)
    }

    #[test]
    fn test_sides() {
        let m = record();
        assert_eq!(m.side_of(10), Some(Side::Player1));
        assert_eq!(m.side_of(20), Some(Side::Player2));
        assert_eq!(m.side_of(30), None);
        assert_eq!(m.opponent_of(10), Some(20));
        assert_eq!(m.opponent_of(30), None);
        assert!(m.involves(20));
    }

    #[test]
    fn test_removal_counters() {
        let mut m = record();
        m.record_removal(Side::Player2);
        m.record_removal(Side::Player2);
        m.record_removal(Side::Player1);
        assert_eq!(m.pieces_removed(Side::Player2), 2);
        assert_eq!(m.pieces_removed(Side::Player1), 1);
    }

    #[test]
    fn test_match_type() {
        assert!(!MatchType::League.is_elimination());
        assert!(MatchType::QuarterFinal.is_elimination());
        assert!(MatchType::Final.is_elimination());
        assert_eq!(MatchType::SemiFinal.as_str(), "semi_final");
    }
}
