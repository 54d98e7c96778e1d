//! System settings.
//!
//! Singleton tunables read by every component that needs a threshold.
//! The admin screens that edit them live outside this crate; the core
//! only ever takes a read-only snapshot.

use chrono::NaiveTime;

/// Tournament tunables with their deployment defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Completed matches a player may play per day.
    pub max_daily_matches: u32,

    /// Seconds to answer a question before the turn is lost.
    pub question_time_secs: i64,

    /// Seconds to make a board move after a correct answer.
    pub move_time_secs: i64,

    /// Minutes without activity before a forced disconnect.
    pub inactivity_limit_mins: i64,

    /// Join window for quarter final matches (start..=end, time of day).
    pub quarter_final_window: (NaiveTime, NaiveTime),

    /// Join window for semi final matches.
    pub semi_final_window: (NaiveTime, NaiveTime),

    /// Join window for final matches.
    pub final_window: (NaiveTime, NaiveTime),

    /// Points credited to a match winner.
    pub points_per_win: i32,

    /// Extra averaj credited to the winner when the opponent quit.
    pub averaj_per_quit: i32,

    /// Averaj bonus per consecutive completed day.
    pub daily_bonus_increment: i32,
}

impl Default for Settings {
    fn default() -> Self {
        let evening = (hm(18, 0), hm(23, 59));
        Self {
            max_daily_matches: 5,
            question_time_secs: 20,
            move_time_secs: 30,
            inactivity_limit_mins: 5,
            quarter_final_window: evening,
            semi_final_window: evening,
            final_window: evening,
            points_per_win: 3,
            averaj_per_quit: 9,
            daily_bonus_increment: 5,
        }
    }
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_daily_matches, 5);
        assert_eq!(settings.points_per_win, 3);
        assert_eq!(settings.averaj_per_quit, 9);
        assert_eq!(settings.daily_bonus_increment, 5);
        assert_eq!(settings.quarter_final_window.0, hm(18, 0));
        assert_eq!(settings.final_window.1, hm(23, 59));
    }
}
