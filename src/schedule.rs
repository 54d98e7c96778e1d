//! Tournament schedule.
//!
//! Maps the wall clock onto the tournament: which match type a weekday
//! hosts, whether an elimination join window is open, and the week
//! number stamped onto matches and daily rows. Time is read through the
//! `Clock` trait so the gating logic stays deterministic under test.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};

use crate::records::{MatchType, Settings};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The match type hosted on a weekday.
///
/// Monday through Thursday run the league; the weekend runs the
/// elimination rounds up to Sunday's final.
pub fn match_type_for(weekday: Weekday) -> MatchType {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => MatchType::League,
        Weekday::Fri => MatchType::QuarterFinal,
        Weekday::Sat => MatchType::SemiFinal,
        Weekday::Sun => MatchType::Final,
    }
}

/// Whether matchmaking joins are open at this time of day.
///
/// League matches have no time restriction; elimination matches are
/// joinable only inside their configured window (inclusive ends).
pub fn is_join_window_open(match_type: MatchType, time: NaiveTime, settings: &Settings) -> bool {
    let (start, end) = match match_type {
        MatchType::League => return true,
        MatchType::QuarterFinal => settings.quarter_final_window,
        MatchType::SemiFinal => settings.semi_final_window,
        MatchType::Final => settings.final_window,
    };
    time >= start && time <= end
}

/// ISO week and week-based year for a date.
pub fn week_number(date: NaiveDate) -> (u32, i32) {
    let iso = date.iso_week();
    (iso.week(), iso.year())
}

/// Test clock pinned to a settable instant.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock(std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>);

#[cfg(test)]
impl FixedClock {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(std::sync::Arc::new(std::sync::Mutex::new(time)))
    }

    pub fn set(&self, time: DateTime<Utc>) {
        *self.0.lock().unwrap() = time;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += duration;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn test_weekday_mapping() {
        assert_eq!(match_type_for(Weekday::Mon), MatchType::League);
        assert_eq!(match_type_for(Weekday::Tue), MatchType::League);
        assert_eq!(match_type_for(Weekday::Wed), MatchType::League);
        assert_eq!(match_type_for(Weekday::Thu), MatchType::League);
        assert_eq!(match_type_for(Weekday::Fri), MatchType::QuarterFinal);
        assert_eq!(match_type_for(Weekday::Sat), MatchType::SemiFinal);
        assert_eq!(match_type_for(Weekday::Sun), MatchType::Final);
    }

    #[test]
    fn test_league_unrestricted() {
        let settings = Settings::default();
        assert!(is_join_window_open(MatchType::League, hm(3, 0), &settings));
    }

    #[test]
    fn test_elimination_window() {
        let settings = Settings::default();

        assert!(!is_join_window_open(
            MatchType::QuarterFinal,
            hm(17, 59),
            &settings
        ));
        // Window ends are inclusive
        assert!(is_join_window_open(
            MatchType::QuarterFinal,
            hm(18, 0),
            &settings
        ));
        assert!(is_join_window_open(
            MatchType::SemiFinal,
            hm(23, 59),
            &settings
        ));
        // Past midnight is outside the evening window again
        assert!(!is_join_window_open(MatchType::Final, hm(0, 10), &settings));
    }

    #[test]
    fn test_week_number() {
        // 2024-01-01 is a Monday, ISO week 1 of 2024
        let (week, year) = week_number(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!((week, year), (1, 2024));

        // 2023-01-01 is a Sunday and belongs to ISO week 52 of 2022
        let (week, year) = week_number(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!((week, year), (52, 2022));
    }
}
