//! Reward and statistics calculator.
//!
//! Converts a finalized match into point and averaj deltas on both the
//! cumulative player aggregate and the day's statistics row, plus the
//! daily-completion streak bonus. Both participants are settled in one
//! call against one directory borrow, so the score state never ends up
//! half-applied.
//!
//! The winner earns `points_per_win`, plus `averaj_per_quit` averaj
//! when the opponent forfeited. The loser's averaj penalty is always
//! minus the number of their own pieces removed during the match; a
//! forfeit additionally marks their day as quit.

use chrono::NaiveDate;

use crate::records::{Directory, DirectoryError, Settings};

/// Completed matches that finish a tournament day.
pub const DAILY_COMPLETION_MATCHES: u32 = 5;

/// What a settlement credited, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSummary {
    pub winner_id: i64,
    pub loser_id: i64,
    pub winner_points: i32,
    pub winner_averaj: i32,
    pub loser_averaj: i32,
}

/// Settle a finalized match for both participants.
pub fn apply_match_result(
    directory: &mut Directory,
    settings: &Settings,
    match_id: i64,
    forfeit: bool,
    today: NaiveDate,
    week: u32,
    year: i32,
) -> Result<RewardSummary, DirectoryError> {
    let record = directory
        .match_record(match_id)
        .ok_or(DirectoryError::MatchNotFound(match_id))?;
    let (winner_id, loser_id) = match (record.winner_id, record.loser_id) {
        (Some(w), Some(l)) => (w, l),
        _ => return Err(DirectoryError::MatchNotCompleted(match_id)),
    };
    let loser_side = record
        .side_of(loser_id)
        .ok_or(DirectoryError::NotInMatch(loser_id))?;
    let loser_removed = record.pieces_removed(loser_side);

    // Validate both profiles up front so a miss cannot half-apply
    for id in [winner_id, loser_id] {
        if directory.player(id).is_none() {
            return Err(DirectoryError::PlayerNotFound(id));
        }
    }

    let winner_points = settings.points_per_win;
    let winner_averaj = if forfeit { settings.averaj_per_quit } else { 0 };
    let loser_averaj = -(loser_removed as i32);

    credit(
        directory, settings, winner_id, winner_points, winner_averaj, true, false, today, week,
        year,
    );
    credit(
        directory, settings, loser_id, 0, loser_averaj, false, forfeit, today, week, year,
    );

    Ok(RewardSummary {
        winner_id,
        loser_id,
        winner_points,
        winner_averaj,
        loser_averaj,
    })
}

/// Apply one player's deltas to their aggregate and daily row.
#[allow(clippy::too_many_arguments)]
fn credit(
    directory: &mut Directory,
    settings: &Settings,
    player_id: i64,
    points: i32,
    averaj: i32,
    won: bool,
    quit: bool,
    today: NaiveDate,
    week: u32,
    year: i32,
) {
    // Existence was checked by the caller
    let profile = directory.player_mut(player_id).expect("profile exists");
    profile.points += points;
    profile.averaj += averaj;
    profile.total_matches += 1;
    if won {
        profile.won_matches += 1;
    } else {
        profile.lost_matches += 1;
    }

    let row = directory.daily_stat_mut(player_id, today, week, year);
    row.matches_played += 1;
    row.points += points;
    row.averaj += averaj;
    if quit {
        row.quit = true;
    }

    let completes_day = row.matches_played >= DAILY_COMPLETION_MATCHES && !row.completed_daily;
    if !completes_day {
        return;
    }
    row.completed_daily = true;

    // Streak continues only over a completed yesterday
    let streak = today
        .pred_opt()
        .and_then(|yesterday| directory.daily_stat(player_id, yesterday))
        .filter(|prev| prev.completed_daily)
        .map(|prev| prev.streak + 1)
        .unwrap_or(1);
    let bonus = streak as i32 * settings.daily_bonus_increment;

    let row = directory.daily_stat_mut(player_id, today, week, year);
    row.streak = streak;
    row.averaj += bonus;
    directory.player_mut(player_id).expect("profile exists").averaj += bonus;
}
