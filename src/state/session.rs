//! Per-match game state and its phase transitions.
//!
//! A `GameState` lives for one match: the board, the turn, the phase
//! and the pending quiz question. All transitions are synchronous and
//! pure; the hub decides what to do with the returned outcome (draw a
//! question, push events, end the match). A rejected action returns an
//! error and leaves the state untouched, so retries are safe.
//!
//! # Phases
//!
//! ```text
//!                 mill formed
//! ┌───────────┐ ──────────────▶ ┌────────┐
//! │ Placement │                 │ Remove │
//! └─────┬─────┘ ◀────────────── └────────┘
//!       │ both placed 9            │  ▲ mill formed
//!       ▼                          ▼  │
//! ┌───────────┐ ◀──────────────────────
//! │ Movement  │
//! └───────────┘
//! ```
//!
//! The Remove sub-state is entered after any mill and exits back to the
//! phase the placement counters dictate. Any opposing piece may be
//! removed, including one inside a standing mill.

use chrono::{DateTime, Utc};

use crate::records::{MatchType, Question};
use crate::state::board::{
    can_move, check_mill, is_valid_move, Board, Side, BOARD_CELLS, FLYING_THRESHOLD,
    PIECES_PER_PLAYER,
};

/// Match phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Players alternate placing their nine pieces.
    Placement,
    /// Pieces slide to adjacent cells (or fly at three pieces).
    Movement,
    /// A mill was formed; the current player removes one opposing piece.
    Remove,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placement => "placement",
            Self::Movement => "movement",
            Self::Remove => "remove",
        }
    }
}

/// Rejected-action reasons. All of these leave the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    NotYourTurn,
    QuestionPending,
    NoQuestionPending,
    WrongPhase,
    InvalidPosition,
    CellOccupied,
    CellNotYours,
    CellNotOpponents,
    AllPiecesPlaced,
    IllegalMove,
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotYourTurn => write!(f, "It's not your turn"),
            Self::QuestionPending => write!(f, "Answer the question first"),
            Self::NoQuestionPending => write!(f, "No question is pending"),
            Self::WrongPhase => write!(f, "Action not allowed in this phase"),
            Self::InvalidPosition => write!(f, "Position is off the board"),
            Self::CellOccupied => write!(f, "Cell is occupied"),
            Self::CellNotYours => write!(f, "Cell does not hold your piece"),
            Self::CellNotOpponents => write!(f, "Cell does not hold an opponent piece"),
            Self::AllPiecesPlaced => write!(f, "All pieces already placed"),
            Self::IllegalMove => write!(f, "Illegal move"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Result of answering the pending question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct: the move window opens for the same player.
    Correct,
    /// Wrong: the turn passed to the opponent, who needs a fresh question.
    Wrong,
}

/// Result of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// A mill formed: same player removes a piece next, no new question.
    MillFormed,
    /// Turn passed: the next player needs a fresh question.
    TurnPassed,
    MatchOver { winner: Side },
}

/// Result of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    MillFormed,
    TurnPassed,
    MatchOver { winner: Side },
}

/// Result of a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    TurnPassed,
    MatchOver { winner: Side },
}

/// Ephemeral state of one live match.
#[derive(Debug, Clone)]
pub struct GameState {
    pub match_id: i64,
    pub player1_id: i64,
    pub player2_id: i64,
    pub player1_name: String,
    pub player2_name: String,
    pub board: Board,
    pub current: Side,
    pub phase: GamePhase,
    /// Pieces placed so far, by side index.
    placed: [u8; 2],
    /// Pieces currently on the board, by side index.
    on_board: [u8; 2],
    /// The posted question. The correct index never leaves the server.
    pub question: Option<Question>,
    /// True while the current player still owes an answer.
    pub awaiting_answer: bool,
    pub question_deadline: Option<DateTime<Utc>>,
    pub move_deadline: Option<DateTime<Utc>>,
    pub match_type: MatchType,
    pub started_at: DateTime<Utc>,
}

impl GameState {
    pub fn new(
        match_id: i64,
        player1: (i64, String),
        player2: (i64, String),
        match_type: MatchType,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            match_id,
            player1_id: player1.0,
            player1_name: player1.1,
            player2_id: player2.0,
            player2_name: player2.1,
            board: [None; BOARD_CELLS],
            current: Side::Player1,
            phase: GamePhase::Placement,
            placed: [0; 2],
            on_board: [0; 2],
            question: None,
            awaiting_answer: false,
            question_deadline: None,
            move_deadline: None,
            match_type,
            started_at,
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

    pub fn player_name(&self, side: Side) -> &str {
        match side {
            Side::Player1 => &self.player1_name,
            Side::Player2 => &self.player2_name,
        }
    }

    pub fn placed(&self, side: Side) -> u8 {
        self.placed[side.index()]
    }

    pub fn pieces_on_board(&self, side: Side) -> u8 {
        self.on_board[side.index()]
    }

    fn placement_complete(&self) -> bool {
        self.placed[0] >= PIECES_PER_PLAYER && self.placed[1] >= PIECES_PER_PLAYER
    }

    fn require_turn(&self, side: Side) -> Result<(), ActionError> {
        if side != self.current {
            return Err(ActionError::NotYourTurn);
        }
        Ok(())
    }

    /// Post a question for the current player.
    pub fn set_question(&mut self, question: Question, deadline: Option<DateTime<Utc>>) {
        self.question = Some(question);
        self.awaiting_answer = true;
        self.question_deadline = deadline;
        self.move_deadline = None;
    }

    /// Pass the turn. The next player owes an answer to a question the
    /// caller draws afterwards.
    fn pass_turn(&mut self) {
        self.current = self.current.opponent();
        self.awaiting_answer = true;
        self.question = None;
        self.question_deadline = None;
        self.move_deadline = None;
    }

    /// Answer the pending question.
    ///
    /// A wrong answer costs the turn, not the match: it passes the turn
    /// to the opponent, who gets a freshly drawn question.
    pub fn answer_question(
        &mut self,
        side: Side,
        answer: usize,
    ) -> Result<AnswerOutcome, ActionError> {
        self.require_turn(side)?;
        let question = match (&self.question, self.awaiting_answer) {
            (Some(q), true) => q,
            _ => return Err(ActionError::NoQuestionPending),
        };

        if question.is_correct(answer) {
            self.awaiting_answer = false;
            self.question_deadline = None;
            Ok(AnswerOutcome::Correct)
        } else {
            self.pass_turn();
            Ok(AnswerOutcome::Wrong)
        }
    }

    /// Resolve an expired question deadline as an incorrect answer.
    pub fn expire_question(&mut self) {
        self.pass_turn();
    }

    /// Resolve an expired move deadline as a lost turn.
    pub fn expire_move(&mut self) {
        self.pass_turn();
    }

    /// Place a piece on an empty cell during the placement phase.
    pub fn place_piece(&mut self, side: Side, position: usize) -> Result<PlaceOutcome, ActionError> {
        self.require_turn(side)?;
        if self.awaiting_answer {
            return Err(ActionError::QuestionPending);
        }
        if self.phase != GamePhase::Placement {
            return Err(ActionError::WrongPhase);
        }
        if position >= BOARD_CELLS {
            return Err(ActionError::InvalidPosition);
        }
        if self.board[position].is_some() {
            return Err(ActionError::CellOccupied);
        }
        if self.placed[side.index()] >= PIECES_PER_PLAYER {
            return Err(ActionError::AllPiecesPlaced);
        }

        self.board[position] = Some(side);
        self.placed[side.index()] += 1;
        self.on_board[side.index()] += 1;

        let opponent = side.opponent();
        if check_mill(&self.board, position, side) && self.on_board[opponent.index()] > 0 {
            self.phase = GamePhase::Remove;
            return Ok(PlaceOutcome::MillFormed);
        }

        if self.placement_complete() {
            self.phase = GamePhase::Movement;

            // Removals during placement can leave a player short already
            if self.on_board[Side::Player1.index()] <= 2 {
                return Ok(PlaceOutcome::MatchOver {
                    winner: Side::Player2,
                });
            }
            if self.on_board[Side::Player2.index()] <= 2 {
                return Ok(PlaceOutcome::MatchOver {
                    winner: Side::Player1,
                });
            }
        }

        self.pass_turn();
        Ok(PlaceOutcome::TurnPassed)
    }

    /// Move an own piece during the movement phase.
    pub fn move_piece(
        &mut self,
        side: Side,
        from: usize,
        to: usize,
    ) -> Result<MoveOutcome, ActionError> {
        self.require_turn(side)?;
        if self.awaiting_answer {
            return Err(ActionError::QuestionPending);
        }
        if self.phase != GamePhase::Movement {
            return Err(ActionError::WrongPhase);
        }
        if from >= BOARD_CELLS || to >= BOARD_CELLS {
            return Err(ActionError::InvalidPosition);
        }
        if self.board[from] != Some(side) {
            return Err(ActionError::CellNotYours);
        }

        let can_fly = self.on_board[side.index()] <= FLYING_THRESHOLD;
        if !is_valid_move(from, to, &self.board, can_fly) {
            return Err(ActionError::IllegalMove);
        }

        self.board[to] = Some(side);
        self.board[from] = None;

        let opponent = side.opponent();
        if check_mill(&self.board, to, side) && self.on_board[opponent.index()] > 0 {
            self.phase = GamePhase::Remove;
            return Ok(MoveOutcome::MillFormed);
        }

        if !can_move(&self.board, opponent, self.on_board[opponent.index()]) {
            return Ok(MoveOutcome::MatchOver { winner: side });
        }

        self.pass_turn();
        Ok(MoveOutcome::TurnPassed)
    }

    /// Remove an opposing piece after a mill.
    ///
    /// Any opposing piece is a legal target, mills included.
    pub fn remove_piece(
        &mut self,
        side: Side,
        position: usize,
    ) -> Result<RemoveOutcome, ActionError> {
        self.require_turn(side)?;
        if self.phase != GamePhase::Remove {
            return Err(ActionError::WrongPhase);
        }
        if position >= BOARD_CELLS {
            return Err(ActionError::InvalidPosition);
        }
        let opponent = side.opponent();
        if self.board[position] != Some(opponent) {
            return Err(ActionError::CellNotOpponents);
        }

        self.board[position] = None;
        self.on_board[opponent.index()] -= 1;

        if self.on_board[opponent.index()] <= 2 && self.placement_complete() {
            return Ok(RemoveOutcome::MatchOver { winner: side });
        }

        if self.placement_complete() {
            self.phase = GamePhase::Movement;
            if !can_move(&self.board, opponent, self.on_board[opponent.index()]) {
                return Ok(RemoveOutcome::MatchOver { winner: side });
            }
        } else {
            self.phase = GamePhase::Placement;
        }

        self.pass_turn();
        Ok(RemoveOutcome::TurnPassed)
    }

    /// Full state snapshot for clients.
    pub fn to_json(&self) -> serde_json::Value {
        let board: Vec<u8> = self
            .board
            .iter()
            .map(|cell| cell.map(|side| side.number()).unwrap_or(0))
            .collect();

        let seconds_left = |deadline: &Option<DateTime<Utc>>| {
            deadline.map(|d| (d - Utc::now()).num_seconds().max(0))
        };

        serde_json::json!({
            "match_id": self.match_id,
            "match_type": self.match_type.as_str(),
            "player1": { "id": self.player1_id, "name": self.player1_name },
            "player2": { "id": self.player2_id, "name": self.player2_name },
            "board": board,
            "current_player": self.current.number(),
            "phase": self.phase.as_str(),
            "placed_pieces": { "player1": self.placed[0], "player2": self.placed[1] },
            "pieces_on_board": { "player1": self.on_board[0], "player2": self.on_board[1] },
            "question": self.question.as_ref().map(|q| q.public_json()),
            "awaiting_answer": self.awaiting_answer,
            "question_seconds_left": seconds_left(&self.question_deadline),
            "move_seconds_left": seconds_left(&self.move_deadline),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_question() -> Question {
        Question::new(
            1,
            "2 + 2?",
            "math",
            vec!["4".to_string(), "5".to_string()],
            0,
        )
    }

    fn new_state() -> GameState {
        GameState::new(
            1,
            (10, "alice".to_string()),
            (20, "bob".to_string()),
            MatchType::League,
            Utc::now(),
        )
    }

    /// Post a question and answer it correctly for `side`.
    fn clear_question(state: &mut GameState, side: Side) {
        state.set_question(sample_question(), None);
        assert_eq!(state.answer_question(side, 0), Ok(AnswerOutcome::Correct));
    }

    /// Answer correctly and place, asserting the action is accepted.
    fn place(state: &mut GameState, side: Side, position: usize) -> PlaceOutcome {
        clear_question(state, side);
        state.place_piece(side, position).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = new_state();
        assert_eq!(state.phase, GamePhase::Placement);
        assert_eq!(state.current, Side::Player1);
        assert!(!state.awaiting_answer);
        assert_eq!(state.side_of(10), Some(Side::Player1));
        assert_eq!(state.side_of(99), None);
    }

    #[test]
    fn test_wrong_answer_passes_turn() {
        let mut state = new_state();
        state.set_question(sample_question(), None);

        assert_eq!(
            state.answer_question(Side::Player1, 1),
            Ok(AnswerOutcome::Wrong)
        );
        assert_eq!(state.current, Side::Player2);
        assert!(state.awaiting_answer);
        assert!(state.question.is_none());
    }

    #[test]
    fn test_answer_rejections() {
        let mut state = new_state();

        // Nothing posted yet
        assert_eq!(
            state.answer_question(Side::Player1, 0),
            Err(ActionError::NoQuestionPending)
        );

        state.set_question(sample_question(), None);
        assert_eq!(
            state.answer_question(Side::Player2, 0),
            Err(ActionError::NotYourTurn)
        );
    }

    #[test]
    fn test_place_requires_answer_first() {
        let mut state = new_state();
        state.set_question(sample_question(), None);

        assert_eq!(
            state.place_piece(Side::Player1, 0),
            Err(ActionError::QuestionPending)
        );
    }

    #[test]
    fn test_place_switches_turn_and_counts() {
        let mut state = new_state();

        assert_eq!(place(&mut state, Side::Player1, 0), PlaceOutcome::TurnPassed);
        assert_eq!(state.current, Side::Player2);
        assert!(state.awaiting_answer);
        assert_eq!(state.placed(Side::Player1), 1);
        assert_eq!(state.pieces_on_board(Side::Player1), 1);
        assert_eq!(state.board[0], Some(Side::Player1));
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut state = new_state();
        place(&mut state, Side::Player1, 0);

        clear_question(&mut state, Side::Player2);
        assert_eq!(
            state.place_piece(Side::Player2, 0),
            Err(ActionError::CellOccupied)
        );
        // Rejection left the pending state untouched
        assert_eq!(state.current, Side::Player2);
        assert_eq!(state.placed(Side::Player2), 0);
    }

    #[test]
    fn test_placement_mill_enters_remove_without_turn_switch() {
        let mut state = new_state();

        place(&mut state, Side::Player1, 0);
        place(&mut state, Side::Player2, 8);
        place(&mut state, Side::Player1, 1);
        place(&mut state, Side::Player2, 10);

        // Third piece completes the 0-1-2 line
        assert_eq!(place(&mut state, Side::Player1, 2), PlaceOutcome::MillFormed);
        assert_eq!(state.phase, GamePhase::Remove);
        assert_eq!(state.current, Side::Player1);
        assert!(!state.awaiting_answer);

        // Removal switches the turn and drops back to placement
        assert_eq!(
            state.remove_piece(Side::Player1, 8),
            Ok(RemoveOutcome::TurnPassed)
        );
        assert_eq!(state.phase, GamePhase::Placement);
        assert_eq!(state.current, Side::Player2);
        assert!(state.awaiting_answer);
        assert_eq!(state.pieces_on_board(Side::Player2), 1);
        assert_eq!(state.board[8], None);
    }

    #[test]
    fn test_remove_rejects_bad_targets() {
        let mut state = new_state();

        place(&mut state, Side::Player1, 0);
        place(&mut state, Side::Player2, 8);
        place(&mut state, Side::Player1, 1);
        place(&mut state, Side::Player2, 10);
        place(&mut state, Side::Player1, 2);

        // Own piece
        assert_eq!(
            state.remove_piece(Side::Player1, 0),
            Err(ActionError::CellNotOpponents)
        );
        // Empty cell
        assert_eq!(
            state.remove_piece(Side::Player1, 23),
            Err(ActionError::CellNotOpponents)
        );
        // Out of turn
        assert_eq!(
            state.remove_piece(Side::Player2, 0),
            Err(ActionError::NotYourTurn)
        );
    }

    /// Mill-free placement sequences for both players.
    const P1_SPOTS: [usize; 9] = [0, 2, 5, 7, 8, 10, 13, 15, 16];
    const P2_SPOTS: [usize; 9] = [1, 3, 4, 6, 9, 11, 12, 14, 18];

    fn place_all(state: &mut GameState) {
        for i in 0..9 {
            assert_eq!(
                place(state, Side::Player1, P1_SPOTS[i]),
                PlaceOutcome::TurnPassed
            );
            let outcome = place(state, Side::Player2, P2_SPOTS[i]);
            if i < 8 {
                assert_eq!(outcome, PlaceOutcome::TurnPassed);
            }
        }
    }

    #[test]
    fn test_placement_completion_enters_movement() {
        let mut state = new_state();
        place_all(&mut state);

        assert_eq!(state.phase, GamePhase::Movement);
        assert_eq!(state.placed(Side::Player1), 9);
        assert_eq!(state.placed(Side::Player2), 9);
        assert_eq!(state.pieces_on_board(Side::Player1), 9);
        assert_eq!(state.pieces_on_board(Side::Player2), 9);
        assert_eq!(state.current, Side::Player1);

        // Occupancy matches the placement counters
        let occupied = state.board.iter().filter(|c| c.is_some()).count();
        assert_eq!(occupied, 18);

        // No further placement is accepted
        clear_question(&mut state, Side::Player1);
        assert_eq!(
            state.place_piece(Side::Player1, 17),
            Err(ActionError::WrongPhase)
        );
    }

    #[test]
    fn test_movement_basic() {
        let mut state = new_state();
        place_all(&mut state);

        // 16 -> 17 is adjacent and empty
        clear_question(&mut state, Side::Player1);
        assert_eq!(
            state.move_piece(Side::Player1, 16, 17),
            Ok(MoveOutcome::TurnPassed)
        );
        assert_eq!(state.board[16], None);
        assert_eq!(state.board[17], Some(Side::Player1));
        assert_eq!(state.current, Side::Player2);
    }

    #[test]
    fn test_movement_rejections() {
        let mut state = new_state();
        place_all(&mut state);
        clear_question(&mut state, Side::Player1);

        // Source not owned
        assert_eq!(
            state.move_piece(Side::Player1, 1, 17),
            Err(ActionError::CellNotYours)
        );
        // Not adjacent, no flying at nine pieces
        assert_eq!(
            state.move_piece(Side::Player1, 16, 20),
            Err(ActionError::IllegalMove)
        );
        // Occupied target
        assert_eq!(
            state.move_piece(Side::Player1, 0, 1),
            Err(ActionError::IllegalMove)
        );
    }

    #[test]
    fn test_flying_ignores_adjacency() {
        let mut state = new_state();
        state.phase = GamePhase::Movement;
        state.placed = [9, 9];
        state.on_board = [3, 4];
        state.board[0] = Some(Side::Player1);
        state.board[2] = Some(Side::Player1);
        state.board[5] = Some(Side::Player1);
        state.board[9] = Some(Side::Player2);
        state.board[11] = Some(Side::Player2);
        state.board[12] = Some(Side::Player2);
        state.board[14] = Some(Side::Player2);

        // 0 -> 23 is nowhere near adjacent
        assert_eq!(
            state.move_piece(Side::Player1, 0, 23),
            Ok(MoveOutcome::TurnPassed)
        );
    }

    #[test]
    fn test_immobile_opponent_ends_match() {
        let mut state = new_state();
        state.phase = GamePhase::Movement;
        state.placed = [9, 9];
        state.on_board = [5, 4];
        // Player 2 boxed into the corners, player 1 holding the exits
        for pos in [0, 2, 5, 7] {
            state.board[pos] = Some(Side::Player2);
        }
        for pos in [1, 3, 4, 6, 9] {
            state.board[pos] = Some(Side::Player1);
        }

        assert_eq!(
            state.move_piece(Side::Player1, 9, 8),
            Ok(MoveOutcome::MatchOver {
                winner: Side::Player1
            })
        );
    }

    #[test]
    fn test_remove_to_two_pieces_ends_match() {
        let mut state = new_state();
        state.phase = GamePhase::Remove;
        state.placed = [9, 9];
        state.on_board = [5, 3];
        for pos in [0, 2, 5, 7, 9] {
            state.board[pos] = Some(Side::Player1);
        }
        for pos in [16, 18, 21] {
            state.board[pos] = Some(Side::Player2);
        }

        assert_eq!(
            state.remove_piece(Side::Player1, 16),
            Ok(RemoveOutcome::MatchOver {
                winner: Side::Player1
            })
        );
    }

    #[test]
    fn test_remove_during_placement_does_not_end_match() {
        // Two pieces left is only fatal once both players placed nine
        let mut state = new_state();
        state.phase = GamePhase::Remove;
        state.placed = [3, 3];
        state.on_board = [3, 3];
        for pos in [0, 1, 2] {
            state.board[pos] = Some(Side::Player1);
        }
        for pos in [8, 10, 13] {
            state.board[pos] = Some(Side::Player2);
        }

        assert_eq!(
            state.remove_piece(Side::Player1, 8),
            Ok(RemoveOutcome::TurnPassed)
        );
        assert_eq!(state.phase, GamePhase::Placement);
        assert_eq!(state.pieces_on_board(Side::Player2), 2);
    }

    #[test]
    fn test_mill_piece_is_not_protected() {
        let mut state = new_state();
        state.phase = GamePhase::Remove;
        state.placed = [5, 5];
        state.on_board = [5, 5];
        // Player 2 holds the standing mill 1-9-17
        for pos in [1, 9, 17, 21, 23] {
            state.board[pos] = Some(Side::Player2);
        }
        for pos in [0, 2, 5, 7, 3] {
            state.board[pos] = Some(Side::Player1);
        }

        assert_eq!(
            state.remove_piece(Side::Player1, 9),
            Ok(RemoveOutcome::TurnPassed)
        );
        assert_eq!(state.board[9], None);
    }

    #[test]
    fn test_movement_mill_enters_remove() {
        let mut state = new_state();
        state.phase = GamePhase::Movement;
        state.placed = [9, 9];
        state.on_board = [4, 4];
        // Moving 4 -> 7 completes 5-6-7
        for pos in [4, 5, 6, 16] {
            state.board[pos] = Some(Side::Player1);
        }
        for pos in [8, 10, 13, 15] {
            state.board[pos] = Some(Side::Player2);
        }

        assert_eq!(
            state.move_piece(Side::Player1, 4, 7),
            Ok(MoveOutcome::MillFormed)
        );
        assert_eq!(state.phase, GamePhase::Remove);
        assert_eq!(state.current, Side::Player1);
        assert!(!state.awaiting_answer);
    }

    #[test]
    fn test_expire_question_passes_turn() {
        let mut state = new_state();
        state.set_question(sample_question(), None);

        state.expire_question();
        assert_eq!(state.current, Side::Player2);
        assert!(state.awaiting_answer);
        assert!(state.question.is_none());
    }

    #[test]
    fn test_to_json_snapshot() {
        let mut state = new_state();
        place(&mut state, Side::Player1, 0);
        state.set_question(sample_question(), None);

        let json = state.to_json();
        assert_eq!(json["match_id"], 1);
        assert_eq!(json["board"][0], 1);
        assert_eq!(json["current_player"], 2);
        assert_eq!(json["phase"], "placement");
        assert_eq!(json["placed_pieces"]["player1"], 1);
        assert_eq!(json["awaiting_answer"], true);
        // The question is present but its correct index stays server-side
        assert_eq!(json["question"]["id"], 1);
        assert!(json["question"].get("correct").is_none());
    }
}
