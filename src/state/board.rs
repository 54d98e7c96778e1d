//! Board rules for Nine Stones.
//!
//! Pure functions over the 24-cell board: mill detection, adjacency and
//! move legality. The mill and adjacency tables are fixed constants, so
//! nothing in this module holds state of its own.
//!
//! # Board Layout
//!
//! ```text
//! 0-----------1-----------2
//! |           |           |
//! |   8-------9------10   |
//! |   |       |       |   |
//! |   |   16--17--18  |   |
//! 3---11--19      20--12--4
//! |   |   21--22--23  |   |
//! |   |       |       |   |
//! |   13------14-----15   |
//! |           |           |
//! 5-----------6-----------7
//! ```

use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const BOARD_CELLS: usize = 24;

/// Pieces each player places during the placement phase.
pub const PIECES_PER_PLAYER: u8 = 9;

/// A player may fly (move anywhere) at or below this many pieces on board.
pub const FLYING_THRESHOLD: u8 = 3;

/// One of the two players in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    /// The other player.
    pub fn opponent(&self) -> Side {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    /// Index for per-side arrays (0 or 1).
    pub fn index(&self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }

    /// Player number as shown to clients (1 or 2).
    pub fn number(&self) -> u8 {
        match self {
            Self::Player1 => 1,
            Self::Player2 => 2,
        }
    }
}

/// The board: each cell is empty or held by one side.
pub type Board = [Option<Side>; BOARD_CELLS];

/// The 16 mill lines. Three own pieces on one line form a mill.
pub const MILL_LINES: [[usize; 3]; 16] = [
    [0, 1, 2],
    [5, 6, 7],
    [0, 3, 5],
    [2, 4, 7],
    [8, 9, 10],
    [13, 14, 15],
    [8, 11, 13],
    [10, 12, 15],
    [16, 17, 18],
    [21, 22, 23],
    [16, 19, 21],
    [18, 20, 23],
    [1, 9, 17],
    [6, 14, 22],
    [3, 11, 19],
    [4, 12, 20],
];

/// Physical adjacency per cell (2 to 4 neighbors each).
pub const NEIGHBORS: [&[usize]; BOARD_CELLS] = [
    &[1, 3],
    &[0, 2, 9],
    &[1, 4],
    &[0, 5, 11],
    &[2, 7, 12],
    &[3, 6],
    &[5, 7, 14],
    &[4, 6],
    &[9, 11],
    &[1, 8, 10, 17],
    &[9, 12],
    &[3, 8, 13, 19],
    &[4, 10, 15, 20],
    &[11, 14],
    &[6, 13, 15, 22],
    &[12, 14],
    &[17, 19],
    &[9, 16, 18],
    &[17, 20],
    &[11, 16, 21],
    &[12, 18, 23],
    &[19, 22],
    &[14, 21, 23],
    &[20, 22],
];

/// Check whether `position` completes a mill for `side`.
pub fn check_mill(board: &Board, position: usize, side: Side) -> bool {
    MILL_LINES
        .iter()
        .filter(|line| line.contains(&position))
        .any(|line| line.iter().all(|&p| board[p] == Some(side)))
}

/// Check whether moving from `from` to `to` is legal.
///
/// An occupied target is never legal. A flying player may reach any
/// empty cell; otherwise the target must be adjacent to the source.
pub fn is_valid_move(from: usize, to: usize, board: &Board, can_fly: bool) -> bool {
    if board[to].is_some() {
        return false;
    }
    if can_fly {
        return true;
    }
    NEIGHBORS[from].contains(&to)
}

/// Check whether `side` has any legal move left.
///
/// A flying player can always move. Otherwise at least one of the
/// player's pieces must have an empty neighbor.
pub fn can_move(board: &Board, side: Side, pieces_on_board: u8) -> bool {
    if pieces_on_board <= FLYING_THRESHOLD {
        return true;
    }

    board
        .iter()
        .enumerate()
        .filter(|(_, cell)| **cell == Some(side))
        .any(|(pos, _)| NEIGHBORS[pos].iter().any(|&n| board[n].is_none()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board() -> Board {
        [None; BOARD_CELLS]
    }

    #[test]
    fn test_every_cell_in_a_mill_line() {
        for pos in 0..BOARD_CELLS {
            assert!(
                MILL_LINES.iter().any(|line| line.contains(&pos)),
                "cell {} is in no mill line",
                pos
            );
        }
    }

    #[test]
    fn test_adjacency_symmetric() {
        for (pos, neighbors) in NEIGHBORS.iter().enumerate() {
            assert!(
                (2..=4).contains(&neighbors.len()),
                "cell {} has {} neighbors",
                pos,
                neighbors.len()
            );
            for &n in *neighbors {
                assert!(
                    NEIGHBORS[n].contains(&pos),
                    "adjacency {} -> {} is not symmetric",
                    pos,
                    n
                );
            }
        }
    }

    #[test]
    fn test_check_mill() {
        let mut board = empty_board();
        board[0] = Some(Side::Player1);
        board[1] = Some(Side::Player1);

        assert!(!check_mill(&board, 1, Side::Player1));

        board[2] = Some(Side::Player1);
        assert!(check_mill(&board, 0, Side::Player1));
        assert!(check_mill(&board, 1, Side::Player1));
        assert!(check_mill(&board, 2, Side::Player1));

        // Same line, wrong owner
        assert!(!check_mill(&board, 2, Side::Player2));

        // Mixed line is no mill
        board[1] = Some(Side::Player2);
        assert!(!check_mill(&board, 2, Side::Player1));
    }

    #[test]
    fn test_check_mill_only_lines_through_position() {
        let mut board = empty_board();
        board[0] = Some(Side::Player1);
        board[1] = Some(Side::Player1);
        board[2] = Some(Side::Player1);

        // A mill elsewhere does not light up an unrelated cell
        assert!(!check_mill(&board, 7, Side::Player1));
    }

    #[test]
    fn test_is_valid_move() {
        let mut board = empty_board();

        // Adjacent and empty
        assert!(is_valid_move(0, 1, &board, false));

        // Not adjacent
        assert!(!is_valid_move(0, 2, &board, false));

        // Flying ignores adjacency
        assert!(is_valid_move(0, 23, &board, true));

        // Occupied target is illegal even when flying
        board[1] = Some(Side::Player2);
        assert!(!is_valid_move(0, 1, &board, false));
        assert!(!is_valid_move(0, 1, &board, true));
    }

    #[test]
    fn test_can_move_flying() {
        // Fully boxed in, but at the flying threshold
        let board = empty_board();
        assert!(can_move(&board, Side::Player1, FLYING_THRESHOLD));
    }

    #[test]
    fn test_can_move_blocked() {
        let mut board = empty_board();

        // Corner 0 with both neighbors taken by the opponent
        board[0] = Some(Side::Player1);
        board[1] = Some(Side::Player2);
        board[3] = Some(Side::Player2);
        assert!(!can_move(&board, Side::Player1, 4));

        // Free one neighbor
        board[3] = None;
        assert!(can_move(&board, Side::Player1, 4));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player1.opponent(), Side::Player2);
        assert_eq!(Side::Player2.opponent(), Side::Player1);
        assert_eq!(Side::Player1.number(), 1);
        assert_eq!(Side::Player2.number(), 2);
    }
}
