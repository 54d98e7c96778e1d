//! In-memory game state for the Nine Stones server.
//!
//! This module provides the core state types and managers:
//!
//! - `board` - Board rules (mills, adjacency, move legality)
//! - `session` - Per-match game state and phase transitions
//! - `store` - Live match sessions with expiry
//! - `queue` - FIFO matchmaking membership
//! - `presence` - Connection handles and last-activity tracking
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         GameHub (actor)                      │
//! │                                                              │
//! │  ┌───────────────┐  ┌───────────────┐  ┌─────────────────┐  │
//! │  │  MatchQueue   │  │ SessionStore  │  │ PresenceManager │  │
//! │  │               │  │               │  │                 │  │
//! │  │ waiting       │  │ match_id →    │  │ player_id →     │  │
//! │  │ players, in   │  │   GameState   │  │   conn handle,  │  │
//! │  │ join order    │  │   (24h TTL)   │  │   last active   │  │
//! │  └───────────────┘  └───────┬───────┘  └─────────────────┘  │
//! │                             │                               │
//! │                     board rules (pure)                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and single-owner: the hub task holds
//! the managers exclusively, which is what serializes concurrent match
//! actions and the dequeue-and-pair step without any locks.

pub mod board;
pub mod presence;
pub mod queue;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use board::{can_move, check_mill, is_valid_move, Board, Side, MILL_LINES, NEIGHBORS};
pub use presence::PresenceManager;
pub use queue::{MatchQueue, QueueEntry};
pub use session::{
    ActionError, AnswerOutcome, GamePhase, GameState, MoveOutcome, PlaceOutcome, RemoveOutcome,
};
pub use store::{SessionStore, SESSION_TTL_HOURS};
