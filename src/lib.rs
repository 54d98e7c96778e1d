//! Nine Stones Tournament Core
//!
//! This crate is the authoritative core of the Nine Stones online
//! tournament server: a scheduled tournament of a two player board
//! game where every board action is gated by a trivia question.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **Board rules** - Mill detection, adjacency and move legality as
//!   pure functions over constant tables.
//!
//! - **Match sessions** - A per-match state machine (placement,
//!   movement, remove) with the quiz gate, held in a store with expiry.
//!
//! - **Matchmaking** - A FIFO queue pairing the two longest-waiting
//!   eligible players, at most once per pair per day.
//!
//! - **Rewards** - Point/averaj settlement per match plus daily
//!   completion streak bonuses.
//!
//! - **Scheduling** - Day-of-week tournament phases with time-of-day
//!   join windows for elimination rounds.
//!
//! - **The hub** - A single-owner actor task that routes player
//!   actions, enforces turn deadlines, sweeps inactive players and
//!   pushes state to both participants.
//!
//! # Design Principles
//!
//! 1. **Single owner, no locks** - One hub task owns the queue, the
//!    sessions and presence; commands arrive over a channel, so match
//!    transitions and dequeue-and-pair are serialized by construction.
//!
//! 2. **Pure transitions** - Game rules mutate a `GameState` and
//!    return an outcome; rejected actions leave state untouched.
//!
//! 3. **No networking** - The transport layer lives outside this
//!    crate and talks to the hub through `HubHandle` and per-connection
//!    event channels.
//!
//! 4. **Injectable time** - Scheduling and deadlines read a `Clock`
//!    trait, so day and window gating is deterministic under test.
//!
//! # Example
//!
//! ```rust
//! use ninestones_core::state::{check_mill, Side};
//!
//! let mut board = [None; 24];
//! board[0] = Some(Side::Player1);
//! board[1] = Some(Side::Player1);
//! board[2] = Some(Side::Player1);
//!
//! // The third piece on the 0-1-2 line forms a mill
//! assert!(check_mill(&board, 2, Side::Player1));
//! ```
//!
//! Spinning up the hub:
//!
//! ```rust,ignore
//! use ninestones_core::hub::GameHub;
//! use ninestones_core::records::{Directory, QuestionBank, Settings};
//! use ninestones_core::schedule::SystemClock;
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let (handle, task) = GameHub::spawn(
//!     directory,
//!     questions,
//!     Settings::default(),
//!     Box::new(SystemClock),
//!     cancel.clone(),
//! );
//!
//! // The websocket layer registers connections and forwards actions
//! handle.connect(player_id, conn).await;
//! let reply = handle.join_matchmaking(player_id).await;
//! ```

pub mod events;
pub mod hub;
pub mod records;
pub mod rewards;
pub mod schedule;
pub mod state;
