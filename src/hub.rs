//! Match orchestrator.
//!
//! The hub is the single owner of all live state: the matchmaking
//! queue, the session store, presence and the persistent directory. It
//! runs as one task fed by a command channel; every player action,
//! connection event and sweep tick is serialized through that task,
//! which makes the dequeue-and-pair step and every per-match state
//! transition mutually exclusive without locks.
//!
//! Two periodic arms run inside the same loop: a one second tick that
//! enforces question/move deadlines (an expired deadline resolves the
//! turn like a wrong answer, so matches always make progress), and a
//! sixty second sweep that force-disconnects inactive players and
//! purges expired sessions. Sweep failures are logged and the loop
//! keeps going; a cancellation token stops the whole task cooperatively.

use chrono::{Datelike, Duration};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::events::{ConnSender, ServerEvent};
use crate::records::{Directory, MatchType, Question, QuestionBank, Settings};
use crate::rewards;
use crate::schedule::{self, Clock};
use crate::state::board::Side;
use crate::state::session::{AnswerOutcome, GameState, MoveOutcome, PlaceOutcome, RemoveOutcome};
use crate::state::{MatchQueue, PresenceManager, SessionStore};

/// Command channel depth.
const COMMAND_BUFFER: usize = 256;

/// Seconds between deadline checks.
const DEADLINE_TICK_SECS: u64 = 1;

/// Seconds between inactivity sweeps.
const SWEEP_INTERVAL_SECS: u64 = 60;

/// Reply to a matchmaking join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReply {
    pub success: bool,
    pub message: String,
    pub queue_count: usize,
}

impl JoinReply {
    fn failure(message: &str, queue_count: usize) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            queue_count,
        }
    }
}

/// Reply to a game action. Rejection reasons stay server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionReply {
    pub success: bool,
}

/// Commands the transport layer feeds into the hub.
#[derive(Debug)]
pub enum HubCommand {
    Connect {
        player_id: i64,
        conn: ConnSender,
    },
    Disconnect {
        player_id: i64,
        conn: ConnSender,
    },
    Heartbeat {
        player_id: i64,
    },
    JoinMatchmaking {
        player_id: i64,
        reply: oneshot::Sender<JoinReply>,
    },
    LeaveQueue {
        player_id: i64,
    },
    AnswerQuestion {
        player_id: i64,
        match_id: i64,
        answer: usize,
        reply: oneshot::Sender<ActionReply>,
    },
    PlacePiece {
        player_id: i64,
        match_id: i64,
        position: usize,
        reply: oneshot::Sender<ActionReply>,
    },
    MovePiece {
        player_id: i64,
        match_id: i64,
        from: usize,
        to: usize,
        reply: oneshot::Sender<ActionReply>,
    },
    RemovePiece {
        player_id: i64,
        match_id: i64,
        position: usize,
        reply: oneshot::Sender<ActionReply>,
    },
    /// Resync query: the full authoritative state for a reconnecting
    /// participant.
    FetchState {
        player_id: i64,
        match_id: i64,
        reply: oneshot::Sender<Option<serde_json::Value>>,
    },
}

/// Cloneable async API over the hub's command channel.
#[derive(Debug, Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    async fn send(&self, command: HubCommand) {
        let _ = self.tx.send(command).await;
    }

    pub async fn connect(&self, player_id: i64, conn: ConnSender) {
        self.send(HubCommand::Connect { player_id, conn }).await;
    }

    pub async fn disconnect(&self, player_id: i64, conn: ConnSender) {
        self.send(HubCommand::Disconnect { player_id, conn }).await;
    }

    pub async fn heartbeat(&self, player_id: i64) {
        self.send(HubCommand::Heartbeat { player_id }).await;
    }

    pub async fn join_matchmaking(&self, player_id: i64) -> JoinReply {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::JoinMatchmaking { player_id, reply })
            .await;
        rx.await
            .unwrap_or_else(|_| JoinReply::failure("Service unavailable", 0))
    }

    pub async fn leave_queue(&self, player_id: i64) {
        self.send(HubCommand::LeaveQueue { player_id }).await;
    }

    pub async fn answer_question(&self, player_id: i64, match_id: i64, answer: usize) -> ActionReply {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::AnswerQuestion {
            player_id,
            match_id,
            answer,
            reply,
        })
        .await;
        rx.await.unwrap_or(ActionReply { success: false })
    }

    pub async fn place_piece(&self, player_id: i64, match_id: i64, position: usize) -> ActionReply {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::PlacePiece {
            player_id,
            match_id,
            position,
            reply,
        })
        .await;
        rx.await.unwrap_or(ActionReply { success: false })
    }

    pub async fn move_piece(
        &self,
        player_id: i64,
        match_id: i64,
        from: usize,
        to: usize,
    ) -> ActionReply {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::MovePiece {
            player_id,
            match_id,
            from,
            to,
            reply,
        })
        .await;
        rx.await.unwrap_or(ActionReply { success: false })
    }

    pub async fn remove_piece(&self, player_id: i64, match_id: i64, position: usize) -> ActionReply {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::RemovePiece {
            player_id,
            match_id,
            position,
            reply,
        })
        .await;
        rx.await.unwrap_or(ActionReply { success: false })
    }

    pub async fn fetch_state(&self, player_id: i64, match_id: i64) -> Option<serde_json::Value> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::FetchState {
            player_id,
            match_id,
            reply,
        })
        .await;
        rx.await.ok().flatten()
    }
}

/// The orchestrator task state.
pub struct GameHub {
    directory: Directory,
    questions: QuestionBank,
    settings: Settings,
    clock: Box<dyn Clock>,
    rng: StdRng,
    sessions: SessionStore,
    queue: MatchQueue,
    presence: PresenceManager,
    rx: mpsc::Receiver<HubCommand>,
    cancel: CancellationToken,
}

impl GameHub {
    pub fn new(
        directory: Directory,
        questions: QuestionBank,
        settings: Settings,
        clock: Box<dyn Clock>,
        cancel: CancellationToken,
    ) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let hub = Self {
            directory,
            questions,
            settings,
            clock,
            rng: StdRng::from_entropy(),
            sessions: SessionStore::new(),
            queue: MatchQueue::new(),
            presence: PresenceManager::new(),
            rx,
            cancel,
        };
        (hub, HubHandle { tx })
    }

    /// Create a hub and run it on its own task.
    pub fn spawn(
        directory: Directory,
        questions: QuestionBank,
        settings: Settings,
        clock: Box<dyn Clock>,
        cancel: CancellationToken,
    ) -> (HubHandle, tokio::task::JoinHandle<()>) {
        let (hub, handle) = Self::new(directory, questions, settings, clock, cancel);
        (handle, tokio::spawn(hub.run()))
    }

    /// Single-owner command loop with the periodic arms.
    pub async fn run(mut self) {
        let mut deadline_tick =
            tokio::time::interval(std::time::Duration::from_secs(DEADLINE_TICK_SECS));
        let mut sweep_tick =
            tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        info!("game hub started");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("game hub stopping");
                    break;
                }
                command = self.rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = deadline_tick.tick() => self.enforce_deadlines(),
                _ = sweep_tick.tick() => self.sweep(),
            }
        }
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Connect { player_id, conn } => self.handle_connect(player_id, conn),
            HubCommand::Disconnect { player_id, conn } => self.handle_disconnect(player_id, &conn),
            HubCommand::Heartbeat { player_id } => {
                let now = self.clock.now();
                self.presence.touch(player_id, now);
            }
            HubCommand::JoinMatchmaking { player_id, reply } => {
                let result = self.handle_join(player_id);
                let _ = reply.send(result);
            }
            HubCommand::LeaveQueue { player_id } => self.handle_leave_queue(player_id),
            HubCommand::AnswerQuestion {
                player_id,
                match_id,
                answer,
                reply,
            } => {
                let success = self.handle_answer(player_id, match_id, answer);
                let _ = reply.send(ActionReply { success });
            }
            HubCommand::PlacePiece {
                player_id,
                match_id,
                position,
                reply,
            } => {
                let success = self.handle_place(player_id, match_id, position);
                let _ = reply.send(ActionReply { success });
            }
            HubCommand::MovePiece {
                player_id,
                match_id,
                from,
                to,
                reply,
            } => {
                let success = self.handle_move(player_id, match_id, from, to);
                let _ = reply.send(ActionReply { success });
            }
            HubCommand::RemovePiece {
                player_id,
                match_id,
                position,
                reply,
            } => {
                let success = self.handle_remove(player_id, match_id, position);
                let _ = reply.send(ActionReply { success });
            }
            HubCommand::FetchState {
                player_id,
                match_id,
                reply,
            } => {
                let snapshot = self
                    .sessions
                    .get(match_id)
                    .filter(|state| state.side_of(player_id).is_some())
                    .map(|state| state.to_json());
                let _ = reply.send(snapshot);
            }
        }
    }

    fn push(conn: &ConnSender, event: ServerEvent) {
        // Fire and forget: a closed connection just drops the event
        let _ = conn.send(event);
    }

    fn push_to_player(&self, player_id: i64, event: ServerEvent) {
        if let Some(conn) = self.presence.conn(player_id) {
            Self::push(conn, event);
        }
    }

    fn push_to_match(&self, state: &GameState, event: ServerEvent) {
        self.push_to_player(state.player1_id, event.clone());
        self.push_to_player(state.player2_id, event);
    }

    fn broadcast(&self, event: ServerEvent) {
        for (_, conn) in self.presence.connections() {
            Self::push(conn, event.clone());
        }
    }

    fn broadcast_queue_count(&self) {
        self.broadcast(ServerEvent::QueueUpdate {
            count: self.queue.len(),
        });
    }

    fn draw_question(&mut self) -> Option<Question> {
        self.questions.draw(&mut self.rng).cloned()
    }

    /// Draw and post a question for the current player.
    fn issue_question(&mut self, state: &mut GameState) {
        match self.draw_question() {
            Some(question) => {
                let deadline = self.clock.now() + Duration::seconds(self.settings.question_time_secs);
                state.set_question(question, Some(deadline));
            }
            None => {
                // Configuration error: the match cannot progress
                error!(match_id = state.match_id, "no active questions to draw");
            }
        }
    }

    fn handle_connect(&mut self, player_id: i64, conn: ConnSender) {
        let now = self.clock.now();
        if let Some(displaced) = self.presence.register(player_id, conn, now) {
            info!(player_id, "connection replaced by a new login");
            Self::push(
                &displaced,
                ServerEvent::ForceDisconnect {
                    reason: "Signed in from another device".to_string(),
                },
            );
            // Losing the old session mid-match counts as quitting
            self.forfeit_active_match(player_id);
        }
    }

    fn handle_disconnect(&mut self, player_id: i64, conn: &ConnSender) {
        if !self.presence.clear_if(player_id, conn) {
            // A stale socket closing after a re-login; nothing to do
            return;
        }
        if self.queue.dequeue(player_id).is_some() {
            self.broadcast_queue_count();
        }
        self.forfeit_active_match(player_id);
    }

    fn handle_leave_queue(&mut self, player_id: i64) {
        if self.queue.dequeue(player_id).is_some() {
            self.broadcast_queue_count();
        }
    }

    fn handle_join(&mut self, player_id: i64) -> JoinReply {
        let now = self.clock.now();
        let today = now.date_naive();

        let conn = match self.presence.conn(player_id) {
            Some(conn) => conn.clone(),
            None => return JoinReply::failure("Not connected", self.queue.len()),
        };
        let blacklisted = match self.directory.player(player_id) {
            Some(profile) => profile.blacklisted,
            None => return JoinReply::failure("Unknown player", self.queue.len()),
        };
        if blacklisted {
            return JoinReply::failure("Not allowed to play", self.queue.len());
        }
        if !self.directory.can_play_today(player_id, today, &self.settings) {
            return JoinReply::failure("Daily match limit reached", self.queue.len());
        }

        let match_type = schedule::match_type_for(now.weekday());
        if match_type.is_elimination()
            && !schedule::is_join_window_open(match_type, now.time(), &self.settings)
        {
            return JoinReply::failure("Outside the elimination match window", self.queue.len());
        }

        self.presence.touch(player_id, now);
        self.queue.enqueue(player_id, conn);
        self.broadcast_queue_count();
        self.try_pair(match_type);

        JoinReply {
            success: true,
            message: "Added to queue".to_string(),
            queue_count: self.queue.len(),
        }
    }

    /// Pair the two longest-waiting players if they are eligible.
    ///
    /// An ineligible front pair stays queued; the next join triggers
    /// another attempt. There is no skip-ahead pairing.
    fn try_pair(&mut self, match_type: MatchType) {
        let now = self.clock.now();
        let today = now.date_naive();
        let (week, year) = schedule::week_number(today);

        let (a, b) = match self.queue.front_pair() {
            Some((first, second)) => (first.player_id, second.player_id),
            None => return,
        };
        if self.directory.has_played_today(a, b, today) {
            debug!(a, b, "front pair already met today, waiting");
            return;
        }
        let question = match self.draw_question() {
            Some(question) => question,
            None => {
                error!("no active questions, pairing skipped");
                return;
            }
        };

        let match_id = match self
            .directory
            .create_match(a, b, match_type, now, week, year)
        {
            Ok(record) => record.id,
            Err(err) => {
                error!(%err, "failed to create match record");
                return;
            }
        };
        let (entry_a, entry_b) = match self.queue.take_pair(a, b) {
            Some(pair) => pair,
            None => return,
        };

        let name_a = self.directory.username(a).unwrap_or_default().to_string();
        let name_b = self.directory.username(b).unwrap_or_default().to_string();
        let mut state = GameState::new(match_id, (a, name_a), (b, name_b), match_type, now);
        let deadline = now + Duration::seconds(self.settings.question_time_secs);
        state.set_question(question, Some(deadline));

        let snapshot = state.to_json();
        Self::push(
            &entry_a.conn,
            ServerEvent::MatchFound {
                state: snapshot.clone(),
            },
        );
        Self::push(&entry_b.conn, ServerEvent::MatchFound { state: snapshot });

        self.sessions.put(state, now);
        self.broadcast_queue_count();
        info!(match_id, a, b, kind = match_type.as_str(), "match created");
    }

    /// Pull a session for a participant's action, or reject.
    fn take_session(&mut self, player_id: i64, match_id: i64) -> Option<(GameState, Side)> {
        let state = self.sessions.delete(match_id)?;
        match state.side_of(player_id) {
            Some(side) => Some((state, side)),
            None => {
                let now = self.clock.now();
                self.sessions.put(state, now);
                None
            }
        }
    }

    fn handle_answer(&mut self, player_id: i64, match_id: i64, answer: usize) -> bool {
        let now = self.clock.now();
        self.presence.touch(player_id, now);

        let (mut state, side) = match self.take_session(player_id, match_id) {
            Some(found) => found,
            None => return false,
        };
        match state.answer_question(side, answer) {
            Ok(AnswerOutcome::Correct) => {
                state.move_deadline = Some(now + Duration::seconds(self.settings.move_time_secs));
                let snapshot = state.to_json();
                self.push_to_match(
                    &state,
                    ServerEvent::QuestionAnswered {
                        correct: true,
                        state: snapshot,
                    },
                );
                self.sessions.put(state, now);
                true
            }
            Ok(AnswerOutcome::Wrong) => {
                // The turn moved on; the opponent gets a fresh question
                self.issue_question(&mut state);
                let snapshot = state.to_json();
                self.push_to_match(
                    &state,
                    ServerEvent::QuestionAnswered {
                        correct: false,
                        state: snapshot,
                    },
                );
                self.sessions.put(state, now);
                true
            }
            Err(err) => {
                debug!(player_id, match_id, %err, "answer rejected");
                self.sessions.put(state, now);
                false
            }
        }
    }

    fn handle_place(&mut self, player_id: i64, match_id: i64, position: usize) -> bool {
        let now = self.clock.now();
        self.presence.touch(player_id, now);

        let (mut state, side) = match self.take_session(player_id, match_id) {
            Some(found) => found,
            None => return false,
        };
        match state.place_piece(side, position) {
            Ok(PlaceOutcome::MillFormed) => {
                let snapshot = state.to_json();
                self.push_to_match(&state, ServerEvent::PiecePlaced { state: snapshot });
                self.sessions.put(state, now);
                true
            }
            Ok(PlaceOutcome::TurnPassed) => {
                self.issue_question(&mut state);
                let snapshot = state.to_json();
                self.push_to_match(&state, ServerEvent::PiecePlaced { state: snapshot });
                self.sessions.put(state, now);
                true
            }
            Ok(PlaceOutcome::MatchOver { winner }) => {
                self.end_match(state, winner);
                true
            }
            Err(err) => {
                debug!(player_id, match_id, %err, "placement rejected");
                self.sessions.put(state, now);
                false
            }
        }
    }

    fn handle_move(&mut self, player_id: i64, match_id: i64, from: usize, to: usize) -> bool {
        let now = self.clock.now();
        self.presence.touch(player_id, now);

        let (mut state, side) = match self.take_session(player_id, match_id) {
            Some(found) => found,
            None => return false,
        };
        match state.move_piece(side, from, to) {
            Ok(MoveOutcome::MillFormed) => {
                let snapshot = state.to_json();
                self.push_to_match(&state, ServerEvent::PieceMoved { state: snapshot });
                self.sessions.put(state, now);
                true
            }
            Ok(MoveOutcome::TurnPassed) => {
                self.issue_question(&mut state);
                let snapshot = state.to_json();
                self.push_to_match(&state, ServerEvent::PieceMoved { state: snapshot });
                self.sessions.put(state, now);
                true
            }
            Ok(MoveOutcome::MatchOver { winner }) => {
                self.end_match(state, winner);
                true
            }
            Err(err) => {
                debug!(player_id, match_id, %err, "move rejected");
                self.sessions.put(state, now);
                false
            }
        }
    }

    fn handle_remove(&mut self, player_id: i64, match_id: i64, position: usize) -> bool {
        let now = self.clock.now();
        self.presence.touch(player_id, now);

        let (mut state, side) = match self.take_session(player_id, match_id) {
            Some(found) => found,
            None => return false,
        };
        match state.remove_piece(side, position) {
            Ok(outcome) => {
                if let Err(err) = self.directory.record_removal(match_id, side.opponent()) {
                    error!(match_id, %err, "failed to record piece removal");
                }
                match outcome {
                    RemoveOutcome::TurnPassed => {
                        self.issue_question(&mut state);
                        let snapshot = state.to_json();
                        self.push_to_match(&state, ServerEvent::PieceRemoved { state: snapshot });
                        self.sessions.put(state, now);
                    }
                    RemoveOutcome::MatchOver { winner } => self.end_match(state, winner),
                }
                true
            }
            Err(err) => {
                debug!(player_id, match_id, %err, "removal rejected");
                self.sessions.put(state, now);
                false
            }
        }
    }

    /// Finalize a match that ended over the board.
    fn end_match(&mut self, state: GameState, winner: Side) {
        let now = self.clock.now();
        let today = now.date_naive();
        let (week, year) = schedule::week_number(today);
        let winner_id = state.player_id(winner);

        if let Err(err) = self.directory.finalize_match(state.match_id, winner_id, now) {
            error!(match_id = state.match_id, %err, "failed to finalize match");
            return;
        }
        match rewards::apply_match_result(
            &mut self.directory,
            &self.settings,
            state.match_id,
            false,
            today,
            week,
            year,
        ) {
            Ok(summary) => debug!(match_id = state.match_id, ?summary, "match settled"),
            Err(err) => error!(match_id = state.match_id, %err, "failed to settle match"),
        }

        self.push_to_match(
            &state,
            ServerEvent::MatchEnded {
                winner_id,
                winner_name: state.player_name(winner).to_string(),
            },
        );
        info!(match_id = state.match_id, winner_id, "match ended");
    }

    /// Forfeit the quitter's in-progress match, if any.
    ///
    /// Shared by voluntary disconnects, re-login displacement and the
    /// inactivity sweep: the opponent is credited a win with the quit
    /// bonus and the quitter is marked as having quit for the day.
    fn forfeit_active_match(&mut self, quitter: i64) {
        let match_id = match self.directory.active_match_for(quitter) {
            Some(id) => id,
            None => return,
        };
        let now = self.clock.now();
        let today = now.date_naive();
        let (week, year) = schedule::week_number(today);

        let winner_id = match self
            .directory
            .match_record(match_id)
            .and_then(|record| record.opponent_of(quitter))
        {
            Some(id) => id,
            None => return,
        };

        if let Err(err) = self.directory.mark_match_quit(match_id, quitter) {
            error!(match_id, %err, "failed to flag quitter");
        }
        if let Err(err) = self.directory.finalize_match(match_id, winner_id, now) {
            error!(match_id, %err, "failed to finalize forfeited match");
            return;
        }
        if let Err(err) = rewards::apply_match_result(
            &mut self.directory,
            &self.settings,
            match_id,
            true,
            today,
            week,
            year,
        ) {
            error!(match_id, %err, "failed to settle forfeited match");
        }

        let state = self.sessions.delete(match_id);
        let quitter_name = self.directory.username(quitter).unwrap_or_default().to_string();
        let winner_name = self.directory.username(winner_id).unwrap_or_default().to_string();

        self.push_to_player(
            winner_id,
            ServerEvent::OpponentQuit {
                username: quitter_name,
            },
        );
        let ended = ServerEvent::MatchEnded {
            winner_id,
            winner_name,
        };
        match state {
            Some(state) => self.push_to_match(&state, ended),
            None => self.push_to_player(winner_id, ended),
        }
        info!(match_id, quitter, winner_id, "match forfeited");
    }

    /// Resolve expired question and move deadlines.
    fn enforce_deadlines(&mut self) {
        let now = self.clock.now();

        for match_id in self.sessions.match_ids() {
            let expired = match self.sessions.get(match_id) {
                Some(state) => {
                    let question_expired = state.awaiting_answer
                        && state.question_deadline.map(|d| d <= now).unwrap_or(false);
                    let move_expired = !state.awaiting_answer
                        && state.move_deadline.map(|d| d <= now).unwrap_or(false);
                    question_expired || move_expired
                }
                None => false,
            };
            if !expired {
                continue;
            }

            let mut state = match self.sessions.delete(match_id) {
                Some(state) => state,
                None => continue,
            };
            if state.awaiting_answer {
                debug!(match_id, "question deadline expired, turn passes");
                state.expire_question();
            } else {
                debug!(match_id, "move deadline expired, turn passes");
                state.expire_move();
            }
            self.issue_question(&mut state);

            let snapshot = state.to_json();
            self.push_to_match(&state, ServerEvent::StateSync { state: snapshot });
            self.sessions.put(state, now);
        }
    }

    /// Periodic housekeeping: purge expired sessions and disconnect
    /// inactive players. Each player is handled independently so one
    /// failure never stops the sweep.
    fn sweep(&mut self) {
        let now = self.clock.now();

        let purged = self.sessions.purge_expired(now);
        if !purged.is_empty() {
            warn!(?purged, "purged expired match sessions");
        }

        let limit = Duration::minutes(self.settings.inactivity_limit_mins);
        for player_id in self.presence.inactive_players(now, limit) {
            info!(player_id, "force-disconnecting inactive player");
            self.push_to_player(
                player_id,
                ServerEvent::ForceDisconnect {
                    reason: "No activity".to_string(),
                },
            );
            self.presence.clear(player_id);
            if self.queue.dequeue(player_id).is_some() {
                self.broadcast_queue_count();
            }
            self.forfeit_active_match(player_id);
        }
    }
}
