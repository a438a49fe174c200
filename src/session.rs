//! Turn ownership between the human and the automated opponent.
//!
//! A [`Session`] wraps a [`GameState`] in a small state machine with phases
//! [`TurnPhase::WaitingForHuman`], [`TurnPhase::WaitingForOpponent`] and
//! [`TurnPhase::Terminal`]. The opponent's reply is scheduled after a delay and
//! fired by [`Session::tick`]; while it is pending human input is refused.
//! Scheduled replies cannot be cancelled: a reset bumps the session
//! generation so that replies scheduled earlier do nothing when they fire.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::ai::Opponent;
use crate::game::{GameEvent, GameObserver, GameState, MoveResult, Player};

/// The side played by the computer in [`GameMode::VsComputer`].
pub const COMPUTER_PLAYER: Player = Player::Two;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Two humans share the keyboard.
    TwoPlayer,
    /// Player 2 is the random computer opponent.
    #[default]
    VsComputer,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::TwoPlayer => "Two players",
            GameMode::VsComputer => "vs Computer",
        }
    }

    pub fn toggled(self) -> GameMode {
        match self {
            GameMode::TwoPlayer => GameMode::VsComputer,
            GameMode::VsComputer => GameMode::TwoPlayer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    WaitingForHuman,
    WaitingForOpponent,
    Terminal,
}

/// Discrete inputs driving the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    HumanMoveRequested(usize),
    OpponentMoveReady(usize),
    ResetRequested,
}

/// Why an input was refused before it reached the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The opponent's reply is scheduled and has not fired yet.
    OpponentPending,
    /// It is the computer's turn, not the human's.
    NotHumanTurn,
    /// An opponent move arrived when it was not the computer's turn.
    NotOpponentTurn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The input reached the board; the result says what happened there.
    Moved(MoveResult),
    Rejected(Rejection),
    Reset,
}

/// An opponent reply scheduled to fire at `due`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingMove {
    due: Instant,
    generation: u64,
}

pub struct Session {
    state: GameState,
    mode: GameMode,
    opponent: Box<dyn Opponent>,
    opponent_delay: Duration,
    /// Raised while an opponent reply is scheduled; gates human input.
    awaiting_opponent: bool,
    scheduled: Vec<PendingMove>,
    generation: u64,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Session {
    pub fn new(mode: GameMode, opponent: Box<dyn Opponent>, opponent_delay: Duration) -> Self {
        Session {
            state: GameState::initial(),
            mode,
            opponent,
            opponent_delay,
            awaiting_opponent: false,
            scheduled: Vec::new(),
            generation: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer for placements, wins, draws and resets.
    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// Whether an opponent reply is scheduled and human input is refused.
    pub fn is_opponent_pending(&self) -> bool {
        self.awaiting_opponent
    }

    pub fn phase(&self) -> TurnPhase {
        if !self.state.is_active() {
            TurnPhase::Terminal
        } else if self.is_computer_turn() {
            TurnPhase::WaitingForOpponent
        } else {
            TurnPhase::WaitingForHuman
        }
    }

    fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::VsComputer && self.state.current_player() == COMPUTER_PLAYER
    }

    /// Feed one input to the state machine.
    #[instrument(skip(self), fields(phase = ?self.phase()))]
    pub fn handle(&mut self, input: SessionInput, now: Instant) -> SessionOutcome {
        match input {
            SessionInput::HumanMoveRequested(column) => self.human_move(column, now),
            SessionInput::OpponentMoveReady(column) => self.opponent_move(column, now),
            SessionInput::ResetRequested => {
                self.reset();
                SessionOutcome::Reset
            }
        }
    }

    /// Fire scheduled opponent replies that are due.
    ///
    /// Stale replies (scheduled before a reset) are dropped without effect.
    /// If the opponent has no column to offer, it is asked again after the delay.
    /// Returns the outcome of the reply that reached the board, if any.
    pub fn tick(&mut self, now: Instant) -> Option<SessionOutcome> {
        let (due, waiting): (Vec<PendingMove>, Vec<PendingMove>) =
            self.scheduled.drain(..).partition(|pending| pending.due <= now);
        self.scheduled = waiting;

        let mut outcome = None;
        for pending in due {
            if pending.generation != self.generation {
                debug!(
                    scheduled = pending.generation,
                    current = self.generation,
                    "dropping stale opponent move"
                );
                continue;
            }
            if outcome.is_some() || !self.awaiting_opponent {
                continue;
            }

            match self.opponent.choose_move(&self.state) {
                Some(column) => {
                    outcome = Some(self.handle(SessionInput::OpponentMoveReady(column), now));
                }
                None => {
                    warn!("opponent found no legal column, retrying");
                    self.schedule_opponent(now);
                }
            }
        }
        outcome
    }

    /// Start over, keeping the mode.
    pub fn reset(&mut self) {
        self.state.reset();
        self.generation += 1;
        self.awaiting_opponent = false;
        info!(generation = self.generation, mode = ?self.mode, "session reset");
        self.notify(&[GameEvent::Reset]);
    }

    /// Switch mode and start a fresh game.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    fn human_move(&mut self, column: usize, now: Instant) -> SessionOutcome {
        if self.awaiting_opponent {
            debug!(column, "human move refused: opponent move pending");
            return SessionOutcome::Rejected(Rejection::OpponentPending);
        }
        if self.state.is_active() && self.is_computer_turn() {
            debug!(column, "human move refused: computer's turn");
            return SessionOutcome::Rejected(Rejection::NotHumanTurn);
        }

        let result = self.apply(column);
        if result.keeps_game_active() && self.is_computer_turn() {
            self.schedule_opponent(now);
        }
        SessionOutcome::Moved(result)
    }

    fn opponent_move(&mut self, column: usize, now: Instant) -> SessionOutcome {
        if !self.state.is_active() || !self.is_computer_turn() {
            debug!(column, "opponent move refused: not the computer's turn");
            return SessionOutcome::Rejected(Rejection::NotOpponentTurn);
        }

        // This reply answers the turn; anything else scheduled for it is void.
        self.scheduled.retain(|pending| pending.generation != self.generation);
        self.awaiting_opponent = false;
        let result = self.apply(column);
        if !result.is_accepted() {
            warn!(column, ?result, "opponent move rejected, retrying");
            self.schedule_at(now);
        }
        SessionOutcome::Moved(result)
    }

    fn apply(&mut self, column: usize) -> MoveResult {
        let result = self.state.attempt_move(column);
        self.notify(&result.events());
        result
    }

    fn schedule_opponent(&mut self, now: Instant) {
        self.schedule_at(now + self.opponent_delay);
    }

    fn schedule_at(&mut self, due: Instant) {
        self.awaiting_opponent = true;
        self.scheduled.push(PendingMove {
            due,
            generation: self.generation,
        });
        debug!(generation = self.generation, "opponent move scheduled");
    }

    fn notify(&mut self, events: &[GameEvent]) {
        for event in events {
            for observer in &mut self.observers {
                observer.notify(event);
            }
        }
    }
}
