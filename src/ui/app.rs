use crate::game::{MoveResult, WinningLine, COLS};
use crate::session::{Rejection, Session, SessionInput, SessionOutcome, TurnPhase};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

/// How long to wait for a key before checking the opponent's timer.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct App {
    session: Session,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    winning_line: Option<WinningLine>,
}

impl App {
    pub fn new(session: Session) -> Self {
        App {
            session,
            selected_column: COLS / 2, // Start in middle
            should_quit: false,
            message: None,
            winning_line: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        info!(mode = ?self.session.mode(), "starting game");
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.on_tick(Instant::now());
        }
        info!("quitting");
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key, Instant::now());
                }
            }
        }
        Ok(())
    }

    /// Let a scheduled opponent reply fire.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(outcome) = self.session.tick(now) {
            self.show(outcome);
        }
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece(self.selected_column, now);
            }
            KeyCode::Char(c @ '1'..='7') => {
                let column = c as usize - '1' as usize;
                self.selected_column = column;
                self.drop_piece(column, now);
            }
            KeyCode::Char('r') => {
                self.reset(now);
            }
            KeyCode::Char('m') => {
                let mode = self.session.mode().toggled();
                self.session.set_mode(mode);
                self.after_reset();
                self.message = Some(format!("New game: {}", mode.label()));
            }
            _ => {}
        }
    }

    /// Drop piece in the given column
    fn drop_piece(&mut self, column: usize, now: Instant) {
        let outcome = self
            .session
            .handle(SessionInput::HumanMoveRequested(column), now);
        self.show(outcome);
    }

    fn reset(&mut self, now: Instant) {
        let outcome = self.session.handle(SessionInput::ResetRequested, now);
        self.show(outcome);
    }

    fn after_reset(&mut self) {
        self.selected_column = COLS / 2;
        self.winning_line = None;
    }

    /// Turn a session outcome into what the player sees.
    fn show(&mut self, outcome: SessionOutcome) {
        if let SessionOutcome::Moved(MoveResult::Win { line, .. }) = &outcome {
            self.winning_line = Some(line.clone());
        }
        if outcome == SessionOutcome::Reset {
            self.after_reset();
        }
        self.message = describe(&outcome, self.session.phase());
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            &self.session,
            self.selected_column,
            self.message.as_deref(),
            self.winning_line.as_ref(),
        );
    }
}

/// Status line for an outcome, if it deserves one.
fn describe(outcome: &SessionOutcome, phase: TurnPhase) -> Option<String> {
    match outcome {
        SessionOutcome::Moved(MoveResult::Win { player, .. }) => {
            Some(format!("{} wins! Press 'r' to play again.", player.name()))
        }
        SessionOutcome::Moved(MoveResult::Draw { .. }) => {
            Some("It's a draw! Press 'r' to play again.".to_string())
        }
        SessionOutcome::Moved(MoveResult::Placed { .. }) => {
            (phase == TurnPhase::WaitingForOpponent).then(|| "Computer is thinking...".to_string())
        }
        SessionOutcome::Moved(MoveResult::ColumnFull) => Some("Column is full!".to_string()),
        SessionOutcome::Moved(MoveResult::InvalidColumn) => Some("Invalid column!".to_string()),
        SessionOutcome::Moved(MoveResult::Inactive) => {
            Some("Game over! Press 'r' to restart.".to_string())
        }
        SessionOutcome::Rejected(Rejection::OpponentPending | Rejection::NotHumanTurn) => {
            Some("Wait for the computer to move.".to_string())
        }
        SessionOutcome::Rejected(Rejection::NotOpponentTurn) => None,
        SessionOutcome::Reset => Some("New game started!".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Opponent;
    use crate::game::{Cell, GameState, Player};
    use crate::session::GameMode;

    struct FirstLegal;

    impl Opponent for FirstLegal {
        fn choose_move(&mut self, state: &GameState) -> Option<usize> {
            state.legal_columns().first().copied()
        }

        fn name(&self) -> &str {
            "FirstLegal"
        }
    }

    const DELAY: Duration = Duration::from_millis(300);

    fn app(mode: GameMode) -> App {
        App::new(Session::new(mode, Box::new(FirstLegal), DELAY))
    }

    fn press(app: &mut App, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::from(code), now);
    }

    #[test]
    fn test_column_selection_stays_on_board() {
        let mut app = app(GameMode::TwoPlayer);
        let now = Instant::now();
        for _ in 0..10 {
            press(&mut app, KeyCode::Left, now);
        }
        assert_eq!(app.selected_column, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Right, now);
        }
        assert_eq!(app.selected_column, COLS - 1);
    }

    #[test]
    fn test_enter_drops_in_selected_column() {
        let mut app = app(GameMode::TwoPlayer);
        let now = Instant::now();
        press(&mut app, KeyCode::Right, now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.session().state().board().get(5, 4), Cell::One);
        assert_eq!(app.session().state().current_player(), Player::Two);
    }

    #[test]
    fn test_number_keys_drop_directly() {
        let mut app = app(GameMode::TwoPlayer);
        let now = Instant::now();
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Char('7'), now);
        assert_eq!(app.session().state().board().get(5, 0), Cell::One);
        assert_eq!(app.session().state().board().get(5, 6), Cell::Two);
        assert_eq!(app.selected_column, 6);
    }

    #[test]
    fn test_input_suppressed_while_computer_thinks() {
        let mut app = app(GameMode::VsComputer);
        let now = Instant::now();
        press(&mut app, KeyCode::Char('4'), now);
        assert_eq!(app.message(), Some("Computer is thinking..."));

        press(&mut app, KeyCode::Char('5'), now);
        assert_eq!(app.message(), Some("Wait for the computer to move."));
        assert_eq!(app.session().state().board().get(5, 4), Cell::Empty);

        app.on_tick(now + DELAY);
        assert_eq!(app.session().state().board().get(5, 0), Cell::Two);
        assert_eq!(app.session().phase(), TurnPhase::WaitingForHuman);
    }

    #[test]
    fn test_win_is_highlighted_and_reset_clears_it() {
        let mut app = app(GameMode::TwoPlayer);
        let now = Instant::now();
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('2'), now);
            press(&mut app, KeyCode::Char('3'), now);
        }
        press(&mut app, KeyCode::Char('2'), now);

        assert_eq!(app.message(), Some("Player 1 wins! Press 'r' to play again."));
        let line = app.winning_line().unwrap();
        assert!(line.contains(5, 1) && line.contains(2, 1));

        press(&mut app, KeyCode::Char('1'), now);
        assert_eq!(app.message(), Some("Game over! Press 'r' to restart."));

        press(&mut app, KeyCode::Char('r'), now);
        assert_eq!(app.winning_line(), None);
        assert_eq!(app.message(), Some("New game started!"));
        assert_eq!(*app.session().state(), GameState::initial());
    }

    #[test]
    fn test_mode_toggle_starts_new_game() {
        let mut app = app(GameMode::VsComputer);
        let now = Instant::now();
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Char('m'), now);

        assert_eq!(app.session().mode(), GameMode::TwoPlayer);
        assert_eq!(*app.session().state(), GameState::initial());
        assert_eq!(app.message(), Some("New game: Two players"));

        // The pending reply from the old game never lands.
        app.on_tick(now + DELAY);
        assert_eq!(*app.session().state(), GameState::initial());
    }

    #[test]
    fn test_full_column_message() {
        let mut app = app(GameMode::TwoPlayer);
        let now = Instant::now();
        for _ in 0..6 {
            press(&mut app, KeyCode::Char('1'), now);
        }
        press(&mut app, KeyCode::Char('1'), now);
        assert_eq!(app.message(), Some("Column is full!"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app(GameMode::TwoPlayer);
        press(&mut app, KeyCode::Char('q'), Instant::now());
        assert!(app.should_quit());

        let mut app = self::app(GameMode::TwoPlayer);
        press(&mut app, KeyCode::Esc, Instant::now());
        assert!(app.should_quit());
    }
}
