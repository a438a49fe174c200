//! Core Connect Four rules: board with gravity placement, win and draw
//! detection, turn alternation, and the events a presenter subscribes to.

mod board;
mod events;
mod player;
mod state;

pub use board::{Axis, Board, Cell, DropError, WinningLine, COLS, ROWS, WIN_LENGTH};
pub use events::{GameEvent, GameObserver, LoggingObserver};
pub use player::Player;
pub use state::{GameState, MoveResult};

/// Fills the board without a single four-in-a-row; the 42nd move is Player 2's.
#[cfg(test)]
pub(crate) const DRAW_SEQUENCE: [usize; 42] = [
    5, 3, 2, 3, 1, 5, 3, 1, 0, 1, 4, 1, 2, 5, 0, 5, 6, 6, 2, 0, 6, 0, 4, 2, 3, 0, 3, 4, 2, 3, 2,
    6, 0, 4, 1, 1, 5, 4, 4, 5, 6, 6,
];
