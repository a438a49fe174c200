use tracing::debug;

use super::board::{DropError, COLS};
use super::{Board, GameEvent, Player, WinningLine};

/// What became of a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    /// Piece placed; the game goes on with the other player to move.
    Placed { row: usize, col: usize, player: Player },
    /// Piece placed and it completed a line. The game is now inactive.
    Win {
        row: usize,
        col: usize,
        player: Player,
        line: WinningLine,
    },
    /// Piece placed and filled the board without a line. The game is now inactive.
    Draw { row: usize, col: usize, player: Player },
    ColumnFull,
    InvalidColumn,
    /// The game already ended; a reset is needed before moving again.
    Inactive,
}

impl MoveResult {
    /// Whether the board changed.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            MoveResult::Placed { .. } | MoveResult::Win { .. } | MoveResult::Draw { .. }
        )
    }

    /// Whether the move ended the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveResult::Win { .. } | MoveResult::Draw { .. })
    }

    /// Whether the game is still active after an accepted move.
    pub fn keeps_game_active(&self) -> bool {
        matches!(self, MoveResult::Placed { .. })
    }

    /// Events a presenter should see for this result, in order.
    pub fn events(&self) -> Vec<GameEvent> {
        match self {
            MoveResult::Placed { row, col, player } => vec![GameEvent::PiecePlaced {
                row: *row,
                col: *col,
                player: *player,
            }],
            MoveResult::Win {
                row,
                col,
                player,
                line,
            } => vec![
                GameEvent::PiecePlaced {
                    row: *row,
                    col: *col,
                    player: *player,
                },
                GameEvent::Win {
                    player: *player,
                    line: line.clone(),
                },
            ],
            MoveResult::Draw { row, col, player } => vec![
                GameEvent::PiecePlaced {
                    row: *row,
                    col: *col,
                    player: *player,
                },
                GameEvent::Draw,
            ],
            MoveResult::ColumnFull | MoveResult::InvalidColumn | MoveResult::Inactive => {
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    active: bool,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::One, // Player 1 starts
            active: true,
        }
    }

    /// Get current player. After a win or draw this is the mover.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// False once a win or draw has been reached, until the next reset
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get list of legal columns (not full). Empty once the game is over.
    pub fn legal_columns(&self) -> Vec<usize> {
        if !self.active {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's piece into `column`.
    ///
    /// The piece lands in the lowest empty row. Win is checked at the placed
    /// cell first, then draw; only if neither holds does the turn pass.
    /// Rejections leave the state untouched.
    pub fn attempt_move(&mut self, column: usize) -> MoveResult {
        if !self.active {
            debug!(column, "move rejected: game is over");
            return MoveResult::Inactive;
        }

        let player = self.current_player;
        let row = match self.board.drop_piece(column, player.to_cell()) {
            Ok(row) => row,
            Err(DropError::ColumnFull) => {
                debug!(column, "move rejected: column full");
                return MoveResult::ColumnFull;
            }
            Err(DropError::InvalidColumn) => {
                debug!(column, "move rejected: no such column");
                return MoveResult::InvalidColumn;
            }
        };

        if let Some(line) = self.board.check_win(row, column) {
            self.active = false;
            return MoveResult::Win {
                row,
                col: column,
                player,
                line,
            };
        }

        if self.board.check_draw() {
            self.active = false;
            return MoveResult::Draw {
                row,
                col: column,
                player,
            };
        }

        self.current_player = player.other();
        MoveResult::Placed {
            row,
            col: column,
            player,
        }
    }

    /// Back to an empty board with Player 1 to move.
    pub fn reset(&mut self) {
        *self = GameState::initial();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
