use tracing::info;

use super::{Player, WinningLine};

/// Something the presenter may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PiecePlaced { row: usize, col: usize, player: Player },
    Win { player: Player, line: WinningLine },
    Draw,
    Reset,
}

/// Subscriber to game events. Every method defaults to doing nothing.
pub trait GameObserver {
    fn on_piece_placed(&mut self, _row: usize, _col: usize, _player: Player) {}

    fn on_win(&mut self, _player: Player, _line: &WinningLine) {}

    fn on_draw(&mut self) {}

    fn on_reset(&mut self) {}

    /// Route an event to the matching callback.
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PiecePlaced { row, col, player } => {
                self.on_piece_placed(*row, *col, *player)
            }
            GameEvent::Win { player, line } => self.on_win(*player, line),
            GameEvent::Draw => self.on_draw(),
            GameEvent::Reset => self.on_reset(),
        }
    }
}

/// Writes every game event to the `tracing` log.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl GameObserver for LoggingObserver {
    fn on_piece_placed(&mut self, row: usize, col: usize, player: Player) {
        info!(row, col, player = player.number(), "piece placed");
    }

    fn on_win(&mut self, player: Player, line: &WinningLine) {
        info!(
            player = player.number(),
            axis = line.axis().name(),
            cells = ?line.cells(),
            "game won"
        );
    }

    fn on_draw(&mut self) {
        info!("game drawn");
    }

    fn on_reset(&mut self) {
        info!("game reset");
    }
}
