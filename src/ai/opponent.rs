use crate::game::GameState;

/// An automated player that picks a column for the side to move.
pub trait Opponent {
    /// Choose a column given the current game state.
    /// Returns `None` when no column is legal (the game is over or the board is full).
    fn choose_move(&mut self, state: &GameState) -> Option<usize>;

    /// Return the opponent's display name.
    fn name(&self) -> &str;
}
