//! Terminal UI: renders the board, highlights the winning line, and turns
//! key presses into session inputs.

mod app;
mod game_view;

pub use app::App;
