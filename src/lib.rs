//! # Connect Four
//!
//! Connect Four in the terminal, for two players at one keyboard or against a
//! computer opponent that drops its pieces at random. The UI is built with
//! Ratatui.
//!
//! ## Modules
//!
//! - [`game`] — Core rules: board, player, move results, win/draw detection, events
//! - [`ai`] — Opponent trait and the random opponent
//! - [`session`] — Turn ownership between human and computer, delayed replies
//! - [`ui`] — Terminal UI: board view, key handling
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
