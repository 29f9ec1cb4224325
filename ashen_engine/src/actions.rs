//! `actions` module
//!
//! Handlers bound to verbs by the [`Dispatcher`](crate::dispatch::Dispatcher).
//! Each handler mutates the world through the [`GameContext`](crate::session::GameContext)
//! and reports to the player only through the [`View`](crate::view::View).

pub mod inventory;
pub mod item;
pub mod look;
pub mod movement;
pub mod system;

use crate::command::ParsedCommand;

/// The word the player typed for object slot `idx`, for use in messages.
fn typed(command: &ParsedCommand, idx: usize) -> String {
    match command.word(idx) {
        "" => "that".to_string(),
        word => format!("'{word}'"),
    }
}
