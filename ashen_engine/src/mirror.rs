//! The mirror riddle.
//!
//! While the session is in [`FlowState::MirrorPuzzle`] every line the player
//! types is an answer, not a command.

use log::info;

use crate::flow::FlowState;
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// Words that abandon the riddle and return to normal play.
const GIVE_UP_WORDS: &[&str] = &["esci", "quit", "exit", "basta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPuzzle {
    pub riddle: String,
    /// Accepted answers, compared case-insensitively.
    pub answers: Vec<String>,
    /// Rooms unlocked (both ways) by a correct answer.
    pub unlocks: (String, String),
    pub solved: String,
    pub wrong: String,
    pub abandoned: String,
}

impl MirrorPuzzle {
    pub fn accepts(&self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        self.answers.iter().any(|a| a.to_lowercase() == answer)
    }
}

/// Handle one line of input while the riddle is active.
pub fn answer(ctx: &mut GameContext, input: &str, view: &mut View) {
    let Some(puzzle) = ctx.rules.mirror.clone() else {
        ctx.flow = FlowState::AwaitingCommand;
        return;
    };
    let trimmed = input.trim();
    if GIVE_UP_WORDS.contains(&trimmed.to_lowercase().as_str()) {
        ctx.flow = FlowState::AwaitingCommand;
        info!("flow: mirror puzzle abandoned");
        view.push(ViewItem::ActionFailure(puzzle.abandoned));
    } else if puzzle.accepts(trimmed) {
        let (a, b) = &puzzle.unlocks;
        ctx.world.unlock_pair(a, b);
        ctx.flow = FlowState::AwaitingCommand;
        info!("flow: mirror puzzle solved");
        view.push(ViewItem::Narration(puzzle.solved));
    } else {
        view.push(ViewItem::ActionFailure(puzzle.wrong));
    }
}
