//! A running game: the state handlers work on, plus the loop step that
//! turns one line of input into narration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use crate::dispatch::{Dispatcher, NOT_RECOGNIZED};
use crate::flow::FlowState;
use crate::item::ItemCatalog;
use crate::lookup::{self, DescriptionLookup, DescriptionTable, LookupKey};
use crate::mirror;
use crate::narration::{self, Narrator};
use crate::parser::Parser;
use crate::puzzle::RuleBook;
use crate::save_files::DEFAULT_SAVE_DIR;
use crate::scenario::Scenario;
use crate::view::{View, ViewItem};
use crate::world::World;

/// Reply to any input once the story is over.
pub const STORY_OVER: &str = "The story is over. The house of ash has nothing more to tell.";

/// Everything an action handler may read or change.
pub struct GameContext {
    pub world: World,
    pub catalog: ItemCatalog,
    pub rules: RuleBook,
    pub lookup: Box<dyn DescriptionLookup>,
    pub flow: FlowState,
    /// Set once when the end-game condition first holds.
    pub ending_requested: bool,
    pub quit_requested: bool,
    pub save_dir: PathBuf,
}

impl GameContext {
    pub fn new(scenario: Scenario, lookup: Box<dyn DescriptionLookup>, save_dir: PathBuf) -> Self {
        Self {
            world: scenario.world,
            catalog: scenario.catalog,
            rules: scenario.rules,
            lookup,
            flow: FlowState::AwaitingCommand,
            ending_requested: false,
            quit_requested: false,
            save_dir,
        }
    }

    /// A context with an empty description table and the default save dir.
    pub fn for_scenario(scenario: Scenario) -> Self {
        Self::new(scenario, Box::new(DescriptionTable::default()), PathBuf::from(DEFAULT_SAVE_DIR))
    }
}

/// What the caller should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    Finished,
}

/// One player's session.
pub struct GameSession {
    pub ctx: GameContext,
    parser: Parser,
    dispatcher: Dispatcher,
    narrator: Arc<dyn Narrator>,
    wait_interval: Duration,
    styled: bool,
}

impl GameSession {
    pub fn new(ctx: GameContext, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            ctx,
            parser: Parser::new(),
            dispatcher: Dispatcher::standard(),
            narrator,
            wait_interval: Duration::from_millis(50),
            styled: false,
        }
    }

    /// Set how often the ending hand-off polls the narrator.
    #[must_use]
    pub fn with_wait_interval(mut self, interval: Duration) -> Self {
        self.wait_interval = interval;
        self
    }

    #[must_use]
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn flow(&self) -> FlowState {
        self.ctx.flow
    }

    /// Narrate the introduction of a new game.
    pub fn begin(&mut self) {
        let mut view = View::styled(self.styled);
        let start = self.ctx.world.current_room_name().to_string();
        lookup::describe(self.ctx.lookup.as_ref(), &LookupKey::intro(&start), &mut view);
        lookup::describe(self.ctx.lookup.as_ref(), &LookupKey::room(&start), &mut view);
        view.flush(self.narrator.as_ref());
    }

    /// Describe where a loaded game left off.
    pub fn resume(&mut self) {
        let mut view = View::styled(self.styled);
        view.push(ViewItem::EngineMessage("Saved game loaded.".to_string()));
        let room = self.ctx.world.current_room_name().to_string();
        lookup::describe(self.ctx.lookup.as_ref(), &LookupKey::room(&room), &mut view);
        view.flush(self.narrator.as_ref());
    }

    /// Interpret one line of input according to the current flow state.
    ///
    /// # Errors
    /// - if an action hits an inconsistent world (e.g. a dangling room name)
    pub fn handle_input(&mut self, input: &str) -> Result<SessionControl> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(SessionControl::Continue);
        }
        let mut view = View::styled(self.styled);
        view.push(ViewItem::Echo(format!("> {input}")));

        match self.ctx.flow {
            FlowState::EndingSequence => {
                view.push(ViewItem::EngineMessage(STORY_OVER.to_string()));
                view.flush(self.narrator.as_ref());
                return Ok(SessionControl::Finished);
            },
            FlowState::MirrorPuzzle => mirror::answer(&mut self.ctx, input, &mut view),
            FlowState::AwaitingCommand => {
                let command = self.parser.parse(&self.ctx.world, input);
                if command.verb.is_none() {
                    view.push(ViewItem::Error(NOT_RECOGNIZED.to_string()));
                } else {
                    self.dispatcher.execute(&mut self.ctx, &command, &mut view)?;
                }
            },
        }
        view.flush(self.narrator.as_ref());

        if self.ctx.ending_requested && !self.ctx.flow.is_ending_sequence() {
            self.enter_ending();
        }
        if self.ctx.quit_requested {
            return Ok(SessionControl::Finished);
        }
        Ok(SessionControl::Continue)
    }

    /// Wait for the narrator to go quiet, then switch to the ending.
    fn enter_ending(&mut self) {
        narration::wait_until_idle(self.narrator.as_ref(), self.wait_interval);
        self.ctx.flow = FlowState::EndingSequence;
        info!("flow: ending sequence");
        let mut view = View::styled(self.styled);
        match self.ctx.rules.end_game.as_ref() {
            Some(rule) => view.push(ViewItem::Narration(rule.ending.clone())),
            None => warn!("ending requested without an end-game rule"),
        }
        view.flush(self.narrator.as_ref());
    }
}
