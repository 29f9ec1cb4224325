//! Command dispatch.
//!
//! Actions are registered under an exact `(verb, argument count)` pair. A
//! command whose pair has no action gets the generic fallback line.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use log::debug;

use crate::actions::{inventory, item, look, movement, system};
use crate::command::{ParsedCommand, Verb};
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// Reply to input that matches no registered action.
pub const NOT_RECOGNIZED: &str = "Command not recognized. Try 'help' for a list of commands.";

/// A registered command handler.
pub type Action = Box<dyn Fn(&mut GameContext, &ParsedCommand, &mut View) -> Result<()> + Send + Sync>;

/// Registry of actions keyed by verb and argument count.
#[derive(Default)]
pub struct Dispatcher {
    actions: HashMap<(Verb, usize), Action>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.actions.keys().collect();
        keys.sort();
        f.debug_struct("Dispatcher").field("actions", &keys).finish()
    }
}

impl Dispatcher {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in action.
    pub fn standard() -> Self {
        let mut dispatcher = Self::new();
        for verb in Verb::ALL {
            if let Some(direction) = verb.direction() {
                dispatcher.register(verb, 0, move |ctx, _, view| movement::move_handler(ctx, direction, view));
            }
        }
        dispatcher.register(Verb::Look, 0, |ctx, _, view| look::look_handler(ctx, view));
        dispatcher.register(Verb::Look, 1, look::look_at_handler);
        dispatcher.register(Verb::Take, 1, inventory::take_handler);
        dispatcher.register(Verb::Drop, 1, inventory::drop_handler);
        dispatcher.register(Verb::Inventory, 0, |ctx, _, view| inventory::inv_handler(ctx, view));
        dispatcher.register(Verb::Use, 1, item::use_handler);
        dispatcher.register(Verb::Use, 2, item::use_with_handler);
        dispatcher.register(Verb::Help, 0, |_, _, view| system::help_handler(view));
        dispatcher.register(Verb::Save, 0, |ctx, _, view| system::save_handler(ctx, view));
        dispatcher.register(Verb::Load, 0, |ctx, _, view| system::load_handler(ctx, view));
        dispatcher.register(Verb::Quit, 0, |ctx, _, view| system::quit_handler(ctx, view));
        dispatcher
    }

    /// Bind `action` to `(verb, args)`, replacing any earlier binding.
    pub fn register<F>(&mut self, verb: Verb, args: usize, action: F)
    where
        F: Fn(&mut GameContext, &ParsedCommand, &mut View) -> Result<()> + Send + Sync + 'static,
    {
        self.actions.insert((verb, args), Box::new(action));
    }

    pub fn is_registered(&self, verb: Verb, args: usize) -> bool {
        self.actions.contains_key(&(verb, args))
    }

    /// Run the action registered for the command's exact verb and count.
    ///
    /// # Errors
    /// - if the action itself fails
    pub fn execute(&self, ctx: &mut GameContext, command: &ParsedCommand, view: &mut View) -> Result<()> {
        let action = command.verb.and_then(|verb| self.actions.get(&(verb, command.args)));
        match action {
            Some(action) => action(ctx, command, view),
            None => {
                debug!("no action for {:?}/{}", command.verb, command.args);
                view.push(ViewItem::Error(NOT_RECOGNIZED.to_string()));
                Ok(())
            },
        }
    }
}
