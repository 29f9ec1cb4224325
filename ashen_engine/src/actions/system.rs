//! `actions::system` module
//!
//! Handlers for help, saving, loading and quitting.

use std::fmt::Write;

use anyhow::Result;
use log::{error, info};

use crate::ASHEN_VERSION;
use crate::command::Verb;
use crate::flow::FlowState;
use crate::lookup::{self, LookupKey};
use crate::save_files;
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// List the verb vocabulary.
pub fn help_handler(view: &mut View) -> Result<()> {
    let mut text = format!("The House of Ash v{ASHEN_VERSION}. Commands:");
    for verb in Verb::ALL {
        let words = verb.words();
        let _ = write!(text, "\n  {:<12} {}", words.join("/"), verb.summary());
    }
    view.push(ViewItem::EngineMessage(text));
    Ok(())
}

/// Write the world and item documents to the save directory.
pub fn save_handler(ctx: &GameContext, view: &mut View) -> Result<()> {
    match save_files::save_game(&ctx.save_dir, &ctx.world, &ctx.catalog) {
        Ok(()) => view.push(ViewItem::EngineMessage("Game saved.".to_string())),
        Err(err) => {
            error!("saving to {} failed: {err}", ctx.save_dir.display());
            view.push(ViewItem::Error(format!("Unable to save the game: {err}")));
        },
    }
    Ok(())
}

/// Replace the running world with the saved one.
///
/// The current world stays in place unless loading succeeds.
pub fn load_handler(ctx: &mut GameContext, view: &mut View) -> Result<()> {
    match save_files::load_game(&ctx.save_dir) {
        Ok(Some(loaded)) => {
            ctx.world = loaded.world;
            ctx.catalog = loaded.items;
            ctx.flow = FlowState::AwaitingCommand;
            ctx.ending_requested = false;
            info!("game loaded, now in {}", ctx.world.current_room_name());
            view.push(ViewItem::EngineMessage("Saved game loaded.".to_string()));
            lookup::describe(ctx.lookup.as_ref(), &LookupKey::room(ctx.world.current_room_name()), view);
        },
        Ok(None) => view.push(ViewItem::ActionFailure("There is no saved game.".to_string())),
        Err(err) => {
            error!("loading from {} failed: {err}", ctx.save_dir.display());
            view.push(ViewItem::Error(format!("Unable to load the saved game: {err}")));
        },
    }
    Ok(())
}

/// Ask the session to end.
pub fn quit_handler(ctx: &mut GameContext, view: &mut View) -> Result<()> {
    info!(
        "player quit in {} carrying {:?}",
        ctx.world.current_room_name(),
        ctx.world.inventory.iter().map(|i| i.name.as_str()).collect::<Vec<_>>()
    );
    ctx.quit_requested = true;
    view.push(ViewItem::EngineMessage("You leave the house of ash behind. Goodbye.".to_string()));
    Ok(())
}
