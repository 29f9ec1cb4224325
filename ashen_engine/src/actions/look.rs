//! `actions::look` module
//!
//! Handlers for looking at the room and at items.

use anyhow::Result;

use crate::actions::typed;
use crate::command::ParsedCommand;
use crate::item::ItemHolder;
use crate::lookup::{self, LookupKey, NO_DESCRIPTION};
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// Describe the current room.
pub fn look_handler(ctx: &GameContext, view: &mut View) -> Result<()> {
    lookup::describe(ctx.lookup.as_ref(), &LookupKey::room(ctx.world.current_room_name()), view);
    Ok(())
}

/// Describe a named item in the room, or note that it is carried.
///
/// # Errors
/// - if the current room is not registered
pub fn look_at_handler(ctx: &mut GameContext, command: &ParsedCommand, view: &mut View) -> Result<()> {
    let Some(item) = command.item1.as_ref() else {
        view.push(ViewItem::ActionFailure(format!("There is no {} here.", typed(command, 0))));
        return Ok(());
    };
    let room = ctx.world.current_room()?;
    if room.contains_item(item) {
        let key = LookupKey::item(&room.name, &item.name);
        let text = ctx
            .lookup
            .lookup(&key)
            .or_else(|| (!item.description.is_empty()).then(|| item.description.clone()))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        view.push(ViewItem::Narration(text));
    } else if ctx.world.has_in_inventory(item) {
        view.push(ViewItem::ActionSuccess(format!("You are carrying the {}.", item.name)));
    } else {
        view.push(ViewItem::ActionFailure(format!("There is no {} here.", item.name)));
    }
    Ok(())
}
