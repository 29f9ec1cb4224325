//! `actions::inventory` module
//!
//! Handlers that move items between the room, containers and the inventory.

use anyhow::{Context, Result};
use log::info;

use crate::actions::typed;
use crate::command::ParsedCommand;
use crate::item::ItemHolder;
use crate::puzzle::{self, Authorization};
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// List what the player is carrying, in the order it was picked up.
pub fn inv_handler(ctx: &GameContext, view: &mut View) -> Result<()> {
    let names = ctx.world.inventory.iter().map(|item| item.name.clone()).collect();
    view.push(ViewItem::Inventory(names));
    Ok(())
}

/// Pick up an item lying in the room or sitting in a container.
///
/// # Errors
/// - if the current room is not registered, or a puzzle effect fails
pub fn take_handler(ctx: &mut GameContext, command: &ParsedCommand, view: &mut View) -> Result<()> {
    let Some(item) = command.item1.as_ref() else {
        view.push(ViewItem::ActionFailure(format!("I don't recognize {}.", typed(command, 0))));
        return Ok(());
    };
    if ctx.world.has_in_inventory(item) {
        view.push(ViewItem::ActionFailure(format!("You already have the {}.", item.name)));
        return Ok(());
    }

    if ctx.world.current_room()?.contains_item(item) {
        if !item.pickable {
            view.push(ViewItem::ActionFailure(format!("The {} can't be picked up.", item.name)));
            return Ok(());
        }
        let taken = ctx
            .world
            .current_room_mut()?
            .remove_item(item)
            .with_context(|| format!("{} vanished from the room", item.name))?;
        info!("picked up {} in {}", taken.name, ctx.world.current_room_name());
        ctx.world.add_to_inventory(taken.clone());
        puzzle::after_pick_up(ctx, &taken, view)?;
        view.push(ViewItem::ActionSuccess(format!("You take the {}.", taken.name)));
        return Ok(());
    }

    if let Some(spot) = ctx.world.find_container(&item.name) {
        let container = ctx.world.container(spot).map(|c| c.name.clone()).context("container moved")?;
        if !item.pickable {
            view.push(ViewItem::ActionFailure(format!("The {} can't be picked up.", item.name)));
            return Ok(());
        }
        if let Authorization::Denied(reason) = puzzle::authorize_pick_up(ctx, item, &container) {
            info!("taking {} from {container} was refused", item.name);
            view.push(ViewItem::ActionFailure(reason));
            return Ok(());
        }
        let taken = ctx
            .world
            .container_mut(spot)
            .and_then(|c| c.take_content(&item.name))
            .with_context(|| format!("{} vanished from the {container}", item.name))?;
        info!("took {} from {container}", taken.name);
        ctx.world.add_to_inventory(taken.clone());
        puzzle::after_pick_up_from_container(ctx, &taken, &container, view)?;
        view.push(ViewItem::ActionSuccess(format!("You take the {} from the {container}.", taken.name)));
        return Ok(());
    }

    view.push(ViewItem::ActionFailure(format!("There is no {} here.", item.name)));
    Ok(())
}

/// Leave a carried item in the current room, then check for the ending.
///
/// # Errors
/// - if the current room is not registered
pub fn drop_handler(ctx: &mut GameContext, command: &ParsedCommand, view: &mut View) -> Result<()> {
    let dropped = command.item1.as_ref().and_then(|item| ctx.world.remove_from_inventory(item));
    let Some(dropped) = dropped else {
        view.push(ViewItem::ActionFailure(format!("You don't have {}.", typed(command, 0))));
        return Ok(());
    };
    let name = dropped.name.clone();
    ctx.world.current_room_mut()?.add_item(dropped);
    info!("dropped {name} in {}", ctx.world.current_room_name());
    view.push(ViewItem::ActionSuccess(format!("You drop the {name}.")));
    puzzle::check_end_game(ctx);
    Ok(())
}
