//! `actions::item` module
//!
//! Handlers for using items, alone or with each other.

use anyhow::Result;

use crate::actions::typed;
use crate::command::ParsedCommand;
use crate::item::ItemHolder;
use crate::puzzle;
use crate::session::GameContext;
use crate::view::{View, ViewItem};

pub const NOTHING_HAPPENS: &str = "Nothing happens.";

/// Use a carried item on its own.
///
/// # Errors
/// - if a puzzle effect fails
pub fn use_handler(ctx: &mut GameContext, command: &ParsedCommand, view: &mut View) -> Result<()> {
    let Some(item) = command.item1.as_ref().filter(|item| ctx.world.has_in_inventory(item)) else {
        view.push(ViewItem::ActionFailure(format!("You don't have {}.", typed(command, 0))));
        return Ok(());
    };
    if !puzzle::use_single(ctx, item, view)? {
        view.push(ViewItem::ActionFailure(NOTHING_HAPPENS.to_string()));
    }
    Ok(())
}

/// Use a carried item with another item that is carried or in the room.
///
/// # Errors
/// - if the current room is not registered, or a puzzle effect fails
pub fn use_with_handler(ctx: &mut GameContext, command: &ParsedCommand, view: &mut View) -> Result<()> {
    let Some(first) = command.item1.as_ref().filter(|item| ctx.world.has_in_inventory(item)) else {
        view.push(ViewItem::ActionFailure(format!("You don't have {}.", typed(command, 0))));
        return Ok(());
    };
    let Some(second) = command.item2.as_ref() else {
        view.push(ViewItem::ActionFailure(format!(
            "What do you want to use the {} with? I don't recognize {}.",
            first.name,
            typed(command, 1)
        )));
        return Ok(());
    };
    let reachable = ctx.world.has_in_inventory(second) || ctx.world.current_room()?.contains_item(second);
    if !reachable {
        view.push(ViewItem::ActionFailure(format!(
            "You can't use the {} with the {}: it isn't within reach.",
            first.name, second.name
        )));
        return Ok(());
    }
    if !puzzle::use_double(ctx, first, second, view)? {
        view.push(ViewItem::ActionFailure(NOTHING_HAPPENS.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Verb;
    use crate::scenario::house_of_ash;

    fn use_with(ctx: &GameContext, first: &str, second: &str) -> ParsedCommand {
        ParsedCommand {
            args: 2,
            item1: ctx.world.resolve_visible(first).cloned(),
            item2: ctx.world.resolve_visible(second).cloned(),
            words: vec![first.to_string(), second.to_string()],
            ..ParsedCommand::new(Verb::Use)
        }
    }

    #[test]
    fn unregistered_combination_changes_nothing() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let inventory = ctx.world.inventory.clone();
        let room_items = ctx.world.current_room()?.items.clone();
        let mut view = View::new();
        let command = use_with(&ctx, "telefono", "tavolo");
        use_with_handler(&mut ctx, &command, &mut view)?;
        assert_eq!(view.texts(), vec![NOTHING_HAPPENS.to_string()]);
        assert_eq!(ctx.world.inventory, inventory);
        assert_eq!(ctx.world.current_room()?.items, room_items);
        Ok(())
    }

    #[test]
    fn matches_on_candle_need_the_candle_in_hand() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let mut view = View::new();
        let command = use_with(&ctx, "fiammiferi", "candela");
        use_with_handler(&mut ctx, &command, &mut view)?;
        assert_eq!(view.texts(), vec![NOTHING_HAPPENS.to_string()]);
        assert!(ctx.world.inventory.find_item("fiammiferi").is_some());
        assert!(ctx.world.exit(ashen_data::Direction::North).is_some_and(|c| c.locked));
        Ok(())
    }

    #[test]
    fn first_item_must_be_carried() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let mut view = View::new();
        let command = use_with(&ctx, "candela", "fiammiferi");
        use_with_handler(&mut ctx, &command, &mut view)?;
        assert_eq!(view.texts(), vec!["You don't have 'candela'.".to_string()]);
        Ok(())
    }

    #[test]
    fn missing_second_item_is_prompted() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let mut view = View::new();
        let command = use_with(&ctx, "fiammiferi", "spada");
        use_with_handler(&mut ctx, &command, &mut view)?;
        assert!(view.texts()[0].starts_with("What do you want to use the Fiammiferi with?"));
        Ok(())
    }

    #[test]
    fn single_use_without_rule_does_nothing() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let command = ParsedCommand {
            args: 1,
            item1: ctx.world.resolve_visible("telefono").cloned(),
            words: vec!["telefono".into()],
            ..ParsedCommand::new(Verb::Use)
        };
        let mut view = View::new();
        use_handler(&mut ctx, &command, &mut view)?;
        assert_eq!(view.texts(), vec![NOTHING_HAPPENS.to_string()]);
        assert!(ctx.flow.is_awaiting_command());
        Ok(())
    }
}
