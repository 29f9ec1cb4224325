//! `actions::movement` module
//!
//! Handlers for commands that change the player's location.

use anyhow::Result;
use ashen_data::Direction;
use log::info;

use crate::lookup::{self, LookupKey};
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// Walk through the passage leaving the current room in `direction`.
///
/// # Errors
/// - if the passage leads to a room that is not registered
pub fn move_handler(ctx: &mut GameContext, direction: Direction, view: &mut View) -> Result<()> {
    let Some(passage) = ctx.world.exit(direction).cloned() else {
        view.push(ViewItem::ActionFailure(format!("There is no passage to the {direction}.")));
        return Ok(());
    };
    if passage.locked {
        info!("tried locked passage {} -> {}", passage.from, passage.to);
        view.push(ViewItem::ActionFailure(format!("The passage to the {direction} is blocked.")));
        return Ok(());
    }
    ctx.world.set_current_room(&passage.to)?;
    info!("moved {direction} from {} to {}", passage.from, passage.to);
    lookup::describe(ctx.lookup.as_ref(), &LookupKey::room(&passage.to), view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::house_of_ash;

    #[test]
    fn locked_passage_keeps_player_in_place() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let mut view = View::new();
        move_handler(&mut ctx, Direction::North, &mut view)?;
        assert_eq!(ctx.world.current_room_name(), "Stanza1");
        assert_eq!(view.texts(), vec!["The passage to the north is blocked.".to_string()]);
        Ok(())
    }

    #[test]
    fn missing_passage_is_reported() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        let mut view = View::new();
        move_handler(&mut ctx, Direction::West, &mut view)?;
        assert_eq!(view.texts(), vec!["There is no passage to the west.".to_string()]);
        Ok(())
    }

    #[test]
    fn open_passage_moves_and_describes() -> Result<()> {
        let mut ctx = GameContext::for_scenario(house_of_ash()?);
        ctx.world.unlock_pair("Stanza1", "Stanza2");
        let inventory = ctx.world.inventory.clone();
        let mut view = View::new();
        move_handler(&mut ctx, Direction::North, &mut view)?;
        assert_eq!(ctx.world.current_room_name(), "Stanza2");
        assert_eq!(ctx.world.inventory, inventory);
        assert!(view.items[0].is_narration());
        Ok(())
    }
}
