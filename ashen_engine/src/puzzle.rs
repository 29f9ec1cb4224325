//! Scenario rules that react to pick-ups, item use and drops.
//!
//! Rules are plain data keyed by item name(s) and room name. Each matching
//! rule carries a list of [`Effect`]s that are applied in order.

use anyhow::{Context, Result};
use log::info;

use crate::flow::FlowState;
use crate::item::{Item, ItemHolder};
use crate::lookup::{self, LookupKey};
use crate::mirror::MirrorPuzzle;
use crate::session::GameContext;
use crate::view::{View, ViewItem};

/// A single change to the world caused by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Unlock both directions between two rooms.
    UnlockPair { a: String, b: String },
    /// Remove the first item of the action from the inventory.
    ConsumeFirst,
    /// Remove the second item of the action from the inventory or the room.
    ConsumeSecond,
    /// Open a container in the current room and spill its contents there.
    OpenContainer { container: String },
    /// Narrate a description-table entry.
    Describe(LookupKey),
    /// Switch the session into the mirror riddle.
    StartMirrorPuzzle,
}

/// Extra requirement checked before a combination fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precondition {
    #[default]
    None,
    /// The second item must be carried.
    TargetInInventory,
    /// The second item must be a non-empty container in the current room.
    TargetIsFilledContainerInRoom,
}

/// Answer of the pick-up gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied(String),
}

#[derive(Debug, Clone)]
pub struct PickupRule {
    pub item: String,
    pub room: String,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone)]
pub struct ContainerPickupRule {
    pub item: String,
    pub container: String,
    pub effects: Vec<Effect>,
}

/// Refuses taking `item` out of `container` until every item in `requires`
/// is carried.
#[derive(Debug, Clone)]
pub struct PickupGate {
    pub item: String,
    pub container: String,
    pub requires: Vec<String>,
    pub refusal: String,
}

#[derive(Debug, Clone)]
pub struct UseRule {
    pub item: String,
    pub room: String,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone)]
pub struct CombineRule {
    pub item: String,
    pub target: String,
    pub room: String,
    pub precondition: Precondition,
    pub effects: Vec<Effect>,
}

/// Game ends when all `items` lie together in `room`.
#[derive(Debug, Clone)]
pub struct EndGameRule {
    pub room: String,
    pub items: Vec<String>,
    pub ending: String,
}

/// All scenario rules.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    pub pickups: Vec<PickupRule>,
    pub container_pickups: Vec<ContainerPickupRule>,
    pub gates: Vec<PickupGate>,
    pub uses: Vec<UseRule>,
    pub combines: Vec<CombineRule>,
    pub mirror: Option<MirrorPuzzle>,
    pub end_game: Option<EndGameRule>,
}

/// Decide whether `item` may be taken out of `container`.
pub fn authorize_pick_up(ctx: &GameContext, item: &Item, container: &str) -> Authorization {
    let gate = ctx
        .rules
        .gates
        .iter()
        .find(|gate| item.has_name(&gate.item) && gate.container.eq_ignore_ascii_case(container));
    match gate {
        Some(gate) if !gate.requires.iter().all(|name| ctx.world.inventory.find_item(name).is_some()) => {
            Authorization::Denied(gate.refusal.clone())
        },
        _ => Authorization::Allowed,
    }
}

/// Run the hook for an item picked up loose from the current room.
///
/// # Errors
/// - if an effect refers to a room or container that does not exist
pub fn after_pick_up(ctx: &mut GameContext, item: &Item, view: &mut View) -> Result<()> {
    let room = ctx.world.current_room_name().to_string();
    let effects: Vec<Effect> = ctx
        .rules
        .pickups
        .iter()
        .filter(|rule| item.has_name(&rule.item) && rule.room == room)
        .flat_map(|rule| rule.effects.clone())
        .collect();
    apply_effects(ctx, &effects, item, None, view)
}

/// Run the hook for an item taken out of a container.
///
/// # Errors
/// - if an effect refers to a room or container that does not exist
pub fn after_pick_up_from_container(ctx: &mut GameContext, item: &Item, container: &str, view: &mut View) -> Result<()> {
    let effects: Vec<Effect> = ctx
        .rules
        .container_pickups
        .iter()
        .filter(|rule| item.has_name(&rule.item) && rule.container.eq_ignore_ascii_case(container))
        .flat_map(|rule| rule.effects.clone())
        .collect();
    apply_effects(ctx, &effects, item, None, view)
}

/// Apply the single-item use rule for `item` in the current room.
///
/// Returns `false` when no rule matches.
///
/// # Errors
/// - if an effect refers to a room or container that does not exist
pub fn use_single(ctx: &mut GameContext, item: &Item, view: &mut View) -> Result<bool> {
    let room = ctx.world.current_room_name().to_string();
    let Some(rule) = ctx
        .rules
        .uses
        .iter()
        .find(|rule| item.has_name(&rule.item) && rule.room == room)
        .cloned()
    else {
        return Ok(false);
    };
    apply_effects(ctx, &rule.effects, item, None, view)?;
    Ok(true)
}

/// Apply the combination rule for `first` used with `second`.
///
/// Returns `false`, leaving the world untouched, when no rule matches or its
/// precondition does not hold.
///
/// # Errors
/// - if an effect refers to a room or container that does not exist
pub fn use_double(ctx: &mut GameContext, first: &Item, second: &Item, view: &mut View) -> Result<bool> {
    let room = ctx.world.current_room_name().to_string();
    let Some(rule) = ctx
        .rules
        .combines
        .iter()
        .find(|rule| first.has_name(&rule.item) && second.has_name(&rule.target) && rule.room == room)
        .cloned()
    else {
        return Ok(false);
    };
    if !precondition_holds(ctx, rule.precondition, second)? {
        return Ok(false);
    }
    apply_effects(ctx, &rule.effects, first, Some(second), view)?;
    Ok(true)
}

fn precondition_holds(ctx: &GameContext, precondition: Precondition, target: &Item) -> Result<bool> {
    Ok(match precondition {
        Precondition::None => true,
        Precondition::TargetInInventory => ctx.world.has_in_inventory(target),
        Precondition::TargetIsFilledContainerInRoom => ctx
            .world
            .current_room()?
            .find_item(&target.name)
            .and_then(|item| item.container.as_ref())
            .is_some_and(|container| !container.contents.is_empty()),
    })
}

/// Check whether the end-game condition holds and has not fired yet.
///
/// Returns `true` exactly once per session: the first call that sees the
/// condition satisfied records the request on the context.
pub fn check_end_game(ctx: &mut GameContext) -> bool {
    if ctx.ending_requested || ctx.flow.is_ending_sequence() {
        return false;
    }
    let Some(rule) = ctx.rules.end_game.as_ref() else {
        return false;
    };
    if ctx.world.current_room_name() != rule.room {
        return false;
    }
    let Ok(room) = ctx.world.current_room() else {
        return false;
    };
    if rule.items.iter().all(|name| room.find_item(name).is_some()) {
        info!("end-game condition met in {}", rule.room);
        ctx.ending_requested = true;
        return true;
    }
    false
}

fn apply_effects(ctx: &mut GameContext, effects: &[Effect], first: &Item, second: Option<&Item>, view: &mut View) -> Result<()> {
    for effect in effects {
        match effect {
            Effect::UnlockPair { a, b } => {
                ctx.world.unlock_pair(a, b);
            },
            Effect::ConsumeFirst => {
                if ctx.world.remove_from_inventory(first).is_some() {
                    info!("consumed {}", first.name);
                }
            },
            Effect::ConsumeSecond => {
                if let Some(second) = second {
                    let removed = match ctx.world.remove_from_inventory(second) {
                        Some(item) => Some(item),
                        None => ctx.world.current_room_mut()?.remove_item(second),
                    };
                    if removed.is_some() {
                        info!("consumed {}", second.name);
                    }
                }
            },
            Effect::OpenContainer { container } => open_and_spill(ctx, container)?,
            Effect::Describe(key) => lookup::describe(ctx.lookup.as_ref(), key, view),
            Effect::StartMirrorPuzzle => {
                let puzzle = ctx.rules.mirror.as_ref().context("no mirror puzzle in this scenario")?;
                view.push(ViewItem::Narration(puzzle.riddle.clone()));
                ctx.flow = FlowState::MirrorPuzzle;
                info!("flow: mirror puzzle started");
            },
        }
    }
    Ok(())
}

fn open_and_spill(ctx: &mut GameContext, container_name: &str) -> Result<()> {
    let room = ctx.world.current_room_mut()?;
    let contents = {
        let chest = room
            .items
            .iter_mut()
            .find(|item| item.has_name(container_name))
            .and_then(|item| item.container.as_mut())
            .with_context(|| format!("no container '{container_name}' in {}", room.name))?;
        chest.open = true;
        std::mem::take(&mut chest.contents)
    };
    info!("opened {container_name}, {} item(s) spilled into {}", contents.len(), room.name);
    for item in contents {
        room.add_item(item);
    }
    Ok(())
}
