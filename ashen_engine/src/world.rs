//! The world aggregate.
//!
//! Rooms live in a name-keyed arena and connections refer to them by name,
//! so there is exactly one canonical `Room` per name no matter how many
//! connections mention it.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use ashen_data::Direction;
use log::info;
use variantly::Variantly;

use crate::item::{Item, ItemHolder};
use crate::room::{Room, RoomConnection};

/// Where a container was found: by index into the current room's items or
/// into the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Variantly)]
pub enum ContainerSpot {
    Room(usize),
    Inventory(usize),
}

/// Complete state of one running game.
#[derive(Debug, Clone, Default)]
pub struct World {
    rooms: HashMap<String, Room>,
    pub connections: Vec<RoomConnection>,
    pub inventory: Vec<Item>,
    current_room: String,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room. The first room added becomes the current room.
    ///
    /// # Errors
    /// - if a room with the same name already exists
    pub fn add_room(&mut self, room: Room) -> Result<()> {
        if self.rooms.contains_key(&room.name) {
            bail!("room '{}' is already registered", room.name);
        }
        if self.current_room.is_empty() {
            self.current_room.clone_from(&room.name);
        }
        self.rooms.insert(room.name.clone(), room);
        Ok(())
    }

    /// Add a directed connection between two registered rooms.
    ///
    /// # Errors
    /// - if either room is unknown
    pub fn connect(&mut self, from: &str, to: &str, direction: Direction, locked: bool) -> Result<()> {
        for name in [from, to] {
            if !self.rooms.contains_key(name) {
                bail!("cannot connect unknown room '{name}'");
            }
        }
        self.connections.push(RoomConnection::new(from, to, direction, locked));
        Ok(())
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn room_mut(&mut self, name: &str) -> Option<&mut Room> {
        self.rooms.get_mut(name)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn current_room_name(&self) -> &str {
        &self.current_room
    }

    /// # Errors
    /// - if the current room name does not resolve to a registered room
    pub fn current_room(&self) -> Result<&Room> {
        self.rooms
            .get(&self.current_room)
            .ok_or_else(|| anyhow!("current room '{}' is not registered", self.current_room))
    }

    /// # Errors
    /// - if the current room name does not resolve to a registered room
    pub fn current_room_mut(&mut self) -> Result<&mut Room> {
        self.rooms
            .get_mut(&self.current_room)
            .ok_or_else(|| anyhow!("current room '{}' is not registered", self.current_room))
    }

    /// Move the player to the canonical room called `name`.
    ///
    /// # Errors
    /// - if no room called `name` is registered
    pub fn set_current_room(&mut self, name: &str) -> Result<()> {
        let room = self.rooms.get(name).with_context(|| format!("no room named '{name}'"))?;
        self.current_room.clone_from(&room.name);
        Ok(())
    }

    /// The connection leaving the current room in `direction`, if any.
    pub fn exit(&self, direction: Direction) -> Option<&RoomConnection> {
        self.connections
            .iter()
            .find(|c| c.from == self.current_room && c.direction == direction)
    }

    /// Both endpoints of a connection, resolved to their canonical rooms.
    pub fn endpoints(&self, connection: &RoomConnection) -> Option<(&Room, &Room)> {
        Some((self.rooms.get(&connection.from)?, self.rooms.get(&connection.to)?))
    }

    /// Unlock every connection between `a` and `b`, in both directions.
    ///
    /// Returns the number of connections that changed.
    pub fn unlock_pair(&mut self, a: &str, b: &str) -> usize {
        let mut changed = 0;
        for conn in self.connections.iter_mut().filter(|c| c.joins(a, b)) {
            if conn.locked {
                conn.locked = false;
                changed += 1;
            }
        }
        if changed > 0 {
            info!("unlocked passage between {a} and {b}");
        }
        changed
    }

    fn room_items(&self) -> &[Item] {
        self.rooms
            .get(&self.current_room)
            .map(|room| room.items.as_slice())
            .unwrap_or_default()
    }

    pub fn has_in_inventory(&self, item: &Item) -> bool {
        self.inventory.contains_item(item)
    }

    pub fn add_to_inventory(&mut self, item: Item) {
        self.inventory.add_item(item);
    }

    pub fn remove_from_inventory(&mut self, item: &Item) -> Option<Item> {
        self.inventory.remove_item(item)
    }

    /// Resolve a word to an item the player can see: in the current room,
    /// in the inventory, or one level inside a container in either place.
    pub fn resolve_visible(&self, word: &str) -> Option<&Item> {
        self.room_items()
            .iter()
            .chain(self.inventory.iter())
            .find(|item| item.has_name(word))
            .or_else(|| {
                self.find_container(word)
                    .and_then(|spot| self.container(spot))
                    .and_then(|container| container.container.as_ref())
                    .and_then(|c| c.find_item(word))
            })
    }

    /// First container holding `name`, searching the room before the inventory.
    pub fn find_container(&self, name: &str) -> Option<ContainerSpot> {
        if let Some(idx) = self.room_items().iter().position(|item| item.holds(name)) {
            return Some(ContainerSpot::Room(idx));
        }
        self.inventory
            .iter()
            .position(|item| item.holds(name))
            .map(ContainerSpot::Inventory)
    }

    pub fn container(&self, spot: ContainerSpot) -> Option<&Item> {
        match spot {
            ContainerSpot::Room(idx) => self.rooms.get(&self.current_room)?.items.get(idx),
            ContainerSpot::Inventory(idx) => self.inventory.get(idx),
        }
    }

    pub fn container_mut(&mut self, spot: ContainerSpot) -> Option<&mut Item> {
        match spot {
            ContainerSpot::Room(idx) => self.rooms.get_mut(&self.current_room)?.items.get_mut(idx),
            ContainerSpot::Inventory(idx) => self.inventory.get_mut(idx),
        }
    }
}
