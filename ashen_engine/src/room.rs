//! Rooms and the directed connections between them.

use ashen_data::{Direction, RoomSnapshot};

use crate::item::{Item, ItemHolder};

/// A location in the world.
///
/// Rooms are created once when the world is built and afterwards only have
/// their item list changed.
#[derive(Debug, Clone, Default)]
pub struct Room {
    pub name: String,
    pub description: String,
    pub items: Vec<Item>,
}

impl Room {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            items: Vec::new(),
        }
    }

    /// Builder-style helper used when laying out a scenario.
    #[must_use]
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        for item in items {
            self.add_item(item);
        }
        self
    }

    /// Snapshot of this room in the save-document format.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            items: self.items.iter().map(Item::to_record).collect(),
        }
    }
}

impl ItemHolder for Room {
    fn items(&self) -> &[Item] {
        &self.items
    }
    fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }
}

/// A directed edge between two rooms, referring to both by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConnection {
    pub from: String,
    pub to: String,
    pub direction: Direction,
    pub locked: bool,
}

impl RoomConnection {
    pub fn new(from: &str, to: &str, direction: Direction, locked: bool) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            direction,
            locked,
        }
    }

    /// True if this edge runs between `a` and `b` in either direction.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}
