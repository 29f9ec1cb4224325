use serde::{Deserialize, Serialize};
use std::fmt;

/// Compass direction of a room connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    /// The direction leading back the way you came.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{label}")
    }
}

/// One row of the canned narrative table.
///
/// A row is addressed by five key fields. Unused object slots hold `"0"`
/// by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionDef {
    pub action: String,
    pub room: String,
    pub state: String,
    pub object1: String,
    pub object2: String,
    pub text: String,
}

impl DescriptionDef {
    /// The five key fields in lookup order.
    pub fn key_fields(&self) -> [&str; 5] {
        [
            self.action.as_str(),
            self.room.as_str(),
            self.state.as_str(),
            self.object1.as_str(),
            self.object2.as_str(),
        ]
    }
}

/// Top-level save document describing the player's world.
///
/// Every connection embeds full snapshots of both of its rooms, so a room
/// named by several connections appears several times in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldDocument {
    #[serde(default)]
    pub version: String,
    pub current_room: RoomSnapshot,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    #[serde(default)]
    pub inventory: Vec<ItemRecord>,
}

/// A directed edge between two rooms as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub starting_room: RoomSnapshot,
    pub arriving_room: RoomSnapshot,
    pub direction: Direction,
    pub locked: bool,
}

/// A copy of a room and the items lying in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}

/// A serialized item. Containers carry a [`ContainerRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub pickable: bool,
    #[serde(default)]
    pub container: Option<ContainerRecord>,
}

/// Container state. Contents are stored by item name; their definitions
/// live in the companion [`ItemsDocument`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub open: bool,
    #[serde(default)]
    pub contents: Vec<String>,
}

/// Companion save document holding items not reachable from the world
/// document (container contents, consumed items).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsDocument {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
}
