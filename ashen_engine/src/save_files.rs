//! Save-game serialization and load-time graph reconciliation.
//!
//! A save is two RON documents in one directory: `world.ron` holds the
//! current room, the inventory and every connection with full snapshots of
//! both endpoint rooms; `items.ron` holds item definitions that are not
//! lying in a room or carried (container contents, consumed items).
//!
//! Because every connection carries its own room copies, a room named by N
//! connections appears N times on disk. Loading keeps the first copy of each
//! room as the canonical one and discards the rest.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ashen_data::{ConnectionRecord, ItemRecord, ItemsDocument, RoomSnapshot, WorldDocument};
use log::{info, warn};
use ron::ser::PrettyConfig;
use serde::Serialize;
use thiserror::Error;

use crate::ASHEN_VERSION;
use crate::item::{Container, Item, ItemCatalog};
use crate::room::Room;
use crate::world::World;

pub const DEFAULT_SAVE_DIR: &str = "saved_games";
pub const WORLD_FILE: &str = "world.ron";
pub const ITEMS_FILE: &str = "items.ron";

/// Containers may hold containers, but not without limit.
const MAX_NESTING: usize = 4;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed save data in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unable to serialize save data: {0}")]
    Serialize(#[from] ron::Error),
    #[error("save data refers to unknown room '{0}'")]
    UnknownRoom(String),
    #[error("save data refers to unknown item '{0}'")]
    UnknownItem(String),
    #[error("containers nested too deeply at '{0}'")]
    NestingTooDeep(String),
    #[error("save data places item '{0}' more than once")]
    DuplicateItem(String),
}

/// A world rebuilt from disk plus every item definition seen while loading.
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub world: World,
    pub items: ItemCatalog,
}

/// True if `dir` holds a non-empty world document.
pub fn save_exists(dir: &Path) -> bool {
    fs::read_to_string(dir.join(WORLD_FILE)).is_ok_and(|text| !text.trim().is_empty())
}

/// Build the world document. Connections embed snapshots of both rooms.
///
/// # Errors
/// - [`PersistenceError::UnknownRoom`] if a connection or the current room
///   names a room that is not registered
pub fn world_document(world: &World) -> Result<WorldDocument, PersistenceError> {
    let snapshot = |name: &str| {
        world
            .room(name)
            .map(Room::snapshot)
            .ok_or_else(|| PersistenceError::UnknownRoom(name.to_string()))
    };
    let connections = world
        .connections
        .iter()
        .map(|conn| -> Result<ConnectionRecord, PersistenceError> {
            Ok(ConnectionRecord {
                starting_room: snapshot(&conn.from)?,
                arriving_room: snapshot(&conn.to)?,
                direction: conn.direction,
                locked: conn.locked,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WorldDocument {
        version: ASHEN_VERSION.to_string(),
        current_room: snapshot(world.current_room_name())?,
        connections,
        inventory: world.inventory.iter().map(Item::to_record).collect(),
    })
}

/// Build the items document: every catalog item that is neither carried
/// nor lying loose in a room, plus the live state of every container's
/// contents.
pub fn items_document(world: &World, catalog: &ItemCatalog) -> ItemsDocument {
    let placed: HashSet<&Item> = world
        .inventory
        .iter()
        .chain(world.rooms().flat_map(|room| room.items.iter()))
        .collect();

    let mut records: BTreeMap<String, ItemRecord> = catalog
        .values()
        .filter(|item| !placed.contains(item))
        .map(|item| (item.name.clone(), item.to_record()))
        .collect();

    let mut stack: Vec<&Item> = placed.iter().copied().collect();
    while let Some(item) = stack.pop() {
        if let Some(container) = &item.container {
            for content in &container.contents {
                records.insert(content.name.clone(), content.to_record());
                stack.push(content);
            }
        }
    }
    ItemsDocument {
        items: records.into_values().collect(),
    }
}

/// Write both save documents into `dir`, creating it if needed.
///
/// # Errors
/// - on serialization or file-system failures
pub fn save_game(dir: &Path, world: &World, catalog: &ItemCatalog) -> Result<(), PersistenceError> {
    fs::create_dir_all(dir).map_err(|source| PersistenceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    write_ron(&dir.join(WORLD_FILE), &world_document(world)?)?;
    write_ron(&dir.join(ITEMS_FILE), &items_document(world, catalog))?;
    info!("game saved to {}", dir.display());
    Ok(())
}

fn write_ron<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let text = ron::ser::to_string_pretty(value, PrettyConfig::default())?;
    fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the save in `dir`.
///
/// Returns `Ok(None)` when the world document is missing or empty. A
/// missing or empty items document just means there are no extra items.
///
/// # Errors
/// - if either document cannot be read or parsed, or refers to rooms or
///   items that do not exist
pub fn load_game(dir: &Path) -> Result<Option<LoadedGame>, PersistenceError> {
    let world_path = dir.join(WORLD_FILE);
    let Some(text) = read_optional(&world_path)? else {
        info!("no saved game in {}", dir.display());
        return Ok(None);
    };
    let document: WorldDocument = parse_ron(&world_path, &text)?;

    let items_path = dir.join(ITEMS_FILE);
    let extra = match read_optional(&items_path)? {
        Some(text) => parse_ron(&items_path, &text)?,
        None => ItemsDocument::default(),
    };

    let loaded = reconcile(document, extra)?;
    info!("game loaded from {}", dir.display());
    Ok(Some(loaded))
}

fn read_optional(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_ron<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T, PersistenceError> {
    ron::from_str(text).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Rebuild one canonical world from deserialized documents.
///
/// Connections are walked in order. The first snapshot of each room name
/// becomes the canonical room and its items are harvested; later snapshots
/// of the same room are dropped. The current room resolves by name. Item
/// definitions are merged from the inventory, the canonical rooms, then the
/// items document, later definitions replacing earlier ones; container
/// contents are rebuilt from that merged map.
///
/// # Errors
/// - [`PersistenceError::UnknownItem`] if a container names an item with no
///   definition
/// - [`PersistenceError::NestingTooDeep`] on runaway container nesting
/// - [`PersistenceError::DuplicateItem`] if one item lies in two rooms, or
///   in a room and the inventory
pub fn reconcile(document: WorldDocument, extra: ItemsDocument) -> Result<LoadedGame, PersistenceError> {
    if document.version != ASHEN_VERSION {
        warn!(
            "save was written by version '{}', this is {ASHEN_VERSION}; loading anyway",
            document.version
        );
    }

    let mut records: BTreeMap<String, ItemRecord> = BTreeMap::new();
    harvest(&mut records, &document.inventory);

    let mut seen: HashSet<String> = HashSet::new();
    let mut canonical: Vec<RoomSnapshot> = Vec::new();
    let mut edges = Vec::with_capacity(document.connections.len());
    for conn in document.connections {
        for snapshot in [&conn.starting_room, &conn.arriving_room] {
            if seen.insert(snapshot.name.clone()) {
                harvest(&mut records, &snapshot.items);
                canonical.push(snapshot.clone());
            }
        }
        edges.push((conn.starting_room.name, conn.arriving_room.name, conn.direction, conn.locked));
    }

    let current = document.current_room;
    if seen.insert(current.name.clone()) {
        warn!("current room '{}' has no connections; keeping its own snapshot", current.name);
        harvest(&mut records, &current.items);
        canonical.push(current.clone());
    }

    harvest(&mut records, &extra.items);
    check_placements(canonical.iter().map(|snapshot| &snapshot.items).chain([&document.inventory]))?;

    let mut world = World::new();
    for snapshot in canonical {
        let items = hydrate_all(&snapshot.items, &records)?;
        let room = Room {
            name: snapshot.name,
            description: snapshot.description,
            items,
        };
        let name = room.name.clone();
        world.add_room(room).map_err(|_| PersistenceError::UnknownRoom(name))?;
    }
    for (from, to, direction, locked) in edges {
        world
            .connect(&from, &to, direction, locked)
            .map_err(|_| PersistenceError::UnknownRoom(format!("{from} -> {to}")))?;
    }
    world
        .set_current_room(&current.name)
        .map_err(|_| PersistenceError::UnknownRoom(current.name.clone()))?;
    for item in hydrate_all(&document.inventory, &records)? {
        world.add_to_inventory(item);
    }

    let items = records
        .values()
        .map(|record| hydrate(record, &records, 0).map(|item| (record.name.clone(), item)))
        .collect::<Result<ItemCatalog, _>>()?;

    Ok(LoadedGame { world, items })
}

fn harvest(records: &mut BTreeMap<String, ItemRecord>, items: &[ItemRecord]) {
    for record in items {
        records.insert(record.name.clone(), record.clone());
    }
}

/// Every item lies in at most one room or the inventory.
fn check_placements<'a>(places: impl IntoIterator<Item = &'a Vec<ItemRecord>>) -> Result<(), PersistenceError> {
    let mut placed = HashSet::new();
    for record in places.into_iter().flatten() {
        if !placed.insert(record.name.to_lowercase()) {
            return Err(PersistenceError::DuplicateItem(record.name.clone()));
        }
    }
    Ok(())
}

fn hydrate_all(items: &[ItemRecord], records: &BTreeMap<String, ItemRecord>) -> Result<Vec<Item>, PersistenceError> {
    items.iter().map(|record| hydrate(record, records, 0)).collect()
}

fn hydrate(record: &ItemRecord, records: &BTreeMap<String, ItemRecord>, depth: usize) -> Result<Item, PersistenceError> {
    if depth > MAX_NESTING {
        return Err(PersistenceError::NestingTooDeep(record.name.clone()));
    }
    let container = match &record.container {
        None => None,
        Some(saved) => {
            let contents = saved
                .contents
                .iter()
                .map(|name| -> Result<Item, PersistenceError> {
                    let child = records
                        .get(name)
                        .ok_or_else(|| PersistenceError::UnknownItem(name.clone()))?;
                    hydrate(child, records, depth + 1)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(Container {
                open: saved.open,
                contents,
            })
        },
    };
    Ok(Item {
        name: record.name.clone(),
        aliases: record.aliases.clone(),
        description: record.description.clone(),
        pickable: record.pickable,
        container,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemHolder;
    use crate::scenario::house_of_ash;
    use anyhow::Result;
    use ashen_data::{ContainerRecord, Direction};
    use tempfile::tempdir;

    fn snapshot(name: &str, items: Vec<ItemRecord>) -> RoomSnapshot {
        RoomSnapshot {
            name: name.into(),
            description: format!("{name} description"),
            items,
        }
    }

    fn record(name: &str) -> ItemRecord {
        Item::new(name, "", true, &[]).to_record()
    }

    fn connection(from: RoomSnapshot, to: RoomSnapshot, direction: Direction) -> ConnectionRecord {
        ConnectionRecord {
            starting_room: from,
            arriving_room: to,
            direction,
            locked: false,
        }
    }

    #[test]
    fn missing_directory_means_no_save() -> Result<()> {
        let dir = tempdir()?;
        assert!(load_game(&dir.path().join("nothing"))?.is_none());
        assert!(!save_exists(dir.path()));
        Ok(())
    }

    #[test]
    fn empty_world_file_means_no_save() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(WORLD_FILE), "  \n")?;
        assert!(load_game(dir.path())?.is_none());
        Ok(())
    }

    #[test]
    fn malformed_world_file_is_a_parse_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(WORLD_FILE), "(current_room: ")?;
        assert!(matches!(load_game(dir.path()), Err(PersistenceError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn malformed_items_file_is_a_parse_error() -> Result<()> {
        let dir = tempdir()?;
        let scenario = house_of_ash()?;
        save_game(dir.path(), &scenario.world, &scenario.catalog)?;
        fs::write(dir.path().join(ITEMS_FILE), "(items: [ (name: ")?;
        assert!(matches!(load_game(dir.path()), Err(PersistenceError::Parse { .. })));
        Ok(())
    }

    #[test]
    fn first_snapshot_of_a_room_wins() -> Result<()> {
        let hall_first = snapshot("Hall", vec![record("Candle")]);
        let hall_stale = snapshot("Hall", vec![record("Ghost")]);
        let salon = snapshot("Salon", vec![]);
        let document = WorldDocument {
            version: ASHEN_VERSION.into(),
            current_room: snapshot("Hall", vec![]),
            connections: vec![
                connection(hall_first, salon.clone(), Direction::North),
                connection(salon, hall_stale, Direction::South),
            ],
            inventory: vec![],
        };
        let loaded = reconcile(document, ItemsDocument::default())?;
        let hall = loaded.world.current_room()?;
        assert!(hall.find_item("candle").is_some());
        assert!(hall.find_item("ghost").is_none());
        assert_eq!(loaded.world.rooms().count(), 2);
        assert_eq!(loaded.world.connections.len(), 2);
        Ok(())
    }

    #[test]
    fn items_document_overrides_and_fills_containers() -> Result<()> {
        let mut chest = record("Chest");
        chest.pickable = false;
        chest.container = Some(ContainerRecord {
            open: false,
            contents: vec!["Amulet".into()],
        });
        let mut amulet = record("Amulet");
        amulet.description = "shiny".into();
        let document = WorldDocument {
            version: ASHEN_VERSION.into(),
            current_room: snapshot("Vault", vec![]),
            connections: vec![connection(
                snapshot("Vault", vec![chest]),
                snapshot("Hall", vec![record("Amulet")]),
                Direction::West,
            )],
            inventory: vec![],
        };
        let loaded = reconcile(document, ItemsDocument { items: vec![amulet] })?;
        let vault = loaded.world.current_room()?;
        let held = vault.find_item("chest").and_then(|c| c.container.as_ref()).map(|c| c.contents.clone());
        let held = held.unwrap_or_default();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].description, "shiny");
        assert_eq!(loaded.items.get("Amulet").map(|i| i.description.as_str()), Some("shiny"));
        Ok(())
    }

    #[test]
    fn dangling_container_content_is_an_error() {
        let mut chest = record("Chest");
        chest.container = Some(ContainerRecord {
            open: true,
            contents: vec!["Nothing".into()],
        });
        let document = WorldDocument {
            version: ASHEN_VERSION.into(),
            current_room: snapshot("Vault", vec![chest]),
            connections: vec![],
            inventory: vec![],
        };
        assert!(matches!(
            reconcile(document, ItemsDocument::default()),
            Err(PersistenceError::UnknownItem(name)) if name == "Nothing"
        ));
    }

    #[test]
    fn item_carried_and_lying_in_a_room_is_rejected() {
        let document = WorldDocument {
            version: ASHEN_VERSION.into(),
            current_room: snapshot("Hall", vec![]),
            connections: vec![connection(
                snapshot("Hall", vec![record("Candela")]),
                snapshot("Salon", vec![]),
                Direction::North,
            )],
            inventory: vec![record("Candela")],
        };
        assert!(matches!(
            reconcile(document, ItemsDocument::default()),
            Err(PersistenceError::DuplicateItem(name)) if name == "Candela"
        ));
    }

    #[test]
    fn item_lying_in_two_rooms_is_rejected() {
        let document = WorldDocument {
            version: ASHEN_VERSION.into(),
            current_room: snapshot("Hall", vec![]),
            connections: vec![connection(
                snapshot("Hall", vec![record("Key")]),
                snapshot("Salon", vec![record("key")]),
                Direction::North,
            )],
            inventory: vec![],
        };
        assert!(matches!(
            reconcile(document, ItemsDocument::default()),
            Err(PersistenceError::DuplicateItem(name)) if name == "key"
        ));
    }

    #[test]
    fn self_containing_container_is_rejected() {
        let mut bag = record("Bag");
        bag.container = Some(ContainerRecord {
            open: true,
            contents: vec!["Bag".into()],
        });
        let document = WorldDocument {
            version: ASHEN_VERSION.into(),
            current_room: snapshot("Vault", vec![bag]),
            connections: vec![],
            inventory: vec![],
        };
        assert!(matches!(
            reconcile(document, ItemsDocument::default()),
            Err(PersistenceError::NestingTooDeep(_))
        ));
    }

    #[test]
    fn isolated_current_room_is_kept() -> Result<()> {
        let document = WorldDocument {
            version: "0.0.1".into(),
            current_room: snapshot("Cell", vec![record("Spoon")]),
            connections: vec![],
            inventory: vec![record("Key")],
        };
        let loaded = reconcile(document, ItemsDocument::default())?;
        assert_eq!(loaded.world.current_room_name(), "Cell");
        assert!(loaded.world.current_room()?.find_item("spoon").is_some());
        assert!(loaded.world.inventory.find_item("key").is_some());
        assert_eq!(loaded.items.len(), 2);
        Ok(())
    }

    #[test]
    fn items_document_holds_only_unplaced_items() -> Result<()> {
        let scenario = house_of_ash()?;
        let names: Vec<String> = items_document(&scenario.world, &scenario.catalog)
            .items
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Amuleto".to_string()]);
        Ok(())
    }

    #[test]
    fn scenario_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let scenario = house_of_ash()?;
        save_game(dir.path(), &scenario.world, &scenario.catalog)?;
        assert!(save_exists(dir.path()));
        let loaded = load_game(dir.path())?.ok_or_else(|| anyhow::anyhow!("save vanished"))?;
        assert_eq!(loaded.world.current_room_name(), "Stanza1");
        assert_eq!(loaded.world.inventory, scenario.world.inventory);
        assert_eq!(loaded.world.connections, scenario.world.connections);
        assert_eq!(loaded.world.rooms().count(), 5);
        assert_eq!(loaded.items.len(), scenario.catalog.len());
        let chest = loaded.world.room("Stanza2").and_then(|r| r.find_item("scrigno")).cloned();
        assert!(chest.is_some_and(|c| c.holds("amuleto")));
        Ok(())
    }
}
