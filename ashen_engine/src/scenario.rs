//! "The House of Ash": the five-room scenario shipped with the engine.
//!
//! Builds the world, the item catalog and the rule book. Rooms are named
//! `Stanza1` through `Stanza5` and items keep their Italian names; the
//! description table is keyed on those names.

use anyhow::{Context, Result};
use ashen_data::Direction;

use crate::item::{Item, ItemCatalog};
use crate::lookup::{DescriptionTable, LookupKey};
use crate::mirror::MirrorPuzzle;
use crate::puzzle::{CombineRule, ContainerPickupRule, Effect, EndGameRule, PickupRule, Precondition, RuleBook, UseRule};
use crate::room::Room;
use crate::world::World;

/// The description table compiled into the binary.
pub const BUILTIN_DESCRIPTIONS: &str = include_str!("../data/descriptions.ron");

/// A ready-to-play world with its catalog and rules.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub world: World,
    pub catalog: ItemCatalog,
    pub rules: RuleBook,
}

/// Parse the built-in description table.
///
/// # Errors
/// - if the embedded table is malformed
pub fn builtin_descriptions() -> Result<DescriptionTable> {
    DescriptionTable::from_ron(BUILTIN_DESCRIPTIONS).context("parsing built-in descriptions")
}

fn telefono() -> Item {
    Item::new(
        "Telefono",
        "Your phone, ready to use.",
        true,
        &["Telefonino", "Cellulare", "Phone"],
    )
}

fn fiammiferi() -> Item {
    Item::new(
        "Fiammiferi",
        "A box of dry matches.",
        true,
        &["Fiammifero", "ScatolaFiammiferi", "Accendino"],
    )
}

fn amuleto() -> Item {
    Item::new(
        "Amuleto",
        "A silver amulet shaped like a teardrop.",
        true,
        &["Ciondolo", "Pendente", "Collana", "Protezione"],
    )
}

/// Build the House of Ash.
///
/// # Errors
/// - only if the layout below is internally inconsistent
pub fn house_of_ash() -> Result<Scenario> {
    let tavolo = Item::new(
        "Tavolo",
        "A small table with a candle and a folded sheet of paper on it.",
        false,
        &["Tavolino", "Banco", "Scrivania"],
    );
    let candela = Item::new("Candela", "An unlit candle, worn down by time.", true, &["Lume", "Luce", "Fiamma"]);
    let foglio = Item::new(
        "Foglio",
        "A sheet with a clue: 'Northward, the light finds what the shadow hides.'",
        true,
        &["Foglietto", "Indizio", "Carta", "Pagina"],
    );
    let camino = Item::new(
        "Camino",
        "A large blackened fireplace. An old key rests on top of it.",
        false,
        &["Caminetto", "Fuoco", "Focolare"],
    );
    let tappeto = Item::new(
        "Tappeto",
        "A threadbare rug. A chest lies on it.",
        false,
        &["Tappetino", "Stuoia"],
    );
    let chiave = Item::new("Chiave", "An old iron key.", true, &["Chiavetta", "ChiaveFerro"]);
    let scrigno = Item::new_container(
        "Scrigno",
        "An ancient chest with a rusty lock.",
        &["Cassetta", "Cofanetto", "Baule", "Cassa"],
        vec![amuleto()],
    );
    let scaffale = Item::new(
        "Scaffale",
        "A shelf of burnt books. One diary seems intact.",
        false,
        &["Ripiano", "Mensola", "Palchetto"],
    );
    let diario = Item::new(
        "Diario",
        "A diary full of symbols and instructions for a ritual.",
        true,
        &["Libro", "Quaderno", "Manoscritto", "Memoria"],
    );
    let altare = Item::new("Altare", "A stone altar bearing an inscription.", false, &["Tavolo", "Piattaforma"]);

    let catalog: ItemCatalog = [
        telefono(),
        fiammiferi(),
        tavolo.clone(),
        candela.clone(),
        foglio.clone(),
        camino.clone(),
        tappeto.clone(),
        chiave.clone(),
        scrigno.clone(),
        amuleto(),
        scaffale.clone(),
        diario.clone(),
        altare.clone(),
    ]
    .into_iter()
    .map(|item| (item.name.clone(), item))
    .collect();

    let mut world = World::new();
    world.add_room(Room::new("Stanza1", "Entrance of the house").with_items(vec![tavolo, foglio, candela]))?;
    world.add_room(Room::new("Stanza2", "Hall with a fireplace").with_items(vec![camino, tappeto, chiave, scrigno]))?;
    world.add_room(Room::new("Stanza3", "Library").with_items(vec![scaffale, diario]))?;
    world.add_room(Room::new("Stanza4", "Room of mirrors"))?;
    world.add_room(Room::new("Stanza5", "Final crypt").with_items(vec![altare]))?;

    for (from, to, direction) in [
        ("Stanza1", "Stanza2", Direction::North),
        ("Stanza2", "Stanza3", Direction::East),
        ("Stanza3", "Stanza4", Direction::North),
        ("Stanza4", "Stanza5", Direction::North),
    ] {
        world.connect(from, to, direction, true)?;
        world.connect(to, from, direction.opposite(), false)?;
    }
    world.set_current_room("Stanza1")?;
    world.add_to_inventory(telefono());
    world.add_to_inventory(fiammiferi());

    Ok(Scenario {
        world,
        catalog,
        rules: rules(),
    })
}

fn unlock(a: &str, b: &str) -> Effect {
    Effect::UnlockPair {
        a: a.to_string(),
        b: b.to_string(),
    }
}

fn rules() -> RuleBook {
    RuleBook {
        pickups: vec![
            PickupRule {
                item: "Diario".into(),
                room: "Stanza3".into(),
                effects: vec![unlock("Stanza3", "Stanza4")],
            },
            PickupRule {
                item: "Amuleto".into(),
                room: "Stanza2".into(),
                effects: vec![unlock("Stanza2", "Stanza3")],
            },
        ],
        // Reaching into the closed chest has the same outcome as taking
        // the spilled amulet, so the library never becomes unreachable.
        container_pickups: vec![ContainerPickupRule {
            item: "Amuleto".into(),
            container: "Scrigno".into(),
            effects: vec![unlock("Stanza2", "Stanza3")],
        }],
        gates: Vec::new(),
        uses: vec![UseRule {
            item: "Telefono".into(),
            room: "Stanza4".into(),
            effects: vec![Effect::StartMirrorPuzzle],
        }],
        combines: vec![
            CombineRule {
                item: "Fiammiferi".into(),
                target: "Candela".into(),
                room: "Stanza1".into(),
                precondition: Precondition::TargetInInventory,
                effects: vec![
                    Effect::ConsumeFirst,
                    Effect::Describe(LookupKey::usage("Stanza1", "Fiammiferi", Some("Candela"))),
                    unlock("Stanza1", "Stanza2"),
                ],
            },
            CombineRule {
                item: "Chiave".into(),
                target: "Scrigno".into(),
                room: "Stanza2".into(),
                precondition: Precondition::TargetIsFilledContainerInRoom,
                effects: vec![
                    Effect::OpenContainer {
                        container: "Scrigno".into(),
                    },
                    Effect::ConsumeFirst,
                    Effect::Describe(LookupKey::usage("Stanza2", "Chiave", Some("Scrigno"))),
                ],
            },
        ],
        mirror: Some(MirrorPuzzle {
            riddle: "The phone's screen lights up and every mirror answers with the same glow. A voice whispers: \
                     'I copy your every move, yet I have no body. I live in glass and water, and I vanish in the \
                     dark. What am I?'"
                .into(),
            answers: vec!["riflesso".into(), "reflection".into(), "il riflesso".into(), "a reflection".into()],
            unlocks: ("Stanza4".into(), "Stanza5".into()),
            solved: "The mirrors shatter into dust of light. To the north, a stone door grinds open.".into(),
            wrong: "The mirrors stay dark. That is not the answer. (Type 'esci' to step away.)".into(),
            abandoned: "You lower the phone and the mirrors fall silent.".into(),
        }),
        end_game: Some(EndGameRule {
            room: "Stanza5".into(),
            items: vec!["Candela".into(), "Amuleto".into(), "Diario".into()],
            ending: "The candle flares as the amulet and the diary touch the altar. The ash that covers the house \
                     rises like smoke and drifts out through the cracks in the walls. Whoever was trapped here is \
                     finally free, and so are you. THE END."
                .into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemHolder;
    use crate::lookup::DescriptionLookup;

    #[test]
    fn layout_matches_the_house() -> Result<()> {
        let scenario = house_of_ash()?;
        let world = &scenario.world;
        assert_eq!(world.rooms().count(), 5);
        assert_eq!(world.connections.len(), 8);
        assert_eq!(world.current_room_name(), "Stanza1");
        let names: Vec<_> = world.inventory.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Telefono", "Fiammiferi"]);
        assert!(world.connections.iter().filter(|c| c.locked).all(|c| c.direction == Direction::North || c.direction == Direction::East));
        assert_eq!(world.connections.iter().filter(|c| c.locked).count(), 4);
        Ok(())
    }

    #[test]
    fn amulet_starts_in_the_chest() -> Result<()> {
        let scenario = house_of_ash()?;
        let salon = scenario.world.room("Stanza2").context("salon")?;
        assert!(salon.find_item("scrigno").is_some_and(|chest| chest.holds("amuleto")));
        assert!(scenario.catalog.contains_key("Amuleto"));
        assert_eq!(scenario.catalog.len(), 13);
        Ok(())
    }

    #[test]
    fn builtin_descriptions_cover_rooms_and_uses() -> Result<()> {
        let table = builtin_descriptions()?;
        for room in ["Stanza1", "Stanza2", "Stanza3", "Stanza4", "Stanza5"] {
            assert!(table.lookup(&LookupKey::room(room)).is_some(), "{room} has no description");
        }
        assert!(table.lookup(&LookupKey::intro("Stanza1")).is_some());
        assert!(table.lookup(&LookupKey::usage("Stanza1", "Fiammiferi", Some("Candela"))).is_some());
        assert!(table.lookup(&LookupKey::usage("Stanza2", "Chiave", Some("Scrigno"))).is_some());
        Ok(())
    }
}
