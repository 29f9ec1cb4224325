//! Command module
//!
//! The verb vocabulary and the structured command produced by the parser.
use ashen_data::Direction;
use variantly::Variantly;

use crate::item::Item;

/// Verbs the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Variantly)]
pub enum Verb {
    North,
    South,
    East,
    West,
    Look,
    Take,
    Use,
    Drop,
    Inventory,
    Help,
    Save,
    Load,
    Quit,
}

impl Verb {
    pub const ALL: [Verb; 13] = [
        Verb::North,
        Verb::South,
        Verb::East,
        Verb::West,
        Verb::Look,
        Verb::Take,
        Verb::Use,
        Verb::Drop,
        Verb::Inventory,
        Verb::Help,
        Verb::Save,
        Verb::Load,
        Verb::Quit,
    ];

    /// Words the player may type for this verb. The first word is the
    /// canonical one shown in help.
    pub fn words(self) -> &'static [&'static str] {
        match self {
            Verb::North => &["nord", "n", "north"],
            Verb::South => &["sud", "s", "south"],
            Verb::East => &["est", "e", "east"],
            Verb::West => &["ovest", "o", "west", "w"],
            Verb::Look => &["osserva", "guarda", "esamina", "look", "examine", "l"],
            Verb::Take => &["prendi", "raccogli", "take", "get", "pick"],
            Verb::Use => &["usa", "utilizza", "use"],
            Verb::Drop => &["lascia", "posa", "drop"],
            Verb::Inventory => &["inventario", "inv", "i", "inventory"],
            Verb::Help => &["aiuto", "help", "?"],
            Verb::Save => &["salva", "save"],
            Verb::Load => &["carica", "load"],
            Verb::Quit => &["esci", "quit", "exit"],
        }
    }

    /// One-line summary used by the help listing.
    pub fn summary(self) -> &'static str {
        match self {
            Verb::North | Verb::South | Verb::East | Verb::West => "walk through a passage",
            Verb::Look => "describe the room, or an item when one is named",
            Verb::Take => "pick up an item, also from inside a container",
            Verb::Use => "use an item, or use one item with another",
            Verb::Drop => "leave an item in the room",
            Verb::Inventory => "list what you are carrying",
            Verb::Help => "show this list",
            Verb::Save => "save the game",
            Verb::Load => "load the saved game",
            Verb::Quit => "leave the game",
        }
    }

    /// The compass direction a movement verb walks, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Verb::North => Some(Direction::North),
            Verb::South => Some(Direction::South),
            Verb::East => Some(Direction::East),
            Verb::West => Some(Direction::West),
            _ => None,
        }
    }
}

/// Result of parsing one line of player input.
///
/// `args` is the number of object words actually typed, which may differ
/// from the number the verb expects. Item slots hold copies of the resolved
/// items and stay `None` when a word did not match anything visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCommand {
    pub verb: Option<Verb>,
    pub args: usize,
    pub item1: Option<Item>,
    pub item2: Option<Item>,
    /// Object words as typed, for messages about unresolved items.
    pub words: Vec<String>,
}

impl ParsedCommand {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb: Some(verb),
            ..Self::default()
        }
    }

    /// The typed word for object slot `idx`, or an empty string.
    pub fn word(&self, idx: usize) -> &str {
        self.words.get(idx).map_or("", String::as_str)
    }
}
