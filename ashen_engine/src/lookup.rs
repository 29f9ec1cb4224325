//! Canned narrative text addressed by a five-part key.
//!
//! The interpreter only depends on the [`DescriptionLookup`] trait. The
//! shipped [`DescriptionTable`] is loaded from a RON list of
//! [`DescriptionDef`] rows.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ashen_data::{DescriptionDef, ValidationError, validate_descriptions};
use log::{debug, info};
use thiserror::Error;

use crate::view::{View, ViewItem};

/// Action field used for room and item descriptions.
pub const ACTION_LOOK: &str = "Osserva";
/// Action field used for item-use narration.
pub const ACTION_USE: &str = "Usa";
/// Action field of the game introduction.
pub const ACTION_INTRO: &str = "0";
/// State field used by every shipped row.
pub const STATE_DEFAULT: &str = "true";
/// Placeholder for an unused object slot.
pub const NO_OBJECT: &str = "0";

/// Line narrated when the table has nothing to say.
pub const NO_DESCRIPTION: &str = "No description is available for that.";

/// Address of one row in the description table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub action: String,
    pub room: String,
    pub state: String,
    pub object1: String,
    pub object2: String,
}

impl LookupKey {
    pub fn new(action: &str, room: &str, state: &str, object1: &str, object2: &str) -> Self {
        Self {
            action: action.trim().to_string(),
            room: room.trim().to_string(),
            state: state.trim().to_string(),
            object1: object1.trim().to_string(),
            object2: object2.trim().to_string(),
        }
    }

    /// Description of a room.
    pub fn room(room: &str) -> Self {
        Self::new(ACTION_LOOK, room, STATE_DEFAULT, NO_OBJECT, NO_OBJECT)
    }

    /// Description of an item seen in a room.
    pub fn item(room: &str, item: &str) -> Self {
        Self::new(ACTION_LOOK, room, STATE_DEFAULT, item, NO_OBJECT)
    }

    /// Narration for using `first` (optionally with `second`) in a room.
    pub fn usage(room: &str, first: &str, second: Option<&str>) -> Self {
        Self::new(ACTION_USE, room, STATE_DEFAULT, first, second.unwrap_or(NO_OBJECT))
    }

    /// Introduction narrated when a new game starts in `room`.
    pub fn intro(room: &str) -> Self {
        Self::new(ACTION_INTRO, room, STATE_DEFAULT, NO_OBJECT, NO_OBJECT)
    }
}

/// Anything that can answer description queries.
pub trait DescriptionLookup: Send + Sync {
    /// Text for `key`, or `None` when no row matches exactly.
    fn lookup(&self, key: &LookupKey) -> Option<String>;
}

/// Errors raised while loading a description table.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unable to read description table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse description table: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("description table failed validation: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// In-memory description table.
#[derive(Debug, Clone, Default)]
pub struct DescriptionTable {
    rows: HashMap<LookupKey, String>,
}

impl DescriptionTable {
    /// Build a table from rows, rejecting duplicate keys and malformed fields.
    ///
    /// # Errors
    /// - [`LookupError::Invalid`] if any row fails validation
    pub fn from_defs(defs: Vec<DescriptionDef>) -> Result<Self, LookupError> {
        let problems = validate_descriptions(&defs);
        if !problems.is_empty() {
            return Err(LookupError::Invalid(problems));
        }
        let rows = defs
            .into_iter()
            .map(|def| {
                let key = LookupKey::new(&def.action, &def.room, &def.state, &def.object1, &def.object2);
                (key, def.text)
            })
            .collect();
        Ok(Self { rows })
    }

    /// Parse a table from RON text.
    ///
    /// # Errors
    /// - on RON syntax errors or failed validation
    pub fn from_ron(text: &str) -> Result<Self, LookupError> {
        let defs: Vec<DescriptionDef> = ron::from_str(text)?;
        Self::from_defs(defs)
    }

    /// Load a table from a RON file.
    ///
    /// # Errors
    /// - if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let text = fs::read_to_string(path).map_err(|source| LookupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_ron(&text)?;
        info!("loaded {} descriptions from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl DescriptionLookup for DescriptionTable {
    fn lookup(&self, key: &LookupKey) -> Option<String> {
        let hit = self.rows.get(key).cloned();
        if hit.is_none() {
            debug!("no description for {key:?}");
        }
        hit
    }
}

/// Narrate the text for `key`, or the generic line on a miss.
pub fn describe(lookup: &dyn DescriptionLookup, key: &LookupKey, view: &mut View) {
    let text = lookup.lookup(key).unwrap_or_else(|| NO_DESCRIPTION.to_string());
    view.push(ViewItem::Narration(text));
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"[
        (action: "Osserva", room: "Stanza1", state: "true", object1: "0", object2: "0", text: "A dusty hall."),
        (action: "Usa", room: "Stanza1", state: "true", object1: "Fiammiferi", object2: "Candela", text: "The candle flickers."),
    ]"#;

    #[test]
    fn lookup_matches_all_five_fields() {
        let table = DescriptionTable::from_ron(TABLE).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(&LookupKey::room("Stanza1")).as_deref(), Some("A dusty hall."));
        assert_eq!(
            table
                .lookup(&LookupKey::usage("Stanza1", "Fiammiferi", Some("Candela")))
                .as_deref(),
            Some("The candle flickers.")
        );
        assert!(table.lookup(&LookupKey::usage("Stanza1", "Candela", Some("Fiammiferi"))).is_none());
        assert!(table.lookup(&LookupKey::room("stanza1")).is_none());
    }

    #[test]
    fn key_fields_are_trimmed() {
        let table = DescriptionTable::from_ron(TABLE).unwrap();
        let key = LookupKey::new(" Osserva ", "Stanza1 ", "true", "0", " 0");
        assert!(table.lookup(&key).is_some());
    }

    #[test]
    fn miss_narrates_generic_line() {
        let table = DescriptionTable::default();
        let mut view = View::new();
        describe(&table, &LookupKey::room("Nowhere"), &mut view);
        assert_eq!(view.items, vec![ViewItem::Narration(NO_DESCRIPTION.to_string())]);
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let dup = r#"[
            (action: "Osserva", room: "Stanza1", state: "true", object1: "0", object2: "0", text: "one"),
            (action: "Osserva", room: "Stanza1", state: "true", object1: "0", object2: "0", text: "two"),
        ]"#;
        assert!(matches!(DescriptionTable::from_ron(dup), Err(LookupError::Invalid(_))));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(DescriptionTable::from_ron("[ (action: "), Err(LookupError::Parse(_))));
    }
}
