//! Item types and related helpers.
//!
//! Items are identified by their name plus their alias set, both compared
//! without regard to case. Some items are containers that hold other items
//! one level deep and may be opened.

use ashen_data::{ContainerRecord, ItemRecord};

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// Every item known to a scenario, keyed by name.
pub type ItemCatalog = BTreeMap<String, Item>;

/// Anything in the world the player can look at, carry, or use.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub pickable: bool,
    /// Container state, or `None` for an ordinary item.
    pub container: Option<Container>,
}

/// Contents and open/closed state of a container item.
#[derive(Debug, Clone, Default)]
pub struct Container {
    pub open: bool,
    pub contents: Vec<Item>,
}

impl Item {
    /// Create an ordinary item.
    pub fn new(name: &str, description: &str, pickable: bool, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            description: description.to_string(),
            pickable,
            container: None,
        }
    }

    /// Create a closed, non-pickable container holding `contents`.
    pub fn new_container(name: &str, description: &str, aliases: &[&str], contents: Vec<Item>) -> Self {
        let mut item = Self::new(name, description, false, aliases);
        item.container = Some(Container { open: false, contents });
        item
    }

    /// True if `candidate` matches the name or any alias, ignoring case.
    pub fn has_name(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        self.name.to_lowercase() == candidate
            || self.aliases.iter().any(|alias| alias.to_lowercase() == candidate)
    }

    /// True if this is a container with a direct content matching `name`.
    pub fn holds(&self, name: &str) -> bool {
        self.container
            .as_ref()
            .is_some_and(|c| c.contents.iter().any(|content| content.has_name(name)))
    }

    /// Remove and return the first direct content matching `name`.
    pub fn take_content(&mut self, name: &str) -> Option<Item> {
        let container = self.container.as_mut()?;
        let idx = container.contents.iter().position(|content| content.has_name(name))?;
        Some(container.contents.remove(idx))
    }

    /// Lower-cased name and alias set used for equality and hashing.
    fn identity(&self) -> (String, BTreeSet<String>) {
        (
            self.name.to_lowercase(),
            self.aliases.iter().map(|a| a.to_lowercase()).collect(),
        )
    }

    /// Convert to the on-disk form. Container contents are written by name.
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            name: self.name.clone(),
            description: self.description.clone(),
            aliases: self.aliases.clone(),
            pickable: self.pickable,
            container: self.container.as_ref().map(|c| ContainerRecord {
                open: c.open,
                contents: c.contents.iter().map(|item| item.name.clone()).collect(),
            }),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

/// Methods common to anything that holds a list of items.
///
/// Holders never keep two equal items.
pub trait ItemHolder {
    fn items(&self) -> &[Item];
    fn items_mut(&mut self) -> &mut Vec<Item>;

    fn add_item(&mut self, item: Item) {
        if !self.contains_item(&item) {
            self.items_mut().push(item);
        }
    }

    fn remove_item(&mut self, item: &Item) -> Option<Item> {
        let idx = self.items().iter().position(|held| held == item)?;
        Some(self.items_mut().remove(idx))
    }

    fn contains_item(&self, item: &Item) -> bool {
        self.items().iter().any(|held| held == item)
    }

    /// First held item answering to `name`.
    fn find_item(&self, name: &str) -> Option<&Item> {
        self.items().iter().find(|held| held.has_name(name))
    }
}

impl ItemHolder for Vec<Item> {
    fn items(&self) -> &[Item] {
        self
    }
    fn items_mut(&mut self) -> &mut Vec<Item> {
        self
    }
}

impl ItemHolder for Container {
    fn items(&self) -> &[Item] {
        &self.contents
    }
    fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn candle() -> Item {
        Item::new("Candela", "A worn candle.", true, &["Lume", "Luce"])
    }

    #[test]
    fn has_name_matches_name_and_aliases_case_insensitively() {
        let item = candle();
        assert!(item.has_name("candela"));
        assert!(item.has_name("LUME"));
        assert!(!item.has_name("fiamma"));
    }

    #[test]
    fn equality_ignores_description_and_flags() {
        let mut other = candle();
        other.description = "different".into();
        other.pickable = false;
        assert_eq!(candle(), other);

        let mut set = HashSet::new();
        set.insert(candle());
        assert!(set.contains(&other));
    }

    #[test]
    fn equality_considers_alias_set() {
        let mut other = candle();
        other.aliases.push("Cero".into());
        assert_ne!(candle(), other);

        let mut reordered = candle();
        reordered.aliases.reverse();
        assert_eq!(candle(), reordered);
    }

    #[test]
    fn container_take_content_removes_one_level() {
        let amulet = Item::new("Amuleto", "Silver.", true, &["Ciondolo"]);
        let mut chest = Item::new_container("Scrigno", "Old chest.", &["Baule"], vec![amulet.clone()]);
        assert!(chest.holds("ciondolo"));
        assert!(!chest.pickable);
        assert_eq!(chest.take_content("amuleto"), Some(amulet));
        assert!(!chest.holds("amuleto"));
        assert!(chest.take_content("amuleto").is_none());
    }

    #[test]
    fn holder_does_not_duplicate() {
        let mut held: Vec<Item> = Vec::new();
        held.add_item(candle());
        held.add_item(candle());
        assert_eq!(held.len(), 1);
        assert!(held.remove_item(&candle()).is_some());
        assert!(held.is_empty());
    }

    #[test]
    fn to_record_writes_contents_by_name() {
        let chest = Item::new_container("Scrigno", "", &[], vec![candle()]);
        let record = chest.to_record();
        let container = record.container.expect("container record");
        assert_eq!(container.contents, vec!["Candela".to_string()]);
        assert!(!container.open);
    }
}
