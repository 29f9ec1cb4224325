//! View module.
//! Handlers don't print. They push [`ViewItem`]s into a [`View`] during the
//! turn, and the view hands the finished lines to a [`Narrator`] at the end.
use std::fmt::Write;

use variantly::Variantly;

use crate::narration::Narrator;
use crate::style::GameStyle;

const ICON_SUCCESS: &str = "\u{2611}"; // ✔
const ICON_FAILURE: &str = "\u{274C}"; // ✖
const ICON_ERROR: &str = "⚠︎"; // U+26A0 U+FE0E
const ICON_ENGINE: &str = "⚙";

/// Everything a single turn wants to say to the player.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub items: Vec<ViewItem>,
    /// Apply ANSI styling and icons when rendering.
    pub styled: bool,
}

impl View {
    /// Create a new empty, unstyled view.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(styled: bool) -> Self {
        Self {
            items: Vec::new(),
            styled,
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Plain text of every queued item, in order.
    pub fn texts(&self) -> Vec<String> {
        self.items.iter().map(ViewItem::text).collect()
    }

    /// Send queued items to `narrator` and clear the view.
    pub fn flush(&mut self, narrator: &dyn Narrator) {
        for item in self.items.drain(..) {
            match item {
                ViewItem::Echo(line) => narrator.echo(&line),
                other => narrator.narrate(&other.render(self.styled)),
            }
        }
    }
}

/// `ViewItems` are each of the kinds of message a turn can produce.
#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum ViewItem {
    /// Text from the description table.
    Narration(String),
    ActionSuccess(String),
    ActionFailure(String),
    EngineMessage(String),
    Error(String),
    Inventory(Vec<String>),
    /// The player's own input, shown without pacing.
    Echo(String),
}

impl ViewItem {
    /// Unstyled text of this item.
    pub fn text(&self) -> String {
        match self {
            ViewItem::Narration(text)
            | ViewItem::ActionSuccess(text)
            | ViewItem::ActionFailure(text)
            | ViewItem::EngineMessage(text)
            | ViewItem::Error(text)
            | ViewItem::Echo(text) => text.clone(),
            ViewItem::Inventory(names) => inventory_text(names),
        }
    }

    fn render(&self, styled: bool) -> String {
        if !styled {
            return self.text();
        }
        match self {
            ViewItem::Narration(text) => text.narration_style().to_string(),
            ViewItem::ActionSuccess(text) => format!("{} {}", ICON_SUCCESS.success_style(), text),
            ViewItem::ActionFailure(text) => format!("{} {}", ICON_FAILURE, text.denied_style()),
            ViewItem::EngineMessage(text) => format!("{} {}", ICON_ENGINE.engine_style(), text.engine_style()),
            ViewItem::Error(text) => format!("{} {}", ICON_ERROR.error_style(), text.error_style()),
            ViewItem::Echo(text) => text.echo_style().to_string(),
            ViewItem::Inventory(names) => {
                if names.is_empty() {
                    return inventory_text(names).denied_style().to_string();
                }
                let mut out = String::from("Inventory:");
                for name in names {
                    let _ = write!(out, "\n  - {}", name.item_style());
                }
                out
            },
        }
    }
}

fn inventory_text(names: &[String]) -> String {
    if names.is_empty() {
        return "You are empty-handed.".to_string();
    }
    let mut out = String::from("Inventory:");
    for name in names {
        let _ = write!(out, "\n  - {name}");
    }
    out
}
