#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const ASHEN_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod actions;
pub mod command;
pub mod config;
pub mod data_paths;
pub mod dispatch;
pub mod flow;
pub mod input;
pub mod item;
pub mod lookup;
pub mod mirror;
pub mod narration;
pub mod parser;
pub mod puzzle;
pub mod room;
pub mod save_files;
pub mod scenario;
pub mod session;
pub mod style;
pub mod view;
pub mod world;

// Re-exports for convenience
pub use command::{ParsedCommand, Verb};
pub use dispatch::Dispatcher;
pub use flow::{FlowState, InputBuffer};
pub use item::{Container, Item, ItemCatalog, ItemHolder};
pub use lookup::{DescriptionLookup, DescriptionTable, LookupKey};
pub use narration::{Narrator, RecordingNarrator, TerminalNarrator};
pub use parser::Parser;
pub use room::{Room, RoomConnection};
pub use session::{GameContext, GameSession, SessionControl};
pub use view::{View, ViewItem};
pub use world::World;

pub use ashen_data::Direction;
