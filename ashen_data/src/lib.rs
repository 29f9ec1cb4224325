//! Shared data model for Ashen content and save files.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_descriptions};
