use std::collections::HashSet;
use std::fmt;

use crate::DescriptionDef;

const FIELD_NAMES: [&str; 5] = ["action", "room", "state", "object1", "object2"];

/// Problems found in a description table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateKey { key: String },
    BlankField { row: usize, field: &'static str },
    UntrimmedField { row: usize, field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateKey { key } => write!(f, "duplicate description key {key}"),
            ValidationError::BlankField { row, field } => write!(f, "row {row}: field '{field}' is blank"),
            ValidationError::UntrimmedField { row, field } => {
                write!(f, "row {row}: field '{field}' has surrounding whitespace")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a description table: every key field and the text must be
/// non-blank, key fields must already be trimmed, and no two rows may share
/// a key.
///
/// ```
/// use ashen_data::{DescriptionDef, validate_descriptions};
///
/// let row = DescriptionDef {
///     action: "Osserva".into(),
///     room: "Stanza1".into(),
///     state: "true".into(),
///     object1: "0".into(),
///     object2: "0".into(),
///     text: "A dusty hall.".into(),
/// };
/// assert!(validate_descriptions(&[row]).is_empty());
/// ```
pub fn validate_descriptions(rows: &[DescriptionDef]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (row, def) in rows.iter().enumerate() {
        for (field, value) in FIELD_NAMES.iter().zip(def.key_fields()) {
            if value.trim().is_empty() {
                errors.push(ValidationError::BlankField { row, field });
            } else if value.trim() != value {
                errors.push(ValidationError::UntrimmedField { row, field });
            }
        }
        if def.text.trim().is_empty() {
            errors.push(ValidationError::BlankField { row, field: "text" });
        }

        let key = format!("({})", def.key_fields().join(", "));
        if !seen.insert(key.clone()) {
            errors.push(ValidationError::DuplicateKey { key });
        }
    }

    errors
}
