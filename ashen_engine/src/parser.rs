//! Turns a line of player input into a [`ParsedCommand`].
//!
//! The first word picks the verb. Remaining words, minus articles and
//! prepositions, are resolved against the items the player can see.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use log::debug;

use crate::command::{ParsedCommand, Verb};
use crate::world::World;

lazy_static! {
    /// Filler words skipped between objects ("use the key with the chest").
    static ref STOP_WORDS: HashSet<&'static str> = [
        "il", "lo", "la", "i", "gli", "le", "un", "uno", "una", "con", "su", "sul", "sulla", "sullo", "a", "al",
        "alla", "allo", "di", "del", "della", "dello", "da", "dal", "dalla", "in", "nel", "nella", "nello", "e",
        "the", "an", "with", "on", "at", "to", "from", "into", "up", "and",
    ]
    .into_iter()
    .collect();
}

/// Verb lookup table built from [`Verb::words`].
#[derive(Debug, Clone)]
pub struct Parser {
    vocabulary: HashMap<&'static str, Verb>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        let vocabulary = Verb::ALL
            .into_iter()
            .flat_map(|verb| verb.words().iter().map(move |word| (*word, verb)))
            .collect();
        Self { vocabulary }
    }

    /// Look up the verb for a single word, ignoring case.
    pub fn verb(&self, word: &str) -> Option<Verb> {
        self.vocabulary.get(word.to_lowercase().as_str()).copied()
    }

    /// Parse `input` against what is currently visible in `world`.
    ///
    /// An unknown first word yields a command with no verb. Object words that
    /// match nothing leave the corresponding item slot empty but still count
    /// toward `args`.
    pub fn parse(&self, world: &World, input: &str) -> ParsedCommand {
        let mut tokens = input.split_whitespace();
        let Some(first) = tokens.next() else {
            return ParsedCommand::default();
        };
        let Some(verb) = self.verb(first) else {
            debug!("no verb matches '{first}'");
            return ParsedCommand::default();
        };

        let words: Vec<String> = tokens
            .map(clean_token)
            .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word.to_lowercase().as_str()))
            .collect();

        let resolve = |idx: usize| words.get(idx).and_then(|word| world.resolve_visible(word)).cloned();
        let command = ParsedCommand {
            verb: Some(verb),
            args: words.len(),
            item1: resolve(0),
            item2: resolve(1),
            words: words.clone(),
        };
        debug!(
            "parsed {verb:?}/{} item1={:?} item2={:?}",
            command.args,
            command.item1.as_ref().map(|i| &i.name),
            command.item2.as_ref().map(|i| &i.name)
        );
        command
    }
}

/// Strip surrounding punctuation and an elided article ("l'altare").
fn clean_token(token: &str) -> String {
    let trimmed = token.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | ';' | ':' | '"'));
    match trimmed.rsplit_once(['\'', '’']) {
        Some((_, rest)) => rest.to_string(),
        None => trimmed.to_string(),
    }
}
