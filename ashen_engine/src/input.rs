//! Terminal line input.
//!
//! Uses `rustyline` with verb completion when stdin is a terminal, and a
//! plain stdin reader otherwise.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{debug, info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::Verb;

/// Outcome of reading a line.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

lazy_static! {
    static ref COMMAND_TERMS: Vec<&'static str> = {
        let mut terms: Vec<&'static str> = Verb::ALL
            .into_iter()
            .flat_map(|verb| verb.words().iter().copied())
            .filter(|word| word.len() > 1)
            .collect();
        terms.sort_unstable();
        terms
    };
}

type Editor = rustyline::Editor<AshenHelper, DefaultHistory>;

#[derive(Default)]
struct AshenHelper;

impl Helper for AshenHelper {}

impl Completer for AshenHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let slice = &line[..pos];
        // only the verb position is completed
        if slice.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = pos - slice.trim_start().len();
        let prefix = slice.trim_start().to_lowercase();
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        let pairs = COMMAND_TERMS
            .iter()
            .filter(|term| term.starts_with(&prefix))
            .map(|term| Pair {
                display: (*term).to_string(),
                replacement: (*term).to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for AshenHelper {
    type Hint = String;
}

impl Highlighter for AshenHelper {}

impl Validator for AshenHelper {}

/// Prompted line reader.
///
/// Holds a `rustyline` editor when stdin is a terminal. Without one, or
/// after the editor fails, lines come from plain stdin. History is kept in
/// memory and written out when the reader is dropped.
pub struct InputManager {
    editor: Option<Editor>,
    history: Option<PathBuf>,
}

impl InputManager {
    /// A reader whose history lives at `history`, or nowhere when `None`.
    pub fn new(history: Option<PathBuf>) -> Self {
        if !io::stdin().is_terminal() {
            info!("stdin is not a terminal; reading plain lines");
            return Self { editor: None, history: None };
        }
        let mut editor = match Editor::new() {
            Ok(editor) => editor,
            Err(err) => {
                warn!("line editor unavailable ({err}); reading plain lines");
                return Self { editor: None, history: None };
            },
        };
        editor.set_helper(Some(AshenHelper));
        if let Some(path) = &history
            && path.exists()
            && let Err(err) = editor.load_history(path)
        {
            warn!("history at {} not loaded: {err}", path.display());
        }
        Self {
            editor: Some(editor),
            history,
        }
    }

    /// Read one line. An editor failure drops to plain stdin for this and
    /// every later line.
    ///
    /// # Errors
    /// - if reading from stdin fails
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let Some(editor) = self.editor.as_mut() else {
            return read_plain(prompt);
        };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => return Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => return Ok(InputEvent::Eof),
            Err(err) => {
                warn!("line editor failed ({err}); reading plain lines");
                self.close_editor();
                return read_plain(prompt);
            },
        };
        if !line.trim().is_empty()
            && let Err(err) = editor.add_history_entry(line.as_str())
        {
            warn!("history entry dropped: {err}");
        }
        Ok(InputEvent::Line(line))
    }

    fn close_editor(&mut self) {
        let (Some(mut editor), Some(path)) = (self.editor.take(), self.history.as_ref()) else {
            return;
        };
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
            && let Err(err) = fs::create_dir_all(dir)
        {
            warn!("history not saved, cannot create {}: {err}", dir.display());
            return;
        }
        match editor.save_history(path) {
            Ok(()) => debug!("history saved to {}", path.display()),
            Err(err) => warn!("history not saved to {}: {err}", path.display()),
        }
    }
}

impl Drop for InputManager {
    fn drop(&mut self) {
        self.close_editor();
    }
}

/// History file inside the save directory.
pub fn history_path(save_dir: &Path) -> PathBuf {
    save_dir.join("history.txt")
}

fn read_plain(prompt: &str) -> io::Result<InputEvent> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut buffer = String::new();
    Ok(match io::stdin().read_line(&mut buffer)? {
        0 => InputEvent::Eof,
        _ => InputEvent::Line(buffer.trim_end_matches(['\r', '\n']).to_string()),
    })
}
