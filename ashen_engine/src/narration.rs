//! Narration sinks.
//!
//! A [`Narrator`] receives finished lines from the [`View`](crate::view::View).
//! Narration may be paced, so callers that must not talk over a line still
//! being rendered poll [`Narrator::is_narrating`].

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use textwrap::{fill, termwidth};

/// Presentation sink used by the interpreter.
pub trait Narrator: Send + Sync {
    /// Queue `text` for paced display.
    fn narrate(&self, text: &str);
    /// Show the player's input immediately, after any queued narration.
    fn echo(&self, text: &str);
    /// True while queued narration has not finished rendering.
    fn is_narrating(&self) -> bool;
}

/// Block until `narrator` has finished everything queued so far.
pub fn wait_until_idle(narrator: &dyn Narrator, interval: Duration) {
    while narrator.is_narrating() {
        thread::sleep(interval);
    }
}

/// Narrator that keeps everything in memory.
#[derive(Debug, Default)]
pub struct RecordingNarrator {
    narrations: Mutex<Vec<String>>,
    echoes: Mutex<Vec<String>>,
    busy_polls: AtomicUsize,
}

impl RecordingNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn narrations(&self) -> Vec<String> {
        self.narrations.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn echoes(&self) -> Vec<String> {
        self.echoes.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    /// Report busy for the next `polls` calls to `is_narrating`.
    pub fn stay_busy_for(&self, polls: usize) {
        self.busy_polls.store(polls, Ordering::SeqCst);
    }

    /// Busy polls not yet consumed.
    pub fn busy_polls_left(&self) -> usize {
        self.busy_polls.load(Ordering::SeqCst)
    }
}

impl Narrator for RecordingNarrator {
    fn narrate(&self, text: &str) {
        if let Ok(mut lines) = self.narrations.lock() {
            lines.push(text.to_string());
        }
    }

    fn echo(&self, text: &str) {
        if let Ok(mut lines) = self.echoes.lock() {
            lines.push(text.to_string());
        }
    }

    fn is_narrating(&self) -> bool {
        self.busy_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

/// Narrator that types text to stdout from a printer thread.
///
/// Lines are word-wrapped to the terminal width and revealed one character
/// at a time.
pub struct TerminalNarrator {
    sender: Mutex<Sender<String>>,
    pending: Arc<AtomicUsize>,
}

impl TerminalNarrator {
    /// Start the printer thread. A zero `pace` prints lines at once.
    pub fn spawn(pace: Duration) -> Self {
        let (sender, receiver) = mpsc::channel::<String>();
        let pending = Arc::new(AtomicUsize::new(0));
        let printer_pending = Arc::clone(&pending);
        thread::spawn(move || {
            for text in receiver {
                if let Err(err) = type_out(&text, pace) {
                    warn!("failed to write narration: {err}");
                }
                printer_pending.fetch_sub(1, Ordering::SeqCst);
            }
            debug!("narration printer stopped");
        });
        Self {
            sender: Mutex::new(sender),
            pending,
        }
    }
}

impl Narrator for TerminalNarrator {
    fn narrate(&self, text: &str) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let sent = self
            .sender
            .lock()
            .map(|sender| sender.send(text.to_string()).is_ok())
            .unwrap_or(false);
        if !sent {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            warn!("narration printer is gone, printing directly");
            println!("{text}");
        }
    }

    /// The line editor already shows what the player typed, so the echo
    /// only waits for the printer and records the line in the log.
    fn echo(&self, text: &str) {
        wait_until_idle(self, Duration::from_millis(10));
        debug!("player input: {text}");
    }

    fn is_narrating(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}

fn type_out(text: &str, pace: Duration) -> io::Result<()> {
    let wrapped = fill(text, termwidth());
    let mut out = io::stdout().lock();
    if pace.is_zero() {
        writeln!(out, "{wrapped}")?;
        return out.flush();
    }
    for ch in wrapped.chars() {
        write!(out, "{ch}")?;
        out.flush()?;
        thread::sleep(pace);
    }
    writeln!(out)?;
    out.flush()
}
