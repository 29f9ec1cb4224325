//! Session flow: the top-level mode and the input hand-off between the
//! line reader and the interpreter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{error, info};
use variantly::Variantly;

use crate::session::{GameSession, SessionControl};

/// How raw input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Variantly)]
pub enum FlowState {
    /// Normal play: input is parsed as a command.
    #[default]
    AwaitingCommand,
    /// Input is an answer to the mirror riddle.
    MirrorPuzzle,
    /// The story is over. Terminal.
    EndingSequence,
}

/// Text typed by the player but not yet interpreted.
///
/// Read-and-clear and write both happen under one lock, so a line is never
/// lost or handed out twice.
#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    pending: Arc<Mutex<String>>,
    busy: Arc<AtomicBool>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending text.
    pub fn set_pending(&self, text: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.clear();
            pending.push_str(text);
        }
    }

    /// Take the pending text, leaving the buffer empty. A non-empty result
    /// marks the buffer busy until [`InputBuffer::finish_turn`].
    pub fn take_pending(&self) -> String {
        let Ok(mut pending) = self.pending.lock() else {
            return String::new();
        };
        let text = std::mem::take(&mut *pending);
        if !text.is_empty() {
            self.busy.store(true, Ordering::SeqCst);
        }
        text
    }

    pub fn finish_turn(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    /// True when nothing is waiting and no taken line is still being handled.
    pub fn is_idle(&self) -> bool {
        let empty = self.pending.lock().map(|p| p.is_empty()).unwrap_or(true);
        empty && !self.busy.load(Ordering::SeqCst)
    }
}

/// Poll `buffer` every `interval` and feed lines to `session` until the
/// session finishes or `stop` is raised. Raises `stop` on the way out.
///
/// # Errors
/// - if the session reports a hard failure while handling input
pub fn run_input_loop(session: &mut GameSession, buffer: &InputBuffer, interval: Duration, stop: &AtomicBool) -> Result<()> {
    let outcome = poll_loop(session, buffer, interval, stop);
    stop.store(true, Ordering::SeqCst);
    if let Err(err) = &outcome {
        error!("interpreter stopped: {err:#}");
    }
    outcome
}

fn poll_loop(session: &mut GameSession, buffer: &InputBuffer, interval: Duration, stop: &AtomicBool) -> Result<()> {
    while !stop.load(Ordering::SeqCst) {
        let text = buffer.take_pending();
        if !text.is_empty() {
            let control = session.handle_input(&text);
            buffer.finish_turn();
            if control? == SessionControl::Finished {
                info!("session finished");
                return Ok(());
            }
        }
        thread::sleep(interval);
    }
    Ok(())
}
