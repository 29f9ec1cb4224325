#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** The House of Ash **
//! A five-room text adventure.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use ashen_engine::config::{EngineConfig, load_config};
use ashen_engine::data_paths::{data_path, resolve_data_file};
use ashen_engine::flow::run_input_loop;
use ashen_engine::input::{InputEvent, InputManager};
use ashen_engine::lookup::DescriptionLookup;
use ashen_engine::narration::{Narrator, wait_until_idle};
use ashen_engine::save_files::{load_game, save_exists};
use ashen_engine::scenario::{builtin_descriptions, house_of_ash};
use ashen_engine::{ASHEN_VERSION, DescriptionTable, GameContext, GameSession, InputBuffer, TerminalNarrator};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use log::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "ashen_engine", version, about = "Play The House of Ash")]
struct Cli {
    /// Engine settings file (defaults to config.toml in the data directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Resume the saved game instead of starting a new one
    #[arg(long = "continue")]
    resume: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    info!("Start: The House of Ash v{ASHEN_VERSION}");

    let config_path = cli.config.unwrap_or_else(|| data_path("config.toml"));
    let config = load_config(&config_path);
    let lookup = load_descriptions(&config)?;
    let mut ctx = GameContext::new(
        house_of_ash().context("while building the House of Ash")?,
        lookup,
        config.saves.dir.clone(),
    );

    // clear the screen
    print!("\x1B[2J\x1B[H");
    println!("{:^60}\n", "THE HOUSE OF ASH".bright_yellow().underline());

    let narrator = Arc::new(TerminalNarrator::spawn(config.pace()));
    let mut resumed = false;
    if cli.resume && !save_exists(&ctx.save_dir) {
        narrator.narrate("There is no saved game. A new story begins.");
    } else if cli.resume {
        match load_game(&ctx.save_dir) {
            Ok(Some(loaded)) => {
                ctx.world = loaded.world;
                ctx.catalog = loaded.items;
                resumed = true;
            },
            Ok(None) => narrator.narrate("There is no saved game. A new story begins."),
            Err(err) => {
                error!("could not resume: {err}");
                narrator.narrate(&format!("The saved game could not be loaded ({err}). A new story begins."));
            },
        }
    }

    let mut session = GameSession::new(ctx, narrator.clone())
        .with_wait_interval(config.wait_interval())
        .with_styling(config.narration.styled);
    if resumed {
        session.resume();
    } else {
        session.begin();
    }

    let buffer = InputBuffer::new();
    let stop = Arc::new(AtomicBool::new(false));
    let interpreter = {
        let buffer = buffer.clone();
        let stop = Arc::clone(&stop);
        let poll = config.poll_interval();
        thread::spawn(move || run_input_loop(&mut session, &buffer, poll, &stop))
    };

    let mut input = InputManager::new(config.history_file());
    let settle = config.poll_interval().min(Duration::from_millis(20));
    loop {
        wait_for_turn(&buffer, narrator.as_ref(), &stop, settle);
        if stop.load(Ordering::SeqCst) {
            break;
        }
        match input.read_line("> ").context("reading player input")? {
            InputEvent::Line(line) => {
                if !line.trim().is_empty() {
                    buffer.set_pending(&line);
                }
            },
            InputEvent::Eof | InputEvent::Interrupted => {
                info!("input closed, shutting down");
                stop.store(true, Ordering::SeqCst);
                break;
            },
        }
    }

    interpreter
        .join()
        .map_err(|_| anyhow!("interpreter thread panicked"))??;
    wait_until_idle(narrator.as_ref(), settle);
    info!("Goodbye.");
    Ok(())
}

/// Load the configured description table, falling back to the built-in one.
fn load_descriptions(config: &EngineConfig) -> Result<Box<dyn DescriptionLookup>> {
    let path = resolve_data_file(&config.data.descriptions);
    match DescriptionTable::load(&path) {
        Ok(table) => Ok(Box::new(table)),
        Err(err) => {
            warn!("{err}; using built-in descriptions");
            Ok(Box::new(builtin_descriptions()?))
        },
    }
}

/// Block until the last line has been interpreted and narrated.
fn wait_for_turn(buffer: &InputBuffer, narrator: &dyn Narrator, stop: &AtomicBool, interval: Duration) {
    while !stop.load(Ordering::SeqCst) && (!buffer.is_idle() || narrator.is_narrating()) {
        thread::sleep(interval);
    }
    wait_until_idle(narrator, interval);
}
