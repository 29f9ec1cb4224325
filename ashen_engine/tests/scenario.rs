//! End-to-end play through The House of Ash.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ashen_engine::dispatch::NOT_RECOGNIZED;
use ashen_engine::scenario::{builtin_descriptions, house_of_ash};
use ashen_engine::session::STORY_OVER;
use ashen_engine::{GameContext, GameSession, ItemHolder, RecordingNarrator, SessionControl};

fn new_session() -> Result<(GameSession, Arc<RecordingNarrator>)> {
    let narrator = Arc::new(RecordingNarrator::new());
    let ctx = GameContext::new(
        house_of_ash()?,
        Box::new(builtin_descriptions()?),
        std::env::temp_dir().join("ashen-scenario-unused"),
    );
    let session = GameSession::new(ctx, narrator.clone()).with_wait_interval(Duration::from_millis(1));
    Ok((session, narrator))
}

fn play(session: &mut GameSession, lines: &[&str]) -> Result<()> {
    for line in lines {
        session.handle_input(line)?;
    }
    Ok(())
}

fn last(narrator: &RecordingNarrator) -> String {
    narrator.narrations().last().cloned().unwrap_or_default()
}

fn locked(session: &GameSession, a: &str, b: &str) -> bool {
    session.ctx.world.connections.iter().filter(|c| c.joins(a, b)).any(|c| c.locked)
}

#[test]
fn intro_narrates_the_opening() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    session.begin();
    let lines = narrator.narrations();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("A storm drove you"));
    assert!(lines[1].starts_with("The entrance of the house"));
    Ok(())
}

#[test]
fn north_is_blocked_before_the_candle_is_lit() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    play(&mut session, &["nord"])?;
    assert_eq!(session.ctx.world.current_room_name(), "Stanza1");
    assert_eq!(last(&narrator), "The passage to the north is blocked.");
    Ok(())
}

#[test]
fn lighting_the_candle_opens_the_way_north() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    play(&mut session, &["prendi candela", "prendi fiammiferi"])?;
    assert_eq!(last(&narrator), "You already have the Fiammiferi.");
    assert!(locked(&session, "Stanza1", "Stanza2"));

    play(&mut session, &["usa fiammiferi con la candela"])?;
    assert!(last(&narrator).starts_with("You strike the last match"));
    assert!(!locked(&session, "Stanza1", "Stanza2"));
    assert!(session.ctx.world.inventory.find_item("fiammiferi").is_none());
    assert!(session.ctx.world.inventory.find_item("candela").is_some());

    play(&mut session, &["n"])?;
    assert_eq!(session.ctx.world.current_room_name(), "Stanza2");
    assert!(last(&narrator).starts_with("A hall with a great fireplace"));
    play(&mut session, &["s"])?;
    assert_eq!(session.ctx.world.current_room_name(), "Stanza1");
    Ok(())
}

#[test]
fn wrong_argument_counts_fall_through() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    play(&mut session, &["prendi candela foglio"])?;
    assert_eq!(last(&narrator), NOT_RECOGNIZED);
    assert!(session.ctx.world.current_room()?.find_item("candela").is_some());
    play(&mut session, &["usa"])?;
    assert_eq!(last(&narrator), NOT_RECOGNIZED);
    Ok(())
}

#[test]
fn the_amulet_can_be_taken_straight_from_the_chest() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    session.ctx.world.unlock_pair("Stanza1", "Stanza2");
    play(&mut session, &["nord", "prendi ciondolo"])?;
    assert_eq!(last(&narrator), "You take the Amuleto from the Scrigno.");
    assert!(!locked(&session, "Stanza2", "Stanza3"));
    Ok(())
}

#[test]
fn full_walkthrough_reaches_the_ending_once() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    play(
        &mut session,
        &[
            "prendi candela",
            "usa fiammiferi candela",
            "nord",
            "prendi chiave",
            "usa chiave scrigno",
        ],
    )?;
    assert!(last(&narrator).starts_with("The key turns"));
    assert!(session.ctx.world.current_room()?.find_item("amuleto").is_some());

    play(&mut session, &["prendi amuleto", "est", "prendi diario", "nord", "usa telefono"])?;
    assert_eq!(session.ctx.world.current_room_name(), "Stanza4");
    assert!(session.flow().is_mirror_puzzle());

    play(&mut session, &["ombra"])?;
    assert!(session.flow().is_mirror_puzzle());
    play(&mut session, &["riflesso"])?;
    assert!(session.flow().is_awaiting_command());

    play(&mut session, &["nord", "lascia candela", "lascia amuleto"])?;
    assert_eq!(session.ctx.world.current_room_name(), "Stanza5");
    assert!(session.flow().is_awaiting_command());

    assert_eq!(session.handle_input("lascia diario")?, SessionControl::Continue);
    assert!(session.flow().is_ending_sequence());
    let ending = last(&narrator);
    assert!(ending.ends_with("THE END."));

    assert_eq!(session.handle_input("lascia diario")?, SessionControl::Finished);
    assert_eq!(last(&narrator), STORY_OVER);
    let endings = narrator.narrations().iter().filter(|line| **line == ending).count();
    assert_eq!(endings, 1);
    Ok(())
}

#[test]
fn inventory_and_help_are_available() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    play(&mut session, &["inventario"])?;
    assert_eq!(last(&narrator), "Inventory:\n  - Telefono\n  - Fiammiferi");
    play(&mut session, &["help"])?;
    assert!(last(&narrator).contains("prendi/raccogli/take"));
    Ok(())
}

#[test]
fn looking_uses_the_description_table() -> Result<()> {
    let (mut session, narrator) = new_session()?;
    play(&mut session, &["osserva tavolino"])?;
    assert!(last(&narrator).starts_with("A small wooden table"));
    play(&mut session, &["guarda"])?;
    assert!(last(&narrator).starts_with("The entrance of the house"));
    play(&mut session, &["osserva telefono"])?;
    assert_eq!(last(&narrator), "You are carrying the Telefono.");
    Ok(())
}
