//! Summontale - Entry Point
//!
//! A small command front end over `Session`. Each invocation loads the
//! save, runs one command and prints what happened.
//!
//! Usage: summontale <command> [args]
//!   status                     gold, roster size and stage ladder
//!   roster                     owned characters, best first
//!   draw                       single draw
//!   draw10                     ten draw
//!   upgrade <character>        pay to level a character
//!   favorite <character>       toggle the favourite flag
//!   battle <stage> [character] fight a stage (1-based), best character by default
//!   endless [kills]            endless battle, abandoned after `kills` monsters
//!   export-data [dir]          write the default RON data files

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use summontale::combat::{BattleEvent, BattlePhase};
use summontale::data::{export_default_data, DEFAULT_DATA_DIR};
use summontale::game::{MessageCategory, TurnPacer};
use summontale::roster::SortOrder;
use summontale::{DataManager, SaveStore, Session};

/// Endless runs stop after this many kills unless told otherwise
const DEFAULT_ENDLESS_KILLS: u32 = 5;

/// Hard cap on steps for one battle
const MAX_BATTLE_STEPS: usize = 10_000;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Summontale v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("status");

    if command == "export-data" {
        let dir = args.get(1).map(String::as_str).unwrap_or(DEFAULT_DATA_DIR);
        let path = export_default_data(dir).map_err(anyhow::Error::msg)?;
        println!("Default data written to {}", path.display());
        return Ok(());
    }

    let mut session = Session::new(DataManager::new(), SaveStore::default_location());

    let result = run_command(&mut session, command, args.get(1..).unwrap_or(&[]));
    print_notices(&mut session);

    if let Err(ref e) = result {
        log::error!("Command '{}' failed: {}", command, e);
    }
    result
}

fn run_command(session: &mut Session, command: &str, args: &[String]) -> Result<()> {
    match command {
        "status" => print_status(session),
        "roster" => print_roster(session),
        "draw" => {
            let pull = session.draw_one()?;
            println!("{} [{}]", pull.definition.name, pull.definition.rarity);
        }
        "draw10" => {
            let draw = session.draw_ten()?;
            for pull in &draw.pulls {
                let tag = if pull.is_new() { " NEW" } else { "" };
                println!("{} [{}]{}", pull.definition.name, pull.definition.rarity, tag);
            }
            println!("Refunded {} gold for duplicates", draw.total_refund());
        }
        "upgrade" => {
            let id = resolve_character(session, args.first())?;
            let outcome = session.upgrade(&id)?;
            println!("Level {} (power {}), cost {} gold", outcome.new_level, outcome.new_power, outcome.cost);
        }
        "favorite" => {
            let id = resolve_character(session, args.first())?;
            let favorite = session.toggle_favorite(&id)?;
            println!("{} favourite: {}", id, favorite);
        }
        "battle" => {
            let stage: usize = match args.first() {
                Some(s) => s.parse().with_context(|| format!("bad stage number '{}'", s))?,
                None => session.stages().current_stage() + 1,
            };
            if stage == 0 {
                bail!("stages are numbered from 1");
            }
            let id = resolve_character(session, args.get(1))?;
            session.start_stage_battle(&id, stage - 1)?;
            run_battle(session, None)?;
        }
        "endless" => {
            let kills = match args.first() {
                Some(s) => s.parse().with_context(|| format!("bad kill count '{}'", s))?,
                None => DEFAULT_ENDLESS_KILLS,
            };
            let id = resolve_character(session, args.get(1))?;
            session.start_endless_battle(&id)?;
            run_battle(session, Some(kills))?;
        }
        other => bail!("unknown command '{}'", other),
    }
    Ok(())
}

/// Use the given id, or the roster's top character
fn resolve_character(session: &Session, id: Option<&String>) -> Result<String> {
    if let Some(id) = id {
        return Ok(id.clone());
    }
    match session.roster().sorted(SortOrder::LevelDescending, false).first() {
        Some(character) => Ok(character.id().to_string()),
        None => bail!("no characters owned yet; try 'draw'"),
    }
}

/// Step the active battle at the configured pace
fn run_battle(session: &mut Session, kill_limit: Option<u32>) -> Result<()> {
    let mut pacer = TurnPacer::from_config(session.config());
    let mut last_tick = Instant::now();

    let mut steps = 0;
    while session.battle_in_progress() && steps < MAX_BATTLE_STEPS {
        let now = Instant::now();
        let ready = pacer.update(now.duration_since(last_tick));
        last_tick = now;
        if !ready {
            std::thread::sleep(pacer.remaining().min(Duration::from_millis(50)));
            continue;
        }
        steps += 1;

        for event in session.advance_battle()? {
            print_event(&event);
        }

        let reached_limit = kill_limit.zip(session.battle()).is_some_and(|(limit, b)| b.monsters_defeated() >= limit);
        if reached_limit {
            session.abandon_battle()?;
        }
    }

    if session.battle_in_progress() {
        log::warn!("Battle hit the step cap; abandoning");
        session.abandon_battle()?;
    }

    if let Some(snapshot) = session.battle_snapshot() {
        println!(
            "Result: {:?} - {} defeated, +{} gold, +{} exp",
            snapshot.phase, snapshot.monsters_defeated, snapshot.totals.gold, snapshot.totals.exp
        );
        if snapshot.phase == BattlePhase::StageCleared {
            println!("Gold now {}", session.gold());
        }
    }
    Ok(())
}

fn print_event(event: &BattleEvent) {
    match event {
        BattleEvent::Started { .. } | BattleEvent::StageCleared { .. } | BattleEvent::Defeat { .. } => {
            println!("== {} ==", event)
        }
        _ => println!("  {}", event),
    }
}

fn print_status(session: &Session) {
    let stats = session.statistics();
    println!("Gold: {}", session.gold());
    println!("Characters: {} ({} copies)", session.roster().len(), session.roster().total_count());
    println!(
        "Battles: {} ({} won, {} lost), draws: {}",
        stats.total_battles, stats.battles_won, stats.battles_lost, stats.total_gacha_pulls
    );
    for (index, stage) in session.catalog().stages().iter().enumerate() {
        let state = match session.stages().get(index) {
            Some(p) if p.cleared => format!("cleared x{}", p.clear_count),
            Some(p) if p.unlocked => "open".to_string(),
            _ => "locked".to_string(),
        };
        println!("  {}. {} (Lv {}) - {}", index + 1, stage.name, stage.recommended_level, state);
    }
}

fn print_roster(session: &Session) {
    for character in session.roster().sorted(SortOrder::default(), false) {
        let star = if character.favorite { "*" } else { " " };
        println!(
            "{} {:<10} {:<8} Lv {:>2}  power {:>4}  x{}  ({})",
            star,
            character.name(),
            character.definition().rarity,
            character.level,
            character.power,
            character.count,
            character.id()
        );
    }
}

fn print_notices(session: &mut Session) {
    for notice in session.drain_notifications() {
        match notice.category {
            MessageCategory::Warning => eprintln!("! {}", notice.text),
            _ => println!("> {}", notice.text),
        }
    }
}
