//! Integration test: full player loop through `Session`
//!
//! Draws characters, clears the first stage, then reloads the session from
//! disk and checks that roster, gold, ladder and statistics survived.

use std::fs;
use std::path::PathBuf;

use summontale::combat::{BattleEvent, BattlePhase};
use summontale::data::Rarity;
use summontale::game::MessageCategory;
use summontale::save::{SaveRecord, SAVE_FILE};
use summontale::{DataManager, GameError, SaveStore, Session};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("summontale-it-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// Data tuned so battles always end in a clear
fn sturdy_data() -> DataManager {
    let mut data = DataManager::default();
    data.config.player_base_hp = 1_000_000;
    data.config.skill_use_chance = 0.0;
    data
}

fn fight_to_end(session: &mut Session) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    for _ in 0..10_000 {
        if !session.battle_in_progress() {
            break;
        }
        events.extend(session.advance_battle().unwrap());
    }
    events
}

#[test]
fn test_draw_clear_and_reload() {
    let dir = scratch_dir("flow");

    let (id, gold, level) = {
        let mut session = Session::with_seed(sturdy_data(), SaveStore::new(&dir), 42);
        assert_eq!(session.gold(), 1000);

        let pull = session.draw_one().unwrap();
        assert!(pull.is_new());
        assert_eq!(session.roster().len(), 1);

        let id = pull.definition.id.clone();
        session.start_stage_battle(&id, 0).unwrap();
        let events = fight_to_end(&mut session);

        assert_eq!(session.battle().unwrap().phase(), BattlePhase::StageCleared);
        assert_eq!(
            events.iter().filter(|e| matches!(e, BattleEvent::StageCleared { .. })).count(),
            1
        );
        assert!(events.iter().any(|e| matches!(e, BattleEvent::MonsterDefeated { .. })));
        assert!(session.stages().is_cleared(0));
        assert!(session.stages().is_unlocked(1));

        let notices = session.drain_notifications();
        assert!(notices.iter().any(|n| n.category == MessageCategory::Progress && n.text.contains("unlocked")));

        let level = session.roster().get(&id).unwrap().level;
        assert!(level > 1);
        (id, session.gold(), level)
    };

    let reloaded = Session::with_seed(sturdy_data(), SaveStore::new(&dir), 43);
    assert_eq!(reloaded.gold(), gold);
    assert_eq!(reloaded.roster().get(&id).unwrap().level, level);
    assert!(reloaded.stages().is_unlocked(1));
    assert!(!reloaded.stages().is_unlocked(2));
    assert_eq!(reloaded.stages().highest_cleared(), Some(0));
    assert_eq!(reloaded.statistics().battles_won, 1);
    assert_eq!(reloaded.statistics().total_gacha_pulls, 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_ten_draw_adds_exactly_ten_copies() {
    let dir = scratch_dir("ten");
    let mut data = DataManager::default();
    data.config.starting_gold = 5000;
    let mut session = Session::with_seed(data, SaveStore::new(&dir), 9);

    let draw = session.draw_ten().unwrap();
    assert_eq!(draw.pulls.len(), 10);
    assert_eq!(draw.failed, 0);
    assert_eq!(session.roster().total_count(), 10);
    assert_eq!(session.gold(), 5000 - 2700 + draw.total_refund());
    assert_eq!(session.statistics().total_gacha_pulls, 10);

    // Every distinct character is saved once with its full count
    let record: SaveRecord = serde_json::from_str(&fs::read_to_string(dir.join(SAVE_FILE)).unwrap()).unwrap();
    assert_eq!(record.owned_list.len(), session.roster().len());
    assert_eq!(record.owned_list.iter().map(|r| r.count).sum::<u32>(), 10);
    assert_eq!(record.player_gold, session.gold());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_failed_actions_leave_state_untouched() {
    let dir = scratch_dir("reject");
    let mut data = DataManager::default();
    data.config.rarity_weights = vec![(Rarity::Five, 1.0)];
    let mut session = Session::with_seed(data, SaveStore::new(&dir), 1);

    session.draw_one().unwrap();
    let id = session.roster().characters()[0].id().to_string();
    session.drain_notifications();

    // 700 gold left, a 5-star upgrade costs 1000
    assert!(matches!(session.upgrade(&id), Err(GameError::InsufficientCurrency { .. })));
    assert_eq!(session.gold(), 700);
    assert_eq!(session.roster().get(&id).unwrap().level, 1);

    assert_eq!(session.start_stage_battle(&id, 2), Err(GameError::StageLocked(2)));
    assert!(session.battle().is_none());

    let notices = session.drain_notifications();
    assert_eq!(notices.len(), 2);
    assert!(notices.iter().all(|n| n.category == MessageCategory::Warning));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_endless_run_keeps_rewards_on_abandon() {
    let dir = scratch_dir("endless");
    let mut session = Session::with_seed(sturdy_data(), SaveStore::new(&dir), 77);

    session.draw_one().unwrap();
    let id = session.roster().characters()[0].id().to_string();
    let gold_before = session.gold();

    session.start_endless_battle(&id).unwrap();
    for _ in 0..10_000 {
        let kills = session.battle().map(|b| b.monsters_defeated()).unwrap_or(0);
        if kills >= 2 {
            break;
        }
        session.advance_battle().unwrap();
    }
    session.abandon_battle().unwrap();

    let battle = session.battle().unwrap();
    assert_eq!(battle.phase(), BattlePhase::Abandoned);
    assert_eq!(battle.monsters_defeated(), 2);
    assert_eq!(session.gold(), gold_before + 60);
    assert_eq!(session.statistics().battles_won, 0);
    assert_eq!(session.statistics().battles_lost, 0);
    assert_eq!(session.statistics().total_battles, 1);
    assert!(session.stages().highest_cleared().is_none());

    let _ = fs::remove_dir_all(&dir);
}
