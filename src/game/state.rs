//! Game session
//!
//! The session owns every piece of player state and hands the engines the
//! parts they need for each call. Nothing is reached through globals.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::notify::{MessageCategory, Notice, NoticeLog};
use crate::combat::{Battle, BattleContext, BattleEvent, BattlePhase, BattleSnapshot};
use crate::currency::CurrencyLedger;
use crate::data::{Catalog, DataManager, GameConfig, Reward, StageDefinition};
use crate::error::{GameError, GameResult};
use crate::gacha::{GachaEngine, Pull, TenDraw};
use crate::progression::{self, LevelProgress, StageScaling, StageTable, UpgradeOutcome};
use crate::roster::{Acquisition, Roster};
use crate::save::{GameStatistics, SaveStore};

/// The main session struct that holds all game data
pub struct Session {
    config: GameConfig,
    catalog: Catalog,
    gacha: GachaEngine,
    roster: Roster,
    ledger: CurrencyLedger,
    stages: StageTable,
    stats: GameStatistics,
    store: SaveStore,
    notices: NoticeLog,
    rng: StdRng,
    /// Current or most recently finished battle
    battle: Option<Battle>,
}

impl Session {
    /// Load the saved state from `store`
    pub fn new(data: DataManager, store: SaveStore) -> Self {
        Self::with_rng(data, store, StdRng::from_entropy())
    }

    /// Deterministic session for tests and replays
    pub fn with_seed(data: DataManager, store: SaveStore, seed: u64) -> Self {
        Self::with_rng(data, store, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(data: DataManager, store: SaveStore, rng: StdRng) -> Self {
        let DataManager { config, catalog } = data;

        let loaded = store.load(&catalog, config.starting_gold);
        let stages = store.load_progress(catalog.stages().len());
        let stats = store.load_statistics();

        let mut notices = NoticeLog::new();
        if loaded.dropped > 0 {
            notices.push(
                format!("{} saved characters could not be restored", loaded.dropped),
                MessageCategory::Warning,
            );
        }

        log::info!(
            "Session ready: {} characters, {} gold, stage {} open",
            loaded.roster.len(),
            loaded.gold,
            stages.current_stage()
        );

        Self {
            gacha: GachaEngine::new(&config),
            config,
            catalog,
            roster: loaded.roster,
            ledger: CurrencyLedger::new(loaded.gold),
            stages,
            stats,
            store,
            notices,
            rng,
            battle: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn gold(&self) -> u64 {
        self.ledger.gold()
    }

    pub fn stages(&self) -> &StageTable {
        &self.stages
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.stats
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    /// Take every pending notification
    pub fn drain_notifications(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn battle_in_progress(&self) -> bool {
        self.battle.as_ref().is_some_and(|b| !b.is_finished())
    }

    /// Surface an error as a warning notice and hand it back
    fn reject<T>(&mut self, error: GameError) -> GameResult<T> {
        log::debug!("Action rejected: {}", error);
        self.notices.push(error.to_string(), MessageCategory::Warning);
        Err(error)
    }

    // ------------------------------------------------------------------
    // Gacha
    // ------------------------------------------------------------------

    /// Draw a single character
    pub fn draw_one(&mut self) -> GameResult<Pull> {
        let result = self
            .gacha
            .draw_one(&self.catalog, &mut self.roster, &mut self.ledger, &mut self.rng);

        match result {
            Ok(pull) => {
                self.stats.record_pulls(1);
                self.announce_pull(&pull);
                self.persist_characters(&[pull.definition.id.as_str()]);
                Ok(pull)
            }
            Err(GameError::EmptyRarityPool(rarity)) => {
                // Paid, nothing drawn
                self.save_gold();
                self.reject(GameError::EmptyRarityPool(rarity))
            }
            Err(e) => self.reject(e),
        }
    }

    /// Draw ten characters for the bulk price
    pub fn draw_ten(&mut self) -> GameResult<TenDraw> {
        let result = self
            .gacha
            .draw_ten(&self.catalog, &mut self.roster, &mut self.ledger, &mut self.rng);

        match result {
            Ok(draw) => {
                self.stats.record_pulls(draw.pulls.len() as u32);
                for pull in &draw.pulls {
                    self.announce_pull(pull);
                }
                if draw.failed > 0 {
                    self.notices.push(
                        format!("{} draws found no character", draw.failed),
                        MessageCategory::Warning,
                    );
                }
                let mut ids: Vec<&str> = draw.pulls.iter().map(|p| p.definition.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                self.persist_characters(&ids);
                Ok(draw)
            }
            Err(e) => self.reject(e),
        }
    }

    fn announce_pull(&mut self, pull: &Pull) {
        let text = match pull.acquisition {
            Acquisition::New => format!("New character: {} ({})!", pull.definition.name, pull.definition.rarity),
            Acquisition::Duplicate { count } => format!(
                "Duplicate {} (x{})! +{} gold",
                pull.definition.name, count, pull.refund
            ),
        };
        self.notices.push(text, MessageCategory::Gacha);
    }

    // ------------------------------------------------------------------
    // Roster
    // ------------------------------------------------------------------

    /// Pay to raise a character one level
    pub fn upgrade(&mut self, character_id: &str) -> GameResult<UpgradeOutcome> {
        let result = match self.roster.get_mut(character_id) {
            Some(character) => progression::upgrade(character, &mut self.ledger),
            None => Err(GameError::CharacterNotFound(character_id.to_string())),
        };

        match result {
            Ok(outcome) => {
                self.notices.push(
                    format!("Upgraded to level {} for {} gold", outcome.new_level, outcome.cost),
                    MessageCategory::Progress,
                );
                self.persist_characters(&[character_id]);
                Ok(outcome)
            }
            Err(e) => self.reject(e),
        }
    }

    /// Grant experience outside of battle
    pub fn add_experience(&mut self, character_id: &str, amount: u32) -> GameResult<LevelProgress> {
        let Some(character) = self.roster.get_mut(character_id) else {
            return self.reject(GameError::CharacterNotFound(character_id.to_string()));
        };

        let progress = character.add_experience(amount);
        if progress.leveled_up() {
            let text = format!("{} reached level {}!", character.name(), progress.new_level);
            self.notices.push(text, MessageCategory::Progress);
        }
        self.persist_characters(&[character_id]);
        Ok(progress)
    }

    /// Flip a character's favourite flag
    pub fn toggle_favorite(&mut self, character_id: &str) -> GameResult<bool> {
        match self.roster.toggle_favorite(character_id) {
            Ok(favorite) => {
                self.persist_characters(&[character_id]);
                Ok(favorite)
            }
            Err(e) => self.reject(e),
        }
    }

    // ------------------------------------------------------------------
    // Stages and battles
    // ------------------------------------------------------------------

    /// Check that a stage can be entered
    pub fn select_stage(&mut self, index: usize) -> GameResult<&StageDefinition> {
        if let Err(e) = self.stages.select_stage(index) {
            return self.reject(e);
        }
        match self.catalog.stage(index) {
            Some(stage) => Ok(stage),
            None => Err(GameError::InvalidStageIndex(index)),
        }
    }

    /// Start a battle on an unlocked stage
    pub fn start_stage_battle(&mut self, character_id: &str, stage_index: usize) -> GameResult<()> {
        if self.battle_in_progress() {
            return self.reject(GameError::BattleInProgress);
        }
        self.select_stage(stage_index)?;

        if !self.roster.contains(character_id) {
            return self.reject(GameError::CharacterNotFound(character_id.to_string()));
        }
        let Some(stage) = self.catalog.stage(stage_index) else {
            return self.reject(GameError::InvalidStageIndex(stage_index));
        };

        let scaling = StageScaling::for_stage(stage, &self.config);
        let lineup = stage.monster_lineup(self.catalog.monsters(), &scaling, &mut self.rng);
        let Some(character) = self.roster.get_mut(character_id) else {
            return self.reject(GameError::CharacterNotFound(character_id.to_string()));
        };

        match Battle::stage(stage_index, lineup, character, &self.config) {
            Ok(battle) => {
                self.stats.record_battle_start();
                self.battle = Some(battle);
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Start an endless battle against random catalog monsters
    pub fn start_endless_battle(&mut self, character_id: &str) -> GameResult<()> {
        if self.battle_in_progress() {
            return self.reject(GameError::BattleInProgress);
        }
        let Some(character) = self.roster.get_mut(character_id) else {
            return self.reject(GameError::CharacterNotFound(character_id.to_string()));
        };

        match Battle::endless(character, &self.catalog, &self.config, &mut self.rng) {
            Ok(battle) => {
                self.stats.record_battle_start();
                self.battle = Some(battle);
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    /// Take one battle step
    pub fn advance_battle(&mut self) -> GameResult<Vec<BattleEvent>> {
        self.step_battle(None).map(|events| events.unwrap_or_default())
    }

    /// Take one battle step if `expected` is still the current step
    ///
    /// `Ok(None)` means the call was stale and nothing happened.
    pub fn advance_battle_step(&mut self, expected: u64) -> GameResult<Option<Vec<BattleEvent>>> {
        self.step_battle(Some(expected))
    }

    fn step_battle(&mut self, expected: Option<u64>) -> GameResult<Option<Vec<BattleEvent>>> {
        let Some(battle) = self.battle.as_mut() else {
            return Err(GameError::NoActiveBattle);
        };
        if battle.is_finished() {
            return Err(GameError::NoActiveBattle);
        }

        let character_id = battle.character_id().to_string();
        let Some(character) = self.roster.get_mut(&character_id) else {
            return Err(GameError::CharacterNotFound(character_id));
        };

        let mut ctx = BattleContext {
            character,
            catalog: &self.catalog,
            config: &self.config,
            ledger: &mut self.ledger,
            rng: &mut self.rng,
        };

        let events = match expected {
            Some(step) => battle.advance_step(step, &mut ctx),
            None => Some(battle.advance(&mut ctx)),
        };

        if let Some(events) = &events {
            self.after_step(&character_id, events);
        }
        Ok(events)
    }

    fn after_step(&mut self, character_id: &str, events: &[BattleEvent]) {
        let mut stage_reward = Reward::default();

        for event in events {
            match event {
                BattleEvent::LevelUp { .. } => self.notices.push(event.to_string(), MessageCategory::Progress),
                BattleEvent::StageCleared { index } => stage_reward += self.complete_stage(character_id, *index),
                BattleEvent::Defeat { .. } => self.notices.push(event.to_string(), MessageCategory::Combat),
                _ => {}
            }
        }

        let Some((phase, totals)) = self.battle.as_ref().map(|b| (b.phase(), b.totals())) else {
            return;
        };
        if phase.is_terminal() {
            let won = match phase {
                BattlePhase::StageCleared => Some(true),
                BattlePhase::Defeat => Some(false),
                _ => None,
            };
            let mut earned = totals;
            earned += stage_reward;
            self.finish_battle(character_id, won, earned);
        }
    }

    /// Record a stage clear and pay its reward; runs once per cleared battle
    fn complete_stage(&mut self, character_id: &str, index: usize) -> Reward {
        let Some(clear) = self.stages.clear_stage(index) else {
            return Reward::default();
        };
        let reward = self.catalog.stage(index).map(|s| s.total_reward()).unwrap_or_default();

        self.ledger.add(reward.gold);
        if let Some(character) = self.roster.get_mut(character_id) {
            let progress = character.add_experience(reward.exp);
            if progress.leveled_up() {
                let text = format!("{} reached level {}!", character.name(), progress.new_level);
                self.notices.push(text, MessageCategory::Progress);
            }
        }

        self.notices.push(
            format!("Stage {} cleared! +{} gold, +{} exp", index + 1, reward.gold, reward.exp),
            MessageCategory::Progress,
        );
        if let Some(next) = clear.unlocked_next {
            self.notices.push(format!("Stage {} unlocked", next + 1), MessageCategory::Progress);
        }

        if let Err(e) = self.store.save_progress(&self.stages) {
            self.save_failed(e);
        }
        reward
    }

    fn finish_battle(&mut self, character_id: &str, won: Option<bool>, earned: Reward) {
        self.stats.record_battle_end(won, earned);
        self.persist_characters(&[character_id]);
        log::info!("Battle over ({:?}): {} gold, {} exp", won, earned.gold, earned.exp);
    }

    /// Leave the current battle; rewards already paid are kept
    pub fn abandon_battle(&mut self) -> GameResult<()> {
        let Some(battle) = self.battle.as_mut() else {
            return Err(GameError::NoActiveBattle);
        };
        let Some(event) = battle.abandon() else {
            return Err(GameError::NoActiveBattle);
        };

        let character_id = battle.character_id().to_string();
        let totals = battle.totals();
        self.notices.push(event.to_string(), MessageCategory::Combat);
        self.finish_battle(&character_id, None, totals);
        Ok(())
    }

    /// Owned view of the battle for presentation
    pub fn battle_snapshot(&self) -> Option<BattleSnapshot> {
        let battle = self.battle.as_ref()?;
        let character = self.roster.get(battle.character_id())?;
        Some(battle.snapshot(character))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the whole session to disk
    pub fn save(&mut self) {
        let result = self
            .store
            .save_roster(&self.roster, self.ledger.gold())
            .and_then(|_| self.store.save_progress(&self.stages))
            .and_then(|_| self.store.save_statistics(&self.stats));
        if let Err(e) = result {
            self.save_failed(e);
        }
    }

    fn persist_characters(&mut self, ids: &[&str]) {
        let characters = ids.iter().filter_map(|id| self.roster.get(id));
        let result = self
            .store
            .save_characters(characters, self.ledger.gold())
            .and_then(|_| self.store.save_statistics(&self.stats));
        if let Err(e) = result {
            self.save_failed(e);
        }
    }

    fn save_gold(&mut self) {
        if let Err(e) = self.store.save_gold(self.ledger.gold()) {
            self.save_failed(e);
        }
    }

    fn save_failed(&mut self, error: crate::save::SaveError) {
        log::warn!("Save failed: {}", error);
        self.notices.push(format!("Could not save: {}", error), MessageCategory::Warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Rarity;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("summontale-session-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn session(name: &str) -> Session {
        Session::with_seed(DataManager::default(), SaveStore::new(scratch_dir(name)), 11)
    }

    #[test]
    fn test_fresh_session_defaults() {
        let s = session("fresh");
        assert_eq!(s.gold(), 1000);
        assert!(s.roster().is_empty());
        assert!(s.stages().is_unlocked(0));
        assert!(!s.stages().is_unlocked(1));
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_draw_emits_one_notice() {
        let mut s = session("notice");
        s.draw_one().unwrap();
        let notices = s.drain_notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].category, MessageCategory::Gacha);
        assert_eq!(s.statistics().total_gacha_pulls, 1);
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_insufficient_gold_notice() {
        let mut s = session("broke");
        s.draw_one().unwrap();
        s.draw_one().unwrap();
        s.draw_one().unwrap();
        s.drain_notifications();

        // 1000 - 900 = 100 plus any duplicate refunds; a ten draw is out of reach
        assert!(matches!(s.draw_ten(), Err(GameError::InsufficientCurrency { .. })));
        let notices = s.drain_notifications();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].category, MessageCategory::Warning);
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_locked_stage_rejected() {
        let mut s = session("locked");
        s.draw_one().unwrap();
        let id = s.roster().characters()[0].id().to_string();

        assert_eq!(s.start_stage_battle(&id, 1), Err(GameError::StageLocked(1)));
        assert_eq!(s.start_stage_battle(&id, 9), Err(GameError::InvalidStageIndex(9)));
        assert!(s.battle().is_none());
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_battle_guards() {
        let mut s = session("guards");
        assert_eq!(s.advance_battle(), Err(GameError::NoActiveBattle));
        assert_eq!(s.abandon_battle(), Err(GameError::NoActiveBattle));

        s.draw_one().unwrap();
        let id = s.roster().characters()[0].id().to_string();
        s.start_stage_battle(&id, 0).unwrap();
        assert_eq!(s.start_stage_battle(&id, 0), Err(GameError::BattleInProgress));
        assert_eq!(s.start_endless_battle(&id), Err(GameError::BattleInProgress));

        s.abandon_battle().unwrap();
        assert!(!s.battle_in_progress());
        assert_eq!(s.statistics().total_battles, 1);
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_upgrade_unknown_character() {
        let mut s = session("unknown");
        assert_eq!(
            s.upgrade("nobody"),
            Err(GameError::CharacterNotFound("nobody".to_string()))
        );
        assert_eq!(s.drain_notifications().len(), 1);
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_upgrade_persists() {
        let dir = scratch_dir("upgrade");
        let id = {
            let mut data = DataManager::default();
            data.config.rarity_weights = vec![(Rarity::One, 1.0)];
            let mut s = Session::with_seed(data, SaveStore::new(&dir), 5);
            s.draw_one().unwrap();
            let id = s.roster().characters()[0].id().to_string();
            let outcome = s.upgrade(&id).unwrap();
            assert_eq!(outcome.cost, 100);
            assert_eq!(s.gold(), 600);
            id
        };

        let reloaded = Session::with_seed(DataManager::default(), SaveStore::new(&dir), 6);
        assert_eq!(reloaded.roster().get(&id).unwrap().level, 2);
        assert_eq!(reloaded.gold(), 600);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_stage_clear_pays_once_and_unlocks() {
        let mut data = DataManager::default();
        data.config.skill_use_chance = 0.0;
        data.config.player_base_hp = 1_000_000;
        data.config.rarity_weights = vec![(Rarity::Five, 1.0)];
        let mut s = Session::with_seed(data, SaveStore::new(scratch_dir("clear")), 21);

        s.draw_one().unwrap();
        let id = s.roster().characters()[0].id().to_string();
        let gold_before = s.gold();

        s.start_stage_battle(&id, 0).unwrap();
        let mut steps = 0;
        while s.battle_in_progress() && steps < 10_000 {
            s.advance_battle().unwrap();
            steps += 1;
        }

        let battle = s.battle().unwrap();
        assert_eq!(battle.phase(), BattlePhase::StageCleared);
        let kills = battle.monsters_defeated() as u64;
        // 30 gold per monster plus the stage's 100 + 50 boss bonus
        assert_eq!(s.gold(), gold_before + kills * 30 + 150);
        assert_eq!(s.stages().get(0).unwrap().clear_count, 1);
        assert!(s.stages().is_unlocked(1));
        assert_eq!(s.statistics().battles_won, 1);

        // Finished battles cannot be advanced again
        assert_eq!(s.advance_battle(), Err(GameError::NoActiveBattle));
        assert_eq!(s.stages().get(0).unwrap().clear_count, 1);
        let _ = fs::remove_dir_all(s.store().dir());
    }

    #[test]
    fn test_snapshot_available_during_battle() {
        let mut s = session("snapshot");
        s.draw_one().unwrap();
        let id = s.roster().characters()[0].id().to_string();
        s.start_endless_battle(&id).unwrap();
        s.advance_battle().unwrap();

        let snapshot = s.battle_snapshot().unwrap();
        assert_eq!(snapshot.character_id, id);
        assert_eq!(snapshot.phase, BattlePhase::PlayerActing);
        assert_eq!(snapshot.monster_total, None);

        assert_eq!(s.advance_battle_step(0).unwrap(), None);
        assert!(s.advance_battle_step(1).unwrap().is_some());
        let _ = fs::remove_dir_all(s.store().dir());
    }
}
