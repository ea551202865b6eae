//! Turn-based battle state machine
//!
//! A battle never runs on its own: the caller invokes `advance` once per
//! step and may pause between calls. Each call resolves exactly one phase.
//!
//! ```text
//! Idle -> PlayerActing -> MonsterActing -> PlayerActing -> ...
//!              |                 |
//!              |                 +-> Defeat
//!              +-> next monster / StageCleared
//! ```

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;

use super::damage::{apply_damage, apply_heal, normal_attack_damage, resolve_skill, roll_status, SkillEffect};
use super::status::{ActiveStatus, StatusEffects};
use crate::currency::CurrencyLedger;
use crate::data::{Catalog, GameConfig, MonsterDefinition, Reward, SkillDefinition, StatusEffectType};
use crate::error::{GameError, GameResult};
use crate::roster::OwnedCharacter;

/// Where a battle is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Set up, first step not taken yet
    Idle,
    PlayerActing,
    MonsterActing,
    StageCleared,
    Defeat,
    /// Left before it finished
    Abandoned,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::StageCleared | BattlePhase::Defeat | BattlePhase::Abandoned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleMode {
    /// Fixed line-up for a stage
    Stage { index: usize },
    /// Random monsters until the character falls
    Endless,
}

/// The player's choice for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    NormalAttack,
    /// Index into the character's skill list
    Skill(usize),
}

/// Something that happened during a step
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    Started { character: String, mode: BattleMode },
    MonsterAppeared { name: String, hp: i32 },
    NormalAttack { damage: i32, monster_hp: i32 },
    SkillUsed { skill: String, mana_cost: i32 },
    SkillDamage { skill: String, damage: i32, monster_hp: i32 },
    SkillHeal { skill: String, amount: i32, player_hp: i32 },
    Buff { skill: String },
    Debuff { skill: String },
    StatusApplied { effect: StatusEffectType, turns: u32 },
    StatusResisted { effect: StatusEffectType },
    StatusExpired { effect: StatusEffectType },
    MonsterAttack { monster: String, damage: i32, player_hp: i32 },
    MonsterDefeated { name: String, reward: Reward },
    LevelUp { character: String, level: u32 },
    StageCleared { index: usize },
    Defeat { monsters_defeated: u32, totals: Reward },
    Abandoned,
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::Started { character, mode } => match mode {
                BattleMode::Stage { index } => write!(f, "{} enters stage {}", character, index + 1),
                BattleMode::Endless => write!(f, "{} starts an endless battle", character),
            },
            BattleEvent::MonsterAppeared { name, hp } => write!(f, "A {} appears ({} HP)", name, hp),
            BattleEvent::NormalAttack { damage, monster_hp } => {
                write!(f, "Attack deals {} damage ({} HP left)", damage, monster_hp)
            }
            BattleEvent::SkillUsed { skill, mana_cost } => write!(f, "Uses {} (-{} mana)", skill, mana_cost),
            BattleEvent::SkillDamage { skill, damage, monster_hp } => {
                write!(f, "{} deals {} damage ({} HP left)", skill, damage, monster_hp)
            }
            BattleEvent::SkillHeal { skill, amount, player_hp } => {
                write!(f, "{} heals {} HP ({} HP)", skill, amount, player_hp)
            }
            BattleEvent::Buff { skill } => write!(f, "{} empowers the hero", skill),
            BattleEvent::Debuff { skill } => write!(f, "{} weakens the enemy", skill),
            BattleEvent::StatusApplied { effect, turns } => {
                write!(f, "{} applied for {} turns", effect.name(), turns)
            }
            BattleEvent::StatusResisted { effect } => write!(f, "{} was resisted", effect.name()),
            BattleEvent::StatusExpired { effect } => write!(f, "{} wore off", effect.name()),
            BattleEvent::MonsterAttack { monster, damage, player_hp } => {
                write!(f, "{} hits for {} damage ({} HP left)", monster, damage, player_hp)
            }
            BattleEvent::MonsterDefeated { name, reward } => {
                write!(f, "{} defeated! +{} exp, +{} gold", name, reward.exp, reward.gold)
            }
            BattleEvent::LevelUp { character, level } => write!(f, "{} reached level {}!", character, level),
            BattleEvent::StageCleared { index } => write!(f, "Stage {} cleared!", index + 1),
            BattleEvent::Defeat { monsters_defeated, totals } => write!(
                f,
                "Defeated after {} kills. Earned {} exp, {} gold",
                monsters_defeated, totals.exp, totals.gold
            ),
            BattleEvent::Abandoned => write!(f, "Left the battle"),
        }
    }
}

/// Everything a step may touch outside the battle itself
pub struct BattleContext<'a, R: Rng> {
    pub character: &'a mut OwnedCharacter,
    pub catalog: &'a Catalog,
    pub config: &'a GameConfig,
    pub ledger: &'a mut CurrencyLedger,
    pub rng: &'a mut R,
}

/// Owned copy of the visible battle state
#[derive(Debug, Clone, PartialEq)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    pub mode: BattleMode,
    pub step: u64,
    pub character_id: String,
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub cooldowns: Vec<u32>,
    pub monster_name: String,
    pub monster_hp: i32,
    pub monster_max_hp: i32,
    pub monster_statuses: Vec<ActiveStatus>,
    /// 1-based position in the line-up
    pub monster_number: usize,
    /// Line-up size; `None` in endless mode
    pub monster_total: Option<usize>,
    pub monsters_defeated: u32,
    pub totals: Reward,
}

/// Pick the player's action for this turn
///
/// Skills off cooldown with enough mana are eligible. With at least one,
/// a skill is used with probability `skill_chance`, picked uniformly.
pub fn select_action(
    character: &OwnedCharacter,
    catalog: &Catalog,
    skill_chance: f32,
    rng: &mut impl Rng,
) -> PlayerAction {
    let eligible: Vec<usize> = character
        .definition()
        .skills
        .iter()
        .enumerate()
        .filter(|(i, id)| catalog.skill(id).is_some_and(|s| character.can_use_skill(*i, s)))
        .map(|(i, _)| i)
        .collect();

    if eligible.is_empty() {
        return PlayerAction::NormalAttack;
    }

    if rng.gen::<f32>() < skill_chance {
        PlayerAction::Skill(eligible[rng.gen_range(0..eligible.len())])
    } else {
        PlayerAction::NormalAttack
    }
}

#[derive(Debug, Clone)]
pub struct Battle {
    mode: BattleMode,
    phase: BattlePhase,
    step: u64,
    character_id: String,
    player_hp: i32,
    player_max_hp: i32,
    current: MonsterDefinition,
    upcoming: VecDeque<MonsterDefinition>,
    monster_number: usize,
    monster_total: Option<usize>,
    monster_hp: i32,
    monster_status: StatusEffects,
    monsters_defeated: u32,
    totals: Reward,
    missing_skills_logged: bool,
}

impl Battle {
    /// Set up a stage battle against an ordered line-up
    pub fn stage(
        index: usize,
        lineup: Vec<MonsterDefinition>,
        character: &mut OwnedCharacter,
        config: &GameConfig,
    ) -> GameResult<Self> {
        let total = lineup.len();
        let mut upcoming: VecDeque<MonsterDefinition> = lineup.into();
        let first = upcoming.pop_front().ok_or(GameError::NoMonsters)?;
        Ok(Self::begin(BattleMode::Stage { index }, first, upcoming, Some(total), character, config))
    }

    /// Set up an endless battle with monsters drawn from the catalog
    pub fn endless(
        character: &mut OwnedCharacter,
        catalog: &Catalog,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> GameResult<Self> {
        let first = random_monster(catalog, rng).ok_or(GameError::NoMonsters)?;
        Ok(Self::begin(BattleMode::Endless, first, VecDeque::new(), None, character, config))
    }

    // Cooldowns carry over between battles; only HP and mana reset.
    fn begin(
        mode: BattleMode,
        first: MonsterDefinition,
        upcoming: VecDeque<MonsterDefinition>,
        monster_total: Option<usize>,
        character: &mut OwnedCharacter,
        config: &GameConfig,
    ) -> Self {
        character.refill_mana();
        log::info!("Battle start: {} ({:?})", character.name(), mode);

        Self {
            mode,
            phase: BattlePhase::Idle,
            step: 0,
            character_id: character.id().to_string(),
            player_hp: config.player_base_hp,
            player_max_hp: config.player_base_hp,
            monster_hp: first.max_hp,
            current: first,
            upcoming,
            monster_number: 1,
            monster_total,
            monster_status: StatusEffects::new(),
            monsters_defeated: 0,
            totals: Reward::default(),
            missing_skills_logged: false,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn mode(&self) -> BattleMode {
        self.mode
    }

    /// Steps taken so far; also the sequence number the next step expects
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn player_hp(&self) -> i32 {
        self.player_hp
    }

    pub fn monster_hp(&self) -> i32 {
        self.monster_hp
    }

    pub fn current_monster(&self) -> &MonsterDefinition {
        &self.current
    }

    pub fn monster_statuses(&self) -> &StatusEffects {
        &self.monster_status
    }

    pub fn monsters_defeated(&self) -> u32 {
        self.monsters_defeated
    }

    /// Gold and exp granted so far in this battle
    pub fn totals(&self) -> Reward {
        self.totals
    }

    pub fn snapshot(&self, character: &OwnedCharacter) -> BattleSnapshot {
        BattleSnapshot {
            phase: self.phase,
            mode: self.mode,
            step: self.step,
            character_id: self.character_id.clone(),
            player_hp: self.player_hp,
            player_max_hp: self.player_max_hp,
            mana: character.current_mana(),
            max_mana: character.max_mana(),
            cooldowns: character.skill_cooldowns().to_vec(),
            monster_name: self.current.name.clone(),
            monster_hp: self.monster_hp,
            monster_max_hp: self.current.max_hp,
            monster_statuses: self.monster_status.active().to_vec(),
            monster_number: self.monster_number,
            monster_total: self.monster_total,
            monsters_defeated: self.monsters_defeated,
            totals: self.totals,
        }
    }

    /// Advance only if `expected` matches the current step
    ///
    /// Returns `None` for a stale or duplicate call.
    pub fn advance_step<R: Rng>(&mut self, expected: u64, ctx: &mut BattleContext<'_, R>) -> Option<Vec<BattleEvent>> {
        if expected != self.step {
            log::warn!("Ignoring stale battle step {} (current {})", expected, self.step);
            return None;
        }
        Some(self.advance(ctx))
    }

    /// Resolve the current phase and move to the next one
    ///
    /// A finished battle ignores further calls.
    pub fn advance<R: Rng>(&mut self, ctx: &mut BattleContext<'_, R>) -> Vec<BattleEvent> {
        if self.phase.is_terminal() {
            log::debug!("advance called on a finished battle ({:?})", self.phase);
            return Vec::new();
        }
        if ctx.character.id() != self.character_id {
            log::warn!(
                "Battle belongs to '{}', got '{}'; step ignored",
                self.character_id,
                ctx.character.id()
            );
            return Vec::new();
        }

        let mut events = Vec::new();
        match self.phase {
            BattlePhase::Idle => {
                events.push(BattleEvent::Started {
                    character: ctx.character.name().to_string(),
                    mode: self.mode,
                });
                events.push(self.appeared());
                self.phase = BattlePhase::PlayerActing;
            }
            BattlePhase::PlayerActing => self.player_turn(ctx, &mut events),
            BattlePhase::MonsterActing => self.monster_turn(&mut events),
            _ => {}
        }

        self.step += 1;
        events
    }

    /// Step until the battle finishes or `max_steps` is reached
    pub fn run_to_end<R: Rng>(&mut self, ctx: &mut BattleContext<'_, R>, max_steps: usize) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        for _ in 0..max_steps {
            if self.is_finished() {
                break;
            }
            events.extend(self.advance(ctx));
        }
        events
    }

    /// Leave the battle; grants already paid stay paid
    pub fn abandon(&mut self) -> Option<BattleEvent> {
        if self.phase.is_terminal() {
            return None;
        }
        log::info!(
            "Battle abandoned after {} kills ({} exp, {} gold kept)",
            self.monsters_defeated,
            self.totals.exp,
            self.totals.gold
        );
        self.phase = BattlePhase::Abandoned;
        Some(BattleEvent::Abandoned)
    }

    fn appeared(&self) -> BattleEvent {
        BattleEvent::MonsterAppeared {
            name: self.current.name.clone(),
            hp: self.monster_hp,
        }
    }

    fn player_turn<R: Rng>(&mut self, ctx: &mut BattleContext<'_, R>, events: &mut Vec<BattleEvent>) {
        let catalog = ctx.catalog;

        let action = if ctx.character.skill_count() == 0 {
            if !self.missing_skills_logged {
                log::warn!("{}; using normal attacks", GameError::MissingSkillData(self.character_id.clone()));
                self.missing_skills_logged = true;
            }
            PlayerAction::NormalAttack
        } else {
            select_action(ctx.character, catalog, ctx.config.skill_use_chance, ctx.rng)
        };

        let skill = match action {
            PlayerAction::Skill(index) => ctx
                .character
                .definition()
                .skills
                .get(index)
                .and_then(|id| catalog.skill(id))
                .map(|skill| (index, skill)),
            PlayerAction::NormalAttack => None,
        };

        match skill {
            Some((index, skill)) => {
                if ctx.character.use_skill(index, skill) {
                    self.cast(skill, ctx, events);
                } else {
                    self.normal_attack(ctx.character, events);
                }
            }
            None => self.normal_attack(ctx.character, events),
        }

        ctx.character.end_turn();

        if self.monster_hp <= 0 {
            self.monster_defeated(ctx, events);
        } else {
            self.phase = BattlePhase::MonsterActing;
        }
    }

    fn normal_attack(&mut self, character: &OwnedCharacter, events: &mut Vec<BattleEvent>) {
        let damage = normal_attack_damage(character);
        self.monster_hp = apply_damage(self.monster_hp, damage);
        events.push(BattleEvent::NormalAttack {
            damage,
            monster_hp: self.monster_hp,
        });
    }

    fn cast<R: Rng>(&mut self, skill: &SkillDefinition, ctx: &mut BattleContext<'_, R>, events: &mut Vec<BattleEvent>) {
        events.push(BattleEvent::SkillUsed {
            skill: skill.name.clone(),
            mana_cost: skill.mana_cost,
        });

        match resolve_skill(skill, ctx.character.level) {
            SkillEffect::Damage(damage) => {
                self.monster_hp = apply_damage(self.monster_hp, damage);
                events.push(BattleEvent::SkillDamage {
                    skill: skill.name.clone(),
                    damage,
                    monster_hp: self.monster_hp,
                });
            }
            SkillEffect::Heal(amount) => {
                self.player_hp = apply_heal(self.player_hp, amount, self.player_max_hp);
                events.push(BattleEvent::SkillHeal {
                    skill: skill.name.clone(),
                    amount,
                    player_hp: self.player_hp,
                });
            }
            SkillEffect::Buff => {
                log::info!("{} used buff {}", ctx.character.name(), skill.name);
                events.push(BattleEvent::Buff { skill: skill.name.clone() });
            }
            SkillEffect::Debuff => {
                log::info!("{} used debuff {}", ctx.character.name(), skill.name);
                events.push(BattleEvent::Debuff { skill: skill.name.clone() });
            }
            SkillEffect::StatusOnly => {}
        }

        if self.monster_hp <= 0 {
            return;
        }
        match roll_status(skill, ctx.rng) {
            Some(Ok((effect, turns))) => {
                self.monster_status.add_effect(effect, turns);
                events.push(BattleEvent::StatusApplied { effect, turns });
            }
            Some(Err(effect)) => events.push(BattleEvent::StatusResisted { effect }),
            None => {}
        }
    }

    fn monster_turn(&mut self, events: &mut Vec<BattleEvent>) {
        let damage = self.current.attack;
        self.player_hp = apply_damage(self.player_hp, damage);
        events.push(BattleEvent::MonsterAttack {
            monster: self.current.name.clone(),
            damage,
            player_hp: self.player_hp,
        });

        for effect in self.monster_status.tick() {
            events.push(BattleEvent::StatusExpired { effect });
        }

        if self.player_hp <= 0 {
            log::info!(
                "Battle lost: {} kills, {} exp, {} gold",
                self.monsters_defeated,
                self.totals.exp,
                self.totals.gold
            );
            self.phase = BattlePhase::Defeat;
            events.push(BattleEvent::Defeat {
                monsters_defeated: self.monsters_defeated,
                totals: self.totals,
            });
        } else {
            self.phase = BattlePhase::PlayerActing;
        }
    }

    // Rewards are granted as each monster falls, never batched.
    fn monster_defeated<R: Rng>(&mut self, ctx: &mut BattleContext<'_, R>, events: &mut Vec<BattleEvent>) {
        let reward = ctx.config.monster_reward();
        ctx.ledger.add(reward.gold);
        let progress = ctx.character.add_experience(reward.exp);
        self.totals += reward;
        self.monsters_defeated += 1;

        events.push(BattleEvent::MonsterDefeated {
            name: self.current.name.clone(),
            reward,
        });
        if progress.leveled_up() {
            events.push(BattleEvent::LevelUp {
                character: ctx.character.name().to_string(),
                level: progress.new_level,
            });
        }

        self.monster_status.clear();

        let next = match self.mode {
            BattleMode::Stage { .. } => self.upcoming.pop_front(),
            BattleMode::Endless => random_monster(ctx.catalog, ctx.rng),
        };

        match (next, self.mode) {
            (Some(monster), _) => {
                self.monster_hp = monster.max_hp;
                self.current = monster;
                self.monster_number += 1;
                events.push(self.appeared());
                self.phase = BattlePhase::PlayerActing;
            }
            (None, BattleMode::Stage { index }) => {
                log::info!("Stage {} line-up defeated", index);
                self.phase = BattlePhase::StageCleared;
                events.push(BattleEvent::StageCleared { index });
            }
            (None, BattleMode::Endless) => {
                log::warn!("No monsters left to spawn; ending endless battle");
                self.phase = BattlePhase::Abandoned;
                events.push(BattleEvent::Abandoned);
            }
        }
    }
}

fn random_monster(catalog: &Catalog, rng: &mut impl Rng) -> Option<MonsterDefinition> {
    let templates = &catalog.monsters().templates;
    if templates.is_empty() {
        return None;
    }
    Some(templates[rng.gen_range(0..templates.len())].clone())
}
