//! Combat system

pub mod battle;
pub mod damage;
pub mod status;

pub use battle::{
    select_action, Battle, BattleContext, BattleEvent, BattleMode, BattlePhase, BattleSnapshot, PlayerAction,
};
pub use damage::{apply_damage, apply_heal, normal_attack_damage, resolve_skill, roll_status, SkillEffect};
pub use status::{ActiveStatus, StatusEffects};
