/// Score, lives, difficulty and the boss lifecycle.
///
/// Boss lifecycle within a run:
///
/// ```text
/// Normal ─(score ≥ level × step)─► Warning + Active ─┬─(killed)──► Defeated: level + 1
///                                                     └─(escaped)─► Escaped: life lost,
///                                                                   retried next check
/// ```

use rand::Rng;
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::entities::{EnemyKind, EntityId, GameEvent, GameState, GameStatus, ProgressionState};
use crate::spawner;

/// Fresh progression for a new run.  `high_score` carries over.
pub fn initial_progression(config: &GameConfig, high_score: u32) -> ProgressionState {
    ProgressionState {
        score: 0,
        high_score,
        lives: config.starting_lives.min(config.max_lives),
        level: 1,
        power_level: 1,
        boss_active: false,
        boss_spawned_for_level: 0,
    }
}

/// Score at which the boss for `level` appears.
pub fn boss_threshold(level: u32, config: &GameConfig) -> u32 {
    level.saturating_mul(config.boss_score_step)
}

/// Spawn the boss for the current level if its threshold has been reached.
pub fn check_boss_threshold(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Option<EntityId> {
    let p = &state.progression;
    if p.boss_active
        || p.boss_spawned_for_level >= p.level
        || p.score < boss_threshold(p.level, config)
    {
        return None;
    }

    let level = p.level;
    state.progression.boss_spawned_for_level = level;
    state.progression.boss_active = true;
    state.timers.boss_warning = config.boss_warning_frames;
    state.events.push(GameEvent::BossWarning { level });

    let id = spawner::spawn_boss(state, config, rng);
    info!(level, id, score = state.progression.score, "boss incoming");
    Some(id)
}

/// Credit a confirmed kill.  Returns the reward.
pub fn award_kill(state: &mut GameState, id: EntityId, kind: EnemyKind, config: &GameConfig) -> u32 {
    let reward = if kind.is_boss() {
        config.boss_reward
    } else {
        config.normal_reward
    };
    let p = &mut state.progression;
    p.score = p.score.saturating_add(reward);
    p.high_score = p.high_score.max(p.score);
    state.events.push(GameEvent::EnemyKilled { id, kind, reward });
    reward
}

/// Take one life.  Ends the run when none remain.
pub fn lose_life(state: &mut GameState, config: &GameConfig) {
    let lives = state.progression.lives.saturating_sub(1);
    state.progression.lives = lives;
    state.timers.damage_flash = config.damage_flash_frames;
    state.events.push(GameEvent::PlayerDamaged { lives });
    if lives == 0 {
        end_run(state);
    }
}

/// Playing → GameOver.  No-op in any other phase.
pub fn end_run(state: &mut GameState) {
    if state.status != GameStatus::Playing {
        return;
    }
    let score = state.progression.score;
    state.status = GameStatus::GameOver;
    state.progression.high_score = state.progression.high_score.max(score);
    state.events.push(GameEvent::GameOver { score });
    info!(score, level = state.progression.level, frame = state.frame, "game over");
}

/// Power up (capped) and heal one life (capped).
pub fn collect_powerup(state: &mut GameState, config: &GameConfig) {
    let p = &mut state.progression;
    p.power_level = (p.power_level + 1).min(config.max_power_level);
    p.lives = (p.lives + 1).min(config.max_lives);
    state.events.push(GameEvent::PowerupCollected {
        power_level: p.power_level,
        lives: p.lives,
    });
}

pub fn boss_defeated(state: &mut GameState, config: &GameConfig) {
    let p = &mut state.progression;
    let defeated_at = p.level;
    p.boss_active = false;
    p.level += 1;
    state.timers.level_up = config.level_up_frames;
    state.timers.boss_warning = 0;
    state.events.push(GameEvent::BossDefeated { level: defeated_at });
    state.events.push(GameEvent::LevelUp { level: defeated_at + 1 });
    info!(level = defeated_at + 1, score = state.progression.score, "boss defeated, level up");
}

/// Boss left without being killed.  Rolls the spawn counter back so the boss
/// returns on the next threshold check.  The caller decides about life loss.
pub fn boss_escaped(state: &mut GameState) {
    let p = &mut state.progression;
    p.boss_active = false;
    p.boss_spawned_for_level = p.level.saturating_sub(1);
    state.timers.boss_warning = 0;
    state.events.push(GameEvent::BossEscaped);
    info!(level = p.level, "boss escaped");
}

/// Re-derive the boss flag from the entities actually present.  Returns true
/// when the flag had drifted and was corrected.
pub fn heal_boss_flag(state: &mut GameState) -> bool {
    let present = state.boss().is_some();
    if present == state.progression.boss_active {
        return false;
    }
    warn!(
        flag = state.progression.boss_active,
        present, "boss flag out of sync with entities, correcting"
    );
    state.progression.boss_active = present;
    if !present {
        state.progression.boss_spawned_for_level = state.progression.level.saturating_sub(1);
    }
    true
}

/// Decrement every running display timer by one frame.
pub fn decay_timers(state: &mut GameState) {
    let t = &mut state.timers;
    t.damage_flash = t.damage_flash.saturating_sub(1);
    t.boss_warning = t.boss_warning.saturating_sub(1);
    t.level_up = t.level_up.saturating_sub(1);
}
