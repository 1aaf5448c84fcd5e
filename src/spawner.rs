/// Entity factories and the per-frame spawn cadence.
///
/// All randomness comes through the injected `rng` so tests can seed it.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{
    Aim, BurstKind, EnemyKind, EnemyState, Entity, EntityId, EntityKind, GameEvent, GameState,
    ParticleState,
};

/// Normal enemies start this far above the playfield.
pub const ENEMY_SPAWN_Y: f32 = -100.0;
/// Bosses start closer so their bulk shows up sooner.
pub const BOSS_SPAWN_Y: f32 = -50.0;

// ── Difficulty tables ─────────────────────────────────────────────────────────

/// Frames between enemy spawns at `level`.
pub fn spawn_interval(level: u32, config: &GameConfig) -> u32 {
    config
        .base_spawn_interval
        .saturating_sub(level.saturating_mul(config.spawn_decay_per_level))
        .max(config.min_spawn_interval)
}

pub fn powerup_interval(level: u32, config: &GameConfig) -> u32 {
    spawn_interval(level, config) * config.powerup_cadence_multiplier
}

pub fn speed_multiplier(level: u32, config: &GameConfig) -> f32 {
    1.0 + level as f32 * config.speed_growth_per_level
}

/// Uniform in `[-max, max]`, or zero when the range is empty.
fn spread(rng: &mut impl Rng, max: f32) -> f32 {
    if max > 0.0 {
        rng.gen_range(-max..=max)
    } else {
        0.0
    }
}

fn random_x(rng: &mut impl Rng, playfield_width: f32, size: f32) -> f32 {
    let span = playfield_width - size;
    if span > 0.0 {
        rng.gen_range(0.0..=span)
    } else {
        0.0
    }
}

/// Uniform in `[0, max)`, or zero when the range is empty.
fn jitter(rng: &mut impl Rng, max: f32) -> f32 {
    if max > 0.0 {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}

/// `rect` is `(x, y, width, height)`, `vel` is `(vx, vy)`.
fn push(state: &mut GameState, rect: (f32, f32, f32, f32), vel: (f32, f32), kind: EntityKind) -> EntityId {
    let (x, y, w, h) = rect;
    let (vx, vy) = vel;
    let id = state.alloc_id();
    state.entities.push(Entity {
        id,
        x,
        y,
        vx,
        vy,
        width: w,
        height: h,
        alive: true,
        kind,
    });
    id
}

// ── Enemies ───────────────────────────────────────────────────────────────────

pub fn spawn_enemy(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) -> EntityId {
    let size = state.viewport.sizes().enemy;
    let kind = *EnemyKind::NORMAL.choose(rng).unwrap_or(&EnemyKind::Ghost);
    let speed = config.base_enemy_speed
        * speed_multiplier(state.progression.level, config)
        * kind.speed_factor()
        + jitter(rng, config.speed_jitter);
    let vx = spread(rng, config.max_drift);
    let x = random_x(rng, state.viewport.width, size);

    let id = push(
        state,
        (x, ENEMY_SPAWN_Y, size, size),
        (vx, speed),
        EntityKind::Enemy(EnemyState::new(kind, kind.base_life())),
    );
    debug!(id, ?kind, x, speed, "enemy spawned");
    id
}

pub fn spawn_boss(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) -> EntityId {
    let size = state.viewport.sizes().boss;
    let kind = *EnemyKind::BOSSES.choose(rng).unwrap_or(&EnemyKind::Witch);
    let life = config.boss_base_life + state.progression.level;
    let speed = config.boss_speed * speed_multiplier(state.progression.level, config) * kind.speed_factor();
    let vx = spread(rng, config.max_drift / 2.0);
    let x = random_x(rng, state.viewport.width, size);

    let id = push(
        state,
        (x, BOSS_SPAWN_Y, size, size),
        (vx, speed),
        EntityKind::Enemy(EnemyState::new(kind, life)),
    );
    state.events.push(GameEvent::BossSpawned { id, kind });
    id
}

/// Fire a fireball from `origin` toward `target` at a fixed speed.
pub fn spawn_boss_projectile(
    state: &mut GameState,
    origin: (f32, f32),
    target: (f32, f32),
    config: &GameConfig,
) -> EntityId {
    let size = state.viewport.sizes().projectile;
    let (dx, dy) = (target.0 - origin.0, target.1 - origin.1);
    let len = dx.hypot(dy);
    let (vx, vy) = if len > f32::EPSILON {
        (dx / len * config.boss_projectile_speed, dy / len * config.boss_projectile_speed)
    } else {
        (0.0, config.boss_projectile_speed)
    };

    let id = push(
        state,
        (origin.0 - size / 2.0, origin.1 - size / 2.0, size, size),
        (vx, vy),
        EntityKind::Enemy(EnemyState::new(EnemyKind::Fireball, 1)),
    );
    state.events.push(GameEvent::BossProjectileFired { id });
    id
}

// ── Powerups ──────────────────────────────────────────────────────────────────

pub fn spawn_powerup(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) -> EntityId {
    let size = state.viewport.sizes().powerup;
    let x = random_x(rng, state.viewport.width, size);
    let id = push(
        state,
        (x, -size, size, size),
        (0.0, config.powerup_speed),
        EntityKind::Powerup,
    );
    debug!(id, x, "powerup spawned");
    id
}

// ── Missiles ──────────────────────────────────────────────────────────────────

/// Fire a fan of missiles from `origin` (the aim point).
///
/// Power 1 fires one straight shot; each further level adds a pair angled
/// `missile_fan_angle` further out.
pub fn spawn_missiles(state: &mut GameState, origin: (f32, f32), config: &GameConfig) -> usize {
    let sizes = state.viewport.sizes();
    let power = state.progression.power_level.clamp(1, config.max_power_level);

    let mut angles = vec![0.0_f32];
    for ring in 1..power {
        let a = ring as f32 * config.missile_fan_angle;
        angles.push(-a);
        angles.push(a);
    }

    for &angle in &angles {
        push(
            state,
            (
                origin.0 - sizes.missile_w / 2.0,
                origin.1 - sizes.missile_h,
                sizes.missile_w,
                sizes.missile_h,
            ),
            (angle.sin() * config.missile_speed, -angle.cos() * config.missile_speed),
            EntityKind::Missile,
        );
    }

    state.events.push(GameEvent::MissilesFired { count: angles.len() });
    angles.len()
}

// ── Particles ─────────────────────────────────────────────────────────────────

/// Evenly spaced radial burst around `center`.
pub fn spawn_burst(
    state: &mut GameState,
    center: (f32, f32),
    burst: BurstKind,
    config: &GameConfig,
    rng: &mut impl Rng,
) {
    let size = state.viewport.sizes().particle;
    let count = config.particle_count.max(1);
    for i in 0..config.particle_count {
        let angle = i as f32 * TAU / count as f32;
        let speed = if config.particle_max_speed > config.particle_min_speed {
            rng.gen_range(config.particle_min_speed..=config.particle_max_speed)
        } else {
            config.particle_min_speed
        };
        push(
            state,
            (center.0 - size / 2.0, center.1 - size / 2.0, size, size),
            (angle.cos() * speed, angle.sin() * speed),
            EntityKind::Particle(ParticleState {
                life: config.particle_life as i32,
                burst,
            }),
        );
    }
}

// ── Cadence ───────────────────────────────────────────────────────────────────

/// Spawn whatever is due on `state.frame`: a normal enemy (suspended while a
/// boss is up), a powerup, and boss fireballs.
pub fn run_spawn_cadence(state: &mut GameState, aim: &Aim, config: &GameConfig, rng: &mut impl Rng) {
    let frame = state.frame;
    let level = state.progression.level;

    if !state.progression.boss_active && frame % spawn_interval(level, config) as u64 == 0 {
        spawn_enemy(state, config, rng);
    }

    if frame % powerup_interval(level, config) as u64 == 0 {
        spawn_powerup(state, config, rng);
    }

    let attacking: Vec<(f32, f32)> = state
        .entities
        .iter()
        .filter(|e| e.is_live_enemy())
        .filter_map(|e| match &e.kind {
            EntityKind::Enemy(s)
                if s.is_boss() && s.age > 0 && s.age % config.boss_attack_interval == 0 =>
            {
                Some(e.center())
            }
            _ => None,
        })
        .collect();
    for origin in attacking {
        spawn_boss_projectile(state, origin, (aim.x, aim.y), config);
    }
}
