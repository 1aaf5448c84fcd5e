/// Per-frame simulation step.
///
/// `tick` takes an immutable reference to the current `GameState` (plus the
/// control state and an RNG handle) and returns a brand-new `GameState`.
/// Side effects are limited to the injected RNG.  One call is one logical
/// frame; there is no delta-time scaling.

use rand::Rng;
use tracing::debug;

use crate::collision;
use crate::config::{GameConfig, Viewport};
use crate::entities::{
    ControlState, EntityKind, GameEvent, GameState, GameStatus, Timers,
};
use crate::progression;
use crate::spawner;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build an empty state waiting for the first face.
pub fn init_state(config: &GameConfig, viewport: Viewport, high_score: u32) -> GameState {
    GameState {
        entities: Vec::new(),
        progression: progression::initial_progression(config, high_score),
        timers: Timers::default(),
        status: GameStatus::Start,
        frame: 0,
        viewport,
        events: Vec::new(),
        next_id: 1,
    }
}

/// A fresh run in the Playing phase.  Only the high score survives.
pub fn new_run(config: &GameConfig, viewport: Viewport, high_score: u32) -> GameState {
    GameState {
        status: GameStatus::Playing,
        events: vec![GameEvent::Restarted],
        ..init_state(config, viewport, high_score)
    }
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Fire a missile fan from the aim point if the mouth just opened.
pub fn player_shoot(state: &GameState, control: &ControlState, config: &GameConfig) -> GameState {
    let mut next = state.clone();
    if next.status == GameStatus::Playing && control.shoot_triggered() {
        spawner::spawn_missiles(&mut next, (control.aim.x, control.aim.y), config);
    }
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Does nothing outside Playing.
///
/// Order: timers, boss threshold, spawns, movement, boundary purge,
/// collisions.  A run that ends part way through stops there.  Events raised
/// here are appended to `events`; the caller clears them between frames.
pub fn tick(
    state: &GameState,
    control: &ControlState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing {
        return next;
    }

    // ── 1. Frame counter and display timers ──────────────────────────────────
    next.frame += 1;
    progression::decay_timers(&mut next);

    // ── 2. Boss threshold (flag re-derived first so a lost boss can't block it)
    progression::heal_boss_flag(&mut next);
    progression::check_boss_threshold(&mut next, config, rng);

    // ── 3. Cadence spawns ────────────────────────────────────────────────────
    spawner::run_spawn_cadence(&mut next, &control.aim, config, rng);

    // ── 4. Movement ──────────────────────────────────────────────────────────
    advance_entities(&mut next, config);

    // ── 5. Boundary purge ────────────────────────────────────────────────────
    purge_out_of_bounds(&mut next, config);
    if next.status != GameStatus::Playing {
        return next;
    }

    // ── 6. Collisions ────────────────────────────────────────────────────────
    collision::resolve_collisions(&mut next, &control.aim, config, rng);

    next
}

/// Move everything by its velocity; particles also fall and age.
pub fn advance_entities(state: &mut GameState, config: &GameConfig) {
    for e in state.entities.iter_mut() {
        e.x += e.vx;
        e.y += e.vy;
        match &mut e.kind {
            EntityKind::Particle(p) => {
                e.vy += config.particle_gravity;
                p.life -= 1;
            }
            EntityKind::Enemy(s) => s.age += 1,
            EntityKind::Missile | EntityKind::Powerup => {}
        }
    }
}

/// Drop expired particles and everything that left the playfield margins.
///
/// A live enemy falling past the bottom costs a life; a boss leaving by any
/// edge also resets the boss state.  Fireballs leaving the screen cost nothing.
pub fn purge_out_of_bounds(state: &mut GameState, config: &GameConfig) {
    let width = state.viewport.width;
    let bottom = state.viewport.height + config.bottom_margin;

    let mut escaped = Vec::new();
    let mut boss_drifted_off = false;
    state.entities.retain(|e| {
        if let EntityKind::Particle(p) = &e.kind {
            if p.life <= 0 {
                return false;
            }
        }
        if e.y > bottom {
            if e.is_live_enemy() && !e.enemy().is_some_and(|s| s.is_projectile()) {
                escaped.push((e.id, e.is_boss()));
            }
            return false;
        }
        let off_top = e.y + e.height < -config.top_margin;
        let off_side = e.x + e.width < -config.side_margin || e.x > width + config.side_margin;
        if (off_top || off_side) && e.is_boss() {
            boss_drifted_off = true;
        }
        !(off_top || off_side)
    });

    // Sideways exits cost nothing, but the boss still has to come back.
    if boss_drifted_off {
        progression::boss_escaped(state);
    }
    for (id, was_boss) in escaped {
        debug!(id, was_boss, "enemy escaped past bottom");
        state.events.push(GameEvent::EnemyEscaped { id });
        if was_boss {
            progression::boss_escaped(state);
        }
        progression::lose_life(state, config);
    }
}
