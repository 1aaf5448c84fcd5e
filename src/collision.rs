/// AABB collision resolution.
///
/// Order per tick: missiles vs enemies, then player vs enemies, then player vs
/// powerups.  Hits only clear `alive`; the collection is compacted once after
/// every check has run, so indices stay stable for the whole pass.  Nothing
/// is checked after the hit that ends the run.

use rand::Rng;
use tracing::debug;

use crate::config::{GameConfig, Viewport};
use crate::entities::{Aim, BurstKind, Entity, EntityKind, GameEvent, GameState, GameStatus};
use crate::progression;
use crate::spawner;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

fn rect_of(state: &GameState, i: usize) -> Rect {
    let e = &state.entities[i];
    Rect::new(e.x, e.y, e.width, e.height)
}

pub fn aabb_overlap(a: &Entity, b: &Entity) -> bool {
    Rect::new(a.x, a.y, a.width, a.height).overlaps(&Rect::new(b.x, b.y, b.width, b.height))
}

/// Square hitbox centred on the aim point.
pub fn player_hitbox(aim: &Aim, viewport: &Viewport) -> Rect {
    let size = viewport.sizes().player_hitbox;
    Rect::new(aim.x - size / 2.0, aim.y - size / 2.0, size, size)
}

pub fn resolve_collisions(state: &mut GameState, aim: &Aim, config: &GameConfig, rng: &mut impl Rng) {
    missiles_vs_enemies(state, config, rng);
    player_vs_enemies(state, aim, config, rng);
    if state.status == GameStatus::Playing {
        player_vs_powerups(state, aim, config, rng);
    }
    state.entities.retain(|e| e.alive);
}

fn missiles_vs_enemies(state: &mut GameState, config: &GameConfig, rng: &mut impl Rng) {
    // Bursts spawned below land past `n` and are never collision targets.
    let n = state.entities.len();
    for mi in 0..n {
        if !state.entities[mi].alive || !matches!(state.entities[mi].kind, EntityKind::Missile) {
            continue;
        }
        let missile = rect_of(state, mi);

        for ei in 0..n {
            // Re-checked per pair: an earlier missile may already have killed it.
            let target = &state.entities[ei];
            if !target.is_live_enemy() || target.enemy().is_some_and(|s| s.is_projectile()) {
                continue;
            }
            if !missile.overlaps(&rect_of(state, ei)) {
                continue;
            }

            state.entities[mi].alive = false;
            let center = state.entities[ei].center();
            let id = state.entities[ei].id;
            let Some(enemy) = state.entities[ei].enemy_mut() else {
                break;
            };
            enemy.life -= 1;
            let (life, kind) = (enemy.life, enemy.kind);

            if life > 0 {
                state.events.push(GameEvent::EnemyHit { id, life });
                spawner::spawn_burst(state, center, BurstKind::Hit, config, rng);
            } else {
                state.entities[ei].alive = false;
                spawner::spawn_burst(state, center, BurstKind::Kill, config, rng);
                progression::award_kill(state, id, kind, config);
                if kind.is_boss() {
                    progression::boss_defeated(state, config);
                }
                debug!(id, ?kind, score = state.progression.score, "enemy destroyed");
            }
            break;
        }
    }
}

fn player_vs_enemies(state: &mut GameState, aim: &Aim, config: &GameConfig, rng: &mut impl Rng) {
    let hitbox = player_hitbox(aim, &state.viewport);
    let n = state.entities.len();
    for i in 0..n {
        if !state.entities[i].is_live_enemy() || !hitbox.overlaps(&rect_of(state, i)) {
            continue;
        }
        let was_boss = state.entities[i].is_boss();
        state.entities[i].alive = false;
        let center = state.entities[i].center();
        spawner::spawn_burst(state, center, BurstKind::Damage, config, rng);
        progression::lose_life(state, config);
        if was_boss {
            progression::boss_escaped(state);
        }
        debug!(id = state.entities[i].id, lives = state.progression.lives, "player hit");
        if state.status != GameStatus::Playing {
            break;
        }
    }
}

fn player_vs_powerups(state: &mut GameState, aim: &Aim, config: &GameConfig, rng: &mut impl Rng) {
    let hitbox = player_hitbox(aim, &state.viewport);
    let n = state.entities.len();
    for i in 0..n {
        let e = &state.entities[i];
        if !e.alive || !matches!(e.kind, EntityKind::Powerup) || !hitbox.overlaps(&rect_of(state, i)) {
            continue;
        }
        state.entities[i].alive = false;
        let center = state.entities[i].center();
        progression::collect_powerup(state, config);
        spawner::spawn_burst(state, center, BurstKind::Heal, config, rng);
    }
}
