/// Read-only view of a frame for renderers and HUDs.
///
/// Built after each step; serializable so a browser front end can receive it
/// as JSON.

use serde::Serialize;

use crate::collision::player_hitbox;
use crate::config::GameConfig;
use crate::entities::{
    Aim, BurstKind, ControlState, EnemyKind, Entity, EntityId, EntityKind, GameEvent, GameState,
    GameStatus, Lean,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Missile,
    Enemy,
    Particle,
    Powerup,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: ViewKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<EnemyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_life: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst: Option<BurstKind>,
    /// Particle fade in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
}

impl EntityView {
    pub fn from_entity(e: &Entity, config: &GameConfig) -> Self {
        let mut view = EntityView {
            id: e.id,
            kind: ViewKind::Missile,
            x: e.x,
            y: e.y,
            width: e.width,
            height: e.height,
            rotation: e.rotation(),
            subtype: None,
            life: None,
            max_life: None,
            burst: None,
            alpha: None,
        };
        match &e.kind {
            EntityKind::Missile => {}
            EntityKind::Powerup => view.kind = ViewKind::Powerup,
            EntityKind::Enemy(s) => {
                view.kind = ViewKind::Enemy;
                view.subtype = Some(s.kind);
                view.life = Some(s.life);
                view.max_life = Some(s.max_life);
            }
            EntityKind::Particle(p) => {
                view.kind = ViewKind::Particle;
                view.burst = Some(p.burst);
                let max = config.particle_life.max(1) as f32;
                view.alpha = Some((p.life as f32 / max).clamp(0.0, 1.0));
            }
        }
        view
    }

    pub fn is_boss(&self) -> bool {
        self.subtype.is_some_and(EnemyKind::is_boss)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub aim: Aim,
    pub hitbox_size: f32,
    pub mouth_open: bool,
    pub lean: Lean,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub status: GameStatus,
    pub face_missing: bool,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub level: u32,
    pub power_level: u8,
    pub boss_active: bool,
    pub boss_warning: bool,
    pub level_up: bool,
    pub damage_flash: bool,
    pub player: PlayerView,
    pub entities: Vec<EntityView>,
    pub events: Vec<GameEvent>,
}

pub fn build_snapshot(
    state: &GameState,
    control: &ControlState,
    face_missing: bool,
    config: &GameConfig,
) -> RenderSnapshot {
    let p = &state.progression;
    RenderSnapshot {
        frame: state.frame,
        status: state.status,
        face_missing,
        score: p.score,
        high_score: p.high_score,
        lives: p.lives,
        max_lives: config.max_lives,
        level: p.level,
        power_level: p.power_level,
        boss_active: p.boss_active,
        boss_warning: state.timers.boss_warning > 0,
        level_up: state.timers.level_up > 0,
        damage_flash: state.timers.damage_flash > 0,
        player: PlayerView {
            aim: control.aim,
            hitbox_size: player_hitbox(&control.aim, &state.viewport).w,
            mouth_open: control.mouth_open,
            lean: control.lean,
        },
        entities: state
            .entities
            .iter()
            .map(|e| EntityView::from_entity(e, config))
            .collect(),
        events: state.events.clone(),
    }
}
