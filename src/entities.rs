/// All game entity types.  Pure data, no logic beyond small accessors.

use serde::Serialize;

use crate::config::Viewport;

pub type EntityId = u64;

// ── Enemy subtypes ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Ghost,
    Bat,
    Pumpkin,
    /// Boss: summons fireballs at a steady rhythm.
    Witch,
    /// Boss: bigger, slower, tougher.
    Reaper,
    /// Homing boss projectile.  Cannot be shot down.
    Fireball,
}

impl EnemyKind {
    pub const NORMAL: [EnemyKind; 3] = [EnemyKind::Ghost, EnemyKind::Bat, EnemyKind::Pumpkin];
    pub const BOSSES: [EnemyKind; 2] = [EnemyKind::Witch, EnemyKind::Reaper];

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Witch | EnemyKind::Reaper)
    }

    pub fn is_projectile(self) -> bool {
        matches!(self, EnemyKind::Fireball)
    }

    /// Multiplier applied on top of the difficulty speed.
    pub fn speed_factor(self) -> f32 {
        match self {
            EnemyKind::Ghost => 1.0,
            EnemyKind::Bat => 1.5,
            EnemyKind::Pumpkin => 0.7,
            EnemyKind::Witch => 1.0,
            EnemyKind::Reaper => 0.8,
            EnemyKind::Fireball => 1.0,
        }
    }

    /// Hit points for normal enemies.  Boss life scales with level instead.
    pub fn base_life(self) -> u32 {
        match self {
            EnemyKind::Pumpkin => 2,
            _ => 1,
        }
    }
}

// ── Kind payloads ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyState {
    pub life: u32,
    pub max_life: u32,
    pub kind: EnemyKind,
    /// Frames since spawn; bosses attack on multiples of their interval.
    pub age: u32,
}

impl EnemyState {
    pub fn new(kind: EnemyKind, life: u32) -> Self {
        Self { life, max_life: life, kind, age: 0 }
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    pub fn is_projectile(&self) -> bool {
        self.kind.is_projectile()
    }
}

/// Which event produced a particle burst; renderers colour by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstKind {
    Hit,
    Kill,
    Damage,
    Heal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleState {
    /// Remaining lifetime in frames.
    pub life: i32,
    pub burst: BurstKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Missile,
    Enemy(EnemyState),
    Particle(ParticleState),
    Powerup,
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// Position is the top-left corner of the bounding box, in viewport pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Cleared during collision resolution; dead entities are compacted out
    /// once all checks for the tick are done.
    pub alive: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn enemy(&self) -> Option<&EnemyState> {
        match &self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self) -> Option<&mut EnemyState> {
        match &mut self.kind {
            EntityKind::Enemy(e) => Some(e),
            _ => None,
        }
    }

    /// Still a valid collision target: alive, an enemy, and has life left.
    pub fn is_live_enemy(&self) -> bool {
        self.alive && matches!(&self.kind, EntityKind::Enemy(e) if e.life > 0)
    }

    pub fn is_boss(&self) -> bool {
        self.alive && matches!(&self.kind, EntityKind::Enemy(e) if e.is_boss())
    }

    pub fn is_particle(&self) -> bool {
        matches!(self.kind, EntityKind::Particle(_))
    }

    /// Rotation in radians for renderers.
    pub fn rotation(&self) -> f32 {
        match &self.kind {
            EntityKind::Missile => self.vx.atan2(-self.vy),
            EntityKind::Enemy(e) if !e.is_projectile() => self.vx * 0.2,
            _ => 0.0,
        }
    }
}

// ── Control ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lean {
    Left,
    #[default]
    Center,
    Right,
}

/// Mapped aim: normalized (after gain and clamping) and visual pixels
/// (mirrored on X to match a flipped camera preview).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Aim {
    pub nx: f32,
    pub ny: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ControlState {
    pub aim: Aim,
    pub mouth_open: bool,
    pub prev_mouth_open: bool,
    pub lean: Lean,
    pub face_present: bool,
}

impl ControlState {
    /// True only on the closed → open transition.
    pub fn shoot_triggered(&self) -> bool {
        self.mouth_open && !self.prev_mouth_open
    }
}

// ── Progression ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Start,
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressionState {
    pub score: u32,
    /// Best score across restarts of this session.
    pub high_score: u32,
    pub lives: u32,
    pub level: u32,
    pub power_level: u8,
    pub boss_active: bool,
    /// Highest level a boss has been spawned for.
    pub boss_spawned_for_level: u32,
}

/// Countdown timers for transient visual effects.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Timers {
    pub damage_flash: u32,
    pub boss_warning: u32,
    pub level_up: u32,
}

// ── Frame events ──────────────────────────────────────────────────────────────

/// What happened during one tick.  Audio and HUD collaborators react to these.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    MissilesFired { count: usize },
    EnemyHit { id: EntityId, life: u32 },
    EnemyKilled { id: EntityId, kind: EnemyKind, reward: u32 },
    BossWarning { level: u32 },
    BossSpawned { id: EntityId, kind: EnemyKind },
    BossProjectileFired { id: EntityId },
    BossDefeated { level: u32 },
    BossEscaped,
    EnemyEscaped { id: EntityId },
    PlayerDamaged { lives: u32 },
    PowerupCollected { power_level: u8, lives: u32 },
    LevelUp { level: u32 },
    GameOver { score: u32 },
    Restarted,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so `tick` can return a new copy
/// without mutating its input.
#[derive(Clone, Debug)]
pub struct GameState {
    pub entities: Vec<Entity>,
    pub progression: ProgressionState,
    pub timers: Timers,
    pub status: GameStatus,
    pub frame: u64,
    pub viewport: Viewport,
    /// Events raised by the most recent tick (or input action).
    pub events: Vec<GameEvent>,
    pub next_id: EntityId,
}

impl GameState {
    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn boss(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_boss())
    }

    pub fn count_where(&self, pred: impl Fn(&Entity) -> bool) -> usize {
        self.entities.iter().filter(|e| pred(e)).count()
    }
}
