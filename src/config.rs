/// Tunables, viewport and responsive size profiles.
///
/// Every number the simulation uses lives in `GameConfig` so a JSON file can
/// rebalance the game without touching code.  Missing keys fall back to the
/// defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Viewports narrower than this use the mobile size profile.
pub const MOBILE_BREAKPOINT: f32 = 600.0;

// ── Policy ────────────────────────────────────────────────────────────────────

/// What happens when the detector loses the face while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceLossPolicy {
    /// Losing the face ends the run; it restarts from zero when the face returns.
    Restart,
    /// Losing the face freezes the run; it resumes when the face returns.
    Pause,
}

/// Settings handed to the external landmark detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub max_faces: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            max_faces: 1,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

// ── Game config ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Enemy cadence and speed
    pub base_spawn_interval: u32,
    pub min_spawn_interval: u32,
    pub spawn_decay_per_level: u32,
    pub base_enemy_speed: f32,
    pub speed_growth_per_level: f32,
    pub speed_jitter: f32,
    pub max_drift: f32,

    // Boss
    pub boss_score_step: u32,
    pub boss_base_life: u32,
    pub boss_speed: f32,
    pub boss_attack_interval: u32,
    pub boss_projectile_speed: f32,

    // Powerups
    pub powerup_cadence_multiplier: u32,
    pub powerup_speed: f32,

    // Missiles
    pub missile_speed: f32,
    pub missile_fan_angle: f32,
    pub max_power_level: u8,

    // Particles
    pub particle_count: u32,
    pub particle_life: u32,
    pub particle_gravity: f32,
    pub particle_min_speed: f32,
    pub particle_max_speed: f32,

    // Scoring and lives
    pub normal_reward: u32,
    pub boss_reward: u32,
    pub max_lives: u32,
    pub starting_lives: u32,

    // Control mapping
    pub mouth_open_threshold: f32,
    pub lean_threshold: f32,
    pub default_sensitivity: f32,
    pub min_sensitivity: f32,
    pub max_sensitivity: f32,

    // Playfield margins (pixels)
    pub bottom_margin: f32,
    pub top_margin: f32,
    pub side_margin: f32,

    // Transient display timers (frames)
    pub damage_flash_frames: u32,
    pub boss_warning_frames: u32,
    pub level_up_frames: u32,

    pub face_loss_policy: FaceLossPolicy,
    pub detector: DetectorSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_spawn_interval: 60,
            min_spawn_interval: 20,
            spawn_decay_per_level: 5,
            base_enemy_speed: 2.0,
            speed_growth_per_level: 0.15,
            speed_jitter: 0.5,
            max_drift: 0.6,

            boss_score_step: 1000,
            boss_base_life: 5,
            boss_speed: 0.6,
            boss_attack_interval: 90,
            boss_projectile_speed: 4.0,

            powerup_cadence_multiplier: 10,
            powerup_speed: 2.0,

            missile_speed: 10.0,
            missile_fan_angle: 0.2,
            max_power_level: 3,

            particle_count: 10,
            particle_life: 30,
            particle_gravity: 0.15,
            particle_min_speed: 2.0,
            particle_max_speed: 5.0,

            normal_reward: 100,
            boss_reward: 1000,
            max_lives: 5,
            starting_lives: 3,

            mouth_open_threshold: 0.05,
            lean_threshold: 2.0,
            default_sensitivity: 1.5,
            min_sensitivity: 0.5,
            max_sensitivity: 5.0,

            bottom_margin: 50.0,
            top_margin: 300.0,
            side_margin: 200.0,

            damage_flash_frames: 10,
            boss_warning_frames: 120,
            level_up_frames: 120,

            face_loss_policy: FaceLossPolicy::Restart,
            detector: DetectorSettings::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.min_spawn_interval == 0 {
            return Err(Error::Config("min_spawn_interval must be at least 1".into()));
        }
        if self.base_spawn_interval < self.min_spawn_interval {
            return Err(Error::Config(format!(
                "base_spawn_interval ({}) is below min_spawn_interval ({})",
                self.base_spawn_interval, self.min_spawn_interval
            )));
        }
        if self.boss_attack_interval == 0 || self.powerup_cadence_multiplier == 0 {
            return Err(Error::Config("cadences must be at least 1 frame".into()));
        }
        if self.boss_score_step == 0 {
            return Err(Error::Config("boss_score_step must be positive".into()));
        }
        if self.max_lives == 0 || self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(Error::Config(format!(
                "starting_lives ({}) must be in 1..={}",
                self.starting_lives, self.max_lives
            )));
        }
        if self.max_power_level == 0 {
            return Err(Error::Config("max_power_level must be at least 1".into()));
        }
        if !(self.min_sensitivity > 0.0 && self.min_sensitivity <= self.max_sensitivity) {
            return Err(Error::Config(format!(
                "sensitivity bounds [{}, {}] are invalid",
                self.min_sensitivity, self.max_sensitivity
            )));
        }
        if self.default_sensitivity < self.min_sensitivity
            || self.default_sensitivity > self.max_sensitivity
        {
            return Err(Error::Config(format!(
                "default_sensitivity {} outside [{}, {}]",
                self.default_sensitivity, self.min_sensitivity, self.max_sensitivity
            )));
        }
        if self.particle_min_speed > self.particle_max_speed {
            return Err(Error::Config("particle speed range is inverted".into()));
        }
        if self.detector.max_faces != 1 {
            return Err(Error::Config("only single-face tracking is supported".into()));
        }
        Ok(())
    }

    pub fn clamp_sensitivity(&self, value: f32) -> f32 {
        value.clamp(self.min_sensitivity, self.max_sensitivity)
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_mobile(&self) -> bool {
        self.width < MOBILE_BREAKPOINT
    }

    pub fn sizes(&self) -> SizeProfile {
        if self.is_mobile() {
            SizeProfile::MOBILE
        } else {
            SizeProfile::DESKTOP
        }
    }
}

/// Sprite and hitbox sizes in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeProfile {
    pub player_hitbox: f32,
    pub enemy: f32,
    pub boss: f32,
    pub powerup: f32,
    pub missile_w: f32,
    pub missile_h: f32,
    pub projectile: f32,
    pub particle: f32,
}

impl SizeProfile {
    pub const DESKTOP: SizeProfile = SizeProfile {
        player_hitbox: 60.0,
        enemy: 60.0,
        boss: 150.0,
        powerup: 40.0,
        missile_w: 10.0,
        missile_h: 25.0,
        projectile: 20.0,
        particle: 4.0,
    };

    pub const MOBILE: SizeProfile = SizeProfile {
        player_hitbox: 40.0,
        enemy: 45.0,
        boss: 100.0,
        powerup: 30.0,
        missile_w: 8.0,
        missile_h: 20.0,
        projectile: 15.0,
        particle: 3.0,
    };
}
