/// Sprite lookup for front ends.
///
/// A `MediaContext` is constructed and owned by whoever renders; there is no
/// global cache.  Sprites that were never loaded resolve to a plain coloured
/// fallback so a missing asset never stops the game.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entities::{BurstKind, EnemyKind};
use crate::error::Result;
use crate::snapshot::{EntityView, ViewKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tint {
    White,
    Grey,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Rows of the glyph, top to bottom.
    pub rows: Vec<String>,
    pub tint: Tint,
}

impl Sprite {
    pub fn single(glyph: &str, tint: Tint) -> Self {
        Self {
            rows: vec![glyph.to_string()],
            tint,
        }
    }
}

/// Asset key for an entity view: `"missile"`, `"powerup"`, `"ghost"`,
/// `"particle_kill"` and so on.
pub fn sprite_key(view: &EntityView) -> String {
    match view.kind {
        ViewKind::Missile => "missile".into(),
        ViewKind::Powerup => "powerup".into(),
        ViewKind::Enemy => enemy_key(view.subtype.unwrap_or(EnemyKind::Ghost)).into(),
        ViewKind::Particle => match view.burst.unwrap_or(BurstKind::Hit) {
            BurstKind::Hit => "particle_hit".into(),
            BurstKind::Kill => "particle_kill".into(),
            BurstKind::Damage => "particle_damage".into(),
            BurstKind::Heal => "particle_heal".into(),
        },
    }
}

fn enemy_key(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Ghost => "ghost",
        EnemyKind::Bat => "bat",
        EnemyKind::Pumpkin => "pumpkin",
        EnemyKind::Witch => "witch",
        EnemyKind::Reaper => "reaper",
        EnemyKind::Fireball => "fireball",
    }
}

/// Plain shape used whenever no sprite is loaded for a key.
pub fn fallback_sprite(view: &EntityView) -> Sprite {
    match view.kind {
        ViewKind::Missile => Sprite::single("|", Tint::Cyan),
        ViewKind::Powerup => Sprite::single("+", Tint::Green),
        ViewKind::Enemy if view.is_boss() => Sprite {
            rows: vec!["#####".into(), "#####".into()],
            tint: Tint::Magenta,
        },
        ViewKind::Enemy => match view.subtype {
            Some(EnemyKind::Fireball) => Sprite::single("*", Tint::Red),
            _ => Sprite::single("#", Tint::Red),
        },
        ViewKind::Particle => Sprite::single(".", Tint::Yellow),
    }
}

#[derive(Clone, Debug, Default)]
pub struct MediaContext {
    sprites: HashMap<String, Sprite>,
}

impl MediaContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(key.into(), sprite);
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.sprites.contains_key(key)
    }

    /// Merge a JSON object of `key → sprite` into the table.  Returns how
    /// many sprites were read.
    pub fn load_sprites_str(&mut self, json: &str) -> Result<usize> {
        let table: HashMap<String, Sprite> = serde_json::from_str(json)?;
        let count = table.len();
        self.sprites.extend(table);
        debug!(count, "sprites loaded");
        Ok(count)
    }

    pub fn load_sprites(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).inspect_err(|err| {
            warn!(path = %path.display(), %err, "sprite sheet unavailable, using fallbacks");
        })?;
        self.load_sprites_str(&text)
    }

    pub fn sprite_for(&self, view: &EntityView) -> Sprite {
        self.sprites
            .get(&sprite_key(view))
            .cloned()
            .unwrap_or_else(|| fallback_sprite(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_view(kind: EnemyKind) -> EntityView {
        EntityView {
            id: 1,
            kind: ViewKind::Enemy,
            x: 0.0,
            y: 0.0,
            width: 60.0,
            height: 60.0,
            rotation: 0.0,
            subtype: Some(kind),
            life: Some(1),
            max_life: Some(1),
            burst: None,
            alpha: None,
        }
    }

    #[test]
    fn missing_sprite_falls_back() {
        let media = MediaContext::new();
        let sprite = media.sprite_for(&enemy_view(EnemyKind::Bat));
        assert_eq!(sprite, Sprite::single("#", Tint::Red));
    }

    #[test]
    fn loaded_sprite_wins_over_fallback() {
        let mut media = MediaContext::new();
        let n = media
            .load_sprites_str(r#"{"bat": {"rows": ["^v^"], "tint": "magenta"}}"#)
            .unwrap();
        assert_eq!(n, 1);
        assert!(media.is_loaded("bat"));
        let sprite = media.sprite_for(&enemy_view(EnemyKind::Bat));
        assert_eq!(sprite.rows, vec!["^v^".to_string()]);
        assert_eq!(sprite.tint, Tint::Magenta);
    }

    #[test]
    fn boss_fallback_is_larger() {
        let media = MediaContext::new();
        let sprite = media.sprite_for(&enemy_view(EnemyKind::Reaper));
        assert_eq!(sprite.rows.len(), 2);
    }

    #[test]
    fn bad_sprite_json_is_an_error() {
        let mut media = MediaContext::new();
        assert!(media.load_sprites_str("not json").is_err());
        assert!(!media.is_loaded("bat"));
    }
}
