//! Per-kind enemy configuration records.

use std::time::Duration;

use glam::Vec2;
use goblin_siege_core::{EnemyKind, EnemyTemplate, SkillKind};
use goblin_siege_rendering::{SpriteSheet, TextureKey};

use crate::TemplateBook;

/// Frame indices of the four walking cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionalFrames {
    /// Frames shown while walking up the screen.
    pub up: Vec<u32>,
    /// Frames shown while walking down the screen.
    pub down: Vec<u32>,
    /// Frames shown while walking left.
    pub left: Vec<u32>,
    /// Frames shown while walking right.
    pub right: Vec<u32>,
}

impl DirectionalFrames {
    /// Builds the four cycles from sheets laid out one direction per row
    /// in the order down, up, right, left.
    #[must_use]
    pub fn from_rows(columns: u32) -> Self {
        let row = |index: u32| (index * columns..(index + 1) * columns).collect::<Vec<u32>>();
        Self {
            down: row(0),
            up: row(1),
            right: row(2),
            left: row(3),
        }
    }
}

/// Textures and cycles used to draw an enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Appearance {
    /// Sheet shown normally.
    pub normal: SpriteSheet,
    /// Sheet flashed after the enemy is hit.
    pub sketch: SpriteSheet,
    /// Walking cycles shared by both sheets.
    pub frames: DirectionalFrames,
    /// Time each frame stays on screen.
    pub frame_interval: Duration,
}

/// Complete configuration record an [`Enemy`](crate::Enemy) is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBlueprint {
    /// Kind described by the blueprint.
    pub kind: EnemyKind,
    /// Stats copied into the enemy.
    pub template: EnemyTemplate,
    /// Sprite configuration.
    pub appearance: Appearance,
    /// On-screen size of the sprite in pixels.
    pub size: Vec2,
    /// Periodic skill, if the kind has one.
    pub skill: Option<SkillKind>,
}

impl EnemyBlueprint {
    /// Assembles the blueprint for a kind from the loaded templates.
    #[must_use]
    pub fn for_kind(kind: EnemyKind, templates: &TemplateBook) -> Self {
        Self {
            kind,
            template: *templates.get(kind),
            appearance: appearance(kind),
            size: Vec2::splat(sprite_edge(kind)),
            skill: kind.skill(),
        }
    }
}

fn appearance(kind: EnemyKind) -> Appearance {
    let (normal, sketch, columns, interval_ms) = match kind {
        EnemyKind::Slime => (TextureKey::Slime, TextureKey::SlimeSketch, 6, 100),
        EnemyKind::KingSlime => (TextureKey::KingSlime, TextureKey::KingSlimeSketch, 6, 100),
        EnemyKind::Skeleton => (TextureKey::Skeleton, TextureKey::SkeletonSketch, 5, 150),
        EnemyKind::Goblin => (TextureKey::Goblin, TextureKey::GoblinSketch, 5, 150),
        EnemyKind::GoblinPriest => (
            TextureKey::GoblinPriest,
            TextureKey::GoblinPriestSketch,
            5,
            150,
        ),
    };

    Appearance {
        normal: SpriteSheet::new(normal, columns, 4),
        sketch: SpriteSheet::new(sketch, columns, 4),
        frames: DirectionalFrames::from_rows(columns),
        frame_interval: Duration::from_millis(interval_ms),
    }
}

fn sprite_edge(kind: EnemyKind) -> f32 {
    match kind {
        EnemyKind::KingSlime => 64.0,
        EnemyKind::Slime | EnemyKind::Skeleton | EnemyKind::Goblin | EnemyKind::GoblinPriest => {
            48.0
        }
    }
}
