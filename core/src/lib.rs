#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Goblin Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.

pub mod vector;

use std::{sync::Arc, time::Duration};

use glam::Vec2;
use serde::Deserialize;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Goblin Siege.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers a route that enemies may later follow.
    DefineRoute {
        /// Ordered waypoints composing the route.
        route: Route,
    },
    /// Requests that an enemy of the provided kind enters the first waypoint of a route.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
        /// Route the enemy follows once spawned.
        route: RouteId,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Removes health from an enemy.
    DamageEnemy {
        /// Identifier of the enemy being hit.
        enemy: EnemyId,
        /// Amount of health removed.
        amount: f32,
    },
    /// Restores health to an enemy, never exceeding its maximum.
    HealEnemy {
        /// Identifier of the enemy being healed.
        enemy: EnemyId,
        /// Amount of health restored.
        amount: f32,
    },
    /// Temporarily reduces an enemy's speed.
    SlowEnemy {
        /// Identifier of the enemy being slowed.
        enemy: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a route was registered.
    RouteDefined {
        /// Identifier allocated to the route.
        route: RouteId,
    },
    /// Reports that a route could not be registered.
    RouteRejected {
        /// Reason the route was refused.
        reason: RouteError,
    },
    /// Confirms that an enemy entered the world.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Kind of the spawned enemy.
        kind: EnemyKind,
        /// Route the enemy follows.
        route: RouteId,
        /// Screen position the enemy starts from.
        position: Vec2,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Kind requested for the spawn.
        kind: EnemyKind,
        /// Reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces that an enemy's skill timer elapsed.
    SkillReleased {
        /// Enemy releasing the skill.
        source: EnemyId,
        /// Position of the enemy at the moment of release.
        position: Vec2,
        /// Effect the surrounding systems should apply.
        effect: SkillEffect,
    },
    /// Confirms that an enemy lost health but survived.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Remaining health after the hit.
        hp: f32,
    },
    /// Confirms that an enemy's health reached zero.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Reward multiplier configured for the enemy.
        reward_ratio: f32,
    },
    /// Confirms that an enemy regained health.
    EnemyHealed {
        /// Identifier of the healed enemy.
        enemy: EnemyId,
        /// Health after the heal was applied.
        hp: f32,
    },
    /// Confirms that an enemy was slowed down.
    EnemySlowed {
        /// Identifier of the slowed enemy.
        enemy: EnemyId,
        /// Speed in tiles per second while the slow lasts.
        speed: f32,
    },
    /// Reports that an enemy walked past the last waypoint of its route.
    EnemyReachedGoal {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Damage the enemy inflicts on arrival.
        damage: f32,
    },
    /// Confirms that an enemy was removed from the roster.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a registered route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(u32);

impl RouteId {
    /// Creates a new route identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Ordered list of grid cells an enemy walks through.
///
/// Routes are immutable once built. Enemies share them through an [`Arc`]
/// and only ever read waypoints by index.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Route {
    cells: Vec<CellCoord>,
}

impl Route {
    /// Creates a route from the provided waypoints.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Waypoint stored at the provided index, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).copied()
    }

    /// Number of waypoints in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the route contains no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Wraps the route for sharing between enemies.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Screen placement of the tile map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGeometry {
    tile_size: f32,
    origin: Vec2,
}

impl TileGeometry {
    /// Edge length of a tile used by the original art set.
    pub const DEFAULT_TILE_SIZE: f32 = 48.0;

    /// Creates a geometry description from the tile edge length and map origin.
    #[must_use]
    pub const fn new(tile_size: f32, origin: Vec2) -> Self {
        Self { tile_size, origin }
    }

    /// Edge length of one tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Screen position of the centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            self.origin.x + cell.column() as f32 * self.tile_size + half,
            self.origin.y + cell.row() as f32 * self.tile_size + half,
        )
    }
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TILE_SIZE, Vec2::ZERO)
    }
}

/// Closed set of enemy kinds available to spawners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyKind {
    /// Small, quick slime.
    Slime,
    /// Oversized slime with a larger sprite.
    KingSlime,
    /// Skeleton warrior.
    Skeleton,
    /// Goblin raider.
    Goblin,
    /// Goblin priest that periodically heals nearby enemies.
    GoblinPriest,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Slime,
        Self::KingSlime,
        Self::Skeleton,
        Self::Goblin,
        Self::GoblinPriest,
    ];

    /// Name of the template record configuring this kind.
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Slime => "slime",
            Self::KingSlime => "king_slime",
            Self::Skeleton => "skeleton",
            Self::Goblin => "goblin",
            Self::GoblinPriest => "goblin_priest",
        }
    }

    /// Periodic skill released by this kind, if any.
    #[must_use]
    pub const fn skill(self) -> Option<SkillKind> {
        match self {
            Self::GoblinPriest => Some(SkillKind::Heal),
            Self::Slime | Self::KingSlime | Self::Skeleton | Self::Goblin => None,
        }
    }
}

/// Kinds of periodic skills an enemy may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkillKind {
    /// Restores health to enemies around the caster.
    Heal,
}

/// Effect carried by a skill release, resolved by the skills system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SkillEffect {
    /// Heals every enemy within `radius` pixels of the release position.
    Heal {
        /// Reach of the heal in pixels. Negative values reach nobody.
        radius: f32,
        /// Health restored to each enemy in reach.
        intensity: f32,
    },
}

/// Numeric stat record copied into an enemy when it is created.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnemyTemplate {
    /// Maximum health.
    pub hp: f32,
    /// Walking speed measured in tiles per second.
    pub speed: f32,
    /// Damage dealt when the enemy reaches the end of its route.
    pub damage: f32,
    /// Multiplier applied to the reward granted on defeat.
    pub reward_ratio: f32,
    /// Seconds between two skill releases.
    pub recover_interval: f32,
    /// Skill reach measured in tiles.
    pub recover_range: f32,
    /// Health restored per skill release.
    pub recover_intensity: f32,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            hp: 100.0,
            speed: 1.0,
            damage: 1.0,
            reward_ratio: 0.5,
            recover_interval: 10.0,
            recover_range: 0.0,
            recover_intensity: 25.0,
        }
    }
}

/// Reasons a route registration may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteError {
    /// Routes must contain at least one waypoint.
    Empty,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnError {
    /// No route with the provided identifier was registered.
    UnknownRoute,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current screen position of the enemy's centre.
    pub position: Vec2,
    /// Current health.
    pub hp: f32,
    /// Maximum health.
    pub max_hp: f32,
    /// Fraction of the route already walked, in `0.0..=1.0`.
    pub route_progress: f32,
    /// Whether the enemy still takes part in the simulation.
    pub valid: bool,
}

/// Read-only snapshot describing all enemies in the world.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the enemy with the provided identifier, if captured.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
