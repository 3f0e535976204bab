#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative enemy roster for Goblin Siege.
//!
//! The world owns every [`Enemy`] and the routes they walk. It mutates state
//! only through [`apply`] and exposes read-only access through [`query`].

mod animation;
mod enemy;
mod kinds;
mod templates;
mod timer;

use std::{collections::BTreeMap, sync::Arc};

use goblin_siege_core::{
    Command, EnemyId, EnemyKind, Event, Route, RouteError, RouteId, SpawnError, TileGeometry,
    WELCOME_BANNER,
};
use tracing::{debug, warn};

pub use animation::Animation;
pub use enemy::{select_animation, AnimationSlot, Enemy, Facing, HealthBar};
pub use kinds::{Appearance, DirectionalFrames, EnemyBlueprint};
pub use templates::{TemplateBook, TemplateError};
pub use timer::Timer;

/// Represents the authoritative Goblin Siege world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    geometry: TileGeometry,
    blueprints: BTreeMap<EnemyKind, EnemyBlueprint>,
    routes: Vec<Arc<Route>>,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
}

impl World {
    /// Creates an empty world that builds enemies from the provided templates.
    #[must_use]
    pub fn new(geometry: TileGeometry, templates: TemplateBook) -> Self {
        let blueprints = EnemyKind::ALL
            .into_iter()
            .map(|kind| (kind, EnemyBlueprint::for_kind(kind, &templates)))
            .collect();

        Self {
            banner: WELCOME_BANNER,
            geometry,
            blueprints,
            routes: Vec::new(),
            enemies: Vec::new(),
            next_enemy_id: 0,
        }
    }

    fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        let index = self
            .enemies
            .binary_search_by_key(&id, |enemy| enemy.id())
            .ok()?;
        self.enemies.get_mut(index)
    }

    fn valid_enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        let enemy = self.enemy_mut(id).filter(|enemy| enemy.is_valid());
        if enemy.is_none() {
            warn!(enemy = id.get(), "command targets a missing or defeated enemy");
        }
        enemy
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn remove_invalid_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.retain(|enemy| {
            if enemy.can_remove() {
                out_events.push(Event::EnemyRemoved { enemy: enemy.id() });
                false
            } else {
                true
            }
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::DefineRoute { route } => {
            if route.is_empty() {
                warn!("rejected route without waypoints");
                out_events.push(Event::RouteRejected {
                    reason: RouteError::Empty,
                });
                return;
            }

            let id = RouteId::new(world.routes.len() as u32);
            debug!(route = id.get(), waypoints = route.len(), "route defined");
            world.routes.push(route.shared());
            out_events.push(Event::RouteDefined { route: id });
        }
        Command::SpawnEnemy { kind, route } => {
            let start = world
                .routes
                .get(route.get() as usize)
                .and_then(|shared| Some((Arc::clone(shared), shared.get(0)?)));
            let (Some((shared, first)), Some(blueprint)) = (start, world.blueprints.get(&kind))
            else {
                warn!(route = route.get(), ?kind, "rejected spawn on unknown route");
                out_events.push(Event::SpawnRejected {
                    kind,
                    reason: SpawnError::UnknownRoute,
                });
                return;
            };

            let blueprint = blueprint.clone();
            let id = world.allocate_enemy_id();
            let position = world.geometry.cell_center(first);
            let mut enemy = Enemy::new(id, &blueprint, world.geometry);
            enemy.set_position(position);
            enemy.set_route(shared);
            world.enemies.push(enemy);

            debug!(enemy = id.get(), ?kind, route = route.get(), "enemy spawned");
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                route,
                position,
            });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });

            for enemy in world.enemies.iter_mut().filter(|enemy| enemy.is_valid()) {
                enemy.on_update(dt, out_events);
                if enemy.has_finished_route() {
                    enemy.make_invalid();
                    debug!(enemy = enemy.id().get(), "enemy reached the goal");
                    out_events.push(Event::EnemyReachedGoal {
                        enemy: enemy.id(),
                        damage: enemy.damage(),
                    });
                }
            }

            world.remove_invalid_enemies(out_events);
        }
        Command::DamageEnemy { enemy, amount } => {
            let Some(target) = world.valid_enemy_mut(enemy) else {
                return;
            };

            target.decrease_hp(amount);
            if target.is_valid() {
                out_events.push(Event::EnemyDamaged {
                    enemy,
                    hp: target.hp(),
                });
            } else {
                debug!(enemy = enemy.get(), "enemy defeated");
                out_events.push(Event::EnemyDefeated {
                    enemy,
                    reward_ratio: target.reward_ratio(),
                });
            }
        }
        Command::HealEnemy { enemy, amount } => {
            let Some(target) = world.valid_enemy_mut(enemy) else {
                return;
            };

            let before = target.hp();
            target.increase_hp(amount);
            if target.hp() != before {
                out_events.push(Event::EnemyHealed {
                    enemy,
                    hp: target.hp(),
                });
            }
        }
        Command::SlowEnemy { enemy } => {
            let Some(target) = world.valid_enemy_mut(enemy) else {
                return;
            };

            target.slow_down();
            out_events.push(Event::EnemySlowed {
                enemy,
                speed: target.speed(),
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use goblin_siege_core::{EnemyId, EnemyView, Route, RouteId, TileGeometry};
    use goblin_siege_rendering::Renderer;

    use super::{Enemy, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Geometry used to convert route cells into screen positions.
    #[must_use]
    pub fn geometry(world: &World) -> TileGeometry {
        world.geometry
    }

    /// Route registered under the provided identifier.
    #[must_use]
    pub fn route(world: &World, id: RouteId) -> Option<&Route> {
        world.routes.get(id.get() as usize).map(|route| &**route)
    }

    /// Enemies currently in the roster, in identifier order.
    pub fn enemies(world: &World) -> impl Iterator<Item = &Enemy> {
        world.enemies.iter()
    }

    /// Enemy registered under the provided identifier.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<&Enemy> {
        world
            .enemies
            .binary_search_by_key(&id, |enemy| enemy.id())
            .ok()
            .and_then(|index| world.enemies.get(index))
    }

    /// Captures a read-only view of the enemies in the roster.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(Enemy::snapshot).collect())
    }

    /// Draws every enemy still taking part in the simulation.
    pub fn render<R>(world: &World, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        for enemy in world.enemies.iter().filter(|enemy| enemy.is_valid()) {
            enemy.on_render(renderer);
        }
    }
}
