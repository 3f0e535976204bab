//! Demo scenario driving the world and systems frame by frame.

use std::{collections::VecDeque, time::Duration};

use goblin_siege_core::{CellCoord, Command, EnemyKind, Event, Route, RouteId, TileGeometry};
use goblin_siege_rendering::Renderer;
use goblin_siege_system_skills::Skills;
use goblin_siege_world::{self as world, query, TemplateBook, Timer, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

const SPAWN_INTERVAL: Duration = Duration::from_millis(800);
const PULSE_INTERVAL: Duration = Duration::from_millis(500);
const PULSE_DAMAGE_MIN: f32 = 5.0;
const PULSE_DAMAGE_MAX: f32 = 20.0;
const SLOW_CHANCE: f64 = 0.25;

/// Corner waypoints of the demo path on a 20x15 grid.
const DEMO_ROUTE: [(u32, u32); 6] = [(0, 2), (15, 2), (15, 7), (3, 7), (3, 12), (19, 12)];

/// Parameters of the demo scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScenarioConfig {
    /// Enemies spawned per wave.
    pub(crate) wave_size: u32,
    /// Seed for wave composition and damage pulses.
    pub(crate) seed: u64,
}

/// Counters accumulated while the scenario runs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ScenarioStats {
    pub(crate) frames: u64,
    pub(crate) waves: u32,
    pub(crate) spawned: u32,
    pub(crate) defeated: u32,
    pub(crate) reached_goal: u32,
    pub(crate) heals: u32,
    pub(crate) damage_taken: f32,
    pub(crate) draw_calls: u64,
}

/// Owns the world and systems of the demo and advances them together.
pub(crate) struct Scenario {
    world: World,
    skills: Skills,
    rng: ChaCha8Rng,
    route: RouteId,
    wave_size: u32,
    pending: Vec<EnemyKind>,
    spawn_timer: Timer,
    pulse_timer: Timer,
    stats: ScenarioStats,
}

impl Scenario {
    /// Builds the world, registers the demo route and rolls the first wave.
    pub(crate) fn new(templates: TemplateBook, config: ScenarioConfig) -> Self {
        let mut world = World::new(TileGeometry::default(), templates);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::DefineRoute {
                route: demo_route(),
            },
            &mut events,
        );
        let route = events
            .iter()
            .find_map(|event| match event {
                Event::RouteDefined { route } => Some(*route),
                _ => None,
            })
            .unwrap_or(RouteId::new(0));

        let mut spawn_timer = Timer::new();
        spawn_timer.set_wait_time(SPAWN_INTERVAL);
        let mut pulse_timer = Timer::new();
        pulse_timer.set_wait_time(PULSE_INTERVAL);

        let mut scenario = Self {
            world,
            skills: Skills::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            route,
            wave_size: config.wave_size,
            pending: Vec::new(),
            spawn_timer,
            pulse_timer,
            stats: ScenarioStats::default(),
        };
        scenario.roll_wave();
        scenario
    }

    /// Counters accumulated so far.
    pub(crate) fn stats(&self) -> ScenarioStats {
        self.stats
    }

    /// Welcome banner exposed by the world.
    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Advances spawning, damage pulses and the world by one frame.
    pub(crate) fn advance(&mut self, dt: Duration) {
        self.stats.frames += 1;
        let mut commands = Vec::new();

        for _ in 0..self.spawn_timer.on_update(dt) {
            if let Some(kind) = self.pending.pop() {
                commands.push(Command::SpawnEnemy {
                    kind,
                    route: self.route,
                });
            }
        }
        for _ in 0..self.pulse_timer.on_update(dt) {
            self.queue_damage_pulse(&mut commands);
        }
        commands.push(Command::Tick { dt });

        self.process(commands);

        if self.pending.is_empty() && query::enemies(&self.world).next().is_none() {
            self.roll_wave();
        }
    }

    /// Draws the roster.
    pub(crate) fn render(&self, renderer: &mut dyn Renderer) {
        query::render(&self.world, renderer);
    }

    /// Records the draw calls of a headless frame.
    pub(crate) fn count_draw_calls(&mut self, calls: usize) {
        self.stats.draw_calls += calls as u64;
    }

    fn process(&mut self, commands: Vec<Command>) {
        let mut queue: VecDeque<Command> = commands.into();
        let mut events = Vec::new();
        let mut follow_up = Vec::new();

        while let Some(command) = queue.pop_front() {
            events.clear();
            world::apply(&mut self.world, command, &mut events);
            self.record(&events);

            follow_up.clear();
            let view = query::enemy_view(&self.world);
            self.skills.handle(&events, &view, &mut follow_up);
            queue.extend(follow_up.drain(..));
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.stats.spawned += 1,
                Event::EnemyDefeated { .. } => self.stats.defeated += 1,
                Event::EnemyHealed { .. } => self.stats.heals += 1,
                Event::EnemyReachedGoal { damage, .. } => {
                    self.stats.reached_goal += 1;
                    self.stats.damage_taken += damage;
                }
                _ => {}
            }
        }
    }

    fn queue_damage_pulse(&mut self, commands: &mut Vec<Command>) {
        let view = query::enemy_view(&self.world);
        let targets: Vec<_> = view.iter().filter(|snapshot| snapshot.valid).collect();
        if targets.is_empty() {
            return;
        }

        let target = targets[self.rng.gen_range(0..targets.len())].id;
        commands.push(Command::DamageEnemy {
            enemy: target,
            amount: self.rng.gen_range(PULSE_DAMAGE_MIN..=PULSE_DAMAGE_MAX),
        });
        if self.rng.gen_bool(SLOW_CHANCE) {
            commands.push(Command::SlowEnemy { enemy: target });
        }
    }

    fn roll_wave(&mut self) {
        self.stats.waves += 1;
        self.pending = (0..self.wave_size)
            .map(|_| EnemyKind::ALL[self.rng.gen_range(0..EnemyKind::ALL.len())])
            .collect();
        self.spawn_timer.restart();
        if self.stats.waves == 1 {
            debug!(size = self.pending.len(), "rolled first wave");
        } else {
            info!(wave = self.stats.waves, size = self.pending.len(), "next wave");
        }
    }
}

fn demo_route() -> Route {
    Route::new(
        DEMO_ROUTE
            .iter()
            .map(|&(column, row)| CellCoord::new(column, row))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use goblin_siege_rendering::RecordingRenderer;

    const FRAME: Duration = Duration::from_nanos(16_666_667);

    fn bundled_templates() -> TemplateBook {
        TemplateBook::from_toml_str(include_str!("../../../assets/enemy_templates.toml"))
            .expect("bundled templates parse")
    }

    fn run(config: ScenarioConfig, frames: u32) -> ScenarioStats {
        let mut scenario = Scenario::new(bundled_templates(), config);
        let mut renderer = RecordingRenderer::new();
        for _ in 0..frames {
            scenario.advance(FRAME);
            renderer.clear();
            scenario.render(&mut renderer);
            scenario.count_draw_calls(renderer.commands().len());
        }
        scenario.stats()
    }

    #[test]
    fn same_seed_replays_identically() {
        let config = ScenarioConfig {
            wave_size: 6,
            seed: 7,
        };

        assert_eq!(run(config, 1_200), run(config, 1_200));
    }

    #[test]
    fn first_wave_spawns_configured_size() {
        let stats = run(
            ScenarioConfig {
                wave_size: 4,
                seed: 1,
            },
            300,
        );

        assert_eq!(stats.spawned, 4);
        assert_eq!(stats.frames, 300);
        assert!(stats.draw_calls > 0);
    }

    #[test]
    fn damage_pulses_defeat_enemies() {
        let stats = run(
            ScenarioConfig {
                wave_size: 3,
                seed: 11,
            },
            60 * 120,
        );

        assert!(stats.defeated > 0);
        assert!(stats.defeated + stats.reached_goal <= stats.spawned);
    }

    #[test]
    fn demo_route_has_corner_waypoints() {
        let route = demo_route();
        assert_eq!(route.len(), DEMO_ROUTE.len());
        assert_eq!(route.get(0), Some(CellCoord::new(0, 2)));
    }
}
