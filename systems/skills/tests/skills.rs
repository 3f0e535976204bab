use std::time::Duration;

use glam::Vec2;
use goblin_siege_core::{
    CellCoord, Command, EnemyId, EnemyKind, EnemyTemplate, Event, Route, RouteId, TileGeometry,
};
use goblin_siege_system_skills::Skills;
use goblin_siege_world::{self as world, query, TemplateBook, World};

/// Builds a world where nobody walks, so enemies stay parked where they spawn.
fn world_with_priest_template(template: EnemyTemplate) -> World {
    let mut templates = TemplateBook::default();
    for kind in EnemyKind::ALL {
        let stationary = EnemyTemplate {
            speed: 0.0,
            ..*templates.get(kind)
        };
        templates.set(kind, stationary).expect("template is valid");
    }
    templates
        .set(EnemyKind::GoblinPriest, template)
        .expect("priest template is valid");
    World::new(TileGeometry::new(10.0, Vec2::ZERO), templates)
}

fn priest_template() -> EnemyTemplate {
    EnemyTemplate {
        speed: 0.0,
        recover_interval: 1.0,
        recover_range: 2.0,
        recover_intensity: 15.0,
        ..EnemyTemplate::default()
    }
}

fn define_route(world: &mut World, cells: &[(u32, u32)]) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::DefineRoute {
            route: Route::new(
                cells
                    .iter()
                    .map(|&(column, row)| CellCoord::new(column, row))
                    .collect(),
            ),
        },
        &mut events,
    );
}

fn spawn(world: &mut World, kind: EnemyKind, route: u32) -> EnemyId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            kind,
            route: RouteId::new(route),
        },
        &mut events,
    );
    match events.as_slice() {
        [Event::EnemySpawned { enemy, .. }] => *enemy,
        other => panic!("unexpected spawn events: {other:?}"),
    }
}

fn damage(world: &mut World, enemy: EnemyId, amount: f32) {
    let mut events = Vec::new();
    world::apply(world, Command::DamageEnemy { enemy, amount }, &mut events);
}

fn pump(world: &mut World, skills: &mut Skills, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    let view = query::enemy_view(world);
    let mut commands = Vec::new();
    skills.handle(&events, &view, &mut commands);

    let mut follow_up = Vec::new();
    for command in commands {
        world::apply(world, command, &mut follow_up);
    }
    follow_up
}

#[test]
fn priest_heals_only_enemies_within_reach() {
    let mut world = world_with_priest_template(priest_template());
    define_route(&mut world, &[(0, 0), (0, 9)]);
    define_route(&mut world, &[(1, 0), (1, 9)]);
    define_route(&mut world, &[(5, 0), (5, 9)]);

    let priest = spawn(&mut world, EnemyKind::GoblinPriest, 0);
    let near = spawn(&mut world, EnemyKind::Goblin, 1);
    let far = spawn(&mut world, EnemyKind::Goblin, 2);
    for enemy in [priest, near, far] {
        damage(&mut world, enemy, 40.0);
    }

    let mut skills = Skills::default();
    let events = pump(&mut world, &mut skills, Duration::from_millis(500));
    assert!(events.is_empty());

    let events = pump(&mut world, &mut skills, Duration::from_millis(500));
    let healed: Vec<EnemyId> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyHealed { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect();
    assert_eq!(healed, vec![priest, near]);

    let far_hp = query::enemy(&world, far).expect("far enemy").hp();
    let near_hp = query::enemy(&world, near).expect("near enemy").hp();
    assert_eq!(far_hp, 60.0);
    assert_eq!(near_hp, 75.0);
}

#[test]
fn heal_never_exceeds_maximum_health() {
    let mut world = world_with_priest_template(priest_template());
    define_route(&mut world, &[(0, 0), (0, 9)]);
    let priest = spawn(&mut world, EnemyKind::GoblinPriest, 0);
    let wounded = spawn(&mut world, EnemyKind::Slime, 0);
    damage(&mut world, wounded, 5.0);

    let mut skills = Skills::default();
    for _ in 0..3 {
        let _ = pump(&mut world, &mut skills, Duration::from_secs(1));
    }

    let wounded = query::enemy(&world, wounded).expect("wounded enemy");
    assert_eq!(wounded.hp(), wounded.max_hp());
    let priest = query::enemy(&world, priest).expect("priest");
    assert_eq!(priest.hp(), priest.max_hp());
}

#[test]
fn priests_without_reach_heal_nobody() {
    let mut world = world_with_priest_template(EnemyTemplate {
        recover_range: -1.0,
        ..priest_template()
    });
    define_route(&mut world, &[(0, 0), (0, 9)]);
    let priest = spawn(&mut world, EnemyKind::GoblinPriest, 0);
    damage(&mut world, priest, 10.0);

    let mut skills = Skills::default();
    let events = pump(&mut world, &mut skills, Duration::from_secs(3));

    assert!(events.is_empty());
}
