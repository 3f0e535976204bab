use std::{sync::Arc, time::Duration};

use glam::Vec2;
use goblin_siege_core::{
    vector, EnemyId, EnemyKind, EnemySnapshot, Event, Route, SkillEffect, SkillKind, TileGeometry,
};
use goblin_siege_rendering::{Color, Renderer, ScreenRect};
use tracing::debug;

use crate::{Animation, EnemyBlueprint, Timer};

const SKETCH_DURATION: Duration = Duration::from_millis(75);
const SLOW_DOWN_PENALTY: f32 = 0.5;
const SLOW_DOWN_DURATION: Duration = Duration::from_secs(1);

const HEALTH_BAR_SIZE: Vec2 = Vec2::new(40.0, 8.0);
const HEALTH_BAR_OFFSET_Y: f32 = 2.0;
const HEALTH_BAR_BORDER: Color = Color::new(116.0 / 255.0, 185.0 / 255.0, 124.0 / 255.0, 1.0);
const HEALTH_BAR_CONTENT: Color = Color::new(226.0 / 255.0, 1.0, 194.0 / 255.0, 1.0);

/// Screen direction an enemy sprite faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    Down,
    /// Toward the left edge.
    Left,
    /// Toward the right edge.
    Right,
}

impl Facing {
    /// Every facing in slot order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Selects one of the eight animations an enemy owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationSlot {
    /// Walking direction shown by the animation.
    pub facing: Facing,
    /// Whether the hit-flash skin is shown.
    pub sketch: bool,
}

impl AnimationSlot {
    /// Number of distinct slots.
    pub const COUNT: usize = 8;

    /// Position of the slot in an enemy's animation table.
    #[must_use]
    pub const fn index(self) -> usize {
        let base = match self.facing {
            Facing::Up => 0,
            Facing::Down => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        };
        if self.sketch {
            base + 4
        } else {
            base
        }
    }
}

/// Picks the animation to show for a velocity.
///
/// Horizontal facings win ties, so a stationary enemy faces left.
#[must_use]
pub fn select_animation(velocity: Vec2, sketch: bool) -> AnimationSlot {
    let facing = if velocity.x.abs() >= velocity.y.abs() {
        if velocity.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    } else if velocity.y > 0.0 {
        Facing::Down
    } else {
        Facing::Up
    };

    AnimationSlot { facing, sketch }
}

/// Geometry of the health bar drawn above a wounded enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Full-size outline.
    pub border: ScreenRect,
    /// Filled portion proportional to the remaining health.
    pub fill: ScreenRect,
}

/// Enemy walking a route toward the defenders.
#[derive(Debug)]
pub struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    size: Vec2,
    geometry: TileGeometry,

    hp: f32,
    max_hp: f32,
    speed: f32,
    max_speed: f32,
    damage: f32,
    reward_ratio: f32,
    recover_interval: f32,
    recover_range: f32,
    recover_intensity: f32,
    skill: Option<SkillKind>,

    position: Vec2,
    velocity: Vec2,
    direction: Vec2,
    position_target: Vec2,
    route: Option<Arc<Route>>,
    idx_target: usize,

    is_valid: bool,
    is_show_sketch: bool,

    timer_skill: Timer,
    timer_sketch: Timer,
    timer_restore_speed: Timer,

    animations: [Animation; AnimationSlot::COUNT],
    current: AnimationSlot,
}

impl Enemy {
    /// Creates an enemy from its configuration record.
    #[must_use]
    pub fn new(id: EnemyId, blueprint: &EnemyBlueprint, geometry: TileGeometry) -> Self {
        let template = blueprint.template;

        let mut timer_skill = Timer::new();
        timer_skill.set_one_shot(false);
        timer_skill.set_wait_time(seconds(template.recover_interval));
        if blueprint.skill.is_none() {
            timer_skill.pause();
        }

        let mut timer_sketch = Timer::new();
        timer_sketch.set_one_shot(true);
        timer_sketch.set_wait_time(SKETCH_DURATION);
        timer_sketch.pause();

        let mut timer_restore_speed = Timer::new();
        timer_restore_speed.set_one_shot(true);
        timer_restore_speed.pause();

        let appearance = &blueprint.appearance;
        let mut animations: [Animation; AnimationSlot::COUNT] =
            std::array::from_fn(|_| Animation::new());
        for facing in Facing::ALL {
            let frames = match facing {
                Facing::Up => &appearance.frames.up,
                Facing::Down => &appearance.frames.down,
                Facing::Left => &appearance.frames.left,
                Facing::Right => &appearance.frames.right,
            };
            for (sketch, sheet) in [(false, appearance.normal), (true, appearance.sketch)] {
                let animation = &mut animations[AnimationSlot { facing, sketch }.index()];
                animation.set_loop(true);
                animation.set_interval(appearance.frame_interval);
                animation.set_frame_data(sheet, frames.clone());
            }
        }

        Self {
            id,
            kind: blueprint.kind,
            size: blueprint.size,
            geometry,
            hp: template.hp,
            max_hp: template.hp,
            speed: template.speed,
            max_speed: template.speed,
            damage: template.damage,
            reward_ratio: template.reward_ratio,
            recover_interval: template.recover_interval,
            recover_range: template.recover_range,
            recover_intensity: template.recover_intensity,
            skill: blueprint.skill,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            direction: Vec2::ZERO,
            position_target: Vec2::ZERO,
            route: None,
            idx_target: 0,
            is_valid: true,
            is_show_sketch: false,
            timer_skill,
            timer_sketch,
            timer_restore_speed,
            animations,
            current: select_animation(Vec2::ZERO, false),
        }
    }

    /// Moves the enemy to a screen position without touching its route.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Assigns the route to walk, starting from its first waypoint.
    pub fn set_route(&mut self, route: Arc<Route>) {
        self.route = Some(route);
        self.idx_target = 0;
        self.refresh_position_target();
        self.direction = (self.position_target - self.position).normalize_or_zero();
        self.velocity = self.direction * self.speed * self.geometry.tile_size();
    }

    /// Advances timers, movement and animation by one frame.
    ///
    /// Skill releases are reported through `events`.
    pub fn on_update(&mut self, dt: Duration, events: &mut Vec<Event>) {
        for _ in 0..self.timer_skill.on_update(dt) {
            self.release_skill(events);
        }
        if self.timer_sketch.on_update(dt) > 0 {
            self.is_show_sketch = false;
        }
        if self.timer_restore_speed.on_update(dt) > 0 {
            self.speed = self.max_speed;
        }

        let move_distance = self.velocity * dt.as_secs_f32();
        self.position = vector::advance_toward(self.position, self.position_target, move_distance);

        if vector::approx_zero(self.position_target - self.position) {
            self.advance_waypoint();
        }

        self.velocity = self.direction * self.speed * self.geometry.tile_size();

        self.current = select_animation(self.velocity, self.is_show_sketch);
        self.animations[self.current.index()].on_update(dt);
    }

    /// Draws the sprite and, when wounded, the health bar.
    pub fn on_render<R>(&self, renderer: &mut R)
    where
        R: Renderer + ?Sized,
    {
        let top_left = self.position - self.size / 2.0;
        self.animations[self.current.index()].on_render(renderer, top_left);

        if let Some(bar) = self.health_bar() {
            renderer.fill_rect(bar.fill, HEALTH_BAR_CONTENT);
            renderer.outline_rect(bar.border, HEALTH_BAR_BORDER);
        }
    }

    /// Health bar geometry, or `None` at full health.
    #[must_use]
    pub fn health_bar(&self) -> Option<HealthBar> {
        if self.hp >= self.max_hp {
            return None;
        }

        let top_left = Vec2::new(
            self.position.x - HEALTH_BAR_SIZE.x / 2.0,
            self.position.y - self.size.y / 2.0 - HEALTH_BAR_SIZE.y - HEALTH_BAR_OFFSET_Y,
        );
        let ratio = if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(HealthBar {
            border: ScreenRect::new(top_left, HEALTH_BAR_SIZE),
            fill: ScreenRect::new(
                top_left,
                Vec2::new(HEALTH_BAR_SIZE.x * ratio, HEALTH_BAR_SIZE.y),
            ),
        })
    }

    /// Restores health up to the maximum. Invalid enemies are not healed.
    pub fn increase_hp(&mut self, amount: f32) {
        if !self.is_valid {
            return;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Removes health and flashes the hit skin.
    ///
    /// Reaching zero health marks the enemy invalid.
    pub fn decrease_hp(&mut self, amount: f32) {
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.is_valid = false;
        }

        self.is_show_sketch = true;
        self.timer_sketch.restart();
    }

    /// Slows the enemy for a short while.
    pub fn slow_down(&mut self) {
        self.speed = (self.max_speed - SLOW_DOWN_PENALTY).max(0.0);
        self.timer_restore_speed.set_wait_time(SLOW_DOWN_DURATION);
        self.timer_restore_speed.restart();
    }

    /// Flags the enemy for removal.
    pub fn make_invalid(&mut self) {
        self.is_valid = false;
    }

    /// Reports whether the roster may drop the enemy.
    #[must_use]
    pub fn can_remove(&self) -> bool {
        !self.is_valid
    }

    /// Reports whether the enemy still takes part in the simulation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Reports whether the enemy walked past its last waypoint.
    #[must_use]
    pub fn has_finished_route(&self) -> bool {
        self.route
            .as_ref()
            .is_some_and(|route| self.idx_target >= route.len())
    }

    /// Fraction of the route already walked, in `0.0..=1.0`.
    #[must_use]
    pub fn route_progress(&self) -> f32 {
        match &self.route {
            None => 0.0,
            Some(route) if route.len() <= 1 => 1.0,
            Some(route) => (self.idx_target as f32 / (route.len() - 1) as f32).clamp(0.0, 1.0),
        }
    }

    /// Identifier allocated by the roster.
    #[must_use]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    /// Kind the enemy was built from.
    #[must_use]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Current health.
    #[must_use]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    /// Maximum health.
    #[must_use]
    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Current speed in tiles per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Unslowed speed in tiles per second.
    #[must_use]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Damage dealt when reaching the end of the route.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    /// Multiplier applied to the reward granted on defeat.
    #[must_use]
    pub fn reward_ratio(&self) -> f32 {
        self.reward_ratio
    }

    /// Skill reach in pixels.
    #[must_use]
    pub fn recover_radius(&self) -> f32 {
        self.recover_range * self.geometry.tile_size()
    }

    /// Health restored per skill release.
    #[must_use]
    pub fn recover_intensity(&self) -> f32 {
        self.recover_intensity
    }

    /// Screen position of the sprite's centre.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Unit vector toward the current waypoint.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Screen position of the current waypoint.
    #[must_use]
    pub fn position_target(&self) -> Vec2 {
        self.position_target
    }

    /// Index of the current waypoint within the route.
    #[must_use]
    pub fn idx_target(&self) -> usize {
        self.idx_target
    }

    /// Sprite size in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Reports whether the hit skin is showing.
    #[must_use]
    pub fn is_showing_sketch(&self) -> bool {
        self.is_show_sketch
    }

    /// Animation selected by the last update.
    #[must_use]
    pub fn current_animation(&self) -> AnimationSlot {
        self.current
    }

    /// Captures the state exposed to systems.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            route_progress: self.route_progress(),
            valid: self.is_valid,
        }
    }

    fn release_skill(&self, events: &mut Vec<Event>) {
        let Some(skill) = self.skill else {
            return;
        };

        let effect = match skill {
            SkillKind::Heal => SkillEffect::Heal {
                radius: self.recover_radius(),
                intensity: self.recover_intensity,
            },
        };
        debug!(
            enemy = self.id.get(),
            interval = self.recover_interval,
            "skill released"
        );
        events.push(Event::SkillReleased {
            source: self.id,
            position: self.position,
            effect,
        });
    }

    fn advance_waypoint(&mut self) {
        let Some(route) = self.route.as_ref() else {
            return;
        };
        if self.idx_target >= route.len() {
            return;
        }

        self.idx_target += 1;
        match route.get(self.idx_target) {
            Some(cell) => self.position_target = self.geometry.cell_center(cell),
            None => debug!(enemy = self.id.get(), "enemy finished its route"),
        }
        self.direction = (self.position_target - self.position).normalize_or_zero();
    }

    fn refresh_position_target(&mut self) {
        let cell = self
            .route
            .as_ref()
            .and_then(|route| route.get(self.idx_target));
        if let Some(cell) = cell {
            self.position_target = self.geometry.cell_center(cell);
        }
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::MAX)
}
