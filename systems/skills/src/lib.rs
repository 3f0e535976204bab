#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves enemy skill releases into world commands.

use goblin_siege_core::{Command, EnemyId, EnemyView, Event, SkillEffect};
use glam::Vec2;
use tracing::debug;

/// Pure system that turns skill releases into the commands applying them.
#[derive(Debug, Default)]
pub struct Skills {
    targets: Vec<EnemyId>,
}

impl Skills {
    /// Consumes world events and the roster snapshot to emit skill commands.
    ///
    /// Every release reads from `view`, which is captured before any of the
    /// emitted commands are applied, so the outcome does not depend on the
    /// order enemies were updated in.
    pub fn handle(&mut self, events: &[Event], view: &EnemyView, out: &mut Vec<Command>) {
        for event in events {
            let Event::SkillReleased {
                source,
                position,
                effect,
            } = event
            else {
                continue;
            };

            match *effect {
                SkillEffect::Heal { radius, intensity } => {
                    self.collect_targets(view, *position, radius);
                    debug!(
                        source = source.get(),
                        targets = self.targets.len(),
                        "resolved heal"
                    );
                    out.extend(self.targets.drain(..).map(|enemy| Command::HealEnemy {
                        enemy,
                        amount: intensity,
                    }));
                }
            }
        }
    }

    fn collect_targets(&mut self, view: &EnemyView, origin: Vec2, radius: f32) {
        self.targets.clear();
        if radius < 0.0 {
            return;
        }

        self.targets.extend(
            view.iter()
                .filter(|snapshot| snapshot.valid)
                .filter(|snapshot| snapshot.position.distance(origin) <= radius)
                .map(|snapshot| snapshot.id),
        );
    }
}
