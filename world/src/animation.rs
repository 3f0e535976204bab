use std::time::Duration;

use glam::Vec2;
use goblin_siege_rendering::{Renderer, SpriteFrame, SpriteSheet, TextureKey};

use crate::Timer;

/// Frame-indexed playback of a sprite sheet cycle.
#[derive(Debug)]
pub struct Animation {
    sheet: SpriteSheet,
    frames: Vec<u32>,
    cursor: usize,
    looping: bool,
    finished: bool,
    timer: Timer,
}

impl Animation {
    /// Creates an empty, looping animation with a zero interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheet: SpriteSheet::new(TextureKey::Slime, 0, 0),
            frames: Vec::new(),
            cursor: 0,
            looping: true,
            finished: false,
            timer: Timer::new(),
        }
    }

    /// Chooses whether playback wraps after the last frame.
    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Sets how long each frame stays on screen.
    pub fn set_interval(&mut self, interval: Duration) {
        self.timer.set_wait_time(interval);
    }

    /// Binds the sheet and the ordered frame indices to play.
    pub fn set_frame_data(&mut self, sheet: SpriteSheet, frames: Vec<u32>) {
        self.sheet = sheet;
        self.frames = frames;
        self.reset();
    }

    /// Rewinds playback to the first frame.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.finished = false;
        self.timer.restart();
    }

    /// Position of the playback cursor within the frame list.
    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.cursor
    }

    /// Reports whether a non-looping animation is holding its last frame.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Frame currently shown, if the animation has any frames.
    #[must_use]
    pub fn current_frame(&self) -> Option<SpriteFrame> {
        self.frames
            .get(self.cursor)
            .and_then(|&index| self.sheet.frame(index))
    }

    /// Advances the cursor once for every elapsed interval.
    pub fn on_update(&mut self, dt: Duration) {
        let steps = self.timer.on_update(dt);
        if self.frames.is_empty() {
            return;
        }

        for _ in 0..steps {
            let next = self.cursor + 1;
            if next < self.frames.len() {
                self.cursor = next;
            } else if self.looping {
                self.cursor = 0;
            } else {
                self.cursor = self.frames.len() - 1;
                self.finished = true;
            }
        }
    }

    /// Draws the current frame with its top-left corner at `top_left`.
    pub fn on_render<R>(&self, renderer: &mut R, top_left: Vec2)
    where
        R: Renderer + ?Sized,
    {
        if let Some(frame) = self.current_frame() {
            renderer.draw_sprite_frame(frame, top_left);
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goblin_siege_rendering::{DrawCommand, RecordingRenderer};

    fn walking(looping: bool) -> Animation {
        let mut animation = Animation::new();
        animation.set_loop(looping);
        animation.set_interval(Duration::from_millis(150));
        animation.set_frame_data(
            SpriteSheet::new(TextureKey::GoblinPriest, 5, 4),
            vec![5, 6, 7],
        );
        animation
    }

    #[test]
    fn looping_animation_wraps_to_first_frame() {
        let mut animation = walking(true);

        animation.on_update(Duration::from_millis(300));
        assert_eq!(animation.frame_index(), 2);

        animation.on_update(Duration::from_millis(150));
        assert_eq!(animation.frame_index(), 0);
        assert!(!animation.is_finished());
    }

    #[test]
    fn non_looping_animation_holds_last_frame() {
        let mut animation = walking(false);

        animation.on_update(Duration::from_secs(2));
        assert_eq!(animation.frame_index(), 2);
        assert!(animation.is_finished());

        animation.reset();
        assert_eq!(animation.frame_index(), 0);
        assert!(!animation.is_finished());
    }

    #[test]
    fn partial_interval_keeps_current_frame() {
        let mut animation = walking(true);

        animation.on_update(Duration::from_millis(100));
        assert_eq!(animation.frame_index(), 0);
        animation.on_update(Duration::from_millis(50));
        assert_eq!(animation.frame_index(), 1);
    }

    #[test]
    fn render_draws_current_sheet_cell() {
        let mut animation = walking(true);
        animation.on_update(Duration::from_millis(150));
        let mut renderer = RecordingRenderer::new();

        animation.on_render(&mut renderer, Vec2::new(12.0, 30.0));

        let expected = SpriteSheet::new(TextureKey::GoblinPriest, 5, 4)
            .frame(6)
            .expect("frame inside sheet");
        assert_eq!(
            renderer.commands(),
            &[DrawCommand::Sprite {
                frame: expected,
                top_left: Vec2::new(12.0, 30.0),
            }]
        );
    }

    #[test]
    fn empty_animation_draws_nothing() {
        let mut animation = Animation::new();
        animation.on_update(Duration::from_secs(1));
        let mut renderer = RecordingRenderer::new();

        animation.on_render(&mut renderer, Vec2::ZERO);

        assert!(renderer.commands().is_empty());
    }
}
