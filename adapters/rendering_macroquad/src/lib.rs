#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Goblin Siege.
//!
//! The demo is silent, so macroquad is built without its `audio` feature.

mod sprites;

use std::{path::PathBuf, sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use goblin_siege_rendering::{
    Color, Presentation, Renderer, RenderingBackend, ScreenRect, SpriteFrame, TextureKey,
};
use macroquad::input::{is_key_pressed, KeyCode};
use tracing::info;

pub use self::sprites::SpriteAtlas;

const WINDOW_WIDTH: i32 = 960;
const WINDOW_HEIGHT: i32 = 720;
const PLACEHOLDER_EDGE: f32 = 48.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    manifest_path: Option<PathBuf>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            manifest_path: Some(SpriteAtlas::default_manifest_path()),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rates once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Selects the sprite manifest to load, or disables sprites with `None`.
    ///
    /// Without sprites every frame is drawn as a coloured placeholder square.
    #[must_use]
    pub fn with_sprite_manifest(mut self, manifest_path: Option<PathBuf>) -> Self {
        self.manifest_path = manifest_path;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut frame: F) -> Result<()>
    where
        F: FnMut(Duration, &mut dyn Renderer) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            manifest_path,
        } = self;

        let Presentation {
            window_title,
            clear_color,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let sprite_atlas = match manifest_path {
                Some(path) => match SpriteAtlas::from_manifest_path(&path)
                    .context("failed to initialise sprite atlas")
                {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                },
                None => None,
            };
            let _ = atlas_init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let mut renderer = MacroquadRenderer::new(sprite_atlas.as_ref());
                frame(frame_dt, &mut renderer);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

/// [`Renderer`] that issues macroquad draw calls for the current frame.
struct MacroquadRenderer<'a> {
    atlas: Option<&'a SpriteAtlas>,
}

impl<'a> MacroquadRenderer<'a> {
    fn new(atlas: Option<&'a SpriteAtlas>) -> Self {
        Self { atlas }
    }
}

impl Renderer for MacroquadRenderer<'_> {
    fn draw_sprite_frame(&mut self, frame: SpriteFrame, top_left: Vec2) {
        let drawn = self
            .atlas
            .is_some_and(|atlas| atlas.draw_frame(frame, top_left));
        if !drawn {
            let color = to_macroquad_color(placeholder_color(frame.texture));
            macroquad::shapes::draw_rectangle(
                top_left.x,
                top_left.y,
                PLACEHOLDER_EDGE,
                PLACEHOLDER_EDGE,
                color,
            );
        }
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        macroquad::shapes::draw_rectangle(
            rect.position.x,
            rect.position.y,
            rect.size.x,
            rect.size.y,
            to_macroquad_color(color),
        );
    }

    fn outline_rect(&mut self, rect: ScreenRect, color: Color) {
        macroquad::shapes::draw_rectangle_lines(
            rect.position.x,
            rect.position.y,
            rect.size.x,
            rect.size.y,
            1.0,
            to_macroquad_color(color),
        );
    }
}

/// Flat colour standing in for a sheet when no texture is available.
fn placeholder_color(texture: TextureKey) -> Color {
    match texture {
        TextureKey::Slime => Color::from_rgb_u8(0x5c, 0xb8, 0x5c),
        TextureKey::KingSlime => Color::from_rgb_u8(0x2e, 0x8b, 0x57),
        TextureKey::Skeleton => Color::from_rgb_u8(0xd8, 0xd4, 0xc8),
        TextureKey::Goblin => Color::from_rgb_u8(0x8f, 0x9b, 0x3a),
        TextureKey::GoblinPriest => Color::from_rgb_u8(0x8a, 0x5c, 0xc7),
        TextureKey::SlimeSketch
        | TextureKey::KingSlimeSketch
        | TextureKey::SkeletonSketch
        | TextureKey::GoblinSketch
        | TextureKey::GoblinPriestSketch => Color::new(1.0, 1.0, 1.0, 1.0),
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), Some(4.0));
        assert_eq!(counter.record_frame(frame), None);
    }

    #[test]
    fn sketch_placeholders_flash_white() {
        for key in [
            TextureKey::SlimeSketch,
            TextureKey::KingSlimeSketch,
            TextureKey::SkeletonSketch,
            TextureKey::GoblinSketch,
            TextureKey::GoblinPriestSketch,
        ] {
            assert_eq!(placeholder_color(key), Color::new(1.0, 1.0, 1.0, 1.0));
        }
        assert_ne!(
            placeholder_color(TextureKey::Goblin),
            placeholder_color(TextureKey::GoblinPriest)
        );
    }

    #[test]
    fn colors_convert_channel_by_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }

    #[test]
    fn vsync_maps_to_swap_interval() {
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
        assert!(MacroquadBackend::new()
            .with_sprite_manifest(None)
            .manifest_path
            .is_none());
    }

    #[test]
    fn show_fps_is_opt_in() {
        assert!(!MacroquadBackend::new().show_fps);
        assert!(MacroquadBackend::new().with_show_fps(true).show_fps);
    }
}
