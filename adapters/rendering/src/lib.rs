#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Goblin Siege adapters.
//!
//! Entities draw themselves through the object-safe [`Renderer`] trait so the
//! simulation never touches a graphics API. Backends such as the macroquad
//! adapter implement the trait against real textures, while
//! [`RecordingRenderer`] captures draw calls for headless runs and tests.

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::time::Duration;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
            alpha: 1.0,
        }
    }
}

/// Identifies a sprite sheet texture provided by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureKey {
    /// Slime walking cycles.
    Slime,
    /// Slime walking cycles, hit-flash skin.
    SlimeSketch,
    /// King slime walking cycles.
    KingSlime,
    /// King slime walking cycles, hit-flash skin.
    KingSlimeSketch,
    /// Skeleton walking cycles.
    Skeleton,
    /// Skeleton walking cycles, hit-flash skin.
    SkeletonSketch,
    /// Goblin walking cycles.
    Goblin,
    /// Goblin walking cycles, hit-flash skin.
    GoblinSketch,
    /// Goblin priest walking cycles.
    GoblinPriest,
    /// Goblin priest walking cycles, hit-flash skin.
    GoblinPriestSketch,
}

impl TextureKey {
    /// Every texture key in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Slime,
        Self::SlimeSketch,
        Self::KingSlime,
        Self::KingSlimeSketch,
        Self::Skeleton,
        Self::SkeletonSketch,
        Self::Goblin,
        Self::GoblinSketch,
        Self::GoblinPriest,
        Self::GoblinPriestSketch,
    ];

    /// Name used for the key in sprite manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slime => "Slime",
            Self::SlimeSketch => "SlimeSketch",
            Self::KingSlime => "KingSlime",
            Self::KingSlimeSketch => "KingSlimeSketch",
            Self::Skeleton => "Skeleton",
            Self::SkeletonSketch => "SkeletonSketch",
            Self::Goblin => "Goblin",
            Self::GoblinSketch => "GoblinSketch",
            Self::GoblinPriest => "GoblinPriest",
            Self::GoblinPriestSketch => "GoblinPriestSketch",
        }
    }

    /// Parses a manifest name back into a key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

/// Grid layout of a sprite sheet texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteSheet {
    /// Texture holding the frames.
    pub texture: TextureKey,
    /// Number of frame columns in the sheet.
    pub columns: u32,
    /// Number of frame rows in the sheet.
    pub rows: u32,
}

impl SpriteSheet {
    /// Creates a sheet description for the provided texture.
    #[must_use]
    pub const fn new(texture: TextureKey, columns: u32, rows: u32) -> Self {
        Self {
            texture,
            columns,
            rows,
        }
    }

    /// Resolves a row-major frame index into a drawable frame.
    ///
    /// Returns `None` when the index lies outside the sheet.
    #[must_use]
    pub fn frame(&self, index: u32) -> Option<SpriteFrame> {
        if self.columns == 0 || index >= self.columns.saturating_mul(self.rows) {
            return None;
        }

        Some(SpriteFrame {
            texture: self.texture,
            column: index % self.columns,
            row: index / self.columns,
            columns: self.columns,
            rows: self.rows,
        })
    }
}

/// Single cell of a sprite sheet selected for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteFrame {
    /// Texture holding the frame.
    pub texture: TextureKey,
    /// Column of the frame within the sheet.
    pub column: u32,
    /// Row of the frame within the sheet.
    pub row: u32,
    /// Number of frame columns in the sheet.
    pub columns: u32,
    /// Number of frame rows in the sheet.
    pub rows: u32,
}

impl SpriteFrame {
    /// Source rectangle of the frame inside a texture of the provided pixel size.
    #[must_use]
    pub fn source_rect(&self, texture_size: Vec2) -> ScreenRect {
        let frame_size = Vec2::new(
            texture_size.x / self.columns.max(1) as f32,
            texture_size.y / self.rows.max(1) as f32,
        );
        ScreenRect::new(
            Vec2::new(
                self.column as f32 * frame_size.x,
                self.row as f32 * frame_size.y,
            ),
            frame_size,
        )
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub position: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ScreenRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }
}

/// Immediate-mode drawing surface used by entities.
pub trait Renderer {
    /// Draws a sprite frame with its top-left corner at the provided point.
    fn draw_sprite_frame(&mut self, frame: SpriteFrame, top_left: Vec2);

    /// Fills a rectangle with a solid color.
    fn fill_rect(&mut self, rect: ScreenRect, color: Color);

    /// Draws the one-pixel outline of a rectangle.
    fn outline_rect(&mut self, rect: ScreenRect, color: Color);
}

/// Draw call captured by [`RecordingRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// A sprite frame was drawn.
    Sprite {
        /// Frame that was drawn.
        frame: SpriteFrame,
        /// Top-left corner of the frame on screen.
        top_left: Vec2,
    },
    /// A filled rectangle was drawn.
    FillRect {
        /// Rectangle that was filled.
        rect: ScreenRect,
        /// Fill color.
        color: Color,
    },
    /// A rectangle outline was drawn.
    OutlineRect {
        /// Rectangle that was outlined.
        rect: ScreenRect,
        /// Outline color.
        color: Color,
    },
}

/// Renderer that records every draw call instead of presenting it.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls captured since the last [`clear`](Self::clear).
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Discards all captured draw calls.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw_sprite_frame(&mut self, frame: SpriteFrame, top_left: Vec2) {
        self.commands.push(DrawCommand::Sprite { frame, top_left });
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn outline_rect(&mut self, rect: ScreenRect, color: Color) {
        self.commands.push(DrawCommand::OutlineRect { rect, color });
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
        }
    }
}

/// Rendering backend capable of presenting Goblin Siege frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `frame` closure receives the frame delta and a renderer
    /// that is valid for the duration of the call. The closure advances the
    /// simulation and issues every draw call for the frame.
    fn run<F>(self, presentation: Presentation, frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut dyn Renderer) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_resolves_row_major_indices() {
        let sheet = SpriteSheet::new(TextureKey::Goblin, 5, 4);
        let frame = sheet.frame(17).expect("index inside the sheet");

        assert_eq!(frame.column, 2);
        assert_eq!(frame.row, 3);
        assert!(sheet.frame(20).is_none());
    }

    #[test]
    fn sheet_without_columns_has_no_frames() {
        let sheet = SpriteSheet::new(TextureKey::Slime, 0, 4);
        assert!(sheet.frame(0).is_none());
    }

    #[test]
    fn source_rect_divides_texture_evenly() {
        let frame = SpriteSheet::new(TextureKey::Slime, 6, 4)
            .frame(13)
            .expect("index inside the sheet");
        let rect = frame.source_rect(Vec2::new(288.0, 192.0));

        assert_eq!(rect.size, Vec2::new(48.0, 48.0));
        assert_eq!(rect.position, Vec2::new(48.0, 96.0));
    }

    #[test]
    fn texture_names_round_trip() {
        for key in TextureKey::ALL {
            assert_eq!(TextureKey::from_name(key.name()), Some(key));
        }
        assert_eq!(TextureKey::from_name("Dragon"), None);
    }

    #[test]
    fn recording_renderer_keeps_call_order() {
        let mut renderer = RecordingRenderer::new();
        let rect = ScreenRect::new(Vec2::ZERO, Vec2::splat(4.0));
        let color = Color::from_rgb_u8(1, 2, 3);

        renderer.fill_rect(rect, color);
        renderer.outline_rect(rect, color);

        assert_eq!(
            renderer.commands(),
            &[
                DrawCommand::FillRect { rect, color },
                DrawCommand::OutlineRect { rect, color },
            ]
        );
        renderer.clear();
        assert!(renderer.commands().is_empty());
    }
}
