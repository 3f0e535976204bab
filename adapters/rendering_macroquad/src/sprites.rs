use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use goblin_siege_rendering::{SpriteFrame, TextureKey};
use macroquad::{
    color::WHITE,
    math::{Rect, Vec2 as MacroquadVec2},
    texture::{self, DrawTextureParams, FilterMode, Texture2D},
};
use tracing::{debug, warn};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Cache of sprite sheet textures loaded from the sprite manifest.
#[derive(Debug)]
pub struct SpriteAtlas {
    textures: HashMap<TextureKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    ///
    /// Sheets whose image file does not exist are skipped with a warning and
    /// drawn as placeholders; any other read failure is an error.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Returns the default manifest path relative to the repository root.
    #[must_use]
    pub fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Draws one cell of a sprite sheet at its native size.
    ///
    /// Returns `false` when the sheet texture is not part of the atlas.
    pub fn draw_frame(&self, frame: SpriteFrame, top_left: Vec2) -> bool {
        let Some(texture) = self.texture(frame.texture) else {
            return false;
        };

        let source = frame.source_rect(Vec2::new(texture.width(), texture.height()));
        let params = DrawTextureParams {
            source: Some(Rect::new(
                source.position.x,
                source.position.y,
                source.size.x,
                source.size.y,
            )),
            dest_size: Some(MacroquadVec2::new(source.size.x, source.size.y)),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(texture, top_left.x, top_left.y, WHITE, params);
        true
    }

    /// Returns whether the atlas contains the provided key.
    #[must_use]
    pub fn contains(&self, key: TextureKey) -> bool {
        self.textures.contains_key(&key)
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Retrieves the texture associated with the provided key.
    #[must_use]
    pub fn texture(&self, key: TextureKey) -> Option<Texture2D> {
        self.textures.get(&key).copied()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(TextureKey, &Path) -> Result<Option<Texture2D>>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(TextureKey, PathBuf)>,
        loader: &mut impl FnMut(TextureKey, &Path) -> Result<Option<Texture2D>>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let loaded = loader(key, &path).with_context(|| {
                format!(
                    "failed to load sprite sheet {} from {}",
                    key.name(),
                    path.display()
                )
            })?;
            let Some(texture) = loaded else {
                warn!(
                    sheet = key.name(),
                    path = %path.display(),
                    "sprite sheet missing, drawing placeholder"
                );
                continue;
            };
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {}", key.name());
            }
        }
        debug!(textures = textures.len(), "sprite atlas loaded");
        Ok(Self { textures })
    }
}

fn default_loader(_key: TextureKey, path: &Path) -> Result<Option<Texture2D>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read sprite asset at {}", path.display()))
        }
    };
    let texture = Texture2D::from_file_with_format(&bytes, None);
    texture.set_filter(FilterMode::Nearest);
    Ok(Some(texture))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(TextureKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = TextureKey::from_name(&name)
            .with_context(|| format!("unknown sprite sheet `{name}` in manifest"))?;
        if resolved.insert(key, base_path.join(relative_path)).is_some() {
            bail!("sprite manifest contains duplicate entry for {}", key.name());
        }
    }

    let mut ordered = Vec::with_capacity(TextureKey::ALL.len());
    for key in TextureKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {}", key.name());
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}
