use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::warn;

/// Number of facing frames laid out left to right in an oriented sheet.
pub const ORIENTED_FRAME_COUNT: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite key must not be empty")]
    Empty,
    #[error("sprite key must not start with '/'")]
    LeadingSlash,
    #[error("sprite key must not contain '\\\\'")]
    Backslash,
    #[error("sprite key must not contain '..'")]
    ParentTraversal,
    #[error("sprite key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::LeadingSlash);
    }
    if key.contains('\\') {
        return Err(SpriteKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    for ch in key.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-') {
            continue;
        }
        return Err(SpriteKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

pub(crate) fn sprite_path(sprites_dir: &Path, key: &str) -> Result<PathBuf, SpriteKeyError> {
    validate_sprite_key(key)?;
    Ok(sprites_dir.join(format!("{key}.png")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedSprite {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba: Vec<u8>,
}

/// Source rectangle inside a sprite, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameRect {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl LoadedSprite {
    /// A sheet at least four frames wide is split into equal columns; any
    /// other image is a single frame and ignores `frame`.
    pub(crate) fn frame_rect(&self, frame: u8) -> FrameRect {
        let frame_width = self.width / ORIENTED_FRAME_COUNT;
        if frame_width == 0 || frame_width < self.height {
            return FrameRect {
                x: 0,
                y: 0,
                width: self.width,
                height: self.height,
            };
        }
        let column = u32::from(frame).min(ORIENTED_FRAME_COUNT - 1);
        FrameRect {
            x: column * frame_width,
            y: 0,
            width: frame_width,
            height: self.height,
        }
    }
}

/// Decoded sprites keyed by sprite key. A failed load is cached as `None`,
/// warned about once, and drawn as a placeholder by the caller.
#[derive(Debug)]
pub(crate) struct SpriteCache {
    sprites_dir: PathBuf,
    sprites: HashMap<String, Option<LoadedSprite>>,
    warned_keys: HashSet<String>,
}

impl SpriteCache {
    pub(crate) fn new(sprites_dir: PathBuf) -> Self {
        Self {
            sprites_dir,
            sprites: HashMap::new(),
            warned_keys: HashSet::new(),
        }
    }

    pub(crate) fn resolve(&mut self, key: &str) -> Option<&LoadedSprite> {
        if !self.sprites.contains_key(key) {
            let loaded = self.load(key);
            self.sprites.insert(key.to_string(), loaded);
        }
        self.sprites.get(key).and_then(Option::as_ref)
    }

    fn load(&mut self, key: &str) -> Option<LoadedSprite> {
        let path = match sprite_path(&self.sprites_dir, key) {
            Ok(path) => path,
            Err(error) => {
                self.warn_once(key, None, &format!("invalid_key:{error}"));
                return None;
            }
        };
        match load_sprite_rgba(&path) {
            Ok(sprite) => Some(sprite),
            Err(reason) => {
                self.warn_once(key, Some(&path), &reason);
                None
            }
        }
    }

    fn warn_once(&mut self, key: &str, resolved_path: Option<&Path>, reason: &str) {
        if !self.warned_keys.insert(key.to_string()) {
            return;
        }
        let path_display = resolved_path
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<unresolved>".to_string());
        warn!(
            sprite_key = key,
            path = %path_display,
            reason = reason,
            "renderer_sprite_load_failed_using_placeholder"
        );
    }

    #[cfg(test)]
    fn warned_count(&self) -> usize {
        self.warned_keys.len()
    }
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
