//! Sprite fetching, decoding, and the last-known-good cache.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::foundation::error::{EngineError, EngineResult};

/// A decoded sprite in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

/// Where sprite bytes come from.
///
/// The compositor only ever sees this trait; tests substitute in-memory
/// sources, applications typically use [`FsSpriteSource`].
pub trait SpriteSource: Send + Sync {
    /// Fetch the raw encoded bytes for a catalog `source` path.
    fn fetch(&self, source: &str) -> EngineResult<Vec<u8>>;
}

/// Reject absolute paths and any traversal outside the asset root.
fn normalize_rel_path(source: &str) -> EngineResult<PathBuf> {
    let path = Path::new(source);
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => {
                return Err(EngineError::asset_load(format!(
                    "sprite path '{source}' escapes the asset root"
                )));
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(EngineError::asset_load("empty sprite path"));
    }
    Ok(out)
}

/// Loads sprites from a directory tree on disk.
#[derive(Clone, Debug)]
pub struct FsSpriteSource {
    root: PathBuf,
}

impl FsSpriteSource {
    /// Serve sprites from `root`; catalog `source` paths are relative to it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SpriteSource for FsSpriteSource {
    fn fetch(&self, source: &str) -> EngineResult<Vec<u8>> {
        let rel = normalize_rel_path(source)?;
        let full = self.root.join(rel);
        std::fs::read(&full).map_err(|e| {
            EngineError::asset_load(format!("read '{}': {e}", full.display()))
        })
    }
}

fn decode(source: &str, bytes: &[u8]) -> EngineResult<Sprite> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| EngineError::asset_load(format!("decode '{source}': {e}")))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    let mut data = img.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = (((u16::from(*c) * a) + 127) / 255) as u8;
        }
    }
    Ok(Sprite {
        width,
        height,
        data,
    })
}

/// Two-tier sprite cache keyed by item id.
///
/// Tier one is a fresh fetch-and-decode through the [`SpriteSource`]; tier
/// two is the last copy that decoded successfully, kept so a transient fetch
/// failure degrades to a stale sprite instead of a missing layer.
pub struct SpriteCache {
    source: Box<dyn SpriteSource>,
    last_good: HashMap<String, Arc<Sprite>>,
}

impl SpriteCache {
    /// Wrap a source with an empty fallback tier.
    pub fn new(source: Box<dyn SpriteSource>) -> Self {
        Self {
            source,
            last_good: HashMap::new(),
        }
    }

    /// Fetch and decode the sprite for `item_id`, falling back to the last
    /// good copy on failure. `None` means the layer has nothing to draw.
    pub fn get(&mut self, item_id: &str, source_path: &str) -> Option<Arc<Sprite>> {
        match self.source.fetch(source_path).and_then(|b| decode(source_path, &b)) {
            Ok(sprite) => {
                let sprite = Arc::new(sprite);
                self.last_good.insert(item_id.to_string(), Arc::clone(&sprite));
                Some(sprite)
            }
            Err(err) => {
                if let Some(stale) = self.last_good.get(item_id) {
                    debug!(item_id, %err, "sprite fetch failed, using last good copy");
                    Some(Arc::clone(stale))
                } else {
                    warn!(item_id, source_path, %err, "sprite unavailable, skipping layer");
                    None
                }
            }
        }
    }
}

impl std::fmt::Debug for SpriteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteCache")
            .field("cached", &self.last_good.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
