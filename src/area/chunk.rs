//! Chunk identities and the per-area chunk store

use std::collections::HashMap;
use std::fmt;

use image::RgbaImage;

use super::LayerKind;
use crate::core::{Error, Result};

/// Identity of one image fragment of an area layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    pub area: String,
    pub kind: LayerKind,
    pub row: u32,
    pub col: u32,
}

impl ChunkKey {
    /// Key of the chunk at `row`, `col` of an area layer
    pub fn new(area: impl Into<String>, kind: LayerKind, row: u32, col: u32) -> Self {
        Self {
            area: area.into(),
            kind,
            row,
            col,
        }
    }

    /// Asset file name, e.g. `yenwood_BKG_R002_C001.png`
    pub fn file_name(&self) -> String {
        format!("{self}.png")
    }

    /// Asset file name under the given naming scheme
    pub fn file_name_with(&self, naming: ChunkNaming) -> String {
        match naming {
            ChunkNaming::AreaFirst => self.file_name(),
            ChunkNaming::KindFirst => format!(
                "{}_{}-R{:03}_C{:03}.png",
                self.kind.tag(),
                self.area,
                self.row,
                self.col
            ),
        }
    }
}

/// On-disk naming scheme of chunk files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkNaming {
    /// `yenwood_BKG_R000_C000.png`
    #[default]
    AreaFirst,
    /// `BKG_1501_yenwood-R000_C000.png`, as shipped in extracted game assets
    KindFirst,
}

impl ChunkNaming {
    /// Parse a scheme name (`area-first` or `kind-first`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "area-first" => Some(Self::AreaFirst),
            "kind-first" => Some(Self::KindFirst),
            _ => None,
        }
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_R{:03}_C{:03}",
            self.area,
            self.kind.tag(),
            self.row,
            self.col
        )
    }
}

/// Asset file name of an area thumbnail, e.g. `yenwood_BKGSM.png`
pub fn thumbnail_file_name(area: &str) -> String {
    format!("{}_{}.png", area, LayerKind::BackgroundSmall.tag())
}

/// Owned container of decoded chunks
///
/// One store is created per area load and dropped once the area's layers
/// have been produced, so several areas can coexist without sharing state.
#[derive(Debug, Clone)]
pub struct ChunkStore<I = RgbaImage> {
    chunks: HashMap<ChunkKey, I>,
    thumbnails: HashMap<String, I>,
}

impl<I> ChunkStore<I> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            chunks: HashMap::new(),
            thumbnails: HashMap::new(),
        }
    }

    /// Insert a chunk, returning the image it replaced
    pub fn insert(&mut self, key: ChunkKey, image: I) -> Option<I> {
        self.chunks.insert(key, image)
    }

    /// Insert the thumbnail of an area
    pub fn insert_thumbnail(&mut self, area: impl Into<String>, image: I) -> Option<I> {
        self.thumbnails.insert(area.into(), image)
    }

    /// Look up a chunk by key
    pub fn get(&self, key: &ChunkKey) -> Option<&I> {
        self.chunks.get(key)
    }

    /// Look up a required chunk
    pub fn chunk(&self, area: &str, kind: LayerKind, row: u32, col: u32) -> Result<&I> {
        let key = ChunkKey::new(area, kind, row, col);
        match self.chunks.get(&key) {
            Some(image) => Ok(image),
            None => Err(Error::MissingChunk { key }),
        }
    }

    /// Look up the thumbnail of an area
    pub fn thumbnail(&self, area: &str) -> Result<&I> {
        self.thumbnails
            .get(area)
            .ok_or_else(|| Error::MissingThumbnail {
                area: area.to_string(),
            })
    }

    /// Whether a thumbnail is stored for the area
    pub fn has_thumbnail(&self, area: &str) -> bool {
        self.thumbnails.contains_key(area)
    }

    /// Drop every chunk and thumbnail of an area
    pub fn unload_area(&mut self, area: &str) {
        self.chunks.retain(|key, _| key.area != area);
        self.thumbnails.remove(area);
    }

    /// Number of stored chunks (thumbnails excluded)
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty() && self.thumbnails.is_empty()
    }
}

impl<I> Default for ChunkStore<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Extend<(ChunkKey, I)> for ChunkStore<I> {
    fn extend<T: IntoIterator<Item = (ChunkKey, I)>>(&mut self, iter: T) {
        self.chunks.extend(iter);
    }
}
