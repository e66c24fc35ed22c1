//! Map areas, their chunk grids and the area catalog

pub mod chunk;
pub mod kind;

pub use chunk::{ChunkKey, ChunkNaming, ChunkStore, thumbnail_file_name};
pub use kind::LayerKind;

use std::path::Path;

use crate::core::Result;

/// Named map region covered by a grid of chunks
///
/// Row 0, column 0 is the bottom-left chunk; rows grow upward and columns
/// grow rightward.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Area {
    pub name: String,
    pub rows: u32,
    pub cols: u32,
}

impl Area {
    /// Create an area with a `rows` x `cols` chunk grid
    pub fn new(name: impl Into<String>, rows: u32, cols: u32) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
        }
    }

    /// Number of chunks per layer kind
    pub fn chunk_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Keys of every chunk of a layer kind, row-major from the bottom row
    pub fn chunk_keys(&self, kind: LayerKind) -> impl Iterator<Item = ChunkKey> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).map(move |col| ChunkKey::new(self.name.clone(), kind, row, col))
        })
    }
}

const CATALOG_VERSION: u32 = 1;

/// Catalog of areas (serialized as JSON for easy editing)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AreaCatalog {
    #[serde(default = "default_version")]
    pub version: u32,
    pub areas: Vec<Area>,
}

fn default_version() -> u32 {
    CATALOG_VERSION
}

impl AreaCatalog {
    /// Catalog of the current format version
    pub fn new(areas: Vec<Area>) -> Self {
        Self {
            version: CATALOG_VERSION,
            areas,
        }
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        log::debug!("Loaded {} areas from {}", catalog.areas.len(), path.display());
        Ok(catalog)
    }

    /// Write the catalog as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Find an area by name
    pub fn find(&self, name: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
