//! Chunk PNG loading

use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;

use super::layer_file_name;
use crate::area::{Area, ChunkKey, ChunkNaming, ChunkStore, LayerKind, thumbnail_file_name};
use crate::core::{Error, Result};
use crate::layer::RenderedArea;

/// Decode an image file to RGBA
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.into_rgba8())
}

/// Loads the chunk files of an area into a fresh [`ChunkStore`]
pub struct ChunkLoader {
    assets_dir: PathBuf,
    naming: ChunkNaming,
}

impl ChunkLoader {
    /// Loader reading area-first chunk names from `assets_dir`
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            naming: ChunkNaming::default(),
        }
    }

    /// Use another chunk naming scheme
    pub fn with_naming(mut self, naming: ChunkNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Chunk naming scheme in use
    pub fn naming(&self) -> ChunkNaming {
        self.naming
    }

    /// Directory holding the chunk files of an area
    ///
    /// Chunks live in a per-area subdirectory when one exists, and directly
    /// in the assets directory otherwise.
    pub fn area_dir(&self, area: &Area) -> PathBuf {
        let dir = self.assets_dir.join(&area.name);
        if dir.is_dir() {
            dir
        } else {
            self.assets_dir.clone()
        }
    }

    /// Load every chunk of the given layer kinds, decoding in parallel.
    ///
    /// A missing file fails the whole load with [`Error::MissingChunk`].
    pub fn load_area(&self, area: &Area, kinds: &[LayerKind]) -> Result<ChunkStore> {
        log::info!("Loading graphics of {:?}", area.name);
        let dir = self.area_dir(area);
        let keys: Vec<ChunkKey> = kinds
            .iter()
            .filter(|kind| kind.is_composited())
            .flat_map(|&kind| area.chunk_keys(kind))
            .collect();

        let chunks = keys
            .into_par_iter()
            .map(|key| -> Result<(ChunkKey, RgbaImage)> {
                let path = dir.join(key.file_name_with(self.naming));
                if !path.is_file() {
                    return Err(Error::MissingChunk { key });
                }
                let image = load_image(&path)?;
                Ok((key, image))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut store = ChunkStore::new();
        store.extend(chunks);
        log::debug!("Loaded {} chunks of {} from {}", store.len(), area.name, dir.display());
        Ok(store)
    }

    /// Load the pre-made thumbnail of an area into a store
    pub fn load_thumbnail(&self, area: &Area, store: &mut ChunkStore) -> Result<()> {
        let path = self.area_dir(area).join(thumbnail_file_name(&area.name));
        if !path.is_file() {
            return Err(Error::MissingThumbnail {
                area: area.name.clone(),
            });
        }
        store.insert_thumbnail(area.name.clone(), load_image(&path)?);
        Ok(())
    }

    /// Load the produced layers of an area back from the assets directory
    pub fn load_layers(&self, name: &str) -> Result<RenderedArea> {
        load_rendered_area(&self.assets_dir, name)
    }
}

/// Read the layer files written for an area back into a [`RenderedArea`].
///
/// All four composited layers are required. The thumbnail is attached
/// when `{area}_thumb.png` exists.
pub fn load_rendered_area(dir: &Path, name: &str) -> Result<RenderedArea> {
    let layer = |kind: LayerKind| -> Result<RgbaImage> {
        let path = dir.join(layer_file_name(name, kind));
        if !path.is_file() {
            return Err(Error::MissingLayer {
                area: name.to_string(),
                kind,
                path,
            });
        }
        load_image(&path)
    };

    let thumbnail_path = dir.join(layer_file_name(name, LayerKind::BackgroundSmall));
    let thumbnail = if thumbnail_path.is_file() {
        Some(load_image(&thumbnail_path)?)
    } else {
        None
    };

    log::debug!("Loading layers of {:?} from {}", name, dir.display());
    Ok(RenderedArea {
        name: name.to_string(),
        background: layer(LayerKind::Background)?,
        normal: layer(LayerKind::Normal)?,
        height: layer(LayerKind::Height)?,
        auxiliary: layer(LayerKind::Auxiliary)?,
        thumbnail,
    })
}
