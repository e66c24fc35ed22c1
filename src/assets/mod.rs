//! Asset I/O: chunk loading and layer dumping
//!
//! Glue between the on-disk asset conventions and the in-memory
//! compositor. Each area is loaded, rendered and dumped on its own; its
//! chunk store is dropped before the next area is loaded.

pub mod dump;
pub mod loader;

pub use dump::{dump_area, layer_file_name};
pub use loader::{ChunkLoader, load_image, load_rendered_area};

use std::path::PathBuf;

use crate::area::{Area, AreaCatalog, ChunkNaming, LayerKind};
use crate::core::{Error, Result};
use crate::layer::{CompositorConfig, LayerCompositor};

/// Default directory for both chunk input and layer output
pub const DEFAULT_ASSETS_DIR: &str = "_assets_";

/// Configuration for dumping area layers
#[derive(Clone, Debug)]
pub struct DumpConfig {
    /// Directory holding chunk files
    pub assets_dir: PathBuf,
    /// Directory receiving composited layers (created if missing)
    pub output_dir: PathBuf,
    /// Also copy each area's thumbnail to the output
    pub include_thumbnail: bool,
    /// Fail on chunks whose height differs within a row
    pub strict_cells: bool,
    /// Max parallel chunk decodes
    pub jobs: usize,
    /// Naming scheme of the chunk files
    pub naming: ChunkNaming,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            output_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            include_thumbnail: false,
            strict_cells: false,
            jobs: 4,
            naming: ChunkNaming::default(),
        }
    }
}

impl DumpConfig {
    /// Compositor options derived from this configuration
    pub fn compositor(&self) -> CompositorConfig {
        CompositorConfig {
            strict_cells: self.strict_cells,
        }
    }
}

/// Load, render and dump the layers of one area.
pub fn dump_area_layers(area: &Area, config: &DumpConfig) -> Result<Vec<PathBuf>> {
    let loader = ChunkLoader::new(&config.assets_dir).with_naming(config.naming);
    let mut store = loader.load_area(area, &LayerKind::COMPOSITED)?;
    if config.include_thumbnail {
        loader.load_thumbnail(area, &mut store)?;
    }

    let compositor = LayerCompositor::with_config(&store, config.compositor());
    let rendered = compositor.render_area(area)?;
    dump_area(&rendered, &config.output_dir, config.include_thumbnail)
}

/// Dump every area of a catalog, or only the named one.
///
/// Stops at the first failing area.
pub fn dump_catalog(
    catalog: &AreaCatalog,
    config: &DumpConfig,
    only: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let areas: Vec<&Area> = match only {
        Some(name) => vec![
            catalog
                .find(name)
                .ok_or_else(|| Error::UnknownArea(name.to_string()))?,
        ],
        None => catalog.areas.iter().collect(),
    };

    let mut written = Vec::new();
    for (i, area) in areas.iter().enumerate() {
        log::info!("[{}/{}] {}", i + 1, areas.len(), area.name);
        written.extend(dump_area_layers(area, config)?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::ChunkKey;
    use image::{Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::TempDir;

    /// Write a uniform grid of chunks for every composited kind
    fn write_area(dir: &Path, area: &Area, size: u32) {
        for kind in LayerKind::COMPOSITED {
            let side = if kind.is_half_resolution() { size / 2 } else { size };
            for row in 0..area.rows {
                for col in 0..area.cols {
                    let key = ChunkKey::new(area.name.clone(), kind, row, col);
                    RgbaImage::from_pixel(side, side, Rgba([row as u8, col as u8, 0, 255]))
                        .save(dir.join(key.file_name()))
                        .expect("failed to write chunk");
                }
            }
        }
    }

    fn config(temp_dir: &TempDir) -> DumpConfig {
        DumpConfig {
            assets_dir: temp_dir.path().join("assets"),
            output_dir: temp_dir.path().join("out"),
            ..Default::default()
        }
    }

    #[test]
    fn test_dump_area_layers_end_to_end() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = config(&temp_dir);
        std::fs::create_dir_all(&config.assets_dir).unwrap();

        let area = Area::new("yenwood", 3, 4);
        write_area(&config.assets_dir, &area, 16);

        let written = dump_area_layers(&area, &config).expect("dump failed");
        assert_eq!(written.len(), 4);

        let background = load_image(&config.output_dir.join("yenwood_background.png")).unwrap();
        assert_eq!(background.dimensions(), (64, 48));
        // Top-left pixel comes from the top row, row 2.
        assert_eq!(*background.get_pixel(0, 0), Rgba([2, 0, 0, 255]));

        let normal = load_image(&config.output_dir.join("yenwood_normal.png")).unwrap();
        assert_eq!(normal.dimensions(), (32, 24));
    }

    #[test]
    fn test_dumped_layers_load_back() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = DumpConfig {
            include_thumbnail: true,
            ..config(&temp_dir)
        };
        std::fs::create_dir_all(&config.assets_dir).unwrap();
        let area = Area::new("yenwood", 2, 3);
        write_area(&config.assets_dir, &area, 8);
        RgbaImage::from_pixel(3, 2, Rgba([9, 9, 9, 255]))
            .save(config.assets_dir.join("yenwood_BKGSM.png"))
            .unwrap();

        dump_area_layers(&area, &config).expect("dump failed");
        let rendered = ChunkLoader::new(&config.output_dir)
            .load_layers("yenwood")
            .expect("layers missing");

        assert_eq!(rendered.name, "yenwood");
        assert_eq!(rendered.background.dimensions(), (24, 16));
        assert_eq!(rendered.height.dimensions(), (24, 16));
        assert_eq!(rendered.normal.dimensions(), (12, 8));
        assert_eq!(rendered.auxiliary.dimensions(), (12, 8));
        // Bottom-left pixel comes from row 0, column 0.
        assert_eq!(*rendered.background.get_pixel(0, 15), Rgba([0, 0, 0, 255]));
        assert_eq!(*rendered.background.get_pixel(23, 0), Rgba([1, 2, 0, 255]));
        let thumbnail = rendered.thumbnail.expect("thumbnail not loaded");
        assert_eq!(*thumbnail.get_pixel(2, 1), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_dump_kind_first_assets() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = DumpConfig {
            naming: ChunkNaming::KindFirst,
            ..config(&temp_dir)
        };
        std::fs::create_dir_all(&config.assets_dir).unwrap();
        let area = Area::new("1501_yenwood", 1, 2);
        for kind in LayerKind::COMPOSITED {
            let side = if kind.is_half_resolution() { 2 } else { 4 };
            for key in area.chunk_keys(kind) {
                RgbaImage::new(side, side)
                    .save(config.assets_dir.join(key.file_name_with(ChunkNaming::KindFirst)))
                    .unwrap();
            }
        }

        let written = dump_area_layers(&area, &config).expect("dump failed");
        assert_eq!(written.len(), 4);
        let background =
            load_image(&config.output_dir.join("1501_yenwood_background.png")).unwrap();
        assert_eq!(background.dimensions(), (8, 4));
    }

    #[test]
    fn test_dump_catalog_filters_by_name() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = config(&temp_dir);
        std::fs::create_dir_all(&config.assets_dir).unwrap();

        let catalog = AreaCatalog::new(vec![Area::new("a", 1, 1), Area::new("b", 1, 2)]);
        write_area(&config.assets_dir, &catalog.areas[1], 8);

        // Area "a" has no chunks on disk.
        assert!(matches!(
            dump_catalog(&catalog, &config, None),
            Err(Error::MissingChunk { .. })
        ));

        let written = dump_catalog(&catalog, &config, Some("b")).expect("dump failed");
        assert_eq!(written.len(), 4);

        assert!(matches!(
            dump_catalog(&catalog, &config, Some("c")),
            Err(Error::UnknownArea(name)) if name == "c"
        ));
    }

    #[test]
    fn test_dump_with_thumbnail_requires_one() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = DumpConfig {
            include_thumbnail: true,
            ..config(&temp_dir)
        };
        std::fs::create_dir_all(&config.assets_dir).unwrap();
        let area = Area::new("yenwood", 1, 1);
        write_area(&config.assets_dir, &area, 4);

        assert!(matches!(
            dump_area_layers(&area, &config),
            Err(Error::MissingThumbnail { .. })
        ));

        RgbaImage::new(2, 2)
            .save(config.assets_dir.join("yenwood_BKGSM.png"))
            .unwrap();
        let written = dump_area_layers(&area, &config).expect("dump failed");
        assert_eq!(written.len(), 5);
        assert!(config.output_dir.join("yenwood_thumb.png").exists());
    }
}
