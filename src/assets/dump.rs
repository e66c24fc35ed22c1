//! Writing composited layers to disk

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::area::LayerKind;
use crate::core::Result;
use crate::layer::RenderedArea;

/// File name of a produced layer, e.g. `yenwood_background.png`
pub fn layer_file_name(area: &str, kind: LayerKind) -> String {
    format!("{}_{}.png", area, kind.output_name())
}

/// Write every layer of a rendered area into `output_dir`.
///
/// The thumbnail is written only when `include_thumbnail` is set and the
/// area carries one. Returns the written paths.
pub fn dump_area(
    rendered: &RenderedArea<RgbaImage>,
    output_dir: &Path,
    include_thumbnail: bool,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for (kind, image) in rendered.layers() {
        if kind == LayerKind::BackgroundSmall && !include_thumbnail {
            continue;
        }
        let path = output_dir.join(layer_file_name(&rendered.name, kind));
        log::info!("Creating {}", path.display());
        image.save(&path)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rendered(thumbnail: bool) -> RenderedArea {
        RenderedArea {
            name: "yenwood".to_string(),
            background: RgbaImage::new(8, 8),
            normal: RgbaImage::new(4, 4),
            height: RgbaImage::new(8, 8),
            auxiliary: RgbaImage::new(4, 4),
            thumbnail: thumbnail.then(|| RgbaImage::new(2, 2)),
        }
    }

    #[test]
    fn test_layer_file_name() {
        assert_eq!(layer_file_name("yenwood", LayerKind::Auxiliary), "yenwood_as.png");
        assert_eq!(layer_file_name("yenwood", LayerKind::BackgroundSmall), "yenwood_thumb.png");
    }

    #[test]
    fn test_dump_area_writes_layers() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let out = temp_dir.path().join("out");

        let written = dump_area(&rendered(true), &out, false).expect("dump failed");
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "yenwood_background.png",
                "yenwood_normal.png",
                "yenwood_height.png",
                "yenwood_as.png",
            ]
        );
        assert!(!out.join("yenwood_thumb.png").exists());

        let normal = image::open(out.join("yenwood_normal.png")).unwrap().into_rgba8();
        assert_eq!(normal.dimensions(), (4, 4));
    }

    #[test]
    fn test_dump_area_with_thumbnail() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let written = dump_area(&rendered(true), temp_dir.path(), true).expect("dump failed");
        assert_eq!(written.len(), 5);
        assert!(temp_dir.path().join("yenwood_thumb.png").exists());

        // Nothing to write when the area has no thumbnail.
        let written = dump_area(&rendered(false), temp_dir.path(), true).expect("dump failed");
        assert_eq!(written.len(), 4);
    }
}
