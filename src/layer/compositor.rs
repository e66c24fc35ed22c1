//! Layer compositor for chunked area graphics.
//!
//! Stitches the chunk grid of an area into one image per layer kind. Chunk
//! sizes may vary, but every row must sum to the same width and every column
//! to the same height.

use super::{Canvas, RenderedArea};
use crate::area::{Area, ChunkStore, LayerKind};
use crate::core::{Axis, Error, Result, UVec2};

/// Layer kind whose chunk grid defines the full size of an area
pub const REFERENCE_KIND: LayerKind = LayerKind::Background;

/// Compositor options
#[derive(Clone, Debug, Default)]
pub struct CompositorConfig {
    /// Fail when chunks within one row differ in height, instead of
    /// compositing anyway and logging a warning
    pub strict_cells: bool,
}

/// Stitches chunk grids from a borrowed chunk store.
pub struct LayerCompositor<'a, I> {
    store: &'a ChunkStore<I>,
    config: CompositorConfig,
}

impl<'a, I: Canvas> LayerCompositor<'a, I> {
    /// Create a compositor with default options.
    pub fn new(store: &'a ChunkStore<I>) -> Self {
        Self::with_config(store, CompositorConfig::default())
    }

    /// Create a compositor with explicit options.
    pub fn with_config(store: &'a ChunkStore<I>, config: CompositorConfig) -> Self {
        Self { store, config }
    }

    /// Options this compositor was built with
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Width of a layer: the common sum of chunk widths over every row.
    pub fn compute_width(&self, area: &Area, kind: LayerKind) -> Result<u32> {
        check_grid(area)?;
        let mut width = None;
        for row in 0..area.rows {
            let mut w = 0;
            for col in 0..area.cols {
                w += self.store.chunk(&area.name, kind, row, col)?.width();
            }
            match width {
                None => width = Some(w),
                Some(expected) if expected != w => {
                    return Err(Error::DimensionMismatch {
                        area: area.name.clone(),
                        kind,
                        axis: Axis::Row,
                        index: row,
                        expected,
                        actual: w,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(width.unwrap_or(0))
    }

    /// Height of a layer: the common sum of chunk heights over every column.
    pub fn compute_height(&self, area: &Area, kind: LayerKind) -> Result<u32> {
        check_grid(area)?;
        let mut height = None;
        for col in 0..area.cols {
            let mut h = 0;
            for row in 0..area.rows {
                h += self.store.chunk(&area.name, kind, row, col)?.height();
            }
            match height {
                None => height = Some(h),
                Some(expected) if expected != h => {
                    return Err(Error::DimensionMismatch {
                        area: area.name.clone(),
                        kind,
                        axis: Axis::Column,
                        index: col,
                        expected,
                        actual: h,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(height.unwrap_or(0))
    }

    /// Full-resolution size of an area, from its reference chunk grid.
    pub fn reference_size(&self, area: &Area) -> Result<UVec2> {
        Ok(UVec2::new(
            self.compute_width(area, REFERENCE_KIND)?,
            self.compute_height(area, REFERENCE_KIND)?,
        ))
    }

    /// Stitch the chunks of one layer kind into a `width` x `height` image.
    ///
    /// The top row of the grid lands at destination row 0; row 0 of the grid
    /// (the bottom row) is written last. Each row advances the cursor by the
    /// height of its last chunk.
    pub fn composite_layer(
        &self,
        area: &Area,
        kind: LayerKind,
        width: u32,
        height: u32,
    ) -> Result<I> {
        check_grid(area)?;
        let mut dst = I::blank(UVec2::new(width, height));
        let mut y = 0;
        for row in (0..area.rows).rev() {
            let mut x = 0;
            let mut row_height = 0;
            for col in 0..area.cols {
                let src = self.store.chunk(&area.name, kind, row, col)?;
                let size = src.size();
                if col > 0 && size.y != row_height {
                    self.cell_mismatch(area, kind, row, col, row_height, size.y)?;
                }
                dst.blit(src, UVec2::new(x, y));
                x += size.x;
                row_height = size.y;
            }
            y += row_height;
        }
        log::debug!(
            "Composited {} {} layer: {}x{} from {} chunks",
            area.name,
            kind,
            width,
            height,
            area.chunk_count()
        );
        Ok(dst)
    }

    /// Composite one layer kind at its natural size.
    ///
    /// Background and height layers use the full reference size; normal and
    /// auxiliary layers use half of it, since their chunks are pre-scaled.
    pub fn render_layer(&self, area: &Area, kind: LayerKind) -> Result<I> {
        if !kind.is_composited() {
            return Err(Error::UnsupportedLayerKind(kind));
        }
        let full = self.reference_size(area)?;
        let size = layer_size(kind, full);
        self.composite_layer(area, kind, size.x, size.y)
    }

    /// Pre-made thumbnail of an area.
    pub fn thumbnail(&self, area: &Area) -> Result<&'a I> {
        self.store.thumbnail(&area.name)
    }

    /// Composite every layer kind of an area.
    pub fn render_area(&self, area: &Area) -> Result<RenderedArea<I>>
    where
        I: Clone,
    {
        let full = self.reference_size(area)?;
        let render = |kind: LayerKind| {
            let size = layer_size(kind, full);
            self.composite_layer(area, kind, size.x, size.y)
        };

        let rendered = RenderedArea {
            name: area.name.clone(),
            background: render(LayerKind::Background)?,
            normal: render(LayerKind::Normal)?,
            height: render(LayerKind::Height)?,
            auxiliary: render(LayerKind::Auxiliary)?,
            thumbnail: self.store.thumbnail(&area.name).ok().cloned(),
        };
        log::info!(
            "Rendered {} ({}x{}, {} rows x {} cols)",
            area.name,
            full.x,
            full.y,
            area.rows,
            area.cols
        );
        Ok(rendered)
    }

    fn cell_mismatch(
        &self,
        area: &Area,
        kind: LayerKind,
        row: u32,
        col: u32,
        expected: u32,
        actual: u32,
    ) -> Result<()> {
        if self.config.strict_cells {
            return Err(Error::CellHeightMismatch {
                area: area.name.clone(),
                kind,
                row,
                col,
                expected,
                actual,
            });
        }
        log::warn!(
            "Chunk height mismatch in {} {} at row {}, col {} ({} vs {}); output may be torn",
            area.name,
            kind,
            row,
            col,
            expected,
            actual
        );
        Ok(())
    }
}

/// Destination size of a layer kind given the full area size.
pub fn layer_size(kind: LayerKind, full: UVec2) -> UVec2 {
    if kind.is_half_resolution() {
        full / 2
    } else {
        full
    }
}

fn check_grid(area: &Area) -> Result<()> {
    if area.rows == 0 || area.cols == 0 {
        return Err(Error::EmptyGrid {
            area: area.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::ChunkKey;
    use image::{Rgba, RgbaImage};

    /// Distinct opaque color per (kind, row, col)
    fn color(kind: LayerKind, row: u32, col: u32) -> Rgba<u8> {
        let k = LayerKind::COMPOSITED.iter().position(|&c| c == kind).unwrap_or(4) as u8;
        Rgba([row as u8 * 40 + 10, col as u8 * 40 + 10, k * 40 + 10, 255])
    }

    /// Store with a grid whose column widths and row heights are given.
    fn grid_store(area: &Area, kind: LayerKind, widths: &[u32], heights: &[u32]) -> ChunkStore {
        let mut store = ChunkStore::new();
        fill(&mut store, area, kind, widths, heights);
        store
    }

    fn fill(store: &mut ChunkStore, area: &Area, kind: LayerKind, widths: &[u32], heights: &[u32]) {
        for row in 0..area.rows {
            for col in 0..area.cols {
                let image = RgbaImage::from_pixel(
                    widths[col as usize],
                    heights[row as usize],
                    color(kind, row, col),
                );
                store.insert(ChunkKey::new(area.name.clone(), kind, row, col), image);
            }
        }
    }

    #[test]
    fn test_compute_width_and_height() {
        let area = Area::new("yenwood", 2, 3);
        let store = grid_store(&area, LayerKind::Background, &[40, 24, 7], &[30, 20]);
        let compositor = LayerCompositor::new(&store);

        assert_eq!(compositor.compute_width(&area, LayerKind::Background).unwrap(), 71);
        assert_eq!(compositor.compute_height(&area, LayerKind::Background).unwrap(), 50);
    }

    #[test]
    fn test_two_by_two_quadrants() {
        let area = Area::new("quad", 2, 2);
        let store = grid_store(&area, LayerKind::Background, &[64, 64], &[64, 64]);
        let compositor = LayerCompositor::new(&store);

        let image = compositor
            .composite_layer(&area, LayerKind::Background, 128, 128)
            .expect("composite failed");
        assert_eq!(image.dimensions(), (128, 128));

        let bkg = LayerKind::Background;
        // Top half holds row 1, bottom half holds row 0.
        assert_eq!(*image.get_pixel(0, 0), color(bkg, 1, 0));
        assert_eq!(*image.get_pixel(63, 63), color(bkg, 1, 0));
        assert_eq!(*image.get_pixel(64, 0), color(bkg, 1, 1));
        assert_eq!(*image.get_pixel(0, 64), color(bkg, 0, 0));
        assert_eq!(*image.get_pixel(63, 127), color(bkg, 0, 0));
        assert_eq!(*image.get_pixel(127, 127), color(bkg, 0, 1));
    }

    #[test]
    fn test_irregular_chunks_land_at_running_cursor() {
        let area = Area::new("vale", 2, 2);
        let store = grid_store(&area, LayerKind::Height, &[10, 6], &[4, 8]);
        let compositor = LayerCompositor::new(&store);
        let hgt = LayerKind::Height;

        let image = compositor.composite_layer(&area, hgt, 16, 12).unwrap();
        // Row 1 (height 8) on top, row 0 (height 4) below it.
        assert_eq!(*image.get_pixel(9, 7), color(hgt, 1, 0));
        assert_eq!(*image.get_pixel(10, 7), color(hgt, 1, 1));
        assert_eq!(*image.get_pixel(9, 8), color(hgt, 0, 0));
        assert_eq!(*image.get_pixel(15, 11), color(hgt, 0, 1));
    }

    #[test]
    fn test_compositing_is_idempotent() {
        let area = Area::new("vale", 3, 2);
        let store = grid_store(&area, LayerKind::Background, &[17, 5], &[3, 9, 11]);
        let compositor = LayerCompositor::new(&store);

        let a = compositor.render_layer(&area, LayerKind::Background).unwrap();
        let b = compositor.render_layer(&area, LayerKind::Background).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_row_width_mismatch() {
        let area = Area::new("broken", 2, 2);
        let mut store = ChunkStore::new();
        let px = Rgba([0, 0, 0, 255]);
        let bkg = LayerKind::Background;
        let chunk = |w, h| RgbaImage::from_pixel(w, h, px);
        store.insert(ChunkKey::new("broken", bkg, 0, 0), chunk(50, 10));
        store.insert(ChunkKey::new("broken", bkg, 0, 1), chunk(50, 10));
        store.insert(ChunkKey::new("broken", bkg, 1, 0), chunk(48, 10));
        store.insert(ChunkKey::new("broken", bkg, 1, 1), chunk(48, 10));
        let compositor = LayerCompositor::new(&store);

        let err = compositor.compute_width(&area, LayerKind::Background).unwrap_err();
        match err {
            Error::DimensionMismatch { axis, index, expected, actual, .. } => {
                assert_eq!(axis, Axis::Row);
                assert_eq!(index, 1);
                assert_eq!(expected, 100);
                assert_eq!(actual, 96);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Column heights still agree.
        assert_eq!(compositor.compute_height(&area, LayerKind::Background).unwrap(), 20);
    }

    #[test]
    fn test_column_height_mismatch() {
        let area = Area::new("broken", 2, 2);
        let mut store = ChunkStore::new();
        let px = Rgba([0, 0, 0, 255]);
        let hgt = LayerKind::Height;
        let chunk = |w, h| RgbaImage::from_pixel(w, h, px);
        store.insert(ChunkKey::new("broken", hgt, 0, 0), chunk(8, 10));
        store.insert(ChunkKey::new("broken", hgt, 1, 0), chunk(8, 10));
        store.insert(ChunkKey::new("broken", hgt, 0, 1), chunk(8, 10));
        store.insert(ChunkKey::new("broken", hgt, 1, 1), chunk(8, 12));
        let compositor = LayerCompositor::new(&store);

        let err = compositor.compute_height(&area, LayerKind::Height).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { axis: Axis::Column, index: 1, expected: 20, actual: 22, .. }
        ));
    }

    #[test]
    fn test_missing_chunk_is_fatal() {
        let area = Area::new("yenwood", 2, 2);
        let mut store = ChunkStore::new();
        store.insert(
            ChunkKey::new("yenwood", LayerKind::Background, 0, 0),
            RgbaImage::new(8, 8),
        );
        let compositor = LayerCompositor::new(&store);

        let err = compositor.render_layer(&area, LayerKind::Background).unwrap_err();
        match err {
            Error::MissingChunk { key } => {
                assert_eq!(key, ChunkKey::new("yenwood", LayerKind::Background, 0, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_grid() {
        let store: ChunkStore = ChunkStore::new();
        let compositor = LayerCompositor::new(&store);
        let err = compositor
            .compute_width(&Area::new("void", 0, 3), LayerKind::Background)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyGrid { .. }));
    }

    #[test]
    fn test_cell_height_mismatch_lenient_and_strict() {
        let area = Area::new("torn", 2, 2);
        let mut store = ChunkStore::new();
        let px = Rgba([1, 2, 3, 255]);
        let bkg = LayerKind::Background;
        store.insert(ChunkKey::new("torn", bkg, 0, 0), RgbaImage::from_pixel(5, 10, px));
        store.insert(ChunkKey::new("torn", bkg, 0, 1), RgbaImage::from_pixel(5, 12, px));
        store.insert(ChunkKey::new("torn", bkg, 1, 0), RgbaImage::from_pixel(5, 12, px));
        store.insert(ChunkKey::new("torn", bkg, 1, 1), RgbaImage::from_pixel(5, 10, px));

        let lenient = LayerCompositor::new(&store);
        let image = lenient.render_layer(&area, bkg).expect("lenient composite failed");
        assert_eq!(image.dimensions(), (10, 22));

        let strict = LayerCompositor::with_config(&store, CompositorConfig { strict_cells: true });
        let err = strict.render_layer(&area, bkg).unwrap_err();
        assert!(matches!(
            err,
            Error::CellHeightMismatch { row: 1, col: 1, expected: 12, actual: 10, .. }
        ));
    }

    #[test]
    fn test_render_area_halves_normal_and_auxiliary() {
        let area = Area::new("yenwood", 2, 2);
        let mut store = ChunkStore::new();
        fill(&mut store, &area, LayerKind::Background, &[64, 32], &[16, 48]);
        fill(&mut store, &area, LayerKind::Height, &[64, 32], &[16, 48]);
        fill(&mut store, &area, LayerKind::Normal, &[32, 16], &[8, 24]);
        fill(&mut store, &area, LayerKind::Auxiliary, &[32, 16], &[8, 24]);
        store.insert_thumbnail("yenwood", RgbaImage::new(12, 8));
        let compositor = LayerCompositor::new(&store);

        let rendered = compositor.render_area(&area).expect("render failed");
        assert_eq!(rendered.background.dimensions(), (96, 64));
        assert_eq!(rendered.height.dimensions(), (96, 64));
        assert_eq!(rendered.normal.dimensions(), (48, 32));
        assert_eq!(rendered.auxiliary.dimensions(), (48, 32));
        assert_eq!(rendered.thumbnail.as_ref().map(|t| t.dimensions()), Some((12, 8)));

        // Top-left of the normal layer is chunk (1, 0).
        assert_eq!(*rendered.normal.get_pixel(0, 0), color(LayerKind::Normal, 1, 0));
    }

    #[test]
    fn test_render_layer_rejects_thumbnail_kind() {
        let area = Area::new("yenwood", 1, 1);
        let mut store = ChunkStore::new();
        store.insert_thumbnail("yenwood", RgbaImage::new(4, 4));
        let compositor = LayerCompositor::new(&store);

        let err = compositor.render_layer(&area, LayerKind::BackgroundSmall).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLayerKind(LayerKind::BackgroundSmall)));
        assert_eq!(compositor.thumbnail(&area).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn test_layer_size() {
        let full = UVec2::new(101, 64);
        assert_eq!(layer_size(LayerKind::Background, full), full);
        assert_eq!(layer_size(LayerKind::Auxiliary, full), UVec2::new(50, 32));
    }
}
