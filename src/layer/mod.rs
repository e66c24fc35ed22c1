//! Layer images and the chunk-grid compositor
//!
//! The compositor only needs two things from an image type: its pixel size
//! ([`Raster`]) and the ability to allocate a blank destination and overwrite
//! a region of it with another image ([`Canvas`]). Both are implemented for
//! [`image::RgbaImage`].

pub mod compositor;

pub use compositor::{CompositorConfig, LayerCompositor};

use image::RgbaImage;

use crate::area::LayerKind;
use crate::core::UVec2;

/// Image handle with a pixel size
pub trait Raster {
    /// Width and height in pixels
    fn size(&self) -> UVec2;

    fn width(&self) -> u32 {
        self.size().x
    }

    fn height(&self) -> u32 {
        self.size().y
    }
}

/// Destination image that chunks can be drawn onto
pub trait Canvas: Raster + Sized {
    /// Allocate a transparent image of the given size
    fn blank(size: UVec2) -> Self;

    /// Overwrite the region at `at` with the full content of `src`.
    ///
    /// Pixels falling outside `self` are clipped. No blending.
    fn blit(&mut self, src: &Self, at: UVec2);
}

impl Raster for RgbaImage {
    fn size(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }
}

impl Canvas for RgbaImage {
    fn blank(size: UVec2) -> Self {
        RgbaImage::new(size.x, size.y)
    }

    fn blit(&mut self, src: &Self, at: UVec2) {
        image::imageops::replace(self, src, i64::from(at.x), i64::from(at.y));
    }
}

/// Composited layers of one area for one render pass
#[derive(Debug, Clone)]
pub struct RenderedArea<I = RgbaImage> {
    pub name: String,
    pub background: I,
    pub normal: I,
    pub height: I,
    pub auxiliary: I,
    /// Pre-made thumbnail, when the chunk store carried one
    pub thumbnail: Option<I>,
}

impl<I> RenderedArea<I> {
    /// Image of a layer kind, if produced
    pub fn layer(&self, kind: LayerKind) -> Option<&I> {
        match kind {
            LayerKind::Background => Some(&self.background),
            LayerKind::BackgroundSmall => self.thumbnail.as_ref(),
            LayerKind::Normal => Some(&self.normal),
            LayerKind::Height => Some(&self.height),
            LayerKind::Auxiliary => Some(&self.auxiliary),
        }
    }

    /// Every produced layer, composited kinds first, thumbnail last
    pub fn layers(&self) -> impl Iterator<Item = (LayerKind, &I)> {
        LayerKind::COMPOSITED
            .into_iter()
            .chain(std::iter::once(LayerKind::BackgroundSmall))
            .filter_map(move |kind| self.layer(kind).map(|image| (kind, image)))
    }
}
