//! Frame strip geometry for sprite sheets
//!
//! A sprite sheet holds one horizontal strip of frames per facing
//! direction: the column is the strip index, the row is the direction.

use image::{GenericImageView, RgbaImage, SubImage};

use crate::core::{Error, Result, UVec2};

/// Size of one frame in a sprite sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameStrip {
    pub frame_width: u32,
    pub frame_height: u32,
}

impl FrameStrip {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
        }
    }

    /// Top-left pixel of a frame
    pub fn frame_origin(&self, index: u32, direction: u32) -> UVec2 {
        UVec2::new(index * self.frame_width, direction * self.frame_height)
    }

    /// Number of whole frames per strip in a sheet of the given width
    pub fn frames_per_strip(&self, sheet_width: u32) -> u32 {
        sheet_width.checked_div(self.frame_width).unwrap_or(0)
    }

    /// Number of whole direction strips in a sheet of the given height
    pub fn directions(&self, sheet_height: u32) -> u32 {
        sheet_height.checked_div(self.frame_height).unwrap_or(0)
    }

    /// Borrow one frame of a sprite sheet
    pub fn frame_view<'a>(
        &self,
        sheet: &'a RgbaImage,
        index: u32,
        direction: u32,
    ) -> Result<SubImage<&'a RgbaImage>> {
        let (width, height) = sheet.dimensions();
        if index >= self.frames_per_strip(width) || direction >= self.directions(height) {
            return Err(Error::FrameOutOfBounds {
                index,
                direction,
                width,
                height,
            });
        }
        let origin = self.frame_origin(index, direction);
        Ok(sheet.view(origin.x, origin.y, self.frame_width, self.frame_height))
    }
}
