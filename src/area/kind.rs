//! Layer kinds of a map area

use std::fmt;

/// Graphics layer of a map area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LayerKind {
    /// Full-resolution background
    Background,
    /// Pre-made thumbnail of the background, never composited
    BackgroundSmall,
    /// Normal map, half resolution
    Normal,
    /// Height map (z axis), full resolution
    Height,
    /// Auxiliary layer, half resolution
    Auxiliary,
}

impl LayerKind {
    /// Kinds stitched from a chunk grid, in render order
    pub const COMPOSITED: [LayerKind; 4] = [
        LayerKind::Background,
        LayerKind::Normal,
        LayerKind::Height,
        LayerKind::Auxiliary,
    ];

    /// Tag used in chunk asset names
    pub fn tag(self) -> &'static str {
        match self {
            LayerKind::Background => "BKG",
            LayerKind::BackgroundSmall => "BKGSM",
            LayerKind::Normal => "NM",
            LayerKind::Height => "HGT",
            LayerKind::Auxiliary => "AS",
        }
    }

    /// Name used for produced layer files
    pub fn output_name(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::BackgroundSmall => "thumb",
            LayerKind::Normal => "normal",
            LayerKind::Height => "height",
            LayerKind::Auxiliary => "as",
        }
    }

    /// Parse an asset tag back into a kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BKG" => Some(LayerKind::Background),
            "BKGSM" => Some(LayerKind::BackgroundSmall),
            "NM" => Some(LayerKind::Normal),
            "HGT" => Some(LayerKind::Height),
            "AS" => Some(LayerKind::Auxiliary),
            _ => None,
        }
    }

    /// Whether source chunks of this kind are pre-scaled to half resolution
    pub fn is_half_resolution(self) -> bool {
        matches!(self, LayerKind::Normal | LayerKind::Auxiliary)
    }

    /// Whether this kind is stitched from a chunk grid
    pub fn is_composited(self) -> bool {
        self != LayerKind::BackgroundSmall
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
