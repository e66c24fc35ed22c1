//! Areamap - tiled area layer compositing and sprite animation scheduling

pub mod core;
pub mod area;
pub mod layer;
pub mod animation;
pub mod assets;
