//! Sprite animation scheduling

pub mod clip;
pub mod animator;
pub mod strip;

pub use clip::{AnimationClip, Playback};
pub use animator::{AnimationState, Animator};
pub use strip::FrameStrip;
