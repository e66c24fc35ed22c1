//! Sprite animation clips and playback policies

use std::time::Duration;

use crate::core::{Error, Result};

/// How a clip moves through its frames
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Playback {
    /// Play through once, then stop on the last frame
    Once,
    /// Wrap back to the first frame after the last one
    Loop,
    /// Ping-pong between the first and last frame
    BackAndForth,
    /// Hold the first frame
    Still,
}

/// A sprite animation: a run of frames in a shared horizontal frame strip
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Offset of the clip's first frame in the frame strip
    #[serde(default)]
    pub first_frame: u32,
    pub frame_count: u32,
    /// Total playback duration of one pass over all frames
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
    pub playback: Playback,
    /// Initial direction for back-and-forth playback (+1 or -1)
    #[serde(default = "default_increment")]
    pub increment: i32,
}

fn default_increment() -> i32 {
    1
}

impl AnimationClip {
    /// Create a clip starting at strip frame 0
    pub fn new(
        name: impl Into<String>,
        frame_count: u32,
        duration: Duration,
        playback: Playback,
    ) -> Self {
        Self {
            name: name.into(),
            first_frame: 0,
            frame_count,
            duration,
            playback,
            increment: default_increment(),
        }
    }

    /// Clip that stops on its last frame
    pub fn once(name: impl Into<String>, frame_count: u32, duration: Duration) -> Self {
        Self::new(name, frame_count, duration, Playback::Once)
    }

    /// Clip that wraps around to its first frame
    pub fn looping(name: impl Into<String>, frame_count: u32, duration: Duration) -> Self {
        Self::new(name, frame_count, duration, Playback::Loop)
    }

    /// Clip that bounces between its first and last frame
    pub fn back_and_forth(name: impl Into<String>, frame_count: u32, duration: Duration) -> Self {
        Self::new(name, frame_count, duration, Playback::BackAndForth)
    }

    /// Clip that holds its first frame
    pub fn still(name: impl Into<String>, frame_count: u32) -> Self {
        Self::new(name, frame_count, Duration::ZERO, Playback::Still)
    }

    /// Set the offset into the frame strip
    pub fn with_first_frame(mut self, first_frame: u32) -> Self {
        self.first_frame = first_frame;
        self
    }

    /// Set the initial back-and-forth direction
    pub fn with_increment(mut self, increment: i32) -> Self {
        self.increment = increment;
        self
    }

    /// How long each frame is shown
    pub fn frame_duration(&self) -> Duration {
        if self.frame_count == 0 {
            return Duration::ZERO;
        }
        self.duration / self.frame_count
    }

    /// Absolute frame strip index of a clip-relative frame
    pub fn strip_index(&self, frame: u32) -> u32 {
        self.first_frame.saturating_add(frame)
    }

    /// Check the clip can be played
    pub fn validate(&self) -> Result<()> {
        if self.frame_count == 0 {
            return Err(Error::InvalidClip {
                clip: self.name.clone(),
                reason: "frame count is zero".to_string(),
            });
        }
        if self.first_frame.checked_add(self.frame_count).is_none() {
            return Err(Error::InvalidClip {
                clip: self.name.clone(),
                reason: format!(
                    "frames {}+{} overflow the strip index",
                    self.first_frame, self.frame_count
                ),
            });
        }
        if self.playback == Playback::BackAndForth && self.increment == 0 {
            return Err(Error::InvalidIncrement {
                clip: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Serialize durations as whole milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
