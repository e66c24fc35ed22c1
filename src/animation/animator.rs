//! Runtime frame scheduling for sprite clips

use std::collections::HashMap;
use std::time::Instant;

use super::{AnimationClip, Playback};
use crate::core::{Error, Result};

/// Playback state of one clip instance
///
/// Advanced once per tick by [`AnimationState::advance`]. Every frame of a
/// clip is shown for the same duration; ticks that arrive late are not
/// caught up, so at most one frame step happens per call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationState {
    frame: u32,
    increment: i32,
    last_advance: Instant,
    finished: bool,
}

impl AnimationState {
    /// Start playing a clip at its first frame
    pub fn new(clip: &AnimationClip, now: Instant) -> Self {
        Self {
            frame: 0,
            increment: clip.increment.signum(),
            last_advance: now,
            finished: false,
        }
    }

    /// Restart playback from the first frame
    pub fn reset(&mut self, clip: &AnimationClip, now: Instant) {
        *self = Self::new(clip, now);
    }

    /// Step to the next frame if the current one has been shown long enough.
    ///
    /// Returns `Ok(true)` when the state changed. Still clips and finished
    /// one-shot clips never change.
    pub fn advance(&mut self, clip: &AnimationClip, now: Instant) -> Result<bool> {
        clip.validate()?;
        if clip.playback == Playback::Still || self.finished {
            return Ok(false);
        }
        if now.saturating_duration_since(self.last_advance) < clip.frame_duration() {
            return Ok(false);
        }

        let count = clip.frame_count;
        match clip.playback {
            Playback::Once => {
                if self.frame + 1 >= count {
                    self.finished = true;
                } else {
                    self.frame += 1;
                }
            }
            Playback::Loop => {
                self.frame = (self.frame + 1) % count;
            }
            Playback::BackAndForth => self.bounce(count),
            Playback::Still => {}
        }
        self.last_advance = now;
        Ok(true)
    }

    /// Current clip-relative frame and whether playback is still running
    pub fn current_frame(&self, clip: &AnimationClip) -> (u32, bool) {
        let playing = clip.playback != Playback::Once || !self.finished;
        (self.frame, playing)
    }

    /// Clip-relative frame index
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Current back-and-forth direction (+1 or -1)
    pub fn increment(&self) -> i32 {
        self.increment
    }

    /// When the frame last changed
    pub fn last_advance(&self) -> Instant {
        self.last_advance
    }

    /// Whether a one-shot clip has played out
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn bounce(&mut self, count: u32) {
        // A single-frame strip has nowhere to bounce to.
        if count < 2 {
            self.frame = 0;
            return;
        }
        let next = i64::from(self.frame) + i64::from(self.increment);
        if next >= i64::from(count) {
            self.frame = count - 2;
            self.increment = -1;
        } else if next < 0 {
            self.frame = 1;
            self.increment = 1;
        } else {
            self.frame = next as u32;
        }
    }
}

/// Named clips and the one clip currently playing on an entity
#[derive(Clone, Debug, Default)]
pub struct Animator {
    clips: HashMap<String, AnimationClip>,
    active: Option<(String, AnimationState)>,
}

impl Animator {
    /// Create an animator with no clips
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip, replacing any clip with the same name
    pub fn add_clip(&mut self, clip: AnimationClip) -> Option<AnimationClip> {
        self.clips.insert(clip.name.clone(), clip)
    }

    /// Look up a registered clip
    pub fn get_clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Start a clip from its first frame, replacing whatever was playing
    pub fn play(&mut self, name: &str, now: Instant) -> Result<()> {
        let clip = self
            .clips
            .get(name)
            .ok_or_else(|| Error::UnknownClip(name.to_string()))?;
        clip.validate()?;
        self.active = Some((name.to_string(), AnimationState::new(clip, now)));
        Ok(())
    }

    /// Stop playback and drop the clip state
    pub fn stop(&mut self) {
        self.active = None;
    }

    /// Clip currently selected, if any
    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.active
            .as_ref()
            .and_then(|(name, _)| self.clips.get(name))
    }

    /// Playback state of the current clip
    pub fn state(&self) -> Option<&AnimationState> {
        self.active.as_ref().map(|(_, state)| state)
    }

    /// Advance the active clip. Returns whether the frame changed.
    pub fn update(&mut self, now: Instant) -> Result<bool> {
        let Some((name, state)) = self.active.as_mut() else {
            return Ok(false);
        };
        let clip = self
            .clips
            .get(name.as_str())
            .ok_or_else(|| Error::UnknownClip(name.clone()))?;
        state.advance(clip, now)
    }

    /// Absolute frame strip index of the active clip and whether it is playing
    pub fn frame(&self) -> Option<(u32, bool)> {
        let (name, state) = self.active.as_ref()?;
        let clip = self.clips.get(name)?;
        let (frame, playing) = state.current_frame(clip);
        Some((clip.strip_index(frame), playing))
    }

    /// Whether a clip is selected and has not played out
    pub fn is_playing(&self) -> bool {
        self.frame().is_some_and(|(_, playing)| playing)
    }
}
