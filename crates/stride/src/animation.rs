//! Animation contract consumed by the movement core.
//!
//! The core only needs three things from an animation system: start a named
//! sequence at some playback rate, say what is playing, and report keyframe
//! events. Blending and skeletal playback live elsewhere.
//!
//! [`SequenceLibrary`] is a minimal controller backed by a table of known
//! sequences and their lengths. It raises an `"end"` keyframe every time the
//! playing sequence runs through once.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Keyframe raised when a sequence reaches its last frame.
pub const END_KEYFRAME: &str = "end";

/// Playback channel a sequence is requested on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationCategory {
    /// Locomotion and other state-driven loops
    Misc,
    /// One-shot emotes and social actions
    Emotion,
}

impl fmt::Display for AnimationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Misc => write!(f, "Misc"),
            Self::Emotion => write!(f, "Emotion"),
        }
    }
}

/// A playable sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSequence {
    /// Sequence id within its animation set
    pub id: u32,
    /// Sequence name, e.g. `Run_A`
    pub name: String,
    /// Length at playback rate 1.0, in seconds
    pub duration_secs: f32,
}

impl AnimationSequence {
    /// Creates a sequence description.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            id,
            name: name.into(),
            duration_secs,
        }
    }
}

/// Per-actor animation player.
pub trait AnimationController: Send {
    /// Start `name` at `rate`. Returns `false` if the sequence cannot play.
    fn try_play_sequence(&mut self, name: &str, rate: f32, category: AnimationCategory) -> bool;

    /// The sequence currently playing, if any.
    fn playing_sequence(&self) -> Option<&AnimationSequence>;

    /// Advance playback by `delta`, pushing the names of keyframes crossed.
    fn update(&mut self, _delta: Duration, _events: &mut Vec<String>) {}
}

impl<T: AnimationController + ?Sized> AnimationController for Box<T> {
    fn try_play_sequence(&mut self, name: &str, rate: f32, category: AnimationCategory) -> bool {
        (**self).try_play_sequence(name, rate, category)
    }

    fn playing_sequence(&self) -> Option<&AnimationSequence> {
        (**self).playing_sequence()
    }

    fn update(&mut self, delta: Duration, events: &mut Vec<String>) {
        (**self).update(delta, events);
    }
}

#[derive(Debug, Clone)]
struct Playback {
    sequence: AnimationSequence,
    rate: f32,
    elapsed: f32,
}

/// Table-driven [`AnimationController`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stride::animation::{AnimationCategory, AnimationController, SequenceLibrary};
///
/// let mut animator = SequenceLibrary::new().with_sequence("Run_A", 0.5);
/// assert!(animator.try_play_sequence("Run_A", 2.0, AnimationCategory::Misc));
/// assert!(!animator.try_play_sequence("Fly_A", 1.0, AnimationCategory::Misc));
///
/// let mut events = Vec::new();
/// animator.update(Duration::from_millis(250), &mut events);
/// assert_eq!(events, vec!["end".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequenceLibrary {
    sequences: HashMap<String, AnimationSequence>,
    playing: Option<Playback>,
    next_id: u32,
}

impl SequenceLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with the usual locomotion set (`Idle_A`, `Walk_A`, `Run_A`,
    /// `Fly_A`), each one second long.
    #[must_use]
    pub fn locomotion() -> Self {
        Self::new()
            .with_sequence("Idle_A", 1.0)
            .with_sequence("Walk_A", 1.0)
            .with_sequence("Run_A", 1.0)
            .with_sequence("Fly_A", 1.0)
    }

    /// Adds a sequence of the given length.
    #[must_use]
    pub fn with_sequence(mut self, name: &str, duration_secs: f32) -> Self {
        let sequence = AnimationSequence::new(self.next_id, name, duration_secs);
        self.next_id += 1;
        self.sequences.insert(name.to_string(), sequence);
        self
    }

    /// Playback rate of the current sequence.
    #[must_use]
    pub fn playback_rate(&self) -> Option<f32> {
        self.playing.as_ref().map(|p| p.rate)
    }
}

impl AnimationController for SequenceLibrary {
    fn try_play_sequence(&mut self, name: &str, rate: f32, _category: AnimationCategory) -> bool {
        let Some(sequence) = self.sequences.get(name) else {
            return false;
        };
        self.playing = Some(Playback {
            sequence: sequence.clone(),
            rate: rate.max(0.0),
            elapsed: 0.0,
        });
        true
    }

    fn playing_sequence(&self) -> Option<&AnimationSequence> {
        self.playing.as_ref().map(|p| &p.sequence)
    }

    fn update(&mut self, delta: Duration, events: &mut Vec<String>) {
        let Some(playback) = self.playing.as_mut() else {
            return;
        };
        let length = playback.sequence.duration_secs;
        if length <= 0.0 {
            return;
        }
        playback.elapsed += delta.as_secs_f32() * playback.rate;
        while playback.elapsed >= length {
            playback.elapsed -= length;
            events.push(END_KEYFRAME.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sequence_is_refused() {
        let mut animator = SequenceLibrary::new();
        assert!(!animator.try_play_sequence("Run_A", 1.0, AnimationCategory::Misc));
        assert!(animator.playing_sequence().is_none());
    }

    #[test]
    fn play_records_sequence_and_rate() {
        let mut animator = SequenceLibrary::locomotion();
        assert!(animator.try_play_sequence("Walk_A", 1.5, AnimationCategory::Misc));
        assert_eq!(animator.playing_sequence().unwrap().name, "Walk_A");
        assert_eq!(animator.playback_rate(), Some(1.5));
    }

    #[test]
    fn ids_are_distinct() {
        let animator = SequenceLibrary::locomotion();
        let mut ids: Vec<u32> = animator.sequences.values().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn end_keyframe_repeats_each_cycle() {
        let mut animator = SequenceLibrary::new().with_sequence("Run_A", 1.0);
        animator.try_play_sequence("Run_A", 1.0, AnimationCategory::Misc);

        let mut events = Vec::new();
        animator.update(Duration::from_millis(900), &mut events);
        assert!(events.is_empty());

        animator.update(Duration::from_millis(1200), &mut events);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e == END_KEYFRAME));
    }

    #[test]
    fn zero_rate_never_ends() {
        let mut animator = SequenceLibrary::new().with_sequence("Run_A", 1.0);
        animator.try_play_sequence("Run_A", 0.0, AnimationCategory::Misc);
        let mut events = Vec::new();
        animator.update(Duration::from_secs(10), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn replay_restarts_clock() {
        let mut animator = SequenceLibrary::new().with_sequence("Run_A", 1.0);
        animator.try_play_sequence("Run_A", 1.0, AnimationCategory::Misc);
        let mut events = Vec::new();
        animator.update(Duration::from_millis(800), &mut events);
        animator.try_play_sequence("Run_A", 1.0, AnimationCategory::Misc);
        animator.update(Duration::from_millis(800), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn boxed_controller_delegates() {
        let mut animator: Box<dyn AnimationController> = Box::new(SequenceLibrary::locomotion());
        assert!(animator.try_play_sequence("Run_A", 1.0, AnimationCategory::Emotion));
        assert_eq!(animator.playing_sequence().unwrap().name, "Run_A");
    }

    #[test]
    fn category_display() {
        assert_eq!(format!("{}", AnimationCategory::Misc), "Misc");
        assert_eq!(format!("{}", AnimationCategory::Emotion), "Emotion");
    }
}
