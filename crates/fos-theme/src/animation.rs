//! Keyframe Animations
//!
//! A running `animation-name` entry, plus [`StyleAnimation`], the common
//! shape of everything an [`AnimatedStyle`] drives.

use std::sync::Arc;

use crate::animated_style::AnimatedStyle;
use crate::easing::Easing;
use crate::progress_tracker::{ProgressState, ProgressTracker};
use crate::transition::CssTransition;
use crate::values::Keyframes;

/// `animation-direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl Direction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "normal" => Some(Self::Normal),
            "reverse" => Some(Self::Reverse),
            "alternate" => Some(Self::Alternate),
            "alternate-reverse" => Some(Self::AlternateReverse),
            _ => None,
        }
    }
}

/// `animation-play-state`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayState {
    #[default]
    Running,
    Paused,
}

impl PlayState {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "running" => Some(Self::Running),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

/// `animation-fill-mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    #[default]
    None,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" => Some(Self::None),
            "forwards" => Some(Self::Forwards),
            "backwards" => Some(Self::Backwards),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Timing of a keyframe animation, in microseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTiming {
    pub duration: i64,
    pub delay: i64,
    pub iteration_count: f64,
    pub direction: Direction,
    pub play_state: PlayState,
    pub fill_mode: FillMode,
    pub easing: Easing,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            duration: 0,
            delay: 0,
            iteration_count: 1.0,
            direction: Direction::Normal,
            play_state: PlayState::Running,
            fill_mode: FillMode::None,
            easing: Easing::EASE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssAnimation {
    name: String,
    keyframes: Arc<Keyframes>,
    easing: Easing,
    direction: Direction,
    play_state: PlayState,
    fill_mode: FillMode,
    tracker: ProgressTracker,
}

impl CssAnimation {
    /// Start an animation at `timestamp`
    pub fn new(
        name: &str,
        keyframes: Arc<Keyframes>,
        timestamp: i64,
        timing: AnimationTiming,
        slowdown: f64,
    ) -> Self {
        let mut tracker = ProgressTracker::with_slowdown(slowdown);
        tracker.start(timing.duration, timing.delay, timing.iteration_count);
        match timing.play_state {
            PlayState::Paused => tracker.skip_frame(timestamp),
            PlayState::Running => tracker.advance_frame(timestamp),
        }

        tracing::debug!(name, duration = timing.duration, delay = timing.delay, "starting animation");

        Self {
            name: name.to_string(),
            keyframes,
            easing: timing.easing,
            direction: timing.direction,
            play_state: timing.play_state,
            fill_mode: timing.fill_mode,
            tracker,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keyframes(&self) -> &Arc<Keyframes> {
        &self.keyframes
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// A copy moved to `timestamp`
    pub fn advance(&self, timestamp: i64) -> Self {
        self.advance_with_play_state(timestamp, self.play_state)
    }

    /// A copy moved to `timestamp` under a new play state. Paused
    /// animations keep their progress.
    pub fn advance_with_play_state(&self, timestamp: i64, play_state: PlayState) -> Self {
        let mut next = self.clone();
        next.play_state = play_state;
        match play_state {
            PlayState::Paused => next.tracker.skip_frame(timestamp),
            PlayState::Running => next.tracker.advance_frame(timestamp),
        }
        next
    }

    /// Whether the fill mode lets the animation write values in the
    /// tracker's current state
    pub fn is_executing(&self) -> bool {
        let state = self.tracker.state();
        match self.fill_mode {
            FillMode::None => state == ProgressState::During,
            FillMode::Forwards => state != ProgressState::Before,
            FillMode::Backwards => state != ProgressState::After,
            FillMode::Both => true,
        }
    }

    fn is_reverse(&self) -> bool {
        let odd = self.tracker.iteration_cycle() % 2 == 1;
        match self.direction {
            Direction::Normal => false,
            Direction::Reverse => true,
            Direction::Alternate => odd,
            Direction::AlternateReverse => !odd,
        }
    }

    /// Eased progress of the current iteration
    pub fn progress(&self) -> f64 {
        self.easing.transform(self.tracker.progress(self.is_reverse()))
    }

    pub fn apply_values(&self, style: &mut AnimatedStyle) {
        if !self.is_executing() {
            return;
        }

        let progress = self.progress();
        for track in self.keyframes.tracks() {
            let value = self
                .keyframes
                .value_at(track.property, progress, style.intrinsic_value(track.property));
            style.set_animated_value(track.property, value);
        }
    }

    /// Keyframe animations run for as long as the style names them
    pub fn is_finished(&self) -> bool {
        false
    }

    pub fn is_static(&self) -> bool {
        self.play_state == PlayState::Paused || self.tracker.state() == ProgressState::After
    }
}

// ---- style animations -------------------------------------------------------

/// Anything an animated style runs
#[derive(Debug, Clone, PartialEq)]
pub enum StyleAnimation {
    Keyframes(CssAnimation),
    Transition(CssTransition),
}

impl StyleAnimation {
    pub fn advance(&self, timestamp: i64) -> Self {
        match self {
            Self::Keyframes(animation) => Self::Keyframes(animation.advance(timestamp)),
            Self::Transition(transition) => Self::Transition(transition.advance(timestamp)),
        }
    }

    pub fn apply_values(&self, style: &mut AnimatedStyle) {
        match self {
            Self::Keyframes(animation) => animation.apply_values(style),
            Self::Transition(transition) => transition.apply_values(style),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Self::Keyframes(animation) => animation.is_finished(),
            Self::Transition(transition) => transition.is_finished(),
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Self::Keyframes(animation) => animation.is_static(),
            Self::Transition(transition) => transition.is_static(),
        }
    }
}
