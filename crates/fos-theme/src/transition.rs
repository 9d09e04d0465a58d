//! Transitions
//!
//! Interpolates one property from the value it had before a style change
//! to its new intrinsic value.

use crate::animated_style::AnimatedStyle;
use crate::easing::Easing;
use crate::progress_tracker::{ProgressState, ProgressTracker};
use crate::properties::PropertyId;
use crate::values::CssValue;

#[derive(Debug, Clone, PartialEq)]
pub struct CssTransition {
    property: PropertyId,
    start: CssValue,
    easing: Easing,
    tracker: ProgressTracker,
}

impl CssTransition {
    /// Start a transition of `property` away from `start`. Times are in
    /// microseconds.
    pub fn new(
        property: PropertyId,
        start: CssValue,
        easing: Easing,
        timestamp: i64,
        duration: i64,
        delay: i64,
        slowdown: f64,
    ) -> Self {
        let mut tracker = ProgressTracker::with_slowdown(slowdown);
        tracker.start(duration, delay, 1.0);
        tracker.advance_frame(timestamp);

        tracing::trace!(property = property.name(), duration, delay, "starting transition");

        Self {
            property,
            start,
            easing,
            tracker,
        }
    }

    pub fn property(&self) -> PropertyId {
        self.property
    }

    pub fn start_value(&self) -> &CssValue {
        &self.start
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn advance(&self, timestamp: i64) -> Self {
        let mut next = self.clone();
        next.tracker.advance_frame(timestamp);
        next
    }

    pub fn apply_values(&self, style: &mut AnimatedStyle) {
        let value = match self.tracker.state() {
            ProgressState::Before => self.start.clone(),
            ProgressState::During => {
                let end = style.intrinsic_value(self.property);
                let progress = self.easing.transform(self.tracker.progress(false));
                self.start
                    .transition(end, progress)
                    .unwrap_or_else(|| end.clone())
            }
            ProgressState::After => return,
        };
        style.set_animated_value(self.property, value);
    }

    pub fn is_finished(&self) -> bool {
        self.tracker.state() == ProgressState::After
    }

    pub fn is_static(&self) -> bool {
        self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let transition = CssTransition::new(
            PropertyId::Opacity,
            CssValue::number(0.0),
            Easing::LINEAR,
            1_000,
            100,
            50,
            1.0,
        );
        assert_eq!(transition.property(), PropertyId::Opacity);
        assert_eq!(transition.start_value(), &CssValue::number(0.0));
        assert_eq!(transition.tracker().state(), ProgressState::Before);

        let during = transition.advance(1_100);
        assert_eq!(during.tracker().state(), ProgressState::During);
        assert!(!during.is_finished());

        let after = during.advance(1_200);
        assert!(after.is_finished());
        assert!(after.is_static());
    }
}
