//! Animated Styles
//!
//! A static style with running transitions and keyframe animations
//! layered on top. Each frame produces a new snapshot; nothing is mutated
//! in place once a snapshot has been handed out.

use std::sync::Arc;

use crate::animation::{AnimationTiming, CssAnimation, Direction, FillMode, PlayState, StyleAnimation};
use crate::easing::Easing;
use crate::properties::{self, N_PROPERTIES, PropertyId};
use crate::provider::StyleProvider;
use crate::section::CssSection;
use crate::static_style::StaticStyle;
use crate::style::Style;
use crate::transition::CssTransition;
use crate::values::{ComputeContext, CssValue};

const USEC_PER_SEC: f64 = 1_000_000.0;

/// A style as handed to the host for one frame
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSnapshot {
    Static(Arc<StaticStyle>),
    Animated(Arc<AnimatedStyle>),
}

impl StyleSnapshot {
    /// The style without animations
    pub fn base(&self) -> &Arc<StaticStyle> {
        match self {
            Self::Static(style) => style,
            Self::Animated(style) => &style.base,
        }
    }

    pub fn as_animated(&self) -> Option<&AnimatedStyle> {
        match self {
            Self::Static(_) => None,
            Self::Animated(style) => Some(style),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// Move to `timestamp`; static snapshots stay as they are
    pub fn advance(&self, timestamp: i64) -> StyleSnapshot {
        match self {
            Self::Static(_) => self.clone(),
            Self::Animated(style) => style.advance(timestamp),
        }
    }
}

impl Style for StyleSnapshot {
    fn value(&self, id: PropertyId) -> &CssValue {
        match self {
            Self::Static(style) => style.value(id),
            Self::Animated(style) => style.value(id),
        }
    }

    fn section(&self, id: PropertyId) -> Option<&CssSection> {
        match self {
            Self::Static(style) => style.section(id),
            Self::Animated(style) => style.section(id),
        }
    }

    fn is_static(&self) -> bool {
        match self {
            Self::Static(style) => style.is_static(),
            Self::Animated(style) => style.is_static(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedStyle {
    base: Arc<StaticStyle>,
    animated: Vec<Option<CssValue>>,
    animations: Vec<StyleAnimation>,
    current_time: i64,
}

impl AnimatedStyle {
    /// Start the transitions and animations `base` asks for.
    ///
    /// `previous` is the style the node had before; transitions run from
    /// its values and animations it was already running continue. A zero
    /// `timestamp` disables animation.
    pub fn new(
        base: Arc<StaticStyle>,
        parent: Option<&dyn Style>,
        timestamp: i64,
        provider: &StyleProvider,
        previous: Option<&StyleSnapshot>,
    ) -> StyleSnapshot {
        if timestamp == 0 {
            return StyleSnapshot::Static(base);
        }

        let slowdown = provider.config().slowdown;
        let mut animations = Vec::new();

        if let Some(previous) = previous {
            create_transitions(&mut animations, &base, timestamp, previous, slowdown);
        }
        create_animations(&mut animations, &base, parent, timestamp, provider, previous, slowdown);

        if animations.is_empty() {
            return StyleSnapshot::Static(base);
        }

        // newest first
        animations.reverse();
        Self::from_animations(base, animations, timestamp)
    }

    fn from_animations(base: Arc<StaticStyle>, animations: Vec<StyleAnimation>, timestamp: i64) -> StyleSnapshot {
        let mut style = AnimatedStyle {
            base,
            animated: vec![None; N_PROPERTIES],
            animations: Vec::new(),
            current_time: timestamp,
        };
        for animation in &animations {
            animation.apply_values(&mut style);
        }
        style.animations = animations;

        tracing::trace!(animations = style.animations.len(), timestamp, "animated style");
        StyleSnapshot::Animated(Arc::new(style))
    }

    /// The same animations moved to `timestamp`; finished ones are dropped
    pub fn advance(&self, timestamp: i64) -> StyleSnapshot {
        Self::advance_base(&self.base, self, timestamp)
    }

    /// Move the animations of `source` to `timestamp` on top of `base`
    pub fn advance_base(base: &Arc<StaticStyle>, source: &AnimatedStyle, timestamp: i64) -> StyleSnapshot {
        if timestamp == 0 {
            return StyleSnapshot::Static(Arc::clone(base));
        }

        let animations: Vec<StyleAnimation> = source
            .animations
            .iter()
            .filter(|animation| !animation.is_finished())
            .map(|animation| animation.advance(timestamp))
            .collect();

        if animations.is_empty() {
            return StyleSnapshot::Static(Arc::clone(base));
        }

        Self::from_animations(Arc::clone(base), animations, timestamp)
    }

    pub fn base(&self) -> &Arc<StaticStyle> {
        &self.base
    }

    pub fn animations(&self) -> &[StyleAnimation] {
        &self.animations
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Value of `id` without animations
    pub fn intrinsic_value(&self, id: PropertyId) -> &CssValue {
        self.base.value(id)
    }

    pub fn set_animated_value(&mut self, id: PropertyId, value: CssValue) {
        self.animated[id.index()] = Some(value);
    }

    fn find_transition(&self, id: PropertyId) -> Option<&CssTransition> {
        self.animations.iter().find_map(|animation| match animation {
            StyleAnimation::Transition(transition) if transition.property() == id => Some(transition),
            _ => None,
        })
    }

    fn find_animation(&self, name: &str) -> Option<&CssAnimation> {
        find_animation(&self.animations, name)
    }
}

impl Style for AnimatedStyle {
    fn value(&self, id: PropertyId) -> &CssValue {
        match &self.animated[id.index()] {
            Some(value) => value,
            None => self.base.value(id),
        }
    }

    fn section(&self, id: PropertyId) -> Option<&CssSection> {
        self.base.section(id)
    }

    fn is_static(&self) -> bool {
        self.animations.iter().all(StyleAnimation::is_static)
    }
}

fn find_animation<'a>(animations: &'a [StyleAnimation], name: &str) -> Option<&'a CssAnimation> {
    animations.iter().find_map(|animation| match animation {
        StyleAnimation::Keyframes(animation) if animation.name() == name => Some(animation),
        _ => None,
    })
}

fn seconds(value: &CssValue) -> f64 {
    value.as_dimension().map_or(0.0, |d| d.seconds())
}

fn usec(seconds: f64) -> i64 {
    (seconds * USEC_PER_SEC) as i64
}

/// Index into the `transition-*` lists of every transitioned property;
/// later entries override earlier ones
fn transition_indices(base: &StaticStyle) -> Vec<Option<usize>> {
    let mut indices = vec![None; N_PROPERTIES];

    for (i, value) in base.value(PropertyId::TransitionProperty).as_slice().iter().enumerate() {
        let Some(name) = value.as_ident() else {
            continue;
        };

        if name.eq_ignore_ascii_case("all") {
            for id in PropertyId::ALL.into_iter().filter(|id| id.is_animated()) {
                indices[id.index()] = Some(i);
            }
            continue;
        }

        let Some(property) = properties::lookup(name) else {
            continue;
        };
        for id in property.animated_longhands() {
            indices[id.index()] = Some(i);
        }
    }

    indices
}

fn create_transitions(
    animations: &mut Vec<StyleAnimation>,
    base: &StaticStyle,
    timestamp: i64,
    previous: &StyleSnapshot,
    slowdown: f64,
) {
    let durations = base.value(PropertyId::TransitionDuration);
    let delays = base.value(PropertyId::TransitionDelay);
    let timing_functions = base.value(PropertyId::TransitionTimingFunction);

    for (index, id) in transition_indices(base)
        .into_iter()
        .zip(PropertyId::ALL)
        .filter_map(|(index, id)| Some((index?, id)))
    {
        let duration = seconds(durations.nth(index));
        let delay = seconds(delays.nth(index));
        if duration + delay == 0.0 {
            continue;
        }

        let end = base.value(id);

        if let StyleSnapshot::Animated(previous) = previous
            && previous.intrinsic_value(id) == end
        {
            if let Some(transition) = previous.find_transition(id) {
                animations.push(StyleAnimation::Transition(transition.advance(timestamp)));
            }
            continue;
        }

        let start = previous.value(id);
        if start == end {
            continue;
        }

        let easing = timing_functions.nth(index).as_easing().unwrap_or(Easing::EASE);
        animations.push(StyleAnimation::Transition(CssTransition::new(
            id,
            start.clone(),
            easing,
            timestamp,
            usec(duration),
            usec(delay),
            slowdown,
        )));
    }
}

fn create_animations(
    animations: &mut Vec<StyleAnimation>,
    base: &StaticStyle,
    parent: Option<&dyn Style>,
    timestamp: i64,
    provider: &StyleProvider,
    previous: Option<&StyleSnapshot>,
    slowdown: f64,
) {
    let names = base.value(PropertyId::AnimationName);
    let durations = base.value(PropertyId::AnimationDuration);
    let delays = base.value(PropertyId::AnimationDelay);
    let timing_functions = base.value(PropertyId::AnimationTimingFunction);
    let iteration_counts = base.value(PropertyId::AnimationIterationCount);
    let directions = base.value(PropertyId::AnimationDirection);
    let play_states = base.value(PropertyId::AnimationPlayState);
    let fill_modes = base.value(PropertyId::AnimationFillMode);

    for (i, name) in names.as_slice().iter().enumerate() {
        let Some(name) = name.as_ident() else {
            continue;
        };
        if name.eq_ignore_ascii_case("none") || find_animation(animations, name).is_some() {
            continue;
        }

        let play_state = play_states
            .nth(i)
            .as_ident()
            .and_then(PlayState::from_keyword)
            .unwrap_or_default();

        let running = previous
            .and_then(StyleSnapshot::as_animated)
            .and_then(|previous| previous.find_animation(name));
        if let Some(running) = running {
            animations.push(StyleAnimation::Keyframes(
                running.advance_with_play_state(timestamp, play_state),
            ));
            continue;
        }

        let Some(keyframes) = provider.get_keyframes(name) else {
            tracing::debug!(name, "no keyframes for animation");
            continue;
        };
        let ctx = ComputeContext::new(provider, base.values(), parent);
        let keyframes = Arc::new(keyframes.compute(&ctx));

        let timing = AnimationTiming {
            duration: usec(seconds(durations.nth(i))),
            delay: usec(seconds(delays.nth(i))),
            iteration_count: iteration_counts.nth(i).as_number().unwrap_or(1.0),
            direction: directions
                .nth(i)
                .as_ident()
                .and_then(Direction::from_keyword)
                .unwrap_or_default(),
            play_state,
            fill_mode: fill_modes
                .nth(i)
                .as_ident()
                .and_then(FillMode::from_keyword)
                .unwrap_or_default(),
            easing: timing_functions.nth(i).as_easing().unwrap_or(Easing::EASE),
        };

        animations.push(StyleAnimation::Keyframes(CssAnimation::new(
            name, keyframes, timestamp, timing, slowdown,
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::matcher::{StyleNode, StyleTree};

    const START: i64 = 1_000_000;

    fn provider(text: &str) -> StyleProvider {
        let mut provider = StyleProvider::with_config(EngineConfig::default());
        provider.load_from_data(text).unwrap();
        provider
    }

    fn style_for(provider: &StyleProvider, node: StyleNode) -> Arc<StaticStyle> {
        let mut tree = StyleTree::new();
        let id = tree.add_root(node);
        Arc::new(StaticStyle::compute(provider, Some(&tree.matcher(id)), None))
    }

    fn opacity(style: &dyn Style) -> f64 {
        style.value(PropertyId::Opacity).as_number().unwrap_or(f64::NAN)
    }

    #[test]
    fn test_zero_timestamp_is_static() {
        let provider = provider("@keyframes k { to { opacity: 0 } } a { animation: k 1s }");
        let base = style_for(&provider, StyleNode::new("a"));
        let snapshot = AnimatedStyle::new(base, None, 0, &provider, None);
        assert!(!snapshot.is_animated());
    }

    #[test]
    fn test_unknown_keyframes_are_skipped() {
        let provider = provider("a { animation: missing 1s }");
        let base = style_for(&provider, StyleNode::new("a"));
        let snapshot = AnimatedStyle::new(base, None, START, &provider, None);
        assert!(!snapshot.is_animated());
    }

    #[test]
    fn test_no_transition_without_previous_style() {
        let provider = provider("a { transition: opacity 1s linear; opacity: 0.5 }");
        let base = style_for(&provider, StyleNode::new("a"));
        let snapshot = AnimatedStyle::new(base, None, START, &provider, None);
        assert!(!snapshot.is_animated());
    }

    #[test]
    fn test_transition_starts_from_previous_value() {
        let provider = provider("a { transition: opacity 1s linear } a.dim { opacity: 0 }");
        let before = StyleSnapshot::Static(style_for(&provider, StyleNode::new("a")));
        let base = style_for(&provider, StyleNode::new("a").with_class("dim"));

        let snapshot = AnimatedStyle::new(base, None, START, &provider, Some(&before));
        assert!(snapshot.is_animated());
        assert_eq!(opacity(&snapshot), 1.0);
        assert!(!snapshot.is_static());

        let halfway = snapshot.advance(START + 500_000);
        assert!((opacity(&halfway) - 0.5).abs() < 1e-3);

        let done = halfway.advance(START + 1_000_001);
        assert_eq!(opacity(&done), 0.0);
        assert!(done.is_static());

        assert!(!done.advance(START + 1_100_000).is_animated());
    }

    #[test]
    fn test_running_animation_continues() {
        let provider = provider("@keyframes k { from { opacity: 0 } to { opacity: 1 } } a { animation: k 1s linear }");
        let base = style_for(&provider, StyleNode::new("a"));

        let first = AnimatedStyle::new(Arc::clone(&base), None, START, &provider, None);
        let second = AnimatedStyle::new(base, None, START + 250_000, &provider, Some(&first));

        let animated = second.as_animated().map(|s| s.animations().len());
        assert_eq!(animated, Some(1));
        assert!((opacity(&second) - 0.25).abs() < 1e-3);
    }
}
