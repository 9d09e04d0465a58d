//! fOS Theme Engine
//!
//! Widget theming: a CSS dialect for widget trees with named colors,
//! keyframes and binding sets, selector matching through a compiled
//! selector tree, the cascade, and transitions and animations driven by
//! host frame timestamps.

pub mod animated_style;
pub mod animation;
pub mod change;
pub mod config;
pub mod easing;
pub mod error;
pub mod lookup;
pub mod matcher;
pub mod parser;
pub mod progress_tracker;
pub mod properties;
pub mod provider;
pub mod section;
pub mod selector;
pub mod selector_tree;
pub mod static_style;
pub mod style;
pub mod transition;
pub mod values;

pub use animated_style::{AnimatedStyle, StyleSnapshot};
pub use animation::{CssAnimation, StyleAnimation};
pub use change::Change;
pub use config::EngineConfig;
pub use easing::Easing;
pub use error::{CssError, CssErrorKind, ErrorSink};
pub use matcher::{Matcher, StateFlags, StyleNode, StyleTree};
pub use progress_tracker::{ProgressState, ProgressTracker};
pub use properties::PropertyId;
pub use provider::{ImportResolver, MapResolver, NoImports, StyleProvider};
pub use section::{CssSection, SectionType};
pub use selector::Selector;
pub use selector_tree::SelectorTree;
pub use static_style::StaticStyle;
pub use style::{Style, print_style};
pub use transition::CssTransition;
pub use values::{CssValue, Keyframes, Rgba};
