//! Cascade: specificity, inheritance and change masks

use fos_theme::style::print_style;
use fos_theme::{
    Change, CssValue, EngineConfig, PropertyId, Rgba, StateFlags, StaticStyle, Style, StyleNode, StyleProvider,
    StyleTree,
};

fn provider(text: &str) -> StyleProvider {
    let mut provider = StyleProvider::with_config(EngineConfig::default());
    provider.load_from_data(text).unwrap();
    provider
}

fn color(style: &StaticStyle) -> Option<Rgba> {
    style.value(PropertyId::Color).as_rgba()
}

#[test]
fn test_single_ruleset() {
    let provider = provider(".x { color: #ff0000; }");
    let mut tree = StyleTree::new();
    let node = tree.add_root(StyleNode::new("label").with_class("x"));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(node)), None);
    assert_eq!(color(&style), Some(Rgba::new(1.0, 0.0, 0.0, 1.0)));
}

#[test]
fn test_specificity_beats_source_order() {
    let provider = provider("#y.x { color: #0000ff } .x { color: #ff0000 }");
    let mut tree = StyleTree::new();
    let node = tree.add_root(StyleNode::new("label").with_id("y").with_class("x"));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(node)), None);
    assert_eq!(color(&style), Some(Rgba::new(0.0, 0.0, 1.0, 1.0)));
}

#[test]
fn test_source_order_breaks_ties() {
    let provider = provider(".a { opacity: 0.25 } .b { opacity: 0.75 }");
    let mut tree = StyleTree::new();
    let node = tree.add_root(StyleNode::new("label").with_class("a").with_class("b"));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(node)), None);
    assert_eq!(style.value(PropertyId::Opacity), &CssValue::number(0.75));
}

#[test]
fn test_inheritance() {
    let provider = provider("parent { color: green; opacity: 0.5 }");
    let mut tree = StyleTree::new();
    let parent_id = tree.add_root(StyleNode::new("parent"));
    let child_id = tree.append_child(parent_id, StyleNode::new("child"));

    let parent = StaticStyle::compute(&provider, Some(&tree.matcher(parent_id)), None);
    let child = StaticStyle::compute(&provider, Some(&tree.matcher(child_id)), Some(&parent));

    assert!(color(&parent).is_some());
    assert_eq!(color(&child), color(&parent));
    // opacity does not inherit
    assert_eq!(child.value(PropertyId::Opacity), PropertyId::Opacity.initial_value());
}

#[test]
fn test_explicit_inherit_and_initial() {
    let provider = provider("box { opacity: 0.5; color: #ff0000 } label { opacity: inherit; color: initial }");
    let mut tree = StyleTree::new();
    let parent_id = tree.add_root(StyleNode::new("box"));
    let child_id = tree.append_child(parent_id, StyleNode::new("label"));

    let parent = StaticStyle::compute(&provider, Some(&tree.matcher(parent_id)), None);
    let child = StaticStyle::compute(&provider, Some(&tree.matcher(child_id)), Some(&parent));

    assert_eq!(child.value(PropertyId::Opacity), &CssValue::number(0.5));
    assert_ne!(color(&child), color(&parent));
}

#[test]
fn test_em_lengths_follow_font_size() {
    let provider = provider("label { font-size: 10px; margin-top: 2em }");
    let mut tree = StyleTree::new();
    let node = tree.add_root(StyleNode::new("label"));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(node)), None);
    assert_eq!(style.value(PropertyId::MarginTop).as_px(), Some(20.0));
}

#[test]
fn test_change_masks() {
    let provider = provider("box > button.a { opacity: 0.5 } button:hover { opacity: 1 }");
    let mut tree = StyleTree::new();
    let parent_id = tree.add_root(StyleNode::new("box"));
    let button = tree.append_child(parent_id, StyleNode::new("button").with_class("a"));
    let label = tree.append_child(parent_id, StyleNode::new("label"));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(button)), None);
    assert!(style.change().contains(Change::CLASS));
    assert!(style.change().contains(Change::PARENT_NAME));
    assert!(style.change().contains(Change::STATE));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(label)), None);
    assert_eq!(style.change(), Change::empty());
}

#[test]
fn test_state_selects_rules() {
    let provider = provider("button { opacity: 0.5 } button:hover { opacity: 1 }");
    let mut tree = StyleTree::new();
    let idle = tree.add_root(StyleNode::new("button"));
    let hovered = tree.add_root(StyleNode::new("button").with_state(StateFlags::HOVER));

    let idle = StaticStyle::compute(&provider, Some(&tree.matcher(idle)), None);
    let hovered = StaticStyle::compute(&provider, Some(&tree.matcher(hovered)), None);
    assert_eq!(idle.value(PropertyId::Opacity), &CssValue::number(0.5));
    assert_eq!(hovered.value(PropertyId::Opacity), &CssValue::number(1.0));
}

#[test]
fn test_print_style_skips_initial_values() {
    let provider = provider("label { opacity: 0.5 }");
    let mut tree = StyleTree::new();
    let node = tree.add_root(StyleNode::new("label"));

    let style = StaticStyle::compute(&provider, Some(&tree.matcher(node)), None);
    let printed = print_style(&style, true);
    assert!(printed.contains("opacity: 0.5;"), "{printed}");
    assert!(!printed.contains("margin-top"), "{printed}");

    let full = print_style(&style, false);
    assert!(full.contains("margin-top: 0px;"), "{full}");
}
