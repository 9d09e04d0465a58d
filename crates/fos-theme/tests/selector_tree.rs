//! The compiled selector tree must agree with matching every selector on
//! its own.

use fos_theme::matcher::StyleNodeId;
use fos_theme::parser::CssParser;
use fos_theme::{Selector, SelectorTree, StateFlags, StyleNode, StyleTree};

const SELECTORS: &[&str] = &[
    "*",
    "button",
    "button.flat",
    "button:hover",
    "button:not(.flat)",
    ".flat",
    "#content",
    "#content > button",
    "#content button.flat:active",
    "window button",
    "window > button",
    "window > box > button",
    "headerbar button.titlebutton",
    "label + button",
    "label ~ button",
    "button + label",
    "button ~ label:last-child",
    "box > :first-child",
    "box > :nth-child(2n+1)",
    "box > :nth-last-child(1)",
    "row:nth-child(even)",
    "row:nth-child(odd) ~ row",
    "list row:only-child",
    "list > row:not(:selected)",
    "window.background headerbar label.title",
    "window.background .title",
    "*:dir(rtl)",
    "entry:focus",
    "window box entry:focus:dir(rtl)",
];

fn parse_all() -> Vec<Selector> {
    SELECTORS
        .iter()
        .map(|text| {
            let mut parser = CssParser::new(text, None);
            let selector = Selector::parse(&mut parser);
            assert!(parser.errors().is_empty(), "{text}: {:?}", parser.errors());
            selector.unwrap()
        })
        .collect()
}

fn widget_tree() -> (StyleTree, Vec<StyleNodeId>) {
    let mut tree = StyleTree::new();
    let mut nodes = Vec::new();

    let window = tree.add_root(StyleNode::new("window").with_class("background"));
    let header = tree.append_child(window, StyleNode::new("headerbar"));
    nodes.push(tree.append_child(header, StyleNode::new("label").with_class("title")));
    nodes.push(tree.append_child(
        header,
        StyleNode::new("button").with_class("titlebutton").with_state(StateFlags::HOVER),
    ));

    let content = tree.append_child(window, StyleNode::new("box").with_id("content"));
    nodes.push(tree.append_child(content, StyleNode::new("label")));
    nodes.push(tree.append_child(content, StyleNode::new("button").with_class("flat")));
    nodes.push(tree.append_child(content, StyleNode::new("button").hidden()));
    nodes.push(tree.append_child(
        content,
        StyleNode::new("button").with_class("flat").with_state(StateFlags::ACTIVE),
    ));
    nodes.push(tree.append_child(content, StyleNode::new("label")));
    nodes.push(tree.append_child(
        content,
        StyleNode::new("entry").with_state(StateFlags::FOCUS | StateFlags::DIR_RTL),
    ));

    let list = tree.append_child(window, StyleNode::new("list"));
    for i in 0..5 {
        let state = if i == 2 { StateFlags::SELECTED } else { StateFlags::empty() };
        nodes.push(tree.append_child(list, StyleNode::new("row").with_state(state)));
    }
    let single = tree.append_child(window, StyleNode::new("list"));
    nodes.push(tree.append_child(single, StyleNode::new("row")));

    nodes.extend([window, header, content, list, single]);
    (tree, nodes)
}

#[test]
fn test_tree_agrees_with_selectors() {
    let selectors = parse_all();
    let tree = SelectorTree::build(selectors.iter().enumerate());
    let (widgets, nodes) = widget_tree();

    for node in nodes {
        let matcher = widgets.matcher(node);
        let expected: Vec<usize> = selectors
            .iter()
            .enumerate()
            .filter(|(_, selector)| selector.matches(&matcher))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(tree.match_all(&matcher), expected, "node {:?}", widgets.node(node));
    }
}

#[test]
fn test_tree_order_does_not_matter() {
    let selectors = parse_all();
    let forward = SelectorTree::build(selectors.iter().enumerate());
    let backward = SelectorTree::build(selectors.iter().enumerate().rev());
    let (widgets, nodes) = widget_tree();

    for node in nodes {
        let matcher = widgets.matcher(node);
        assert_eq!(forward.match_all(&matcher), backward.match_all(&matcher));
    }
}
