//! Matchers
//!
//! A matcher is the view of one node in the host's widget tree that
//! selectors are tested against. The engine never sees the host's nodes
//! directly; it only walks them through this interface.
//!
//! Three matchers ship with the crate: [`AnyMatcher`] matches every
//! simple selector, [`SupersetMatcher`] answers only the queries named by
//! a relevance mask, and [`NodeMatcher`] walks a [`StyleTree`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::change::Change;

bitflags! {
    /// Widget states selectable with pseudo-classes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StateFlags: u32 {
        const ACTIVE = 1 << 0;
        const HOVER = 1 << 1;
        const SELECTED = 1 << 2;
        const DISABLED = 1 << 3;
        const INDETERMINATE = 1 << 4;
        const FOCUS = 1 << 5;
        const BACKDROP = 1 << 6;
        const DIR_LTR = 1 << 7;
        const DIR_RTL = 1 << 8;
        const LINK = 1 << 9;
        const VISITED = 1 << 10;
        const CHECKED = 1 << 11;
        const DROP_ACTIVE = 1 << 12;
    }
}

const STATE_NAMES: &[(StateFlags, &str)] = &[
    (StateFlags::ACTIVE, "active"),
    (StateFlags::HOVER, "hover"),
    (StateFlags::SELECTED, "selected"),
    (StateFlags::DISABLED, "disabled"),
    (StateFlags::INDETERMINATE, "indeterminate"),
    (StateFlags::FOCUS, "focus"),
    (StateFlags::BACKDROP, "backdrop"),
    (StateFlags::DIR_LTR, "dir(ltr)"),
    (StateFlags::DIR_RTL, "dir(rtl)"),
    (StateFlags::LINK, "link"),
    (StateFlags::VISITED, "visited"),
    (StateFlags::CHECKED, "checked"),
    (StateFlags::DROP_ACTIVE, "drop(active)"),
];

impl StateFlags {
    /// Pseudo-class name of a single state flag
    pub fn pseudo_class_name(self) -> Option<&'static str> {
        STATE_NAMES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, name)| *name)
    }
}

/// A node selectors can be matched against
pub trait Matcher {
    fn parent(&self) -> Option<Box<dyn Matcher + '_>>;

    /// The previous (visible) sibling
    fn previous(&self) -> Option<Box<dyn Matcher + '_>>;

    fn state(&self) -> StateFlags;

    fn has_name(&self, name: &str) -> bool;

    fn has_class(&self, class: &str) -> bool;

    fn has_id(&self, id: &str) -> bool;

    /// Whether the node is at a position `a * n + b` (for some `n >= 0`)
    /// counting from the first sibling, or from the last one when
    /// `forward` is false. Positions start at 1.
    fn has_position(&self, forward: bool, a: i32, b: i32) -> bool;

    /// True for matchers that match everything, which lets ancestor and
    /// sibling walks stop after one step
    fn matches_any(&self) -> bool {
        false
    }
}

/// Whether `position` (1-based) solves `a * n + b` for an integer `n >= 0`
pub fn position_matches(position: i32, a: i32, b: i32) -> bool {
    // i64 holds every difference of two i32s
    let x = i64::from(position) - i64::from(b);
    let a = i64::from(a);
    if a == 0 {
        return x == 0;
    }
    x % a == 0 && x / a >= 0
}

/// Matches any selector; every relative is again an `AnyMatcher`
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMatcher;

impl Matcher for AnyMatcher {
    fn parent(&self) -> Option<Box<dyn Matcher + '_>> {
        Some(Box::new(AnyMatcher))
    }

    fn previous(&self) -> Option<Box<dyn Matcher + '_>> {
        Some(Box::new(AnyMatcher))
    }

    fn state(&self) -> StateFlags {
        StateFlags::all()
    }

    fn has_name(&self, _name: &str) -> bool {
        true
    }

    fn has_class(&self, _class: &str) -> bool {
        true
    }

    fn has_id(&self, _id: &str) -> bool {
        true
    }

    fn has_position(&self, _forward: bool, _a: i32, _b: i32) -> bool {
        true
    }

    fn matches_any(&self) -> bool {
        true
    }
}

/// Delegates the queries selected by `relevant` to `subset`; every other
/// query matches. Relatives are [`AnyMatcher`]s.
///
/// Matching a superset finds every ruleset that could match the node
/// after a change outside the relevant attributes.
pub struct SupersetMatcher<'a> {
    subset: &'a dyn Matcher,
    relevant: Change,
}

impl<'a> SupersetMatcher<'a> {
    pub fn new(subset: &'a dyn Matcher, relevant: Change) -> Self {
        Self { subset, relevant }
    }
}

impl Matcher for SupersetMatcher<'_> {
    fn parent(&self) -> Option<Box<dyn Matcher + '_>> {
        Some(Box::new(AnyMatcher))
    }

    fn previous(&self) -> Option<Box<dyn Matcher + '_>> {
        Some(Box::new(AnyMatcher))
    }

    fn state(&self) -> StateFlags {
        if self.relevant.contains(Change::STATE) {
            self.subset.state()
        } else {
            StateFlags::all()
        }
    }

    fn has_name(&self, name: &str) -> bool {
        !self.relevant.contains(Change::NAME) || self.subset.has_name(name)
    }

    fn has_class(&self, class: &str) -> bool {
        !self.relevant.contains(Change::CLASS) || self.subset.has_class(class)
    }

    fn has_id(&self, id: &str) -> bool {
        !self.relevant.contains(Change::NAME) || self.subset.has_id(id)
    }

    fn has_position(&self, forward: bool, a: i32, b: i32) -> bool {
        !self.relevant.intersects(Change::POSITION) || self.subset.has_position(forward, a, b)
    }
}

// ---- style tree -----------------------------------------------------------

/// Index of a node in a [`StyleTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleNodeId(u32);

impl StyleNodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Attributes of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleNode {
    pub name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub state: StateFlags,
    /// Invisible nodes are skipped when looking for siblings
    pub visible: bool,
}

impl StyleNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
            classes: Vec::new(),
            state: StateFlags::empty(),
            visible: true,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn with_state(mut self, state: StateFlags) -> Self {
        self.state = state;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Clone)]
struct TreeSlot {
    node: StyleNode,
    parent: Option<StyleNodeId>,
    children: Vec<StyleNodeId>,
}

/// A minimal node tree for hosts without one of their own
#[derive(Debug, Clone, Default)]
pub struct StyleTree {
    slots: Vec<TreeSlot>,
    roots: Vec<StyleNodeId>,
}

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: StyleNode, parent: Option<StyleNodeId>) -> StyleNodeId {
        let id = StyleNodeId(self.slots.len() as u32);
        self.slots.push(TreeSlot {
            node,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Add a top-level node
    pub fn add_root(&mut self, node: StyleNode) -> StyleNodeId {
        let id = self.push(node, None);
        self.roots.push(id);
        id
    }

    /// Add `node` as the last child of `parent`
    pub fn append_child(&mut self, parent: StyleNodeId, node: StyleNode) -> StyleNodeId {
        let id = self.push(node, Some(parent));
        self.slots[parent.index()].children.push(id);
        id
    }

    /// Build a chain of nested nodes, returning the innermost one
    pub fn path(&mut self, nodes: impl IntoIterator<Item = StyleNode>) -> Option<StyleNodeId> {
        let mut last = None;
        for node in nodes {
            last = Some(match last {
                None => self.add_root(node),
                Some(parent) => self.append_child(parent, node),
            });
        }
        last
    }

    pub fn node(&self, id: StyleNodeId) -> &StyleNode {
        &self.slots[id.index()].node
    }

    pub fn node_mut(&mut self, id: StyleNodeId) -> &mut StyleNode {
        &mut self.slots[id.index()].node
    }

    pub fn parent(&self, id: StyleNodeId) -> Option<StyleNodeId> {
        self.slots[id.index()].parent
    }

    pub fn children(&self, id: StyleNodeId) -> &[StyleNodeId] {
        &self.slots[id.index()].children
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The node and its siblings, in order
    fn siblings(&self, id: StyleNodeId) -> &[StyleNodeId] {
        match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    /// Visible siblings before (`forward`) or after the node
    fn visible_siblings(&self, id: StyleNodeId, forward: bool) -> impl Iterator<Item = StyleNodeId> + '_ {
        let siblings = self.siblings(id);
        let at = siblings.iter().position(|s| *s == id).unwrap_or(0);
        let (before, after) = siblings.split_at(at);
        let others: Box<dyn Iterator<Item = &StyleNodeId> + '_> = if forward {
            Box::new(before.iter().rev())
        } else {
            Box::new(after.iter().skip(1))
        };
        others.copied().filter(|s| self.node(*s).visible)
    }

    pub fn previous_sibling(&self, id: StyleNodeId) -> Option<StyleNodeId> {
        self.visible_siblings(id, true).next()
    }

    pub fn matcher(&self, id: StyleNodeId) -> NodeMatcher<'_> {
        NodeMatcher { tree: self, id }
    }
}

/// Matcher over a node of a [`StyleTree`]
#[derive(Clone, Copy)]
pub struct NodeMatcher<'a> {
    tree: &'a StyleTree,
    id: StyleNodeId,
}

impl NodeMatcher<'_> {
    pub fn node(&self) -> &StyleNode {
        self.tree.node(self.id)
    }
}

impl Matcher for NodeMatcher<'_> {
    fn parent(&self) -> Option<Box<dyn Matcher + '_>> {
        let parent = self.tree.parent(self.id)?;
        Some(Box::new(self.tree.matcher(parent)))
    }

    fn previous(&self) -> Option<Box<dyn Matcher + '_>> {
        let previous = self.tree.previous_sibling(self.id)?;
        Some(Box::new(self.tree.matcher(previous)))
    }

    fn state(&self) -> StateFlags {
        self.node().state
    }

    fn has_name(&self, name: &str) -> bool {
        self.node().name == name
    }

    fn has_class(&self, class: &str) -> bool {
        self.node().classes.iter().any(|c| c == class)
    }

    fn has_id(&self, id: &str) -> bool {
        self.node().id.as_deref() == Some(id)
    }

    fn has_position(&self, forward: bool, a: i32, b: i32) -> bool {
        let others = self.tree.visible_siblings(self.id, forward).count();
        let position = i32::try_from(others).map_or(i32::MAX, |n| n.saturating_add(1));
        position_matches(position, a, b)
    }
}
