//! Selector Tree
//!
//! All selectors of a stylesheet compiled into one trie. Each node holds a
//! single selector part; a node's `previous` chain continues the selectors
//! that share every part up to and including it, and its `sibling` chain
//! lists the alternatives at the same depth. Matching a node against a
//! matcher rules out every selector below it at once.
//!
//! Nodes live in a single arena and refer to each other by [`NodeId`].

use std::collections::HashMap;
use std::fmt;

use crate::change::Change;
use crate::matcher::Matcher;
use crate::selector::{Selector, SelectorPart};

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Marker for a missing link
    pub const NONE: NodeId = NodeId(i32::MAX as u32);

    fn get(self) -> Option<usize> {
        (self != Self::NONE).then_some(self.0 as usize)
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    selector: SelectorPart,
    parent: NodeId,
    previous: NodeId,
    sibling: NodeId,
    /// Range into `SelectorTree::matches`
    matches_start: u32,
    matches_len: u32,
}

/// Compiled selectors, answering which of them match a node
#[derive(Debug, Clone, Default)]
pub struct SelectorTree {
    nodes: Vec<TreeNode>,
    /// Indices of fully matched selectors, grouped by node
    matches: Vec<usize>,
}

/// A selector being sorted into the tree, with the parts still to place
struct BuildInfo {
    index: usize,
    parts: Vec<SelectorPart>,
    start: usize,
}

impl BuildInfo {
    fn tail(&self) -> &[SelectorPart] {
        &self.parts[self.start..]
    }
}

/// The parts a tail may be split on: the combinator heading it, or every
/// simple selector of its leading compound
fn initial_parts(tail: &[SelectorPart]) -> &[SelectorPart] {
    match tail.first() {
        None => tail,
        Some(first) if !first.is_simple() => &tail[..1],
        Some(_) => {
            let end = tail.iter().position(|part| !part.is_simple()).unwrap_or(tail.len());
            &tail[..end]
        }
    }
}

/// The part shared by the most tails, the smallest one on ties
fn most_common_initial(infos: &[BuildInfo]) -> Option<SelectorPart> {
    let mut counts: HashMap<&SelectorPart, usize> = HashMap::new();
    for info in infos {
        for part in initial_parts(info.tail()) {
            *counts.entry(part).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.compare_one(a)))
        .map(|(part, _)| part.clone())
}

impl SelectorTree {
    /// Compile `selectors`; the index paired with each selector is what
    /// [`SelectorTree::match_all`] reports for it
    pub fn build<'a>(selectors: impl IntoIterator<Item = (usize, &'a Selector)>) -> SelectorTree {
        let infos: Vec<BuildInfo> = selectors
            .into_iter()
            .filter(|(_, selector)| !selector.parts().is_empty())
            .map(|(index, selector)| BuildInfo {
                index,
                parts: selector.parts().to_vec(),
                start: 0,
            })
            .collect();

        let mut tree = SelectorTree::default();
        tree.subdivide(infos, NodeId::NONE);
        tracing::debug!(nodes = tree.nodes.len(), matches = tree.matches.len(), "built selector tree");
        tree
    }

    fn subdivide(&mut self, mut infos: Vec<BuildInfo>, parent: NodeId) -> NodeId {
        let mut first = NodeId::NONE;
        let mut last: Option<usize> = None;

        while let Some(chosen) = most_common_initial(&infos) {
            let index = self.nodes.len();
            let id = NodeId(index as u32);
            self.nodes.push(TreeNode {
                selector: chosen.clone(),
                parent,
                previous: NodeId::NONE,
                sibling: NodeId::NONE,
                matches_start: 0,
                matches_len: 0,
            });

            let mut exact = Vec::new();
            let mut matched = Vec::new();
            let mut remaining = Vec::new();

            for mut info in infos {
                match initial_parts(info.tail()).iter().position(|part| *part == chosen) {
                    Some(offset) => {
                        // move the chosen part to the front so it can be
                        // consumed without losing the others
                        info.parts.swap(info.start, info.start + offset);
                        info.start += 1;
                        if info.start == info.parts.len() {
                            exact.push(info.index);
                        } else {
                            matched.push(info);
                        }
                    }
                    None => remaining.push(info),
                }
            }

            self.nodes[index].matches_start = self.matches.len() as u32;
            self.nodes[index].matches_len = exact.len() as u32;
            self.matches.extend(exact);

            let previous = self.subdivide(matched, id);
            self.nodes[index].previous = previous;

            match last {
                Some(last) => self.nodes[last].sibling = id,
                None => first = id,
            }
            last = Some(index);
            infos = remaining;
        }

        first
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn root(&self) -> NodeId {
        if self.nodes.is_empty() { NodeId::NONE } else { NodeId(0) }
    }

    fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    /// `first` and the nodes of its sibling chain
    fn chain(&self, first: NodeId) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(first.get(), |index| self.nodes[*index].sibling.get())
    }

    fn node_matches(&self, index: usize) -> &[usize] {
        let node = self.node(index);
        let start = node.matches_start as usize;
        &self.matches[start..start + node.matches_len as usize]
    }

    pub fn parent(&self, id: NodeId) -> NodeId {
        id.get().map_or(NodeId::NONE, |index| self.node(index).parent)
    }

    /// Indices of every selector matching `matcher`, sorted and
    /// deduplicated
    pub fn match_all(&self, matcher: &dyn Matcher) -> Vec<usize> {
        let mut results = Vec::new();

        for index in self.chain(self.root()) {
            self.node(index)
                .selector
                .for_each_matcher(matcher, &mut |m| self.match_node(index, m, &mut results));
        }

        results.sort_unstable();
        results.dedup();
        results
    }

    fn match_node(&self, index: usize, matcher: &dyn Matcher, results: &mut Vec<usize>) -> bool {
        let node = self.node(index);
        if !node.selector.match_one(matcher) {
            return false;
        }

        results.extend_from_slice(self.node_matches(index));

        for previous in self.chain(node.previous) {
            self.node(previous)
                .selector
                .for_each_matcher(matcher, &mut |m| self.match_node(previous, m, results));
        }

        false
    }

    /// Attribute changes of the node behind `matcher` (or of its
    /// relatives) that could change the set of matching selectors
    pub fn change_all(&self, matcher: &dyn Matcher) -> Change {
        let mut change = Change::empty();
        for index in self.chain(self.root()) {
            change |= self.node_change(index, matcher);
        }
        change - Change::GOT_MATCH
    }

    fn node_change(&self, index: usize, matcher: &dyn Matcher) -> Change {
        let node = self.node(index);
        if !node.selector.match_one(matcher) {
            return Change::empty();
        }

        if !node.selector.is_simple() {
            return self.collect_change(index) | Change::GOT_MATCH;
        }

        let mut change = Change::empty();
        for previous in self.chain(node.previous) {
            change |= self.node_change(previous, matcher);
        }

        if !change.is_empty() || !self.node_matches(index).is_empty() {
            change = node.selector.change(change - Change::GOT_MATCH) | Change::GOT_MATCH;
        }
        change
    }

    /// Change bits of every selector continuing below `index`
    fn collect_change(&self, index: usize) -> Change {
        let node = self.node(index);
        let mut change = Change::empty();
        for previous in self.chain(node.previous) {
            change |= self.collect_change(previous);
        }
        node.selector.change(change)
    }

    /// Render the tree with box-drawing connectors, one leaf per line
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_chain(self.root(), &mut out, "");
        out
    }

    fn print_chain(&self, first: NodeId, out: &mut String, prefix: &str) {
        for (i, index) in self.chain(first).enumerate() {
            let node = self.node(index);
            let has_sibling = node.sibling != NodeId::NONE;

            if i > 0 {
                out.push_str(prefix);
            }
            out.push_str(match (i == 0, has_sibling) {
                (true, true) => "─┬─",
                (true, false) => "───",
                (false, true) => " ├─",
                (false, false) => " └─",
            });

            let text = node.selector.to_string();
            out.push_str(&text);

            if node.previous == NodeId::NONE {
                out.push('\n');
                continue;
            }

            let mut nested = String::from(prefix);
            nested.push_str(if has_sibling { " │ " } else { "   " });
            nested.extend(std::iter::repeat_n(' ', text.chars().count()));
            self.print_chain(node.previous, out, &nested);
        }
    }
}

impl fmt::Display for SelectorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.print())
    }
}
