//! Change Masks
//!
//! Bits describing which attribute changes of a node (or of its relatives)
//! can change the rulesets matching it. Selectors report the bits they
//! depend on; a combinator shifts the bits of the selectors to its left
//! into the sibling or parent range.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of attribute changes a style depends on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Change: u64 {
        const CLASS = 1 << 0;
        const NAME = 1 << 1;
        const ID = 1 << 2;
        const FIRST_CHILD = 1 << 3;
        const LAST_CHILD = 1 << 4;
        const NTH_CHILD = 1 << 5;
        const NTH_LAST_CHILD = 1 << 6;
        const STATE = 1 << 7;

        const SIBLING_CLASS = 1 << 8;
        const SIBLING_NAME = 1 << 9;
        const SIBLING_ID = 1 << 10;
        const SIBLING_FIRST_CHILD = 1 << 11;
        const SIBLING_LAST_CHILD = 1 << 12;
        const SIBLING_NTH_CHILD = 1 << 13;
        const SIBLING_NTH_LAST_CHILD = 1 << 14;
        const SIBLING_STATE = 1 << 15;

        const PARENT_CLASS = 1 << 16;
        const PARENT_NAME = 1 << 17;
        const PARENT_ID = 1 << 18;
        const PARENT_FIRST_CHILD = 1 << 19;
        const PARENT_LAST_CHILD = 1 << 20;
        const PARENT_NTH_CHILD = 1 << 21;
        const PARENT_NTH_LAST_CHILD = 1 << 22;
        const PARENT_STATE = 1 << 23;

        const PARENT_SIBLING_CLASS = 1 << 24;
        const PARENT_SIBLING_NAME = 1 << 25;
        const PARENT_SIBLING_ID = 1 << 26;
        const PARENT_SIBLING_FIRST_CHILD = 1 << 27;
        const PARENT_SIBLING_LAST_CHILD = 1 << 28;
        const PARENT_SIBLING_NTH_CHILD = 1 << 29;
        const PARENT_SIBLING_NTH_LAST_CHILD = 1 << 30;
        const PARENT_SIBLING_STATE = 1 << 31;

        /// The stylesheet itself changed
        const SOURCE = 1 << 32;
        const PARENT_STYLE = 1 << 33;
        const TIMESTAMP = 1 << 34;
        const ANIMATIONS = 1 << 35;

        /// Internal marker meaning "a ruleset matched"; never escapes a
        /// change computation
        const GOT_MATCH = 1 << 62;

        const POSITION = Self::FIRST_CHILD.bits()
            | Self::LAST_CHILD.bits()
            | Self::NTH_CHILD.bits()
            | Self::NTH_LAST_CHILD.bits();
        const SIBLING_POSITION = Self::POSITION.bits() << 8;
        const PARENT_POSITION = Self::POSITION.bits() << 16;
    }
}

impl Change {
    /// The bits describing the node's own attributes
    const BASE: u64 = 0xFF;
    const BASE_AND_SIBLING: u64 = 0xFFFF;
    /// Bits that pass unchanged through combinators
    const KEEP: Change = Change::SOURCE
        .union(Change::PARENT_STYLE)
        .union(Change::TIMESTAMP)
        .union(Change::ANIMATIONS)
        .union(Change::GOT_MATCH);

    /// Bits a selector depends on when it is reached through a sibling
    /// combinator
    pub fn for_sibling(self) -> Change {
        let shifted = (self.bits() & Self::BASE) << 8;
        (self & Self::KEEP) | Change::from_bits_retain(shifted)
    }

    /// Bits a selector depends on when it is reached through a child or
    /// descendant combinator
    pub fn for_child(self) -> Change {
        let shifted = (self.bits() & Self::BASE_AND_SIBLING) << 16;
        (self & Self::KEEP) | Change::from_bits_retain(shifted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_sibling_shifts_base_bits() {
        let change = Change::CLASS | Change::STATE | Change::TIMESTAMP;
        assert_eq!(
            change.for_sibling(),
            Change::SIBLING_CLASS | Change::SIBLING_STATE | Change::TIMESTAMP
        );
    }

    #[test]
    fn test_for_child_shifts_sibling_bits_too() {
        let change = Change::NAME | Change::SIBLING_CLASS | Change::GOT_MATCH;
        assert_eq!(
            change.for_child(),
            Change::PARENT_NAME | Change::PARENT_SIBLING_CLASS | Change::GOT_MATCH
        );
    }

    #[test]
    fn test_parent_bits_fall_off() {
        assert_eq!(Change::PARENT_CLASS.for_child(), Change::empty());
        assert_eq!(Change::PARENT_CLASS.for_sibling(), Change::empty());
    }
}
