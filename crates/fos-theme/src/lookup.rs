//! Lookup Accumulator
//!
//! Collects the specified value of each property while the provider walks
//! the matching rulesets from highest to lowest precedence. The first
//! value recorded for a property wins.

use crate::properties::{N_PROPERTIES, PropertyId, PropertySet};
use crate::section::CssSection;
use crate::values::CssValue;

/// A specified value and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LookupValue {
    pub value: CssValue,
    pub section: Option<CssSection>,
}

#[derive(Debug, Clone)]
pub struct CssLookup {
    values: Vec<Option<LookupValue>>,
    missing: PropertySet,
}

impl Default for CssLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl CssLookup {
    /// An accumulator with every property missing
    pub fn new() -> Self {
        Self {
            values: vec![None; N_PROPERTIES],
            missing: PropertySet::all(),
        }
    }

    /// Properties without a value yet
    pub fn missing(&self) -> PropertySet {
        self.missing
    }

    pub fn is_missing(&self, id: PropertyId) -> bool {
        self.missing.contains(id)
    }

    /// Record the value of `id`; later calls for the same id are ignored
    pub fn set(&mut self, id: PropertyId, section: Option<CssSection>, value: CssValue) {
        if !self.is_missing(id) {
            return;
        }
        self.missing.remove(id);
        self.values[id.index()] = Some(LookupValue { value, section });
    }

    pub fn get(&self, id: PropertyId) -> Option<&LookupValue> {
        self.values[id.index()].as_ref()
    }

    /// Move the recorded value of `id` out of the accumulator
    pub fn take(&mut self, id: PropertyId) -> Option<LookupValue> {
        self.values[id.index()].take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_wins() {
        let mut lookup = CssLookup::new();
        assert!(lookup.is_missing(PropertyId::Opacity));

        lookup.set(PropertyId::Opacity, None, CssValue::number(0.5));
        lookup.set(PropertyId::Opacity, None, CssValue::number(1.0));

        assert!(!lookup.is_missing(PropertyId::Opacity));
        assert_eq!(lookup.get(PropertyId::Opacity).map(|v| &v.value), Some(&CssValue::number(0.5)));
        assert_eq!(lookup.missing().len(), N_PROPERTIES - 1);
    }

    #[test]
    fn test_take() {
        let mut lookup = CssLookup::new();
        lookup.set(PropertyId::Color, None, CssValue::ident("red"));
        assert!(lookup.take(PropertyId::Color).is_some());
        assert!(lookup.take(PropertyId::Color).is_none());
        assert!(lookup.get(PropertyId::MarginTop).is_none());
    }
}
