//! Static Styles
//!
//! The cascade: specified values from the provider, or the inherit and
//! initial defaults, computed in property id order against the parent
//! style.

use crate::change::Change;
use crate::lookup::CssLookup;
use crate::matcher::Matcher;
use crate::properties::{N_PROPERTIES, PropertyId};
use crate::provider::StyleProvider;
use crate::section::CssSection;
use crate::style::Style;
use crate::values::{ComputeContext, CssValue};

/// Computed values of every longhand property
#[derive(Debug, Clone, PartialEq)]
pub struct StaticStyle {
    values: Vec<CssValue>,
    sections: Vec<Option<CssSection>>,
    change: Change,
}

impl StaticStyle {
    /// Resolve the style of the node behind `matcher`.
    ///
    /// Without a matcher no declarations apply and every property takes
    /// its inherited or initial value.
    pub fn compute(provider: &StyleProvider, matcher: Option<&dyn Matcher>, parent: Option<&dyn Style>) -> Self {
        let mut lookup = CssLookup::new();
        let mut change = Change::empty();

        if let Some(matcher) = matcher {
            provider.lookup(matcher, &mut lookup, Some(&mut change));
        }

        let mut values = Vec::with_capacity(N_PROPERTIES);
        let mut sections = Vec::with_capacity(N_PROPERTIES);

        for id in PropertyId::ALL {
            let (specified, section) = match lookup.take(id) {
                Some(found) => (found.value, found.section),
                None if id.is_inherit() => (CssValue::Inherit, None),
                None => (CssValue::Initial, None),
            };

            let ctx = ComputeContext::new(provider, &values, parent);
            let computed = specified.compute(id, &ctx);
            values.push(computed);
            sections.push(section);
        }

        tracing::trace!(change = ?change, "computed static style");

        Self {
            values,
            sections,
            change,
        }
    }

    /// Every property at its initial value
    pub fn default_style(provider: &StyleProvider) -> Self {
        let mut values = Vec::with_capacity(N_PROPERTIES);
        for id in PropertyId::ALL {
            let ctx = ComputeContext::new(provider, &values, None);
            let computed = id.initial_value().compute(id, &ctx);
            values.push(computed);
        }

        Self {
            values,
            sections: vec![None; N_PROPERTIES],
            change: Change::empty(),
        }
    }

    /// Node attributes whose change can alter the style
    pub fn change(&self) -> Change {
        self.change
    }

    /// Computed values in property id order
    pub fn values(&self) -> &[CssValue] {
        &self.values
    }
}

impl Style for StaticStyle {
    fn value(&self, id: PropertyId) -> &CssValue {
        &self.values[id.index()]
    }

    fn section(&self, id: PropertyId) -> Option<&CssSection> {
        self.sections[id.index()].as_ref()
    }
}
