//! Styles
//!
//! The read side of the cascade: a style answers the value of every
//! longhand property by id.

use std::fmt::Write as _;

use crate::properties::PropertyId;
use crate::section::CssSection;
use crate::values::CssValue;

/// A resolved style
pub trait Style {
    /// Computed value of `id`
    fn value(&self, id: PropertyId) -> &CssValue;

    /// Where the value was declared, if sections are kept
    fn section(&self, id: PropertyId) -> Option<&CssSection>;

    /// False while animations can still change values
    fn is_static(&self) -> bool {
        true
    }
}

/// Render a style as CSS declarations, one per line.
///
/// With `skip_initial`, properties still at their initial value are left
/// out.
pub fn print_style(style: &dyn Style, skip_initial: bool) -> String {
    let mut out = String::new();
    for id in PropertyId::ALL {
        let value = style.value(id);
        if skip_initial && style.section(id).is_none() && value == id.initial_value() {
            continue;
        }
        let _ = write!(out, "{}: {};", id.name(), value);
        if let Some(section) = style.section(id) {
            let _ = write!(out, " /* {section} */");
        }
        out.push('\n');
    }
    out
}
