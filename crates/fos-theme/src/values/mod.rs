//! CSS Values
//!
//! Immutable, cheaply clonable values. Composite values share their parts
//! through `Arc`, so cloning a computed style never deep-copies.

mod color;
mod keyframes;
mod number;

pub use color::{ColorTable, ColorValue, Rgba};
pub use keyframes::{KeyframeSample, Keyframes, PropertyTrack};
pub use number::{DEFAULT_FONT_SIZE_PX, Dimension, NumberFlags, Unit};

use std::fmt;
use std::sync::Arc;

use crate::easing::Easing;
use crate::properties::PropertyId;
use crate::style::Style;

/// A specified or computed property value
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    Initial,
    Inherit,
    Unset,
    Number(Dimension),
    Color(ColorValue),
    Ident(Arc<str>),
    String(Arc<str>),
    Array(Arc<[CssValue]>),
    Easing(Easing),
    Keyframes(Arc<Keyframes>),
}

/// What a value is computed against
#[derive(Clone, Copy)]
pub struct ComputeContext<'a> {
    /// Symbolic color table, normally the provider
    pub colors: &'a dyn ColorTable,
    /// Values of the style being computed, in property id order. Only the
    /// properties before the one being computed are present.
    pub style: &'a [CssValue],
    pub parent: Option<&'a dyn Style>,
}

impl<'a> ComputeContext<'a> {
    pub fn new(colors: &'a dyn ColorTable, style: &'a [CssValue], parent: Option<&'a dyn Style>) -> Self {
        Self { colors, style, parent }
    }

    fn parent_value(&self, property: PropertyId) -> Option<&'a CssValue> {
        self.parent.map(|parent| parent.value(property))
    }

    /// Font size `em` lengths of `property` refer to
    fn font_size(&self, property: PropertyId) -> f64 {
        let value = if property == PropertyId::FontSize {
            self.parent_value(PropertyId::FontSize)
        } else {
            self.style.get(PropertyId::FontSize.index())
        };
        value
            .and_then(CssValue::as_px)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// Color `currentColor` stands for when computing `property`
    fn current_color(&self, property: PropertyId) -> Rgba {
        let value = if property == PropertyId::Color {
            self.parent_value(PropertyId::Color)
        } else {
            self.style.get(PropertyId::Color.index())
        };
        value.and_then(CssValue::as_rgba).unwrap_or(Rgba::WHITE)
    }
}

impl CssValue {
    pub fn px(value: f64) -> Self {
        Self::Number(Dimension::new(value, Unit::Px))
    }

    pub fn number(value: f64) -> Self {
        Self::Number(Dimension::new(value, Unit::Number))
    }

    pub fn seconds(value: f64) -> Self {
        Self::Number(Dimension::new(value, Unit::S))
    }

    pub fn ident(name: &str) -> Self {
        Self::Ident(Arc::from(name))
    }

    pub fn rgba(color: Rgba) -> Self {
        Self::Color(ColorValue::Literal(color))
    }

    pub fn array(values: Vec<CssValue>) -> Self {
        Self::Array(Arc::from(values))
    }

    pub fn as_dimension(&self) -> Option<Dimension> {
        match self {
            Self::Number(dimension) => Some(*dimension),
            _ => None,
        }
    }

    /// Plain numeric value, whatever the unit
    pub fn as_number(&self) -> Option<f64> {
        self.as_dimension().map(|d| d.value)
    }

    pub fn as_px(&self) -> Option<f64> {
        match self {
            Self::Number(Dimension { value, unit: Unit::Px }) => Some(*value),
            _ => None,
        }
    }

    pub fn as_rgba(&self) -> Option<Rgba> {
        match self {
            Self::Color(color) => color.literal(),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name.as_ref()),
            _ => None,
        }
    }

    pub fn as_easing(&self) -> Option<Easing> {
        match self {
            Self::Easing(easing) => Some(*easing),
            _ => None,
        }
    }

    /// Elements of an array; any other value is a list of itself
    pub fn as_slice(&self) -> &[CssValue] {
        match self {
            Self::Array(values) => values,
            other => std::slice::from_ref(other),
        }
    }

    /// Element `i` of a list value, repeating the list when it is shorter
    pub fn nth(&self, i: usize) -> &CssValue {
        let values = self.as_slice();
        if values.is_empty() {
            return self;
        }
        &values[i % values.len()]
    }

    /// Resolve context dependent parts of the value for `property`
    pub fn compute(&self, property: PropertyId, ctx: &ComputeContext<'_>) -> CssValue {
        match self {
            Self::Initial => property.initial_value().compute(property, ctx),
            Self::Inherit => match ctx.parent_value(property) {
                Some(value) => value.clone(),
                None => property.initial_value().compute(property, ctx),
            },
            Self::Unset => {
                if property.is_inherit() {
                    Self::Inherit.compute(property, ctx)
                } else {
                    Self::Initial.compute(property, ctx)
                }
            }
            Self::Number(dimension) => {
                if property == PropertyId::FontSize && dimension.unit == Unit::Percent {
                    return Self::px(ctx.font_size(property) * dimension.value / 100.0);
                }
                Self::Number(dimension.compute(ctx.font_size(property)))
            }
            Self::Color(color) => match color.resolve(ctx.colors, ctx.current_color(property)) {
                Some(rgba) => Self::rgba(rgba),
                None => {
                    tracing::trace!(property = property.name(), color = %color, "unresolvable color, using initial value");
                    property.initial_value().compute(property, ctx)
                }
            },
            Self::Ident(name) if property == PropertyId::FontWeight => {
                let parent = ctx
                    .parent_value(PropertyId::FontWeight)
                    .and_then(CssValue::as_number)
                    .unwrap_or(400.0);
                match &**name {
                    "bolder" => Self::number(bolder(parent)),
                    "lighter" => Self::number(lighter(parent)),
                    _ => self.clone(),
                }
            }
            Self::Array(values) => Self::Array(values.iter().map(|v| v.compute(property, ctx)).collect()),
            Self::Keyframes(keyframes) => Self::Keyframes(Arc::new(keyframes.compute(ctx))),
            Self::Ident(_) | Self::String(_) | Self::Easing(_) => self.clone(),
        }
    }

    /// Interpolate between two computed values.
    ///
    /// Returns `None` when the values cannot be interpolated.
    pub fn transition(&self, end: &CssValue, progress: f64) -> Option<CssValue> {
        if std::mem::discriminant(self) != std::mem::discriminant(end) {
            return None;
        }
        if progress == 0.0 {
            return Some(self.clone());
        }
        if progress == 1.0 {
            return Some(end.clone());
        }
        if self == end {
            return Some(self.clone());
        }

        match (self, end) {
            (Self::Number(start), Self::Number(end)) => start.lerp(*end, progress).map(Self::Number),
            (Self::Color(start), Self::Color(end)) => {
                let (start, end) = (start.literal()?, end.literal()?);
                Some(Self::rgba(start.lerp(end, progress)))
            }
            (Self::Array(start), Self::Array(end)) if start.len() == end.len() => start
                .iter()
                .zip(end.iter())
                .map(|(s, e)| s.transition(e, progress))
                .collect::<Option<Vec<_>>>()
                .map(Self::array),
            _ => None,
        }
    }
}

fn bolder(weight: f64) -> f64 {
    if weight < 400.0 {
        400.0
    } else if weight < 600.0 {
        700.0
    } else {
        900.0
    }
}

fn lighter(weight: f64) -> f64 {
    if weight < 600.0 {
        100.0
    } else if weight < 800.0 {
        400.0
    } else {
        700.0
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\A ")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => f.write_str("initial"),
            Self::Inherit => f.write_str("inherit"),
            Self::Unset => f.write_str("unset"),
            Self::Number(dimension) => write!(f, "{dimension}"),
            Self::Color(color) => write!(f, "{color}"),
            Self::Ident(name) => f.write_str(name),
            Self::String(s) => write_string(f, s),
            Self::Array(values) if values.is_empty() => f.write_str("none"),
            Self::Array(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Self::Easing(easing) => write!(f, "{easing}"),
            Self::Keyframes(keyframes) => write!(f, "{keyframes}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoColors;

    impl ColorTable for NoColors {
        fn named_color(&self, _name: &str) -> Option<&ColorValue> {
            None
        }
    }

    #[test]
    fn test_transition_numbers() {
        let start = CssValue::px(0.0);
        let end = CssValue::px(10.0);
        assert_eq!(start.transition(&end, 0.5), Some(CssValue::px(5.0)));
        assert_eq!(start.transition(&CssValue::number(1.0), 0.5), None);
    }

    #[test]
    fn test_transition_endpoints_and_incompatible() {
        let a = CssValue::ident("solid");
        let b = CssValue::ident("dashed");
        assert_eq!(a.transition(&b, 0.0), Some(a.clone()));
        assert_eq!(a.transition(&b, 1.0), Some(b.clone()));
        assert_eq!(a.transition(&b, 0.5), None);
        assert_eq!(a.transition(&CssValue::px(1.0), 0.0), None);
    }

    #[test]
    fn test_transition_colors_and_arrays() {
        let black = CssValue::rgba(Rgba::BLACK);
        let white = CssValue::rgba(Rgba::WHITE);
        assert_eq!(
            black.transition(&white, 0.5),
            Some(CssValue::rgba(Rgba::new(0.5, 0.5, 0.5, 1.0)))
        );

        let start = CssValue::array(vec![CssValue::px(0.0), CssValue::px(2.0)]);
        let end = CssValue::array(vec![CssValue::px(4.0), CssValue::px(4.0)]);
        assert_eq!(
            start.transition(&end, 0.5),
            Some(CssValue::array(vec![CssValue::px(2.0), CssValue::px(3.0)]))
        );
        let short = CssValue::array(vec![CssValue::px(1.0)]);
        assert_eq!(start.transition(&short, 0.5), None);
    }

    #[test]
    fn test_compute_without_parent() {
        let style = vec![CssValue::rgba(Rgba::BLACK), CssValue::px(10.0)];
        let ctx = ComputeContext::new(&NoColors, &style, None);

        assert_eq!(
            CssValue::Number(Dimension::new(2.0, Unit::Em)).compute(PropertyId::MarginTop, &ctx),
            CssValue::px(20.0)
        );
        assert_eq!(
            CssValue::Number(Dimension::new(150.0, Unit::Percent)).compute(PropertyId::FontSize, &ctx),
            CssValue::px(24.0)
        );
        assert_eq!(
            CssValue::Color(ColorValue::CurrentColor).compute(PropertyId::BorderTopColor, &ctx),
            CssValue::rgba(Rgba::BLACK)
        );
        assert_eq!(
            CssValue::Color(ColorValue::Name(Arc::from("missing"))).compute(PropertyId::BackgroundColor, &ctx),
            CssValue::rgba(Rgba::TRANSPARENT)
        );
        assert_eq!(CssValue::Inherit.compute(PropertyId::MarginTop, &ctx), CssValue::px(0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(CssValue::array(vec![]).to_string(), "none");
        assert_eq!(
            CssValue::array(vec![CssValue::ident("a"), CssValue::ident("b")]).to_string(),
            "a, b"
        );
        assert_eq!(CssValue::String(Arc::from("say \"hi\"\n")).to_string(), "\"say \\\"hi\\\"\\A \"");
        assert_eq!(CssValue::Unset.to_string(), "unset");
    }

    #[test]
    fn test_nth_cycles() {
        let list = CssValue::array(vec![CssValue::seconds(1.0), CssValue::seconds(2.0)]);
        assert_eq!(list.nth(3), &CssValue::seconds(2.0));
        let single = CssValue::seconds(5.0);
        assert_eq!(single.nth(7), &CssValue::seconds(5.0));
    }
}
