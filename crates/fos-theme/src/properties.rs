//! Style Property Registry
//!
//! Every longhand property the engine resolves, identified by a stable id,
//! plus the shorthands that expand into them at parse time.

use std::sync::{Arc, OnceLock};

use crate::easing::Easing;
use crate::error::CssErrorKind;
use crate::parser::CssParser;
use crate::values::{ColorValue, CssValue, Dimension, NumberFlags, Rgba, Unit};

/// Longhand property identifier; also the index into a computed style
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[repr(u8)]
pub enum PropertyId {
    Color,
    FontSize,
    BackgroundColor,
    FontFamily,
    FontStyle,
    FontWeight,
    LetterSpacing,
    TextDecorationLine,
    TextDecorationColor,

    MarginTop,
    MarginLeft,
    MarginBottom,
    MarginRight,
    PaddingTop,
    PaddingLeft,
    PaddingBottom,
    PaddingRight,

    BorderTopStyle,
    BorderLeftStyle,
    BorderBottomStyle,
    BorderRightStyle,
    BorderTopWidth,
    BorderLeftWidth,
    BorderBottomWidth,
    BorderRightWidth,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,
    OutlineStyle,
    OutlineWidth,
    OutlineOffset,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    OutlineColor,

    MinWidth,
    MinHeight,

    TransitionProperty,
    TransitionDuration,
    TransitionTimingFunction,
    TransitionDelay,
    AnimationName,
    AnimationDuration,
    AnimationTimingFunction,
    AnimationIterationCount,
    AnimationDirection,
    AnimationPlayState,
    AnimationDelay,
    AnimationFillMode,

    Opacity,
    CaretColor,
    KeyBindings,
}

/// Number of longhand properties
pub const N_PROPERTIES: usize = PropertyId::KeyBindings as usize + 1;

const BORDER_STYLES: &[&str] = &[
    "none", "solid", "inset", "outset", "hidden", "dotted", "dashed", "double", "groove", "ridge",
];
const FONT_STYLES: &[&str] = &["normal", "oblique", "italic"];
const TEXT_DECORATION_LINES: &[&str] = &["none", "underline", "line-through"];
const DIRECTIONS: &[&str] = &["normal", "reverse", "alternate", "alternate-reverse"];
const PLAY_STATES: &[&str] = &["running", "paused"];
const FILL_MODES: &[&str] = &["none", "forwards", "backwards", "both"];

/// How a property's value is parsed
#[derive(Debug, Clone, Copy)]
enum ValueKind {
    Color,
    Number(NumberFlags),
    Keyword(&'static [&'static str]),
    FontFamily,
    FontWeight,
    /// Comma separated list of any identifiers
    IdentList,
    KeywordList(&'static [&'static str]),
    TimeList(NumberFlags),
    EasingList,
    IterationCountList,
    /// Binding set names, or `none`
    BindingNames,
}

const LENGTH: NumberFlags = NumberFlags::LENGTH.union(NumberFlags::NUMBER_AS_PIXELS);
const POSITIVE_LENGTH: NumberFlags = LENGTH.union(NumberFlags::POSITIVE);

impl PropertyId {
    pub const ALL: [PropertyId; N_PROPERTIES] = {
        use PropertyId::*;
        [
            Color, FontSize, BackgroundColor, FontFamily, FontStyle, FontWeight, LetterSpacing,
            TextDecorationLine, TextDecorationColor, MarginTop, MarginLeft, MarginBottom, MarginRight,
            PaddingTop, PaddingLeft, PaddingBottom, PaddingRight, BorderTopStyle, BorderLeftStyle,
            BorderBottomStyle, BorderRightStyle, BorderTopWidth, BorderLeftWidth, BorderBottomWidth,
            BorderRightWidth, BorderTopLeftRadius, BorderTopRightRadius, BorderBottomRightRadius,
            BorderBottomLeftRadius, OutlineStyle, OutlineWidth, OutlineOffset, BorderTopColor,
            BorderRightColor, BorderBottomColor, BorderLeftColor, OutlineColor, MinWidth, MinHeight,
            TransitionProperty, TransitionDuration, TransitionTimingFunction, TransitionDelay,
            AnimationName, AnimationDuration, AnimationTimingFunction, AnimationIterationCount,
            AnimationDirection, AnimationPlayState, AnimationDelay, AnimationFillMode, Opacity,
            CaretColor, KeyBindings,
        ]
    };

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a property name into a PropertyId
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::FontSize => "font-size",
            Self::BackgroundColor => "background-color",
            Self::FontFamily => "font-family",
            Self::FontStyle => "font-style",
            Self::FontWeight => "font-weight",
            Self::LetterSpacing => "letter-spacing",
            Self::TextDecorationLine => "text-decoration-line",
            Self::TextDecorationColor => "text-decoration-color",
            Self::MarginTop => "margin-top",
            Self::MarginLeft => "margin-left",
            Self::MarginBottom => "margin-bottom",
            Self::MarginRight => "margin-right",
            Self::PaddingTop => "padding-top",
            Self::PaddingLeft => "padding-left",
            Self::PaddingBottom => "padding-bottom",
            Self::PaddingRight => "padding-right",
            Self::BorderTopStyle => "border-top-style",
            Self::BorderLeftStyle => "border-left-style",
            Self::BorderBottomStyle => "border-bottom-style",
            Self::BorderRightStyle => "border-right-style",
            Self::BorderTopWidth => "border-top-width",
            Self::BorderLeftWidth => "border-left-width",
            Self::BorderBottomWidth => "border-bottom-width",
            Self::BorderRightWidth => "border-right-width",
            Self::BorderTopLeftRadius => "border-top-left-radius",
            Self::BorderTopRightRadius => "border-top-right-radius",
            Self::BorderBottomRightRadius => "border-bottom-right-radius",
            Self::BorderBottomLeftRadius => "border-bottom-left-radius",
            Self::OutlineStyle => "outline-style",
            Self::OutlineWidth => "outline-width",
            Self::OutlineOffset => "outline-offset",
            Self::BorderTopColor => "border-top-color",
            Self::BorderRightColor => "border-right-color",
            Self::BorderBottomColor => "border-bottom-color",
            Self::BorderLeftColor => "border-left-color",
            Self::OutlineColor => "outline-color",
            Self::MinWidth => "min-width",
            Self::MinHeight => "min-height",
            Self::TransitionProperty => "transition-property",
            Self::TransitionDuration => "transition-duration",
            Self::TransitionTimingFunction => "transition-timing-function",
            Self::TransitionDelay => "transition-delay",
            Self::AnimationName => "animation-name",
            Self::AnimationDuration => "animation-duration",
            Self::AnimationTimingFunction => "animation-timing-function",
            Self::AnimationIterationCount => "animation-iteration-count",
            Self::AnimationDirection => "animation-direction",
            Self::AnimationPlayState => "animation-play-state",
            Self::AnimationDelay => "animation-delay",
            Self::AnimationFillMode => "animation-fill-mode",
            Self::Opacity => "opacity",
            Self::CaretColor => "caret-color",
            Self::KeyBindings => "-fos-key-bindings",
        }
    }

    /// Whether an unspecified value is taken from the parent
    pub fn is_inherit(self) -> bool {
        matches!(
            self,
            Self::Color
                | Self::FontSize
                | Self::FontFamily
                | Self::FontStyle
                | Self::FontWeight
                | Self::LetterSpacing
                | Self::CaretColor
        )
    }

    /// Whether transitions and keyframes may drive the property
    pub fn is_animated(self) -> bool {
        !matches!(
            self,
            Self::FontFamily
                | Self::FontStyle
                | Self::TextDecorationLine
                | Self::BorderTopStyle
                | Self::BorderLeftStyle
                | Self::BorderBottomStyle
                | Self::BorderRightStyle
                | Self::OutlineStyle
                | Self::TransitionProperty
                | Self::TransitionDuration
                | Self::TransitionTimingFunction
                | Self::TransitionDelay
                | Self::AnimationName
                | Self::AnimationDuration
                | Self::AnimationTimingFunction
                | Self::AnimationIterationCount
                | Self::AnimationDirection
                | Self::AnimationPlayState
                | Self::AnimationDelay
                | Self::AnimationFillMode
                | Self::KeyBindings
        )
    }

    fn kind(self) -> ValueKind {
        use PropertyId::*;
        match self {
            Color | BackgroundColor | TextDecorationColor | BorderTopColor | BorderRightColor
            | BorderBottomColor | BorderLeftColor | OutlineColor | CaretColor => ValueKind::Color,
            FontSize => ValueKind::Number(POSITIVE_LENGTH.union(NumberFlags::PERCENT)),
            FontFamily => ValueKind::FontFamily,
            FontStyle => ValueKind::Keyword(FONT_STYLES),
            FontWeight => ValueKind::FontWeight,
            LetterSpacing => ValueKind::Number(NumberFlags::LENGTH),
            TextDecorationLine => ValueKind::Keyword(TEXT_DECORATION_LINES),
            MarginTop | MarginLeft | MarginBottom | MarginRight | OutlineOffset => ValueKind::Number(LENGTH),
            PaddingTop | PaddingLeft | PaddingBottom | PaddingRight | BorderTopWidth | BorderLeftWidth
            | BorderBottomWidth | BorderRightWidth | OutlineWidth | MinWidth | MinHeight => {
                ValueKind::Number(POSITIVE_LENGTH)
            }
            BorderTopLeftRadius | BorderTopRightRadius | BorderBottomRightRadius | BorderBottomLeftRadius => {
                ValueKind::Number(POSITIVE_LENGTH.union(NumberFlags::PERCENT))
            }
            BorderTopStyle | BorderLeftStyle | BorderBottomStyle | BorderRightStyle | OutlineStyle => {
                ValueKind::Keyword(BORDER_STYLES)
            }
            TransitionProperty | AnimationName => ValueKind::IdentList,
            TransitionDuration | AnimationDuration => {
                ValueKind::TimeList(NumberFlags::TIME.union(NumberFlags::POSITIVE))
            }
            TransitionDelay | AnimationDelay => ValueKind::TimeList(NumberFlags::TIME),
            TransitionTimingFunction | AnimationTimingFunction => ValueKind::EasingList,
            AnimationIterationCount => ValueKind::IterationCountList,
            AnimationDirection => ValueKind::KeywordList(DIRECTIONS),
            AnimationPlayState => ValueKind::KeywordList(PLAY_STATES),
            AnimationFillMode => ValueKind::KeywordList(FILL_MODES),
            Opacity => ValueKind::Number(NumberFlags::NUMBER),
            KeyBindings => ValueKind::BindingNames,
        }
    }

    fn build_initial_value(self) -> CssValue {
        use PropertyId::*;
        let list = |value: CssValue| CssValue::array(vec![value]);
        match self {
            Color => CssValue::rgba(Rgba::WHITE),
            FontSize => CssValue::px(crate::values::DEFAULT_FONT_SIZE_PX),
            BackgroundColor => CssValue::rgba(Rgba::TRANSPARENT),
            FontFamily => list(CssValue::String(Arc::from("Sans"))),
            FontStyle => CssValue::ident("normal"),
            FontWeight => CssValue::number(400.0),
            TextDecorationLine => CssValue::ident("none"),
            TextDecorationColor | BorderTopColor | BorderRightColor | BorderBottomColor | BorderLeftColor
            | OutlineColor | CaretColor => CssValue::Color(ColorValue::CurrentColor),
            BorderTopStyle | BorderLeftStyle | BorderBottomStyle | BorderRightStyle | OutlineStyle => {
                CssValue::ident("none")
            }
            LetterSpacing | MarginTop | MarginLeft | MarginBottom | MarginRight | PaddingTop | PaddingLeft
            | PaddingBottom | PaddingRight | BorderTopWidth | BorderLeftWidth | BorderBottomWidth
            | BorderRightWidth | BorderTopLeftRadius | BorderTopRightRadius | BorderBottomRightRadius
            | BorderBottomLeftRadius | OutlineWidth | OutlineOffset | MinWidth | MinHeight => CssValue::px(0.0),
            TransitionProperty => list(CssValue::ident("all")),
            TransitionDuration | TransitionDelay | AnimationDuration | AnimationDelay => {
                list(CssValue::seconds(0.0))
            }
            TransitionTimingFunction | AnimationTimingFunction => list(CssValue::Easing(Easing::EASE)),
            AnimationName => list(CssValue::ident("none")),
            AnimationIterationCount => list(CssValue::number(1.0)),
            AnimationDirection => list(CssValue::ident("normal")),
            AnimationPlayState => list(CssValue::ident("running")),
            AnimationFillMode => list(CssValue::ident("none")),
            Opacity => CssValue::number(1.0),
            KeyBindings => CssValue::array(Vec::new()),
        }
    }

    /// The value used when nothing is specified and the property does not
    /// inherit
    pub fn initial_value(self) -> &'static CssValue {
        static INITIAL_VALUES: OnceLock<Vec<CssValue>> = OnceLock::new();
        let values = INITIAL_VALUES.get_or_init(|| Self::ALL.iter().map(|id| id.build_initial_value()).collect());
        &values[self.index()]
    }

    /// Parse a value for this property, including the `initial`, `inherit`
    /// and `unset` keywords
    pub fn parse_value(self, parser: &mut CssParser<'_>) -> Option<CssValue> {
        if let Some(value) = parse_global_keyword(parser) {
            return Some(value);
        }
        parse_kind(self.kind(), parser)
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of longhand properties
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PropertySet(u128);

impl PropertySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self(u128::MAX >> (128 - N_PROPERTIES))
    }

    pub fn insert(&mut self, id: PropertyId) {
        self.0 |= 1 << id.index();
    }

    pub fn remove(&mut self, id: PropertyId) {
        self.0 &= !(1 << id.index());
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: PropertySet) -> PropertySet {
        Self(self.0 | other.0)
    }

    pub fn difference(self, other: PropertySet) -> PropertySet {
        Self(self.0 & !other.0)
    }

    pub fn intersects(&self, other: PropertySet) -> bool {
        self.0 & other.0 != 0
    }

    /// Members in id order
    pub fn iter(&self) -> impl Iterator<Item = PropertyId> + '_ {
        PropertyId::ALL.iter().copied().filter(|id| self.contains(*id))
    }
}

impl FromIterator<PropertyId> for PropertySet {
    fn from_iter<I: IntoIterator<Item = PropertyId>>(iter: I) -> Self {
        let mut set = Self::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Properties that set several longhands at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShorthandId {
    Margin,
    Padding,
    BorderWidth,
    BorderStyle,
    BorderColor,
    BorderRadius,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    Border,
    Outline,
    Transition,
    Animation,
}

impl ShorthandId {
    pub const ALL: [ShorthandId; 14] = [
        Self::Margin,
        Self::Padding,
        Self::BorderWidth,
        Self::BorderStyle,
        Self::BorderColor,
        Self::BorderRadius,
        Self::BorderTop,
        Self::BorderRight,
        Self::BorderBottom,
        Self::BorderLeft,
        Self::Border,
        Self::Outline,
        Self::Transition,
        Self::Animation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::BorderWidth => "border-width",
            Self::BorderStyle => "border-style",
            Self::BorderColor => "border-color",
            Self::BorderRadius => "border-radius",
            Self::BorderTop => "border-top",
            Self::BorderRight => "border-right",
            Self::BorderBottom => "border-bottom",
            Self::BorderLeft => "border-left",
            Self::Border => "border",
            Self::Outline => "outline",
            Self::Transition => "transition",
            Self::Animation => "animation",
        }
    }

    /// Longhands in the order the shorthand's values fill them
    pub fn subproperties(self) -> &'static [PropertyId] {
        use PropertyId::*;
        match self {
            Self::Margin => &[MarginTop, MarginRight, MarginBottom, MarginLeft],
            Self::Padding => &[PaddingTop, PaddingRight, PaddingBottom, PaddingLeft],
            Self::BorderWidth => &[BorderTopWidth, BorderRightWidth, BorderBottomWidth, BorderLeftWidth],
            Self::BorderStyle => &[BorderTopStyle, BorderRightStyle, BorderBottomStyle, BorderLeftStyle],
            Self::BorderColor => &[BorderTopColor, BorderRightColor, BorderBottomColor, BorderLeftColor],
            Self::BorderRadius => &[
                BorderTopLeftRadius,
                BorderTopRightRadius,
                BorderBottomRightRadius,
                BorderBottomLeftRadius,
            ],
            Self::BorderTop => &[BorderTopWidth, BorderTopStyle, BorderTopColor],
            Self::BorderRight => &[BorderRightWidth, BorderRightStyle, BorderRightColor],
            Self::BorderBottom => &[BorderBottomWidth, BorderBottomStyle, BorderBottomColor],
            Self::BorderLeft => &[BorderLeftWidth, BorderLeftStyle, BorderLeftColor],
            Self::Border => &[
                BorderTopWidth,
                BorderRightWidth,
                BorderBottomWidth,
                BorderLeftWidth,
                BorderTopStyle,
                BorderRightStyle,
                BorderBottomStyle,
                BorderLeftStyle,
                BorderTopColor,
                BorderRightColor,
                BorderBottomColor,
                BorderLeftColor,
            ],
            Self::Outline => &[OutlineWidth, OutlineStyle, OutlineColor],
            Self::Transition => &[
                TransitionProperty,
                TransitionDuration,
                TransitionTimingFunction,
                TransitionDelay,
            ],
            Self::Animation => &[
                AnimationName,
                AnimationDuration,
                AnimationTimingFunction,
                AnimationIterationCount,
                AnimationDirection,
                AnimationPlayState,
                AnimationDelay,
                AnimationFillMode,
            ],
        }
    }

    /// One value per subproperty
    fn parse(self, parser: &mut CssParser<'_>) -> Option<Vec<CssValue>> {
        let subproperties = self.subproperties();
        if let Some(value) = parse_global_keyword(parser) {
            return Some(vec![value; subproperties.len()]);
        }

        match self {
            Self::Margin | Self::Padding | Self::BorderWidth | Self::BorderStyle | Self::BorderColor
            | Self::BorderRadius => parse_box(subproperties[0], parser),
            Self::BorderTop | Self::BorderRight | Self::BorderBottom | Self::BorderLeft | Self::Outline => {
                parse_border_side(parser).map(|side| side.to_vec())
            }
            Self::Border => {
                let [width, style, color] = parse_border_side(parser)?;
                let mut values = Vec::with_capacity(12);
                for value in [width, style, color] {
                    values.extend(std::iter::repeat_n(value, 4));
                }
                Some(values)
            }
            Self::Transition => parse_transition(parser),
            Self::Animation => parse_animation(parser),
        }
    }
}

/// A property name as it may appear in a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Longhand(PropertyId),
    Shorthand(ShorthandId),
}

static LONGHANDS: [PropertyId; N_PROPERTIES] = PropertyId::ALL;

/// Deprecated names still accepted, mapped to their current name
const RENAMED: &[(&str, &str)] = &[("fos-key-bindings", "-fos-key-bindings")];

/// Current name of a property registered under a deprecated name
pub fn renamed(name: &str) -> Option<&'static str> {
    RENAMED.iter().find(|(old, _)| *old == name).map(|(_, new)| *new)
}

/// Find a property by name, following renames
pub fn lookup(name: &str) -> Option<StyleProperty> {
    let name = renamed(name).unwrap_or(name);

    if let Some(id) = PropertyId::from_name(name) {
        return Some(StyleProperty::Longhand(id));
    }
    ShorthandId::ALL
        .iter()
        .copied()
        .find(|s| s.name() == name)
        .map(StyleProperty::Shorthand)
}

/// Whether `name` is a host widget style property such as
/// `-FooWidget-spacing`, stored as raw text instead of being parsed
pub fn is_widget_style_property(name: &str) -> bool {
    name.len() > 1 && name.starts_with('-') && !name.starts_with("-fos-")
}

impl StyleProperty {
    pub fn name(self) -> &'static str {
        match self {
            Self::Longhand(id) => id.name(),
            Self::Shorthand(shorthand) => shorthand.name(),
        }
    }

    /// Longhands the property sets
    pub fn longhands(self) -> &'static [PropertyId] {
        match self {
            Self::Longhand(id) => std::slice::from_ref(&LONGHANDS[id.index()]),
            Self::Shorthand(shorthand) => shorthand.subproperties(),
        }
    }

    /// Longhands the property sets that can be animated
    pub fn animated_longhands(self) -> impl Iterator<Item = PropertyId> {
        self.longhands().iter().copied().filter(|id| id.is_animated())
    }

    /// Parse a declaration value into longhand values
    pub fn parse_value(self, parser: &mut CssParser<'_>) -> Option<Vec<(PropertyId, CssValue)>> {
        match self {
            Self::Longhand(id) => Some(vec![(id, id.parse_value(parser)?)]),
            Self::Shorthand(shorthand) => {
                let values = shorthand.parse(parser)?;
                Some(shorthand.subproperties().iter().copied().zip(values).collect())
            }
        }
    }
}

// ---- value parsers ------------------------------------------------------

fn parse_global_keyword(parser: &mut CssParser<'_>) -> Option<CssValue> {
    let keyword = parser.try_enum(&[("initial", 0u8), ("inherit", 1), ("unset", 2)])?;
    Some(match keyword {
        0 => CssValue::Initial,
        1 => CssValue::Inherit,
        _ => CssValue::Unset,
    })
}

fn at_value_end(parser: &CssParser<'_>) -> bool {
    parser.is_eof()
        || parser.begins_with(';')
        || parser.begins_with('}')
        || parser.begins_with(',')
        || parser.begins_with('!')
}

fn parse_keyword(parser: &mut CssParser<'_>, keywords: &'static [&'static str]) -> Option<CssValue> {
    let table: Vec<(&str, &'static str)> = keywords.iter().map(|k| (*k, *k)).collect();
    match parser.try_enum(&table) {
        Some(keyword) => Some(CssValue::ident(keyword)),
        None => {
            parser.error_full(CssErrorKind::UnknownValue, "Unknown value for property");
            None
        }
    }
}

fn parse_comma_list(
    parser: &mut CssParser<'_>,
    mut parse_one: impl FnMut(&mut CssParser<'_>) -> Option<CssValue>,
) -> Option<CssValue> {
    let mut values = Vec::new();
    loop {
        values.push(parse_one(parser)?);
        if !parser.try_literal(",", true) {
            break;
        }
    }
    Some(CssValue::array(values))
}

fn parse_font_family(parser: &mut CssParser<'_>) -> Option<CssValue> {
    if parser.is_string() {
        return parser.read_string().map(|s| CssValue::String(Arc::from(s)));
    }

    let Some(first) = parser.try_ident(true) else {
        parser.error("Expected name of font family");
        return None;
    };
    let mut name = first;
    while let Some(word) = parser.try_ident(true) {
        name.push(' ');
        name.push_str(&word);
    }
    Some(CssValue::String(Arc::from(name)))
}

fn parse_font_weight(parser: &mut CssParser<'_>) -> Option<CssValue> {
    let keywords = [("normal", 0u8), ("bold", 1), ("bolder", 2), ("lighter", 3)];
    if let Some(keyword) = parser.try_enum(&keywords) {
        return Some(match keyword {
            0 => CssValue::number(400.0),
            1 => CssValue::number(700.0),
            2 => CssValue::ident("bolder"),
            _ => CssValue::ident("lighter"),
        });
    }

    if !parser.has_number() {
        parser.error_full(CssErrorKind::UnknownValue, "Unknown value for property");
        return None;
    }
    let weight = Dimension::parse(parser, NumberFlags::NUMBER | NumberFlags::POSITIVE)?;
    if !(1.0..=1000.0).contains(&weight.value) {
        parser.error("Font weight values must be between 1 and 1000");
        return None;
    }
    Some(CssValue::Number(weight))
}

fn parse_iteration_count(parser: &mut CssParser<'_>) -> Option<CssValue> {
    if parser.try_enum(&[("infinite", ())]).is_some() {
        return Some(CssValue::number(f64::INFINITY));
    }
    Dimension::parse(parser, NumberFlags::NUMBER | NumberFlags::POSITIVE).map(CssValue::Number)
}

fn parse_any_ident(parser: &mut CssParser<'_>) -> Option<CssValue> {
    match parser.try_ident(true) {
        Some(ident) => Some(CssValue::Ident(Arc::from(ident))),
        None => {
            parser.error("Expected an identifier");
            None
        }
    }
}

fn parse_kind(kind: ValueKind, parser: &mut CssParser<'_>) -> Option<CssValue> {
    match kind {
        ValueKind::Color => ColorValue::parse(parser).map(CssValue::Color),
        ValueKind::Number(flags) => Dimension::parse(parser, flags).map(CssValue::Number),
        ValueKind::Keyword(keywords) => parse_keyword(parser, keywords),
        ValueKind::FontFamily => parse_comma_list(parser, parse_font_family),
        ValueKind::FontWeight => parse_font_weight(parser),
        ValueKind::IdentList => parse_comma_list(parser, parse_any_ident),
        ValueKind::KeywordList(keywords) => parse_comma_list(parser, |p| parse_keyword(p, keywords)),
        ValueKind::TimeList(flags) => {
            parse_comma_list(parser, |p| Dimension::parse(p, flags).map(CssValue::Number))
        }
        ValueKind::EasingList => parse_comma_list(parser, |p| Easing::parse(p).map(CssValue::Easing)),
        ValueKind::IterationCountList => parse_comma_list(parser, parse_iteration_count),
        ValueKind::BindingNames => {
            if parser.try_enum(&[("none", ())]).is_some() {
                return Some(CssValue::array(Vec::new()));
            }
            parse_comma_list(parser, parse_any_ident)
        }
    }
}

// ---- shorthands ---------------------------------------------------------

fn parse_box(first: PropertyId, parser: &mut CssParser<'_>) -> Option<Vec<CssValue>> {
    let kind = first.kind();
    let mut values = Vec::with_capacity(4);
    values.push(parse_kind(kind, parser)?);
    while values.len() < 4 && !at_value_end(parser) {
        values.push(parse_kind(kind, parser)?);
    }

    let [top, right, bottom, left] = match values.as_slice() {
        [all] => [all, all, all, all],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        _ => return None,
    };
    Some(vec![top.clone(), right.clone(), bottom.clone(), left.clone()])
}

fn starts_keyword(parser: &mut CssParser<'_>, keywords: &[&str]) -> bool {
    parser
        .peek_ident()
        .is_some_and(|ident| keywords.iter().any(|k| ident.eq_ignore_ascii_case(k)))
}

/// Width, style and color in any order; missing parts are `initial`
fn parse_border_side(parser: &mut CssParser<'_>) -> Option<[CssValue; 3]> {
    let mut width = None;
    let mut style = None;
    let mut color = None;

    while !at_value_end(parser) {
        if width.is_none() && parser.has_number() {
            width = Some(CssValue::Number(Dimension::parse(parser, POSITIVE_LENGTH)?));
        } else if style.is_none() && starts_keyword(parser, BORDER_STYLES) {
            style = Some(parse_keyword(parser, BORDER_STYLES)?);
        } else if color.is_none() {
            color = Some(CssValue::Color(ColorValue::parse(parser)?));
        } else {
            break;
        }
    }

    if width.is_none() && style.is_none() && color.is_none() {
        parser.error("Expected a border value");
        return None;
    }

    let or_initial = |value: Option<CssValue>| value.unwrap_or(CssValue::Initial);
    Some([or_initial(width), or_initial(style), or_initial(color)])
}

fn parse_transition(parser: &mut CssParser<'_>) -> Option<Vec<CssValue>> {
    let mut properties = Vec::new();
    let mut durations = Vec::new();
    let mut timings = Vec::new();
    let mut delays = Vec::new();

    loop {
        let mut property = None;
        let mut duration = None;
        let mut timing = None;
        let mut delay = None;

        while !at_value_end(parser) {
            if parser.has_number() && delay.is_none() {
                let time = CssValue::Number(Dimension::parse(parser, NumberFlags::TIME)?);
                if duration.is_none() {
                    duration = Some(time);
                } else {
                    delay = Some(time);
                }
            } else if timing.is_none() && Easing::can_parse(parser) {
                timing = Some(CssValue::Easing(Easing::parse(parser)?));
            } else if property.is_none() && parser.peek_ident().is_some() {
                property = parse_any_ident(parser);
            } else {
                break;
            }
        }

        if property.is_none() && duration.is_none() && timing.is_none() && delay.is_none() {
            parser.error("Expected a transition");
            return None;
        }

        properties.push(property.unwrap_or_else(|| CssValue::ident("all")));
        durations.push(duration.unwrap_or(CssValue::seconds(0.0)));
        timings.push(timing.unwrap_or(CssValue::Easing(Easing::EASE)));
        delays.push(delay.unwrap_or(CssValue::seconds(0.0)));

        if !parser.try_literal(",", true) {
            break;
        }
    }

    Some(vec![
        CssValue::array(properties),
        CssValue::array(durations),
        CssValue::array(timings),
        CssValue::array(delays),
    ])
}

fn parse_animation(parser: &mut CssParser<'_>) -> Option<Vec<CssValue>> {
    let mut lists: [Vec<CssValue>; 8] = Default::default();

    loop {
        let mut name = None;
        let mut duration = None;
        let mut timing = None;
        let mut iterations = None;
        let mut direction = None;
        let mut play_state = None;
        let mut delay = None;
        let mut fill_mode = None;

        while !at_value_end(parser) {
            if parser.has_number() {
                let number = Dimension::parse(parser, NumberFlags::TIME | NumberFlags::NUMBER)?;
                if number.unit == Unit::Number {
                    if iterations.is_some() || number.value < 0.0 {
                        parser.error("Invalid iteration count in animation");
                        return None;
                    }
                    iterations = Some(CssValue::Number(number));
                } else if duration.is_none() {
                    if number.value < 0.0 {
                        parser.error("negative values are not allowed.");
                        return None;
                    }
                    duration = Some(CssValue::Number(number));
                } else if delay.is_none() {
                    delay = Some(CssValue::Number(number));
                } else {
                    break;
                }
            } else if iterations.is_none() && starts_keyword(parser, &["infinite"]) {
                iterations = Some(parse_iteration_count(parser)?);
            } else if direction.is_none() && starts_keyword(parser, DIRECTIONS) {
                direction = Some(parse_keyword(parser, DIRECTIONS)?);
            } else if play_state.is_none() && starts_keyword(parser, PLAY_STATES) {
                play_state = Some(parse_keyword(parser, PLAY_STATES)?);
            } else if fill_mode.is_none() && starts_keyword(parser, FILL_MODES) {
                fill_mode = Some(parse_keyword(parser, FILL_MODES)?);
            } else if timing.is_none() && Easing::can_parse(parser) {
                timing = Some(CssValue::Easing(Easing::parse(parser)?));
            } else if name.is_none() && parser.peek_ident().is_some() {
                name = parse_any_ident(parser);
            } else {
                break;
            }
        }

        let parts = [name, duration, timing, iterations, direction, play_state, delay, fill_mode];
        if parts.iter().all(Option::is_none) {
            parser.error("Expected an animation");
            return None;
        }

        for ((list, part), id) in lists.iter_mut().zip(parts).zip(ShorthandId::Animation.subproperties()) {
            let value = part.unwrap_or_else(|| id.initial_value().nth(0).clone());
            list.push(value);
        }

        if !parser.try_literal(",", true) {
            break;
        }
    }

    Some(lists.into_iter().map(CssValue::array).collect())
}
