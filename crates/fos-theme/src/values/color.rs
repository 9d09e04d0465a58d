//! Color Values
//!
//! Colors may be literal or symbolic: a reference to a `@define-color`
//! entry, a function of other colors, or `currentColor`. Symbolic colors
//! are resolved when a style is computed.

use std::fmt;
use std::sync::Arc;

use crate::error::CssErrorKind;
use crate::parser::CssParser;

/// Straight-alpha RGBA with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self { red, green, blue, alpha }
    }

    /// From 8-bit channels and a float alpha
    pub fn from_u8(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self::new(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            f64::from(alpha).clamp(0.0, 1.0),
        )
    }

    fn clamped(self) -> Self {
        Self::new(
            self.red.clamp(0.0, 1.0),
            self.green.clamp(0.0, 1.0),
            self.blue.clamp(0.0, 1.0),
            self.alpha.clamp(0.0, 1.0),
        )
    }

    /// Scale lightness and saturation by `factor` in HSL space
    pub fn shade(self, factor: f64) -> Self {
        let (hue, lightness, saturation) = rgb_to_hls(self.red, self.green, self.blue);
        let lightness = (lightness * factor).clamp(0.0, 1.0);
        let saturation = (saturation * factor).clamp(0.0, 1.0);
        let (red, green, blue) = hls_to_rgb(hue, lightness, saturation);
        Self::new(red, green, blue, self.alpha)
    }

    pub fn with_alpha_factor(self, factor: f64) -> Self {
        Self::new(self.red, self.green, self.blue, (self.alpha * factor).clamp(0.0, 1.0))
    }

    /// Channel-wise blend towards `other`
    pub fn mix(self, other: Rgba, factor: f64) -> Self {
        self.lerp(other, factor).clamped()
    }

    pub fn lerp(self, other: Rgba, progress: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * progress;
        Self::new(
            mix(self.red, other.red),
            mix(self.green, other.green),
            mix(self.blue, other.blue),
            mix(self.alpha, other.alpha),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.alpha >= 1.0 {
            write!(f, "rgb({},{},{})", channel(self.red), channel(self.green), channel(self.blue))
        } else {
            write!(
                f,
                "rgba({},{},{},{})",
                channel(self.red),
                channel(self.green),
                channel(self.blue),
                self.alpha.clamp(0.0, 1.0)
            )
        }
    }
}

fn rgb_to_hls(red: f64, green: f64, blue: f64) -> (f64, f64, f64) {
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let lightness = (max + min) / 2.0;
    let mut hue = 0.0;
    let mut saturation = 0.0;

    if max != min {
        let delta = max - min;
        saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        hue = if red == max {
            (green - blue) / delta
        } else if green == max {
            2.0 + (blue - red) / delta
        } else {
            4.0 + (red - green) / delta
        };

        hue *= 60.0;
        if hue < 0.0 {
            hue += 360.0;
        }
    }

    (hue, lightness, saturation)
}

fn hls_to_rgb(hue: f64, lightness: f64, saturation: f64) -> (f64, f64, f64) {
    if saturation == 0.0 {
        return (lightness, lightness, lightness);
    }

    let m2 = if lightness <= 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let m1 = 2.0 * lightness - m2;

    let channel = |hue: f64| {
        let hue = hue.rem_euclid(360.0);
        if hue < 60.0 {
            m1 + (m2 - m1) * hue / 60.0
        } else if hue < 180.0 {
            m2
        } else if hue < 240.0 {
            m1 + (m2 - m1) * (240.0 - hue) / 60.0
        } else {
            m1
        }
    };

    (channel(hue + 120.0), channel(hue), channel(hue - 120.0))
}

/// A specified color
#[derive(Debug, Clone, PartialEq)]
pub enum ColorValue {
    Literal(Rgba),
    /// `@name`, resolved through the provider's color table
    Name(Arc<str>),
    Shade(Arc<ColorValue>, f64),
    Lighter(Arc<ColorValue>),
    Darker(Arc<ColorValue>),
    Alpha(Arc<ColorValue>, f64),
    Mix(Arc<ColorValue>, Arc<ColorValue>, f64),
    CurrentColor,
}

/// Source of named colors
pub trait ColorTable {
    fn named_color(&self, name: &str) -> Option<&ColorValue>;
}

impl ColorValue {
    pub fn literal(&self) -> Option<Rgba> {
        match self {
            Self::Literal(rgba) => Some(*rgba),
            _ => None,
        }
    }

    /// Resolve to a literal color.
    ///
    /// `current` is what `currentColor` stands for. Returns `None` for
    /// unknown names and reference cycles.
    pub fn resolve(&self, colors: &dyn ColorTable, current: Rgba) -> Option<Rgba> {
        let mut chain = Vec::new();
        self.resolve_inner(colors, current, &mut chain)
    }

    fn resolve_inner(&self, colors: &dyn ColorTable, current: Rgba, chain: &mut Vec<Arc<str>>) -> Option<Rgba> {
        match self {
            Self::Literal(rgba) => Some(*rgba),
            Self::CurrentColor => Some(current),
            Self::Name(name) => {
                if chain.iter().any(|seen| seen == name) {
                    tracing::trace!(color = %name, "color reference cycle");
                    return None;
                }
                let Some(named) = colors.named_color(name) else {
                    tracing::trace!(color = %name, "unknown color name");
                    return None;
                };
                chain.push(name.clone());
                let resolved = named.resolve_inner(colors, current, chain);
                chain.pop();
                resolved
            }
            Self::Shade(color, factor) => Some(color.resolve_inner(colors, current, chain)?.shade(*factor)),
            Self::Lighter(color) => Some(color.resolve_inner(colors, current, chain)?.shade(1.3)),
            Self::Darker(color) => Some(color.resolve_inner(colors, current, chain)?.shade(0.7)),
            Self::Alpha(color, factor) => Some(color.resolve_inner(colors, current, chain)?.with_alpha_factor(*factor)),
            Self::Mix(a, b, factor) => {
                let a = a.resolve_inner(colors, current, chain)?;
                let b = b.resolve_inner(colors, current, chain)?;
                Some(a.mix(b, *factor))
            }
        }
    }

    pub fn parse(parser: &mut CssParser<'_>) -> Option<Self> {
        if parser.try_literal("currentColor", true) {
            return Some(Self::CurrentColor);
        }
        if parser.try_literal("transparent", true) {
            return Some(Self::Literal(Rgba::TRANSPARENT));
        }
        if parser.try_literal("@", false) {
            let Some(name) = parser.try_name(true) else {
                parser.error("Not a valid color name");
                return None;
            };
            return Some(Self::Name(Arc::from(name)));
        }
        if let Some(rgba) = parser.try_hash_color() {
            return Some(Self::Literal(rgba));
        }

        for function in ["shade", "lighter", "darker", "alpha", "mix"] {
            if parser.has_prefix(function) && parser.remaining()[function.len()..].starts_with('(') {
                parser.try_literal(function, false);
                return Self::parse_function(parser, function);
            }
        }

        for function in ["rgba", "rgb", "hsla", "hsl"] {
            if parser.has_prefix(function) && parser.remaining()[function.len()..].starts_with('(') {
                let text = parser.read_function_text()?;
                return literal_from_text(parser, &text).map(Self::Literal);
            }
        }

        let Some(name) = parser.try_ident(true) else {
            parser.error("Expected a color");
            return None;
        };
        literal_from_text(parser, &name).map(Self::Literal)
    }

    fn parse_function(parser: &mut CssParser<'_>, function: &str) -> Option<Self> {
        if !parser.try_literal("(", true) {
            parser.error("Missing opening bracket in color definition");
            return None;
        }

        let first = Arc::new(Self::parse(parser)?);
        let value = match function {
            "lighter" => Self::Lighter(first),
            "darker" => Self::Darker(first),
            "mix" => {
                expect_comma(parser)?;
                let second = Arc::new(Self::parse(parser)?);
                expect_comma(parser)?;
                let factor = expect_number(parser)?;
                Self::Mix(first, second, factor)
            }
            _ => {
                expect_comma(parser)?;
                let factor = expect_number(parser)?;
                if function == "shade" {
                    Self::Shade(first, factor)
                } else {
                    Self::Alpha(first, factor)
                }
            }
        };

        if !parser.try_literal(")", true) {
            parser.error("Missing closing bracket in color definition");
            return None;
        }
        Some(value)
    }
}

fn expect_comma(parser: &mut CssParser<'_>) -> Option<()> {
    if parser.try_literal(",", true) {
        Some(())
    } else {
        parser.error("Missing comma in color definition");
        None
    }
}

fn expect_number(parser: &mut CssParser<'_>) -> Option<f64> {
    let number = parser.try_double();
    if number.is_none() {
        parser.error("Expected a number");
    }
    number
}

/// Standard CSS color syntax, handed to lightningcss
fn literal_from_text(parser: &mut CssParser<'_>, text: &str) -> Option<Rgba> {
    use lightningcss::traits::Parse;
    use lightningcss::values::color::CssColor;

    match CssColor::parse_string(text) {
        Ok(CssColor::RGBA(rgba)) => Some(Rgba::from_u8(rgba.red, rgba.green, rgba.blue, rgba.alpha_f32())),
        _ => {
            parser.error_full(
                CssErrorKind::UnknownValue,
                format!("'{text}' is not a valid color name"),
            );
            None
        }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(rgba) => write!(f, "{rgba}"),
            Self::Name(name) => write!(f, "@{name}"),
            Self::Shade(color, factor) => write!(f, "shade({color}, {factor})"),
            Self::Lighter(color) => write!(f, "lighter({color})"),
            Self::Darker(color) => write!(f, "darker({color})"),
            Self::Alpha(color, factor) => write!(f, "alpha({color}, {factor})"),
            Self::Mix(a, b, factor) => write!(f, "mix({a}, {b}, {factor})"),
            Self::CurrentColor => f.write_str("currentColor"),
        }
    }
}
