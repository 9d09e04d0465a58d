//! Numbers with units

use std::fmt;

use bitflags::bitflags;

use crate::error::CssErrorKind;
use crate::parser::CssParser;

/// Font size every relative length falls back to, in pixels
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

const DPI: f64 = 96.0;

/// CSS unit of a [`Dimension`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Unit {
    Number,
    Percent,
    Px,
    Pt,
    Em,
    Ex,
    Rem,
    Pc,
    In,
    Cm,
    Mm,
    Rad,
    Deg,
    Grad,
    Turn,
    S,
    Ms,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Number => "",
            Unit::Percent => "%",
            Unit::Px => "px",
            Unit::Pt => "pt",
            Unit::Em => "em",
            Unit::Ex => "ex",
            Unit::Rem => "rem",
            Unit::Pc => "pc",
            Unit::In => "in",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::Rad => "rad",
            Unit::Deg => "deg",
            Unit::Grad => "grad",
            Unit::Turn => "turn",
            Unit::S => "s",
            Unit::Ms => "ms",
        }
    }
}

bitflags! {
    /// What a number parser accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NumberFlags: u32 {
        const POSITIVE = 1 << 0;
        const PERCENT = 1 << 1;
        const NUMBER = 1 << 2;
        /// Accept unitless non-zero lengths, with a deprecation warning
        const NUMBER_AS_PIXELS = 1 << 3;
        const LENGTH = 1 << 4;
        const ANGLE = 1 << 5;
        const TIME = 1 << 6;
    }
}

const UNITS: &[(&str, Unit, NumberFlags)] = &[
    ("px", Unit::Px, NumberFlags::LENGTH),
    ("pt", Unit::Pt, NumberFlags::LENGTH),
    ("em", Unit::Em, NumberFlags::LENGTH),
    ("ex", Unit::Ex, NumberFlags::LENGTH),
    ("rem", Unit::Rem, NumberFlags::LENGTH),
    ("pc", Unit::Pc, NumberFlags::LENGTH),
    ("in", Unit::In, NumberFlags::LENGTH),
    ("cm", Unit::Cm, NumberFlags::LENGTH),
    ("mm", Unit::Mm, NumberFlags::LENGTH),
    ("rad", Unit::Rad, NumberFlags::ANGLE),
    ("deg", Unit::Deg, NumberFlags::ANGLE),
    ("grad", Unit::Grad, NumberFlags::ANGLE),
    ("turn", Unit::Turn, NumberFlags::ANGLE),
    ("s", Unit::S, NumberFlags::TIME),
    ("ms", Unit::Ms, NumberFlags::TIME),
];

/// A number and its unit
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Dimension {
    pub value: f64,
    pub unit: Unit,
}

impl Dimension {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn parse(parser: &mut CssParser<'_>, flags: NumberFlags) -> Option<Self> {
        let Some(value) = parser.read_number_literal() else {
            parser.error("not a number");
            return None;
        };

        if flags.contains(NumberFlags::POSITIVE) && value < 0.0 {
            parser.error("negative values are not allowed.");
            return None;
        }

        let unit = if let Some(name) = parser.try_ident(false) {
            let found = UNITS
                .iter()
                .find(|(unit_name, _, required)| flags.intersects(*required) && name.eq_ignore_ascii_case(unit_name));
            match found {
                Some((_, unit, _)) => *unit,
                None => {
                    parser.error(format!("'{name}' is not a valid unit."));
                    return None;
                }
            }
        } else if flags.contains(NumberFlags::PERCENT) && parser.try_literal("%", false) {
            Unit::Percent
        } else if value == 0.0 {
            if flags.contains(NumberFlags::NUMBER) {
                Unit::Number
            } else if flags.contains(NumberFlags::LENGTH) {
                Unit::Px
            } else if flags.contains(NumberFlags::ANGLE) {
                Unit::Deg
            } else if flags.contains(NumberFlags::TIME) {
                Unit::S
            } else {
                Unit::Percent
            }
        } else if flags.contains(NumberFlags::NUMBER_AS_PIXELS) {
            parser.error_full(
                CssErrorKind::Deprecated,
                "Not using units is deprecated. Assuming 'px'.",
            );
            Unit::Px
        } else if flags.contains(NumberFlags::NUMBER) {
            Unit::Number
        } else {
            parser.error("Unit is missing.");
            return None;
        };

        parser.skip_whitespace();
        Some(Self::new(value, unit))
    }

    /// Resolve to px, deg or s.
    ///
    /// `font_size` is the size `em` refers to; `rem` always refers to the
    /// default font size. Percentages and plain numbers stay as they are.
    pub fn compute(self, font_size: f64) -> Self {
        let Self { value, unit } = self;
        match unit {
            Unit::Number | Unit::Percent | Unit::Px | Unit::Deg | Unit::S => self,
            Unit::Pt => Self::new(value * DPI / 72.0, Unit::Px),
            Unit::Pc => Self::new(value * DPI / 72.0 * 12.0, Unit::Px),
            Unit::In => Self::new(value * DPI, Unit::Px),
            Unit::Cm => Self::new(value * DPI * 0.393_700_787_401_574_8, Unit::Px),
            Unit::Mm => Self::new(value * DPI * 0.039_370_078_740_157_48, Unit::Px),
            Unit::Em => Self::new(value * font_size, Unit::Px),
            Unit::Ex => Self::new(value * font_size * 0.5, Unit::Px),
            Unit::Rem => Self::new(value * DEFAULT_FONT_SIZE_PX, Unit::Px),
            Unit::Rad => Self::new(value.to_degrees(), Unit::Deg),
            Unit::Grad => Self::new(value * 360.0 / 400.0, Unit::Deg),
            Unit::Turn => Self::new(value * 360.0, Unit::Deg),
            Unit::Ms => Self::new(value / 1000.0, Unit::S),
        }
    }

    /// Value in seconds, for computed times
    pub fn seconds(self) -> f64 {
        match self.unit {
            Unit::Ms => self.value / 1000.0,
            _ => self.value,
        }
    }

    /// Value relative to `one_hundred_percent` for percentages
    pub fn get(self, one_hundred_percent: f64) -> f64 {
        match self.unit {
            Unit::Percent => self.value * one_hundred_percent / 100.0,
            _ => self.value,
        }
    }

    pub fn lerp(self, end: Dimension, progress: f64) -> Option<Self> {
        if self.unit != end.unit {
            return None;
        }
        Some(Self::new(self.value + (end.value - self.value) * progress, self.unit))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_infinite() {
            return f.write_str(if self.value > 0.0 { "infinite" } else { "-infinite" });
        }
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, flags: NumberFlags) -> (Option<Dimension>, Vec<String>) {
        let mut parser = CssParser::new(text, None);
        let result = Dimension::parse(&mut parser, flags);
        let messages = parser.errors().iter().map(|e| e.message.clone()).collect();
        (result, messages)
    }

    #[test]
    fn test_parse_units() {
        let (value, _) = parse("12px", NumberFlags::LENGTH);
        assert_eq!(value, Some(Dimension::new(12.0, Unit::Px)));

        let (value, _) = parse("250ms", NumberFlags::TIME);
        assert_eq!(value, Some(Dimension::new(250.0, Unit::Ms)));

        let (value, _) = parse("50%", NumberFlags::LENGTH | NumberFlags::PERCENT);
        assert_eq!(value, Some(Dimension::new(50.0, Unit::Percent)));
    }

    #[test]
    fn test_unitless_zero_takes_default_unit() {
        assert_eq!(parse("0", NumberFlags::LENGTH).0, Some(Dimension::new(0.0, Unit::Px)));
        assert_eq!(parse("0", NumberFlags::TIME).0, Some(Dimension::new(0.0, Unit::S)));
        assert_eq!(parse("0", NumberFlags::ANGLE).0, Some(Dimension::new(0.0, Unit::Deg)));
    }

    #[test]
    fn test_unit_errors() {
        let (value, errors) = parse("3", NumberFlags::LENGTH);
        assert_eq!(value, None);
        assert_eq!(errors, vec!["Unit is missing."]);

        let (value, errors) = parse("3s", NumberFlags::LENGTH);
        assert_eq!(value, None);
        assert_eq!(errors, vec!["'s' is not a valid unit."]);

        let (value, errors) = parse("-1px", NumberFlags::LENGTH | NumberFlags::POSITIVE);
        assert_eq!(value, None);
        assert_eq!(errors, vec!["negative values are not allowed."]);
    }

    #[test]
    fn test_number_as_pixels_is_deprecated() {
        let mut parser = CssParser::new("4", None);
        let value = Dimension::parse(&mut parser, NumberFlags::LENGTH | NumberFlags::NUMBER_AS_PIXELS);
        assert_eq!(value, Some(Dimension::new(4.0, Unit::Px)));
        assert_eq!(parser.errors()[0].kind, CssErrorKind::Deprecated);
    }

    #[test]
    fn test_compute() {
        assert_eq!(Dimension::new(12.0, Unit::Pt).compute(16.0), Dimension::new(16.0, Unit::Px));
        assert_eq!(Dimension::new(2.0, Unit::Em).compute(10.0), Dimension::new(20.0, Unit::Px));
        assert_eq!(Dimension::new(500.0, Unit::Ms).compute(16.0), Dimension::new(0.5, Unit::S));
        assert_eq!(Dimension::new(0.5, Unit::Turn).compute(16.0), Dimension::new(180.0, Unit::Deg));
    }

    #[test]
    fn test_display() {
        assert_eq!(Dimension::new(1.5, Unit::Em).to_string(), "1.5em");
        assert_eq!(Dimension::new(100.0, Unit::Ms).to_string(), "100ms");
        assert_eq!(Dimension::new(f64::INFINITY, Unit::Number).to_string(), "infinite");
    }
}
