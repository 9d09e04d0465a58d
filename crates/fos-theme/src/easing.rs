//! Timing Functions
//!
//! Cubic Bézier curves and step functions mapping raw animation progress
//! to eased progress.

use std::fmt;

use crate::parser::CssParser;

const BISECTION_EPSILON: f64 = 1e-5;
const BISECTION_MAX_STEPS: u32 = 64;

/// An easing curve
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum Easing {
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// `n` equal jumps, taken at the start or the end of each interval
    Steps { n: u32, start: bool },
}

const NAMED_CURVES: &[(&str, [f64; 4])] = &[
    ("linear", [0.0, 0.0, 1.0, 1.0]),
    ("ease-in-out", [0.42, 0.0, 0.58, 1.0]),
    ("ease-in", [0.42, 0.0, 1.0, 1.0]),
    ("ease-out", [0.0, 0.0, 0.58, 1.0]),
    ("ease", [0.25, 0.1, 0.25, 1.0]),
];

impl Default for Easing {
    fn default() -> Self {
        Self::EASE
    }
}

impl Easing {
    pub const LINEAR: Easing = Easing::CubicBezier { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 };
    pub const EASE: Easing = Easing::CubicBezier { x1: 0.25, y1: 0.1, x2: 0.25, y2: 1.0 };

    /// Whether an easing value starts at the cursor
    pub fn can_parse(parser: &mut CssParser<'_>) -> bool {
        let Some(ident) = parser.peek_ident() else {
            return false;
        };
        let ident = ident.to_ascii_lowercase();
        match ident.as_str() {
            "cubic-bezier" | "steps" => parser.has_prefix(&format!("{ident}(")),
            "step-start" | "step-end" => true,
            name => NAMED_CURVES.iter().any(|(curve, _)| *curve == name),
        }
    }

    pub fn parse(parser: &mut CssParser<'_>) -> Option<Self> {
        if parser.try_literal("cubic-bezier(", true) {
            return Self::parse_cubic_bezier(parser);
        }
        if parser.try_literal("steps(", true) {
            return Self::parse_steps(parser);
        }

        let Some(ident) = parser.try_ident(true) else {
            parser.error("Expected a valid ease value");
            return None;
        };
        let ident = ident.to_ascii_lowercase();

        match ident.as_str() {
            "step-start" => return Some(Self::Steps { n: 1, start: true }),
            "step-end" => return Some(Self::Steps { n: 1, start: false }),
            _ => {}
        }

        match NAMED_CURVES.iter().find(|(name, _)| *name == ident) {
            Some((_, [x1, y1, x2, y2])) => Some(Self::CubicBezier {
                x1: *x1,
                y1: *y1,
                x2: *x2,
                y2: *y2,
            }),
            None => {
                parser.error(format!("Unknown value '{ident}' for timing function"));
                None
            }
        }
    }

    fn parse_cubic_bezier(parser: &mut CssParser<'_>) -> Option<Self> {
        let mut values = [0.0; 4];

        for (i, value) in values.iter_mut().enumerate() {
            if i > 0 && !parser.try_literal(",", true) {
                parser.error("Expected ','");
                return None;
            }
            let Some(number) = parser.try_double() else {
                parser.error("Expected a number");
                return None;
            };
            if i % 2 == 0 && !(0.0..=1.0).contains(&number) {
                parser.error(format!("value {number} out of range. Must be from 0.0 to 1.0"));
                return None;
            }
            *value = number;
        }

        if !parser.try_literal(")", true) {
            parser.error("Missing closing ')' for cubic-bezier");
            return None;
        }

        let [x1, y1, x2, y2] = values;
        Some(Self::CubicBezier { x1, y1, x2, y2 })
    }

    fn parse_steps(parser: &mut CssParser<'_>) -> Option<Self> {
        let Some(n) = parser.try_int() else {
            parser.error("Expected number of steps");
            return None;
        };
        parser.skip_whitespace();
        if n < 1 {
            parser.error("Number of steps must be > 0");
            return None;
        }

        let start = if parser.try_literal(",", true) {
            match parser.try_enum(&[("start", true), ("end", false)]) {
                Some(start) => start,
                None => {
                    parser.error("Only allowed values are 'start' and 'end'");
                    return None;
                }
            }
        } else {
            false
        };

        if !parser.try_literal(")", true) {
            parser.error("Missing closing ')' for steps");
            return None;
        }

        Some(Self::Steps {
            n: n.unsigned_abs(),
            start,
        })
    }

    /// Map `progress` through the curve. Input outside `[0, 1]` is clamped.
    pub fn transform(&self, progress: f64) -> f64 {
        if progress.is_nan() || progress <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }

        match *self {
            Self::CubicBezier { x1, y1, x2, y2 } => bezier_solve(progress, x1, y1, x2, y2),
            Self::Steps { n, start } => {
                let n = f64::from(n);
                let step = (progress * n).floor() + if start { 1.0 } else { 0.0 };
                (step / n).min(1.0)
            }
        }
    }
}

fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    (((1.0 + 3.0 * p1 - 3.0 * p2) * t + (-6.0 * p1 + 3.0 * p2)) * t + 3.0 * p1) * t
}

fn bezier_solve(progress: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let mut tmin = 0.0;
    let mut tmax = 1.0;
    let mut t = progress;

    for _ in 0..BISECTION_MAX_STEPS {
        let x = bezier_sample(t, x1, x2);
        if (x - progress).abs() < BISECTION_EPSILON {
            break;
        }
        if x < progress {
            tmin = t;
        } else {
            tmax = t;
        }
        t = (tmax - tmin) * 0.5 + tmin;
    }

    bezier_sample(t, y1, y2)
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                let named = NAMED_CURVES
                    .iter()
                    .find(|(_, values)| *values == [x1, y1, x2, y2]);
                match named {
                    Some((name, _)) => f.write_str(name),
                    None => write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})"),
                }
            }
            Self::Steps { n: 1, start: true } => f.write_str("step-start"),
            Self::Steps { n: 1, start: false } => f.write_str("step-end"),
            Self::Steps { n, start: true } => write!(f, "steps({n}, start)"),
            Self::Steps { n, start: false } => write!(f, "steps({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<Easing> {
        let mut parser = CssParser::new(text, None);
        Easing::parse(&mut parser)
    }

    fn parse_error(text: &str) -> String {
        let mut parser = CssParser::new(text, None);
        assert!(Easing::parse(&mut parser).is_none());
        parser.errors()[0].message.clone()
    }

    #[test]
    fn test_named_curves() {
        assert_eq!(parse("linear"), Some(Easing::LINEAR));
        assert_eq!(parse("ease"), Some(Easing::EASE));
        assert_eq!(
            parse("ease-in"),
            Some(Easing::CubicBezier { x1: 0.42, y1: 0.0, x2: 1.0, y2: 1.0 })
        );
        assert_eq!(parse("step-start"), Some(Easing::Steps { n: 1, start: true }));
        assert_eq!(parse("step-end"), Some(Easing::Steps { n: 1, start: false }));
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            parse("cubic-bezier(0.1, 0.7, 1.0, 0.1)"),
            Some(Easing::CubicBezier { x1: 0.1, y1: 0.7, x2: 1.0, y2: 0.1 })
        );
        assert_eq!(parse("steps(4)"), Some(Easing::Steps { n: 4, start: false }));
        assert_eq!(parse("steps(3, start)"), Some(Easing::Steps { n: 3, start: true }));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_error("cubic-bezier(1.5, 0, 1, 1)"),
            "value 1.5 out of range. Must be from 0.0 to 1.0"
        );
        assert_eq!(parse_error("cubic-bezier(0.5 0, 1, 1)"), "Expected ','");
        assert_eq!(parse_error("cubic-bezier(0.5, 0, 1, 1"), "Missing closing ')' for cubic-bezier");
        assert_eq!(parse_error("steps(0)"), "Number of steps must be > 0");
        assert_eq!(parse_error("steps(x)"), "Expected number of steps");
        assert_eq!(parse_error("steps(2, middle)"), "Only allowed values are 'start' and 'end'");
    }

    #[test]
    fn test_transform_endpoints() {
        let ease_in = parse("ease-in").unwrap();
        assert_eq!(ease_in.transform(0.0), 0.0);
        assert_eq!(ease_in.transform(1.0), 1.0);
        assert_eq!(ease_in.transform(-3.0), 0.0);
        assert_eq!(ease_in.transform(7.0), 1.0);
    }

    #[test]
    fn test_linear_is_identity() {
        for i in 1..10 {
            let p = f64::from(i) / 10.0;
            assert!((Easing::LINEAR.transform(p) - p).abs() < 1e-4);
        }
    }

    #[test]
    fn test_steps() {
        let end = Easing::Steps { n: 4, start: false };
        let start = Easing::Steps { n: 4, start: true };
        assert_eq!(end.transform(0.5), 0.5);
        assert_eq!(start.transform(0.5), 0.75);
        assert_eq!(end.transform(0.2), 0.0);
        assert_eq!(start.transform(0.2), 0.25);
    }

    #[test]
    fn test_bezier_is_monotonic() {
        for curve in ["ease", "ease-in", "ease-out", "ease-in-out", "cubic-bezier(0.2, 0.3, 0.8, 0.9)"] {
            let easing = parse(curve).unwrap();
            let mut last = 0.0;
            for i in 0..=200 {
                let value = easing.transform(f64::from(i) / 200.0);
                assert!(value + 1e-4 >= last, "{curve} decreased at step {i}");
                last = value;
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Easing::EASE.to_string(), "ease");
        assert_eq!(
            Easing::CubicBezier { x1: 0.1, y1: 0.2, x2: 0.3, y2: 0.4 }.to_string(),
            "cubic-bezier(0.1, 0.2, 0.3, 0.4)"
        );
        assert_eq!(Easing::Steps { n: 3, start: true }.to_string(), "steps(3, start)");
        assert_eq!(Easing::Steps { n: 3, start: false }.to_string(), "steps(3)");
        assert_eq!(Easing::Steps { n: 1, start: true }.to_string(), "step-start");
    }
}
