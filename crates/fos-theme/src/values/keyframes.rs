//! Keyframes
//!
//! Per-property samples of a `@keyframes` rule. Offsets 0 and 1 are
//! implied: a missing endpoint stands for the intrinsic value of the
//! property being animated.

use std::fmt;

use crate::error::CssErrorKind;
use crate::parser::CssParser;
use crate::properties::{self, PropertyId};

use super::{ComputeContext, CssValue};

/// One `(offset, value)` sample
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeSample {
    pub offset: f64,
    pub value: CssValue,
}

/// Samples of a single property, ordered by offset
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTrack {
    pub property: PropertyId,
    pub samples: Vec<KeyframeSample>,
}

impl PropertyTrack {
    fn set(&mut self, offset: f64, value: CssValue) {
        match self.samples.binary_search_by(|s| s.offset.total_cmp(&offset)) {
            Ok(i) => self.samples[i].value = value,
            Err(i) => self.samples.insert(i, KeyframeSample { offset, value }),
        }
    }
}

/// A parsed `@keyframes` body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyframes {
    /// Ordered by property id
    tracks: Vec<PropertyTrack>,
}

impl Keyframes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties with at least one sample
    pub fn n_properties(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[PropertyTrack] {
        &self.tracks
    }

    pub fn properties(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.tracks.iter().map(|t| t.property)
    }

    pub fn track(&self, property: PropertyId) -> Option<&PropertyTrack> {
        self.tracks
            .binary_search_by_key(&property, |t| t.property)
            .ok()
            .map(|i| &self.tracks[i])
    }

    /// Record `value` for `property` at `offset`, replacing an earlier
    /// sample at the same offset
    pub fn insert(&mut self, property: PropertyId, offset: f64, value: CssValue) {
        let i = match self.tracks.binary_search_by_key(&property, |t| t.property) {
            Ok(i) => i,
            Err(i) => {
                self.tracks.insert(
                    i,
                    PropertyTrack {
                        property,
                        samples: Vec::new(),
                    },
                );
                i
            }
        };
        self.tracks[i].set(offset, value);
    }

    /// Value of `property` at `progress`, interpolating between the two
    /// samples around it. `default` fills in missing endpoints.
    pub fn value_at(&self, property: PropertyId, progress: f64, default: &CssValue) -> CssValue {
        let Some(track) = self.track(property) else {
            return default.clone();
        };

        let mut start: Option<&KeyframeSample> = None;
        let mut end: Option<&KeyframeSample> = None;
        for sample in &track.samples {
            if sample.offset == progress {
                return sample.value.clone();
            }
            if sample.offset < progress {
                start = Some(sample);
            } else {
                end = Some(sample);
                break;
            }
        }

        let (start_offset, start_value) = start.map_or((0.0, default), |s| (s.offset, &s.value));
        let (end_offset, end_value) = end.map_or((1.0, default), |s| (s.offset, &s.value));

        let span = end_offset - start_offset;
        let local = if span > 0.0 { (progress - start_offset) / span } else { 0.0 };

        start_value
            .transition(end_value, local)
            .unwrap_or_else(|| start_value.clone())
    }

    /// Compute every sample
    pub fn compute(&self, ctx: &ComputeContext<'_>) -> Keyframes {
        let tracks = self
            .tracks
            .iter()
            .map(|track| PropertyTrack {
                property: track.property,
                samples: track
                    .samples
                    .iter()
                    .map(|s| KeyframeSample {
                        offset: s.offset,
                        value: s.value.compute(track.property, ctx),
                    })
                    .collect(),
            })
            .collect();
        Keyframes { tracks }
    }

    /// Parse blocks up to, not including, the closing `}` of the rule
    pub fn parse(parser: &mut CssParser<'_>) -> Option<Keyframes> {
        let mut keyframes = Keyframes::new();

        parser.skip_whitespace();
        while !parser.is_eof() && !parser.begins_with('}') {
            if !keyframes.parse_block(parser) {
                return None;
            }
            parser.skip_whitespace();
        }

        Some(keyframes)
    }

    fn parse_block(&mut self, parser: &mut CssParser<'_>) -> bool {
        let mut offsets = Vec::new();
        loop {
            let Some(offset) = parse_offset(parser) else {
                parser.resync(true, Some('}'));
                return false;
            };
            offsets.push(offset);
            if !parser.try_literal(",", true) {
                break;
            }
        }

        if !parser.try_literal("{", true) {
            parser.error("Expected '{' after keyframe selector");
            parser.resync(true, Some('}'));
            return false;
        }

        let mut declarations = Vec::new();
        while !parser.is_eof() && !parser.begins_with('}') {
            parse_declaration(parser, &mut declarations);
        }

        if !parser.try_literal("}", true) {
            parser.error("expected '}' after declarations");
            return false;
        }

        for offset in offsets {
            for (property, value) in &declarations {
                self.insert(*property, offset, value.clone());
            }
        }
        true
    }
}

fn parse_offset(parser: &mut CssParser<'_>) -> Option<f64> {
    if let Some(offset) = parser.try_enum(&[("from", 0.0), ("to", 1.0)]) {
        return Some(offset);
    }

    let Some(percent) = parser.try_double() else {
        parser.error("expected a percentage");
        return None;
    };
    if !parser.try_literal("%", true) {
        parser.error("expected a percentage");
        return None;
    }
    if !(0.0..=100.0).contains(&percent) {
        parser.error("percentages must be between 0% and 100%");
        return None;
    }
    Some(percent / 100.0)
}

fn parse_declaration(parser: &mut CssParser<'_>, out: &mut Vec<(PropertyId, CssValue)>) {
    let Some(name) = parser.try_ident(true) else {
        parser.error("Expected a property name");
        parser.resync(true, Some('}'));
        return;
    };

    let Some(property) = properties::lookup(&name) else {
        parser.error_full(CssErrorKind::Name, format!("'{name}' is not a valid property name"));
        parser.resync(true, Some('}'));
        return;
    };

    if !parser.try_literal(":", true) {
        parser.error("expected ':'");
        parser.resync(true, Some('}'));
        return;
    }

    let Some(values) = property.parse_value(parser) else {
        parser.resync(true, Some('}'));
        return;
    };

    if !parser.begins_with(';') && !parser.begins_with('}') && !parser.is_eof() {
        parser.error(format!("Junk at end of value for {}", property.name()));
        parser.resync(true, Some('}'));
        return;
    }

    for (id, value) in values {
        if id.is_animated() {
            out.push((id, value));
        } else {
            parser.error_full(CssErrorKind::Name, format!("Cannot animate property '{}'", id.name()));
        }
    }

    if !parser.try_literal(";", true) && !parser.begins_with('}') && !parser.is_eof() {
        parser.error("Expected semicolon");
        parser.resync(true, Some('}'));
    }
}

impl fmt::Display for Keyframes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut offsets: Vec<f64> = self
            .tracks
            .iter()
            .flat_map(|t| t.samples.iter().map(|s| s.offset))
            .collect();
        offsets.sort_by(f64::total_cmp);
        offsets.dedup();

        for offset in offsets {
            writeln!(f, "  {}% {{", offset * 100.0)?;
            for track in &self.tracks {
                if let Some(sample) = track.samples.iter().find(|s| s.offset == offset) {
                    writeln!(f, "    {}: {};", track.property.name(), sample.value)?;
                }
            }
            writeln!(f, "  }}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Option<Keyframes>, Vec<String>) {
        let mut parser = CssParser::new(text, None);
        let keyframes = Keyframes::parse(&mut parser);
        let errors = parser.errors().iter().map(|e| e.message.clone()).collect();
        (keyframes, errors)
    }

    #[test]
    fn test_parse_blocks() {
        let (keyframes, errors) = parse("from { opacity: 0 } 50%, 75% { opacity: 0.8; } to { opacity: 1 }");
        let keyframes = keyframes.unwrap();
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(keyframes.n_properties(), 1);

        let track = keyframes.track(PropertyId::Opacity).unwrap();
        let offsets: Vec<f64> = track.samples.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_duplicate_offsets_merge() {
        let (keyframes, _) = parse("50% { opacity: 0.2 } 50% { opacity: 0.4 }");
        let keyframes = keyframes.unwrap();
        let track = keyframes.track(PropertyId::Opacity).unwrap();
        assert_eq!(track.samples.len(), 1);
        assert_eq!(track.samples[0].value, CssValue::number(0.4));
    }

    #[test]
    fn test_value_at_uses_default_for_missing_endpoints() {
        let (keyframes, _) = parse("50% { opacity: 1 }");
        let keyframes = keyframes.unwrap();
        let default = CssValue::number(0.0);

        assert_eq!(keyframes.value_at(PropertyId::Opacity, 0.0, &default), CssValue::number(0.0));
        assert_eq!(keyframes.value_at(PropertyId::Opacity, 0.25, &default), CssValue::number(0.5));
        assert_eq!(keyframes.value_at(PropertyId::Opacity, 0.5, &default), CssValue::number(1.0));
        assert_eq!(keyframes.value_at(PropertyId::Opacity, 1.0, &default), CssValue::number(0.0));
        assert_eq!(keyframes.value_at(PropertyId::MarginTop, 0.3, &default), default);
    }

    #[test]
    fn test_offset_errors() {
        let (keyframes, errors) = parse("120% { opacity: 1 }");
        assert!(keyframes.is_none());
        assert_eq!(errors, vec!["percentages must be between 0% and 100%"]);
    }

    #[test]
    fn test_non_animated_property_is_rejected() {
        let (keyframes, errors) = parse("to { font-style: italic; opacity: 1 }");
        let keyframes = keyframes.unwrap();
        assert_eq!(errors, vec!["Cannot animate property 'font-style'"]);
        assert_eq!(keyframes.properties().collect::<Vec<_>>(), vec![PropertyId::Opacity]);
    }

    #[test]
    fn test_display() {
        let (keyframes, _) = parse("from { opacity: 0 } to { opacity: 1 }");
        assert_eq!(
            keyframes.unwrap().to_string(),
            "  0% {\n    opacity: 0;\n  }\n  100% {\n    opacity: 1;\n  }\n"
        );
    }
}
