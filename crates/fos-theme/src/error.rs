//! Parse Errors
//!
//! Errors never abort a load. The parser records them in an [`ErrorSink`]
//! and carries on after resynchronising; the caller drains the sink once
//! the load is done.

use serde::Serialize;

use crate::section::CssSection;

/// Error category reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CssErrorKind {
    /// Malformed input, including out of range numbers
    Syntax,
    /// Unknown property, pseudo-class or at-rule
    Name,
    /// Unreadable or recursive import
    Import,
    /// Obsolete but accepted syntax
    Deprecated,
    /// Value that no property parser recognised
    UnknownValue,
}

impl CssErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "SYNTAX",
            Self::Name => "NAME",
            Self::Import => "IMPORT",
            Self::Deprecated => "DEPRECATED",
            Self::UnknownValue => "UNKNOWN_VALUE",
        }
    }
}

/// A diagnostic produced while parsing a stylesheet
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("{section}: {message}")]
pub struct CssError {
    pub kind: CssErrorKind,
    pub message: String,
    pub section: CssSection,
}

impl CssError {
    pub fn new(kind: CssErrorKind, message: impl Into<String>, section: CssSection) -> Self {
        Self {
            kind,
            message: message.into(),
            section,
        }
    }

    /// Deprecations are warnings; everything else is a hard error
    pub fn is_warning(&self) -> bool {
        self.kind == CssErrorKind::Deprecated
    }
}

/// Accumulates errors in the order they were reported
#[derive(Debug, Default, Clone)]
pub struct ErrorSink {
    errors: Vec<CssError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CssError) {
        if error.is_warning() {
            tracing::warn!(section = %error.section, "theme parsing error: {}", error.message);
        } else {
            tracing::debug!(section = %error.section, kind = error.kind.as_str(), "{}", error.message);
        }
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = CssError>) {
        for error in errors {
            self.push(error);
        }
    }

    /// All recorded errors, warnings included
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CssError> {
        self.errors.iter().filter(|e| e.is_warning())
    }

    pub fn hard_errors(&self) -> impl Iterator<Item = &CssError> {
        self.errors.iter().filter(|e| !e.is_warning())
    }

    pub fn first_hard_error(&self) -> Option<&CssError> {
        self.hard_errors().next()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Take every recorded error, leaving the sink empty
    pub fn drain(&mut self) -> Vec<CssError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{SectionType, SourceLocation};

    fn section() -> CssSection {
        CssSection::new(SectionType::Document, None, SourceLocation::default(), None)
    }

    #[test]
    fn test_sink_separates_warnings() {
        let mut sink = ErrorSink::new();
        sink.push(CssError::new(CssErrorKind::Deprecated, "old", section()));
        sink.push(CssError::new(CssErrorKind::Syntax, "bad", section()));
        sink.push(CssError::new(CssErrorKind::Name, "unknown", section()));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.warnings().count(), 1);
        assert_eq!(sink.hard_errors().count(), 2);
        assert_eq!(sink.first_hard_error().map(|e| e.message.as_str()), Some("bad"));

        let drained = sink.drain();
        assert_eq!(drained.len(), 3);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_error_display() {
        let error = CssError::new(CssErrorKind::Syntax, "Expected semicolon", section());
        assert_eq!(error.to_string(), "<data>:1:0: Expected semicolon");
        assert_eq!(error.kind.as_str(), "SYNTAX");
    }
}
