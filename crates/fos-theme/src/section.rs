//! Source Sections
//!
//! Spans of stylesheet text, nested the way the document is: a value sits
//! inside a declaration, inside a ruleset, inside a document. Used for
//! diagnostics and debug output only.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};

/// What kind of construct a section covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Document,
    Import,
    ColorDefinition,
    BindingSet,
    Ruleset,
    Selector,
    Declaration,
    Value,
    Keyframes,
}

/// A position in the source text.
///
/// Lines are counted from 0, positions are byte offsets from the start of
/// the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub position: usize,
}

#[derive(Debug)]
struct SectionData {
    section_type: SectionType,
    file: Option<Arc<str>>,
    start: SourceLocation,
    end: OnceLock<SourceLocation>,
    parent: Option<CssSection>,
}

/// Shared handle to a section of a stylesheet
#[derive(Clone)]
pub struct CssSection(Arc<SectionData>);

impl CssSection {
    /// Open a section; its end stays unknown until [`CssSection::end`]
    pub fn new(
        section_type: SectionType,
        file: Option<Arc<str>>,
        start: SourceLocation,
        parent: Option<CssSection>,
    ) -> Self {
        Self(Arc::new(SectionData {
            section_type,
            file,
            start,
            end: OnceLock::new(),
            parent,
        }))
    }

    /// A section whose extent is already known
    pub fn closed(
        section_type: SectionType,
        file: Option<Arc<str>>,
        start: SourceLocation,
        end: SourceLocation,
        parent: Option<CssSection>,
    ) -> Self {
        let section = Self::new(section_type, file, start, parent);
        section.end(end);
        section
    }

    /// Record where the section ends. Only the first call has an effect.
    pub fn end(&self, location: SourceLocation) {
        let _ = self.0.end.set(location);
    }

    pub fn section_type(&self) -> SectionType {
        self.0.section_type
    }

    pub fn file(&self) -> Option<&str> {
        self.0.file.as_deref()
    }

    pub fn parent(&self) -> Option<&CssSection> {
        self.0.parent.as_ref()
    }

    pub fn start(&self) -> SourceLocation {
        self.0.start
    }

    /// End of the section, or its start while it is still open
    pub fn end_location(&self) -> SourceLocation {
        self.0.end.get().copied().unwrap_or(self.0.start)
    }

    pub fn start_line(&self) -> usize {
        self.0.start.line
    }

    pub fn start_position(&self) -> usize {
        self.0.start.position
    }

    pub fn end_line(&self) -> usize {
        self.end_location().line
    }

    pub fn end_position(&self) -> usize {
        self.end_location().position
    }

    /// Whether the section has been closed
    pub fn is_closed(&self) -> bool {
        self.0.end.get().is_some()
    }

    /// Outermost ancestor, normally the document section
    pub fn root(&self) -> &CssSection {
        let mut section = self;
        while let Some(parent) = section.parent() {
            section = parent;
        }
        section
    }

    /// Two handles referring to the very same section
    pub fn ptr_eq(&self, other: &CssSection) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Sections compare by identity
impl PartialEq for CssSection {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Display for CssSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file().unwrap_or("<data>"),
            self.start_line() + 1,
            self.start_position()
        )
    }
}

impl fmt::Debug for CssSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CssSection")
            .field("type", &self.section_type())
            .field("file", &self.file())
            .field("start", &self.start())
            .field("end", &self.end_location())
            .finish()
    }
}

impl Serialize for CssSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("CssSection", 6)?;
        state.serialize_field("type", &self.section_type())?;
        state.serialize_field("file", &self.file())?;
        state.serialize_field("start_line", &self.start_line())?;
        state.serialize_field("start_position", &self.start_position())?;
        state.serialize_field("end_line", &self.end_line())?;
        state.serialize_field("end_position", &self.end_position())?;
        state.end()
    }
}
