//! Style Provider
//!
//! Owns everything a stylesheet defines: rulesets, `@define-color` colors,
//! `@keyframes` and `@binding-set` blocks. Loading replaces the previous
//! contents, sorts the rulesets by specificity and compiles their
//! selectors into a [`SelectorTree`] that answers lookups.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::change::Change;
use crate::config::{self, EngineConfig};
use crate::error::{CssError, CssErrorKind, ErrorSink};
use crate::lookup::CssLookup;
use crate::matcher::{Matcher, SupersetMatcher};
use crate::parser::CssParser;
use crate::properties::{self, PropertyId, PropertySet, StyleProperty};
use crate::section::{CssSection, SectionType};
use crate::selector::{Selector, Specificity};
use crate::selector_tree::SelectorTree;
use crate::values::{ColorTable, ColorValue, CssValue, Keyframes};

// ---- imports ----------------------------------------------------------------

/// Supplies the text of `@import`ed stylesheets
pub trait ImportResolver {
    /// Resolve `url` relative to the importing document `base`.
    ///
    /// Returns the canonical name of the imported document, used for
    /// recursion checks and diagnostics, together with its text.
    fn resolve(&self, base: Option<&str>, url: &str) -> Result<(String, String), String>;
}

/// Rejects every import
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

impl ImportResolver for NoImports {
    fn resolve(&self, _base: Option<&str>, url: &str) -> Result<(String, String), String> {
        Err(format!("imports are not available (\"{url}\")"))
    }
}

/// Serves imports from in-memory documents keyed by name
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    documents: BTreeMap<String, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(name.into(), text.into());
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl ImportResolver for MapResolver {
    fn resolve(&self, _base: Option<&str>, url: &str) -> Result<(String, String), String> {
        match self.documents.get(url) {
            Some(text) => Ok((url.to_string(), text.clone())),
            None => Err(format!("No such document '{url}'")),
        }
    }
}

// ---- rulesets ---------------------------------------------------------------

/// One `property: value` pair of a ruleset
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: PropertyId,
    pub value: CssValue,
    pub section: Option<CssSection>,
}

/// A host widget style property, kept as raw text
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetStyleValue {
    pub name: String,
    pub value: String,
    pub section: Option<CssSection>,
}

/// Declarations of one `{ ... }` block, shared by every selector of the
/// selector list in front of it
#[derive(Debug, Clone, Default, PartialEq)]
struct RulesetBody {
    declarations: Vec<Declaration>,
    widget_styles: Vec<WidgetStyleValue>,
    set: PropertySet,
}

impl RulesetBody {
    fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.widget_styles.is_empty()
    }

    /// Later declarations of the same property replace earlier ones
    fn add(&mut self, property: PropertyId, value: CssValue, section: Option<CssSection>) {
        self.set.insert(property);
        match self.declarations.iter_mut().find(|d| d.property == property) {
            Some(declaration) => {
                declaration.value = value;
                declaration.section = section;
            }
            None => self.declarations.push(Declaration {
                property,
                value,
                section,
            }),
        }
    }

    fn add_widget_style(&mut self, name: String, value: String, section: Option<CssSection>) {
        self.widget_styles.retain(|w| w.name != name);
        self.widget_styles.push(WidgetStyleValue { name, value, section });
    }
}

/// A selector with its declarations
#[derive(Debug, Clone)]
pub struct Ruleset {
    selector: Selector,
    specificity: Specificity,
    body: Arc<RulesetBody>,
}

impl Ruleset {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.body.declarations
    }

    pub fn widget_styles(&self) -> &[WidgetStyleValue] {
        &self.body.widget_styles
    }

    /// Properties the ruleset declares
    pub fn property_set(&self) -> PropertySet {
        self.body.set
    }

    pub fn declaration(&self, id: PropertyId) -> Option<&Declaration> {
        self.body.declarations.iter().find(|d| d.property == id)
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selector)?;

        let mut declarations: Vec<&Declaration> = self.body.declarations.iter().collect();
        declarations.sort_by_key(|d| d.property.name());
        for declaration in declarations {
            writeln!(f, "  {}: {};", declaration.property.name(), declaration.value)?;
        }

        let mut widget_styles: Vec<&WidgetStyleValue> = self.body.widget_styles.iter().collect();
        widget_styles.sort_by(|a, b| a.name.cmp(&b.name));
        for style in widget_styles {
            writeln!(f, "  {}: {};", style.name, style.value)?;
        }

        writeln!(f, "}}")
    }
}

// ---- provider ---------------------------------------------------------------

/// A loaded stylesheet
#[derive(Debug)]
pub struct StyleProvider {
    config: EngineConfig,
    rulesets: Vec<Ruleset>,
    colors: BTreeMap<String, ColorValue>,
    keyframes: BTreeMap<String, Arc<Keyframes>>,
    binding_sets: BTreeMap<String, Vec<String>>,
    tree: SelectorTree,
    errors: ErrorSink,
}

impl Default for StyleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleProvider {
    /// An empty provider using the process-wide configuration
    pub fn new() -> Self {
        Self::with_config(config::process_defaults())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            rulesets: Vec::new(),
            colors: BTreeMap::new(),
            keyframes: BTreeMap::new(),
            binding_sets: BTreeMap::new(),
            tree: SelectorTree::default(),
            errors: ErrorSink::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drop everything loaded so far, errors included
    pub fn reset(&mut self) {
        self.rulesets.clear();
        self.colors.clear();
        self.keyframes.clear();
        self.binding_sets.clear();
        self.tree = SelectorTree::default();
        self.errors.clear();
    }

    /// Replace the contents with the stylesheet in `text`.
    ///
    /// Imports are rejected. Returns the first hard error; the provider
    /// keeps everything that parsed regardless.
    pub fn load_from_data(&mut self, text: &str) -> Result<(), CssError> {
        self.load_named(text, None, &NoImports)
    }

    /// Replace the contents with the stylesheet `name`, resolving imports
    /// through `resolver`
    pub fn load_named(
        &mut self,
        text: &str,
        name: Option<&str>,
        resolver: &dyn ImportResolver,
    ) -> Result<(), CssError> {
        self.reset();

        let mut loader = Loader {
            provider: self,
            resolver,
            stack: name.map(str::to_string).into_iter().collect(),
        };
        loader.load_document(text, name, None);

        self.postprocess();

        tracing::debug!(
            file = name.unwrap_or("<data>"),
            rulesets = self.rulesets.len(),
            colors = self.colors.len(),
            keyframes = self.keyframes.len(),
            errors = self.errors.len(),
            "loaded stylesheet"
        );

        match self.errors.first_hard_error() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn postprocess(&mut self) {
        // stable, so equal specificity keeps source order
        self.rulesets.sort_by_key(|r| r.specificity);
        self.tree = SelectorTree::build(self.rulesets.iter().enumerate().map(|(i, r)| (i, &r.selector)));
    }

    /// Rulesets ordered by ascending specificity, then source order
    pub fn rulesets(&self) -> &[Ruleset] {
        &self.rulesets
    }

    pub fn selector_tree(&self) -> &SelectorTree {
        &self.tree
    }

    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<CssError> {
        self.errors.drain()
    }

    pub fn get_color(&self, name: &str) -> Option<&ColorValue> {
        self.colors.get(name)
    }

    pub fn get_keyframes(&self, name: &str) -> Option<&Arc<Keyframes>> {
        self.keyframes.get(name)
    }

    /// Raw entries of a `@binding-set`
    pub fn binding_set(&self, name: &str) -> Option<&[String]> {
        self.binding_sets.get(name).map(Vec::as_slice)
    }

    /// Indices of the rulesets matching `matcher`, in ascending precedence
    pub fn matching_rulesets(&self, matcher: &dyn Matcher) -> Vec<usize> {
        self.tree.match_all(matcher)
    }

    /// Fill `lookup` with the declarations matching `matcher`, highest
    /// precedence first. When `change` is given it receives the attribute
    /// changes that could alter the result.
    pub fn lookup(&self, matcher: &dyn Matcher, lookup: &mut CssLookup, change: Option<&mut Change>) {
        let matched = self.tree.match_all(matcher);
        tracing::trace!(matched = matched.len(), "style lookup");

        for &index in matched.iter().rev() {
            let ruleset = &self.rulesets[index];
            if !lookup.missing().intersects(ruleset.property_set()) {
                continue;
            }

            for declaration in ruleset.declarations() {
                if lookup.is_missing(declaration.property) {
                    lookup.set(declaration.property, declaration.section.clone(), declaration.value.clone());
                }
            }

            if lookup.missing().is_empty() {
                break;
            }
        }

        if let Some(change) = change {
            let superset = SupersetMatcher::new(matcher, Change::NAME | Change::CLASS);
            *change = self.tree.change_all(&superset);
        }
    }

    /// Raw value of the widget style property `name` for `matcher`
    pub fn widget_style_property(&self, matcher: &dyn Matcher, name: &str) -> Option<&WidgetStyleValue> {
        self.tree
            .match_all(matcher)
            .into_iter()
            .rev()
            .find_map(|index| self.rulesets[index].widget_styles().iter().find(|w| w.name == name))
    }
}

impl ColorTable for StyleProvider {
    fn named_color(&self, name: &str) -> Option<&ColorValue> {
        self.colors.get(name)
    }
}

impl fmt::Display for StyleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut empty = true;

        for (name, color) in &self.colors {
            writeln!(f, "@define-color {name} {color};")?;
            empty = false;
        }

        for (name, keyframes) in &self.keyframes {
            if !empty {
                writeln!(f)?;
            }
            write!(f, "@keyframes {name} {{\n{keyframes}}}\n")?;
            empty = false;
        }

        for (name, entries) in &self.binding_sets {
            if !empty {
                writeln!(f)?;
            }
            writeln!(f, "@binding-set {name} {{")?;
            for entry in entries {
                writeln!(f, "  {entry};")?;
            }
            writeln!(f, "}}")?;
            empty = false;
        }

        for ruleset in &self.rulesets {
            if !empty {
                writeln!(f)?;
            }
            write!(f, "{ruleset}")?;
            empty = false;
        }

        Ok(())
    }
}

// ---- parsing ------------------------------------------------------------------

/// State of one load, shared by the documents it imports
struct Loader<'a> {
    provider: &'a mut StyleProvider,
    resolver: &'a dyn ImportResolver,
    /// Names of the documents being parsed, outermost first
    stack: Vec<String>,
}

impl Loader<'_> {
    fn load_document(&mut self, text: &str, file: Option<&str>, parent: Option<CssSection>) {
        let mut parser = CssParser::nested(text, file, parent);
        self.parse_stylesheet(&mut parser);
        self.flush_errors(&mut parser);
    }

    fn flush_errors(&mut self, parser: &mut CssParser<'_>) {
        self.provider.errors.extend(parser.take_errors());
    }

    fn section(&self, parser: &CssParser<'_>) -> Option<CssSection> {
        if self.provider.config.keep_css_sections {
            parser.current_section().cloned()
        } else {
            None
        }
    }

    fn parse_stylesheet(&mut self, parser: &mut CssParser<'_>) {
        parser.push_section(SectionType::Document);
        parser.skip_whitespace();

        while !parser.is_eof() {
            if parser.try_literal("<!--", true) || parser.try_literal("-->", true) {
                continue;
            }

            if parser.begins_with('@') {
                self.parse_at_rule(parser);
            } else {
                self.parse_ruleset(parser);
            }
        }

        parser.pop_section(SectionType::Document);
    }

    fn parse_at_rule(&mut self, parser: &mut CssParser<'_>) {
        if self.parse_import(parser)
            || self.parse_color_definition(parser)
            || self.parse_binding_set(parser)
            || self.parse_keyframes(parser)
        {
            return;
        }

        parser.error_full(CssErrorKind::Name, "unknown @ rule");
        parser.resync(true, None);
    }

    fn parse_import(&mut self, parser: &mut CssParser<'_>) -> bool {
        parser.push_section(SectionType::Import);
        if !parser.try_literal("@import", true) {
            parser.pop_section(SectionType::Import);
            return false;
        }

        let url = if parser.is_string() {
            parser.read_string()
        } else {
            parser.read_url()
        };
        let Some(url) = url else {
            parser.resync(true, None);
            parser.pop_section(SectionType::Import);
            return true;
        };

        if !parser.try_literal(";", false) {
            parser.error("expected semicolon");
            parser.resync(true, None);
        } else {
            match self.resolver.resolve(parser.file(), &url) {
                Err(reason) => parser.error_full(CssErrorKind::Import, format!("Failed to import: {reason}")),
                Ok((name, _)) if self.stack.contains(&name) => {
                    parser.error_full(CssErrorKind::Import, format!("Loading '{name}' would recurse"));
                }
                Ok((name, text)) => {
                    // keep diagnostics in document order
                    self.flush_errors(parser);
                    let import_section = parser.current_section().cloned();
                    self.stack.push(name.clone());
                    self.load_document(&text, Some(&name), import_section);
                    self.stack.pop();
                }
            }
        }

        parser.pop_section(SectionType::Import);
        parser.skip_whitespace();
        true
    }

    fn parse_color_definition(&mut self, parser: &mut CssParser<'_>) -> bool {
        parser.push_section(SectionType::ColorDefinition);
        if !parser.try_literal("@define-color", true) {
            parser.pop_section(SectionType::ColorDefinition);
            return false;
        }

        let Some(name) = parser.try_name(true) else {
            parser.error("Not a valid color name");
            parser.resync(true, None);
            parser.pop_section(SectionType::ColorDefinition);
            return true;
        };

        let Some(color) = ColorValue::parse(parser) else {
            parser.resync(true, None);
            parser.pop_section(SectionType::ColorDefinition);
            return true;
        };

        if !parser.try_literal(";", true) {
            parser.error("Missing semicolon at end of color definition");
            parser.resync(true, None);
            parser.pop_section(SectionType::ColorDefinition);
            return true;
        }

        self.provider.colors.insert(name, color);
        parser.pop_section(SectionType::ColorDefinition);
        true
    }

    fn parse_binding_set(&mut self, parser: &mut CssParser<'_>) -> bool {
        parser.push_section(SectionType::BindingSet);
        if !parser.try_literal("@binding-set", true) {
            parser.pop_section(SectionType::BindingSet);
            return false;
        }

        self.parse_binding_set_body(parser);

        if parser.begins_with(';') {
            parser.error_full(CssErrorKind::Deprecated, "Nonstandard semicolon at end of binding set");
            parser.try_literal(";", true);
        }

        parser.pop_section(SectionType::BindingSet);
        true
    }

    fn parse_binding_set_body(&mut self, parser: &mut CssParser<'_>) {
        let Some(name) = parser.try_ident(true) else {
            parser.error("Expected name for binding set");
            parser.resync(true, None);
            return;
        };

        if !parser.try_literal("{", true) {
            parser.error("Expected '{' for binding set");
            parser.resync(true, None);
            return;
        }

        let mut entries = Vec::new();
        while !parser.is_eof() && !parser.begins_with('}') {
            let Some(entry) = parser.read_value() else {
                parser.resync(true, Some('}'));
                continue;
            };

            if is_binding_entry(&entry) {
                entries.push(entry);
            } else {
                parser.error("Failed to parse binding set.");
            }

            if !parser.try_literal(";", true) && !parser.begins_with('}') && !parser.is_eof() {
                parser.error("Expected semicolon");
                parser.resync(true, Some('}'));
            }
        }

        if !parser.try_literal("}", true) {
            parser.error("expected '}' after declarations");
            if !parser.is_eof() {
                parser.resync(false, None);
            }
        }

        self.provider.binding_sets.entry(name).or_default().extend(entries);
    }

    fn parse_keyframes(&mut self, parser: &mut CssParser<'_>) -> bool {
        parser.push_section(SectionType::Keyframes);
        if !parser.try_literal("@keyframes", true) {
            parser.pop_section(SectionType::Keyframes);
            return false;
        }

        self.parse_keyframes_body(parser);
        parser.pop_section(SectionType::Keyframes);
        true
    }

    fn parse_keyframes_body(&mut self, parser: &mut CssParser<'_>) {
        let Some(name) = parser.try_ident(true) else {
            parser.error("Expected name for keyframes");
            parser.resync(true, None);
            return;
        };

        if !parser.try_literal("{", true) {
            parser.error("Expected '{' for keyframes");
            parser.resync(true, None);
            return;
        }

        let Some(keyframes) = Keyframes::parse(parser) else {
            // drop the rest of the block, including its closing brace
            parser.resync(false, Some('}'));
            parser.try_literal("}", true);
            return;
        };
        self.provider.keyframes.insert(name, Arc::new(keyframes));

        if !parser.try_literal("}", true) {
            parser.error("expected '}' after declarations");
            if !parser.is_eof() {
                parser.resync(false, None);
            }
        }
    }

    fn parse_selector_list(&mut self, parser: &mut CssParser<'_>) -> Option<Vec<Selector>> {
        parser.push_section(SectionType::Selector);

        let mut selectors = Vec::new();
        loop {
            let Some(selector) = Selector::parse(parser) else {
                parser.resync(false, None);
                parser.pop_section(SectionType::Selector);
                return None;
            };
            selectors.push(selector);

            if !parser.try_literal(",", true) {
                break;
            }
        }

        parser.pop_section(SectionType::Selector);
        Some(selectors)
    }

    fn parse_ruleset(&mut self, parser: &mut CssParser<'_>) {
        parser.push_section(SectionType::Ruleset);

        let Some(selectors) = self.parse_selector_list(parser) else {
            parser.pop_section(SectionType::Ruleset);
            return;
        };

        if !parser.try_literal("{", true) {
            parser.error("expected '{' after selectors");
            parser.resync(false, None);
            parser.pop_section(SectionType::Ruleset);
            return;
        }

        let mut body = RulesetBody::default();
        while !parser.is_eof() && !parser.begins_with('}') {
            self.parse_declaration(parser, &mut body);
        }

        if !parser.try_literal("}", true) {
            parser.error("expected '}' after declarations");
        }

        self.commit(selectors, body);
        parser.pop_section(SectionType::Ruleset);
    }

    fn commit(&mut self, selectors: Vec<Selector>, body: RulesetBody) {
        if body.is_empty() {
            return;
        }

        let body = Arc::new(body);
        for selector in selectors {
            self.provider.rulesets.push(Ruleset {
                specificity: selector.specificity(),
                selector,
                body: Arc::clone(&body),
            });
        }
    }

    fn parse_declaration(&mut self, parser: &mut CssParser<'_>, body: &mut RulesetBody) {
        parser.push_section(SectionType::Declaration);

        if let Some(name) = parser.try_ident(true)
            && !self.parse_declaration_value(parser, body, name)
        {
            parser.pop_section(SectionType::Declaration);
            return;
        }

        parser.pop_section(SectionType::Declaration);

        if !parser.try_literal(";", true) && !parser.begins_with('}') && !parser.is_eof() {
            parser.error("Expected semicolon");
            parser.resync(true, Some('}'));
        }
    }

    /// Parse everything after the property name. Returns false when the
    /// parser already skipped past the declaration.
    fn parse_declaration_value(&mut self, parser: &mut CssParser<'_>, body: &mut RulesetBody, name: String) -> bool {
        let property = properties::lookup(&name);
        let widget_style = property.is_none() && properties::is_widget_style_property(&name);

        if property.is_none() && !widget_style {
            parser.error_full(CssErrorKind::Name, format!("'{name}' is not a valid property name"));
            parser.resync(true, Some('}'));
            return false;
        }

        if let Some(new_name) = properties::renamed(&name) {
            parser.error_full(
                CssErrorKind::Deprecated,
                format!("The '{name}' property has been renamed to '{new_name}'"),
            );
        }

        if !parser.try_literal(":", true) {
            parser.error("expected ':'");
            parser.resync(true, Some('}'));
            return false;
        }

        parser.push_section(SectionType::Value);
        let parsed = match property {
            Some(property) => self.parse_property_value(parser, body, property),
            None => match parser.read_value() {
                Some(value) => {
                    let section = self.section(parser);
                    body.add_widget_style(name, value, section);
                    true
                }
                None => false,
            },
        };

        if !parsed {
            parser.resync(true, Some('}'));
        }
        parser.pop_section(SectionType::Value);
        parsed
    }

    fn parse_property_value(&mut self, parser: &mut CssParser<'_>, body: &mut RulesetBody, property: StyleProperty) -> bool {
        let Some(values) = property.parse_value(parser) else {
            return false;
        };

        if !parser.begins_with(';') && !parser.begins_with('}') && !parser.is_eof() {
            parser.error(format!("Junk at end of value for {}", property.name()));
            return false;
        }

        let section = self.section(parser);
        for (id, value) in values {
            body.add(id, value, section.clone());
        }
        true
    }
}

/// `bind "<accel>" { ... }` or `unbind "<accel>"`
fn is_binding_entry(entry: &str) -> bool {
    let rest = entry
        .strip_prefix("unbind")
        .or_else(|| entry.strip_prefix("bind"));
    rest.is_some_and(|rest| {
        let rest = rest.trim_start();
        rest.starts_with('"') || rest.starts_with('\'')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{StyleNode, StyleTree};
    use crate::values::Rgba;

    fn load(text: &str) -> StyleProvider {
        let mut provider = StyleProvider::with_config(EngineConfig::default());
        let _ = provider.load_from_data(text);
        provider
    }

    fn messages(provider: &StyleProvider) -> Vec<String> {
        provider.errors().errors().iter().map(|e| e.message.clone()).collect()
    }

    #[test]
    fn test_rulesets_sorted_by_specificity() {
        let provider = load("#y.x { color: blue } .x { color: red } a { color: green }");
        let selectors: Vec<String> = provider.rulesets().iter().map(|r| r.selector().to_string()).collect();
        assert_eq!(selectors, vec!["a", ".x", "#y.x"]);
    }

    #[test]
    fn test_selector_list_shares_declarations() {
        let provider = load("a, b { opacity: 0.5; }");
        assert_eq!(provider.rulesets().len(), 2);
        assert!(Arc::ptr_eq(&provider.rulesets()[0].body, &provider.rulesets()[1].body));
    }

    #[test]
    fn test_empty_rulesets_are_dropped() {
        let provider = load("a { } b { opacity: 1 }");
        assert_eq!(provider.rulesets().len(), 1);
    }

    #[test]
    fn test_later_declaration_wins_within_ruleset() {
        let provider = load("a { opacity: 0.1; opacity: 0.2 }");
        let ruleset = &provider.rulesets()[0];
        assert_eq!(ruleset.declarations().len(), 1);
        assert_eq!(
            ruleset.declaration(PropertyId::Opacity).map(|d| &d.value),
            Some(&CssValue::number(0.2))
        );
    }

    #[test]
    fn test_define_color() {
        let provider = load("@define-color accent #ff0000;");
        assert_eq!(
            provider.get_color("accent").and_then(ColorValue::literal),
            Some(Rgba::new(1.0, 0.0, 0.0, 1.0))
        );
        assert!(provider.errors().is_empty());
    }

    #[test]
    fn test_errors_recover() {
        let mut provider = StyleProvider::with_config(EngineConfig::default());
        let result = provider.load_from_data("a { bogus: 1; opacity: 0.5 } @frobnicate; b { color: red }");
        assert_eq!(result.map_err(|e| e.message), Err("'bogus' is not a valid property name".to_string()));
        assert_eq!(
            messages(&provider),
            vec!["'bogus' is not a valid property name", "unknown @ rule"]
        );
        assert_eq!(provider.rulesets().len(), 2);
    }

    #[test]
    fn test_declaration_errors() {
        let provider = load("a { opacity 1; color: red } b { opacity: 1 2 }");
        assert_eq!(messages(&provider), vec!["expected ':'", "Junk at end of value for opacity"]);
        assert_eq!(provider.rulesets().len(), 1);
    }

    #[test]
    fn test_renamed_property_is_deprecated() {
        let provider = load("a { fos-key-bindings: none; }");
        let errors = provider.errors();
        assert_eq!(errors.warnings().count(), 1);
        assert_eq!(errors.first_hard_error(), None);
        assert!(provider.rulesets()[0].declaration(PropertyId::KeyBindings).is_some());
    }

    #[test]
    fn test_widget_style_properties() {
        let provider = load("button { -FooButton-spacing: 4; } .big { -FooButton-spacing: 8 }");
        let mut tree = StyleTree::new();
        let plain = tree.add_root(StyleNode::new("button"));
        let big = tree.add_root(StyleNode::new("button").with_class("big"));

        let value = |id| {
            provider
                .widget_style_property(&tree.matcher(id), "-FooButton-spacing")
                .map(|w| w.value.clone())
        };
        assert_eq!(value(plain).as_deref(), Some("4"));
        assert_eq!(value(big).as_deref(), Some("8"));
    }

    #[test]
    fn test_binding_sets() {
        let provider = load("@binding-set Keys { bind \"<Control>a\" { \"select-all\" () }; unbind \"Delete\"; }");
        assert_eq!(
            provider.binding_set("Keys"),
            Some(&["bind \"<Control>a\" { \"select-all\" () }".to_string(), "unbind \"Delete\"".to_string()][..])
        );

        let provider = load("@binding-set Keys { frobnicate; }");
        assert_eq!(messages(&provider), vec!["Failed to parse binding set."]);
    }

    #[test]
    fn test_reset() {
        let mut provider = load("@define-color a red; a { opacity: 1 } @keyframes k { to { opacity: 0 } }");
        assert!(provider.get_keyframes("k").is_some());
        provider.reset();
        assert!(provider.rulesets().is_empty());
        assert!(provider.get_color("a").is_none());
        assert!(provider.get_keyframes("k").is_none());
        assert!(provider.selector_tree().is_empty());
    }

    #[test]
    fn test_sections_follow_config() {
        let provider = load("a { opacity: 1 }");
        assert!(provider.rulesets()[0].declarations()[0].section.is_none());

        let mut provider = StyleProvider::with_config(EngineConfig {
            keep_css_sections: true,
            ..EngineConfig::default()
        });
        provider.load_from_data("a {\n  opacity: 1\n}").unwrap();
        let section = provider.rulesets()[0].declarations()[0].section.clone().unwrap();
        assert_eq!(section.section_type(), SectionType::Value);
        assert_eq!(section.start_line(), 1);
    }

    #[test]
    fn test_is_binding_entry() {
        assert!(is_binding_entry("bind \"a\" { \"x\" () }"));
        assert!(is_binding_entry("unbind 'b'"));
        assert!(!is_binding_entry("binder \"a\""));
        assert!(!is_binding_entry("bind a"));
    }
}
