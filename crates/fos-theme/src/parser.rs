//! CSS Tokenizer
//!
//! A cursor over stylesheet text with the small set of `try_*` and `read_*`
//! primitives the grammar is built from. `try_*` calls never advance on
//! failure; `read_*` calls always advance and report malformed input.
//!
//! The parser also keeps the stack of open [`CssSection`]s so every error
//! it reports points at the construct being parsed.

use std::sync::Arc;

use crate::error::{CssError, CssErrorKind};
use crate::section::{CssSection, SectionType, SourceLocation};
use crate::values::Rgba;

fn is_newline(c: char) -> bool {
    c == '\r' || c == '\n'
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

fn is_nmstart(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_nmchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Characters `resync` has to look at
fn is_resync_special(c: char) -> bool {
    matches!(c, '\\' | '"' | '\'' | '/' | '(' | ')' | '[' | ']' | '{' | '}' | ';' | '\r' | '\n')
}

/// Stylesheet cursor
pub struct CssParser<'a> {
    data: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    file: Option<Arc<str>>,
    /// Parent of the outermost section, set for imported documents
    base_section: Option<CssSection>,
    sections: Vec<CssSection>,
    errors: Vec<CssError>,
}

impl<'a> CssParser<'a> {
    pub fn new(data: &'a str, file: Option<&str>) -> Self {
        Self {
            data,
            pos: 0,
            line: 0,
            line_start: 0,
            file: file.map(Arc::from),
            base_section: None,
            sections: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Parser for a document imported from inside `parent`
    pub fn nested(data: &'a str, file: Option<&str>, parent: Option<CssSection>) -> Self {
        let mut parser = Self::new(data, file);
        parser.base_section = parent;
        parser
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Unparsed remainder of the input
    pub fn remaining(&self) -> &'a str {
        &self.data[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn begins_with(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// Case-insensitive prefix test that does not advance
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let rest = self.remaining().as_bytes();
        rest.len() >= prefix.len() && rest[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            position: self.pos - self.line_start,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    // ---- sections -------------------------------------------------------

    /// Open a section starting at the current position
    pub fn push_section(&mut self, section_type: SectionType) {
        let parent = self.sections.last().cloned().or_else(|| self.base_section.clone());
        let section = CssSection::new(section_type, self.file.clone(), self.location(), parent);
        self.sections.push(section);
    }

    /// Close the innermost section, which must be of `section_type`
    pub fn pop_section(&mut self, section_type: SectionType) -> Option<CssSection> {
        let section = self.sections.pop()?;
        debug_assert_eq!(section.section_type(), section_type);
        section.end(self.location());
        Some(section)
    }

    pub fn current_section(&self) -> Option<&CssSection> {
        self.sections.last()
    }

    /// Snapshot of the innermost section, closed at the current position
    fn error_section(&self) -> CssSection {
        match self.sections.last() {
            Some(open) => CssSection::closed(
                open.section_type(),
                self.file.clone(),
                open.start(),
                self.location(),
                open.parent().cloned(),
            ),
            None => CssSection::closed(
                SectionType::Document,
                self.file.clone(),
                self.location(),
                self.location(),
                self.base_section.clone(),
            ),
        }
    }

    // ---- errors ---------------------------------------------------------

    /// Report a syntax error at the current section
    pub fn error(&mut self, message: impl Into<String>) {
        self.error_full(CssErrorKind::Syntax, message);
    }

    pub fn error_full(&mut self, kind: CssErrorKind, message: impl Into<String>) {
        let error = CssError::new(kind, message, self.error_section());
        self.take_error(error);
    }

    pub fn take_error(&mut self, error: CssError) {
        self.errors.push(error);
    }

    /// Errors reported so far, in order
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<CssError> {
        std::mem::take(&mut self.errors)
    }

    // ---- low level cursor -----------------------------------------------

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.data.as_bytes().get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn new_line(&mut self) -> bool {
        let mut result = false;
        if self.peek() == Some('\r') {
            self.pos += 1;
            result = true;
        }
        if self.peek() == Some('\n') {
            self.pos += 1;
            result = true;
        }
        if result {
            self.line += 1;
            self.line_start = self.pos;
        }
        result
    }

    fn skip_comment(&mut self) -> bool {
        if !self.remaining().starts_with("/*") {
            return false;
        }
        self.pos += 2;

        while !self.is_eof() {
            let run_start = self.pos;
            while let Some(c) = self.peek() {
                if is_newline(c) || c == '/' {
                    break;
                }
                self.bump();
            }
            let len = self.pos - run_start;

            if self.new_line() {
                continue;
            }
            if self.is_eof() {
                break;
            }

            // at '/'
            let closes = len > 0 && self.data.as_bytes()[self.pos - 1] == b'*';
            self.pos += 1;
            if closes {
                return true;
            }
            if self.peek() == Some('*') {
                self.error("'/*' in comment block");
            }
        }

        self.error("Unterminated comment");
        true
    }

    /// Skip whitespace, newlines and comments
    pub fn skip_whitespace(&mut self) {
        while !self.is_eof() {
            if self.new_line() {
                continue;
            }
            if self.peek().is_some_and(is_whitespace) {
                while self.peek().is_some_and(is_whitespace) {
                    self.pos += 1;
                }
                continue;
            }
            if !self.skip_comment() {
                break;
            }
        }
    }

    // ---- tokens ---------------------------------------------------------

    /// Consume `literal` (ASCII, case-insensitive) if the input starts with it
    pub fn try_literal(&mut self, literal: &str, skip_whitespace: bool) -> bool {
        if !self.has_prefix(literal) {
            return false;
        }
        self.pos += literal.len();
        if skip_whitespace {
            self.skip_whitespace();
        }
        true
    }

    fn unescape(&mut self, out: &mut String) {
        debug_assert_eq!(self.peek(), Some('\\'));
        self.pos += 1;

        let digits = self
            .remaining()
            .bytes()
            .take(6)
            .take_while(u8::is_ascii_hexdigit)
            .count();

        if digits > 0 {
            let hex = &self.data[self.pos..self.pos + digits];
            let code = u32::from_str_radix(hex, 16).unwrap_or(0xFFFD);
            out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            self.pos += digits;
            if !self.new_line() && self.peek().is_some_and(is_whitespace) {
                self.pos += 1;
            }
            return;
        }

        if self.new_line() {
            return;
        }
        if let Some(c) = self.bump() {
            out.push(c);
        }
    }

    fn read_char(&mut self, out: &mut String, allowed: fn(char) -> bool) -> bool {
        let Some(c) = self.peek() else {
            return false;
        };
        if allowed(c) || !c.is_ascii() {
            out.push(c);
            self.pos += c.len_utf8();
            return true;
        }
        if c == '\\' {
            self.unescape(out);
            return true;
        }
        false
    }

    /// A run of name characters; `None` if there are none
    pub fn try_name(&mut self, skip_whitespace: bool) -> Option<String> {
        let mut name = String::new();
        while self.read_char(&mut name, is_nmchar) {}

        if name.is_empty() {
            return None;
        }
        if skip_whitespace {
            self.skip_whitespace();
        }
        Some(name)
    }

    /// An identifier: optional `-`, a letter, then name characters
    pub fn try_ident(&mut self, skip_whitespace: bool) -> Option<String> {
        let start = self.pos;
        let mut ident = String::new();

        if self.peek() == Some('-') {
            ident.push('-');
            self.pos += 1;
        }

        if !self.read_char(&mut ident, is_nmstart) {
            self.pos = start;
            return None;
        }

        while self.read_char(&mut ident, is_nmchar) {}

        if skip_whitespace {
            self.skip_whitespace();
        }
        Some(ident)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.peek(), Some('"') | Some('\''))
    }

    /// Read a quoted string, unescaping as it goes
    pub fn read_string(&mut self) -> Option<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                self.error("Expected a string.");
                return None;
            }
        };
        self.pos += 1;

        let mut out = String::new();
        loop {
            match self.peek() {
                Some('\\') => self.unescape(&mut out),
                Some(c @ ('"' | '\'')) => {
                    self.pos += 1;
                    if c == quote {
                        self.skip_whitespace();
                        return Some(out);
                    }
                    out.push(c);
                }
                None => {
                    self.error("Missing end quote in string.");
                    return None;
                }
                Some('\n' | '\r' | '\x0c') => {
                    self.error("Invalid character in string. Must be escaped.");
                    return None;
                }
                Some(c) => {
                    out.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    /// Byte length of an integer literal (`-`? digits) at the cursor
    fn scan_integer(&self, allow_minus: bool) -> usize {
        let bytes = self.remaining().as_bytes();
        let mut len = 0;
        if allow_minus && bytes.first() == Some(&b'-') {
            len = 1;
        }
        let digits = bytes[len..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 { 0 } else { len + digits }
    }

    /// A signed integer. A leading `+` is rejected.
    pub fn try_int(&mut self) -> Option<i32> {
        let len = self.scan_integer(true);
        if len == 0 {
            return None;
        }
        let value = self.remaining()[..len].parse::<i32>().ok()?;
        self.pos += len;
        self.skip_whitespace();
        Some(value)
    }

    pub fn try_uint(&mut self) -> Option<u32> {
        let len = self.scan_integer(false);
        if len == 0 {
            return None;
        }
        let value = self.remaining()[..len].parse::<u32>().ok()?;
        self.pos += len;
        self.skip_whitespace();
        Some(value)
    }

    /// Byte length of a floating point literal at the cursor
    fn scan_double(&self) -> usize {
        let bytes = self.remaining().as_bytes();
        let mut len = 0;

        if matches!(bytes.first(), Some(b'+' | b'-')) {
            len += 1;
        }
        let int_digits = bytes[len..].iter().take_while(|b| b.is_ascii_digit()).count();
        len += int_digits;

        let mut frac_digits = 0;
        if bytes.get(len) == Some(&b'.') {
            frac_digits = bytes[len + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if frac_digits > 0 || int_digits > 0 {
                len += 1 + frac_digits;
            }
        }

        if int_digits == 0 && frac_digits == 0 {
            return 0;
        }

        if matches!(bytes.get(len), Some(b'e' | b'E')) {
            let mut exp = len + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = bytes[exp.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count();
            if exp_digits > 0 {
                len = exp + exp_digits;
            }
        }

        len
    }

    /// A number literal without skipping whitespace afterwards
    pub fn read_number_literal(&mut self) -> Option<f64> {
        let len = self.scan_double();
        if len == 0 {
            return None;
        }
        let value = self.remaining()[..len].parse::<f64>().ok()?;
        self.pos += len;
        Some(value)
    }

    pub fn try_double(&mut self) -> Option<f64> {
        let value = self.read_number_literal()?;
        self.skip_whitespace();
        Some(value)
    }

    /// Whether a number literal starts at the cursor
    pub fn has_number(&self) -> bool {
        let bytes = self.remaining().as_bytes();
        let c = match bytes.first() {
            Some(b'-' | b'+') => bytes.get(1),
            other => other,
        };
        c.is_some_and(|c| c.is_ascii_digit() || *c == b'.')
    }

    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
    pub fn try_hash_color(&mut self) -> Option<Rgba> {
        if self.peek() != Some('#') {
            return None;
        }
        let digits = self.remaining()[1..]
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        let take = match digits {
            d if d >= 8 => 8,
            d if d >= 6 => 6,
            d if d >= 4 => 4,
            3 => 3,
            _ => return None,
        };

        let hex = &self.remaining()[1..1 + take];
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);

        let rgba = match take {
            3 | 4 => Rgba::new(
                f64::from(nibble(0)) / 15.0,
                f64::from(nibble(1)) / 15.0,
                f64::from(nibble(2)) / 15.0,
                if take == 4 { f64::from(nibble(3)) / 15.0 } else { 1.0 },
            ),
            _ => Rgba::new(
                f64::from(byte(0)) / 255.0,
                f64::from(byte(2)) / 255.0,
                f64::from(byte(4)) / 255.0,
                if take == 8 { f64::from(byte(6)) / 255.0 } else { 1.0 },
            ),
        };

        self.pos += 1 + take;
        self.skip_whitespace();
        Some(rgba)
    }

    /// Match an identifier against a keyword table
    pub fn try_enum<T: Copy>(&mut self, table: &[(&str, T)]) -> Option<T> {
        let start = (self.pos, self.line, self.line_start);
        let ident = self.try_ident(true)?;

        for (name, value) in table {
            if ident.eq_ignore_ascii_case(name) {
                return Some(*value);
            }
        }

        (self.pos, self.line, self.line_start) = start;
        None
    }

    /// The identifier at the cursor, without consuming it
    pub fn peek_ident(&mut self) -> Option<String> {
        let start = (self.pos, self.line, self.line_start);
        let ident = self.try_ident(false);
        (self.pos, self.line, self.line_start) = start;
        ident
    }

    /// `url("...")` or a bare name; returns the referenced location
    pub fn read_url(&mut self) -> Option<String> {
        if !self.try_literal("url", false) {
            let Some(path) = self.try_name(true) else {
                self.error("Not a valid url");
                return None;
            };
            return Some(path);
        }

        if !self.try_literal("(", true) {
            self.skip_whitespace();
            if self.try_literal("(", true) {
                self.error_full(
                    CssErrorKind::Deprecated,
                    "Whitespace between 'url' and '(' is deprecated",
                );
            } else {
                self.error("Expected '(' after 'url'");
                return None;
            }
        }

        let path = if self.is_string() {
            self.read_string()?
        } else {
            let mut raw = String::new();
            while let Some(c) = self.peek() {
                if c == ')' || is_whitespace(c) || is_newline(c) {
                    break;
                }
                if c == '\\' {
                    self.unescape(&mut raw);
                } else {
                    raw.push(c);
                    self.pos += c.len_utf8();
                }
            }
            self.skip_whitespace();
            raw
        };

        if !self.try_literal(")", true) {
            self.error("No closing ')' found for 'url'");
            return None;
        }

        Some(path)
    }

    fn resync_internal(&mut self, sync_at_semicolon: bool, read_sync_token: bool, terminator: Option<char>) {
        while !self.is_eof() {
            while self.peek().is_some_and(|c| !is_resync_special(c)) {
                self.bump();
            }

            if self.new_line() {
                continue;
            }
            if self.is_string() {
                let _ = self.read_string();
                continue;
            }
            if self.skip_comment() {
                continue;
            }

            match self.peek() {
                None => break,
                Some('\\') => {
                    let mut ignore = String::new();
                    self.unescape(&mut ignore);
                }
                Some(';') => {
                    if sync_at_semicolon && !read_sync_token {
                        return;
                    }
                    self.pos += 1;
                    if sync_at_semicolon {
                        self.skip_whitespace();
                        return;
                    }
                }
                Some(open @ ('(' | '[' | '{')) => {
                    let close = match open {
                        '(' => ')',
                        '[' => ']',
                        _ => '}',
                    };
                    self.pos += 1;
                    self.resync(false, Some(close));
                    if !self.is_eof() {
                        self.pos += 1;
                    }
                    if open == '{' && (sync_at_semicolon || terminator.is_none()) {
                        self.skip_whitespace();
                        return;
                    }
                }
                Some(c @ ('}' | ')' | ']')) => {
                    if terminator == Some(c) {
                        self.skip_whitespace();
                        return;
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Skip ahead after an error.
    ///
    /// Stops after the next `;` when `sync_at_semicolon` is set, after a
    /// balanced `{ ... }` block, or in front of `terminator`. Strings,
    /// comments and nested brackets are skipped as units.
    pub fn resync(&mut self, sync_at_semicolon: bool, terminator: Option<char>) {
        self.resync_internal(sync_at_semicolon, true, terminator);
    }

    /// Raw text up to the next top-level `;` or `}`, trailing whitespace
    /// trimmed
    pub fn read_value(&mut self) -> Option<String> {
        let start = self.pos;
        self.resync_internal(true, false, Some('}'));

        let value = self.data[start..self.pos].trim_end();
        if value.is_empty() {
            self.error("Expected a property value");
            return None;
        }
        Some(value.to_string())
    }

    /// Raw text of a balanced function call such as `rgb(1, 2, 3)`.
    ///
    /// The cursor must sit on the function name. Whitespace after the
    /// closing parenthesis is skipped.
    pub fn read_function_text(&mut self) -> Option<String> {
        let start = self.pos;
        self.try_ident(false)?;
        if !self.try_literal("(", false) {
            self.pos = start;
            return None;
        }
        self.resync(false, Some(')'));
        if !self.try_literal(")", false) {
            self.error("Missing closing bracket");
            return None;
        }
        let text = self.data[start..self.pos].to_string();
        self.skip_whitespace();
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_is_case_insensitive_and_non_advancing() {
        let mut parser = CssParser::new("@Import foo", None);
        assert!(!parser.try_literal("@media", true));
        assert_eq!(parser.remaining(), "@Import foo");
        assert!(parser.try_literal("@import", true));
        assert_eq!(parser.remaining(), "foo");
    }

    #[test]
    fn test_try_ident() {
        let mut parser = CssParser::new("-fos-key  rest", None);
        assert_eq!(parser.try_ident(true).as_deref(), Some("-fos-key"));
        assert_eq!(parser.remaining(), "rest");

        let mut parser = CssParser::new("-9abc", None);
        assert_eq!(parser.try_ident(true), None);
        assert_eq!(parser.remaining(), "-9abc");

        let mut parser = CssParser::new("a\\62 c", None);
        assert_eq!(parser.try_ident(true).as_deref(), Some("abc"));
    }

    #[test]
    fn test_try_int_rejects_plus() {
        let mut parser = CssParser::new("+3", None);
        assert_eq!(parser.try_int(), None);

        let mut parser = CssParser::new("-12 x", None);
        assert_eq!(parser.try_int(), Some(-12));
        assert_eq!(parser.remaining(), "x");
    }

    #[test]
    fn test_try_double() {
        let mut parser = CssParser::new("1.5e2px", None);
        assert_eq!(parser.read_number_literal(), Some(150.0));
        assert_eq!(parser.remaining(), "px");

        let mut parser = CssParser::new(".5", None);
        assert_eq!(parser.try_double(), Some(0.5));

        let mut parser = CssParser::new("1em", None);
        assert_eq!(parser.read_number_literal(), Some(1.0));
        assert_eq!(parser.remaining(), "em");

        let mut parser = CssParser::new("-.", None);
        assert_eq!(parser.try_double(), None);
    }

    #[test]
    fn test_read_string() {
        let mut parser = CssParser::new(r#""a\"b" next"#, None);
        assert_eq!(parser.read_string().as_deref(), Some("a\"b"));
        assert_eq!(parser.remaining(), "next");

        let mut parser = CssParser::new("'open", None);
        assert_eq!(parser.read_string(), None);
        assert_eq!(parser.errors()[0].message, "Missing end quote in string.");

        let mut parser = CssParser::new("'a\nb'", None);
        assert_eq!(parser.read_string(), None);
        assert_eq!(parser.errors()[0].message, "Invalid character in string. Must be escaped.");
    }

    #[test]
    fn test_hash_colors() {
        let mut parser = CssParser::new("#f00", None);
        assert_eq!(parser.try_hash_color(), Some(Rgba::new(1.0, 0.0, 0.0, 1.0)));

        let mut parser = CssParser::new("#00ff0080", None);
        let color = parser.try_hash_color().unwrap();
        assert_eq!(color.green, 1.0);
        assert!((color.alpha - 128.0 / 255.0).abs() < 1e-9);

        let mut parser = CssParser::new("#zz", None);
        assert_eq!(parser.try_hash_color(), None);
    }

    #[test]
    fn test_comments_and_lines() {
        let mut parser = CssParser::new("/* a\n b */\r\n  x", None);
        parser.skip_whitespace();
        assert_eq!(parser.remaining(), "x");
        assert_eq!(parser.location(), SourceLocation { line: 2, position: 2 });

        let mut parser = CssParser::new("/* never closed", None);
        parser.skip_whitespace();
        assert!(parser.is_eof());
        assert_eq!(parser.errors()[0].message, "Unterminated comment");

        let mut parser = CssParser::new("/* /* */x", None);
        parser.skip_whitespace();
        assert_eq!(parser.remaining(), "x");
        assert_eq!(parser.errors()[0].message, "'/*' in comment block");
    }

    #[test]
    fn test_read_value_stops_at_top_level() {
        let mut parser = CssParser::new("shade(@a, 0.5) ; more", None);
        assert_eq!(parser.read_value().as_deref(), Some("shade(@a, 0.5)"));
        assert!(parser.begins_with(';'));

        let mut parser = CssParser::new("a { b; } c }", None);
        assert_eq!(parser.read_value().as_deref(), Some("a { b; }"));

        let mut parser = CssParser::new("  ;", None);
        parser.skip_whitespace();
        assert_eq!(parser.read_value(), None);
        assert_eq!(parser.errors()[0].message, "Expected a property value");
    }

    #[test]
    fn test_resync_skips_blocks_and_strings() {
        let mut parser = CssParser::new("junk \"};\" (a;b) ; next", None);
        parser.resync(true, Some('}'));
        assert_eq!(parser.remaining(), "next");

        let mut parser = CssParser::new("bad { x: y; } .next {}", None);
        parser.resync(false, None);
        assert_eq!(parser.remaining(), ".next {}");

        let mut parser = CssParser::new("color red } tail", None);
        parser.resync(true, Some('}'));
        assert_eq!(parser.remaining(), "} tail");
    }

    #[test]
    fn test_read_url() {
        let mut parser = CssParser::new("url(\"base.css\");", None);
        assert_eq!(parser.read_url().as_deref(), Some("base.css"));
        assert!(parser.begins_with(';'));

        let mut parser = CssParser::new("url (other.css);", None);
        assert_eq!(parser.read_url().as_deref(), Some("other.css"));
        assert_eq!(parser.errors()[0].kind, CssErrorKind::Deprecated);

        let mut parser = CssParser::new("plain;", None);
        assert_eq!(parser.read_url().as_deref(), Some("plain"));
    }

    #[test]
    fn test_try_enum_restores_position() {
        let table = [("normal", 0), ("reverse", 1)];
        let mut parser = CssParser::new("REVERSE", None);
        assert_eq!(parser.try_enum(&table), Some(1));

        let mut parser = CssParser::new("sideways x", None);
        assert_eq!(parser.try_enum(&table), None);
        assert_eq!(parser.remaining(), "sideways x");
    }

    #[test]
    fn test_sections_nest() {
        let mut parser = CssParser::new("a { }", Some("t.css"));
        parser.push_section(SectionType::Document);
        parser.push_section(SectionType::Ruleset);
        parser.error("boom");
        let ruleset = parser.pop_section(SectionType::Ruleset).unwrap();
        let document = parser.pop_section(SectionType::Document).unwrap();

        assert!(ruleset.parent().unwrap().ptr_eq(&document));
        let error = &parser.errors()[0];
        assert_eq!(error.section.section_type(), SectionType::Ruleset);
        assert_eq!(error.section.file(), Some("t.css"));
    }

    #[test]
    fn test_read_function_text() {
        let mut parser = CssParser::new("rgba(1, 2, 3, 0.5) x", None);
        assert_eq!(parser.read_function_text().as_deref(), Some("rgba(1, 2, 3, 0.5)"));
        assert_eq!(parser.remaining(), "x");
    }
}
